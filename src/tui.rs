use anyhow::Result;

use crate::api::ApiClient;

mod app;
mod input;
mod render;

pub use self::app::Intent;

/// Run the dashboard TUI against `api` until the user quits.
pub fn run(api: ApiClient) -> Result<()> {
    app::run(api)
}
