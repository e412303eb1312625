mod actions;
mod app;
mod cache;
mod notify;
mod reconcile;
mod status;
mod view_state;

pub use self::actions::{ActionGateway, Effect};
pub use self::app::{AppState, Outcome, PollEvent, Resource};
pub use self::cache::{CacheDelta, EntityCache, Keyed};
pub use self::notify::NotificationQueue;
pub use self::reconcile::{ListOp, apply_ops, history_delta};
pub use self::status::{HostStatus, resolve_host_status};
pub use self::view_state::{CurrentState, ViewState};
