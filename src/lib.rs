pub mod api;
pub mod model;
pub mod poll;
pub mod state;
pub mod tui;
pub mod view;
