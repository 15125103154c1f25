//! Ratatui front-end. `app` holds state and key dispatch, `terminal` owns the
//! crossterm event loop, and the remaining modules are rendering helpers.

mod app;
mod helpers;
mod search;
mod terminal;

pub use app::{App, AppConfig};
pub use terminal::run_app;
