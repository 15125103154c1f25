//! Core library surface for the catalog browser.
//!
//! The query engine, reading list and view controller are plain data and
//! pure functions; `catalog` fetches the books and `ui` renders the
//! controller in the terminal. The binary wires them together.
pub mod catalog;
pub mod cli;
pub mod controller;
pub mod listing;
pub mod logging;
pub mod models;
pub mod query;
pub mod reading_list;
pub mod ui;

/// The catalog entry and the filter selection every layer passes around.
pub use models::{BookRecord, LevelBand};

/// The state machine the presentation layer renders.
pub use controller::ViewController;
pub use reading_list::ReadingList;

/// The interactive application entry point and state container.
pub use ui::{run_app, App, AppConfig};
