//! Terminal scratchpad: editor pane, output pane and the session worker.

pub mod app;
pub mod editor;
pub mod events;
pub mod handler;
pub mod ui;
pub mod worker;

pub use handler::run_scratchpad;
