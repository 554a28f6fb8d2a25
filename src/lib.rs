//! pyscratch: a terminal scratchpad that runs Python in one long-lived
//! interpreter session and shows captured stdout and tracebacks.

pub mod cli;
pub mod config;
pub mod execution;
pub mod handlers;
pub mod logging;
pub mod orchestrator;
pub mod printer;
pub mod process;
pub mod tui;
pub mod utils;
