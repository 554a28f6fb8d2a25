//! Scratchpad handler with TUI interface using Ratatui.

use anyhow::Result;
use is_terminal::IsTerminal;
use std::io;

use crate::{config::Config, tui::run_scratchpad};

/// Open the interactive scratchpad with `source` in the editor.
pub async fn run(cfg: &Config, source: &str) -> Result<()> {
    if !io::stdout().is_terminal() {
        eprintln!("Warning: the scratchpad needs a terminal. Use --run for non-interactive execution.");
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    tracing::info!(config = %cfg.config_path.display(), "opening scratchpad");
    run_scratchpad(cfg.runtime(), source, cfg.tab_width()).await
}
