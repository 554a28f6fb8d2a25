use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use pyscratch::{cli::Cli, config::Config, handlers, logging, utils};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Load config; CLI flags override it
    let mut cfg = Config::load();
    if let Some(python) = &args.python {
        cfg.set("PYSCRATCH_PYTHON", python.clone());
    }
    if let Some(path) = &args.log_file {
        cfg.set("PYSCRATCH_LOG_PATH", path.clone());
    }

    if let Err(e) = logging::init(&cfg.log_path(), &cfg.log_filter()) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let source = match args.file.as_deref() {
        Some(path) => utils::read_source(path)?,
        None if args.run => {
            if io::stdin().is_terminal() {
                bail!("--run needs a FILE or source on stdin");
            }
            utils::read_stdin()?
        }
        None => utils::SAMPLE_PROGRAM.to_string(),
    };

    if args.run {
        let failed = handlers::run::run(cfg.runtime(), &source).await?;
        if failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    handlers::scratchpad::run(&cfg, &source).await
}
