use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "pyscratch", about = "Python scratchpad with an embedded interpreter session", version)]
pub struct Cli {
    /// Python file to load into the editor. It is read once and never written.
    #[arg(value_name = "FILE")]
    pub file: Option<String>,

    /// Interpreter command (overrides PYSCRATCH_PYTHON).
    #[arg(long, value_name = "CMD")]
    pub python: Option<String>,

    /// Run the source once without the TUI and print the output.
    ///
    /// Source comes from FILE, or from stdin when no file is given.
    /// Exits with status 1 when the program raised or the interpreter failed.
    #[arg(long)]
    pub run: bool,

    /// Write logs here instead of the configured log file.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headless_run_with_overrides() {
        let cli = Cli::try_parse_from(["pyscratch", "--run", "--python", "py -3", "prog.py"]).unwrap();
        assert!(cli.run);
        assert_eq!(cli.python.as_deref(), Some("py -3"));
        assert_eq!(cli.file.as_deref(), Some("prog.py"));
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn bare_invocation_opens_scratchpad() {
        let cli = Cli::try_parse_from(["pyscratch"]).unwrap();
        assert!(!cli.run);
        assert!(cli.file.is_none());
    }
}
