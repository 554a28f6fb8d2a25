use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::process::RuntimeConfig;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then `KEY=VALUE` lines from `path`, then the environment.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            if let Ok(file) = fs::File::open(path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            } else {
                tracing::warn!("could not read config file {}", path.display());
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self {
            inner: map,
            config_path: path.to_path_buf(),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    pub fn runtime(&self) -> RuntimeConfig {
        let command = self
            .get("PYSCRATCH_PYTHON")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| RuntimeConfig::default().command);
        RuntimeConfig { command }
    }

    pub fn log_path(&self) -> PathBuf {
        self.get_path("PYSCRATCH_LOG_PATH")
            .unwrap_or_else(|| env::temp_dir().join("pyscratch").join("pyscratch.log"))
    }

    pub fn log_filter(&self) -> String {
        self.get("PYSCRATCH_LOG")
            .unwrap_or_else(|| "pyscratch=info".to_string())
    }

    pub fn tab_width(&self) -> usize {
        self.get_usize("PYSCRATCH_TAB_WIDTH")
            .filter(|w| (1..=16).contains(w))
            .unwrap_or(4)
    }
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("PYSCRATCH_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("pyscratch").join(".pyscratchrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    let log_dir = env::temp_dir().join("pyscratch");

    m.insert("PYSCRATCH_PYTHON".into(), "python3".into());
    m.insert(
        "PYSCRATCH_LOG_PATH".into(),
        log_dir.join("pyscratch.log").to_string_lossy().into_owned(),
    );
    m.insert("PYSCRATCH_LOG".into(), "pyscratch=info".into());
    m.insert("PYSCRATCH_TAB_WIDTH".into(), "4".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Tests use keys no environment sets so the env overlay stays out of the way.
    #[test]
    fn rc_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# interpreter").unwrap();
        writeln!(file, "PYSCRATCH_TEST_ONLY_KEY = from-file").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not a pair").unwrap();

        let cfg = Config::load_from(file.path());
        assert_eq!(cfg.get("PYSCRATCH_TEST_ONLY_KEY").as_deref(), Some("from-file"));
        assert_eq!(cfg.config_path, file.path());
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(&dir.path().join("absent"));
        cfg.set("PYSCRATCH_PYTHON", "python3");
        cfg.set("PYSCRATCH_TAB_WIDTH", "4");
        assert_eq!(cfg.runtime().command, "python3");
        assert_eq!(cfg.tab_width(), 4);
    }

    #[test]
    fn blank_interpreter_falls_back_and_bad_tab_width_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(&dir.path().join("absent"));
        cfg.set("PYSCRATCH_PYTHON", "  ");
        cfg.set("PYSCRATCH_TAB_WIDTH", "0");
        assert_eq!(cfg.runtime().command, "python3");
        assert_eq!(cfg.tab_width(), 4);

        cfg.set("PYSCRATCH_PYTHON", "py -3");
        cfg.set("PYSCRATCH_TAB_WIDTH", "2");
        assert_eq!(cfg.runtime().command, "py -3");
        assert_eq!(cfg.tab_width(), 2);
    }
}
