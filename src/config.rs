use std::path::{Path, PathBuf};
use std::str::FromStr;
use nix::sys::signal::Signal;
use serde::Deserialize;
use crate::jobs::MAX_BACKGROUND_JOBS;

pub const CONFIG_ENV: &str = "SMALLSH_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("invalid config {}: {source}", path.display())]
    Parse { path: PathBuf, #[source] source: serde_json::Error },
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
    #[error("job_capacity {0} exceeds the maximum of {max}", max = MAX_BACKGROUND_JOBS)]
    JobCapacity(usize),
    #[error("unknown exit_signal: {0}")]
    UnknownSignal(String),
}

/// Session settings. Every field may be omitted from the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    pub max_line_length: usize,
    pub max_args: usize,
    pub job_capacity: usize,
    /// Signal sent to every background job by `exit`.
    pub exit_signal: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: ": ".to_string(),
            max_line_length: 2048,
            max_args: 512,
            job_capacity: MAX_BACKGROUND_JOBS,
            exit_signal: "SIGINT".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, else from `$SMALLSH_CONFIG`, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from)) {
            Some(p) => p,
            None => return Ok(Config::default()),
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        Config::from_json(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    pub fn from_json(text: &str) -> Result<Config, ConfigError> {
        let cfg: Config = serde_json::from_str(text).map_err(|source| ConfigError::Parse { path: PathBuf::new(), source })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_length == 0 { return Err(ConfigError::ZeroLimit("max_line_length")); }
        if self.max_args == 0 { return Err(ConfigError::ZeroLimit("max_args")); }
        if self.job_capacity == 0 { return Err(ConfigError::ZeroLimit("job_capacity")); }
        if self.job_capacity > MAX_BACKGROUND_JOBS { return Err(ConfigError::JobCapacity(self.job_capacity)); }
        self.exit_signal()?;
        Ok(())
    }

    /// Accepts `SIGTERM` as well as `TERM`.
    pub fn exit_signal(&self) -> Result<Signal, ConfigError> {
        let name = self.exit_signal.trim();
        let full = if name.starts_with("SIG") { name.to_string() } else { format!("SIG{name}") };
        Signal::from_str(&full).map_err(|_| ConfigError::UnknownSignal(self.exit_signal.clone()))
    }
}
