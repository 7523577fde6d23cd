//! Runtime configuration.
//!
//! Everything has a development default; environment variables override the
//! defaults and command-line flags override the environment. `Config::from_env`
//! only fails when a variable is present but cannot be parsed.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names.
pub const ENV_CHROME_PATH: &str = "WORDHARVEST_CHROME_PATH";
pub const ENV_HEADLESS: &str = "WORDHARVEST_HEADLESS";
pub const ENV_TIMEOUT_SECS: &str = "WORDHARVEST_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "WORDHARVEST_POLL_INTERVAL_MS";
pub const ENV_OUTPUT_DIR: &str = "WORDHARVEST_OUTPUT_DIR";
pub const ENV_MAX_NAV_ATTEMPTS: &str = "WORDHARVEST_MAX_NAV_ATTEMPTS";
pub const ENV_BACKOFF_BASE_MS: &str = "WORDHARVEST_BACKOFF_BASE_MS";

const DEFAULT_HEADLESS: bool = true;
const DEFAULT_TIMEOUT_SECS: u64 = 100;
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_MAX_NAV_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    chrome_path: Option<PathBuf>,
    headless: bool,
    timeout: Duration,
    poll_interval: Duration,
    output_dir: PathBuf,
    max_nav_attempts: u32,
    backoff_base: Duration,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let chrome_path = env::var(ENV_CHROME_PATH)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let headless = parse_bool(ENV_HEADLESS)?.unwrap_or(defaults.headless);
        let timeout = parse_var::<u64>(ENV_TIMEOUT_SECS)?
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        let poll_interval = parse_var::<u64>(ENV_POLL_INTERVAL_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let output_dir = env::var(ENV_OUTPUT_DIR)
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let max_nav_attempts =
            parse_var::<u32>(ENV_MAX_NAV_ATTEMPTS)?.unwrap_or(defaults.max_nav_attempts);
        let backoff_base = parse_var::<u64>(ENV_BACKOFF_BASE_MS)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.backoff_base);

        let config = Self {
            chrome_path,
            headless,
            timeout,
            poll_interval,
            output_dir,
            max_nav_attempts,
            backoff_base,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: "must be greater than zero".into(),
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_nav_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_nav_attempts",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn with_chrome_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chrome_path = Some(path.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        self.timeout = timeout;
        self.validate()?;
        Ok(self)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Explicit browser binary; `None` means search `PATH`.
    pub fn chrome_path(&self) -> Option<&Path> {
        self.chrome_path.as_deref()
    }
    pub fn headless(&self) -> bool {
        self.headless
    }
    /// How long any single wait (navigation, element, result change) may take.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
    /// Directory word files are appended to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
    pub fn max_nav_attempts(&self) -> u32 {
        self.max_nav_attempts
    }
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headless: DEFAULT_HEADLESS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_nav_attempts: DEFAULT_MAX_NAV_ATTEMPTS,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
        }
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(ConfigError::InvalidValue {
                field: key,
                reason: format!("expected a boolean, got {other:?}"),
            }),
        },
        Err(_) => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
