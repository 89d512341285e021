// ABOUTME: Configuration types and parsing for yardcheck.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and directory selection.

mod deserialize;
mod env_value;
mod init;

pub use env_value::EnvValue;
pub use init::{generate_template_yaml, init_config};

use crate::activity::DEFAULT_INTERVAL_MONTHS;
use crate::directory::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};
use crate::workflow::DEFAULT_EVENT_CAPACITY;
use deserialize::{deserialize_capacity, deserialize_months};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "yardcheck.yml";
pub const CONFIG_FILENAME_ALT: &str = "yardcheck.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".yardcheck/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub periodic: PeriodicConfig,

    #[serde(default)]
    pub events: EventsConfig,

    /// Directory the config was loaded from; relative fixture paths resolve here.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub url: Option<EnvValue>,

    #[serde(default)]
    pub fixture: Option<PathBuf>,

    #[serde(default = "default_directory_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_directory_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeriodicConfig {
    #[serde(
        default = "default_interval_months",
        deserialize_with = "deserialize_months"
    )]
    pub interval_months: u32,
}

impl Default for PeriodicConfig {
    fn default() -> Self {
        Self {
            interval_months: DEFAULT_INTERVAL_MONTHS,
        }
    }
}

fn default_interval_months() -> u32 {
    DEFAULT_INTERVAL_MONTHS
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    #[serde(
        default = "default_event_capacity",
        deserialize_with = "deserialize_capacity"
    )]
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

/// Where container data comes from, with env references resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySource {
    Http { url: String, timeout: Duration },
    Fixture(PathBuf),
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Resolve the configured directory. Exactly one of `url` and `fixture`
    /// must be set.
    pub fn directory_source(&self) -> Result<DirectorySource> {
        match (&self.directory.url, &self.directory.fixture) {
            (Some(url), None) => Ok(DirectorySource::Http {
                url: url.resolve()?,
                timeout: self.directory.timeout,
            }),
            (None, Some(fixture)) => {
                let path = match &self.base_dir {
                    Some(base) if fixture.is_relative() => base.join(fixture),
                    _ => fixture.clone(),
                };
                Ok(DirectorySource::Fixture(path))
            }
            (Some(_), Some(_)) => Err(Error::InvalidConfig(
                "directory.url and directory.fixture are mutually exclusive".to_string(),
            )),
            (None, None) => Err(Error::InvalidConfig(
                "directory needs either url or fixture".to_string(),
            )),
        }
    }

    pub fn template() -> Self {
        Config {
            directory: DirectoryConfig {
                url: Some(EnvValue::FromEnv {
                    var: "YARDCHECK_DIRECTORY_URL".to_string(),
                    default: Some("http://localhost:8080".to_string()),
                }),
                fixture: None,
                timeout: default_directory_timeout(),
            },
            periodic: PeriodicConfig::default(),
            events: EventsConfig::default(),
            base_dir: None,
        }
    }
}
