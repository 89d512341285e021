// ABOUTME: Config scaffolding for new depots.
// ABOUTME: Creates yardcheck.yml template files.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config, EnvValue};

/// Write a commented `yardcheck.yml` into `dir`, returning its path.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&Config::template());
    std::fs::write(&config_path, yaml)?;

    Ok(config_path)
}

pub fn generate_template_yaml(config: &Config) -> String {
    let (var, default) = match &config.directory.url {
        Some(EnvValue::FromEnv { var, default }) => {
            (var.as_str(), default.as_deref().unwrap_or_default())
        }
        Some(EnvValue::Literal(url)) => ("YARDCHECK_DIRECTORY_URL", url.as_str()),
        None => ("YARDCHECK_DIRECTORY_URL", ""),
    };
    format!(
        r#"directory:
  # Container Directory service (plain http only)
  url:
    env: {var}
    default: {default}
  # Or serve containers from a local YAML file instead of url:
  # fixture: containers.yml
  timeout: {timeout}

periodic:
  # Months until the next periodic inspection is due
  interval_months: {months}

events:
  capacity: {capacity}
"#,
        timeout = format!("{}s", config.directory.timeout.as_secs()),
        months = config.periodic.interval_months,
        capacity = config.events.capacity,
    )
}
