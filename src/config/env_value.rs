// ABOUTME: Config values that may be read from the environment at load time.
// ABOUTME: A value is either written inline or names a variable with an optional fallback.

use serde::Deserialize;

use crate::error::{Error, Result};

/// `url: http://...` or `url: { env: VAR, default: http://... }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// The effective value. Unset and blank variables both fall back to
    /// `default`; with no default that is an error naming the variable.
    pub fn resolve(&self) -> Result<String> {
        let (var, default) = match self {
            EnvValue::Literal(value) => return Ok(value.clone()),
            EnvValue::FromEnv { var, default } => (var, default),
        };

        if let Ok(value) = std::env::var(var)
            && !value.trim().is_empty()
        {
            tracing::debug!("config value taken from ${}", var);
            return Ok(value);
        }

        let Some(fallback) = default else {
            return Err(Error::MissingEnvVar(var.clone()));
        };
        tracing::debug!("${} unset, using configured default", var);
        Ok(fallback.clone())
    }

    /// The variable this value reads, if any.
    pub fn env_var(&self) -> Option<&str> {
        match self {
            EnvValue::Literal(_) => None,
            EnvValue::FromEnv { var, .. } => Some(var),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ignores_environment() {
        let value = EnvValue::Literal("http://directory.local".to_string());
        assert_eq!(value.env_var(), None);
        assert_eq!(value.resolve().unwrap(), "http://directory.local");
    }

    #[test]
    fn parses_both_shapes() {
        let literal: EnvValue = serde_yaml::from_str("http://a.local").unwrap();
        assert!(matches!(literal, EnvValue::Literal(_)));

        let from_env: EnvValue = serde_yaml::from_str("env: DIRECTORY_URL").unwrap();
        assert_eq!(from_env.env_var(), Some("DIRECTORY_URL"));
    }
}
