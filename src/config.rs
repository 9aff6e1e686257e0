use crate::quarter::{LabelError, QuarterPolicy};
use std::env;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OFFICE_TRACKER_QUARTER_POLICY: {0}")]
    Policy(#[from] LabelError),
    #[error("{name} must be true or false, got {value:?}")]
    Flag { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub policy: QuarterPolicy,
    pub seed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            policy: QuarterPolicy::CALENDAR,
            seed: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// An unparseable `PORT` falls back to the default; the other settings
    /// are rejected.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(defaults.port);
        let policy = match lookup("OFFICE_TRACKER_QUARTER_POLICY") {
            Some(value) => value.parse()?,
            None => defaults.policy,
        };
        let seed = match lookup("OFFICE_TRACKER_SEED") {
            Some(value) => parse_flag("OFFICE_TRACKER_SEED", &value)?,
            None => defaults.seed,
        };
        Ok(Self { port, policy, seed })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Flag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]).unwrap(), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let parsed = config(&[
            ("PORT", "9000"),
            ("OFFICE_TRACKER_QUARTER_POLICY", "fiscal"),
            ("OFFICE_TRACKER_SEED", "false"),
        ])
        .unwrap();
        assert_eq!(parsed.port, 9000);
        assert_eq!(parsed.policy, QuarterPolicy::FISCAL);
        assert!(!parsed.seed);
    }

    #[test]
    fn bad_port_falls_back() {
        assert_eq!(config(&[("PORT", "http")]).unwrap().port, DEFAULT_PORT);
    }

    #[test]
    fn rejects_unknown_policy_and_flags() {
        assert!(matches!(
            config(&[("OFFICE_TRACKER_QUARTER_POLICY", "lunar")]),
            Err(ConfigError::Policy(_))
        ));
        assert!(matches!(
            config(&[("OFFICE_TRACKER_SEED", "maybe")]),
            Err(ConfigError::Flag { .. })
        ));
    }
}
