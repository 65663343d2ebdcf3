use crate::buffer::{DEFAULT_FLUSH_THRESHOLD, FlushPolicy, LogBuffer};
use crate::error::ConfigError;
use crate::sink::{ConsoleSink, NullSink, TracingSink};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ABACUS_CONFIG_PATH";
/// Configuration file used when `ABACUS_CONFIG_PATH` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "abacus.toml";

/// Where flushed entries go.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Console,
    Tracing,
    None,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    #[serde(default = "default_flush_threshold")]
    pub flush_threshold: usize,
    #[serde(default)]
    pub flush_policy: FlushPolicy,
    #[serde(default)]
    pub sink: SinkKind,
}

fn default_flush_threshold() -> usize {
    DEFAULT_FLUSH_THRESHOLD
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            flush_threshold: default_flush_threshold(),
            flush_policy: FlushPolicy::default(),
            sink: SinkKind::default(),
        }
    }
}

impl AuditConfig {
    /// Loads from `ABACUS_CONFIG_PATH` (or `abacus.toml`), then applies
    /// `ABACUS_FLUSH_THRESHOLD` / `ABACUS_FLUSH_POLICY` overrides.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            warn!(
                "Configuration file '{}' not found. Using default configuration.",
                config_path
            );
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        info!(
            flush_threshold = config.flush_threshold,
            flush_policy = ?config.flush_policy,
            sink = ?config.sink,
            "audit configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment-style overrides; `lookup` returns the raw value for a key.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("ABACUS_FLUSH_THRESHOLD") {
            self.flush_threshold = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::invalid("flush_threshold", format!("{raw:?}: {e}")))?;
        }
        if let Some(raw) = lookup("ABACUS_FLUSH_POLICY") {
            self.flush_policy = raw
                .parse::<FlushPolicy>()
                .map_err(|message| ConfigError::invalid("flush_policy", message))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flush_threshold == 0 {
            return Err(ConfigError::invalid("flush_threshold", "must be at least 1"));
        }
        Ok(())
    }

    /// A fresh buffer wired to the configured sink.
    pub fn build_buffer(&self) -> LogBuffer {
        let buffer = match self.sink {
            SinkKind::Console => LogBuffer::new(ConsoleSink),
            SinkKind::Tracing => LogBuffer::new(TracingSink),
            SinkKind::None => LogBuffer::new(NullSink),
        };
        buffer.with_threshold(self.flush_threshold).with_policy(self.flush_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.flush_threshold, 5);
        assert_eq!(config.flush_policy, FlushPolicy::Retain);
        assert_eq!(config.sink, SinkKind::Console);
        assert_eq!(AuditConfig::from_toml("").unwrap(), config);
    }

    #[test]
    fn test_from_toml() {
        let config = AuditConfig::from_toml(
            r#"
flush_threshold = 3
flush_policy = "clear"
sink = "tracing"
"#,
        )
        .unwrap();
        assert_eq!(config.flush_threshold, 3);
        assert_eq!(config.flush_policy, FlushPolicy::Clear);
        assert_eq!(config.sink, SinkKind::Tracing);

        let buffer = config.build_buffer();
        assert_eq!(buffer.threshold(), 3);
        assert_eq!(buffer.policy(), FlushPolicy::Clear);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AuditConfig::from_toml("flush_threshold = 0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(AuditConfig::from_toml("sink = \"syslog\""), Err(ConfigError::Parse(_))));
        assert!(matches!(
            AuditConfig::from_file("/definitely/not/here.toml"),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> =
            HashMap::from([("ABACUS_FLUSH_THRESHOLD", "8"), ("ABACUS_FLUSH_POLICY", "clear")]);
        let mut config = AuditConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.flush_threshold, 8);
        assert_eq!(config.flush_policy, FlushPolicy::Clear);

        let err = config
            .apply_overrides(|key| (key == "ABACUS_FLUSH_THRESHOLD").then(|| "many".to_string()))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid value for 'flush_threshold'"));
    }
}
