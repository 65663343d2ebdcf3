use thiserror::Error;

/// Errors raised while loading or validating audit configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{setting}': {message}")]
    Invalid { setting: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(setting: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid { setting: setting.to_string(), message: message.into() }
    }
}
