//! Error types for the toolkit, one enum per concern.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::PlayerId;

/// Errors raised while loading, saving or querying configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as YAML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file {path} is not a YAML mapping at the top level")]
    NotAMapping { path: PathBuf },

    #[error("bundled defaults for '{file}' are not valid YAML: {source}")]
    Defaults {
        file: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The on-disk file misses a key and the bundled defaults do too. Almost
    /// always means the bundle shipped with the plugin is out of date.
    #[error("bundled defaults for '{file}' lack a key at '{key}'")]
    MissingDefault { file: String, key: String },

    #[error("'{file}' has no value at '{key}'")]
    MissingKey { file: String, key: String },

    #[error("config value at '{key}' is not a {expected}")]
    WrongType { key: String, expected: &'static str },
}

/// Errors from item handling and the item blob codec.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("failed to encode item data: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode item data: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("item blob is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to compress item blob: {0}")]
    Compress(#[source] std::io::Error),

    #[error("failed to decompress item blob: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("item blob holds no items")]
    Empty,

    #[error("slot {slot} is out of range for a {size}-slot menu")]
    SlotOutOfRange { slot: usize, size: usize },
}

/// Errors from the update checker.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("update request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("update endpoint answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("update endpoint answered with an empty body")]
    EmptyResponse,
}

/// Errors reported back through the host framework seam.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("player {0} is not connected")]
    PlayerNotConnected(PlayerId),

    #[error("the host does not support {0}")]
    Unsupported(&'static str),

    #[error("host delivery failed: {0}")]
    Delivery(String),
}

/// Raised when a namespaced key fails validation.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid character '{ch}' in namespace '{namespace}'")]
    InvalidNamespace { namespace: String, ch: char },

    #[error("invalid character '{ch}' in key '{key}'")]
    InvalidKey { key: String, ch: char },

    #[error("namespaced keys may not have empty halves")]
    Empty,
}

// Result aliases for the common cases.
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ItemResult<T> = Result<T, ItemError>;
pub type UpdateResult<T> = Result<T, UpdateError>;
pub type HostResult<T> = Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ConfigError::MissingDefault {
            file: "config.yml".to_string(),
            key: "ranks.admin".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("config.yml"));
        assert!(message.contains("ranks.admin"));

        let err = ItemError::SlotOutOfRange { slot: 55, size: 54 };
        assert!(err.to_string().contains("55"));
    }
}
