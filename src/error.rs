use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type.
///
/// Only the fallible boundaries carry error variants. The Telegram and
/// generator clients deliberately have none: they report through outcome
/// values and never error past their own boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Local cache errors
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
    /// Cloud document store errors
    #[error("cloud store error: {0}")]
    Cloud(#[from] CloudError),
    /// Configuration errors
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Operation reserved for the administrator role
    #[error("operation requires administrator privilege")]
    AdminRequired,
    /// Wrapper for third-party errors with no better home
    #[error("error: {0}")]
    Other(String),
}

/// Local cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Cache file could not be read
    #[error("failed to read cache file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Cache file could not be written
    #[error("failed to write cache file {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Cache file holds something other than a JSON array
    #[error("cache file {path} holds invalid JSON: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Cloud document store errors
#[derive(Debug, Error)]
pub enum CloudError {
    /// Network request failed
    #[error("request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// Store answered with a non-success status
    #[error("cloud store answered {status} for {endpoint}")]
    BadStatus { endpoint: String, status: u16 },
    /// Response body was not the expected document shape
    #[error("cloud document at {endpoint} is not valid JSON: {source}")]
    InvalidDocument {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but cannot be parsed
    #[error("failed to parse config file {path}: {source}")]
    InvalidFile {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
