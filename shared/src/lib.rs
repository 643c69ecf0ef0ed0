// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("source: {0}")]
    Source(String),
    #[error("invalid config value for {key}: {value:?}")]
    Config { key: String, value: String },
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;

pub use config::CacheSettings;
