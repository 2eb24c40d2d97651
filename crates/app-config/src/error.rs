// In crates/app-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid signal settings: {0}")]
    Invalid(#[from] strategies::Error),

    #[error("Invalid market settings: {0}")]
    InvalidSymbol(#[from] core_types::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

pub type Result<T> = std::result::Result<T, Error>;
