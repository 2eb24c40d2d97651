// In crates/strategies/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The caller broke the input contract (e.g. a NaN sentiment score).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid strategy parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, Error>;
