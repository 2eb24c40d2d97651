// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid trading symbol '{0}': expected BASE/QUOTE, e.g. BTC/USDT")]
    InvalidSymbol(String),
}

pub type Result<T> = std::result::Result<T, Error>;
