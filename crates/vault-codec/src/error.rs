//! error types for the order codec

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{field} value {value} exceeds the 32-bit limit (4294967295)")]
    FieldOverflow { field: &'static str, value: u128 },

    #[error("{field} must be a finite non-negative amount, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid handle: {0}")]
    InvalidHandle(String),
}
