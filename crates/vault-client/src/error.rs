//! error types for the order client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// an input field failed validation, nothing was encrypted
    #[error("validation failed: {0}")]
    Validation(#[from] vault_codec::Error),

    /// the encryption sdk rejected; passed through as is
    #[error(transparent)]
    Encryption(anyhow::Error),

    /// user decryption rejected; passed through as is
    #[error(transparent)]
    Decryption(anyhow::Error),

    /// contract read or write rejected; passed through as is
    #[error(transparent)]
    Contract(anyhow::Error),

    #[error("encryption returned {got} handles, expected {expected}")]
    HandleCount { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// true when the failure happened before any external call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_the_field() {
        let err = Error::from(vault_codec::Error::InvalidAmount {
            field: "totalPnl",
            value: -5.0,
        });

        assert!(err.is_validation());
        let message = err.to_string();
        assert!(message.starts_with("validation failed: "));
        assert!(message.contains("totalPnl"));
        assert!(!message.contains("order"));
    }
}
