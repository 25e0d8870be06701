use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the store, storage, and configuration layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_storage_errors() {
        let err = BudgetError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        ));
        assert!(matches!(err, BudgetError::StorageError(ref message) if message.contains("read-only")));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let id = Uuid::new_v4();
        let message = BudgetError::TransactionNotFound(id).to_string();
        assert!(message.contains(&id.to_string()), "unexpected message: {message}");
    }
}
