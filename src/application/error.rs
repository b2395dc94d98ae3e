use thiserror::Error;

use crate::domain::{CatalogError, VendingError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Vending(#[from] VendingError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// The ledger rejection behind this error, if that is what it is.
    pub fn as_vending(&self) -> Option<&VendingError> {
        match self {
            AppError::Vending(e) => Some(e),
            _ => None,
        }
    }
}
