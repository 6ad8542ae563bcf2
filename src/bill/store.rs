//! The interface to the bills collection of the data store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::database_id::BillId;

use super::core::{BillRecord, BillUpdate, NewProof};

/// The errors a bill store can reject a request with.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The requested bill or collection does not exist.
    #[error("Erreur 404: the requested bill could not be found")]
    NotFound,

    /// The store failed to carry out the request.
    ///
    /// The string describes the underlying failure and should only be logged.
    #[error("Erreur 500: {0}")]
    Internal(String),
}

impl StoreError {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound => 404,
            StoreError::Internal(_) => 500,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            error => StoreError::Internal(error.to_string()),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        StoreError::Internal(error.to_string())
    }
}

/// Access to the bills collection.
///
/// The store owns the bills; callers only get copies.
#[async_trait]
pub trait BillStore: std::fmt::Debug + Send + Sync {
    /// List every bill in the collection.
    async fn list(&self) -> Result<Vec<BillRecord>, StoreError>;

    /// Create a pending bill from an uploaded proof.
    ///
    /// The returned record has its ID, email, proof URL and proof file name set.
    async fn create(&self, proof: NewProof) -> Result<BillRecord, StoreError>;

    /// Write `update` to the bill with `id` and return the updated record.
    ///
    /// # Errors
    /// Returns [StoreError::NotFound] if there is no bill with `id`.
    async fn update(&self, id: BillId, update: BillUpdate) -> Result<BillRecord, StoreError>;
}

/// A bill store that can be shared between request handlers.
pub type SharedBillStore = Arc<dyn BillStore>;
