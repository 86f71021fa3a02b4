//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`NotFound`] thrown when an operation targets a row that does not exist.
//! - [`Validation`] thrown when a payload is rejected by a validation schema.
//! - [`InvalidTransition`] thrown when a status change is not allowed.
//! - [`Database`] thrown when the storage layer fails.
//!
//!  [`NotFound`]: EngineError::NotFound
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationError;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::NotFound { entity: a, id: x },
                Self::NotFound { entity: b, id: y },
            ) => a == b && x == y,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidTransition(a), Self::InvalidTransition(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
