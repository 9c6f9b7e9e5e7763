//! Failure outcomes of catalog operations.
//!
//! Every failure is recoverable: a failed operation leaves the catalog
//! exactly as it was before the call.

use thiserror::Error;

use crate::domain::{MemberNumber, SerialNumber};
use crate::storage::CollectionError;

/// Errors returned by [`Catalog`](super::Catalog) operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Member not found: {0}")]
    MemberNotFound(MemberNumber),

    #[error("Book not found: {0}")]
    BookNotFound(SerialNumber),

    #[error("Book already exists: {0}")]
    BookAlreadyExists(SerialNumber),

    #[error("Book {serial} is rented by {renter}")]
    BookUnavailable {
        serial: SerialNumber,
        renter: MemberNumber,
    },

    #[error("Member {member} is already renting {serial}")]
    AlreadyRenting {
        member: MemberNumber,
        serial: SerialNumber,
    },

    #[error("Member {member} is not renting {serial}")]
    NotRenter {
        member: MemberNumber,
        serial: SerialNumber,
    },

    #[error("Member {0} requested more than once")]
    DuplicateMember(MemberNumber),

    #[error("No member numbers left to assign")]
    MemberNumbersExhausted,

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Collection unavailable: {0}")]
    Source(#[from] CollectionError),
}

/// Broad classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidState,
    PreconditionViolation,
    SourceUnavailable,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::MemberNotFound(_) | CatalogError::BookNotFound(_) => ErrorKind::NotFound,
            CatalogError::BookAlreadyExists(_) => ErrorKind::AlreadyExists,
            CatalogError::BookUnavailable { .. }
            | CatalogError::AlreadyRenting { .. }
            | CatalogError::NotRenter { .. } => ErrorKind::InvalidState,
            CatalogError::DuplicateMember(_)
            | CatalogError::MemberNumbersExhausted
            | CatalogError::MissingArgument(_) => ErrorKind::PreconditionViolation,
            CatalogError::Source(_) => ErrorKind::SourceUnavailable,
        }
    }
}
