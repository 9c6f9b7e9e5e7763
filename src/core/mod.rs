//! Core catalog logic.
//!
//! This module contains:
//! - Catalog: Owner of all records and every rent/return transaction
//! - Error: Failure outcomes of catalog operations
//! - Ordering: Sorted insertion helpers used by listings
//! - Intersection: Books shared across several members' histories

pub mod catalog;
pub mod error;
pub mod intersection;
pub mod ordering;

// Re-export commonly used types
pub use catalog::{Catalog, CopyCount, FIRST_MEMBER_NUMBER};
pub use error::{CatalogError, ErrorKind};
pub use intersection::common_history;
pub use ordering::{insert_sorted, insert_sorted_unique};
