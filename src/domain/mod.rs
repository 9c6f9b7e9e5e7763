//! Domain types for the lending catalog.
//!
//! This module contains the core data structures:
//! - Ids: Serial numbers and member numbers
//! - Book: A catalog copy and its loan state
//! - Member: A patron with active and completed loans

pub mod book;
pub mod ids;
pub mod member;

// Re-export commonly used types
pub use book::BookRecord;
pub use ids::{MemberNumber, SerialKey, SerialNumber};
pub use member::MemberRecord;
