//! lendlib - Lending-library catalog
//!
//! An in-memory catalog of book copies and members, with the rules for who
//! may borrow what and when a return is valid.
//!
//! # Architecture
//!
//! - The `Catalog` owns every book and member record
//! - Records point at each other by serial number / member number
//! - Rent and return validate both records before changing either
//!
//! # Modules
//!
//! - `domain`: Records and identifiers (BookRecord, MemberRecord)
//! - `core`: Catalog operations, errors, sorted insertion, history intersection
//! - `storage`: CSV collection loading and saving
//! - `cli`: Command parsing, dispatch, and the interactive loop
//! - `config`: Layered configuration
//!
//! # Usage
//!
//! ```bash
//! # Interactive session with a collection preloaded
//! lendlib repl --collection books.csv
//!
//! # Run a script of commands
//! lendlib exec commands.txt
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;

// Re-export main types at crate root for convenience
pub use core::{Catalog, CatalogError, CopyCount, ErrorKind};
pub use domain::{BookRecord, MemberNumber, MemberRecord, SerialNumber};
