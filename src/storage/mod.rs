//! Bulk loading and saving of book collections.
//!
//! Collections are flat CSV snapshots of the catalog's books. Loan state and
//! members are not persisted.

pub mod collection;

pub use collection::{
    parse_collection, read_book, read_collection, render_collection, save_collection,
    CollectionError, HEADER,
};
