//! Catalog copies and their loan state.

use super::ids::{MemberNumber, SerialNumber};
use crate::core::CatalogError;

/// A single copy held by the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    title: String,
    author: String,
    genre: String,
    serial: SerialNumber,

    /// Member currently holding the copy; `None` means available
    renter: Option<MemberNumber>,

    /// Members who have returned this copy, oldest first
    history: Vec<MemberNumber>,
}

impl BookRecord {
    /// Create an available copy with no loan history
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        serial: impl Into<SerialNumber>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            serial: serial.into(),
            renter: None,
            history: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn serial(&self) -> &SerialNumber {
        &self.serial
    }

    /// Whether the copy is currently on loan
    pub fn is_rented(&self) -> bool {
        self.renter.is_some()
    }

    /// Member currently renting the copy
    pub fn renter(&self) -> Option<MemberNumber> {
        self.renter
    }

    /// Members who have rented and returned this copy, in return order
    pub fn history(&self) -> &[MemberNumber] {
        &self.history
    }

    /// Short form: `<title> (<author>)`
    pub fn short_form(&self) -> String {
        format!("{} ({})", self.title, self.author)
    }

    /// Full form, including availability on a second line
    pub fn full_form(&self) -> String {
        let head = format!(
            "{}: {} ({}, {})",
            self.serial, self.title, self.author, self.genre
        );

        match self.renter {
            Some(member) => format!("{}\nRented by: {}.", head, member),
            None => format!("{}\nCurrently available.", head),
        }
    }

    /// Check that the copy can be lent out
    pub fn ensure_rentable(&self) -> Result<(), CatalogError> {
        if let Some(renter) = self.renter {
            return Err(CatalogError::BookUnavailable {
                serial: self.serial.clone(),
                renter,
            });
        }
        Ok(())
    }

    /// Check that `member` is the one holding the copy
    pub fn ensure_returnable_by(&self, member: MemberNumber) -> Result<(), CatalogError> {
        match self.renter {
            Some(renter) if renter == member => Ok(()),
            _ => Err(CatalogError::NotRenter {
                member,
                serial: self.serial.clone(),
            }),
        }
    }

    /// Mark the copy as lent to `member`. Callers validate with
    /// [`ensure_rentable`](Self::ensure_rentable) first.
    pub(crate) fn lend_to(&mut self, member: MemberNumber) {
        debug_assert!(self.renter.is_none());
        self.renter = Some(member);
    }

    /// Clear the renter and append them to the history. Callers validate with
    /// [`ensure_returnable_by`](Self::ensure_returnable_by) first.
    pub(crate) fn take_back(&mut self) {
        if let Some(member) = self.renter.take() {
            self.history.push(member);
        }
    }
}
