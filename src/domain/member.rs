//! Library members and their loans.

use std::collections::HashSet;

use super::ids::{MemberNumber, SerialNumber};
use crate::core::CatalogError;

/// A library patron
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    name: String,
    number: MemberNumber,

    /// Copies currently on loan, in borrow order
    active_loans: Vec<SerialNumber>,

    /// Returned copies, in return order (repeats allowed)
    completed_loans: Vec<SerialNumber>,

    /// Mirror of `completed_loans` for membership tests
    completed_serials: HashSet<SerialNumber>,
}

impl MemberRecord {
    pub fn new(name: impl Into<String>, number: MemberNumber) -> Self {
        Self {
            name: name.into(),
            number,
            active_loans: Vec::new(),
            completed_loans: Vec::new(),
            completed_serials: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> MemberNumber {
        self.number
    }

    /// Copies currently rented, in the order they were rented
    pub fn active_loans(&self) -> &[SerialNumber] {
        &self.active_loans
    }

    /// Copies previously rented, in the order they were returned
    pub fn completed_loans(&self) -> &[SerialNumber] {
        &self.completed_loans
    }

    /// Whether this member currently holds `serial`
    pub fn is_renting(&self, serial: &SerialNumber) -> bool {
        self.active_loans.contains(serial)
    }

    /// Whether this member has ever returned `serial`
    pub fn has_returned(&self, serial: &SerialNumber) -> bool {
        self.completed_serials.contains(serial)
    }

    /// Check that `serial` is not already among the active loans
    pub fn ensure_can_rent(&self, serial: &SerialNumber) -> Result<(), CatalogError> {
        if self.is_renting(serial) {
            return Err(CatalogError::AlreadyRenting {
                member: self.number,
                serial: serial.clone(),
            });
        }
        Ok(())
    }

    /// Check that `serial` is among the active loans
    pub fn ensure_can_return(&self, serial: &SerialNumber) -> Result<(), CatalogError> {
        if !self.is_renting(serial) {
            return Err(CatalogError::NotRenter {
                member: self.number,
                serial: serial.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn begin_loan(&mut self, serial: SerialNumber) {
        self.active_loans.push(serial);
    }

    /// Move `serial` from the active loans to the end of the history
    pub(crate) fn end_loan(&mut self, serial: &SerialNumber) {
        if let Some(pos) = self.active_loans.iter().position(|s| s == serial) {
            let serial = self.active_loans.remove(pos);
            self.completed_serials.insert(serial.clone());
            self.completed_loans.push(serial);
        }
    }
}
