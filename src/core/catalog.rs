//! The lending catalog: owner of every book and member record.
//!
//! All cross-record state changes (rent, return) go through here so a book's
//! renter and the member's active loans always change together.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, info};

use super::error::CatalogError;
use super::intersection::common_history;
use super::ordering::insert_sorted;
use crate::domain::{BookRecord, MemberNumber, MemberRecord, SerialNumber};

/// Number handed to the first member of a fresh catalog
pub const FIRST_MEMBER_NUMBER: u64 = 100_000;

/// Books and members held by the library
#[derive(Debug, Clone)]
pub struct Catalog {
    /// All copies, in the order they were added
    books: Vec<BookRecord>,

    /// All members, in the order they joined
    members: Vec<MemberRecord>,

    /// Number assigned to the next member; `None` once every number is used
    next_member_number: Option<u64>,
}

/// How many copies share one short form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCount {
    pub short_form: String,
    pub copies: usize,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::with_first_member_number(FIRST_MEMBER_NUMBER)
    }

    /// Create an empty catalog whose first member gets `first`
    pub fn with_first_member_number(first: u64) -> Self {
        Self {
            books: Vec::new(),
            members: Vec::new(),
            next_member_number: Some(first),
        }
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// All books, in the order they were added
    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    /// All members, in the order they joined
    pub fn members(&self) -> &[MemberRecord] {
        &self.members
    }

    /// Books not currently on loan, in the order they were added
    pub fn available_books(&self) -> Vec<&BookRecord> {
        self.books.iter().filter(|b| !b.is_rented()).collect()
    }

    pub fn find_book(&self, serial: &SerialNumber) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.serial() == serial)
    }

    pub fn find_member(&self, number: MemberNumber) -> Option<&MemberRecord> {
        self.members.iter().find(|m| m.number() == number)
    }

    fn book_index(&self, serial: &SerialNumber) -> Result<usize, CatalogError> {
        self.books
            .iter()
            .position(|b| b.serial() == serial)
            .ok_or_else(|| CatalogError::BookNotFound(serial.clone()))
    }

    fn member_index(&self, number: MemberNumber) -> Result<usize, CatalogError> {
        self.members
            .iter()
            .position(|m| m.number() == number)
            .ok_or(CatalogError::MemberNotFound(number))
    }

    /// Members who have returned `serial`, in return order
    pub fn book_history(&self, serial: &SerialNumber) -> Result<&[MemberNumber], CatalogError> {
        self.find_book(serial)
            .map(BookRecord::history)
            .ok_or_else(|| CatalogError::BookNotFound(serial.clone()))
    }

    /// Books a member currently holds, in the order they were rented
    pub fn active_loans(&self, number: MemberNumber) -> Result<Vec<&BookRecord>, CatalogError> {
        let member = self
            .find_member(number)
            .ok_or(CatalogError::MemberNotFound(number))?;
        Ok(self.resolve(member.active_loans()))
    }

    /// Books a member has returned, in the order they were returned
    pub fn completed_loans(&self, number: MemberNumber) -> Result<Vec<&BookRecord>, CatalogError> {
        let member = self
            .find_member(number)
            .ok_or(CatalogError::MemberNotFound(number))?;
        Ok(self.resolve(member.completed_loans()))
    }

    fn resolve<'a, I>(&self, serials: I) -> Vec<&BookRecord>
    where
        I: IntoIterator<Item = &'a SerialNumber>,
    {
        serials
            .into_iter()
            .filter_map(|serial| self.find_book(serial))
            .collect()
    }

    /// Get the number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the catalog holds no books
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn has_members(&self) -> bool {
        !self.members.is_empty()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Add a book; its serial must not already be present
    pub fn add_book(&mut self, book: BookRecord) -> Result<(), CatalogError> {
        if self.find_book(book.serial()).is_some() {
            return Err(CatalogError::BookAlreadyExists(book.serial().clone()));
        }

        debug!(serial = %book.serial(), title = book.title(), "Book added");
        self.books.push(book);
        Ok(())
    }

    /// Register a member and return the number assigned to them.
    ///
    /// Fails only when the counter has run past the largest member number.
    pub fn add_member(&mut self, name: impl Into<String>) -> Result<MemberNumber, CatalogError> {
        let next = self
            .next_member_number
            .ok_or(CatalogError::MemberNumbersExhausted)?;
        self.next_member_number = next.checked_add(1);

        let number = MemberNumber::new(next);
        let member = MemberRecord::new(name, number);
        debug!(member = %number, name = member.name(), "Member added");
        self.members.push(member);
        Ok(number)
    }

    /// Add every book whose serial is not yet present.
    ///
    /// Colliding serials are skipped. Returns how many books were added.
    pub fn import_collection<I>(&mut self, books: I) -> usize
    where
        I: IntoIterator<Item = BookRecord>,
    {
        let mut added = 0;
        let mut skipped = 0;

        for book in books {
            if self.add_book(book).is_ok() {
                added += 1;
            } else {
                skipped += 1;
            }
        }

        info!(added, skipped, "Imported collection");
        added
    }

    // ------------------------------------------------------------------
    // Loans
    // ------------------------------------------------------------------

    /// Lend `serial` to `member`.
    ///
    /// Checks, in order: the member exists, the book exists, the book is
    /// available. Both records change only after every check has passed.
    pub fn rent_book(
        &mut self,
        member: MemberNumber,
        serial: &SerialNumber,
    ) -> Result<(), CatalogError> {
        let mi = self.member_index(member)?;
        let bi = self.book_index(serial)?;

        self.books[bi].ensure_rentable()?;
        self.members[mi].ensure_can_rent(serial)?;

        self.books[bi].lend_to(member);
        self.members[mi].begin_loan(serial.clone());

        info!(%member, %serial, "Book rented");
        Ok(())
    }

    /// Take `serial` back from `member`, who must be its current renter
    pub fn return_book(
        &mut self,
        member: MemberNumber,
        serial: &SerialNumber,
    ) -> Result<(), CatalogError> {
        let mi = self.member_index(member)?;
        let bi = self.book_index(serial)?;

        self.books[bi].ensure_returnable_by(member)?;
        self.members[mi].ensure_can_return(serial)?;

        self.books[bi].take_back();
        self.members[mi].end_loan(serial);

        info!(%member, %serial, "Book returned");
        Ok(())
    }

    /// Return every book `member` holds. Returns how many were returned.
    pub fn return_all_for_member(&mut self, member: MemberNumber) -> Result<usize, CatalogError> {
        let mi = self.member_index(member)?;

        // Work from a copy: each return shrinks the active list.
        let active: Vec<SerialNumber> = self.members[mi].active_loans().to_vec();
        for serial in &active {
            self.return_book(member, serial)?;
        }

        debug!(%member, returned = active.len(), "Returned all loans");
        Ok(active.len())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Books by `author`, sorted by serial
    pub fn filter_by_author(&self, author: &str) -> Result<Vec<&BookRecord>, CatalogError> {
        if author.is_empty() {
            return Err(CatalogError::MissingArgument("author"));
        }
        Ok(self.sorted_matching(|b| b.author() == author))
    }

    /// Books in `genre`, sorted by serial
    pub fn filter_by_genre(&self, genre: &str) -> Result<Vec<&BookRecord>, CatalogError> {
        if genre.is_empty() {
            return Err(CatalogError::MissingArgument("genre"));
        }
        Ok(self.sorted_matching(|b| b.genre() == genre))
    }

    fn sorted_matching<P>(&self, predicate: P) -> Vec<&BookRecord>
    where
        P: Fn(&BookRecord) -> bool,
    {
        let mut matching = Vec::new();
        for book in self.books.iter().filter(|&b| predicate(b)) {
            insert_sorted(&mut matching, book, |b| b.serial().sort_key());
        }
        matching
    }

    /// Every genre in the catalog, once each, alphabetically
    pub fn list_genres(&self) -> Vec<&str> {
        let genres: BTreeSet<&str> = self.books.iter().map(BookRecord::genre).collect();
        genres.into_iter().collect()
    }

    /// Every author in the catalog, once each, alphabetically
    pub fn list_authors(&self) -> Vec<&str> {
        let authors: BTreeSet<&str> = self.books.iter().map(BookRecord::author).collect();
        authors.into_iter().collect()
    }

    /// Copies per short form, ordered by short form
    pub fn count_copies(&self) -> Vec<CopyCount> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for book in &self.books {
            *counts.entry(book.short_form()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(short_form, copies)| CopyCount { short_form, copies })
            .collect()
    }

    /// Books every listed member has previously rented and returned.
    ///
    /// Duplicates among `numbers` are rejected before any lookup, so a
    /// repeated unknown number still reports the duplicate.
    pub fn common_books_across(
        &self,
        numbers: &[MemberNumber],
    ) -> Result<Vec<&BookRecord>, CatalogError> {
        if numbers.is_empty() {
            return Err(CatalogError::MissingArgument("member numbers"));
        }

        let mut seen = HashSet::new();
        for &number in numbers {
            if !seen.insert(number) {
                return Err(CatalogError::DuplicateMember(number));
            }
        }

        let members = numbers
            .iter()
            .map(|&number| {
                self.find_member(number)
                    .ok_or(CatalogError::MemberNotFound(number))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.resolve(common_history(&members)))
    }
}
