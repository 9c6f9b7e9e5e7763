//! Executes commands against a catalog and renders the replies.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use super::command::{Command, MemberArg, ParseError};
use crate::core::{Catalog, CatalogError};
use crate::domain::{BookRecord, MemberNumber, SerialNumber};
use crate::storage::{self, CollectionError};

pub const HELP: &str = "EXIT ends the library process
COMMANDS outputs this help string

LIST ALL [LONG] outputs either the short or long string for all books
LIST AVAILABLE [LONG] outputs either the short of long string for all available books
NUMBER COPIES outputs the number of copies of each book
LIST GENRES outputs the name of every genre in the system
LIST AUTHORS outputs the name of every author in the system

GENRE <genre> outputs the short string of every book with the specified genre
AUTHOR <author> outputs the short string of every book by the specified author

BOOK <serialNumber> [LONG] outputs either the short or long string for the specified book
BOOK HISTORY <serialNumber> outputs the rental history of the specified book

MEMBER <memberNumber> outputs the information of the specified member
MEMBER BOOKS <memberNumber> outputs the books currently rented by the specified member
MEMBER HISTORY <memberNumber> outputs the rental history of the specified member

RENT <memberNumber> <serialNumber> loans out the specified book to the given member
RELINQUISH <memberNumber> <serialNumber> returns the specified book from the member
RELINQUISH ALL <memberNumber> returns all books rented by the specified member

ADD MEMBER <name> adds a member to the system
ADD BOOK <filename> <serialNumber> adds a book to the system

ADD COLLECTION <filename> adds a collection of books to the system
SAVE COLLECTION <filename> saves the system to a csv file

COMMON <memberNumber1> <memberNumber2> ... outputs the common books in members' history";

const NO_BOOKS: &str = "No books in system.";
const NO_MEMBERS: &str = "No members in system.";
const NO_SUCH_MEMBER: &str = "No such member in system.";
const DUPLICATE_MEMBERS: &str = "Duplicate members provided.";
const SUCCESS: &str = "Success.";

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to show the user (may be empty)
    Output(String),

    /// The user asked to leave
    Exit,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Reply::Output(text.into())
    }
}

/// An interactive session over one catalog
#[derive(Debug, Default)]
pub struct Session {
    catalog: Catalog,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parse and execute one line of input
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Ok(command) => self.execute(command).await,
            Err(ParseError::Empty) => Reply::text(""),
            Err(e) => {
                debug!(%line, error = %e, "Rejected command");
                Reply::text(format!("{}. Type COMMANDS for help.", e))
            }
        }
    }

    /// Execute a parsed command
    pub async fn execute(&mut self, command: Command) -> Reply {
        debug!(?command, "Executing command");

        match command {
            Command::Exit => Reply::Exit,
            Command::Help => Reply::text(HELP),
            Command::ListAll { long } => self.list_all(long),
            Command::ListAvailable { long } => self.list_available(long),
            Command::ListGenres => self.list_names(self.catalog.list_genres()),
            Command::ListAuthors => self.list_names(self.catalog.list_authors()),
            Command::NumberCopies => self.number_copies(),
            Command::Genre(genre) => self.genre(&genre),
            Command::Author(author) => self.author(&author),
            Command::Book { serial, long } => self.book(&serial, long),
            Command::BookHistory(serial) => self.book_history(&serial),
            Command::Member(member) => self.member(&member),
            Command::MemberBooks(member) => self.member_books(&member),
            Command::MemberHistory(member) => self.member_history(&member),
            Command::Rent { member, serial } => self.rent(&member, &serial),
            Command::Relinquish { member, serial } => self.relinquish(&member, &serial),
            Command::RelinquishAll(member) => self.relinquish_all(&member),
            Command::AddMember(name) => match self.catalog.add_member(name) {
                Ok(_) => Reply::text(SUCCESS),
                Err(e) => Reply::text(describe(&e)),
            },
            Command::AddBook { file, serial } => self.add_book(&file, serial).await,
            Command::AddCollection(file) => self.add_collection(&file).await,
            Command::SaveCollection(file) => self.save_collection(&file).await,
            Command::Common(numbers) => self.common(&numbers),
        }
    }

    fn list_all(&self, long: bool) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }
        Reply::text(render_books(self.catalog.books(), long))
    }

    fn list_available(&self, long: bool) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }

        let available = self.catalog.available_books();
        if available.is_empty() {
            return Reply::text("No books available.");
        }
        Reply::text(render_books(available, long))
    }

    fn list_names(&self, names: Vec<&str>) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }
        Reply::text(names.join("\n"))
    }

    fn number_copies(&self) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }

        let lines: Vec<String> = self
            .catalog
            .count_copies()
            .into_iter()
            .map(|c| format!("{}: {}", c.short_form, c.copies))
            .collect();
        Reply::text(lines.join("\n"))
    }

    fn genre(&self, genre: &str) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }

        match self.catalog.filter_by_genre(genre) {
            Ok(books) if books.is_empty() => Reply::text(format!("No books with genre {}.", genre)),
            Ok(books) => Reply::text(render_books(books, false)),
            Err(e) => Reply::text(describe(&e)),
        }
    }

    fn author(&self, author: &str) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }

        match self.catalog.filter_by_author(author) {
            Ok(books) if books.is_empty() => Reply::text(format!("No books by {}.", author)),
            Ok(books) => Reply::text(render_books(books, false)),
            Err(e) => Reply::text(describe(&e)),
        }
    }

    fn book(&self, serial: &SerialNumber, long: bool) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }

        match self.catalog.find_book(serial) {
            Some(book) if long => Reply::text(book.full_form()),
            Some(book) => Reply::text(book.short_form()),
            None => Reply::text("No such book in system."),
        }
    }

    fn book_history(&self, serial: &SerialNumber) -> Reply {
        match self.catalog.book_history(serial) {
            Ok([]) => Reply::text("No rental history."),
            Ok(history) => Reply::text(join_lines(history)),
            Err(e) => Reply::text(describe(&e)),
        }
    }

    fn member(&self, member: &MemberArg) -> Reply {
        if !self.catalog.has_members() {
            return Reply::text(NO_MEMBERS);
        }

        match member.number().and_then(|n| self.catalog.find_member(n)) {
            Some(member) => Reply::text(format!("{}: {}", member.number(), member.name())),
            None => Reply::text(NO_SUCH_MEMBER),
        }
    }

    fn member_books(&self, member: &MemberArg) -> Reply {
        if !self.catalog.has_members() {
            return Reply::text(NO_MEMBERS);
        }
        let Some(number) = member.number() else {
            return Reply::text(NO_SUCH_MEMBER);
        };

        match self.catalog.active_loans(number) {
            Ok(books) if books.is_empty() => Reply::text("Member not currently renting."),
            Ok(books) => Reply::text(render_books(books, false)),
            Err(e) => Reply::text(describe(&e)),
        }
    }

    fn member_history(&self, member: &MemberArg) -> Reply {
        if !self.catalog.has_members() {
            return Reply::text(NO_MEMBERS);
        }
        let Some(number) = member.number() else {
            return Reply::text(NO_SUCH_MEMBER);
        };

        match self.catalog.completed_loans(number) {
            Ok(books) if books.is_empty() => Reply::text("No rental history for member."),
            Ok(books) => Reply::text(render_books(books, false)),
            Err(e) => Reply::text(describe(&e)),
        }
    }

    /// Guard shared by every loan command
    fn loan_guard(&self) -> Option<Reply> {
        if !self.catalog.has_members() {
            return Some(Reply::text(NO_MEMBERS));
        }
        if self.catalog.is_empty() {
            return Some(Reply::text(NO_BOOKS));
        }
        None
    }

    fn rent(&mut self, member: &MemberArg, serial: &SerialNumber) -> Reply {
        if let Some(reply) = self.loan_guard() {
            return reply;
        }
        let Some(member) = member.number() else {
            return Reply::text(NO_SUCH_MEMBER);
        };
        outcome(self.catalog.rent_book(member, serial))
    }

    fn relinquish(&mut self, member: &MemberArg, serial: &SerialNumber) -> Reply {
        if let Some(reply) = self.loan_guard() {
            return reply;
        }
        let Some(member) = member.number() else {
            return Reply::text(NO_SUCH_MEMBER);
        };
        outcome(self.catalog.return_book(member, serial))
    }

    fn relinquish_all(&mut self, member: &MemberArg) -> Reply {
        if !self.catalog.has_members() {
            return Reply::text(NO_MEMBERS);
        }
        let Some(member) = member.number() else {
            return Reply::text(NO_SUCH_MEMBER);
        };
        outcome(self.catalog.return_all_for_member(member).map(|_| ()))
    }

    async fn add_book(&mut self, file: &Path, serial: SerialNumber) -> Reply {
        if self.catalog.find_book(&serial).is_some() {
            return Reply::text(describe(&CatalogError::BookAlreadyExists(serial)));
        }

        let book = match storage::read_book(file, &serial).await {
            Ok(Some(book)) => book,
            Ok(None) => return Reply::text("No such book in file."),
            Err(CollectionError::NotFound(_)) => return Reply::text("No such file."),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Failed to read book");
                return Reply::text(describe(&CatalogError::from(e)));
            }
        };

        let short = book.short_form();
        match self.catalog.add_book(book) {
            Ok(()) => Reply::text(format!("Successfully added: {}.", short)),
            Err(e) => Reply::text(describe(&e)),
        }
    }

    async fn add_collection(&mut self, file: &Path) -> Reply {
        let books = match storage::read_collection(file).await {
            Ok(books) => books,
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Failed to read collection");
                return Reply::text("No such collection.");
            }
        };

        match self.catalog.import_collection(books) {
            0 => Reply::text("No books have been added to the system."),
            added => Reply::text(format!("{} books successfully added.", added)),
        }
    }

    async fn save_collection(&self, file: &Path) -> Reply {
        if self.catalog.is_empty() {
            return Reply::text(NO_BOOKS);
        }

        match storage::save_collection(file, self.catalog.books()).await {
            Ok(()) => Reply::text(SUCCESS),
            Err(e) => {
                warn!(file = %file.display(), error = %e, "Failed to save collection");
                Reply::text(describe(&CatalogError::from(e)))
            }
        }
    }

    /// Checks run in a fixed order: empty system, repeated arguments as
    /// typed, then member lookup.
    fn common(&self, members: &[MemberArg]) -> Reply {
        if let Some(reply) = self.loan_guard() {
            return reply;
        }

        let mut seen = HashSet::new();
        if !members.iter().all(|m| seen.insert(m.raw())) {
            return Reply::text(DUPLICATE_MEMBERS);
        }

        let Some(numbers) = members
            .iter()
            .map(MemberArg::number)
            .collect::<Option<Vec<MemberNumber>>>()
        else {
            return Reply::text(NO_SUCH_MEMBER);
        };

        match self.catalog.common_books_across(&numbers) {
            Ok(books) if books.is_empty() => Reply::text("No common books."),
            Ok(books) => Reply::text(render_books(books, false)),
            Err(e) => Reply::text(describe(&e)),
        }
    }
}

/// User-facing text for a failed operation
pub fn describe(error: &CatalogError) -> String {
    match error {
        CatalogError::MemberNotFound(_) => NO_SUCH_MEMBER.to_string(),
        CatalogError::BookNotFound(_) => "No such book in system.".to_string(),
        CatalogError::BookAlreadyExists(_) => "Book already exists in system.".to_string(),
        CatalogError::BookUnavailable { .. } | CatalogError::AlreadyRenting { .. } => {
            "Book is currently unavailable.".to_string()
        }
        CatalogError::NotRenter { .. } => "Unable to return book.".to_string(),
        CatalogError::DuplicateMember(_) => DUPLICATE_MEMBERS.to_string(),
        CatalogError::MemberNumbersExhausted => "No member numbers available.".to_string(),
        CatalogError::MissingArgument(what) => format!("No {} provided.", what),
        CatalogError::Source(e) => format!("{}.", e),
    }
}

fn outcome(result: Result<(), CatalogError>) -> Reply {
    match result {
        Ok(()) => Reply::text(SUCCESS),
        Err(e) => Reply::text(describe(&e)),
    }
}

fn render_books<'a, I>(books: I, long: bool) -> String
where
    I: IntoIterator<Item = &'a BookRecord>,
{
    let (forms, separator): (Vec<String>, &str) = if long {
        (books.into_iter().map(BookRecord::full_form).collect(), "\n\n")
    } else {
        (books.into_iter().map(BookRecord::short_form).collect(), "\n")
    };
    forms.join(separator)
}

fn join_lines<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
