//! CSV collection files.
//!
//! A collection is a header line followed by one book per line:
//!
//! ```text
//! serialNumber,title,author,genre
//! 111,Dune,Frank Herbert,Science Fiction
//! ```
//!
//! Fields never contain commas, so no quoting is supported.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use crate::domain::{BookRecord, SerialNumber};

/// Header row written to (and skipped when reading) every collection file
pub const HEADER: &str = "serialNumber,title,author,genre";

/// Errors that can occur reading or writing a collection
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Collection file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed record on line {line}: expected 4 fields, found {found}")]
    Malformed { line: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse collection text into books, in file order.
///
/// The first line is always treated as the header. Blank lines are ignored.
pub fn parse_collection(content: &str) -> Result<Vec<BookRecord>, CollectionError> {
    let mut books = Vec::new();

    for (idx, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [serial, title, author, genre] = fields.as_slice() else {
            return Err(CollectionError::Malformed {
                line: idx + 1,
                found: fields.len(),
            });
        };

        books.push(BookRecord::new(*title, *author, *genre, SerialNumber::new(*serial)));
    }

    Ok(books)
}

/// Render books as collection text, header included
pub fn render_collection<'a, I>(books: I) -> String
where
    I: IntoIterator<Item = &'a BookRecord>,
{
    let mut out = String::from(HEADER);
    out.push('\n');

    for book in books {
        out.push_str(&format!(
            "{},{},{},{}\n",
            book.serial(),
            book.title(),
            book.author(),
            book.genre()
        ));
    }

    out
}

/// Read every book from a collection file
pub async fn read_collection(path: &Path) -> Result<Vec<BookRecord>, CollectionError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CollectionError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let books = parse_collection(&content)?;
    debug!(path = %path.display(), count = books.len(), "Read collection");
    Ok(books)
}

/// Read the single book with `serial` from a collection file
pub async fn read_book(
    path: &Path,
    serial: &SerialNumber,
) -> Result<Option<BookRecord>, CollectionError> {
    let books = read_collection(path).await?;
    Ok(books.into_iter().find(|b| b.serial() == serial))
}

/// Write books to a collection file, replacing its contents
pub async fn save_collection<'a, I>(path: &Path, books: I) -> Result<(), CollectionError>
where
    I: IntoIterator<Item = &'a BookRecord>,
{
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let content = render_collection(books);
    fs::write(path, content).await?;

    info!(path = %path.display(), "Saved collection");
    Ok(())
}
