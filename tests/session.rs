//! Session Integration Tests
//!
//! Drives whole command scripts through the session, including the CSV
//! collection commands, and checks the text a user would see.

use std::path::Path;

use lendlib::cli::repl::run_lines;
use lendlib::cli::{Reply, Session};
use lendlib::storage::read_collection;
use tempfile::TempDir;

const COLLECTION: &str = "serialNumber,title,author,genre
111,Dune,Frank Herbert,Science Fiction
222,Emma,Jane Austen,Romance
333,Dune,Frank Herbert,Science Fiction
444,Persuasion,Jane Austen,Romance
";

fn write_collection(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.display().to_string()
}

async fn say(session: &mut Session, line: &str) -> String {
    match session.handle_line(line).await {
        Reply::Output(text) => text,
        Reply::Exit => "<exit>".to_string(),
    }
}

#[tokio::test]
async fn test_collection_import_and_queries() {
    let temp = TempDir::new().unwrap();
    let file = write_collection(&temp, "books.csv", COLLECTION);
    let mut session = Session::default();

    assert_eq!(
        say(&mut session, &format!("ADD COLLECTION {}", file)).await,
        "4 books successfully added."
    );
    assert_eq!(
        say(&mut session, &format!("add collection {}", file)).await,
        "No books have been added to the system."
    );
    assert_eq!(
        say(&mut session, "ADD COLLECTION missing.csv").await,
        "No such collection."
    );

    assert_eq!(
        say(&mut session, "NUMBER COPIES").await,
        "Dune (Frank Herbert): 2\nEmma (Jane Austen): 1\nPersuasion (Jane Austen): 1"
    );
    assert_eq!(
        say(&mut session, "LIST GENRES").await,
        "Romance\nScience Fiction"
    );
    assert_eq!(
        say(&mut session, "LIST AUTHORS").await,
        "Frank Herbert\nJane Austen"
    );
    assert_eq!(
        say(&mut session, "AUTHOR Jane Austen").await,
        "Emma (Jane Austen)\nPersuasion (Jane Austen)"
    );
    assert_eq!(
        say(&mut session, "GENRE Horror").await,
        "No books with genre Horror."
    );
    assert_eq!(
        say(&mut session, "AUTHOR Nobody").await,
        "No books by Nobody."
    );
    assert_eq!(
        say(&mut session, "BOOK 222 LONG").await,
        "222: Emma (Jane Austen, Romance)\nCurrently available."
    );
    assert_eq!(
        say(&mut session, "BOOK 999").await,
        "No such book in system."
    );
}

#[tokio::test]
async fn test_loans_and_common_books() {
    let temp = TempDir::new().unwrap();
    let file = write_collection(&temp, "books.csv", COLLECTION);
    let mut session = Session::default();
    say(&mut session, &format!("ADD COLLECTION {}", file)).await;

    assert_eq!(say(&mut session, "ADD MEMBER Ada Lovelace").await, "Success.");
    assert_eq!(say(&mut session, "ADD MEMBER Bob").await, "Success.");
    assert_eq!(say(&mut session, "MEMBER 100000").await, "100000: Ada Lovelace");

    for line in ["RENT 100000 444", "RENT 100000 111", "RENT 100001 222"] {
        assert_eq!(say(&mut session, line).await, "Success.");
    }
    assert_eq!(
        say(&mut session, "MEMBER BOOKS 100000").await,
        "Persuasion (Jane Austen)\nDune (Frank Herbert)"
    );
    assert_eq!(
        say(&mut session, "BOOK 111 LONG").await,
        "111: Dune (Frank Herbert, Science Fiction)\nRented by: 100000."
    );
    assert_eq!(
        say(&mut session, "LIST AVAILABLE").await,
        "Dune (Frank Herbert)"
    );

    assert_eq!(say(&mut session, "RELINQUISH ALL 100000").await, "Success.");
    assert_eq!(say(&mut session, "RELINQUISH 100001 222").await, "Success.");
    assert_eq!(
        say(&mut session, "MEMBER HISTORY 100000").await,
        "Persuasion (Jane Austen)\nDune (Frank Herbert)"
    );
    assert_eq!(
        say(&mut session, "MEMBER BOOKS 100000").await,
        "Member not currently renting."
    );

    assert_eq!(
        say(&mut session, "COMMON 100000 100001").await,
        "No common books."
    );
    say(&mut session, "RENT 100001 444").await;
    say(&mut session, "RELINQUISH 100001 444").await;
    assert_eq!(
        say(&mut session, "COMMON 100001 100000").await,
        "Persuasion (Jane Austen)"
    );
    assert_eq!(
        say(&mut session, "COMMON 100000").await,
        "Dune (Frank Herbert)\nPersuasion (Jane Austen)"
    );
    assert_eq!(
        say(&mut session, "COMMON 100000 100000").await,
        "Duplicate members provided."
    );
    assert_eq!(
        say(&mut session, "COMMON 100000 100009").await,
        "No such member in system."
    );
    assert_eq!(say(&mut session, "BOOK HISTORY 444").await, "100000\n100001");
}

#[tokio::test]
async fn test_add_book_from_file() {
    let temp = TempDir::new().unwrap();
    let file = write_collection(&temp, "books.csv", COLLECTION);
    let mut session = Session::default();

    assert_eq!(
        say(&mut session, &format!("ADD BOOK {} 222", file)).await,
        "Successfully added: Emma (Jane Austen)."
    );
    assert_eq!(
        say(&mut session, &format!("ADD BOOK {} 222", file)).await,
        "Book already exists in system."
    );
    assert_eq!(
        say(&mut session, &format!("ADD BOOK {} 999", file)).await,
        "No such book in file."
    );
    assert_eq!(
        say(&mut session, "ADD BOOK nowhere.csv 111").await,
        "No such file."
    );
}

#[tokio::test]
async fn test_save_collection_round_trip() {
    let temp = TempDir::new().unwrap();
    let file = write_collection(&temp, "books.csv", COLLECTION);
    let saved = temp.path().join("saved.csv");
    let mut session = Session::default();

    assert_eq!(
        say(&mut session, &format!("SAVE COLLECTION {}", saved.display())).await,
        "No books in system."
    );

    say(&mut session, &format!("ADD COLLECTION {}", file)).await;
    assert_eq!(
        say(&mut session, &format!("SAVE COLLECTION {}", saved.display())).await,
        "Success."
    );

    let written = std::fs::read_to_string(&saved).unwrap();
    assert_eq!(written, COLLECTION);

    let reloaded = read_collection(Path::new(&saved)).await.unwrap();
    assert_eq!(reloaded.len(), 4);
}

#[tokio::test]
async fn test_script_transcript() {
    let temp = TempDir::new().unwrap();
    let file = write_collection(&temp, "books.csv", COLLECTION);
    let script = format!(
        "ADD COLLECTION {}\nADD MEMBER Ada\nRENT 100000 111\nRENT 100000 111\nEXIT\nLIST ALL\n",
        file
    );

    let mut session = Session::default();
    let mut output = Vec::new();
    run_lines(&mut session, script.as_bytes(), &mut output, None)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "4 books successfully added.\n\
         Success.\n\
         Success.\n\
         Book is currently unavailable.\n\
         Ending Library process.\n"
    );
    assert_eq!(session.catalog().available_books().len(), 3);
}

#[tokio::test]
async fn test_bad_member_numbers_report_in_check_order() {
    let temp = TempDir::new().unwrap();
    let file = write_collection(&temp, "books.csv", COLLECTION);
    let mut session = Session::default();

    // Empty system is reported before the argument is looked at
    assert_eq!(say(&mut session, "RENT abc 111").await, "No members in system.");
    assert_eq!(say(&mut session, "MEMBER abc").await, "No members in system.");
    assert_eq!(say(&mut session, "COMMON abc abc").await, "No members in system.");

    say(&mut session, "ADD MEMBER Ada").await;
    assert_eq!(say(&mut session, "RENT abc 111").await, "No books in system.");
    assert_eq!(say(&mut session, "COMMON abc abc").await, "No books in system.");
    assert_eq!(say(&mut session, "RELINQUISH ALL abc").await, "No such member in system.");

    say(&mut session, &format!("ADD COLLECTION {}", file)).await;

    // Duplicates are compared as typed, before any lookup
    assert_eq!(
        say(&mut session, "COMMON abc abc").await,
        "Duplicate members provided."
    );
    assert_eq!(
        say(&mut session, "COMMON 100000 xyz 100000").await,
        "Duplicate members provided."
    );
    assert_eq!(
        say(&mut session, "COMMON 100000 abc").await,
        "No such member in system."
    );
    assert_eq!(say(&mut session, "RENT abc 111").await, "No such member in system.");
    assert_eq!(
        say(&mut session, "MEMBER HISTORY abc").await,
        "No such member in system."
    );
}

#[tokio::test]
async fn test_names_keep_spacing() {
    let mut session = Session::default();

    say(&mut session, "ADD MEMBER Ada  Lovelace").await;
    assert_eq!(say(&mut session, "MEMBER 100000").await, "100000: Ada  Lovelace");
}
