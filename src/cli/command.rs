//! Parsing of command lines into [`Command`] values.
//!
//! Keywords are matched case-insensitively; free-text arguments (names,
//! authors, genres, file names) keep the casing and spacing they were typed
//! with.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{MemberNumber, SerialNumber};

/// A member number as typed.
///
/// Text that does not parse is kept rather than rejected, so the session can
/// report empty-system and duplicate conditions before it reports an unknown
/// member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberArg {
    raw: String,
    number: Option<MemberNumber>,
}

impl MemberArg {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            number: raw.parse().ok(),
        }
    }

    /// The argument exactly as it was typed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed member number, if the text is one
    pub fn number(&self) -> Option<MemberNumber> {
        self.number
    }
}

impl From<MemberNumber> for MemberArg {
    fn from(number: MemberNumber) -> Self {
        Self {
            raw: number.to_string(),
            number: Some(number),
        }
    }
}

/// A single catalog command with validated arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `EXIT`
    Exit,
    /// `COMMANDS`
    Help,
    /// `LIST ALL [LONG]`
    ListAll { long: bool },
    /// `LIST AVAILABLE [LONG]`
    ListAvailable { long: bool },
    /// `LIST GENRES`
    ListGenres,
    /// `LIST AUTHORS`
    ListAuthors,
    /// `NUMBER COPIES`
    NumberCopies,
    /// `GENRE <genre>`
    Genre(String),
    /// `AUTHOR <author>`
    Author(String),
    /// `BOOK <serial> [LONG]`
    Book { serial: SerialNumber, long: bool },
    /// `BOOK HISTORY <serial>`
    BookHistory(SerialNumber),
    /// `MEMBER <number>`
    Member(MemberArg),
    /// `MEMBER BOOKS <number>`
    MemberBooks(MemberArg),
    /// `MEMBER HISTORY <number>`
    MemberHistory(MemberArg),
    /// `RENT <number> <serial>`
    Rent {
        member: MemberArg,
        serial: SerialNumber,
    },
    /// `RELINQUISH <number> <serial>`
    Relinquish {
        member: MemberArg,
        serial: SerialNumber,
    },
    /// `RELINQUISH ALL <number>`
    RelinquishAll(MemberArg),
    /// `ADD MEMBER <name>`
    AddMember(String),
    /// `ADD BOOK <file> <serial>`
    AddBook { file: PathBuf, serial: SerialNumber },
    /// `ADD COLLECTION <file>`
    AddCollection(PathBuf),
    /// `SAVE COLLECTION <file>`
    SaveCollection(PathBuf),
    /// `COMMON <number> <number> ...`
    Common(Vec<MemberArg>),
}

/// Reasons a line could not be turned into a [`Command`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("{command} requires {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// Cursor over the words of one input line
struct Words<'a> {
    line: &'a str,
    /// Byte offset and text of each word
    words: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Words<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            words: split_words(line),
            pos: 0,
        }
    }

    fn take(&mut self) -> Option<&'a str> {
        let word = self.words.get(self.pos).map(|&(_, word)| word);
        if word.is_some() {
            self.pos += 1;
        }
        word
    }

    fn peek_keyword(&self) -> Option<String> {
        self.words.get(self.pos).map(|(_, w)| w.to_uppercase())
    }

    fn require(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<&'a str, ParseError> {
        self.take()
            .ok_or(ParseError::MissingArgument { command, argument })
    }

    /// Remainder of the line from the next word on, spacing kept as typed
    fn rest(
        &mut self,
        command: &'static str,
        argument: &'static str,
    ) -> Result<String, ParseError> {
        let Some(&(start, _)) = self.words.get(self.pos) else {
            return Err(ParseError::MissingArgument { command, argument });
        };
        self.pos = self.words.len();
        Ok(self.line[start..].trim_end().to_string())
    }

    /// Consume an optional trailing `LONG` flag
    fn long_flag(&mut self) -> Result<bool, ParseError> {
        let long = match self.take() {
            None => false,
            Some(word) if word.eq_ignore_ascii_case("LONG") => true,
            Some(word) => return Err(ParseError::UnexpectedArgument(word.to_string())),
        };
        self.finish()?;
        Ok(long)
    }

    fn finish(&mut self) -> Result<(), ParseError> {
        match self.take() {
            None => Ok(()),
            Some(word) => Err(ParseError::UnexpectedArgument(word.to_string())),
        }
    }
}

/// Whitespace-separated words with their byte offsets into `line`
fn split_words(line: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;

    for (idx, c) in line.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push((s, &line[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((s, &line[s..]));
    }

    words
}

impl Command {
    /// Parse one line of user input
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = Words::new(line);
        let keyword = words.take().ok_or(ParseError::Empty)?.to_uppercase();

        let command = match keyword.as_str() {
            "EXIT" => Command::Exit,
            "COMMANDS" => Command::Help,
            "LIST" => {
                let what = words.require("LIST", "ALL, AVAILABLE, GENRES or AUTHORS")?;
                match what.to_uppercase().as_str() {
                    "ALL" => Command::ListAll {
                        long: words.long_flag()?,
                    },
                    "AVAILABLE" => Command::ListAvailable {
                        long: words.long_flag()?,
                    },
                    "GENRES" => {
                        words.finish()?;
                        Command::ListGenres
                    }
                    "AUTHORS" => {
                        words.finish()?;
                        Command::ListAuthors
                    }
                    _ => return Err(ParseError::Unknown(format!("LIST {}", what))),
                }
            }
            "NUMBER" => {
                let what = words.require("NUMBER", "COPIES")?;
                if !what.eq_ignore_ascii_case("COPIES") {
                    return Err(ParseError::Unknown(format!("NUMBER {}", what)));
                }
                words.finish()?;
                Command::NumberCopies
            }
            "GENRE" => Command::Genre(words.rest("GENRE", "a genre")?),
            "AUTHOR" => Command::Author(words.rest("AUTHOR", "an author")?),
            "BOOK" => {
                if words.peek_keyword().as_deref() == Some("HISTORY") {
                    words.take();
                    let serial = words.require("BOOK HISTORY", "a serial number")?;
                    words.finish()?;
                    Command::BookHistory(SerialNumber::new(serial))
                } else {
                    let serial = words.require("BOOK", "a serial number")?;
                    Command::Book {
                        serial: SerialNumber::new(serial),
                        long: words.long_flag()?,
                    }
                }
            }
            "MEMBER" => match words.peek_keyword().as_deref() {
                Some("BOOKS") => {
                    words.take();
                    let member = MemberArg::new(words.require("MEMBER BOOKS", "a member number")?);
                    words.finish()?;
                    Command::MemberBooks(member)
                }
                Some("HISTORY") => {
                    words.take();
                    let member =
                        MemberArg::new(words.require("MEMBER HISTORY", "a member number")?);
                    words.finish()?;
                    Command::MemberHistory(member)
                }
                _ => {
                    let member = MemberArg::new(words.require("MEMBER", "a member number")?);
                    words.finish()?;
                    Command::Member(member)
                }
            },
            "RENT" => {
                let member = MemberArg::new(words.require("RENT", "a member number")?);
                let serial = SerialNumber::new(words.require("RENT", "a serial number")?);
                words.finish()?;
                Command::Rent { member, serial }
            }
            "RELINQUISH" => {
                if words.peek_keyword().as_deref() == Some("ALL") {
                    words.take();
                    let member =
                        MemberArg::new(words.require("RELINQUISH ALL", "a member number")?);
                    words.finish()?;
                    Command::RelinquishAll(member)
                } else {
                    let member = MemberArg::new(words.require("RELINQUISH", "a member number")?);
                    let serial =
                        SerialNumber::new(words.require("RELINQUISH", "a serial number")?);
                    words.finish()?;
                    Command::Relinquish { member, serial }
                }
            }
            "ADD" => {
                let what = words.require("ADD", "MEMBER, BOOK or COLLECTION")?;
                match what.to_uppercase().as_str() {
                    "MEMBER" => Command::AddMember(words.rest("ADD MEMBER", "a name")?),
                    "BOOK" => {
                        let file = PathBuf::from(words.require("ADD BOOK", "a file name")?);
                        let serial =
                            SerialNumber::new(words.require("ADD BOOK", "a serial number")?);
                        words.finish()?;
                        Command::AddBook { file, serial }
                    }
                    "COLLECTION" => {
                        let file = PathBuf::from(words.require("ADD COLLECTION", "a file name")?);
                        words.finish()?;
                        Command::AddCollection(file)
                    }
                    _ => return Err(ParseError::Unknown(format!("ADD {}", what))),
                }
            }
            "SAVE" => {
                let what = words.require("SAVE", "COLLECTION")?;
                if !what.eq_ignore_ascii_case("COLLECTION") {
                    return Err(ParseError::Unknown(format!("SAVE {}", what)));
                }
                let file = PathBuf::from(words.require("SAVE COLLECTION", "a file name")?);
                words.finish()?;
                Command::SaveCollection(file)
            }
            "COMMON" => {
                let mut members = Vec::new();
                while let Some(word) = words.take() {
                    members.push(MemberArg::new(word));
                }
                if members.is_empty() {
                    return Err(ParseError::MissingArgument {
                        command: "COMMON",
                        argument: "at least one member number",
                    });
                }
                Command::Common(members)
            }
            _ => return Err(ParseError::Unknown(keyword)),
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap()
    }

    fn member(n: u64) -> MemberArg {
        MemberNumber::new(n).into()
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(parse("exit"), Command::Exit);
        assert_eq!(parse("Commands"), Command::Help);
        assert_eq!(parse("list all"), Command::ListAll { long: false });
        assert_eq!(parse("LIST available long"), Command::ListAvailable { long: true });
        assert_eq!(parse("number copies"), Command::NumberCopies);
    }

    #[test]
    fn test_free_text_keeps_casing() {
        assert_eq!(
            parse("GENRE Science Fiction"),
            Command::Genre("Science Fiction".to_string())
        );
        assert_eq!(
            parse("ADD MEMBER Ada Lovelace"),
            Command::AddMember("Ada Lovelace".to_string())
        );
        assert_eq!(
            parse("add collection Books.CSV"),
            Command::AddCollection(PathBuf::from("Books.CSV"))
        );
    }

    #[test]
    fn test_free_text_keeps_inner_spacing() {
        assert_eq!(
            parse("author Jane   Austen"),
            Command::Author("Jane   Austen".to_string())
        );
        assert_eq!(
            parse("  ADD   MEMBER  Ada  Lovelace  "),
            Command::AddMember("Ada  Lovelace".to_string())
        );
    }

    #[test]
    fn test_split_words_offsets() {
        assert_eq!(
            split_words(" a  bc\td "),
            vec![(1, "a"), (4, "bc"), (7, "d")]
        );
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn test_book_and_member_shapes() {
        assert_eq!(
            parse("BOOK 111 LONG"),
            Command::Book {
                serial: SerialNumber::new("111"),
                long: true
            }
        );
        assert_eq!(
            parse("book history 111"),
            Command::BookHistory(SerialNumber::new("111"))
        );
        assert_eq!(parse("MEMBER 100000"), Command::Member(member(100_000)));
        assert_eq!(parse("member books 100000"), Command::MemberBooks(member(100_000)));
        assert_eq!(
            parse("MEMBER HISTORY 100001"),
            Command::MemberHistory(member(100_001))
        );
    }

    #[test]
    fn test_loan_shapes() {
        assert_eq!(
            parse("RENT 100000 111"),
            Command::Rent {
                member: member(100_000),
                serial: SerialNumber::new("111")
            }
        );
        assert_eq!(
            parse("relinquish 100000 111"),
            Command::Relinquish {
                member: member(100_000),
                serial: SerialNumber::new("111")
            }
        );
        assert_eq!(
            parse("RELINQUISH ALL 100000"),
            Command::RelinquishAll(member(100_000))
        );
        assert_eq!(
            parse("COMMON 100000 100001"),
            Command::Common(vec![member(100_000), member(100_001)])
        );
        assert_eq!(
            parse("ADD BOOK books.csv 111"),
            Command::AddBook {
                file: PathBuf::from("books.csv"),
                serial: SerialNumber::new("111")
            }
        );
        assert_eq!(
            parse("SAVE COLLECTION out.csv"),
            Command::SaveCollection(PathBuf::from("out.csv"))
        );
    }

    #[test]
    fn test_unparseable_member_is_kept_raw() {
        let Command::Common(members) = parse("COMMON abc 100000 abc") else {
            panic!("Expected COMMON");
        };

        assert_eq!(members[0].raw(), "abc");
        assert_eq!(members[0].number(), None);
        assert_eq!(members[1].number(), Some(MemberNumber::new(100_000)));
        assert_eq!(members[0], members[2]);

        assert_eq!(parse("MEMBER abc"), Command::Member(MemberArg::new("abc")));
    }

    #[test]
    fn test_missing_arguments_are_errors() {
        assert_eq!(Command::parse("   "), Err(ParseError::Empty));
        assert!(matches!(
            Command::parse("RENT 100000"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse("LIST"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse("ADD MEMBER   "),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            Command::parse("COMMON"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(
            Command::parse("FROBNICATE"),
            Err(ParseError::Unknown("FROBNICATE".to_string()))
        );
        assert_eq!(
            Command::parse("LIST ALL SHORT"),
            Err(ParseError::UnexpectedArgument("SHORT".to_string()))
        );
        assert!(matches!(
            Command::parse("LIST EVERYTHING"),
            Err(ParseError::Unknown(_))
        ));
    }
}
