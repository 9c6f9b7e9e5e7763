//! Identifiers for books and members.
//!
//! Records refer to each other through these identifiers rather than through
//! references, so the catalog stays the single owner of every record.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique textual identifier of a catalog copy.
///
/// Serials are compared for identity as plain text, but ordered numerically
/// through [`SerialNumber::sort_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerialNumber(String);

impl SerialNumber {
    /// Create a serial number (surrounding whitespace is dropped)
    pub fn new(serial: impl Into<String>) -> Self {
        let serial = serial.into();
        Self(serial.trim().to_string())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for every serial-ordered listing.
    pub fn sort_key(&self) -> SerialKey {
        match self.0.parse::<u64>() {
            Ok(value) => SerialKey::Numeric(value),
            Err(_) => SerialKey::Text(self.0.clone()),
        }
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SerialNumber {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ordering key of a serial number.
///
/// Numeric serials sort by value and come before any non-numeric serial,
/// which sort lexicographically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SerialKey {
    Numeric(u64),
    Text(String),
}

/// Sequential identifier assigned to a member when they join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberNumber(u64);

impl MemberNumber {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberNumber {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_orders_numerically() {
        let nine = SerialNumber::new("9");
        let ten = SerialNumber::new("10");

        assert!(nine.sort_key() < ten.sort_key());
        assert!(nine.as_str() > ten.as_str());
    }

    #[test]
    fn test_text_serials_sort_after_numeric() {
        let numeric = SerialNumber::new("99999");
        let text = SerialNumber::new("A-1");

        assert!(numeric.sort_key() < text.sort_key());
        assert_eq!(text.sort_key(), SerialKey::Text("A-1".to_string()));
    }

    #[test]
    fn test_serial_trims_whitespace() {
        assert_eq!(SerialNumber::new(" 42 "), SerialNumber::from("42"));
    }

    #[test]
    fn test_member_number_parse() {
        let number: MemberNumber = "100001".parse().unwrap();
        assert_eq!(number, MemberNumber::new(100_001));
        assert_eq!(number.to_string(), "100001");

        assert!("abc".parse::<MemberNumber>().is_err());
    }
}
