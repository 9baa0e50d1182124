//! Metadata tokens, the single-integer encoding of a table row reference.
//!
//! A token is what the on-disk format and instruction operands use to refer to a row: the table
//! id in the high byte and the one-based row in the low 24 bits. Inside the engine references are
//! [`crate::metadata::tables::TableIndex`] values instead; this type exists so collaborators that
//! speak tokens can convert at the boundary.

use std::fmt;

use crate::{metadata::tables::TableIndex, Error, Result};

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the one-based row index within that table
///
/// The value `0` is the null token and denotes "no reference".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u32);

impl Token {
    /// The null token.
    pub const NULL: Token = Token(0);

    /// Largest one-based row the low 24 bits can hold.
    pub const MAX_ROW: u32 = 0x00FF_FFFF;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the one-based row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & Self::MAX_ROW
    }

    /// Returns true for the null token
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl TryFrom<TableIndex> for Token {
    type Error = Error;

    fn try_from(index: TableIndex) -> Result<Self> {
        index.to_token()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableId;

    #[test]
    fn test_token_parts() {
        let token = Token(0x06000001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert!(!token.is_null());

        let token = Token(0x06FFFFFF);
        assert_eq!(token.row(), 0x00FFFFFF);
    }

    #[test]
    fn test_token_null() {
        assert!(Token::NULL.is_null());
        assert!(Token::default().is_null());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token(0x1B000002)), "0x1b000002");
        let debug_str = format!("{:?}", Token(0x06000001));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_from_index() {
        let token = Token::try_from(TableIndex::new(TableId::TypeSpec, 0)).unwrap();
        assert_eq!(token.value(), 0x1B000001);
        assert!(Token::try_from(TableIndex::new(TableId::TypeSpec, Token::MAX_ROW)).is_err());
    }

    #[test]
    fn test_token_ordering() {
        assert!(Token(0x06000001) < Token(0x06000002));
        assert!(Token(0x06000002) < Token(0x07000001));
    }
}
