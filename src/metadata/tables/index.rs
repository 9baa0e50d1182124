use std::fmt;

use crate::{
    metadata::{tables::TableId, token::Token},
    Error, Result,
};

/// A reference to a table row: the table plus a zero-based row position.
///
/// This is the only way rows refer to each other in [`crate::CilMetadata`]. Rows are stored
/// densely per table, so reordering a table is a move of row values followed by a rewrite of
/// the `row` fields that point into it, never a pointer fix-up.
///
/// # Invariant
///
/// After a reorder pass `row < row_count(table)` holds for every reference, with the exception
/// of list columns (see [`crate::reorder::ReferenceTarget::List`]) which may equal the row count.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableIndex {
    /// The referenced table
    pub table: TableId,
    /// The zero-based row within `table`
    pub row: u32,
}

impl TableIndex {
    /// Creates a new reference to `row` (zero-based) of `table`.
    #[must_use]
    pub fn new(table: TableId, row: u32) -> Self {
        TableIndex { table, row }
    }

    /// Encodes the reference as a token, with the row converted to one-based.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the one-based row does not fit the 24 row bits.
    pub fn to_token(self) -> Result<Token> {
        match self.row.checked_add(1) {
            Some(row) if row <= Token::MAX_ROW => Ok(Token::new(self.table.token_prefix() | row)),
            _ => Err(malformed_error!(
                "{} does not fit in a token, rows are limited to {}",
                self,
                Token::MAX_ROW
            )),
        }
    }

    /// Decodes a token.
    ///
    /// The null token, and a token whose row part is zero, decode to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedConstruct`] if the high byte does not name a modelled
    /// table.
    pub fn from_token(token: Token) -> Result<Option<Self>> {
        if token.row() == 0 {
            return Ok(None);
        }

        match TableId::from_u8(token.table()) {
            Some(table) => Ok(Some(TableIndex::new(table, token.row() - 1))),
            None => Err(Error::UnsupportedConstruct(format!(
                "token {token} refers to unknown table 0x{:02x}",
                token.table()
            ))),
        }
    }
}

impl TryFrom<Token> for TableIndex {
    type Error = Error;

    fn try_from(token: Token) -> Result<Self> {
        TableIndex::from_token(token)?
            .ok_or_else(|| malformed_error!("Cannot convert null token {} to a TableIndex", token))
    }
}

impl fmt::Debug for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.table, self.row)
    }
}

impl fmt::Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.table, self.row)
    }
}
