//! Exception handler clauses of a method body.
//!
//! Only typed catch clauses refer to a metadata row (the caught type); the reference visitor
//! treats that slot exactly like an instruction operand.

use bitflags::bitflags;

use crate::metadata::tables::TableIndex;

bitflags! {
    /// Exception handler flags defining the type of exception handling clause.
    ///
    /// These flags determine how the exception handler processes exceptions and
    /// control flow within try/catch/finally blocks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExceptionHandlerFlags: u16 {
        /// A typed exception clause.
        ///
        /// The handler's `catch_type` names the exception type that this handler catches.
        const EXCEPTION = 0x0000;

        /// An exception filter and handler clause.
        ///
        /// Uses a filter expression to determine whether to handle the exception.
        const FILTER = 0x0001;

        /// A finally clause.
        const FINALLY = 0x0002;

        /// A fault clause (finally that executes only on exception).
        const FAULT = 0x0004;
    }
}

/// Exception handler defining try/catch/finally blocks within a method.
///
/// # Layout in IL
///
/// ```text
/// try {
///     // try_offset -> try_offset + try_length
/// }
/// catch (ExceptionType) {
///     // handler_offset -> handler_offset + handler_length
/// }
/// ```
///
/// # References
/// - ECMA-335 6th Edition, Partition II, Section 25.4.6 - Exception Handling
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// Flags describing the type of exception handler (catch, filter, finally, fault).
    pub flags: ExceptionHandlerFlags,
    /// Offset in bytes of try block from start of method body.
    pub try_offset: u32,
    /// Length in bytes of the try block.
    pub try_length: u32,
    /// Location of the handler for this try block.
    pub handler_offset: u32,
    /// Size of the handler code in bytes.
    pub handler_length: u32,
    /// If flags == EXCEPTION, the `TypeDefOrRef` reference to the caught type.
    pub catch_type: Option<TableIndex>,
    /// Offset in method body for filter-based exception handler.
    pub filter_offset: u32,
}

impl ExceptionHandler {
    /// Whether this is a typed catch clause.
    ///
    /// `EXCEPTION` is the empty flag set, so `contains` cannot be used to test for it.
    #[must_use]
    pub fn is_typed_catch(&self) -> bool {
        self.flags.is_empty()
    }

    /// A typed catch clause.
    #[must_use]
    pub fn catch(
        try_offset: u32,
        try_length: u32,
        handler_offset: u32,
        handler_length: u32,
        catch_type: TableIndex,
    ) -> Self {
        ExceptionHandler {
            flags: ExceptionHandlerFlags::EXCEPTION,
            try_offset,
            try_length,
            handler_offset,
            handler_length,
            catch_type: Some(catch_type),
            filter_offset: 0,
        }
    }

    /// A finally clause.
    #[must_use]
    pub fn finally(
        try_offset: u32,
        try_length: u32,
        handler_offset: u32,
        handler_length: u32,
    ) -> Self {
        ExceptionHandler {
            flags: ExceptionHandlerFlags::FINALLY,
            try_offset,
            try_length,
            handler_offset,
            handler_length,
            catch_type: None,
            filter_offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::TableId;

    #[test]
    fn test_typed_catch() {
        let handler = ExceptionHandler::catch(0, 10, 10, 4, TableIndex::new(TableId::TypeRef, 2));
        assert!(handler.is_typed_catch());
        assert_eq!(handler.catch_type, Some(TableIndex::new(TableId::TypeRef, 2)));

        let finally = ExceptionHandler::finally(0, 10, 10, 4);
        assert!(!finally.is_typed_catch());
        assert!(finally.flags.contains(ExceptionHandlerFlags::FINALLY));
    }
}
