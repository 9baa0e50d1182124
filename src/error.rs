use thiserror::Error;

use crate::metadata::tables::TableId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant is fatal for the operation that produced it. The reorder pass works on a
/// private copy of the metadata, so when any of these is returned the caller's instance is
/// still in its pre-pass state.
///
/// # Error Categories
///
/// ## Reference Errors
/// - [`Error::DanglingReference`] - A reference points past the end of its target table
/// - [`Error::UnsupportedConstruct`] - A signature node, operand or column target outside the closed set
///
/// ## Structural Errors
/// - [`Error::RecursionLimit`] - A signature tree nests deeper than the configured bound
/// - [`Error::Malformed`] - Internal inconsistency (invalid permutation, bad token, failed verification)
///
/// # Examples
///
/// ```rust
/// use cilsort::{reorder_and_update, CilMetadata, Error};
///
/// let mut metadata = CilMetadata::default();
/// match reorder_and_update(&mut metadata) {
///     Ok(report) => println!("merged {} rows", report.total_merged()),
///     Err(Error::DanglingReference { site, .. }) => eprintln!("broken reference at {site}"),
///     Err(e) => eprintln!("reorder failed: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A reference points at a row that does not exist.
    ///
    /// Raised while visiting references before any rewrite takes place. This always means that
    /// whoever produced or mutated the metadata left it inconsistent; the engine never guesses
    /// a replacement target.
    ///
    /// # Fields
    ///
    /// * `site` - Human readable location of the offending reference
    /// * `table` - The referenced table
    /// * `row` - The referenced zero-based row
    /// * `row_count` - Number of rows the table actually has
    #[error("Dangling reference at {site}: {table}[{row}] but the table has {row_count} rows")]
    DanglingReference {
        /// Where the reference was found
        site: String,
        /// The table being referenced
        table: TableId,
        /// The zero-based row being referenced
        row: u32,
        /// Row count of the referenced table at traversal time
        row_count: u32,
    },

    /// A construct outside the engine's closed set was encountered.
    ///
    /// Skipping such a node would desynchronize reference rewriting, so it is reported with
    /// the offending kind instead.
    #[error("Unsupported construct - {0}")]
    UnsupportedConstruct(String),

    /// Recursion limit reached.
    ///
    /// Signature trees are owned and therefore acyclic, but a pathological nesting depth would
    /// otherwise exhaust the stack. The associated value shows the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// The metadata, or an intermediate result derived from it, is inconsistent.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
