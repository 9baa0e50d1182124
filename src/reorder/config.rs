//! Configuration of the reorder pass.

use crate::metadata::{signatures::DEFAULT_MAX_SIGNATURE_DEPTH, tables::TableId};

/// Tables whose rows are merged when they are structurally identical, by default.
///
/// These are the tables whose rows are identified by their content alone. Rows of any other
/// table are distinct definitions even when their columns are equal.
pub const DEFAULT_MERGE_TABLES: &[TableId] = &[
    TableId::ModuleRef,
    TableId::TypeRef,
    TableId::TypeSpec,
    TableId::MemberRef,
    TableId::MethodSpec,
    TableId::StandAloneSig,
];

/// Configuration for [`crate::reorder_with_config`].
///
/// Defaults run every stage: duplicate merging on [`DEFAULT_MERGE_TABLES`], sorting of every
/// table with a mandated order, and verification of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderConfig {
    /// Merge structurally identical rows.
    pub deduplicate: bool,

    /// Tables to merge duplicates in. Tables that are not content identified are ignored.
    pub merge_tables: Vec<TableId>,

    /// Sort the tables that ECMA-335 requires to be sorted.
    pub sort: bool,

    /// Nesting bound for structural comparison. Pairs that need deeper comparison are
    /// treated as distinct.
    pub max_comparison_depth: usize,

    /// Nesting bound for structural hashing. Deeper structure does not contribute to the hash.
    pub max_hash_depth: usize,

    /// Nesting bound for signature trees. Deeper trees fail the pass with
    /// [`crate::Error::RecursionLimit`].
    pub max_signature_depth: usize,

    /// Check references after the pass, and the order of sorted tables when `sort` is on.
    pub verify: bool,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            deduplicate: true,
            merge_tables: DEFAULT_MERGE_TABLES.to_vec(),
            sort: true,
            max_comparison_depth: 128,
            max_hash_depth: 16,
            max_signature_depth: DEFAULT_MAX_SIGNATURE_DEPTH,
            verify: true,
        }
    }
}

impl ReorderConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that only sorts, leaving duplicate rows in place.
    #[must_use]
    pub fn sort_only() -> Self {
        Self {
            deduplicate: false,
            ..Self::default()
        }
    }

    /// Creates a configuration that only merges duplicates, leaving row order otherwise as is.
    #[must_use]
    pub fn deduplicate_only() -> Self {
        Self {
            sort: false,
            ..Self::default()
        }
    }

    /// Sets the tables duplicates are merged in.
    ///
    /// # Arguments
    ///
    /// * `tables` - Tables to merge duplicates in.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_merge_tables(mut self, tables: impl IntoIterator<Item = TableId>) -> Self {
        self.merge_tables = tables.into_iter().collect();
        self
    }

    /// Sets the comparison and hashing bounds.
    ///
    /// # Arguments
    ///
    /// * `comparison` - Nesting bound for structural comparison.
    /// * `hash` - Nesting bound for structural hashing.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_depth_limits(mut self, comparison: usize, hash: usize) -> Self {
        self.max_comparison_depth = comparison;
        self.max_hash_depth = hash;
        self
    }

    /// Sets the nesting bound for signature trees.
    #[must_use]
    pub fn with_max_signature_depth(mut self, depth: usize) -> Self {
        self.max_signature_depth = depth;
        self
    }

    /// Enables or disables post-pass verification.
    #[must_use]
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Returns true if the pass would change anything at all.
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        (self.deduplicate && !self.merge_tables.is_empty()) || self.sort
    }

    /// The configured merge tables that are actually eligible, deduplicated, in table order.
    pub(crate) fn eligible_merge_tables(&self) -> Vec<TableId> {
        let mut tables: Vec<TableId> = self
            .merge_tables
            .iter()
            .copied()
            .filter(|table| table.is_content_identity())
            .collect();
        tables.sort_unstable();
        tables.dedup();
        tables
    }
}
