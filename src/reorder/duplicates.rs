//! The duplicate detector.
//!
//! Rows of content-identified tables are bucketed by [`StructuralHasher`] and each row is then
//! compared against the canonical rows already in its bucket with [`SignatureComparer`]. The hash
//! only narrows the candidates; a merge happens solely on confirmed structural equality, so a
//! hash collision can never merge two different rows.
//!
//! The canonical row of a group is the one with the lowest original position. Rows are
//! processed in position order, so the first row of each group becomes canonical and the
//! result does not depend on hash iteration order.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    metadata::{
        signatures::{SignatureComparer, StructuralHasher},
        tables::{CilMetadata, TableId},
    },
    reorder::ReorderConfig,
    Result,
};

/// Result of duplicate detection on one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroups {
    /// The table the rows belong to
    pub table: TableId,
    /// For every row, the original position of its canonical row
    pub canonical: Vec<u32>,
    /// Number of rows merged into another
    pub merged: u32,
}

impl DuplicateGroups {
    /// Whether any row is merged.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.merged > 0
    }
}

/// Finds the duplicate rows of `table`.
///
/// Tables whose rows are identified by position yield no duplicates.
///
/// # Errors
///
/// Currently infallible for well-formed input; the `Result` leaves room for structural checks.
pub fn find_duplicates(
    metadata: &CilMetadata,
    table: TableId,
    config: &ReorderConfig,
) -> Result<DuplicateGroups> {
    let row_count = metadata.row_count(table);
    let mut canonical: Vec<u32> = (0..row_count).collect();
    let mut merged = 0u32;

    if table.is_content_identity() && row_count > 1 {
        let hasher = StructuralHasher::new(metadata, config.max_hash_depth);
        let mut comparer = SignatureComparer::new(metadata, config.max_comparison_depth);
        let mut buckets: HashMap<u64, Vec<u32>> = HashMap::new();

        for row in 0..row_count {
            let candidates = buckets.entry(hasher.hash_row(table, row)).or_default();
            let survivor = candidates
                .iter()
                .copied()
                .find(|&candidate| comparer.rows_equal(table, candidate, row));

            match survivor {
                Some(survivor) => {
                    trace!(%table, row, survivor, "merging duplicate row");
                    canonical[row as usize] = survivor;
                    merged += 1;
                }
                None => candidates.push(row),
            }
        }
    }

    if merged > 0 {
        debug!(%table, rows = row_count, merged, "found duplicate rows");
    }

    Ok(DuplicateGroups {
        table,
        canonical,
        merged,
    })
}

/// Runs [`find_duplicates`] on every eligible table of `config`, against the same snapshot.
///
/// All tables are inspected before anything is merged. Equality looks through references into
/// content-identified rows, so a `TypeSpec` referring to one of two duplicate `TypeRef`s is
/// recognised as a duplicate of one referring to the other without merging `TypeRef` first.
///
/// # Errors
///
/// See [`find_duplicates`].
pub fn find_all_duplicates(
    metadata: &CilMetadata,
    config: &ReorderConfig,
) -> Result<Vec<DuplicateGroups>> {
    let mut found = Vec::new();
    for table in config.eligible_merge_tables() {
        let groups = find_duplicates(metadata, table, config)?;
        if groups.has_duplicates() {
            found.push(groups);
        }
    }
    Ok(found)
}
