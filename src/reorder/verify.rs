//! Post-pass verification.
//!
//! Re-checks the two properties the reorder pass establishes: every reference is in bounds and
//! admissible, and every table with a mandated order is in that order. Sorted tables must be
//! non-decreasing in their key; `NestedClass` must be strictly increasing, since a type can
//! only be nested once.

use tracing::debug;

use crate::{
    metadata::tables::{CilMetadata, TableId},
    reorder::{sorter, validate_references, IndexRemapper},
    Result,
};

/// Checks every reference of `metadata`.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] describing the first offending reference.
pub fn check_references(metadata: &CilMetadata, max_signature_depth: usize) -> Result<()> {
    validate_references(metadata, max_signature_depth)
        .map(|_| ())
        .map_err(|error| malformed_error!("Reference check failed after reorder: {}", error))
}

/// Checks the order of every sorted table.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] naming the table and row where the order breaks.
pub fn check_ordering(metadata: &CilMetadata) -> Result<()> {
    let unchanged = IndexRemapper::new();

    for table in sorter::SORTED_TABLES {
        let Some(keys) = sorter::table_keys(metadata, table, &unchanged)? else {
            continue;
        };

        let strict = table == TableId::NestedClass;
        for (row, pair) in keys.windows(2).enumerate() {
            let in_order = if strict {
                pair[0] < pair[1]
            } else {
                pair[0] <= pair[1]
            };
            if !in_order {
                return Err(malformed_error!(
                    "{} is out of order at row {}: key {:#x} follows {:#x}",
                    table,
                    row + 1,
                    pair[1],
                    pair[0]
                ));
            }
        }
    }

    debug!("table order verified");
    Ok(())
}
