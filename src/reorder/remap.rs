//! Row maps and the index remapper.
//!
//! A [`RowMap`] translates the rows of one table from their position before a step to their
//! position after it. Merges make a map many-to-one (every member of a duplicate group maps to
//! the survivor's new position), sorting makes it a permutation, and the orchestrator composes
//! the two into one map per table.
//!
//! The [`IndexRemapper`] holds one map per affected table and rewrites every reference in a
//! [`CilMetadata`] instance through them, using the reference visitor so that columns, signature
//! slots and instruction operands are all handled by the same code.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    metadata::tables::{CilMetadata, TableId, TableIndex},
    reorder::visit_references_mut,
    Error, Result,
};

/// Old-to-new row translation for one table.
///
/// Besides the rows themselves, the one-past-the-end position `original_count` maps to
/// `final_count`, so that list columns denoting an empty run at the end stay at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMap {
    mapping: Vec<u32>,
    final_count: u32,
}

impl RowMap {
    /// The map that leaves all `row_count` rows in place.
    #[must_use]
    pub fn identity(row_count: u32) -> Self {
        RowMap {
            mapping: (0..row_count).collect(),
            final_count: row_count,
        }
    }

    /// Builds the map of a merge step.
    ///
    /// `canonical[i]` is the original position of the row that row `i` is merged into; a row
    /// that survives is its own canonical row. Survivors keep their relative order and are
    /// packed to the front. Returns the map together with the keep mask for
    /// [`CilMetadata::compact`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if a canonical row is out of range or is itself merged away.
    pub fn from_merge(canonical: &[u32]) -> Result<(Self, Vec<bool>)> {
        let keep: Vec<bool> = canonical
            .iter()
            .enumerate()
            .map(|(row, &target)| row as u64 == u64::from(target))
            .collect();

        let mut packed = Vec::with_capacity(canonical.len());
        let mut next = 0u32;
        for &kept in &keep {
            packed.push(next);
            if kept {
                next += 1;
            }
        }

        let mut mapping = Vec::with_capacity(canonical.len());
        for (row, &target) in canonical.iter().enumerate() {
            match keep.get(target as usize) {
                Some(true) => mapping.push(packed[target as usize]),
                _ => {
                    return Err(malformed_error!(
                        "Row {} is merged into {}, which is not a surviving row",
                        row,
                        target
                    ))
                }
            }
        }

        Ok((
            RowMap {
                mapping,
                final_count: next,
            },
            keep,
        ))
    }

    /// Builds the map of a sort step from `order[i]`, the new position of row `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `order` is not a permutation.
    pub fn from_permutation(order: Vec<u32>) -> Result<Self> {
        let mut seen = vec![false; order.len()];
        for &target in &order {
            match seen.get_mut(target as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(malformed_error!(
                        "Invalid permutation target {} for {} rows",
                        target,
                        order.len()
                    ))
                }
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let final_count = order.len() as u32;
        Ok(RowMap {
            mapping: order,
            final_count,
        })
    }

    /// Number of rows before the step.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn original_count(&self) -> u32 {
        self.mapping.len() as u32
    }

    /// Number of rows after the step.
    #[must_use]
    pub fn final_count(&self) -> u32 {
        self.final_count
    }

    /// New position of original row `row`. The end position maps to the new end; anything
    /// beyond is `None`.
    #[must_use]
    pub fn map_row(&self, row: u32) -> Option<u32> {
        match self.mapping.get(row as usize) {
            Some(&mapped) => Some(mapped),
            None if row == self.original_count() => Some(self.final_count),
            None => None,
        }
    }

    /// The new position of every original row, in original order.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.mapping
    }

    /// Whether the map changes nothing.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.final_count == self.original_count()
            && self
                .mapping
                .iter()
                .enumerate()
                .all(|(row, &mapped)| row as u64 == u64::from(mapped))
    }

    /// Whether the map is one-to-one, i.e. no rows were merged.
    #[must_use]
    pub fn is_permutation(&self) -> bool {
        self.final_count == self.original_count()
    }

    /// The map of applying `self`, then `next`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `next` does not start where `self` ends.
    pub fn then(&self, next: &RowMap) -> Result<RowMap> {
        if next.original_count() != self.final_count {
            return Err(malformed_error!(
                "Cannot compose a map ending at {} rows with one starting at {} rows",
                self.final_count,
                next.original_count()
            ));
        }

        let mapping = self
            .mapping
            .iter()
            .map(|&row| {
                next.map_row(row)
                    .ok_or_else(|| malformed_error!("Row {} has no successor mapping", row))
            })
            .collect::<Result<Vec<u32>>>()?;

        Ok(RowMap {
            mapping,
            final_count: next.final_count,
        })
    }
}

/// Rewrites every reference in a metadata instance through per-table [`RowMap`]s.
///
/// Tables without a map are left alone.
#[derive(Debug, Clone, Default)]
pub struct IndexRemapper {
    table_maps: BTreeMap<TableId, RowMap>,
}

impl IndexRemapper {
    /// Creates an empty remapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the map for `table`, replacing any previous one.
    pub fn insert(&mut self, table: TableId, map: RowMap) {
        self.table_maps.insert(table, map);
    }

    /// The map for `table`, if it has one.
    #[must_use]
    pub fn get_table_map(&self, table: TableId) -> Option<&RowMap> {
        self.table_maps.get(&table)
    }

    /// Iterates over the tables with a map, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (TableId, &RowMap)> {
        self.table_maps.iter().map(|(table, map)| (*table, map))
    }

    /// Drops the maps that change nothing.
    pub fn retain_changes(&mut self) {
        self.table_maps.retain(|_, map| !map.is_identity());
    }

    /// Whether no table has a map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table_maps.is_empty()
    }

    /// Translates a single reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DanglingReference`] if the reference is outside of its table's map.
    pub fn map_index(&self, index: TableIndex) -> Result<TableIndex> {
        match self.table_maps.get(&index.table) {
            None => Ok(index),
            Some(map) => match map.map_row(index.row) {
                Some(row) => Ok(TableIndex::new(index.table, row)),
                None => Err(Error::DanglingReference {
                    site: "remapped reference".to_string(),
                    table: index.table,
                    row: index.row,
                    row_count: map.original_count(),
                }),
            },
        }
    }

    /// Rewrites every reference in `metadata` and returns how many changed.
    ///
    /// Row storage is not touched; the caller compacts or permutes the tables to match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DanglingReference`] for a reference outside of its table's map, and the
    /// traversal errors of the reference visitor.
    pub fn apply(&self, metadata: &mut CilMetadata, max_signature_depth: usize) -> Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }

        let mut rewritten = 0usize;
        visit_references_mut(metadata, max_signature_depth, |site, index| {
            let Some(map) = self.table_maps.get(&index.table) else {
                return Ok(());
            };

            match map.map_row(index.row) {
                Some(row) => {
                    if row != index.row {
                        index.row = row;
                        rewritten += 1;
                    }
                    Ok(())
                }
                None => Err(Error::DanglingReference {
                    site: site.to_string(),
                    table: index.table,
                    row: index.row,
                    row_count: map.original_count(),
                }),
            }
        })?;

        debug!(
            tables = self.table_maps.len(),
            rewritten, "remapped references"
        );
        Ok(rewritten)
    }
}
