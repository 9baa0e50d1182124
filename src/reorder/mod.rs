//! The reorder pass: duplicate merging, table sorting and reference remapping.
//!
//! [`reorder_with_config`] brings a [`CilMetadata`] instance into the shape an image writer
//! needs after arbitrary edits. Stages, strictly in this order:
//!
//! 1. Validate every reference ([`validate_references`]). Dangling or inadmissible references
//!    abort the pass before anything changes.
//! 2. Find duplicate rows in content-identified tables ([`duplicates`]) and build one merge
//!    map per table.
//! 3. Remap every reference through the merge maps, then drop the merged rows. Stages 2 and 3
//!    repeat until a round finds nothing left to merge.
//! 4. Compute the permutation of every sorted table against the compacted tables ([`sorter`]).
//! 5. Remap every reference through the permutations, then move the rows.
//! 6. Optionally verify the result ([`verify`]). Table order is checked only when sorting ran.
//!
//! All stages run on a private copy. The caller's instance is replaced only once every stage
//! has succeeded, so on error it is exactly as it was.
//!
//! # Examples
//!
//! ```rust
//! use cilsort::prelude::*;
//!
//! let mut metadata = CilMetadata::default();
//! for name in ["A", "B"] {
//!     metadata.type_defs.push(TypeDefRow {
//!         flags: 0,
//!         type_name: name.to_string(),
//!         type_namespace: String::new(),
//!         extends: None,
//!         field_list: TableIndex::new(TableId::Field, 0),
//!         method_list: TableIndex::new(TableId::MethodDef, 0),
//!     });
//! }
//! // Two identical type specifications
//! for _ in 0..2 {
//!     metadata.type_specs.push(TypeSpecRow {
//!         signature: SignatureTypeSpec {
//!             base: TypeSignature::ValueType(TableIndex::new(TableId::TypeDef, 1)),
//!         },
//!     });
//! }
//!
//! let report = reorder_and_update(&mut metadata)?;
//! assert_eq!(metadata.type_specs.len(), 1);
//! assert_eq!(report.merged(TableId::TypeSpec), 1);
//! # Ok::<(), cilsort::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! The pass is single threaded and needs exclusive access to one instance. Independent
//! instances can be processed in parallel with [`reorder_all`].

mod config;
pub mod duplicates;
mod references;
mod remap;
pub mod sorter;
pub mod verify;

use std::collections::BTreeMap;

use rayon::prelude::*;
use strum::IntoEnumIterator;
use tracing::{debug, debug_span};

pub use config::{ReorderConfig, DEFAULT_MERGE_TABLES};
pub use references::{
    collect_references, validate_references, visit_references, visit_references_mut, Location,
    ReferenceSink, ReferenceSite, ReferenceTarget, RowVisitor,
};
pub use remap::{IndexRemapper, RowMap};

use crate::{
    metadata::tables::{CilMetadata, TableId, TableIndex},
    Result,
};

/// What a reorder pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderReport {
    maps: BTreeMap<TableId, RowMap>,
    merged: BTreeMap<TableId, u32>,
    moved: Vec<TableId>,
}

impl ReorderReport {
    /// Final old-to-new map of `table`. Present for every table that had rows before the pass.
    #[must_use]
    pub fn row_map(&self, table: TableId) -> Option<&RowMap> {
        self.maps.get(&table)
    }

    /// Iterates over the final maps, in table order.
    pub fn row_maps(&self) -> impl Iterator<Item = (TableId, &RowMap)> {
        self.maps.iter().map(|(table, map)| (*table, map))
    }

    /// Where a reference taken before the pass points now.
    #[must_use]
    pub fn map_index(&self, index: TableIndex) -> Option<TableIndex> {
        match self.maps.get(&index.table) {
            Some(map) => map
                .map_row(index.row)
                .map(|row| TableIndex::new(index.table, row)),
            None => Some(index),
        }
    }

    /// Number of rows of `table` merged into a canonical row.
    #[must_use]
    pub fn merged(&self, table: TableId) -> u32 {
        self.merged.get(&table).copied().unwrap_or(0)
    }

    /// Number of rows merged across all tables.
    #[must_use]
    pub fn total_merged(&self) -> u64 {
        self.merged.values().map(|&count| u64::from(count)).sum()
    }

    /// Tables whose rows were physically reordered by sorting.
    #[must_use]
    pub fn moved_tables(&self) -> &[TableId] {
        &self.moved
    }

    /// Whether the pass left the instance unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.merged.is_empty() && self.moved.is_empty()
    }
}

/// Runs the reorder pass with [`ReorderConfig::default`].
///
/// # Errors
///
/// See [`reorder_with_config`].
pub fn reorder_and_update(metadata: &mut CilMetadata) -> Result<ReorderReport> {
    reorder_with_config(metadata, &ReorderConfig::default())
}

/// Runs the reorder pass.
///
/// On success `metadata` holds the merged, sorted and remapped tables. On error it is left
/// untouched.
///
/// # Errors
///
/// - [`crate::Error::DanglingReference`] - a reference points past its table
/// - [`crate::Error::UnsupportedConstruct`] - an unsupported signature element or operand, or a
///   reference into a table its column does not admit
/// - [`crate::Error::RecursionLimit`] - a signature nests deeper than the configured bound
/// - [`crate::Error::Malformed`] - verification of the result failed
pub fn reorder_with_config(
    metadata: &mut CilMetadata,
    config: &ReorderConfig,
) -> Result<ReorderReport> {
    let span = debug_span!("reorder", rows = metadata.total_rows());
    let _guard = span.enter();

    validate_references(metadata, config.max_signature_depth)?;
    let mut working = metadata.clone();
    let original = working.row_counts();

    let merges = if config.deduplicate {
        merge_duplicates(&mut working, config)?
    } else {
        IndexRemapper::new()
    };

    let permutations = if config.sort {
        sort_tables(&mut working, config)?
    } else {
        IndexRemapper::new()
    };

    if config.verify {
        verify::check_references(&working, config.max_signature_depth)?;
        if config.sort {
            verify::check_ordering(&working)?;
        }
    }

    let mut report = ReorderReport::default();
    for table in TableId::iter() {
        let count = original.get(table);
        if count == 0 {
            continue;
        }

        let merged = merges
            .get_table_map(table)
            .cloned()
            .unwrap_or_else(|| RowMap::identity(count));
        let merged_rows = count - merged.final_count();
        if merged_rows > 0 {
            report.merged.insert(table, merged_rows);
        }

        let combined = match permutations.get_table_map(table) {
            Some(permutation) => {
                report.moved.push(table);
                merged.then(permutation)?
            }
            None => merged,
        };
        report.maps.insert(table, combined);
    }

    debug!(
        merged = report.total_merged(),
        moved = report.moved.len(),
        "reorder complete"
    );

    *metadata = working;
    Ok(report)
}

/// Stages 2 and 3: find duplicates, remap onto the survivors and compact.
///
/// Repeats until a round merges nothing. Comparison stops at `max_comparison_depth`, so rows
/// nested deeper than that only become equal once the rows below them have merged.
fn merge_duplicates(working: &mut CilMetadata, config: &ReorderConfig) -> Result<IndexRemapper> {
    let mut merges = IndexRemapper::new();

    for round in 1.. {
        let mut step = IndexRemapper::new();
        let mut masks = Vec::new();
        for groups in duplicates::find_all_duplicates(working, config)? {
            let (map, keep) = RowMap::from_merge(&groups.canonical)?;
            step.insert(groups.table, map);
            masks.push((groups.table, keep));
        }

        if step.is_empty() {
            break;
        }

        step.apply(working, config.max_signature_depth)?;
        for (table, keep) in &masks {
            working.compact(*table, keep)?;
        }
        debug!(round, tables = masks.len(), "merged duplicate rows");

        for (table, map) in step.iter() {
            let composed = match merges.get_table_map(table) {
                Some(previous) => previous.then(map)?,
                None => map.clone(),
            };
            merges.insert(table, composed);
        }
    }

    Ok(merges)
}

/// Stages 4 and 5: compute permutations, remap through them and move the rows.
fn sort_tables(working: &mut CilMetadata, config: &ReorderConfig) -> Result<IndexRemapper> {
    let mut permutations = sorter::compute_permutations(working)?;
    permutations.retain_changes();

    if !permutations.is_empty() {
        permutations.apply(working, config.max_signature_depth)?;
        for (table, map) in permutations.iter() {
            working.permute(table, map.as_slice())?;
        }
    }

    Ok(permutations)
}

/// Runs the reorder pass on independent instances in parallel.
///
/// Each instance is processed single threaded and succeeds or fails on its own; the results are
/// in input order.
pub fn reorder_all(
    instances: &mut [CilMetadata],
    config: &ReorderConfig,
) -> Vec<Result<ReorderReport>> {
    instances
        .par_iter_mut()
        .map(|metadata| reorder_with_config(metadata, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            signatures::{SignatureTypeSpec, TypeSignature},
            tables::{NestedClassRow, TypeDefRow, TypeSpecRow},
        },
        Error,
    };

    fn type_def(name: &str) -> TypeDefRow {
        TypeDefRow {
            flags: 0,
            type_name: name.to_string(),
            type_namespace: String::new(),
            extends: None,
            field_list: TableIndex::new(TableId::Field, 0),
            method_list: TableIndex::new(TableId::MethodDef, 0),
        }
    }

    fn sample() -> CilMetadata {
        let mut metadata = CilMetadata::default();
        metadata.type_defs.push(type_def("A"));
        metadata.type_defs.push(type_def("B"));
        metadata.type_defs.push(type_def("C"));
        metadata.nested_classes.push(NestedClassRow {
            nested_class: TableIndex::new(TableId::TypeDef, 2),
            enclosing_class: TableIndex::new(TableId::TypeDef, 0),
        });
        metadata.nested_classes.push(NestedClassRow {
            nested_class: TableIndex::new(TableId::TypeDef, 1),
            enclosing_class: TableIndex::new(TableId::TypeDef, 0),
        });
        for _ in 0..2 {
            metadata.type_specs.push(TypeSpecRow {
                signature: SignatureTypeSpec {
                    base: TypeSignature::Class(TableIndex::new(TableId::TypeDef, 2)),
                },
            });
        }
        metadata
    }

    #[test]
    fn test_report() {
        let mut metadata = sample();
        let report = reorder_and_update(&mut metadata).unwrap();

        assert_eq!(report.merged(TableId::TypeSpec), 1);
        assert_eq!(report.total_merged(), 1);
        assert_eq!(report.moved_tables(), &[TableId::NestedClass]);
        assert_eq!(
            report.row_map(TableId::NestedClass).unwrap().as_slice(),
            &[1, 0]
        );
        assert_eq!(
            report.map_index(TableIndex::new(TableId::TypeSpec, 1)),
            Some(TableIndex::new(TableId::TypeSpec, 0))
        );
        assert!(report.row_map(TableId::TypeDef).unwrap().is_identity());
        assert!(report.row_map(TableId::Field).is_none());

        let again = reorder_and_update(&mut metadata).unwrap();
        assert!(again.is_noop());
    }

    #[test]
    fn test_stage_switches() {
        let mut metadata = sample();
        let report = reorder_with_config(&mut metadata, &ReorderConfig::sort_only()).unwrap();
        assert_eq!(report.total_merged(), 0);
        assert_eq!(metadata.type_specs.len(), 2);

        let mut metadata = sample();
        let report =
            reorder_with_config(&mut metadata, &ReorderConfig::deduplicate_only()).unwrap();
        assert!(report.moved_tables().is_empty());
        assert_eq!(metadata.type_specs.len(), 1);
        assert_eq!(
            metadata.nested_classes[0].nested_class,
            TableIndex::new(TableId::TypeDef, 2)
        );
    }

    #[test]
    fn test_deep_chain_merges_in_one_pass() {
        let mut metadata = CilMetadata::default();
        metadata.type_defs.push(type_def("A"));
        for start in [0, 80] {
            for k in 0..80 {
                let base = if k == 0 {
                    TableIndex::new(TableId::TypeDef, 0)
                } else {
                    TableIndex::new(TableId::TypeSpec, start + k - 1)
                };
                metadata.type_specs.push(TypeSpecRow {
                    signature: SignatureTypeSpec {
                        base: TypeSignature::Class(base),
                    },
                });
            }
        }

        let report = reorder_and_update(&mut metadata).unwrap();
        assert_eq!(metadata.type_specs.len(), 80);
        assert_eq!(report.merged(TableId::TypeSpec), 80);
        assert_eq!(
            report.map_index(TableIndex::new(TableId::TypeSpec, 159)),
            Some(TableIndex::new(TableId::TypeSpec, 79))
        );

        let again = reorder_and_update(&mut metadata).unwrap();
        assert!(again.is_noop());
    }

    #[test]
    fn test_unsorted_tables_pass_without_sorting() {
        let mut metadata = sample();
        let config = ReorderConfig::deduplicate_only().with_verify(true);
        reorder_with_config(&mut metadata, &config).unwrap();
        assert_eq!(
            metadata.nested_classes[0].nested_class,
            TableIndex::new(TableId::TypeDef, 2)
        );
    }

    #[test]
    fn test_failure_leaves_input_untouched() {
        let mut metadata = sample();
        metadata.nested_classes[0].enclosing_class = TableIndex::new(TableId::TypeDef, 9);
        let before = metadata.clone();

        assert!(matches!(
            reorder_and_update(&mut metadata),
            Err(Error::DanglingReference { row: 9, .. })
        ));
        assert_eq!(metadata, before);
    }

    #[test]
    fn test_reorder_all() {
        let mut broken = sample();
        broken.type_specs[0].signature.base = TypeSignature::Unknown;
        let mut instances = vec![sample(), broken, sample()];

        let results = reorder_all(&mut instances, &ReorderConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::UnsupportedConstruct(_))));
        assert!(results[2].is_ok());
        assert_eq!(instances[0].type_specs.len(), 1);
        assert_eq!(instances[1].type_specs.len(), 2);
    }
}
