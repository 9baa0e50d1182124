//! The table sorter.
//!
//! ECMA-335 II.22 requires a number of tables to be sorted by a primary key column (and, for
//! `GenericParam` and `InterfaceImpl`, a secondary one). The key of a coded-index column is its
//! on-disk coded value, `(rid << tag_bits) | tag`, so that the computed order is exactly what a
//! consumer reading the emitted image expects. Plain index columns use the RID.
//!
//! The sorter only computes permutations; it never touches a row. A few key columns point into
//! tables that are themselves sorted (`GenericParamConstraint.owner` into `GenericParam`,
//! `CustomAttribute.parent` into several). Those tables are handled in dependency order and such
//! keys are evaluated through the permutation already computed for the target table, i.e. at the
//! position the target row will have once the global remap has run.

use std::cmp::Ordering;

use tracing::debug;

use crate::{
    metadata::tables::{CilMetadata, CodedIndexType, TableId, TableIndex},
    reorder::{IndexRemapper, RowMap},
    Result,
};

/// Tables with a mandated order, in the order their permutations are computed.
///
/// Every table whose key can point into another sorted table comes after that table.
pub const SORTED_TABLES: [TableId; 14] = [
    TableId::ClassLayout,
    TableId::Constant,
    TableId::DeclSecurity,
    TableId::FieldLayout,
    TableId::FieldMarshal,
    TableId::FieldRVA,
    TableId::GenericParam,
    TableId::ImplMap,
    TableId::InterfaceImpl,
    TableId::MethodImpl,
    TableId::MethodSemantics,
    TableId::NestedClass,
    TableId::GenericParamConstraint,
    TableId::CustomAttribute,
];

/// Evaluates key columns, looking references up through permutations computed so far.
struct KeyContext<'a> {
    permutations: &'a IndexRemapper,
}

impl KeyContext<'_> {
    fn position(&self, index: TableIndex) -> Result<u32> {
        match self.permutations.get_table_map(index.table) {
            None => Ok(index.row),
            Some(map) => map.map_row(index.row).ok_or_else(|| {
                malformed_error!("Sort key {} is outside of its table", index)
            }),
        }
    }

    fn plain(&self, index: TableIndex) -> Result<u64> {
        Ok(u64::from(self.position(index)?) + 1)
    }

    fn coded(&self, kind: CodedIndexType, index: TableIndex) -> Result<u64> {
        let moved = TableIndex::new(index.table, self.position(index)?);
        Ok(u64::from(kind.encode(moved)?))
    }
}

fn combine(primary: u64, secondary: u64) -> u64 {
    (primary << 32) | (secondary & 0xFFFF_FFFF)
}

fn collect<T>(rows: &[T], key: impl Fn(&T) -> Result<u64>) -> Result<Vec<u64>> {
    rows.iter().map(key).collect()
}

/// Sort keys of every row of `table`, evaluated through `permutations`.
///
/// Returns `None` for tables without a mandated order.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] when a key column refers outside of its table or into a
/// table its coded index does not admit.
pub fn table_keys(
    metadata: &CilMetadata,
    table: TableId,
    permutations: &IndexRemapper,
) -> Result<Option<Vec<u64>>> {
    let context = KeyContext { permutations };
    let keys = match table {
        TableId::ClassLayout => collect(&metadata.class_layouts, |row| context.plain(row.parent)),
        TableId::Constant => collect(&metadata.constants, |row| {
            context.coded(CodedIndexType::HasConstant, row.parent)
        }),
        TableId::CustomAttribute => collect(&metadata.custom_attributes, |row| {
            context.coded(CodedIndexType::HasCustomAttribute, row.parent)
        }),
        TableId::DeclSecurity => collect(&metadata.decl_securities, |row| {
            context.coded(CodedIndexType::HasDeclSecurity, row.parent)
        }),
        TableId::FieldLayout => collect(&metadata.field_layouts, |row| context.plain(row.field)),
        TableId::FieldMarshal => collect(&metadata.field_marshals, |row| {
            context.coded(CodedIndexType::HasFieldMarshal, row.parent)
        }),
        TableId::FieldRVA => collect(&metadata.field_rvas, |row| context.plain(row.field)),
        TableId::GenericParam => collect(&metadata.generic_params, |row| {
            Ok(combine(
                context.coded(CodedIndexType::TypeOrMethodDef, row.owner)?,
                u64::from(row.number),
            ))
        }),
        TableId::GenericParamConstraint => {
            collect(&metadata.generic_param_constraints, |row| {
                context.plain(row.owner)
            })
        }
        TableId::ImplMap => collect(&metadata.impl_maps, |row| {
            context.coded(CodedIndexType::MemberForwarded, row.member_forwarded)
        }),
        TableId::InterfaceImpl => collect(&metadata.interface_impls, |row| {
            Ok(combine(
                context.plain(row.class)?,
                context.coded(CodedIndexType::TypeDefOrRef, row.interface)?,
            ))
        }),
        TableId::MethodImpl => collect(&metadata.method_impls, |row| context.plain(row.class)),
        TableId::MethodSemantics => collect(&metadata.method_semantics, |row| {
            context.coded(CodedIndexType::HasSemantics, row.association)
        }),
        TableId::NestedClass => {
            collect(&metadata.nested_classes, |row| context.plain(row.nested_class))
        }
        _ => return Ok(None),
    }?;

    Ok(Some(keys))
}

/// Stable sort of `keys`: returns the new position of every row.
fn stable_order(keys: &[u64]) -> Vec<u32> {
    #[allow(clippy::cast_possible_truncation)]
    let mut sorted: Vec<u32> = (0..keys.len() as u32).collect();
    sorted.sort_by(|&a, &b| match keys[a as usize].cmp(&keys[b as usize]) {
        Ordering::Equal => a.cmp(&b),
        other => other,
    });

    let mut order = vec![0u32; keys.len()];
    for (new, &old) in sorted.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        {
            order[old as usize] = new as u32;
        }
    }
    order
}

/// Computes the permutation of every table in [`SORTED_TABLES`].
///
/// The result holds a map for every sorted table, including tables already in order (whose map
/// is the identity).
///
/// # Errors
///
/// See [`table_keys`].
pub fn compute_permutations(metadata: &CilMetadata) -> Result<IndexRemapper> {
    let mut permutations = IndexRemapper::new();

    for table in SORTED_TABLES {
        let Some(keys) = table_keys(metadata, table, &permutations)? else {
            continue;
        };

        let map = RowMap::from_permutation(stable_order(&keys))?;
        if !map.is_identity() {
            debug!(%table, rows = keys.len(), "table needs sorting");
        }
        permutations.insert(table, map);
    }

    Ok(permutations)
}
