//! Whole-module table storage.
//!
//! [`CilMetadata`] holds one dense `Vec` per table. Position in the `Vec` is the zero-based row
//! index, which is what every [`crate::metadata::tables::TableIndex`] refers to. The per-table
//! operations the reorder pass needs (row counts, compaction, permutation, reference visiting)
//! are generated once for all tables so that no table can be forgotten.

use crate::{
    metadata::tables::{
        AssemblyOsRow, AssemblyProcessorRow, AssemblyRefOsRow, AssemblyRefProcessorRow,
        AssemblyRefRow, AssemblyRow, ClassLayoutRow, ConstantRow, CustomAttributeRow,
        DeclSecurityRow, EventMapRow, EventPtrRow, EventRow, ExportedTypeRow, FieldLayoutRow,
        FieldMarshalRow, FieldPtrRow, FieldRow, FieldRvaRow, FileRow, GenericParamConstraintRow,
        GenericParamRow, ImplMapRow, InterfaceImplRow, ManifestResourceRow, MemberRefRow,
        MetadataRow, MethodDefRow, MethodImplRow, MethodPtrRow, MethodSemanticsRow,
        MethodSpecRow, ModuleRefRow, ModuleRow, NestedClassRow, ParamPtrRow, ParamRow,
        PropertyMapRow, PropertyPtrRow, PropertyRow, StandAloneSigRow, TableId, TypeDefRow,
        TypeRefRow, TypeSpecRow,
    },
    reorder::RowVisitor,
    Result,
};

macro_rules! metadata_tables {
    ($($field:ident: $row:ty => $table:ident),* $(,)?) => {
        /// The logical content of all metadata tables of one module.
        ///
        /// Rows are plain values. References between rows are [`crate::metadata::tables::TableIndex`]
        /// values, so the whole structure is `Clone` and a copy is fully independent of its
        /// source.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use cilsort::prelude::*;
        ///
        /// let mut metadata = CilMetadata::default();
        /// metadata.module_refs.push(ModuleRefRow { name: "kernel32.dll".to_string() });
        /// assert_eq!(metadata.row_count(TableId::ModuleRef), 1);
        /// ```
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct CilMetadata {
            $(
                #[doc = concat!("Rows of the `", stringify!($table), "` table")]
                pub $field: Vec<$row>,
            )*
        }

        impl CilMetadata {
            /// Number of rows in `table`.
            #[must_use]
            pub fn row_count(&self, table: TableId) -> u32 {
                match table {
                    $( TableId::$table => row_count(&self.$field), )*
                }
            }

            /// Drops the rows of `table` whose `keep` entry is `false`, preserving the order of the
            /// remaining rows.
            ///
            /// # Errors
            ///
            /// Returns [`crate::Error::Malformed`] if `keep` does not have one entry per row.
            pub fn compact(&mut self, table: TableId, keep: &[bool]) -> Result<()> {
                match table {
                    $( TableId::$table => compact_rows(&mut self.$field, keep), )*
                }
            }

            /// Moves every row of `table` from position `i` to position `order[i]`.
            ///
            /// # Errors
            ///
            /// Returns [`crate::Error::Malformed`] if `order` is not a permutation of the rows.
            pub fn permute(&mut self, table: TableId, order: &[u32]) -> Result<()> {
                match table {
                    $( TableId::$table => permute_rows(&mut self.$field, order), )*
                }
            }

            /// Feeds every row of `table` through `visitor`, giving it mutable access to each
            /// reference the row holds.
            ///
            /// # Errors
            ///
            /// Stops at and returns the first error raised by a row or by `visitor`.
            pub fn visit_table_mut(
                &mut self,
                table: TableId,
                visitor: &mut RowVisitor<'_>,
            ) -> Result<()> {
                match table {
                    $( TableId::$table => visit_rows(&mut self.$field, visitor), )*
                }
            }

            /// Feeds every row of `table` through `visitor` without modifying the table.
            ///
            /// Each row is copied just before it is visited and the copy is dropped afterwards,
            /// so at most one row is duplicated at a time and writes made by `visitor` are
            /// discarded.
            ///
            /// # Errors
            ///
            /// Stops at and returns the first error raised by a row or by `visitor`.
            pub fn visit_table(&self, table: TableId, visitor: &mut RowVisitor<'_>) -> Result<()> {
                match table {
                    $( TableId::$table => visit_rows_shared(&self.$field, visitor), )*
                }
            }
        }

        #[cfg(test)]
        const _: () = {
            $( assert!(<$row as MetadataRow>::TABLE as u8 == TableId::$table as u8); )*
        };
    };
}

metadata_tables! {
    modules: ModuleRow => Module,
    type_refs: TypeRefRow => TypeRef,
    type_defs: TypeDefRow => TypeDef,
    field_ptrs: FieldPtrRow => FieldPtr,
    fields: FieldRow => Field,
    method_ptrs: MethodPtrRow => MethodPtr,
    method_defs: MethodDefRow => MethodDef,
    param_ptrs: ParamPtrRow => ParamPtr,
    params: ParamRow => Param,
    interface_impls: InterfaceImplRow => InterfaceImpl,
    member_refs: MemberRefRow => MemberRef,
    constants: ConstantRow => Constant,
    custom_attributes: CustomAttributeRow => CustomAttribute,
    field_marshals: FieldMarshalRow => FieldMarshal,
    decl_securities: DeclSecurityRow => DeclSecurity,
    class_layouts: ClassLayoutRow => ClassLayout,
    field_layouts: FieldLayoutRow => FieldLayout,
    stand_alone_sigs: StandAloneSigRow => StandAloneSig,
    event_maps: EventMapRow => EventMap,
    event_ptrs: EventPtrRow => EventPtr,
    events: EventRow => Event,
    property_maps: PropertyMapRow => PropertyMap,
    property_ptrs: PropertyPtrRow => PropertyPtr,
    properties: PropertyRow => Property,
    method_semantics: MethodSemanticsRow => MethodSemantics,
    method_impls: MethodImplRow => MethodImpl,
    module_refs: ModuleRefRow => ModuleRef,
    type_specs: TypeSpecRow => TypeSpec,
    impl_maps: ImplMapRow => ImplMap,
    field_rvas: FieldRvaRow => FieldRVA,
    assemblies: AssemblyRow => Assembly,
    assembly_processors: AssemblyProcessorRow => AssemblyProcessor,
    assembly_os: AssemblyOsRow => AssemblyOS,
    assembly_refs: AssemblyRefRow => AssemblyRef,
    assembly_ref_processors: AssemblyRefProcessorRow => AssemblyRefProcessor,
    assembly_ref_os: AssemblyRefOsRow => AssemblyRefOS,
    files: FileRow => File,
    exported_types: ExportedTypeRow => ExportedType,
    manifest_resources: ManifestResourceRow => ManifestResource,
    nested_classes: NestedClassRow => NestedClass,
    generic_params: GenericParamRow => GenericParam,
    method_specs: MethodSpecRow => MethodSpec,
    generic_param_constraints: GenericParamConstraintRow => GenericParamConstraint,
}

impl CilMetadata {
    /// Total number of rows across all tables.
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        use strum::IntoEnumIterator;

        TableId::iter()
            .map(|table| u64::from(self.row_count(table)))
            .sum()
    }

    /// Tables that currently hold at least one row, in table id order.
    pub fn present_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        use strum::IntoEnumIterator;

        TableId::iter().filter(|table| self.row_count(*table) > 0)
    }

    /// Snapshot of the row count of every table.
    #[must_use]
    pub fn row_counts(&self) -> RowCounts {
        use strum::IntoEnumIterator;

        let mut counts = RowCounts::default();
        for table in TableId::iter() {
            counts.0[usize::from(table.id())] = self.row_count(table);
        }
        counts
    }
}

/// Row counts of all tables, detached from the metadata they were taken from.
///
/// Lets a reference callback check bounds while the metadata itself is mutably borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts([u32; 0x2D]);

impl Default for RowCounts {
    fn default() -> Self {
        RowCounts([0; 0x2D])
    }
}

impl RowCounts {
    /// Row count of `table`.
    #[must_use]
    pub fn get(&self, table: TableId) -> u32 {
        self.0[usize::from(table.id())]
    }
}

#[allow(clippy::cast_possible_truncation)]
fn row_count<T>(rows: &[T]) -> u32 {
    // Row indices are 24 bits in the token encoding, far below u32::MAX
    rows.len() as u32
}

fn compact_rows<T>(rows: &mut Vec<T>, keep: &[bool]) -> Result<()> {
    if keep.len() != rows.len() {
        return Err(malformed_error!(
            "Compaction mask has {} entries for {} rows",
            keep.len(),
            rows.len()
        ));
    }

    let mut mask = keep.iter();
    rows.retain(|_| mask.next().copied().unwrap_or(true));
    Ok(())
}

fn permute_rows<T>(rows: &mut Vec<T>, order: &[u32]) -> Result<()> {
    if order.len() != rows.len() {
        return Err(malformed_error!(
            "Permutation has {} entries for {} rows",
            order.len(),
            rows.len()
        ));
    }

    let mut seen = vec![false; rows.len()];
    for &target in order {
        match seen.get_mut(target as usize) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(malformed_error!(
                    "Permutation maps two rows to position {}",
                    target
                ))
            }
            None => {
                return Err(malformed_error!(
                    "Permutation target {} is out of range for {} rows",
                    target,
                    rows.len()
                ))
            }
        }
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(rows.len()).collect();
    for (row, &target) in rows.drain(..).zip(order) {
        slots[target as usize] = Some(row);
    }
    rows.extend(slots.into_iter().flatten());
    Ok(())
}

fn visit_rows<T: MetadataRow>(rows: &mut [T], visitor: &mut RowVisitor<'_>) -> Result<()> {
    for (position, row) in rows.iter_mut().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        visitor.enter_row(T::TABLE, position as u32);
        row.visit_references_mut(visitor)?;
    }
    Ok(())
}

fn visit_rows_shared<T: MetadataRow + Clone>(
    rows: &[T],
    visitor: &mut RowVisitor<'_>,
) -> Result<()> {
    for (position, row) in rows.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        visitor.enter_row(T::TABLE, position as u32);
        row.clone().visit_references_mut(visitor)?;
    }
    Ok(())
}
