use strum::{Display, EnumCount, EnumIter};

/// Identifiers for the different metadata tables defined in the ECMA-335 specification.
///
/// Each variant represents a specific type of metadata table that can be present in a .NET assembly.
/// The numeric values correspond to the table IDs as defined in the CLI specification, and are
/// the high byte of every [`crate::metadata::token::Token`] that refers into the table.
///
/// The edit-and-continue tables (`EncLog` 0x1E, `EncMap` 0x1F) only appear in EnC deltas and
/// the portable PDB tables (0x30 and above) live in a separate debug image; neither is part of
/// the model.
///
/// ## Table Categories
///
/// ### Positional tables
/// Rows are identified by where they are (`TypeDef`, `MethodDef`, `Field`, `Param`, ...).
/// Nothing in the engine moves these rows.
///
/// ### Content-identity tables
/// Rows are identified by what they contain (`TypeRef`, `TypeSpec`, `MemberRef`,
/// `MethodSpec`, `StandAloneSig`, `ModuleRef`). These are the candidates for duplicate
/// merging, see [`TableId::is_content_identity`].
///
/// ### Sorted tables
/// ECMA-335 II.22 requires these to be sorted by a primary key (`ClassLayout`, `Constant`,
/// `CustomAttribute`, `DeclSecurity`, `FieldLayout`, `FieldMarshal`, `FieldRVA`,
/// `GenericParam`, `GenericParamConstraint`, `ImplMap`, `InterfaceImpl`, `MethodImpl`,
/// `MethodSemantics`, `NestedClass`), see [`TableId::is_sorted`].
///
/// ## Reference
/// * [ECMA-335 Partition II, Section 22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata Tables
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Display, EnumIter, EnumCount,
)]
pub enum TableId {
    /// `Module` table (0x00) - The current module.
    Module = 0x00,
    /// `TypeRef` table (0x01) - References to types defined in other scopes.
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - Types defined in this module.
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03) - Field indirection, only in uncompressed `#-` streams.
    FieldPtr = 0x03,
    /// `Field` table (0x04) - Field definitions.
    Field = 0x04,
    /// `MethodPtr` table (0x05) - Method indirection, only in uncompressed `#-` streams.
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06) - Method definitions, including their bodies.
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07) - Parameter indirection, only in uncompressed `#-` streams.
    ParamPtr = 0x07,
    /// `Param` table (0x08) - Parameter definitions.
    Param = 0x08,
    /// `InterfaceImpl` table (0x09) - Interfaces implemented by types. Sorted by class, then interface.
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A) - References to fields and methods, identified by parent, name and signature.
    MemberRef = 0x0A,
    /// `Constant` table (0x0B) - Constant values. Sorted by parent.
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C) - Custom attribute applications. Sorted by parent.
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D) - Marshalling descriptors. Sorted by parent.
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E) - Declarative security. Sorted by parent.
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F) - Explicit type layouts. Sorted by parent.
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10) - Explicit field offsets. Sorted by field.
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11) - Local variable and call-site signatures.
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12) - Type to event run mapping.
    EventMap = 0x12,
    /// `EventPtr` table (0x13) - Event indirection, only in uncompressed `#-` streams.
    EventPtr = 0x13,
    /// `Event` table (0x14) - Event definitions.
    Event = 0x14,
    /// `PropertyMap` table (0x15) - Type to property run mapping.
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16) - Property indirection, only in uncompressed `#-` streams.
    PropertyPtr = 0x16,
    /// `Property` table (0x17) - Property definitions.
    Property = 0x17,
    /// `MethodSemantics` table (0x18) - Accessor methods of events and properties. Sorted by association.
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19) - Explicit overrides. Sorted by class.
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A) - References to other modules.
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B) - Constructed types, identified by their signature.
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C) - P/Invoke mappings. Sorted by member forwarded.
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D) - Initial data of fields. Sorted by field.
    FieldRVA = 0x1D,
    /// `Assembly` table (0x20) - The current assembly.
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21) - Unused processor information.
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22) - Unused operating system information.
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23) - Referenced assemblies.
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24) - Unused processor information of referenced assemblies.
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25) - Unused operating system information of referenced assemblies.
    AssemblyRefOS = 0x25,
    /// `File` table (0x26) - Other files of a multi-file assembly.
    File = 0x26,
    /// `ExportedType` table (0x27) - Forwarded and exported types.
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28) - Manifest resources.
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29) - Nesting relationships. Sorted by nested class.
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A) - Generic parameters. Sorted by owner, then number.
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B) - Generic method instantiations, identified by method and instantiation.
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C) - Generic parameter constraints. Sorted by owner.
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Returns the table id as the byte used in tokens and coded indices.
    #[must_use]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Returns the token prefix of this table (table id in the high byte).
    #[must_use]
    pub fn token_prefix(self) -> u32 {
        u32::from(self.id()) << 24
    }

    /// Resolves a table id byte, as found in the high byte of a token.
    ///
    /// Returns `None` for bytes that do not name a modelled table, which includes the
    /// user-string pseudo table `0x70` and the edit-and-continue tables.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        let table = match value {
            0x00 => TableId::Module,
            0x01 => TableId::TypeRef,
            0x02 => TableId::TypeDef,
            0x03 => TableId::FieldPtr,
            0x04 => TableId::Field,
            0x05 => TableId::MethodPtr,
            0x06 => TableId::MethodDef,
            0x07 => TableId::ParamPtr,
            0x08 => TableId::Param,
            0x09 => TableId::InterfaceImpl,
            0x0A => TableId::MemberRef,
            0x0B => TableId::Constant,
            0x0C => TableId::CustomAttribute,
            0x0D => TableId::FieldMarshal,
            0x0E => TableId::DeclSecurity,
            0x0F => TableId::ClassLayout,
            0x10 => TableId::FieldLayout,
            0x11 => TableId::StandAloneSig,
            0x12 => TableId::EventMap,
            0x13 => TableId::EventPtr,
            0x14 => TableId::Event,
            0x15 => TableId::PropertyMap,
            0x16 => TableId::PropertyPtr,
            0x17 => TableId::Property,
            0x18 => TableId::MethodSemantics,
            0x19 => TableId::MethodImpl,
            0x1A => TableId::ModuleRef,
            0x1B => TableId::TypeSpec,
            0x1C => TableId::ImplMap,
            0x1D => TableId::FieldRVA,
            0x20 => TableId::Assembly,
            0x21 => TableId::AssemblyProcessor,
            0x22 => TableId::AssemblyOS,
            0x23 => TableId::AssemblyRef,
            0x24 => TableId::AssemblyRefProcessor,
            0x25 => TableId::AssemblyRefOS,
            0x26 => TableId::File,
            0x27 => TableId::ExportedType,
            0x28 => TableId::ManifestResource,
            0x29 => TableId::NestedClass,
            0x2A => TableId::GenericParam,
            0x2B => TableId::MethodSpec,
            0x2C => TableId::GenericParamConstraint,
            _ => return None,
        };
        Some(table)
    }

    /// Whether ECMA-335 II.22 requires the table to be sorted by a primary key.
    #[must_use]
    pub fn is_sorted(self) -> bool {
        matches!(
            self,
            TableId::InterfaceImpl
                | TableId::Constant
                | TableId::CustomAttribute
                | TableId::FieldMarshal
                | TableId::DeclSecurity
                | TableId::ClassLayout
                | TableId::FieldLayout
                | TableId::MethodSemantics
                | TableId::MethodImpl
                | TableId::ImplMap
                | TableId::FieldRVA
                | TableId::NestedClass
                | TableId::GenericParam
                | TableId::GenericParamConstraint
        )
    }

    /// Whether a row of this table is identified by its content rather than its position.
    ///
    /// Two rows of such a table that are structurally equal describe the same entity, so
    /// references to one can be redirected to the other.
    #[must_use]
    pub fn is_content_identity(self) -> bool {
        matches!(
            self,
            TableId::TypeRef
                | TableId::TypeSpec
                | TableId::MemberRef
                | TableId::MethodSpec
                | TableId::StandAloneSig
                | TableId::ModuleRef
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_from_u8_roundtrips_every_table() {
        for table in TableId::iter() {
            assert_eq!(TableId::from_u8(table.id()), Some(table));
        }
        assert_eq!(TableId::COUNT, 43);
    }

    #[test]
    fn test_unmodelled_ids() {
        assert_eq!(TableId::from_u8(0x1E), None);
        assert_eq!(TableId::from_u8(0x1F), None);
        assert_eq!(TableId::from_u8(0x30), None);
        assert_eq!(TableId::from_u8(0x70), None);
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(TableId::MethodDef.token_prefix(), 0x0600_0000);
        assert_eq!(TableId::TypeSpec.token_prefix(), 0x1B00_0000);
    }

    #[test]
    fn test_table_classes_are_disjoint() {
        for table in TableId::iter() {
            assert!(!(table.is_sorted() && table.is_content_identity()));
        }
        assert_eq!(TableId::iter().filter(|t| t.is_sorted()).count(), 14);
    }
}
