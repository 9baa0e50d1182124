use strum::{EnumCount, EnumIter};

use crate::{
    metadata::tables::{TableId, TableIndex},
    Error, Result,
};

/// The coded index kinds of ECMA-335 II.24.2.6.
///
/// A coded index column may refer to one of several tables. On disk the target table is stored
/// as a small tag in the low bits; in [`crate::CilMetadata`] the table is explicit in the
/// [`TableIndex`], and this type only answers two questions: which tables a column admits, and
/// what the on-disk coded value of a reference is. The latter is the primary key of several
/// sorted tables.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef` or `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param` or `Property`
    HasConstant,
    /// Almost any row can carry a custom attribute
    HasCustomAttribute,
    /// `Field` or `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef` or `Assembly`
    HasDeclSecurity,
    /// Parent of a `MemberRef`
    MemberRefParent,
    /// `Event` or `Property`
    HasSemantics,
    /// `MethodDef` or `MemberRef`
    MethodDefOrRef,
    /// `Field` or `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef` or `ExportedType`
    Implementation,
    /// Constructor of a custom attribute
    CustomAttributeType,
    /// Scope a `TypeRef` is resolved in
    ResolutionScope,
    /// `TypeDef` or `MethodDef`
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// Tables in tag order. A position that is unused by the format maps to `None`.
    #[must_use]
    pub fn tables(&self) -> &'static [Option<TableId>] {
        match self {
            CodedIndexType::TypeDefOrRef => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::TypeSpec),
            ],
            CodedIndexType::HasConstant => &[
                Some(TableId::Field),
                Some(TableId::Param),
                Some(TableId::Property),
            ],
            CodedIndexType::HasCustomAttribute => &[
                Some(TableId::MethodDef),
                Some(TableId::Field),
                Some(TableId::TypeRef),
                Some(TableId::TypeDef),
                Some(TableId::Param),
                Some(TableId::InterfaceImpl),
                Some(TableId::MemberRef),
                Some(TableId::Module),
                Some(TableId::DeclSecurity), // labeled 'Permission' in the standard
                Some(TableId::Property),
                Some(TableId::Event),
                Some(TableId::StandAloneSig),
                Some(TableId::ModuleRef),
                Some(TableId::TypeSpec),
                Some(TableId::Assembly),
                Some(TableId::AssemblyRef),
                Some(TableId::File),
                Some(TableId::ExportedType),
                Some(TableId::ManifestResource),
                Some(TableId::GenericParam),
                Some(TableId::GenericParamConstraint),
                Some(TableId::MethodSpec),
            ],
            CodedIndexType::HasFieldMarshal => &[Some(TableId::Field), Some(TableId::Param)],
            CodedIndexType::HasDeclSecurity => &[
                Some(TableId::TypeDef),
                Some(TableId::MethodDef),
                Some(TableId::Assembly),
            ],
            CodedIndexType::MemberRefParent => &[
                Some(TableId::TypeDef),
                Some(TableId::TypeRef),
                Some(TableId::ModuleRef),
                Some(TableId::MethodDef),
                Some(TableId::TypeSpec),
            ],
            CodedIndexType::HasSemantics => &[Some(TableId::Event), Some(TableId::Property)],
            CodedIndexType::MethodDefOrRef => &[Some(TableId::MethodDef), Some(TableId::MemberRef)],
            CodedIndexType::MemberForwarded => &[Some(TableId::Field), Some(TableId::MethodDef)],
            CodedIndexType::Implementation => &[
                Some(TableId::File),
                Some(TableId::AssemblyRef),
                Some(TableId::ExportedType),
            ],
            CodedIndexType::CustomAttributeType => &[
                None,
                None,
                Some(TableId::MethodDef),
                Some(TableId::MemberRef),
                None,
            ],
            CodedIndexType::ResolutionScope => &[
                Some(TableId::Module),
                Some(TableId::ModuleRef),
                Some(TableId::AssemblyRef),
                Some(TableId::TypeRef),
            ],
            CodedIndexType::TypeOrMethodDef => &[Some(TableId::TypeDef), Some(TableId::MethodDef)],
        }
    }

    /// Number of low bits used for the tag.
    #[must_use]
    pub fn tag_bits(&self) -> u32 {
        let count = self.tables().len() as u32;
        // ceil(log2(count))
        u32::BITS - (count - 1).leading_zeros()
    }

    /// Whether a column of this kind may refer to `table`.
    #[must_use]
    pub fn accepts(&self, table: TableId) -> bool {
        self.tables().contains(&Some(table))
    }

    /// Returns the tag `table` is stored with.
    #[must_use]
    pub fn tag(&self, table: TableId) -> Option<u32> {
        self.tables()
            .iter()
            .position(|candidate| *candidate == Some(table))
            .map(|position| position as u32)
    }

    /// Encodes a reference the way it is stored on disk: `(row + 1) << tag_bits | tag`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnsupportedConstruct`] if the kind does not admit the table, and
    /// [`crate::Error::Malformed`] if the encoded row does not fit in 32 bits.
    pub fn encode(&self, index: TableIndex) -> Result<u32> {
        let tag = self.tag(index.table).ok_or_else(|| {
            Error::UnsupportedConstruct(format!("{} is not a valid {:?} target", index.table, self))
        })?;
        match index.row.checked_add(1) {
            Some(row) if row <= u32::MAX >> self.tag_bits() => Ok((row << self.tag_bits()) | tag),
            _ => Err(malformed_error!("{} is too large for a {:?} coded index", index, self)),
        }
    }
}
