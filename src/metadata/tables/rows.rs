//! Row structures, one per metadata table.
//!
//! Columns hold logical values: heap strings are `String`, blobs are `Vec<u8>`, GUIDs are
//! `[u8; 16]` and signature blobs are the decoded signature tree. Every column that refers to a
//! table row is a [`TableIndex`] (or `Option<TableIndex>` where the format allows a null
//! reference), and every such column is reported by the row's [`MetadataRow`] implementation.

use crate::{
    metadata::{
        method::MethodBody,
        signatures::{
            MemberRefSignature, SignatureField, SignatureMethod, SignatureMethodSpec,
            SignatureProperty, SignatureTypeSpec, StandAloneSignature,
        },
        tables::{CodedIndexType, TableId, TableIndex},
    },
    reorder::{ReferenceTarget, RowVisitor},
    Result,
};

/// A row of one metadata table.
///
/// Implementations enumerate every reference the row holds, so the reference visitor can reach
/// them without knowing the concrete row type.
pub trait MetadataRow: Clone + Send + Sync {
    /// The table rows of this type live in
    const TABLE: TableId;

    /// Reports every table reference of this row to `visitor`, in column order.
    ///
    /// # Errors
    ///
    /// Propagates whatever `visitor` returns, plus [`crate::Error::UnsupportedConstruct`] and
    /// [`crate::Error::RecursionLimit`] from embedded signatures.
    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()>;
}

macro_rules! no_references {
    ($row:ty, $table:expr) => {
        impl MetadataRow for $row {
            const TABLE: TableId = $table;

            fn visit_references_mut(&mut self, _visitor: &mut RowVisitor<'_>) -> Result<()> {
                Ok(())
            }
        }
    };
}

/// `Module` table row (0x00).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleRow {
    /// Reserved, shall be zero
    pub generation: u16,
    /// Module name
    pub name: String,
    /// Module version id
    pub mvid: [u8; 16],
    /// Reserved
    pub enc_id: Option<[u8; 16]>,
    /// Reserved
    pub enc_base_id: Option<[u8; 16]>,
}

no_references!(ModuleRow, TableId::Module);

/// `TypeRef` table row (0x01).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRefRow {
    /// `ResolutionScope`: `Module`, `ModuleRef`, `AssemblyRef` or the enclosing `TypeRef`.
    /// `None` means the type is found through the `ExportedType` table.
    pub resolution_scope: Option<TableIndex>,
    /// Type name
    pub type_name: String,
    /// Type namespace
    pub type_namespace: String,
}

impl MetadataRow for TypeRefRow {
    const TABLE: TableId = TableId::TypeRef;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.optional(
            "resolution_scope",
            ReferenceTarget::Coded(CodedIndexType::ResolutionScope),
            &mut self.resolution_scope,
        )
    }
}

/// `TypeDef` table row (0x02).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefRow {
    /// `TypeAttributes`
    pub flags: u32,
    /// Type name
    pub type_name: String,
    /// Type namespace
    pub type_namespace: String,
    /// `TypeDefOrRef` base type; `None` for interfaces and `System.Object`
    pub extends: Option<TableIndex>,
    /// First row of the field run in `Field`
    pub field_list: TableIndex,
    /// First row of the method run in `MethodDef`
    pub method_list: TableIndex,
}

impl MetadataRow for TypeDefRow {
    const TABLE: TableId = TableId::TypeDef;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.optional(
            "extends",
            ReferenceTarget::Coded(CodedIndexType::TypeDefOrRef),
            &mut self.extends,
        )?;
        visitor.reference(
            "field_list",
            ReferenceTarget::List(TableId::Field),
            &mut self.field_list,
        )?;
        visitor.reference(
            "method_list",
            ReferenceTarget::List(TableId::MethodDef),
            &mut self.method_list,
        )
    }
}

/// `FieldPtr` table row (0x03).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPtrRow {
    /// The `Field` row
    pub field: TableIndex,
}

impl MetadataRow for FieldPtrRow {
    const TABLE: TableId = TableId::FieldPtr;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("field", ReferenceTarget::Table(TableId::Field), &mut self.field)
    }
}

/// `Field` table row (0x04).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRow {
    /// `FieldAttributes`
    pub flags: u16,
    /// Field name
    pub name: String,
    /// Field signature
    pub signature: SignatureField,
}

impl MetadataRow for FieldRow {
    const TABLE: TableId = TableId::Field;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.signature("signature", |walker| walker.field(&mut self.signature))
    }
}

/// `MethodPtr` table row (0x05).
#[derive(Debug, Clone, PartialEq)]
pub struct MethodPtrRow {
    /// The `MethodDef` row
    pub method: TableIndex,
}

impl MetadataRow for MethodPtrRow {
    const TABLE: TableId = TableId::MethodPtr;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "method",
            ReferenceTarget::Table(TableId::MethodDef),
            &mut self.method,
        )
    }
}

/// `MethodDef` table row (0x06), together with the decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefRow {
    /// RVA of the body in the original image
    pub rva: u32,
    /// `MethodImplAttributes`
    pub impl_flags: u16,
    /// `MethodAttributes`
    pub flags: u16,
    /// Method name
    pub name: String,
    /// Method definition signature
    pub signature: SignatureMethod,
    /// First row of the parameter run in `Param`
    pub param_list: TableIndex,
    /// The decoded body; `None` for abstract, runtime and P/Invoke methods
    pub body: Option<MethodBody>,
}

impl MetadataRow for MethodDefRow {
    const TABLE: TableId = TableId::MethodDef;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.signature("signature", |walker| walker.method(&mut self.signature))?;
        visitor.reference(
            "param_list",
            ReferenceTarget::List(TableId::Param),
            &mut self.param_list,
        )?;
        if let Some(body) = self.body.as_mut() {
            visitor.body(body)?;
        }
        Ok(())
    }
}

/// `ParamPtr` table row (0x07).
#[derive(Debug, Clone, PartialEq)]
pub struct ParamPtrRow {
    /// The `Param` row
    pub param: TableIndex,
}

impl MetadataRow for ParamPtrRow {
    const TABLE: TableId = TableId::ParamPtr;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("param", ReferenceTarget::Table(TableId::Param), &mut self.param)
    }
}

/// `Param` table row (0x08).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamRow {
    /// `ParamAttributes`
    pub flags: u16,
    /// 0 for the return value, 1.. for parameters
    pub sequence: u16,
    /// Parameter name
    pub name: String,
}

no_references!(ParamRow, TableId::Param);

/// `InterfaceImpl` table row (0x09). Sorted by `class`, then `interface`.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceImplRow {
    /// The implementing `TypeDef`
    pub class: TableIndex,
    /// `TypeDefOrRef` interface
    pub interface: TableIndex,
}

impl MetadataRow for InterfaceImplRow {
    const TABLE: TableId = TableId::InterfaceImpl;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("class", ReferenceTarget::Table(TableId::TypeDef), &mut self.class)?;
        visitor.reference(
            "interface",
            ReferenceTarget::Coded(CodedIndexType::TypeDefOrRef),
            &mut self.interface,
        )
    }
}

/// `MemberRef` table row (0x0A).
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRefRow {
    /// `MemberRefParent`
    pub class: TableIndex,
    /// Member name
    pub name: String,
    /// Method or field signature
    pub signature: MemberRefSignature,
}

impl MetadataRow for MemberRefRow {
    const TABLE: TableId = TableId::MemberRef;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "class",
            ReferenceTarget::Coded(CodedIndexType::MemberRefParent),
            &mut self.class,
        )?;
        visitor.signature("signature", |walker| walker.member_ref(&mut self.signature))
    }
}

/// `Constant` table row (0x0B). Sorted by `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantRow {
    /// Element type of the constant
    pub base: u8,
    /// `HasConstant` owner
    pub parent: TableIndex,
    /// Encoded value
    pub value: Vec<u8>,
}

impl MetadataRow for ConstantRow {
    const TABLE: TableId = TableId::Constant;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "parent",
            ReferenceTarget::Coded(CodedIndexType::HasConstant),
            &mut self.parent,
        )
    }
}

/// `CustomAttribute` table row (0x0C). Sorted by `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttributeRow {
    /// `HasCustomAttribute` owner
    pub parent: TableIndex,
    /// `CustomAttributeType` constructor
    pub constructor: TableIndex,
    /// Encoded arguments
    pub value: Vec<u8>,
}

impl MetadataRow for CustomAttributeRow {
    const TABLE: TableId = TableId::CustomAttribute;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "parent",
            ReferenceTarget::Coded(CodedIndexType::HasCustomAttribute),
            &mut self.parent,
        )?;
        visitor.reference(
            "constructor",
            ReferenceTarget::Coded(CodedIndexType::CustomAttributeType),
            &mut self.constructor,
        )
    }
}

/// `FieldMarshal` table row (0x0D). Sorted by `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMarshalRow {
    /// `HasFieldMarshal` owner
    pub parent: TableIndex,
    /// Encoded marshalling descriptor
    pub native_type: Vec<u8>,
}

impl MetadataRow for FieldMarshalRow {
    const TABLE: TableId = TableId::FieldMarshal;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "parent",
            ReferenceTarget::Coded(CodedIndexType::HasFieldMarshal),
            &mut self.parent,
        )
    }
}

/// `DeclSecurity` table row (0x0E). Sorted by `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclSecurityRow {
    /// Security action
    pub action: u16,
    /// `HasDeclSecurity` owner
    pub parent: TableIndex,
    /// Encoded permission set
    pub permission_set: Vec<u8>,
}

impl MetadataRow for DeclSecurityRow {
    const TABLE: TableId = TableId::DeclSecurity;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "parent",
            ReferenceTarget::Coded(CodedIndexType::HasDeclSecurity),
            &mut self.parent,
        )
    }
}

/// `ClassLayout` table row (0x0F). Sorted by `parent`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassLayoutRow {
    /// Field alignment
    pub packing_size: u16,
    /// Total size of the type
    pub class_size: u32,
    /// The `TypeDef` the layout applies to
    pub parent: TableIndex,
}

impl MetadataRow for ClassLayoutRow {
    const TABLE: TableId = TableId::ClassLayout;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("parent", ReferenceTarget::Table(TableId::TypeDef), &mut self.parent)
    }
}

/// `FieldLayout` table row (0x10). Sorted by `field`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayoutRow {
    /// Byte offset of the field
    pub field_offset: u32,
    /// The `Field` row
    pub field: TableIndex,
}

impl MetadataRow for FieldLayoutRow {
    const TABLE: TableId = TableId::FieldLayout;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("field", ReferenceTarget::Table(TableId::Field), &mut self.field)
    }
}

/// `StandAloneSig` table row (0x11).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StandAloneSigRow {
    /// The signature
    pub signature: StandAloneSignature,
}

impl MetadataRow for StandAloneSigRow {
    const TABLE: TableId = TableId::StandAloneSig;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.signature("signature", |walker| walker.stand_alone(&mut self.signature))
    }
}

/// `EventMap` table row (0x12).
#[derive(Debug, Clone, PartialEq)]
pub struct EventMapRow {
    /// The owning `TypeDef`
    pub parent: TableIndex,
    /// First row of the event run in `Event`
    pub event_list: TableIndex,
}

impl MetadataRow for EventMapRow {
    const TABLE: TableId = TableId::EventMap;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("parent", ReferenceTarget::Table(TableId::TypeDef), &mut self.parent)?;
        visitor.reference(
            "event_list",
            ReferenceTarget::List(TableId::Event),
            &mut self.event_list,
        )
    }
}

/// `EventPtr` table row (0x13).
#[derive(Debug, Clone, PartialEq)]
pub struct EventPtrRow {
    /// The `Event` row
    pub event: TableIndex,
}

impl MetadataRow for EventPtrRow {
    const TABLE: TableId = TableId::EventPtr;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("event", ReferenceTarget::Table(TableId::Event), &mut self.event)
    }
}

/// `Event` table row (0x14).
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    /// `EventAttributes`
    pub flags: u16,
    /// Event name
    pub name: String,
    /// `TypeDefOrRef` delegate type
    pub event_type: Option<TableIndex>,
}

impl MetadataRow for EventRow {
    const TABLE: TableId = TableId::Event;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.optional(
            "event_type",
            ReferenceTarget::Coded(CodedIndexType::TypeDefOrRef),
            &mut self.event_type,
        )
    }
}

/// `PropertyMap` table row (0x15).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMapRow {
    /// The owning `TypeDef`
    pub parent: TableIndex,
    /// First row of the property run in `Property`
    pub property_list: TableIndex,
}

impl MetadataRow for PropertyMapRow {
    const TABLE: TableId = TableId::PropertyMap;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("parent", ReferenceTarget::Table(TableId::TypeDef), &mut self.parent)?;
        visitor.reference(
            "property_list",
            ReferenceTarget::List(TableId::Property),
            &mut self.property_list,
        )
    }
}

/// `PropertyPtr` table row (0x16).
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPtrRow {
    /// The `Property` row
    pub property: TableIndex,
}

impl MetadataRow for PropertyPtrRow {
    const TABLE: TableId = TableId::PropertyPtr;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "property",
            ReferenceTarget::Table(TableId::Property),
            &mut self.property,
        )
    }
}

/// `Property` table row (0x17).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyRow {
    /// `PropertyAttributes`
    pub flags: u16,
    /// Property name
    pub name: String,
    /// Property signature
    pub signature: SignatureProperty,
}

impl MetadataRow for PropertyRow {
    const TABLE: TableId = TableId::Property;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.signature("signature", |walker| walker.property(&mut self.signature))
    }
}

/// `MethodSemantics` table row (0x18). Sorted by `association`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSemanticsRow {
    /// `MethodSemanticsAttributes`
    pub semantics: u16,
    /// The accessor `MethodDef`
    pub method: TableIndex,
    /// `HasSemantics` event or property
    pub association: TableIndex,
}

impl MetadataRow for MethodSemanticsRow {
    const TABLE: TableId = TableId::MethodSemantics;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "method",
            ReferenceTarget::Table(TableId::MethodDef),
            &mut self.method,
        )?;
        visitor.reference(
            "association",
            ReferenceTarget::Coded(CodedIndexType::HasSemantics),
            &mut self.association,
        )
    }
}

/// `MethodImpl` table row (0x19). Sorted by `class`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodImplRow {
    /// The `TypeDef` containing the override
    pub class: TableIndex,
    /// `MethodDefOrRef` implementation
    pub method_body: TableIndex,
    /// `MethodDefOrRef` overridden declaration
    pub method_declaration: TableIndex,
}

impl MetadataRow for MethodImplRow {
    const TABLE: TableId = TableId::MethodImpl;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("class", ReferenceTarget::Table(TableId::TypeDef), &mut self.class)?;
        visitor.reference(
            "method_body",
            ReferenceTarget::Coded(CodedIndexType::MethodDefOrRef),
            &mut self.method_body,
        )?;
        visitor.reference(
            "method_declaration",
            ReferenceTarget::Coded(CodedIndexType::MethodDefOrRef),
            &mut self.method_declaration,
        )
    }
}

/// `ModuleRef` table row (0x1A).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleRefRow {
    /// Module name
    pub name: String,
}

no_references!(ModuleRefRow, TableId::ModuleRef);

/// `TypeSpec` table row (0x1B).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeSpecRow {
    /// The specified type
    pub signature: SignatureTypeSpec,
}

impl MetadataRow for TypeSpecRow {
    const TABLE: TableId = TableId::TypeSpec;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.signature("signature", |walker| walker.type_spec(&mut self.signature))
    }
}

/// `ImplMap` table row (0x1C). Sorted by `member_forwarded`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImplMapRow {
    /// `PInvokeAttributes`
    pub mapping_flags: u16,
    /// `MemberForwarded` field or method
    pub member_forwarded: TableIndex,
    /// Entry point name
    pub import_name: String,
    /// The `ModuleRef` of the native library
    pub import_scope: TableIndex,
}

impl MetadataRow for ImplMapRow {
    const TABLE: TableId = TableId::ImplMap;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "member_forwarded",
            ReferenceTarget::Coded(CodedIndexType::MemberForwarded),
            &mut self.member_forwarded,
        )?;
        visitor.reference(
            "import_scope",
            ReferenceTarget::Table(TableId::ModuleRef),
            &mut self.import_scope,
        )
    }
}

/// `FieldRVA` table row (0x1D). Sorted by `field`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRvaRow {
    /// RVA of the initial data
    pub rva: u32,
    /// The `Field` row
    pub field: TableIndex,
}

impl MetadataRow for FieldRvaRow {
    const TABLE: TableId = TableId::FieldRVA;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference("field", ReferenceTarget::Table(TableId::Field), &mut self.field)
    }
}

/// `Assembly` table row (0x20).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyRow {
    /// Hash algorithm id
    pub hash_alg_id: u32,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags`
    pub flags: u32,
    /// Public key
    pub public_key: Vec<u8>,
    /// Assembly name
    pub name: String,
    /// Culture
    pub culture: String,
}

no_references!(AssemblyRow, TableId::Assembly);

/// `AssemblyProcessor` table row (0x21).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyProcessorRow {
    /// Processor id
    pub processor: u32,
}

no_references!(AssemblyProcessorRow, TableId::AssemblyProcessor);

/// `AssemblyOS` table row (0x22).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyOsRow {
    /// Platform id
    pub os_platform_id: u32,
    /// OS major version
    pub os_major_version: u32,
    /// OS minor version
    pub os_minor_version: u32,
}

no_references!(AssemblyOsRow, TableId::AssemblyOS);

/// `AssemblyRef` table row (0x23).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssemblyRefRow {
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags`
    pub flags: u32,
    /// Public key or public key token
    pub public_key_or_token: Vec<u8>,
    /// Assembly name
    pub name: String,
    /// Culture
    pub culture: String,
    /// Hash of the referenced assembly
    pub hash_value: Vec<u8>,
}

no_references!(AssemblyRefRow, TableId::AssemblyRef);

/// `AssemblyRefProcessor` table row (0x24).
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyRefProcessorRow {
    /// Processor id
    pub processor: u32,
    /// The `AssemblyRef` row
    pub assembly_ref: TableIndex,
}

impl MetadataRow for AssemblyRefProcessorRow {
    const TABLE: TableId = TableId::AssemblyRefProcessor;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "assembly_ref",
            ReferenceTarget::Table(TableId::AssemblyRef),
            &mut self.assembly_ref,
        )
    }
}

/// `AssemblyRefOS` table row (0x25).
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyRefOsRow {
    /// Platform id
    pub os_platform_id: u32,
    /// OS major version
    pub os_major_version: u32,
    /// OS minor version
    pub os_minor_version: u32,
    /// The `AssemblyRef` row
    pub assembly_ref: TableIndex,
}

impl MetadataRow for AssemblyRefOsRow {
    const TABLE: TableId = TableId::AssemblyRefOS;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "assembly_ref",
            ReferenceTarget::Table(TableId::AssemblyRef),
            &mut self.assembly_ref,
        )
    }
}

/// `File` table row (0x26).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileRow {
    /// `FileAttributes`
    pub flags: u32,
    /// File name
    pub name: String,
    /// Hash of the file
    pub hash_value: Vec<u8>,
}

no_references!(FileRow, TableId::File);

/// `ExportedType` table row (0x27).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTypeRow {
    /// `TypeAttributes`
    pub flags: u32,
    /// Hint: the `TypeDef` token in the module that defines the type. It names a row of a
    /// different module, so it is carried as an opaque value.
    pub type_def_id: u32,
    /// Type name
    pub name: String,
    /// Type namespace
    pub namespace: String,
    /// `Implementation`: `File`, `AssemblyRef` or the enclosing `ExportedType`
    pub implementation: TableIndex,
}

impl MetadataRow for ExportedTypeRow {
    const TABLE: TableId = TableId::ExportedType;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "implementation",
            ReferenceTarget::Coded(CodedIndexType::Implementation),
            &mut self.implementation,
        )
    }
}

/// `ManifestResource` table row (0x28).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManifestResourceRow {
    /// Offset of the resource in the resource section
    pub offset: u32,
    /// `ManifestResourceAttributes`
    pub flags: u32,
    /// Resource name
    pub name: String,
    /// `Implementation`; `None` for resources embedded in this file
    pub implementation: Option<TableIndex>,
}

impl MetadataRow for ManifestResourceRow {
    const TABLE: TableId = TableId::ManifestResource;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.optional(
            "implementation",
            ReferenceTarget::Coded(CodedIndexType::Implementation),
            &mut self.implementation,
        )
    }
}

/// `NestedClass` table row (0x29). Sorted by `nested_class`.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedClassRow {
    /// The nested `TypeDef`
    pub nested_class: TableIndex,
    /// The enclosing `TypeDef`
    pub enclosing_class: TableIndex,
}

impl MetadataRow for NestedClassRow {
    const TABLE: TableId = TableId::NestedClass;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "nested_class",
            ReferenceTarget::Table(TableId::TypeDef),
            &mut self.nested_class,
        )?;
        visitor.reference(
            "enclosing_class",
            ReferenceTarget::Table(TableId::TypeDef),
            &mut self.enclosing_class,
        )
    }
}

/// `GenericParam` table row (0x2A). Sorted by `owner`, then `number`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParamRow {
    /// Zero-based position in the owner's parameter list
    pub number: u16,
    /// `GenericParamAttributes`
    pub flags: u16,
    /// `TypeOrMethodDef` owner
    pub owner: TableIndex,
    /// Parameter name
    pub name: String,
}

impl MetadataRow for GenericParamRow {
    const TABLE: TableId = TableId::GenericParam;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "owner",
            ReferenceTarget::Coded(CodedIndexType::TypeOrMethodDef),
            &mut self.owner,
        )
    }
}

/// `MethodSpec` table row (0x2B).
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpecRow {
    /// `MethodDefOrRef` generic method
    pub method: TableIndex,
    /// Type arguments
    pub instantiation: SignatureMethodSpec,
}

impl MetadataRow for MethodSpecRow {
    const TABLE: TableId = TableId::MethodSpec;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "method",
            ReferenceTarget::Coded(CodedIndexType::MethodDefOrRef),
            &mut self.method,
        )?;
        visitor.signature("instantiation", |walker| {
            walker.method_spec(&mut self.instantiation)
        })
    }
}

/// `GenericParamConstraint` table row (0x2C). Sorted by `owner`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParamConstraintRow {
    /// The constrained `GenericParam`
    pub owner: TableIndex,
    /// `TypeDefOrRef` constraint type
    pub constraint: TableIndex,
}

impl MetadataRow for GenericParamConstraintRow {
    const TABLE: TableId = TableId::GenericParamConstraint;

    fn visit_references_mut(&mut self, visitor: &mut RowVisitor<'_>) -> Result<()> {
        visitor.reference(
            "owner",
            ReferenceTarget::Table(TableId::GenericParam),
            &mut self.owner,
        )?;
        visitor.reference(
            "constraint",
            ReferenceTarget::Coded(CodedIndexType::TypeDefOrRef),
            &mut self.constraint,
        )
    }
}
