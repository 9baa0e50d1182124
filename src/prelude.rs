//! # cilsort Prelude
//!
//! The types most users of the reorder pass need, for glob import.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilsort operations
pub use crate::Error;

/// The result type used throughout cilsort
pub use crate::Result;

// ================================================================================================
// Reorder Pass
// ================================================================================================

/// Entry points of the reorder pass
pub use crate::reorder::{reorder_all, reorder_and_update, reorder_with_config};

/// Pass configuration and results
pub use crate::reorder::{
    IndexRemapper, ReorderConfig, ReorderReport, RowMap, DEFAULT_MERGE_TABLES,
};

/// Reference enumeration
pub use crate::reorder::{
    collect_references, validate_references, visit_references, visit_references_mut, Location,
    ReferenceSite, ReferenceTarget,
};

// ================================================================================================
// Metadata Model
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Table identifiers, references and storage
pub use crate::metadata::tables::{
    CilMetadata, CodedIndexType, MetadataRow, RowCounts, TableId, TableIndex,
};

/// Row types of all tables
pub use crate::metadata::tables::{
    AssemblyOsRow, AssemblyProcessorRow, AssemblyRefOsRow, AssemblyRefProcessorRow,
    AssemblyRefRow, AssemblyRow, ClassLayoutRow, ConstantRow, CustomAttributeRow,
    DeclSecurityRow, EventMapRow, EventPtrRow, EventRow, ExportedTypeRow, FieldLayoutRow,
    FieldMarshalRow, FieldPtrRow, FieldRow, FieldRvaRow, FileRow, GenericParamConstraintRow,
    GenericParamRow, ImplMapRow, InterfaceImplRow, ManifestResourceRow, MemberRefRow,
    MethodDefRow, MethodImplRow, MethodPtrRow, MethodSemanticsRow, MethodSpecRow, ModuleRefRow,
    ModuleRow, NestedClassRow, ParamPtrRow, ParamRow, PropertyMapRow, PropertyPtrRow,
    PropertyRow, StandAloneSigRow, TypeDefRow, TypeRefRow, TypeSpecRow,
};

/// Signature trees and their comparison
pub use crate::metadata::signatures::{
    ArrayDimensions, CustomModifier, MemberRefSignature, SignatureArray, SignatureComparer,
    SignatureField, SignatureLocalVariable, SignatureLocalVariables, SignatureMethod,
    SignatureMethodSpec, SignatureParameter, SignaturePointer, SignatureProperty,
    SignatureSzArray, SignatureTypeSpec, StandAloneSignature, StructuralHasher, TypeSignature,
    DEFAULT_MAX_SIGNATURE_DEPTH,
};

/// Method bodies
pub use crate::metadata::method::{
    ExceptionHandler, ExceptionHandlerFlags, Immediate, Instruction, MethodBody, Operand,
};
