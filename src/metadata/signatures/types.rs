//! The signature tree.
//!
//! Signatures are decoded once by the image codec and stored inline in the rows that own them.
//! Every reference a signature makes to a table row is a [`TableIndex`], so the tree can be
//! rewritten in place when rows move.

use crate::metadata::tables::TableIndex;

/// Size and lower bound of one dimension of a general array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayDimensions {
    /// Number of elements, if specified
    pub size: Option<u32>,
    /// Lower bound, if specified
    pub lower_bound: Option<i32>,
}

/// A `modreq` / `modopt` custom modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomModifier {
    /// `true` for `modreq`, `false` for `modopt`
    pub is_required: bool,
    /// `TypeDefOrRef` reference to the modifier type
    pub modifier_type: TableIndex,
}

/// A type as it appears inside a signature (ECMA-335 II.23.2.12).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    /// Placeholder produced when the codec could not classify an element. Never valid input
    /// for the reorder pass.
    Unknown,
    /// `void`
    #[default]
    Void,
    /// `bool`
    Boolean,
    /// `char`
    Char,
    /// `int8`
    I1,
    /// `unsigned int8`
    U1,
    /// `int16`
    I2,
    /// `unsigned int16`
    U2,
    /// `int32`
    I4,
    /// `unsigned int32`
    U4,
    /// `int64`
    I8,
    /// `unsigned int64`
    U8,
    /// `float32`
    R4,
    /// `float64`
    R8,
    /// `string`
    String,
    /// Native integer
    I,
    /// Native unsigned integer
    U,
    /// `object`
    Object,
    /// `typedref`
    TypedByRef,
    /// Unmanaged pointer
    Ptr(SignaturePointer),
    /// Managed pointer
    ByRef(Box<TypeSignature>),
    /// `TypeDefOrRef` reference to a value type
    ValueType(TableIndex),
    /// `TypeDefOrRef` reference to a reference type
    Class(TableIndex),
    /// `!n` - generic parameter of the enclosing type
    GenericParamType(u32),
    /// `!!n` - generic parameter of the enclosing method
    GenericParamMethod(u32),
    /// General (multi-dimensional) array
    Array(SignatureArray),
    /// Single dimension, zero based array
    SzArray(SignatureSzArray),
    /// Generic instantiation; the base is always `Class` or `ValueType`
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// `ELEMENT_TYPE_INTERNAL`, only emitted by the runtime itself. Never valid input for the
    /// reorder pass.
    Internal,
}

impl TypeSignature {
    /// Short name of the node kind, used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeSignature::Unknown => "Unknown",
            TypeSignature::Void => "Void",
            TypeSignature::Boolean => "Boolean",
            TypeSignature::Char => "Char",
            TypeSignature::I1 => "I1",
            TypeSignature::U1 => "U1",
            TypeSignature::I2 => "I2",
            TypeSignature::U2 => "U2",
            TypeSignature::I4 => "I4",
            TypeSignature::U4 => "U4",
            TypeSignature::I8 => "I8",
            TypeSignature::U8 => "U8",
            TypeSignature::R4 => "R4",
            TypeSignature::R8 => "R8",
            TypeSignature::String => "String",
            TypeSignature::I => "I",
            TypeSignature::U => "U",
            TypeSignature::Object => "Object",
            TypeSignature::TypedByRef => "TypedByRef",
            TypeSignature::Ptr(_) => "Ptr",
            TypeSignature::ByRef(_) => "ByRef",
            TypeSignature::ValueType(_) => "ValueType",
            TypeSignature::Class(_) => "Class",
            TypeSignature::GenericParamType(_) => "GenericParamType",
            TypeSignature::GenericParamMethod(_) => "GenericParamMethod",
            TypeSignature::Array(_) => "Array",
            TypeSignature::SzArray(_) => "SzArray",
            TypeSignature::GenericInst(_, _) => "GenericInst",
            TypeSignature::FnPtr(_) => "FnPtr",
            TypeSignature::Internal => "Internal",
        }
    }

    /// Whether the node is one of the primitive element types.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeSignature::Void
                | TypeSignature::Boolean
                | TypeSignature::Char
                | TypeSignature::I1
                | TypeSignature::U1
                | TypeSignature::I2
                | TypeSignature::U2
                | TypeSignature::I4
                | TypeSignature::U4
                | TypeSignature::I8
                | TypeSignature::U8
                | TypeSignature::R4
                | TypeSignature::R8
                | TypeSignature::String
                | TypeSignature::I
                | TypeSignature::U
                | TypeSignature::Object
                | TypeSignature::TypedByRef
        )
    }
}

/// General array: element type, rank and per-dimension bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
    /// Bounds of the dimensions that specify any
    pub dimensions: Vec<ArrayDimensions>,
}

/// Single dimension, zero based array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureSzArray {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Element type
    pub base: Box<TypeSignature>,
}

/// Unmanaged pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignaturePointer {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Pointee type
    pub base: Box<TypeSignature>,
}

/// Return type or parameter of a method signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureParameter {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Passed by reference
    pub by_ref: bool,
    /// The type
    pub base: TypeSignature,
}

impl SignatureParameter {
    /// A parameter of the given type without modifiers.
    #[must_use]
    pub fn new(base: TypeSignature) -> Self {
        SignatureParameter {
            modifiers: Vec::new(),
            by_ref: false,
            base,
        }
    }
}

/// Method signature, used for both `MethodDefSig` and `MethodRefSig` (II.23.2.1, II.23.2.2).
///
/// A method-definition signature never has `varargs`; a method-reference signature to a
/// vararg method lists the extra arguments after the sentinel in `varargs`.
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureMethod {
    /// Instance method (`HASTHIS`)
    pub has_this: bool,
    /// `this` is passed explicitly (`EXPLICITTHIS`)
    pub explicit_this: bool,
    /// Managed calling convention
    pub default: bool,
    /// Managed vararg calling convention
    pub vararg: bool,
    /// Unmanaged `cdecl`
    pub cdecl: bool,
    /// Unmanaged `stdcall`
    pub stdcall: bool,
    /// Unmanaged `thiscall`
    pub thiscall: bool,
    /// Unmanaged `fastcall`
    pub fastcall: bool,
    /// Number of generic parameters of a generic method
    pub param_count_generic: u32,
    /// Return type
    pub return_type: SignatureParameter,
    /// Fixed parameters
    pub params: Vec<SignatureParameter>,
    /// Arguments after the sentinel of a vararg call site
    pub varargs: Vec<SignatureParameter>,
}

/// Field signature (II.23.2.4).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureField {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Field type
    pub base: TypeSignature,
}

/// Property signature (II.23.2.5).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureProperty {
    /// Instance property
    pub has_this: bool,
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Property type
    pub base: TypeSignature,
    /// Index parameters
    pub params: Vec<SignatureParameter>,
}

/// Local variables signature (II.23.2.6).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureLocalVariables {
    /// The locals, in slot order
    pub locals: Vec<SignatureLocalVariable>,
}

/// One local variable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureLocalVariable {
    /// Custom modifiers
    pub modifiers: Vec<CustomModifier>,
    /// Managed pointer
    pub is_byref: bool,
    /// Pinned for the lifetime of the frame
    pub is_pinned: bool,
    /// The type
    pub base: TypeSignature,
}

/// Type specification (II.23.2.14).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureTypeSpec {
    /// The specified type
    pub base: TypeSignature,
}

/// Generic method instantiation (II.23.2.15).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureMethodSpec {
    /// Type arguments
    pub generic_args: Vec<TypeSignature>,
}

/// The signature of a `MemberRef` row, which is either a method or a field reference.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberRefSignature {
    /// Reference to a method
    Method(SignatureMethod),
    /// Reference to a field
    Field(SignatureField),
}

impl Default for MemberRefSignature {
    fn default() -> Self {
        MemberRefSignature::Method(SignatureMethod::default())
    }
}

/// The signature of a `StandAloneSig` row.
///
/// Method bodies refer to local variable signatures, `calli` refers to method signatures; some
/// compilers also emit field signatures here for debugging purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum StandAloneSignature {
    /// Call site signature of `calli`
    Method(SignatureMethod),
    /// Locals of a method body
    LocalVariables(SignatureLocalVariables),
    /// Field signature
    Field(SignatureField),
}

impl Default for StandAloneSignature {
    fn default() -> Self {
        StandAloneSignature::LocalVariables(SignatureLocalVariables::default())
    }
}
