//! Method and type signatures of .NET metadata.
//!
//! Signatures arrive here already decoded from their blobs. Each row that owns a signature stores
//! the tree inline, and every row reference inside the tree is a
//! [`TableIndex`](crate::metadata::tables::TableIndex), so signatures can be rewritten in place
//! when rows move.
//!
//! # Signature Types
//!
//! - **Method Signatures** - Parameter types, return types, and calling conventions
//! - **Field Signatures** - Field type information and modifiers
//! - **Property Signatures** - Property type and parameter information
//! - **LocalVar Signatures** - Local variable types within method bodies
//! - **TypeSpec Signatures** - Generic type instantiations and complex type references
//! - **MethodSpec Signatures** - Type arguments of a generic method instantiation
//!
//! # Operations
//!
//! - [`IndexWalker`] / `visit_indices_mut` - visit every embedded reference, mutably
//! - [`SignatureComparer`] - structural equality that looks through content-identity rows
//! - [`StructuralHasher`] - a hash consistent with that equality
//!
//! # Examples
//!
//! ```rust
//! use cilsort::prelude::*;
//!
//! let mut signature = TypeSignature::GenericInst(
//!     Box::new(TypeSignature::Class(TableIndex::new(TableId::TypeRef, 4))),
//!     vec![TypeSignature::ValueType(TableIndex::new(TableId::TypeDef, 2))],
//! );
//!
//! let mut found = Vec::new();
//! signature.visit_indices_mut(16, |index| {
//!     found.push(*index);
//!     Ok(())
//! })?;
//! assert_eq!(found.len(), 2);
//! # Ok::<(), cilsort::Error>(())
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 23.2 - Blobs and Signatures

mod compare;
mod types;
mod walk;

pub use compare::{SignatureComparer, StructuralHasher};
pub use types::*;
pub use walk::{IndexWalker, DEFAULT_MAX_SIGNATURE_DEPTH};
