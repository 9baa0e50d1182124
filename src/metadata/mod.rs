//! Logical model of ECMA-335 metadata.
//!
//! This module contains everything the reorder engine operates on: the table rows, the decoded
//! signature trees embedded in them, and the decoded method bodies whose instruction operands
//! refer back into the tables.
//!
//! # Key Components
//!
//! - [`tables`] - Table identifiers, row references, coded index kinds and the row structures
//! - [`tables::CilMetadata`] - One dense `Vec` of rows per table
//! - [`signatures`] - Type and member signature trees, their traversal and comparison
//! - [`method`] - Method bodies, instructions and exception handlers
//! - [`token`] - The 32-bit table/row encoding used by IL operands
//!
//! # Examples
//!
//! ```rust
//! use cilsort::prelude::*;
//!
//! let mut metadata = CilMetadata::default();
//! metadata.type_specs.push(TypeSpecRow {
//!     signature: SignatureTypeSpec { base: TypeSignature::I4 },
//! });
//!
//! let index = TableIndex::new(TableId::TypeSpec, 0);
//! assert_eq!(index.to_token()?.value(), 0x1B00_0001);
//! # Ok::<(), cilsort::Error>(())
//! ```

/// Implementation of method bodies, instructions and exception handlers
pub mod method;
/// Implementation of method and type signatures
pub mod signatures;
/// Implementation of the .NET metadata tables
pub mod tables;
/// Commonly used metadata token type
pub mod token;
