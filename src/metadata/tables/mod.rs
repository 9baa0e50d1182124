//! Metadata tables as defined by ECMA-335 Partition II, Section 22.
//!
//! # Key Components
//!
//! - [`TableId`] - The tables this crate models, with their ECMA-335 ids
//! - [`TableIndex`] - A zero-based reference to a row of a table
//! - [`CodedIndexType`] - Which tables a polymorphic column admits, and its on-disk encoding
//! - [`MetadataRow`] - Implemented by every row type; enumerates the row's references
//! - [`CilMetadata`] - Storage for all rows of one module
//!
//! The edit-and-continue tables (`EncLog`, `EncMap`) and the portable PDB tables are not
//! modelled. Neither carries references the runtime resolves against the tables reordered here.

mod codedindex;
mod index;
mod rows;
mod storage;
mod tableid;

pub use codedindex::CodedIndexType;
pub use index::TableIndex;
pub use rows::*;
pub use storage::{CilMetadata, RowCounts};
pub use tableid::TableId;
