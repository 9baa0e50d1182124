// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

//! # cilsort
//!
//! Table ordering, duplicate merging and cross-reference remapping for ECMA-335 (.NET) metadata.
//!
//! After a tool has added, removed or rewritten rows of a .NET module's metadata tables, the
//! tables are no longer in a state that can be written back to an image: tables that the format
//! requires to be sorted are out of order, equivalent type specifications and member references
//! may exist several times, and every reorder of a table invalidates the row references held by
//! other rows, by signatures, and by the instruction streams of method bodies. `cilsort` fixes
//! all of that in one atomic pass.
//!
//! ## Features
//!
//! - **Complete reference coverage** - table columns, signature trees, IL token operands,
//!   exception clauses and local signatures are all found by one reference visitor
//! - **Context-aware deduplication** - rows are merged on structural equality that looks through
//!   references into other content-identified rows
//! - **Format-exact ordering** - sorted tables are keyed by their on-disk coded index values
//! - **Atomic** - the pass works on a copy; on error the input is untouched
//! - **Parallel batches** - independent modules are processed concurrently with `rayon`
//!
//! ## Quick Start
//!
//! ```rust
//! use cilsort::prelude::*;
//!
//! let mut metadata = CilMetadata::default();
//! // ... populated by an image reader, then edited ...
//! let report = reorder_and_update(&mut metadata)?;
//! println!("merged {} rows, sorted {:?}", report.total_merged(), report.moved_tables());
//! # Ok::<(), cilsort::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - the in-memory model: tables, rows, signatures and method bodies
//! - [`reorder`] - the pass: reference visitor, duplicate detector, table sorter, index
//!   remapper, verification and the orchestrating [`reorder_with_config`]
//! - [`Error`] - the crate-wide error type
//!
//! Reading and writing images, opcode decoding and heap management are the job of the
//! surrounding tool. This crate consumes and produces the decoded [`CilMetadata`] model only.
//!
//! ## Logging
//!
//! The pass emits `tracing` spans and events at `debug` and `trace` level. No subscriber is
//! installed; attach one in the application to see them.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use cilsort::prelude::*;
///
/// let mut metadata = CilMetadata::default();
/// let report = reorder_and_update(&mut metadata)?;
/// assert!(report.is_noop());
/// # Ok::<(), cilsort::Error>(())
/// ```
pub mod prelude;

/// The in-memory metadata model.
pub mod metadata;

/// The reorder pass and its building blocks.
pub mod reorder;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilsort` Error type
///
/// # Examples
///
/// ```rust
/// use cilsort::{reorder_and_update, CilMetadata, Error};
///
/// let mut metadata = CilMetadata::default();
/// match reorder_and_update(&mut metadata) {
///     Ok(_) => println!("done"),
///     Err(Error::DanglingReference { site, .. }) => println!("broken reference at {site}"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use metadata::tables::{CilMetadata, TableId, TableIndex};
pub use reorder::{
    reorder_all, reorder_and_update, reorder_with_config, ReorderConfig, ReorderReport, RowMap,
};
