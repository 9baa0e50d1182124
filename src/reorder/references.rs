//! The reference visitor.
//!
//! Every row reference in a [`CilMetadata`] instance is reachable through exactly one
//! [`ReferenceSite`]: a row column, a slot inside a signature tree owned by a row, an instruction
//! operand, an exception clause's catch type, or a method body's local signature. The visitor
//! enumerates all of them in a fixed order (tables by id, rows by position, columns in
//! declaration order, signature slots in tree order) and hands each one out mutably, which is
//! what the index remapper uses to rewrite them in place.
//!
//! The visitor never follows a reference into the row it names. Cycles between rows therefore
//! cannot make it revisit anything; the only recursion is into signature trees, which is depth
//! bounded.

use std::fmt;

use strum::IntoEnumIterator;
use tracing::debug;

use crate::{
    metadata::{
        method::{MethodBody, Operand},
        signatures::IndexWalker,
        tables::{CilMetadata, CodedIndexType, TableId, TableIndex},
    },
    Error, Result,
};

/// Where a reference lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// A column, or a signature owned by a column, of a table row
    Row {
        /// Table of the owning row
        table: TableId,
        /// Position of the owning row
        row: u32,
    },
    /// The token operand of an instruction in a method body
    Operand {
        /// Owning `MethodDef` row
        method: u32,
        /// Position of the instruction in the body
        instruction: usize,
    },
    /// The catch type of an exception clause
    ExceptionHandler {
        /// Owning `MethodDef` row
        method: u32,
        /// Position of the clause in the body
        handler: usize,
    },
    /// The local variable signature of a method body
    LocalSignature {
        /// Owning `MethodDef` row
        method: u32,
    },
}

/// Which tables a reference may point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// Exactly one table
    Table(TableId),
    /// Any table of a coded index
    Coded(CodedIndexType),
    /// The first row of a run in one table. The row may equal the row count of the table, which
    /// denotes an empty run at the end.
    List(TableId),
    /// An IL token operand, see [`Operand::TOKEN_TABLES`]
    Operand,
}

impl ReferenceTarget {
    /// Whether a reference at this site may point into `table`.
    #[must_use]
    pub fn accepts(&self, table: TableId) -> bool {
        match self {
            ReferenceTarget::Table(target) | ReferenceTarget::List(target) => *target == table,
            ReferenceTarget::Coded(kind) => kind.accepts(table),
            ReferenceTarget::Operand => Operand::TOKEN_TABLES.contains(&table),
        }
    }

    /// Whether the one-past-the-end row is a valid value at this site.
    #[must_use]
    pub fn allows_end(&self) -> bool {
        matches!(self, ReferenceTarget::List(_))
    }
}

/// A place holding a [`TableIndex`], with what it may point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceSite {
    /// The owner of the reference
    pub location: Location,
    /// Column (or body part) name
    pub column: &'static str,
    /// What the reference may point to
    pub target: ReferenceTarget,
}

impl fmt::Display for ReferenceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Location::Row { table, row } => write!(f, "{table}[{row}].{}", self.column),
            Location::Operand {
                method,
                instruction,
            } => write!(
                f,
                "MethodDef[{method}].body.instructions[{instruction}].{}",
                self.column
            ),
            Location::ExceptionHandler { method, handler } => write!(
                f,
                "MethodDef[{method}].body.exception_handlers[{handler}].{}",
                self.column
            ),
            Location::LocalSignature { method } => {
                write!(f, "MethodDef[{method}].body.{}", self.column)
            }
        }
    }
}

/// Callback receiving every reference, mutably.
pub type ReferenceSink<'a> = dyn FnMut(&ReferenceSite, &mut TableIndex) -> Result<()> + 'a;

/// Cursor handed to [`crate::metadata::tables::MetadataRow::visit_references_mut`].
///
/// It knows which row is being visited, so row implementations only name their columns.
pub struct RowVisitor<'a> {
    sink: &'a mut ReferenceSink<'a>,
    max_signature_depth: usize,
    table: TableId,
    row: u32,
}

impl<'a> RowVisitor<'a> {
    /// Creates a visitor forwarding to `sink`. Signature trees nesting deeper than
    /// `max_signature_depth` fail with [`Error::RecursionLimit`].
    pub fn new(sink: &'a mut ReferenceSink<'a>, max_signature_depth: usize) -> Self {
        RowVisitor {
            sink,
            max_signature_depth,
            table: TableId::Module,
            row: 0,
        }
    }

    pub(crate) fn enter_row(&mut self, table: TableId, row: u32) {
        self.table = table;
        self.row = row;
    }

    fn row_site(&self, column: &'static str, target: ReferenceTarget) -> ReferenceSite {
        ReferenceSite {
            location: Location::Row {
                table: self.table,
                row: self.row,
            },
            column,
            target,
        }
    }

    /// Reports a required reference column.
    ///
    /// # Errors
    ///
    /// Returns whatever the sink returns.
    pub fn reference(
        &mut self,
        column: &'static str,
        target: ReferenceTarget,
        index: &mut TableIndex,
    ) -> Result<()> {
        let site = self.row_site(column, target);
        (self.sink)(&site, index)
    }

    /// Reports a nullable reference column; `None` is skipped.
    ///
    /// # Errors
    ///
    /// Returns whatever the sink returns.
    pub fn optional(
        &mut self,
        column: &'static str,
        target: ReferenceTarget,
        index: &mut Option<TableIndex>,
    ) -> Result<()> {
        match index {
            Some(index) => self.reference(column, target, index),
            None => Ok(()),
        }
    }

    /// Reports every reference inside a signature column. All of them are `TypeDefOrRef`.
    ///
    /// # Errors
    ///
    /// Returns whatever the sink returns, and the traversal errors of [`IndexWalker`].
    pub fn signature<F>(&mut self, column: &'static str, walk: F) -> Result<()>
    where
        F: FnOnce(&mut IndexWalker<'_>) -> Result<()>,
    {
        let site = self.row_site(column, ReferenceTarget::Coded(CodedIndexType::TypeDefOrRef));
        let sink = &mut *self.sink;
        let mut forward = |index: &mut TableIndex| sink(&site, index);
        let mut walker = IndexWalker::new(&mut forward, self.max_signature_depth);
        walk(&mut walker)
    }

    /// Reports the local signature, token operands and catch types of a method body.
    ///
    /// # Errors
    ///
    /// Returns whatever the sink returns, and [`Error::UnsupportedConstruct`] for a catch type on
    /// a clause that is not a typed catch.
    pub fn body(&mut self, body: &mut MethodBody) -> Result<()> {
        let method = self.row;

        if let Some(local_var_sig) = body.local_var_sig.as_mut() {
            let site = ReferenceSite {
                location: Location::LocalSignature { method },
                column: "local_var_sig",
                target: ReferenceTarget::Table(TableId::StandAloneSig),
            };
            (self.sink)(&site, local_var_sig)?;
        }

        for (instruction, inst) in body.instructions.iter_mut().enumerate() {
            if let Operand::Token(index) = &mut inst.operand {
                let site = ReferenceSite {
                    location: Location::Operand {
                        method,
                        instruction,
                    },
                    column: "operand",
                    target: ReferenceTarget::Operand,
                };
                (self.sink)(&site, index)?;
            }
        }

        for (handler, clause) in body.exception_handlers.iter_mut().enumerate() {
            let typed = clause.is_typed_catch();
            if let Some(catch_type) = clause.catch_type.as_mut() {
                let site = ReferenceSite {
                    location: Location::ExceptionHandler { method, handler },
                    column: "catch_type",
                    target: ReferenceTarget::Coded(CodedIndexType::TypeDefOrRef),
                };
                if !typed {
                    return Err(Error::UnsupportedConstruct(format!(
                        "{site} is set on a {:?} clause",
                        clause.flags
                    )));
                }
                (self.sink)(&site, catch_type)?;
            }
        }

        Ok(())
    }
}

/// Calls `sink` for every reference held anywhere in `metadata`, allowing it to be rewritten.
///
/// # Errors
///
/// Stops at the first error from `sink` or from a signature traversal.
pub fn visit_references_mut<F>(
    metadata: &mut CilMetadata,
    max_signature_depth: usize,
    mut sink: F,
) -> Result<()>
where
    F: FnMut(&ReferenceSite, &mut TableIndex) -> Result<()>,
{
    let mut visitor = RowVisitor::new(&mut sink, max_signature_depth);
    for table in TableId::iter() {
        metadata.visit_table_mut(table, &mut visitor)?;
    }
    Ok(())
}

/// Calls `sink` with every reference held anywhere in `metadata`, leaving it unchanged.
///
/// Same order and sites as [`visit_references_mut`].
///
/// # Errors
///
/// Stops at the first error from `sink` or from a signature traversal.
pub fn visit_references<F>(
    metadata: &CilMetadata,
    max_signature_depth: usize,
    mut sink: F,
) -> Result<()>
where
    F: FnMut(&ReferenceSite, TableIndex) -> Result<()>,
{
    let mut forward = |site: &ReferenceSite, index: &mut TableIndex| sink(site, *index);
    let mut visitor = RowVisitor::new(&mut forward, max_signature_depth);
    for table in TableId::iter() {
        metadata.visit_table(table, &mut visitor)?;
    }
    Ok(())
}

/// Lists every reference in `metadata` with its site, in visiting order.
///
/// # Errors
///
/// See [`visit_references`].
pub fn collect_references(
    metadata: &CilMetadata,
    max_signature_depth: usize,
) -> Result<Vec<(ReferenceSite, TableIndex)>> {
    let mut references = Vec::new();
    visit_references(metadata, max_signature_depth, |site, index| {
        references.push((*site, index));
        Ok(())
    })?;
    Ok(references)
}

/// Checks every reference before anything is rewritten.
///
/// Returns the number of references checked.
///
/// # Errors
///
/// - [`Error::DanglingReference`] for a row past the end of its table (past the row count for
///   list columns)
/// - [`Error::UnsupportedConstruct`] for a table the site does not admit, an unsupported
///   signature element or a misplaced catch type
/// - [`Error::RecursionLimit`] for an over-deep signature
pub fn validate_references(metadata: &CilMetadata, max_signature_depth: usize) -> Result<usize> {
    let counts = metadata.row_counts();
    let mut checked = 0usize;

    visit_references(metadata, max_signature_depth, |site, index| {
        if !site.target.accepts(index.table) {
            return Err(Error::UnsupportedConstruct(format!(
                "{site} cannot refer to table {}",
                index.table
            )));
        }

        let row_count = counts.get(index.table);
        if index.row > row_count || (index.row == row_count && !site.target.allows_end()) {
            return Err(Error::DanglingReference {
                site: site.to_string(),
                table: index.table,
                row: index.row,
                row_count,
            });
        }

        checked += 1;
        Ok(())
    })?;

    debug!(references = checked, "validated references");
    Ok(checked)
}
