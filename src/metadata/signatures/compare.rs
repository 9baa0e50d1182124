//! Context-aware structural comparison and hashing of signatures and content-identity rows.
//!
//! Two references are equal when they point at the same row, or when they point into a table
//! whose rows are identified by their content (see [`TableId::is_content_identity`]) and the two
//! rows have equal content. Content equality recurses through the referenced rows, so a
//! `TypeSpec` for `List<Foo>` equals another `TypeSpec` for `List<Foo>` even when the two refer
//! to different, duplicate `TypeRef` rows for `Foo`.
//!
//! Rows of all other tables are identified by position. Comparing them by content would merge
//! distinct definitions that merely look alike.
//!
//! # Termination
//!
//! Content recursion can revisit a row, e.g. a `TypeRef` whose resolution scope chain loops back
//! to itself. The comparer tracks the pairs currently under comparison and treats re-entering one
//! as "not equal", and it gives up with "not equal" once the nesting bound is reached. Both only
//! ever prevent a merge; they never cause one.

use std::{
    collections::{hash_map::DefaultHasher, HashSet},
    hash::{Hash, Hasher},
    mem,
};

use crate::metadata::{
    signatures::{
        CustomModifier, MemberRefSignature, SignatureField, SignatureLocalVariable,
        SignatureLocalVariables, SignatureMethod, SignatureMethodSpec, SignatureParameter,
        StandAloneSignature, TypeSignature,
    },
    tables::{CilMetadata, TableId, TableIndex},
};

/// Structural equality over signatures and rows, resolved against one metadata instance.
///
/// A comparer borrows the metadata read-only and keeps per-comparison state, so create one per
/// batch of comparisons on the same thread.
pub struct SignatureComparer<'m> {
    metadata: &'m CilMetadata,
    max_depth: usize,
    depth: usize,
    in_progress: HashSet<(TableIndex, TableIndex)>,
}

impl<'m> SignatureComparer<'m> {
    /// Creates a comparer over `metadata` that gives up (with "not equal") below `max_depth`
    /// nested levels.
    #[must_use]
    pub fn new(metadata: &'m CilMetadata, max_depth: usize) -> Self {
        SignatureComparer {
            metadata,
            max_depth,
            depth: 0,
            in_progress: HashSet::new(),
        }
    }

    /// Compares two rows of the same table.
    pub fn rows_equal(&mut self, table: TableId, a: u32, b: u32) -> bool {
        self.indices_equal(TableIndex::new(table, a), TableIndex::new(table, b))
    }

    /// Compares two references.
    pub fn indices_equal(&mut self, a: TableIndex, b: TableIndex) -> bool {
        if a == b {
            return true;
        }
        if a.table != b.table || !a.table.is_content_identity() {
            return false;
        }

        let key = if a < b { (a, b) } else { (b, a) };
        if !self.in_progress.insert(key) {
            return false;
        }

        let equal = self.nested(|this| this.row_contents_equal(a.table, a.row, b.row));
        self.in_progress.remove(&key);
        equal
    }

    fn nested(&mut self, compare: impl FnOnce(&mut Self) -> bool) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }

        self.depth += 1;
        let equal = compare(self);
        self.depth -= 1;
        equal
    }

    fn optional_indices_equal(&mut self, a: Option<TableIndex>, b: Option<TableIndex>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.indices_equal(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn row_contents_equal(&mut self, table: TableId, a: u32, b: u32) -> bool {
        let metadata = self.metadata;
        let (a, b) = (a as usize, b as usize);

        match table {
            TableId::TypeRef => match (metadata.type_refs.get(a), metadata.type_refs.get(b)) {
                (Some(x), Some(y)) => {
                    x.type_name == y.type_name
                        && x.type_namespace == y.type_namespace
                        && self.optional_indices_equal(x.resolution_scope, y.resolution_scope)
                }
                _ => false,
            },
            TableId::TypeSpec => match (metadata.type_specs.get(a), metadata.type_specs.get(b)) {
                (Some(x), Some(y)) => self.types_equal(&x.signature.base, &y.signature.base),
                _ => false,
            },
            TableId::MemberRef => match (metadata.member_refs.get(a), metadata.member_refs.get(b))
            {
                (Some(x), Some(y)) => {
                    x.name == y.name
                        && self.indices_equal(x.class, y.class)
                        && self.member_refs_equal(&x.signature, &y.signature)
                }
                _ => false,
            },
            TableId::MethodSpec => {
                match (metadata.method_specs.get(a), metadata.method_specs.get(b)) {
                    (Some(x), Some(y)) => {
                        self.indices_equal(x.method, y.method)
                            && self.method_specs_equal(&x.instantiation, &y.instantiation)
                    }
                    _ => false,
                }
            }
            TableId::StandAloneSig => {
                match (
                    metadata.stand_alone_sigs.get(a),
                    metadata.stand_alone_sigs.get(b),
                ) {
                    (Some(x), Some(y)) => self.stand_alones_equal(&x.signature, &y.signature),
                    _ => false,
                }
            }
            TableId::ModuleRef => match (metadata.module_refs.get(a), metadata.module_refs.get(b))
            {
                (Some(x), Some(y)) => x.name == y.name,
                _ => false,
            },
            _ => false,
        }
    }

    /// Compares two type signatures.
    pub fn types_equal(&mut self, a: &TypeSignature, b: &TypeSignature) -> bool {
        self.nested(|this| this.types_equal_inner(a, b))
    }

    fn types_equal_inner(&mut self, a: &TypeSignature, b: &TypeSignature) -> bool {
        match (a, b) {
            (TypeSignature::Class(x), TypeSignature::Class(y))
            | (TypeSignature::ValueType(x), TypeSignature::ValueType(y)) => {
                self.indices_equal(*x, *y)
            }
            (TypeSignature::Ptr(x), TypeSignature::Ptr(y)) => {
                self.modifiers_equal(&x.modifiers, &y.modifiers)
                    && self.types_equal(&x.base, &y.base)
            }
            (TypeSignature::ByRef(x), TypeSignature::ByRef(y)) => self.types_equal(x, y),
            (TypeSignature::SzArray(x), TypeSignature::SzArray(y)) => {
                self.modifiers_equal(&x.modifiers, &y.modifiers)
                    && self.types_equal(&x.base, &y.base)
            }
            (TypeSignature::Array(x), TypeSignature::Array(y)) => {
                x.rank == y.rank
                    && x.dimensions == y.dimensions
                    && self.types_equal(&x.base, &y.base)
            }
            (TypeSignature::GenericInst(x, x_args), TypeSignature::GenericInst(y, y_args)) => {
                x_args.len() == y_args.len()
                    && self.types_equal(x, y)
                    && x_args
                        .iter()
                        .zip(y_args)
                        .all(|(x, y)| self.types_equal(x, y))
            }
            (TypeSignature::FnPtr(x), TypeSignature::FnPtr(y)) => self.methods_equal(x, y),
            (TypeSignature::GenericParamType(x), TypeSignature::GenericParamType(y))
            | (TypeSignature::GenericParamMethod(x), TypeSignature::GenericParamMethod(y)) => {
                x == y
            }
            (x, y) => x.is_primitive() && x == y,
        }
    }

    fn modifiers_equal(&mut self, a: &[CustomModifier], b: &[CustomModifier]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                x.is_required == y.is_required
                    && self.indices_equal(x.modifier_type, y.modifier_type)
            })
    }

    fn parameters_equal(&mut self, a: &[SignatureParameter], b: &[SignatureParameter]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(x, y)| {
                x.by_ref == y.by_ref
                    && self.modifiers_equal(&x.modifiers, &y.modifiers)
                    && self.types_equal(&x.base, &y.base)
            })
    }

    /// Compares two method signatures, calling convention included.
    pub fn methods_equal(&mut self, a: &SignatureMethod, b: &SignatureMethod) -> bool {
        a.has_this == b.has_this
            && a.explicit_this == b.explicit_this
            && a.default == b.default
            && a.vararg == b.vararg
            && a.cdecl == b.cdecl
            && a.stdcall == b.stdcall
            && a.thiscall == b.thiscall
            && a.fastcall == b.fastcall
            && a.param_count_generic == b.param_count_generic
            && self.parameters_equal(
                std::slice::from_ref(&a.return_type),
                std::slice::from_ref(&b.return_type),
            )
            && self.parameters_equal(&a.params, &b.params)
            && self.parameters_equal(&a.varargs, &b.varargs)
    }

    fn fields_equal(&mut self, a: &SignatureField, b: &SignatureField) -> bool {
        self.modifiers_equal(&a.modifiers, &b.modifiers) && self.types_equal(&a.base, &b.base)
    }

    fn locals_equal(&mut self, a: &SignatureLocalVariables, b: &SignatureLocalVariables) -> bool {
        let local_equal =
            |this: &mut Self, x: &SignatureLocalVariable, y: &SignatureLocalVariable| {
                x.is_byref == y.is_byref
                    && x.is_pinned == y.is_pinned
                    && this.modifiers_equal(&x.modifiers, &y.modifiers)
                    && this.types_equal(&x.base, &y.base)
            };

        a.locals.len() == b.locals.len()
            && a.locals
                .iter()
                .zip(&b.locals)
                .all(|(x, y)| local_equal(self, x, y))
    }

    fn member_refs_equal(&mut self, a: &MemberRefSignature, b: &MemberRefSignature) -> bool {
        match (a, b) {
            (MemberRefSignature::Method(x), MemberRefSignature::Method(y)) => {
                self.methods_equal(x, y)
            }
            (MemberRefSignature::Field(x), MemberRefSignature::Field(y)) => self.fields_equal(x, y),
            _ => false,
        }
    }

    fn method_specs_equal(&mut self, a: &SignatureMethodSpec, b: &SignatureMethodSpec) -> bool {
        a.generic_args.len() == b.generic_args.len()
            && a
                .generic_args
                .iter()
                .zip(&b.generic_args)
                .all(|(x, y)| self.types_equal(x, y))
    }

    fn stand_alones_equal(&mut self, a: &StandAloneSignature, b: &StandAloneSignature) -> bool {
        match (a, b) {
            (StandAloneSignature::Method(x), StandAloneSignature::Method(y)) => {
                self.methods_equal(x, y)
            }
            (StandAloneSignature::LocalVariables(x), StandAloneSignature::LocalVariables(y)) => {
                self.locals_equal(x, y)
            }
            (StandAloneSignature::Field(x), StandAloneSignature::Field(y)) => {
                self.fields_equal(x, y)
            }
            _ => false,
        }
    }
}

/// Structural hash consistent with [`SignatureComparer`]: rows the comparer finds equal always
/// hash the same.
///
/// References into content-identity tables are hashed by content, down to a nesting bound below
/// which only the table is hashed. Other references are hashed by position.
pub struct StructuralHasher<'m> {
    metadata: &'m CilMetadata,
    max_depth: usize,
}

impl<'m> StructuralHasher<'m> {
    /// Creates a hasher over `metadata` that stops descending after `max_depth` levels.
    #[must_use]
    pub fn new(metadata: &'m CilMetadata, max_depth: usize) -> Self {
        StructuralHasher {
            metadata,
            max_depth,
        }
    }

    /// Hashes the content of one row.
    #[must_use]
    pub fn hash_row(&self, table: TableId, row: u32) -> u64 {
        let mut state = DefaultHasher::new();
        self.row(&mut state, table, row, 0);
        state.finish()
    }

    /// Hashes a type signature.
    #[must_use]
    pub fn hash_type(&self, signature: &TypeSignature) -> u64 {
        let mut state = DefaultHasher::new();
        self.type_signature(&mut state, signature, 0);
        state.finish()
    }

    fn index(&self, state: &mut DefaultHasher, index: TableIndex, depth: usize) {
        index.table.hash(state);
        if !index.table.is_content_identity() {
            index.row.hash(state);
        } else if depth < self.max_depth {
            self.row(state, index.table, index.row, depth + 1);
        }
    }

    fn optional_index(&self, state: &mut DefaultHasher, index: Option<TableIndex>, depth: usize) {
        index.is_some().hash(state);
        if let Some(index) = index {
            self.index(state, index, depth);
        }
    }

    fn row(&self, state: &mut DefaultHasher, table: TableId, row: u32, depth: usize) {
        let metadata = self.metadata;
        let position = row as usize;

        match table {
            TableId::TypeRef => {
                if let Some(type_ref) = metadata.type_refs.get(position) {
                    type_ref.type_name.hash(state);
                    type_ref.type_namespace.hash(state);
                    self.optional_index(state, type_ref.resolution_scope, depth);
                }
            }
            TableId::TypeSpec => {
                if let Some(type_spec) = metadata.type_specs.get(position) {
                    self.type_signature(state, &type_spec.signature.base, depth);
                }
            }
            TableId::MemberRef => {
                if let Some(member_ref) = metadata.member_refs.get(position) {
                    member_ref.name.hash(state);
                    self.index(state, member_ref.class, depth);
                    match &member_ref.signature {
                        MemberRefSignature::Method(method) => {
                            0u8.hash(state);
                            self.method(state, method, depth);
                        }
                        MemberRefSignature::Field(field) => {
                            1u8.hash(state);
                            self.field(state, field, depth);
                        }
                    }
                }
            }
            TableId::MethodSpec => {
                if let Some(method_spec) = metadata.method_specs.get(position) {
                    self.index(state, method_spec.method, depth);
                    self.types(state, &method_spec.instantiation.generic_args, depth);
                }
            }
            TableId::StandAloneSig => {
                if let Some(stand_alone) = metadata.stand_alone_sigs.get(position) {
                    mem::discriminant(&stand_alone.signature).hash(state);
                    match &stand_alone.signature {
                        StandAloneSignature::Method(method) => self.method(state, method, depth),
                        StandAloneSignature::LocalVariables(locals) => {
                            locals.locals.len().hash(state);
                            for local in &locals.locals {
                                local.is_byref.hash(state);
                                local.is_pinned.hash(state);
                                self.modifiers(state, &local.modifiers, depth);
                                self.type_signature(state, &local.base, depth);
                            }
                        }
                        StandAloneSignature::Field(field) => self.field(state, field, depth),
                    }
                }
            }
            TableId::ModuleRef => {
                if let Some(module_ref) = metadata.module_refs.get(position) {
                    module_ref.name.hash(state);
                }
            }
            _ => row.hash(state),
        }
    }

    fn type_signature(&self, state: &mut DefaultHasher, signature: &TypeSignature, depth: usize) {
        mem::discriminant(signature).hash(state);
        if depth >= self.max_depth {
            return;
        }

        let depth = depth + 1;
        match signature {
            TypeSignature::Class(index) | TypeSignature::ValueType(index) => {
                self.index(state, *index, depth);
            }
            TypeSignature::Ptr(pointer) => {
                self.modifiers(state, &pointer.modifiers, depth);
                self.type_signature(state, &pointer.base, depth);
            }
            TypeSignature::ByRef(inner) => self.type_signature(state, inner, depth),
            TypeSignature::SzArray(array) => {
                self.modifiers(state, &array.modifiers, depth);
                self.type_signature(state, &array.base, depth);
            }
            TypeSignature::Array(array) => {
                array.rank.hash(state);
                for dimension in &array.dimensions {
                    dimension.size.hash(state);
                    dimension.lower_bound.hash(state);
                }
                self.type_signature(state, &array.base, depth);
            }
            TypeSignature::GenericInst(base, args) => {
                self.type_signature(state, base, depth);
                self.types(state, args, depth);
            }
            TypeSignature::FnPtr(method) => self.method(state, method, depth),
            TypeSignature::GenericParamType(number) | TypeSignature::GenericParamMethod(number) => {
                number.hash(state);
            }
            _ => {}
        }
    }

    fn types(&self, state: &mut DefaultHasher, signatures: &[TypeSignature], depth: usize) {
        signatures.len().hash(state);
        for signature in signatures {
            self.type_signature(state, signature, depth);
        }
    }

    fn modifiers(&self, state: &mut DefaultHasher, modifiers: &[CustomModifier], depth: usize) {
        modifiers.len().hash(state);
        for modifier in modifiers {
            modifier.is_required.hash(state);
            self.index(state, modifier.modifier_type, depth);
        }
    }

    fn parameter(&self, state: &mut DefaultHasher, parameter: &SignatureParameter, depth: usize) {
        parameter.by_ref.hash(state);
        self.modifiers(state, &parameter.modifiers, depth);
        self.type_signature(state, &parameter.base, depth);
    }

    fn method(&self, state: &mut DefaultHasher, method: &SignatureMethod, depth: usize) {
        [
            method.has_this,
            method.explicit_this,
            method.default,
            method.vararg,
            method.cdecl,
            method.stdcall,
            method.thiscall,
            method.fastcall,
        ]
        .hash(state);
        method.param_count_generic.hash(state);
        self.parameter(state, &method.return_type, depth);
        method.params.len().hash(state);
        for parameter in &method.params {
            self.parameter(state, parameter, depth);
        }
        method.varargs.len().hash(state);
        for parameter in &method.varargs {
            self.parameter(state, parameter, depth);
        }
    }

    fn field(&self, state: &mut DefaultHasher, field: &SignatureField, depth: usize) {
        self.modifiers(state, &field.modifiers, depth);
        self.type_signature(state, &field.base, depth);
    }
}
