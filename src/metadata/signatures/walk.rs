//! Mutable traversal of every [`TableIndex`] embedded in a signature tree.

use crate::{
    metadata::{
        signatures::{
            CustomModifier, MemberRefSignature, SignatureField, SignatureLocalVariables,
            SignatureMethod, SignatureMethodSpec, SignatureParameter, SignatureProperty,
            SignatureTypeSpec, StandAloneSignature, TypeSignature,
        },
        tables::TableIndex,
    },
    Error, Result,
};

/// Default nesting bound for signature traversal.
///
/// Real-world signatures rarely nest deeper than a handful of levels; this only exists to turn a
/// malformed, self-similar tree into an error instead of a stack overflow.
pub const DEFAULT_MAX_SIGNATURE_DEPTH: usize = 256;

/// Walks a signature tree and hands every embedded [`TableIndex`] to a callback.
///
/// Every index a signature holds is a `TypeDefOrRef` reference: class and value type nodes,
/// custom modifier types, and the same again inside generic arguments, array element types and
/// function pointer signatures. The walker visits each slot exactly once, in tree order.
///
/// The walker never follows an index into the tables, so a `TypeSpec` whose signature refers to
/// another `TypeSpec` is just a leaf here. Depth is still bounded, because the tree itself may be
/// arbitrarily deep.
pub struct IndexWalker<'a> {
    sink: &'a mut dyn FnMut(&mut TableIndex) -> Result<()>,
    max_depth: usize,
    depth: usize,
}

impl<'a> IndexWalker<'a> {
    /// Creates a walker reporting into `sink`, failing once nesting exceeds `max_depth`.
    pub fn new(sink: &'a mut dyn FnMut(&mut TableIndex) -> Result<()>, max_depth: usize) -> Self {
        IndexWalker {
            sink,
            max_depth,
            depth: 0,
        }
    }

    /// Walks a type.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedConstruct`] for `Unknown`, `Internal` and a generic instantiation whose
    /// base is not a class or value type, [`Error::RecursionLimit`] when nesting exceeds the
    /// bound, and whatever the callback returns.
    pub fn type_signature(&mut self, signature: &mut TypeSignature) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimit(self.max_depth));
        }

        self.depth += 1;
        let result = self.type_inner(signature);
        self.depth -= 1;
        result
    }

    fn type_inner(&mut self, signature: &mut TypeSignature) -> Result<()> {
        match signature {
            TypeSignature::Unknown | TypeSignature::Internal => Err(Error::UnsupportedConstruct(
                format!("signature element {}", signature.kind_name()),
            )),
            TypeSignature::Class(index) | TypeSignature::ValueType(index) => (self.sink)(index),
            TypeSignature::Ptr(pointer) => {
                self.modifiers(&mut pointer.modifiers)?;
                self.type_signature(&mut pointer.base)
            }
            TypeSignature::ByRef(inner) => self.type_signature(inner),
            TypeSignature::SzArray(array) => {
                self.modifiers(&mut array.modifiers)?;
                self.type_signature(&mut array.base)
            }
            TypeSignature::Array(array) => self.type_signature(&mut array.base),
            TypeSignature::GenericInst(base, args) => {
                if !matches!(
                    &**base,
                    TypeSignature::Class(_) | TypeSignature::ValueType(_)
                ) {
                    return Err(Error::UnsupportedConstruct(format!(
                        "generic instantiation of {}",
                        base.kind_name()
                    )));
                }

                self.type_signature(base)?;
                for arg in args.iter_mut() {
                    self.type_signature(arg)?;
                }
                Ok(())
            }
            TypeSignature::FnPtr(method) => self.method(method),
            TypeSignature::GenericParamType(_) | TypeSignature::GenericParamMethod(_) => Ok(()),
            primitive => {
                debug_assert!(primitive.is_primitive());
                Ok(())
            }
        }
    }

    fn modifiers(&mut self, modifiers: &mut [CustomModifier]) -> Result<()> {
        for modifier in modifiers {
            (self.sink)(&mut modifier.modifier_type)?;
        }
        Ok(())
    }

    fn parameter(&mut self, parameter: &mut SignatureParameter) -> Result<()> {
        self.modifiers(&mut parameter.modifiers)?;
        self.type_signature(&mut parameter.base)
    }

    /// Walks a method definition or method reference signature, including varargs.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn method(&mut self, signature: &mut SignatureMethod) -> Result<()> {
        self.parameter(&mut signature.return_type)?;
        for parameter in signature
            .params
            .iter_mut()
            .chain(signature.varargs.iter_mut())
        {
            self.parameter(parameter)?;
        }
        Ok(())
    }

    /// Walks a field signature.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn field(&mut self, signature: &mut SignatureField) -> Result<()> {
        self.modifiers(&mut signature.modifiers)?;
        self.type_signature(&mut signature.base)
    }

    /// Walks a property signature.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn property(&mut self, signature: &mut SignatureProperty) -> Result<()> {
        self.modifiers(&mut signature.modifiers)?;
        self.type_signature(&mut signature.base)?;
        for parameter in &mut signature.params {
            self.parameter(parameter)?;
        }
        Ok(())
    }

    /// Walks a local variables signature.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn locals(&mut self, signature: &mut SignatureLocalVariables) -> Result<()> {
        for local in &mut signature.locals {
            self.modifiers(&mut local.modifiers)?;
            self.type_signature(&mut local.base)?;
        }
        Ok(())
    }

    /// Walks a type specification.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn type_spec(&mut self, signature: &mut SignatureTypeSpec) -> Result<()> {
        self.type_signature(&mut signature.base)
    }

    /// Walks a generic method instantiation.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn method_spec(&mut self, signature: &mut SignatureMethodSpec) -> Result<()> {
        for arg in &mut signature.generic_args {
            self.type_signature(arg)?;
        }
        Ok(())
    }

    /// Walks a `MemberRef` signature.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn member_ref(&mut self, signature: &mut MemberRefSignature) -> Result<()> {
        match signature {
            MemberRefSignature::Method(method) => self.method(method),
            MemberRefSignature::Field(field) => self.field(field),
        }
    }

    /// Walks a `StandAloneSig` signature.
    ///
    /// # Errors
    ///
    /// See [`IndexWalker::type_signature`].
    pub fn stand_alone(&mut self, signature: &mut StandAloneSignature) -> Result<()> {
        match signature {
            StandAloneSignature::Method(method) => self.method(method),
            StandAloneSignature::LocalVariables(locals) => self.locals(locals),
            StandAloneSignature::Field(field) => self.field(field),
        }
    }
}

macro_rules! impl_visit_indices {
    ($($node:ty => $walk:ident),* $(,)?) => {
        $(
            impl $node {
                /// Calls `sink` once for every [`TableIndex`] embedded in this signature, in tree
                /// order, allowing it to be rewritten in place.
                ///
                /// # Errors
                ///
                /// See [`IndexWalker::type_signature`].
                pub fn visit_indices_mut<F>(&mut self, max_depth: usize, mut sink: F) -> Result<()>
                where
                    F: FnMut(&mut TableIndex) -> Result<()>,
                {
                    IndexWalker::new(&mut sink, max_depth).$walk(self)
                }
            }
        )*
    };
}

impl_visit_indices! {
    TypeSignature => type_signature,
    SignatureMethod => method,
    SignatureField => field,
    SignatureProperty => property,
    SignatureLocalVariables => locals,
    SignatureTypeSpec => type_spec,
    SignatureMethodSpec => method_spec,
    MemberRefSignature => member_ref,
    StandAloneSignature => stand_alone,
}
