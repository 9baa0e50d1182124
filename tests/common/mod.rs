//! Shared factories and helpers for the integration tests.
//!
//! - Row factories for the handful of row kinds tests build by hand
//! - [`synthetic_assembly`]: a deterministic, assembly-sized instance that touches every sorted
//!   table and every content-identified table, with duplicates and out-of-order rows
//! - [`LogicalView`]: a position-independent rendering of an instance, used to check that a
//!   reorder pass changed positions only

#![allow(dead_code)]

use std::collections::BTreeSet;

use cilsort::prelude::*;

pub fn type_ref(name: &str, namespace: &str, scope: Option<TableIndex>) -> TypeRefRow {
    TypeRefRow {
        resolution_scope: scope,
        type_name: name.to_string(),
        type_namespace: namespace.to_string(),
    }
}

pub fn type_def(
    name: &str,
    namespace: &str,
    extends: Option<TableIndex>,
    field_list: u32,
    method_list: u32,
) -> TypeDefRow {
    TypeDefRow {
        flags: 0x0010_0001,
        type_name: name.to_string(),
        type_namespace: namespace.to_string(),
        extends,
        field_list: TableIndex::new(TableId::Field, field_list),
        method_list: TableIndex::new(TableId::MethodDef, method_list),
    }
}

pub fn type_spec(base: TypeSignature) -> TypeSpecRow {
    TypeSpecRow {
        signature: SignatureTypeSpec { base },
    }
}

pub fn field(name: &str, base: TypeSignature) -> FieldRow {
    FieldRow {
        flags: 0x0001,
        name: name.to_string(),
        signature: SignatureField {
            modifiers: Vec::new(),
            base,
        },
    }
}

pub fn method(
    name: &str,
    params: Vec<TypeSignature>,
    param_list: u32,
    body: Option<MethodBody>,
) -> MethodDefRow {
    MethodDefRow {
        rva: 0,
        impl_flags: 0,
        flags: 0x0086,
        name: name.to_string(),
        signature: SignatureMethod {
            has_this: true,
            default: true,
            return_type: SignatureParameter::new(TypeSignature::Void),
            params: params.into_iter().map(SignatureParameter::new).collect(),
            ..Default::default()
        },
        param_list: TableIndex::new(TableId::Param, param_list),
        body,
    }
}

pub fn param(sequence: u16, name: &str) -> ParamRow {
    ParamRow {
        flags: 0,
        sequence,
        name: name.to_string(),
    }
}

pub fn ldtoken(offset: u32, target: TableIndex) -> Instruction {
    Instruction::new(offset, 0xD0, "ldtoken", Operand::Token(target))
}

pub fn call(offset: u32, target: TableIndex) -> Instruction {
    Instruction::new(offset, 0x28, "call", Operand::Token(target))
}

pub fn ret(offset: u32) -> Instruction {
    Instruction::new(offset, 0x2A, "ret", Operand::None)
}

/// Signature of a parameter typed as the given value type specification.
pub fn param_type(method: &MethodDefRow, position: usize) -> &TypeSignature {
    &method.signature.params[position].base
}

const REFS: u32 = 24;
const FIELDS: u32 = 2;
const METHODS: u32 = 3;

/// `TypeRef` used for slot `i`. Half of the referenced names exist twice, and odd slots use
/// the later copy.
fn type_ref_at(i: u32) -> TableIndex {
    let k = i % REFS;
    let row = if k < REFS / 2 && i % 2 == 1 { REFS + k } else { k };
    TableIndex::new(TableId::TypeRef, row)
}

fn index(table: TableId, row: u32) -> TableIndex {
    TableIndex::new(table, row)
}

/// Builds a deterministic instance with `types` type definitions.
///
/// Every sorted table is populated in descending key order, and `TypeRef`, `TypeSpec`,
/// `MemberRef`, `StandAloneSig` and `ModuleRef` all contain duplicates, some of which are only
/// recognisable by looking through other duplicates.
pub fn synthetic_assembly(types: u32) -> CilMetadata {
    let types = types.max(1);
    let mut m = CilMetadata::default();

    m.modules.push(ModuleRow {
        name: "Synthetic.dll".to_string(),
        mvid: [7; 16],
        ..Default::default()
    });
    m.assemblies.push(AssemblyRow {
        name: "Synthetic".to_string(),
        major_version: 1,
        ..Default::default()
    });
    m.assembly_refs.push(AssemblyRefRow {
        name: "mscorlib".to_string(),
        major_version: 4,
        public_key_or_token: vec![0xB7, 0x7A, 0x5C, 0x56, 0x19, 0x34, 0xE0, 0x89],
        ..Default::default()
    });
    let corlib = Some(index(TableId::AssemblyRef, 0));

    for k in 0..REFS {
        m.type_refs.push(type_ref(&format!("Ref{k}"), "System", corlib));
    }
    for k in 0..REFS / 2 {
        m.type_refs.push(type_ref(&format!("Ref{k}"), "System", corlib));
    }

    m.module_refs.push(ModuleRefRow {
        name: "native.dll".to_string(),
    });
    m.module_refs.push(ModuleRefRow {
        name: "native.dll".to_string(),
    });

    for i in 0..types {
        m.type_specs.push(type_spec(TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(type_ref_at(i))),
            vec![TypeSignature::ValueType(index(TableId::TypeDef, 1 + i % 5))],
        )));
        m.member_refs.push(MemberRefRow {
            class: index(TableId::TypeSpec, i),
            name: "Invoke".to_string(),
            signature: MemberRefSignature::Method(SignatureMethod {
                has_this: true,
                default: true,
                return_type: SignatureParameter::new(TypeSignature::I4),
                params: vec![SignatureParameter::new(TypeSignature::Class(type_ref_at(i)))],
                ..Default::default()
            }),
        });
    }

    for i in 0..8 {
        m.stand_alone_sigs.push(StandAloneSigRow {
            signature: StandAloneSignature::LocalVariables(SignatureLocalVariables {
                locals: vec![SignatureLocalVariable {
                    base: TypeSignature::Class(type_ref_at(i % 4)),
                    ..Default::default()
                }],
            }),
        });
    }

    m.type_defs.push(type_def("<Module>", "", None, 0, 0));
    for t in 0..types {
        m.type_defs.push(type_def(
            &format!("Type{t}"),
            "Synthetic",
            Some(type_ref_at(t)),
            FIELDS * t,
            METHODS * t,
        ));

        for f in 0..FIELDS {
            m.fields
                .push(field(&format!("field{f}"), TypeSignature::Class(type_ref_at(t + f))));
        }

        for j in 0..METHODS {
            let global = METHODS * t + j;
            let spec = index(TableId::TypeSpec, global % types);
            let body = MethodBody {
                max_stack: 8,
                init_locals: true,
                local_var_sig: Some(index(TableId::StandAloneSig, global % 8)),
                instructions: vec![
                    ldtoken(0, spec),
                    Instruction::new(5, 0x26, "pop", Operand::None),
                    Instruction::new(6, 0x72, "ldstr", Operand::UserString(1 + global)),
                    call(11, index(TableId::MemberRef, global % types)),
                    Instruction::new(
                        16,
                        0x7B,
                        "ldfld",
                        Operand::Token(index(TableId::Field, FIELDS * t)),
                    ),
                    ret(21),
                ],
                exception_handlers: vec![
                    ExceptionHandler::catch(0, 16, 16, 4, type_ref_at(j)),
                    ExceptionHandler::finally(0, 20, 20, 1),
                ],
            };
            m.method_defs.push(method(
                &format!("Method{j}"),
                vec![TypeSignature::ValueType(spec)],
                global,
                Some(body),
            ));
            m.params.push(param(1, "value"));
        }

        m.properties.push(PropertyRow {
            flags: 0,
            name: "Item".to_string(),
            signature: SignatureProperty {
                has_this: true,
                base: TypeSignature::Class(type_ref_at(t)),
                ..Default::default()
            },
        });
        m.property_maps.push(PropertyMapRow {
            parent: index(TableId::TypeDef, t + 1),
            property_list: index(TableId::Property, t),
        });
        m.method_specs.push(MethodSpecRow {
            method: index(TableId::MethodDef, METHODS * t),
            instantiation: SignatureMethodSpec {
                generic_args: vec![TypeSignature::Class(type_ref_at(t))],
            },
        });
    }

    for t in (0..types).rev() {
        let type_def = index(TableId::TypeDef, t + 1);
        if t % 3 == 0 {
            m.generic_params.push(GenericParamRow {
                number: 1,
                flags: 0,
                owner: type_def,
                name: "TValue".to_string(),
            });
        }
        m.generic_params.push(GenericParamRow {
            number: 0,
            flags: 0,
            owner: type_def,
            name: "T".to_string(),
        });
        if t % 4 == 0 {
            m.generic_params.push(GenericParamRow {
                number: 0,
                flags: 0,
                owner: index(TableId::MethodDef, METHODS * t),
                name: "M".to_string(),
            });
        }

        m.interface_impls.push(InterfaceImplRow {
            class: type_def,
            interface: index(TableId::TypeSpec, (t * 7) % types),
        });
        m.interface_impls.push(InterfaceImplRow {
            class: type_def,
            interface: type_ref_at(t + 3),
        });

        if t % 5 == 0 && t + 1 < types {
            m.nested_classes.push(NestedClassRow {
                nested_class: index(TableId::TypeDef, t + 2),
                enclosing_class: type_def,
            });
        }
        if t % 4 == 0 {
            m.class_layouts.push(ClassLayoutRow {
                packing_size: 8,
                class_size: 16 * (t + 1),
                parent: type_def,
            });
        }
        if t % 3 == 0 {
            m.method_impls.push(MethodImplRow {
                class: type_def,
                method_body: index(TableId::MethodDef, METHODS * t + 2),
                method_declaration: index(TableId::MemberRef, t % types),
            });
        }
        if t % 6 == 0 {
            m.decl_securities.push(DeclSecurityRow {
                action: 2,
                parent: type_def,
                permission_set: vec![0x2E, 0x01],
            });
        }
        m.method_semantics.push(MethodSemanticsRow {
            semantics: 0x0002,
            method: index(TableId::MethodDef, METHODS * t + 1),
            association: index(TableId::Property, t),
        });
        m.custom_attributes.push(CustomAttributeRow {
            parent: type_def,
            constructor: index(TableId::MemberRef, (t * 3) % types),
            value: vec![0x01, 0x00, 0x00, 0x00],
        });
        m.custom_attributes.push(CustomAttributeRow {
            parent: index(TableId::MethodDef, METHODS * t),
            constructor: index(TableId::MemberRef, (t * 5) % types),
            value: vec![0x01, 0x00, (t % 256) as u8, 0x00],
        });

        for f in (0..FIELDS).rev() {
            let field = index(TableId::Field, FIELDS * t + f);
            if (t + f) % 3 == 0 {
                m.constants.push(ConstantRow {
                    base: 0x08,
                    parent: field,
                    value: (t + f).to_le_bytes().to_vec(),
                });
            }
            if (t + f) % 4 == 0 {
                m.field_marshals.push(FieldMarshalRow {
                    parent: field,
                    native_type: vec![0x14],
                });
            }
            if (t + f) % 5 == 0 {
                m.field_rvas.push(FieldRvaRow {
                    rva: 0x4000 + 8 * (t + f),
                    field,
                });
            }
            if (t + f) % 6 == 0 {
                m.field_layouts.push(FieldLayoutRow {
                    field_offset: 4 * f,
                    field,
                });
            }
        }

        if t % 5 == 0 {
            m.impl_maps.push(ImplMapRow {
                mapping_flags: 0x0100,
                member_forwarded: index(TableId::MethodDef, METHODS * t + 2),
                import_name: format!("Native{t}"),
                import_scope: index(TableId::ModuleRef, t % 2),
            });
        }
    }

    // Constraints and attributes on generic parameters, in the unsorted parameter order
    for gp in 0..m.generic_params.len() as u32 {
        m.generic_param_constraints.push(GenericParamConstraintRow {
            owner: index(TableId::GenericParam, gp),
            constraint: type_ref_at(gp),
        });
        if gp % 7 == 0 {
            m.custom_attributes.push(CustomAttributeRow {
                parent: index(TableId::GenericParam, gp),
                constructor: index(TableId::MemberRef, gp % types),
                value: vec![0x01, 0x00],
            });
        }
    }

    m
}

/// Position-independent rendering of an instance.
///
/// `rows` holds one line per row of every positionally identified table, with every reference
/// rendered by the content of its target; `interned` is the set of distinct rows of the
/// content-identified tables. Two instances that differ only in row order, and in how many
/// copies of a content-identified row exist, render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalView {
    pub rows: Vec<String>,
    pub interned: BTreeSet<String>,
}

pub fn logical_view(metadata: &CilMetadata) -> LogicalView {
    let describer = Describer::new(metadata);
    let mut rows = Vec::new();
    let m = metadata;

    for row in 0..m.type_defs.len() as u32 {
        let td = &m.type_defs[row as usize];
        rows.push(format!(
            "type {} extends {}",
            describer.index(index(TableId::TypeDef, row)),
            describer.optional(td.extends)
        ));
    }
    for (row, f) in m.fields.iter().enumerate() {
        rows.push(format!(
            "field {} : {}",
            describer.index(index(TableId::Field, row as u32)),
            describer.ty(&f.signature.base, 0)
        ));
    }
    for (row, md) in m.method_defs.iter().enumerate() {
        rows.push(format!(
            "method {} {} {{{}}}",
            describer.index(index(TableId::MethodDef, row as u32)),
            describer.method(&md.signature, 0),
            md.body
                .as_ref()
                .map(|body| describer.body(body))
                .unwrap_or_default()
        ));
    }
    for row in 0..m.params.len() as u32 {
        rows.push(format!(
            "param {} {}",
            describer.index(index(TableId::Param, row)),
            m.params[row as usize].name
        ));
    }
    for row in 0..m.properties.len() as u32 {
        rows.push(format!(
            "property {} : {}",
            describer.index(index(TableId::Property, row)),
            describer.ty(&m.properties[row as usize].signature.base, 0)
        ));
    }
    for ii in &m.interface_impls {
        rows.push(format!(
            "implements {} : {}",
            describer.index(ii.class),
            describer.index(ii.interface)
        ));
    }
    for nc in &m.nested_classes {
        rows.push(format!(
            "nested {} in {}",
            describer.index(nc.nested_class),
            describer.index(nc.enclosing_class)
        ));
    }
    for row in 0..m.generic_params.len() as u32 {
        rows.push(format!(
            "generic {} {}",
            describer.index(index(TableId::GenericParam, row)),
            m.generic_params[row as usize].name
        ));
    }
    for gc in &m.generic_param_constraints {
        rows.push(format!(
            "constraint {} : {}",
            describer.index(gc.owner),
            describer.index(gc.constraint)
        ));
    }
    for ca in &m.custom_attributes {
        rows.push(format!(
            "attribute {} {} {:?}",
            describer.index(ca.parent),
            describer.index(ca.constructor),
            ca.value
        ));
    }
    for c in &m.constants {
        rows.push(format!("constant {} {:?}", describer.index(c.parent), c.value));
    }
    for fm in &m.field_marshals {
        rows.push(format!("marshal {} {:?}", describer.index(fm.parent), fm.native_type));
    }
    for rva in &m.field_rvas {
        rows.push(format!("rva {} {:#x}", describer.index(rva.field), rva.rva));
    }
    for fl in &m.field_layouts {
        rows.push(format!("offset {} {}", describer.index(fl.field), fl.field_offset));
    }
    for cl in &m.class_layouts {
        rows.push(format!(
            "layout {} {} {}",
            describer.index(cl.parent),
            cl.packing_size,
            cl.class_size
        ));
    }
    for mi in &m.method_impls {
        rows.push(format!(
            "override {} {} {}",
            describer.index(mi.class),
            describer.index(mi.method_body),
            describer.index(mi.method_declaration)
        ));
    }
    for ms in &m.method_semantics {
        rows.push(format!(
            "semantics {} {} {}",
            ms.semantics,
            describer.index(ms.method),
            describer.index(ms.association)
        ));
    }
    for im in &m.impl_maps {
        rows.push(format!(
            "pinvoke {} {} {}",
            describer.index(im.member_forwarded),
            im.import_name,
            describer.index(im.import_scope)
        ));
    }
    for ds in &m.decl_securities {
        rows.push(format!(
            "security {} {} {:?}",
            describer.index(ds.parent),
            ds.action,
            ds.permission_set
        ));
    }
    rows.sort();

    let mut interned = BTreeSet::new();
    for table in [
        TableId::TypeRef,
        TableId::TypeSpec,
        TableId::MemberRef,
        TableId::MethodSpec,
        TableId::StandAloneSig,
        TableId::ModuleRef,
    ] {
        for row in 0..metadata.row_count(table) {
            interned.insert(describer.index(index(table, row)));
        }
    }

    LogicalView { rows, interned }
}

/// Renders references by the content of what they point to.
pub struct Describer<'m> {
    metadata: &'m CilMetadata,
    field_owner: Vec<Option<u32>>,
    method_owner: Vec<Option<u32>>,
    param_owner: Vec<Option<u32>>,
    property_owner: Vec<Option<u32>>,
}

/// Owner of every row of a list-owned table, from the run starts of the owners.
fn owners(starts: &[u32], count: u32) -> Vec<Option<u32>> {
    let mut owner = vec![None; count as usize];
    for (position, &start) in starts.iter().enumerate() {
        let end = starts.get(position + 1).copied().unwrap_or(count).min(count);
        for row in start..end {
            owner[row as usize] = Some(position as u32);
        }
    }
    owner
}

const MAX_DESCRIBE_DEPTH: usize = 8;

impl<'m> Describer<'m> {
    pub fn new(metadata: &'m CilMetadata) -> Self {
        let m = metadata;
        let field_starts: Vec<u32> = m.type_defs.iter().map(|td| td.field_list.row).collect();
        let method_starts: Vec<u32> = m.type_defs.iter().map(|td| td.method_list.row).collect();
        let param_starts: Vec<u32> = m.method_defs.iter().map(|md| md.param_list.row).collect();
        let property_starts: Vec<u32> =
            m.property_maps.iter().map(|pm| pm.property_list.row).collect();

        let property_owner = owners(&property_starts, m.properties.len() as u32)
            .into_iter()
            .map(|map| map.map(|map| m.property_maps[map as usize].parent.row))
            .collect();

        Describer {
            metadata,
            field_owner: owners(&field_starts, m.fields.len() as u32),
            method_owner: owners(&method_starts, m.method_defs.len() as u32),
            param_owner: owners(&param_starts, m.params.len() as u32),
            property_owner,
        }
    }

    pub fn optional(&self, index: Option<TableIndex>) -> String {
        index.map_or_else(|| "-".to_string(), |index| self.index(index))
    }

    pub fn index(&self, index: TableIndex) -> String {
        self.index_at(index, 0)
    }

    fn owner(&self, owners: &[Option<u32>], row: u32, depth: usize) -> String {
        match owners.get(row as usize).copied().flatten() {
            Some(owner) => self.index_at(TableIndex::new(TableId::TypeDef, owner), depth + 1),
            None => "?".to_string(),
        }
    }

    fn index_at(&self, index: TableIndex, depth: usize) -> String {
        if depth > MAX_DESCRIBE_DEPTH {
            return format!("{}...", index.table);
        }

        let m = self.metadata;
        let row = index.row as usize;
        let next = depth + 1;
        let missing = || format!("{}!{}", index.table, index.row);

        match index.table {
            TableId::Module => "module".to_string(),
            TableId::AssemblyRef => m
                .assembly_refs
                .get(row)
                .map_or_else(missing, |a| format!("[{}]", a.name)),
            TableId::ModuleRef => m
                .module_refs
                .get(row)
                .map_or_else(missing, |r| format!("module:{}", r.name)),
            TableId::TypeDef => m.type_defs.get(row).map_or_else(missing, |td| {
                format!("{}.{}", td.type_namespace, td.type_name)
            }),
            TableId::TypeRef => m.type_refs.get(row).map_or_else(missing, |tr| {
                let scope = tr
                    .resolution_scope
                    .map_or_else(|| "-".to_string(), |scope| self.index_at(scope, next));
                format!("{}{}.{}", scope, tr.type_namespace, tr.type_name)
            }),
            TableId::TypeSpec => m
                .type_specs
                .get(row)
                .map_or_else(missing, |ts| format!("spec({})", self.ty(&ts.signature.base, next))),
            TableId::MemberRef => m.member_refs.get(row).map_or_else(missing, |mr| {
                let signature = match &mr.signature {
                    MemberRefSignature::Method(method) => self.method(method, next),
                    MemberRefSignature::Field(field) => self.ty(&field.base, next),
                };
                format!("{}::{}{}", self.index_at(mr.class, next), mr.name, signature)
            }),
            TableId::MethodSpec => m.method_specs.get(row).map_or_else(missing, |ms| {
                let args: Vec<String> = ms
                    .instantiation
                    .generic_args
                    .iter()
                    .map(|arg| self.ty(arg, next))
                    .collect();
                format!("{}<{}>", self.index_at(ms.method, next), args.join(", "))
            }),
            TableId::StandAloneSig => m.stand_alone_sigs.get(row).map_or_else(missing, |sig| {
                match &sig.signature {
                    StandAloneSignature::LocalVariables(locals) => {
                        let locals: Vec<String> = locals
                            .locals
                            .iter()
                            .map(|local| self.ty(&local.base, next))
                            .collect();
                        format!("locals({})", locals.join(", "))
                    }
                    StandAloneSignature::Method(method) => self.method(method, next),
                    StandAloneSignature::Field(field) => self.ty(&field.base, next),
                }
            }),
            TableId::MethodDef => m.method_defs.get(row).map_or_else(missing, |md| {
                format!("{}::{}", self.owner(&self.method_owner, index.row, depth), md.name)
            }),
            TableId::Field => m.fields.get(row).map_or_else(missing, |f| {
                format!("{}::{}", self.owner(&self.field_owner, index.row, depth), f.name)
            }),
            TableId::Param => m.params.get(row).map_or_else(missing, |p| {
                let method = self
                    .param_owner
                    .get(row)
                    .copied()
                    .flatten()
                    .map_or_else(|| "?".to_string(), |method| {
                        self.index_at(TableIndex::new(TableId::MethodDef, method), next)
                    });
                format!("{}#{}", method, p.sequence)
            }),
            TableId::Property => m.properties.get(row).map_or_else(missing, |p| {
                format!("{}::{}", self.owner(&self.property_owner, index.row, depth), p.name)
            }),
            TableId::GenericParam => m.generic_params.get(row).map_or_else(missing, |gp| {
                format!("{}!{}", self.index_at(gp.owner, next), gp.number)
            }),
            other => format!("{}#{}", other, index.row),
        }
    }

    pub fn ty(&self, signature: &TypeSignature, depth: usize) -> String {
        if depth > MAX_DESCRIBE_DEPTH {
            return "...".to_string();
        }
        let next = depth + 1;

        match signature {
            TypeSignature::Class(index) => format!("class {}", self.index_at(*index, next)),
            TypeSignature::ValueType(index) => {
                format!("valuetype {}", self.index_at(*index, next))
            }
            TypeSignature::GenericInst(base, args) => {
                let args: Vec<String> = args.iter().map(|arg| self.ty(arg, next)).collect();
                format!("{}<{}>", self.ty(base, next), args.join(", "))
            }
            TypeSignature::SzArray(array) => format!("{}[]", self.ty(&array.base, next)),
            TypeSignature::Array(array) => {
                format!("{}[rank {}]", self.ty(&array.base, next), array.rank)
            }
            TypeSignature::Ptr(pointer) => format!("{}*", self.ty(&pointer.base, next)),
            TypeSignature::ByRef(inner) => format!("{}&", self.ty(inner, next)),
            TypeSignature::FnPtr(method) => format!("fnptr {}", self.method(method, next)),
            TypeSignature::GenericParamType(number) => format!("!{number}"),
            TypeSignature::GenericParamMethod(number) => format!("!!{number}"),
            other => other.kind_name().to_string(),
        }
    }

    pub fn method(&self, method: &SignatureMethod, depth: usize) -> String {
        let params: Vec<String> = method
            .params
            .iter()
            .chain(method.varargs.iter())
            .map(|param| self.ty(&param.base, depth + 1))
            .collect();
        format!(
            "({}) -> {}",
            params.join(", "),
            self.ty(&method.return_type.base, depth + 1)
        )
    }

    pub fn body(&self, body: &MethodBody) -> String {
        let mut parts = Vec::new();
        if let Some(locals) = body.local_var_sig {
            parts.push(self.index(locals));
        }
        for instruction in &body.instructions {
            match &instruction.operand {
                Operand::Token(target) => {
                    parts.push(format!("{} {}", instruction.mnemonic, self.index(*target)));
                }
                other => parts.push(format!("{} {:?}", instruction.mnemonic, other)),
            }
        }
        for handler in &body.exception_handlers {
            parts.push(format!(
                "try {}+{} {:?} {}",
                handler.try_offset,
                handler.try_length,
                handler.flags,
                self.optional(handler.catch_type)
            ));
        }
        parts.join("; ")
    }
}

/// Number of distinct rows of a content-identified table, by rendering.
pub fn distinct_rows(metadata: &CilMetadata, table: TableId) -> usize {
    let describer = Describer::new(metadata);
    (0..metadata.row_count(table))
        .map(|row| describer.index(TableIndex::new(table, row)))
        .collect::<BTreeSet<_>>()
        .len()
}
