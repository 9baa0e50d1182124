//! Property tests for the reorder pass over randomly shaped instances.

mod common;

use cilsort::{prelude::*, reorder::verify::check_ordering};
use common::*;
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Raw picks; every pick is reduced modulo the size of the table it selects from.
#[derive(Debug, Clone)]
struct Shape {
    types: u32,
    type_refs: Vec<u8>,
    type_specs: Vec<(u8, u32, u32)>,
    member_refs: Vec<(u32, u8)>,
    nesting: Vec<(u32, u32)>,
    attributes: Vec<(u32, u32, u8)>,
    generic_params: Vec<(u32, u16)>,
    tokens: Vec<u32>,
}

fn index(table: TableId, row: u32) -> TableIndex {
    TableIndex::new(table, row)
}

fn build(shape: &Shape) -> CilMetadata {
    let mut m = CilMetadata::default();
    m.assembly_refs.push(AssemblyRefRow {
        name: "mscorlib".to_string(),
        ..Default::default()
    });

    for name in &shape.type_refs {
        m.type_refs.push(type_ref(
            &format!("Name{name}"),
            "System",
            Some(index(TableId::AssemblyRef, 0)),
        ));
    }
    let refs = shape.type_refs.len() as u32;
    let type_ref_pick = |pick: u32| index(TableId::TypeRef, pick % refs);
    let type_def_pick = |pick: u32| index(TableId::TypeDef, 1 + pick % shape.types);

    for &(kind, r, t) in &shape.type_specs {
        let class = TypeSignature::Class(type_ref_pick(r));
        let signature = match kind {
            0 => class,
            1 => TypeSignature::ValueType(type_def_pick(t)),
            2 => TypeSignature::SzArray(SignatureSzArray {
                modifiers: Vec::new(),
                base: Box::new(class),
            }),
            _ => TypeSignature::GenericInst(
                Box::new(class),
                vec![TypeSignature::ValueType(type_def_pick(t))],
            ),
        };
        m.type_specs.push(type_spec(signature));
    }

    for &(class, name) in &shape.member_refs {
        m.member_refs.push(MemberRefRow {
            class: type_ref_pick(class),
            name: format!(".ctor{name}"),
            signature: MemberRefSignature::Method(SignatureMethod {
                has_this: true,
                return_type: SignatureParameter::new(TypeSignature::Void),
                ..Default::default()
            }),
        });
    }

    m.type_defs.push(type_def("<Module>", "", None, 0, 0));
    for t in 0..shape.types {
        let method_list = if t == 0 { 0 } else { 1 };
        m.type_defs
            .push(type_def(&format!("Type{t}"), "Random", None, 0, method_list));
    }

    let specs = m.type_specs.len() as u32;
    let mut instructions = Vec::new();
    if specs > 0 {
        for (position, &pick) in shape.tokens.iter().enumerate() {
            instructions.push(ldtoken(
                5 * position as u32,
                index(TableId::TypeSpec, pick % specs),
            ));
        }
    }
    instructions.push(ret(5 * instructions.len() as u32));
    m.method_defs.push(method(
        "Main",
        Vec::new(),
        0,
        Some(MethodBody {
            max_stack: 1,
            instructions,
            ..Default::default()
        }),
    ));

    let mut nested = BTreeSet::new();
    for &(inner, outer) in &shape.nesting {
        let inner = type_def_pick(inner);
        if nested.insert(inner) {
            m.nested_classes.push(NestedClassRow {
                nested_class: inner,
                enclosing_class: type_def_pick(outer),
            });
        }
    }

    let ctors = m.member_refs.len() as u32;
    for &(parent, ctor, value) in &shape.attributes {
        m.custom_attributes.push(CustomAttributeRow {
            parent: type_def_pick(parent),
            constructor: index(TableId::MemberRef, ctor % ctors),
            value: vec![0x01, 0x00, value],
        });
    }

    for &(owner, number) in &shape.generic_params {
        m.generic_params.push(GenericParamRow {
            number,
            flags: 0,
            owner: type_def_pick(owner),
            name: format!("T{number}"),
        });
    }

    m
}

fn arb_metadata() -> impl Strategy<Value = CilMetadata> {
    (
        1u32..6,
        prop::collection::vec(0u8..3, 1..6),
        prop::collection::vec((0u8..4, any::<u32>(), any::<u32>()), 0..8),
        prop::collection::vec((any::<u32>(), 0u8..2), 1..4),
        prop::collection::vec((any::<u32>(), any::<u32>()), 0..6),
        prop::collection::vec((any::<u32>(), any::<u32>(), any::<u8>()), 0..10),
        prop::collection::vec((any::<u32>(), 0u16..3), 0..8),
        prop::collection::vec(any::<u32>(), 0..6),
    )
        .prop_map(
            |(
                types,
                type_refs,
                type_specs,
                member_refs,
                nesting,
                attributes,
                generic_params,
                tokens,
            )| {
                build(&Shape {
                    types,
                    type_refs,
                    type_specs,
                    member_refs,
                    nesting,
                    attributes,
                    generic_params,
                    tokens,
                })
            },
        )
}

fn run(metadata: &mut CilMetadata) -> std::result::Result<ReorderReport, TestCaseError> {
    reorder_and_update(metadata).map_err(|error| TestCaseError::fail(error.to_string()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_second_pass_is_noop(original in arb_metadata()) {
        let mut metadata = original;
        run(&mut metadata)?;
        let settled = metadata.clone();

        let second = run(&mut metadata)?;
        prop_assert!(second.is_noop());
        prop_assert_eq!(metadata, settled);
    }

    #[test]
    fn prop_sorted_tables_in_order(original in arb_metadata()) {
        let mut metadata = original;
        run(&mut metadata)?;
        prop_assert!(check_ordering(&metadata).is_ok());
    }

    #[test]
    fn prop_references_keep_their_meaning(original in arb_metadata()) {
        let references = collect_references(&original, DEFAULT_MAX_SIGNATURE_DEPTH)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let mut metadata = original.clone();
        let report = run(&mut metadata)?;

        prop_assert_eq!(logical_view(&metadata), logical_view(&original));

        let old = Describer::new(&original);
        let new = Describer::new(&metadata);
        for (site, target) in references {
            let mapped = report.map_index(target);
            prop_assert!(mapped.is_some(), "{} lost its target", site);
            if let Some(mapped) = mapped {
                prop_assert_eq!(new.index(mapped), old.index(target), "{}", site);
            }
        }
    }

    #[test]
    fn prop_row_maps_are_onto(original in arb_metadata()) {
        let mut metadata = original.clone();
        let report = run(&mut metadata)?;

        for (table, map) in report.row_maps() {
            prop_assert_eq!(map.original_count(), original.row_count(table));
            prop_assert_eq!(map.final_count(), metadata.row_count(table));

            let targets: BTreeSet<u32> = map.as_slice().iter().copied().collect();
            prop_assert_eq!(targets.len() as u32, map.final_count());
            prop_assert!(targets.iter().all(|&row| row < map.final_count()));

            if !DEFAULT_MERGE_TABLES.contains(&table) {
                prop_assert!(map.is_permutation(), "{} lost rows", table);
            }
        }
    }
}
