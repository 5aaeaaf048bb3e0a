//! Integration tests for the parser
//!
//! Tests declaration parsing, type resolution, enum numbering, and the
//! `line <n>: <message>` error envelope.

use entigen_foundation::{ErrorCategory, ErrorKind, FieldFlags, ScalarType};
use entigen_language::{Declarations, TypeDecl, parse};
use proptest::prelude::*;

fn parse_ok(source: &str) -> Declarations {
    match parse(source) {
        Ok(decls) => decls,
        Err(e) => panic!("unexpected parse error: {e}"),
    }
}

fn values(decls: &Declarations, name: &str) -> Vec<u64> {
    decls
        .enumeration(name)
        .expect("enum declared")
        .members
        .iter()
        .map(|m| m.value)
        .collect()
}

// =============================================================================
// Enums
// =============================================================================

#[test]
fn enum_values_auto_increment() {
    let decls = parse_ok("enum Status { Draft, Published, Archived }");
    assert_eq!(values(&decls, "Status"), [0, 1, 2]);
}

#[test]
fn explicit_value_resets_the_counter() {
    let decls = parse_ok("enum Status { Draft, Published = 5, Archived }");
    assert_eq!(values(&decls, "Status"), [0, 5, 6]);
}

#[test]
fn enum_accepts_trailing_comma() {
    let decls = parse_ok("enum Size { Small, Large, }");
    assert_eq!(values(&decls, "Size"), [0, 1]);
}

#[test]
fn enum_negative_value_is_invalid_number() {
    for source in ["enum Temp { Cold =-1 }", "enum Temp { Cold = -1 }"] {
        let err = parse(source).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidNumber { line: 1, ref text } if text == "-1"));
    }
}

#[test]
fn enum_value_overflow_is_fatal() {
    let err = parse("enum Big { Max = 18446744073709551615, Over }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidNumber { line: 1, .. }));
}

// =============================================================================
// Entities
// =============================================================================

#[test]
fn fields_resolve_against_entities_enums_and_scalars() {
    let decls = parse_ok(
        "enum Mood { Calm, Angry }
         entity Owner { }
         entity Pet { owner: Owner; mood: Mood; photo: bytes; }",
    );
    let pet = decls.entity("Pet").expect("Pet");
    assert_eq!(pet.fields[0].ty, TypeDecl::Entity("Owner".into()));
    assert_eq!(pet.fields[1].ty, TypeDecl::Enum("Mood".into()));
    assert_eq!(pet.fields[2].ty, TypeDecl::Scalar(ScalarType::Bytes));
}

#[test]
fn flags_are_case_insensitive_and_comma_optional() {
    let decls = parse_ok("entity A { x: int32 [Editable UNIQUE, searchable]; }");
    let flags = decls.entity("A").expect("A").fields[0].flags;
    assert_eq!(
        flags,
        FieldFlags::EDITABLE | FieldFlags::UNIQUE | FieldFlags::SEARCHABLE
    );
}

#[test]
fn sub_entities_register_in_parent_kind_enum() {
    let decls = parse_ok(
        "entity Dog : Animal { }
         entity Cat : Animal { }
         entity Animal { }",
    );
    let kind = decls.enumeration("AnimalKind").expect("AnimalKind");
    assert!(kind.discriminator);
    assert_eq!(kind.member_names().collect::<Vec<_>>(), ["Dog", "Cat"]);
    assert_eq!(decls.entity("Dog").expect("Dog").parent.as_deref(), Some("Animal"));
}

#[test]
fn type_must_be_declared_before_use() {
    let err = parse("entity Post { author: User; }\nentity User { }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownType { line: 1, ref name } if name == "User"));
}

#[test]
fn enum_and_entity_share_one_namespace() {
    let err = parse("enum Thing { A }\nentity Thing { }").unwrap_err();
    assert_eq!(err.to_string(), "line 2: entity 'Thing' is already declared");
}

// =============================================================================
// Error Envelope
// =============================================================================

#[test]
fn every_compile_error_names_its_line() {
    let cases = [
        ("entity A {\n  x int32;\n}", 2),
        ("entity A {\n  x: int32 [bogus];\n}", 2),
        ("\n\nrecord A { }", 3),
        ("enum E {\n  A,\n  A\n}", 3),
        ("entity A {\n  x: int32;\n  x: string;\n}", 3),
    ];
    for (source, line) in cases {
        let err = parse(source).unwrap_err();
        assert_eq!(err.line(), Some(line), "{source:?}");
        assert!(err.to_string().starts_with(&format!("line {line}: ")), "{err}");
    }
}

#[test]
fn syntax_and_semantic_errors_are_categorized() {
    assert_eq!(parse("entity { }").unwrap_err().category(), ErrorCategory::Syntax);
    assert_eq!(
        parse("entity A { x: nope; }").unwrap_err().category(),
        ErrorCategory::Semantic
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn auto_values_follow_the_last_explicit_one(
        start in 0u64..1_000_000,
        before in 0usize..4,
        after in 1usize..6,
    ) {
        let mut members: Vec<String> = (0..before).map(|i| format!("B{i}")).collect();
        members.push(format!("Pivot = {start}"));
        members.extend((0..after).map(|i| format!("A{i}")));
        let source = format!("enum E {{ {} }}", members.join(", "));

        let decls = parse(&source).expect("parses");
        let values = values(&decls, "E");
        let pivot = before;
        prop_assert_eq!(values[pivot], start);
        for i in 0..after {
            prop_assert_eq!(values[pivot + 1 + i], start + 1 + i as u64);
        }
    }

    #[test]
    fn parsing_is_deterministic(source in "[a-zA-Z0-9 :;,{}\\[\\]=\n]*") {
        let first = parse(&source);
        let second = parse(&source);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(a, b);
        }
    }
}
