// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// View round trips: every descriptor kind through encode -> decode and
// encode -> over -> to_value, plus the lazy access and in-place mutation
// guarantees the view exposes.

#![allow(clippy::unreadable_literal)]

use repro::{Descriptor, EncodeOptions, Value, View, ViewError};

fn roundtrip(desc: Descriptor, input: Value) {
    let view = View::unchecked(desc);
    let bytes = view
        .encode(&input, EncodeOptions::default())
        .expect("encode");
    assert_eq!(
        bytes.len(),
        view.byte_length(&input).expect("byte_length"),
        "encoded length must match the size calculator"
    );

    let decoded = view.decode(&bytes).expect("decode");
    assert_eq!(decoded, input, "eager decode");

    let lazy = view.over(&bytes).expect("over").to_value().expect("to_value");
    assert_eq!(lazy, input, "lazy decode");
}

fn scenario_descriptor() -> Descriptor {
    Descriptor::from_json(
        r#"{"type": "struct", "fields": [
            ["a", {"type": "integer", "signed": false, "bits": 8}],
            ["b", {"type": "integer", "signed": true, "bits": 32}],
            ["c", {"type": "char", "bytes": 16}],
            ["d", {"type": "string"}],
            ["e", {"type": "bool"}],
            ["f", {"type": "struct", "fields": [
                ["f1", {"type": "integer", "signed": false, "bits": 32}],
                ["f2", {"type": "struct", "fields": [
                    ["f2a", {"type": "char", "bytes": 4}]
                ]}]
            ]}],
            ["g", {"type": "vector", "items": {"type": "char", "bytes": 5}}]
        ]}"#,
    )
    .expect("descriptor literal")
}

fn scenario_value() -> Value {
    Value::record([
        ("a", Value::from(64u8)),
        ("b", Value::from(-100000i32)),
        ("c", Value::from("0123456789abcdef")),
        ("d", Value::from("lorem ipsum sit dolor")),
        ("e", Value::from(false)),
        (
            "f",
            Value::record([
                ("f1", Value::from(250000u32)),
                ("f2", Value::record([("f2a", Value::from("1234"))])),
            ]),
        ),
        ("g", Value::from(vec!["12345", "vwxyz", "67890"])),
    ])
}

fn tagged_union(tag_field: &str) -> Descriptor {
    Descriptor::union_builder(tag_field)
        .variant(
            0,
            Descriptor::struct_builder()
                .field(tag_field, Descriptor::uint8())
                .field("foo", Descriptor::uint8()),
        )
        .variant(
            1,
            Descriptor::struct_builder()
                .field(tag_field, Descriptor::uint8())
                .char_field("bar", 2),
        )
        .build()
}

// ===== Round trips per kind =====

#[test]
fn test_integers_roundtrip() {
    for (desc, input) in [
        (Descriptor::uint8(), Value::from(64u8)),
        (Descriptor::int8(), Value::from(64i8)),
        (Descriptor::uint16(), Value::from(4096u16)),
        (Descriptor::int16(), Value::from(4096i16)),
        (Descriptor::uint32(), Value::from(16777216u32)),
        (Descriptor::int32(), Value::from(16777216i32)),
        (Descriptor::uint64(), Value::from(u64::MAX)),
        (Descriptor::int64(), Value::from(i64::MIN)),
    ] {
        roundtrip(desc, input);
    }
}

#[test]
fn test_floats_roundtrip() {
    roundtrip(Descriptor::float64(), Value::from(std::f64::consts::PI));
    // 1.5 is exact in binary32, so widening back to f64 loses nothing.
    roundtrip(Descriptor::float32(), Value::from(1.5f32));
}

#[test]
fn test_text_roundtrip() {
    roundtrip(Descriptor::char(1), Value::from("a"));
    roundtrip(Descriptor::char(8), Value::from("abcdefgh"));
    roundtrip(Descriptor::string(), Value::from("foo bar baz"));
    roundtrip(Descriptor::string(), Value::from(""));
    roundtrip(Descriptor::string(), Value::from("\u{e9}t\u{e9} \u{1f600}"));
    roundtrip(
        Descriptor::uuid(),
        Value::from("67e55044-10b1-426f-9247-bb680e5fe0c8"),
    );
}

#[test]
fn test_bool_and_buffer_roundtrip() {
    roundtrip(Descriptor::boolean(), Value::from(true));
    roundtrip(Descriptor::boolean(), Value::from(false));
    roundtrip(Descriptor::buffer(), Value::Bytes(vec![1, 2, 3, 4]));
    roundtrip(Descriptor::buffer(), Value::Bytes(Vec::new()));
}

#[test]
fn test_struct_scenario_roundtrip() {
    roundtrip(scenario_descriptor(), scenario_value());
}

#[test]
fn test_struct_with_vector_and_array_roundtrip() {
    let input = Value::record([("a", Value::from(vec!["12345", "abcde", "67890"]))]);
    roundtrip(
        Descriptor::struct_builder()
            .field("a", Descriptor::vector(Descriptor::char(5)))
            .build(),
        input.clone(),
    );
    roundtrip(
        Descriptor::struct_builder()
            .field("a", Descriptor::array(3, Descriptor::char(5)))
            .build(),
        input,
    );
}

#[test]
fn test_array_and_vector_roundtrip() {
    roundtrip(
        Descriptor::array(2, Descriptor::uint16()),
        Value::from(vec![1024u16, 1024]),
    );
    roundtrip(
        Descriptor::vector(Descriptor::uint8()),
        Value::from(vec![64u8, 128]),
    );
    roundtrip(
        Descriptor::vector(Descriptor::char(5)),
        Value::from(vec!["abcde", "12345", "vwxyz", "67890"]),
    );
}

#[test]
fn test_vector_of_unions_roundtrip() {
    let item = Descriptor::union_builder("tag")
        .variant(
            0,
            Descriptor::struct_builder()
                .field("tag", Descriptor::uint8())
                .string_field("foo"),
        )
        .variant(
            1,
            Descriptor::struct_builder()
                .field("tag", Descriptor::uint8())
                .char_field("bar", 5),
        )
        .build();
    roundtrip(
        Descriptor::vector(item),
        Value::List(vec![
            Value::record([("tag", Value::from(0u8)), ("foo", Value::from("bar"))]),
            Value::record([("tag", Value::from(1u8)), ("bar", Value::from("abcde"))]),
        ]),
    );
}

#[test]
fn test_map_of_unions_roundtrip() {
    roundtrip(
        Descriptor::map(Descriptor::char(4), tagged_union("type")),
        Value::map([
            (
                "abcd",
                Value::record([("type", Value::from(0u8)), ("foo", Value::from(128u8))]),
            ),
            (
                "efgh",
                Value::record([("type", Value::from(1u8)), ("bar", Value::from("ab"))]),
            ),
        ]),
    );
}

#[test]
fn test_nullable_roundtrip() {
    for desc in [
        Descriptor::uint8().nullable(),
        Descriptor::char(2).nullable(),
        Descriptor::string().nullable(),
        Descriptor::vector(Descriptor::uint8()).nullable(),
        scenario_descriptor().nullable(),
    ] {
        roundtrip(desc, Value::Null);
    }
    roundtrip(Descriptor::string().nullable(), Value::from("present"));
    roundtrip(
        Descriptor::struct_builder()
            .optional_field("maybe", Descriptor::uint16())
            .field("always", Descriptor::uint16())
            .build(),
        Value::record([("maybe", Value::Null), ("always", Value::from(2u16))]),
    );
}

// ===== Properties =====

#[test]
fn test_nullable_null_is_single_zero_byte() {
    for desc in [
        Descriptor::int64().nullable(),
        Descriptor::uuid().nullable(),
        Descriptor::map(Descriptor::string(), Descriptor::string()).nullable(),
        tagged_union("type").nullable(),
    ] {
        let view = View::unchecked(desc);
        let bytes = view
            .encode(&Value::Null, EncodeOptions::default())
            .expect("encode");
        assert_eq!(bytes.as_ref(), [0]);
        assert_eq!(view.decode(&[0]), Ok(Value::Null));
        // Trailing bytes after an absent flag are never read.
        assert_eq!(view.decode(&[0, 0xFF, 0xFF]), Ok(Value::Null));
    }
}

#[test]
fn test_reencode_returns_same_buffer() {
    let view = View::with_schema(scenario_descriptor());
    let value = scenario_value();
    let bytes = view
        .encode(&value, EncodeOptions::validated())
        .expect("encode");
    let lens = view.over(&bytes).expect("over");

    let again = view.encode(&lens, EncodeOptions::default()).expect("re-encode");
    assert!(std::ptr::eq(again.as_ref(), bytes.as_ref()));

    // Validation reads the lens fully but still hands back the same bytes.
    let checked = view
        .encode(&lens, EncodeOptions::validated())
        .expect("re-encode");
    assert!(std::ptr::eq(checked.as_ref(), bytes.as_ref()));
}

#[test]
fn test_in_place_mutation() {
    let view = View::unchecked(
        Descriptor::struct_builder()
            .field("a", Descriptor::uint32())
            .build(),
    );
    let mut bytes = view
        .encode(&Value::record([("a", Value::from(64u32))]), EncodeOptions::default())
        .expect("encode")
        .into_owned();

    view.over_mut(&mut bytes)
        .set("a", &Value::from(999u32))
        .expect("set");
    assert_eq!(
        view.decode(&bytes),
        Ok(Value::record([("a", Value::from(999u32))]))
    );
}

#[test]
fn test_in_place_mutation_of_every_fixed_kind() {
    let view = View::unchecked(
        Descriptor::struct_builder()
            .field("a", Descriptor::uint8())
            .char_field("b", 3)
            .field("c", Descriptor::boolean())
            .field("d", Descriptor::array(2, Descriptor::uint32()))
            .build(),
    );
    let input = Value::record([
        ("a", Value::from(1u8)),
        ("b", Value::from("foo")),
        ("c", Value::from(true)),
        ("d", Value::from(vec![100u32, 200])),
    ]);
    let mut owned = view.from(&input, EncodeOptions::default()).expect("from");
    let len = owned.as_bytes().len();

    let mut lens = owned.lens_mut();
    lens.set("a", &Value::from(64u8)).expect("a");
    lens.set("b", &Value::from("bar")).expect("b");
    lens.set("c", &Value::from(false)).expect("c");
    lens.set("d", &Value::from(vec![123456u32, 789123]))
        .expect("d");

    assert_eq!(owned.as_bytes().len(), len);
    assert_eq!(
        owned.to_value(),
        Ok(Value::record([
            ("a", Value::from(64u8)),
            ("b", Value::from("bar")),
            ("c", Value::from(false)),
            ("d", Value::from(vec![123456u32, 789123])),
        ]))
    );
}

#[test]
fn test_in_place_mutation_rejections() {
    let nullable = View::unchecked(
        Descriptor::struct_builder()
            .optional_field("foo", Descriptor::char(3))
            .build(),
    );
    let mut bytes = nullable
        .encode(&Value::record([("foo", Value::from("bar"))]), EncodeOptions::default())
        .expect("encode")
        .into_owned();
    let err = nullable
        .over_mut(&mut bytes)
        .set("foo", &Value::from("baz"))
        .expect_err("nullable");
    assert_eq!(err, ViewError::NullableField("foo".into()));
    assert_eq!(err.to_string(), "cannot overwrite nullable field `foo`");

    let variable = View::unchecked(Descriptor::struct_builder().string_field("foo").build());
    let mut bytes = variable
        .encode(&Value::record([("foo", Value::from("bar"))]), EncodeOptions::default())
        .expect("encode")
        .into_owned();
    let err = variable
        .over_mut(&mut bytes)
        .set("foo", &Value::from("baz"))
        .expect_err("variable-length");
    assert_eq!(err.to_string(), "cannot overwrite variable-length field `foo`");
    assert_eq!(
        variable.decode(&bytes),
        Ok(Value::record([("foo", Value::from("bar"))]))
    );
}

#[test]
fn test_union_dispatch() {
    let view = View::with_schema(tagged_union("type"));
    let input = Value::record([("type", Value::from(1u8)), ("bar", Value::from("ab"))]);
    let bytes = view
        .encode(&input, EncodeOptions::validated())
        .expect("encode");
    assert_eq!(bytes[0], 1);

    let decoded = view.decode(&bytes).expect("decode");
    assert_eq!(decoded, input);
    assert!(decoded.get_field("foo").is_none());

    let lens = view.over(&bytes).expect("over");
    let variant = lens.as_struct().expect("variant");
    assert_eq!(variant.tag(), Some(1));
    assert_eq!(variant.keys().collect::<Vec<_>>(), ["type", "bar"]);
}

#[test]
fn test_vector_lazy_indexing() {
    let view = View::unchecked(Descriptor::vector(Descriptor::char(5)));
    let bytes = view
        .encode(
            &Value::from(vec!["12345", "abcde", "67890"]),
            EncodeOptions::default(),
        )
        .expect("encode")
        .into_owned();

    // Poison every byte outside the header and item 1: a read of any other
    // item would fail UTF-8 decoding.
    let mut poisoned = bytes.clone();
    for b in &mut poisoned[16..21] {
        *b = 0xFF;
    }
    for b in &mut poisoned[26..31] {
        *b = 0xFF;
    }

    let lens = view.over(&poisoned).expect("over");
    let list = lens.as_list().expect("list");
    assert_eq!(list.len(), 3);
    let second = list.get(1).expect("get").expect("present");
    assert_eq!(second.as_value(), Some(&Value::from("abcde")));
}

#[test]
fn test_lazy_path_into_scenario() {
    let view = View::unchecked(scenario_descriptor());
    let owned = view
        .from(&scenario_value(), EncodeOptions::default())
        .expect("from");

    assert_eq!(owned.get("f.f2.f2a"), Ok(Some(Value::from("1234"))));
    assert_eq!(owned.get("g.2"), Ok(Some(Value::from("67890"))));
    assert_eq!(owned.get("g.3"), Ok(None));
    assert_eq!(owned.get("f.f1"), Ok(Some(Value::UInt(250000))));
}

#[test]
fn test_validation_failure_surfaces_path() {
    let view = View::with_schema(scenario_descriptor());
    let mut value = scenario_value();
    value.set_field(
        "f",
        Value::record([
            ("f1", Value::from(-1i32)),
            ("f2", Value::record([("f2a", Value::from("1234"))])),
        ]),
    );
    match view.encode(&value, EncodeOptions::validated()) {
        Err(ViewError::Validation { path, .. }) => assert_eq!(path, "f.f1"),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_validated_values_always_roundtrip() {
    // Values the schema accepts come back equal; values that would change on
    // the wire are refused up front.
    for (desc, accepted, refused) in [
        (Descriptor::float64(), Value::Float(1.0), Value::Int(1)),
        (Descriptor::float64(), Value::Float(0.1), Value::UInt(1)),
        (Descriptor::float32(), Value::from(0.1f32), Value::Float(0.1)),
        (Descriptor::char(3), Value::from("a"), Value::from("a\0")),
    ] {
        let view = View::with_schema(desc);
        let bytes = view
            .encode(&accepted, EncodeOptions::validated())
            .expect("encode")
            .into_owned();
        assert_eq!(view.decode(&bytes), Ok(accepted));

        assert!(matches!(
            view.encode(&refused, EncodeOptions::validated()),
            Err(ViewError::Validation { .. })
        ));
    }
}
