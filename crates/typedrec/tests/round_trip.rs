// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Randomized round trips: decode(encode(v)) == v for generated records.

use std::sync::Arc;
use typedrec::{
    decode, decode_from, encode, encode_into, cursor::ReadCursor, DecodeError, ElementKind,
    FieldKind, Record, RecordSchema, RefHandle, Reference, ScalarKind, TextPrefix, Value,
};

const ITERATIONS: usize = 200;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_scalar(rng: &mut fastrand::Rng, kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Bool => Value::Bool(rng.bool()),
        ScalarKind::I8 => Value::I8(rng.i8(..)),
        ScalarKind::I16 => Value::I16(rng.i16(..)),
        ScalarKind::I32 => Value::I32(rng.i32(..)),
        ScalarKind::I64 => Value::I64(rng.i64(..)),
        ScalarKind::U8 => Value::U8(rng.u8(..)),
        ScalarKind::U16 => Value::U16(rng.u16(..)),
        ScalarKind::U32 => Value::U32(rng.u32(..)),
        ScalarKind::U64 => Value::U64(rng.u64(..)),
        // Finite values only: NaN never compares equal.
        ScalarKind::F32 => Value::F32(rng.f32() * 1e6 - 5e5),
        ScalarKind::F64 => Value::F64(rng.f64() * 1e12 - 5e11),
    }
}

fn random_text(rng: &mut fastrand::Rng) -> String {
    let len = rng.usize(0..40);
    (0..len)
        .map(|_| match rng.u8(0..10) {
            0 => 'é',
            1 => '✓',
            _ => rng.alphanumeric(),
        })
        .collect()
}

fn random_element(rng: &mut fastrand::Rng, element: ElementKind) -> Value {
    match element {
        ElementKind::Scalar(kind) => random_scalar(rng, kind),
        ElementKind::Text => Value::Text(random_text(rng)),
    }
}

fn random_record(rng: &mut fastrand::Rng, schema: &Arc<RecordSchema>) -> Record {
    let mut rec = Record::new(schema);

    for field in schema.fields() {
        let name = field.name();
        match field.kind() {
            // Set through set_slice below.
            FieldKind::Scalar(_) if name == "n" => {}
            FieldKind::Scalar(kind) => rec.set(name, random_scalar(rng, *kind)).unwrap(),
            FieldKind::FixedArray { element, length } => {
                let items = (0..*length).map(|_| random_element(rng, *element)).collect();
                rec.set(name, Value::Array(items)).unwrap();
            }
            FieldKind::VariableSlice { .. } => {}
            FieldKind::Vector { element } => {
                let len = rng.usize(0..8);
                let items = (0..len).map(|_| random_element(rng, *element)).collect();
                rec.set(name, Value::Vector(items)).unwrap();
            }
            FieldKind::Text => rec.set(name, random_text(rng)).unwrap(),
            FieldKind::Composite(nested) => {
                rec.set(name, random_record(rng, nested)).unwrap();
            }
            FieldKind::FixedArrayOfComposite { schema, length } => {
                let items = (0..*length).map(|_| random_record(rng, schema)).collect();
                rec.set(name, Value::CompositeArray(items)).unwrap();
            }
            FieldKind::Reference(nested) => {
                let reference = if rng.bool() {
                    Reference::new(RefHandle::new(rng.u32(1..)), random_record(rng, nested))
                } else {
                    Reference::null()
                };
                rec.set(name, reference).unwrap();
            }
        }
    }

    // All slices share one count, so draw it once.
    let count = rng.usize(0..12);
    for field in schema.fields() {
        if let FieldKind::VariableSlice { element, .. } = field.kind() {
            let items = (0..count).map(|_| random_element(rng, *element)).collect();
            rec.set_slice(field.name(), items).unwrap();
        }
    }

    rec
}

fn event_schema() -> Arc<RecordSchema> {
    let p3 = Arc::new(
        RecordSchema::builder("P3")
            .scalar("px", ScalarKind::I32)
            .scalar("py", ScalarKind::F64)
            .scalar("pz", ScalarKind::I32)
            .build()
            .unwrap(),
    );
    let obj = Arc::new(
        RecordSchema::builder("ObjString")
            .text_prefix(TextPrefix::Compact)
            .text("str")
            .scalar("bits", ScalarKind::U32)
            .build()
            .unwrap(),
    );
    Arc::new(
        RecordSchema::builder("Event")
            .scalar("flag", ScalarKind::Bool)
            .scalar("i8", ScalarKind::I8)
            .scalar("u64", ScalarKind::U64)
            .scalar("f32", ScalarKind::F32)
            .text("name")
            .scalar("n", ScalarKind::U16)
            .slice("sli_i16", ScalarKind::I16, "n")
            .composite("p3", p3.clone())
            .slice("sli_str", ElementKind::Text, "n")
            .array("arr_f64", ScalarKind::F64, 4)
            .array("arr_str", ElementKind::Text, 2)
            .reference("obj", obj)
            .composite_array("arr_p3", p3, 3)
            .vector("vec_u8", ScalarKind::U8)
            .vector("vec_str", ElementKind::Text)
            .build()
            .unwrap(),
    )
}

#[test]
fn random_events_round_trip() {
    init_logging();
    let mut rng = fastrand::Rng::with_seed(0x5EED);
    let schema = event_schema();

    for _ in 0..ITERATIONS {
        let rec = random_record(&mut rng, &schema);
        let bytes = encode(&schema, &rec).expect("encode");
        let decoded = decode(&schema, &bytes).expect("decode");
        assert_eq!(decoded, rec);
    }
}

#[test]
fn random_stream_round_trip() {
    init_logging();
    let mut rng = fastrand::Rng::with_seed(42);
    let schema = event_schema();

    let records: Vec<Record> = (0..32).map(|_| random_record(&mut rng, &schema)).collect();
    let mut stream = Vec::new();
    for rec in &records {
        encode_into(&schema, rec, &mut stream).expect("encode");
    }

    let mut input = ReadCursor::new(&stream);
    for rec in &records {
        assert_eq!(&decode_from(&schema, &mut input).expect("decode"), rec);
    }
    assert!(input.is_empty());
}

#[test]
fn every_truncation_is_rejected() {
    init_logging();
    let mut rng = fastrand::Rng::with_seed(7);
    let schema = event_schema();
    let rec = random_record(&mut rng, &schema);
    let bytes = encode(&schema, &rec).expect("encode");

    for cut in 0..bytes.len() {
        match decode(&schema, &bytes[..cut]) {
            Err(DecodeError::UnexpectedEof { .. }) => {}
            other => panic!("truncation at {cut}: expected EOF, got {other:?}"),
        }
    }
}
