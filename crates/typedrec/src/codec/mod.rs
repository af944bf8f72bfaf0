// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary encoding and decoding of records.
//!
//! # Wire format
//!
//! Fields are written back to back in declaration order with no padding,
//! no alignment and no field tags. All multi-byte scalars are big-endian.
//!
//! | Kind                    | Bytes                                            |
//! |-------------------------|--------------------------------------------------|
//! | scalar                  | fixed width (bool = 1 byte, 0 or 1)              |
//! | fixed array             | `length` elements                                |
//! | variable slice          | `count` elements, count read from earlier field  |
//! | vector                  | u32 count, then elements                         |
//! | text                    | length prefix (per schema), then UTF-8 bytes     |
//! | composite               | nested fields, no framing                        |
//! | fixed array of composite| `length` nested records                          |
//! | reference               | marker byte (0 = absent), then inline target     |

mod decoder;
mod encoder;
mod resolver;

pub use resolver::{DanglingReference, ReferenceResolver};

use crate::config::{CodecConfig, MAX_PREALLOC_BYTES};
use crate::cursor::ReadCursor;
use crate::error::{DecodeError, EncodeError};
use crate::schema::RecordSchema;
use crate::value::Record;
use decoder::Decoder;
use encoder::Encoder;
use std::io::Write;
use std::sync::Arc;

/// Encode `record` against `schema` with the default configuration.
pub fn encode(schema: &RecordSchema, record: &Record) -> Result<Vec<u8>, EncodeError> {
    RecordCodec::default().encode(schema, record)
}

/// Append the encoding of `record` to `out`, returning the bytes written.
///
/// On error `out` is left exactly as it was.
pub fn encode_into(
    schema: &RecordSchema,
    record: &Record,
    out: &mut Vec<u8>,
) -> Result<usize, EncodeError> {
    RecordCodec::default().encode_into(schema, record, out)
}

/// Decode exactly one record from `bytes`; leftover input is an error.
pub fn decode(schema: &Arc<RecordSchema>, bytes: &[u8]) -> Result<Record, DecodeError> {
    RecordCodec::default().decode(schema, bytes)
}

/// Decode one record from the front of `input`, advancing it.
pub fn decode_from(
    schema: &Arc<RecordSchema>,
    input: &mut ReadCursor<'_>,
) -> Result<Record, DecodeError> {
    RecordCodec::default().decode_from(schema, input)
}

/// Encoder/decoder pair carrying runtime limits.
///
/// Stateless between calls: one codec may be shared by many threads.
#[derive(Debug, Clone, Default)]
pub struct RecordCodec {
    config: CodecConfig,
}

impl RecordCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(&self, schema: &RecordSchema, record: &Record) -> Result<Vec<u8>, EncodeError> {
        let hint = schema.fixed_size().map_or(64, |n| n.min(MAX_PREALLOC_BYTES));
        let mut out = Vec::with_capacity(hint);
        self.encode_into(schema, record, &mut out)?;
        Ok(out)
    }

    pub fn encode_into(
        &self,
        schema: &RecordSchema,
        record: &Record,
        out: &mut Vec<u8>,
    ) -> Result<usize, EncodeError> {
        let start = out.len();
        match self.encode_to_writer(schema, record, &mut *out) {
            Ok(_) => Ok(out.len() - start),
            Err(err) => {
                out.truncate(start);
                Err(err)
            }
        }
    }

    /// Stream the encoding into any writer.
    ///
    /// Bytes already handed to `writer` are not recalled on error; use
    /// [`RecordCodec::encode_into`] when the output must stay clean.
    pub fn encode_to_writer<W: Write>(
        &self,
        schema: &RecordSchema,
        record: &Record,
        writer: W,
    ) -> Result<u64, EncodeError> {
        let mut encoder = Encoder::new(writer);
        if let Err(err) = encoder.encode_record(schema, record) {
            log::debug!("[encoder] {} failed: {}", schema.name(), err);
            return Err(err);
        }
        log::debug!(
            "[encoder] {} encoded ({} bytes, {} references)",
            schema.name(),
            encoder.position(),
            encoder.resolver().resolved()
        );
        Ok(encoder.position())
    }

    pub fn decode(&self, schema: &Arc<RecordSchema>, bytes: &[u8]) -> Result<Record, DecodeError> {
        let mut input = ReadCursor::new(bytes);
        let record = self.decode_from(schema, &mut input)?;
        if !input.is_empty() {
            let err = DecodeError::TrailingBytes {
                schema: schema.name().to_string(),
                remaining: input.remaining(),
            };
            log::debug!("[decoder] {}", err);
            return Err(err);
        }
        Ok(record)
    }

    /// Decode one record and advance `input` past it.
    ///
    /// On error `input` is not advanced.
    pub fn decode_from(
        &self,
        schema: &Arc<RecordSchema>,
        input: &mut ReadCursor<'_>,
    ) -> Result<Record, DecodeError> {
        let start = input.position();
        let mut decoder = Decoder::new(input.clone(), &self.config);
        match decoder.decode_record(schema) {
            Ok(record) => {
                let references = decoder.resolver().bound();
                *input = decoder.into_input();
                log::debug!(
                    "[decoder] {} decoded ({} bytes, {} references)",
                    schema.name(),
                    input.position() - start,
                    references
                );
                Ok(record)
            }
            Err(err) => {
                log::debug!("[decoder] {} failed at offset {}: {}", schema.name(), start, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ElementKind, ScalarKind, TextPrefix};
    use crate::value::{RefHandle, Reference, Value};

    fn counted_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("Counted")
                .scalar("n", ScalarKind::U32)
                .slice("items", ScalarKind::I16, "n")
                .build()
                .expect("schema"),
        )
    }

    fn text_schema(prefix: TextPrefix) -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("Label")
                .text_prefix(prefix)
                .text("str")
                .build()
                .expect("schema"),
        )
    }

    fn obj_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("ObjString")
                .text("str")
                .scalar("bits", ScalarKind::U32)
                .build()
                .expect("schema"),
        )
    }

    fn holder_schema() -> Arc<RecordSchema> {
        Arc::new(
            RecordSchema::builder("Holder")
                .reference("obj", obj_schema())
                .build()
                .expect("schema"),
        )
    }

    #[test]
    fn test_counted_slice_bytes() {
        let schema = counted_schema();
        let mut rec = Record::new(&schema);
        rec.set_slice("items", vec![7i16.into(), 8i16.into(), 9i16.into()])
            .unwrap();

        let bytes = encode(&schema, &rec).expect("encode");
        assert_eq!(
            bytes,
            [0x00, 0x00, 0x00, 0x03, 0x00, 0x07, 0x00, 0x08, 0x00, 0x09]
        );

        let decoded = decode(&schema, &bytes).expect("decode");
        assert_eq!(decoded, rec);
        assert_eq!(decoded.get::<Vec<i16>>("items").unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn test_zero_count_slice() {
        let schema = counted_schema();
        let rec = Record::new(&schema);

        let bytes = encode(&schema, &rec).expect("encode");
        assert_eq!(bytes, [0, 0, 0, 0]);

        let decoded = decode(&schema, &bytes).expect("decode");
        assert!(decoded.get::<Vec<i16>>("items").unwrap().is_empty());
    }

    #[test]
    fn test_count_mismatch() {
        let schema = counted_schema();
        let mut rec = Record::new(&schema);
        rec.set("n", 2u32).unwrap();
        *rec.field_mut("items").unwrap() = Value::Slice(vec![1i16.into()]);

        let err = encode(&schema, &rec).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::CountMismatch { count: 2, length: 1, ref count_field, .. } if count_field == "n"
        ));
    }

    #[test]
    fn test_negative_count_on_decode() {
        let schema = Arc::new(
            RecordSchema::builder("Signed")
                .scalar("n", ScalarKind::I32)
                .slice("items", ScalarKind::U8, "n")
                .build()
                .unwrap(),
        );

        let err = decode(&schema, &[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidCount { count: Some(-1), ref field } if field == "Signed.items"
        ));
    }

    #[test]
    fn test_text_u32_prefix() {
        let schema = text_schema(TextPrefix::U32);
        let mut rec = Record::new(&schema);
        rec.set("str", "obj-002").unwrap();

        let bytes = encode(&schema, &rec).expect("encode");
        let mut expected = vec![0x00, 0x00, 0x00, 0x07];
        expected.extend_from_slice(b"obj-002");
        assert_eq!(bytes, expected);
        assert_eq!(decode(&schema, &bytes).unwrap(), rec);

        let err = decode(&schema, &bytes[..5]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedEof { needed: 7, remaining: 1, .. }
        ));
    }

    #[test]
    fn test_text_compact_prefix() {
        let schema = text_schema(TextPrefix::Compact);
        let mut rec = Record::new(&schema);

        rec.set("str", "abc").unwrap();
        let bytes = encode(&schema, &rec).expect("encode");
        assert_eq!(bytes, [0x03, b'a', b'b', b'c']);

        let long = "x".repeat(300);
        rec.set("str", long.as_str()).unwrap();
        let bytes = encode(&schema, &rec).expect("encode");
        assert_eq!(&bytes[..5], &[0xFF, 0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(bytes.len(), 305);
        assert_eq!(decode(&schema, &bytes).unwrap().get::<String>("str").unwrap(), long);
    }

    #[test]
    fn test_text_too_long_for_prefix() {
        let schema = text_schema(TextPrefix::U8);
        let mut rec = Record::new(&schema);
        rec.set("str", "y".repeat(256)).unwrap();

        let err = encode(&schema, &rec).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::TextTooLong { length: 256, max: 255, .. }
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let schema = text_schema(TextPrefix::U8);
        let err = decode(&schema, &[0x02, 0xC3, 0x28]).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidText { .. }));
    }

    #[test]
    fn test_absent_reference() {
        let schema = holder_schema();
        let rec = Record::new(&schema);

        let bytes = encode(&schema, &rec).expect("encode");
        assert_eq!(bytes, [0x00]);

        let decoded = decode(&schema, &bytes).expect("decode");
        assert!(!decoded.get::<Reference>("obj").unwrap().is_present());
    }

    #[test]
    fn test_present_reference() {
        let schema = holder_schema();
        let mut target = Record::new(&obj_schema());
        target.set("str", "hi").unwrap();
        target.set("bits", 5u32).unwrap();

        let mut rec = Record::new(&schema);
        rec.set("obj", Reference::new(RefHandle::new(42), target))
            .unwrap();

        let bytes = encode(&schema, &rec).expect("encode");
        assert_eq!(
            bytes,
            [0x01, 0x00, 0x00, 0x00, 0x02, b'h', b'i', 0x00, 0x00, 0x00, 0x05]
        );

        let decoded = decode(&schema, &bytes).expect("decode");
        assert_eq!(decoded, rec);
        let obj = decoded.get::<Reference>("obj").unwrap();
        assert_eq!(obj.handle(), Some(RefHandle::new(1)));
        assert_eq!(obj.target().unwrap().get::<String>("str").unwrap(), "hi");
    }

    #[test]
    fn test_any_nonzero_marker_is_present() {
        let schema = holder_schema();
        let bytes = [0x7F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09];
        let decoded = decode(&schema, &bytes).expect("decode");
        let obj = decoded.get::<Reference>("obj").unwrap();
        assert_eq!(obj.target().unwrap().get::<u32>("bits").unwrap(), 9);
    }

    #[test]
    fn test_dangling_reference() {
        let schema = holder_schema();
        let mut rec = Record::new(&schema);
        rec.set("obj", Reference::unresolved(RefHandle::new(3)))
            .unwrap();

        let err = encode(&schema, &rec).unwrap_err();
        assert!(matches!(err, EncodeError::DanglingReference { ref field } if field == "Holder.obj"));
    }

    #[test]
    fn test_length_mismatch() {
        let schema = Arc::new(
            RecordSchema::builder("Fixed")
                .array("arr", ScalarKind::U8, 3)
                .build()
                .unwrap(),
        );
        let mut rec = Record::new(&schema);
        *rec.field_mut("arr").unwrap() = Value::Array(vec![1u8.into(); 2]);

        let err = encode(&schema, &rec).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::LengthMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn test_value_mismatch_path() {
        let point = Arc::new(
            RecordSchema::builder("P3")
                .scalar("px", ScalarKind::I32)
                .build()
                .unwrap(),
        );
        let schema = Arc::new(
            RecordSchema::builder("Event")
                .composite("p3", point)
                .build()
                .unwrap(),
        );
        let mut rec = Record::new(&schema);
        if let Value::Composite(inner) = rec.field_mut("p3").unwrap() {
            *inner.field_mut("px").unwrap() = Value::F32(1.0);
        }

        let err = encode(&schema, &rec).unwrap_err();
        assert!(matches!(err, EncodeError::ValueMismatch { ref field, .. } if field == "Event.p3.px"));
    }

    #[test]
    fn test_schema_mismatch() {
        let rec = Record::new(&counted_schema());
        let other = text_schema(TextPrefix::U32);
        assert!(matches!(
            encode(&other, &rec),
            Err(EncodeError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_encode_into_rolls_back() {
        let schema = counted_schema();
        let mut out = vec![0xAA, 0xBB];

        let mut good = Record::new(&schema);
        good.set_slice("items", vec![1i16.into()]).unwrap();
        assert_eq!(encode_into(&schema, &good, &mut out).unwrap(), 6);
        assert_eq!(out.len(), 8);

        let mut bad = good.clone();
        bad.set("n", 5u32).unwrap();
        assert!(encode_into(&schema, &bad, &mut out).is_err());
        assert_eq!(out, [0xAA, 0xBB, 0, 0, 0, 1, 0, 1]);
    }

    #[test]
    fn test_trailing_bytes() {
        let schema = counted_schema();
        let err = decode(&schema, &[0, 0, 0, 0, 0xEE]).unwrap_err();
        assert!(matches!(err, DecodeError::TrailingBytes { remaining: 1, .. }));
    }

    #[test]
    fn test_decode_from_back_to_back() {
        let schema = counted_schema();
        let mut first = Record::new(&schema);
        first.set_slice("items", vec![1i16.into(), 2i16.into()]).unwrap();
        let second = Record::new(&schema);

        let mut stream = Vec::new();
        encode_into(&schema, &first, &mut stream).unwrap();
        encode_into(&schema, &second, &mut stream).unwrap();
        stream.extend_from_slice(&[0, 0]);

        let mut input = ReadCursor::new(&stream);
        assert_eq!(decode_from(&schema, &mut input).unwrap(), first);
        assert_eq!(decode_from(&schema, &mut input).unwrap(), second);
        assert_eq!(input.remaining(), 2);

        // A failed decode leaves the cursor where it was.
        assert!(decode_from(&schema, &mut input).is_err());
        assert_eq!(input.remaining(), 2);
    }

    #[test]
    fn test_config_limits() {
        let codec = RecordCodec::new(CodecConfig::new().with_max_count(2).with_max_text_len(4));

        let schema = Arc::new(
            RecordSchema::builder("Limited")
                .vector("v", ScalarKind::U8)
                .build()
                .unwrap(),
        );
        assert!(codec.decode(&schema, &[0, 0, 0, 2, 1, 2]).is_ok());
        assert!(matches!(
            codec.decode(&schema, &[0, 0, 0, 3, 1, 2, 3]),
            Err(DecodeError::InvalidCount { count: Some(3), .. })
        ));

        let names = text_schema(TextPrefix::U8);
        assert!(matches!(
            codec.decode(&names, &[5, b'a', b'b', b'c', b'd', b'e']),
            Err(DecodeError::InvalidCount { count: Some(5), .. })
        ));
    }

    #[test]
    fn test_huge_count_fails_on_eof() {
        let schema = Arc::new(
            RecordSchema::builder("Huge")
                .vector("v", ElementKind::Text)
                .build()
                .unwrap(),
        );
        let err = decode(&schema, &[0xFF, 0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_huge_composite_array_fails_on_eof() {
        let json = format!(
            r#"{{"name":"Huge","fields":[{{"name":"pts","kind":"fixed_array_of_composite",
                "schema":{{"name":"P","fields":[{{"name":"x","kind":"scalar","scalar":"i32"}}]}},
                "length":{}}}]}}"#,
            usize::MAX / 2
        );
        let schema = Arc::new(RecordSchema::from_json(&json).unwrap());
        let err = decode(&schema, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, DecodeError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_huge_fixed_array_reports_length_mismatch() {
        let schema = Arc::new(
            RecordSchema::builder("Huge")
                .array("arr", ScalarKind::U64, usize::MAX / 4)
                .build()
                .unwrap(),
        );
        assert_eq!(schema.fixed_size(), None);

        let rec = Record::from_values(&schema, vec![Value::Array(vec![])]).unwrap();
        let err = encode(&schema, &rec).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::LengthMismatch { found: 0, .. }
        ));
    }

    #[test]
    fn test_bool_encoding() {
        let schema = Arc::new(
            RecordSchema::builder("Flags")
                .scalar("a", ScalarKind::Bool)
                .scalar("b", ScalarKind::Bool)
                .build()
                .unwrap(),
        );
        let mut rec = Record::new(&schema);
        rec.set("a", true).unwrap();

        assert_eq!(encode(&schema, &rec).unwrap(), [1, 0]);
        let decoded = decode(&schema, &[2, 0]).unwrap();
        assert!(decoded.get::<bool>("a").unwrap());
    }
}
