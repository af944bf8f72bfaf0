// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven encoder.

use crate::codec::resolver::ReferenceResolver;
use crate::config::{COMPACT_TEXT_ESCAPE, REFERENCE_ABSENT, REFERENCE_PRESENT};
use crate::cursor::WriteCursor;
use crate::error::EncodeError;
use crate::schema::{ElementKind, FieldDescriptor, FieldKind, RecordSchema, ScalarKind, TextPrefix};
use crate::value::{Record, Value};
use std::io::Write;

/// Walks a schema in field order and writes the matching record values.
pub(crate) struct Encoder<'r, W: Write> {
    out: WriteCursor<W>,
    resolver: ReferenceResolver,
    path: Vec<&'r str>,
}

impl<'r, W: Write> Encoder<'r, W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out: WriteCursor::new(out),
            resolver: ReferenceResolver::new(),
            path: Vec::new(),
        }
    }

    /// Bytes written so far.
    pub(crate) fn position(&self) -> u64 {
        self.out.position()
    }

    pub(crate) fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    /// Encode a top-level record.
    pub(crate) fn encode_record(
        &mut self,
        schema: &'r RecordSchema,
        record: &'r Record,
    ) -> Result<(), EncodeError> {
        self.path.push(schema.name());
        self.encode_fields(schema, record)?;
        self.path.pop();
        Ok(())
    }

    fn encode_fields(
        &mut self,
        schema: &'r RecordSchema,
        record: &'r Record,
    ) -> Result<(), EncodeError> {
        let bound = record.schema().as_ref();
        if !std::ptr::eq(bound, schema) && bound != schema {
            return Err(EncodeError::SchemaMismatch {
                expected: schema.name().to_string(),
                found: bound.name().to_string(),
            });
        }

        for (field, value) in schema.fields().iter().zip(record.values()) {
            log::trace!("[encoder] {} ({})", self.path(field.name()), field.kind());
            self.encode_field(schema, record, field, value)?;
        }
        Ok(())
    }

    fn encode_field(
        &mut self,
        schema: &'r RecordSchema,
        record: &'r Record,
        field: &'r FieldDescriptor,
        value: &'r Value,
    ) -> Result<(), EncodeError> {
        let name = field.name();
        let prefix = schema.text_prefix();

        match field.kind() {
            FieldKind::Scalar(kind) => self.encode_scalar(name, *kind, value),

            FieldKind::FixedArray { element, length } => {
                let Value::Array(items) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                if items.len() != *length {
                    return Err(EncodeError::LengthMismatch {
                        field: self.path(name),
                        expected: *length,
                        found: items.len(),
                    });
                }
                self.encode_elements(name, *element, prefix, items)
            }

            FieldKind::VariableSlice {
                element,
                count_field,
            } => {
                let Value::Slice(items) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                let count = self.count_of(schema, record, count_field)?;
                if count != items.len() as i128 {
                    return Err(EncodeError::CountMismatch {
                        field: self.path(name),
                        count_field: count_field.clone(),
                        count,
                        length: items.len(),
                    });
                }
                self.encode_elements(name, *element, prefix, items)
            }

            FieldKind::Vector { element } => {
                let Value::Vector(items) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                let count = vector_count(items.len()).ok_or_else(|| {
                    EncodeError::TooManyElements {
                        field: self.path(name),
                        count: items.len(),
                        max: u32::MAX as usize,
                    }
                })?;
                self.out.write_u32(count)?;
                self.encode_elements(name, *element, prefix, items)
            }

            FieldKind::Text => {
                let Value::Text(text) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                self.encode_text(name, prefix, text)
            }

            FieldKind::Composite(nested) => {
                let Value::Composite(inner) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                self.encode_nested(name, nested, inner)
            }

            FieldKind::FixedArrayOfComposite {
                schema: nested,
                length,
            } => {
                let Value::CompositeArray(items) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                if items.len() != *length {
                    return Err(EncodeError::LengthMismatch {
                        field: self.path(name),
                        expected: *length,
                        found: items.len(),
                    });
                }
                for item in items {
                    self.encode_nested(name, nested, item)?;
                }
                Ok(())
            }

            FieldKind::Reference(nested) => {
                let Value::Reference(reference) = value else {
                    return Err(self.mismatch(name, field.kind(), value));
                };
                match self.resolver.resolve(reference) {
                    Ok(None) => Ok(self.out.write_u8(REFERENCE_ABSENT)?),
                    Ok(Some(target)) => {
                        self.out.write_u8(REFERENCE_PRESENT)?;
                        self.encode_nested(name, nested, target)
                    }
                    Err(_) => Err(EncodeError::DanglingReference {
                        field: self.path(name),
                    }),
                }
            }
        }
    }

    fn encode_nested(
        &mut self,
        name: &'r str,
        schema: &'r RecordSchema,
        record: &'r Record,
    ) -> Result<(), EncodeError> {
        self.path.push(name);
        self.encode_fields(schema, record)?;
        self.path.pop();
        Ok(())
    }

    fn encode_elements(
        &mut self,
        name: &str,
        element: ElementKind,
        prefix: TextPrefix,
        items: &[Value],
    ) -> Result<(), EncodeError> {
        for item in items {
            match (element, item) {
                (ElementKind::Scalar(kind), _) => self.encode_scalar(name, kind, item)?,
                (ElementKind::Text, Value::Text(text)) => self.encode_text(name, prefix, text)?,
                (ElementKind::Text, _) => {
                    return Err(EncodeError::ValueMismatch {
                        field: self.path(name),
                        expected: element.to_string(),
                        found: item.shape_name(),
                    })
                }
            }
        }
        Ok(())
    }

    fn encode_scalar(&mut self, name: &str, kind: ScalarKind, value: &Value) -> Result<(), EncodeError> {
        match (kind, value) {
            (ScalarKind::Bool, Value::Bool(v)) => self.out.write_u8(u8::from(*v))?,
            (ScalarKind::I8, Value::I8(v)) => self.out.write_i8(*v)?,
            (ScalarKind::I16, Value::I16(v)) => self.out.write_i16(*v)?,
            (ScalarKind::I32, Value::I32(v)) => self.out.write_i32(*v)?,
            (ScalarKind::I64, Value::I64(v)) => self.out.write_i64(*v)?,
            (ScalarKind::U8, Value::U8(v)) => self.out.write_u8(*v)?,
            (ScalarKind::U16, Value::U16(v)) => self.out.write_u16(*v)?,
            (ScalarKind::U32, Value::U32(v)) => self.out.write_u32(*v)?,
            (ScalarKind::U64, Value::U64(v)) => self.out.write_u64(*v)?,
            (ScalarKind::F32, Value::F32(v)) => self.out.write_f32(*v)?,
            (ScalarKind::F64, Value::F64(v)) => self.out.write_f64(*v)?,
            _ => {
                return Err(EncodeError::ValueMismatch {
                    field: self.path(name),
                    expected: kind.to_string(),
                    found: value.shape_name(),
                })
            }
        }
        Ok(())
    }

    fn encode_text(&mut self, name: &str, prefix: TextPrefix, text: &str) -> Result<(), EncodeError> {
        let len = text.len();
        if len > prefix.max_len() {
            return Err(EncodeError::TextTooLong {
                field: self.path(name),
                length: len,
                max: prefix.max_len(),
            });
        }

        // Narrowing casts below are bounded by max_len().
        match prefix {
            TextPrefix::U8 => self.out.write_u8(len as u8)?,
            TextPrefix::U16 => self.out.write_u16(len as u16)?,
            TextPrefix::U32 => self.out.write_u32(len as u32)?,
            TextPrefix::Compact if len < usize::from(COMPACT_TEXT_ESCAPE) => {
                self.out.write_u8(len as u8)?;
            }
            TextPrefix::Compact => {
                self.out.write_u8(COMPACT_TEXT_ESCAPE)?;
                self.out.write_u32(len as u32)?;
            }
        }
        self.out.write_bytes(text.as_bytes())?;
        Ok(())
    }

    /// Current value of a slice's count field, read from the same record.
    fn count_of(
        &self,
        schema: &RecordSchema,
        record: &Record,
        count_field: &str,
    ) -> Result<i128, EncodeError> {
        let value = schema
            .field_index(count_field)
            .and_then(|i| record.value(i));
        match value.and_then(Value::as_count) {
            Some(count) => Ok(count),
            None => Err(EncodeError::ValueMismatch {
                field: self.path(count_field),
                expected: "integer count".into(),
                found: value.map_or_else(|| "nothing".into(), Value::shape_name),
            }),
        }
    }

    fn mismatch(&self, name: &str, kind: &FieldKind, value: &Value) -> EncodeError {
        EncodeError::ValueMismatch {
            field: self.path(name),
            expected: kind.to_string(),
            found: value.shape_name(),
        }
    }

    /// Dotted path of `field` under the records entered so far.
    fn path(&self, field: &str) -> String {
        let mut path = self.path.join(".");
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(field);
        path
    }
}

/// Inline element count of a vector, if it fits the u32 wire field.
fn vector_count(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}
