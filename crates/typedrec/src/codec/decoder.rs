// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-pass, schema-driven decoder.
//!
//! Fields are read strictly in declaration order. Integer scalars are
//! remembered per record level so that a later slice can look up its
//! element count; nothing is ever read twice.

use crate::codec::resolver::ReferenceResolver;
use crate::config::{CodecConfig, COMPACT_TEXT_ESCAPE, MAX_PREALLOC_ELEMENTS, REFERENCE_ABSENT};
use crate::cursor::{Eof, ReadCursor};
use crate::error::DecodeError;
use crate::schema::{ElementKind, FieldDescriptor, FieldKind, RecordSchema, ScalarKind, TextPrefix};
use crate::value::{Record, Reference, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Integer fields seen so far at one record level.
type Counts<'s> = HashMap<&'s str, i128>;

pub(crate) struct Decoder<'a, 's> {
    input: ReadCursor<'a>,
    config: &'s CodecConfig,
    resolver: ReferenceResolver,
    path: Vec<&'s str>,
}

impl<'a, 's> Decoder<'a, 's> {
    pub(crate) fn new(input: ReadCursor<'a>, config: &'s CodecConfig) -> Self {
        Self {
            input,
            config,
            resolver: ReferenceResolver::new(),
            path: Vec::new(),
        }
    }

    pub(crate) fn into_input(self) -> ReadCursor<'a> {
        self.input
    }

    pub(crate) fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    /// Decode a top-level record.
    pub(crate) fn decode_record(
        &mut self,
        schema: &'s Arc<RecordSchema>,
    ) -> Result<Record, DecodeError> {
        self.path.push(schema.name());
        let record = self.decode_fields(schema)?;
        self.path.pop();
        Ok(record)
    }

    fn decode_fields(&mut self, schema: &'s Arc<RecordSchema>) -> Result<Record, DecodeError> {
        let mut counts = Counts::new();
        let mut values = Vec::with_capacity(schema.len());

        for field in schema.fields() {
            log::trace!(
                "[decoder] {} ({}) at {}",
                self.path(field.name()),
                field.kind(),
                self.input.position()
            );
            let value = self.decode_field(schema, field, &counts)?;
            if let Some(count) = value.as_count() {
                counts.insert(field.name(), count);
            }
            values.push(value);
        }

        Ok(Record::from_parts(Arc::clone(schema), values))
    }

    fn decode_field(
        &mut self,
        schema: &'s RecordSchema,
        field: &'s FieldDescriptor,
        counts: &Counts<'s>,
    ) -> Result<Value, DecodeError> {
        let name = field.name();
        let prefix = schema.text_prefix();

        Ok(match field.kind() {
            FieldKind::Scalar(kind) => self.decode_scalar(name, *kind)?,

            FieldKind::FixedArray { element, length } => {
                Value::Array(self.decode_elements(name, *element, prefix, *length)?)
            }

            FieldKind::VariableSlice {
                element,
                count_field,
            } => {
                let count = counts.get(count_field.as_str()).copied();
                let count = self.check_count(name, count)?;
                Value::Slice(self.decode_elements(name, *element, prefix, count)?)
            }

            FieldKind::Vector { element } => {
                let count = self.input.read_u32().map_err(|e| self.eof(name, e))?;
                let count = self.check_count(name, Some(i128::from(count)))?;
                Value::Vector(self.decode_elements(name, *element, prefix, count)?)
            }

            FieldKind::Text => Value::Text(self.decode_text(name, prefix)?),

            FieldKind::Composite(nested) => Value::Composite(self.decode_nested(name, nested)?),

            FieldKind::FixedArrayOfComposite {
                schema: nested,
                length,
            } => {
                let mut items = Vec::with_capacity((*length).min(MAX_PREALLOC_ELEMENTS));
                for _ in 0..*length {
                    items.push(self.decode_nested(name, nested)?);
                }
                Value::CompositeArray(items)
            }

            FieldKind::Reference(nested) => {
                let marker = self.input.read_u8().map_err(|e| self.eof(name, e))?;
                if marker == REFERENCE_ABSENT {
                    Value::Reference(Reference::null())
                } else {
                    let target = self.decode_nested(name, nested)?;
                    Value::Reference(self.resolver.bind(target))
                }
            }
        })
    }

    fn decode_nested(
        &mut self,
        name: &'s str,
        schema: &'s Arc<RecordSchema>,
    ) -> Result<Record, DecodeError> {
        self.path.push(name);
        let record = self.decode_fields(schema)?;
        self.path.pop();
        Ok(record)
    }

    fn decode_elements(
        &mut self,
        name: &str,
        element: ElementKind,
        prefix: TextPrefix,
        count: usize,
    ) -> Result<Vec<Value>, DecodeError> {
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOC_ELEMENTS));
        for _ in 0..count {
            items.push(match element {
                ElementKind::Scalar(kind) => self.decode_scalar(name, kind)?,
                ElementKind::Text => Value::Text(self.decode_text(name, prefix)?),
            });
        }
        Ok(items)
    }

    fn decode_scalar(&mut self, name: &str, kind: ScalarKind) -> Result<Value, DecodeError> {
        let input = &mut self.input;
        let value = match kind {
            ScalarKind::Bool => input.read_u8().map(|b| Value::Bool(b != 0)),
            ScalarKind::I8 => input.read_i8().map(Value::I8),
            ScalarKind::I16 => input.read_i16().map(Value::I16),
            ScalarKind::I32 => input.read_i32().map(Value::I32),
            ScalarKind::I64 => input.read_i64().map(Value::I64),
            ScalarKind::U8 => input.read_u8().map(Value::U8),
            ScalarKind::U16 => input.read_u16().map(Value::U16),
            ScalarKind::U32 => input.read_u32().map(Value::U32),
            ScalarKind::U64 => input.read_u64().map(Value::U64),
            ScalarKind::F32 => input.read_f32().map(Value::F32),
            ScalarKind::F64 => input.read_f64().map(Value::F64),
        };
        value.map_err(|e| self.eof(name, e))
    }

    fn decode_text(&mut self, name: &str, prefix: TextPrefix) -> Result<String, DecodeError> {
        let len = match prefix {
            TextPrefix::U8 => self.input.read_u8().map(u64::from),
            TextPrefix::U16 => self.input.read_u16().map(u64::from),
            TextPrefix::U32 => self.input.read_u32().map(u64::from),
            TextPrefix::Compact => match self.input.read_u8() {
                Ok(COMPACT_TEXT_ESCAPE) => self.input.read_u32().map(u64::from),
                other => other.map(u64::from),
            },
        }
        .map_err(|e| self.eof(name, e))?;

        let len = usize::try_from(len)
            .ok()
            .filter(|&len| self.config.text_len_allowed(len))
            .ok_or_else(|| DecodeError::InvalidCount {
                field: self.path(name),
                count: Some(i128::from(len)),
            })?;

        let bytes = self.input.read_bytes(len).map_err(|e| self.eof(name, e))?;
        String::from_utf8(bytes.to_vec()).map_err(|source| DecodeError::InvalidText {
            field: self.path(name),
            source,
        })
    }

    /// Validate an element count read earlier in the stream.
    fn check_count(&self, name: &str, count: Option<i128>) -> Result<usize, DecodeError> {
        count
            .and_then(|c| usize::try_from(c).ok())
            .filter(|&c| self.config.count_allowed(c))
            .ok_or_else(|| DecodeError::InvalidCount {
                field: self.path(name),
                count,
            })
    }

    fn eof(&self, name: &str, e: Eof) -> DecodeError {
        DecodeError::UnexpectedEof {
            field: self.path(name),
            needed: e.needed,
            remaining: e.remaining,
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
