// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record container: a value model bound to a schema.

use crate::error::RecordError;
use crate::schema::{FieldKind, RecordSchema};
use crate::value::{Reference, Value};
use std::sync::Arc;

/// A record instance: one value slot per schema field, in wire order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl Record {
    /// Create a record with default values.
    pub fn new(schema: &Arc<RecordSchema>) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| Value::default_for(f.kind()))
            .collect();
        Self {
            schema: schema.clone(),
            values,
        }
    }

    /// Create from values in wire order (shapes are checked shallowly).
    pub fn from_values(
        schema: &Arc<RecordSchema>,
        values: Vec<Value>,
    ) -> Result<Self, RecordError> {
        if values.len() != schema.len() {
            return Err(RecordError::TypeMismatch {
                field: schema.name().to_string(),
                expected: format!("{} values", schema.len()),
                got: format!("{} values", values.len()),
            });
        }
        for (field, value) in schema.fields().iter().zip(&values) {
            if !value.matches_kind(field.kind()) {
                return Err(mismatch(field.name(), field.kind(), value));
            }
        }
        Ok(Self {
            schema: schema.clone(),
            values,
        })
    }

    /// Decoder-side constructor; values are built from `schema` already.
    pub(crate) fn from_parts(schema: Arc<RecordSchema>, values: Vec<Value>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Values in wire order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at field position `index`.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Result<&Value, RecordError> {
        let index = self.index_of(name)?;
        Ok(&self.values[index])
    }

    /// Get a mutable field value by name.
    ///
    /// Callers are responsible for keeping the value's shape; the encoder
    /// rejects mismatches.
    pub fn field_mut(&mut self, name: &str) -> Result<&mut Value, RecordError> {
        let index = self.index_of(name)?;
        Ok(&mut self.values[index])
    }

    /// Get a field value by name, converted to `T`.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, RecordError> {
        let value = self.field(name)?;
        T::from_value(value).ok_or_else(|| RecordError::TypeMismatch {
            field: name.to_string(),
            expected: std::any::type_name::<T>().to_string(),
            got: value.shape_name(),
        })
    }

    /// Set a field value by name.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), RecordError> {
        let index = self.index_of(name)?;
        let value = value.into();
        let kind = self.schema.fields()[index].kind();
        if !value.matches_kind(kind) {
            return Err(mismatch(name, kind, &value));
        }
        self.values[index] = value;
        Ok(())
    }

    /// Set a variable slice and its governing count field together.
    pub fn set_slice(&mut self, name: &str, elements: Vec<Value>) -> Result<(), RecordError> {
        let index = self.index_of(name)?;
        let kind = self.schema.fields()[index].kind();
        let FieldKind::VariableSlice { count_field, .. } = kind else {
            return Err(RecordError::TypeMismatch {
                field: name.to_string(),
                expected: "variable slice".into(),
                got: kind.to_string(),
            });
        };

        let slice = Value::Slice(elements);
        if !slice.matches_kind(kind) {
            return Err(mismatch(name, kind, &slice));
        }

        let count_index = self.index_of(count_field)?;
        let count_kind = match self.schema.fields()[count_index].kind() {
            FieldKind::Scalar(s) => *s,
            other => {
                return Err(RecordError::TypeMismatch {
                    field: count_field.clone(),
                    expected: "integer count".into(),
                    got: other.to_string(),
                })
            }
        };
        let len = slice.as_elements().map_or(0, <[Value]>::len);
        let count = Value::from_count(count_kind, len).ok_or_else(|| RecordError::CountOverflow {
            field: count_field.clone(),
            kind: count_kind.to_string(),
            count: len,
        })?;

        self.values[count_index] = count;
        self.values[index] = slice;
        Ok(())
    }

    fn index_of(&self, name: &str) -> Result<usize, RecordError> {
        self.schema
            .field_index(name)
            .ok_or_else(|| RecordError::FieldNotFound(name.to_string()))
    }
}

fn mismatch(field: &str, kind: &FieldKind, value: &Value) -> RecordError {
    RecordError::TypeMismatch {
        field: field.to_string(),
        expected: kind.to_string(),
        got: value.shape_name(),
    }
}

/// Conversion out of a [`Value`] for typed record access.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value {
    ($($ty:ty => $as:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Option<Self> {
                    value.$as()
                }
            }
        )*
    };
}

from_value! {
    bool => as_bool,
    i8 => as_i8,
    i16 => as_i16,
    i32 => as_i32,
    i64 => as_i64,
    u8 => as_u8,
    u16 => as_u16,
    u32 => as_u32,
    u64 => as_u64,
    f32 => as_f32,
    f64 => as_f64,
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for Record {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_record().cloned()
    }
}

impl FromValue for Reference {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_reference().cloned()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_elements()?.iter().map(T::from_value).collect()
    }
}
