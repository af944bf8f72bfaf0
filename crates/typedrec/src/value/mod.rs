// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value model: the in-memory payload bound to a schema.

mod record;
mod reference;

pub use record::{FromValue, Record};
pub use reference::{RefHandle, Reference};

use crate::schema::{ElementKind, FieldKind, ScalarKind};

/// A decoded (or to-be-encoded) field value.
///
/// Variants mirror [`FieldKind`]; a record only holds values whose shape
/// matches their descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // Scalars
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),

    Text(String),

    // Collections
    Array(Vec<Value>),
    Slice(Vec<Value>),
    Vector(Vec<Value>),

    // Nested
    Composite(Record),
    CompositeArray(Vec<Record>),
    Reference(Reference),
}

impl Value {
    /// Zero value of a scalar kind.
    pub fn default_scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool(false),
            ScalarKind::I8 => Self::I8(0),
            ScalarKind::I16 => Self::I16(0),
            ScalarKind::I32 => Self::I32(0),
            ScalarKind::I64 => Self::I64(0),
            ScalarKind::U8 => Self::U8(0),
            ScalarKind::U16 => Self::U16(0),
            ScalarKind::U32 => Self::U32(0),
            ScalarKind::U64 => Self::U64(0),
            ScalarKind::F32 => Self::F32(0.0),
            ScalarKind::F64 => Self::F64(0.0),
        }
    }

    /// Default value of an element kind.
    pub fn default_element(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Scalar(s) => Self::default_scalar(s),
            ElementKind::Text => Self::Text(String::new()),
        }
    }

    /// Default value of a field kind: zeroes, empty collections, absent references.
    pub fn default_for(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(s) => Self::default_scalar(*s),
            FieldKind::FixedArray { element, length } => {
                Self::Array(vec![Self::default_element(*element); *length])
            }
            FieldKind::VariableSlice { .. } => Self::Slice(Vec::new()),
            FieldKind::Vector { .. } => Self::Vector(Vec::new()),
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Composite(schema) => Self::Composite(Record::new(schema)),
            FieldKind::FixedArrayOfComposite { schema, length } => {
                Self::CompositeArray(vec![Record::new(schema); *length])
            }
            FieldKind::Reference(_) => Self::Reference(Reference::null()),
        }
    }

    /// Scalar kind of this value, if it is a scalar.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        Some(match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            _ => return None,
        })
    }

    /// Check if this value is a valid element of `kind`.
    pub fn matches_element(&self, kind: ElementKind) -> bool {
        match kind {
            ElementKind::Scalar(s) => self.scalar_kind() == Some(s),
            ElementKind::Text => matches!(self, Self::Text(_)),
        }
    }

    /// Shallow shape check against a field kind.
    ///
    /// Collection lengths and count links are checked by the encoder.
    pub fn matches_kind(&self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (_, FieldKind::Scalar(s)) => self.scalar_kind() == Some(*s),
            (Self::Array(items), FieldKind::FixedArray { element, .. })
            | (Self::Slice(items), FieldKind::VariableSlice { element, .. })
            | (Self::Vector(items), FieldKind::Vector { element }) => {
                items.iter().all(|v| v.matches_element(*element))
            }
            (Self::Text(_), FieldKind::Text) => true,
            (Self::Composite(rec), FieldKind::Composite(schema)) => rec.schema() == schema,
            (Self::CompositeArray(recs), FieldKind::FixedArrayOfComposite { schema, .. }) => {
                recs.iter().all(|r| r.schema() == schema)
            }
            (Self::Reference(r), FieldKind::Reference(schema)) => {
                r.target().map_or(true, |t| t.schema() == schema)
            }
            _ => false,
        }
    }

    /// Integer value usable as an element count (None for non-integers).
    pub fn as_count(&self) -> Option<i128> {
        Some(match self {
            Self::I8(v) => i128::from(*v),
            Self::I16(v) => i128::from(*v),
            Self::I32(v) => i128::from(*v),
            Self::I64(v) => i128::from(*v),
            Self::U8(v) => i128::from(*v),
            Self::U16(v) => i128::from(*v),
            Self::U32(v) => i128::from(*v),
            Self::U64(v) => i128::from(*v),
            _ => return None,
        })
    }

    /// Build a count value of integer kind `kind` (None if it does not fit).
    pub fn from_count(kind: ScalarKind, count: usize) -> Option<Self> {
        Some(match kind {
            ScalarKind::I8 => Self::I8(i8::try_from(count).ok()?),
            ScalarKind::I16 => Self::I16(i16::try_from(count).ok()?),
            ScalarKind::I32 => Self::I32(i32::try_from(count).ok()?),
            ScalarKind::I64 => Self::I64(i64::try_from(count).ok()?),
            ScalarKind::U8 => Self::U8(u8::try_from(count).ok()?),
            ScalarKind::U16 => Self::U16(u16::try_from(count).ok()?),
            ScalarKind::U32 => Self::U32(u32::try_from(count).ok()?),
            ScalarKind::U64 => Self::U64(u64::try_from(count).ok()?),
            ScalarKind::Bool | ScalarKind::F32 | ScalarKind::F64 => return None,
        })
    }

    /// Short shape name used in error messages.
    pub fn shape_name(&self) -> String {
        if let Some(s) = self.scalar_kind() {
            return s.name().to_string();
        }
        match self {
            Self::Text(_) => "text".into(),
            Self::Array(v) => format!("array[{}]", v.len()),
            Self::Slice(v) => format!("slice[{}]", v.len()),
            Self::Vector(v) => format!("vector[{}]", v.len()),
            Self::Composite(r) => r.schema().name().to_string(),
            Self::CompositeArray(v) => format!("composite array[{}]", v.len()),
            Self::Reference(_) => "reference".into(),
            _ => "scalar".into(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Elements of an array, slice or vector.
    pub fn as_elements(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) | Self::Slice(v) | Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Composite(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Self::CompositeArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }
}

macro_rules! scalar_value {
    ($($ty:ty => $variant:ident, $as:ident;)*) => {
        impl Value {
            $(
                pub fn $as(&self) -> Option<$ty> {
                    match self {
                        Self::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            )*
        }

        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

scalar_value! {
    i8 => I8, as_i8;
    i16 => I16, as_i16;
    i32 => I32, as_i32;
    i64 => I64, as_i64;
    u8 => U8, as_u8;
    u16 => U16, as_u16;
    u32 => U32, as_u32;
    u64 => U64, as_u64;
    f32 => F32, as_f32;
    f64 => F64, as_f64;
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Composite(v)
    }
}

impl From<Reference> for Value {
    fn from(v: Reference) -> Self {
        Self::Reference(v)
    }
}
