// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field kinds: the closed set of shapes a schema field may take.

use crate::schema::RecordSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Fixed-width scalar kinds. All multi-byte scalars are big-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Size in bytes on the wire.
    pub fn size(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    /// Integer kinds may govern a `VariableSlice`.
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Bool | Self::F32 | Self::F64)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element kind of arrays, slices and vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Scalar(ScalarKind),
    /// Length-prefixed text, using the owning schema's prefix.
    Text,
}

impl From<ScalarKind> for ElementKind {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => s.fmt(f),
            Self::Text => f.write_str("text"),
        }
    }
}

/// Length prefix of text values, fixed per schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextPrefix {
    U8,
    U16,
    U32,
    /// One byte for lengths below 255, else `0xFF` followed by a u32.
    Compact,
}

impl TextPrefix {
    /// Largest text length (in bytes) this prefix can express.
    pub fn max_len(self) -> usize {
        match self {
            Self::U8 => u8::MAX as usize,
            Self::U16 => u16::MAX as usize,
            Self::U32 | Self::Compact => u32::MAX as usize,
        }
    }

    /// Number of prefix bytes written for a text of `len` bytes.
    pub fn encoded_len(self, len: usize) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::Compact if len < usize::from(crate::config::COMPACT_TEXT_ESCAPE) => 1,
            Self::Compact => 5,
        }
    }
}

impl Default for TextPrefix {
    fn default() -> Self {
        crate::config::DEFAULT_TEXT_PREFIX
    }
}

/// Kind of a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Fixed-width scalar.
    Scalar(ScalarKind),
    /// Exactly `length` elements inline.
    FixedArray { element: ElementKind, length: usize },
    /// Elements whose count is the value of an earlier integer field.
    VariableSlice {
        element: ElementKind,
        count_field: String,
    },
    /// Self-counted collection: u32 count followed by the elements.
    Vector { element: ElementKind },
    /// Length-prefixed text.
    Text,
    /// Nested record, inline with no framing.
    Composite(Arc<RecordSchema>),
    /// Exactly `length` nested records inline.
    FixedArrayOfComposite {
        schema: Arc<RecordSchema>,
        length: usize,
    },
    /// Single-owner reference: presence marker, then the target inline.
    Reference(Arc<RecordSchema>),
}

impl FieldKind {
    /// Check if this kind may act as a slice count field.
    pub fn is_count_kind(&self) -> bool {
        matches!(self, Self::Scalar(s) if s.is_integer())
    }

    /// Encoded size if it does not depend on the value (None on overflow).
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            Self::Scalar(s) => Some(s.size()),
            Self::FixedArray {
                element: ElementKind::Scalar(s),
                length,
            } => s.size().checked_mul(*length),
            Self::Composite(schema) => schema.fixed_size(),
            Self::FixedArrayOfComposite { schema, length } => {
                schema.fixed_size()?.checked_mul(*length)
            }
            Self::FixedArray {
                element: ElementKind::Text,
                ..
            }
            | Self::VariableSlice { .. }
            | Self::Vector { .. }
            | Self::Text
            | Self::Reference(_) => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => s.fmt(f),
            Self::FixedArray { element, length } => write!(f, "[{}; {}]", element, length),
            Self::VariableSlice {
                element,
                count_field,
            } => write!(f, "[{}; {}]", element, count_field),
            Self::Vector { element } => write!(f, "vector<{}>", element),
            Self::Text => f.write_str("text"),
            Self::Composite(schema) => f.write_str(schema.name()),
            Self::FixedArrayOfComposite { schema, length } => {
                write!(f, "[{}; {}]", schema.name(), length)
            }
            Self::Reference(schema) => write!(f, "&{}", schema.name()),
        }
    }
}
