// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema dictionary: JSON form of a [`RecordSchema`].
//!
//! A dictionary travels next to the encoded bytes so a reader without the
//! producer's types can rebuild the schema. Loading goes through
//! [`RecordSchema::build`], so a loaded schema is validated like a built one.
//!
//! ```json
//! {
//!   "name": "Event",
//!   "text_prefix": "u32",
//!   "fields": [
//!     { "name": "n", "kind": "scalar", "scalar": "u32" },
//!     { "name": "items", "kind": "variable_slice", "element": { "scalar": "i16" }, "count_field": "n" }
//!   ]
//! }
//! ```

use crate::error::SchemaError;
use crate::schema::{ElementKind, FieldDescriptor, FieldKind, RecordSchema, ScalarKind, TextPrefix};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    pub name: String,
    #[serde(default)]
    pub text_prefix: TextPrefix,
    pub fields: Vec<FieldDef>,
}

/// Serialized field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: KindDef,
}

/// Serialized field kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KindDef {
    Scalar { scalar: ScalarKind },
    FixedArray { element: ElementKind, length: usize },
    VariableSlice {
        element: ElementKind,
        count_field: String,
    },
    Vector { element: ElementKind },
    Text,
    Composite { schema: SchemaDef },
    FixedArrayOfComposite { schema: SchemaDef, length: usize },
    Reference { schema: SchemaDef },
}

impl From<&RecordSchema> for SchemaDef {
    fn from(schema: &RecordSchema) -> Self {
        Self {
            name: schema.name().to_string(),
            text_prefix: schema.text_prefix(),
            fields: schema
                .fields()
                .iter()
                .map(|f| FieldDef {
                    name: f.name().to_string(),
                    kind: KindDef::from(f.kind()),
                })
                .collect(),
        }
    }
}

impl From<&FieldKind> for KindDef {
    fn from(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Scalar(s) => Self::Scalar { scalar: *s },
            FieldKind::FixedArray { element, length } => Self::FixedArray {
                element: *element,
                length: *length,
            },
            FieldKind::VariableSlice {
                element,
                count_field,
            } => Self::VariableSlice {
                element: *element,
                count_field: count_field.clone(),
            },
            FieldKind::Vector { element } => Self::Vector { element: *element },
            FieldKind::Text => Self::Text,
            FieldKind::Composite(schema) => Self::Composite {
                schema: SchemaDef::from(schema.as_ref()),
            },
            FieldKind::FixedArrayOfComposite { schema, length } => Self::FixedArrayOfComposite {
                schema: SchemaDef::from(schema.as_ref()),
                length: *length,
            },
            FieldKind::Reference(schema) => Self::Reference {
                schema: SchemaDef::from(schema.as_ref()),
            },
        }
    }
}

impl TryFrom<SchemaDef> for RecordSchema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        let fields = def
            .fields
            .into_iter()
            .map(|f| -> Result<FieldDescriptor, SchemaError> {
                Ok(FieldDescriptor::new(f.name, FieldKind::try_from(f.kind)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        RecordSchema::build(def.name, def.text_prefix, fields)
    }
}

impl TryFrom<KindDef> for FieldKind {
    type Error = SchemaError;

    fn try_from(def: KindDef) -> Result<Self, Self::Error> {
        let nested = |schema: SchemaDef| RecordSchema::try_from(schema).map(Arc::new);
        Ok(match def {
            KindDef::Scalar { scalar } => Self::Scalar(scalar),
            KindDef::FixedArray { element, length } => Self::FixedArray { element, length },
            KindDef::VariableSlice {
                element,
                count_field,
            } => Self::VariableSlice {
                element,
                count_field,
            },
            KindDef::Vector { element } => Self::Vector { element },
            KindDef::Text => Self::Text,
            KindDef::Composite { schema } => Self::Composite(nested(schema)?),
            KindDef::FixedArrayOfComposite { schema, length } => Self::FixedArrayOfComposite {
                schema: nested(schema)?,
                length,
            },
            KindDef::Reference { schema } => Self::Reference(nested(schema)?),
        })
    }
}

impl RecordSchema {
    /// Serialize this schema to its JSON dictionary form.
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string_pretty(&SchemaDef::from(self))?)
    }

    /// Load and validate a schema from its JSON dictionary form.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let def: SchemaDef = serde_json::from_str(json)?;
        Self::try_from(def)
    }
}
