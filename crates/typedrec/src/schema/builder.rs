// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for RecordSchema.

use crate::error::SchemaError;
use crate::schema::{ElementKind, FieldDescriptor, FieldKind, RecordSchema, ScalarKind, TextPrefix};
use std::sync::Arc;

/// Builder for creating validated [`RecordSchema`] instances.
///
/// Fields are recorded in call order, which becomes the wire order.
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: String,
    text_prefix: TextPrefix,
    fields: Vec<FieldDescriptor>,
}

impl RecordSchemaBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text_prefix: TextPrefix::default(),
            fields: Vec::new(),
        }
    }

    /// Set the length prefix used by every text value of this schema.
    pub fn text_prefix(mut self, prefix: TextPrefix) -> Self {
        self.text_prefix = prefix;
        self
    }

    /// Add a field with an explicit kind.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    /// Add a scalar field.
    pub fn scalar(self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.field(name, FieldKind::Scalar(kind))
    }

    /// Add a fixed-length array field.
    pub fn array(
        self,
        name: impl Into<String>,
        element: impl Into<ElementKind>,
        length: usize,
    ) -> Self {
        self.field(
            name,
            FieldKind::FixedArray {
                element: element.into(),
                length,
            },
        )
    }

    /// Add a slice whose length is the value of `count_field`.
    pub fn slice(
        self,
        name: impl Into<String>,
        element: impl Into<ElementKind>,
        count_field: impl Into<String>,
    ) -> Self {
        self.field(
            name,
            FieldKind::VariableSlice {
                element: element.into(),
                count_field: count_field.into(),
            },
        )
    }

    /// Add a self-counted vector field.
    pub fn vector(self, name: impl Into<String>, element: impl Into<ElementKind>) -> Self {
        self.field(
            name,
            FieldKind::Vector {
                element: element.into(),
            },
        )
    }

    /// Add a text field.
    pub fn text(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Text)
    }

    /// Add a nested composite field.
    pub fn composite(self, name: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        self.field(name, FieldKind::Composite(schema))
    }

    /// Add a fixed-length array of composites.
    pub fn composite_array(
        self,
        name: impl Into<String>,
        schema: Arc<RecordSchema>,
        length: usize,
    ) -> Self {
        self.field(name, FieldKind::FixedArrayOfComposite { schema, length })
    }

    /// Add a reference field.
    pub fn reference(self, name: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        self.field(name, FieldKind::Reference(schema))
    }

    /// Validate and build the schema.
    pub fn build(self) -> Result<RecordSchema, SchemaError> {
        RecordSchema::build(self.name, self.text_prefix, self.fields)
    }
}
