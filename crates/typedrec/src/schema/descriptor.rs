// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field descriptors and validated record schemas.

use crate::error::SchemaError;
use crate::schema::{FieldKind, RecordSchemaBuilder, TextPrefix};
use std::collections::HashMap;

/// One schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    index: usize,
}

impl FieldDescriptor {
    /// Create a field descriptor. The index is assigned by [`RecordSchema::build`].
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            index: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Position in declaration order, which is also wire order.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered, immutable description of a record.
///
/// Built once and shared read-only (usually behind an `Arc`) by any number of
/// concurrent encoders and decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    text_prefix: TextPrefix,
}

impl RecordSchema {
    /// Validate `fields` and build a schema.
    ///
    /// Every `VariableSlice` must count on an integer scalar declared before
    /// it: decoding is a single forward pass and never looks ahead.
    pub fn build(
        name: impl Into<String>,
        text_prefix: TextPrefix,
        mut fields: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut index = HashMap::with_capacity(fields.len());

        for i in 0..fields.len() {
            fields[i].index = i;
            let field = &fields[i];

            if let Err(err) = check_field(&fields, &index, field) {
                log::debug!("[schema] rejected {:?}: {}", name, err);
                return Err(err);
            }

            if index.insert(field.name.clone(), i).is_some() {
                let err = SchemaError::DuplicateFieldName {
                    schema: name,
                    field: field.name.clone(),
                };
                log::debug!("[schema] rejected: {}", err);
                return Err(err);
            }
        }

        Ok(Self {
            name,
            fields,
            index,
            text_prefix,
        })
    }

    /// Start a fluent builder.
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in wire order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn text_prefix(&self) -> TextPrefix {
        self.text_prefix
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Encoded size when no field depends on its value.
    ///
    /// None if any field is value-dependent or the total overflows `usize`.
    pub fn fixed_size(&self) -> Option<usize> {
        self.fields
            .iter()
            .try_fold(0usize, |acc, f| acc.checked_add(f.kind.fixed_size()?))
    }
}

fn check_field(
    fields: &[FieldDescriptor],
    earlier: &HashMap<String, usize>,
    field: &FieldDescriptor,
) -> Result<(), SchemaError> {
    match &field.kind {
        FieldKind::VariableSlice { count_field, .. } => {
            let governs = earlier
                .get(count_field)
                .is_some_and(|&i| fields[i].kind.is_count_kind());
            if !governs {
                return Err(SchemaError::DanglingCountReference {
                    field: field.name.clone(),
                    count_field: count_field.clone(),
                });
            }
        }
        FieldKind::FixedArray { length, .. } | FieldKind::FixedArrayOfComposite { length, .. }
            if *length == 0 =>
        {
            return Err(SchemaError::InvalidFixedLength {
                field: field.name.clone(),
                length: *length,
            });
        }
        _ => {}
    }
    Ok(())
}
