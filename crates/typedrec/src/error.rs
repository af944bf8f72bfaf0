// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for schema building, encoding, decoding and record access.
//!
//! Every error carries the dotted path of the offending field
//! (`Event.p3.px`) so a failure deep inside a composite can be located.

use std::io;
use thiserror::Error;

/// Schema validation errors (fatal at build time).
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate field name {field:?} in schema {schema:?}")]
    DuplicateFieldName { schema: String, field: String },

    #[error("Field {field:?} counts on {count_field:?}, which is not an earlier integer field")]
    DanglingCountReference { field: String, count_field: String },

    #[error("Field {field:?} declares invalid fixed length {length}")]
    InvalidFixedLength { field: String, length: usize },

    #[error("Schema dictionary error: {0}")]
    Dictionary(#[from] serde_json::Error),
}

/// Encoding errors. The output produced so far must be discarded.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Length mismatch for {field}: schema declares {expected}, value has {found}")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Count mismatch for {field}: {count_field} = {count}, slice holds {length}")]
    CountMismatch {
        field: String,
        count_field: String,
        count: i128,
        length: usize,
    },

    #[error("Reference {field} is marked present but has no target")]
    DanglingReference { field: String },

    #[error("Unsupported kind for {field}: {kind}")]
    UnsupportedKind { field: String, kind: String },

    #[error("Value mismatch for {field}: expected {expected}, found {found}")]
    ValueMismatch {
        field: String,
        expected: String,
        found: String,
    },

    #[error("Record bound to schema {found:?}, encoder given {expected:?}")]
    SchemaMismatch { expected: String, found: String },

    #[error("Text {field} is {length} bytes, prefix allows at most {max}")]
    TextTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    #[error("Vector {field} holds {count} elements, the wire count allows at most {max}")]
    TooManyElements {
        field: String,
        count: usize,
        max: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Decoding errors. No partial record is ever returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected end of input in {field}: need {needed} bytes, have {remaining}")]
    UnexpectedEof {
        field: String,
        needed: usize,
        remaining: usize,
    },

    #[error(
        "Invalid count for {field}: {}",
        .count.map_or_else(|| "missing".to_string(), |c| c.to_string())
    )]
    InvalidCount { field: String, count: Option<i128> },

    #[error("Unsupported kind for {field}: {kind}")]
    UnsupportedKind { field: String, kind: String },

    #[error("Invalid UTF-8 text in {field}: {source}")]
    InvalidText {
        field: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("{remaining} trailing bytes after record {schema:?}")]
    TrailingBytes { schema: String, remaining: usize },
}

/// Errors from typed record accessors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Type mismatch for {field}: expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    #[error("Count field {field} ({kind}) cannot hold {count}")]
    CountOverflow {
        field: String,
        kind: String,
        count: usize,
    },
}
