// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed record serialization
//!
//! Schema-driven binary encoding of structured records:
//! - **Schema**: ordered, validated field descriptors (scalars, arrays,
//!   counted slices, vectors, text, composites, references)
//! - **Record**: value container bound to a schema, with typed accessors
//! - **Codec**: deterministic big-endian encoder and single-pass decoder
//! - **Dictionary**: JSON form of schemas for storage and exchange
//!
//! # Example
//!
//! ```rust
//! use typedrec::{codec, Record, RecordSchema, ScalarKind};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(
//!     RecordSchema::builder("Sample")
//!         .scalar("n", ScalarKind::U32)
//!         .slice("items", ScalarKind::I16, "n")
//!         .text("label")
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut rec = Record::new(&schema);
//! rec.set_slice("items", vec![7i16.into(), 8i16.into()]).unwrap();
//! rec.set("label", "obj-002").unwrap();
//!
//! let bytes = codec::encode(&schema, &rec).unwrap();
//! assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
//!
//! let back = codec::decode(&schema, &bytes).unwrap();
//! assert_eq!(back, rec);
//! assert_eq!(back.get::<String>("label").unwrap(), "obj-002");
//! ```
//!
//! # Format Comparison
//!
//! | Text prefix | Length bytes | Max length |
//! |-------------|--------------|------------|
//! | `u8`        | 1            | 255        |
//! | `u16`       | 2            | 65535      |
//! | `u32`       | 4            | 2^32 - 1   |
//! | `compact`   | 1 or 5       | 2^32 - 1   |

pub mod codec;
pub mod config;
pub mod cursor;
pub mod error;
pub mod schema;
pub mod value;

pub use codec::{decode, decode_from, encode, encode_into, RecordCodec};
pub use config::CodecConfig;
pub use error::{DecodeError, EncodeError, RecordError, SchemaError};
pub use schema::{
    ElementKind, FieldDescriptor, FieldKind, RecordSchema, RecordSchemaBuilder, ScalarKind,
    TextPrefix,
};
pub use value::{FromValue, Record, RefHandle, Reference, Value};
