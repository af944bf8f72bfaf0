// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record schemas: ordered field descriptors with validated count links.

mod builder;
mod descriptor;
pub mod dict;
mod kind;

pub use builder::RecordSchemaBuilder;
pub use descriptor::{FieldDescriptor, RecordSchema};
pub use kind::{ElementKind, FieldKind, ScalarKind, TextPrefix};
