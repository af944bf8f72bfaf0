// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! - **Level 1 (Static)**: wire-format constants. These are part of the byte
//!   contract and must never be changed.
//! - **Level 2 (Runtime)**: [`CodecConfig`], decode-side resource limits that
//!   callers may tune (or load from JSON).
//!
//! # Example
//!
//! ```rust
//! use typedrec::config::CodecConfig;
//!
//! let config = CodecConfig::from_json(r#"{ "max_count": 4096 }"#).unwrap();
//! assert_eq!(config.max_count, Some(4096));
//! assert_eq!(config.max_text_len, None);
//! ```

use crate::schema::TextPrefix;
use serde::{Deserialize, Serialize};

// =======================================================================
// Wire constants
// =======================================================================

/// Text prefix used when a schema does not choose one.
pub const DEFAULT_TEXT_PREFIX: TextPrefix = TextPrefix::U32;

/// Reference marker byte for an absent target.
pub const REFERENCE_ABSENT: u8 = 0;

/// Reference marker byte written for a present target.
///
/// Any nonzero byte is accepted as "present" when decoding.
pub const REFERENCE_PRESENT: u8 = 1;

/// Escape byte of the compact text prefix: lengths >= 255 are written as
/// `0xFF` followed by a big-endian u32.
pub const COMPACT_TEXT_ESCAPE: u8 = 0xFF;

// =======================================================================
// Resource limits
// =======================================================================

/// Upper bound on elements preallocated from an untrusted count.
///
/// Larger counts still decode, the vector just grows as elements arrive,
/// so a corrupt count hits `UnexpectedEof` before exhausting memory.
pub const MAX_PREALLOC_ELEMENTS: usize = 4096;

/// Upper bound on the output buffer reserved up front by
/// `RecordCodec::encode` for a fixed-size schema.
pub const MAX_PREALLOC_BYTES: usize = 64 * 1024;

/// Runtime limits applied while decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest element count accepted for slices and vectors (None = unbounded).
    pub max_count: Option<usize>,
    /// Largest text length in bytes accepted (None = unbounded).
    pub max_text_len: Option<usize>,
}

impl CodecConfig {
    /// Configuration with no limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum element count.
    pub fn with_max_count(mut self, max: usize) -> Self {
        self.max_count = Some(max);
        self
    }

    /// Set the maximum text length.
    pub fn with_max_text_len(mut self, max: usize) -> Self {
        self.max_text_len = Some(max);
        self
    }

    /// Load from a JSON document. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn count_allowed(&self, count: usize) -> bool {
        self.max_count.map_or(true, |max| count <= max)
    }

    pub(crate) fn text_len_allowed(&self, len: usize) -> bool {
        self.max_text_len.map_or(true, |max| len <= max)
    }
}
