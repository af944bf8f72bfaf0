// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference values: single-owner links to an inline composite.

use crate::value::Record;

/// Opaque identity token of a reference within one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefHandle(u32);

impl RefHandle {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A reference field value.
///
/// Present when it carries a handle. A present reference must also carry its
/// target to be encodable; the target is owned by the record holding the
/// reference.
///
/// Equality compares presence and target only: handles are local identity
/// tokens and are not part of the wire format.
#[derive(Debug, Clone, Default)]
pub struct Reference {
    handle: Option<RefHandle>,
    target: Option<Box<Record>>,
}

impl Reference {
    /// An absent reference.
    pub fn null() -> Self {
        Self::default()
    }

    /// A present reference bound to `target`.
    pub fn new(handle: RefHandle, target: Record) -> Self {
        Self {
            handle: Some(handle),
            target: Some(Box::new(target)),
        }
    }

    /// A present reference whose target has not been materialized yet.
    pub fn unresolved(handle: RefHandle) -> Self {
        Self {
            handle: Some(handle),
            target: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<RefHandle> {
        self.handle
    }

    pub fn target(&self) -> Option<&Record> {
        self.target.as_deref()
    }

    /// Attach a target to a present reference. Returns false if absent.
    pub fn bind(&mut self, target: Record) -> bool {
        if self.handle.is_none() {
            return false;
        }
        self.target = Some(Box::new(target));
        true
    }

    /// Detach and return the target.
    pub fn take_target(&mut self) -> Option<Record> {
        self.target.take().map(|t| *t)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.is_present() == other.is_present() && self.target == other.target
    }
}
