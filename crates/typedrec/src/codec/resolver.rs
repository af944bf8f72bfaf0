// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference resolution for one encode or decode call.
//!
//! The decoder binds every present target it materializes to a fresh
//! [`RefHandle`]; the encoder asks the resolver for the target of each
//! present reference before writing it. Handles are scoped to a single
//! call and start at 1.

use crate::value::{RefHandle, Record, Reference};
use thiserror::Error;

/// A present reference with no materialized target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Reference {0:?} has no target")]
pub struct DanglingReference(pub RefHandle);

/// Handle allocator and target lookup.
#[derive(Debug)]
pub struct ReferenceResolver {
    next: u32,
    bound: usize,
    resolved: usize,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self {
            next: 1,
            bound: 0,
            resolved: 0,
        }
    }

    /// Wrap a freshly decoded target in a present reference.
    pub fn bind(&mut self, target: Record) -> Reference {
        let handle = RefHandle::new(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        self.bound += 1;
        Reference::new(handle, target)
    }

    /// Look up the target of `reference`.
    ///
    /// Returns `Ok(None)` for an absent reference.
    pub fn resolve<'r>(
        &mut self,
        reference: &'r Reference,
    ) -> Result<Option<&'r Record>, DanglingReference> {
        let Some(handle) = reference.handle() else {
            return Ok(None);
        };
        match reference.target() {
            Some(target) => {
                self.resolved += 1;
                Ok(Some(target))
            }
            None => Err(DanglingReference(handle)),
        }
    }

    /// Targets bound so far.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Present references resolved so far.
    pub fn resolved(&self) -> usize {
        self.resolved
    }
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self::new()
    }
}
