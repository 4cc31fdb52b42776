//! Per-call state threaded through every encode and decode.
//!
//! A [`Session`] borrows the override registry of the codec that started the
//! call. It is created fresh for each top-level call and never outlives it.

use crate::overrides::OverrideRegistry;

/// Context shared by every nested value of a single encode or decode call.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    overrides: &'a OverrideRegistry,
}

impl<'a> Session<'a> {
    /// Creates a session consulting `overrides`.
    #[must_use]
    pub const fn new(overrides: &'a OverrideRegistry) -> Self {
        Self { overrides }
    }

    /// The overrides in effect for this call.
    #[must_use]
    pub const fn overrides(&self) -> &'a OverrideRegistry { self.overrides }
}
