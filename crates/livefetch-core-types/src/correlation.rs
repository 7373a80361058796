//! Correlation types for fetch cycles
//!
//! These types tie log events, connector calls and snapshots of a single
//! fetch/refresh cycle together, and let the controller tell a current
//! completion from a stale one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single fetch or refresh cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic token stamped on every issued fetch
///
/// Tokens are ordered: a larger token was issued later. Only the completion
/// carrying the most recently issued token may be applied.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct RefreshToken(u64);

impl RefreshToken {
    /// Wrap a raw token value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw token value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The token issued right after this one
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sequence number of an applied snapshot
///
/// Generation 0 is the empty, never-fetched state; the first successful
/// fetch produces generation 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Generation(u64);

impl Generation {
    /// The generation before any snapshot exists
    pub const INITIAL: Generation = Generation(0);

    /// Wrap a raw generation value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw generation value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The generation that supersedes this one
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}
