//! Insertion sequence numbers.

use std::fmt;

/// Global insertion sequence number assigned to a node when it is created.
///
/// Ordinals are handed to the node factory and also give the placement
/// search its left-to-right order: among nodes on the same level, the lower
/// ordinal is considered first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ordinal(pub u64);

impl Ordinal {
    /// First ordinal handed out by a fresh tree.
    pub const ORIGIN: Self = Self(0);

    /// Create from a raw value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The ordinal that follows this one.
    #[inline]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for Ordinal {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Ordinal> for u64 {
    fn from(value: Ordinal) -> Self {
        value.0
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
