//! Offset indirection used by legacy records.

use std::fmt;

/// A byte offset into a deferred variable area.
///
/// On disk a pointer is stored as `-1 - offset`, so a stored `-1` means
/// offset zero and any stored value `>= 0` means "no pointer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Offset(usize);

impl Offset {
    /// Creates an offset from a literal position.
    #[must_use]
    pub const fn new(offset: usize) -> Self {
        Self(offset)
    }

    /// Returns the literal position.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Decodes a stored pointer.
    #[must_use]
    pub fn from_stored(stored: i32) -> Option<Self> {
        let real = -1i64 - i64::from(stored);
        usize::try_from(real).ok().map(Self)
    }

    /// Encodes this offset the way records store it.
    #[must_use]
    pub fn to_stored(self) -> i32 {
        let real = i64::try_from(self.0).unwrap_or(i64::MAX);
        i32::try_from(-1 - real).unwrap_or(i32::MIN)
    }
}

impl From<Offset> for usize {
    fn from(offset: Offset) -> Self {
        offset.0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minus_one_is_zero() {
        assert_eq!(Offset::from_stored(-1), Some(Offset::new(0)));
    }

    #[test]
    fn non_negative_is_absent() {
        assert_eq!(Offset::from_stored(0), None);
        assert_eq!(Offset::from_stored(42), None);
    }

    #[test]
    fn decodes_real_offset() {
        assert_eq!(Offset::from_stored(-65), Some(Offset::new(64)));
        assert_eq!(Offset::from_stored(i32::MIN).map(Offset::get), Some(2_147_483_647));
    }

    #[test]
    fn stored_roundtrip() {
        let offset = Offset::new(96);
        assert_eq!(Offset::from_stored(offset.to_stored()), Some(offset));
    }

    #[test]
    fn display() {
        assert_eq!(Offset::new(32).to_string(), "@32");
    }
}
