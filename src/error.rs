//! Crate-wide error type.
//!
//! Quiet conditions ("key wasn't there") are reported through `bool` /
//! `Option` return values; `Error` is reserved for contract violations.
//! `ConcurrentModification` is fatal for the cursor or operation that
//! observed it: the structure's consistency beyond "did not crash" is
//! not guaranteed, so the caller must abandon it rather than retry.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required argument was malformed (e.g. an inverted bound pair).
    InvalidArgument(&'static str),
    /// Positional access outside `[0, len)` (or `[0, len]` for inserts).
    IndexOutOfRange { index: usize, len: usize },
    /// Insert of a key that is already present.
    DuplicateKey,
    /// Keyed access to an absent key where presence was required.
    KeyNotFound,
    /// The container was structurally mutated while a cursor was live.
    ConcurrentModification,
    /// Mutation through a range view with a key outside the view's bounds.
    RangeViolation,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(what) => write!(f, "invalid argument: {what}"),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Error::DuplicateKey => f.write_str("an entry with the same key already exists"),
            Error::KeyNotFound => f.write_str("key not found"),
            Error::ConcurrentModification => {
                f.write_str("container was modified during enumeration")
            }
            Error::RangeViolation => f.write_str("key is outside the bounds of the view"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_is_stable() {
        assert_eq!(
            Error::IndexOutOfRange { index: 7, len: 3 }.to_string(),
            "index 7 out of range for length 3"
        );
        assert_eq!(Error::DuplicateKey.to_string(), "an entry with the same key already exists");
        assert_eq!(
            Error::ConcurrentModification.to_string(),
            "container was modified during enumeration"
        );
    }
}
