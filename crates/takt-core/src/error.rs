//! Error types for the Takt library.
//!
//! This module provides a comprehensive error type that covers all
//! failure modes in delivery-period calculations.

use thiserror::Error;

/// Result type alias for Takt operations.
pub type TaktResult<T> = Result<T, TaktError>;

/// Comprehensive error type for all Takt operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaktError {
    /// Frequency token could not be parsed or has an invalid anchor.
    #[error("Invalid frequency: {message}")]
    InvalidFrequency {
        /// Description of the parse or anchor problem
        message: String,
    },

    /// Two frequencies that cannot be ordered against each other.
    #[error("Frequencies '{a}' and '{b}' are not comparable")]
    IncomparableFrequencies {
        /// Token of the first frequency
        a: String,
        /// Token of the second frequency
        b: String,
    },

    /// A timestamp does not sit on a period boundary where one is required.
    #[error("Unaligned boundary: {message}")]
    UnalignedBoundary {
        /// Description of the misaligned timestamp
        message: String,
    },

    /// Consecutive timestamps are not exactly one period apart.
    #[error("Gap or disorder in index: {message}")]
    GapOrDisorder {
        /// Description of the offending pair of timestamps
        message: String,
    },

    /// A sub-daily index does not cover whole days.
    #[error("Partial day: {message}")]
    PartialDay {
        /// Description of the uncovered remainder
        message: String,
    },

    /// A wall-clock time that occurs twice in the target timezone.
    #[error("Ambiguous local time: {message}")]
    AmbiguousLocalTime {
        /// Description of the ambiguous wall-clock time
        message: String,
    },

    /// A wall-clock time that does not exist in the target timezone.
    #[error("Nonexistent local time: {message}")]
    NonexistentLocalTime {
        /// Description of the skipped wall-clock time
        message: String,
    },

    /// Indices whose frequency, timezone or start-of-day do not agree.
    #[error("Incompatible indices: {message}")]
    IncompatibleIndices {
        /// Description of the disagreeing attribute
        message: String,
    },

    /// A value vector whose length does not match its index.
    #[error("Length mismatch: index has {index_len} periods but {values_len} values were given")]
    LengthMismatch {
        /// Number of periods in the index
        index_len: usize,
        /// Number of values supplied
        values_len: usize,
    },

    /// Calendar arithmetic left the representable datetime range.
    #[error("Out of range: {message}")]
    OutOfRange {
        /// Description of the overflowing operation
        message: String,
    },
}

impl TaktError {
    /// Creates an invalid frequency error.
    #[must_use]
    pub fn invalid_frequency(message: impl Into<String>) -> Self {
        Self::InvalidFrequency {
            message: message.into(),
        }
    }

    /// Creates an incomparable frequencies error from two frequency tokens.
    #[must_use]
    pub fn incomparable(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::IncomparableFrequencies {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Creates an unaligned boundary error.
    #[must_use]
    pub fn unaligned_boundary(message: impl Into<String>) -> Self {
        Self::UnalignedBoundary {
            message: message.into(),
        }
    }

    /// Creates a gap-or-disorder error.
    #[must_use]
    pub fn gap_or_disorder(message: impl Into<String>) -> Self {
        Self::GapOrDisorder {
            message: message.into(),
        }
    }

    /// Creates a partial day error.
    #[must_use]
    pub fn partial_day(message: impl Into<String>) -> Self {
        Self::PartialDay {
            message: message.into(),
        }
    }

    /// Creates an ambiguous local time error.
    #[must_use]
    pub fn ambiguous_local_time(message: impl Into<String>) -> Self {
        Self::AmbiguousLocalTime {
            message: message.into(),
        }
    }

    /// Creates a nonexistent local time error.
    #[must_use]
    pub fn nonexistent_local_time(message: impl Into<String>) -> Self {
        Self::NonexistentLocalTime {
            message: message.into(),
        }
    }

    /// Creates an incompatible indices error.
    #[must_use]
    pub fn incompatible_indices(message: impl Into<String>) -> Self {
        Self::IncompatibleIndices {
            message: message.into(),
        }
    }

    /// Creates a length mismatch error.
    #[must_use]
    pub fn length_mismatch(index_len: usize, values_len: usize) -> Self {
        Self::LengthMismatch {
            index_len,
            values_len,
        }
    }

    /// Creates an out-of-range error.
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_frequency_display() {
        let err = TaktError::invalid_frequency("unknown token 'W'");
        assert_eq!(err.to_string(), "Invalid frequency: unknown token 'W'");
    }

    #[test]
    fn test_incomparable_display() {
        let err = TaktError::incomparable("QS-JAN", "YS-FEB");
        assert_eq!(
            err.to_string(),
            "Frequencies 'QS-JAN' and 'YS-FEB' are not comparable"
        );
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = TaktError::length_mismatch(24, 23);
        assert_eq!(
            err.to_string(),
            "Length mismatch: index has 24 periods but 23 values were given"
        );
    }

    #[test]
    fn test_helper_constructors() {
        assert_eq!(
            TaktError::partial_day("last day incomplete"),
            TaktError::PartialDay {
                message: "last day incomplete".to_string()
            }
        );
        assert_eq!(
            TaktError::gap_or_disorder("jump from a to b"),
            TaktError::GapOrDisorder {
                message: "jump from a to b".to_string()
            }
        );
    }

    #[test]
    fn test_errors_are_cloneable_and_comparable() {
        let err = TaktError::ambiguous_local_time("2020-10-25 02:30");
        let clone = err.clone();
        assert_eq!(err, clone);
        assert_ne!(err, TaktError::nonexistent_local_time("2020-10-25 02:30"));
    }
}
