//! Errors raised by matrix construction and arithmetic.

use thiserror::Error;

/// Errors that can occur while building or combining matrices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("dimension mismatch in {op}: {lhs:?} and {rhs:?}")]
    DimensionMismatch {
        op: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("row {row} has {len} entries, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("integer overflow in {op} at entry ({row}, {col})")]
    Overflow {
        op: &'static str,
        row: usize,
        col: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::DimensionMismatch {
            op: "mul",
            lhs: (2, 3),
            rhs: (2, 2),
        };
        assert_eq!(err.to_string(), "dimension mismatch in mul: (2, 3) and (2, 2)");

        let err = Error::RaggedRows {
            row: 1,
            len: 1,
            expected: 2,
        };
        assert_eq!(err.to_string(), "row 1 has 1 entries, expected 2");

        let err = Error::Overflow {
            op: "mul",
            row: 0,
            col: 1,
        };
        assert_eq!(err.to_string(), "integer overflow in mul at entry (0, 1)");
    }
}
