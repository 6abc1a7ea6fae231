use core::fmt;

use thiserror::Error;

use crate::CodePage;

/// Direction of a code-page conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bytes to wide code units.
    ToWide,
    /// Wide code units to bytes.
    ToNarrow,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToWide => f.write_str("narrow-to-wide"),
            Direction::ToNarrow => f.write_str("wide-to-narrow"),
        }
    }
}

/// The converter produced a different number of units than was measured
/// for the same input.
///
/// This is never a normal-path condition. The operation that returned it
/// left the buffer untouched, and retrying with the same input fails the
/// same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{direction} conversion under {code_page} produced {actual} units, expected {expected}")]
pub struct ConversionInvariantViolation {
    /// Which conversion failed.
    pub direction: Direction,
    /// Code page the conversion ran under.
    pub code_page: CodePage,
    /// Count measured before converting.
    pub expected: usize,
    /// Count the conversion actually reported.
    pub actual: usize,
}
