use std::fmt;

/// Nesting violation detected on pop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MaskError {
    /// Pop with no active mask.
    EmptyStack,
    /// The innermost mask belongs to a different target.
    TargetMismatch,
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskError::EmptyStack => write!(f, "mask pop with no active mask"),
            MaskError::TargetMismatch => {
                write!(f, "mask pop target does not match the innermost mask target")
            }
        }
    }
}

impl std::error::Error for MaskError {}
