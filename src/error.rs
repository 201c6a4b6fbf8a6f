use std::fmt;

/// Why a cut could not be given a stock piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infeasibility {
    /// Every standard length is shorter than the cut.
    TooLong,
    /// Long enough lengths exist but their availability is used up.
    OutOfStock,
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Infeasibility::TooLong => write!(f, "longer than every standard length"),
            Infeasibility::OutOfStock => {
                write!(f, "all sufficiently long stock is already used")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no feasible stock for cut of length {length}: {reason}")]
    NoFeasibleStock { length: u32, reason: Infeasibility },
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
