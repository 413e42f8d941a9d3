/// Error type shared by every layer of the simulator.
///
/// Only [`QsimError::LinearlyDependentMeasurements`] is recoverable: the
/// caller is expected to draw a fresh batch of measurements and try again.
/// Every other variant is a caller bug surfaced at the offending call.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QsimError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum QsimError {
    /// A single-qubit operation was handed something other than a 2×2 matrix.
    #[error("invalid gate shape: expected 2x2, got {rows}x{cols}")]
    InvalidGateShape { rows: usize, cols: usize },

    /// Operand lengths disagree (matrix products, bit-vector XOR, circuit splicing).
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("invalid register construction: {0}")]
    InvalidRegisterConstruction(String),

    #[error("division by the zero complex number")]
    DivisionByZeroComplex,

    #[error("measurements are linearly dependent over GF(2)")]
    LinearlyDependentMeasurements,

    #[error("qubit {qubit} out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// The same qubit was named twice among the controls/targets of one gate.
    #[error("qubit {0} used more than once in a single gate")]
    QubitConflict(usize),

    #[error("bit vectors may only hold 0 or 1, found {0}")]
    InvalidBitValue(u8),

    #[error("invalid secret: {0}")]
    InvalidSecret(String),

    #[error("gave up after {0} attempts")]
    AttemptsExhausted(usize),
}

impl QsimError {
    /// True when the failing call can be retried with fresh input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::LinearlyDependentMeasurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_dependent_measurements_recoverable() {
        assert!(QsimError::LinearlyDependentMeasurements.is_recoverable());
        assert!(!QsimError::DivisionByZeroComplex.is_recoverable());
        assert!(!QsimError::InvalidGateShape { rows: 3, cols: 3 }.is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let e = QsimError::QubitOutOfRange { qubit: 4, num_qubits: 2 };
        assert_eq!(e.to_string(), "qubit 4 out of range for a 2-qubit register");
        let e = QsimError::InvalidGateShape { rows: 4, cols: 4 };
        assert_eq!(e.to_string(), "invalid gate shape: expected 2x2, got 4x4");
    }
}
