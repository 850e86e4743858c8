use thiserror::Error;

/// Failures raised by the simulator core. Every variant is produced before
/// any amplitude is touched, so a failed call leaves its register as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    #[error("Invalid State: {0}")]
    InvalidState(String),

    #[error("Index Out Of Range: slot {slot} on a {num_qubits}-qubit register")]
    IndexOutOfRange { slot: usize, num_qubits: usize },

    #[error("Dimension Mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Duplicate Slot: slot {slot} addressed twice")]
    DuplicateSlot { slot: usize },

    #[error("Control Conflict: correction touches condition slot {slot}")]
    ControlConflict { slot: usize },
}

pub type Result<T> = std::result::Result<T, QuantumError>;

impl QuantumError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        QuantumError::InvalidState(message.into())
    }
}

/// Non-fatal: the kept subsystem was entangled with what got traced out, so
/// its reduced description is mixed and cannot reach full fidelity.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Entanglement Loss: reduced state on slots {kept:?} is mixed (purity {purity:.6})")]
pub struct EntanglementLossWarning {
    pub kept: Vec<usize>,
    pub purity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn test_invalid_state_error() {
        let err = QuantumError::invalid_state("zero vector");
        assert_eq!(format!("{}", err), "Invalid State: zero vector");
    }
    #[test] fn test_index_error() {
        let err = QuantumError::IndexOutOfRange { slot: 3, num_qubits: 3 };
        assert_eq!(format!("{}", err), "Index Out Of Range: slot 3 on a 3-qubit register");
    }
    #[test] fn test_dimension_error() {
        let err = QuantumError::DimensionMismatch { expected: 2, actual: 4 };
        assert_eq!(format!("{}", err), "Dimension Mismatch: expected 2, got 4");
    }
    #[test] fn test_entanglement_warning() {
        let w = EntanglementLossWarning { kept: vec![0], purity: 0.5 };
        assert_eq!(
            format!("{}", w),
            "Entanglement Loss: reduced state on slots [0] is mixed (purity 0.500000)"
        );
    }
}
