//! Core module tree: error taxonomy and the simulator.

pub mod error;
pub mod qsim;

pub use error::{EntanglementLossWarning, QuantumError};
