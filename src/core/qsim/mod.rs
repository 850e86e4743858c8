//! State-vector simulator for the teleportation protocols.
//!
//! Leaf-first: `state` (amplitude vectors) → `ops`/`gates`/`register`
//! (gate application) → `measure` (classical control) → `trace` →
//! `fidelity` → `teleport` and `batch`.

pub mod batch;
pub mod fidelity;
pub mod gates;
pub mod measure;
pub mod ops;
pub mod register;
pub mod state;
pub mod teleport;
pub mod trace;

pub use fidelity::{fidelity, FidelityScore, StateRef};
pub use gates::Gate;
pub use measure::{BitPair, BitPattern, Branch, ClassicalBit};
pub use register::QubitRegister;
pub use state::{parse_amplitude, AmplitudeVector};
pub use teleport::{Mode, Outcome, Teleported};
pub use trace::{partial_trace, ReducedState};

/// Numeric knobs handed to every protocol call.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Distance from 1.0 at which a fidelity counts as perfect.
    pub tolerance: f64,
    /// Purity deficit at which a partial trace reports entanglement loss.
    pub purity_tolerance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { tolerance: 1e-9, purity_tolerance: 1e-9 }
    }
}
