//! Qubit register: one amplitude vector mutated in place by index-addressed
//! gate kernels.
use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64 as C64;
use tracing::trace;

use crate::core::error::{QuantumError, Result};
use crate::core::qsim::gates::Gate;
use crate::core::qsim::state::AmplitudeVector;

#[derive(Clone, Debug, PartialEq)]
pub struct QubitRegister {
    state: AmplitudeVector,
}

impl QubitRegister {
    /// Fresh register in |0…0⟩.
    pub fn new(num_qubits: usize) -> Result<Self> {
        Ok(Self { state: AmplitudeVector::zero(num_qubits)? })
    }

    pub fn from_state(state: AmplitudeVector) -> Self {
        Self { state }
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits()
    }

    pub fn state(&self) -> &AmplitudeVector {
        &self.state
    }

    pub fn into_state(self) -> AmplitudeVector {
        self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut AmplitudeVector {
        &mut self.state
    }

    pub(crate) fn check_slot(&self, slot: usize) -> Result<()> {
        if slot >= self.num_qubits() {
            return Err(QuantumError::IndexOutOfRange { slot, num_qubits: self.num_qubits() });
        }
        Ok(())
    }

    pub(crate) fn check_gate(&self, gate: Gate) -> Result<()> {
        for slot in gate.slots() {
            self.check_slot(slot)?;
        }
        if let Gate::Cx { control, target } = gate {
            if control == target {
                return Err(QuantumError::DuplicateSlot { slot: control });
            }
        }
        Ok(())
    }

    pub fn apply_x(&mut self, slot: usize) -> Result<()> {
        self.apply(Gate::X(slot))
    }

    pub fn apply_z(&mut self, slot: usize) -> Result<()> {
        self.apply(Gate::Z(slot))
    }

    pub fn apply_hadamard(&mut self, slot: usize) -> Result<()> {
        self.apply(Gate::H(slot))
    }

    pub fn apply_controlled_x(&mut self, control: usize, target: usize) -> Result<()> {
        self.apply(Gate::Cx { control, target })
    }

    pub fn apply(&mut self, gate: Gate) -> Result<()> {
        self.check_gate(gate)?;
        trace!(%gate, "apply");
        apply_kernel(self.state.amplitudes_mut(), gate);
        Ok(())
    }

    /// Validates the whole sequence before the first gate runs.
    pub fn apply_all(&mut self, gates: &[Gate]) -> Result<()> {
        for &g in gates {
            self.check_gate(g)?;
        }
        for &g in gates {
            trace!(gate = %g, "apply");
            apply_kernel(self.state.amplitudes_mut(), g);
        }
        Ok(())
    }
}

/// Gate kernels over a raw amplitude slice. Slots must already be validated.
pub(crate) fn apply_kernel(amps: &mut [C64], gate: Gate) {
    match gate {
        Gate::X(s) => {
            let m = 1usize << s;
            for i in (0..amps.len()).filter(|i| i & m == 0) {
                amps.swap(i, i | m);
            }
        }
        Gate::Z(s) => {
            let m = 1usize << s;
            amps.iter_mut()
                .enumerate()
                .filter(|(i, _)| i & m != 0)
                .for_each(|(_, a)| *a = -*a);
        }
        Gate::H(s) => {
            let m = 1usize << s;
            for i in (0..amps.len()).filter(|i| i & m == 0) {
                let (a, b) = (amps[i], amps[i | m]);
                amps[i] = (a + b) * FRAC_1_SQRT_2;
                amps[i | m] = (a - b) * FRAC_1_SQRT_2;
            }
        }
        Gate::Cx { control, target } => {
            let (cm, tm) = (1usize << control, 1usize << target);
            for i in (0..amps.len()).filter(|i| i & cm != 0 && i & tm == 0) {
                amps.swap(i, i | tm);
            }
        }
    }
}
