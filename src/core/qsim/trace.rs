//! Partial trace down to a subset of slots.
use std::collections::BTreeSet;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as C64;
use tracing::warn;

use crate::core::error::{EntanglementLossWarning, QuantumError, Result};
use crate::core::qsim::state::{AmplitudeVector, EPS};
use crate::core::qsim::SimConfig;

/// Density description of the kept slots. Reduced slot `j` is `kept()[j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReducedState {
    kept: Vec<usize>,
    rho: DMatrix<C64>,
    purity: f64,
    warning: Option<EntanglementLossWarning>,
}

impl ReducedState {
    pub fn num_qubits(&self) -> usize {
        self.kept.len()
    }

    pub fn dim(&self) -> usize {
        self.rho.nrows()
    }

    pub fn kept(&self) -> &[usize] {
        &self.kept
    }

    pub fn density(&self) -> &DMatrix<C64> {
        &self.rho
    }

    /// Tr(ρ²)
    pub fn purity(&self) -> f64 {
        self.purity
    }

    pub fn warning(&self) -> Option<&EntanglementLossWarning> {
        self.warning.as_ref()
    }

    pub fn is_pure(&self) -> bool {
        self.warning.is_none()
    }

    /// Diagonal of ρ: the computational-basis probabilities of the kept slots.
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.dim()).map(|i| self.rho[(i, i)].re).collect()
    }

    /// Back to a vector when nothing was lost to entanglement.
    pub fn to_pure(&self) -> Option<AmplitudeVector> {
        if !self.is_pure() {
            return None;
        }
        self.dominant_vector().ok()
    }

    /// Normalized column of ρ with the largest diagonal weight, phase fixed.
    /// For a pure ρ = |ψ⟩⟨ψ| this is |ψ⟩ up to global phase; for a maximally
    /// mixed ρ it is the first basis state.
    pub fn dominant_vector(&self) -> Result<AmplitudeVector> {
        let mut col = 0;
        for j in 1..self.dim() {
            if self.rho[(j, j)].re > self.rho[(col, col)].re + EPS {
                col = j;
            }
        }
        let v: Vec<C64> = self.rho.column(col).iter().copied().collect();
        Ok(AmplitudeVector::from_amplitudes(v)?.with_canonical_phase())
    }
}

pub fn partial_trace(state: &AmplitudeVector, keep: &[usize]) -> Result<ReducedState> {
    partial_trace_with(state, keep, SimConfig::default().purity_tolerance)
}

/// ρ_keep = Σ_t v_t v_tᴴ where v_t collects the amplitudes sharing the traced
/// assignment t.
pub fn partial_trace_with(state: &AmplitudeVector, keep: &[usize], purity_tolerance: f64) -> Result<ReducedState> {
    let n = state.num_qubits();
    let mut seen = BTreeSet::new();
    for &slot in keep {
        if slot >= n {
            return Err(QuantumError::IndexOutOfRange { slot, num_qubits: n });
        }
        if !seen.insert(slot) {
            return Err(QuantumError::DuplicateSlot { slot });
        }
    }
    let traced: Vec<usize> = (0..n).filter(|s| !seen.contains(s)).collect();

    let kdim = 1usize << keep.len();
    let tdim = 1usize << traced.len();
    let mut columns = vec![DVector::from_element(kdim, C64::new(0.0, 0.0)); tdim];
    for (index, amp) in state.iter() {
        columns[gather(index, &traced)][gather(index, keep)] = amp;
    }

    let mut rho = DMatrix::from_element(kdim, kdim, C64::new(0.0, 0.0));
    for v in &columns {
        rho += v * v.adjoint();
    }
    let purity = (&rho * &rho).trace().re;

    let warning = if purity < 1.0 - purity_tolerance {
        let w = EntanglementLossWarning { kept: keep.to_vec(), purity };
        warn!(kept = ?keep, purity, "{w}");
        Some(w)
    } else {
        None
    };

    Ok(ReducedState { kept: keep.to_vec(), rho, purity, warning })
}

/// Pack the bits of `index` at `slots` into a dense index, `slots[0]` lowest.
fn gather(index: usize, slots: &[usize]) -> usize {
    slots
        .iter()
        .enumerate()
        .fold(0, |acc, (k, &s)| acc | (((index >> s) & 1) << k))
}
