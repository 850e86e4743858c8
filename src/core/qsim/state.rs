//! Normalized amplitude vectors over 2^k basis states.
//!
//! Slot 0 is the least significant bit of a basis index everywhere in the
//! simulator: gate kernels, measurement, partial trace and labels all agree.
use std::str::FromStr;

use nalgebra::DVector;
use num_complex::Complex64 as C64;

use crate::core::error::{QuantumError, Result};
use crate::core::qsim::ops;

pub const EPS: f64 = 1e-12;
pub const MAX_QUBITS: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct AmplitudeVector {
    num_qubits: usize,
    data: DVector<C64>,
}

impl AmplitudeVector {
    /// |0…0⟩ on `num_qubits` slots.
    pub fn zero(num_qubits: usize) -> Result<Self> {
        Self::basis(num_qubits, 0)
    }

    /// Computational basis state `|index⟩` on `num_qubits` slots.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self> {
        check_width(num_qubits)?;
        let dim = 1usize << num_qubits;
        if index >= dim {
            return Err(QuantumError::invalid_state(format!(
                "basis index {index} outside a {num_qubits}-qubit register"
            )));
        }
        let mut data = DVector::from_element(dim, C64::new(0.0, 0.0));
        data[index] = C64::new(1.0, 0.0);
        Ok(Self { num_qubits, data })
    }

    /// Single qubit `α|0⟩ + β|1⟩`, normalized.
    pub fn from_pair(alpha: C64, beta: C64) -> Result<Self> {
        Self::from_amplitudes(vec![alpha, beta])
    }

    /// Two qubits `a|00⟩ + b|01⟩ + c|10⟩ + d|11⟩`, normalized.
    pub fn from_quad(amps: [C64; 4]) -> Result<Self> {
        Self::from_amplitudes(amps.to_vec())
    }

    /// Any power-of-two length (at least 2); divides by the L2 norm.
    pub fn from_amplitudes(amps: Vec<C64>) -> Result<Self> {
        let len = amps.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(QuantumError::invalid_state(format!(
                "expected a power-of-two amplitude count, got {len}"
            )));
        }
        let num_qubits = len.trailing_zeros() as usize;
        check_width(num_qubits)?;
        let data = normalized(DVector::from_vec(amps))?;
        Ok(Self { num_qubits, data })
    }

    pub(crate) fn from_raw(data: DVector<C64>) -> Result<Self> {
        Self::from_amplitudes(data.as_slice().to_vec())
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dim(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &DVector<C64> {
        &self.data
    }

    pub fn as_slice(&self) -> &[C64] {
        self.data.as_slice()
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [C64] {
        self.data.as_mut_slice()
    }

    pub fn amplitude(&self, index: usize) -> Option<C64> {
        self.data.get(index).copied()
    }

    /// `(basis index, amplitude)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, C64)> + '_ {
        self.data.iter().copied().enumerate()
    }

    /// Ket label for `index`, most significant slot first: `01` is slot 0 set.
    pub fn basis_label(&self, index: usize) -> String {
        format!("{:0width$b}", index, width = self.num_qubits)
    }

    pub fn norm_sqr(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.data.iter().map(|z| z.norm_sqr()).collect()
    }

    /// ⟨self|other⟩
    pub fn inner(&self, other: &AmplitudeVector) -> Result<C64> {
        if self.dim() != other.dim() {
            return Err(QuantumError::DimensionMismatch { expected: self.dim(), actual: other.dim() });
        }
        Ok(self.data.dotc(&other.data))
    }

    /// `self ⊗ low`: `low` takes the low slots, `self` is shifted above it.
    pub fn tensor(&self, low: &AmplitudeVector) -> Result<AmplitudeVector> {
        check_width(self.num_qubits + low.num_qubits)?;
        Self::from_raw(ops::kron_vec(&self.data, &low.data))
    }

    /// Same state with the global phase chosen so the largest amplitude is
    /// real and positive.
    pub fn with_canonical_phase(mut self) -> Self {
        let pivot = self
            .data
            .iter()
            .copied()
            .fold(C64::new(0.0, 0.0), |best, z| if z.norm_sqr() > best.norm_sqr() + EPS { z } else { best });
        let n = pivot.norm();
        if n > EPS {
            let rot = pivot.conj() / n;
            self.data.iter_mut().for_each(|z| *z *= rot);
        }
        self
    }
}

/// Weighted sum `Σ wᵢ|ψᵢ⟩`, renormalized. All terms must share one width.
pub fn superpose(terms: &[(f64, AmplitudeVector)]) -> Result<AmplitudeVector> {
    let (_, first) = terms
        .first()
        .ok_or_else(|| QuantumError::invalid_state("superposition of no terms"))?;
    let mut acc = DVector::from_element(first.dim(), C64::new(0.0, 0.0));
    for (w, psi) in terms {
        if psi.dim() != acc.len() {
            return Err(QuantumError::DimensionMismatch { expected: acc.len(), actual: psi.dim() });
        }
        acc += &psi.data * C64::from(*w);
    }
    AmplitudeVector::from_raw(acc)
}

/// Parse a complex literal such as `0.6+0j`, `(1-2i)` or `0.8`.
pub fn parse_amplitude(literal: &str) -> Result<C64> {
    let compact: String = literal
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        .map(|c| if c == 'j' || c == 'J' { 'i' } else { c })
        .collect();
    if compact.is_empty() {
        return Err(QuantumError::invalid_state("empty amplitude literal"));
    }
    let z = C64::from_str(&compact)
        .map_err(|e| QuantumError::invalid_state(format!("cannot parse amplitude {literal:?}: {e}")))?;
    if !(z.re.is_finite() && z.im.is_finite()) {
        return Err(QuantumError::invalid_state(format!("amplitude {literal:?} is not finite")));
    }
    Ok(z)
}

fn check_width(num_qubits: usize) -> Result<()> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(QuantumError::invalid_state(format!(
            "register width {num_qubits} outside 1..={MAX_QUBITS}"
        )));
    }
    Ok(())
}

/// Divides by the largest component magnitude before taking the L2 norm, so
/// finite inputs of any scale neither overflow nor underflow.
fn normalized(mut v: DVector<C64>) -> Result<DVector<C64>> {
    if v.iter().any(|z| !(z.re.is_finite() && z.im.is_finite())) {
        return Err(QuantumError::invalid_state("amplitudes must be finite"));
    }
    let scale = v.iter().map(|z| z.re.abs().max(z.im.abs())).fold(0.0, f64::max);
    if scale == 0.0 {
        return Err(QuantumError::invalid_state("state has zero norm"));
    }
    v.apply(|z| *z /= scale);
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    if !(norm.is_finite() && norm > 0.0) {
        return Err(QuantumError::invalid_state("state norm is not representable"));
    }
    v.apply(|z| *z /= norm);
    Ok(v)
}
