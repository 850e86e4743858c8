//! Overlap fidelity between pure and reduced state descriptions.
use std::fmt;

use nalgebra::DMatrix;
use num_complex::Complex64 as C64;
use serde::Serialize;

use crate::core::error::{QuantumError, Result};
use crate::core::qsim::state::AmplitudeVector;
use crate::core::qsim::trace::ReducedState;

/// Nominally in [0, 1]; floating error may push it an epsilon outside.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct FidelityScore(f64);

impl FidelityScore {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_perfect(self, tolerance: f64) -> bool {
        (1.0 - self.0).abs() <= tolerance
    }
}

impl fmt::Display for FidelityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum StateRef<'a> {
    Pure(&'a AmplitudeVector),
    Mixed(&'a ReducedState),
}

impl<'a> From<&'a AmplitudeVector> for StateRef<'a> {
    fn from(v: &'a AmplitudeVector) -> Self {
        StateRef::Pure(v)
    }
}

impl<'a> From<&'a ReducedState> for StateRef<'a> {
    fn from(r: &'a ReducedState) -> Self {
        StateRef::Mixed(r)
    }
}

impl StateRef<'_> {
    pub fn dim(&self) -> usize {
        match self {
            StateRef::Pure(v) => v.dim(),
            StateRef::Mixed(r) => r.dim(),
        }
    }
}

/// |⟨t|a⟩|² for pure states, ⟨t|ρ|t⟩ against a reduced state, and the
/// Uhlmann form (Tr √(√ρ σ √ρ))² when both sides are reduced.
pub fn fidelity<'a, 'b>(target: impl Into<StateRef<'a>>, actual: impl Into<StateRef<'b>>) -> Result<FidelityScore> {
    let (target, actual) = (target.into(), actual.into());
    if target.dim() != actual.dim() {
        return Err(QuantumError::DimensionMismatch { expected: target.dim(), actual: actual.dim() });
    }
    let f = match (target, actual) {
        (StateRef::Pure(t), StateRef::Pure(a)) => t.inner(a)?.norm_sqr(),
        (StateRef::Pure(v), StateRef::Mixed(r)) | (StateRef::Mixed(r), StateRef::Pure(v)) => expectation(v, r.density()),
        (StateRef::Mixed(r), StateRef::Mixed(s)) => uhlmann(r.density(), s.density()),
    };
    Ok(FidelityScore(f))
}

fn expectation(v: &AmplitudeVector, rho: &DMatrix<C64>) -> f64 {
    (v.data().adjoint() * rho * v.data())[(0, 0)].re
}

fn uhlmann(rho: &DMatrix<C64>, sigma: &DMatrix<C64>) -> f64 {
    let s = sqrt_psd(rho);
    let m = &s * sigma * &s;
    let eig = m.symmetric_eigen();
    let tr: f64 = eig.eigenvalues.iter().map(|l| l.max(0.0).sqrt()).sum();
    tr * tr
}

/// Principal square root of a Hermitian positive semi-definite matrix.
fn sqrt_psd(m: &DMatrix<C64>) -> DMatrix<C64> {
    let eig = m.clone().symmetric_eigen();
    let roots = eig.eigenvalues.map(|l| C64::new(l.max(0.0).sqrt(), 0.0));
    &eig.eigenvectors * DMatrix::from_diagonal(&roots) * eig.eigenvectors.adjoint()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::qsim::trace::partial_trace;

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    #[test]
    fn self_fidelity_is_one() {
        let a = AmplitudeVector::from_pair(c(0.3, 0.1), c(-0.2, 0.9)).unwrap();
        assert!(fidelity(&a, &a).unwrap().is_perfect(1e-12));
    }

    #[test]
    fn symmetric_and_orthogonal() {
        let a = AmplitudeVector::from_pair(c(0.6, 0.0), c(0.0, 0.8)).unwrap();
        let b = AmplitudeVector::from_pair(c(1.0, 0.0), c(1.0, 0.0)).unwrap();
        let ab = fidelity(&a, &b).unwrap().value();
        let ba = fidelity(&b, &a).unwrap().value();
        assert!((ab - ba).abs() < 1e-12);
        let zero = AmplitudeVector::basis(1, 0).unwrap();
        let one = AmplitudeVector::basis(1, 1).unwrap();
        assert!(fidelity(&zero, &one).unwrap().value().abs() < 1e-12);
    }

    #[test]
    fn global_phase_ignored() {
        let a = AmplitudeVector::from_pair(c(0.6, 0.0), c(0.8, 0.0)).unwrap();
        let b = AmplitudeVector::from_pair(c(0.0, 0.6), c(0.0, 0.8)).unwrap();
        assert!(fidelity(&a, &b).unwrap().is_perfect(1e-12));
    }

    #[test]
    fn mixed_against_pure_and_mixed() {
        let mut reg = crate::core::qsim::register::QubitRegister::new(2).unwrap();
        reg.apply_hadamard(0).unwrap();
        reg.apply_controlled_x(0, 1).unwrap();
        let mixed = partial_trace(reg.state(), &[0]).unwrap();
        let zero = AmplitudeVector::zero(1).unwrap();
        assert!((fidelity(&zero, &mixed).unwrap().value() - 0.5).abs() < 1e-12);
        assert!((fidelity(&mixed, &zero).unwrap().value() - 0.5).abs() < 1e-12);
        assert!(fidelity(&mixed, &mixed).unwrap().is_perfect(1e-9));

        let pure = partial_trace(&AmplitudeVector::zero(2).unwrap(), &[1]).unwrap();
        assert!((fidelity(&pure, &mixed).unwrap().value() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dimension_mismatch() {
        let a = AmplitudeVector::zero(1).unwrap();
        let b = AmplitudeVector::zero(2).unwrap();
        assert_eq!(
            fidelity(&a, &b).unwrap_err(),
            QuantumError::DimensionMismatch { expected: 2, actual: 4 }
        );
    }
}
