//! Kronecker products and full-register lifts of the fixed gate set.
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as C64;

use crate::core::error::{QuantumError, Result};

#[inline]
fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

/// `a ⊗ b`; row and column indices of `b` vary fastest.
pub fn kron(a: &DMatrix<C64>, b: &DMatrix<C64>) -> DMatrix<C64> {
    a.kronecker(b)
}

/// `a ⊗ b` on column vectors, so `b` occupies the low bits of each index.
pub fn kron_vec(a: &DVector<C64>, b: &DVector<C64>) -> DVector<C64> {
    a.kronecker(b)
}

/// Promote a 1-qubit gate `u` onto `n_qubits`, targeting slot `target` (0 = least significant).
pub fn lift_1q(u: &DMatrix<C64>, n_qubits: usize, target: usize) -> Result<DMatrix<C64>> {
    if u.nrows() != 2 || u.ncols() != 2 {
        return Err(QuantumError::DimensionMismatch { expected: 2, actual: u.nrows() });
    }
    if target >= n_qubits {
        return Err(QuantumError::IndexOutOfRange { slot: target, num_qubits: n_qubits });
    }

    // Highest slot is kron-ed first so slot 0 ends up least significant.
    let i2 = DMatrix::<C64>::identity(2, 2);
    let mut acc = DMatrix::<C64>::from_element(1, 1, c(1.0, 0.0));
    for q in (0..n_qubits).rev() {
        let m = if q == target { u } else { &i2 };
        acc = kron(&acc, m);
    }
    Ok(acc)
}

/// Build an n-qubit CNOT as a full 2^n permutation (control -> target).
pub fn cnot_n(n_qubits: usize, control: usize, target: usize) -> Result<DMatrix<C64>> {
    for slot in [control, target] {
        if slot >= n_qubits {
            return Err(QuantumError::IndexOutOfRange { slot, num_qubits: n_qubits });
        }
    }
    if control == target {
        return Err(QuantumError::DuplicateSlot { slot: control });
    }
    let dim = 1usize << n_qubits;
    let mut m = DMatrix::<C64>::from_element(dim, dim, c(0.0, 0.0));
    for basis in 0..dim {
        let mut out = basis;
        if (basis >> control) & 1 == 1 {
            out ^= 1usize << target;
        }
        m[(out, basis)] = c(1.0, 0.0);
    }
    Ok(m)
}
