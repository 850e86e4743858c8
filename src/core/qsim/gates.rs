//! The fixed protocol gate set: Pauli-X, Pauli-Z, Hadamard and controlled-X.
use std::fmt;

use nalgebra::DMatrix;
use num_complex::Complex64 as C64;

use crate::core::error::Result;
use crate::core::qsim::ops;

#[inline]
fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

pub fn x() -> DMatrix<C64> {
    DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)])
}
pub fn z() -> DMatrix<C64> {
    DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)])
}
pub fn h() -> DMatrix<C64> {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    DMatrix::from_row_slice(2, 2, &[c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0)])
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    X(usize),
    Z(usize),
    H(usize),
    Cx { control: usize, target: usize },
}

impl Gate {
    pub fn slots(self) -> Vec<usize> {
        match self {
            Gate::X(s) | Gate::Z(s) | Gate::H(s) => vec![s],
            Gate::Cx { control, target } => vec![control, target],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Gate::X(_) => "X",
            Gate::Z(_) => "Z",
            Gate::H(_) => "H",
            Gate::Cx { .. } => "CX",
        }
    }

    /// Local unitary: 2×2 for single-slot gates, 4×4 for CX with the
    /// control as the high local bit.
    pub fn matrix(self) -> DMatrix<C64> {
        match self {
            Gate::X(_) => x(),
            Gate::Z(_) => z(),
            Gate::H(_) => h(),
            Gate::Cx { .. } => {
                let mut m = DMatrix::identity(4, 4);
                m.swap_rows(2, 3);
                m
            }
        }
    }

    /// Full 2^n × 2^n unitary of this gate on an `n_qubits` register.
    pub fn operator(self, n_qubits: usize) -> Result<DMatrix<C64>> {
        match self {
            Gate::X(s) => ops::lift_1q(&x(), n_qubits, s),
            Gate::Z(s) => ops::lift_1q(&z(), n_qubits, s),
            Gate::H(s) => ops::lift_1q(&h(), n_qubits, s),
            Gate::Cx { control, target } => ops::cnot_n(n_qubits, control, target),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Cx { control, target } => write!(f, "CX({control}->{target})"),
            g => write!(f, "{}({})", g.name(), g.slots()[0]),
        }
    }
}
