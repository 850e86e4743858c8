//! Deterministic measurement and classically-controlled corrections.
//!
//! No outcome is ever sampled. A measurement reports the dominant branch and
//! leaves the register intact; classical control acts on the projector of
//! each outcome pattern, so a correction table applied to every branch and
//! summed back reproduces what an ideal simulator sees after any outcome.
use std::collections::BTreeSet;
use std::fmt;

use nalgebra::DVector;
use num_complex::Complex64 as C64;

use crate::core::error::{QuantumError, Result};
use crate::core::qsim::gates::Gate;
use crate::core::qsim::register::{apply_kernel, QubitRegister};
use crate::core::qsim::state::{AmplitudeVector, EPS};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClassicalBit {
    slot: usize,
    value: u8,
}

impl ClassicalBit {
    pub fn slot(&self) -> usize {
        self.slot
    }
    pub fn value(&self) -> u8 {
        self.value
    }
    pub fn is_set(&self) -> bool {
        self.value == 1
    }
}

/// Conjunction of `slot == value` conditions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPattern {
    conditions: Vec<(usize, u8)>,
}

impl BitPattern {
    pub fn new(conditions: &[(usize, u8)]) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for &(slot, value) in conditions {
            if value > 1 {
                return Err(QuantumError::invalid_state(format!("classical bit value {value} on slot {slot}")));
            }
            if !seen.insert(slot) {
                return Err(QuantumError::DuplicateSlot { slot });
            }
        }
        Ok(Self { conditions: conditions.to_vec() })
    }

    /// Pattern over `slots` whose values are the bits of `bits`, `slots[0]` being bit 0.
    pub fn from_bits(slots: &[usize], bits: usize) -> Result<Self> {
        let conds: Vec<(usize, u8)> = slots
            .iter()
            .enumerate()
            .map(|(k, &s)| (s, ((bits >> k) & 1) as u8))
            .collect();
        Self::new(&conds)
    }

    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.conditions.iter().map(|&(s, _)| s)
    }

    pub fn matches(&self, index: usize) -> bool {
        self.conditions
            .iter()
            .all(|&(s, v)| ((index >> s) & 1) as u8 == v)
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.conditions.iter().map(|(s, v)| format!("q{s}={v}")).collect();
        write!(f, "[{}]", parts.join(","))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub pattern: BitPattern,
    pub probability: f64,
}

/// Teleportation syndrome over the two measured slots, written `m_x m_z`:
/// the first bit came from the X-syndrome slot, the second from the
/// Z-syndrome slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BitPair {
    B00,
    B01,
    B10,
    B11,
}

impl BitPair {
    pub const ALL: [BitPair; 4] = [BitPair::B00, BitPair::B01, BitPair::B10, BitPair::B11];

    pub fn from_bits(m_x: u8, m_z: u8) -> Self {
        match (m_x & 1, m_z & 1) {
            (0, 0) => BitPair::B00,
            (0, _) => BitPair::B01,
            (_, 0) => BitPair::B10,
            _ => BitPair::B11,
        }
    }

    pub fn bits(self) -> (u8, u8) {
        match self {
            BitPair::B00 => (0, 0),
            BitPair::B01 => (0, 1),
            BitPair::B10 => (1, 0),
            BitPair::B11 => (1, 1),
        }
    }

    pub fn pattern(self, x_slot: usize, z_slot: usize) -> Result<BitPattern> {
        let (m_x, m_z) = self.bits();
        BitPattern::new(&[(x_slot, m_x), (z_slot, m_z)])
    }

    /// Pauli correction on `target`; X goes first.
    pub fn correction(self, target: usize) -> Vec<Gate> {
        match self {
            BitPair::B00 => vec![],
            BitPair::B01 => vec![Gate::Z(target)],
            BitPair::B10 => vec![Gate::X(target)],
            BitPair::B11 => vec![Gate::X(target), Gate::Z(target)],
        }
    }
}

impl fmt::Display for BitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.bits();
        write!(f, "{a}{b}")
    }
}

impl QubitRegister {
    /// Probability that `slot` reads `value` in the computational basis.
    pub fn probability(&self, slot: usize, value: u8) -> Result<f64> {
        self.check_slot(slot)?;
        let pattern = BitPattern::new(&[(slot, value)])?;
        Ok(branch_weight(self.state(), &pattern))
    }

    /// Dominant outcome for `slot`; ties resolve to 0. The register is not collapsed.
    pub fn measure(&self, slot: usize) -> Result<ClassicalBit> {
        let p1 = self.probability(slot, 1)?;
        let value = if p1 > 0.5 + EPS { 1 } else { 0 };
        Ok(ClassicalBit { slot, value })
    }

    /// Every outcome pattern over `slots` with its probability, ascending by pattern bits.
    pub fn branches(&self, slots: &[usize]) -> Result<Vec<Branch>> {
        for (i, &s) in slots.iter().enumerate() {
            self.check_slot(s)?;
            if slots[..i].contains(&s) {
                return Err(QuantumError::DuplicateSlot { slot: s });
            }
        }
        (0..1usize << slots.len())
            .map(|bits| {
                let pattern = BitPattern::from_bits(slots, bits)?;
                let probability = branch_weight(self.state(), &pattern);
                Ok(Branch { pattern, probability })
            })
            .collect()
    }

    /// Apply `corrections` only inside the subspace where `pattern` holds.
    pub fn apply_if(&mut self, pattern: &BitPattern, corrections: &[Gate]) -> Result<()> {
        self.check_control(pattern, corrections)?;
        let amps = self.state_mut().amplitudes_mut();
        let mut branch = project(amps, pattern);
        for &g in corrections {
            apply_kernel(branch.as_mut_slice(), g);
        }
        for (i, a) in amps.iter_mut().enumerate() {
            if pattern.matches(i) {
                *a = branch[i];
            }
        }
        Ok(())
    }

    /// Σ_P C_P Π_P |ψ⟩ over the table, renormalized. Patterns must be
    /// mutually exclusive; components no pattern covers are dropped.
    pub fn recombine(&mut self, table: &[(BitPattern, Vec<Gate>)]) -> Result<()> {
        for (pattern, gates) in table {
            self.check_control(pattern, gates)?;
        }
        let dim = self.state().dim();
        if (0..dim).any(|i| table.iter().filter(|(p, _)| p.matches(i)).count() > 1) {
            return Err(QuantumError::invalid_state("correction branches overlap"));
        }
        let amps = self.state().as_slice();
        let mut acc = DVector::from_element(dim, C64::new(0.0, 0.0));
        for (pattern, gates) in table {
            let mut branch = project(amps, pattern);
            for &g in gates {
                apply_kernel(branch.as_mut_slice(), g);
            }
            acc += branch;
        }
        *self.state_mut() = AmplitudeVector::from_raw(acc)?;
        Ok(())
    }

    fn check_control(&self, pattern: &BitPattern, gates: &[Gate]) -> Result<()> {
        for s in pattern.slots() {
            self.check_slot(s)?;
        }
        for &g in gates {
            self.check_gate(g)?;
            if let Some(slot) = g.slots().into_iter().find(|s| pattern.slots().any(|p| p == *s)) {
                return Err(QuantumError::ControlConflict { slot });
            }
        }
        Ok(())
    }
}

fn project(amps: &[C64], pattern: &BitPattern) -> DVector<C64> {
    DVector::from_fn(amps.len(), |i, _| if pattern.matches(i) { amps[i] } else { C64::new(0.0, 0.0) })
}

fn branch_weight(state: &AmplitudeVector, pattern: &BitPattern) -> f64 {
    state
        .iter()
        .filter(|(i, _)| pattern.matches(*i))
        .map(|(_, a)| a.norm_sqr())
        .sum()
}
