//! Teleportation protocols built from the register primitives.
//!
//! Slots of the 3-qubit frame: 0 holds the message, 1 and 2 the Bell pair
//! shared by sender (1) and receiver (2).
use std::fmt;
use std::str::FromStr;

use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::{EntanglementLossWarning, QuantumError, Result};
use crate::core::qsim::fidelity::{fidelity, FidelityScore};
use crate::core::qsim::gates::Gate;
use crate::core::qsim::measure::{BitPair, BitPattern};
use crate::core::qsim::register::QubitRegister;
use crate::core::qsim::state::{superpose, AmplitudeVector, EPS};
use crate::core::qsim::trace::{partial_trace_with, ReducedState};
use crate::core::qsim::SimConfig;

const MESSAGE: usize = 0;
const SENDER: usize = 1;
const RECEIVER: usize = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Single,
    Tensor,
    DoubleBell,
}

impl Mode {
    /// Number of input amplitudes the mode takes.
    pub fn arity(self) -> usize {
        match self {
            Mode::Single => 2,
            Mode::Tensor | Mode::DoubleBell => 4,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Single => "single",
            Mode::Tensor => "tensor",
            Mode::DoubleBell => "double-bell",
        })
    }
}

impl FromStr for Mode {
    type Err = QuantumError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "1" => Ok(Mode::Single),
            "tensor" | "2" => Ok(Mode::Tensor),
            "double-bell" | "bell" | "3" => Ok(Mode::DoubleBell),
            other => Err(QuantumError::invalid_state(format!(
                "unknown mode {other:?} (try: single | tensor | bell)"
            ))),
        }
    }
}

/// Recovered state plus its fidelity against the normalized input.
#[derive(Clone, Debug)]
pub struct Teleported<S> {
    pub input: AmplitudeVector,
    pub state: S,
    pub fidelity: FidelityScore,
    /// Dominant Bell-measurement outcome of every pair used, in order.
    pub syndromes: Vec<BitPair>,
    /// Entanglement loss met by any partial trace along the way.
    pub warnings: Vec<EntanglementLossWarning>,
}

#[derive(Clone, Debug)]
pub enum Outcome {
    Single(Teleported<ReducedState>),
    Composite(Teleported<AmplitudeVector>),
}

impl Outcome {
    pub fn input(&self) -> &AmplitudeVector {
        match self {
            Outcome::Single(t) => &t.input,
            Outcome::Composite(t) => &t.input,
        }
    }

    pub fn fidelity(&self) -> FidelityScore {
        match self {
            Outcome::Single(t) => t.fidelity,
            Outcome::Composite(t) => t.fidelity,
        }
    }

    pub fn syndromes(&self) -> &[BitPair] {
        match self {
            Outcome::Single(t) => &t.syndromes,
            Outcome::Composite(t) => &t.syndromes,
        }
    }

    pub fn warnings(&self) -> &[EntanglementLossWarning] {
        match self {
            Outcome::Single(t) => &t.warnings,
            Outcome::Composite(t) => &t.warnings,
        }
    }

    /// Recovered state as a vector; single-qubit results collapse their
    /// reduced state.
    pub fn recovered(&self) -> Result<AmplitudeVector> {
        match self {
            Outcome::Single(t) => t.state.dominant_vector(),
            Outcome::Composite(t) => Ok(t.state.clone()),
        }
    }
}

/// Dispatch by mode; the amplitude count is checked before anything runs.
pub fn run(mode: Mode, amps: &[C64], cfg: &SimConfig) -> Result<Outcome> {
    if amps.len() != mode.arity() {
        return Err(QuantumError::invalid_state(format!(
            "{mode} mode takes {} amplitudes, got {}",
            mode.arity(),
            amps.len()
        )));
    }
    match mode {
        Mode::Single => teleport_single(amps[0], amps[1], cfg).map(Outcome::Single),
        Mode::Tensor => teleport_tensor([amps[0], amps[1], amps[2], amps[3]], cfg).map(Outcome::Composite),
        Mode::DoubleBell => {
            teleport_double_bell([amps[0], amps[1], amps[2], amps[3]], cfg).map(Outcome::Composite)
        }
    }
}

pub fn teleport_single(alpha: C64, beta: C64, cfg: &SimConfig) -> Result<Teleported<ReducedState>> {
    let psi = AmplitudeVector::from_pair(alpha, beta)?;
    teleport_state(&psi, cfg)
}

/// Bell-pair teleportation of a normalized single-qubit state.
pub fn teleport_state(psi: &AmplitudeVector, cfg: &SimConfig) -> Result<Teleported<ReducedState>> {
    if psi.num_qubits() != 1 {
        return Err(QuantumError::DimensionMismatch { expected: 2, actual: psi.dim() });
    }
    let mut reg = QubitRegister::from_state(AmplitudeVector::zero(2)?.tensor(psi)?);

    reg.apply_all(&[Gate::H(SENDER), Gate::Cx { control: SENDER, target: RECEIVER }])?;
    debug!(step = "bell_pair", "shared pair on slots {SENDER},{RECEIVER}");

    reg.apply_all(&[Gate::Cx { control: MESSAGE, target: SENDER }, Gate::H(MESSAGE)])?;
    debug!(step = "entangle", "message folded into the pair");

    for b in reg.branches(&[MESSAGE, SENDER])? {
        debug!(step = "measure", pattern = %b.pattern, probability = b.probability);
    }
    let m_z = reg.measure(MESSAGE)?;
    let m_x = reg.measure(SENDER)?;
    let syndrome = BitPair::from_bits(m_x.value(), m_z.value());
    debug!(step = "measure", %syndrome, "dominant outcome");

    let table = BitPair::ALL
        .iter()
        .map(|p| Ok((p.pattern(SENDER, MESSAGE)?, p.correction(RECEIVER))))
        .collect::<Result<Vec<(BitPattern, Vec<Gate>)>>>()?;
    reg.recombine(&table)?;
    debug!(step = "correct", "four-branch Pauli correction on slot {RECEIVER}");

    let received = partial_trace_with(reg.state(), &[RECEIVER], cfg.purity_tolerance)?;
    let f = fidelity(psi, &received)?;
    debug!(step = "trace", purity = received.purity(), fidelity = f.value());

    let warnings = received.warning().cloned().into_iter().collect();
    Ok(Teleported { input: psi.clone(), state: received, fidelity: f, syndromes: vec![syndrome], warnings })
}

/// Teleport (a,b) and (c,d) separately and rejoin as |0⟩⊗φ0 + |1⟩⊗φ1.
///
/// Each φ carries the weight of its half. The phase between halves is not
/// transported, so only inputs whose halves share a canonical phase come
/// back exactly.
pub fn teleport_tensor(amps: [C64; 4], cfg: &SimConfig) -> Result<Teleported<AmplitudeVector>> {
    let input = AmplitudeVector::from_quad(amps)?;
    let a = input.as_slice();

    let mut terms = Vec::with_capacity(2);
    let mut syndromes = Vec::new();
    let mut warnings = Vec::new();
    for (high, (alpha, beta)) in [(a[0], a[1]), (a[2], a[3])].into_iter().enumerate() {
        let weight = (alpha.norm_sqr() + beta.norm_sqr()).sqrt();
        if weight < EPS {
            debug!(half = high, "empty half, nothing to teleport");
            continue;
        }
        let half = teleport_single(alpha, beta, cfg)?;
        let phi = half.state.dominant_vector()?;
        syndromes.extend(half.syndromes);
        warnings.extend(half.warnings);
        terms.push((weight, AmplitudeVector::basis(1, high)?.tensor(&phi)?));
    }

    let state = superpose(&terms)?;
    let f = fidelity(&input, &state)?;
    debug!(mode = "tensor", fidelity = f.value());
    Ok(Teleported { input, state, fidelity: f, syndromes, warnings })
}

/// Teleport each qubit's reduced state over its own Bell pair and rejoin
/// them as a product. Cross-qubit correlation does not survive the trace.
pub fn teleport_double_bell(amps: [C64; 4], cfg: &SimConfig) -> Result<Teleported<AmplitudeVector>> {
    let input = AmplitudeVector::from_quad(amps)?;

    let mut received = Vec::with_capacity(2);
    let mut syndromes = Vec::new();
    let mut warnings = Vec::new();
    for slot in [0, 1] {
        let reduced = partial_trace_with(&input, &[slot], cfg.purity_tolerance)?;
        let sent = teleport_state(&reduced.dominant_vector()?, cfg)?;
        received.push(sent.state.dominant_vector()?);
        syndromes.extend(sent.syndromes);
        warnings.extend(reduced.warning().cloned());
        warnings.extend(sent.warnings);
    }

    let state = received[1].tensor(&received[0])?;
    let f = fidelity(&input, &state)?;
    debug!(mode = "double-bell", fidelity = f.value());
    Ok(Teleported { input, state, fidelity: f, syndromes, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> C64 {
        C64::new(re, im)
    }

    #[test]
    fn single_recovers_point_six_point_eight() {
        let t = teleport_single(c(0.6, 0.0), c(0.8, 0.0), &SimConfig::default()).unwrap();
        assert!(t.fidelity.is_perfect(1e-9));
        assert!(t.state.is_pure());
        let v = t.state.to_pure().unwrap();
        assert!((v.as_slice()[0].re - 0.6).abs() < 1e-9);
        assert!((v.as_slice()[1].re - 0.8).abs() < 1e-9);
    }

    #[test]
    fn single_handles_complex_unnormalized_input() {
        let t = teleport_single(c(1.0, 2.0), c(-3.0, 0.5), &SimConfig::default()).unwrap();
        assert!(t.fidelity.value() >= 1.0 - 1e-9);
    }

    #[test]
    fn bell_measurement_is_recorded_per_pair() {
        // After the sender's CX and H every outcome has weight 1/4, so the
        // tie rule reports 00.
        let t = teleport_single(c(0.6, 0.0), c(0.8, 0.0), &SimConfig::default()).unwrap();
        assert_eq!(t.syndromes, vec![BitPair::B00]);
        let amps = [c(0.5, 0.0), c(0.5, 0.0), c(0.5, 0.0), c(0.5, 0.0)];
        let bell = teleport_double_bell(amps, &SimConfig::default()).unwrap();
        assert_eq!(bell.syndromes.len(), 2);
        let tensor = teleport_tensor([c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)], &SimConfig::default()).unwrap();
        assert_eq!(tensor.syndromes.len(), 1);
    }

    #[test]
    fn extreme_scale_inputs_teleport_exactly() {
        for scale in [1e200, 1e-13] {
            let t = teleport_single(c(scale, 0.0), c(scale, 0.0), &SimConfig::default()).unwrap();
            assert!(t.fidelity.is_perfect(1e-9), "scale {scale}: {}", t.fidelity);
        }
    }

    #[test]
    fn single_rejects_zero_input() {
        let err = teleport_single(c(0.0, 0.0), c(0.0, 0.0), &SimConfig::default()).unwrap_err();
        assert!(matches!(err, QuantumError::InvalidState(_)));
    }

    #[test]
    fn run_checks_arity() {
        let err = run(Mode::Tensor, &[c(1.0, 0.0), c(0.0, 0.0)], &SimConfig::default()).unwrap_err();
        assert!(matches!(err, QuantumError::InvalidState(_)));
    }

    #[test]
    fn mode_parses() {
        assert_eq!("bell".parse::<Mode>().unwrap(), Mode::DoubleBell);
        assert_eq!(" Tensor ".parse::<Mode>().unwrap(), Mode::Tensor);
        assert!("qft".parse::<Mode>().is_err());
        assert_eq!(Mode::DoubleBell.to_string(), "double-bell");
    }
}
