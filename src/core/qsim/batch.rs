//! Run many random input states through one protocol and summarize fidelity.
use num_complex::Complex64 as C64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::error::{QuantumError, Result};
use crate::core::qsim::state::AmplitudeVector;
use crate::core::qsim::teleport::{self, Mode};
use crate::core::qsim::SimConfig;

#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    pub mode: Mode,
    pub count: usize,
    pub seed: u64,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    /// Runs whose fidelity was within tolerance of 1.
    pub perfect: usize,
}

/// Haar-random state: i.i.d. complex Gaussian amplitudes, normalized.
pub fn random_state<R: Rng>(rng: &mut R, num_qubits: usize) -> Result<AmplitudeVector> {
    let amps = (0..1usize << num_qubits)
        .map(|_| C64::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
        .collect();
    AmplitudeVector::from_amplitudes(amps)
}

pub fn evaluate(mode: Mode, count: usize, seed: u64, cfg: &SimConfig) -> Result<BatchReport> {
    if count == 0 {
        return Err(QuantumError::invalid_state("batch needs at least one state"));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let width = mode.arity().trailing_zeros() as usize;

    let (mut min, mut max, mut sum, mut perfect) = (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0);
    for run in 0..count {
        let psi = random_state(&mut rng, width)?;
        let f = teleport::run(mode, psi.as_slice(), cfg)?.fidelity();
        debug!(run, fidelity = f.value());
        min = min.min(f.value());
        max = max.max(f.value());
        sum += f.value();
        if f.is_perfect(cfg.tolerance) {
            perfect += 1;
        }
    }

    let report = BatchReport { mode, count, seed, min, mean: sum / count as f64, max, perfect };
    info!(%mode, count, min = report.min, mean = report.mean, "batch done");
    Ok(report)
}
