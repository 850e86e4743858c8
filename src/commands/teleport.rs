//! `single`, `tensor` and `bell` subcommands.
use std::io::Write;

use anyhow::{Context, Result};
use num_complex::Complex64 as C64;
use serde::Serialize;

use crate::commands::Session;
use crate::core::qsim::{parse_amplitude, teleport, AmplitudeVector, FidelityScore, Mode, Outcome};
use crate::render;

#[derive(Debug, Serialize)]
pub struct TeleportReport {
    pub mode: Mode,
    /// Normalized input, `[re, im]` per basis state.
    pub input: Vec<[f64; 2]>,
    pub output: Vec<[f64; 2]>,
    pub fidelity: FidelityScore,
    pub perfect: bool,
    pub purity: Option<f64>,
    /// Dominant Bell-measurement outcome per pair, written `m_x m_z`.
    pub syndromes: Vec<String>,
    pub warnings: Vec<String>,
}

impl TeleportReport {
    pub fn new(mode: Mode, outcome: &Outcome, tolerance: f64) -> Result<Self> {
        let output = outcome.recovered().context("collapsing received state")?;
        let purity = match outcome {
            Outcome::Single(t) => Some(t.state.purity()),
            Outcome::Composite(_) => None,
        };
        Ok(Self {
            mode,
            input: pairs(outcome.input()),
            output: pairs(&output),
            fidelity: outcome.fidelity(),
            perfect: outcome.fidelity().is_perfect(tolerance),
            purity,
            syndromes: outcome.syndromes().iter().map(|b| b.to_string()).collect(),
            warnings: outcome.warnings().iter().map(|w| w.to_string()).collect(),
        })
    }
}

fn pairs(v: &AmplitudeVector) -> Vec<[f64; 2]> {
    v.iter().map(|(_, z)| [z.re, z.im]).collect()
}

pub fn parse_literals(literals: &[String]) -> Result<Vec<C64>> {
    literals
        .iter()
        .map(|s| parse_amplitude(s).with_context(|| format!("amplitude {s:?}")))
        .collect()
}

pub fn run_literals<W: Write>(mode: Mode, literals: &[String], session: &Session, out: &mut W) -> Result<()> {
    let amps = parse_literals(literals)?;
    run_amplitudes(mode, &amps, session, out)
}

pub fn run_amplitudes<W: Write>(mode: Mode, amps: &[C64], session: &Session, out: &mut W) -> Result<()> {
    let outcome = teleport::run(mode, amps, &session.sim)
        .with_context(|| format!("{mode} teleportation failed"))?;
    report(mode, &outcome, session, out)
}

pub fn report<W: Write>(mode: Mode, outcome: &Outcome, session: &Session, out: &mut W) -> Result<()> {
    if session.json {
        let rep = TeleportReport::new(mode, outcome, session.sim.tolerance)?;
        serde_json::to_writer_pretty(&mut *out, &rep).context("writing JSON report")?;
        writeln!(out)?;
        return Ok(());
    }

    let p = session.precision;
    writeln!(out, "mode: {mode}")?;
    writeln!(out, "input:")?;
    for line in render::state_lines(outcome.input(), p) {
        writeln!(out, "  {line}")?;
    }
    if let Outcome::Single(t) = outcome {
        writeln!(out, "received:")?;
        for line in render::density_lines(&t.state, p) {
            writeln!(out, "  {line}")?;
        }
    }
    writeln!(out, "final statevector:")?;
    for line in render::state_lines(&outcome.recovered()?, p) {
        writeln!(out, "  {line}")?;
    }
    writeln!(out, "{}", render::fidelity_line(outcome.fidelity(), session.sim.tolerance, session.color))?;
    for w in outcome.warnings() {
        writeln!(out, "warning: {w}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn text_report_for_single() {
        let mut buf = Vec::new();
        run_literals(Mode::Single, &lits(&["0.6", "0.8"]), &Session::default(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("mode: single"));
        assert!(text.contains("|1⟩ : 0.8000+0.0000i"));
        assert!(text.contains("fidelity: 1.000000"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn json_report_for_bell_state() {
        let session = Session { json: true, ..Session::default() };
        let mut buf = Vec::new();
        run_literals(Mode::DoubleBell, &lits(&["0.7071", "0", "0", "0.7071"]), &session, &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["mode"], "double-bell");
        assert_eq!(v["perfect"], false);
        assert!((v["fidelity"].as_f64().unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(v["warnings"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bad_literal_names_itself() {
        let mut buf = Vec::new();
        let err = run_literals(Mode::Single, &lits(&["0.6", "zz"]), &Session::default(), &mut buf).unwrap_err();
        assert!(format!("{err:#}").contains("\"zz\""));
    }
}
