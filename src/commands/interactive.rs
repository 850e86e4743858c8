//! Prompt-driven front-end: choose a mode, type amplitudes, get a report.
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use num_complex::Complex64 as C64;

use crate::commands::{teleport, Session};
use crate::core::qsim::{parse_amplitude, Mode};

const SINGLE_PROMPTS: [(&str, &str); 2] = [("alpha", "0.6+0j"), ("beta", "0.8+0j")];
const PAIR_PROMPTS: [(&str, &str); 4] = [("a", "0.7071"), ("b", "0"), ("c", "0"), ("d", "0.7071")];

pub fn run<R: BufRead, W: Write>(input: &mut R, out: &mut W, session: &Session) -> Result<()> {
    writeln!(out, "Quantum Portal ready.")?;
    writeln!(out, "  [1] single-qubit teleportation (Bell pair)")?;
    writeln!(out, "  [2] two-qubit teleportation (tensor decomposition)")?;
    writeln!(out, "  [3] two-qubit teleportation (double Bell pair)")?;
    let choice = ask(input, out, "Select mode: ")?;
    let mode: Mode = choice.parse().context("mode selection")?;

    let prompts: &[(&str, &str)] = match mode {
        Mode::Single => &SINGLE_PROMPTS,
        Mode::Tensor | Mode::DoubleBell => &PAIR_PROMPTS,
    };
    let mut amps: Vec<C64> = Vec::with_capacity(prompts.len());
    for (name, example) in prompts {
        let line = ask(input, out, &format!("Enter {name} (e.g., {example}): "))?;
        amps.push(parse_amplitude(&line).with_context(|| format!("amplitude {name}"))?);
    }

    teleport::run_amplitudes(mode, &amps, session, out)
}

fn ask<R: BufRead, W: Write>(input: &mut R, out: &mut W, prompt: &str) -> Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line).context("reading stdin")? == 0 {
        bail!("input closed before {}", prompt.trim_end_matches(&[':', ' '][..]));
    }
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn single_session() {
        let mut input = Cursor::new("1\n0.6+0j\n0.8+0j\n");
        let mut out = Vec::new();
        run(&mut input, &mut out, &Session::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Enter alpha (e.g., 0.6+0j): "));
        assert!(text.contains("fidelity: 1.000000"));
    }

    #[test]
    fn tensor_session_by_name() {
        let mut input = Cursor::new("tensor\n1\n0\n0\n0\n");
        let mut out = Vec::new();
        run(&mut input, &mut out, &Session::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("mode: tensor"));
        assert!(text.contains("fidelity: 1.000000"));
    }

    #[test]
    fn early_eof_is_an_error() {
        let mut input = Cursor::new("1\n0.6\n");
        let mut out = Vec::new();
        let err = run(&mut input, &mut out, &Session::default()).unwrap_err();
        assert!(err.to_string().contains("input closed before Enter beta"));
    }
}
