//! Text rendering of amplitude vectors, reduced states and fidelity.
use colored::Colorize;
use num_complex::Complex64 as C64;

use crate::core::qsim::{AmplitudeVector, FidelityScore, ReducedState};

fn complex(z: C64, precision: usize) -> String {
    format!("{:.p$}{:+.p$}i", clean(z.re, precision), clean(z.im, precision), p = precision)
}

/// Anything that rounds to zero prints as `0`, never `-0`.
fn clean(x: f64, precision: usize) -> f64 {
    if x.abs() < 0.5 * 10f64.powi(-(precision as i32)) {
        0.0
    } else {
        x
    }
}

/// One `|label⟩ : amplitude` line per basis state, ascending index.
pub fn state_lines(state: &AmplitudeVector, precision: usize) -> Vec<String> {
    state
        .iter()
        .map(|(i, z)| format!("|{}⟩ : {}", state.basis_label(i), complex(z, precision)))
        .collect()
}

pub fn density_lines(reduced: &ReducedState, precision: usize) -> Vec<String> {
    let rho = reduced.density();
    let mut out = vec![format!(
        "ρ on slots {:?} (purity {:.p$})",
        reduced.kept(),
        reduced.purity(),
        p = precision
    )];
    for r in 0..rho.nrows() {
        let row: Vec<String> = (0..rho.ncols()).map(|c| complex(rho[(r, c)], precision)).collect();
        out.push(format!("  [ {} ]", row.join("  ")));
    }
    out
}

pub fn fidelity_line(score: FidelityScore, tolerance: f64, color: bool) -> String {
    let text = format!("fidelity: {score}");
    if !color {
        text
    } else if score.is_perfect(tolerance) {
        text.green().to_string()
    } else {
        text.yellow().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::qsim::partial_trace;

    #[test]
    fn bell_state_lines() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let bell = AmplitudeVector::from_quad([
            C64::new(s, 0.0),
            C64::new(0.0, 0.0),
            C64::new(0.0, 0.0),
            C64::new(s, 0.0),
        ])
        .unwrap();
        insta::assert_snapshot!(state_lines(&bell, 4).join("\n"), @r###"
        |00⟩ : 0.7071+0.0000i
        |01⟩ : 0.0000+0.0000i
        |10⟩ : 0.0000+0.0000i
        |11⟩ : 0.7071+0.0000i
        "###);
    }

    #[test]
    fn reduced_state_lines() {
        let psi = AmplitudeVector::basis(2, 0b10).unwrap();
        let r = partial_trace(&psi, &[1]).unwrap();
        insta::assert_snapshot!(density_lines(&r, 2).join("\n"), @r###"
        ρ on slots [1] (purity 1.00)
          [ 0.00+0.00i  0.00+0.00i ]
          [ 0.00+0.00i  1.00+0.00i ]
        "###);
    }

    #[test]
    fn plain_fidelity_line() {
        let psi = AmplitudeVector::zero(1).unwrap();
        let f = crate::core::qsim::fidelity(&psi, &psi).unwrap();
        assert_eq!(fidelity_line(f, 1e-9, false), "fidelity: 1.000000");
    }
}
