use std::io::Write;

use anyhow::{Context, Result};

use crate::commands::Session;
use crate::core::qsim::{batch, Mode};

pub fn run<W: Write>(mode: Mode, count: Option<u64>, seed: Option<u64>, session: &Session, out: &mut W) -> Result<()> {
    let count = count.map(|c| c as usize).unwrap_or(session.batch.count);
    let seed = seed.unwrap_or(session.batch.seed);
    let report = batch::evaluate(mode, count, seed, &session.sim)
        .with_context(|| format!("batch of {count} {mode} runs"))?;

    if session.json {
        serde_json::to_writer_pretty(&mut *out, &report).context("writing JSON report")?;
        writeln!(out)?;
    } else {
        let p = session.precision;
        writeln!(out, "mode: {mode}  runs: {}  seed: {}", report.count, report.seed)?;
        writeln!(
            out,
            "fidelity min {:.p$}  mean {:.p$}  max {:.p$}",
            report.min, report.mean, report.max
        )?;
        writeln!(out, "perfect: {}/{}", report.perfect, report.count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_come_from_session() {
        let mut session = Session::default();
        session.batch.count = 5;
        let mut out = Vec::new();
        run(Mode::Single, None, Some(3), &session, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("runs: 5  seed: 3"));
        assert!(text.contains("perfect: 5/5"));
    }
}
