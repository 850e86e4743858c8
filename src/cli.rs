use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::qsim::Mode;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeKind {
    #[clap(alias = "1")]
    Single,
    #[clap(alias = "2")]
    Tensor,
    #[clap(alias = "double-bell", alias = "3")]
    Bell,
}

impl From<ModeKind> for Mode {
    fn from(k: ModeKind) -> Self {
        match k {
            ModeKind::Single => Mode::Single,
            ModeKind::Tensor => Mode::Tensor,
            ModeKind::Bell => Mode::DoubleBell,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "qportal",
    about = "Quantum Portal: state-vector teleportation simulator",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct PortalCli {
    /// Global: path to config (TOML); default: ~/.qportal/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: print a JSON report instead of text
    #[arg(long = "json", action = ArgAction::SetTrue, global = true)]
    pub json: bool,

    /// Global: digits after the decimal point (overrides config)
    #[arg(long = "precision", value_name = "N", global = true)]
    pub precision: Option<usize>,

    /// Global: disable coloured output
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,

    /// Global: more log output on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Teleport one qubit α|0⟩ + β|1⟩ over a Bell pair
    ///
    /// Examples:
    ///   qportal single 0.6 0.8
    ///   qportal single 1+1j 0.5j
    Single {
        #[arg(value_name = "ALPHA", allow_hyphen_values = true)]
        alpha: String,
        #[arg(value_name = "BETA", allow_hyphen_values = true)]
        beta: String,
    },

    /// Teleport a two-qubit state half by half (tensor decomposition)
    Tensor {
        #[arg(value_name = "AMP", num_args = 4, allow_hyphen_values = true)]
        amps: Vec<String>,
    },

    /// Teleport a two-qubit state over two Bell pairs (per-qubit reduced states)
    Bell {
        #[arg(value_name = "AMP", num_args = 4, allow_hyphen_values = true)]
        amps: Vec<String>,
    },

    /// Run random input states through one mode and summarize fidelity
    Batch {
        #[arg(long = "mode", value_enum, default_value_t = ModeKind::Single)]
        mode: ModeKind,
        /// Number of states (default from config)
        #[arg(long = "count", value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        count: Option<u64>,
        /// RNG seed (default from config)
        #[arg(long = "seed", value_name = "SEED")]
        seed: Option<u64>,
    },

    /// Prompt for a mode and amplitudes on stdin (default)
    Interactive,
}
