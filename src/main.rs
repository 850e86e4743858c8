/// Quantum Portal main: teleportation subcommands, interactive prompt by default.
use clap::Parser; // trait import enables PortalCli::parse()
use tracing::Level;

use qportal::cli::{Command, PortalCli};
use qportal::commands::{self, Session};
use qportal::config::PortalConfig;

fn init_logging(verbose: u8) {
    // QPORTAL_LOG=debug|trace raises the level without flags.
    let from_env = std::env::var("QPORTAL_LOG").ok().and_then(|v| v.parse::<Level>().ok());
    let from_flag = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let level = from_env.map_or(from_flag, |e| e.max(from_flag));
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = PortalCli::parse();
    init_logging(args.verbose);

    let cfg = PortalConfig::load(&args.config)?;
    let session = Session::new(&args, &cfg);
    if !session.color {
        colored::control::set_override(false);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.cmd {
        Some(Command::Single { alpha, beta }) => {
            commands::teleport::run_literals(qportal::core::qsim::Mode::Single, &[alpha, beta], &session, &mut out)
        }
        Some(Command::Tensor { amps }) => {
            commands::teleport::run_literals(qportal::core::qsim::Mode::Tensor, &amps, &session, &mut out)
        }
        Some(Command::Bell { amps }) => {
            commands::teleport::run_literals(qportal::core::qsim::Mode::DoubleBell, &amps, &session, &mut out)
        }
        Some(Command::Batch { mode, count, seed }) => {
            commands::batch::run(mode.into(), count, seed, &session, &mut out)
        }
        Some(Command::Interactive) | None => {
            let stdin = std::io::stdin();
            commands::interactive::run(&mut stdin.lock(), &mut out, &session)
        }
    }
}
