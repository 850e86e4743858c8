pub mod batch;
pub mod interactive;
pub mod teleport;

use crate::cli::PortalCli;
use crate::config::{BatchSection, PortalConfig};
use crate::core::qsim::SimConfig;

/// Everything a command needs, resolved once from the config file and the
/// global flags.
#[derive(Clone, Debug)]
pub struct Session {
    pub sim: SimConfig,
    pub precision: usize,
    pub color: bool,
    pub json: bool,
    pub batch: BatchSection,
}

impl Session {
    pub fn new(cli: &PortalCli, cfg: &PortalConfig) -> Self {
        Self {
            sim: cfg.sim(),
            precision: cli.precision.unwrap_or(cfg.display.precision),
            color: cfg.display.color && !cli.no_color,
            json: cli.json,
            batch: cfg.batch.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        let cfg = PortalConfig::default();
        Self {
            sim: cfg.sim(),
            precision: cfg.display.precision,
            color: false,
            json: false,
            batch: cfg.batch,
        }
    }
}
