//! Command line configuration

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{calculation::CalculationArgs, logging::LoggingConfig};

pub(crate) mod calculation;
pub(crate) mod logging;

/// Split the cost of a multi-car trip and settle up between drivers
#[derive(Debug, Parser)]
#[command(name = "carpool", version, about, long_about = None)]
pub(crate) struct CliConfig {
    /// Trip fixture (YAML)
    pub trip: PathBuf,

    /// Calculation settings.
    #[command(flatten)]
    pub calculation: CalculationArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
