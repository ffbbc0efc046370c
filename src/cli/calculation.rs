//! Calculation Args

use anyhow::anyhow;
use carpool::{amounts::Rounding, config::CalculationConfig, fixtures::DEFAULT_CURRENCY};
use clap::Args;
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};

/// Rounding direction to display.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum RoundingArg {
    /// Round fees up.
    Up,

    /// Round fees down.
    Down,
}

impl From<RoundingArg> for Rounding {
    fn from(rounding: RoundingArg) -> Self {
        match rounding {
            RoundingArg::Up => Rounding::Up,
            RoundingArg::Down => Rounding::Down,
        }
    }
}

/// Calculation settings.
#[derive(Debug, Args)]
pub(crate) struct CalculationArgs {
    /// Denomination unit for fees and transfers; overrides the fixture's
    #[arg(short, long, env = "CARPOOL_UNIT")]
    pub unit: Option<Decimal>,

    /// Currency for fixtures that do not name one
    #[arg(short, long, env = "CARPOOL_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Show this rounding direction instead of the recommended one
    #[arg(short, long, value_enum)]
    pub rounding: Option<RoundingArg>,
}

impl CalculationArgs {
    /// Resolve the default currency code.
    pub(crate) fn currency(&self) -> anyhow::Result<&'static Currency> {
        iso::find(&self.currency).ok_or_else(|| anyhow!("unknown currency code {}", self.currency))
    }

    /// Apply command line overrides to the fixture's settings.
    pub(crate) fn apply(&self, config: CalculationConfig) -> anyhow::Result<CalculationConfig> {
        match self.unit {
            Some(unit) if unit <= Decimal::ZERO => Err(anyhow!("unit must be positive, got {unit}")),
            Some(unit) => Ok(CalculationConfig::with_unit(unit)),
            None => Ok(config),
        }
    }
}
