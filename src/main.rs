//! Carpool CLI
//!
//! Loads a trip fixture, searches the fee variants and prints the report.

use std::io;

use anyhow::Context;
use carpool::{fixtures::TripFixture, optimizer::optimize, report::Report};
use clap::Parser;

use crate::cli::CliConfig;

mod cli;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    cli::logging::init_subscriber(&config.logging)?;

    let default_currency = config.calculation.currency()?;
    let fixture = TripFixture::load_with_currency(&config.trip, default_currency)
        .with_context(|| format!("failed to load trip {}", config.trip.display()))?;

    let calculation_config = config.calculation.apply(fixture.config)?;

    tracing::info!(
        trip = %config.trip.display(),
        currency = fixture.currency.iso_alpha_code,
        unit = %calculation_config.unit,
        "loaded trip"
    );

    let optimized = optimize(&fixture.trip, &fixture.roster, &calculation_config);

    let mut report = Report::new(&optimized, fixture.currency);

    if let Some(title) = fixture.name.as_deref() {
        report = report.with_title(title);
    }

    if let Some(rounding) = config.calculation.rounding {
        report = report.showing(rounding.into());
    }

    report.write_to(io::stdout().lock())?;

    Ok(())
}
