//! Report
//!
//! Table rendering of an optimised calculation. Every figure is taken from
//! the engine's results as-is; nothing is recomputed here.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    amounts::Rounding,
    calculation::{Calculation, ParticipantCost},
    optimizer::Optimized,
    settlement::SettlementPass,
    trip::{Leg, TripKind},
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// A printable view of an [`Optimized`] result.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    optimized: &'a Optimized,
    currency: &'static Currency,
    title: Option<&'a str>,
    rounding: Option<Rounding>,
}

impl<'a> Report<'a> {
    /// Report on the recommended result.
    pub fn new(optimized: &'a Optimized, currency: &'static Currency) -> Self {
        Self {
            optimized,
            currency,
            title: None,
            rounding: None,
        }
    }

    /// Print `title` above the tables.
    #[must_use]
    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Show the result for `rounding` instead of the recommended one.
    #[must_use]
    pub fn showing(mut self, rounding: Rounding) -> Self {
        self.rounding = Some(rounding);
        self
    }

    /// The calculation whose details are printed.
    pub fn calculation(&self) -> &'a Calculation {
        match self.rounding {
            Some(rounding) => self.optimized.for_rounding(rounding),
            None => self.optimized.recommended(),
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        let calculation = self.calculation();

        if let Some(title) = self.title {
            writeln!(out, "\n\x1b[1m{title}\x1b[0m")?;
        }

        writeln!(
            out,
            "\nRecommended: {} ({}), showing {}",
            self.optimized.recommended, self.optimized.adjustment, calculation.rounding,
        )?;

        write_table(&mut out, self.comparison_table(), 2)?;
        write_table(&mut out, self.legs_table(calculation), 1)?;
        write_table(&mut out, self.collections_table(calculation), 4)?;

        if calculation.settlement.transfers.is_empty() {
            writeln!(out, "\nNo transfers between drivers.")?;
        } else {
            write_table(&mut out, self.transfers_table(calculation), 3)?;
        }

        write_table(&mut out, self.balances_table(calculation), 1)?;
        write_table(&mut out, self.participants_table(calculation), 1)?;

        self.write_summary(&mut out, calculation)
    }

    fn money(&self, amount: Decimal) -> String {
        Money::from_decimal(amount, self.currency).to_string()
    }

    fn comparison_table(&self) -> Builder {
        let mut builder = Builder::default();

        builder.push_record(["", "Rounding", "Adjustment", "Outbound fee", "Return fee", "Score"]);

        for rounding in Rounding::ALL {
            let calculation = self.optimized.for_rounding(rounding);
            let marker = if rounding == self.optimized.recommended {
                "*"
            } else {
                ""
            };

            builder.push_record([
                marker.to_string(),
                rounding.to_string(),
                calculation.adjustment.to_string(),
                self.money(calculation.outbound.fee),
                self.money(calculation.returning.fee),
                self.money(calculation.score()),
            ]);
        }

        builder
    }

    fn legs_table(&self, calculation: &Calculation) -> Builder {
        let mut builder = Builder::default();

        builder.push_record(["Leg", "Cost", "Payers", "Fee", "Collected"]);

        for leg in legs(calculation.kind) {
            let summary = calculation.leg(*leg);

            builder.push_record([
                leg.to_string(),
                self.money(summary.cost),
                summary.payer_count.to_string(),
                self.money(summary.fee),
                self.money(summary.collected()),
            ]);
        }

        builder
    }

    fn collections_table(&self, calculation: &Calculation) -> Builder {
        let mut builder = Builder::default();

        builder.push_record([
            "Leg",
            "Vehicle",
            "Driver",
            "Passengers",
            "Fee",
            "Collected",
            "Cost",
            "Difference",
        ]);

        for collection in calculation.collections() {
            builder.push_record([
                collection.leg.to_string(),
                format!("#{:<3}", collection.vehicle + 1),
                collection.driver_name.clone(),
                collection.passenger_count.to_string(),
                self.money(collection.fee),
                self.money(collection.collected),
                self.money(collection.actual_cost),
                self.money(collection.difference()),
            ]);
        }

        builder
    }

    fn transfers_table(&self, calculation: &Calculation) -> Builder {
        let mut builder = Builder::default();

        builder.push_record(["Pass", "From", "To", "Amount"]);

        for transfer in &calculation.settlement.transfers {
            builder.push_record([
                pass_label(transfer.pass).to_string(),
                transfer.from.clone(),
                transfer.to.clone(),
                self.money(transfer.amount),
            ]);
        }

        builder
    }

    fn balances_table(&self, calculation: &Calculation) -> Builder {
        let mut builder = Builder::default();

        builder.push_record(["Driver", "Cost", "Collected", "Transfers", "Balance"]);

        for balance in &calculation.settlement.balances {
            builder.push_record([
                balance.name.clone(),
                self.money(balance.vehicle_cost()),
                self.money(balance.collected),
                self.money(balance.adjustments),
                self.money(balance.balance()),
            ]);
        }

        builder
    }

    fn participants_table(&self, calculation: &Calculation) -> Builder {
        let mut builder = Builder::default();

        builder.push_record(["Name", "Outbound", "Return", "Total", "Pays"]);

        for cost in &calculation.participant_costs {
            builder.push_record([
                cost.name.clone(),
                self.money(cost.outbound),
                self.money(cost.returning),
                self.money(cost.total()),
                pays_label(cost),
            ]);
        }

        builder
    }

    fn write_summary(
        &self,
        out: &mut impl io::Write,
        calculation: &Calculation,
    ) -> Result<(), ReportError> {
        let lines = [
            ("Total cost:", self.money(calculation.total_cost())),
            ("Collected:", self.money(calculation.total_collected())),
            ("Driver shortfall:", self.money(calculation.driver_shortfall())),
            ("Participants:", calculation.all_participants.to_string()),
        ];

        let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        writeln!(out)?;

        for (label, value) in lines {
            writeln!(out, " {label:<label_width$} {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

fn legs(kind: TripKind) -> &'static [Leg] {
    match kind {
        TripKind::OneWay => &[Leg::Outbound],
        TripKind::RoundTrip => &[Leg::Outbound, Leg::Return],
    }
}

fn pass_label(pass: SettlementPass) -> &'static str {
    match pass {
        SettlementPass::Reconciliation => "reconcile",
        SettlementPass::Equalization => "equalise",
    }
}

fn pays_label(cost: &ParticipantCost) -> String {
    if cost.is_driver {
        return "(driver)".to_string();
    }

    [
        (Leg::Outbound, cost.outbound_driver.as_deref()),
        (Leg::Return, cost.return_driver.as_deref()),
    ]
    .into_iter()
    .filter_map(|(leg, driver)| driver.map(|driver| format!("{leg}: {driver}")))
    .collect::<Vec<_>>()
    .join("\n")
}

/// Render `builder` with the header row separated and columns from
/// `first_amount_column` right aligned.
fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    first_amount_column: usize,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(first_amount_column..), Alignment::right());

    writeln!(out, "\n{table}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;
    use crate::{
        config::CalculationConfig,
        optimizer::optimize,
        participants::Roster,
        trip::Trip,
        vehicles::{CostDetail, Vehicle, VehicleKind},
    };

    fn render(report: Report<'_>) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();

        report.write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    fn two_car_trip() -> Trip {
        Trip::one_way(vec![
            Vehicle::private(VehicleKind::FiveSeater)
                .with_driver("Aiko")
                .with_passengers(["Ken"])
                .with_gas(CostDetail::one_way(1_000)),
            Vehicle::private(VehicleKind::FiveSeater)
                .with_driver("Sho")
                .with_passengers(["Mio"])
                .with_gas(CostDetail::one_way(2_000)),
        ])
    }

    #[test]
    fn shows_transfers_and_engine_amounts() -> TestResult {
        let optimized = optimize(&two_car_trip(), &Roster::new(), &CalculationConfig::default());
        let output = render(Report::new(&optimized, iso::JPY).with_title("Ski day"))?;

        let fee = Money::from_decimal(Decimal::from(1_500), iso::JPY).to_string();
        let transfer = Money::from_decimal(Decimal::from(500), iso::JPY).to_string();

        assert!(output.contains("Ski day"), "missing title:\n{output}");
        assert!(output.contains(&fee), "missing fee:\n{output}");
        assert!(output.contains(&transfer), "missing transfer:\n{output}");
        assert!(output.contains("reconcile"), "missing transfer row:\n{output}");
        assert!(output.contains("outbound: Aiko"), "missing payee:\n{output}");
        assert!(!output.contains("return:"), "one-way trip shows return:\n{output}");

        Ok(())
    }

    #[test]
    fn balanced_trip_reports_no_transfers() -> TestResult {
        let trip = Trip::one_way(vec![
            Vehicle::private(VehicleKind::FiveSeater)
                .with_driver("Aiko")
                .with_passengers(["Ken", "Mio"])
                .with_gas(CostDetail::one_way(3_000)),
        ]);

        let optimized = optimize(&trip, &Roster::new(), &CalculationConfig::default());
        let output = render(Report::new(&optimized, iso::JPY))?;

        assert!(output.contains("No transfers between drivers."), "{output}");
        assert!(output.contains("(driver)"), "{output}");

        Ok(())
    }

    #[test]
    fn showing_selects_rounding() {
        let optimized = optimize(&two_car_trip(), &Roster::new(), &CalculationConfig::default());

        let report = Report::new(&optimized, iso::JPY).showing(Rounding::Down);

        assert_eq!(report.calculation().rounding, Rounding::Down);
        assert_eq!(
            Report::new(&optimized, iso::JPY).calculation().rounding,
            optimized.recommended
        );
    }
}
