//! Fixtures
//!
//! Trips described in YAML, loaded into a [`Trip`] plus the [`Roster`] and
//! currency it was written against.
//!
//! ```yaml
//! currency: JPY
//! unit: 100
//! participants:
//!   - name: Aiko
//!     gender: female
//!   - name: Ken
//! outbound:
//!   - kind: hiace
//!     category: rental
//!     rental: 20000 JPY
//!     gas: { amount: 4150 JPY, scope: round-trip }
//!     driver: Aiko
//!     passengers: [Ken]
//! return:
//!   - kind: hiace
//!     category: rental
//!     rental: 20000 JPY
//!     driver: Aiko
//!     passengers: [Ken]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::CalculationConfig,
    fixtures::vehicles::VehicleFixture,
    participants::{Gender, Participant, Roster},
    trip::Trip,
    vehicles::Vehicle,
};

pub mod vehicles;

/// Currency used when a fixture does not name one.
pub const DEFAULT_CURRENCY: &str = "JPY";

/// Largest amount, in currency units, a fixture may declare.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid amount format
    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Amount declared in a different currency from the trip
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Occupant not in the participant list
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    /// Bad seat key, taken seat or full vehicle
    #[error("Invalid seat: {0}")]
    InvalidSeat(String),
}

/// A loaded trip fixture.
#[derive(Debug, Clone)]
pub struct TripFixture {
    /// Optional trip title
    pub name: Option<String>,

    /// Currency all amounts are declared in.
    pub currency: &'static Currency,

    /// Calculation settings declared by the fixture.
    pub config: CalculationConfig,

    /// Declared participants
    pub roster: Roster,

    /// Vehicles for each leg
    pub trip: Trip,
}

impl TripFixture {
    /// Load a fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid trip.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.as_ref())?;

        Self::from_yaml(&contents)
    }

    /// Load a fixture file, using `currency` when the file names none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid trip.
    pub fn load_with_currency(
        path: impl AsRef<Path>,
        currency: &'static Currency,
    ) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let raw: RawTripFixture = serde_norway::from_str(&contents)?;

        raw.build(currency)
    }

    /// Load `trips/{name}.yml` below `base_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a valid trip.
    pub fn load_named(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let file_path = base_path.into().join("trips").join(format!("{name}.yml"));

        Self::load(file_path)
    }

    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, an amount or currency is
    /// invalid, an occupant is not a declared participant, or a seat is bad.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        let raw: RawTripFixture = serde_norway::from_str(contents)?;
        let default_currency = iso::find(DEFAULT_CURRENCY)
            .ok_or_else(|| FixtureError::UnknownCurrency(DEFAULT_CURRENCY.to_string()))?;

        raw.build(default_currency)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTripFixture {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    currency: Option<String>,

    #[serde(default)]
    unit: Option<Decimal>,

    #[serde(default)]
    participants: Vec<ParticipantFixture>,

    #[serde(default)]
    outbound: Vec<VehicleFixture>,

    #[serde(default, rename = "return")]
    returning: Option<Vec<VehicleFixture>>,
}

impl RawTripFixture {
    fn build(self, default_currency: &'static Currency) -> Result<TripFixture, FixtureError> {
        let currency = match self.currency.as_deref() {
            Some(code) => {
                iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?
            }
            None => default_currency,
        };

        let config = self
            .unit
            .map_or_else(CalculationConfig::default, CalculationConfig::with_unit);

        let mut roster = Roster::new();

        for participant in self.participants {
            roster.insert(participant.into());
        }

        let context = FixtureContext {
            currency,
            roster: &roster,
        };

        let outbound = build_vehicles(self.outbound, &context)?;

        // A `return` list, even an empty one, makes this a round trip.
        let trip = match self.returning {
            Some(returning) => Trip::round_trip(outbound, build_vehicles(returning, &context)?),
            None => Trip::one_way(outbound),
        };

        Ok(TripFixture {
            name: self.name,
            currency,
            config,
            roster,
            trip,
        })
    }
}

fn build_vehicles(
    fixtures: Vec<VehicleFixture>,
    context: &FixtureContext<'_>,
) -> Result<Vec<Vehicle>, FixtureError> {
    fixtures
        .into_iter()
        .map(|fixture| fixture.build(context))
        .collect()
}

/// What vehicle fixtures are resolved against.
#[derive(Debug)]
pub struct FixtureContext<'a> {
    /// Trip currency
    pub currency: &'static Currency,

    /// Declared participants; empty means occupants are free-form names.
    pub roster: &'a Roster,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParticipantFixture {
    name: String,

    #[serde(default)]
    gender: Option<GenderFixture>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum GenderFixture {
    Male,
    Female,
}

impl From<GenderFixture> for Gender {
    fn from(gender: GenderFixture) -> Self {
        match gender {
            GenderFixture::Male => Gender::Male,
            GenderFixture::Female => Gender::Female,
        }
    }
}

impl From<ParticipantFixture> for Participant {
    fn from(fixture: ParticipantFixture) -> Self {
        Participant {
            name: fixture.name,
            gender: fixture.gender.map(Gender::from),
        }
    }
}

/// Parse an amount string (e.g., "4150 JPY") into a decimal and its currency.
///
/// # Errors
///
/// Returns an error if the string is not `AMOUNT CODE`, the amount is not a
/// decimal between zero and [`MAX_AMOUNT`], or the currency code is unknown.
pub fn parse_amount(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(FixtureError::InvalidAmount(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() || amount > Decimal::from(MAX_AMOUNT) {
        return Err(FixtureError::InvalidAmount(s.to_string()));
    }

    let currency = iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency((*code).to_string()))?;

    Ok((amount, currency))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;
    use crate::{trip::TripKind, vehicles::CostScope};

    const ROUND_TRIP: &str = r"
name: Lake weekend
currency: JPY
participants:
  - name: Aiko
    gender: female
  - name: Ken
  - name: Mio
outbound:
  - kind: hiace
    category: rental
    rental: 20000 JPY
    gas: { amount: 4150 JPY, scope: round-trip }
    highway: 1800 JPY
    driver: Aiko
    passengers: [Ken, Mio]
return:
  - kind: hiace
    category: rental
    rental: 20000 JPY
    driver: Aiko
    passengers: [Ken]
";

    #[test]
    fn parse_amount_accepts_amount_and_code() -> TestResult {
        let (amount, currency) = parse_amount("4150 JPY")?;

        assert_eq!(amount, Decimal::from(4_150));
        assert_eq!(currency, iso::JPY);

        Ok(())
    }

    #[test]
    fn parse_amount_rejects_invalid_format() {
        assert!(matches!(parse_amount("4150JPY"), Err(FixtureError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-5 JPY"), Err(FixtureError::InvalidAmount(_))));
    }

    #[test]
    fn parse_amount_caps_amounts() -> TestResult {
        let (largest, _) = parse_amount("1000000000000000 JPY")?;

        assert_eq!(largest, Decimal::from(MAX_AMOUNT));
        assert!(matches!(
            parse_amount("1000000000000001 JPY"),
            Err(FixtureError::InvalidAmount(_))
        ));
        assert!(matches!(
            parse_amount("79228162514264337593543950335 JPY"),
            Err(FixtureError::InvalidAmount(_))
        ));

        Ok(())
    }

    #[test]
    fn oversized_costs_fail_to_load() {
        let result = TripFixture::from_yaml(
            r"
outbound:
  - driver: Aiko
    passengers: [Ken]
    gas: 79228162514264337593543950335 JPY
",
        );

        assert!(matches!(result, Err(FixtureError::InvalidAmount(_))));
    }

    #[test]
    fn parse_amount_rejects_unknown_currency() {
        let result = parse_amount("100 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn loads_round_trip_fixture() -> TestResult {
        let fixture = TripFixture::from_yaml(ROUND_TRIP)?;

        assert_eq!(fixture.name.as_deref(), Some("Lake weekend"));
        assert_eq!(fixture.currency, iso::JPY);
        assert_eq!(fixture.config, CalculationConfig::default());
        assert_eq!(fixture.roster.len(), 3);
        assert_eq!(fixture.trip.kind(), TripKind::RoundTrip);

        let outbound = fixture.trip.outbound().first().ok_or("missing outbound vehicle")?;

        assert_eq!(outbound.rental_cost(), Some(Decimal::from(20_000)));
        assert_eq!(outbound.gas_cost.map(|gas| gas.scope), Some(CostScope::RoundTrip));
        assert_eq!(outbound.highway_cost.map(|hw| hw.scope), Some(CostScope::OneWay));
        assert_eq!(outbound.passenger_count(), 2);
        assert_eq!(
            outbound.driver().and_then(|driver| driver.participant),
            fixture.roster.find_by_name("Aiko")
        );
        assert_eq!(
            outbound.driver().and_then(|driver| driver.gender),
            Some(Gender::Female)
        );

        Ok(())
    }

    #[test]
    fn missing_return_list_means_one_way() -> TestResult {
        let fixture = TripFixture::from_yaml(
            "outbound:\n  - kind: 5-seater\n    driver: Aiko\n    passengers: [Ken]\n",
        )?;

        assert_eq!(fixture.trip.kind(), TripKind::OneWay);
        assert_eq!(fixture.currency, iso::JPY);

        Ok(())
    }

    #[test]
    fn custom_unit_is_read() -> TestResult {
        let fixture = TripFixture::from_yaml("currency: USD\nunit: 5\noutbound: []\n")?;

        assert_eq!(fixture.config.unit, Decimal::from(5));
        assert_eq!(fixture.currency, iso::USD);

        Ok(())
    }

    #[test]
    fn rejects_undeclared_occupants() {
        let result = TripFixture::from_yaml(
            "participants:\n  - name: Aiko\noutbound:\n  - kind: 5-seater\n    driver: Aiko\n    passengers: [Ghost]\n",
        );

        assert!(matches!(result, Err(FixtureError::UnknownParticipant(name)) if name == "Ghost"));
    }

    #[test]
    fn rejects_amounts_in_other_currencies() {
        let result = TripFixture::from_yaml(
            "currency: JPY\noutbound:\n  - kind: 5-seater\n    gas: 10 USD\n",
        );

        assert!(matches!(result, Err(FixtureError::CurrencyMismatch(expected, found)) if expected == "JPY" && found == "USD"));
    }

    #[test]
    fn default_currency_applies_only_when_unnamed() -> TestResult {
        let dir = tempfile::tempdir()?;
        let unnamed = dir.path().join("unnamed.yml");
        let named = dir.path().join("named.yml");

        fs::write(&unnamed, "outbound: []\n")?;
        fs::write(&named, "currency: JPY\noutbound: []\n")?;

        assert_eq!(TripFixture::load_with_currency(&unnamed, iso::EUR)?.currency, iso::EUR);
        assert_eq!(TripFixture::load_with_currency(&named, iso::EUR)?.currency, iso::JPY);

        Ok(())
    }

    #[test]
    fn load_named_reads_trips_directory() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::create_dir(dir.path().join("trips"))?;
        fs::write(dir.path().join("trips").join("weekend.yml"), ROUND_TRIP)?;

        let fixture = TripFixture::load_named(dir.path(), "weekend")?;

        assert_eq!(fixture.trip.outbound().len(), 1);
        assert_eq!(fixture.trip.returning().len(), 1);

        Ok(())
    }

    #[test]
    fn reading_missing_file_is_io_error() {
        let result = TripFixture::load("/definitely/not/here.yml");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}
