//! Vehicle Fixtures

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureContext, FixtureError, parse_amount},
    vehicles::{
        CostDetail, CostScope, Occupant, SeatKey, Vehicle, VehicleCategory, VehicleKind,
    },
};

/// Vehicle Fixture
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleFixture {
    #[serde(default)]
    kind: KindFixture,

    /// Only read for `custom` vehicles.
    #[serde(default)]
    capacity: Option<u8>,

    #[serde(default)]
    category: CategoryFixture,

    #[serde(default)]
    rental: Option<String>,

    #[serde(default)]
    gas: Option<CostFixture>,

    #[serde(default)]
    highway: Option<CostFixture>,

    #[serde(default)]
    driver: Option<String>,

    /// Seated in order after any explicit `seats`.
    #[serde(default)]
    passengers: Vec<String>,

    /// Explicit `"row-seat": name` assignments.
    #[serde(default)]
    seats: BTreeMap<String, String>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
enum KindFixture {
    #[serde(rename = "4-seater")]
    FourSeater,

    #[default]
    #[serde(rename = "5-seater")]
    FiveSeater,

    #[serde(rename = "7-seater")]
    SevenSeater,

    #[serde(rename = "8-seater")]
    EightSeater,

    #[serde(rename = "hiace", alias = "hiace-10")]
    Hiace,

    #[serde(rename = "custom")]
    Custom,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum CategoryFixture {
    #[default]
    Private,
    Rental,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ScopeFixture {
    #[default]
    OneWay,
    RoundTrip,
}

/// Either `4150 JPY` or `{ amount: 4150 JPY, scope: round-trip }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CostFixture {
    Amount(String),
    Detailed {
        amount: String,
        #[serde(default)]
        scope: ScopeFixture,
    },
}

impl VehicleFixture {
    /// Resolve amounts and occupants into a [`Vehicle`].
    ///
    /// # Errors
    ///
    /// Returns an error if an amount is malformed or in another currency, an
    /// occupant is not a declared participant, a seat key is malformed or
    /// taken twice, or more people are seated than the vehicle holds.
    pub fn build(self, context: &FixtureContext<'_>) -> Result<Vehicle, FixtureError> {
        let kind = match self.kind {
            KindFixture::FourSeater => VehicleKind::FourSeater,
            KindFixture::FiveSeater => VehicleKind::FiveSeater,
            KindFixture::SevenSeater => VehicleKind::SevenSeater,
            KindFixture::EightSeater => VehicleKind::EightSeater,
            KindFixture::Hiace => VehicleKind::Hiace,
            KindFixture::Custom => VehicleKind::Custom(self.capacity),
        };

        let mut vehicle = Vehicle::private(kind);

        vehicle.category = match self.category {
            CategoryFixture::Private => VehicleCategory::Private,
            CategoryFixture::Rental => VehicleCategory::Rental,
        };

        vehicle.rental_cost = self
            .rental
            .as_deref()
            .map(|rental| context.amount(rental))
            .transpose()?;

        vehicle.gas_cost = self.gas.map(|gas| gas.build(context)).transpose()?;
        vehicle.highway_cost = self.highway.map(|hw| hw.build(context)).transpose()?;

        for (key, name) in self.seats {
            let seat = key
                .parse::<SeatKey>()
                .map_err(|err| FixtureError::InvalidSeat(err.to_string()))?;

            seat_occupant(&mut vehicle, seat, context.occupant(&name)?)?;
        }

        if let Some(driver) = self.driver {
            seat_occupant(&mut vehicle, SeatKey::DRIVER, context.occupant(&driver)?)?;
        }

        let mut next = 0;

        for name in self.passengers {
            let occupant = context.occupant(&name)?;

            while vehicle.seats.contains_key(&SeatKey::passenger(next)) {
                next += 1;
            }

            seat_occupant(&mut vehicle, SeatKey::passenger(next), occupant)?;
        }

        if vehicle.occupant_count() > vehicle.capacity() {
            return Err(FixtureError::InvalidSeat(format!(
                "{} people seated in a vehicle for {}",
                vehicle.occupant_count(),
                vehicle.capacity()
            )));
        }

        Ok(vehicle)
    }
}

fn seat_occupant(vehicle: &mut Vehicle, seat: SeatKey, occupant: Occupant) -> Result<(), FixtureError> {
    if let Some(existing) = vehicle.seats.get(&seat) {
        return Err(FixtureError::InvalidSeat(format!(
            "seat {seat} is already taken by {}",
            existing.name
        )));
    }

    vehicle.seats.insert(seat, occupant);

    Ok(())
}

impl CostFixture {
    fn build(self, context: &FixtureContext<'_>) -> Result<CostDetail, FixtureError> {
        let (amount, scope) = match self {
            CostFixture::Amount(amount) => (amount, ScopeFixture::OneWay),
            CostFixture::Detailed { amount, scope } => (amount, scope),
        };

        let scope = match scope {
            ScopeFixture::OneWay => CostScope::OneWay,
            ScopeFixture::RoundTrip => CostScope::RoundTrip,
        };

        Ok(CostDetail {
            amount: context.amount(&amount)?,
            scope,
        })
    }
}

impl FixtureContext<'_> {
    /// Parse an amount, checking it is in the trip currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is malformed or in another currency.
    pub fn amount(&self, s: &str) -> Result<Decimal, FixtureError> {
        let (amount, currency) = parse_amount(s)?;

        if currency != self.currency {
            return Err(FixtureError::CurrencyMismatch(
                self.currency.iso_alpha_code.to_string(),
                currency.iso_alpha_code.to_string(),
            ));
        }

        Ok(amount)
    }

    /// Resolve an occupant by name.
    ///
    /// With no declared participants any name is accepted as-is.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UnknownParticipant`] if participants were
    /// declared and `name` is not among them.
    pub fn occupant(&self, name: &str) -> Result<Occupant, FixtureError> {
        if self.roster.is_empty() {
            return Ok(Occupant::named(name));
        }

        let key = self
            .roster
            .find_by_name(name)
            .ok_or_else(|| FixtureError::UnknownParticipant(name.to_string()))?;

        Ok(Occupant {
            name: name.to_string(),
            participant: Some(key),
            gender: self.roster.get(key).and_then(|participant| participant.gender),
        })
    }
}
