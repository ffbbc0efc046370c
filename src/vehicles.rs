//! Vehicles

use std::{collections::BTreeMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::participants::{Gender, ParticipantKey};

/// Seat key could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid seat key {0:?}; expected \"ROW-SEAT\"")]
pub struct SeatKeyError(pub String);

/// Position of a seat inside a vehicle, `row-seat`, both zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatKey {
    /// Row, 0 is the front row.
    pub row: u8,

    /// Seat within the row.
    pub seat: u8,
}

impl SeatKey {
    /// The driver's seat: last seat of the front row.
    pub const DRIVER: SeatKey = SeatKey { row: 0, seat: 1 };

    /// Create a new seat key.
    pub const fn new(row: u8, seat: u8) -> Self {
        Self { row, seat }
    }

    /// Seat used for the `index`th passenger when seats are filled in order.
    ///
    /// The front passenger seat comes first, then rows of three from row 1.
    pub fn passenger(index: usize) -> Self {
        if index == 0 {
            return SeatKey::new(0, 0);
        }

        let offset = index - 1;
        let row = u8::try_from(offset / 3 + 1).unwrap_or(u8::MAX);
        let seat = u8::try_from(offset % 3).unwrap_or(u8::MAX);

        SeatKey::new(row, seat)
    }
}

impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.seat)
    }
}

impl FromStr for SeatKey {
    type Err = SeatKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeatKeyError(s.to_string());

        let (row, seat) = s.trim().split_once('-').ok_or_else(invalid)?;
        let row = row.parse::<u8>().map_err(|_err| invalid())?;
        let seat = seat.parse::<u8>().map_err(|_err| invalid())?;

        Ok(SeatKey { row, seat })
    }
}

/// Someone sitting in a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    /// Display name; settlement keys everything by this.
    pub name: String,

    /// Roster entry, if the occupant was picked from the roster.
    pub participant: Option<ParticipantKey>,

    /// Optional gender, display only.
    pub gender: Option<Gender>,
}

impl Occupant {
    /// Occupant entered by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            participant: None,
            gender: None,
        }
    }
}

/// Body style of a vehicle, which fixes its seating capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    /// 4 seats
    FourSeater,

    /// 5 seats
    FiveSeater,

    /// 7 seats
    SevenSeater,

    /// 8 seats
    EightSeater,

    /// 10-seat van
    Hiace,

    /// Custom capacity; values below 2 fall back to 5.
    Custom(Option<u8>),
}

impl VehicleKind {
    /// Number of seats including the driver's.
    pub fn capacity(self) -> usize {
        match self {
            VehicleKind::FourSeater => 4,
            VehicleKind::FiveSeater => 5,
            VehicleKind::SevenSeater => 7,
            VehicleKind::EightSeater => 8,
            VehicleKind::Hiace => 10,
            VehicleKind::Custom(Some(capacity)) if capacity >= 2 => usize::from(capacity),
            VehicleKind::Custom(_) => 5,
        }
    }
}

/// Whether the vehicle is owned by a participant or hired for the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleCategory {
    /// Privately owned; any rental cost is ignored.
    Private,

    /// Hired; the rental cost is a round-trip total.
    Rental,
}

/// Whether a cost item covers one leg or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostScope {
    /// Covers only the leg it is declared on.
    OneWay,

    /// Covers both legs and is charged once.
    RoundTrip,
}

impl fmt::Display for CostScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostScope::OneWay => f.write_str("one-way"),
            CostScope::RoundTrip => f.write_str("round-trip"),
        }
    }
}

/// A declared cost item (fuel or tolls).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostDetail {
    /// Amount in the trip currency.
    pub amount: Decimal,

    /// Legs the amount covers.
    pub scope: CostScope,
}

impl CostDetail {
    /// Cost covering a single leg.
    pub fn one_way(amount: impl Into<Decimal>) -> Self {
        Self {
            amount: amount.into(),
            scope: CostScope::OneWay,
        }
    }

    /// Cost covering both legs.
    pub fn round_trip(amount: impl Into<Decimal>) -> Self {
        Self {
            amount: amount.into(),
            scope: CostScope::RoundTrip,
        }
    }

    /// Check whether this cost was declared for the whole round trip.
    pub fn is_round_trip(&self) -> bool {
        self.scope == CostScope::RoundTrip
    }
}

/// A car on one leg of the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    /// Body style
    pub kind: VehicleKind,

    /// Private or rental
    pub category: VehicleCategory,

    /// Round-trip rental total; only meaningful for rentals.
    pub rental_cost: Option<Decimal>,

    /// Fuel
    pub gas_cost: Option<CostDetail>,

    /// Tolls
    pub highway_cost: Option<CostDetail>,

    /// Seat assignments
    pub seats: BTreeMap<SeatKey, Occupant>,
}

impl Vehicle {
    /// Create an empty privately owned vehicle.
    pub fn private(kind: VehicleKind) -> Self {
        Self {
            kind,
            category: VehicleCategory::Private,
            rental_cost: None,
            gas_cost: None,
            highway_cost: None,
            seats: BTreeMap::new(),
        }
    }

    /// Create an empty rental vehicle with its round-trip rental total.
    pub fn rental(kind: VehicleKind, rental_cost: impl Into<Decimal>) -> Self {
        Self {
            category: VehicleCategory::Rental,
            rental_cost: Some(rental_cost.into()),
            ..Self::private(kind)
        }
    }

    /// Set the fuel cost.
    #[must_use]
    pub fn with_gas(mut self, cost: CostDetail) -> Self {
        self.gas_cost = Some(cost);
        self
    }

    /// Set the toll cost.
    #[must_use]
    pub fn with_highway(mut self, cost: CostDetail) -> Self {
        self.highway_cost = Some(cost);
        self
    }

    /// Seat `occupant` at `key`, replacing anyone already there.
    #[must_use]
    pub fn with_occupant(mut self, key: SeatKey, occupant: Occupant) -> Self {
        self.seats.insert(key, occupant);
        self
    }

    /// Seat a driver by name.
    #[must_use]
    pub fn with_driver(self, name: impl Into<String>) -> Self {
        self.with_occupant(SeatKey::DRIVER, Occupant::named(name))
    }

    /// Seat passengers by name, filling seats in order.
    #[must_use]
    pub fn with_passengers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (index, name) in names.into_iter().enumerate() {
            self.seats
                .insert(SeatKey::passenger(index), Occupant::named(name));
        }

        self
    }

    /// Seating capacity
    pub fn capacity(&self) -> usize {
        self.kind.capacity()
    }

    /// Key of the driver's seat.
    pub fn driver_seat(&self) -> SeatKey {
        SeatKey::DRIVER
    }

    /// Occupant of the driver's seat.
    pub fn driver(&self) -> Option<&Occupant> {
        self.seats.get(&self.driver_seat())
    }

    /// Everyone seated, in seat order.
    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> {
        self.seats.values()
    }

    /// Everyone seated except the driver, in seat order.
    pub fn passengers(&self) -> impl Iterator<Item = &Occupant> {
        let driver_seat = self.driver_seat();

        self.seats
            .iter()
            .filter(move |(key, _)| **key != driver_seat)
            .map(|(_, occupant)| occupant)
    }

    /// Number of seated people.
    pub fn occupant_count(&self) -> usize {
        self.seats.len()
    }

    /// Number of seated people who are not driving this vehicle.
    pub fn passenger_count(&self) -> usize {
        let occupants = self.occupant_count();

        if self.driver().is_some() {
            occupants.saturating_sub(1)
        } else {
            occupants
        }
    }

    /// Check whether anyone in this vehicle has `name`.
    pub fn seats_name(&self, name: &str) -> bool {
        self.occupants().any(|occupant| occupant.name == name)
    }

    /// Rental total, present only for rental vehicles.
    pub fn rental_cost(&self) -> Option<Decimal> {
        match self.category {
            VehicleCategory::Rental => self.rental_cost,
            VehicleCategory::Private => None,
        }
    }

    /// Check whether this is a rental vehicle.
    pub fn is_rental(&self) -> bool {
        self.category == VehicleCategory::Rental
    }
}
