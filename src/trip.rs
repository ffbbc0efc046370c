//! Trip

use std::fmt;

use crate::vehicles::Vehicle;

/// Direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// Outbound leg; owns round-trip costs by convention.
    Outbound,

    /// Return leg
    Return,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Outbound => f.write_str("outbound"),
            Leg::Return => f.write_str("return"),
        }
    }
}

/// Whether a trip is costed as one journey or as two linked legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripKind {
    /// A single journey; every declared cost is charged in full.
    OneWay,

    /// Outbound and return legs sharing round-trip costs.
    RoundTrip,
}

/// The vehicles of a trip, in display order.
///
/// Return vehicles are linked to outbound vehicles by position: the return
/// vehicle at index `i` is linked to the outbound vehicle at index `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    kind: TripKind,
    outbound: Vec<Vehicle>,
    returning: Vec<Vehicle>,
}

impl Trip {
    /// A single journey.
    pub fn one_way(vehicles: impl Into<Vec<Vehicle>>) -> Self {
        Self {
            kind: TripKind::OneWay,
            outbound: vehicles.into(),
            returning: Vec::new(),
        }
    }

    /// An outbound and a return leg.
    pub fn round_trip(outbound: impl Into<Vec<Vehicle>>, returning: impl Into<Vec<Vehicle>>) -> Self {
        Self {
            kind: TripKind::RoundTrip,
            outbound: outbound.into(),
            returning: returning.into(),
        }
    }

    /// How the trip is costed.
    pub fn kind(&self) -> TripKind {
        self.kind
    }

    /// Vehicles for the given leg.
    pub fn vehicles(&self, leg: Leg) -> &[Vehicle] {
        match leg {
            Leg::Outbound => &self.outbound,
            Leg::Return => &self.returning,
        }
    }

    /// Outbound vehicles
    pub fn outbound(&self) -> &[Vehicle] {
        &self.outbound
    }

    /// Return vehicles
    pub fn returning(&self) -> &[Vehicle] {
        &self.returning
    }

    /// Outbound vehicle linked to the return vehicle at `index`.
    pub fn linked(&self, index: usize) -> Option<&Vehicle> {
        self.outbound.get(index)
    }

    /// Check whether both legs have at least one vehicle.
    pub fn has_both_legs(&self) -> bool {
        !self.outbound.is_empty() && !self.returning.is_empty()
    }
}
