//! Vehicle Costs
//!
//! Works out how much of each declared cost item a vehicle is charged on a
//! given leg. Round-trip costs are charged exactly once across the two legs:
//! a rental total is split between the outbound vehicle and the linked return
//! vehicle, and fuel or tolls declared round-trip on an outbound vehicle
//! suppress the matching item on the linked return vehicle.

use std::fmt;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    trip::{Leg, Trip, TripKind},
    vehicles::{CostDetail, CostScope, Vehicle},
};

/// How a vehicle is charged, depending on the trip and leg it belongs to.
#[derive(Debug, Clone, Copy)]
pub enum Charging<'a> {
    /// Single journey: everything charged in full.
    OneWay,

    /// Outbound leg of a round trip.
    Outbound,

    /// Return leg of a round trip, with the positionally linked outbound vehicle.
    Return {
        /// Outbound vehicle at the same index, if any.
        linked: Option<&'a Vehicle>,
    },
}

impl<'a> Charging<'a> {
    /// Charging rule for the vehicle at `index` on `leg` of `trip`.
    pub fn for_vehicle(trip: &'a Trip, leg: Leg, index: usize) -> Self {
        match (trip.kind(), leg) {
            (TripKind::OneWay, _) => Charging::OneWay,
            (TripKind::RoundTrip, Leg::Outbound) => Charging::Outbound,
            (TripKind::RoundTrip, Leg::Return) => Charging::Return {
                linked: trip.linked(index),
            },
        }
    }
}

/// Which declared cost an item comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostItemKind {
    /// Rental fee
    Rental,

    /// Fuel
    Gas,

    /// Tolls
    Highway,
}

impl fmt::Display for CostItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostItemKind::Rental => f.write_str("rental"),
            CostItemKind::Gas => f.write_str("gas"),
            CostItemKind::Highway => f.write_str("highway"),
        }
    }
}

/// How a declared amount was turned into a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Charged in full on this leg.
    Full,

    /// Half of a round-trip rental total.
    Halved,

    /// Charged on the linked outbound vehicle as a round-trip cost.
    AlreadyCounted,
}

/// One line of a vehicle's cost breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostItem {
    /// Source of the cost
    pub kind: CostItemKind,

    /// Amount declared on the vehicle (zero if it declared nothing).
    pub declared: Decimal,

    /// Declared scope, for fuel and tolls.
    pub scope: Option<CostScope>,

    /// How the declared amount was treated.
    pub treatment: Treatment,

    /// Amount charged on this leg.
    pub charged: Decimal,
}

impl CostItem {
    fn full(kind: CostItemKind, declared: Decimal, scope: Option<CostScope>) -> Self {
        Self {
            kind,
            declared,
            scope,
            treatment: Treatment::Full,
            charged: declared,
        }
    }

    fn halved(kind: CostItemKind, declared: Decimal) -> Self {
        Self {
            kind,
            declared,
            scope: Some(CostScope::RoundTrip),
            treatment: Treatment::Halved,
            charged: declared / Decimal::TWO,
        }
    }

    fn already_counted(kind: CostItemKind, own: Option<&CostDetail>) -> Self {
        Self {
            kind,
            declared: own.map_or(Decimal::ZERO, |cost| cost.amount),
            scope: own.map(|cost| cost.scope),
            treatment: Treatment::AlreadyCounted,
            charged: Decimal::ZERO,
        }
    }
}

/// Cost items charged to one vehicle on one leg.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CostBreakdown {
    items: SmallVec<[CostItem; 3]>,
}

impl CostBreakdown {
    /// Build the breakdown for `vehicle` under `charging`.
    pub fn new(vehicle: &Vehicle, charging: Charging<'_>) -> Self {
        let mut items = SmallVec::new();

        if let Some(rental) = rental_item(vehicle, charging) {
            items.push(rental);
        }

        let (linked_gas, linked_highway) = match charging {
            Charging::Return {
                linked: Some(linked),
            } => (linked.gas_cost, linked.highway_cost),
            _ => (None, None),
        };

        if let Some(gas) = leg_item(CostItemKind::Gas, vehicle.gas_cost.as_ref(), linked_gas) {
            items.push(gas);
        }

        if let Some(highway) = leg_item(
            CostItemKind::Highway,
            vehicle.highway_cost.as_ref(),
            linked_highway,
        ) {
            items.push(highway);
        }

        Self { items }
    }

    /// Items in rental, gas, highway order.
    pub fn items(&self) -> &[CostItem] {
        &self.items
    }

    /// Sum of charged amounts.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.charged).sum()
    }
}

fn rental_item(vehicle: &Vehicle, charging: Charging<'_>) -> Option<CostItem> {
    let rental = vehicle.rental_cost()?;

    let item = match charging {
        Charging::OneWay => CostItem::full(CostItemKind::Rental, rental, None),
        Charging::Outbound => CostItem::halved(CostItemKind::Rental, rental),
        // Both legs jointly fund the one rental when the outbound vehicle is a rental too.
        Charging::Return { linked } if linked.is_some_and(Vehicle::is_rental) => {
            CostItem::halved(CostItemKind::Rental, rental)
        }
        Charging::Return { .. } => {
            CostItem::full(CostItemKind::Rental, rental, Some(CostScope::OneWay))
        }
    };

    Some(item)
}

fn leg_item(
    kind: CostItemKind,
    own: Option<&CostDetail>,
    linked: Option<CostDetail>,
) -> Option<CostItem> {
    if linked.is_some_and(|cost| cost.is_round_trip()) {
        return Some(CostItem::already_counted(kind, own));
    }

    // The return vehicle's own scope is not consulted here; it only matters
    // for suppressing the other leg.
    own.map(|cost| CostItem::full(kind, cost.amount, Some(cost.scope)))
}

/// Actual cost charged to `vehicle` under `charging`.
pub fn vehicle_leg_cost(vehicle: &Vehicle, charging: Charging<'_>) -> Decimal {
    CostBreakdown::new(vehicle, charging).total()
}

/// Per-vehicle costs for every vehicle on `leg`, in vehicle order.
pub fn leg_vehicle_costs(trip: &Trip, leg: Leg) -> Vec<Decimal> {
    trip.vehicles(leg)
        .iter()
        .enumerate()
        .map(|(index, vehicle)| vehicle_leg_cost(vehicle, Charging::for_vehicle(trip, leg, index)))
        .collect()
}

/// Total cost of `leg`.
pub fn leg_cost(trip: &Trip, leg: Leg) -> Decimal {
    leg_vehicle_costs(trip, leg).into_iter().sum()
}
