//! Calculation
//!
//! One full run of the pipeline for a fixed rounding direction and fee
//! adjustment: leg costs, payer counts, fees, per-vehicle collections and the
//! driver settlement.

use std::fmt;

use rust_decimal::Decimal;

use crate::{
    amounts::Rounding,
    config::CalculationConfig,
    costs::leg_vehicle_costs,
    fees::{VehicleCollection, collect_leg, fee_per_person},
    participants::{ParticipantKey, Roster},
    participation::Participation,
    settlement::{Settlement, settle},
    trip::{Leg, Trip, TripKind},
    vehicles::Vehicle,
};

/// Signed per-leg offsets added to the rounded fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeAdjustment {
    /// Added to the outbound fee.
    pub outbound: Decimal,

    /// Added to the return fee.
    pub returning: Decimal,
}

impl FeeAdjustment {
    /// No adjustment on either leg.
    pub const NONE: FeeAdjustment = FeeAdjustment {
        outbound: Decimal::ZERO,
        returning: Decimal::ZERO,
    };

    /// Create a new adjustment pair.
    pub fn new(outbound: Decimal, returning: Decimal) -> Self {
        Self {
            outbound,
            returning,
        }
    }

    /// Adjustment for `leg`.
    pub fn for_leg(&self, leg: Leg) -> Decimal {
        match leg {
            Leg::Outbound => self.outbound,
            Leg::Return => self.returning,
        }
    }

    /// Check whether both offsets are zero.
    pub fn is_none(&self) -> bool {
        self.outbound.is_zero() && self.returning.is_zero()
    }
}

impl fmt::Display for FeeAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outbound {:+}, return {:+}", self.outbound, self.returning)
    }
}

/// Figures for one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegSummary {
    /// Which leg
    pub leg: Leg,

    /// Sum of actual vehicle costs.
    pub cost: Decimal,

    /// Distinct non-driving occupants.
    pub payer_count: usize,

    /// Per-person fee after rounding and adjustment.
    pub fee: Decimal,

    /// One collection per vehicle, in vehicle order.
    pub collections: Vec<VehicleCollection>,
}

impl LegSummary {
    fn new(
        trip: &Trip,
        leg: Leg,
        rounding: Rounding,
        adjustment: Decimal,
        config: &CalculationConfig,
    ) -> (Self, Participation) {
        let vehicles = trip.vehicles(leg);
        let costs = leg_vehicle_costs(trip, leg);
        let cost: Decimal = costs.iter().copied().sum();

        let participation = Participation::classify(vehicles);
        let payer_count = participation.payer_count();
        let fee = fee_per_person(cost, payer_count, rounding, adjustment, config);

        let summary = Self {
            leg,
            cost,
            payer_count,
            fee,
            collections: collect_leg(leg, vehicles, &costs, fee),
        };

        (summary, participation)
    }

    /// Total collected on this leg.
    pub fn collected(&self) -> Decimal {
        self.collections
            .iter()
            .map(|collection| collection.collected)
            .sum()
    }
}

/// What one person owes, and to whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantCost {
    /// Roster entry with this name, if any.
    pub participant: Option<ParticipantKey>,

    /// Occupant name
    pub name: String,

    /// Drove on either leg; drivers owe nothing.
    pub is_driver: bool,

    /// Fee owed for the outbound leg.
    pub outbound: Decimal,

    /// Fee owed for the return leg.
    pub returning: Decimal,

    /// Driver paid on the outbound leg.
    pub outbound_driver: Option<String>,

    /// Driver paid on the return leg.
    pub return_driver: Option<String>,
}

impl ParticipantCost {
    /// Fees owed across both legs.
    pub fn total(&self) -> Decimal {
        self.outbound + self.returning
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    /// How the trip was costed.
    pub kind: TripKind,

    /// Rounding direction used for fees.
    pub rounding: Rounding,

    /// Fee offsets applied after rounding.
    pub adjustment: FeeAdjustment,

    /// Outbound (or only) leg.
    pub outbound: LegSummary,

    /// Return leg; empty for one-way trips.
    pub returning: LegSummary,

    /// Distinct non-driving occupants across both legs.
    pub all_participants: usize,

    /// Per-person breakdown, in first-seen order.
    pub participant_costs: Vec<ParticipantCost>,

    /// Driver transfers and final balances.
    pub settlement: Settlement,
}

impl Calculation {
    /// Summary for `leg`.
    pub fn leg(&self, leg: Leg) -> &LegSummary {
        match leg {
            Leg::Outbound => &self.outbound,
            Leg::Return => &self.returning,
        }
    }

    /// Actual cost of the whole trip.
    pub fn total_cost(&self) -> Decimal {
        self.outbound.cost + self.returning.cost
    }

    /// Everything collected from passengers.
    pub fn total_collected(&self) -> Decimal {
        self.outbound.collected() + self.returning.collected()
    }

    /// Collected minus cost; negative when drivers are left out of pocket.
    pub fn driver_shortfall(&self) -> Decimal {
        self.total_collected() - self.total_cost()
    }

    /// Settlement volume used to compare variants.
    pub fn score(&self) -> Decimal {
        self.settlement.score()
    }

    /// Collections from both legs, outbound first.
    pub fn collections(&self) -> impl Iterator<Item = &VehicleCollection> {
        self.outbound
            .collections
            .iter()
            .chain(self.returning.collections.iter())
    }
}

/// Run the pipeline once.
#[tracing::instrument(
    name = "calculation.calculate",
    skip_all,
    fields(kind = ?trip.kind(), %rounding, %adjustment)
)]
pub fn calculate(
    trip: &Trip,
    roster: &Roster,
    rounding: Rounding,
    adjustment: FeeAdjustment,
    config: &CalculationConfig,
) -> Calculation {
    let (outbound, outbound_participation) = LegSummary::new(
        trip,
        Leg::Outbound,
        rounding,
        adjustment.outbound,
        config,
    );

    let (returning, return_participation) = LegSummary::new(
        trip,
        Leg::Return,
        rounding,
        adjustment.returning,
        config,
    );

    let everyone = outbound_participation.union(&return_participation);

    let participant_costs = everyone
        .occupants()
        .iter()
        .map(|name| {
            let is_driver = everyone.is_driver(name);
            let owes = |participation: &Participation, fee: Decimal| {
                if !is_driver && participation.is_occupant(name) {
                    fee
                } else {
                    Decimal::ZERO
                }
            };

            ParticipantCost {
                participant: roster.find_by_name(name),
                name: name.to_string(),
                is_driver,
                outbound: owes(&outbound_participation, outbound.fee),
                returning: owes(&return_participation, returning.fee),
                outbound_driver: driver_seating(trip.outbound(), name),
                return_driver: driver_seating(trip.returning(), name),
            }
        })
        .collect();

    let collections: Vec<VehicleCollection> = outbound
        .collections
        .iter()
        .chain(returning.collections.iter())
        .cloned()
        .collect();

    let settlement = settle(&collections, config);

    tracing::debug!(
        outbound_fee = %outbound.fee,
        return_fee = %returning.fee,
        score = %settlement.score(),
        "calculated"
    );

    Calculation {
        kind: trip.kind(),
        rounding,
        adjustment,
        all_participants: everyone.payer_count(),
        outbound,
        returning,
        participant_costs,
        settlement,
    }
}

/// Driver of the first vehicle that seats `name` and has a driver.
fn driver_seating(vehicles: &[Vehicle], name: &str) -> Option<String> {
    vehicles
        .iter()
        .filter(|vehicle| vehicle.seats_name(name))
        .find_map(|vehicle| vehicle.driver().map(|driver| driver.name.clone()))
}
