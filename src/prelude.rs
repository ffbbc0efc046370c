//! Carpool prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    amounts::Rounding,
    calculation::{Calculation, FeeAdjustment, LegSummary, ParticipantCost, calculate},
    config::CalculationConfig,
    costs::{CostBreakdown, leg_cost, vehicle_leg_cost},
    fees::{VehicleCollection, fee_per_person},
    fixtures::{FixtureError, TripFixture},
    optimizer::{Optimized, optimize},
    participants::{Participant, ParticipantKey, Roster},
    participation::Participation,
    report::{Report, ReportError},
    settlement::{DriverBalance, Settlement, SettlementPass, Transfer, settle},
    trip::{Leg, Trip, TripKind},
    vehicles::{CostDetail, CostScope, Occupant, SeatKey, Vehicle, VehicleCategory, VehicleKind},
};
