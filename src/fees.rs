//! Fees

use rust_decimal::Decimal;

use crate::{amounts::Rounding, config::CalculationConfig, trip::Leg, vehicles::Vehicle};

/// Driver name used for vehicles with an empty driver's seat.
pub const UNSET_DRIVER: &str = "unset";

/// Per-person fee for a leg.
///
/// The raw fee `total_cost / payer_count` is rounded to a multiple of the
/// configured unit in the given direction, then `adjustment` is added. A leg
/// with no payers has a raw fee of zero, so its fee is the adjustment alone.
pub fn fee_per_person(
    total_cost: Decimal,
    payer_count: usize,
    rounding: Rounding,
    adjustment: Decimal,
    config: &CalculationConfig,
) -> Decimal {
    let raw = if payer_count == 0 {
        Decimal::ZERO
    } else {
        total_cost / Decimal::from(payer_count)
    };

    rounding.apply(raw, config.unit) + adjustment
}

/// Money a vehicle's driver gathers on one leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleCollection {
    /// Leg the vehicle travelled on.
    pub leg: Leg,

    /// Position of the vehicle within its leg.
    pub vehicle: usize,

    /// Driver's name, or [`UNSET_DRIVER`].
    pub driver_name: String,

    /// Non-driving occupants of this vehicle.
    pub passenger_count: usize,

    /// Fee charged to each passenger.
    pub fee: Decimal,

    /// `passenger_count × fee`
    pub collected: Decimal,

    /// Actual cost charged to this vehicle on this leg.
    pub actual_cost: Decimal,
}

impl VehicleCollection {
    /// Collect `fee` from every passenger of `vehicle`.
    pub fn new(
        leg: Leg,
        index: usize,
        vehicle: &Vehicle,
        fee: Decimal,
        actual_cost: Decimal,
    ) -> Self {
        let passenger_count = vehicle.passenger_count();

        Self {
            leg,
            vehicle: index,
            driver_name: vehicle
                .driver()
                .map_or_else(|| UNSET_DRIVER.to_string(), |driver| driver.name.clone()),
            passenger_count,
            fee,
            collected: Decimal::from(passenger_count) * fee,
            actual_cost,
        }
    }

    /// Amount the driver is still owed: `actual_cost − collected`.
    ///
    /// Negative when the driver collected more than the vehicle cost.
    pub fn difference(&self) -> Decimal {
        self.actual_cost - self.collected
    }
}

/// Collections for every vehicle on a leg, in vehicle order.
///
/// `actual_costs` holds one cost per vehicle; missing entries count as zero.
pub fn collect_leg(
    leg: Leg,
    vehicles: &[Vehicle],
    actual_costs: &[Decimal],
    fee: Decimal,
) -> Vec<VehicleCollection> {
    vehicles
        .iter()
        .enumerate()
        .map(|(index, vehicle)| {
            let actual_cost = actual_costs.get(index).copied().unwrap_or_default();

            VehicleCollection::new(leg, index, vehicle, fee, actual_cost)
        })
        .collect()
}
