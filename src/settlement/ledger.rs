//! Driver Ledger

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{fees::VehicleCollection, settlement::netting::Transfer, trip::Leg};

/// Running totals for one driver across every vehicle they drove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverBalance {
    /// Driver name
    pub name: String,

    /// Actual cost of vehicles driven on the outbound (or only) leg.
    pub outbound_cost: Decimal,

    /// Actual cost of vehicles driven on the return leg.
    pub return_cost: Decimal,

    /// Fees collected from passengers.
    pub collected: Decimal,

    /// Net effect of settlement transfers: received minus paid.
    pub adjustments: Decimal,
}

impl DriverBalance {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outbound_cost: Decimal::ZERO,
            return_cost: Decimal::ZERO,
            collected: Decimal::ZERO,
            adjustments: Decimal::ZERO,
        }
    }

    /// Total actual cost across both legs.
    pub fn vehicle_cost(&self) -> Decimal {
        self.outbound_cost + self.return_cost
    }

    /// `collected − vehicle_cost + adjustments`
    pub fn balance(&self) -> Decimal {
        self.collected - self.vehicle_cost() + self.adjustments
    }
}

/// Driver balances in the order drivers were first seen.
///
/// Netting walks drivers in this order, so it must never be re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverLedger {
    balances: Vec<DriverBalance>,
    index: FxHashMap<String, usize>,
}

impl DriverLedger {
    /// Accumulate costs and collections per driver, scanning `collections` in order.
    pub fn from_collections<'a>(collections: impl IntoIterator<Item = &'a VehicleCollection>) -> Self {
        let mut ledger = DriverLedger::default();

        for collection in collections {
            let Some(entry) = ledger.entry(&collection.driver_name) else {
                continue;
            };

            match collection.leg {
                Leg::Outbound => entry.outbound_cost += collection.actual_cost,
                Leg::Return => entry.return_cost += collection.actual_cost,
            }

            entry.collected += collection.collected;
        }

        ledger
    }

    fn entry(&mut self, name: &str) -> Option<&mut DriverBalance> {
        let position = match self.index.get(name) {
            Some(position) => *position,
            None => {
                self.balances.push(DriverBalance::new(name));
                let position = self.balances.len() - 1;
                self.index.insert(name.to_string(), position);
                position
            }
        };

        self.balances.get_mut(position)
    }

    /// Record a transfer: the payer's adjustments drop, the receiver's rise.
    ///
    /// Names not in the ledger are ignored.
    pub fn apply(&mut self, transfer: &Transfer) {
        if let Some(giver) = self.get_mut(&transfer.from) {
            giver.adjustments -= transfer.amount;
        }

        if let Some(receiver) = self.get_mut(&transfer.to) {
            receiver.adjustments += transfer.amount;
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut DriverBalance> {
        let position = *self.index.get(name)?;

        self.balances.get_mut(position)
    }

    /// Lookup a driver's balance.
    pub fn get(&self, name: &str) -> Option<&DriverBalance> {
        let position = *self.index.get(name)?;

        self.balances.get(position)
    }

    /// Balances in first-seen order.
    pub fn balances(&self) -> &[DriverBalance] {
        &self.balances
    }

    /// Number of drivers
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Check if there are no drivers.
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Consume the ledger, keeping the ordered balances.
    pub fn into_balances(self) -> Vec<DriverBalance> {
        self.balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settlement::netting::SettlementPass;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn collection(leg: Leg, driver: &str, cost: i64, collected: i64) -> VehicleCollection {
        VehicleCollection {
            leg,
            vehicle: 0,
            driver_name: driver.to_string(),
            passenger_count: 1,
            fee: dec(collected),
            collected: dec(collected),
            actual_cost: dec(cost),
        }
    }

    #[test]
    fn accumulates_per_driver_across_legs_in_first_seen_order() {
        let collections = [
            collection(Leg::Outbound, "Sho", 3_000, 2_000),
            collection(Leg::Outbound, "Aiko", 1_000, 2_000),
            collection(Leg::Return, "Aiko", 4_000, 1_500),
            collection(Leg::Return, "Mio", 500, 1_500),
        ];

        let ledger = DriverLedger::from_collections(&collections);
        let names: Vec<&str> = ledger.balances().iter().map(|b| b.name.as_str()).collect();

        assert_eq!(names, ["Sho", "Aiko", "Mio"]);

        let aiko = ledger.get("Aiko");
        assert_eq!(aiko.map(DriverBalance::vehicle_cost), Some(dec(5_000)));
        assert_eq!(aiko.map(|b| b.collected), Some(dec(3_500)));
        assert_eq!(aiko.map(DriverBalance::balance), Some(dec(-1_500)));
    }

    #[test]
    fn two_vehicles_on_one_leg_accumulate() {
        let collections = [
            collection(Leg::Outbound, "Aiko", 1_000, 0),
            collection(Leg::Outbound, "Aiko", 2_000, 0),
        ];

        let ledger = DriverLedger::from_collections(&collections);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("Aiko").map(|b| b.outbound_cost), Some(dec(3_000)));
    }

    #[test]
    fn apply_moves_adjustments_between_drivers() {
        let collections = [
            collection(Leg::Outbound, "A", 1_000, 1_500),
            collection(Leg::Outbound, "B", 2_000, 1_500),
        ];

        let mut ledger = DriverLedger::from_collections(&collections);

        ledger.apply(&Transfer {
            from: "A".to_string(),
            to: "B".to_string(),
            amount: dec(500),
            pass: SettlementPass::Reconciliation,
        });

        assert_eq!(ledger.get("A").map(DriverBalance::balance), Some(Decimal::ZERO));
        assert_eq!(ledger.get("B").map(DriverBalance::balance), Some(Decimal::ZERO));
    }

    #[test]
    fn apply_ignores_unknown_names() {
        let mut ledger = DriverLedger::from_collections(&[collection(Leg::Outbound, "A", 0, 0)]);

        ledger.apply(&Transfer {
            from: "Ghost".to_string(),
            to: "A".to_string(),
            amount: dec(100),
            pass: SettlementPass::Equalization,
        });

        assert_eq!(ledger.get("A").map(|b| b.adjustments), Some(dec(100)));
        assert!(ledger.get("Ghost").is_none());
    }
}
