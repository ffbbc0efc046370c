//! Settlement
//!
//! Turns per-vehicle collections into transfers between drivers, in two
//! passes over the same greedy netting primitive:
//!
//! 1. Reconciliation: each driver's summed `actual_cost − collected` is netted
//!    so drivers who collected too much pay those who collected too little.
//! 2. Equalisation: the total balance is split into per-driver targets (a
//!    floored multiple of the unit, with the remainder handed out one unit at a
//!    time in driver order) and every driver is netted towards their target.
//!
//! The second pass always runs; it absorbs the drift left by rounding fees and
//! transfers to the unit.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{amounts::round_down_to, config::CalculationConfig, fees::VehicleCollection};

pub mod ledger;
pub mod netting;

pub use ledger::{DriverBalance, DriverLedger};
pub use netting::{Position, SettlementPass, Transfer, net_greedy};

/// Outcome of settling a set of collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Transfers from both passes, reconciliation first.
    pub transfers: Vec<Transfer>,

    /// Per-driver balances after both passes, in first-seen order.
    pub balances: Vec<DriverBalance>,
}

impl Settlement {
    /// Settlement volume: `Σ |final balance|` over all drivers.
    pub fn score(&self) -> Decimal {
        self.balances
            .iter()
            .map(|balance| balance.balance().abs())
            .sum()
    }

    /// Sum of all transfer amounts.
    pub fn transfer_volume(&self) -> Decimal {
        self.transfers.iter().map(|transfer| transfer.amount).sum()
    }

    /// Transfers produced by one pass.
    pub fn transfers_in(&self, pass: SettlementPass) -> impl Iterator<Item = &Transfer> {
        self.transfers
            .iter()
            .filter(move |transfer| transfer.pass == pass)
    }
}

/// Settle `collections` between their drivers.
pub fn settle(collections: &[VehicleCollection], config: &CalculationConfig) -> Settlement {
    let mut ledger = DriverLedger::from_collections(collections);
    let mut transfers = Vec::new();

    for pass in [SettlementPass::Reconciliation, SettlementPass::Equalization] {
        let (deficits, surpluses) = match pass {
            SettlementPass::Reconciliation => reconciliation_positions(&ledger),
            SettlementPass::Equalization => equalization_positions(&ledger, config.unit),
        };

        let pass_transfers = net_greedy(&deficits, &surpluses, config.unit, pass);

        tracing::debug!(
            ?pass,
            deficits = deficits.len(),
            surpluses = surpluses.len(),
            transfers = pass_transfers.len(),
            "settlement pass"
        );

        for transfer in pass_transfers {
            ledger.apply(&transfer);
            transfers.push(transfer);
        }
    }

    Settlement {
        transfers,
        balances: ledger.into_balances(),
    }
}

/// Split signed per-driver amounts into (deficits, surpluses), keeping driver order.
///
/// Positive amounts are deficits (owed money), negative amounts surpluses.
fn split_positions<'a>(
    amounts: impl Iterator<Item = (&'a str, Decimal)>,
) -> (Vec<Position>, Vec<Position>) {
    let mut deficits = Vec::new();
    let mut surpluses = Vec::new();

    for (name, amount) in amounts {
        if amount > Decimal::ZERO {
            deficits.push(Position::new(name, amount));
        } else if amount < Decimal::ZERO {
            surpluses.push(Position::new(name, amount.abs()));
        }
    }

    (deficits, surpluses)
}

fn reconciliation_positions(ledger: &DriverLedger) -> (Vec<Position>, Vec<Position>) {
    split_positions(
        ledger
            .balances()
            .iter()
            .map(|balance| (balance.name.as_str(), balance.vehicle_cost() - balance.collected)),
    )
}

fn equalization_positions(ledger: &DriverLedger, unit: Decimal) -> (Vec<Position>, Vec<Position>) {
    let targets = balance_targets(ledger, unit);

    split_positions(
        ledger
            .balances()
            .iter()
            .zip(targets)
            .map(|(balance, target)| (balance.name.as_str(), target - balance.balance())),
    )
}

/// Per-driver target balances summing to the current total.
///
/// Everyone gets the floored average; the first `round(remainder / unit)`
/// drivers get one extra unit.
fn balance_targets(ledger: &DriverLedger, unit: Decimal) -> Vec<Decimal> {
    if ledger.is_empty() {
        return Vec::new();
    }

    let total: Decimal = ledger.balances().iter().map(DriverBalance::balance).sum();
    let count = Decimal::from(ledger.len());

    let base = round_down_to(total / count, unit);
    let remainder = total - base * count;

    let extra = if unit.is_zero() {
        0
    } else {
        (remainder / unit)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_usize()
            .unwrap_or(0)
    };

    tracing::trace!(%total, %base, extra, "balance targets");

    (0..ledger.len())
        .map(|index| if index < extra { base + unit } else { base })
        .collect()
}
