//! Greedy Netting

use std::fmt;

use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::amounts::round_to_nearest;

/// Which settlement pass produced a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementPass {
    /// Per-vehicle reconciliation of actual cost against collections.
    Reconciliation,

    /// Equalisation of every driver's balance around a common target.
    Equalization,
}

/// Money handed from one driver to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Paying driver
    pub from: String,

    /// Receiving driver
    pub to: String,

    /// Amount, always a positive multiple of the unit.
    pub amount: Decimal,

    /// Pass that produced the transfer.
    pub pass: SettlementPass,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} to {}", self.from, self.amount, self.to)
    }
}

/// A party's outstanding need or surplus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Driver name
    pub name: String,

    /// Positive outstanding amount
    pub amount: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// Match `surpluses` (who owe money) against `deficits` (who are owed money).
///
/// Both lists are walked in the order given, never sorted. Each step moves
/// `min(deficit, surplus)`, rounded to the nearest `unit` for the recorded
/// transfer; the unrounded amount is what is consumed from each side. Steps
/// that round to zero are not recorded.
pub fn net_greedy(
    deficits: &[Position],
    surpluses: &[Position],
    unit: Decimal,
    pass: SettlementPass,
) -> SmallVec<[Transfer; 8]> {
    let mut owed: SmallVec<[Position; 8]> = deficits.iter().cloned().collect();
    let mut owing: SmallVec<[Position; 8]> = surpluses.iter().cloned().collect();
    let mut transfers = SmallVec::new();

    let (mut giver_idx, mut receiver_idx) = (0, 0);

    while let (Some(giver), Some(receiver)) =
        (owing.get_mut(giver_idx), owed.get_mut(receiver_idx))
    {
        let step = giver.amount.min(receiver.amount);
        let rounded = round_to_nearest(step, unit);

        if rounded > Decimal::ZERO {
            tracing::trace!(from = %giver.name, to = %receiver.name, %rounded, ?pass, "transfer");

            transfers.push(Transfer {
                from: giver.name.clone(),
                to: receiver.name.clone(),
                amount: rounded,
                pass,
            });
        }

        giver.amount -= step;
        receiver.amount -= step;

        if giver.amount.is_zero() {
            giver_idx += 1;
        }

        if receiver.amount.is_zero() {
            receiver_idx += 1;
        }
    }

    transfers
}
