//! Variant Optimizer
//!
//! Round trips search a small fixed grid of rounding directions and per-leg
//! fee adjustments for the variant that leaves the drivers' final balances
//! closest to zero. One-way trips only choose a rounding direction, by the
//! money their transfers move.

use rust_decimal::Decimal;
use smallvec::{SmallVec, smallvec};

use crate::{
    amounts::Rounding,
    calculation::{Calculation, FeeAdjustment, calculate},
    config::CalculationConfig,
    participants::Roster,
    trip::{Trip, TripKind},
};

/// One point of the search grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variant {
    /// Fee rounding direction
    pub rounding: Rounding,

    /// Per-leg fee offsets
    pub adjustment: FeeAdjustment,
}

/// Adjustment pairs worth trying for `trip`.
///
/// With vehicles on both legs, each leg's fee may move one unit either way
/// (one leg at a time). Otherwise only the unadjusted pair is tried.
pub fn candidate_adjustments(trip: &Trip, unit: Decimal) -> SmallVec<[FeeAdjustment; 5]> {
    if !trip.has_both_legs() {
        return smallvec![FeeAdjustment::NONE];
    }

    smallvec![
        FeeAdjustment::NONE,
        FeeAdjustment::new(unit, Decimal::ZERO),
        FeeAdjustment::new(-unit, Decimal::ZERO),
        FeeAdjustment::new(Decimal::ZERO, unit),
        FeeAdjustment::new(Decimal::ZERO, -unit),
    ]
}

/// Every variant in evaluation order: round up first, then round down.
pub fn variants(trip: &Trip, config: &CalculationConfig) -> SmallVec<[Variant; 10]> {
    let adjustments = candidate_adjustments(trip, config.unit);

    Rounding::ALL
        .into_iter()
        .flat_map(|rounding| {
            adjustments.iter().map(move |adjustment| Variant {
                rounding,
                adjustment: *adjustment,
            })
        })
        .collect()
}

/// Outcome of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimized {
    /// Recommended rounding direction.
    pub recommended: Rounding,

    /// Adjustment used by the recommended result.
    pub adjustment: FeeAdjustment,

    /// Round-up result; unadjusted unless round-up was recommended.
    pub round_up: Calculation,

    /// Round-down result; unadjusted unless round-down was recommended.
    pub round_down: Calculation,
}

impl Optimized {
    /// Result computed with `rounding`.
    pub fn for_rounding(&self, rounding: Rounding) -> &Calculation {
        match rounding {
            Rounding::Up => &self.round_up,
            Rounding::Down => &self.round_down,
        }
    }

    /// The recommended result.
    pub fn recommended(&self) -> &Calculation {
        self.for_rounding(self.recommended)
    }
}

/// Pick a rounding direction, plus fee adjustments on round trips.
///
/// One-way trips round up unless that settlement moves more money between
/// drivers than rounding down. Round trips evaluate every variant and keep
/// the lowest settlement score, first evaluated on ties. The direction not
/// chosen is recomputed without adjustment, for comparison only.
#[tracing::instrument(
    name = "optimizer.optimize",
    skip_all,
    fields(kind = ?trip.kind(), unit = %config.unit)
)]
pub fn optimize(trip: &Trip, roster: &Roster, config: &CalculationConfig) -> Optimized {
    let optimized = match trip.kind() {
        TripKind::OneWay => compare_roundings(trip, roster, config),
        TripKind::RoundTrip => search_variants(trip, roster, config),
    };

    tracing::info!(
        recommended = %optimized.recommended,
        adjustment = %optimized.adjustment,
        score = %optimized.recommended().score(),
        "selected variant"
    );

    optimized
}

fn compare_roundings(trip: &Trip, roster: &Roster, config: &CalculationConfig) -> Optimized {
    let round_up = calculate(trip, roster, Rounding::Up, FeeAdjustment::NONE, config);
    let round_down = calculate(trip, roster, Rounding::Down, FeeAdjustment::NONE, config);

    let up_volume = round_up.settlement.transfer_volume();
    let down_volume = round_down.settlement.transfer_volume();

    tracing::debug!(%up_volume, %down_volume, "compared transfer volumes");

    let recommended = if up_volume <= down_volume {
        Rounding::Up
    } else {
        Rounding::Down
    };

    Optimized {
        recommended,
        adjustment: FeeAdjustment::NONE,
        round_up,
        round_down,
    }
}

fn search_variants(trip: &Trip, roster: &Roster, config: &CalculationConfig) -> Optimized {
    let mut best: Option<Calculation> = None;

    for variant in variants(trip, config) {
        let calculation = calculate(trip, roster, variant.rounding, variant.adjustment, config);

        tracing::debug!(
            rounding = %variant.rounding,
            adjustment = %variant.adjustment,
            score = %calculation.score(),
            "evaluated variant"
        );

        let improves = best
            .as_ref()
            .is_none_or(|current| calculation.score() < current.score());

        if improves {
            best = Some(calculation);
        }
    }

    let best = match best {
        Some(best) => best,
        None => calculate(trip, roster, Rounding::Up, FeeAdjustment::NONE, config),
    };

    let recommended = best.rounding;
    let adjustment = best.adjustment;

    let (round_up, round_down) = match recommended {
        Rounding::Up => {
            let other = calculate(trip, roster, Rounding::Down, FeeAdjustment::NONE, config);
            (best, other)
        }
        Rounding::Down => {
            let other = calculate(trip, roster, Rounding::Up, FeeAdjustment::NONE, config);
            (other, best)
        }
    };

    Optimized {
        recommended,
        adjustment,
        round_up,
        round_down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicles::{CostDetail, Vehicle, VehicleKind};

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn car(driver: &str, passengers: &[&str], gas: i64) -> Vehicle {
        Vehicle::private(VehicleKind::SevenSeater)
            .with_driver(driver)
            .with_passengers(passengers.iter().copied())
            .with_gas(CostDetail::one_way(gas))
    }

    fn round_trip() -> Trip {
        Trip::round_trip(
            vec![
                car("Aiko", &["Ken", "Mio"], 4_150),
                car("Sho", &["Yui", "Rin", "Kai"], 2_980),
            ],
            vec![
                car("Aiko", &["Ken", "Yui"], 3_720),
                car("Sho", &["Mio", "Rin"], 3_110),
            ],
        )
    }

    #[test]
    fn five_adjustment_pairs_when_both_legs_have_vehicles() {
        let pairs = candidate_adjustments(&round_trip(), dec(100));

        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs.first(), Some(&FeeAdjustment::NONE));
        assert_eq!(pairs.get(2), Some(&FeeAdjustment::new(dec(-100), Decimal::ZERO)));
    }

    #[test]
    fn only_unadjusted_pair_for_a_single_leg() {
        let trip = Trip::one_way(vec![car("Aiko", &["Ken"], 1_000)]);

        assert_eq!(
            candidate_adjustments(&trip, dec(100)).as_slice(),
            &[FeeAdjustment::NONE]
        );
        assert_eq!(variants(&trip, &CalculationConfig::default()).len(), 2);
    }

    #[test]
    fn variants_enumerate_round_up_first() {
        let all = variants(&round_trip(), &CalculationConfig::default());

        assert_eq!(all.len(), 10);
        assert!(all.iter().take(5).all(|v| v.rounding == Rounding::Up));
        assert!(all.iter().skip(5).all(|v| v.rounding == Rounding::Down));
    }

    #[test]
    fn never_worse_than_unadjusted_baselines() {
        let trip = round_trip();
        let roster = Roster::new();
        let config = CalculationConfig::default();

        let optimized = optimize(&trip, &roster, &config);

        for rounding in Rounding::ALL {
            let baseline = calculate(&trip, &roster, rounding, FeeAdjustment::NONE, &config);

            assert!(
                optimized.recommended().score() <= baseline.score(),
                "{rounding} baseline beats the recommendation"
            );
        }
    }

    #[test]
    fn non_recommended_direction_is_unadjusted() {
        let optimized = optimize(&round_trip(), &Roster::new(), &CalculationConfig::default());

        let other = match optimized.recommended {
            Rounding::Up => &optimized.round_down,
            Rounding::Down => &optimized.round_up,
        };

        assert!(other.adjustment.is_none());
        assert_eq!(optimized.recommended().adjustment, optimized.adjustment);
    }

    #[test]
    fn ties_prefer_round_up() {
        // Exact fees make both directions identical.
        let trip = Trip::one_way(vec![car("Aiko", &["Ken", "Mio"], 3_000)]);

        let optimized = optimize(&trip, &Roster::new(), &CalculationConfig::default());

        assert_eq!(optimized.recommended, Rounding::Up);
        assert!(optimized.adjustment.is_none());
        assert_eq!(optimized.round_up.score(), optimized.round_down.score());
    }

    #[test]
    fn one_way_prefers_round_up_unless_it_moves_more_money() {
        // Round down leaves the lone driver closer to even (100 short versus
        // 200 ahead), but neither direction needs a transfer.
        let trip = Trip::one_way(vec![car("Aiko", &["Ken", "Mio", "Sho"], 1_000)]);

        let optimized = optimize(&trip, &Roster::new(), &CalculationConfig::default());

        assert_eq!(optimized.round_up.score(), dec(200));
        assert_eq!(optimized.round_down.score(), dec(100));
        assert_eq!(optimized.round_up.settlement.transfer_volume(), Decimal::ZERO);
        assert_eq!(optimized.round_down.settlement.transfer_volume(), Decimal::ZERO);
        assert_eq!(optimized.recommended, Rounding::Up);
        assert!(optimized.adjustment.is_none());
    }

    #[test]
    fn optimizing_is_deterministic() {
        let trip = round_trip();
        let config = CalculationConfig::default();

        assert_eq!(
            optimize(&trip, &Roster::new(), &config),
            optimize(&trip, &Roster::new(), &config)
        );
    }
}
