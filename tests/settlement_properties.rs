//! Properties of the full pipeline checked over a spread of generated trips.

use carpool::prelude::*;
use rust_decimal::Decimal;

const NAMES: [&str; 8] = ["Aiko", "Ken", "Mio", "Sho", "Yui", "Rin", "Kai", "Emi"];

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

/// A small deterministic family of trips with uneven costs and seatings.
fn trips() -> Vec<Trip> {
    let mut trips = Vec::new();

    for seed in 0..12_i64 {
        let car = |offset: usize, riders: usize, gas: i64, scope_round_trip: bool| {
            let names = NAMES.iter().cycle().skip(offset);
            let mut seated = names.take(riders + 1);

            let gas = if scope_round_trip {
                CostDetail::round_trip(gas)
            } else {
                CostDetail::one_way(gas)
            };

            let mut vehicle = Vehicle::private(VehicleKind::SevenSeater).with_gas(gas);

            if let Some(driver) = seated.next() {
                vehicle = vehicle.with_driver(*driver);
            }

            vehicle.with_passengers(seated.copied())
        };

        let outbound = vec![
            car(0, 2, 3_170 + seed * 137, seed % 3 == 0),
            car(3, 3, 2_040 + seed * 91, false),
        ];

        let returning = vec![
            car(0, 3, 2_890 + seed * 53, false),
            car(4, 1, 1_450 + seed * 211, seed % 2 == 0),
        ];

        if seed % 4 == 0 {
            trips.push(Trip::one_way(outbound));
        } else {
            trips.push(Trip::round_trip(outbound, returning));
        }
    }

    trips.push(Trip::round_trip(
        vec![Vehicle::rental(VehicleKind::Hiace, 18_000)
            .with_driver("Aiko")
            .with_passengers(["Ken", "Mio", "Sho", "Yui"])],
        vec![Vehicle::rental(VehicleKind::Hiace, 18_000)
            .with_driver("Sho")
            .with_passengers(["Ken", "Mio", "Aiko"])],
    ));

    trips
}

#[test]
fn final_balances_conserve_net_collections() {
    let config = CalculationConfig::default();

    for trip in trips() {
        for rounding in Rounding::ALL {
            let calculation = calculate(&trip, &Roster::new(), rounding, FeeAdjustment::NONE, &config);
            let total: Decimal = calculation
                .settlement
                .balances
                .iter()
                .map(DriverBalance::balance)
                .sum();

            assert_eq!(
                total,
                calculation.driver_shortfall(),
                "balances drifted for {trip:?}"
            );
        }
    }
}

#[test]
fn transfers_are_positive_unit_multiples() {
    let config = CalculationConfig::default();

    for trip in trips() {
        let optimized = optimize(&trip, &Roster::new(), &config);

        for rounding in Rounding::ALL {
            for transfer in &optimized.for_rounding(rounding).settlement.transfers {
                assert!(transfer.amount > Decimal::ZERO, "empty transfer {transfer}");
                assert!(
                    (transfer.amount % config.unit).is_zero(),
                    "transfer not a unit multiple: {transfer}"
                );
            }
        }
    }
}

#[test]
fn optimizer_never_loses_to_unadjusted_rounding() {
    let config = CalculationConfig::default();
    let roster = Roster::new();

    for trip in trips()
        .into_iter()
        .filter(|trip| trip.kind() == TripKind::RoundTrip)
    {
        let optimized = optimize(&trip, &roster, &config);

        for rounding in Rounding::ALL {
            let baseline = calculate(&trip, &roster, rounding, FeeAdjustment::NONE, &config);

            assert!(
                optimized.recommended().score() <= baseline.score(),
                "{rounding} baseline scored lower for {trip:?}"
            );
        }
    }
}

#[test]
fn one_way_recommendation_moves_least_money() {
    let config = CalculationConfig::default();
    let roster = Roster::new();

    for trip in trips()
        .into_iter()
        .filter(|trip| trip.kind() == TripKind::OneWay)
    {
        let optimized = optimize(&trip, &roster, &config);
        let up = optimized.round_up.settlement.transfer_volume();
        let down = optimized.round_down.settlement.transfer_volume();

        let expected = if up <= down { Rounding::Up } else { Rounding::Down };

        assert_eq!(optimized.recommended, expected, "wrong direction for {trip:?}");
        assert!(optimized.adjustment.is_none());
    }
}

#[test]
fn leg_costs_add_up_per_vehicle() {
    for trip in trips() {
        for leg in [Leg::Outbound, Leg::Return] {
            let per_vehicle: Decimal = (0..trip.vehicles(leg).len())
                .filter_map(|index| {
                    let vehicle = trip.vehicles(leg).get(index)?;
                    let charging = carpool::costs::Charging::for_vehicle(&trip, leg, index);

                    Some(vehicle_leg_cost(vehicle, charging))
                })
                .sum();

            assert_eq!(per_vehicle, leg_cost(&trip, leg), "{leg} cost not additive");
        }
    }
}

#[test]
fn round_up_fee_never_below_round_down() {
    let config = CalculationConfig::default();

    for cost in (0..20_000).step_by(733) {
        for payers in 1..9 {
            let up = fee_per_person(dec(cost), payers, Rounding::Up, Decimal::ZERO, &config);
            let down = fee_per_person(dec(cost), payers, Rounding::Down, Decimal::ZERO, &config);

            assert!(up >= down, "{cost} / {payers}: {up} < {down}");

            let raw = dec(cost) / Decimal::from(payers);

            if (raw % config.unit).is_zero() {
                assert_eq!(up, raw, "exact fee changed by rounding up");
                assert_eq!(down, raw, "exact fee changed by rounding down");
            }
        }
    }
}

#[test]
fn pipeline_is_a_pure_function() {
    let config = CalculationConfig::default();

    for trip in trips() {
        let first = optimize(&trip, &Roster::new(), &config);
        let second = optimize(&trip.clone(), &Roster::new(), &config);

        assert_eq!(first, second);
    }
}
