//! Calculation Config

use rust_decimal::Decimal;

/// Default denomination unit: fees and transfers are settled in multiples of 100.
pub const DEFAULT_UNIT: Decimal = Decimal::ONE_HUNDRED;

/// Settings shared by every stage of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationConfig {
    /// Clean denomination for per-person fees, transfers and balance targets.
    ///
    /// The optimizer perturbs per-leg fees by one unit in either direction.
    pub unit: Decimal,
}

impl CalculationConfig {
    /// Create a config with the given denomination unit.
    pub fn with_unit(unit: Decimal) -> Self {
        Self { unit }
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT }
    }
}
