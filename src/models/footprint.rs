// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint value objects shared by the calculator and the aggregator.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Normalized unit for every footprint value.
pub const KG_CO2E: &str = "kgCO2e";

/// Number of decimal places kept on stored and displayed footprints.
pub const FOOTPRINT_SCALE: u32 = 2;

/// Convert a finite float to its shortest decimal form.
///
/// Returns `None` for NaN, infinities and magnitudes beyond `Decimal::MAX`.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Round half-up (away from zero on ties) to two decimal places.
pub fn round_footprint(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(FOOTPRINT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Estimated CO2e mass of one or more activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CarbonFootprint {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub value: Decimal,
    pub unit: String,
}

impl CarbonFootprint {
    /// Build a footprint, rounding the value to two decimals.
    pub fn kg_co2e(value: Decimal) -> Self {
        Self {
            value: round_footprint(value),
            unit: KG_CO2E.to_string(),
        }
    }

    pub fn zero() -> Self {
        Self::kg_co2e(Decimal::ZERO)
    }
}

/// Quantity of an activity in the unit implied by its category.
///
/// The unit label is descriptive; no conversion happens anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Amount {
    pub value: f64,
    #[validate(length(min = 1, max = 16))]
    pub unit: String,
}
