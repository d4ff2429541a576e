// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon footprint calculation.
//!
//! `value = round_half_up(factor * amount, 2)` in kgCO2e. Unknown
//! type/category pairs are errors; the calculator never falls back to a
//! zero footprint.

use std::sync::Arc;

use crate::models::footprint::decimal_from_f64;
use crate::models::{ActivityType, CarbonFootprint};
use crate::services::factors::{EmissionFactor, EmissionFactorTable, FactorLookupError};

/// Pure footprint calculator over an injected factor table.
#[derive(Debug, Clone)]
pub struct FootprintCalculator {
    table: Arc<EmissionFactorTable>,
}

/// Footprint together with the factor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub activity_type: ActivityType,
    pub factor: EmissionFactor,
    pub footprint: CarbonFootprint,
}

impl FootprintCalculator {
    pub fn new(table: Arc<EmissionFactorTable>) -> Self {
        Self { table }
    }

    /// The factor table this calculator reads from.
    pub fn table(&self) -> &EmissionFactorTable {
        &self.table
    }

    /// Compute the footprint of `amount` units of `activity_type`/`category`.
    pub fn calculate(
        &self,
        activity_type: &str,
        category: &str,
        amount: f64,
    ) -> Result<CarbonFootprint, CalculationError> {
        self.estimate(activity_type, category, amount)
            .map(|estimate| estimate.footprint)
    }

    /// Compute the footprint and report the factor used.
    pub fn estimate(
        &self,
        activity_type: &str,
        category: &str,
        amount: f64,
    ) -> Result<Estimate, CalculationError> {
        let invalid = |reason: String| CalculationError::InvalidCategory {
            activity_type: activity_type.to_string(),
            category: category.to_string(),
            reason,
        };

        let parsed_type: ActivityType = activity_type
            .parse()
            .map_err(|e: crate::models::activity::UnknownActivityType| invalid(e.to_string()))?;

        let factor = self
            .table
            .lookup(parsed_type, category)
            .map_err(|e: FactorLookupError| invalid(e.to_string()))?;

        let quantity = decimal_from_f64(amount).ok_or_else(|| {
            if amount.is_finite() {
                CalculationError::InvalidAmount(format!("{} is out of range", amount))
            } else {
                CalculationError::InvalidAmount(format!("{} is not a finite number", amount))
            }
        })?;

        let value = factor.factor.checked_mul(quantity).ok_or_else(|| {
            CalculationError::InvalidAmount(format!("{} is too large", amount))
        })?;

        Ok(Estimate {
            activity_type: parsed_type,
            factor: factor.clone(),
            footprint: CarbonFootprint::kg_co2e(value),
        })
    }
}

/// Input validation failures. None of these are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("Invalid activity type or category: {activity_type}, {category} ({reason})")]
    InvalidCategory {
        activity_type: String,
        category: String,
        reason: String,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
