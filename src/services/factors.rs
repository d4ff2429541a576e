// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Emission factor table loading and lookup.
//!
//! The table maps an activity type and a category to a factor in kgCO2e per
//! unit of activity amount. It is validated once when loaded and never
//! mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::footprint::decimal_from_f64;
use crate::models::ActivityType;

/// Factors shipped with the service.
const BUILTIN_FACTORS: &str = include_str!("../../data/emission_factors.json");

/// A single emission factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EmissionFactor {
    /// kgCO2e per unit (negative for offsets such as recycling)
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub factor: Decimal,
    /// Unit the amount is expected in (e.g. "km", "kWh", "kg")
    pub unit: String,
}

/// Factor entry as written in the JSON file.
#[derive(Deserialize)]
struct RawFactor {
    factor: f64,
    unit: String,
}

type RawTable = BTreeMap<String, BTreeMap<String, RawFactor>>;

/// Immutable two-level factor table.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct EmissionFactorTable {
    factors: BTreeMap<ActivityType, BTreeMap<String, EmissionFactor>>,
}

impl EmissionFactorTable {
    /// Load the built-in factor table.
    pub fn builtin() -> Result<Self, FactorTableError> {
        Self::load_from_json(BUILTIN_FACTORS)
    }

    /// Load a factor table from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, FactorTableError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| FactorTableError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a factor table from a JSON string of the form
    /// `{ "<type>": { "<category>": { "factor": <number>, "unit": "<unit>" } } }`.
    pub fn load_from_json(json_data: &str) -> Result<Self, FactorTableError> {
        let raw: RawTable = serde_json::from_str(json_data)
            .map_err(|e| FactorTableError::ParseError(e.to_string()))?;

        let mut factors = BTreeMap::new();

        for (type_name, categories) in raw {
            let activity_type: ActivityType = type_name
                .parse()
                .map_err(|_| FactorTableError::UnknownType(type_name.clone()))?;

            if categories.is_empty() {
                return Err(FactorTableError::EmptyType(activity_type));
            }

            let mut entries = BTreeMap::new();
            for (category, raw_factor) in categories {
                if category.trim().is_empty() {
                    return Err(FactorTableError::EmptyCategory(activity_type));
                }
                if raw_factor.unit.trim().is_empty() {
                    return Err(FactorTableError::MissingUnit {
                        activity_type,
                        category,
                    });
                }
                let factor = decimal_from_f64(raw_factor.factor).ok_or_else(|| {
                    FactorTableError::InvalidFactor {
                        activity_type,
                        category: category.clone(),
                    }
                })?;

                entries.insert(
                    category,
                    EmissionFactor {
                        factor,
                        unit: raw_factor.unit,
                    },
                );
            }

            // "transport" and "transportation" in one file would collide.
            if factors.insert(activity_type, entries).is_some() {
                return Err(FactorTableError::DuplicateType(activity_type));
            }
        }

        let table = Self { factors };
        tracing::info!(
            types = table.factors.len(),
            factors = table.len(),
            "Loaded emission factors"
        );
        Ok(table)
    }

    /// Resolve the factor for a type/category pair.
    pub fn lookup(
        &self,
        activity_type: ActivityType,
        category: &str,
    ) -> Result<&EmissionFactor, FactorLookupError> {
        let categories = self
            .factors
            .get(&activity_type)
            .ok_or(FactorLookupError::UnknownType(activity_type))?;

        categories
            .get(category)
            .ok_or_else(|| FactorLookupError::UnknownCategory {
                activity_type,
                category: category.to_string(),
            })
    }

    /// Categories known for a type, if any.
    pub fn categories(
        &self,
        activity_type: ActivityType,
    ) -> Option<&BTreeMap<String, EmissionFactor>> {
        self.factors.get(&activity_type)
    }

    /// Activity types that have at least one factor.
    pub fn activity_types(&self) -> impl Iterator<Item = ActivityType> + '_ {
        self.factors.keys().copied()
    }

    /// Total number of type/category pairs.
    pub fn len(&self) -> usize {
        self.factors.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Why a type/category pair could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactorLookupError {
    #[error("no emission factors for activity type '{0}'")]
    UnknownType(ActivityType),

    #[error("unknown category '{category}' for activity type '{activity_type}'")]
    UnknownCategory {
        activity_type: ActivityType,
        category: String,
    },
}

/// Errors from loading a factor table.
#[derive(Debug, thiserror::Error)]
pub enum FactorTableError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse emission factors: {0}")]
    ParseError(String),

    #[error("Unknown activity type in factor table: {0}")]
    UnknownType(String),

    #[error("Activity type listed twice in factor table: {0}")]
    DuplicateType(ActivityType),

    #[error("Activity type {0} has no categories")]
    EmptyType(ActivityType),

    #[error("Activity type {0} has an empty category name")]
    EmptyCategory(ActivityType),

    #[error("Factor {activity_type}.{category} has no unit")]
    MissingUnit {
        activity_type: ActivityType,
        category: String,
    },

    #[error("Factor {activity_type}.{category} is not a representable number")]
    InvalidFactor {
        activity_type: ActivityType,
        category: String,
    },
}
