// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod aggregator;
pub mod calculator;
pub mod factors;
pub mod password;

pub use calculator::{CalculationError, Estimate, FootprintCalculator};
pub use factors::{EmissionFactor, EmissionFactorTable, FactorLookupError, FactorTableError};
