// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod footprint;
pub mod summary;
pub mod user;

pub use activity::{Activity, ActivityInput, ActivityResponse, ActivityType, GeoPoint};
pub use footprint::{Amount, CarbonFootprint, KG_CO2E};
pub use summary::{AggregateSummary, DateWindow, TypeTotal};
pub use user::{EmailClaim, User, UserResponse};
