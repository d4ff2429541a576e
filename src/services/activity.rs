// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity record construction.
//!
//! Both creation and update go through the footprint calculator; the stored
//! footprint is never taken from the client or carried over from an older
//! version of the record.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::error::Result;
use crate::models::{Activity, ActivityInput};
use crate::services::calculator::FootprintCalculator;
use crate::time_utils::format_utc_rfc3339;

/// Build a new activity for `user_id` from client input.
pub fn build_activity(
    calculator: &FootprintCalculator,
    user_id: Uuid,
    input: ActivityInput,
    now: DateTime<Utc>,
) -> Result<Activity> {
    input.validate()?;

    let estimate = calculator.estimate(&input.activity_type, &input.category, input.amount.value)?;
    let timestamp = format_utc_rfc3339(now);

    Ok(Activity {
        id: Uuid::new_v4(),
        user_id,
        activity_type: estimate.activity_type,
        category: input.category,
        description: input.description,
        amount: input.amount,
        carbon_footprint: estimate.footprint,
        date: input.date.unwrap_or(now),
        location: input.location,
        metadata: input.metadata,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    })
}

/// Rewrite `existing` with new client input, recomputing the footprint.
///
/// Identity, owner and creation time are kept. Date, location and metadata
/// keep their previous values when the input omits them.
pub fn apply_update(
    calculator: &FootprintCalculator,
    existing: Activity,
    input: ActivityInput,
    now: DateTime<Utc>,
) -> Result<Activity> {
    input.validate()?;

    let estimate = calculator.estimate(&input.activity_type, &input.category, input.amount.value)?;

    Ok(Activity {
        id: existing.id,
        user_id: existing.user_id,
        activity_type: estimate.activity_type,
        category: input.category,
        description: input.description,
        amount: input.amount,
        carbon_footprint: estimate.footprint,
        date: input.date.unwrap_or(existing.date),
        location: input.location.or(existing.location),
        metadata: input.metadata.or(existing.metadata),
        created_at: existing.created_at,
        updated_at: format_utc_rfc3339(now),
    })
}
