// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint aggregation over a snapshot of a user's activities.
//!
//! Sums are taken over two-decimal values in exact decimal arithmetic, so the
//! grand total computed from per-type totals always equals the total computed
//! directly from individual activities.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::footprint::round_footprint;
use crate::models::{Activity, ActivityType, AggregateSummary, CarbonFootprint, DateWindow, TypeTotal};

/// Group activities by type and total their footprints.
pub fn summarize(activities: &[Activity]) -> AggregateSummary {
    let mut by_type: Vec<TypeTotal> = Vec::new();
    let mut index: HashMap<ActivityType, usize> = HashMap::new();

    for activity in activities {
        let slot = *index.entry(activity.activity_type).or_insert_with(|| {
            by_type.push(TypeTotal {
                activity_type: activity.activity_type,
                total_carbon: Decimal::ZERO,
                count: 0,
            });
            by_type.len() - 1
        });

        let group = &mut by_type[slot];
        group.total_carbon += activity.carbon_footprint.value;
        group.count += 1;
    }

    for group in &mut by_type {
        group.total_carbon = round_footprint(group.total_carbon);
    }

    let total = by_type.iter().map(|g| g.total_carbon).sum();

    AggregateSummary {
        by_type,
        total: CarbonFootprint::kg_co2e(total),
    }
}

/// Activities whose date falls inside `window`.
pub fn in_window<'a>(
    activities: &'a [Activity],
    window: &'a DateWindow,
) -> impl Iterator<Item = &'a Activity> + 'a {
    activities.iter().filter(move |a| window.contains(&a.date))
}

/// Total footprint of the activities inside `window`.
pub fn total_in_window(activities: &[Activity], window: &DateWindow) -> CarbonFootprint {
    let total: Decimal = in_window(activities, window)
        .map(|a| a.carbon_footprint.value)
        .sum();
    CarbonFootprint::kg_co2e(total)
}
