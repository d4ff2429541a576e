//! Footprint aggregates for dashboard queries.
//!
//! Summaries are derived from the current activity records on every request
//! and are never persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::activity::ActivityType;
use crate::models::footprint::CarbonFootprint;

/// Summed footprint for one activity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TypeTotal {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_carbon: Decimal,
    pub count: u32,
}

/// Per-type totals plus a grand total.
///
/// `by_type` lists types in order of first appearance; callers should not
/// rely on that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    pub by_type: Vec<TypeTotal>,
    pub total: CarbonFootprint,
}

/// Inclusive date range.
///
/// A window filters only when both bounds are known; a single bound leaves
/// the window unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    bounds: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            bounds: start.zip(end),
        }
    }

    /// Window covering all dates.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.bounds.map(|(start, _)| start)
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.bounds.map(|(_, end)| end)
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.bounds
            .is_none_or(|(start, end)| *date >= start && *date <= end)
    }

    /// True when `start` is after `end`.
    pub fn is_inverted(&self) -> bool {
        matches!(self.bounds, Some((start, end)) if start > end)
    }
}
