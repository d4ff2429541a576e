// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::footprint::{Amount, CarbonFootprint};
use crate::time_utils::format_utc_rfc3339;

/// Canonical activity types.
///
/// `transportation` is accepted on input as a synonym of `transport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[serde(alias = "transportation")]
    Transport,
    Energy,
    Food,
    Waste,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Transport => "transport",
            ActivityType::Energy => "energy",
            ActivityType::Food => "food",
            ActivityType::Waste => "waste",
            ActivityType::Other => "other",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strings outside the canonical enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity type '{0}'")]
pub struct UnknownActivityType(pub String);

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transport" | "transportation" => Ok(ActivityType::Transport),
            "energy" => Ok(ActivityType::Energy),
            "food" => Ok(ActivityType::Food),
            "waste" => Ok(ActivityType::Waste),
            "other" => Ok(ActivityType::Other),
            _ => Err(UnknownActivityType(s.to_string())),
        }
    }
}

/// GeoJSON point (`[longitude, latitude]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_kind")]
    #[validate(custom(function = "validate_point_kind"))]
    pub kind: String,
    #[validate(custom(function = "validate_coordinates"))]
    pub coordinates: [f64; 2],
}

fn point_kind() -> String {
    "Point".to_string()
}

fn validate_point_kind(kind: &str) -> Result<(), ValidationError> {
    if kind == "Point" {
        Ok(())
    } else {
        Err(ValidationError::new("geometry_type"))
    }
}

fn validate_coordinates(coordinates: &[f64; 2]) -> Result<(), ValidationError> {
    let [lon, lat] = *coordinates;
    if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(ValidationError::new("coordinates_out_of_range"))
    }
}

/// Free-form client metadata attached to an activity.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Stored activity record in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Activity ID (also used as document ID)
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub category: String,
    pub description: String,
    pub amount: Amount,
    /// Always computed server-side from type, category and amount
    pub carbon_footprint: CarbonFootprint,
    /// When the activity happened
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// Activity fields accepted from a client on create and update.
///
/// Has no footprint field: a `carbonFootprint` sent by the client is
/// dropped during deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32))]
    pub activity_type: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(nested)]
    pub amount: Amount,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(nested)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Activity as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub category: String,
    pub description: String,
    pub amount: Amount,
    pub carbon_footprint: CarbonFootprint,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, unknown>"))]
    pub metadata: Option<Metadata>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Activity> for ActivityResponse {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            activity_type: a.activity_type,
            category: a.category,
            description: a.description,
            amount: a.amount,
            carbon_footprint: a.carbon_footprint,
            date: format_utc_rfc3339(a.date),
            location: a.location,
            metadata: a.metadata,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}
