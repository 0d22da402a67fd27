//! Custom-cake record normalization
//!
//! Upstream custom-cake payloads arrive loosely typed: numeric strings,
//! missing timestamps, free-form status values. Normalization is total:
//! it never rejects a record, substituting documented defaults instead,
//! so the UI always has something to render.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Lifecycle status of a custom-cake request
///
/// Unknown upstream values coerce to [`CustomCakeStatus::PendingReview`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomCakeStatus {
    PendingReview,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl Default for CustomCakeStatus {
    fn default() -> Self {
        Self::PendingReview
    }
}

/// Fully-populated, type-safe custom-cake record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCake {
    pub id: String,
    pub customer_name: String,
    pub description: String,
    pub servings: u32,
    pub quoted_price: f64,
    pub status: CustomCakeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomCake {
    /// Coerce a raw upstream value into a fully-populated record
    pub fn normalize(raw: &JsonValue) -> Self {
        let now = Utc::now();
        Self {
            id: string_or_number(raw.get("id")),
            customer_name: string_field(raw.get("customerName")),
            description: string_field(raw.get("description")),
            servings: unsigned_field(raw.get("servings")),
            quoted_price: numeric_field(raw.get("quotedPrice")),
            status: status_field(raw.get("status")),
            image_url: raw
                .get("imageUrl")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            created_at: timestamp_field(raw.get("createdAt"), now),
            updated_at: timestamp_field(raw.get("updatedAt"), now),
        }
    }
}

fn string_field(value: Option<&JsonValue>) -> String {
    value
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_or_number(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn numeric_field(value: Option<&JsonValue>) -> f64 {
    match value {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn unsigned_field(value: Option<&JsonValue>) -> u32 {
    match value {
        Some(JsonValue::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(0),
        Some(JsonValue::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn status_field(value: Option<&JsonValue>) -> CustomCakeStatus {
    value
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

fn timestamp_field(value: Option<&JsonValue>, default: DateTime<Utc>) -> DateTime<Utc> {
    value
        .and_then(JsonValue::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
