use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Listing status as shown in the status picker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    pub fn from_flag(available: bool) -> Self {
        if available {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    pub fn is_available(self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
        }
    }

    /// Parse a picker value. Anything other than "available" counts as unavailable.
    pub fn from_status(value: &str) -> Self {
        Self::from_flag(value == "available")
    }
}

/// Rental listing record as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: i64,
    #[serde(default = "default_availability")]
    pub availability: bool,
    #[serde(default, deserialize_with = "deserialize_move_in_date")]
    pub move_in_date: Option<NaiveDate>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

/// Editable state of one ad, owned by the form
#[derive(Debug, Clone, PartialEq)]
pub struct AdDraft {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub availability: bool,
    pub move_in_date: Option<NaiveDate>,
    /// `data:` URIs in the order they were appended
    pub images: Vec<String>,
}

impl Default for AdDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: 0,
            availability: true,
            move_in_date: None,
            images: Vec::new(),
        }
    }
}

impl From<&Ad> for AdDraft {
    fn from(ad: &Ad) -> Self {
        Self {
            title: ad.title.clone(),
            description: ad.description.clone(),
            price: ad.price,
            availability: ad.availability,
            move_in_date: ad.move_in_date,
            images: ad.images.clone(),
        }
    }
}

/// Request body for `POST /api/ads` and `PUT /api/ads/{id}`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdPayload {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub availability: bool,
    /// Midnight UTC of the move-in day, `null` when unset
    pub move_in_date: Option<DateTime<Utc>>,
    pub images: Vec<String>,
    pub owner_id: String,
}

impl AdPayload {
    pub fn from_draft(draft: &AdDraft, owner_id: &str) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            price: draft.price,
            availability: draft.availability,
            move_in_date: draft
                .move_in_date
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc()),
            images: draft.images.clone(),
            owner_id: owner_id.to_string(),
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (what the backend echoes back).
pub fn parse_move_in_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc).date_naive())
}

/// Price rule shared by user input and backend records: empty is 0, fractions
/// round to the nearest unit, negative or non-numeric values are refused.
pub fn parse_price(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }
    match raw.parse::<i64>() {
        Ok(p) => (p >= 0).then_some(p),
        Err(_) => raw.parse::<f64>().ok().and_then(price_from_f64),
    }
}

fn price_from_f64(value: f64) -> Option<i64> {
    (value.is_finite() && value >= 0.0 && value <= i64::MAX as f64).then(|| value.round() as i64)
}

fn default_availability() -> bool {
    true
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => n
            .as_i64()
            .filter(|p| *p >= 0)
            .or_else(|| n.as_f64().and_then(price_from_f64))
            .ok_or_else(|| de::Error::custom(format!("invalid price: {}", n))),
        serde_json::Value::String(s) => parse_price(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid price: {:?}", s))),
        other => Err(de::Error::custom(format!("unexpected price value: {}", other))),
    }
}

fn deserialize_move_in_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_move_in_date(s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid moveInDate: {:?}", s))),
    }
}
