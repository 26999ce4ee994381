//! Business records returned by the search service.
//!
//! The service has shipped two response shapes: a `GET /search` shape keyed
//! by `results` with `name`/`matched_on`/`matched_text`, and a `POST /query`
//! shape keyed by `res` with `business_name`/`reason`/`phone_number`. Both
//! deserialize into the single [`BusinessRecord`] schema here.

use std::collections::HashSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One business as displayed in the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct BusinessRecord {
    pub place_id: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    /// Why the record matched: a chunk kind (`review`, `description`) or a
    /// free-text reason.
    pub matched_on: Option<String>,
    pub matched_text: Option<String>,
    /// Percentage relevance as reported by the service.
    pub relevance_score: Option<f64>,
}

/// Wire form accepting the field names of both service shapes at once.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    business_name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    matched_on: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    matched_text: Option<String>,
    #[serde(default)]
    relevance_score: Option<f64>,
}

impl TryFrom<RawRecord> for BusinessRecord {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .or(raw.business_name)
            .ok_or_else(|| "missing field `name` (or `business_name`)".to_string())?;

        Ok(Self {
            place_id: raw.place_id,
            name,
            address: raw.address,
            rating: raw.rating,
            website: raw.website,
            phone_number: raw.phone_number,
            matched_on: raw.matched_on.or(raw.reason),
            matched_text: raw.matched_text,
            relevance_score: raw.relevance_score,
        })
    }
}

impl BusinessRecord {
    /// Stable key for a rendered row: `place_id` when present, else the name.
    #[must_use]
    pub fn render_key(&self) -> &str {
        self.place_id.as_deref().unwrap_or(&self.name)
    }
}

/// Top-level search response, in either of the two shapes the service emits.
///
/// `{"results": [...]}` is tried first, then `{"res": [...]}`. Errors name the
/// offending key and record index.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEnvelope {
    Results(Vec<BusinessRecord>),
    Res(Vec<BusinessRecord>),
}

impl SearchEnvelope {
    /// Records in the order the service ranked them.
    #[must_use]
    pub fn into_records(self) -> Vec<BusinessRecord> {
        match self {
            SearchEnvelope::Results(records) | SearchEnvelope::Res(records) => records,
        }
    }
}

impl<'de> Deserialize<'de> for SearchEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = serde_json::Map::deserialize(deserializer)?;

        let (key, items) = if let Some(items) = body.remove("results") {
            ("results", items)
        } else if let Some(items) = body.remove("res") {
            ("res", items)
        } else {
            return Err(D::Error::custom(
                "expected a `results` or `res` key in search response",
            ));
        };

        let serde_json::Value::Array(items) = items else {
            return Err(D::Error::custom(format!("`{key}` must be an array")));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value::<BusinessRecord>(item)
                    .map_err(|e| D::Error::custom(format!("{key}[{i}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match key {
            "results" => SearchEnvelope::Results(records),
            _ => SearchEnvelope::Res(records),
        })
    }
}

/// Returns every `place_id` that appears more than once, in first-repeat order.
#[must_use]
pub fn duplicate_place_ids(records: &[BusinessRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut dupes = Vec::new();
    for id in records.iter().filter_map(|r| r.place_id.as_deref()) {
        if !seen.insert(id) && !dupes.contains(&id) {
            dupes.push(id);
        }
    }
    dupes
}
