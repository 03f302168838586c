//! Canonical, fallback-filled plant records.
//!
//! These are the types the rest of the app (and the presentation layer)
//! consume; the raw service schema never leaks past the normalizer.

use serde::{Deserialize, Serialize};

/// Normalized identification result for a single scan.
///
/// `id` is the service-assigned suggestion id. Repeated scans of the same
/// physical plant each get a fresh id from the service, so it identifies a
/// scan result rather than a species.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlantData {
    pub id: String,
    pub scientific_name: String,
    pub common_names: Vec<String>,
    pub probability: f64,
    pub description: String,
    pub image_url: String,
    /// Local reference to the user's original photo. The identification
    /// client always returns this empty; the caller fills it in.
    pub captured_image_uri: String,
    pub taxonomy: PlantTaxonomy,
    pub wikipedia_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watering: Option<WateringInfo>,
    pub synonyms: Vec<String>,
    pub edible_parts: Vec<String>,
    pub propagation_methods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gbif_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inaturalist_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlantTaxonomy {
    pub family: String,
    pub genus: String,
    pub order: String,
}

/// Watering interval in days. `label` is always derived from `min`/`max`,
/// never supplied independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WateringInfo {
    pub min: i64,
    pub max: i64,
    pub label: String,
}

impl WateringInfo {
    pub fn from_interval(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            label: format!("{}-{} days", min, max),
        }
    }
}

/// A plant that has been scanned and saved to history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScannedPlant {
    #[serde(flatten)]
    pub plant: PlantData,
    /// RFC 3339 timestamp assigned when the plant was added to history.
    pub scanned_at: String,
}
