//! Wire types for the Plant.id v3 identification response.
//!
//! Field names follow the service's JSON verbatim. Every optional detail
//! field is `Option` or `#[serde(default)]` so a sparse payload never
//! aborts deserialization; fallback substitution happens later in the
//! normalizer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    pub status: IdentificationStatus,
    /// Present once the identification completed; pending or failed
    /// submissions may omit it.
    #[serde(default)]
    pub result: Option<IdentificationResult>,
    #[serde(default)]
    pub created: Option<f64>,
    #[serde(default)]
    pub completed: Option<f64>,
}

/// Service-level completion state, distinct from the HTTP status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentificationStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationResult {
    pub is_plant: IsPlant,
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsPlant {
    pub binary: bool,
    #[serde(default)]
    pub probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Classification {
    #[serde(default)]
    pub suggestions: Vec<ClassificationSuggestion>,
}

/// One candidate species match, ranked by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationSuggestion {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub similar_images: Vec<SimilarImage>,
    #[serde(default)]
    pub details: SuggestionDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarImage {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub url_small: Option<String>,
    #[serde(default)]
    pub similarity: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SuggestionDetails {
    #[serde(default)]
    pub common_names: Option<Vec<String>>,
    #[serde(default)]
    pub taxonomy: Option<RawTaxonomy>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<DescriptionDetail>,
    #[serde(default)]
    pub image: Option<ImageDetail>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub synonyms: Option<Vec<String>>,
    #[serde(default)]
    pub edible_parts: Option<Vec<String>>,
    #[serde(default)]
    pub watering: Option<WateringInterval>,
    #[serde(default)]
    pub propagation_methods: Option<Vec<String>>,
    #[serde(default)]
    pub gbif_id: Option<i64>,
    #[serde(default)]
    pub inaturalist_id: Option<i64>,
}

/// Full taxonomy as delivered by the service; only family/genus/order
/// survive into the canonical record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawTaxonomy {
    #[serde(default)]
    pub kingdom: Option<String>,
    #[serde(default)]
    pub phylum: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub genus: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionDetail {
    pub value: String,
    #[serde(default)]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDetail {
    pub value: String,
    #[serde(default)]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WateringInterval {
    pub min: i64,
    pub max: i64,
}
