//! Pure transformation from a raw classification suggestion to the
//! canonical `PlantData` record.
//!
//! The fallback defaults live here, enumerated once. Absent strings become
//! `UNKNOWN`, absent sequences become empty, an absent description becomes
//! the placeholder sentence. The function never fails; an empty
//! suggestions list is rejected upstream by the identification client.

use crate::models::identification::ClassificationSuggestion;
use crate::models::plant::{PlantData, PlantTaxonomy, WateringInfo};

const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available.";

pub fn normalize(suggestion: &ClassificationSuggestion) -> PlantData {
    let details = &suggestion.details;

    let taxonomy = details
        .taxonomy
        .as_ref()
        .map(|raw| PlantTaxonomy {
            family: or_unknown(raw.family.clone()),
            genus: or_unknown(raw.genus.clone()),
            order: or_unknown(raw.order.clone()),
        })
        .unwrap_or_else(unknown_taxonomy);

    // Representative image: detail image first, then the first similar
    // image returned alongside the suggestion.
    let image_url = details
        .image
        .as_ref()
        .map(|image| image.value.clone())
        .or_else(|| {
            suggestion
                .similar_images
                .first()
                .map(|similar| similar.url.clone())
        })
        .unwrap_or_default();

    PlantData {
        id: suggestion.id.clone(),
        scientific_name: or_unknown(suggestion.name.clone()),
        common_names: or_empty(details.common_names.clone()),
        probability: suggestion.probability,
        description: details
            .description
            .as_ref()
            .map(|description| description.value.clone())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        image_url,
        captured_image_uri: String::new(),
        taxonomy,
        wikipedia_url: details.url.clone().unwrap_or_default(),
        watering: details
            .watering
            .map(|interval| WateringInfo::from_interval(interval.min, interval.max)),
        synonyms: or_empty(details.synonyms.clone()),
        edible_parts: or_empty(details.edible_parts.clone()),
        propagation_methods: or_empty(details.propagation_methods.clone()),
        gbif_id: details.gbif_id,
        inaturalist_id: details.inaturalist_id,
    }
}

fn or_unknown(value: Option<String>) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => UNKNOWN.to_string(),
    }
}

fn or_empty(value: Option<Vec<String>>) -> Vec<String> {
    value.unwrap_or_default()
}

fn unknown_taxonomy() -> PlantTaxonomy {
    PlantTaxonomy {
        family: UNKNOWN.to_string(),
        genus: UNKNOWN.to_string(),
        order: UNKNOWN.to_string(),
    }
}
