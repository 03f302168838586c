use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine as _;
use reqwest::StatusCode;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult, IdentifyErrorCode};
use crate::models::identification::{IdentificationResponse, IdentificationStatus};
use crate::models::plant::PlantData;
use crate::services::normalizer;

const ENV_API_KEY: &str = "FLORASCAN_PLANT_ID_API_KEY";
const ENV_BASE_URL: &str = "FLORASCAN_PLANT_ID_BASE_URL";

const DETAILS_PARAMS: &str =
    "common_names,url,description,taxonomy,rank,image,synonyms,watering,edible_parts,propagation_methods";
const RESPONSE_LANGUAGE: &str = "en";

/// Client for the Plant.id identification endpoint.
///
/// One outbound request per `identify` call; retry policy, if any, belongs
/// to the caller. A missing API key fails with `UNAUTHORIZED` before any
/// network activity.
#[derive(Clone)]
pub struct IdentificationService {
    provider: Option<Arc<PlantIdProvider>>,
}

#[derive(Debug, Clone)]
pub struct PlantIdConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub http_timeout: StdDuration,
}

impl PlantIdConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var(ENV_API_KEY).ok();
        let api_base_url = std::env::var(ENV_BASE_URL)
            .ok()
            .unwrap_or_else(|| "https://plant.id".to_string());

        let mut config = Self {
            api_key,
            api_base_url,
            http_timeout: StdDuration::from_secs(30),
        };

        if let Some(value) = config.api_key.take() {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                config.api_key = Some(trimmed.to_string());
            }
        }

        config
    }

    fn build_provider(&self) -> AppResult<Option<Arc<PlantIdProvider>>> {
        match &self.api_key {
            Some(api_key) => {
                let provider = PlantIdProvider::try_new(self, api_key.clone())?;
                Ok(Some(Arc::new(provider)))
            }
            None => Ok(None),
        }
    }
}

impl IdentificationService {
    pub fn new(config: PlantIdConfig) -> AppResult<Self> {
        let provider = config.build_provider()?;
        Ok(Self { provider })
    }

    pub fn from_env() -> AppResult<Self> {
        Self::new(PlantIdConfig::from_env())
    }

    pub fn has_configured_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Submit a captured image for identification and return the
    /// normalized result. `captured_image_uri` on the returned record is
    /// left empty for the caller to fill in.
    pub async fn identify(&self, image: &[u8]) -> AppResult<PlantData> {
        let provider = self.current_provider()?;
        provider.identify(image).await
    }

    fn current_provider(&self) -> AppResult<Arc<PlantIdProvider>> {
        self.provider.as_ref().cloned().ok_or_else(|| {
            AppError::identify(
                IdentifyErrorCode::Unauthorized,
                "API key not configured",
            )
        })
    }
}

/// Seam for swapping out the remote identification backend.
#[async_trait::async_trait]
pub trait IdentificationProvider {
    async fn identify(&self, image: &[u8]) -> AppResult<PlantData>;
}

struct PlantIdProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl PlantIdProvider {
    fn try_new(config: &PlantIdConfig, api_key: String) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build Plant.id HTTP client: {err}")))?;

        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        let endpoint = format!("{}/api/v3/identification", base_url);

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    fn build_request_body(&self, image: &[u8]) -> JsonValue {
        json!({
            "images": [format!("data:image/jpg;base64,{}", Base64.encode(image))],
            "similar_images": true,
        })
    }

    fn validate_and_normalize(
        response: IdentificationResponse,
        correlation_id: &str,
    ) -> AppResult<PlantData> {
        if response.status != IdentificationStatus::Completed {
            return Err(AppError::identify_with_correlation(
                IdentifyErrorCode::ServerError,
                "Identification failed. Please try again.",
                Some(correlation_id),
            ));
        }

        let result = response.result.ok_or_else(|| {
            AppError::identify_with_correlation(
                IdentifyErrorCode::ServerError,
                "Identification response was missing its result.",
                Some(correlation_id),
            )
        })?;

        if !result.is_plant.binary {
            return Err(AppError::identify_with_correlation(
                IdentifyErrorCode::InvalidInput,
                "No plant detected in the image. Please try with a clearer plant photo.",
                Some(correlation_id),
            ));
        }

        let suggestions = &result.classification.suggestions;
        if suggestions.is_empty() {
            return Err(AppError::identify_with_correlation(
                IdentifyErrorCode::InvalidInput,
                "Could not identify the plant. Please try with a different photo.",
                Some(correlation_id),
            ));
        }

        debug!(
            target: "app::identify",
            correlation_id = %correlation_id,
            suggestions = suggestions.len(),
            is_plant_probability = result.is_plant.probability,
            "identification completed, taking top suggestion"
        );

        // Ranking is the service's; the top suggestion is the result.
        Ok(normalizer::normalize(&suggestions[0]))
    }

    fn map_http_error(status: StatusCode, correlation_id: &str) -> AppError {
        match status {
            StatusCode::BAD_REQUEST => AppError::identify_with_correlation(
                IdentifyErrorCode::InvalidInput,
                "Invalid image data. Please try with a different photo.",
                Some(correlation_id),
            ),
            StatusCode::UNAUTHORIZED => AppError::identify_with_correlation(
                IdentifyErrorCode::Unauthorized,
                "API key is invalid. Please check configuration.",
                Some(correlation_id),
            ),
            StatusCode::NOT_FOUND => AppError::identify_with_correlation(
                IdentifyErrorCode::NotFound,
                "Identification not found.",
                Some(correlation_id),
            ),
            StatusCode::TOO_MANY_REQUESTS => AppError::identify_with_correlation(
                IdentifyErrorCode::NoCredits,
                "Out of API credits. Please try again later.",
                Some(correlation_id),
            ),
            _ => AppError::identify_with_correlation(
                IdentifyErrorCode::ServerError,
                "Server error. Please try again.",
                Some(correlation_id),
            ),
        }
    }

    fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
        if err.is_timeout() {
            AppError::identify_with_correlation(
                IdentifyErrorCode::NetworkError,
                "The identification request timed out. Please check your connection.",
                Some(correlation_id),
            )
        } else if err.is_connect() {
            AppError::identify_with_correlation(
                IdentifyErrorCode::NetworkError,
                "Could not reach the identification service. Please check your connection.",
                Some(correlation_id),
            )
        } else {
            AppError::identify_with_correlation(
                IdentifyErrorCode::NetworkError,
                "Network error. Please check your connection.",
                Some(correlation_id),
            )
        }
    }
}

#[async_trait::async_trait]
impl IdentificationProvider for PlantIdProvider {
    async fn identify(&self, image: &[u8]) -> AppResult<PlantData> {
        let correlation_id = Uuid::new_v4().to_string();
        let request_body = self.build_request_body(image);

        debug!(
            target: "app::identify::plantid",
            correlation_id = %correlation_id,
            image_bytes = image.len(),
            "submitting identification request"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("details", DETAILS_PARAMS), ("language", RESPONSE_LANGUAGE)])
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                let latency_ms = start.elapsed().as_millis();

                if !status.is_success() {
                    let error = Self::map_http_error(status, correlation_id.as_str());
                    warn!(
                        target: "app::identify::plantid",
                        correlation_id = %correlation_id,
                        status = status.as_u16(),
                        latency_ms,
                        "Plant.id returned non-success status"
                    );
                    return Err(error);
                }

                debug!(
                    target: "app::identify::plantid",
                    correlation_id = %correlation_id,
                    latency_ms,
                    "Plant.id responded"
                );

                let body: IdentificationResponse = resp.json().await.map_err(|err| {
                    AppError::identify_with_correlation(
                        IdentifyErrorCode::ServerError,
                        format!("Failed to decode identification response: {err}"),
                        Some(correlation_id.as_str()),
                    )
                })?;

                Self::validate_and_normalize(body, correlation_id.as_str())
            }
            Err(err) => {
                let error = Self::error_from_reqwest(err, correlation_id.as_str());
                warn!(
                    target: "app::identify::plantid",
                    correlation_id = %correlation_id,
                    "Plant.id request failed"
                );
                Err(error)
            }
        }
    }
}

pub mod testing {
    use super::*;

    /// Expose the Plant.id status mapping for integration tests without
    /// widening the public API surface.
    pub fn map_http_error(status: StatusCode) -> AppError {
        PlantIdProvider::map_http_error(status, "test-correlation-id")
    }

    pub async fn identify_via_http(
        base_url: &str,
        timeout: StdDuration,
        image: &[u8],
    ) -> AppResult<PlantData> {
        let config = PlantIdConfig {
            api_key: Some("test-key".to_string()),
            api_base_url: base_url.trim_end_matches('/').to_string(),
            http_timeout: timeout,
        };
        let provider = PlantIdProvider::try_new(&config, "test-key".to_string())?;
        provider.identify(image).await
    }
}
