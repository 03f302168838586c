use florascan::error::IdentifyErrorCode;
use florascan::services::identification_service::testing::{identify_via_http, map_http_error};
use florascan::services::identification_service::{IdentificationService, PlantIdConfig};
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration as StdDuration;

const IDENTIFY_PATH: &str = "/api/v3/identification";

fn completed_response(suggestions: serde_json::Value) -> serde_json::Value {
    json!({
        "access_token": "tok",
        "model_version": "plant_id:4.1.2",
        "status": "COMPLETED",
        "result": {
            "is_plant": { "binary": true, "probability": 0.99 },
            "classification": { "suggestions": suggestions }
        },
        "created": 1_738_000_000.0,
        "completed": 1_738_000_001.0
    })
}

#[test]
fn plantid_http_status_mapping_covers_the_full_table() {
    let error = map_http_error(StatusCode::BAD_REQUEST);
    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::InvalidInput));
    assert_eq!(
        error.to_string(),
        "Invalid image data. Please try with a different photo."
    );
    assert_eq!(error.identify_correlation_id(), Some("test-correlation-id"));

    let error = map_http_error(StatusCode::UNAUTHORIZED);
    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::Unauthorized));
    assert_eq!(
        error.to_string(),
        "API key is invalid. Please check configuration."
    );

    let error = map_http_error(StatusCode::NOT_FOUND);
    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::NotFound));
    assert_eq!(error.to_string(), "Identification not found.");

    let error = map_http_error(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::NoCredits));
    assert_eq!(
        error.to_string(),
        "Out of API credits. Please try again later."
    );

    let error = map_http_error(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::ServerError));

    // Unmapped statuses fall through to the server-error kind.
    let error = map_http_error(StatusCode::from_u16(503).unwrap());
    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::ServerError));
    assert_eq!(error.to_string(), "Server error. Please try again.");
}

#[tokio::test]
async fn identify_normalizes_the_top_suggestion() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(IDENTIFY_PATH)
                .query_param("language", "en")
                .query_param(
                    "details",
                    "common_names,url,description,taxonomy,rank,image,synonyms,watering,edible_parts,propagation_methods",
                )
                .header("Api-Key", "test-key")
                .body_contains("data:image/jpg;base64,")
                .body_contains("\"similar_images\":true");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(completed_response(json!([{
                    "id": "p1",
                    "name": "Ficus elastica",
                    "probability": 0.92,
                    "details": {
                        "common_names": ["Rubber Plant"],
                        "watering": { "min": 7, "max": 14 }
                    }
                }])));
        })
        .await;

    let plant = identify_via_http(
        &server.base_url(),
        StdDuration::from_secs(2),
        b"fake-image-bytes",
    )
    .await
    .expect("identification succeeds");

    mock.assert_async().await;

    assert_eq!(plant.id, "p1");
    assert_eq!(plant.scientific_name, "Ficus elastica");
    assert_eq!(plant.common_names, vec!["Rubber Plant".to_string()]);
    assert_eq!(plant.probability, 0.92);
    assert_eq!(plant.description, "No description available.");
    assert_eq!(plant.taxonomy.family, "Unknown");

    let watering = plant.watering.expect("watering present");
    assert_eq!(watering.min, 7);
    assert_eq!(watering.max, 14);
    assert_eq!(watering.label, "7-14 days");

    assert!(plant.synonyms.is_empty());
    assert!(plant.edible_parts.is_empty());
    assert!(plant.propagation_methods.is_empty());
    assert!(plant.captured_image_uri.is_empty());
}

#[tokio::test]
async fn identify_rejects_non_plant_images() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(IDENTIFY_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "COMPLETED",
                    "result": {
                        "is_plant": { "binary": false, "probability": 0.02 },
                        "classification": { "suggestions": [{
                            "id": "x1",
                            "name": "Concrete wall",
                            "probability": 0.5
                        }] }
                    }
                }));
        })
        .await;

    let error = identify_via_http(&server.base_url(), StdDuration::from_secs(2), b"not-a-plant")
        .await
        .expect_err("should reject non-plant image");

    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::InvalidInput));
    assert!(error.to_string().contains("No plant detected"));
}

#[tokio::test]
async fn identify_rejects_empty_suggestions() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(IDENTIFY_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(completed_response(json!([])));
        })
        .await;

    let error = identify_via_http(&server.base_url(), StdDuration::from_secs(2), b"mystery")
        .await
        .expect_err("should fail without suggestions");

    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::InvalidInput));
    assert!(error.to_string().contains("Could not identify"));
}

#[tokio::test]
async fn identify_treats_incomplete_service_status_as_server_error() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(IDENTIFY_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "PENDING",
                    "result": {
                        "is_plant": { "binary": true, "probability": 0.9 },
                        "classification": { "suggestions": [] }
                    }
                }));
        })
        .await;

    let error = identify_via_http(&server.base_url(), StdDuration::from_secs(2), b"pending")
        .await
        .expect_err("should fail on PENDING status");

    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::ServerError));
}

#[tokio::test]
async fn identify_maps_quota_exhaustion_without_reading_the_body() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(IDENTIFY_PATH);
            // Deliberately not JSON; a non-success status must never be parsed.
            then.status(429).body("slow down");
        })
        .await;

    let error = identify_via_http(&server.base_url(), StdDuration::from_secs(2), b"again")
        .await
        .expect_err("should fail with quota error");

    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::NoCredits));
    assert!(error.identify_correlation_id().is_some());
}

#[tokio::test]
async fn identify_maps_timeouts_to_network_error() {
    let server = MockServer::start_async().await;

    let _mock = server
        .mock_async(|when, then| {
            when.method(POST).path(IDENTIFY_PATH);
            then.status(200)
                .delay(StdDuration::from_millis(250))
                .header("content-type", "application/json")
                .json_body(completed_response(json!([{
                    "id": "slow",
                    "name": "Slowpoke fern",
                    "probability": 0.7
                }])));
        })
        .await;

    let error = identify_via_http(&server.base_url(), StdDuration::from_millis(50), b"slow")
        .await
        .expect_err("should time out");

    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::NetworkError));
    assert!(error.identify_correlation_id().is_some());
}

#[tokio::test]
async fn identify_without_api_key_fails_before_any_request() {
    let server = MockServer::start_async().await;

    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(IDENTIFY_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(completed_response(json!([])));
        })
        .await;

    let service = IdentificationService::new(PlantIdConfig {
        api_key: None,
        api_base_url: server.base_url(),
        http_timeout: StdDuration::from_secs(2),
    })
    .expect("service builds without a key");

    assert!(!service.has_configured_provider());

    let error = service
        .identify(b"never-sent")
        .await
        .expect_err("must fail unauthorized");

    assert_eq!(error.identify_code(), Some(IdentifyErrorCode::Unauthorized));
    assert_eq!(error.to_string(), "API key not configured");
    assert_eq!(mock.hits_async().await, 0);
}
