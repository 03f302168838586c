//! End-to-end scan flow: captured image → identification → history →
//! favorites → process restart.

use std::time::Duration as StdDuration;

use florascan::app::AppState;
use florascan::db::DbPool;
use florascan::services::identification_service::PlantIdConfig;
use httpmock::prelude::*;
use httpmock::Mock;
use serde_json::json;
use tempfile::TempDir;

fn test_config(base_url: &str) -> PlantIdConfig {
    PlantIdConfig {
        api_key: Some("test-key".to_string()),
        api_base_url: base_url.trim_end_matches('/').to_string(),
        http_timeout: StdDuration::from_secs(2),
    }
}

async fn mock_identification<'a>(server: &'a MockServer, id: &str, name: &str) -> Mock<'a> {
    let id = id.to_string();
    let name = name.to_string();
    server
        .mock_async(move |when, then| {
            when.method(POST)
                .path("/api/v3/identification")
                .body_contains(format!("data:image/jpg;base64,{}", encode_marker(&id)));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "COMPLETED",
                    "result": {
                        "is_plant": { "binary": true, "probability": 0.98 },
                        "classification": { "suggestions": [{
                            "id": id,
                            "name": name,
                            "probability": 0.91,
                            "details": {
                                "common_names": [name],
                                "url": "https://en.wikipedia.org/wiki/Example",
                                "description": { "value": "A plant." },
                                "taxonomy": { "order": "Rosales", "family": "Moraceae", "genus": "Ficus" },
                                "watering": { "min": 7, "max": 14 }
                            }
                        }] }
                    }
                }));
        })
        .await
}

// Each scan submits distinct bytes so the mocks can tell requests apart.
fn encode_marker(id: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    STANDARD.encode(id.as_bytes())
}

#[tokio::test]
async fn scan_record_favorite_and_restart() {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new().expect("temp dir");
    let db_pool = DbPool::new(temp_dir.path().join("florascan.sqlite")).expect("db pool");

    let mock = mock_identification(&server, "p1", "Ficus elastica").await;

    let app = AppState::with_config(db_pool.clone(), test_config(&server.base_url()))
        .expect("app state wires");

    let plant = app
        .identify(b"p1", "file:///photos/capture-001.jpg")
        .await
        .expect("identification succeeds");
    mock.assert_async().await;

    assert_eq!(plant.id, "p1");
    assert_eq!(plant.captured_image_uri, "file:///photos/capture-001.jpg");
    assert_eq!(
        plant.watering.as_ref().map(|w| w.label.as_str()),
        Some("7-14 days")
    );

    app.add_to_history(plant.clone());
    app.toggle_favorite(&plant.id);

    assert!(app.is_favorite("p1"));
    assert_eq!(app.history().len(), 1);
    assert_eq!(app.collection().len(), 1);

    // A fresh AppState on the same database plays the role of a relaunch.
    drop(app);
    let relaunched = AppState::with_config(db_pool, test_config(&server.base_url()))
        .expect("app state rewires");

    let history = relaunched.history();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].plant.captured_image_uri,
        "file:///photos/capture-001.jpg"
    );
    assert!(relaunched.is_favorite("p1"));
    assert_eq!(relaunched.collection()[0].plant.id, "p1");
}

#[tokio::test]
async fn concurrent_scans_proceed_independently() {
    let server = MockServer::start_async().await;
    let temp_dir = TempDir::new().expect("temp dir");
    let db_pool = DbPool::new(temp_dir.path().join("florascan.sqlite")).expect("db pool");

    let mock_a = mock_identification(&server, "a1", "Ficus elastica").await;
    let mock_b = mock_identification(&server, "b1", "Monstera deliciosa").await;

    let app =
        AppState::with_config(db_pool, test_config(&server.base_url())).expect("app state wires");

    let (first, second) = futures::join!(
        app.identify(b"a1", "file:///photos/a.jpg"),
        app.identify(b"b1", "file:///photos/b.jpg"),
    );

    let first = first.expect("first scan succeeds");
    let second = second.expect("second scan succeeds");
    assert_eq!(first.id, "a1");
    assert_eq!(second.id, "b1");
    assert_eq!(mock_a.hits_async().await, 1);
    assert_eq!(mock_b.hits_async().await, 1);

    app.add_to_history(first);
    app.add_to_history(second);
    assert_eq!(app.history().len(), 2);
    assert_eq!(app.history()[0].plant.id, "b1");
}
