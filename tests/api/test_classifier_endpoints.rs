// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Classifier service endpoint tests
//!
//! Drive the router end to end with a mean-color encoder:
//! - uploads are stored under their final path component
//! - /predict/ waits until two classes have been labeled
//! - one prediction per uploaded file once ready
//! - malformed label requests are rejected before any inference

use axum::{http::StatusCode, Router};
use fabstir_vision_lab::{
    api::{create_classifier_app, ClassifierState},
    classifier::ExampleStore,
    storage::UploadStore,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::util::ServiceExt;

use super::common::{
    get_request, json_body, solid_png, split_png, urlencoded_request, MeanColorEncoder,
    MultipartBody,
};

const MAX_BODY: usize = 16 * 1024 * 1024;

async fn setup(dir: &Path) -> (Router, ClassifierState) {
    let state = ClassifierState {
        uploads: Arc::new(UploadStore::open(dir.join("uploads")).await.unwrap()),
        encoder: Arc::new(MeanColorEncoder),
        examples: Arc::new(RwLock::new(ExampleStore::default())),
    };
    (create_classifier_app(state.clone(), MAX_BODY), state)
}

fn label_body(filename: &str, class: &str, region: (i64, i64, i64, i64)) -> MultipartBody {
    MultipartBody::new()
        .text("filename", filename)
        .text("user_class", class)
        .text("x1", &region.0.to_string())
        .text("y1", &region.1.to_string())
        .text("x2", &region.2.to_string())
        .text("y2", &region.3.to_string())
}

#[cfg(test)]
mod classifier_endpoint_tests {
    use super::*;

    /// Upload stores every file part and reports the stored names
    #[tokio::test]
    async fn test_upload_multiple_files() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let request = MultipartBody::new()
            .file("files", "red.png", &solid_png(8, 8, [255, 0, 0]))
            .file("files", "photos/blue.png", &solid_png(8, 8, [0, 0, 255]))
            .into_request("/upload/");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "success", "files": ["red.png", "blue.png"]})
        );
        assert!(dir.path().join("uploads/red.png").exists());
        assert!(dir.path().join("uploads/blue.png").exists());
    }

    /// Upload of a name without a file component is rejected
    #[tokio::test]
    async fn test_upload_rejects_dot_dot() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let request = MultipartBody::new()
            .file("files", "..", b"data")
            .into_request("/upload/");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Predict before any label reports the waiting status with 200
    #[tokio::test]
    async fn test_predict_waits_without_classes() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let response = app.oneshot(get_request("/predict/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "waiting for labeled examples"})
        );
    }

    /// A single class never produces a classifier
    #[tokio::test]
    async fn test_single_class_keeps_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = setup(dir.path()).await;
        tokio::fs::write(
            dir.path().join("uploads/red.png"),
            solid_png(8, 8, [255, 0, 0]),
        )
        .await
        .unwrap();

        for _ in 0..3 {
            let request = label_body("red.png", "red", (0, 0, 8, 8)).into_request("/label/");
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(state.examples.read().await.len(), 3);

        let response = app.oneshot(get_request("/predict/")).await.unwrap();
        assert_eq!(
            json_body(response).await,
            json!({"status": "waiting for labeled examples"})
        );
    }

    /// Crops from one split image teach both classes; every upload is predicted
    #[tokio::test]
    async fn test_label_regions_then_predict_all() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let request = MultipartBody::new()
            .file("files", "split.png", &split_png(16, 8, [250, 10, 10], [10, 10, 250]))
            .file("files", "a_red.png", &solid_png(8, 8, [240, 20, 20]))
            .file("files", "b_blue.png", &solid_png(8, 8, [20, 20, 240]))
            .into_request("/upload/");
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let labels = [
            ("red", (0, 0, 8, 8)),
            ("blue", (8, 0, 16, 8)),
            ("red", (1, 1, 7, 7)),
            ("blue", (9, 1, 15, 7)),
        ];
        for (class, region) in labels {
            let request = label_body("split.png", class, region).into_request("/label/");
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                json_body(response).await,
                json!({"status": "success", "class": class})
            );
        }

        let response = app.oneshot(get_request("/predict/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let predictions = body["predictions"].as_array().unwrap();

        assert_eq!(predictions.len(), 3);
        assert_eq!(predictions[0]["filename"], "a_red.png");
        assert_eq!(predictions[0]["predicted_class"], "red");
        assert_eq!(predictions[1]["filename"], "b_blue.png");
        assert_eq!(predictions[1]["predicted_class"], "blue");
        assert_eq!(predictions[2]["filename"], "split.png");
        let split_class = predictions[2]["predicted_class"].as_str().unwrap();
        assert!(split_class == "red" || split_class == "blue");
    }

    /// Form fields may also arrive urlencoded
    #[tokio::test]
    async fn test_label_accepts_urlencoded() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = setup(dir.path()).await;
        tokio::fs::write(
            dir.path().join("uploads/cat.png"),
            solid_png(4, 4, [9, 9, 9]),
        )
        .await
        .unwrap();

        let request = urlencoded_request(
            "/label/",
            "filename=cat.png&user_class=tabby+cat&x1=0&y1=0&x2=20&y2=20",
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "success", "class": "tabby cat"})
        );
        assert_eq!(state.examples.read().await.labels(), vec!["tabby cat"]);
    }

    /// Non-integer coordinates are a 400 naming the field
    #[tokio::test]
    async fn test_label_rejects_non_integer() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = setup(dir.path()).await;

        let request = urlencoded_request(
            "/label/",
            "filename=cat.png&user_class=cat&x1=zero&y1=0&x2=4&y2=4",
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error_type"], "validation_error");
        assert_eq!(body["details"]["field"], "x1");
        assert!(state.examples.read().await.is_empty());
    }

    /// An empty crop box is a 400
    #[tokio::test]
    async fn test_label_rejects_empty_box() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let request = label_body("cat.png", "cat", (5, 5, 5, 9)).into_request("/label/");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    /// Boxes too large to allocate or wider than u32 are refused before any crop
    #[tokio::test]
    async fn test_label_rejects_unbounded_boxes() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = setup(dir.path()).await;
        tokio::fs::write(dir.path().join("uploads/cat.png"), solid_png(8, 8, [9, 9, 9]))
            .await
            .unwrap();

        for region in [
            (0, 0, 200_000, 200_000),
            (0, 0, (1i64 << 32) + 1, 1),
            (i64::MIN, 0, i64::MAX, 1),
        ] {
            let request = label_body("cat.png", "cat", region).into_request("/label/");
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = json_body(response).await;
            assert_eq!(body["error_type"], "validation_error");
            assert_eq!(body["details"]["field"], "box");
        }
        assert!(state.examples.read().await.is_empty());
    }

    /// Labeling a file that was never uploaded is a 404
    #[tokio::test]
    async fn test_label_unknown_file() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let request = label_body("ghost.png", "cat", (0, 0, 4, 4)).into_request("/label/");
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error_type"], "not_found");
    }

    /// Identical crops produce identical features
    #[tokio::test]
    async fn test_feature_extraction_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = setup(dir.path()).await;
        tokio::fs::write(
            dir.path().join("uploads/noise.png"),
            split_png(10, 10, [1, 2, 3], [200, 100, 50]),
        )
        .await
        .unwrap();

        for _ in 0..2 {
            let request = label_body("noise.png", "x", (2, 0, 9, 10)).into_request("/label/");
            app.clone().oneshot(request).await.unwrap();
        }

        let examples = state.examples.read().await;
        let stored = examples.examples();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].features, stored[1].features);
    }

    /// Health reports the model and the labeled classes
    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = setup(dir.path()).await;
        state
            .examples
            .write()
            .await
            .add_example(vec![0.0, 0.0, 0.0], "dark")
            .unwrap();

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "classifier");
        assert_eq!(body["model"], "mean-color");
        assert_eq!(body["examples"], 1);
        assert_eq!(body["classes"], json!(["dark"]));
        assert_eq!(body["build"]["version"], body["version"]);
        assert!(body["build"]["features"]
            .as_array()
            .unwrap()
            .contains(&json!("few-shot-classifier")));
    }

    /// CORS is open to any origin
    #[tokio::test]
    async fn test_cors_preflight() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = setup(dir.path()).await;

        let request = axum::http::Request::builder()
            .method("OPTIONS")
            .uri("/label/")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(axum::body::Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
