use crate::infra::{output_file, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;
use wohngeld_forms::forms::{forms_router, FormFillService};

pub(crate) fn with_forms_routes(service: Arc<FormFillService>) -> axum::Router {
    forms_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/forms/download/:filename",
            axum::routing::get(download_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn download_endpoint(
    Extension(state): Extension<AppState>,
    Path(filename): Path<String>,
) -> Response {
    let Some(path) = output_file(&state.output_dir, &filename) else {
        let payload = json!({ "error": "invalid file name" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = mime_guess::from_path(&path).first_or_octet_stream();
            let disposition = format!("attachment; filename=\"{filename}\"");
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, content_type.essence_str().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let payload = json!({ "error": format!("no generated file named '{filename}'") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed to read generated file");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicBool;

    fn state(output_dir: PathBuf) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(recorder.handle()),
            output_dir: Arc::new(output_dir),
        }
    }

    #[tokio::test]
    async fn download_serves_generated_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("antrag.json"), br#"{"a":"b"}"#).expect("write output");

        let response = download_endpoint(
            Extension(state(dir.path().to_path_buf())),
            Path("antrag.json".to_string()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/json")
        );
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        assert_eq!(&body[..], br#"{"a":"b"}"#);
    }

    #[tokio::test]
    async fn download_refuses_traversal_and_unknown_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let traversal = download_endpoint(
            Extension(state(dir.path().join("output"))),
            Path("../antrag.json".to_string()),
        )
        .await;
        assert_eq!(traversal.status(), StatusCode::BAD_REQUEST);

        let missing = download_endpoint(
            Extension(state(dir.path().to_path_buf())),
            Path("missing.json".to_string()),
        )
        .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app_state = state(dir.path().to_path_buf());
        app_state
            .readiness
            .store(false, std::sync::atomic::Ordering::Relaxed);

        let response = readiness_endpoint(Extension(app_state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
