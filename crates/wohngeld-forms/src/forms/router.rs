use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analysis::AnalysisReport;
use super::domain::ApplicationData;
use super::engine::FillSummary;
use super::service::FormFillService;
use super::table::FieldTable;
use super::values::FieldValue;
use super::FormsError;
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TemplateQuery {
    template_path: Option<PathBuf>,
}

/// Precomputed field values keyed by form field name.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TableFillRequest {
    #[serde(default)]
    last_name: String,
    fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalysisResponse {
    #[serde(flatten)]
    analysis: AnalysisReport,
    report: String,
}

/// Router builder exposing the fill, analysis, and sample endpoints.
pub fn forms_router(service: Arc<FormFillService>) -> Router {
    Router::new()
        .route("/api/v1/forms", get(info_handler))
        .route("/api/v1/forms/sample", get(sample_handler))
        .route("/api/v1/forms/fields", get(fields_handler))
        .route("/api/v1/forms/analyze", get(analyze_handler))
        .route("/api/v1/forms/fill", post(fill_handler))
        .route("/api/v1/forms/fill/heuristic", post(heuristic_fill_handler))
        .route("/api/v1/forms/fill/table", post(table_fill_handler))
        .with_state(service)
}

pub(crate) async fn info_handler(State(service): State<Arc<FormFillService>>) -> Response {
    let payload = json!({
        "service": "wohngeld-forms",
        "template": service.template_source(None).to_string(),
        "outputDir": service.output_dir().display().to_string(),
        "strategies": ["direct", "heuristic"],
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn sample_handler() -> Response {
    (StatusCode::OK, axum::Json(ApplicationData::sample())).into_response()
}

pub(crate) async fn fields_handler(
    State(service): State<Arc<FormFillService>>,
    Query(query): Query<TemplateQuery>,
) -> Response {
    let names = run_blocking(move || service.field_names(query.template_path.as_deref())).await;
    match names {
        Ok(names) => {
            let payload = json!({
                "count": names.len(),
                "fields": names,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn analyze_handler(
    State(service): State<Arc<FormFillService>>,
    Query(query): Query<TemplateQuery>,
) -> Response {
    let analysis = run_blocking(move || {
        let report = service.analyze(query.template_path.as_deref(), None)?;
        Ok(AnalysisResponse {
            report: report.render_text(),
            analysis: report,
        })
    })
    .await;
    match analysis {
        Ok(payload) => (StatusCode::OK, axum::Json(payload)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn fill_handler(
    State(service): State<Arc<FormFillService>>,
    Query(query): Query<TemplateQuery>,
    axum::Json(data): axum::Json<ApplicationData>,
) -> Response {
    created(run_blocking(move || service.fill(&data, query.template_path.as_deref())).await)
}

pub(crate) async fn heuristic_fill_handler(
    State(service): State<Arc<FormFillService>>,
    Query(query): Query<TemplateQuery>,
    axum::Json(data): axum::Json<ApplicationData>,
) -> Response {
    created(
        run_blocking(move || service.fill_heuristic(&data, query.template_path.as_deref())).await,
    )
}

pub(crate) async fn table_fill_handler(
    State(service): State<Arc<FormFillService>>,
    Query(query): Query<TemplateQuery>,
    axum::Json(request): axum::Json<TableFillRequest>,
) -> Response {
    let table: FieldTable = request.fields.into_iter().collect();
    let last_name = request.last_name;
    created(
        run_blocking(move || {
            service.fill_with_table(table, query.template_path.as_deref(), &last_name)
        })
        .await,
    )
}

/// Template reads and output writes are file I/O; keep them off the async workers.
async fn run_blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, FormsError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await??)
}

fn created(result: Result<FillSummary, AppError>) -> Response {
    match result {
        Ok(summary) => (StatusCode::CREATED, axum::Json(summary)).into_response(),
        Err(error) => error.into_response(),
    }
}
