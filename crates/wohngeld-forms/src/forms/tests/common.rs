use std::path::Path;
use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use serde_json::{Map, Value};

use crate::config::FormsConfig;
use crate::forms::{
    classify, extract, forms_router, resolve, ApplicationData, ClassifiedField, FieldDescriptor,
    FieldKind, FieldValue, FillSummary, FormFillService, JsonFormDocument,
};

pub(super) const BUNDLED_TEMPLATE: &str = include_str!("../../../templates/mietzuschuss.json");

pub(super) fn sample() -> ApplicationData {
    ApplicationData::sample()
}

pub(super) fn checkbox(name: &str) -> ClassifiedField {
    classify(&FieldDescriptor::new(name, FieldKind::Checkbox))
}

pub(super) fn text_field(name: &str) -> ClassifiedField {
    classify(&FieldDescriptor::new(name, FieldKind::Text))
}

pub(super) fn resolved(field: &ClassifiedField, data: &ApplicationData) -> Option<FieldValue> {
    resolve(field, data)
}

pub(super) fn bundled_fields() -> Vec<FieldDescriptor> {
    let form = JsonFormDocument::from_json_str(BUNDLED_TEMPLATE).expect("bundled template parses");
    extract(&form).expect("bundled template has a catalogue")
}

pub(super) fn service_writing_to(output_dir: &Path) -> FormFillService {
    FormFillService::new(FormsConfig {
        template_path: None,
        output_dir: output_dir.to_path_buf(),
    })
}

pub(super) fn router_writing_to(output_dir: &Path) -> Router {
    forms_router(Arc::new(service_writing_to(output_dir)))
}

/// Flat name to value map written by a fill.
pub(super) fn written(summary: &FillSummary) -> Map<String, Value> {
    let raw = std::fs::read_to_string(&summary.output_path).expect("output written");
    serde_json::from_str(&raw).expect("output is a json object")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
