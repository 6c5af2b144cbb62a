//! Form field classification and data binding for the Wohngeld rent subsidy form.
//!
//! A fill runs the form's field inventory through a [`Binder`]: either the
//! curated direct table keyed by the form's canonical field names, or the
//! heuristic classifier/resolver pair used for unknown templates. The engine
//! applies the resulting values and persists the document in one step.

pub mod analysis;
pub mod binder;
pub mod classifier;
pub mod document;
pub mod domain;
pub mod engine;
pub mod inventory;
pub(crate) mod normalizer;
pub mod resolver;
pub mod router;
pub mod service;
pub mod table;
pub mod values;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

pub use analysis::{AnalysisReport, FieldView};
pub use binder::{Binder, DirectTableBinder, HeuristicBinder};
pub use classifier::{classify, Category, ClassifiedField};
pub use document::{FieldKind, FieldNode, FieldWriteError, FormDocument, JsonFormDocument};
pub use domain::{ApplicationData, ValidationError};
pub use engine::{fill, FillSummary};
pub use inventory::{extract, FieldDescriptor};
pub use normalizer::normalize;
pub use resolver::resolve;
pub use router::forms_router;
pub use service::{output_filename, FormFillService, TemplateSource};
pub use table::{FieldBinding, FieldTable};
pub use values::{Amount, FieldValue, MalformedValue};

/// Failure surfaced to callers of a fill or analysis.
#[derive(Debug, thiserror::Error)]
pub enum FormsError {
    #[error(transparent)]
    FormRead(#[from] FormReadError),
    #[error(transparent)]
    FormWrite(#[from] FormWriteError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The template could not be located, parsed, or carries no field catalogue.
#[derive(Debug, thiserror::Error)]
pub enum FormReadError {
    #[error("form template not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read form template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("form template is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form field listing is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("form template has no field catalogue")]
    MissingCatalogue,
    #[error("unsupported form template format: {0}")]
    UnsupportedFormat(String),
}

/// The filled document could not be persisted.
#[derive(Debug, thiserror::Error)]
pub enum FormWriteError {
    #[error("failed to write filled form {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode filled form: {0}")]
    Encode(#[from] serde_json::Error),
}
