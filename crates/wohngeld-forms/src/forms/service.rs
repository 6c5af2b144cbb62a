use chrono::Local;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use super::analysis::AnalysisReport;
use super::binder::{Binder, DirectTableBinder, HeuristicBinder};
use super::document::JsonFormDocument;
use super::domain::ApplicationData;
use super::engine::{fill, FillSummary};
use super::inventory::extract;
use super::normalizer::normalize;
use super::table::FieldTable;
use super::FormsError;
use crate::config::FormsConfig;

const BUNDLED_TEMPLATE: &str = include_str!("../../templates/mietzuschuss.json");
const OUTPUT_PREFIX: &str = "wohngeldantrag";

/// Where a template was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Bundled,
    File(PathBuf),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Bundled => f.write_str("bundled"),
            TemplateSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Entry point for filling and analysing forms.
#[derive(Debug, Clone)]
pub struct FormFillService {
    config: FormsConfig,
}

impl FormFillService {
    pub fn new(config: FormsConfig) -> Self {
        Self { config }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// An explicit path wins over the configured default; without either the
    /// bundled template is used.
    pub fn template_source(&self, template: Option<&Path>) -> TemplateSource {
        template
            .or(self.config.template_path.as_deref())
            .map(|path| TemplateSource::File(path.to_path_buf()))
            .unwrap_or(TemplateSource::Bundled)
    }

    pub fn load_template(&self, template: Option<&Path>) -> Result<JsonFormDocument, FormsError> {
        let source = self.template_source(template);
        info!(template = %source, "loading form template");
        let document = match &source {
            TemplateSource::Bundled => JsonFormDocument::from_json_str(BUNDLED_TEMPLATE)?,
            TemplateSource::File(path) => JsonFormDocument::open(path)?,
        };
        Ok(document)
    }

    pub fn field_names(&self, template: Option<&Path>) -> Result<Vec<String>, FormsError> {
        let form = self.load_template(template)?;
        Ok(extract(&form)?.into_iter().map(|field| field.name).collect())
    }

    /// Validates the data and fills the template through the direct field table.
    pub fn fill(
        &self,
        data: &ApplicationData,
        template: Option<&Path>,
    ) -> Result<FillSummary, FormsError> {
        data.validate()?;
        let binder = DirectTableBinder::from_application(data);
        self.fill_with(&binder, template, &data.applicant.last_name)
    }

    /// Fills the template from a precomputed field table.
    pub fn fill_with_table(
        &self,
        table: FieldTable,
        template: Option<&Path>,
        last_name: &str,
    ) -> Result<FillSummary, FormsError> {
        self.fill_with(&DirectTableBinder::new(table), template, last_name)
    }

    /// Classification-based fill for templates without a curated table.
    pub fn fill_heuristic(
        &self,
        data: &ApplicationData,
        template: Option<&Path>,
    ) -> Result<FillSummary, FormsError> {
        data.validate()?;
        let binder = HeuristicBinder::new(data);
        self.fill_with(&binder, template, &data.applicant.last_name)
    }

    /// Classification report; the recommended mapping uses the sample data
    /// when no application is supplied.
    pub fn analyze(
        &self,
        template: Option<&Path>,
        data: Option<&ApplicationData>,
    ) -> Result<AnalysisReport, FormsError> {
        let form = self.load_template(template)?;
        let fields = extract(&form)?;
        let report = match data {
            Some(data) => AnalysisReport::build(&fields, data),
            None => AnalysisReport::build(&fields, &ApplicationData::sample()),
        };
        info!(fields = report.total_fields, "analysed form template");
        Ok(report)
    }

    fn fill_with(
        &self,
        binder: &dyn Binder,
        template: Option<&Path>,
        last_name: &str,
    ) -> Result<FillSummary, FormsError> {
        let mut form = self.load_template(template)?;
        let destination = self.config.output_dir.join(output_filename(last_name));
        fill(&mut form, binder, &destination)
    }
}

/// `wohngeldantrag_<name>_<yyyyMMdd_HHmmss>.json`, name reduced to `[a-z0-9]`.
pub fn output_filename(last_name: &str) -> String {
    let name = normalize(last_name);
    let name = if name.is_empty() { "antrag".to_string() } else { name };
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{OUTPUT_PREFIX}_{name}_{timestamp}.json")
}
