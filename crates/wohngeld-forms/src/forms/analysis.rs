use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::binder::{Binder, HeuristicBinder};
use super::classifier::{classify, Category, ClassifiedField};
use super::document::FieldKind;
use super::domain::ApplicationData;
use super::inventory::FieldDescriptor;
use super::table::FieldTable;

/// Diagnostic view of a template for onboarding new form layouts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub total_fields: usize,
    pub fields_by_category: BTreeMap<Category, Vec<FieldView>>,
    pub fields_by_section: BTreeMap<u32, Vec<FieldView>>,
    pub recommended_mapping: FieldTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: FieldKind,
    pub is_checkbox: bool,
    pub person_index: u32,
    pub section_number: u32,
}

impl From<&ClassifiedField> for FieldView {
    fn from(field: &ClassifiedField) -> Self {
        Self {
            name: field.descriptor.name.clone(),
            declared_type: field.descriptor.declared_type,
            is_checkbox: field.descriptor.is_checkbox,
            person_index: field.person_index,
            section_number: field.section_number,
        }
    }
}

impl AnalysisReport {
    pub fn build(fields: &[FieldDescriptor], data: &ApplicationData) -> Self {
        let mut fields_by_category: BTreeMap<Category, Vec<FieldView>> = BTreeMap::new();
        let mut fields_by_section: BTreeMap<u32, Vec<FieldView>> = BTreeMap::new();

        for field in fields.iter().map(classify) {
            let view = FieldView::from(&field);
            if field.section_number > 0 {
                fields_by_section
                    .entry(field.section_number)
                    .or_default()
                    .push(view.clone());
            }
            fields_by_category.entry(field.category).or_default().push(view);
        }

        Self {
            total_fields: fields.len(),
            fields_by_category,
            fields_by_section,
            recommended_mapping: HeuristicBinder::new(data).bind_all(fields),
        }
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== FORM FIELD ANALYSIS ===")?;
        writeln!(f)?;
        writeln!(f, "Total: {} fields", self.total_fields)?;
        writeln!(f)?;

        writeln!(f, "--- By category ---")?;
        for (category, fields) in &self.fields_by_category {
            writeln!(f, "{}: {} fields", category.as_str(), fields.len())?;
            for field in fields {
                writeln!(f, "  - {} [{}]", field.name, field.declared_type.as_str())?;
            }
        }

        if !self.fields_by_section.is_empty() {
            writeln!(f)?;
            writeln!(f, "--- By section ---")?;
            for (section, fields) in &self.fields_by_section {
                writeln!(f, "Section {section}: {} fields", fields.len())?;
            }
        }

        writeln!(f)?;
        writeln!(f, "--- Recommended mapping ---")?;
        for binding in self.recommended_mapping.iter() {
            writeln!(f, "{} = {}", binding.field_name, binding.value)?;
        }
        Ok(())
    }
}
