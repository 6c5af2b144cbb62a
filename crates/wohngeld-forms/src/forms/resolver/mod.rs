//! Value resolution for classified fields.
//!
//! `resolve` returns `None` whenever no rule determines the value; the caller
//! leaves such fields untouched. Only the primary applicant is filled.

mod checkbox;
mod series;
mod text;

use tracing::warn;

use super::classifier::{Category, ClassifiedField};
use super::domain::ApplicationData;
use super::values::{FieldValue, MalformedValue};

pub use series::{IBAN_POSITIONS, MAX_INCOME_ENTRIES};

pub fn resolve(field: &ClassifiedField, data: &ApplicationData) -> Option<FieldValue> {
    if field.person_index > 1 || field.category == Category::Other {
        return None;
    }

    match resolve_value(field, data) {
        Ok(value) => value,
        Err(err) => {
            warn!(field = %field.name(), error = %err, "skipping field with malformed value");
            None
        }
    }
}

fn resolve_value(
    field: &ClassifiedField,
    data: &ApplicationData,
) -> Result<Option<FieldValue>, MalformedValue> {
    let name = field.normalized_name();
    if field.descriptor.is_checkbox {
        return Ok(checkbox::resolve(field.category, name, data)?.map(FieldValue::Checkbox));
    }

    if let Some(series) = series::resolve(field.category, name, data) {
        return Ok(series?.map(FieldValue::Text));
    }
    Ok(text::resolve(field.category, name, data)?.map(FieldValue::Text))
}

/// Trimmed, non-empty text.
fn present(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn present_opt(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(present)
}
