use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::binder::Binder;
use super::document::FormDocument;
use super::inventory::{extract, FieldDescriptor};
use super::values::FieldValue;
use super::{FormWriteError, FormsError};

/// Numbered siblings tried when the requested output name is taken.
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Outcome of one fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSummary {
    pub output_path: PathBuf,
    pub filename: String,
    pub strategy: &'static str,
    pub fields_found: usize,
    pub fields_filled: usize,
}

/// Applies the binder's values to every field of `form` and writes the result
/// to `destination`, or to `<stem>_<n>.<ext>` beside it when that name is
/// already taken. A field that cannot be written is logged and skipped; a
/// failure to persist fails the whole fill and leaves no output behind.
pub fn fill(
    form: &mut dyn FormDocument,
    binder: &dyn Binder,
    destination: &Path,
) -> Result<FillSummary, FormsError> {
    let fields = extract(form)?;
    let mut fields_filled = 0;

    for field in &fields {
        let Some(value) = binder.value_for(field) else {
            continue;
        };
        if apply(form, field, &value) {
            fields_filled += 1;
        }
    }

    let written = persist(form, destination)?;

    let filename = written
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!(
        strategy = binder.strategy(),
        fields_found = fields.len(),
        fields_filled,
        output = %written.display(),
        "filled form"
    );

    Ok(FillSummary {
        output_path: written,
        filename,
        strategy: binder.strategy(),
        fields_found: fields.len(),
        fields_filled,
    })
}

/// Writes one value; boxes are only ever checked, never cleared.
fn apply(form: &mut dyn FormDocument, field: &FieldDescriptor, value: &FieldValue) -> bool {
    let result = match (field.is_checkbox, value) {
        (true, value) if value.checks() => form.check(&field.name),
        (true, _) => return false,
        (false, FieldValue::Text(text)) if !text.trim().is_empty() => {
            form.write_text(&field.name, text)
        }
        (false, FieldValue::Text(_)) => return false,
        (false, FieldValue::Checkbox(_)) => {
            debug!(field = %field.name, "boolean value for a text field, leaving it untouched");
            return false;
        }
    };

    match result {
        Ok(()) => {
            debug!(field = %field.name, value = %value, "wrote field");
            true
        }
        Err(err) => {
            warn!(field = %field.name, error = %err, "skipping field that rejected its value");
            false
        }
    }
}

/// Stages the document in a temporary file beside `destination` and moves it
/// into place without replacing an existing file. The temporary file is
/// removed on every failure path.
fn persist(form: &dyn FormDocument, destination: &Path) -> Result<PathBuf, FormWriteError> {
    let directory = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |source| FormWriteError::Io {
        path: destination.to_path_buf(),
        source,
    };

    fs::create_dir_all(directory).map_err(io_error)?;
    let mut staged = tempfile::NamedTempFile::new_in(directory).map_err(io_error)?;
    {
        let mut writer = BufWriter::new(staged.as_file());
        form.persist(&mut writer)?;
        writer.flush().map_err(io_error)?;
    }
    staged.as_file().sync_all().map_err(io_error)?;

    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let target = numbered(destination, attempt);
        match staged.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(output = %target.display(), "output name taken, trying the next one");
                staged = err.file;
            }
            Err(err) => return Err(io_error(err.error)),
        }
    }
    Err(io_error(io::Error::new(
        io::ErrorKind::AlreadyExists,
        "no free output file name",
    )))
}

/// `antrag.json`, then `antrag_2.json`, `antrag_3.json`, ...
fn numbered(destination: &Path, attempt: u32) -> PathBuf {
    if attempt <= 1 {
        return destination.to_path_buf();
    }
    let stem = destination
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match destination.extension() {
        Some(extension) => format!("{stem}_{attempt}.{}", extension.to_string_lossy()),
        None => format!("{stem}_{attempt}"),
    };
    destination.with_file_name(name)
}
