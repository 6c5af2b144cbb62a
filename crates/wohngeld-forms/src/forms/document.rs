use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use super::{FormReadError, FormWriteError};

const CHECKED: &str = "Yes";
const UNCHECKED: &str = "Off";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Checkbox,
    Date,
    Multiline,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Multiline => "multiline",
        }
    }
}

/// One node of a form's field hierarchy. Nodes with kids are containers whose
/// partial name prefixes the names of their descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub max_len: Option<usize>,
    #[serde(default)]
    pub kids: Vec<FieldNode>,
}

impl FieldNode {
    pub fn leaf(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: None,
            read_only: false,
            max_len: None,
            kids: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kids.is_empty()
    }

    pub fn is_checked(&self) -> bool {
        self.kind == FieldKind::Checkbox && self.value.as_deref() == Some(CHECKED)
    }
}

/// Joins a parent's qualified name with a child's partial name.
pub(crate) fn qualify(parent: &str, partial: &str) -> String {
    match (parent.is_empty(), partial.is_empty()) {
        (true, _) => partial.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{parent}.{partial}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldWriteError {
    #[error("no field named '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is read-only")]
    ReadOnly(String),
    #[error("field '{name}' is a {actual} field, not {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("value for '{name}' has {len} characters, field allows {max_len}")]
    TooLong {
        name: String,
        max_len: usize,
        len: usize,
    },
}

/// Read/write access to an interactive form's named fields.
pub trait FormDocument {
    /// The field hierarchy, or `None` when the document carries no catalogue.
    fn field_tree(&self) -> Option<&[FieldNode]>;

    fn write_text(&mut self, name: &str, value: &str) -> Result<(), FieldWriteError>;

    fn check(&mut self, name: &str) -> Result<(), FieldWriteError>;

    fn persist(&self, out: &mut dyn Write) -> Result<(), FormWriteError>;
}

/// Form template stored as a JSON field tree or a flat CSV field listing.
#[derive(Debug, Clone)]
pub struct JsonFormDocument {
    fields: Option<Vec<FieldNode>>,
    index: HashMap<String, Vec<usize>>,
}

impl JsonFormDocument {
    pub fn open(path: &Path) -> Result<Self, FormReadError> {
        if !path.is_file() {
            return Err(FormReadError::NotFound(path.to_path_buf()));
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let io_error = |source| FormReadError::Io {
            path: path.to_path_buf(),
            source,
        };

        match extension.as_str() {
            "json" => {
                let raw = fs::read_to_string(path).map_err(io_error)?;
                Self::from_json_str(&raw)
            }
            "csv" => {
                let file = fs::File::open(path).map_err(io_error)?;
                Self::from_csv_reader(file)
            }
            other => Err(FormReadError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parses `{"fields": [...]}`. A document without a `fields` key loads with no catalogue.
    pub fn from_json_str(raw: &str) -> Result<Self, FormReadError> {
        let template: TemplateFile = serde_json::from_str(raw)?;
        Ok(Self::build(template.fields))
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, FormReadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut nodes = Vec::new();
        for row in csv_reader.deserialize::<CsvFieldRow>() {
            let row = row?;
            nodes.push(FieldNode {
                value: row.value,
                ..FieldNode::leaf(row.name, row.kind)
            });
        }
        Ok(Self::build(Some(nodes)))
    }

    pub fn from_nodes(nodes: Vec<FieldNode>) -> Self {
        Self::build(Some(nodes))
    }

    /// Current value of a field by fully qualified name.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.node(name).and_then(|node| node.value.as_deref())
    }

    pub fn is_checked(&self, name: &str) -> bool {
        self.node(name).is_some_and(FieldNode::is_checked)
    }

    fn build(fields: Option<Vec<FieldNode>>) -> Self {
        let mut index = HashMap::new();
        if let Some(nodes) = &fields {
            let mut path = Vec::new();
            index_nodes(nodes, "", &mut path, &mut index);
        }
        Self { fields, index }
    }

    fn node(&self, name: &str) -> Option<&FieldNode> {
        let path = self.index.get(name)?;
        let (first, rest) = path.split_first()?;
        let mut node = self.fields.as_ref()?.get(*first)?;
        for position in rest {
            node = node.kids.get(*position)?;
        }
        Some(node)
    }

    fn writable(&mut self, name: &str) -> Result<&mut FieldNode, FieldWriteError> {
        let unknown = || FieldWriteError::UnknownField(name.to_string());
        let path = self.index.get(name).ok_or_else(unknown)?;
        let (first, rest) = path.split_first().ok_or_else(unknown)?;
        let mut node = self
            .fields
            .as_mut()
            .and_then(|nodes| nodes.get_mut(*first))
            .ok_or_else(unknown)?;
        for position in rest {
            node = node.kids.get_mut(*position).ok_or_else(unknown)?;
        }
        if node.read_only {
            return Err(FieldWriteError::ReadOnly(name.to_string()));
        }
        Ok(node)
    }
}

fn index_nodes(
    nodes: &[FieldNode],
    parent: &str,
    path: &mut Vec<usize>,
    index: &mut HashMap<String, Vec<usize>>,
) {
    for (position, node) in nodes.iter().enumerate() {
        path.push(position);
        let name = qualify(parent, &node.name);
        if node.is_leaf() {
            index.entry(name).or_insert_with(|| path.clone());
        } else {
            index_nodes(&node.kids, &name, path, index);
        }
        path.pop();
    }
}

fn collect_values(
    nodes: &[FieldNode],
    parent: &str,
    out: &mut serde_json::Map<String, serde_json::Value>,
) {
    for node in nodes {
        let name = qualify(parent, &node.name);
        if !node.is_leaf() {
            collect_values(&node.kids, &name, out);
            continue;
        }
        let value = match (node.kind, node.value.as_deref()) {
            (FieldKind::Checkbox, Some(CHECKED)) => CHECKED.into(),
            (FieldKind::Checkbox, _) => UNCHECKED.into(),
            (_, Some(text)) => text.into(),
            (_, None) => serde_json::Value::Null,
        };
        out.entry(name).or_insert(value);
    }
}

impl FormDocument for JsonFormDocument {
    fn field_tree(&self) -> Option<&[FieldNode]> {
        self.fields.as_deref()
    }

    fn write_text(&mut self, name: &str, value: &str) -> Result<(), FieldWriteError> {
        let node = self.writable(name)?;
        if node.kind == FieldKind::Checkbox {
            return Err(FieldWriteError::TypeMismatch {
                name: name.to_string(),
                expected: "text",
                actual: node.kind.as_str(),
            });
        }
        let len = value.chars().count();
        if let Some(max_len) = node.max_len.filter(|max_len| len > *max_len) {
            return Err(FieldWriteError::TooLong {
                name: name.to_string(),
                max_len,
                len,
            });
        }
        node.value = Some(value.to_string());
        Ok(())
    }

    fn check(&mut self, name: &str) -> Result<(), FieldWriteError> {
        let node = self.writable(name)?;
        if node.kind != FieldKind::Checkbox {
            return Err(FieldWriteError::TypeMismatch {
                name: name.to_string(),
                expected: "checkbox",
                actual: node.kind.as_str(),
            });
        }
        node.value = Some(CHECKED.to_string());
        Ok(())
    }

    fn persist(&self, out: &mut dyn Write) -> Result<(), FormWriteError> {
        let mut values = serde_json::Map::new();
        if let Some(nodes) = &self.fields {
            collect_values(nodes, "", &mut values);
        }
        serde_json::to_writer_pretty(&mut *out, &values)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    fields: Option<Vec<FieldNode>>,
}

#[derive(Debug, Deserialize)]
struct CsvFieldRow {
    name: String,
    #[serde(rename = "type", default)]
    kind: FieldKind,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
