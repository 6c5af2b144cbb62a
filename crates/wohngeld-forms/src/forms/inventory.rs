use serde::Serialize;
use tracing::{debug, warn};

use super::document::{qualify, FieldKind, FieldNode, FormDocument};
use super::FormReadError;

/// Snapshot of one leaf field as found in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: FieldKind,
    pub is_checkbox: bool,
    pub current_value: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: FieldKind) -> Self {
        Self {
            name: name.into(),
            declared_type,
            is_checkbox: declared_type == FieldKind::Checkbox,
            current_value: None,
        }
    }
}

/// Flattens the form's field tree into leaf descriptors in traversal order.
pub fn extract(form: &dyn FormDocument) -> Result<Vec<FieldDescriptor>, FormReadError> {
    let tree = form.field_tree().ok_or(FormReadError::MissingCatalogue)?;
    let mut descriptors = Vec::new();
    walk(tree, "", &mut descriptors);

    if descriptors.is_empty() {
        warn!("form template declares no fields");
    } else {
        debug!(fields = descriptors.len(), "extracted field inventory");
    }
    Ok(descriptors)
}

fn walk(nodes: &[FieldNode], parent: &str, out: &mut Vec<FieldDescriptor>) {
    for node in nodes {
        let name = qualify(parent, &node.name);
        if node.is_leaf() {
            out.push(FieldDescriptor {
                current_value: node.value.clone(),
                ..FieldDescriptor::new(name, node.kind)
            });
        } else {
            walk(&node.kids, &name, out);
        }
    }
}
