use std::collections::HashMap;
use tracing::warn;

use super::classifier::classify;
use super::domain::ApplicationData;
use super::inventory::FieldDescriptor;
use super::normalizer::normalize;
use super::resolver::{resolve, MAX_INCOME_ENTRIES};
use super::table::FieldTable;
use super::values::FieldValue;

/// Strategy deciding the value of each form field.
pub trait Binder {
    fn strategy(&self) -> &'static str;

    /// `None` leaves the field untouched.
    fn value_for(&self, field: &FieldDescriptor) -> Option<FieldValue>;

    /// Every determined value for the given inventory.
    fn bind_all(&self, fields: &[FieldDescriptor]) -> FieldTable {
        fields
            .iter()
            .filter_map(|field| {
                self.value_for(field)
                    .map(|value| (field.name.clone(), value))
            })
            .collect()
    }
}

/// Looks values up in a curated table, by exact name and then by normalized
/// name so encoding drift between table and form does not lose fields.
pub struct DirectTableBinder {
    table: FieldTable,
    normalized: HashMap<String, usize>,
}

impl DirectTableBinder {
    pub fn new(table: FieldTable) -> Self {
        let normalized = table.normalized_index();
        Self { table, normalized }
    }

    pub fn from_application(data: &ApplicationData) -> Self {
        Self::new(FieldTable::from_application(data))
    }

    pub fn table(&self) -> &FieldTable {
        &self.table
    }
}

impl Binder for DirectTableBinder {
    fn strategy(&self) -> &'static str {
        "direct"
    }

    fn value_for(&self, field: &FieldDescriptor) -> Option<FieldValue> {
        if let Some(value) = self.table.get(&field.name) {
            return Some(value.clone());
        }
        self.normalized
            .get(&normalize(&field.name))
            .and_then(|&position| self.table.binding(position))
            .map(|binding| binding.value.clone())
    }
}

/// Classifies each field and resolves it against the application data.
pub struct HeuristicBinder<'a> {
    data: &'a ApplicationData,
}

impl<'a> HeuristicBinder<'a> {
    pub fn new(data: &'a ApplicationData) -> Self {
        if data.income.entries.len() > MAX_INCOME_ENTRIES {
            warn!(
                entries = data.income.entries.len(),
                capacity = MAX_INCOME_ENTRIES,
                "income entries beyond form capacity will not be bound"
            );
        }
        Self { data }
    }
}

impl Binder for HeuristicBinder<'_> {
    fn strategy(&self) -> &'static str {
        "heuristic"
    }

    fn value_for(&self, field: &FieldDescriptor) -> Option<FieldValue> {
        resolve(&classify(field), self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::document::FieldKind;

    #[test]
    fn direct_binder_tolerates_encoding_drift() {
        let binder = DirectTableBinder::from_application(&ApplicationData::sample());
        let exact = FieldDescriptor::new("MZ1.3-ET_WohnungAnschriftStraße", FieldKind::Text);
        let garbled = FieldDescriptor::new("MZ1.3-ET_WohnungAnschriftStraÃŸe", FieldKind::Text);

        assert_eq!(
            binder.value_for(&exact),
            Some(FieldValue::text("Heilig-Geist-Str."))
        );
        assert_eq!(binder.value_for(&garbled), binder.value_for(&exact));
        assert_eq!(
            binder.value_for(&FieldDescriptor::new("Bemerkungen", FieldKind::Multiline)),
            None
        );
    }

    #[test]
    fn heuristic_binder_skips_co_applicants() {
        let data = ApplicationData::sample();
        let binder = HeuristicBinder::new(&data);
        let own = FieldDescriptor::new("MZ1.3-ET_EinnahmeHHM1Vorname", FieldKind::Text);
        let other = FieldDescriptor::new("MZ1.3-ET_EinnahmeHHM2Vorname", FieldKind::Text);

        assert_eq!(binder.value_for(&own), Some(FieldValue::text("Maria")));
        assert_eq!(binder.value_for(&other), None);
        assert_eq!(binder.strategy(), "heuristic");
    }
}
