//! Keyword classification of form fields by name alone.

mod pattern;
mod rules;

use serde::Serialize;

use super::inventory::FieldDescriptor;
use super::normalizer::normalize;

pub(crate) use pattern::Pattern;
use rules::CATEGORY_RULES;

const MAX_SECTION: u32 = 20;
const MAX_PERSON: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Authority,
    ApplicationMeta,
    Person,
    Address,
    Housing,
    Rent,
    Income,
    EmploymentStatus,
    Bank,
    YesNo,
    Other,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Authority => "AUTHORITY",
            Category::ApplicationMeta => "APPLICATION_META",
            Category::Person => "PERSON",
            Category::Address => "ADDRESS",
            Category::Housing => "HOUSING",
            Category::Rent => "RENT",
            Category::Income => "INCOME",
            Category::EmploymentStatus => "EMPLOYMENT_STATUS",
            Category::Bank => "BANK",
            Category::YesNo => "YES_NO",
            Category::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedField {
    #[serde(flatten)]
    pub descriptor: FieldDescriptor,
    pub category: Category,
    /// 0 when unknown.
    pub section_number: u32,
    /// 0 unassigned, 1 primary applicant, 2+ other household members.
    pub person_index: u32,
    #[serde(skip)]
    pub(crate) normalized: String,
}

impl ClassifiedField {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized
    }
}

pub fn classify(descriptor: &FieldDescriptor) -> ClassifiedField {
    let normalized = normalize(&descriptor.name);
    let section_number = section_number(&descriptor.name, &normalized);
    let person_index = person_index(&descriptor.name, &normalized);
    let category = category(&normalized);

    ClassifiedField {
        descriptor: descriptor.clone(),
        category,
        section_number,
        person_index,
        normalized,
    }
}

pub(crate) fn category(normalized: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, pattern)| pattern.matches(normalized))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

fn section_number(raw: &str, normalized: &str) -> u32 {
    for marker in ["abschnitt", "section"] {
        if let Some(number) = number_after(normalized, marker, MAX_SECTION) {
            return number;
        }
    }

    let lowered = raw.to_lowercase();
    let segments: Vec<&str> = lowered.split('.').collect();
    segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .find_map(|segment| match segment.trim().as_bytes() {
            [letter @ b'a'..=b'e'] => Some(u32::from(letter - b'a') + 1),
            _ => None,
        })
        .unwrap_or(0)
}

fn person_index(raw: &str, normalized: &str) -> u32 {
    for marker in ["person", "haushaltsmitglied", "hhm"] {
        if let Some(number) = number_after(normalized, marker, MAX_PERSON) {
            return number;
        }
    }

    if let Some(number) = trailing_index(raw) {
        return number;
    }

    if normalized.contains("antragsteller") {
        return 1;
    }
    if normalized.contains("ehegatte")
        || (normalized.contains("partner") && !normalized.contains("lebenspartner"))
    {
        return 2;
    }
    0
}

/// First number in `1..=max` directly following an occurrence of `marker`.
pub(crate) fn number_after(normalized: &str, marker: &str, max: u32) -> Option<u32> {
    normalized.match_indices(marker).find_map(|(start, _)| {
        let digits: String = normalized[start + marker.len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits
            .parse::<u32>()
            .ok()
            .filter(|number| (1..=max).contains(number))
    })
}

/// `Name_3` or `Name.3`.
fn trailing_index(raw: &str) -> Option<u32> {
    let (_, tail) = raw.trim().rsplit_once(['_', '.'])?;
    if tail.is_empty() || !tail.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    tail.parse::<u32>()
        .ok()
        .filter(|number| (1..=MAX_PERSON).contains(number))
}
