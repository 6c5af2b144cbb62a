use crate::forms::classifier::Category;
use crate::forms::domain::ApplicationData;
use crate::forms::values::{format_money, MalformedValue};

/// Income entry slots the form provides per household member.
pub const MAX_INCOME_ENTRIES: usize = 4;

/// Single-character IBAN boxes on the form.
pub const IBAN_POSITIONS: usize = 33;

/// Repeated or character-split fields. `None` means the field is not part of
/// a series; `Some(Ok(None))` is a slot left empty.
pub(super) fn resolve(
    category: Category,
    normalized: &str,
    data: &ApplicationData,
) -> Option<Result<Option<String>, MalformedValue>> {
    match category {
        Category::Income => {
            let (slot, rest) = indexed(normalized, "art")?;
            Some(income_slot(data, slot, rest))
        }
        Category::Bank => {
            let (position, _) = indexed(normalized, "iban")?;
            Some(Ok(iban_char(data, position)))
        }
        _ => None,
    }
}

/// Number directly after the last occurrence of `marker`, with the remainder of the name.
fn indexed<'a>(normalized: &'a str, marker: &str) -> Option<(usize, &'a str)> {
    let start = normalized.rfind(marker)? + marker.len();
    let tail = &normalized[start..];
    let digits = tail.bytes().take_while(u8::is_ascii_digit).count();
    let number = tail[..digits].parse::<usize>().ok()?;
    Some((number, &tail[digits..]))
}

fn income_slot(
    data: &ApplicationData,
    slot: usize,
    rest: &str,
) -> Result<Option<String>, MalformedValue> {
    if slot == 0 || slot > MAX_INCOME_ENTRIES {
        return Ok(None);
    }
    let Some(entry) = data.income.entries.get(slot - 1) else {
        return Ok(None);
    };

    if rest.contains("brutto") || rest.contains("betrag") {
        Ok(entry.gross()?.map(format_money))
    } else if rest.contains("turnus") {
        Ok(Some(entry.frequency().label().to_string()))
    } else if rest.is_empty() {
        Ok(super::present(&entry.kind))
    } else {
        Ok(None)
    }
}

fn iban_char(data: &ApplicationData, position: usize) -> Option<String> {
    if position == 0 || position > IBAN_POSITIONS {
        return None;
    }
    data.bank
        .compact_iban()
        .chars()
        .nth(position - 1)
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::domain::IncomeEntry;
    use crate::forms::normalize;
    use crate::forms::values::Amount;

    fn slot(name: &str, data: &ApplicationData) -> Option<String> {
        resolve(Category::Income, &normalize(name), data)
            .expect("series field")
            .expect("well-formed")
    }

    #[test]
    fn binds_income_entries_positionally() {
        let data = ApplicationData::sample();
        assert_eq!(
            slot("MZ1.3-ET_EinnahmeHHM1Art1", &data).as_deref(),
            Some("Erwerbsminderungsrente")
        );
        assert_eq!(slot("MZ1.3-ET_EinnahmeHHM1Art1Brutto", &data).as_deref(), Some("855,42"));
        assert_eq!(slot("MZ1.3-ET_EinnahmeHHM1Art2Turnus", &data).as_deref(), Some("monatlich"));
        assert_eq!(slot("MZ1.3-ET_EinnahmeHHM1Art3", &data), None);
        assert_eq!(slot("MZ1.3-ET_EinnahmeHHM1Art4Brutto", &data), None);
    }

    #[test]
    fn entries_beyond_capacity_are_dropped() {
        let mut data = ApplicationData::sample();
        data.income.entries = (1..=6)
            .map(|n| IncomeEntry {
                kind: format!("Einnahme {n}"),
                gross_amount: Some(Amount::Number(f64::from(n) * 10.0)),
                frequency: None,
            })
            .collect();
        assert_eq!(slot("Einnahme.Art4", &data).as_deref(), Some("Einnahme 4"));
        assert_eq!(slot("Einnahme.Art5", &data), None);
    }

    #[test]
    fn non_series_fields_fall_through() {
        let data = ApplicationData::sample();
        assert!(resolve(Category::Income, "einnahmekindergeld", &data).is_none());
        assert!(resolve(Category::Rent, "mz13etmietegesamt", &data).is_none());
    }

    #[test]
    fn iban_is_split_per_character() {
        let data = ApplicationData::sample();
        let char_at = |position: usize| {
            resolve(Category::Bank, &normalize(&format!("MZ1.3-AN_IBAN{position}")), &data)
                .expect("series field")
                .expect("infallible")
        };
        assert_eq!(char_at(1).as_deref(), Some("D"));
        assert_eq!(char_at(2).as_deref(), Some("E"));
        assert_eq!(char_at(5).as_deref(), Some("3"));
        assert_eq!(char_at(22).as_deref(), Some("0"));
        assert_eq!(char_at(23), None);
        assert_eq!(char_at(33), None);
    }
}
