use super::common::*;
use crate::forms::domain::IncomeEntry;
use crate::forms::{classify, Amount, Binder, Category, FieldValue, HeuristicBinder};

#[test]
fn divorced_applicant_checks_only_the_divorced_box() {
    let mut data = sample();
    data.applicant.marital_status = Some("divorced".to_string());

    let answers: Vec<Option<FieldValue>> = [
        "MZ1.3-CB_PersAngFamStand.ledig",
        "MZ1.3-CB_PersAngFamStand.verheiratet",
        "MZ1.3-CB_PersAngFamStand.geschieden",
    ]
    .into_iter()
    .map(|name| resolved(&checkbox(name), &data))
    .collect();

    assert_eq!(
        answers,
        vec![
            Some(FieldValue::Checkbox(false)),
            Some(FieldValue::Checkbox(false)),
            Some(FieldValue::Checkbox(true)),
        ]
    );
}

#[test]
fn total_rent_uses_german_decimal_comma() {
    let data = sample();
    assert_eq!(
        resolved(&text_field("MZ1.3-ET_MieteGesamt"), &data),
        Some(FieldValue::text("463,25"))
    );
}

#[test]
fn iban_fills_one_character_per_box() {
    let data = sample();
    let chars: Vec<Option<FieldValue>> = (1..=33)
        .map(|position| resolved(&text_field(&format!("MZ1.3-AN_IBAN{position}")), &data))
        .collect();

    assert_eq!(chars[0], Some(FieldValue::text("D")));
    assert_eq!(chars[1], Some(FieldValue::text("E")));
    assert_eq!(chars[4], Some(FieldValue::text("3")));
    assert_eq!(chars[21], Some(FieldValue::text("0")));
    assert!(chars[22..].iter().all(Option::is_none));
    assert!(chars
        .iter()
        .flatten()
        .all(|value| value != &FieldValue::text(" ")));
}

#[test]
fn only_supplied_income_entries_are_bound() {
    let data = sample();
    assert_eq!(data.income.entries.len(), 2);

    let slot = |name: &str| resolved(&text_field(name), &data);
    assert_eq!(
        slot("MZ1.3-ET_EinnahmeHHM1Art1"),
        Some(FieldValue::text("Erwerbsminderungsrente"))
    );
    assert_eq!(slot("MZ1.3-ET_EinnahmeHHM1Art2Brutto"), Some(FieldValue::text("38,49")));
    assert_eq!(slot("MZ1.3-ET_EinnahmeHHM1Art2Turnus"), Some(FieldValue::text("monatlich")));
    for n in 3..=4 {
        for suffix in ["", "Brutto", "Turnus"] {
            assert_eq!(slot(&format!("MZ1.3-ET_EinnahmeHHM1Art{n}{suffix}")), None);
        }
    }
}

#[test]
fn yearly_income_is_labelled_and_summed_monthly() {
    let mut data = sample();
    data.income.entries = vec![IncomeEntry {
        kind: "Nebenjob".to_string(),
        gross_amount: Some(Amount::Text("1.200,00".to_string())),
        frequency: Some("JÄHRLICH".to_string()),
    }];

    assert_eq!(
        resolved(&text_field("MZ1.3-ET_EinnahmeHHM1Art1Turnus"), &data),
        Some(FieldValue::text("jährlich"))
    );
    assert_eq!(
        resolved(&text_field("MZ1.3-ET_EinnahmeHHM1Art1Brutto"), &data),
        Some(FieldValue::text("1200,00"))
    );
    assert_eq!(data.income.gross_monthly().expect("parses"), Some(100.0));
}

#[test]
fn co_applicant_fields_are_never_filled() {
    let data = sample();
    for name in [
        "MZ2.B.ET_HHM2Familienname",
        "MZ2.B.CB_HHM2FamStandverheiratet",
        "Person3_Vorname",
        "Antrag.Geburtsdatum_2",
        "EhegatteVorname",
    ] {
        let field = if name.contains("CB_") {
            checkbox(name)
        } else {
            text_field(name)
        };
        assert!(field.person_index > 1, "{name}");
        assert_eq!(resolved(&field, &data), None, "{name}");
    }
}

#[test]
fn exclusive_groups_check_at_most_one_box() {
    let fields = bundled_fields();
    let table = HeuristicBinder::new(&sample()).bind_all(&fields);

    let groups = [
        "PersAngGeschlecht",
        "PersAngFamStand",
        "PersAngErwerb",
        "IchBinHauptmieter|IchBinUntermieter|IchBinHeimbewohner|IchBinBewohnerMehr",
        "AllgAntragstyp",
        "MonatMieteHeizkostem",
        "MonatMieteWarmwasser",
        "MonatMieteGarage",
    ];
    for group in groups {
        let checked = table
            .iter()
            .filter(|binding| {
                group
                    .split('|')
                    .any(|member| binding.field_name.contains(member))
            })
            .filter(|binding| binding.value == FieldValue::Checkbox(true))
            .count();
        assert!(checked <= 1, "{group} checked {checked} boxes");
    }

    assert_eq!(
        table.get("MZ1.3-CB_PersAngFamStandgeschieden"),
        Some(&FieldValue::Checkbox(true))
    );
    assert_eq!(
        table.get("MZ1.3-CB_MonatMieteHeizkostemJaGesond"),
        Some(&FieldValue::Checkbox(true))
    );
}

#[test]
fn consent_box_follows_the_consent_answer() {
    let descriptor = bundled_fields()
        .into_iter()
        .find(|field| field.name == "MZ1.3-CB_HinweisAbfrage")
        .expect("bundled consent box");
    let field = classify(&descriptor);
    assert_eq!(field.category, Category::ApplicationMeta);

    let mut data = sample();
    assert_eq!(resolved(&field, &data), Some(FieldValue::Checkbox(true)));
    data.application.consent = false;
    assert_eq!(resolved(&field, &data), Some(FieldValue::Checkbox(false)));

    assert_eq!(
        checkbox("MZ1.3-CB_EinverstKontoauszuege").category,
        Category::Bank
    );
}

#[test]
fn unparseable_attribute_skips_only_the_affected_fields() {
    let mut data = sample();
    data.applicant.gender = Some("unbekannt".to_string());
    data.rent.total = Some(Amount::Text("viel".to_string()));

    assert_eq!(resolved(&checkbox("MZ1.3-CB_PersAngGeschlechtWeiblich"), &data), None);
    assert_eq!(resolved(&text_field("MZ1.3-ET_MieteGesamt"), &data), None);
    assert_eq!(
        resolved(&text_field("MZ1.3-ET_PersAngFamilienname"), &data),
        Some(FieldValue::text("Beispiel"))
    );
}

#[test]
fn resolving_twice_gives_the_same_table() {
    let fields = bundled_fields();
    let data = sample();
    let binder = HeuristicBinder::new(&data);
    assert_eq!(binder.bind_all(&fields), binder.bind_all(&fields));
}
