use super::common::*;
use crate::forms::{FieldValue, FieldTable, FormReadError, FormsError};
use serde_json::Value;
use std::path::Path;

#[test]
fn direct_fill_writes_form_values() {
    let output = tempfile::tempdir().expect("tempdir");
    let service = service_writing_to(output.path());

    let summary = service.fill(&sample(), None).expect("fill succeeds");
    let values = written(&summary);

    assert_eq!(summary.strategy, "direct");
    assert_eq!(summary.fields_found, bundled_fields().len());
    assert!(summary.fields_filled > 0 && summary.fields_filled <= summary.fields_found);
    assert!(summary.filename.starts_with("wohngeldantrag_beispiel_"));
    assert_eq!(summary.output_path.parent(), Some(output.path()));

    assert_eq!(values["MZ1.3-ET_MieteGesamt"], "463,25");
    assert_eq!(values["MZ1.3-AN_IBAN1"], "D");
    assert_eq!(values["MZ1.3-AN_IBAN23"], Value::Null);
    assert_eq!(values["MZ1.3-CB_PersAngFamStandgeschieden"], "Yes");
    assert_eq!(values["MZ1.3-CB_PersAngFamStandledig"], "Off");
    assert_eq!(values["MZ1.3-ET_EinnahmeHHM1Art3"], Value::Null);
    assert_eq!(values["MZ2.B.ET_HHM2Familienname"], Value::Null);
    assert_eq!(values["MZ1.3-ET_Formularversion"], "MZ 1/2025");
}

#[test]
fn direct_fill_matches_garbled_field_names() {
    let output = tempfile::tempdir().expect("tempdir");
    let summary = service_writing_to(output.path())
        .fill(&sample(), None)
        .expect("fill succeeds");
    let values = written(&summary);

    assert_eq!(values["MZ1.3-ET_PersAngStaatsangehÃ¶rigkeit"], "deutsch");
    assert_eq!(values["MZ1.3-CB_PersAngErwerbSelbstÃ¤ndiger"], "Off");
    assert_eq!(values["MZ1.3-CB_PersAngErwerbRentner"], "Yes");
}

#[test]
fn heuristic_fill_stays_within_inventory() {
    let output = tempfile::tempdir().expect("tempdir");
    let summary = service_writing_to(output.path())
        .fill_heuristic(&sample(), None)
        .expect("fill succeeds");
    let values = written(&summary);

    assert_eq!(summary.strategy, "heuristic");
    assert!(summary.fields_filled <= summary.fields_found);
    assert_eq!(values["MZ1.3-ET_MieteGesamt"], "463,25");
    assert_eq!(values["MZ1.3-ET_WohnungAnschriftWohnort"], "Potsdam");
    assert_eq!(values["MZ2.B.ET_HHM2Vorname"], Value::Null);
}

#[test]
fn table_fill_counts_only_existing_fields() {
    let output = tempfile::tempdir().expect("tempdir");
    let table: FieldTable = [
        ("MZ1.3-ET_MieteGesamt".to_string(), FieldValue::text("500,00")),
        ("MZ1.3-CB_HinweisAbfrage".to_string(), FieldValue::Checkbox(true)),
        ("NichtVorhanden".to_string(), FieldValue::text("x")),
    ]
    .into_iter()
    .collect();

    let summary = service_writing_to(output.path())
        .fill_with_table(table, None, "")
        .expect("fill succeeds");

    assert_eq!(summary.fields_filled, 2);
    assert!(summary.filename.starts_with("wohngeldantrag_antrag_"));
    assert_eq!(written(&summary)["MZ1.3-ET_MieteGesamt"], "500,00");
}

#[test]
fn incomplete_application_is_rejected_before_reading_the_template() {
    let output = tempfile::tempdir().expect("tempdir");
    let mut data = sample();
    data.applicant.last_name.clear();
    data.bank.iban = "  ".to_string();

    let result = service_writing_to(output.path()).fill(&data, Some(Path::new("missing.json")));
    match result {
        Err(FormsError::Validation(error)) => {
            assert!(error.missing.contains(&"applicant.lastName".to_string()));
            assert!(error.missing.contains(&"bank.iban".to_string()));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(std::fs::read_dir(output.path()).expect("dir").count(), 0);
}

#[test]
fn missing_template_is_reported() {
    let output = tempfile::tempdir().expect("tempdir");
    let result = service_writing_to(output.path()).fill(&sample(), Some(Path::new("nope.json")));
    assert!(matches!(
        result,
        Err(FormsError::FormRead(FormReadError::NotFound(_)))
    ));
}

#[test]
fn template_without_catalogue_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let template = dir.path().join("flat.json");
    std::fs::write(&template, r#"{"form": "leer"}"#).expect("write template");

    let result = service_writing_to(dir.path()).field_names(Some(&template));
    assert!(matches!(
        result,
        Err(FormsError::FormRead(FormReadError::MissingCatalogue))
    ));
}

#[test]
fn csv_templates_are_accepted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let template = dir.path().join("fields.csv");
    std::fs::write(
        &template,
        "name,type,value\nMZ1.3-ET_MieteGesamt,text,\nMZ1.3-CB_PersAngFamStandgeschieden,checkbox,Off\n",
    )
    .expect("write template");
    let service = service_writing_to(dir.path());

    assert_eq!(
        service.field_names(Some(&template)).expect("field names"),
        vec![
            "MZ1.3-ET_MieteGesamt".to_string(),
            "MZ1.3-CB_PersAngFamStandgeschieden".to_string(),
        ]
    );
    let summary = service.fill(&sample(), Some(&template)).expect("fill succeeds");
    assert_eq!((summary.fields_found, summary.fields_filled), (2, 2));
}

#[test]
fn analysis_groups_bundled_fields() {
    let output = tempfile::tempdir().expect("tempdir");
    let report = service_writing_to(output.path())
        .analyze(None, None)
        .expect("analysis succeeds");

    assert_eq!(report.total_fields, bundled_fields().len());
    assert_eq!(
        report.fields_by_section.get(&2).map(Vec::len),
        Some(5),
        "household member block sits in section B"
    );
    assert_eq!(
        report.recommended_mapping.get("MZ1.3-ET_MieteGesamt"),
        Some(&FieldValue::text("463,25"))
    );
    assert!(report.render_text().starts_with("=== FORM FIELD ANALYSIS ==="));
}
