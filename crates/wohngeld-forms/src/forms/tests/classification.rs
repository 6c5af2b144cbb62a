use super::common::*;
use crate::forms::{classify, Category};

#[test]
fn unknown_names_classify_as_other_and_skip() {
    let data = sample();
    for name in ["MZ1.3-ET_Formularversion", "Feld42", "", "MZ1.3-MTF_Bemerkungen"] {
        let field = text_field(name);
        assert_eq!(field.category, Category::Other, "{name}");
        assert_eq!(resolved(&field, &data), None, "{name}");
    }
}

#[test]
fn bundled_template_fields_land_in_expected_categories() {
    let expectations = [
        ("MZ1.3-CB_AllgAntragstyp_Erstantrag", Category::ApplicationMeta),
        ("MZ1.3-ET_BehördeStraße", Category::Authority),
        ("MZ1.3-CB_PersAngFamStandgeschieden", Category::Person),
        ("MZ1.3-ET_WohnungAnschriftPostleitzahl", Category::Address),
        ("MZ1.3-CB_IchBinHauptmieter", Category::Housing),
        ("MZ1.3-CB_MonatMieteHeizkostemJaGesond", Category::Rent),
        ("MZ1.3-ET_MieteGesamt", Category::Rent),
        ("MZ1.3-ET_EinnahmeHHM1Art2Brutto", Category::Income),
        ("MZ1.3-AN_IBAN17", Category::Bank),
        ("MZ1.3-ET_AuszahlungFamilienname", Category::Bank),
        ("MZ1.3-CB_PersAngErwerbRentner", Category::EmploymentStatus),
    ];
    let fields = bundled_fields();
    for (name, category) in expectations {
        let field = fields
            .iter()
            .find(|field| field.name == name)
            .unwrap_or_else(|| panic!("{name} missing from bundled template"));
        assert_eq!(classify(field).category, category, "{name}");
    }
}

#[test]
fn household_member_block_carries_section_and_person() {
    let fields = bundled_fields();
    let member = fields
        .iter()
        .find(|field| field.name == "MZ2.B.ET_HHM2Familienname")
        .map(classify)
        .expect("household member field");

    assert_eq!(member.category, Category::Person);
    assert_eq!(member.section_number, 2);
    assert_eq!(member.person_index, 2);
}

#[test]
fn every_bundled_field_classifies_within_bounds() {
    for field in bundled_fields().iter().map(classify) {
        assert!(field.section_number <= 20, "{}", field.name());
        assert!(field.person_index <= 10, "{}", field.name());
        assert_eq!(classify(&field.descriptor), field);
    }
}
