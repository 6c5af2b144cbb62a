//! Canonical field table for the bundled Wohngeld form.
//!
//! Field name prefixes follow the form's convention: `MZ1.3-CB_` checkbox,
//! `-ET_` text, `-DA_` date, `-AN_` single IBAN character, `-MTF_` multi-line.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::warn;

use super::domain::{ApplicationData, BankDetails, Income, Rent, Supplemental};
use super::normalizer::normalize;
use super::resolver::{IBAN_POSITIONS, MAX_INCOME_ENTRIES};
use super::values::{
    format_decimal, format_money, EmploymentStatus, FieldValue, Gender, HousingTenure,
    MalformedValue, MaritalStatus,
};

const PREFIX: &str = "MZ1.3-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field_name: String,
    pub value: FieldValue,
}

/// Field name to value assignment with unique names and stable insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTable {
    bindings: Vec<FieldBinding>,
    index: HashMap<String, usize>,
}

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding; a repeated name replaces the earlier value in place.
    pub fn insert(&mut self, field_name: impl Into<String>, value: FieldValue) {
        let field_name = field_name.into();
        match self.index.get(&field_name) {
            Some(&position) => self.bindings[position].value = value,
            None => {
                self.index.insert(field_name.clone(), self.bindings.len());
                self.bindings.push(FieldBinding { field_name, value });
            }
        }
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldValue> {
        self.index
            .get(field_name)
            .map(|&position| &self.bindings[position].value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter()
    }

    /// Lookup keyed by normalized field name, first binding wins.
    pub fn normalized_index(&self) -> HashMap<String, usize> {
        let mut index = HashMap::new();
        for (position, binding) in self.bindings.iter().enumerate() {
            index.entry(normalize(&binding.field_name)).or_insert(position);
        }
        index
    }

    pub(crate) fn binding(&self, position: usize) -> Option<&FieldBinding> {
        self.bindings.get(position)
    }

    /// Direct table for the bundled form. Malformed attributes are logged and
    /// their fields left out.
    pub fn from_application(data: &ApplicationData) -> Self {
        let mut table = TableBuilder::default();
        table.application(data);
        table.applicant(data);
        table.address(data);
        table.housing(data);
        table.rent(&data.rent);
        table.income(data, &data.income);
        table.bank(data, &data.bank);
        table.supplemental(&data.supplemental);
        table.check("HinweisAbfrage", data.application.consent);
        table.table
    }
}

impl FromIterator<(String, FieldValue)> for FieldTable {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

impl Serialize for FieldTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.bindings.len()))?;
        for binding in &self.bindings {
            map.serialize_entry(&binding.field_name, &binding.value)?;
        }
        map.end()
    }
}

fn parsed<T>(attribute: Result<Option<T>, MalformedValue>) -> Option<T> {
    attribute.unwrap_or_else(|err| {
        warn!(error = %err, "leaving malformed attribute out of the field table");
        None
    })
}

#[derive(Default)]
struct TableBuilder {
    table: FieldTable,
}

impl TableBuilder {
    fn check(&mut self, suffix: &str, checked: bool) {
        self.table
            .insert(format!("{PREFIX}CB_{suffix}"), FieldValue::Checkbox(checked));
    }

    fn yes_no(&mut self, stem: &str, answer: bool) {
        self.check(&format!("{stem}Ja"), answer);
        self.check(&format!("{stem}Nein"), !answer);
    }

    fn text(&mut self, kind: &str, suffix: &str, value: Option<String>) {
        if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
            self.table
                .insert(format!("{PREFIX}{kind}_{suffix}"), FieldValue::Text(value));
        }
    }

    fn application(&mut self, data: &ApplicationData) {
        let meta = &data.application;
        self.check("AllgAntragstyp_Erstantrag", meta.first_application);
        self.check("AllgAntragstyp_Weiterleistungsantrag", !meta.first_application);
        if !meta.first_application {
            self.text("MTF", "AllgWoGNR_AKZ", meta.benefit_number.clone());
        }
        self.text("DA", "AllgWohngeldAb", meta.benefit_from.clone());
        self.text("DA", "AllgAntragsdatum", meta.application_date.clone());
        self.text("DA", "AllgFormloserAntragDatum", meta.informal_application_date.clone());
        if let Some(authority) = &meta.authority {
            self.text("ET", "BehördeName", Some(authority.name.clone()));
            self.text("ET", "BehördeStraße", authority.street.clone());
            self.text("ET", "BehördePLZ", authority.postcode.clone());
            self.text("ET", "BehördeOrt", authority.city.clone());
        }
    }

    fn applicant(&mut self, data: &ApplicationData) {
        let applicant = &data.applicant;
        self.text("ET", "PersAngFamilienname", Some(applicant.last_name.clone()));
        self.text("ET", "PersAngVornamen", Some(applicant.first_name.clone()));
        self.text("DA", "PersAngGeburtsdatum", Some(applicant.birth_date.clone()));
        self.text("ET", "PersAngGeburtsort", applicant.birth_place.clone());
        self.text("ET", "PersAngGeburtsname", applicant.birth_name.clone());
        self.text("ET", "PersAngStaatsangehörigkeit", Some(applicant.nationality.clone()));
        self.text("ET", "PersAngTelefonnummer", applicant.phone.clone());
        self.text("ET", "PersAngE-Mail", applicant.email.clone());

        let gender = parsed(applicant.gender.as_deref().map(Gender::parse).transpose());
        if let Some(gender) = gender {
            self.check("PersAngGeschlechtMännlich", gender == Gender::Male);
            self.check("PersAngGeschlechtWeiblich", gender == Gender::Female);
            self.check("PersAngGeschlechtDivers", gender == Gender::Diverse);
            self.check("PersAngGeschlechtKeineAngabe", gender == Gender::Unspecified);
        }

        let status = parsed(
            applicant
                .marital_status
                .as_deref()
                .map(MaritalStatus::parse)
                .transpose(),
        );
        if let Some(status) = status {
            self.check("PersAngFamStandledig", status == MaritalStatus::Single);
            self.check("PersAngFamStandverheiratet", status == MaritalStatus::Married);
            self.check("PersAngFamStandgetrenntlebend", status == MaritalStatus::Separated);
            self.check(
                "PersAngFamStandeingLebenspartner",
                status == MaritalStatus::RegisteredPartnership,
            );
            self.check("PersAngFamStandgeschieden", status == MaritalStatus::Divorced);
            self.check("PersAngFamStandverwitwet", status == MaritalStatus::Widowed);
            self.check(
                "PersAngFamStandnichtehelicheLebenspartner",
                status == MaritalStatus::CohabitingPartnership,
            );
        }

        let employment = parsed(
            applicant
                .employment_status
                .as_deref()
                .map(EmploymentStatus::parse)
                .transpose(),
        );
        if let Some(employment) = employment {
            use EmploymentStatus::*;
            self.check("PersAngErwerbArbeitnehmer", employment == Employed);
            self.check("PersAngErwerbSelbständiger", employment == SelfEmployed);
            self.check("PersAngErwerbAzubi", matches!(employment, Trainee | Student));
            self.check("PersAngErwerbRentner", employment == Retired);
            self.check("PersAngErwerbArbeitslos", employment == Unemployed);
            self.check("PersAngErwerbNichterwerbsperson", employment == NotInLabourForce);
        }
    }

    fn address(&mut self, data: &ApplicationData) {
        let address = &data.address;
        self.text("ET", "WohnungAnschriftStraße", Some(address.street.clone()));
        self.text("ET", "WohnungAnschriftHausnummer", Some(address.house_number.clone()));
        self.text("ET", "WohnungAnschriftPostleitzahl", Some(address.postcode.clone()));
        self.text("ET", "WohnungAnschriftWohnort", Some(address.city.clone()));
    }

    fn housing(&mut self, data: &ApplicationData) {
        let housing = &data.housing;
        let area = housing
            .living_area_sqm
            .as_ref()
            .map(|area| area.value("housing.livingAreaSqm"))
            .transpose();
        let area = parsed(area);
        self.text("ET", "MieteGrößeWohnung", area.map(format_decimal));
        self.text("DA", "WohnungZKAnschriftEinzugsdatum", housing.move_in_date.clone());

        let tenure = parsed(housing.tenure.as_deref().map(HousingTenure::parse).transpose());
        if let Some(tenure) = tenure {
            self.check("IchBinHauptmieter", tenure == HousingTenure::MainTenant);
            self.check("IchBinUntermieter", tenure == HousingTenure::Subtenant);
            self.check("IchBinHeimbewohner", tenure == HousingTenure::CareHomeResident);
            self.check("IchBinBewohnerMehr", tenure == HousingTenure::Owner);
        }

        self.check("IchBinVerwandtVerNein", !housing.related_to_landlord);
        // The form's own field name carries the doubled "I".
        self.check("IIchBinVerwandtVerJa", housing.related_to_landlord);
        self.yes_no("WohnungGefördert", housing.is_rent_controlled());
    }

    fn rent(&mut self, rent: &Rent) {
        let total = parsed(rent.total());
        self.text("ET", "MieteGesamt", total.map(format_money));

        let heating = parsed(rent.heating_paid_separately().map(Some)).unwrap_or(false);
        self.check("MonatMieteHeizkostemNein", !heating);
        self.check("MonatMieteHeizkostemJa", false);
        self.check("MonatMieteHeizkostemJaGesond", heating);
        if heating {
            let amount = parsed(rent.heating());
            self.text("ET", "MonatMieteHeizkostemBetrag", amount.map(format_money));
        }

        let hot_water = parsed(rent.hot_water_paid_separately().map(Some)).unwrap_or(false);
        self.check("MonatMieteWarmwasserNein", !hot_water);
        self.check("MonatMieteWarmwasserJa", false);
        self.check("MonatMieteWarmwasserJaGesond", hot_water);
        if hot_water {
            let amount = parsed(rent.hot_water());
            self.text("ET", "MonatMieteWarmwasserBetrag", amount.map(format_money));
        }

        for extra in ["Garage", "Service", "Haushaltsenergie"] {
            self.check(&format!("MonatMiete{extra}Nein"), true);
            self.check(&format!("MonatMiete{extra}Ja"), false);
            self.check(&format!("MonatMiete{extra}JaGesond"), false);
        }
    }

    fn income(&mut self, data: &ApplicationData, income: &Income) {
        self.text("ET", "EinnahmeHHM1Familienname", Some(data.applicant.last_name.clone()));
        self.text("ET", "EinnahmeHHM1Vorname", Some(data.applicant.first_name.clone()));

        if income.entries.len() > MAX_INCOME_ENTRIES {
            warn!(
                entries = income.entries.len(),
                capacity = MAX_INCOME_ENTRIES,
                "form holds fewer income entries than supplied, dropping the rest"
            );
        }
        if income.entries.is_empty() {
            let gross = parsed(income.gross_monthly()).filter(|gross| *gross > 0.0);
            if let Some(gross) = gross {
                self.text("ET", "EinnahmeHHM1Art1", Some("Einkommen".to_string()));
                self.text("ET", "EinnahmeHHM1Art1Brutto", Some(format_money(gross)));
                self.text("ET", "EinnahmeHHM1Art1Turnus", Some("monatlich".to_string()));
            }
        }
        for (slot, entry) in income.entries.iter().take(MAX_INCOME_ENTRIES).enumerate() {
            let stem = format!("EinnahmeHHM1Art{}", slot + 1);
            self.text("ET", &stem, Some(entry.kind.clone()));
            let gross = parsed(entry.gross());
            self.text("ET", &format!("{stem}Brutto"), gross.map(format_money));
            self.text(
                "ET",
                &format!("{stem}Turnus"),
                Some(entry.frequency().label().to_string()),
            );
        }

        self.check("EinnahmeHHM1Steuern", income.pays_taxes);
        self.check("EinnahmeHHM1RVLV", income.pays_pension_insurance);
        self.check("EinnahmeHHM1KV", income.pays_health_insurance);
    }

    fn bank(&mut self, data: &ApplicationData, bank: &BankDetails) {
        self.check("ZahlungAnMich", bank.pay_to_applicant);
        self.check("AuszahlungHHM", !bank.pay_to_applicant);

        for (position, character) in bank.compact_iban().chars().take(IBAN_POSITIONS).enumerate() {
            self.text("AN", &format!("IBAN{}", position + 1), Some(character.to_string()));
        }
        self.text("ET", "AuszahlungNameBank", bank.bank_name.clone());
        self.text(
            "ET",
            "AuszahlungFamilienname",
            bank.holder_last_name
                .clone()
                .or_else(|| Some(data.applicant.last_name.clone())),
        );
        self.text(
            "ET",
            "AuszahlungVorname",
            bank.holder_first_name
                .clone()
                .or_else(|| Some(data.applicant.first_name.clone())),
        );
        self.text(
            "ET",
            "AuszahlungAnschrift",
            bank.holder_address
                .clone()
                .or_else(|| Some(data.address.full())),
        );
    }

    fn supplemental(&mut self, answers: &Supplemental) {
        self.yes_no("WohnungAndereWohnung", answers.other_apartment_benefit);
        self.yes_no("WohnungZweitwohnsitz", answers.secondary_residence);
        self.yes_no("VerändHHMTod", answers.household_member_deceased);
        self.yes_no("VerändHHMVerstorben", answers.household_member_deceased);
        self.yes_no("VerändHHMAnzahl", answers.household_size_changed);
        self.yes_no("TransfLeistung", answers.transfer_benefits);
        self.yes_no("TransfWohngeldBeantragen", answers.asked_to_apply);
        self.yes_no("FreiBWerb", answers.work_expenses);
        self.yes_no("FreiBKinderbetreu", answers.childcare_costs);
        self.yes_no("FreiBSchwerBe", answers.disability_or_care);
        self.yes_no("FreiBUnterh", answers.pays_maintenance);
        self.yes_no("SonstEinUnterh", answers.unenforced_maintenance);
        self.yes_no("SonstEinEinm", answers.one_time_income);
        self.check("SonstEinErhNein", !answers.income_change_expected);
        self.check("SonstEinErhJaVer", false);
        self.check("SonstEinErhJaErh", false);
        self.yes_no("SonstEinVermögen", answers.assets_above_threshold);
        self.check("MieteVerändNein", !answers.rent_change_expected);
        self.check("MieteVerändJaVerringern", false);
        self.check("MieteVerändJaErhöhen", false);
        self.yes_no("MieteDritte", answers.third_party_pays_rent);
        self.yes_no("MieteAnderePers", answers.other_persons_pay_rent);
        self.yes_no("DrittStaatKostentragen", answers.third_party_bears_costs);
        self.yes_no("WeiterePersonen", answers.additional_persons);
        self.check("NutzWohnraumBeruflich", false);
        self.check("NutzWohnraumAndPersÜberlassen", false);
        self.check("NutzWohnraumAndPersEntgeltlich", false);
        self.check("EinverstKontoauszuege", answers.bank_statement_consent);
    }
}
