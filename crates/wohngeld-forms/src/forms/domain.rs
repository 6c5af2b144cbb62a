use serde::{Deserialize, Serialize};

use super::values::{Amount, Frequency, MalformedValue};

/// Application data for one Wohngeld (rent subsidy) claim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationData {
    pub application: ApplicationMeta,
    pub applicant: Applicant,
    pub address: Address,
    pub housing: Housing,
    pub rent: Rent,
    pub household: Household,
    pub income: Income,
    pub bank: BankDetails,
    pub supplemental: Supplemental,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationMeta {
    pub first_application: bool,
    pub benefit_number: Option<String>,
    pub benefit_from: Option<String>,
    pub application_date: Option<String>,
    pub informal_application_date: Option<String>,
    pub authority: Option<Authority>,
    pub consent: bool,
}

impl Default for ApplicationMeta {
    fn default() -> Self {
        Self {
            first_application: true,
            benefit_number: None,
            benefit_from: None,
            application_date: None,
            informal_application_date: None,
            authority: None,
            consent: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Authority {
    pub name: String,
    pub street: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Applicant {
    pub last_name: String,
    pub first_name: String,
    /// `DD.MM.YYYY`, passed through unchanged.
    pub birth_date: String,
    pub birth_place: Option<String>,
    pub birth_name: Option<String>,
    pub nationality: String,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub employment_status: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Default for Applicant {
    fn default() -> Self {
        Self {
            last_name: String::new(),
            first_name: String::new(),
            birth_date: String::new(),
            birth_place: None,
            birth_name: None,
            nationality: "deutsch".to_string(),
            gender: None,
            marital_status: None,
            employment_status: None,
            phone: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub house_number: String,
    pub postcode: String,
    pub city: String,
    pub state: Option<String>,
}

impl Address {
    /// Single-line postal form: `Street No, Postcode City`.
    pub fn full(&self) -> String {
        format!(
            "{} {}, {} {}",
            self.street, self.house_number, self.postcode, self.city
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Housing {
    pub move_in_date: Option<String>,
    pub living_area_sqm: Option<Amount>,
    pub rooms: Option<u32>,
    pub construction_year: Option<String>,
    pub landlord_name: Option<String>,
    pub tenure: Option<String>,
    pub related_to_landlord: bool,
    pub rent_controlled: bool,
    pub housing_entitlement_certificate: bool,
}

impl Housing {
    /// A housing entitlement certificate only exists for rent-controlled flats.
    pub fn is_rent_controlled(&self) -> bool {
        self.rent_controlled || self.housing_entitlement_certificate
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rent {
    pub total: Option<Amount>,
    pub cold_rent: Option<Amount>,
    pub utilities: Option<Amount>,
    pub heating: Option<Amount>,
    pub heating_included: bool,
    pub hot_water: Option<Amount>,
    pub hot_water_included: bool,
    pub other_costs: Option<Amount>,
}

impl Rent {
    /// Stated total, else the sum of whatever parts are known.
    pub fn total(&self) -> Result<Option<f64>, MalformedValue> {
        if let Some(total) = &self.total {
            return total.value("rent.total").map(Some);
        }
        let parts = [
            amount(&self.cold_rent, "rent.coldRent")?,
            amount(&self.utilities, "rent.utilities")?,
            amount(&self.heating, "rent.heating")?,
            amount(&self.hot_water, "rent.hotWater")?,
            amount(&self.other_costs, "rent.otherCosts")?,
        ];
        if parts.iter().all(Option::is_none) {
            return Ok(None);
        }
        Ok(Some(parts.iter().flatten().sum()))
    }

    /// Stated cold rent, else the total minus separately paid costs, floored at zero.
    pub fn cold_rent(&self) -> Result<Option<f64>, MalformedValue> {
        if let Some(cold) = &self.cold_rent {
            return cold.value("rent.coldRent").map(Some);
        }
        let Some(total) = self.total()? else {
            return Ok(None);
        };
        let mut cold = total;
        if !self.heating_included {
            cold -= self.heating()?.unwrap_or(0.0);
        }
        if !self.hot_water_included {
            cold -= self.hot_water()?.unwrap_or(0.0);
        }
        cold -= amount(&self.other_costs, "rent.otherCosts")?.unwrap_or(0.0);
        Ok(Some(cold.max(0.0)))
    }

    pub fn utilities(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.utilities, "rent.utilities")
    }

    pub fn heating(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.heating, "rent.heating")
    }

    pub fn hot_water(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.hot_water, "rent.hotWater")
    }

    /// Heating billed on top of the rent, i.e. a positive amount not included in it.
    pub fn heating_paid_separately(&self) -> Result<bool, MalformedValue> {
        Ok(!self.heating_included && self.heating()?.is_some_and(|value| value > 0.0))
    }

    pub fn hot_water_paid_separately(&self) -> Result<bool, MalformedValue> {
        Ok(!self.hot_water_included && self.hot_water()?.is_some_and(|value| value > 0.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Household {
    pub size: u32,
}

impl Default for Household {
    fn default() -> Self {
        Self { size: 1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeEntry {
    pub kind: String,
    pub gross_amount: Option<Amount>,
    pub frequency: Option<String>,
}

impl IncomeEntry {
    pub fn frequency(&self) -> Frequency {
        Frequency::parse(self.frequency.as_deref())
    }

    pub fn gross(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.gross_amount, "income.entries.grossAmount")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Income {
    pub entries: Vec<IncomeEntry>,
    pub gross_monthly: Option<Amount>,
    pub net_monthly: Option<Amount>,
    pub child_benefit: Option<Amount>,
    pub maintenance: Option<Amount>,
    pub pays_taxes: bool,
    pub pays_pension_insurance: bool,
    pub pays_health_insurance: bool,
}

impl Default for Income {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            gross_monthly: None,
            net_monthly: None,
            child_benefit: None,
            maintenance: None,
            pays_taxes: false,
            pays_pension_insurance: false,
            pays_health_insurance: true,
        }
    }
}

impl Income {
    /// Stated gross monthly income, else the entries converted to monthly and summed.
    pub fn gross_monthly(&self) -> Result<Option<f64>, MalformedValue> {
        if let Some(gross) = &self.gross_monthly {
            return gross.value("income.grossMonthly").map(Some);
        }
        let mut total = None;
        for entry in &self.entries {
            if let Some(gross) = entry.gross()? {
                *total.get_or_insert(0.0) += entry.frequency().to_monthly(gross);
            }
        }
        Ok(total)
    }

    pub fn net_monthly(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.net_monthly, "income.netMonthly")
    }

    pub fn child_benefit(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.child_benefit, "income.childBenefit")
    }

    pub fn maintenance(&self) -> Result<Option<f64>, MalformedValue> {
        amount(&self.maintenance, "income.maintenance")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub iban: String,
    pub bic: Option<String>,
    pub bank_name: Option<String>,
    pub holder_last_name: Option<String>,
    pub holder_first_name: Option<String>,
    pub holder_address: Option<String>,
    pub account_holder: Option<String>,
    pub pay_to_applicant: bool,
}

impl Default for BankDetails {
    fn default() -> Self {
        Self {
            iban: String::new(),
            bic: None,
            bank_name: None,
            holder_last_name: None,
            holder_first_name: None,
            holder_address: None,
            account_holder: None,
            pay_to_applicant: true,
        }
    }
}

impl BankDetails {
    /// IBAN with all whitespace removed.
    pub fn compact_iban(&self) -> String {
        self.iban.chars().filter(|c| !c.is_whitespace()).collect()
    }
}

/// Yes/no answers to the remaining questions of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Supplemental {
    pub other_apartment_benefit: bool,
    pub secondary_residence: bool,
    pub household_member_deceased: bool,
    pub household_size_changed: bool,
    pub transfer_benefits: bool,
    pub transfer_benefit_kind: Option<String>,
    pub transfer_benefit_date: Option<String>,
    pub asked_to_apply: bool,
    pub work_expenses: bool,
    pub childcare_costs: bool,
    pub disability_or_care: bool,
    pub care_level: Option<String>,
    pub disability_degree: Option<String>,
    pub home_care: bool,
    pub pays_maintenance: bool,
    pub unenforced_maintenance: bool,
    pub one_time_income: bool,
    pub income_change_expected: bool,
    pub assets_above_threshold: bool,
    pub rent_change_expected: bool,
    pub third_party_pays_rent: bool,
    pub other_persons_pay_rent: bool,
    pub third_party_bears_costs: bool,
    pub additional_persons: bool,
    pub bank_statement_consent: bool,
}

impl Default for Supplemental {
    fn default() -> Self {
        Self {
            other_apartment_benefit: false,
            secondary_residence: false,
            household_member_deceased: false,
            household_size_changed: false,
            transfer_benefits: false,
            transfer_benefit_kind: None,
            transfer_benefit_date: None,
            asked_to_apply: false,
            work_expenses: false,
            childcare_costs: false,
            disability_or_care: false,
            care_level: None,
            disability_degree: None,
            home_care: false,
            pays_maintenance: false,
            unenforced_maintenance: false,
            one_time_income: false,
            income_change_expected: false,
            assets_above_threshold: false,
            rent_change_expected: false,
            third_party_pays_rent: false,
            other_persons_pay_rent: false,
            third_party_bears_costs: false,
            additional_persons: false,
            bank_statement_consent: true,
        }
    }
}

/// Required attributes absent from the submitted application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("application data is missing required attributes: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<String>,
}

impl ApplicationData {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("applicant.lastName", &self.applicant.last_name),
            ("applicant.firstName", &self.applicant.first_name),
            ("applicant.birthDate", &self.applicant.birth_date),
            ("address.street", &self.address.street),
            ("address.houseNumber", &self.address.house_number),
            ("address.postcode", &self.address.postcode),
            ("address.city", &self.address.city),
            ("bank.iban", &self.bank.iban),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(attribute, _)| attribute.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }

    /// Typical claimant: divorced pensioner on a reduced earning capacity pension.
    pub fn sample() -> Self {
        Self {
            application: ApplicationMeta {
                application_date: Some("21.12.2025".to_string()),
                informal_application_date: Some("07.01.2025".to_string()),
                ..ApplicationMeta::default()
            },
            applicant: Applicant {
                last_name: "Beispiel".to_string(),
                first_name: "Maria".to_string(),
                birth_date: "23.05.1962".to_string(),
                gender: Some("WEIBLICH".to_string()),
                marital_status: Some("GESCHIEDEN".to_string()),
                employment_status: Some("RENTNER".to_string()),
                ..Applicant::default()
            },
            address: Address {
                street: "Heilig-Geist-Str.".to_string(),
                house_number: "3".to_string(),
                postcode: "14467".to_string(),
                city: "Potsdam".to_string(),
                state: Some("Brandenburg".to_string()),
            },
            housing: Housing {
                living_area_sqm: Some(Amount::Number(45.0)),
                tenure: Some("HAUPTMIETER".to_string()),
                ..Housing::default()
            },
            rent: Rent {
                total: Some(Amount::Number(463.25)),
                heating: Some(Amount::Number(61.5)),
                hot_water: Some(Amount::Number(0.0)),
                other_costs: Some(Amount::Number(0.0)),
                ..Rent::default()
            },
            household: Household::default(),
            income: Income {
                entries: vec![
                    IncomeEntry {
                        kind: "Erwerbsminderungsrente".to_string(),
                        gross_amount: Some(Amount::Number(855.42)),
                        frequency: Some("MONATLICH".to_string()),
                    },
                    IncomeEntry {
                        kind: "Zuschlag zur Rente".to_string(),
                        gross_amount: Some(Amount::Number(38.49)),
                        frequency: Some("MONATLICH".to_string()),
                    },
                ],
                ..Income::default()
            },
            bank: BankDetails {
                iban: "DE89 3704 0044 0532 0130 00".to_string(),
                bank_name: Some("Sparkasse Potsdam".to_string()),
                holder_last_name: Some("Beispiel".to_string()),
                holder_first_name: Some("Maria".to_string()),
                holder_address: Some("Heilig-Geist-Str. 3, 14467 Potsdam".to_string()),
                ..BankDetails::default()
            },
            supplemental: Supplemental {
                transfer_benefits: true,
                transfer_benefit_kind: Some("GRUNDSICHERUNG".to_string()),
                transfer_benefit_date: Some("07.01.2025".to_string()),
                disability_or_care: true,
                care_level: Some("PG 2".to_string()),
                ..Supplemental::default()
            },
        }
    }
}

fn amount(value: &Option<Amount>, attribute: &'static str) -> Result<Option<f64>, MalformedValue> {
    value.as_ref().map(|amount| amount.value(attribute)).transpose()
}
