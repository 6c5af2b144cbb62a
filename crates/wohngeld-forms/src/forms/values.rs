use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalizer::normalize;

/// Value bound to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Checkbox(bool),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Whether a checkbox bound to this value ends up checked.
    pub fn checks(&self) -> bool {
        match self {
            FieldValue::Checkbox(checked) => *checked,
            FieldValue::Text(raw) => matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "ja" | "yes" | "x" | "on"
            ),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Checkbox(checked) => write!(f, "{checked}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

/// A domain attribute that is present but cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{attribute} has unusable value '{raw}'")]
pub struct MalformedValue {
    pub attribute: &'static str,
    pub raw: String,
}

impl MalformedValue {
    pub(crate) fn new(attribute: &'static str, raw: impl Into<String>) -> Self {
        Self {
            attribute,
            raw: raw.into(),
        }
    }
}

/// Monetary or decimal input, accepted either as a JSON number or as text in
/// German (`1.200,50`) or plain (`1200.50`) notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn value(&self, attribute: &'static str) -> Result<f64, MalformedValue> {
        match self {
            Amount::Number(value) if value.is_finite() => Ok(*value),
            Amount::Number(value) => Err(MalformedValue::new(attribute, value.to_string())),
            Amount::Text(raw) => {
                parse_decimal(raw).ok_or_else(|| MalformedValue::new(attribute, raw.clone()))
            }
        }
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::Number(value)
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_end_matches('€').trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical = if trimmed.contains(',') || is_digit_grouped(trimmed) {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    canonical.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// German thousands grouping without a decimal part: `1.200`, `12.500.000`.
fn is_digit_grouped(raw: &str) -> bool {
    let mut groups = raw.split('.');
    let leading = groups.next().unwrap_or_default();
    let mut rest = groups.peekable();
    rest.peek().is_some()
        && (1..=3).contains(&leading.len())
        && leading.bytes().all(|byte| byte.is_ascii_digit())
        && rest.all(|group| group.len() == 3 && group.bytes().all(|byte| byte.is_ascii_digit()))
}

/// Two fraction digits, comma separator, no grouping: `463.25` → `463,25`.
pub fn format_money(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

/// Same rendering as money; kept separate so area and amounts can diverge.
pub fn format_decimal(value: f64) -> String {
    format_money(value)
}

pub fn format_integer(value: i64) -> String {
    value.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Diverse,
    Unspecified,
}

impl Gender {
    pub fn parse(raw: &str) -> Result<Self, MalformedValue> {
        match normalize(raw).as_str() {
            "m" | "maennlich" | "male" | "mann" => Ok(Self::Male),
            "w" | "f" | "weiblich" | "female" | "frau" => Ok(Self::Female),
            "d" | "divers" | "diverse" => Ok(Self::Diverse),
            "keineangabe" | "ohneangabe" | "unspecified" => Ok(Self::Unspecified),
            _ => Err(MalformedValue::new("applicant.gender", raw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
    Separated,
    RegisteredPartnership,
    CohabitingPartnership,
}

impl MaritalStatus {
    pub fn parse(raw: &str) -> Result<Self, MalformedValue> {
        let key = normalize(raw);
        let status = match key.as_str() {
            "ledig" | "single" => Self::Single,
            "verheiratet" | "married" => Self::Married,
            "geschieden" | "divorced" => Self::Divorced,
            "verwitwet" | "widowed" => Self::Widowed,
            _ if key.contains("getrennt") || key == "separated" => Self::Separated,
            _ if key.contains("nichtehelich") => Self::CohabitingPartnership,
            _ if key.contains("lebenspartner") || key.contains("partnership") => {
                Self::RegisteredPartnership
            }
            _ => return Err(MalformedValue::new("applicant.maritalStatus", raw)),
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Unemployed,
    Retired,
    Student,
    Trainee,
    NotInLabourForce,
}

impl EmploymentStatus {
    pub fn parse(raw: &str) -> Result<Self, MalformedValue> {
        let key = normalize(raw);
        let status = match key.as_str() {
            "erwerbstaetig" | "arbeitnehmer" | "angestellt" | "employed" => Self::Employed,
            "arbeitslos" | "arbeitsuchend" | "unemployed" => Self::Unemployed,
            "rentner" | "rentnerin" | "pensionaer" | "retired" => Self::Retired,
            "student" | "studentin" => Self::Student,
            "schueler" | "schuelerin" | "azubi" | "auszubildend" | "auszubildender"
            | "trainee" => Self::Trainee,
            "nichterwerbsperson" | "sonstige" => Self::NotInLabourForce,
            _ if key.starts_with("selbst") || key == "freiberuflich" => Self::SelfEmployed,
            _ => return Err(MalformedValue::new("applicant.employmentStatus", raw)),
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HousingTenure {
    MainTenant,
    Subtenant,
    CareHomeResident,
    Owner,
}

impl HousingTenure {
    pub fn parse(raw: &str) -> Result<Self, MalformedValue> {
        match normalize(raw).as_str() {
            "hauptmieter" | "hauptmieterin" | "maintenant" => Ok(Self::MainTenant),
            "untermieter" | "untermieterin" | "subtenant" => Ok(Self::Subtenant),
            "heimbewohner" | "heimbewohnerin" | "carehome" => Ok(Self::CareHomeResident),
            "eigentum" | "eigentuemer" | "eigentuemerin" | "owner" => Ok(Self::Owner),
            _ => Err(MalformedValue::new("housing.tenure", raw)),
        }
    }
}

/// Payment rhythm of an income entry. Unrecognized spellings count as monthly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Monthly,
    Yearly,
    Daily,
}

impl Frequency {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Monthly;
        };
        let key = normalize(raw);
        if key.contains("monat") || key.contains("month") {
            Self::Monthly
        } else if key.contains("jahr") || key.contains("jaehr") || key.contains("annual") {
            Self::Yearly
        } else if key.contains("tag") || key.contains("taeglich") || key.contains("daily") {
            Self::Daily
        } else {
            Self::Monthly
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Frequency::Monthly => "monatlich",
            Frequency::Yearly => "jährlich",
            Frequency::Daily => "täglich",
        }
    }

    pub fn to_monthly(self, amount: f64) -> f64 {
        match self {
            Frequency::Monthly => amount,
            Frequency::Yearly => amount / 12.0,
            Frequency::Daily => amount * 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_uses_comma_and_two_digits() {
        assert_eq!(format_money(463.25), "463,25");
        assert_eq!(format_money(855.4), "855,40");
        assert_eq!(format_money(1200.0), "1200,00");
        assert_eq!(format_integer(1990), "1990");
    }

    #[test]
    fn amounts_accept_german_and_plain_notation() {
        assert_eq!(Amount::Number(61.5).value("rent.heating"), Ok(61.5));
        assert_eq!(
            Amount::Text("1.200,50".to_string()).value("rent.total"),
            Ok(1200.5)
        );
        assert_eq!(Amount::Text("463.25".to_string()).value("rent.total"), Ok(463.25));
        assert_eq!(Amount::Text(" 38,49 € ".to_string()).value("x"), Ok(38.49));
        assert_eq!(Amount::Text("1.200".to_string()).value("rent.total"), Ok(1200.0));
        assert_eq!(
            Amount::Text("12.500.000".to_string()).value("rent.total"),
            Ok(12_500_000.0)
        );
        assert_eq!(Amount::Text("1.20".to_string()).value("rent.total"), Ok(1.2));
        assert!(Amount::Text("1.2.3".to_string()).value("rent.total").is_err());

        let error = Amount::Text("viel".to_string())
            .value("rent.total")
            .expect_err("non numeric");
        assert_eq!(error.attribute, "rent.total");
        assert_eq!(error.raw, "viel");
    }

    #[test]
    fn categorical_values_parse_leniently() {
        assert_eq!(Gender::parse("WEIBLICH"), Ok(Gender::Female));
        assert_eq!(Gender::parse("männlich"), Ok(Gender::Male));
        assert_eq!(MaritalStatus::parse("getrennt lebend"), Ok(MaritalStatus::Separated));
        assert_eq!(
            MaritalStatus::parse("EINGETRAGENE_LEBENSPARTNERSCHAFT"),
            Ok(MaritalStatus::RegisteredPartnership)
        );
        assert_eq!(
            EmploymentStatus::parse("Selbstständig"),
            Ok(EmploymentStatus::SelfEmployed)
        );
        assert_eq!(HousingTenure::parse("EIGENTÜMER"), Ok(HousingTenure::Owner));
        assert!(MaritalStatus::parse("kompliziert").is_err());
    }

    #[test]
    fn frequency_defaults_to_monthly() {
        assert_eq!(Frequency::parse(Some("MONATLICH")), Frequency::Monthly);
        assert_eq!(Frequency::parse(Some("jährlich")), Frequency::Yearly);
        assert_eq!(Frequency::parse(None).label(), "monatlich");
        assert_eq!(Frequency::Yearly.to_monthly(1200.0), 100.0);
    }

    #[test]
    fn text_values_check_boxes_only_when_affirmative() {
        assert!(FieldValue::text("true").checks());
        assert!(FieldValue::text("Ja").checks());
        assert!(!FieldValue::text("false").checks());
        assert!(!FieldValue::Checkbox(false).checks());
    }
}
