use std::sync::OnceLock;

use crate::forms::classifier::{Category, Pattern};
use crate::forms::domain::ApplicationData;
use crate::forms::values::{
    EmploymentStatus, Gender, HousingTenure, MalformedValue, MaritalStatus,
};

/// What one checkbox rule says about a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The rule does not concern this field.
    NotApplicable,
    Decided(bool),
    /// The rule concerns the field but cannot pick a branch.
    Undetermined,
}

pub(crate) trait CheckboxRule: Send + Sync {
    fn evaluate(
        &self,
        category: Category,
        normalized: &str,
        data: &ApplicationData,
    ) -> Result<Outcome, MalformedValue>;
}

/// The first rule that concerns the field decides; undetermined means skip.
pub(super) fn resolve(
    category: Category,
    normalized: &str,
    data: &ApplicationData,
) -> Result<Option<bool>, MalformedValue> {
    for rule in checkbox_rules() {
        match rule.evaluate(category, normalized, data)? {
            Outcome::NotApplicable => continue,
            Outcome::Decided(checked) => return Ok(Some(checked)),
            Outcome::Undetermined => return Ok(None),
        }
    }
    Ok(None)
}

type Current<T> = fn(&ApplicationData) -> Result<Option<T>, MalformedValue>;

/// Mutually exclusive options of one attribute. A box is checked when the
/// single option its name matches equals the attribute's value.
struct OptionGroup<T: 'static> {
    categories: &'static [Category],
    options: &'static [(T, Pattern)],
    current: Current<T>,
}

impl<T> CheckboxRule for OptionGroup<T>
where
    T: Copy + PartialEq + Send + Sync + 'static,
{
    fn evaluate(
        &self,
        category: Category,
        normalized: &str,
        data: &ApplicationData,
    ) -> Result<Outcome, MalformedValue> {
        if !self.categories.contains(&category) {
            return Ok(Outcome::NotApplicable);
        }
        let mut matched = self
            .options
            .iter()
            .filter(|(_, pattern)| pattern.matches(normalized))
            .map(|(option, _)| *option);

        let outcome = match (matched.next(), matched.next()) {
            (None, _) => Outcome::NotApplicable,
            (Some(_), Some(_)) => Outcome::Undetermined,
            (Some(option), None) => match (self.current)(data)? {
                Some(value) => Outcome::Decided(value == option),
                None => Outcome::Undetermined,
            },
        };
        Ok(outcome)
    }
}

/// A `...Ja` / `...Nein` box pair answering one question.
struct YesNoQuestion {
    topic: Pattern,
    answer: fn(&ApplicationData) -> Result<bool, MalformedValue>,
}

impl CheckboxRule for YesNoQuestion {
    fn evaluate(
        &self,
        _category: Category,
        normalized: &str,
        data: &ApplicationData,
    ) -> Result<Outcome, MalformedValue> {
        if !self.topic.matches(normalized) {
            return Ok(Outcome::NotApplicable);
        }
        let outcome = if normalized.ends_with("nein") {
            Outcome::Decided(!(self.answer)(data)?)
        } else if normalized.ends_with("ja") {
            Outcome::Decided((self.answer)(data)?)
        } else {
            Outcome::Undetermined
        };
        Ok(outcome)
    }
}

/// A standalone box mirroring one boolean.
struct Flag {
    pattern: Pattern,
    value: fn(&ApplicationData) -> bool,
}

impl CheckboxRule for Flag {
    fn evaluate(
        &self,
        _category: Category,
        normalized: &str,
        data: &ApplicationData,
    ) -> Result<Outcome, MalformedValue> {
        Ok(if self.pattern.matches(normalized) {
            Outcome::Decided((self.value)(data))
        } else {
            Outcome::NotApplicable
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplicationKind {
    First,
    Continuation,
}

/// How an additional cost is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Billing {
    NoCosts,
    InRent,
    Separate,
}

const APPLICATION_KINDS: &[(ApplicationKind, Pattern)] = &[
    (
        ApplicationKind::First,
        Pattern::any(&["erstantrag"]).but_not(&["weiter", "folge"]),
    ),
    (
        ApplicationKind::Continuation,
        Pattern::any(&["weiterleistung", "folgeantrag"]),
    ),
];

const GENDERS: &[(Gender, Pattern)] = &[
    (Gender::Male, Pattern::any(&["maennlich"])),
    (Gender::Female, Pattern::any(&["weiblich"])),
    (Gender::Diverse, Pattern::any(&["divers"])),
    (Gender::Unspecified, Pattern::any(&["keineangabe", "ohneangabe"])),
];

const MARITAL_STATUSES: &[(MaritalStatus, Pattern)] = &[
    (MaritalStatus::Single, Pattern::any(&["ledig"]).but_not(&["nicht"])),
    (MaritalStatus::Married, Pattern::any(&["verheiratet"]).but_not(&["nicht"])),
    (MaritalStatus::Divorced, Pattern::any(&["geschieden"]).but_not(&["nicht"])),
    (MaritalStatus::Widowed, Pattern::any(&["verwitwet"]).but_not(&["nicht"])),
    (MaritalStatus::Separated, Pattern::any(&["getrennt"])),
    (
        MaritalStatus::RegisteredPartnership,
        Pattern::any(&["lebenspartner"]).but_not(&["nichtehelich"]),
    ),
    (
        MaritalStatus::CohabitingPartnership,
        Pattern::any(&["nichtehelich"]),
    ),
];

const EMPLOYMENT_STATUSES: &[(EmploymentStatus, Pattern)] = &[
    (
        EmploymentStatus::Employed,
        Pattern::any(&["arbeitnehmer", "erwerbstaetig", "angestellt"]).but_not(&["nicht"]),
    ),
    (
        EmploymentStatus::SelfEmployed,
        Pattern::any(&["selbststaendig", "selbstaendig", "freiberuf"]),
    ),
    (EmploymentStatus::Unemployed, Pattern::any(&["arbeitslos"])),
    (EmploymentStatus::Retired, Pattern::any(&["rentner", "pensionaer"])),
    (EmploymentStatus::Student, Pattern::any(&["student"])),
    (
        EmploymentStatus::Trainee,
        Pattern::any(&["azubi", "auszubild", "schueler"]),
    ),
    (
        EmploymentStatus::NotInLabourForce,
        Pattern::any(&["nichterwerbsperson"]),
    ),
];

const TENURES: &[(HousingTenure, Pattern)] = &[
    (HousingTenure::MainTenant, Pattern::any(&["hauptmieter"])),
    (HousingTenure::Subtenant, Pattern::any(&["untermieter"])),
    (HousingTenure::CareHomeResident, Pattern::any(&["heimbewohner"])),
    (
        HousingTenure::Owner,
        Pattern::any(&["eigentuemer", "bewohnermehr"]),
    ),
];

const HEATING_BILLING: &[(Billing, Pattern)] = &[
    (Billing::NoCosts, Pattern::ending(&["nein"]).and(&["heizkost"])),
    (Billing::InRent, Pattern::ending(&["ja"]).and(&["heizkost"])),
    (Billing::Separate, Pattern::ending(&["jagesond"]).and(&["heizkost"])),
];

const HOT_WATER_BILLING: &[(Billing, Pattern)] = &[
    (Billing::NoCosts, Pattern::ending(&["nein"]).and(&["warmwasser"])),
    (Billing::InRent, Pattern::ending(&["ja"]).and(&["warmwasser"])),
    (Billing::Separate, Pattern::ending(&["jagesond"]).and(&["warmwasser"])),
];

static CHECKBOX_RULES: OnceLock<Vec<Box<dyn CheckboxRule>>> = OnceLock::new();

fn checkbox_rules() -> &'static [Box<dyn CheckboxRule>] {
    CHECKBOX_RULES.get_or_init(|| {
        let mut rules: Vec<Box<dyn CheckboxRule>> = vec![
            Box::new(OptionGroup {
                categories: &[Category::ApplicationMeta],
                options: APPLICATION_KINDS,
                current: |data| {
                    Ok(Some(if data.application.first_application {
                        ApplicationKind::First
                    } else {
                        ApplicationKind::Continuation
                    }))
                },
            }),
            Box::new(OptionGroup {
                categories: &[Category::Person],
                options: GENDERS,
                current: |data| data.applicant.gender.as_deref().map(Gender::parse).transpose(),
            }),
            Box::new(OptionGroup {
                categories: &[Category::Person],
                options: MARITAL_STATUSES,
                current: |data| {
                    data.applicant
                        .marital_status
                        .as_deref()
                        .map(MaritalStatus::parse)
                        .transpose()
                },
            }),
            Box::new(OptionGroup {
                categories: &[Category::EmploymentStatus, Category::Person],
                options: EMPLOYMENT_STATUSES,
                current: |data| {
                    data.applicant
                        .employment_status
                        .as_deref()
                        .map(EmploymentStatus::parse)
                        .transpose()
                },
            }),
            Box::new(OptionGroup {
                categories: &[Category::Housing],
                options: TENURES,
                current: |data| data.housing.tenure.as_deref().map(HousingTenure::parse).transpose(),
            }),
            Box::new(OptionGroup {
                categories: &[Category::Rent],
                options: HEATING_BILLING,
                current: |data| {
                    let rent = &data.rent;
                    Ok(Some(billing(rent.heating()?, rent.heating_included)))
                },
            }),
            Box::new(OptionGroup {
                categories: &[Category::Rent],
                options: HOT_WATER_BILLING,
                current: |data| {
                    let rent = &data.rent;
                    Ok(Some(billing(rent.hot_water()?, rent.hot_water_included)))
                },
            }),
        ];
        rules.extend(yes_no_questions());
        rules.extend(flags());
        rules
    })
}

fn billing(amount: Option<f64>, included: bool) -> Billing {
    match amount {
        Some(value) if value > 0.0 && included => Billing::InRent,
        Some(value) if value > 0.0 => Billing::Separate,
        _ => Billing::NoCosts,
    }
}

fn question(
    keywords: &'static [&'static str],
    answer: fn(&ApplicationData) -> Result<bool, MalformedValue>,
) -> Box<dyn CheckboxRule> {
    Box::new(YesNoQuestion {
        topic: Pattern::any(keywords),
        answer,
    })
}

fn yes_no_questions() -> Vec<Box<dyn CheckboxRule>> {
    vec![
        question(&["verwandt"], |data| Ok(data.housing.related_to_landlord)),
        question(&["gefoerdert", "mietpreisbindung"], |data| {
            Ok(data.housing.is_rent_controlled())
        }),
        question(&["wohnberechtigung"], |data| {
            Ok(data.housing.housing_entitlement_certificate)
        }),
        question(&["anderewohnung"], |data| {
            Ok(data.supplemental.other_apartment_benefit)
        }),
        question(&["zweitwohnsitz"], |data| Ok(data.supplemental.secondary_residence)),
        question(&["hhmtod", "verstorben"], |data| {
            Ok(data.supplemental.household_member_deceased)
        }),
        question(&["hhmanzahl"], |data| Ok(data.supplemental.household_size_changed)),
        question(&["transfleistung"], |data| Ok(data.supplemental.transfer_benefits)),
        question(&["wohngeldbeantragen"], |data| Ok(data.supplemental.asked_to_apply)),
        question(&["freibwerb"], |data| Ok(data.supplemental.work_expenses)),
        question(&["kinderbetreu"], |data| Ok(data.supplemental.childcare_costs)),
        question(&["schwerbe", "pflegegrad"], |data| {
            Ok(data.supplemental.disability_or_care)
        }),
        question(&["freibunterh"], |data| Ok(data.supplemental.pays_maintenance)),
        question(&["sonsteinunterh"], |data| {
            Ok(data.supplemental.unenforced_maintenance)
        }),
        question(&["sonsteineinm"], |data| Ok(data.supplemental.one_time_income)),
        question(&["sonsteinerh"], |data| Ok(data.supplemental.income_change_expected)),
        question(&["vermoegen"], |data| Ok(data.supplemental.assets_above_threshold)),
        question(&["mieteveraend"], |data| Ok(data.supplemental.rent_change_expected)),
        question(&["mietedritte"], |data| Ok(data.supplemental.third_party_pays_rent)),
        question(&["mieteanderepers"], |data| {
            Ok(data.supplemental.other_persons_pay_rent)
        }),
        question(&["kostentragen"], |data| {
            Ok(data.supplemental.third_party_bears_costs)
        }),
        question(&["weiterepersonen"], |data| Ok(data.supplemental.additional_persons)),
        question(&["garage", "service", "haushaltsenergie"], |_| Ok(false)),
    ]
}

fn flag(pattern: Pattern, value: fn(&ApplicationData) -> bool) -> Box<dyn CheckboxRule> {
    Box::new(Flag { pattern, value })
}

fn flags() -> Vec<Box<dyn CheckboxRule>> {
    vec![
        flag(Pattern::any(&["steuern"]), |data| data.income.pays_taxes),
        flag(Pattern::any(&["rvlv", "rentenversicherung"]), |data| {
            data.income.pays_pension_insurance
        }),
        flag(
            Pattern::any(&["krankenversicherung", "pflegeversicherung"]),
            |data| data.income.pays_health_insurance,
        ),
        flag(Pattern::ending(&["kv"]).and(&["einnahme"]), |data| {
            data.income.pays_health_insurance
        }),
        flag(Pattern::any(&["zahlunganmich"]), |data| data.bank.pay_to_applicant),
        flag(Pattern::any(&["auszahlunghhm"]), |data| !data.bank.pay_to_applicant),
        flag(Pattern::any(&["kontoauszuege"]), |data| {
            data.supplemental.bank_statement_consent
        }),
        flag(Pattern::any(&["hinweisabfrage", "einverstaendnis"]), |data| {
            data.application.consent
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::normalize;

    fn decide(category: Category, name: &str, data: &ApplicationData) -> Option<bool> {
        resolve(category, &normalize(name), data).expect("well-formed data")
    }

    #[test]
    fn marital_status_group_is_exclusive() {
        let data = ApplicationData::sample();
        let boxes = [
            "MZ1.3-CB_PersAngFamStandledig",
            "MZ1.3-CB_PersAngFamStandverheiratet",
            "MZ1.3-CB_PersAngFamStandgeschieden",
            "MZ1.3-CB_PersAngFamStandverwitwet",
            "MZ1.3-CB_PersAngFamStandgetrenntlebend",
            "MZ1.3-CB_PersAngFamStandeingLebenspartner",
            "MZ1.3-CB_PersAngFamStandnichtehelicheLebenspartner",
        ];
        let decided: Vec<Option<bool>> = boxes
            .iter()
            .map(|name| decide(Category::Person, name, &data))
            .collect();
        assert_eq!(
            decided,
            vec![
                Some(false),
                Some(false),
                Some(true),
                Some(false),
                Some(false),
                Some(false),
                Some(false)
            ]
        );
    }

    #[test]
    fn ambiguous_or_unknown_options_are_skipped() {
        let data = ApplicationData::sample();
        assert_eq!(decide(Category::Person, "Status.ledigOderVerheiratet", &data), None);
        assert_eq!(decide(Category::Person, "Status.nichtGeschieden", &data), None);

        let mut unknown = ApplicationData::sample();
        unknown.applicant.gender = None;
        assert_eq!(decide(Category::Person, "MZ1.3-CB_PersAngGeschlechtWeiblich", &unknown), None);
    }

    #[test]
    fn malformed_attribute_is_reported() {
        let mut data = ApplicationData::sample();
        data.applicant.marital_status = Some("kompliziert".to_string());
        let result = resolve(
            Category::Person,
            &normalize("MZ1.3-CB_PersAngFamStandledig"),
            &data,
        );
        assert!(result.is_err());
    }

    #[test]
    fn yes_no_pairs_answer_questions() {
        let data = ApplicationData::sample();
        assert_eq!(decide(Category::YesNo, "MZ1.3-CB_TransfLeistungJa", &data), Some(true));
        assert_eq!(decide(Category::YesNo, "MZ1.3-CB_TransfLeistungNein", &data), Some(false));
        assert_eq!(decide(Category::YesNo, "MZ1.3-CB_FreiBSchwerBeJa", &data), Some(true));
        assert_eq!(decide(Category::Housing, "MZ1.3-CB_WohnungZweitwohnsitzNein", &data), Some(true));
        assert_eq!(decide(Category::YesNo, "MZ1.3-CB_SonstEinErhJaVer", &data), None);
    }

    #[test]
    fn heating_billing_follows_rent_data() {
        let data = ApplicationData::sample();
        assert_eq!(decide(Category::Rent, "MZ1.3-CB_MonatMieteHeizkostemNein", &data), Some(false));
        assert_eq!(decide(Category::Rent, "MZ1.3-CB_MonatMieteHeizkostemJa", &data), Some(false));
        assert_eq!(decide(Category::Rent, "MZ1.3-CB_MonatMieteHeizkostemJaGesond", &data), Some(true));
        assert_eq!(decide(Category::Rent, "MZ1.3-CB_MonatMieteWarmwasserNein", &data), Some(true));
    }

    #[test]
    fn flags_mirror_booleans() {
        let data = ApplicationData::sample();
        assert_eq!(decide(Category::Income, "MZ1.3-CB_EinnahmeHHM1KV", &data), Some(true));
        assert_eq!(decide(Category::Income, "MZ1.3-CB_EinnahmeHHM1Steuern", &data), Some(false));
        assert_eq!(decide(Category::Bank, "MZ1.3-CB_ZahlungAnMich", &data), Some(true));
        assert_eq!(decide(Category::Bank, "MZ1.3-CB_EinverstKontoauszuege", &data), Some(true));
    }
}
