use std::sync::OnceLock;

use super::{present, present_opt};
use crate::forms::classifier::{Category, Pattern};
use crate::forms::domain::ApplicationData;
use crate::forms::values::{format_decimal, format_integer, format_money, MalformedValue};

type Extract = fn(&ApplicationData) -> Result<Option<String>, MalformedValue>;

struct TextRule {
    category: Category,
    pattern: Pattern,
    extract: Extract,
}

/// First rule of the field's category whose pattern matches and whose
/// attribute is present supplies the value.
pub(super) fn resolve(
    category: Category,
    normalized: &str,
    data: &ApplicationData,
) -> Result<Option<String>, MalformedValue> {
    for rule in text_rules()
        .iter()
        .filter(|rule| rule.category == category && rule.pattern.matches(normalized))
    {
        if let Some(value) = (rule.extract)(data)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

fn money(amount: Result<Option<f64>, MalformedValue>) -> Result<Option<String>, MalformedValue> {
    Ok(amount?.filter(|value| *value > 0.0).map(format_money))
}

static TEXT_RULES: OnceLock<Vec<TextRule>> = OnceLock::new();

fn text_rules() -> &'static [TextRule] {
    TEXT_RULES.get_or_init(|| {
        let mut rules = Vec::new();
        rules.extend(authority_rules());
        rules.extend(application_rules());
        rules.extend(person_rules());
        rules.extend(address_rules());
        rules.extend(housing_rules());
        rules.extend(rent_rules());
        rules.extend(income_rules());
        rules.extend(bank_rules());
        rules
    })
}

fn rule(category: Category, pattern: Pattern, extract: Extract) -> TextRule {
    TextRule {
        category,
        pattern,
        extract,
    }
}

fn authority_rules() -> Vec<TextRule> {
    let authority = Category::Authority;
    vec![
        rule(authority, Pattern::any(&["strasse"]), |data| {
            Ok(data
                .application
                .authority
                .as_ref()
                .and_then(|a| present_opt(&a.street)))
        }),
        rule(authority, Pattern::any(&["plz", "postleitzahl"]), |data| {
            Ok(data
                .application
                .authority
                .as_ref()
                .and_then(|a| present_opt(&a.postcode)))
        }),
        rule(authority, Pattern::any(&["ort", "stadt"]), |data| {
            Ok(data
                .application
                .authority
                .as_ref()
                .and_then(|a| present_opt(&a.city)))
        }),
        rule(authority, Pattern::any(&["name", "bezeichnung"]), |data| {
            Ok(data
                .application
                .authority
                .as_ref()
                .and_then(|a| present(&a.name)))
        }),
    ]
}

fn application_rules() -> Vec<TextRule> {
    let meta = Category::ApplicationMeta;
    vec![
        rule(
            meta,
            Pattern::any(&["wognr", "wohngeldnummer", "aktenzeichen"]).but_not(&["datum"]),
            |data| {
                if data.application.first_application {
                    return Ok(None);
                }
                Ok(present_opt(&data.application.benefit_number))
            },
        ),
        rule(meta, Pattern::any(&["wohngeldab", "leistungab"]), |data| {
            Ok(present_opt(&data.application.benefit_from))
        }),
        rule(meta, Pattern::any(&["formlos"]), |data| {
            Ok(present_opt(&data.application.informal_application_date))
        }),
        rule(meta, Pattern::any(&["antragsdatum"]), |data| {
            Ok(present_opt(&data.application.application_date))
        }),
    ]
}

fn person_rules() -> Vec<TextRule> {
    let person = Category::Person;
    vec![
        rule(person, Pattern::any(&["geburtsdatum", "geboren"]), |data| {
            Ok(present(&data.applicant.birth_date))
        }),
        rule(person, Pattern::any(&["geburtsort"]), |data| {
            Ok(present_opt(&data.applicant.birth_place))
        }),
        rule(person, Pattern::any(&["geburtsname"]), |data| {
            Ok(present_opt(&data.applicant.birth_name))
        }),
        rule(
            person,
            Pattern::any(&["familienname", "nachname"]).but_not(&["vorname", "geburts"]),
            |data| Ok(present(&data.applicant.last_name)),
        ),
        rule(person, Pattern::any(&["vorname"]), |data| {
            Ok(present(&data.applicant.first_name))
        }),
        rule(person, Pattern::any(&["staatsangehoerig"]), |data| {
            Ok(present(&data.applicant.nationality))
        }),
        rule(person, Pattern::any(&["telefon"]), |data| {
            Ok(present_opt(&data.applicant.phone))
        }),
        rule(person, Pattern::any(&["email"]), |data| {
            Ok(present_opt(&data.applicant.email))
        }),
    ]
}

fn address_rules() -> Vec<TextRule> {
    let address = Category::Address;
    vec![
        rule(address, Pattern::any(&["hausnummer", "hausnr"]), |data| {
            Ok(present(&data.address.house_number))
        }),
        rule(address, Pattern::any(&["strasse"]), |data| {
            Ok(present(&data.address.street))
        }),
        rule(address, Pattern::any(&["postleitzahl", "plz"]), |data| {
            Ok(present(&data.address.postcode))
        }),
        rule(address, Pattern::any(&["wohnort", "stadt", "gemeinde"]), |data| {
            Ok(present(&data.address.city))
        }),
        rule(address, Pattern::any(&["bundesland"]), |data| {
            Ok(present_opt(&data.address.state))
        }),
        rule(
            address,
            Pattern::any(&["anschrift", "adresse"]).but_not(&[
                "hausn",
                "strasse",
                "plz",
                "postleitzahl",
                "wohnort",
                "stadt",
                "gemeinde",
                "bundesland",
            ]),
            |data| Ok(Some(data.address.full())),
        ),
    ]
}

fn housing_rules() -> Vec<TextRule> {
    let housing = Category::Housing;
    vec![
        rule(housing, Pattern::any(&["einzug"]), |data| {
            Ok(present_opt(&data.housing.move_in_date))
        }),
        rule(
            housing,
            Pattern::any(&["wohnflaeche", "flaeche", "groesse", "qm"]),
            |data| {
                let area = data
                    .housing
                    .living_area_sqm
                    .as_ref()
                    .map(|area| area.value("housing.livingAreaSqm"))
                    .transpose()?;
                Ok(area.map(format_decimal))
            },
        ),
        rule(housing, Pattern::any(&["zimmer", "raeume"]), |data| {
            Ok(data.housing.rooms.map(|rooms| format_integer(i64::from(rooms))))
        }),
        rule(housing, Pattern::any(&["baujahr"]), |data| {
            Ok(present_opt(&data.housing.construction_year))
        }),
        rule(housing, Pattern::any(&["vermieter"]), |data| {
            Ok(present_opt(&data.housing.landlord_name))
        }),
    ]
}

fn rent_rules() -> Vec<TextRule> {
    let rent = Category::Rent;
    vec![
        rule(rent, Pattern::any(&["heizkost", "heizung"]), |data| {
            money(data.rent.heating())
        }),
        rule(rent, Pattern::any(&["warmwasser"]), |data| {
            money(data.rent.hot_water())
        }),
        rule(rent, Pattern::any(&["kaltmiete", "grundmiete"]), |data| {
            money(data.rent.cold_rent())
        }),
        rule(
            rent,
            Pattern::any(&["nebenkosten", "betriebskosten"]),
            |data| money(data.rent.utilities()),
        ),
        rule(rent, Pattern::any(&["gesamt", "warmmiete"]), |data| {
            money(data.rent.total())
        }),
    ]
}

fn income_rules() -> Vec<TextRule> {
    let income = Category::Income;
    vec![
        rule(income, Pattern::any(&["kindergeld"]), |data| {
            money(data.income.child_benefit())
        }),
        rule(income, Pattern::any(&["unterhalt"]), |data| {
            money(data.income.maintenance())
        }),
        rule(income, Pattern::any(&["netto"]), |data| {
            money(data.income.net_monthly())
        }),
        rule(
            income,
            Pattern::any(&["brutto", "einkommen", "verdienst", "gehalt", "lohn"]),
            |data| money(data.income.gross_monthly()),
        ),
    ]
}

fn bank_rules() -> Vec<TextRule> {
    let bank = Category::Bank;
    vec![
        rule(bank, Pattern::any(&["bic"]), |data| Ok(present_opt(&data.bank.bic))),
        rule(bank, Pattern::any(&["kontoinhaber"]), |data| {
            Ok(present_opt(&data.bank.account_holder).or_else(|| {
                present(&format!(
                    "{} {}",
                    data.applicant.first_name, data.applicant.last_name
                ))
            }))
        }),
        rule(bank, Pattern::any(&["familienname", "nachname"]), |data| {
            Ok(present_opt(&data.bank.holder_last_name)
                .or_else(|| present(&data.applicant.last_name)))
        }),
        rule(bank, Pattern::any(&["vorname"]), |data| {
            Ok(present_opt(&data.bank.holder_first_name)
                .or_else(|| present(&data.applicant.first_name)))
        }),
        rule(bank, Pattern::any(&["anschrift", "adresse"]), |data| {
            Ok(present_opt(&data.bank.holder_address).or_else(|| Some(data.address.full())))
        }),
        rule(bank, Pattern::any(&["iban"]), |data| Ok(present(&data.bank.iban))),
        rule(
            bank,
            Pattern::any(&["bank", "kreditinstitut", "geldinstitut"]),
            |data| Ok(present_opt(&data.bank.bank_name)),
        ),
    ]
}
