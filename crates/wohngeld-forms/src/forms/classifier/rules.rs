use super::pattern::Pattern;
use super::Category;

/// Category keyword table, consulted top to bottom; the first match wins.
///
/// Keywords are stored pre-normalized. Housing keywords avoid every rent term
/// so a rent field can never be claimed by the earlier housing rule.
pub(crate) const CATEGORY_RULES: &[(Category, Pattern)] = &[
    (
        Category::Authority,
        Pattern::any(&[
            "behoerde",
            "dienststelle",
            "bezirksamt",
            "landratsamt",
            "wohngeldstelle",
            "stadtverwaltung",
            "kreisverwaltung",
        ]),
    ),
    (
        Category::ApplicationMeta,
        Pattern::any(&[
            "erstantrag",
            "weiterleistung",
            "folgeantrag",
            "aktenzeichen",
            "wohngeldnummer",
            "wognr",
            "antragsdatum",
            "antragstyp",
            "formlos",
            "wohngeldab",
            "leistungab",
            "hinweisabfrage",
            "einverstaendnis",
        ]),
    ),
    (
        Category::Person,
        Pattern::any(&[
            "familienname",
            "vorname",
            "nachname",
            "geburt",
            "geschlecht",
            "maennlich",
            "weiblich",
            "divers",
            "famstand",
            "familienstand",
            "ledig",
            "verheiratet",
            "geschieden",
            "verwitwet",
            "staatsangehoerig",
            "telefon",
            "email",
        ])
        .but_not(&["auszahlung", "kontoinhaber"]),
    ),
    (
        Category::Address,
        Pattern::any(&[
            "strasse",
            "hausnummer",
            "hausnr",
            "plz",
            "postleitzahl",
            "wohnort",
            "anschrift",
            "adresse",
            "bundesland",
            "gemeinde",
        ])
        .but_not(&["einzug", "datum", "auszahlung", "kontoinhaber"]),
    ),
    (
        Category::Housing,
        Pattern::any(&[
            "wohnung",
            "wohnflaeche",
            "zimmer",
            "raeume",
            "einzug",
            "baujahr",
            "vermieter",
            "hauptmieter",
            "untermieter",
            "heimbewohner",
            "ichbin",
            "wohnraum",
            "eigentuemer",
            "wohnberechtigung",
        ]),
    ),
    (
        Category::Rent,
        Pattern::any(&[
            "miete",
            "nebenkosten",
            "betriebskosten",
            "heizkost",
            "warmwasser",
        ]),
    ),
    (
        Category::Income,
        Pattern::any(&[
            "einnahme",
            "einkommen",
            "verdienst",
            "gehalt",
            "lohn",
            "brutto",
            "netto",
            "rente",
            "kindergeld",
            "unterhalt",
        ])
        .but_not(&["rentner"]),
    ),
    (
        Category::EmploymentStatus,
        Pattern::any(&[
            "erwerb",
            "arbeitslos",
            "arbeitnehmer",
            "rentner",
            "student",
            "schueler",
            "selbststaendig",
            "selbstaendig",
            "azubi",
        ]),
    ),
    (
        Category::Bank,
        Pattern::any(&[
            "iban",
            "bic",
            "bank",
            "konto",
            "kreditinstitut",
            "auszahlung",
            "zahlung",
        ]),
    ),
    (Category::YesNo, Pattern::ending(&["ja", "nein"])),
];
