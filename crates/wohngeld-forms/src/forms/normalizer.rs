/// UTF-8 umlauts that were decoded as Latin-1/CP1252 somewhere between the form
/// authoring tool and us. Replaced before the character pass.
const MOJIBAKE: &[(&str, &str)] = &[
    ("\u{c3}\u{a4}", "ae"),
    ("\u{c3}\u{b6}", "oe"),
    ("\u{c3}\u{bc}", "ue"),
    ("\u{c3}\u{9f}", "ss"),
    ("\u{c3}\u{178}", "ss"),
    ("\u{c3}\u{84}", "ae"),
    ("\u{c3}\u{201e}", "ae"),
    ("\u{c3}\u{96}", "oe"),
    ("\u{c3}\u{2013}", "oe"),
    ("\u{c3}\u{9c}", "ue"),
    ("\u{c3}\u{153}", "ue"),
];

/// Canonical comparison key for field names and keywords.
///
/// Lowercases, folds German umlauts and `ß` (precomposed, decomposed and
/// mojibake spellings) to `ae`/`oe`/`ue`/`ss`, and drops everything outside
/// `[a-z0-9]`. Total and idempotent.
pub fn normalize(name: &str) -> String {
    let mut repaired = name.to_string();
    if repaired.contains('\u{c3}') {
        for (broken, digraph) in MOJIBAKE {
            repaired = repaired.replace(broken, digraph);
        }
    }

    let mut normalized = String::with_capacity(repaired.len());
    for ch in repaired.chars().flat_map(char::to_lowercase) {
        match ch {
            'a'..='z' | '0'..='9' => normalized.push(ch),
            'ä' => normalized.push_str("ae"),
            'ö' => normalized.push_str("oe"),
            'ü' => normalized.push_str("ue"),
            'ß' | 'ẞ' => normalized.push_str("ss"),
            // combining diaeresis after a decomposed vowel
            '\u{308}' => normalized.push('e'),
            _ => {}
        }
    }
    normalized
}
