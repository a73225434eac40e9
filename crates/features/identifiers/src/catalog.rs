//! Static identifier lookup tables: which identifier types a country offers, and the registry,
//! value pattern and hint of each type.

use regex::Regex;
use std::sync::LazyLock;

/// Registry an identifier type is issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registry {
    pub name: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierKind {
    pub code: &'static str,
    pub registry: Option<Registry>,
    /// `None` accepts any non-empty value.
    pub pattern: Option<&'static str>,
    pub hint: &'static str,
}

const fn kind(
    code: &'static str,
    registry: &'static str,
    url: &'static str,
    pattern: &'static str,
    hint: &'static str,
) -> IdentifierKind {
    IdentifierKind { code, registry: Some(Registry { name: registry, url }), pattern: Some(pattern), hint }
}

pub const KINDS: &[IdentifierKind] = &[
    kind("KVK", "Kamer van Koophandel", "https://www.kvk.nl/", r"^[0-9]{8}$", "8 digits"),
    kind("LEI", "GLEIF", "https://search.gleif.org/", r"^[A-Z0-9]{20}$", "20 alphanumeric characters"),
    kind(
        "EORI",
        "EU EORI validation",
        "https://ec.europa.eu/taxation_customs/dds2/eos/eori_validation.jsp",
        r"^[A-Z]{2}[A-Z0-9]{1,15}$",
        "country code + up to 15 alphanumerics",
    ),
    kind(
        "EUID",
        "European e-Justice (BRIS)",
        "https://e-justice.europa.eu/",
        r"^[A-Z]{2}[A-Z0-9]{1,10}\.[A-Z0-9.\-]{1,30}$",
        "country + register code, dot, number",
    ),
    kind(
        "VAT",
        "VIES",
        "https://ec.europa.eu/taxation_customs/vies/",
        r"^[A-Z]{2}[A-Z0-9]{2,13}$",
        "country code + 2-13 alphanumerics",
    ),
    kind("DUNS", "Dun & Bradstreet", "https://www.dnb.com/", r"^[0-9]{9}$", "9 digits"),
    kind("GLN", "GS1", "https://www.gs1.org/", r"^[0-9]{13}$", "13 digits"),
    kind(
        "HRB",
        "Handelsregister",
        "https://www.handelsregister.de/",
        r"^HR[BA] ?[0-9]{1,6}( ?[A-Z]{1,2})?$",
        "prefix + up to 6 digits",
    ),
    kind(
        "HRA",
        "Handelsregister",
        "https://www.handelsregister.de/",
        r"^HR[BA] ?[0-9]{1,6}( ?[A-Z]{1,2})?$",
        "prefix + up to 6 digits",
    ),
    kind(
        "KBO",
        "Kruispuntbank van Ondernemingen",
        "https://kbopub.economie.fgov.be/",
        r"^[01][0-9]{3}\.?[0-9]{3}\.?[0-9]{3}$",
        "10 digits starting 0/1",
    ),
    kind("SIREN", "INSEE Sirene", "https://www.sirene.fr/", r"^[0-9]{9}$", "9 digits"),
    kind("SIRET", "INSEE Sirene", "https://www.sirene.fr/", r"^[0-9]{14}$", "14 digits"),
    kind(
        "CRN",
        "Companies House",
        "https://find-and-update.company-information.service.gov.uk/",
        r"^([A-Z]{2}[0-9]{6}|[0-9]{8})$",
        "8 characters",
    ),
    IdentifierKind { code: "OTHER", registry: None, pattern: None, hint: "any non-empty value" },
];

const COUNTRY_TYPES: &[(&str, &[&str])] = &[
    ("NL", &["KVK", "LEI", "EORI", "EUID", "VAT", "DUNS", "GLN"]),
    ("DE", &["HRB", "HRA", "LEI", "EORI", "EUID", "VAT", "DUNS"]),
    ("BE", &["KBO", "LEI", "EORI", "EUID", "VAT", "DUNS"]),
    ("FR", &["SIREN", "SIRET", "LEI", "EORI", "EUID", "VAT", "DUNS"]),
    ("GB", &["CRN", "LEI", "EORI", "VAT", "DUNS", "GLN"]),
];

pub const DEFAULT_TYPES: &[&str] = &["LEI", "EORI", "VAT", "DUNS", "GLN", "OTHER"];

static PATTERNS: LazyLock<Vec<(&'static str, Option<Regex>)>> = LazyLock::new(|| {
    KINDS
        .iter()
        .map(|k| (k.code, k.pattern.and_then(|p| Regex::new(p).ok())))
        .collect()
});

/// Uppercased, trimmed country code.
#[must_use]
pub fn normalize_country(country: &str) -> String {
    country.trim().to_ascii_uppercase()
}

/// Identifier types offered for a country; empty or unmapped countries get [`DEFAULT_TYPES`].
#[must_use]
pub fn types_for_country(country: &str) -> &'static [&'static str] {
    let country = normalize_country(country);
    COUNTRY_TYPES
        .iter()
        .find(|(code, _)| *code == country)
        .map_or(DEFAULT_TYPES, |(_, types)| *types)
}

#[must_use]
pub fn lookup(code: &str) -> Option<&'static IdentifierKind> {
    KINDS.iter().find(|k| k.code.eq_ignore_ascii_case(code.trim()))
}

/// Trimmed and uppercased; `OTHER` values are only trimmed.
#[must_use]
pub fn normalize_value(code: &str, value: &str) -> String {
    let value = value.trim();
    if code.eq_ignore_ascii_case("OTHER") { value.to_owned() } else { value.to_uppercase() }
}

/// Whether `value` (normalized first) is acceptable for the type. Unknown types never match.
#[must_use]
pub fn value_matches(code: &str, value: &str) -> bool {
    let Some(kind) = lookup(code) else {
        return false;
    };
    let value = normalize_value(kind.code, value);
    if value.is_empty() {
        return false;
    }

    match kind.pattern {
        None => true,
        Some(_) => PATTERNS
            .iter()
            .find(|(code, _)| *code == kind.code)
            .and_then(|(_, re)| re.as_ref())
            .is_some_and(|re| re.is_match(&value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_type_has_a_compiling_pattern() {
        for (code, re) in PATTERNS.iter() {
            let kind = lookup(code).expect("listed");
            assert_eq!(kind.pattern.is_some(), re.is_some(), "{code} pattern does not compile");
        }
        for (_, types) in COUNTRY_TYPES {
            for code in *types {
                assert!(lookup(code).is_some(), "{code} missing from KINDS");
            }
        }
    }

    #[test]
    fn countries_narrow_the_type_list() {
        assert_eq!(types_for_country(" nl ")[0], "KVK");
        assert!(types_for_country("DE").contains(&"HRB"));
        assert!(!types_for_country("DE").contains(&"KVK"));
        assert_eq!(types_for_country(""), DEFAULT_TYPES);
        assert_eq!(types_for_country("PL"), DEFAULT_TYPES);
    }

    #[test]
    fn patterns_follow_the_registries() {
        let cases = [
            ("KVK", "12345678", true),
            ("KVK", "1234567", false),
            ("KVK", "\u{661}\u{662}\u{663}\u{664}\u{665}\u{666}\u{667}\u{668}", false),
            ("KVK", "\u{ff11}\u{ff12}\u{ff13}\u{ff14}\u{ff15}\u{ff16}\u{ff17}\u{ff18}", false),
            ("DUNS", "\u{967}\u{968}\u{969}\u{96a}\u{96b}\u{96c}\u{96d}\u{96e}\u{96f}", false),
            ("LEI", "724500y6dumb5dkyxd87", true),
            ("LEI", "724500Y6DUMB5DKYXD8", false),
            ("EORI", "NL123456789", true),
            ("EUID", "NLNHR.12345678", true),
            ("VAT", "NL123456789B01", true),
            ("DUNS", "123456789", true),
            ("GLN", "8712345678906", true),
            ("HRB", "HRB 12345 B", true),
            ("HRA", "HRA12345", true),
            ("KBO", "0123.456.789", true),
            ("KBO", "2123456789", false),
            ("SIREN", "732829320", true),
            ("SIRET", "73282932000074", true),
            ("CRN", "SC123456", true),
            ("CRN", "01234567", true),
            ("CRN", "S1234567", false),
            ("OTHER", "  internal ref 7 ", true),
            ("OTHER", "   ", false),
            ("NOPE", "1", false),
        ];
        for (code, value, expected) in cases {
            assert_eq!(value_matches(code, value), expected, "{code} {value:?}");
        }
    }

    #[test]
    fn other_keeps_its_case() {
        assert_eq!(normalize_value("OTHER", " ab-c "), "ab-c");
        assert_eq!(normalize_value("lei", " ab-c "), "AB-C");
    }
}
