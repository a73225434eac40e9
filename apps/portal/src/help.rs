//! Help topics. Identifier type topics (`help KVK`) are built from the lookup tables.

use ctn::features::identifiers::catalog;

const TOPICS: &[(&str, &str)] = &[
    (
        "members",
        "Members are organizations in the association. Creating a member also registers its \
         legal entity. Org IDs look like org:acme-logistics.",
    ),
    (
        "identifiers",
        "Pick the country first: it decides which identifier types are offered. Selecting a type \
         fills in its registry; the value is checked against the type's format before saving.",
    ),
    (
        "contacts",
        "Each legal entity has one primary contact. Email is required; phone numbers may contain \
         digits, spaces, dashes and brackets.",
    ),
    (
        "endpoints",
        "Endpoints are the URLs a member exposes for data exchange. Use https; plain http is \
         accepted for localhost only. Deactivated endpoints keep their tokens.",
    ),
    (
        "tokens",
        "Tokens authenticate an endpoint against the register. The secret is shown once when \
         issued; only its prefix is listed afterwards. Lifetimes run from 1 to 365 days.",
    ),
    (
        "kvk",
        "Upload the KvK extract as a PDF (10 MiB at most). The register reads it, compares it \
         with the entered data and flags differences for review. Rejections need a note.",
    ),
    (
        "grids",
        "Grids accept --search, --sort column[:desc], --page, --page-size (10, 20, 50, 100) and \
         --columns. Columns, sort and page size are remembered per grid.",
    ),
    (
        "drafts",
        "A failed identifier, contact or endpoint submission is kept as a draft. Run the same \
         command with --resume to continue from it.",
    ),
];

/// Text of a topic; identifier type codes resolve to their hint and registry.
#[must_use]
pub fn topic(name: &str) -> Option<String> {
    let name = name.trim();
    if let Some((_, text)) = TOPICS.iter().find(|(t, _)| t.eq_ignore_ascii_case(name)) {
        return Some((*text).to_owned());
    }

    catalog::lookup(name).map(|kind| match kind.registry {
        Some(registry) => format!("{}: {} ({}, {})", kind.code, kind.hint, registry.name, registry.url),
        None => format!("{}: {}", kind.code, kind.hint),
    })
}

#[must_use]
pub fn topics() -> Vec<&'static str> {
    TOPICS.iter().map(|(t, _)| *t).collect()
}

/// Identifier types offered for a country, with their hints.
#[must_use]
pub fn identifier_types(country: &str) -> Vec<(String, String)> {
    catalog::types_for_country(country)
        .iter()
        .map(|code| {
            let hint = catalog::lookup(code).map(|k| k.hint).unwrap_or_default();
            ((*code).to_owned(), hint.to_owned())
        })
        .collect()
}
