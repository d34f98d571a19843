//! Language vocabulary shared between callers and providers.
//!
//! Callers express preferences as human-readable names ("English");
//! providers speak three-letter codes ("eng") and answer with their own
//! labels. This module owns the mapping table and the tolerant matching
//! used by the selector.

/// Known caller-facing names and their provider codes.
const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("english", "eng"),
    ("swedish", "swe"),
    ("finnish", "fin"),
    ("spanish", "spa"),
    ("icelandic", "ice"),
    ("danish", "dan"),
    ("french", "fre"),
    ("german", "ger"),
    ("norwegian", "nor"),
    ("dutch", "dut"),
];

/// Look up the provider code for a caller language name.
///
/// Returns `None` for names outside the known vocabulary; callers decide
/// whether to drop the language or broaden the query.
pub fn provider_code(language: &str) -> Option<&'static str> {
    let needle = language.trim().to_lowercase();
    LANGUAGE_TABLE
        .iter()
        .find(|(name, code)| *name == needle || *code == needle)
        .map(|(_, code)| *code)
}

/// Translate an ordered preference list into provider codes.
///
/// Languages with no known mapping are silently dropped; order is
/// preserved for the rest.
pub fn to_provider_codes(languages: &[String]) -> Vec<&'static str> {
    languages
        .iter()
        .filter_map(|lang| provider_code(lang))
        .collect()
}

/// Whether a provider-supplied label satisfies a caller preference.
///
/// Matches case-insensitively, and tolerates vocabulary differences by
/// comparing through the provider-code table ("eng" matches "English").
pub fn labels_match(label: &str, preference: &str) -> bool {
    let label_norm = label.trim().to_lowercase();
    let pref_norm = preference.trim().to_lowercase();

    if label_norm == pref_norm {
        return true;
    }

    match (provider_code(&label_norm), provider_code(&pref_norm)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
