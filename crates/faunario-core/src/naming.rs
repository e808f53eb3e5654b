//! Filesystem-safe canonical names for asset files.
//!
//! The animal's common name is the stable key for asset naming, so it has to
//! survive as a directory/file name on every platform. Spanish diacritics are
//! transliterated instead of dropped so "Tucán" becomes `tucan`, not `tuc_n`.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum length for normalized names.
const MAX_NAME_LENGTH: usize = 64;

/// Regex for runs of separators.
static CONSECUTIVE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]{2,}").unwrap());

/// Regex for everything that is not ASCII-alphanumeric, `-` or `_`.
static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\-_]").unwrap());

/// Transliteration table for the diacritics that appear in the source data.
const TRANSLITERATIONS: &[(char, &str)] = &[
    ('á', "a"),
    ('é', "e"),
    ('í', "i"),
    ('ó', "o"),
    ('ú', "u"),
    ('ü', "u"),
    ('ñ', "n"),
];

/// Normalize a common name into a canonical asset name.
///
/// Rules: lowercase, transliterate Spanish diacritics, spaces to underscores,
/// strip anything else, collapse and trim separators, cap the length, and
/// never return an empty string.
///
/// # Examples
///
/// ```
/// use faunario_core::naming::canonical_name;
///
/// assert_eq!(canonical_name("Ajolote"), "ajolote");
/// assert_eq!(canonical_name("Tucán Pico Canoa"), "tucan_pico_canoa");
/// assert_eq!(canonical_name("Vaquita marina"), "vaquita_marina");
/// ```
pub fn canonical_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        match TRANSLITERATIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => result.push_str(to),
            None if c == ' ' => result.push('_'),
            None => result.push(c),
        }
    }

    let mut result = NON_ALNUM.replace_all(&result, "_").to_string();
    result = CONSECUTIVE_SEPARATORS.replace_all(&result, "_").to_string();
    result = result.trim_matches(|c| c == '-' || c == '_').to_string();

    if result.len() > MAX_NAME_LENGTH {
        result = result[..MAX_NAME_LENGTH].to_string();
        result = result.trim_matches(|c| c == '-' || c == '_').to_string();
    }

    if result.is_empty() {
        result = "animal".to_string();
    }

    result
}
