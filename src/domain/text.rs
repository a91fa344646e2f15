//! Free-text cleanup for dataset fields before they are embedded.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9àáâãäåçèéêëìíîïñòóôõöùúûüý ]").expect("valid character class")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Lower-case, replace anything outside letters (incl. common accented Latin),
/// digits and space with a space, collapse whitespace runs and trim.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = DISALLOWED.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Drop U+FFFD replacement characters left behind by lossy decoding.
pub fn remove_replacement_chars(text: &str) -> String {
    text.replace('\u{fffd}', "")
}
