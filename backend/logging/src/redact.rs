//! Log Redaction Layer
//!
//! Scrubs classifier keys, OCR keys, and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
// OCR.space keys: a capital K followed by a long run of digits.
static OCR_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bK\d{10,}\b").unwrap());
static APIKEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(apikey\s*[=:]\s*)[^\s&,]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = APIKEY_PARAM_RE.replace_all(&redacted, "${1}[REDACTED_TOKEN]");
    OCR_KEY_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .into_owned()
}
