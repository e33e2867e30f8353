//! Lenient extraction of verdict, confidence, and analysis from a free-text reply.
//!
//! Each field is matched independently. A missing field falls back on its own
//! and never fails the whole record.

use once_cell::sync::Lazy;
use regex::Regex;

use truthlens_core::{AnalysisResult, Verdict, DEFAULT_CONFIDENCE};

static VERDICT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)VERDICT:\s*(Real|Fake)").unwrap());

static CONFIDENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CONFIDENCE SCORE:\s*(-?\d+)").unwrap());

static ANALYSIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)ANALYSIS:\s*(.*)").unwrap());

const UNEXPECTED_FORMAT: &str = "Analysis completed but format was unexpected.";

pub fn extract_verdict(reply: &str) -> Option<Verdict> {
    VERDICT_RE
        .captures(reply)
        .map(|caps| Verdict::parse(&caps[1]))
}

/// Raw confidence number as written. Digit runs too long for `i64` saturate.
pub fn extract_confidence(reply: &str) -> Option<i64> {
    let caps = CONFIDENCE_RE.captures(reply)?;
    let raw = &caps[1];
    Some(raw.parse::<i64>().unwrap_or(if raw.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

pub fn extract_analysis(reply: &str) -> Option<String> {
    let caps = ANALYSIS_RE.captures(reply)?;
    let text = caps[1].trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Compose the three extractions into a result with per-field defaults.
pub fn parse_reply(reply: &str) -> AnalysisResult {
    let verdict = extract_verdict(reply).unwrap_or(Verdict::Unknown);
    let confidence = extract_confidence(reply).unwrap_or(i64::from(DEFAULT_CONFIDENCE));
    let analysis = extract_analysis(reply).unwrap_or_else(|| {
        if reply.trim().is_empty() {
            UNEXPECTED_FORMAT.to_string()
        } else {
            reply.to_string()
        }
    });
    AnalysisResult::new(verdict, confidence, analysis)
}
