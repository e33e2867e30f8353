use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence used when the classifier reply carries no usable score.
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// OCR output shorter than this (after trimming) counts as "no text found".
pub const MIN_OCR_TEXT_CHARS: usize = 3;

/// Outcome of a classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Real,
    Fake,
    #[default]
    Unknown,
}

impl Verdict {
    /// Case-insensitive parse; anything other than real/fake is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "real" => Self::Real,
            "fake" => Self::Fake,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Fake => "fake",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamp an upstream confidence number into `0..=100`.
pub fn clamp_confidence(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}

/// Normalized classifier result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub confidence: u8,
    pub analysis: String,
}

impl AnalysisResult {
    pub fn new(verdict: Verdict, confidence: i64, analysis: impl Into<String>) -> Self {
        Self {
            verdict,
            confidence: clamp_confidence(confidence),
            analysis: analysis.into(),
        }
    }
}

/// Result of the OCR-then-classify composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub extracted_text: String,
    pub verdict: Verdict,
    pub confidence: u8,
    pub analysis: String,
}

impl ImageAnalysis {
    pub fn new(extracted_text: impl Into<String>, result: AnalysisResult) -> Self {
        Self {
            extracted_text: extracted_text.into(),
            verdict: result.verdict,
            confidence: result.confidence,
            analysis: result.analysis,
        }
    }

    pub fn result(&self) -> AnalysisResult {
        AnalysisResult {
            verdict: self.verdict,
            confidence: self.confidence,
            analysis: self.analysis.clone(),
        }
    }
}

/// What a capture produced: raw post text or a cropped PNG data URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "content")]
pub enum CaptureRequest {
    Text(String),
    Image(String),
}

impl CaptureRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
        }
    }
}

/// A browser tab as seen by the panel and the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: u32,
    pub window_id: u32,
    pub url: String,
}

/// The execution context a message came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The capture agent injected into a tab.
    Page(TabInfo),
    /// The side panel.
    Panel,
    /// A client outside the extension (gateway, CLI).
    External,
}

impl Origin {
    pub fn tab(&self) -> Option<&TabInfo> {
        match self {
            Self::Page(tab) => Some(tab),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Page(_) => "page",
            Self::Panel => "panel",
            Self::External => "external",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(clamp_confidence(150), 100);
        assert_eq!(clamp_confidence(-5), 0);
        assert_eq!(clamp_confidence(83), 83);
    }

    #[test]
    fn verdict_parse_is_case_insensitive() {
        assert_eq!(Verdict::parse("FAKE"), Verdict::Fake);
        assert_eq!(Verdict::parse(" Real "), Verdict::Real);
        assert_eq!(Verdict::parse("Misleading"), Verdict::Unknown);
    }

    #[test]
    fn image_analysis_serializes_camel_case() {
        let analysis = ImageAnalysis::new(
            "Breaking news",
            AnalysisResult::new(Verdict::Real, 70, "Consistent with reports."),
        );
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["extractedText"], "Breaking news");
        assert_eq!(json["verdict"], "real");
        assert_eq!(json["confidence"], 70);
    }

    #[test]
    fn capture_request_shape() {
        let req = CaptureRequest::Text("hello".into());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "Text", "content": "hello"}));
    }
}
