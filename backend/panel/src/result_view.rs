//! Rendering data for result cards and the standalone latest-result view.

use truthlens_core::{AnalysisResult, StoredResult, Verdict};

/// Display-ready fields of one analysis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub heading: &'static str,
    pub icon: &'static str,
    pub confidence_label: String,
    pub analysis: String,
    /// CSS width of the progress bar, e.g. `"83%"`.
    pub bar_width: String,
    pub extracted_text: Option<String>,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let (heading, icon) = match result.verdict {
            Verdict::Real => ("REAL", "✅"),
            Verdict::Fake => ("FAKE", "❌"),
            Verdict::Unknown => ("UNKNOWN", "❔"),
        };
        Self {
            heading,
            icon,
            confidence_label: format!("Confidence: {}%", result.confidence),
            analysis: result.analysis.clone(),
            bar_width: format!("{}%", result.confidence),
            extracted_text: None,
        }
    }

    /// View of the latest-result slot. `None` renders nothing.
    pub fn from_stored(stored: Option<&StoredResult>) -> Option<Self> {
        let stored = stored?;
        Some(Self {
            extracted_text: stored.extracted_text.clone(),
            ..Self::from_result(&stored.result)
        })
    }
}
