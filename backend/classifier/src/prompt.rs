//! Fixed prompt template for the misinformation check.

pub const SYSTEM_PROMPT: &str = "You are TruthLens AI, a misinformation detection expert. \
Analyze text and provide verdicts in the exact format requested.";

/// Build the user prompt embedding the text under review.
pub fn build_prompt(text: &str) -> String {
    format!(
        "You are TruthLens AI.\n\
         \n\
         Analyze the following text for misinformation using credible sources.\n\
         \n\
         Return the response EXACTLY in this format:\n\
         1. VERDICT: (Real/Fake)\n\
         2. CONFIDENCE SCORE: (0-100%)\n\
         3. ANALYSIS: (2-3 sentences explaining why)\n\
         \n\
         Text:\n\
         {text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_all_markers_and_ends_with_text() {
        let prompt = build_prompt("Salt water cures colds");
        assert!(prompt.contains("VERDICT:"));
        assert!(prompt.contains("CONFIDENCE SCORE:"));
        assert!(prompt.contains("ANALYSIS:"));
        assert!(prompt.ends_with("Text:\nSalt water cures colds"));
    }
}
