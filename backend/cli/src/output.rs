//! Terminal output: ANSI styling, result cards, and key/value tables.

use truthlens_core::Verdict;
use truthlens_panel::ResultView;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Width of the confidence bar in characters.
const BAR_CELLS: usize = 20;

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
#[cfg(test)]
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

fn verdict_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Real => GREEN,
        Verdict::Fake => RED,
        Verdict::Unknown => YELLOW,
    }
}

fn confidence_bar(confidence: u8) -> String {
    let filled = usize::from(confidence.min(100)) * BAR_CELLS / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_CELLS - filled))
}

/// Render a result card.
pub fn render_result(view: &ResultView, verdict: Verdict, confidence: u8, color: bool) -> String {
    let mut out = String::new();
    if let Some(text) = &view.extracted_text {
        out.push_str(&format!("Extracted text:\n  \"{text}\"\n\n"));
    }
    let heading = format!("{} {}", view.icon, view.heading);
    if color {
        let c = verdict_color(verdict);
        out.push_str(&format!("{c}{BOLD}{heading}{RESET}\n"));
        out.push_str(&format!(
            "{} {DIM}{}{RESET}\n",
            view.confidence_label,
            confidence_bar(confidence)
        ));
    } else {
        out.push_str(&format!("{heading}\n"));
        out.push_str(&format!(
            "{} {}\n",
            view.confidence_label,
            confidence_bar(confidence)
        ));
    }
    out.push_str(&format!("\n{}\n", view.analysis));
    out
}

/// Render aligned `key  value` rows.
pub fn render_pairs(rows: &[(&str, String)], color: bool) -> String {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| {
            let pad = " ".repeat(width - key.len());
            if color {
                format!("  {CYAN}{key}{RESET}{pad}  {value}\n")
            } else {
                format!("  {key}{pad}  {value}\n")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthlens_core::AnalysisResult;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn bar_scales_with_confidence() {
        assert_eq!(confidence_bar(0), format!("[{}]", "-".repeat(20)));
        assert_eq!(confidence_bar(50), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(confidence_bar(100), format!("[{}]", "#".repeat(20)));
    }

    #[test]
    fn plain_card_has_heading_and_analysis() {
        let result = AnalysisResult::new(Verdict::Fake, 83, "Contradicts known timeline.");
        let card = render_result(&ResultView::from_result(&result), result.verdict, result.confidence, false);
        assert!(card.starts_with("❌ FAKE\nConfidence: 83%"));
        assert!(card.ends_with("Contradicts known timeline.\n"));
    }

    #[test]
    fn colored_card_strips_to_plain() {
        let result = AnalysisResult::new(Verdict::Real, 90, "ok");
        let view = ResultView::from_result(&result);
        assert_eq!(
            strip_ansi(&render_result(&view, result.verdict, 90, true)),
            render_result(&view, result.verdict, 90, false)
        );
    }

    #[test]
    fn pairs_are_aligned() {
        let table = render_pairs(&[("port", "8787".into()), ("ocrProvider", "ocr.space".into())], false);
        assert_eq!(table, "  port         8787\n  ocrProvider  ocr.space\n");
    }
}
