//! Platform detection by host name.

use serde::{Deserialize, Serialize};

/// How a page should be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Structured post text can be read straight from the page.
    PostText,
    /// Image-centric site: region capture with an image-specific hint.
    ImageCentric,
    /// Anything else: region capture.
    Generic,
}

/// Host lists and the post-text selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRules {
    pub post_text_hosts: Vec<String>,
    pub image_hint_hosts: Vec<String>,
    pub post_text_selector: String,
}

impl Default for PlatformRules {
    fn default() -> Self {
        Self {
            post_text_hosts: vec!["twitter.com".into(), "x.com".into()],
            image_hint_hosts: vec!["instagram.com".into()],
            post_text_selector: r#"article [data-testid="tweetText"]"#.into(),
        }
    }
}

impl PlatformRules {
    pub fn classify_host(&self, host: &str) -> Platform {
        let host = host.trim().to_ascii_lowercase();
        if self.post_text_hosts.iter().any(|h| host_matches(&host, h)) {
            Platform::PostText
        } else if self.image_hint_hosts.iter().any(|h| host_matches(&host, h)) {
            Platform::ImageCentric
        } else {
            Platform::Generic
        }
    }

    /// Classify a full URL. Unparseable URLs are `Generic`.
    pub fn classify_url(&self, page_url: &str) -> Platform {
        url::Url::parse(page_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| self.classify_host(h)))
            .unwrap_or(Platform::Generic)
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Instruction shown when region capture starts.
pub fn region_notice(platform: Platform) -> &'static str {
    match platform {
        Platform::ImageCentric => "Drag-select the image area containing text",
        _ => "Drag-select the area you want to analyze",
    }
}

pub const NO_POST_TEXT_NOTICE: &str =
    "No tweet text found. Please drag-select the area you want to analyze.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_hosts() {
        let rules = PlatformRules::default();
        assert_eq!(rules.classify_host("x.com"), Platform::PostText);
        assert_eq!(rules.classify_host("mobile.twitter.com"), Platform::PostText);
        assert_eq!(rules.classify_host("www.instagram.com"), Platform::ImageCentric);
        assert_eq!(rules.classify_host("example.org"), Platform::Generic);
    }

    #[test]
    fn lookalike_hosts_do_not_match() {
        let rules = PlatformRules::default();
        assert_eq!(rules.classify_host("notx.com"), Platform::Generic);
    }

    #[test]
    fn classify_url_extracts_host() {
        let rules = PlatformRules::default();
        assert_eq!(
            rules.classify_url("https://x.com/someone/status/1"),
            Platform::PostText
        );
        assert_eq!(rules.classify_url("chrome://extensions"), Platform::Generic);
        assert_eq!(rules.classify_url("not a url"), Platform::Generic);
    }
}
