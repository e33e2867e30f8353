//! Capture rules for page contexts.
//!
//! A page-side agent fetches the configured host lists and post-text selector,
//! or asks which capture flow applies to a URL.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use truthlens_capture::platform::{region_notice, NO_POST_TEXT_NOTICE};
use truthlens_capture::{Platform, PlatformRules};

use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub platform: &'static str,
    /// Selector to read post text with, on post-text platforms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_text_selector: Option<String>,
    /// Notice shown when region capture starts.
    pub region_notice: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_notice: Option<&'static str>,
}

fn platform_name(platform: Platform) -> &'static str {
    match platform {
        Platform::PostText => "postText",
        Platform::ImageCentric => "imageCentric",
        Platform::Generic => "generic",
    }
}

/// Handler for `GET /api/capture/rules`.
pub async fn rules(State(state): State<GatewayState>) -> Json<PlatformRules> {
    Json(state.rules)
}

/// Handler for `POST /api/capture/classify`.
pub async fn classify(
    State(state): State<GatewayState>,
    Json(payload): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    let platform = state.rules.classify_url(&payload.url);
    let post_text = platform == Platform::PostText;
    Json(ClassifyResponse {
        platform: platform_name(platform),
        post_text_selector: post_text.then(|| state.rules.post_text_selector.clone()),
        region_notice: region_notice(platform),
        fallback_notice: post_text.then_some(NO_POST_TEXT_NOTICE),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::tests::{spawn_gateway, test_state, FixedOcr};
    use serde_json::{json, Value};
    use truthlens_classifier::providers::MockProvider;

    fn custom_rules() -> PlatformRules {
        PlatformRules {
            post_text_hosts: vec!["social.example".into()],
            image_hint_hosts: vec!["pics.example".into()],
            post_text_selector: "div.post-body".into(),
        }
    }

    async fn classify_url(base: &str, url: &str) -> Value {
        reqwest::Client::new()
            .post(format!("{base}/api/capture/classify"))
            .json(&json!({ "url": url }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn configured_rules_are_served() {
        let state = test_state(FixedOcr(Ok("")), MockProvider::new("mock"))
            .with_platform_rules(custom_rules());
        let base = spawn_gateway(state).await;

        let body: Value = reqwest::get(format!("{base}/api/capture/rules"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            body,
            json!({
                "postTextHosts": ["social.example"],
                "imageHintHosts": ["pics.example"],
                "postTextSelector": "div.post-body"
            })
        );
    }

    #[tokio::test]
    async fn urls_are_classified_with_configured_hosts() {
        let state = test_state(FixedOcr(Ok("")), MockProvider::new("mock"))
            .with_platform_rules(custom_rules());
        let base = spawn_gateway(state).await;

        let post = classify_url(&base, "https://m.social.example/p/1").await;
        assert_eq!(post["platform"], "postText");
        assert_eq!(post["postTextSelector"], "div.post-body");
        assert_eq!(post["fallbackNotice"], NO_POST_TEXT_NOTICE);

        let pics = classify_url(&base, "https://pics.example/a").await;
        assert_eq!(pics["platform"], "imageCentric");
        assert_eq!(pics["regionNotice"], "Drag-select the image area containing text");
        assert!(pics.get("postTextSelector").is_none());

        // Default hosts no longer apply once rules are configured.
        let x = classify_url(&base, "https://x.com/a/status/1").await;
        assert_eq!(x["platform"], "generic");
    }
}
