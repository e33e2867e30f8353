use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::TruthLensError;
use crate::types::{AnalysisResult, CaptureRequest, ImageAnalysis, Origin};

/// Messages exchanged between the page, panel, and coordinator contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Message {
    /// Page → Coordinator: screenshot the sender's visible viewport
    Capture,
    /// Panel → Coordinator: classify text. From a page, relayed to the panel.
    AnalyzeText { text: String },
    /// Panel → Coordinator: OCR then classify an image data URL
    AnalyzeImage {
        #[serde(rename = "imageData")]
        image_data: String,
    },
    /// Page → Coordinator: a cropped region is ready for the panel
    OcrImage {
        #[serde(rename = "imageData")]
        image_data: String,
    },
    /// Coordinator → listeners: relayed crop from `OcrImage`
    OcrImageReady {
        #[serde(rename = "imageData")]
        image_data: String,
    },
}

impl Message {
    pub fn action(&self) -> &'static str {
        match self {
            Message::Capture => "capture",
            Message::AnalyzeText { .. } => "analyzeText",
            Message::AnalyzeImage { .. } => "analyzeImage",
            Message::OcrImage { .. } => "ocrImage",
            Message::OcrImageReady { .. } => "ocrImageReady",
        }
    }

    /// Size of the payload in bytes, for logging without content.
    pub fn payload_len(&self) -> usize {
        match self {
            Message::Capture => 0,
            Message::AnalyzeText { text } => text.len(),
            Message::AnalyzeImage { image_data }
            | Message::OcrImage { image_data }
            | Message::OcrImageReady { image_data } => image_data.len(),
        }
    }
}

impl From<CaptureRequest> for Message {
    fn from(request: CaptureRequest) -> Self {
        match request {
            CaptureRequest::Text(text) => Message::AnalyzeText { text },
            CaptureRequest::Image(image_data) => Message::OcrImage { image_data },
        }
    }
}

/// Reply to a [`Message`]. Shapes follow the extension wire format, so this is untagged.
///
/// Variant order matters for deserialization: `Image` must precede `Analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Error { error: String },
    Image(ImageAnalysis),
    Analysis(AnalysisResult),
    Received { received: bool },
    Screenshot(String),
}

impl Reply {
    pub fn error(err: impl std::fmt::Display) -> Self {
        Reply::Error {
            error: err.to_string(),
        }
    }

    pub fn received() -> Self {
        Reply::Received { received: true }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error { .. })
    }
}

impl From<Result<AnalysisResult, TruthLensError>> for Reply {
    fn from(result: Result<AnalysisResult, TruthLensError>) -> Self {
        match result {
            Ok(analysis) => Reply::Analysis(analysis),
            Err(e) => Reply::error(e),
        }
    }
}

impl From<Result<ImageAnalysis, TruthLensError>> for Reply {
    fn from(result: Result<ImageAnalysis, TruthLensError>) -> Self {
        match result {
            Ok(analysis) => Reply::Image(analysis),
            Err(e) => Reply::error(e),
        }
    }
}

/// A message in flight on the bus, with an optional reply slot.
#[derive(Debug)]
pub struct Envelope {
    pub origin: Origin,
    pub message: Message,
    pub reply: Option<oneshot::Sender<Reply>>,
}

impl Envelope {
    /// Settle the envelope. A requester that stopped waiting is not an error.
    pub fn respond(self, reply: Reply) {
        if let Some(tx) = self.reply {
            let _ = tx.send(reply);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;

    #[test]
    fn actions_use_wire_names() {
        let json = serde_json::to_value(Message::OcrImage {
            image_data: "data:image/png;base64,AAAA".into(),
        })
        .unwrap();
        assert_eq!(json["action"], "ocrImage");
        assert_eq!(json["imageData"], "data:image/png;base64,AAAA");

        let capture: Message = serde_json::from_str(r#"{"action":"capture"}"#).unwrap();
        assert_eq!(capture, Message::Capture);
    }

    #[test]
    fn capture_request_maps_to_outbound_message() {
        let msg: Message = CaptureRequest::Text("post".into()).into();
        assert_eq!(msg.action(), "analyzeText");
        let msg: Message = CaptureRequest::Image("data:x".into()).into();
        assert_eq!(msg.action(), "ocrImage");
    }

    #[test]
    fn reply_shapes_deserialize_to_expected_variants() {
        let err: Reply = serde_json::from_str(r#"{"error":"bad image"}"#).unwrap();
        assert_eq!(err, Reply::error("bad image"));

        let image: Reply = serde_json::from_str(
            r#"{"extractedText":"hi there","verdict":"fake","confidence":12,"analysis":"x"}"#,
        )
        .unwrap();
        assert!(matches!(image, Reply::Image(ref a) if a.extracted_text == "hi there"));

        let analysis: Reply =
            serde_json::from_str(r#"{"verdict":"real","confidence":90,"analysis":"ok"}"#).unwrap();
        assert!(matches!(analysis, Reply::Analysis(ref a) if a.verdict == Verdict::Real));

        let shot: Reply = serde_json::from_str(r#""data:image/png;base64,AAAA""#).unwrap();
        assert!(matches!(shot, Reply::Screenshot(_)));
    }

    #[test]
    fn respond_without_listener_is_silent() {
        let (tx, rx) = oneshot::channel();
        drop(rx);
        let env = Envelope {
            origin: Origin::Panel,
            message: Message::Capture,
            reply: Some(tx),
        };
        env.respond(Reply::received());
    }
}
