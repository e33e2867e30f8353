//! Chat transcript state.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use truthlens_core::AnalysisResult;

/// One bubble in the chat area.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEntry {
    UserText(String),
    /// An image the user submitted, as a data URL.
    UserImage(String),
    Assistant(String),
    /// Failure bubble. Never an unhandled fault.
    Error(String),
    /// Typing indicator, removed when its request settles.
    Typing(u64),
    Result(AnalysisResult),
}

/// Append-only chat log shared by concurrent requests.
///
/// Entries land in completion order, not initiation order.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Mutex<Vec<ChatEntry>>,
    next_typing: AtomicU64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, entry: ChatEntry) {
        self.entries.lock().await.push(entry);
    }

    /// Add a typing indicator and return its id.
    pub async fn show_typing(&self) -> u64 {
        let id = self.next_typing.fetch_add(1, Ordering::Relaxed);
        self.push(ChatEntry::Typing(id)).await;
        id
    }

    /// Remove a typing indicator. Unknown ids are ignored.
    pub async fn remove_typing(&self, id: u64) {
        self.entries
            .lock()
            .await
            .retain(|e| *e != ChatEntry::Typing(id));
    }

    pub async fn entries(&self) -> Vec<ChatEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn typing_indicators_are_removed_by_id() {
        let transcript = Transcript::new();
        let a = transcript.show_typing().await;
        transcript.push(ChatEntry::Assistant("hi".into())).await;
        let b = transcript.show_typing().await;
        assert_ne!(a, b);

        transcript.remove_typing(a).await;
        assert_eq!(
            transcript.entries().await,
            vec![ChatEntry::Assistant("hi".into()), ChatEntry::Typing(b)]
        );
        transcript.remove_typing(99).await;
        assert_eq!(transcript.len().await, 2);
    }
}
