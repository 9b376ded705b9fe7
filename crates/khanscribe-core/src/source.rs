use crate::{
    error::Result,
    transcript::{TranscriptFragment, join_fragments},
};

/// Read access to the topic tree and the video/transcript lookups.
///
/// `ApiClient` is the network implementation; tests plug in an in-memory tree.
pub trait ContentSource {
    /// Child node slugs of `slug`, in API order.
    async fn children(&self, slug: &str) -> Result<Vec<String>>;

    /// External platform id for a video identifier (slug without its marker).
    async fn youtube_id(&self, identifier: &str) -> Result<String>;

    async fn transcript_fragments(&self, youtube_id: &str) -> Result<Vec<TranscriptFragment>>;

    /// Transcript text with fragments space-joined and newlines flattened.
    async fn transcript(&self, youtube_id: &str) -> Result<String> {
        let fragments = self.transcript_fragments(youtube_id).await?;
        Ok(join_fragments(&fragments))
    }
}
