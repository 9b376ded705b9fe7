use std::fmt;

use crate::error::{KhanscribeError, Result};

const VIDEO_MARKER: char = 'v';
const SEPARATOR: char = '/';

/// Returns true when a content slug names a video node.
pub fn is_video_slug(slug: &str) -> bool {
    slug.starts_with(VIDEO_MARKER)
}

/// A content node slug known to carry the video type marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoSlug(String);

impl VideoSlug {
    pub fn parse(slug: &str) -> Result<Self> {
        if !is_video_slug(slug) || !Self::is_plain_identifier(Self::strip(slug)) {
            return Err(KhanscribeError::InvalidVideoSlug {
                slug: slug.to_string(),
            });
        }
        Ok(Self(slug.to_string()))
    }

    /// The identifier becomes a file name and a URL path segment.
    fn is_plain_identifier(identifier: &str) -> bool {
        !identifier.is_empty()
            && identifier != "."
            && identifier != ".."
            && !identifier.contains(['/', '\\'])
    }

    fn strip(slug: &str) -> &str {
        let rest = &slug[VIDEO_MARKER.len_utf8()..];
        rest.strip_prefix(SEPARATOR).unwrap_or(rest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier used against the video metadata endpoint (`v/foo` -> `foo`).
    pub fn identifier(&self) -> &str {
        Self::strip(&self.0)
    }

    /// Name of the transcript file written for this video.
    pub fn filename(&self) -> String {
        format!("{}.txt", self.identifier())
    }
}

impl fmt::Display for VideoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
