use std::collections::HashSet;

use tracing::info;

use crate::{
    error::Result,
    slug::{VideoSlug, is_video_slug},
    source::ContentSource,
};

/// Keep video slugs only, dropping repeats but preserving first-seen order.
pub fn filter_videos<I>(content: I) -> Vec<VideoSlug>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    content
        .into_iter()
        .filter(|slug| is_video_slug(slug))
        .filter_map(|slug| VideoSlug::parse(&slug).ok())
        .filter(|video| seen.insert(video.clone()))
        .collect()
}

async fn children_of_all<S: ContentSource>(source: &S, parents: &[String]) -> Result<Vec<String>> {
    let mut all = Vec::new();
    for parent in parents {
        all.extend(source.children(parent).await?);
    }
    Ok(all)
}

/// Walk subject -> topics -> sections -> content and return every video.
pub async fn enumerate_videos<S: ContentSource>(source: &S, subject: &str) -> Result<Vec<VideoSlug>> {
    info!(subject, "loading topics");
    let topics = source.children(subject).await?;

    info!(subject, topics = topics.len(), "loading sections");
    let sections = children_of_all(source, &topics).await?;

    info!(subject, sections = sections.len(), "loading content");
    let content = children_of_all(source, &sections).await?;

    let videos = filter_videos(content);
    info!(subject, videos = videos.len(), "enumerated videos");
    Ok(videos)
}
