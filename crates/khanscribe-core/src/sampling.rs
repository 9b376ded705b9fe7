use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, warn};

use crate::{
    error::{KhanscribeError, Result},
    hierarchy::{enumerate_videos, filter_videos},
    labels::LabelMap,
    slug::VideoSlug,
    source::ContentSource,
};

/// Uniformly pick `count` videos whose filenames are not rejected by `is_used`.
fn choose_unused<R, F>(
    subject: &str,
    population: &[VideoSlug],
    is_used: F,
    count: usize,
    already: usize,
    rng: &mut R,
) -> Result<Vec<VideoSlug>>
where
    R: Rng,
    F: Fn(&str) -> bool,
{
    let mut names = HashSet::new();
    let candidates: Vec<&VideoSlug> = population
        .iter()
        .filter(|video| {
            let name = video.filename();
            !is_used(&name) && names.insert(name)
        })
        .collect();

    if candidates.len() < count {
        return Err(KhanscribeError::ExhaustedPopulation {
            subject: subject.to_string(),
            requested: already + count,
            available: already + candidates.len(),
        });
    }

    Ok(candidates
        .choose_multiple(rng, count)
        .map(|video| (*video).clone())
        .collect())
}

/// Sample without replacement from the videos no earlier subject claimed.
pub fn sample_unused<R: Rng>(
    subject: &str,
    population: &[VideoSlug],
    used: &LabelMap,
    count: usize,
    rng: &mut R,
) -> Result<Vec<VideoSlug>> {
    choose_unused(subject, population, |name| used.contains(name), count, 0, rng)
}

/// Pick videos by walking random topic/section paths.
///
/// Uniqueness holds within the subject only. After `max_stalled` consecutive
/// draws that add nothing (empty section or a repeat) the remainder is
/// sampled from the fully enumerated subject instead.
pub async fn draw_lazily<S, R>(
    source: &S,
    subject: &str,
    count: usize,
    max_stalled: usize,
    rng: &mut R,
) -> Result<Vec<VideoSlug>>
where
    S: ContentSource,
    R: Rng,
{
    let topics = source.children(subject).await?;
    let mut picked: Vec<VideoSlug> = Vec::with_capacity(count);
    let mut picked_names = HashSet::new();
    let mut stalled = 0;

    while picked.len() < count && stalled < max_stalled {
        let Some(topic) = topics.choose(rng) else {
            break;
        };
        let sections = source.children(topic).await?;
        let Some(section) = sections.choose(rng) else {
            stalled += 1;
            continue;
        };
        let videos = filter_videos(source.children(section).await?);
        let Some(video) = videos.choose(rng) else {
            debug!(subject, section = section.as_str(), "no videos in section");
            stalled += 1;
            continue;
        };

        if picked_names.insert(video.filename()) {
            picked.push(video.clone());
            stalled = 0;
        } else {
            stalled += 1;
        }
    }

    if picked.len() < count {
        warn!(
            subject,
            picked = picked.len(),
            wanted = count,
            "random walk stalled, enumerating subject"
        );
        let population = enumerate_videos(source, subject).await?;
        let rest = choose_unused(
            subject,
            &population,
            |name| picked_names.contains(name),
            count - picked.len(),
            picked.len(),
            rng,
        )?;
        picked.extend(rest);
    }

    Ok(picked)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::source::fixture::FixtureSource;

    fn videos(slugs: &[&str]) -> Vec<VideoSlug> {
        slugs.iter().map(|s| VideoSlug::parse(s).unwrap()).collect()
    }

    #[test]
    fn sample_has_requested_size_without_repeats() {
        let population = videos(&["v1", "v2", "v3", "v4", "v5", "v6"]);
        let mut rng = StdRng::seed_from_u64(7);
        let sample = sample_unused("physics", &population, &LabelMap::new(), 4, &mut rng).unwrap();

        assert_eq!(sample.len(), 4);
        let unique: HashSet<_> = sample.iter().map(|v| v.filename()).collect();
        assert_eq!(unique.len(), 4);
        assert!(sample.iter().all(|v| population.contains(v)));
    }

    #[test]
    fn sample_skips_filenames_used_by_earlier_subjects() {
        let population = videos(&["v1", "v2", "v3"]);
        let mut used = LabelMap::new();
        used.record("1.txt".into(), "chemistry");
        used.record("3.txt".into(), "chemistry");

        let mut rng = StdRng::seed_from_u64(1);
        let sample = sample_unused("physics", &population, &used, 1, &mut rng).unwrap();
        assert_eq!(sample, videos(&["v2"]));
    }

    #[test]
    fn sample_fails_when_population_exhausted() {
        let population = videos(&["v1", "v2"]);
        let mut used = LabelMap::new();
        used.record("1.txt".into(), "chemistry");

        let mut rng = StdRng::seed_from_u64(1);
        let err = sample_unused("physics", &population, &used, 2, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            KhanscribeError::ExhaustedPopulation {
                requested: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn slugs_sharing_a_filename_count_once() {
        let population = videos(&["v/100", "v100"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(sample_unused("physics", &population, &LabelMap::new(), 2, &mut rng).is_err());
    }

    #[tokio::test]
    async fn lazy_draw_collects_unique_videos() {
        let source = FixtureSource::new()
            .node("biology", &["t1", "t2"])
            .node("t1", &["s1"])
            .node("t2", &["s2"])
            .node("s1", &["v1", "v2", "a1"])
            .node("s2", &["v3", "v4"]);

        let mut rng = StdRng::seed_from_u64(11);
        let picked = draw_lazily(&source, "biology", 3, 64, &mut rng).await.unwrap();

        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.iter().map(|v| v.filename()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[tokio::test]
    async fn lazy_draw_terminates_on_videoless_subject() {
        let source = FixtureSource::new().flat_subject("grammar", &["a1", "e1"]);

        let mut rng = StdRng::seed_from_u64(5);
        let err = draw_lazily(&source, "grammar", 1, 4, &mut rng).await.unwrap_err();
        assert!(matches!(
            err,
            KhanscribeError::ExhaustedPopulation { available: 0, .. }
        ));
    }

    #[tokio::test]
    async fn lazy_draw_falls_back_to_enumeration() {
        // Only one section in ten holds a video; a stall bound of 1 forces the fallback
        // as soon as a single empty section is drawn.
        let mut source = FixtureSource::new().node(
            "music",
            &["t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9"],
        );
        for i in 0..10 {
            let topic = format!("t{i}");
            let section = format!("s{i}");
            source = source.node(&topic, &[&section]);
            let content: &[&str] = if i == 0 { &["v/only-one"] } else { &["a/article"] };
            source = source.node(&section, content);
        }

        let mut rng = StdRng::seed_from_u64(2);
        let picked = draw_lazily(&source, "music", 1, 1, &mut rng).await.unwrap();
        assert_eq!(picked, videos(&["v/only-one"]));
    }

    #[tokio::test]
    async fn lazy_draw_reports_shortfall() {
        let source = FixtureSource::new().flat_subject("chemistry", &["v1", "v2"]);

        let mut rng = StdRng::seed_from_u64(9);
        let err = draw_lazily(&source, "chemistry", 3, 8, &mut rng).await.unwrap_err();
        assert!(matches!(
            err,
            KhanscribeError::ExhaustedPopulation {
                requested: 3,
                available: 2,
                ..
            }
        ));
    }
}
