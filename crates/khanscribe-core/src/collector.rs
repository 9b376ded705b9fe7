use std::path::PathBuf;

use rand::{SeedableRng, rngs::StdRng};
use tracing::{info, warn};

use crate::{
    config::{HarvestConfig, SamplingStrategy},
    error::Result,
    hierarchy::enumerate_videos,
    labels::LabelMap,
    output::{prepare_output_dir, write_summary, write_transcript},
    sampling::{draw_lazily, sample_unused},
    slug::VideoSlug,
    source::ContentSource,
};

/// Progress hooks invoked while a run advances. All methods default to no-ops.
pub trait CollectObserver {
    fn subject_started(&mut self, _subject: &str, _position: usize, _total: usize) {}
    fn videos_selected(&mut self, _subject: &str, _count: usize) {}
    fn video_saved(&mut self, _subject: &str, _filename: &str) {}
    fn subject_finished(&mut self, _subject: &str, _collected: usize) {}
}

pub struct NoopObserver;

impl CollectObserver for NoopObserver {}

#[derive(Debug, Clone)]
pub struct SubjectReport {
    pub subject: String,
    /// Transcripts downloaded for this subject.
    pub collected: usize,
    /// Summary rows still labelled with this subject once the run ends.
    /// Lower than `collected` when a later lazy subject took a video over.
    pub labelled: usize,
}

#[derive(Debug)]
pub struct HarvestReport {
    pub subjects: Vec<SubjectReport>,
    pub labels: LabelMap,
    pub output_dir: PathBuf,
    pub summary_path: PathBuf,
}

impl HarvestReport {
    pub fn total_collected(&self) -> usize {
        self.subjects.iter().map(|s| s.collected).sum()
    }
}

/// Drives one run: select videos per subject, save transcripts, write the summary.
pub struct Collector<S> {
    source: S,
    config: HarvestConfig,
}

impl<S: ContentSource> Collector<S> {
    pub fn new(source: S, config: HarvestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub async fn run(&self, observer: &mut impl CollectObserver) -> Result<HarvestReport> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        prepare_output_dir(&self.config.output_dir).await?;

        let mut labels = LabelMap::new();
        let mut reports = Vec::with_capacity(self.config.subjects.len());
        let total = self.config.subjects.len();

        for (position, subject) in self.config.subjects.iter().enumerate() {
            info!(subject, strategy = self.config.strategy.name(), "loading videos");
            observer.subject_started(subject, position, total);

            let videos = self.select(subject, &labels, &mut rng).await?;
            observer.videos_selected(subject, videos.len());

            for video in &videos {
                let filename = self.collect_video(subject, video, &mut labels).await?;
                observer.video_saved(subject, &filename);
            }

            observer.subject_finished(subject, videos.len());
            reports.push(SubjectReport {
                subject: subject.clone(),
                collected: videos.len(),
                labelled: 0,
            });
        }

        for report in &mut reports {
            report.labelled = labels.count_for(&report.subject);
        }

        write_summary(&self.config.summary_path, &labels).await?;
        info!(
            rows = labels.len(),
            path = %self.config.summary_path.display(),
            "summary written"
        );

        Ok(HarvestReport {
            subjects: reports,
            labels,
            output_dir: self.config.output_dir.clone(),
            summary_path: self.config.summary_path.clone(),
        })
    }

    /// Choose this subject's videos according to the configured strategy.
    pub async fn select(
        &self,
        subject: &str,
        used: &LabelMap,
        rng: &mut StdRng,
    ) -> Result<Vec<VideoSlug>> {
        match self.config.strategy {
            SamplingStrategy::Bulk => {
                let population = enumerate_videos(&self.source, subject).await?;
                sample_unused(subject, &population, used, self.config.sample_size, rng)
            }
            SamplingStrategy::Lazy => {
                draw_lazily(
                    &self.source,
                    subject,
                    self.config.sample_size,
                    self.config.max_empty_draws,
                    rng,
                )
                .await
            }
        }
    }

    /// Resolve, fetch and save one transcript, then label it with `subject`.
    pub async fn collect_video(
        &self,
        subject: &str,
        video: &VideoSlug,
        labels: &mut LabelMap,
    ) -> Result<String> {
        let youtube_id = self.source.youtube_id(video.identifier()).await?;
        let transcript = self.source.transcript(&youtube_id).await?;

        let filename = video.filename();
        write_transcript(&self.config.output_dir, &filename, &transcript).await?;

        if let Some(previous) = labels.record(filename.clone(), subject) {
            if previous != subject {
                warn!(
                    filename = filename.as_str(),
                    previous = previous.as_str(),
                    subject,
                    "video reused across subjects, label replaced"
                );
            }
        }
        Ok(filename)
    }
}
