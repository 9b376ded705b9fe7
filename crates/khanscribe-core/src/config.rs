use std::path::{Path, PathBuf};

use crate::error::{KhanscribeError, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.khanacademy.org/";
pub const DEFAULT_SAMPLE_SIZE: usize = 50;
pub const DEFAULT_MAX_EMPTY_DRAWS: usize = 32;
pub const DEFAULT_SUBJECTS: [&str; 8] = [
    "calculus-home",
    "physics",
    "chemistry",
    "biology",
    "us-history",
    "computer-science",
    "music",
    "grammar",
];

const TRANSCRIPTS_DIR: &str = "transcripts";
const SUMMARY_FILE: &str = "data.csv";

/// How videos are chosen for a subject.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Enumerate every reachable video, then sample without replacement
    /// from the ones no earlier subject used.
    #[default]
    Bulk,
    /// Walk random topic/section paths until enough videos are picked.
    Lazy,
}

impl SamplingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SamplingStrategy::Bulk => "bulk",
            SamplingStrategy::Lazy => "lazy",
        }
    }
}

#[derive(Clone, Debug)]
pub struct HarvestConfig {
    pub base_url: String,
    pub subjects: Vec<String>,
    pub sample_size: usize,
    pub output_dir: PathBuf,
    pub summary_path: PathBuf,
    pub strategy: SamplingStrategy,
    pub seed: Option<u64>,
    pub max_empty_draws: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::with_data_dir(Path::new("data"))
    }
}

impl HarvestConfig {
    /// Default settings with transcripts and summary placed under `data_dir`.
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            output_dir: data_dir.join(TRANSCRIPTS_DIR),
            summary_path: data_dir.join(SUMMARY_FILE),
            strategy: SamplingStrategy::default(),
            seed: None,
            max_empty_draws: DEFAULT_MAX_EMPTY_DRAWS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.subjects.is_empty() {
            return Err(KhanscribeError::InvalidConfig {
                reason: "at least one subject is required".to_string(),
            });
        }
        if self.sample_size == 0 {
            return Err(KhanscribeError::InvalidConfig {
                reason: "sample size must be positive".to_string(),
            });
        }
        if self.max_empty_draws == 0 {
            return Err(KhanscribeError::InvalidConfig {
                reason: "max empty draws must be positive".to_string(),
            });
        }
        if self.summary_path.starts_with(&self.output_dir) {
            return Err(KhanscribeError::InvalidConfig {
                reason: format!(
                    "summary {} must live outside the transcript directory",
                    self.summary_path.display()
                ),
            });
        }
        Ok(())
    }
}
