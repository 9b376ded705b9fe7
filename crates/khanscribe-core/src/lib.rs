//! Khanscribe Core Library
//!
//! Walks the Khan Academy topic tree, samples videos per subject and
//! collects their transcripts into a labelled dataset.

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod labels;
pub mod output;
pub mod sampling;
pub mod slug;
pub mod source;
pub mod transcript;

// Re-export commonly used items at crate root
pub use api::{ApiClient, Endpoints};
pub use collector::{CollectObserver, Collector, HarvestReport, NoopObserver, SubjectReport};
pub use config::{DEFAULT_SUBJECTS, HarvestConfig, SamplingStrategy};
pub use error::{KhanscribeError, Result};
pub use hierarchy::enumerate_videos;
pub use labels::LabelMap;
pub use output::{format_summary, prepare_output_dir, write_summary, write_transcript};
pub use sampling::{draw_lazily, sample_unused};
pub use slug::VideoSlug;
pub use source::ContentSource;
pub use transcript::{TranscriptFragment, join_fragments};
