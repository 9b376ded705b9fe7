use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::{error::Result, labels::LabelMap};

/// Create an empty transcript directory, wiping whatever a previous run left.
pub async fn prepare_output_dir(dir: &Path) -> Result<()> {
    if fs::try_exists(dir).await? {
        info!(dir = %dir.display(), "removing previous output");
        fs::remove_dir_all(dir).await?;
    }
    fs::create_dir_all(dir).await?;
    Ok(())
}

/// Get the path a transcript file is written to
pub fn get_transcript_path(dir: &Path, filename: &str) -> PathBuf {
    dir.join(filename)
}

pub async fn write_transcript(dir: &Path, filename: &str, transcript: &str) -> Result<PathBuf> {
    let path = get_transcript_path(dir, filename);
    fs::write(&path, transcript).await?;
    Ok(path)
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Render `(filename, subject)` rows, no header, CRLF-terminated.
pub fn format_summary(labels: &LabelMap) -> String {
    labels
        .iter()
        .map(|(filename, subject)| format!("{},{}\r\n", csv_field(filename), csv_field(subject)))
        .collect()
}

pub async fn write_summary(path: &Path, labels: &LabelMap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, format_summary(labels)).await?;
    Ok(())
}
