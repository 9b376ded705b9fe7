use serde::Deserialize;

/// One caption fragment as returned by the transcript endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
}

/// Join fragments with single spaces and flatten embedded newlines.
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    fragments
        .iter()
        .map(|fragment| fragment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('\n', " ")
}
