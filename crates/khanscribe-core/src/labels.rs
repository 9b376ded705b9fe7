use std::collections::HashMap;

/// Insertion-ordered filename -> subject mapping accumulated over a run.
///
/// Re-recording a filename keeps its original position and replaces the subject.
#[derive(Debug, Default, Clone)]
pub struct LabelMap {
    rows: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `filename` under `subject`, returning the subject it replaced.
    pub fn record(&mut self, filename: String, subject: &str) -> Option<String> {
        if let Some(&pos) = self.index.get(&filename) {
            return Some(std::mem::replace(
                &mut self.rows[pos].1,
                subject.to_string(),
            ));
        }
        self.index.insert(filename.clone(), self.rows.len());
        self.rows.push((filename, subject.to_string()));
        None
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.index.contains_key(filename)
    }

    pub fn subject_of(&self, filename: &str) -> Option<&str> {
        self.index.get(filename).map(|&pos| self.rows[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|(f, s)| (f.as_str(), s.as_str()))
    }

    pub fn count_for(&self, subject: &str) -> usize {
        self.rows.iter().filter(|(_, s)| s == subject).count()
    }
}
