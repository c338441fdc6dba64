use serde::{Deserialize, Serialize};

/// Side of a note where an edge visually attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
}

/// A named lane in the output graph corresponding to one speaker.
///
/// The normalized `title` is the column's identity key: a parse run never
/// produces two columns with the same title. A preset column may carry an
/// empty title; it acts as a layout placeholder no speaker can claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Stable identifier, `column-<n>` in first-seen order.
    pub id: String,
    /// Normalized speaker display name, or empty for a placeholder.
    pub title: String,
    /// Notes in emission order, restricted to this column.
    pub notes: Vec<Note>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            notes: Vec::new(),
        }
    }
}

/// A single utterance placed in one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Sequential identifier, `note-<n>`, global across the transcript.
    pub id: String,
    /// Trimmed, newline-joined paragraph text; never empty.
    pub content: String,
    /// Id of the column this note belongs to.
    pub column_id: String,
}

/// A directed visual connector between two consecutive notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Sequential identifier, `edge-<i>`, matching the pair position.
    pub id: String,
    /// Source note id.
    pub source: String,
    /// Target note id.
    pub target: String,
    /// Side of the source note the edge leaves from.
    pub source_handle: Handle,
    /// Side of the target note the edge arrives at.
    pub target_handle: Handle,
    /// Visual edge kind; a single fixed constant for every edge.
    #[serde(rename = "type")]
    pub edge_type: String,
}

/// The complete output of one parse run.
///
/// Recreated wholesale on every invocation; never diffed or merged with a
/// prior graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptGraph {
    pub columns: Vec<Column>,
    pub edges: Vec<Edge>,
}

impl TranscriptGraph {
    /// Total number of notes across all columns.
    pub fn note_count(&self) -> usize {
        self.columns.iter().map(|c| c.notes.len()).sum()
    }

    /// Look up a column by its normalized title.
    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.title == title)
    }
}

/// Render a raw speaker token to display form: each whitespace-separated
/// word capitalized (first character uppercased, the rest lowercased).
///
/// The result is the column-identity key, so "michael barbaro" and
/// "MICHAEL BARBARO" resolve to the same column.
pub fn normalize_title(raw: &str) -> String {
    raw.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
