use std::collections::{HashMap, HashSet};

use crate::error::ParseError;

use super::graph::normalize_title;

/// Speaker-label line style the segmenter looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerLinePattern {
    /// A name standing alone on its own line, e.g. a transcript export
    /// that puts "michael barbaro" on a line of its own.
    BareNameLine,
    /// An all-caps name followed by a colon and inline text, e.g.
    /// "MICHAEL BARBARO: So this week...". The inline text becomes the
    /// first content line of the paragraph.
    CapsColonLine,
}

/// What to do with header/metadata lines before any speaker label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadInSkip {
    /// Feed every line to the state machine.
    None,
    /// Discard lines until the first speaker-label line is found.
    UntilFirstSpeakerLine,
}

/// A column fixed ahead of parsing, with a stable id and title.
///
/// A preset with an empty title is a layout placeholder; no speaker can
/// ever resolve to it.
#[derive(Debug, Clone)]
pub struct PresetColumn {
    pub id: String,
    pub title: String,
}

impl PresetColumn {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Attribution of content lines that arrive while no speaker is active.
///
/// Off by default; when enabled, an orphan line longer than `min_chars`
/// becomes its own single-line utterance under `title`.
#[derive(Debug, Clone)]
pub struct NarrationConfig {
    /// Pseudo-speaker the orphan lines are attributed to.
    pub title: String,
    /// Minimum trimmed length; shorter orphan lines are discarded.
    pub min_chars: usize,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            title: "NARRATION".to_string(),
            min_chars: 20,
        }
    }
}

/// Configuration for one parse run.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Columns created before parsing begins, in order.
    pub preset_columns: Vec<PresetColumn>,
    /// Normalized titles whose paragraphs are dropped without a trace
    /// (section headers that look like speaker labels, e.g.
    /// "Background Reading").
    pub excluded_titles: HashSet<String>,
    /// Handling of lines before the first speaker label.
    pub lead_in_skip: LeadInSkip,
    /// Content lines starting with any of these prefixes are discarded
    /// even inside a paragraph (stage directions, bracketed annotations).
    pub line_exclusion_prefixes: HashSet<String>,
    /// Which speaker-label style to detect.
    pub speaker_line_pattern: SpeakerLinePattern,
    /// Explicit written-title -> canonical-title mapping for speakers the
    /// transcript spells more than one way. Keys and values are compared
    /// in normalized form.
    pub aliases: HashMap<String, String>,
    /// Optional narration fallback for unattributed lines.
    pub narration: Option<NarrationConfig>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            preset_columns: Vec::new(),
            excluded_titles: HashSet::new(),
            lead_in_skip: LeadInSkip::UntilFirstSpeakerLine,
            line_exclusion_prefixes: HashSet::new(),
            speaker_line_pattern: SpeakerLinePattern::BareNameLine,
            aliases: HashMap::new(),
            narration: None,
        }
    }
}

impl ParseConfig {
    /// Check the config for contradictions.
    ///
    /// This is the only error the parser ever raises; every malformed
    /// *transcript* still parses best-effort.
    pub fn validate(&self) -> Result<(), ParseError> {
        let mut seen_ids = HashSet::new();
        let mut seen_titles = HashSet::new();

        for (index, preset) in self.preset_columns.iter().enumerate() {
            if preset.id.is_empty() {
                return Err(ParseError::InvalidConfig(
                    "preset column with empty id".to_string(),
                ));
            }
            if !seen_ids.insert(preset.id.clone()) {
                return Err(ParseError::InvalidConfig(format!(
                    "duplicate preset column id: {:?}",
                    preset.id
                )));
            }
            // Discovered columns take `column-<len+1>`, so an id in that
            // form is only safe at the matching position.
            if let Some(n) = generated_id_number(&preset.id) {
                if n != index + 1 {
                    return Err(ParseError::InvalidConfig(format!(
                        "preset column id {:?} at position {} collides with generated ids",
                        preset.id,
                        index + 1
                    )));
                }
            }
            let title = normalize_title(&preset.title);
            if !seen_titles.insert(title.clone()) {
                return Err(ParseError::InvalidConfig(format!(
                    "duplicate preset column title: {:?}",
                    title
                )));
            }
        }

        let mut aliases: HashMap<String, String> = HashMap::new();
        for (raw_key, raw_target) in &self.aliases {
            let key = normalize_title(raw_key);
            let target = normalize_title(raw_target);
            if key.is_empty() || target.is_empty() {
                return Err(ParseError::InvalidConfig(format!(
                    "alias {:?} -> {:?} normalizes to an empty title",
                    raw_key, raw_target
                )));
            }
            if let Some(existing) = aliases.insert(key.clone(), target.clone()) {
                if existing != target {
                    return Err(ParseError::InvalidConfig(format!(
                        "alias {:?} maps to both {:?} and {:?}",
                        key, existing, target
                    )));
                }
            }
        }
        for (key, target) in &aliases {
            if key == target {
                continue;
            }
            if let Some(next) = aliases.get(target) {
                if next != target {
                    return Err(ParseError::InvalidConfig(format!(
                        "alias chain: {:?} -> {:?} -> {:?}",
                        key, target, next
                    )));
                }
            }
            if seen_titles.contains(key) {
                return Err(ParseError::InvalidConfig(format!(
                    "alias {:?} shadows a preset column title",
                    key
                )));
            }
        }

        if let Some(narration) = &self.narration {
            if normalize_title(&narration.title).is_empty() {
                return Err(ParseError::InvalidConfig(
                    "narration title is empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Alias table with keys and values normalized to display form.
    ///
    /// Conflicting raw spellings are caught by `validate`; here the last
    /// insertion wins.
    pub fn normalized_aliases(&self) -> HashMap<String, String> {
        self.aliases
            .iter()
            .map(|(raw_key, raw_target)| (normalize_title(raw_key), normalize_title(raw_target)))
            .collect()
    }

    /// Exclusion set normalized to display form.
    pub fn normalized_excluded(&self) -> HashSet<String> {
        self.excluded_titles
            .iter()
            .map(|t| normalize_title(t))
            .collect()
    }
}

/// Number of a `column-<n>` id, if the id is exactly the form the graph
/// builder generates for discovered speakers.
fn generated_id_number(id: &str) -> Option<usize> {
    let digits = id.strip_prefix("column-")?;
    let n: usize = digits.parse().ok()?;
    (format!("column-{n}") == id).then_some(n)
}
