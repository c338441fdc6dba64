pub mod pattern;

pub use pattern::{SpeakerLabel, match_speaker_line};

use crate::models::{LeadInSkip, ParseConfig};

/// One attributed paragraph of transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Speaker name exactly as it appeared on the label line.
    pub speaker: String,
    /// Paragraph text, inner lines joined with newlines; never empty.
    pub text: String,
}

/// Split transcript text into attributed paragraphs.
///
/// A single pass over the lines with two pieces of state: the active
/// speaker and the paragraph being collected. A speaker label flushes
/// the previous paragraph and switches speakers; a blank line flushes
/// the paragraph but keeps the speaker, so one turn can span several
/// paragraphs. A synthetic trailing blank line guarantees the last
/// paragraph is flushed.
pub fn segment(text: &str, config: &ParseConfig) -> Vec<Utterance> {
    let lines: Vec<&str> = text.lines().collect();

    // Skip lead-in material (titles, dates) up to the first speaker label.
    let start = match config.lead_in_skip {
        LeadInSkip::None => 0,
        LeadInSkip::UntilFirstSpeakerLine => lines
            .iter()
            .position(|line| match_speaker_line(line, config.speaker_line_pattern).is_some())
            .unwrap_or(0),
    };

    let mut utterances: Vec<Utterance> = Vec::new();
    let mut current_speaker: Option<String> = None;
    let mut current_paragraph: Vec<String> = Vec::new();

    for raw in lines[start..].iter().copied().chain(std::iter::once("")) {
        let line = raw.trim_end();

        // Speaker label: close out the previous speaker's paragraph first.
        if let Some(label) = match_speaker_line(line, config.speaker_line_pattern) {
            flush(&current_speaker, &mut current_paragraph, &mut utterances);
            current_speaker = Some(label.name.to_string());
            if let Some(inline) = label.inline {
                current_paragraph.push(inline.to_string());
            }
            continue;
        }

        // Blank line: paragraph boundary, not a turn boundary.
        if line.trim().is_empty() {
            flush(&current_speaker, &mut current_paragraph, &mut utterances);
            continue;
        }

        if is_excluded(line, config) {
            continue;
        }

        match current_speaker {
            Some(_) => current_paragraph.push(line.to_string()),
            None => {
                // No speaker yet. Long free-standing lines can optionally be
                // kept as narration; everything else is dropped.
                if let Some(narration) = &config.narration {
                    let trimmed = line.trim();
                    if trimmed.chars().count() > narration.min_chars {
                        utterances.push(Utterance {
                            speaker: narration.title.clone(),
                            text: trimmed.to_string(),
                        });
                    }
                }
            }
        }
    }

    utterances
}

/// Emit the collected paragraph under the active speaker, if both exist.
/// The buffer is cleared either way.
fn flush(speaker: &Option<String>, paragraph: &mut Vec<String>, out: &mut Vec<Utterance>) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join("\n").trim().to_string();
    paragraph.clear();

    let Some(name) = speaker else { return };
    if text.is_empty() {
        return;
    }
    out.push(Utterance {
        speaker: name.clone(),
        text,
    });
}

fn is_excluded(line: &str, config: &ParseConfig) -> bool {
    config
        .line_exclusion_prefixes
        .iter()
        .any(|prefix| line.starts_with(prefix))
}
