use tracing::debug;

use crate::error::ParseError;
use crate::graph::build_graph;
use crate::models::{ParseConfig, TranscriptGraph};
use crate::segment::segment;

/// Parse transcript text into a column/note/edge graph.
///
/// A pure function of its two inputs: no state survives the call, so the
/// same text and config always produce an identical graph, and callers can
/// run any number of parses concurrently. Malformed transcript text never
/// errors; at worst it produces a graph with no notes. The only failure
/// mode is a contradictory config.
pub fn parse(text: &str, config: &ParseConfig) -> Result<TranscriptGraph, ParseError> {
    config.validate()?;

    let utterances = segment(text, config);
    let graph = build_graph(&utterances, config);

    debug!(
        "parsed transcript: {} utterances, {} columns, {} notes, {} edges",
        utterances.len(),
        graph.columns.len(),
        graph.note_count(),
        graph.edges.len()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Handle, LeadInSkip, PresetColumn, SpeakerLinePattern};
    use std::collections::HashMap;

    #[test]
    fn test_two_speaker_exchange_end_to_end() {
        let text = "Alice Smith\nHello there.\n\nBob Jones\nHi Alice.\n";
        let graph = parse(text, &ParseConfig::default()).unwrap();

        assert_eq!(graph.columns.len(), 2);
        assert_eq!(graph.columns[0].title, "Alice Smith");
        assert_eq!(graph.columns[1].title, "Bob Jones");
        assert_eq!(graph.columns[0].notes.len(), 1);
        assert_eq!(graph.columns[1].notes.len(), 1);
        assert_eq!(graph.columns[0].notes[0].content, "Hello there.");

        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.id, "edge-1");
        assert_eq!(edge.source, "note-1");
        assert_eq!(edge.target, "note-2");
        assert_eq!(edge.source_handle, Handle::Right);
        assert_eq!(edge.target_handle, Handle::Left);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "Alice Smith\nFirst.\n\nBob Jones\nSecond.\n\nAlice Smith\nThird.\n";
        let config = ParseConfig {
            preset_columns: vec![PresetColumn::new("column-1", "Bob Jones")],
            excluded_titles: ["Site Index".to_string()].into(),
            aliases: HashMap::from([("al".to_string(), "Alice Smith".to_string())]),
            ..Default::default()
        };

        let first = serde_json::to_string(&parse(text, &config).unwrap()).unwrap();
        let second = serde_json::to_string(&parse(text, &config).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = parse("", &ParseConfig::default()).unwrap();

        assert!(graph.columns.is_empty());
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_empty_input_keeps_preset_columns() {
        let config = ParseConfig {
            preset_columns: vec![
                PresetColumn::new("column-1", "Michael Barbaro"),
                PresetColumn::new("column-2", ""),
            ],
            ..Default::default()
        };
        let graph = parse("", &config).unwrap();

        assert_eq!(graph.columns.len(), 2);
        assert!(graph.columns.iter().all(|c| c.notes.is_empty()));
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_invalid_config_is_the_only_error() {
        let config = ParseConfig {
            preset_columns: vec![
                PresetColumn::new("column-1", "Alice"),
                PresetColumn::new("column-1", "Bob"),
            ],
            ..Default::default()
        };

        let err = parse("Alice\nHi.\n", &config).unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfig(_)));
    }

    #[test]
    fn test_preset_id_that_would_collide_with_a_discovered_one_is_rejected() {
        // One preset plus one new speaker would mint a second "column-2".
        let config = ParseConfig {
            preset_columns: vec![PresetColumn::new("column-2", "Preset Person")],
            ..Default::default()
        };

        let text = "Preset Person\nWelcome.\n\nAlice Smith\nThanks.\n";
        let err = parse(text, &config).unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfig(_)));
    }

    #[test]
    fn test_alias_cannot_route_a_speaker_into_the_placeholder() {
        let config = ParseConfig {
            preset_columns: vec![
                PresetColumn::new("column-1", "Michael Barbaro"),
                PresetColumn::new("column-2", ""),
            ],
            aliases: HashMap::from([("narrator".to_string(), "  ".to_string())]),
            ..Default::default()
        };

        let err = parse("Narrator\nOnce upon a time.\n", &config).unwrap_err();
        assert!(matches!(err, ParseError::InvalidConfig(_)));
    }

    #[test]
    fn test_edge_count_is_notes_minus_one() {
        let text = "Alice Smith\nOne.\n\nTwo.\n\nBob Jones\nThree.\n";
        let graph = parse(text, &ParseConfig::default()).unwrap();

        assert_eq!(graph.note_count(), 3);
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn test_daily_style_transcript() {
        let text = "\
The Daily - Episode Transcript
2024-03-01

MICHAEL BARBARO: From the New York Times, I'm Michael Barbaro.

[theme music]

ARCHIVED RECORDING: We begin tonight with breaking news.

MICHAEL BARBARO: Today's story starts here.
";
        let config = ParseConfig {
            speaker_line_pattern: SpeakerLinePattern::CapsColonLine,
            lead_in_skip: LeadInSkip::UntilFirstSpeakerLine,
            line_exclusion_prefixes: ["[".to_string()].into(),
            excluded_titles: ["Archived Recording".to_string()].into(),
            ..Default::default()
        };
        let graph = parse(text, &config).unwrap();

        // Only Michael survives: the archived recording is excluded and the
        // header lines fall before the first label.
        assert_eq!(graph.columns.len(), 1);
        let michael = graph.column_by_title("Michael Barbaro").unwrap();
        assert_eq!(michael.notes.len(), 2);
        assert!(graph.column_by_title("Archived Recording").is_none());
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].source_handle, Handle::Bottom);
    }
}
