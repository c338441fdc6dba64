use std::collections::HashMap;

use crate::models::{Column, Edge, Handle, Note, ParseConfig, TranscriptGraph, normalize_title};
use crate::segment::Utterance;

/// Edge rendering style stamped on every edge.
pub const EDGE_TYPE: &str = "smoothstep";

/// Assemble the column/note/edge graph from segmented utterances.
///
/// Columns are created in first-appearance order after any preset
/// columns; notes keep utterance order and are chained into a single
/// path of edges. Callers are expected to run `ParseConfig::validate`
/// first (`parse` does), so alias lookups here cannot chain.
pub fn build_graph(utterances: &[Utterance], config: &ParseConfig) -> TranscriptGraph {
    let aliases = config.normalized_aliases();
    let excluded = config.normalized_excluded();

    let mut columns: Vec<Column> = Vec::new();
    let mut index_by_title: HashMap<String, usize> = HashMap::new();

    // Preset columns come first and keep their configured ids.
    for preset in &config.preset_columns {
        let title = normalize_title(&preset.title);
        index_by_title.insert(title.clone(), columns.len());
        columns.push(Column::new(preset.id.clone(), title));
    }

    // Flat list of notes in emission order, for edge generation below.
    let mut notes: Vec<Note> = Vec::new();

    for utterance in utterances {
        let mut title = normalize_title(&utterance.speaker);
        if let Some(canonical) = aliases.get(&title) {
            title = canonical.clone();
        }
        // Exclusion happens after aliasing, so an alias of an excluded
        // title is excluded too. Skipped utterances consume no note id.
        if excluded.contains(&title) {
            continue;
        }

        let column_index = match index_by_title.get(&title) {
            Some(&index) => index,
            None => {
                let id = format!("column-{}", columns.len() + 1);
                index_by_title.insert(title.clone(), columns.len());
                columns.push(Column::new(id, title));
                columns.len() - 1
            }
        };

        let note = Note {
            id: format!("note-{}", notes.len() + 1),
            content: utterance.text.clone(),
            column_id: columns[column_index].id.clone(),
        };
        columns[column_index].notes.push(note.clone());
        notes.push(note);
    }

    let edges = chain_edges(&notes, &columns);

    TranscriptGraph { columns, edges }
}

/// Connect consecutive notes with edges, choosing handles from the
/// relative positions of their columns in the column list.
fn chain_edges(notes: &[Note], columns: &[Column]) -> Vec<Edge> {
    // 1-based ordinal of each column in display order.
    let position_by_id: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| (column.id.as_str(), index + 1))
        .collect();

    let mut edges = Vec::with_capacity(notes.len().saturating_sub(1));
    for (i, pair) in notes.windows(2).enumerate() {
        let (source, target) = (&pair[0], &pair[1]);

        let (source_handle, target_handle) = if source.column_id == target.column_id {
            // Same speaker continues: flow straight down the column.
            (Handle::Bottom, Handle::Top)
        } else {
            let source_position = position_by_id[source.column_id.as_str()];
            let target_position = position_by_id[target.column_id.as_str()];
            if source_position < target_position {
                (Handle::Right, Handle::Left)
            } else {
                (Handle::Left, Handle::Right)
            }
        };

        edges.push(Edge {
            id: format!("edge-{}", i + 1),
            source: source.id.clone(),
            target: target.id.clone(),
            source_handle,
            target_handle,
            edge_type: EDGE_TYPE.to_string(),
        });
    }

    edges
}
