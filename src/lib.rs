pub mod error;
pub mod graph;
pub mod io;
pub mod models;
pub mod parse;
pub mod segment;
pub mod server;

pub use error::{ParseError, StoreError};
pub use graph::{EDGE_TYPE, build_graph};
pub use io::{GraphPaths, TranscriptStore};
pub use models::{
    Column, Edge, Handle, LeadInSkip, NarrationConfig, Note, ParseConfig, PresetColumn,
    SpeakerLinePattern, TranscriptGraph, normalize_title,
};
pub use parse::parse;
pub use segment::{SpeakerLabel, Utterance, match_speaker_line, segment};
pub use server::{AppState, router, serve};
