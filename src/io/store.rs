use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::TranscriptGraph;

/// On-disk storage for raw transcripts and parsed graphs.
///
/// Layout under the root directory:
/// - `raw/<name>.txt` for transcript sources
/// - `parsed/<name>.json` for the latest graph saved under a name
/// - `parsed/<name>_<timestamp>.json` snapshots written alongside each save
pub struct TranscriptStore {
    raw_dir: PathBuf,
    parsed_dir: PathBuf,
}

/// Where one graph save landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPaths {
    pub latest: PathBuf,
    pub snapshot: PathBuf,
}

impl TranscriptStore {
    /// Open a store rooted at `root`, creating its directories if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let raw_dir = root.join("raw");
        let parsed_dir = root.join("parsed");
        fs::create_dir_all(&raw_dir)?;
        fs::create_dir_all(&parsed_dir)?;
        Ok(Self { raw_dir, parsed_dir })
    }

    /// Save raw transcript text under a fresh random name; returns the name.
    pub fn save_raw(&self, content: &str) -> Result<String, StoreError> {
        let name = Uuid::new_v4().to_string();
        fs::write(self.raw_path(&name), content)?;
        Ok(name)
    }

    /// Load raw transcript text previously saved under `name`.
    pub fn load_raw(&self, name: &str) -> Result<String, StoreError> {
        let name = validate_name(name)?;
        match fs::read_to_string(self.raw_path(name)) {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::InputNotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Save a graph under `name`: the latest copy plus a timestamped
    /// snapshot, both pretty-printed JSON.
    pub fn save_graph(
        &self,
        name: &str,
        graph: &TranscriptGraph,
    ) -> Result<GraphPaths, StoreError> {
        let name = validate_name(name)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let latest = self.parsed_path(name);
        let snapshot = self.parsed_path(&format!("{name}_{stamp}"));

        write_graph(&latest, graph)?;
        write_graph(&snapshot, graph)?;

        Ok(GraphPaths { latest, snapshot })
    }

    /// Load the latest graph saved under `name`.
    pub fn load_graph(&self, name: &str) -> Result<TranscriptGraph, StoreError> {
        let name = validate_name(name)?;
        let content = match fs::read_to_string(self.parsed_path(name)) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::InputNotFound(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn raw_path(&self, name: &str) -> PathBuf {
        self.raw_dir.join(format!("{name}.txt"))
    }

    fn parsed_path(&self, name: &str) -> PathBuf {
        self.parsed_dir.join(format!("{name}.json"))
    }
}

/// Names become file names, so only a conservative character set is
/// allowed and parent-directory escapes are rejected.
fn validate_name(name: &str) -> Result<&str, StoreError> {
    let well_formed = !name.is_empty()
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if well_formed {
        Ok(name)
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

fn write_graph(path: &Path, graph: &TranscriptGraph) -> Result<(), StoreError> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, graph)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParseConfig;
    use crate::parse::parse;

    fn sample_graph() -> TranscriptGraph {
        parse(
            "Alice Smith\nHello there.\n\nBob Jones\nHi Alice.\n",
            &ParseConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_save_and_load_raw_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::open(dir.path()).unwrap();

        let name = store.save_raw("Alice Smith\nHello.\n").unwrap();
        let content = store.load_raw(&name).unwrap();

        assert_eq!(content, "Alice Smith\nHello.\n");
    }

    #[test]
    fn test_load_raw_missing_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::open(dir.path()).unwrap();

        let err = store.load_raw("no-such-transcript").unwrap_err();
        assert!(matches!(err, StoreError::InputNotFound(_)));
    }

    #[test]
    fn test_save_graph_writes_latest_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::open(dir.path()).unwrap();
        let graph = sample_graph();

        let paths = store.save_graph("episode-1", &graph).unwrap();

        assert!(paths.latest.exists());
        assert!(paths.snapshot.exists());
        assert!(paths.latest.ends_with("episode-1.json"));
        assert_ne!(paths.latest, paths.snapshot);

        let loaded = store.load_graph("episode-1").unwrap();
        assert_eq!(loaded.columns.len(), graph.columns.len());
        assert_eq!(loaded.edges.len(), graph.edges.len());
    }

    #[test]
    fn test_saved_graph_json_round_trips_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::open(dir.path()).unwrap();
        let graph = sample_graph();

        store.save_graph("episode-2", &graph).unwrap();
        let loaded = store.load_graph("episode-2").unwrap();

        assert_eq!(
            serde_json::to_string(&loaded).unwrap(),
            serde_json::to_string(&graph).unwrap()
        );
    }

    #[test]
    fn test_path_escaping_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::open(dir.path()).unwrap();

        for bad in ["../etc/passwd", "a/b", "", "name with spaces", "x\0y"] {
            let err = store.load_raw(bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidName(_)), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_load_graph_missing_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::open(dir.path()).unwrap();

        let err = store.load_graph("nothing-here").unwrap_err();
        assert!(matches!(err, StoreError::InputNotFound(_)));
    }
}
