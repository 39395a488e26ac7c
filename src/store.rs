//! Persistence of [`GraphRecord`]s.
//!
//! Stores read and write whole records.  Writes replace the previous record
//! in one step, but nothing coordinates writers: when two processes update
//! the same graph, the last write wins.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    GraphRecord,
    config::Config,
    error::{GraphError, Result},
};

const RECORD_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// A keyed collection of graph records.
pub trait GraphStore {
    fn exists(&self, name: &str) -> Result<bool>;

    /// Reads a record, failing with [`GraphError::NotFound`] if there is
    /// none under `name`.
    fn read(&self, name: &str) -> Result<GraphRecord>;

    /// Stores `record` under its own name, replacing any previous record.
    fn write(&mut self, record: &GraphRecord) -> Result<()>;
}

/// Checks that `name` can be used as a file name without escaping the
/// store directory.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(GraphError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Stores each graph as `<name>.json` in one directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
    pretty: bool,
}

impl FileStore {
    /// Opens a store in `root`.  The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pretty: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.graphs_dir).with_pretty(config.pretty)
    }

    /// Chooses between indented and single-line JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Gets the file a record is stored in.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.{RECORD_EXTENSION}")))
    }

    fn io_error(source: io::Error, path: &Path) -> GraphError {
        GraphError::Io {
            source,
            path: path.to_path_buf(),
        }
    }
}

impl GraphStore for FileStore {
    fn exists(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;
        path.try_exists().map_err(|err| Self::io_error(err, &path))
    }

    fn read(&self, name: &str) -> Result<GraphRecord> {
        let path = self.path_for(name)?;
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(GraphError::graph_not_found(name));
            }
            Err(err) => return Err(Self::io_error(err, &path)),
        };
        let mut record =
            GraphRecord::from_json(&data).map_err(|source| GraphError::Json {
                source,
                path: path.clone(),
            })?;
        if record.name != name {
            tracing::warn!(
                path = %path.display(),
                stored = %record.name,
                "record name does not match its file; using the file name"
            );
            record.name = name.to_string();
        }
        Ok(record)
    }

    fn write(&mut self, record: &GraphRecord) -> Result<()> {
        let path = self.path_for(&record.name)?;
        let data = record
            .to_json(self.pretty)
            .map_err(|source| GraphError::Json {
                source,
                path: path.clone(),
            })?;
        fs::create_dir_all(&self.root).map_err(|err| Self::io_error(err, &self.root))?;

        let temp_path = path.with_extension(TEMP_EXTENSION);
        fs::write(&temp_path, data).map_err(|err| Self::io_error(err, &temp_path))?;
        if let Err(err) = fs::rename(&temp_path, &path) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                tracing::warn!(path = %temp_path.display(), %cleanup, "could not remove temp file");
            }
            return Err(Self::io_error(err, &path));
        }
        tracing::trace!(path = %path.display(), "wrote graph record");
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, GraphRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.keys().map(String::as_str)
    }
}

impl GraphStore for MemoryStore {
    fn exists(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(self.records.contains_key(name))
    }

    fn read(&self, name: &str) -> Result<GraphRecord> {
        validate_name(name)?;
        self.records
            .get(name)
            .cloned()
            .ok_or_else(|| GraphError::graph_not_found(name))
    }

    fn write(&mut self, record: &GraphRecord) -> Result<()> {
        validate_name(&record.name)?;
        self.records.insert(record.name.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GraphRecord {
        GraphRecord::with_contents(
            "sample",
            false,
            ["A", "B"],
            [("A", "B")],
        )
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("g1").is_ok());
        assert!(validate_name("my graph.v2").is_ok());
        for bad in ["", ".", "..", "a/b", "a\\b", "../escape"] {
            assert!(
                matches!(validate_name(bad), Err(GraphError::InvalidName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(!store.exists("sample").unwrap());
        assert!(matches!(
            store.read("sample"),
            Err(GraphError::NotFound(_))
        ));
        store.write(&sample()).unwrap();
        assert!(store.exists("sample").unwrap());
        assert_eq!(store.read("sample").unwrap(), sample());
        assert_eq!(store.len(), 1);
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["sample"]);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("graphs"));
        assert!(!store.exists("sample").unwrap());
        store.write(&sample()).unwrap();
        assert!(dir.path().join("graphs/sample.json").is_file());
        assert!(!dir.path().join("graphs/sample.json.tmp").exists());
        assert!(store.exists("sample").unwrap());
        assert_eq!(store.read("sample").unwrap(), sample());
    }

    #[test]
    fn test_file_store_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the record file should go.
        fs::create_dir_all(dir.path().join("sample.json/inner")).unwrap();
        let mut store = FileStore::new(dir.path());
        let err = store.write(&sample()).unwrap_err();
        assert!(matches!(err, GraphError::Io { .. }));
        assert!(!err.is_recoverable());
        assert!(!dir.path().join("sample.json.tmp").exists());
    }

    #[test]
    fn test_file_store_compact_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path()).with_pretty(false);
        store.write(&sample()).unwrap();
        let data = fs::read_to_string(dir.path().join("sample.json")).unwrap();
        assert!(!data.contains('\n'));
    }

    #[test]
    fn test_file_store_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.read("nope"),
            Err(GraphError::NotFound(_))
        ));
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        let err = store.read("broken").unwrap_err();
        assert!(matches!(err, GraphError::Json { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_file_store_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let record = GraphRecord::new("../outside", false);
        assert!(matches!(
            store.write(&record),
            Err(GraphError::InvalidName(_))
        ));
        assert!(matches!(store.exists(""), Err(GraphError::InvalidName(_))));
    }

    #[test]
    fn test_file_store_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("renamed.json"),
            r#"{"name": "original", "directed": true, "nodes": ["A"], "edges": []}"#,
        )
        .unwrap();
        let record = FileStore::new(dir.path()).read("renamed").unwrap();
        assert_eq!(record.name, "renamed");
        assert!(record.directed);
    }
}
