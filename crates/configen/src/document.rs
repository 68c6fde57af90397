//! Reading and accessing one configuration document.

use crate::Error;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// File name of the configuration document in each processed directory.
pub const DOCUMENT_NAME: &str = "configure.json";

/// File name of the generated script written next to the document.
pub const OUTPUT_NAME: &str = "configure.cmake";

/// A parsed configuration document. Read once per directory and immutable
/// while its sections are processed.
///
/// The schema is heterogeneous (descriptor values may be strings, lists,
/// booleans, or records), so the document keeps the raw
/// [`serde_json::Value`] tree and exposes typed accessors over it, the same
/// way the schema-input parsers this is modeled on walk their documents.
#[derive(Debug)]
pub struct ConfigDocument {
    path: PathBuf,
    data: Value,
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: OnceLock<Map<String, Value>> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

impl ConfigDocument {
    /// Read `configure.json` from `dir`. A missing document is the one
    /// fatal error in the pipeline.
    pub fn read_from_dir(dir: &Path) -> Result<Self, Error> {
        let path = dir.join(DOCUMENT_NAME);
        if !path.is_file() {
            return Err(Error::MissingDocument(path));
        }

        info!("reading {}", path.display());
        let text = fs::read_to_string(&path).map_err(|e| Error::Read(path.clone(), e))?;
        let data = serde_json::from_str(&text).map_err(|e| Error::Json(path.clone(), e))?;
        Ok(Self { path, data })
    }

    /// Build a document from an already-parsed value (test fixtures).
    pub fn from_value(path: impl Into<PathBuf>, data: Value) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Path of the backing `configure.json`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Module name; a document without one is the designated root.
    pub fn module(&self) -> &str {
        self.data
            .get("module")
            .and_then(Value::as_str)
            .unwrap_or("global")
    }

    /// True for the document that gets the version-metadata trailer.
    pub fn is_root(&self) -> bool {
        self.module() == "global"
    }

    /// The `files` map (auxiliary file roles, carried through untouched).
    pub fn files(&self) -> &Map<String, Value> {
        self.section_map(&["files"])
    }

    /// Command-line input descriptors (`commandline.options`).
    pub fn inputs(&self) -> &Map<String, Value> {
        self.section_map(&["commandline", "options"])
    }

    /// Third-party library descriptors, keyed by library id.
    pub fn libraries(&self) -> &Map<String, Value> {
        self.section_map(&["libraries"])
    }

    /// Compile/SIMD test descriptors, keyed by test name.
    pub fn tests(&self) -> &Map<String, Value> {
        self.section_map(&["tests"])
    }

    /// Feature descriptors, keyed by feature id.
    pub fn features(&self) -> &Map<String, Value> {
        self.section_map(&["features"])
    }

    /// Subdirectories to recurse into, in document order.
    pub fn subconfigs(&self) -> Vec<&str> {
        self.data
            .get("subconfigs")
            .and_then(Value::as_array)
            .map(|dirs| dirs.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    fn section_map(&self, path: &[&str]) -> &Map<String, Value> {
        let mut value = &self.data;
        for key in path {
            match value.get(key) {
                Some(next) => value = next,
                None => return empty_map(),
            }
        }
        value.as_object().unwrap_or_else(|| empty_map())
    }
}
