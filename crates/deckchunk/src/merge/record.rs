use crate::{ProjectInfo, Result, artifact::write_json};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Worker field names and the names the merged document uses for them.
const FIELD_RENAMES: [(&str, &str); 3] = [
    ("steps", "test_step"),
    ("expected", "expected_result"),
    ("precondition", "pre_condition"),
];

/// Bookkeeping keys that must never reach a merged document.
const INTERNAL_FIELDS: [&str; 2] = ["_source_chunk", "_original_id"];

/// One authored test case.
///
/// Only the identifier and the `reference` are interpreted. Everything else
/// (title, steps, expected result, depth labels, ...) is opaque payload kept
/// in the order the worker emitted it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    #[serde(rename = "test_case_id", default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reference: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl TestCaseRecord {
    pub fn new(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reference: reference.into(),
            payload: Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Renames worker-style payload keys (`steps`, `expected`,
    /// `precondition`) to their merged-document names, unless the target key
    /// is already present.
    pub fn normalize_field_names(&mut self) {
        for (from, to) in FIELD_RENAMES {
            if self.payload.contains_key(to) {
                continue;
            }
            if let Some(value) = self.payload.shift_remove(from) {
                self.payload.insert(to.to_owned(), value);
            }
        }
    }

    pub(crate) fn strip_internal_fields(&mut self) {
        for key in INTERNAL_FIELDS {
            self.payload.shift_remove(key);
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The output of one generation worker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub chunk_id: usize,
    #[serde(default)]
    pub project_info: ProjectInfo,
    pub testcases: Vec<TestCaseRecord>,
}

impl ChunkResult {
    pub fn new(chunk_id: usize, testcases: Vec<TestCaseRecord>) -> Self {
        Self {
            chunk_id,
            project_info: ProjectInfo::new(),
            testcases,
        }
    }

    #[must_use]
    pub fn with_project_info(mut self, project_info: ProjectInfo) -> Self {
        self.project_info = project_info;
        self
    }
}

/// The single artifact of a merge run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedDocument {
    pub project_info: ProjectInfo,
    pub total_testcases: usize,
    pub merged_from_chunks: usize,
    pub testcases: Vec<TestCaseRecord>,
}

impl MergedDocument {
    /// Reads a merged document, e.g. for [`audit`](crate::audit).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) or
    /// [`Error::Json`](crate::Error::Json).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        crate::artifact::read_json(path.as_ref())
    }

    /// Writes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}
