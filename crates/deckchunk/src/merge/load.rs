//! Discovery and loading of chunk result files.
//!
//! Workers write one `tc_chunk_<id>.json` per chunk into a shared output
//! directory. The merger takes whatever is present as a snapshot; it does
//! not know how many results to expect.

use crate::{ChunkResult, Error, ProjectInfo, Result, TestCaseRecord};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// File name pattern of chunk result files.
pub const CHUNK_RESULT_PATTERN: &str = "tc_chunk_*.json";

static FILE_CHUNK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.json$").expect("static file id pattern"));

/// On-disk shape of a chunk result. Test cases may live under either
/// `testcases` or `test_cases`.
#[derive(Deserialize)]
struct RawChunkResult {
    #[serde(default)]
    chunk_id: Option<usize>,
    #[serde(default)]
    project_info: Option<ProjectInfo>,
    #[serde(default)]
    testcases: Option<Vec<TestCaseRecord>>,
    #[serde(default)]
    test_cases: Option<Vec<TestCaseRecord>>,
}

/// Lists chunk result files in `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`Error::Pattern`] if `dir` cannot form a valid pattern and
/// [`Error::Io`] if a directory entry cannot be read.
pub fn discover_chunk_results(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let pattern = format!(
        "{}/{CHUNK_RESULT_PATTERN}",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            Error::io(path, std::io::Error::from(e))
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Loads and validates one chunk result file.
///
/// A missing `chunk_id` is taken from the digits at the end of the file
/// name.
///
/// # Errors
///
/// Returns [`Error::StructuralInput`] if the file is unreadable, is not JSON,
/// has no test case list under either accepted key, or has no chunk id.
pub fn load_chunk_result(path: impl AsRef<Path>) -> Result<ChunkResult> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::structural(path, format!("unreadable: {e}")))?;
    let raw: RawChunkResult = serde_json::from_str(&text)
        .map_err(|e| Error::structural(path, format!("not a chunk result: {e}")))?;

    let testcases = match (raw.testcases, raw.test_cases) {
        (Some(primary), Some(alias)) if primary.is_empty() => alias,
        (Some(primary), _) => primary,
        (None, Some(alias)) => alias,
        (None, None) => {
            return Err(Error::structural(
                path,
                "missing `testcases` (or `test_cases`) list",
            ));
        }
    };

    let chunk_id = match raw.chunk_id.or_else(|| chunk_id_from_file_name(path)) {
        Some(id) => id,
        None => return Err(Error::structural(path, "missing `chunk_id`")),
    };

    Ok(ChunkResult {
        chunk_id,
        project_info: raw.project_info.unwrap_or_default(),
        testcases,
    })
}

/// Loads every chunk result in `dir` before anything is derived from them.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if no file matches
/// [`CHUNK_RESULT_PATTERN`], and propagates the first load failure.
pub fn load_chunk_results(dir: impl AsRef<Path>) -> Result<Vec<ChunkResult>> {
    let dir = dir.as_ref();
    let paths = discover_chunk_results(dir)?;
    if paths.is_empty() {
        return Err(Error::EmptyInput {
            location: format!("{} ({CHUNK_RESULT_PATTERN})", dir.display()),
        });
    }

    paths
        .iter()
        .map(|path| {
            let result = load_chunk_result(path)?;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                path = %path.display(),
                chunk_id = result.chunk_id,
                testcases = result.testcases.len(),
                "loaded chunk result"
            );
            Ok(result)
        })
        .collect()
}

fn chunk_id_from_file_name(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    FILE_CHUNK_ID
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}
