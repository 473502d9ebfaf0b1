#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    ChunkResult, DEFAULT_PREFIX, Error, MergedDocument, ProjectInfo, RelocationTable, Report,
    Result, TestCaseRecord, Warning, diagnostics::Warnings, global_id, infer_prefix,
    load_chunk_results, local_sequence, page_number,
};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

/// Options for a merge run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    /// Explicit identifier prefix. When unset the prefix is inferred from the
    /// first identifier found, falling back to `default_prefix`.
    pub prefix: Option<String>,
    pub default_prefix: String,
}

impl MergeOptions {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Resolves the prefix for `results`, which must already be in chunk-id
    /// order.
    pub fn resolve_prefix(&self, results: &[ChunkResult]) -> String {
        if let Some(prefix) = &self.prefix {
            return prefix.clone();
        }

        results
            .iter()
            .find_map(|r| r.testcases.first())
            .and_then(|tc| infer_prefix(&tc.id))
            .unwrap_or(self.default_prefix.as_str())
            .to_owned()
    }
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            default_prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

/// A collected test case plus the keys that order it.
struct Staged {
    page: Option<u32>,
    chunk_id: usize,
    local_seq: Option<u32>,
    emission: usize,
    original_id: String,
    record: TestCaseRecord,
}

impl Staged {
    /// Pages ascending with unparseable pages last, then chunk id, then the
    /// worker's own sequence and emission order.
    fn sort_key(&self) -> (bool, u32, usize, Option<u32>, usize) {
        (
            self.page.is_none(),
            self.page.unwrap_or(u32::MAX),
            self.chunk_id,
            self.local_seq,
            self.emission,
        )
    }
}

/// Merges chunk results, in any order, into one page-ordered document with
/// dense `<prefix>_NNN` identifiers.
///
/// Cross-references in each `reference` that name a chunk-local identifier
/// are rewritten to the merged identifier, preferring the identifier defined
/// by the record's own chunk. The output depends only on the
/// set of results, never on the order they are passed in.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if `results` is empty and
/// [`Error::Relocation`] if the relocation table cannot be built.
///
/// # Example
///
/// ```
/// use deckchunk::{ChunkResult, MergeOptions, TestCaseRecord, merge_results};
///
/// let chunk1 = ChunkResult::new(1, vec![
///     TestCaseRecord::new("CHUNK1_001", "3P"),
///     TestCaseRecord::new("CHUNK1_002", "1P"),
/// ]);
/// let chunk2 = ChunkResult::new(2, vec![TestCaseRecord::new("CHUNK2_001", "2P (see CHUNK1_002)")]);
///
/// let doc = merge_results(vec![chunk2, chunk1], &MergeOptions::with_prefix("IT_OP"))
///     .unwrap()
///     .into_output();
///
/// assert_eq!(doc.testcases[1].id, "IT_OP_002");
/// assert_eq!(doc.testcases[1].reference, "2P (see IT_OP_001)");
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(chunks = results.len())))]
pub fn merge_results(
    mut results: Vec<ChunkResult>,
    options: &MergeOptions,
) -> Result<Report<MergedDocument>> {
    if results.is_empty() {
        return Err(Error::EmptyInput {
            location: "<memory>".to_owned(),
        });
    }

    let mut warnings = Warnings::default();
    results.sort_by_key(|r| r.chunk_id);

    let prefix = options.resolve_prefix(&results);
    let project_info = merge_project_info(&results);
    let merged_from_chunks = results.len();

    let mut staged = collect(results, &mut warnings);
    staged.sort_by_key(Staged::sort_key);

    let mut pairs = Vec::with_capacity(staged.len());
    for (idx, entry) in staged.iter_mut().enumerate() {
        let new_id = global_id(&prefix, idx + 1);
        if !entry.original_id.is_empty() {
            pairs.push((entry.chunk_id, entry.original_id.clone(), new_id.clone()));
        }
        entry.record.id = new_id;
    }
    report_duplicates(&staged, &mut warnings);
    let table = RelocationTable::from_scoped_pairs(pairs)?;

    let testcases: Vec<TestCaseRecord> = staged
        .into_iter()
        .map(|entry| {
            let mut record = entry.record;
            let rewritten = table.rewrite_scoped(entry.chunk_id, &record.reference);
            if let Cow::Owned(rewritten) = rewritten {
                record.reference = rewritten;
            }
            record.strip_internal_fields();
            record
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        prefix = %prefix,
        testcases = testcases.len(),
        relocated = table.len(),
        "merged chunk results"
    );

    Ok(warnings.finish(MergedDocument {
        project_info,
        total_testcases: testcases.len(),
        merged_from_chunks,
        testcases,
    }))
}

/// Loads every chunk result in `dir` and merges them.
///
/// # Errors
///
/// See [`load_chunk_results`] and [`merge_results`].
pub fn merge_directory(
    dir: impl AsRef<Path>,
    options: &MergeOptions,
) -> Result<Report<MergedDocument>> {
    let results = load_chunk_results(dir)?;
    merge_results(results, options)
}

/// Keeps, per key, the first value in chunk-id order. An empty value is
/// replaced by the next non-empty one.
pub fn merge_project_info(results: &[ChunkResult]) -> ProjectInfo {
    let mut merged = ProjectInfo::new();
    for result in results {
        for (key, value) in &result.project_info {
            match merged.get_mut(key) {
                Some(existing) if is_empty_value(existing) && !is_empty_value(value) => {
                    *existing = value.clone();
                }
                Some(_) => {}
                None => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }
    merged
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn collect(results: Vec<ChunkResult>, warnings: &mut Warnings) -> Vec<Staged> {
    let total = results.iter().map(|r| r.testcases.len()).sum();
    let mut staged = Vec::with_capacity(total);

    for result in results {
        for (emission, mut record) in result.testcases.into_iter().enumerate() {
            record.normalize_field_names();
            let page = page_number(&record.reference);
            if page.is_none() {
                warnings.push(Warning::UnresolvableReference {
                    chunk_id: result.chunk_id,
                    test_case_id: record.id.clone(),
                    reference: record.reference.clone(),
                });
            }

            staged.push(Staged {
                page,
                chunk_id: result.chunk_id,
                local_seq: local_sequence(&record.id),
                emission,
                original_id: record.id.clone(),
                record,
            });
        }
    }

    staged
}

fn report_duplicates(staged: &[Staged], warnings: &mut Warnings) {
    let mut seen = HashSet::with_capacity(staged.len());
    for entry in staged {
        if !entry.original_id.is_empty() && !seen.insert(entry.original_id.as_str()) {
            warnings.push(Warning::DuplicateLocalId {
                chunk_id: entry.chunk_id,
                test_case_id: entry.original_id.clone(),
            });
        }
    }
}
