use crate::{MergedDocument, global_id, page_number};
use core::fmt;
use std::collections::HashSet;

/// A consistency problem found in a merged document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Finding {
    /// `total_testcases` disagrees with the number of test cases.
    CountMismatch { declared: usize, actual: usize },
    /// The identifier at `position` (1-based) is not `<prefix>_<position>`.
    UnexpectedId {
        position: usize,
        expected: String,
        found: String,
    },
    /// The same identifier appears more than once.
    DuplicateId { id: String },
    /// A test case points at an earlier page than its predecessor.
    PageOrder { id: String, previous: u32, page: u32 },
    /// A test case with a page follows one without.
    PageAfterUnpaged { id: String, page: u32 },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountMismatch { declared, actual } => {
                write!(f, "total_testcases is {declared} but {actual} test cases are present")
            }
            Self::UnexpectedId {
                position,
                expected,
                found,
            } => write!(f, "position {position}: expected {expected}, found {found}"),
            Self::DuplicateId { id } => write!(f, "{id} appears more than once"),
            Self::PageOrder { id, previous, page } => {
                write!(f, "{id}: page order reversed ({previous}P -> {page}P)")
            }
            Self::PageAfterUnpaged { id, page } => {
                write!(f, "{id}: page {page}P follows a test case without a page")
            }
        }
    }
}

/// Checks that `doc` is dense, unique and page-ordered under `prefix`.
///
/// Returns every finding; an empty vector means the document is consistent.
pub fn audit(doc: &MergedDocument, prefix: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    if doc.total_testcases != doc.testcases.len() {
        findings.push(Finding::CountMismatch {
            declared: doc.total_testcases,
            actual: doc.testcases.len(),
        });
    }

    let mut seen = HashSet::with_capacity(doc.testcases.len());
    let mut previous: Option<u32> = None;
    let mut unpaged_seen = false;

    for (idx, tc) in doc.testcases.iter().enumerate() {
        let expected = global_id(prefix, idx + 1);
        if tc.id != expected {
            findings.push(Finding::UnexpectedId {
                position: idx + 1,
                expected,
                found: tc.id.clone(),
            });
        }
        if !seen.insert(tc.id.as_str()) {
            findings.push(Finding::DuplicateId { id: tc.id.clone() });
        }

        match page_number(&tc.reference) {
            Some(page) if unpaged_seen => findings.push(Finding::PageAfterUnpaged {
                id: tc.id.clone(),
                page,
            }),
            Some(page) => {
                if let Some(prev) = previous.filter(|&prev| page < prev) {
                    findings.push(Finding::PageOrder {
                        id: tc.id.clone(),
                        previous: prev,
                        page,
                    });
                }
                previous = Some(page);
            }
            None => unpaged_seen = true,
        }
    }

    findings
}
