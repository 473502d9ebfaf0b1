use core::fmt;

/// A non-fatal condition observed while planning or merging.
///
/// Warnings never change the output of a run. They exist so callers can
/// surface degraded input instead of it being silently absorbed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Warning {
    /// A single slide carries more components than a chunk may hold. The
    /// slide was still placed, alone, in its own chunk.
    OversizedSlide {
        slide_number: u32,
        component_count: usize,
        max_components: usize,
    },

    /// A test case `reference` has no parseable `<N>P` page token. The record
    /// is kept and sorted after every record with a page.
    UnresolvableReference {
        chunk_id: usize,
        test_case_id: String,
        reference: String,
    },

    /// Two test cases share a chunk-local identifier. Cross-references to it
    /// resolve to the first one in merged order.
    DuplicateLocalId {
        chunk_id: usize,
        test_case_id: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OversizedSlide {
                slide_number,
                component_count,
                max_components,
            } => write!(
                f,
                "slide {slide_number} has {component_count} components (limit {max_components}); placed alone"
            ),
            Self::UnresolvableReference {
                chunk_id,
                test_case_id,
                reference,
            } => write!(
                f,
                "chunk {chunk_id}: {test_case_id} has no page in reference {reference:?}; sorted last"
            ),
            Self::DuplicateLocalId {
                chunk_id,
                test_case_id,
            } => write!(
                f,
                "chunk {chunk_id}: identifier {test_case_id} already used; cross-references keep the first"
            ),
        }
    }
}

/// The output of a run together with the warnings it raised.
#[derive(Clone, Debug, PartialEq)]
pub struct Report<T> {
    pub output: T,
    pub warnings: Vec<Warning>,
}

impl<T> Report<T> {
    /// Returns `true` if the run raised no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Discards the warnings.
    pub fn into_output(self) -> T {
        self.output
    }
}

/// Collects warnings for one run, echoing each one as a `tracing` event when
/// that feature is enabled.
#[derive(Default)]
pub(crate) struct Warnings(Vec<Warning>);

impl Warnings {
    pub(crate) fn push(&mut self, warning: Warning) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{warning}");
        self.0.push(warning);
    }

    pub(crate) fn finish<T>(self, output: T) -> Report<T> {
        Report {
            output,
            warnings: self.0,
        }
    }
}
