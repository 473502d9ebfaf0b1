/// Default page bound per chunk.
pub const DEFAULT_MAX_PAGES_PER_CHUNK: usize = 15;

/// Default component bound per chunk.
pub const DEFAULT_MAX_COMPONENTS_PER_CHUNK: usize = 80;

/// What to do with a slide whose own component count exceeds
/// `max_components_per_chunk`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OversizePolicy {
    /// Place the slide alone in its own chunk and record a
    /// [`Warning::OversizedSlide`](crate::Warning::OversizedSlide).
    #[default]
    Tolerate,
    /// Fail planning with [`Error::CapacityViolation`](crate::Error::CapacityViolation).
    Reject,
}

/// Capacity parameters for [`plan_chunks`](crate::plan_chunks).
///
/// Both bounds must be positive. The planner does not validate them; a zero
/// bound degrades to one slide per chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanConfig {
    pub max_pages_per_chunk: usize,
    pub max_components_per_chunk: usize,
    /// Advisory cap on concurrently running workers. Recorded in the plan,
    /// never enforced on the chunk count.
    pub max_parallel_workers: Option<usize>,
    pub oversize_policy: OversizePolicy,
}

impl PlanConfig {
    pub fn new(max_pages_per_chunk: usize, max_components_per_chunk: usize) -> Self {
        Self {
            max_pages_per_chunk,
            max_components_per_chunk,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_parallel_workers(mut self, workers: usize) -> Self {
        self.max_parallel_workers = Some(workers);
        self
    }

    #[must_use]
    pub fn with_oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.oversize_policy = policy;
        self
    }

    pub(crate) fn fits(&self, pages: usize, components: usize) -> bool {
        pages <= self.max_pages_per_chunk && components <= self.max_components_per_chunk
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_pages_per_chunk: DEFAULT_MAX_PAGES_PER_CHUNK,
            max_components_per_chunk: DEFAULT_MAX_COMPONENTS_PER_CHUNK,
            max_parallel_workers: None,
            oversize_policy: OversizePolicy::Tolerate,
        }
    }
}
