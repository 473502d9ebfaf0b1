#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Chunk, ChunkPlan, Error, OversizePolicy, PlanConfig, Report, Result, Section, SlideCorpus,
    SlideRecord, Warning, diagnostics::Warnings, group_sections,
};

/// A chunk under construction: a contiguous slide run and its label.
#[derive(Debug)]
struct Candidate<'a> {
    label: String,
    slides: Vec<&'a SlideRecord>,
    components: usize,
}

impl<'a> Candidate<'a> {
    fn new(label: String) -> Self {
        Self {
            label,
            slides: Vec::new(),
            components: 0,
        }
    }

    fn whole(section: &Section<'a>) -> Self {
        Self {
            label: section.label.clone(),
            slides: section.slides.iter().collect(),
            components: section.component_count(),
        }
    }

    fn pages(&self) -> usize {
        self.slides.len()
    }

    fn push(&mut self, slide: &'a SlideRecord) {
        self.components += slide.component_count();
        self.slides.push(slide);
    }

    fn absorb(&mut self, other: Self) {
        if other.label != self.label {
            self.label = format!("{} + {}", self.label, other.label);
        }
        self.components += other.components;
        self.slides.extend(other.slides);
    }
}

/// Partitions `corpus` into a [`ChunkPlan`].
///
/// Slides are grouped into sections, oversized sections are split into
/// `"(Part k)"` candidates, then adjacent candidates are greedily coalesced
/// while both bounds hold. Every slide lands in exactly one chunk, in corpus
/// order, and no chunk of more than one slide exceeds either bound.
///
/// # Errors
///
/// Returns [`Error::CapacityViolation`] when a single slide exceeds
/// `max_components_per_chunk` and the config uses
/// [`OversizePolicy::Reject`]. Under the default policy the slide is placed
/// alone and a [`Warning::OversizedSlide`] is reported instead.
///
/// # Example
///
/// ```
/// use deckchunk::{PlanConfig, SlideCorpus, SlideRecord, plan_chunks};
///
/// let slides = (1..=20)
///     .map(|n| SlideRecord::new(n, "Login").with_components(vec![serde_json::json!({}); 5]))
///     .collect();
/// let plan = plan_chunks(&SlideCorpus::new(slides), &PlanConfig::new(8, 100))
///     .unwrap()
///     .into_output();
///
/// let pages: Vec<_> = plan.chunks.iter().map(|c| c.page_count).collect();
/// assert_eq!(pages, [8, 8, 4]);
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(slides = corpus.slides.len())))]
pub fn plan_chunks(corpus: &SlideCorpus, config: &PlanConfig) -> Result<Report<ChunkPlan>> {
    let mut warnings = Warnings::default();

    let sections = group_sections(&corpus.slides);
    let mut candidates = Vec::with_capacity(sections.len());
    for section in &sections {
        candidates.extend(split_section(section, config, &mut warnings)?);
    }
    #[cfg(feature = "tracing")]
    let candidate_count = candidates.len();
    let merged = coalesce(candidates, config);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        sections = sections.len(),
        candidates = candidate_count,
        chunks = merged.len(),
        "planned chunks"
    );

    let chunks: Vec<Chunk> = merged
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| into_chunk(idx + 1, candidate))
        .collect();

    let plan = ChunkPlan {
        source_file: corpus.file_path.clone(),
        total_slides: corpus.slide_total(),
        total_chunks: chunks.len(),
        max_pages_per_chunk: config.max_pages_per_chunk,
        max_components_per_chunk: config.max_components_per_chunk,
        max_parallel_workers: config.max_parallel_workers,
        project_info: corpus.project_info.clone(),
        chunks,
    };

    Ok(warnings.finish(plan))
}

/// Keeps a section whole when it fits, otherwise walks its slides and closes
/// a part whenever the next slide would break either bound.
fn split_section<'a>(
    section: &Section<'a>,
    config: &PlanConfig,
    warnings: &mut Warnings,
) -> Result<Vec<Candidate<'a>>> {
    if config.fits(section.page_count(), section.component_count()) {
        return Ok(vec![Candidate::whole(section)]);
    }

    let mut parts = Vec::new();
    let mut current = Candidate::new(section.label.clone());

    for slide in section.slides {
        let components = slide.component_count();
        if components > config.max_components_per_chunk {
            match config.oversize_policy {
                OversizePolicy::Reject => {
                    return Err(Error::CapacityViolation {
                        slide_number: slide.slide_number,
                        component_count: components,
                        max_components: config.max_components_per_chunk,
                    });
                }
                OversizePolicy::Tolerate => warnings.push(Warning::OversizedSlide {
                    slide_number: slide.slide_number,
                    component_count: components,
                    max_components: config.max_components_per_chunk,
                }),
            }
        }

        let would_overflow = current.pages() >= config.max_pages_per_chunk
            || current.components + components > config.max_components_per_chunk;
        if !current.slides.is_empty() && would_overflow {
            let full = core::mem::replace(&mut current, Candidate::new(section.label.clone()));
            parts.push(full);
        }
        current.push(slide);
    }

    if !current.slides.is_empty() {
        parts.push(current);
    }

    if parts.len() > 1 {
        for (k, part) in parts.iter_mut().enumerate() {
            part.label = format!("{} (Part {})", section.label, k + 1);
        }
    }

    Ok(parts)
}

/// Greedily merges each candidate into the open accumulator while the
/// combined page and component counts stay within bounds.
fn coalesce<'a>(candidates: Vec<Candidate<'a>>, config: &PlanConfig) -> Vec<Candidate<'a>> {
    let mut merged = Vec::with_capacity(candidates.len());
    let mut open: Option<Candidate<'a>> = None;

    for candidate in candidates {
        open = Some(match open.take() {
            Some(mut acc)
                if config.fits(
                    acc.pages() + candidate.pages(),
                    acc.components + candidate.components,
                ) =>
            {
                acc.absorb(candidate);
                acc
            }
            Some(acc) => {
                merged.push(acc);
                candidate
            }
            None => candidate,
        });
    }

    merged.extend(open);
    merged
}

fn into_chunk(id: usize, candidate: Candidate<'_>) -> Chunk {
    let slide_numbers: Vec<u32> = candidate.slides.iter().map(|s| s.slide_number).collect();
    let slide_range = match (slide_numbers.iter().min(), slide_numbers.iter().max()) {
        (Some(&lo), Some(&hi)) => [lo, hi],
        _ => [0, 0],
    };

    Chunk {
        id,
        section: candidate.label,
        page_count: slide_numbers.len(),
        component_count: candidate.components,
        slide_numbers,
        slide_range,
    }
}
