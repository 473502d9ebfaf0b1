use crate::{
    ProjectInfo, Result, SlideCorpus, SlideRecord,
    artifact::{read_json, write_json},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One unit of parallel work: a contiguous run of slides within both
/// capacity bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based, in emission order.
    pub id: usize,
    /// Section label. `"<section> (Part k)"` for a split section and
    /// `"<a> + <b>"` when several candidates were coalesced.
    pub section: String,
    #[serde(rename = "slides")]
    pub slide_numbers: Vec<u32>,
    /// `[min, max]` of `slide_numbers`.
    pub slide_range: [u32; 2],
    pub page_count: usize,
    pub component_count: usize,
}

impl Chunk {
    pub fn contains(&self, slide_number: u32) -> bool {
        self.slide_numbers.contains(&slide_number)
    }
}

/// The ordered chunk partition of a corpus plus the parameters that built it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkPlan {
    #[serde(default)]
    pub source_file: String,
    pub total_slides: usize,
    pub total_chunks: usize,
    pub max_pages_per_chunk: usize,
    pub max_components_per_chunk: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel_workers: Option<usize>,
    #[serde(default)]
    pub project_info: ProjectInfo,
    pub chunks: Vec<Chunk>,
}

impl ChunkPlan {
    pub fn chunk(&self, id: usize) -> Option<&Chunk> {
        self.chunks.iter().find(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of worker rounds needed when at most `max_parallel_workers`
    /// chunks run at once. One round when no cap is set.
    pub fn waves(&self) -> usize {
        match self.max_parallel_workers {
            _ if self.chunks.is_empty() => 0,
            Some(cap) if cap > 0 => self.chunks.len().div_ceil(cap),
            _ => 1,
        }
    }

    /// Slices the corpus down to the slides owned by chunk `id`.
    ///
    /// Returns `None` if the plan has no such chunk.
    pub fn work_unit(&self, corpus: &SlideCorpus, id: usize) -> Option<WorkUnit> {
        let chunk = self.chunk(id)?;
        let slides = corpus
            .slides
            .iter()
            .filter(|s| chunk.contains(s.slide_number))
            .cloned()
            .collect();

        Some(WorkUnit {
            chunk_id: chunk.id,
            section: chunk.section.clone(),
            slide_range: chunk.slide_range,
            project_info: self.project_info.clone(),
            slides,
        })
    }

    /// Reads a plan artifact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) or [`Error::Json`](crate::Error::Json).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Writes the plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}

/// The input handed to one generation worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkUnit {
    pub chunk_id: usize,
    pub section: String,
    pub slide_range: [u32; 2],
    pub project_info: ProjectInfo,
    pub slides: Vec<SlideRecord>,
}

impl WorkUnit {
    /// Conventional file name for this unit, `chunk_<id>_input.json`.
    pub fn file_name(&self) -> String {
        format!("chunk_{}_input.json", self.chunk_id)
    }

    /// Writes the unit as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be written.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}
