use crate::{Error, Result, artifact::read_json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Free-form project metadata echoed through every artifact.
pub type ProjectInfo = Map<String, Value>;

/// One UI component extracted from a slide.
///
/// Opaque to planning and merging beyond being counted.
pub type ComponentRecord = Value;

/// Header block of a slide, used as a section fallback when the slide has no
/// section title of its own.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideHeader {
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of the source deck. Immutable once extracted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlideRecord {
    pub slide_number: u32,
    #[serde(default)]
    pub section_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<SlideHeader>,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    /// Any other extracted keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SlideRecord {
    pub fn new(slide_number: u32, section_title: impl Into<String>) -> Self {
        Self {
            slide_number,
            section_title: section_title.into(),
            header: None,
            components: Vec::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_components(mut self, components: Vec<ComponentRecord>) -> Self {
        self.components = components;
        self
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

/// The ordered slide records of one extracted deck.
///
/// The order of `slides` is the document's canonical order; nothing
/// downstream reorders it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideCorpus {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub total_slides: usize,
    #[serde(default)]
    pub project_info: ProjectInfo,
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
}

impl SlideCorpus {
    pub fn new(slides: Vec<SlideRecord>) -> Self {
        Self {
            total_slides: slides.len(),
            slides,
            ..Self::default()
        }
    }

    /// Reads a corpus from the extraction collaborator's JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Json`]
    /// if it is not a corpus document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Parses a corpus from an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if `json` is not a corpus document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::json("<memory>", e))
    }

    /// Declared slide total, or the number of slide records when the
    /// extractor did not declare one.
    pub fn slide_total(&self) -> usize {
        if self.total_slides == 0 {
            self.slides.len()
        } else {
            self.total_slides
        }
    }

    pub fn component_total(&self) -> usize {
        self.slides.iter().map(SlideRecord::component_count).sum()
    }
}
