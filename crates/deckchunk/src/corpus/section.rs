use crate::SlideRecord;
use regex::Regex;
use std::sync::LazyLock;

// "01 Login", "2. Settings", "3) Search"
static ORDINAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}[.)]?\s+").expect("static ordinal pattern"));

/// A maximal run of consecutive slides sharing one section label.
#[derive(Clone, Debug, PartialEq)]
pub struct Section<'a> {
    pub label: String,
    pub slides: &'a [SlideRecord],
}

impl Section<'_> {
    pub fn page_count(&self) -> usize {
        self.slides.len()
    }

    pub fn component_count(&self) -> usize {
        self.slides.iter().map(SlideRecord::component_count).sum()
    }
}

/// Removes a leading ordinal such as `"01 "` from a section title.
///
/// A title that is nothing but an ordinal is returned unchanged.
pub fn strip_ordinal_prefix(title: &str) -> &str {
    match ORDINAL_PREFIX.find(title) {
        Some(m) if m.end() < title.len() => &title[m.end()..],
        _ => title,
    }
}

/// Resolves the normalized section label of a slide.
///
/// Falls back to the header title, then to `"Page <n>"`, when the slide has
/// no section title.
pub fn section_label(slide: &SlideRecord) -> String {
    let title = slide.section_title.trim();
    if !title.is_empty() {
        return strip_ordinal_prefix(title).to_owned();
    }

    match slide.header.as_ref().map(|h| h.title.trim()) {
        Some(title) if !title.is_empty() => strip_ordinal_prefix(title).to_owned(),
        _ => format!("Page {}", slide.slide_number),
    }
}

/// Splits `slides` into sections, starting a new one whenever the normalized
/// label changes from the previous slide.
pub fn group_sections(slides: &[SlideRecord]) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut current: Option<String> = None;

    for (idx, slide) in slides.iter().enumerate() {
        let label = section_label(slide);
        match current.take() {
            Some(open) if open == label => current = Some(open),
            Some(open) => {
                sections.push(Section {
                    label: open,
                    slides: &slides[start..idx],
                });
                start = idx;
                current = Some(label);
            }
            None => current = Some(label),
        }
    }

    if let Some(label) = current {
        sections.push(Section {
            label,
            slides: &slides[start..],
        });
    }

    sections
}
