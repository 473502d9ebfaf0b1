//! Partition an extracted slide deck into bounded work chunks and merge the
//! independently produced per-chunk test case results back into a single,
//! page-ordered document with globally unique identifiers.
//!
//! The crate has two halves:
//!
//! - [`plan_chunks`] groups a [`SlideCorpus`] into a [`ChunkPlan`] whose chunks
//!   respect a page bound and a component bound.
//! - [`merge_results`] (or [`merge_directory`]) reduces any number of
//!   [`ChunkResult`]s, in any arrival order, into one [`MergedDocument`].
//!
//! Both are pure, synchronous transformations. Conditions that should be
//! surfaced but do not abort the run are returned as [`Warning`]s inside a
//! [`Report`].

mod artifact;
mod corpus;
mod diagnostics;
mod error;
mod merge;
mod plan;

pub use crate::corpus::*;
pub use crate::diagnostics::*;
pub use crate::error::*;
pub use crate::merge::*;
pub use crate::plan::*;
