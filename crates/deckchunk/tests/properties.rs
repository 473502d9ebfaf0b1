//! Property-based tests for chunk planning and merging.
//!
//! Planning:
//! - Every slide lands in exactly one chunk, in corpus order
//! - Multi-slide chunks respect both capacity bounds
//! - Chunk ids are dense and ranges match their slides
//!
//! Merging:
//! - No test case is lost or duplicated
//! - Output is independent of arrival order
//! - Identifiers are dense and pages never go backwards
//! - Cross-references follow the record they named
//! - Merging a merged document again changes nothing

use deckchunk::{
    ChunkResult, MergeOptions, PlanConfig, SlideCorpus, SlideRecord, TestCaseRecord, audit,
    merge_results, plan_chunks,
};
use proptest::collection::vec as arb_vec;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashMap;

const SECTIONS: [&str; 4] = ["01 Login", "Home", "02 Settings", ""];

// ────────────────────────────────────────────────────────────────────
// Generators
// ────────────────────────────────────────────────────────────────────

fn arb_corpus() -> impl Strategy<Value = SlideCorpus> {
    arb_vec((0..SECTIONS.len(), 0usize..12), 0..60).prop_map(|shapes| {
        let slides = shapes
            .into_iter()
            .enumerate()
            .map(|(idx, (section, components))| {
                SlideRecord::new(idx as u32 + 1, SECTIONS[section])
                    .with_components(vec![json!({"type": "button"}); components])
            })
            .collect();
        SlideCorpus::new(slides)
    })
}

fn arb_config() -> impl Strategy<Value = PlanConfig> {
    (1usize..10, 1usize..40).prop_map(|(pages, components)| PlanConfig::new(pages, components))
}

/// `(page, optional index of an earlier record in the same chunk to cite)`.
type CaseShape = (Option<u32>, Option<usize>);

fn arb_chunk_shapes() -> impl Strategy<Value = Vec<Vec<CaseShape>>> {
    arb_vec(
        arb_vec((proptest::option::of(1u32..30), proptest::option::of(0usize..8)), 0..8),
        1..6,
    )
}

fn build_results(shapes: &[Vec<CaseShape>]) -> Vec<ChunkResult> {
    shapes
        .iter()
        .enumerate()
        .map(|(c, cases)| {
            let chunk_id = c + 1;
            let testcases = cases
                .iter()
                .enumerate()
                .map(|(s, (page, cite))| {
                    let id = format!("CHUNK{chunk_id}_{:03}", s + 1);
                    let mut reference = match page {
                        Some(page) => format!("{page}P"),
                        None => "overview".to_owned(),
                    };
                    if let Some(target) = cite.filter(|&t| t < s) {
                        reference.push_str(&format!(" (see CHUNK{chunk_id}_{:03})", target + 1));
                    }
                    TestCaseRecord::new(id.clone(), reference).with_field("origin", id)
                })
                .collect();
            ChunkResult::new(chunk_id, testcases)
        })
        .collect()
}

fn origin(tc: &TestCaseRecord) -> &str {
    tc.payload["origin"].as_str().unwrap_or_default()
}

// ────────────────────────────────────────────────────────────────────
// Planning
// ────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn plan_is_an_ordered_partition(corpus in arb_corpus(), config in arb_config()) {
        let plan = plan_chunks(&corpus, &config).unwrap().into_output();

        let flattened: Vec<u32> = plan
            .chunks
            .iter()
            .flat_map(|c| c.slide_numbers.iter().copied())
            .collect();
        let expected: Vec<u32> = corpus.slides.iter().map(|s| s.slide_number).collect();
        prop_assert_eq!(flattened, expected);
        prop_assert_eq!(plan.total_chunks, plan.chunks.len());
        prop_assert_eq!(plan.total_slides, corpus.slides.len());
    }

    #[test]
    fn multi_slide_chunks_respect_bounds(corpus in arb_corpus(), config in arb_config()) {
        let plan = plan_chunks(&corpus, &config).unwrap().into_output();

        for chunk in &plan.chunks {
            prop_assert!(chunk.page_count >= 1);
            if chunk.page_count > 1 {
                prop_assert!(chunk.page_count <= config.max_pages_per_chunk);
                prop_assert!(chunk.component_count <= config.max_components_per_chunk);
            }
        }
    }

    #[test]
    fn chunk_metadata_matches_slides(corpus in arb_corpus(), config in arb_config()) {
        let plan = plan_chunks(&corpus, &config).unwrap().into_output();
        let components: HashMap<u32, usize> = corpus
            .slides
            .iter()
            .map(|s| (s.slide_number, s.component_count()))
            .collect();

        for (idx, chunk) in plan.chunks.iter().enumerate() {
            prop_assert_eq!(chunk.id, idx + 1);
            prop_assert_eq!(chunk.page_count, chunk.slide_numbers.len());
            let lo = *chunk.slide_numbers.iter().min().unwrap();
            let hi = *chunk.slide_numbers.iter().max().unwrap();
            prop_assert_eq!(chunk.slide_range, [lo, hi]);
            let sum: usize = chunk.slide_numbers.iter().map(|n| components[n]).sum();
            prop_assert_eq!(chunk.component_count, sum);
        }
    }

    #[test]
    fn planning_is_deterministic(corpus in arb_corpus(), config in arb_config()) {
        let first = plan_chunks(&corpus, &config).unwrap();
        let second = plan_chunks(&corpus, &config).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ────────────────────────────────────────────────────────────────────
// Merging
// ────────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn merge_keeps_every_record_once(shapes in arb_chunk_shapes()) {
        let results = build_results(&shapes);
        let expected: usize = shapes.iter().map(Vec::len).sum();
        let doc = merge_results(results, &MergeOptions::default()).unwrap().into_output();

        prop_assert_eq!(doc.total_testcases, expected);
        prop_assert_eq!(doc.merged_from_chunks, shapes.len());
        let mut origins: Vec<&str> = doc.testcases.iter().map(origin).collect();
        origins.sort_unstable();
        origins.dedup();
        prop_assert_eq!(origins.len(), expected);
    }

    #[test]
    fn merge_ignores_arrival_order(
        (shapes, shuffled) in arb_chunk_shapes().prop_flat_map(|shapes| {
            let order: Vec<usize> = (0..shapes.len()).collect();
            (Just(shapes), Just(order).prop_shuffle())
        })
    ) {
        let results = build_results(&shapes);
        let reordered: Vec<ChunkResult> = shuffled.iter().map(|&i| results[i].clone()).collect();
        let options = MergeOptions::with_prefix("IT_OP");

        let a = merge_results(results, &options).unwrap();
        let b = merge_results(reordered, &options).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn merged_document_is_dense_and_page_ordered(shapes in arb_chunk_shapes()) {
        let doc = merge_results(build_results(&shapes), &MergeOptions::with_prefix("IT_OP"))
            .unwrap()
            .into_output();
        prop_assert!(audit(&doc, "IT_OP").is_empty());
    }

    #[test]
    fn references_follow_their_target(shapes in arb_chunk_shapes()) {
        let doc = merge_results(build_results(&shapes), &MergeOptions::with_prefix("IT_OP"))
            .unwrap()
            .into_output();
        let new_ids: HashMap<&str, &str> = doc
            .testcases
            .iter()
            .map(|tc| (origin(tc), tc.id.as_str()))
            .collect();

        for (c, cases) in shapes.iter().enumerate() {
            for (s, (_, cite)) in cases.iter().enumerate() {
                let Some(target) = cite.filter(|&t| t < s) else { continue };
                let citing = format!("CHUNK{}_{:03}", c + 1, s + 1);
                let cited = format!("CHUNK{}_{:03}", c + 1, target + 1);
                let record = doc.testcases.iter().find(|tc| origin(tc) == citing).unwrap();
                let expected = format!("(see {})", new_ids[cited.as_str()]);
                prop_assert!(
                    record.reference.ends_with(&expected),
                    "{} does not end with {}",
                    record.reference,
                    expected
                );
            }
        }
    }

    #[test]
    fn merging_twice_is_a_fixed_point(shapes in arb_chunk_shapes()) {
        let options = MergeOptions::with_prefix("IT_OP");
        let once = merge_results(build_results(&shapes), &options).unwrap().into_output();
        let again = ChunkResult::new(1, once.testcases.clone())
            .with_project_info(once.project_info.clone());
        let twice = merge_results(vec![again], &options).unwrap().into_output();

        prop_assert_eq!(&once.testcases, &twice.testcases);
    }
}
