use crate::{Error, OversizePolicy, PlanConfig, SlideCorpus, SlideRecord, Warning, plan_chunks};
use serde_json::json;

fn slide(n: u32, section: &str, components: usize) -> SlideRecord {
    SlideRecord::new(n, section).with_components(vec![json!({ "component": "button" }); components])
}

fn corpus(layout: &[(&str, usize, usize)]) -> SlideCorpus {
    let mut slides = Vec::new();
    let mut n = 1;
    for &(section, pages, components) in layout {
        for _ in 0..pages {
            slides.push(slide(n, section, components));
            n += 1;
        }
    }
    SlideCorpus::new(slides)
}

fn labels(plan: &crate::ChunkPlan) -> Vec<&str> {
    plan.chunks.iter().map(|c| c.section.as_str()).collect()
}

#[test]
fn empty_corpus_yields_empty_plan() {
    let report = plan_chunks(&SlideCorpus::default(), &PlanConfig::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.output.total_chunks, 0);
    assert!(report.output.chunks.is_empty());
    assert_eq!(report.output.waves(), 0);
}

#[test]
fn single_section_splits_by_pages_and_does_not_recoalesce() {
    let plan = plan_chunks(&corpus(&[("Login", 20, 5)]), &PlanConfig::new(8, 100))
        .unwrap()
        .into_output();

    let pages: Vec<_> = plan.chunks.iter().map(|c| c.page_count).collect();
    assert_eq!(pages, vec![8, 8, 4]);
    assert_eq!(
        labels(&plan),
        vec!["Login (Part 1)", "Login (Part 2)", "Login (Part 3)"]
    );
    assert_eq!(plan.chunks[1].slide_numbers, (9..=16).collect::<Vec<_>>());
    assert_eq!(plan.chunks[1].slide_range, [9, 16]);
    assert_eq!(plan.chunks[2].component_count, 20);
    let ids: Vec<_> = plan.chunks.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn section_splits_on_component_bound() {
    // 6 slides of 30 components, limit 80: two slides per part.
    let plan = plan_chunks(&corpus(&[("Home", 6, 30)]), &PlanConfig::new(15, 80))
        .unwrap()
        .into_output();

    let comps: Vec<_> = plan.chunks.iter().map(|c| c.component_count).collect();
    assert_eq!(comps, vec![60, 60, 60]);
    assert_eq!(plan.chunks[0].section, "Home (Part 1)");
}

#[test]
fn small_sections_coalesce_with_joined_labels() {
    let plan = plan_chunks(
        &corpus(&[("Login", 3, 5), ("Home", 4, 5), ("Search", 2, 5)]),
        &PlanConfig::new(8, 80),
    )
    .unwrap()
    .into_output();

    assert_eq!(labels(&plan), vec!["Login + Home", "Search"]);
    assert_eq!(plan.chunks[0].page_count, 7);
    assert_eq!(plan.chunks[0].component_count, 35);
    assert_eq!(plan.chunks[1].slide_numbers, vec![8, 9]);
}

#[test]
fn trailing_part_coalesces_into_next_section() {
    // Settings: 10 pages -> parts of 8 and 2; the 2-page tail joins About.
    let plan = plan_chunks(
        &corpus(&[("Settings", 10, 1), ("About", 3, 1)]),
        &PlanConfig::new(8, 80),
    )
    .unwrap()
    .into_output();

    assert_eq!(
        labels(&plan),
        vec!["Settings (Part 1)", "Settings (Part 2) + About"]
    );
    assert_eq!(plan.chunks[1].slide_range, [9, 13]);
}

#[test]
fn oversized_slide_is_placed_alone_and_reported() {
    let slides = vec![
        slide(1, "Dashboard", 10),
        slide(2, "Dashboard", 120),
        slide(3, "Dashboard", 10),
    ];
    let report = plan_chunks(&SlideCorpus::new(slides), &PlanConfig::new(15, 80)).unwrap();

    let shape: Vec<_> = report
        .output
        .chunks
        .iter()
        .map(|c| c.slide_numbers.clone())
        .collect();
    assert_eq!(shape, vec![vec![1], vec![2], vec![3]]);
    assert_eq!(
        report.warnings,
        vec![Warning::OversizedSlide {
            slide_number: 2,
            component_count: 120,
            max_components: 80,
        }]
    );
}

#[test]
fn oversized_single_slide_section_keeps_plain_label() {
    let slides = vec![slide(1, "Intro", 1), slide(2, "Matrix", 90)];
    let report = plan_chunks(&SlideCorpus::new(slides), &PlanConfig::new(15, 80)).unwrap();

    assert_eq!(labels(&report.output), vec!["Intro", "Matrix"]);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn reject_policy_fails_on_oversized_slide() {
    let slides = vec![slide(1, "Matrix", 81)];
    let config = PlanConfig::new(15, 80).with_oversize_policy(OversizePolicy::Reject);

    match plan_chunks(&SlideCorpus::new(slides), &config) {
        Err(Error::CapacityViolation {
            slide_number,
            component_count,
            max_components,
        }) => {
            assert_eq!(slide_number, 1);
            assert_eq!(component_count, 81);
            assert_eq!(max_components, 80);
        }
        other => panic!("expected capacity violation, got {other:?}"),
    }
}

#[test]
fn plan_echoes_parameters_and_metadata() {
    let mut input = corpus(&[("Login", 2, 1)]);
    input.file_path = "deck.pptx".into();
    input.total_slides = 0;
    input
        .project_info
        .insert("project_name".into(), json!("Shop"));
    let config = PlanConfig::new(10, 50).with_max_parallel_workers(4);

    let plan = plan_chunks(&input, &config).unwrap().into_output();
    assert_eq!(plan.source_file, "deck.pptx");
    assert_eq!(plan.total_slides, 2);
    assert_eq!(plan.max_pages_per_chunk, 10);
    assert_eq!(plan.max_components_per_chunk, 50);
    assert_eq!(plan.max_parallel_workers, Some(4));
    assert_eq!(plan.project_info["project_name"], "Shop");
}

#[test]
fn waves_follow_worker_cap() {
    let input = corpus(&[("A", 5, 1), ("B", 5, 1), ("C", 5, 1)]);
    let plan = plan_chunks(&input, &PlanConfig::new(5, 80).with_max_parallel_workers(2))
        .unwrap()
        .into_output();
    assert_eq!(plan.total_chunks, 3);
    assert_eq!(plan.waves(), 2);
}

#[test]
fn work_unit_carries_only_owned_slides() {
    let mut input = corpus(&[("A", 3, 2), ("B", 3, 2)]);
    input.project_info.insert("version".into(), json!("v1"));
    input.slides[4]
        .extra
        .insert("notes".into(), json!("keep me"));
    let plan = plan_chunks(&input, &PlanConfig::new(3, 80))
        .unwrap()
        .into_output();

    let unit = plan.work_unit(&input, 2).unwrap();
    assert_eq!(unit.chunk_id, 2);
    assert_eq!(unit.section, "B");
    assert_eq!(unit.slide_range, [4, 6]);
    assert_eq!(unit.file_name(), "chunk_2_input.json");
    assert_eq!(unit.project_info["version"], "v1");
    let numbers: Vec<_> = unit.slides.iter().map(|s| s.slide_number).collect();
    assert_eq!(numbers, vec![4, 5, 6]);
    assert_eq!(unit.slides[1].extra["notes"], "keep me");
    assert!(plan.work_unit(&input, 3).is_none());
}

#[test]
fn plan_serializes_with_artifact_field_names() {
    let plan = plan_chunks(&corpus(&[("Login", 2, 1)]), &PlanConfig::default())
        .unwrap()
        .into_output();
    let value = serde_json::to_value(&plan).unwrap();

    assert_eq!(value["total_chunks"], 1);
    assert_eq!(value["chunks"][0]["slides"], json!([1, 2]));
    assert_eq!(value["chunks"][0]["slide_range"], json!([1, 2]));
    assert!(value.get("max_parallel_workers").is_none());
}
