use super::RULE;
use crate::cli::config::PlanSettings;
use anyhow::Context;
use deckchunk::{ChunkPlan, SlideCorpus, plan_chunks};
use std::path::Path;
use std::process::ExitCode;

pub fn run(settings: &PlanSettings) -> anyhow::Result<ExitCode> {
    let corpus = SlideCorpus::from_path(&settings.input)
        .with_context(|| format!("failed to load corpus {}", settings.input.display()))?;
    tracing::info!(
        input = %settings.input.display(),
        slides = corpus.slides.len(),
        components = corpus.component_total(),
        "Loaded slide corpus"
    );

    let report = plan_chunks(&corpus, &settings.config)?;
    let oversized = report.warnings.len();
    let plan = report.into_output();

    plan.write_to(&settings.output)?;
    tracing::info!(
        output = %settings.output.display(),
        chunks = plan.total_chunks,
        waves = plan.waves(),
        oversized,
        "Wrote chunk plan"
    );

    if let Some(dir) = &settings.work_units {
        let written = write_work_units(&plan, &corpus, dir)?;
        tracing::info!(dir = %dir.display(), written, "Wrote work units");
    }

    print_summary(&plan);
    Ok(ExitCode::SUCCESS)
}

fn write_work_units(plan: &ChunkPlan, corpus: &SlideCorpus, dir: &Path) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = 0;
    for chunk in &plan.chunks {
        if let Some(unit) = plan.work_unit(corpus, chunk.id) {
            unit.write_to(dir.join(unit.file_name()))?;
            written += 1;
        }
    }
    Ok(written)
}

fn print_summary(plan: &ChunkPlan) {
    println!("{RULE}");
    println!("  Chunk plan");
    println!("{RULE}");
    println!("Total slides: {}", plan.total_slides);
    println!("Total chunks: {}", plan.total_chunks);
    println!("Max pages per chunk: {}", plan.max_pages_per_chunk);
    println!("Max components per chunk: {}", plan.max_components_per_chunk);
    if let Some(workers) = plan.max_parallel_workers {
        println!("Worker rounds: {} (up to {workers} at once)", plan.waves());
    }
    println!("{}", "-".repeat(RULE.len()));

    for chunk in &plan.chunks {
        let [first, last] = chunk.slide_range;
        println!("Chunk {}:", chunk.id);
        println!("  Section: {}", chunk.section);
        println!("  Slides: {first}P ~ {last}P ({} pages)", chunk.page_count);
        println!("  Components: {}", chunk.component_count);
    }
    println!("{RULE}");
}
