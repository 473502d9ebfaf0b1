use super::RULE;
use crate::cli::config::MergeSettings;
use deckchunk::{MergedDocument, merge_directory};
use std::process::ExitCode;

pub fn run(settings: &MergeSettings) -> anyhow::Result<ExitCode> {
    // EmptyInput propagates as an error so the exit code is non-zero.
    let report = merge_directory(&settings.output_dir, &settings.options)?;
    let warnings = report.warnings.len();
    let doc = report.into_output();

    doc.write_to(&settings.output)?;
    tracing::info!(
        output = %settings.output.display(),
        chunks = doc.merged_from_chunks,
        testcases = doc.total_testcases,
        warnings,
        "Wrote merged document"
    );

    print_summary(&doc, settings, warnings);
    Ok(ExitCode::SUCCESS)
}

fn print_summary(doc: &MergedDocument, settings: &MergeSettings, warnings: usize) {
    println!("{RULE}");
    println!("  Merge result");
    println!("{RULE}");
    println!("Merged chunks: {}", doc.merged_from_chunks);
    println!("Test cases: {}", doc.total_testcases);
    if let (Some(first), Some(last)) = (doc.testcases.first(), doc.testcases.last()) {
        println!("Identifiers: {} ~ {}", first.id, last.id);
    }
    if warnings > 0 {
        println!("Warnings: {warnings} (see log)");
    }
    println!("Output: {}", settings.output.display());
    println!("{RULE}");
}
