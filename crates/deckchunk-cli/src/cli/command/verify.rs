use crate::cli::config::VerifySettings;
use anyhow::Context;
use deckchunk::{MergedDocument, audit, sequence_prefix};
use std::process::ExitCode;

pub fn run(settings: &VerifySettings) -> anyhow::Result<ExitCode> {
    let doc = MergedDocument::from_path(&settings.input)
        .with_context(|| format!("failed to load {}", settings.input.display()))?;

    let prefix = resolve_prefix(&doc, settings);
    let findings = audit(&doc, &prefix);

    if findings.is_empty() {
        tracing::info!(
            input = %settings.input.display(),
            prefix = %prefix,
            testcases = doc.testcases.len(),
            "Merged document is consistent"
        );
        match doc.testcases.last() {
            Some(last) => println!(
                "OK: {} test cases, {prefix}_001 ~ {}",
                doc.testcases.len(),
                last.id
            ),
            None => println!("OK: no test cases"),
        }
        return Ok(ExitCode::SUCCESS);
    }

    for finding in &findings {
        tracing::error!("{finding}");
        println!("FAIL: {finding}");
    }
    println!("{} problem(s) in {}", findings.len(), settings.input.display());
    Ok(ExitCode::FAILURE)
}

fn resolve_prefix(doc: &MergedDocument, settings: &VerifySettings) -> String {
    if let Some(prefix) = &settings.prefix {
        return prefix.clone();
    }

    doc.testcases
        .first()
        .and_then(|tc| sequence_prefix(&tc.id))
        .unwrap_or(settings.default_prefix.as_str())
        .to_owned()
}
