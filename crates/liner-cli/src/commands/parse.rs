use anyhow::{Context, Result};
use std::str::FromStr;

use liner_core::model::{ParsedCredit, RawCreditBlob, SourceRecord};
use liner_core::provenance::SourceId;
use liner_resolve::{Config, CreditEngine, ParseReport};

/// Parse a single credit string and print what was found.
pub fn run_parse(
    config: &Config,
    text: &str,
    source: &str,
    scope: Option<String>,
    json: bool,
) -> Result<()> {
    let source = SourceId::from_str(source)
        .with_context(|| format!("Invalid --source value: {}", source))?;
    let engine = CreditEngine::from_config(config).context("Failed to build credit engine")?;

    let mut blob = RawCreditBlob::new(text, source);
    if let Some(scope) = scope {
        blob = blob.with_track_scope(scope);
    }
    let report = engine.parse_report(&[SourceRecord::from(blob)]);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &ParseReport) {
    if report.credits.is_empty() {
        println!("No credits found.");
        if report.dropped > 0 {
            println!(
                "({} candidate(s) scored below the confidence threshold)",
                report.dropped
            );
        }
        return;
    }

    println!("Credits");
    println!("=======\n");
    for credit in &report.credits {
        println!("  {}", credit_line(credit));
    }

    println!(
        "\n{} credit(s) from {} fragment(s), {} dropped",
        report.credits.len(),
        report.fragments,
        report.dropped
    );

    let collaboration = &report.collaboration;
    if !collaboration.featured_artists.is_empty() {
        println!("Featuring: {}", collaboration.featured_artists.join(", "));
    }
    if collaboration.multiple_producers {
        println!("Multiple producers credited");
    }
    if collaboration.collaborative_credits > 0 {
        println!(
            "Collaboration score: {:.2}",
            collaboration.collaboration_score
        );
    }
}

/// One human-readable line per credit.
fn credit_line(credit: &ParsedCredit) -> String {
    let mut line = format!(
        "{:<24} {:<20} [{}] {:.2}",
        credit.person_name, credit.normalized_role, credit.category, credit.confidence
    );
    if credit.is_collaboration {
        line.push_str(" (collab)");
    }
    if let Some(scope) = &credit.track_scope {
        line.push_str(" @ ");
        line.push_str(scope);
    }
    line
}
