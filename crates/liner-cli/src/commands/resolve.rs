use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use liner_core::model::{RawCreditBlob, Resolution, SourceRecord, StructuredCredit};
use liner_core::provenance::SourceId;
use liner_resolve::{Config, CreditEngine, ResolutionSummary};

/// One record in the resolve input, before its source is known.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputRecord {
    Plain(String),
    Text {
        text: String,
        #[serde(default)]
        source: Option<SourceId>,
        #[serde(default)]
        track_scope_hint: Option<String>,
    },
    Structured {
        entries: Vec<StructuredCredit>,
        #[serde(default)]
        source: Option<SourceId>,
        #[serde(default)]
        track_scope_hint: Option<String>,
    },
}

impl InputRecord {
    /// Attach the source named by the enclosing key, unless the record
    /// names its own.
    fn into_record(self, key: SourceId) -> SourceRecord {
        match self {
            Self::Plain(text) => RawCreditBlob::new(text, key).into(),
            Self::Text {
                text,
                source,
                track_scope_hint,
            } => SourceRecord::Text(RawCreditBlob {
                text,
                source: source.unwrap_or(key),
                track_scope_hint,
            }),
            Self::Structured {
                entries,
                source,
                track_scope_hint,
            } => SourceRecord::Structured {
                source: source.unwrap_or(key),
                entries,
                track_scope_hint,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    #[serde(flatten)]
    resolution: Resolution,
    summary: ResolutionSummary,
}

/// Parse resolve input: a JSON object keyed by source name.
fn parse_input(content: &str) -> Result<BTreeMap<SourceId, Vec<SourceRecord>>> {
    let raw: BTreeMap<String, Vec<InputRecord>> =
        serde_json::from_str(content).context("Input is not a JSON object of source lists")?;

    let mut per_source: BTreeMap<SourceId, Vec<SourceRecord>> = BTreeMap::new();
    for (key, records) in raw {
        let source = SourceId::parse(&key).ok_or_else(|| {
            let known: Vec<&str> = SourceId::all().map(SourceId::name).collect();
            anyhow::anyhow!("Unknown source: {}\n\nKnown sources: {}", key, known.join(", "))
        })?;
        per_source
            .entry(source)
            .or_default()
            .extend(records.into_iter().map(|r| r.into_record(source)));
    }
    Ok(per_source)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        Ok(content)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Resolve every source in the input file and print the canonical credits.
pub fn run_resolve(config: &Config, file: &Path, track: &str, json: bool) -> Result<()> {
    let per_source = parse_input(&read_input(file)?)?;
    let engine = CreditEngine::from_config(config).context("Failed to build credit engine")?;

    let (credits, summary) = engine.resolve_records(&per_source);
    let resolution = Resolution::new(track, credits);

    if json {
        let output = ResolveOutput {
            resolution,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Credits for {}", resolution.track_ref);
    println!("============{}\n", "=".repeat(resolution.track_ref.chars().count()));

    if resolution.credits.is_empty() {
        println!("No credits resolved.");
        return Ok(());
    }

    for credit in &resolution.credits {
        let sources: Vec<&str> = credit.supporting_sources.iter().map(|s| s.name()).collect();
        println!(
            "  {:<24} {:<20} {:.2}  ({})",
            credit.person_name,
            credit.normalized_role,
            credit.confidence,
            sources.join(", ")
        );
    }

    println!(
        "\n{} canonical credit(s), {} corroborated",
        summary.canonical_count, summary.corroborated
    );
    if let Some(reference) = summary.reference_source {
        println!("Reference source: {}", reference);
    }

    Ok(())
}
