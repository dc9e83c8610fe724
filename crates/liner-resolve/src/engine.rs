//! The credit resolution engine.
//!
//! `CreditEngine` wires the pipeline together: segmentation, classification
//! and name extraction per record, collaboration analysis, deduplication
//! per source, then cross-source merging. It holds no per-request state and
//! can be shared between threads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use liner_core::model::{CanonicalCredit, ParsedCredit, RawCreditBlob, Resolution, SourceRecord};
use liner_core::provenance::SourceId;
use liner_core::taxonomy::RoleTaxonomy;

use crate::adapter::CreditSource;
use crate::assemble::CreditAssembler;
use crate::cache::ResolutionCache;
use crate::classify::{MemoizedClassifier, RoleClassifier};
use crate::collaboration::CollaborationReport;
use crate::config::Config;
use crate::cross_source::{CrossSourceResolver, ResolutionSummary};
use crate::dedup::IntraSourceDeduplicator;
use crate::error::ResolveResult;
use crate::similarity::Equivalence;

/// Parse diagnostics for a batch of records from one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    pub credits: Vec<ParsedCredit>,
    pub collaboration: CollaborationReport,
    /// Role fragments examined.
    pub fragments: usize,
    /// Candidates dropped for scoring below the confidence threshold.
    pub dropped: usize,
}

#[derive(Debug)]
pub struct CreditEngine {
    taxonomy: Arc<RoleTaxonomy>,
    assembler: CreditAssembler,
    deduplicator: IntraSourceDeduplicator,
    resolver: CrossSourceResolver,
}

impl CreditEngine {
    /// Build an engine from validated configuration and a taxonomy.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is out of range, the taxonomy is empty,
    /// or a pattern does not compile.
    pub fn new(config: &Config, taxonomy: RoleTaxonomy) -> ResolveResult<Self> {
        config.validate()?;
        if taxonomy.is_empty() {
            return Err(liner_core::Error::EmptyTaxonomy.into());
        }

        let report = taxonomy.report();
        log::debug!(
            "Initialising credit engine: {} roles, {} aliases, threshold {:.2}",
            report.entries,
            report.aliases,
            config.confidence_threshold
        );

        let taxonomy = Arc::new(taxonomy);
        let classifier = MemoizedClassifier::new(RoleClassifier::new(Arc::clone(&taxonomy)));

        Ok(Self {
            assembler: CreditAssembler::new(classifier, config.confidence_threshold)?,
            deduplicator: IntraSourceDeduplicator::new(Equivalence::from_config(config)),
            resolver: CrossSourceResolver::from_config(config),
            taxonomy,
        })
    }

    /// Build an engine with the taxonomy named by the configuration.
    pub fn from_config(config: &Config) -> ResolveResult<Self> {
        Self::new(config, config.load_taxonomy()?)
    }

    pub fn taxonomy(&self) -> &RoleTaxonomy {
        &self.taxonomy
    }

    /// Parse one blob into credits, without deduplication or merging.
    ///
    /// Blank or unusable text yields an empty list.
    pub fn parse_credit_blob(&self, blob: &RawCreditBlob) -> Vec<ParsedCredit> {
        self.assembler.assemble_blob(blob, 0).credits
    }

    pub fn parse_record(&self, record: &SourceRecord) -> Vec<ParsedCredit> {
        self.assembler.assemble_record(record, 0).credits
    }

    /// Parse a batch of records and report on it.
    pub fn parse_report(&self, records: &[SourceRecord]) -> ParseReport {
        let assembly = self.assembler.assemble_records(records);
        let collaboration = CollaborationReport::analyze(&assembly.credits);
        ParseReport {
            credits: assembly.credits,
            collaboration,
            fragments: assembly.fragments,
            dropped: assembly.dropped,
        }
    }

    /// Resolve raw blobs from several sources into canonical credits.
    pub fn resolve_credits(
        &self,
        per_source: &BTreeMap<SourceId, Vec<RawCreditBlob>>,
    ) -> Vec<CanonicalCredit> {
        let records: BTreeMap<SourceId, Vec<SourceRecord>> = per_source
            .iter()
            .map(|(source, blobs)| {
                (*source, blobs.iter().cloned().map(SourceRecord::from).collect())
            })
            .collect();
        self.resolve_records(&records).0
    }

    /// Resolve records of any shape from several sources.
    ///
    /// Records are grouped by the source they carry, which normally equals
    /// their map key.
    pub fn resolve_records(
        &self,
        per_source: &BTreeMap<SourceId, Vec<SourceRecord>>,
    ) -> (Vec<CanonicalCredit>, ResolutionSummary) {
        let mut grouped: BTreeMap<SourceId, Vec<&SourceRecord>> = BTreeMap::new();
        for (key, records) in per_source {
            for record in records {
                if record.source() != *key {
                    log::debug!(
                        "Record from {} filed under {}; grouping by record source",
                        record.source(),
                        key
                    );
                }
                grouped.entry(record.source()).or_default().push(record);
            }
        }

        let mut deduped = BTreeMap::new();
        let mut collaboration = BTreeMap::new();
        for (source, records) in grouped {
            let assembly = self.assembler.assemble_records(records);
            let report = CollaborationReport::analyze(&assembly.credits);
            log::debug!(
                "{}: {} collaborative credits of {}, featuring [{}]{}",
                source,
                report.collaborative_credits,
                report.total_credits,
                report.featured_artists.join(", "),
                if report.multiple_producers { ", multiple producers" } else { "" }
            );

            let before = assembly.credits.len();
            let credits = self.deduplicator.dedup(assembly.credits);
            log::debug!(
                "{}: {} fragments, {} credits ({} below threshold, {} after dedup)",
                source,
                assembly.fragments,
                before,
                assembly.dropped,
                credits.len()
            );
            deduped.insert(source, credits);
            collaboration.insert(source, report);
        }

        let (canonical, mut summary) = self.resolver.resolve(deduped);
        summary.collaboration = collaboration;
        log::info!(
            "Resolved {} canonical credits from {} sources (reference: {}, corroborated: {})",
            summary.canonical_count,
            summary.source_counts.len(),
            summary.reference_source.map_or("none", SourceId::name),
            summary.corroborated
        );
        (canonical, summary)
    }

    /// Resolve one track end to end: consult the cache, fetch from every
    /// source on a miss, resolve and store.
    ///
    /// A source that fails to fetch is logged and skipped.
    pub fn resolve_track(
        &self,
        track_ref: &str,
        sources: &[&dyn CreditSource],
        cache: Option<&dyn ResolutionCache>,
    ) -> Resolution {
        if let Some(credits) = cache.and_then(|c| c.get(track_ref)) {
            log::debug!("Cache hit for {}", track_ref);
            return Resolution::new(track_ref, credits);
        }

        let mut per_source: BTreeMap<SourceId, Vec<SourceRecord>> = BTreeMap::new();
        for source in sources {
            match source.fetch(track_ref) {
                Ok(records) => {
                    log::debug!(
                        "{} returned {} records for {}",
                        source.id(),
                        records.len(),
                        track_ref
                    );
                    per_source.entry(source.id()).or_default().extend(records);
                }
                Err(e) => log::warn!("Skipping {} for {}: {}", source.id(), track_ref, e),
            }
        }

        let (credits, _) = self.resolve_records(&per_source);
        if let Some(cache) = cache {
            cache.put(track_ref, &credits);
        }
        Resolution::new(track_ref, credits)
    }
}
