//! Credit assembly: segmenter, classifier and name segmenter combined into
//! scored `ParsedCredit` records.

use liner_core::model::{ParsedCredit, RawCreditBlob, SourceRecord, StructuredCredit};
use liner_core::provenance::SourceId;

use crate::classify::MemoizedClassifier;
use crate::confidence::{name_quality, parse_confidence};
use crate::error::ResolveResult;
use crate::names::{NameCandidate, NameSegmenter};
use crate::segment::RawCreditSegmenter;

/// Output of one assembly pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    pub credits: Vec<ParsedCredit>,
    /// Role fragments examined.
    pub fragments: usize,
    /// Name candidates rejected for scoring below the threshold.
    pub dropped: usize,
}

impl Assembly {
    fn absorb(&mut self, other: Self) {
        self.credits.extend(other.credits);
        self.fragments += other.fragments;
        self.dropped += other.dropped;
    }
}

/// Turns raw and structured records into parsed credits.
#[derive(Debug)]
pub struct CreditAssembler {
    segmenter: RawCreditSegmenter,
    classifier: MemoizedClassifier,
    names: NameSegmenter,
    threshold: f64,
}

impl CreditAssembler {
    /// # Errors
    ///
    /// Returns an error if the segmenter patterns fail to compile.
    pub fn new(classifier: MemoizedClassifier, confidence_threshold: f64) -> ResolveResult<Self> {
        Ok(Self {
            segmenter: RawCreditSegmenter::new()?,
            classifier,
            names: NameSegmenter::new()?,
            threshold: confidence_threshold,
        })
    }

    pub fn classifier(&self) -> &MemoizedClassifier {
        &self.classifier
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Assemble a batch of records. Fragment indices run across the whole
    /// batch, so `(source, fragment_index)` identifies a fragment.
    pub fn assemble_records<'a>(
        &self,
        records: impl IntoIterator<Item = &'a SourceRecord>,
    ) -> Assembly {
        let mut assembly = Assembly::default();
        for record in records {
            let next = self.assemble_record(record, assembly.fragments);
            assembly.absorb(next);
        }
        assembly
    }

    pub fn assemble_record(&self, record: &SourceRecord, first_fragment: usize) -> Assembly {
        match record {
            SourceRecord::Text(blob) => self.assemble_blob(blob, first_fragment),
            SourceRecord::Structured {
                source,
                entries,
                track_scope_hint,
            } => self.assemble_structured(*source, entries, track_scope_hint.as_ref(), first_fragment),
        }
    }

    /// Assemble free text. Blank text yields an empty assembly.
    pub fn assemble_blob(&self, blob: &RawCreditBlob, first_fragment: usize) -> Assembly {
        let mut assembly = Assembly::default();
        if blob.is_blank() {
            return assembly;
        }

        for (offset, fragment) in self.segmenter.segment(&blob.text).into_iter().enumerate() {
            let candidates = self.names.segment(&fragment.names_text);
            self.emit(
                &fragment.role_text,
                candidates,
                blob.source,
                blob.track_scope_hint.as_ref(),
                first_fragment + offset,
                &mut assembly,
            );
            assembly.fragments += 1;
        }

        assembly
    }

    /// Assemble name/role records. Each entry is its own fragment and skips
    /// the segmenter.
    pub fn assemble_structured(
        &self,
        source: SourceId,
        entries: &[StructuredCredit],
        track_scope: Option<&String>,
        first_fragment: usize,
    ) -> Assembly {
        let mut assembly = Assembly::default();
        for (offset, entry) in entries.iter().enumerate() {
            let candidates = self.names.segment(&entry.name);
            self.emit(
                &entry.role,
                candidates,
                source,
                track_scope,
                first_fragment + offset,
                &mut assembly,
            );
            assembly.fragments += 1;
        }
        assembly
    }

    fn emit(
        &self,
        role_text: &str,
        candidates: Vec<NameCandidate>,
        source: SourceId,
        track_scope: Option<&String>,
        fragment_index: usize,
        out: &mut Assembly,
    ) {
        if candidates.is_empty() {
            return;
        }

        let verdict = self.classifier.classify(role_text);
        let is_collaboration = candidates.len() > 1;

        for candidate in candidates {
            let confidence =
                parse_confidence(verdict.confidence, name_quality(candidate.corrected));
            if confidence < self.threshold {
                log::debug!(
                    "Dropping {:?} as {} ({:.2} < {:.2})",
                    candidate.name,
                    verdict.label,
                    confidence,
                    self.threshold
                );
                out.dropped += 1;
                continue;
            }

            match ParsedCredit::new(
                candidate.name,
                role_text.trim(),
                verdict.normalized_role.as_str(),
                verdict.category,
                source,
            ) {
                Ok(credit) => out.credits.push(
                    credit
                        .with_confidence(confidence)
                        .with_collaboration(is_collaboration)
                        .with_track_scope(track_scope.cloned())
                        .with_fragment_index(fragment_index),
                ),
                Err(e) => {
                    log::debug!("Skipping credit: {}", e);
                    out.dropped += 1;
                }
            }
        }
    }
}
