//! Cross-source resolution: merging per-source credit lists for one track
//! into canonical credits.
//!
//! The source with the most credits is the reference. Each reference
//! credit claims at most one equivalent credit from every other source.
//! Whatever is left over is resolved again among the remaining sources, so
//! unmatched credits pass through as singly-sourced canonical credits.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use liner_core::model::CanonicalCredit;
use liner_core::provenance::{SourceId, SourceRanking};

use crate::collaboration::CollaborationReport;
use crate::config::Config;
use crate::confidence::corroborated_confidence;
use crate::dedup::DedupedCredit;
use crate::similarity::Equivalence;

/// What happened during one resolution, for logging and diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub reference_source: Option<SourceId>,
    /// Deduplicated credits per source going in.
    pub source_counts: BTreeMap<SourceId, usize>,
    pub canonical_count: usize,
    /// Canonical credits backed by more than one source.
    pub corroborated: usize,
    /// Collaboration analysis of each source's credits before dedup.
    #[serde(default)]
    pub collaboration: BTreeMap<SourceId, CollaborationReport>,
}

type Member = (SourceId, DedupedCredit);

#[derive(Debug, Clone)]
pub struct CrossSourceResolver {
    rule: Equivalence,
    ranking: SourceRanking,
    bonus_per_source: f64,
}

impl CrossSourceResolver {
    #[must_use]
    pub fn new(rule: Equivalence, ranking: SourceRanking, bonus_per_source: f64) -> Self {
        Self {
            rule,
            ranking,
            bonus_per_source,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Equivalence::from_config(config),
            config.ranking(),
            config.corroboration_bonus,
        )
    }

    pub fn ranking(&self) -> &SourceRanking {
        &self.ranking
    }

    /// Merge deduplicated per-source lists into canonical credits.
    pub fn resolve(
        &self,
        per_source: BTreeMap<SourceId, Vec<DedupedCredit>>,
    ) -> (Vec<CanonicalCredit>, ResolutionSummary) {
        let mut summary = ResolutionSummary {
            source_counts: per_source.iter().map(|(s, c)| (*s, c.len())).collect(),
            ..ResolutionSummary::default()
        };

        // Highest-ranked first, so candidate sources are visited by rank.
        let mut pools: Vec<(SourceId, Vec<DedupedCredit>)> = per_source.into_iter().collect();
        pools.sort_by(|a, b| self.ranking.compare(b.0, a.0));

        let mut canonical = Vec::new();
        loop {
            pools.retain(|(_, pool)| !pool.is_empty());
            let Some(reference) = self.reference_index(&pools) else {
                break;
            };
            let (reference_source, anchors) = pools.remove(reference);
            if summary.reference_source.is_none() {
                summary.reference_source = Some(reference_source);
            }

            for anchor in anchors {
                let mut matches: Vec<Member> = Vec::new();
                for (source, pool) in &mut pools {
                    if let Some(idx) = self.best_match(&anchor, pool) {
                        matches.push((*source, pool.remove(idx)));
                    }
                }
                canonical.push(self.merge((reference_source, anchor), matches));
            }
        }

        summary.canonical_count = canonical.len();
        summary.corroborated = canonical.iter().filter(|c| c.source_count() > 1).count();
        (canonical, summary)
    }

    /// The pool with the most credits; ties go to the higher-ranked source.
    fn reference_index(&self, pools: &[(SourceId, Vec<DedupedCredit>)]) -> Option<usize> {
        pools
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.1.len()
                    .cmp(&b.1.len())
                    .then_with(|| self.ranking.compare(a.0, b.0))
            })
            .map(|(idx, _)| idx)
    }

    /// The closest equivalent credit in `pool`. Equal scores prefer higher
    /// confidence, then the earlier credit.
    fn best_match(&self, anchor: &DedupedCredit, pool: &[DedupedCredit]) -> Option<usize> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (idx, candidate) in pool.iter().enumerate() {
            let Some(score) = self.rule.score(&anchor.credit, &candidate.credit) else {
                continue;
            };
            let confidence = candidate.credit.confidence;
            let better = match best {
                None => true,
                Some((_, best_score, best_confidence)) => {
                    score > best_score || (score == best_score && confidence > best_confidence)
                }
            };
            if better {
                best = Some((idx, score, confidence));
            }
        }
        best.map(|(idx, _, _)| idx)
    }

    /// `true` when `a` should represent a merged group instead of `b`.
    fn outranks(&self, a: &Member, b: &Member) -> bool {
        a.1.credit
            .confidence
            .partial_cmp(&b.1.credit.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.ranking.compare(a.0, b.0))
            == Ordering::Greater
    }

    fn merge(&self, anchor: Member, matches: Vec<Member>) -> CanonicalCredit {
        let mut representative = &anchor;
        for member in &matches {
            if self.outranks(member, representative) {
                representative = member;
            }
        }

        let supporting_sources: BTreeSet<SourceId> = std::iter::once(anchor.0)
            .chain(matches.iter().map(|(source, _)| *source))
            .collect();
        let merged_from_count = anchor.1.merged_from_count
            + matches.iter().map(|(_, m)| m.merged_from_count).sum::<usize>();
        let best = matches
            .iter()
            .map(|(_, m)| m.credit.confidence)
            .fold(anchor.1.credit.confidence, f64::max);

        let confidence =
            corroborated_confidence(best, supporting_sources.len(), self.bonus_per_source);

        let mut credit = CanonicalCredit::from_parsed(&representative.1.credit, merged_from_count)
            .with_confidence(confidence);
        credit.supporting_sources = supporting_sources;
        credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liner_core::model::ParsedCredit;
    use liner_core::taxonomy::RoleCategory;

    fn deduped(name: &str, role: &str, source: SourceId, confidence: f64) -> DedupedCredit {
        DedupedCredit::single(
            ParsedCredit::new(name, role, role, RoleCategory::Production, source)
                .unwrap()
                .with_confidence(confidence),
        )
    }

    fn resolver() -> CrossSourceResolver {
        CrossSourceResolver::from_config(&Config::default())
    }

    #[test]
    fn test_two_sources_agree() {
        let input = BTreeMap::from([
            (SourceId::Discogs, vec![deduped("John Doe", "Producer", SourceId::Discogs, 0.8)]),
            (SourceId::GeniusWeb, vec![deduped("John Doe", "Producer", SourceId::GeniusWeb, 0.9)]),
        ]);
        let (credits, summary) = resolver().resolve(input);
        assert_eq!(credits.len(), 1);
        let credit = &credits[0];
        assert_eq!(credit.merged_from_count, 2);
        assert_eq!(credit.source_count(), 2);
        assert!((credit.confidence - 0.95).abs() < 1e-9);
        assert_eq!(summary.corroborated, 1);
        // Equal counts: the higher-ranked source is the reference.
        assert_eq!(summary.reference_source, Some(SourceId::Discogs));
    }

    #[test]
    fn test_reference_has_most_credits() {
        let input = BTreeMap::from([
            (SourceId::Rapedia, vec![deduped("Kore", "Producer", SourceId::Rapedia, 1.0)]),
            (
                SourceId::Spotify,
                vec![
                    deduped("Kore", "Producer", SourceId::Spotify, 0.8),
                    deduped("Skalp", "Producer", SourceId::Spotify, 0.8),
                ],
            ),
        ]);
        let (credits, summary) = resolver().resolve(input);
        assert_eq!(summary.reference_source, Some(SourceId::Spotify));
        assert_eq!(credits.len(), 2);
        assert_eq!(summary.canonical_count, 2);
    }

    #[test]
    fn test_unmatched_pass_through() {
        let input = BTreeMap::from([
            (SourceId::Discogs, vec![deduped("Jane Roe", "Mixing Engineer", SourceId::Discogs, 0.7)]),
            (SourceId::LastFm, vec![deduped("John Doe", "Producer", SourceId::LastFm, 0.6)]),
        ]);
        let (credits, _) = resolver().resolve(input);
        assert_eq!(credits.len(), 2);
        for credit in &credits {
            assert_eq!(credit.source_count(), 1);
            assert_eq!(credit.merged_from_count, 1);
        }
        let john = credits.iter().find(|c| c.person_name == "John Doe").unwrap();
        assert!((john.confidence - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_representative_is_most_confident() {
        let input = BTreeMap::from([
            (SourceId::Rapedia, vec![deduped("DJ Premiere", "Producer", SourceId::Rapedia, 0.7)]),
            (SourceId::Spotify, vec![deduped("DJ Premier", "Producer", SourceId::Spotify, 0.9)]),
        ]);
        let (credits, _) = resolver().resolve(input);
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].person_name, "DJ Premier");
    }

    #[test]
    fn test_leftovers_match_among_remaining_sources() {
        let input = BTreeMap::from([
            (
                SourceId::Rapedia,
                vec![
                    deduped("Kore", "Producer", SourceId::Rapedia, 1.0),
                    deduped("Skalp", "Producer", SourceId::Rapedia, 1.0),
                ],
            ),
            (SourceId::Discogs, vec![deduped("Jane Roe", "Composer", SourceId::Discogs, 0.8)]),
            (SourceId::Spotify, vec![deduped("Jane Roe", "Composer", SourceId::Spotify, 0.8)]),
        ]);
        let (credits, _) = resolver().resolve(input);
        assert_eq!(credits.len(), 3);
        let jane = credits.iter().find(|c| c.person_name == "Jane Roe").unwrap();
        assert_eq!(jane.source_count(), 2);
    }

    #[test]
    fn test_empty_input() {
        let (credits, summary) = resolver().resolve(BTreeMap::new());
        assert!(credits.is_empty());
        assert_eq!(summary.reference_source, None);
    }

    #[test]
    fn test_each_candidate_used_once() {
        let input = BTreeMap::from([
            (
                SourceId::Rapedia,
                vec![
                    deduped("Jane Roe", "Producer", SourceId::Rapedia, 0.9),
                    deduped("Jane Rowe", "Producer", SourceId::Rapedia, 0.9),
                ],
            ),
            (SourceId::Discogs, vec![deduped("Jane Roe", "Producer", SourceId::Discogs, 0.9)]),
        ]);
        let (credits, _) = resolver().resolve(input);
        assert_eq!(credits.len(), 2);
        let total_sources: usize = credits.iter().map(CanonicalCredit::source_count).sum();
        assert_eq!(total_sources, 3);
    }
}
