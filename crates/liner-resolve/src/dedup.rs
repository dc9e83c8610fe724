//! Intra-source deduplication.
//!
//! Records are compared pairwise and equivalent pairs are merged until no
//! equivalent pair remains. The comparison is greedy and quadratic per
//! pass, which is fine for per-track lists (typically under 50 records).
//! A merge keeps the higher-confidence record and adds up how many records
//! it stands for.

use liner_core::model::ParsedCredit;

use crate::similarity::Equivalence;

/// A parsed credit standing in for one or more equivalent records.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupedCredit {
    pub credit: ParsedCredit,
    /// Always at least 1.
    pub merged_from_count: usize,
}

impl DedupedCredit {
    #[must_use]
    pub fn single(credit: ParsedCredit) -> Self {
        Self {
            credit,
            merged_from_count: 1,
        }
    }

    /// Fold `other` into `self`, keeping the higher-confidence record. Ties
    /// keep `self`.
    fn absorb(&mut self, other: Self) {
        self.merged_from_count += other.merged_from_count;
        if other.credit.confidence > self.credit.confidence {
            self.credit = other.credit;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntraSourceDeduplicator {
    rule: Equivalence,
}

impl IntraSourceDeduplicator {
    #[must_use]
    pub fn new(rule: Equivalence) -> Self {
        Self { rule }
    }

    /// Merge equivalent records of one source. The first occurrence of
    /// each group keeps its position.
    pub fn dedup(&self, credits: Vec<ParsedCredit>) -> Vec<DedupedCredit> {
        let mut records: Vec<DedupedCredit> = credits.into_iter().map(DedupedCredit::single).collect();

        while let Some((keep, drop)) = self.find_pair(&records) {
            let absorbed = records.remove(drop);
            log::debug!(
                "Merging duplicate {} ({}) into {}",
                absorbed.credit.person_name,
                absorbed.credit.normalized_role,
                records[keep].credit.person_name
            );
            records[keep].absorb(absorbed);
        }

        records
    }

    fn find_pair(&self, records: &[DedupedCredit]) -> Option<(usize, usize)> {
        for i in 0..records.len() {
            for j in (i + 1)..records.len() {
                if self.rule.equivalent(&records[i].credit, &records[j].credit) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}
