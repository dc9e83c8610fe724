//! Confidence scoring primitives shared by assembly and cross-source
//! resolution. Every function returns a value in `[0, 1]`.

/// Name quality factor for a name that passed validation untouched.
pub const CLEAN_NAME_QUALITY: f64 = 1.0;

/// Name quality factor when a heuristic correction was needed.
pub const CORRECTED_NAME_QUALITY: f64 = 0.85;

pub use liner_core::model::clamp_unit;

/// The name quality factor for a candidate.
pub fn name_quality(corrected: bool) -> f64 {
    if corrected {
        CORRECTED_NAME_QUALITY
    } else {
        CLEAN_NAME_QUALITY
    }
}

/// Confidence of one parsed credit.
pub fn parse_confidence(role_confidence: f64, name_quality: f64) -> f64 {
    clamp_unit(clamp_unit(role_confidence) * clamp_unit(name_quality))
}

/// Bonus earned by `source_count` agreeing sources. A single source earns
/// nothing.
pub fn corroboration_bonus(source_count: usize, bonus_per_source: f64) -> f64 {
    let extra = source_count.saturating_sub(1) as f64;
    clamp_unit(extra * clamp_unit(bonus_per_source))
}

/// Confidence of a merged credit: the best member confidence raised by the
/// corroboration bonus.
pub fn corroborated_confidence(best: f64, source_count: usize, bonus_per_source: f64) -> f64 {
    clamp_unit(clamp_unit(best) + corroboration_bonus(source_count, bonus_per_source))
}

/// Penalty for absorbing `merged_from_count` duplicates.
///
/// Reserved: merges do not penalize yet, so this is always 0.
pub fn dedup_penalty(_merged_from_count: usize) -> f64 {
    0.0
}
