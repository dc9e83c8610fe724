//! End-to-end tests for the credit resolution engine.
//!
//! These drive `CreditEngine` through its public entry points with the
//! built-in taxonomy and default configuration.

use std::collections::BTreeMap;

use liner_core::model::{RawCreditBlob, SourceRecord, StructuredCredit};
use liner_core::normalize::normalize;
use liner_core::provenance::SourceId;
use liner_core::taxonomy::{RoleCategory, OTHER_ROLE};
use liner_resolve::{
    Config, CreditEngine, CreditSource, Equivalence, IntraSourceDeduplicator, MemoryCache,
    ResolutionCache, StaticSource,
};

fn engine() -> CreditEngine {
    CreditEngine::from_config(&Config::default()).expect("default engine should build")
}

fn blob(text: &str, source: SourceId) -> RawCreditBlob {
    RawCreditBlob::new(text, source)
}

// Scenario 1
#[test]
fn test_single_producer() {
    let credits = engine().parse_credit_blob(&blob("Produced by DJ Premier", SourceId::GeniusWeb));
    assert_eq!(credits.len(), 1);
    let credit = &credits[0];
    assert_eq!(credit.person_name, "DJ Premier");
    assert_eq!(credit.normalized_role, "Producer");
    assert_eq!(credit.category, RoleCategory::Production);
    assert!(credit.confidence >= 0.8);
}

// Scenario 2
#[test]
fn test_mixing_and_mastering() {
    let credits = engine().parse_credit_blob(&blob(
        "Mixed by Eddie Sancho, Mastered by Tony Dawsey",
        SourceId::Discogs,
    ));
    let roles: Vec<&str> = credits.iter().map(|c| c.normalized_role.as_str()).collect();
    assert_eq!(roles, vec!["Mixing Engineer", "Mastering Engineer"]);
    assert!(credits.iter().all(|c| c.category == RoleCategory::Engineering));
}

// Scenario 3
#[test]
fn test_featured_artists() {
    let credits = engine().parse_credit_blob(&blob("feat. Artist1 & Artist2", SourceId::GeniusWeb));
    assert_eq!(credits.len(), 2);
    for credit in &credits {
        assert_eq!(credit.normalized_role, "Featured Artist");
        assert!(credit.is_collaboration);
    }
    let names: Vec<&str> = credits.iter().map(|c| c.person_name.as_str()).collect();
    assert_eq!(names, vec!["Artist1", "Artist2"]);
}

// Scenario 4
#[test]
fn test_two_sources_corroborate() {
    let discogs = blob("Producer: John Doe", SourceId::Discogs);
    let genius = blob("Produced by John Doe", SourceId::GeniusWeb);

    let engine = engine();
    let inputs: Vec<f64> = [&discogs, &genius]
        .iter()
        .flat_map(|b| engine.parse_credit_blob(b))
        .map(|c| c.confidence)
        .collect();

    let per_source = BTreeMap::from([
        (SourceId::Discogs, vec![discogs]),
        (SourceId::GeniusWeb, vec![genius]),
    ]);
    let canonical = engine.resolve_credits(&per_source);

    assert_eq!(canonical.len(), 1);
    let credit = &canonical[0];
    assert_eq!(credit.person_name, "John Doe");
    assert_eq!(credit.normalized_role, "Producer");
    assert!(credit.merged_from_count >= 2);
    assert_eq!(credit.supporting_sources.len(), 2);
    for confidence in inputs {
        assert!(credit.confidence >= confidence);
    }
}

// Scenario 5
#[test]
fn test_empty_blob() {
    assert!(engine().parse_credit_blob(&blob("", SourceId::Manual)).is_empty());
}

// Scenario 6
#[test]
fn test_garbage_blob() {
    assert!(engine().parse_credit_blob(&blob("xyz123###", SourceId::Manual)).is_empty());
}

#[test]
fn test_unusable_text_resolves_to_nothing() {
    let per_source = BTreeMap::from([
        (SourceId::Spotify, vec![blob("###", SourceId::Spotify)]),
        (SourceId::LastFm, vec![blob("   ", SourceId::LastFm)]),
    ]);
    assert!(engine().resolve_credits(&per_source).is_empty());
}

#[test]
fn test_unlisted_role_surfaces_as_other() {
    let config = Config {
        confidence_threshold: 0.0,
        ..Config::default()
    };
    let engine = CreditEngine::from_config(&config).unwrap();
    let credits = engine.parse_credit_blob(&blob("Talkbox: Roger Troutman", SourceId::Discogs));
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].normalized_role, OTHER_ROLE);
    assert_eq!(credits[0].category, RoleCategory::Other);
}

#[test]
fn test_role_words_stay_out_of_names() {
    let engine = engine();
    for text in ["Produced and mixed by Pete Rock", "Written and performed by Nas"] {
        let credits = engine.parse_credit_blob(&blob(text, SourceId::GeniusWeb));
        assert_eq!(credits.len(), 2, "{text}");
        for credit in &credits {
            assert!(!credit.person_name.contains(" by"), "{credit:?}");
            assert!(!normalize(&credit.person_name).starts_with("and "), "{credit:?}");
        }
    }
}

#[test]
fn test_stage_name_with_role_word() {
    let credits = engine().parse_credit_blob(&blob("feat. Nas & Chance the Rapper", SourceId::GeniusWeb));
    let names: Vec<&str> = credits.iter().map(|c| c.person_name.as_str()).collect();
    assert_eq!(names, vec!["Nas", "Chance the Rapper"]);
    assert!(credits.iter().all(|c| c.normalized_role == "Featured Artist"));
}

#[test]
fn test_dedup_minimality() {
    let engine = engine();
    let text = "Produced by DJ Premier, Prod. by DJ Premiere, Producer: dj premier, \
                Mixed by Jane Roe, Mixing: Jane Roe, Produced by Pete Rock";
    let parsed = engine.parse_credit_blob(&blob(text, SourceId::GeniusWeb));
    let rule = Equivalence::from_config(&Config::default());
    let deduped = IntraSourceDeduplicator::new(rule).dedup(parsed);

    assert_eq!(deduped.len(), 3);
    for (i, a) in deduped.iter().enumerate() {
        for b in &deduped[i + 1..] {
            assert!(!rule.equivalent(&a.credit, &b.credit));
        }
    }
    let premier = deduped
        .iter()
        .find(|d| normalize(&d.credit.person_name) == "dj premier")
        .unwrap();
    assert_eq!(premier.merged_from_count, 3);
}

#[test]
fn test_structured_and_text_sources_merge() {
    let per_source = BTreeMap::from([
        (
            SourceId::Discogs,
            vec![SourceRecord::Structured {
                source: SourceId::Discogs,
                entries: vec![
                    StructuredCredit::new("DJ Premier (2)", "Producer"),
                    StructuredCredit::new("Eddie Sancho", "Mixed By"),
                ],
                track_scope_hint: None,
            }],
        ),
        (
            SourceId::Rapedia,
            vec![SourceRecord::from(blob(
                "Réalisé par DJ Premier, Mixé par Eddie Sancho",
                SourceId::Rapedia,
            ))],
        ),
    ]);
    let (canonical, summary) = engine().resolve_records(&per_source);
    assert_eq!(canonical.len(), 2);
    assert!(canonical.iter().all(|c| c.supporting_sources.len() == 2));
    assert_eq!(summary.reference_source, Some(SourceId::Rapedia));
    assert_eq!(summary.corroborated, 2);
}

#[test]
fn test_resolve_track_with_cache() {
    let genius = StaticSource::new(SourceId::GeniusWeb).with_records(
        "nas-ny-state-of-mind",
        vec![blob("Produced by DJ Premier", SourceId::GeniusWeb).into()],
    );
    let discogs = StaticSource::new(SourceId::Discogs).with_records(
        "nas-ny-state-of-mind",
        vec![blob("Producer: DJ Premier", SourceId::Discogs).into()],
    );
    let memory = MemoryCache::new();
    let cache: &dyn ResolutionCache = &memory;
    let engine = engine();
    let sources: [&dyn CreditSource; 2] = [&genius, &discogs];

    let first = engine.resolve_track("nas-ny-state-of-mind", &sources, Some(cache));
    assert_eq!(first.credits.len(), 1);
    assert_eq!(first.credits[0].supporting_sources.len(), 2);
    assert_eq!(memory.len(), 1);

    let second = engine.resolve_track("nas-ny-state-of-mind", &[], Some(cache));
    assert_eq!(second.credits, first.credits);
}

#[test]
fn test_engine_shared_across_threads() {
    let engine = std::sync::Arc::new(engine());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = std::sync::Arc::clone(&engine);
            std::thread::spawn(move || {
                let text = format!("Produced by DJ Premier, Mixed by Engineer No{i}");
                engine.parse_credit_blob(&RawCreditBlob::new(text, SourceId::Manual))
            })
        })
        .collect();
    for handle in handles {
        let credits = handle.join().unwrap();
        assert_eq!(credits[0].normalized_role, "Producer");
    }
}
