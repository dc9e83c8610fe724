//! The built-in role taxonomy.
//!
//! English and French vocabulary gathered from Genius, Discogs and Rapedia
//! credit blocks. Aliases are matched after [`normalize`], so punctuation
//! and accents in this table are cosmetic.
//!
//! [`normalize`]: crate::normalize::normalize

use super::category::RoleCategory;

pub const PRODUCER: &str = "Producer";
pub const FEATURED_ARTIST: &str = "Featured Artist";

/// `(canonical role, category, aliases)` in declaration order.
pub const DEFAULT_ROLES: &[(&str, RoleCategory, &[&str])] = &[
    // Production
    (
        PRODUCER,
        RoleCategory::Production,
        &[
            "producer", "producers", "produced", "produced by", "production", "produc",
            "prod", "prod. by", "prod by", "produit par", "prod. par", "réalisé par",
            "beatmaker", "beat maker", "beats", "beats by", "instrumental", "instru",
        ],
    ),
    (
        "Executive Producer",
        RoleCategory::Production,
        &["executive producer", "executive produced by", "exec producer", "producteur exécutif"],
    ),
    (
        "Co-Producer",
        RoleCategory::Production,
        &["co-producer", "co-produced by", "coproducer", "co-prod", "co-production"],
    ),
    (
        "Additional Producer",
        RoleCategory::Production,
        &["additional producer", "additional production", "additional production by"],
    ),
    // Engineering
    (
        "Mixing Engineer",
        RoleCategory::Engineering,
        &["mixing engineer", "mix engineer", "mixed by", "mixé par", "mixing", "mix", "mixage", "mixer"],
    ),
    (
        "Mastering Engineer",
        RoleCategory::Engineering,
        &["mastering engineer", "mastered by", "masterisé par", "mastering", "mastering by", "master"],
    ),
    (
        "Recording Engineer",
        RoleCategory::Engineering,
        &["recording engineer", "recorded by", "enregistré par", "recording", "enregistrement"],
    ),
    (
        "Sound Engineer",
        RoleCategory::Engineering,
        &["sound engineer", "engineer", "engineered by", "engineering", "ingénieur du son"],
    ),
    // Writing
    (
        "Songwriter",
        RoleCategory::Writing,
        &["songwriter", "writer", "writers", "written by", "écrit par", "auteur", "songwriting", "writing"],
    ),
    (
        "Lyricist",
        RoleCategory::Writing,
        &["lyricist", "lyrics", "lyrics by", "paroles", "paroles par", "parolier"],
    ),
    (
        "Composer",
        RoleCategory::Writing,
        &["composer", "composed by", "music by", "musique par", "composé par", "compositeur", "composition"],
    ),
    (
        "Arranger",
        RoleCategory::Writing,
        &["arranger", "arranged by", "arrangé par", "arrangement", "arrangements"],
    ),
    // Performance
    (
        "Vocalist",
        RoleCategory::Performance,
        &["vocalist", "vocals", "vocals by", "voice", "voix", "singer", "chant"],
    ),
    (
        "Lead Vocalist",
        RoleCategory::Performance,
        &["lead vocals", "lead vocalist", "lead vocal"],
    ),
    (
        "Backing Vocalist",
        RoleCategory::Performance,
        &["backing vocals", "backing vocalist", "background vocals", "choeurs", "chœurs"],
    ),
    (
        "Rapper",
        RoleCategory::Performance,
        &["rapper", "rap", "rapped by", "mc"],
    ),
    (
        FEATURED_ARTIST,
        RoleCategory::Performance,
        &["featuring", "featured", "featured artist", "feat", "feat.", "ft", "ft.", "avec"],
    ),
    // Instrumentation
    (
        "Guitarist",
        RoleCategory::Instrumentation,
        &["guitarist", "guitar", "guitars", "guitare", "guitar by"],
    ),
    (
        "Electric Guitarist",
        RoleCategory::Instrumentation,
        &["electric guitar", "guitare électrique"],
    ),
    (
        "Acoustic Guitarist",
        RoleCategory::Instrumentation,
        &["acoustic guitar", "guitare acoustique"],
    ),
    (
        "Bassist",
        RoleCategory::Instrumentation,
        &["bassist", "bass", "bass guitar", "basse", "bassiste"],
    ),
    (
        "Drummer",
        RoleCategory::Instrumentation,
        &["drummer", "drums", "batterie", "drum programming"],
    ),
    (
        "Percussionist",
        RoleCategory::Instrumentation,
        &["percussionist", "percussion", "percussions"],
    ),
    (
        "Pianist",
        RoleCategory::Instrumentation,
        &["pianist", "piano", "pianiste"],
    ),
    (
        "Keyboardist",
        RoleCategory::Instrumentation,
        &["keyboardist", "keyboards", "keys", "clavier", "claviers"],
    ),
    (
        "Synthesizer Player",
        RoleCategory::Instrumentation,
        &["synthesizer", "synth", "synths", "synthé"],
    ),
    (
        "Instrumentalist",
        RoleCategory::Instrumentation,
        &[
            "instrumentalist", "multi-instrumentalist", "instruments", "saxophone", "sax",
            "trumpet", "trompette", "violin", "violon", "flute", "flûte", "organ", "orgue",
            "harmonica", "accordion", "accordéon",
        ],
    ),
    // Samples
    (
        "Sample Source",
        RoleCategory::Sample,
        &["sample", "samples", "sampled", "sampled from", "contains sample of", "contains samples of"],
    ),
    (
        "Interpolation Source",
        RoleCategory::Sample,
        &["interpolation", "interpolates", "contains interpolation of"],
    ),
    // Other
    (
        "Director",
        RoleCategory::Other,
        &["director", "directed by", "réalisateur", "video director"],
    ),
    (
        "Photographer",
        RoleCategory::Other,
        &["photographer", "photography", "photo", "photos by"],
    ),
    (
        "Artwork",
        RoleCategory::Other,
        &["artwork", "cover art", "design", "graphic design"],
    ),
];
