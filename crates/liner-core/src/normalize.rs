//! Text normalization shared by every resolution stage.
//!
//! All functions here are pure and infallible: they always return a string,
//! and the empty string for empty input.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters that NFKD leaves intact but that should still fold to ASCII
/// for comparison purposes.
const CHAR_MAP: &[(char, &str)] = &[
    ('ß', "ss"),
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('ø', "o"),
    ('Ø', "O"),
    ('ł', "l"),
    ('Ł', "L"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ð', "d"),
    ('þ', "th"),
    ('Þ', "TH"),
    ('ı', "i"),
    ('\u{2019}', "'"),
    ('\u{2018}', "'"),
    ('`', "'"),
    ('\u{2010}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
];

fn map_char(c: char, out: &mut String) {
    match CHAR_MAP.iter().find(|(from, _)| *from == c) {
        Some((_, to)) => out.push_str(to),
        None => out.push(c),
    }
}

/// Strip diacritics while preserving case and punctuation.
///
/// Applies NFKD decomposition, drops combining marks, then folds the
/// characters listed in the explicit map (`ß`, `æ`, `ø`, typographic quotes
/// and dashes, ...).
pub fn fold_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkd().filter(|c| !is_combining_mark(*c)) {
        map_char(c, &mut out);
    }
    out
}

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove parenthesised, bracketed and braced content (nesting aware).
///
/// Unbalanced closing brackets are dropped; an unclosed opening bracket
/// swallows the rest of the string.
pub fn strip_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    collapse_whitespace(&out)
}

/// Comparison key form of a string: case-folded, diacritic-free, with
/// punctuation other than hyphens and apostrophes turned into spaces, and
/// whitespace collapsed.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    let folded = fold_diacritics(&text.to_lowercase()).to_lowercase();
    let cleaned: String = folded
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(&cleaned)
}

/// Like [`normalize`], optionally dropping bracketed content first.
pub fn normalize_with(text: &str, strip_enclosed: bool) -> String {
    if strip_enclosed {
        normalize(&strip_brackets(text))
    } else {
        normalize(text)
    }
}

/// Title-case each whitespace-separated word ("prod by" -> "Prod By").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
