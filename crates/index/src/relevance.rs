//! Additive relevance scoring.
//!
//! Each keyword earns points for every place it appears in a type. The
//! weights favour the type's own name, then member names, then free text:
//!
//! | location | points |
//! |---|---|
//! | type name, exact | 100 |
//! | type name, substring | 50 |
//! | method name (each) | 40 |
//! | property name (each) | 35 |
//! | instructions | 30 |
//! | module | 25 |
//! | docstring | 20 |
//! | method docstring (each) | 15 |
//! | property docstring (each) | 10 |
//! | tag (each) | 10 |
//!
//! Matching is case-insensitive. There are no caps.

use crate::registered_type::RegisteredType;
use std::sync::Arc;

pub const DEFAULT_RANK_LIMIT: usize = 10;

const STOP_WORDS: &[&str] = &[
    "how", "do", "i", "can", "you", "what", "where", "when", "why", "is", "are", "the", "a",
    "an", "to", "for", "of", "in", "on", "with", "this", "that", "please", "show", "me", "find",
    "get", "use", "using", "does", "has", "have",
];

const MIN_KEYWORD_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct ScoredType {
    pub score: u32,
    pub registered: Arc<RegisteredType>,
}

/// Total score of `ty` for the keyword set.
pub fn score<S: AsRef<str>>(ty: &RegisteredType, keywords: &[S]) -> u32 {
    let name = ty.name().to_lowercase();
    let module = ty.module().to_lowercase();
    let docstring = ty.docstring().to_lowercase();
    let instructions = ty.instructions().to_lowercase();
    let tags: Vec<String> = ty.tags().iter().map(|t| t.as_str().to_lowercase()).collect();

    let mut total = 0;
    for keyword in keywords {
        let keyword = keyword.as_ref().to_lowercase();
        if keyword.is_empty() {
            continue;
        }

        if name == keyword {
            total += 100;
        } else if name.contains(&keyword) {
            total += 50;
        }

        if module.contains(&keyword) {
            total += 25;
        }

        for (method, info) in ty.methods() {
            if method.to_lowercase().contains(&keyword) {
                total += 40;
            }
            if info.docstring.to_lowercase().contains(&keyword) {
                total += 15;
            }
        }

        for (property, info) in ty.properties() {
            if property.to_lowercase().contains(&keyword) {
                total += 35;
            }
            if info.docstring.to_lowercase().contains(&keyword) {
                total += 10;
            }
        }

        if instructions.contains(&keyword) {
            total += 30;
        }
        if docstring.contains(&keyword) {
            total += 20;
        }

        total += 10 * tags.iter().filter(|t| t.contains(&keyword)).count() as u32;
    }
    total
}

/// Score every candidate, drop zeros, and keep the best `limit`.
///
/// Ties keep candidate order.
pub fn rank<S: AsRef<str>>(
    candidates: Vec<Arc<RegisteredType>>,
    keywords: &[S],
    limit: usize,
) -> Vec<ScoredType> {
    let mut scored: Vec<ScoredType> = candidates
        .into_iter()
        .filter_map(|registered| {
            let score = score(&registered, keywords);
            (score > 0).then_some(ScoredType { score, registered })
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

/// Keywords from a natural-language question without a reasoning service:
/// lower-cased word tokens, minus stop words and anything shorter than
/// three characters.
pub fn fallback_keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}
