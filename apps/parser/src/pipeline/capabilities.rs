//! Optional NLP capabilities, selected once when the pipeline is built.
//!
//! The pipeline holds them as `Arc<dyn Trait>`. Without an NLP backend the
//! no-op implementations are used and extraction falls back to the
//! heuristics in `personal` and `skills`.

use crate::pipeline::vocabulary::{tokenize, Vocabulary};

// ────────────────────────────────────────────────────────────────────────────
// Trait definitions
// ────────────────────────────────────────────────────────────────────────────

/// Tags a PERSON entity in the first lines of a résumé.
pub trait NameTagger: Send + Sync {
    fn tag_person(&self, lines: &[&str]) -> Option<String>;
}

/// Matches vocabulary phrases against tokenized text. Results are canonical
/// vocabulary names in order of first appearance in the text.
pub trait PhraseMatcher: Send + Sync {
    fn match_phrases(&self, text: &str, vocabulary: &Vocabulary) -> Vec<String>;
}

// ────────────────────────────────────────────────────────────────────────────
// No-op implementations
// ────────────────────────────────────────────────────────────────────────────

pub struct NoopNameTagger;

impl NameTagger for NoopNameTagger {
    fn tag_person(&self, _lines: &[&str]) -> Option<String> {
        None
    }
}

pub struct NoopPhraseMatcher;

impl PhraseMatcher for NoopPhraseMatcher {
    fn match_phrases(&self, _text: &str, _vocabulary: &Vocabulary) -> Vec<String> {
        vec![]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TokenPhraseMatcher
// ────────────────────────────────────────────────────────────────────────────

/// Matches multi-token vocabulary phrases over lower-cased tokens
/// ("react native" matches `React  Native`). Case-sensitive terms compare
/// against the original tokens.
pub struct TokenPhraseMatcher;

impl PhraseMatcher for TokenPhraseMatcher {
    fn match_phrases(&self, text: &str, vocabulary: &Vocabulary) -> Vec<String> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return vec![];
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut hits: Vec<(usize, usize)> = vocabulary
            .terms()
            .iter()
            .enumerate()
            .filter_map(|(index, term)| {
                let pattern = term.tokens();
                if pattern.is_empty() || pattern.len() > tokens.len() {
                    return None;
                }
                (0..=tokens.len() - pattern.len())
                    .find(|&at| {
                        pattern.iter().enumerate().all(|(offset, want)| {
                            if term.case_sensitive {
                                tokens[at + offset] == want.as_str()
                            } else {
                                lowered[at + offset] == *want
                            }
                        })
                    })
                    .map(|at| (at, index))
            })
            .collect();

        hits.sort_unstable();
        let terms = vocabulary.terms();
        hits.into_iter()
            .map(|(_, index)| terms[index].name.clone())
            .collect()
    }
}
