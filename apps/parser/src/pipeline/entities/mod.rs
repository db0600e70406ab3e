//! EntityParsers: one delimited entry in, one optional typed record out.
//!
//! Every parser rejects entries that are too short or that are an all-caps
//! header leaking into a section body. Nothing here panics on odd input.

pub mod certification;
pub mod education;
pub mod experience;
pub mod project;

pub use certification::{parse_certification, split_certification_entries};
pub use education::parse_education;
pub use experience::parse_experience;
pub use project::parse_project;

use crate::pipeline::dates::has_date_token;
use crate::pipeline::text::is_all_caps;

/// Trimmed, non-empty lines of an entry.
pub(crate) fn content_lines(entry: &str) -> Vec<&str> {
    entry
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// Long enough to carry data and not a stray header.
pub(crate) fn is_plausible_entry(entry: &str, min_chars: usize) -> bool {
    let entry = entry.trim();
    entry.chars().count() >= min_chars && !is_leftover_header(entry)
}

fn is_leftover_header(entry: &str) -> bool {
    !has_date_token(entry) && content_lines(entry).iter().all(|l| is_all_caps(l))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_entries_are_rejected() {
        assert!(!is_plausible_entry("Acme", 10));
        assert!(is_plausible_entry("Engineer - Acme Corp", 10));
    }

    #[test]
    fn test_caps_header_leftover_is_rejected() {
        assert!(!is_plausible_entry("PROFESSIONAL EXPERIENCE", 10));
        assert!(is_plausible_entry("SOFTWARE ENGINEER - ACME\nJAN 2020 - PRESENT", 10));
    }
}
