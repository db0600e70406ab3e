//! Summary and spoken-language extraction over segmented sections.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::sections::{Section, SectionKind};
use crate::pipeline::text::strip_bullet;

const SUMMARY_FALLBACK_MIN_CHARS: usize = 50;
const SUMMARY_FALLBACK_MAX_CHARS: usize = 500;
const MAX_LANGUAGE_CHARS: usize = 40;

static CONTACT_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)@|https?://|www\.|linkedin\.com|github\.com|\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}")
        .expect("valid regex")
});

static LANGUAGES_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:spoken[ \t]+)?languages[ \t]*:[ \t]*(.+)$").expect("valid regex")
});

static LANGUAGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•·\n]").expect("valid regex"));

/// Body of the first summary-like section joined into one paragraph. Falls
/// back to a prose paragraph of the preamble that carries no contact data.
pub fn extract_summary(sections: &[Section]) -> String {
    if let Some(section) = sections
        .iter()
        .find(|s| s.kind == SectionKind::Summary && !s.body.trim().is_empty())
    {
        return join_paragraph(&section.body);
    }

    sections
        .iter()
        .filter(|s| s.kind == SectionKind::Preamble)
        .flat_map(|s| s.body.split("\n\n"))
        .map(join_paragraph)
        .find(|p| {
            let len = p.chars().count();
            (SUMMARY_FALLBACK_MIN_CHARS..=SUMMARY_FALLBACK_MAX_CHARS).contains(&len)
                && !CONTACT_DATA.is_match(p)
        })
        .unwrap_or_default()
}

/// Languages from a Languages section, else from an inline `Languages:` label.
pub fn extract_languages(sections: &[Section], text: &str) -> Vec<String> {
    let from_section: Vec<&str> = sections
        .iter()
        .filter(|s| s.kind == SectionKind::Languages)
        .map(|s| s.body.as_str())
        .collect();

    let source = if from_section.iter().any(|b| !b.trim().is_empty()) {
        from_section.join("\n")
    } else {
        LANGUAGES_LABEL
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut seen = HashSet::new();
    LANGUAGE_SEPARATOR
        .split(&source)
        .map(|part| strip_bullet(part).trim_end_matches('.').trim())
        .filter(|part| {
            let len = part.chars().count();
            len > 1 && len <= MAX_LANGUAGE_CHARS
        })
        .filter(|part| seen.insert(part.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn join_paragraph(body: &str) -> String {
    body.lines()
        .map(strip_bullet)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
