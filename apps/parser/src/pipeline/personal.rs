//! PersonalInfoExtractor — contact details from the whole document.
//!
//! Email, phone and profile URLs are plain first-match regexes. The name
//! comes from the optional tagger, then a `Name:` label, then a line
//! heuristic over the top of the document whose skip rules exclude the
//! lines the regexes already claim.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::PersonalInfo;
use crate::pipeline::capabilities::NameTagger;
use crate::pipeline::sections::is_keyword_header;
use crate::pipeline::stage::try_stage;
use crate::pipeline::text::{find_location, is_all_caps};

const NAME_SCAN_LINES: usize = 10;
const LOCATION_SCAN_LINES: usize = 15;
const MAX_NAME_WORDS: usize = 6;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d])((?:\+?1[-. \t]?)?(?:\(\d{3}\)|\d{3})[-. \t]?\d{3}[-. \t]?\d{4})(?:$|[^\d])")
        .expect("valid regex")
});

static PHONE_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-().+]+$").expect("valid regex"));

static LINKEDIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[A-Za-z0-9_%-]+/?")
        .expect("valid regex")
});

static GITHUB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[A-Za-z0-9_-]+/?").expect("valid regex")
});

static WEBSITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s,;|()<>]+").expect("valid regex")
});

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("valid regex"));

static NAME_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:full[ \t]+)?name[ \t]*:[ \t]*(.+)$").expect("valid regex")
});

static LOCATION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:location|based in|address)[ \t]*:[ \t]*(.+)$").expect("valid regex")
});

pub struct PersonalInfoExtractor {
    name_tagger: Arc<dyn NameTagger>,
}

impl PersonalInfoExtractor {
    pub fn new(name_tagger: Arc<dyn NameTagger>) -> Self {
        Self { name_tagger }
    }

    pub fn extract(&self, text: &str) -> PersonalInfo {
        let head: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .take(NAME_SCAN_LINES)
            .collect();

        let email = EMAIL
            .find(text)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let phone = PHONE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        let linkedin_url = LINKEDIN
            .find(text)
            .map(|m| canonical_url(m.as_str()))
            .unwrap_or_default();
        let github_url = GITHUB
            .find(text)
            .map(|m| canonical_url(m.as_str()))
            .unwrap_or_default();

        let name = try_stage("name_tagger", || self.name_tagger.tag_person(&head))
            .flatten()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .or_else(|| labelled(&NAME_LABEL, text))
            .or_else(|| heuristic_name(&head))
            .unwrap_or_default();

        PersonalInfo {
            name,
            email,
            phone,
            location: extract_location(text).unwrap_or_default(),
            linkedin_url,
            github_url,
            website: extract_website(text).unwrap_or_default(),
        }
    }
}

/// First of the top lines that could be a name.
fn heuristic_name(head: &[&str]) -> Option<String> {
    head.iter()
        .map(|line| line.trim())
        .find(|line| is_name_candidate(line))
        .map(str::to_string)
}

/// Rejects contact data, headers, all-caps lines, labels and sentences.
pub fn is_name_candidate(line: &str) -> bool {
    let line = line.trim();
    let len = line.chars().count();
    (2..=100).contains(&len)
        && !line.contains('@')
        && !line.contains(':')
        && !line.to_lowercase().contains("http")
        && !line.to_lowercase().contains("www.")
        && !PHONE_ONLY.is_match(line)
        && !line.chars().any(|c| c.is_ascii_digit())
        && !is_all_caps(line)
        && !is_keyword_header(line)
        && line.split_whitespace().count() <= MAX_NAME_WORDS
}

/// A `Location:` label, then any `City, ST` in the top lines, then `City, Country`.
fn extract_location(text: &str) -> Option<String> {
    if let Some(location) = labelled(&LOCATION_LABEL, text) {
        return Some(location);
    }
    let top: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(LOCATION_SCAN_LINES)
        .collect();
    top.iter()
        .find_map(|line| find_location(line, false))
        .or_else(|| top.iter().find_map(|line| find_location(line, true)))
}

/// First absolute URL that is not a LinkedIn or GitHub profile.
fn extract_website(text: &str) -> Option<String> {
    WEBSITE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', '/']))
        .find(|url| {
            let lower = url.to_lowercase();
            !lower.contains("linkedin.com") && !lower.contains("github.com")
        })
        .map(canonical_url)
}

fn labelled(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `linkedin.com/in/jane/` -> `https://linkedin.com/in/jane`.
fn canonical_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    format!("https://{}", SCHEME.replace(trimmed, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::capabilities::NoopNameTagger;

    fn extractor() -> PersonalInfoExtractor {
        PersonalInfoExtractor::new(Arc::new(NoopNameTagger))
    }

    struct FixedTagger(&'static str);

    impl NameTagger for FixedTagger {
        fn tag_person(&self, _lines: &[&str]) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn test_contact_block() {
        let text = "John Doe\njohn@x.com\n555-123-4567\nSan Francisco, CA\nEXPERIENCE";
        let info = extractor().extract(text);
        assert_eq!(info.name, "John Doe");
        assert_eq!(info.email, "john@x.com");
        assert_eq!(info.phone, "555-123-4567");
        assert_eq!(info.location, "San Francisco, CA");
    }

    #[test]
    fn test_phone_variants() {
        assert_eq!(extractor().extract("Call (555) 123-4567").phone, "(555) 123-4567");
        assert_eq!(extractor().extract("Tel: +1-555.123.4567").phone, "+1-555.123.4567");
        assert_eq!(extractor().extract("EDUCATION 2016-2020").phone, "");
    }

    #[test]
    fn test_profile_urls_are_absolute_https() {
        let text = "Jane Roe\nlinkedin.com/in/jane-roe/ | http://github.com/janeroe/resume-parser\nhttps://janeroe.dev";
        let info = extractor().extract(text);
        assert_eq!(info.linkedin_url, "https://linkedin.com/in/jane-roe");
        assert_eq!(info.github_url, "https://github.com/janeroe");
        assert_eq!(info.website, "https://janeroe.dev");
    }

    #[test]
    fn test_name_skips_contact_lines_and_caps_headers() {
        let text = "jane@example.com\n(555) 123-4567\nSUMMARY\nJane Roe\nAustin, TX";
        assert_eq!(extractor().extract(text).name, "Jane Roe");
    }

    #[test]
    fn test_all_caps_name_is_rejected() {
        let info = extractor().extract("JOHN DOE\njohn@x.com");
        assert_eq!(info.name, "");
    }

    #[test]
    fn test_name_label_wins_over_heuristic() {
        let text = "Curriculum Vitae\nName: Maria Garcia\nmaria@example.com";
        assert_eq!(extractor().extract(text).name, "Maria Garcia");
    }

    #[test]
    fn test_tagger_takes_priority() {
        let info = PersonalInfoExtractor::new(Arc::new(FixedTagger("Ada Lovelace")))
            .extract("Name: Someone Else");
        assert_eq!(info.name, "Ada Lovelace");
    }

    struct BrokenTagger;

    impl NameTagger for BrokenTagger {
        fn tag_person(&self, _lines: &[&str]) -> Option<String> {
            panic!("model not loaded")
        }
    }

    #[test]
    fn test_broken_tagger_falls_back_to_heuristic() {
        let info =
            PersonalInfoExtractor::new(Arc::new(BrokenTagger)).extract("Jane Roe\njane@example.com");
        assert_eq!(info.name, "Jane Roe");
        assert_eq!(info.email, "jane@example.com");
    }

    #[test]
    fn test_location_label_and_country() {
        assert_eq!(
            extractor().extract("Jane\nBased in: Lisbon, Portugal").location,
            "Lisbon, Portugal"
        );
        assert_eq!(extractor().extract("Jane\nBerlin, Germany").location, "Berlin, Germany");
    }

    #[test]
    fn test_city_state_on_later_line_wins() {
        let text = "Jane Roe\nSoftware Engineer, Google\njane@x.com\nAustin, TX";
        assert_eq!(extractor().extract(text).location, "Austin, TX");

        let text = "Jane Roe\nLisbon, Portugal\nRemote from Austin, TX";
        assert_eq!(extractor().extract(text).location, "Lisbon, Portugal");
    }

    #[test]
    fn test_name_candidate_rules() {
        assert!(is_name_candidate("Jane Roe"));
        assert!(is_name_candidate("jane doe"));
        assert!(!is_name_candidate("JOHN DOE"));
        assert!(!is_name_candidate("Curriculum Vitae: 2024"));
        assert!(!is_name_candidate("Class of 2019"));
        assert!(!is_name_candidate("Work Experience"));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extractor().extract(""), PersonalInfo::default());
    }
}
