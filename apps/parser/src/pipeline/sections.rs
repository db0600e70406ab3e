//! SectionSegmenter — splits normalized text into (header, body) blocks.

use serde::{Deserialize, Serialize};

use crate::pipeline::text::{is_all_caps, letter_count};

/// Keywords that make a short line a section header (case-insensitive).
const HEADER_KEYWORDS: &[&str] = &[
    "experience",
    "employment",
    "work history",
    "education",
    "skills",
    "technologies",
    "competencies",
    "projects",
    "certifications",
    "certificates",
    "licenses",
    "languages",
    "summary",
    "profile",
    "objective",
    "publications",
    "awards",
    "honors",
    "interests",
    "volunteer",
    "references",
    "achievements",
    "qualifications",
];

/// Lower-case words allowed inside a title-case header ("Licenses and Certifications").
const HEADER_CONNECTORS: &[&str] = &["and", "&", "of", "the", "/", "+"];

const MAX_HEADER_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Text before the first header (usually the contact block).
    Preamble,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Languages,
    Publications,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Header line without a trailing colon; empty for the preamble.
    pub header: String,
    pub kind: SectionKind,
    pub body: String,
}

pub struct SectionSegmenter {
    header_max_len: usize,
}

impl Default for SectionSegmenter {
    fn default() -> Self {
        Self::new(60)
    }
}

impl SectionSegmenter {
    pub fn new(header_max_len: usize) -> Self {
        Self { header_max_len }
    }

    /// A header is short and either entirely upper-case or a keyword heading.
    pub fn is_header(&self, line: &str) -> bool {
        let text = line.trim().trim_end_matches(':').trim();
        if text.is_empty() || text.chars().count() >= self.header_max_len {
            return false;
        }
        is_keyword_header(text) || is_caps_heading(text)
    }

    pub fn segment(&self, text: &str) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();
        let mut header = String::new();
        let mut body: Vec<&str> = Vec::new();

        for line in text.lines() {
            if self.is_header(line) {
                push_section(&mut sections, &header, &body);
                header = line.trim().trim_end_matches(':').trim().to_string();
                body.clear();
            } else {
                body.push(line);
            }
        }
        push_section(&mut sections, &header, &body);
        sections
    }
}

/// Maps a header line to the section it opens.
pub fn classify_header(header: &str) -> SectionKind {
    let lower = header.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if lower.trim().is_empty() {
        SectionKind::Preamble
    } else if has(&["experience", "employment", "work history", "career history"]) {
        SectionKind::Experience
    } else if has(&["education", "academic"]) {
        SectionKind::Education
    } else if has(&["programming language"]) {
        SectionKind::Skills
    } else if has(&["skill", "technolog", "competenc", "tools", "tech stack"]) {
        SectionKind::Skills
    } else if has(&["project", "portfolio"]) {
        SectionKind::Projects
    } else if has(&["certif", "licens", "credential"]) {
        SectionKind::Certifications
    } else if has(&["language"]) {
        SectionKind::Languages
    } else if has(&["summary", "profile", "objective", "about"]) {
        SectionKind::Summary
    } else if has(&["publication"]) {
        SectionKind::Publications
    } else {
        SectionKind::Other
    }
}

/// A short title-case (or bare lower-case) line built around a header keyword.
/// Prose lines fail because they carry lower-case non-connector words.
pub fn is_keyword_header(text: &str) -> bool {
    let text = text.trim().trim_end_matches(':').trim();
    if text.contains(',') || text.contains(':') {
        return false;
    }
    let lower = text.to_lowercase();
    if !HEADER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return false;
    }
    if HEADER_KEYWORDS.contains(&lower.as_str()) {
        return true;
    }
    let words: Vec<&str> = text.split_whitespace().collect();
    words.len() <= MAX_HEADER_WORDS
        && words.iter().all(|word| {
            HEADER_CONNECTORS.contains(&word.to_lowercase().as_str())
                || !word.chars().next().is_some_and(char::is_lowercase)
        })
}

/// An all-caps line that reads like a heading rather than a list of acronyms.
fn is_caps_heading(text: &str) -> bool {
    is_all_caps(text)
        && letter_count(text) > 3
        && text.split_whitespace().count() <= MAX_HEADER_WORDS
        && text
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '&' | '/' | '-' | '\''))
}

/// Appends a section; a header seen again replaces the earlier body.
fn push_section(sections: &mut Vec<Section>, header: &str, body: &[&str]) {
    let body = body.join("\n").trim().to_string();
    if header.is_empty() && body.is_empty() {
        return;
    }
    let key = header_key(header);
    if let Some(existing) = sections.iter_mut().find(|s| header_key(&s.header) == key) {
        if !body.is_empty() {
            existing.body = body;
        }
        return;
    }
    sections.push(Section {
        header: header.to_string(),
        kind: classify_header(header),
        body,
    });
}

fn header_key(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
