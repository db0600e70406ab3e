//! Deterministic clean-up pass over an assembled record.
//!
//! Drops experience entries that are really leaked section headings,
//! de-duplicates experience by (title, company), canonicalises acronym
//! casing in skills and fills a missing name from the first raw line.

use std::collections::HashSet;

use crate::models::{Experience, ResumeRecord};
use crate::pipeline::personal::is_name_candidate;
use crate::pipeline::text::is_all_caps;

const HEADING_WORDS: &[&str] = &[
    "SUMMARY",
    "EXPERIENCE",
    "EDUCATION",
    "CERTIFICATIONS",
    "PROJECTS",
    "SKILLS",
];

/// Upper-cased wherever they appear as a whole skill.
const SKILL_ACRONYMS: &[&str] = &[
    "SQL", "AWS", "GCP", "GPU", "CPU", "HTML", "CSS", "API", "REST", "CI/CD",
];

const MAX_HEADING_CHARS: usize = 40;
const MIN_DESCRIPTION_CHARS: usize = 20;

pub fn postprocess(record: &mut ResumeRecord) {
    fill_missing_name(record);
    record.experience = normalize_experience(std::mem::take(&mut record.experience));
    record.skills = normalize_skills(std::mem::take(&mut record.skills));
}

fn fill_missing_name(record: &mut ResumeRecord) {
    if !record.personal_info.name.trim().is_empty() {
        return;
    }
    let first_line = record.raw_text.lines().next().unwrap_or_default().trim();
    if is_name_candidate(first_line) {
        record.personal_info.name = first_line.to_string();
    }
}

pub fn normalize_experience(experience: Vec<Experience>) -> Vec<Experience> {
    let mut seen = HashSet::new();
    experience
        .into_iter()
        .filter_map(|mut exp| {
            exp.title = exp.title.trim().to_string();
            exp.company = exp.company.trim().to_string();
            exp.description = exp.description.trim().to_string();

            if is_section_heading(&exp.title)
                && exp.description.chars().count() < MIN_DESCRIPTION_CHARS
            {
                return None;
            }
            if !exp.title.is_empty() || !exp.company.is_empty() {
                let key = (exp.title.to_lowercase(), exp.company.to_lowercase());
                if !seen.insert(key) {
                    return None;
                }
            }
            Some(exp)
        })
        .collect()
}

pub fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    skills
        .into_iter()
        .filter_map(|skill| {
            let clean = skill.split_whitespace().collect::<Vec<_>>().join(" ");
            if clean.is_empty() {
                return None;
            }
            let upper = clean.to_uppercase();
            let label = if SKILL_ACRONYMS.contains(&upper.as_str()) {
                upper
            } else {
                clean
            };
            seen.insert(label.to_lowercase()).then_some(label)
        })
        .collect()
}

fn is_section_heading(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    if text.chars().count() < MAX_HEADING_CHARS && is_all_caps(text) {
        return true;
    }
    let upper = text.to_uppercase();
    HEADING_WORDS.iter().any(|h| upper.contains(h))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn exp(title: &str, company: &str, description: &str) -> Experience {
        Experience {
            title: title.to_string(),
            company: company.to_string(),
            description: description.to_string(),
            ..Experience::default()
        }
    }

    #[test]
    fn test_heading_only_experience_is_dropped() {
        let out = normalize_experience(vec![
            exp("PROFESSIONAL EXPERIENCE", "", ""),
            exp("Engineer", "Acme", "Built things."),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Engineer");
    }

    #[test]
    fn test_heading_title_with_long_description_is_kept() {
        let out = normalize_experience(vec![exp(
            "SRE",
            "Initech",
            "Ran the on-call rotation for forty services.",
        )]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_experience_dedup_is_case_insensitive() {
        let out = normalize_experience(vec![
            exp("Engineer", "Acme", "First."),
            exp("engineer ", "ACME", "Second."),
            exp("Engineer", "Beta", "Third."),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].description, "First.");
        assert_eq!(out[1].company, "Beta");
    }

    #[test]
    fn test_skill_acronyms_are_canonicalised() {
        let skills = vec![
            "sql".to_string(),
            "SQL".to_string(),
            "ci/cd".to_string(),
            "Machine   Learning".to_string(),
            "Rust".to_string(),
        ];
        assert_eq!(
            normalize_skills(skills),
            vec!["SQL", "CI/CD", "Machine Learning", "Rust"]
        );
    }

    #[test]
    fn test_missing_name_from_first_line() {
        let mut record = ResumeRecord::empty("jane doe\njane@example.com", Utc::now());
        postprocess(&mut record);
        assert_eq!(record.personal_info.name, "jane doe");

        let mut record = ResumeRecord::empty("jane@example.com\nJane", Utc::now());
        postprocess(&mut record);
        assert_eq!(record.personal_info.name, "");
    }

    #[test]
    fn test_missing_name_skips_caps_and_labelled_first_line() {
        for raw in ["JOHN DOE\njohn@x.com", "Curriculum Vitae: 2024\nJane", "EXPERIENCE\nAcme"] {
            let mut record = ResumeRecord::empty(raw, Utc::now());
            postprocess(&mut record);
            assert_eq!(record.personal_info.name, "", "filled from {raw:?}");
        }
    }
}
