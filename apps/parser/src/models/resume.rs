use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::entities::{Certification, Education, Experience, Project};

/// Contact block pulled from the whole document. Every field defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin_url: String,
    pub github_url: String,
    pub website: String,
}

impl PersonalInfo {
    /// Number of the four scored contact fields (name, email, phone, location) that are filled.
    pub fn filled_core_fields(&self) -> usize {
        [&self.name, &self.email, &self.phone, &self.location]
            .iter()
            .filter(|f| !f.trim().is_empty())
            .count()
    }
}

/// Root aggregate returned by one `parse()` call.
///
/// `skills` is de-duplicated case-insensitively in first-seen order and never
/// holds more than the configured cap. `raw_text` is the caller's input,
/// untouched by normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications: Vec<Certification>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub projects: Vec<Project>,
    pub raw_text: String,
    pub confidence_score: f64,
    pub parsed_at: DateTime<Utc>,
}

impl ResumeRecord {
    /// An empty record stamped with `parsed_at`; used for blank input.
    pub fn empty(raw_text: &str, parsed_at: DateTime<Utc>) -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            summary: String::new(),
            experience: vec![],
            education: vec![],
            certifications: vec![],
            skills: vec![],
            languages: vec![],
            projects: vec![],
            raw_text: raw_text.to_string(),
            confidence_score: 0.0,
            parsed_at,
        }
    }
}
