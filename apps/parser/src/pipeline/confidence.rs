//! ConfidenceScorer — a completeness proxy on a fixed 10-point scale.
//! Not a calibrated probability.

use crate::models::ResumeRecord;

const SCALE: f64 = 10.0;

const PER_CORE_FIELD: f64 = 0.5;
const PER_SKILL: f64 = 0.1;
const SKILLS_CAP: f64 = 2.0;
const PER_EXPERIENCE: f64 = 0.5;
const EXPERIENCE_CAP: f64 = 3.0;
const EDUCATION_POINTS: f64 = 1.0;
const SUMMARY_POINTS: f64 = 1.0;
const RAW_TEXT_POINTS: f64 = 1.0;
const RAW_TEXT_MIN_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn score(&self, record: &ResumeRecord) -> f64 {
        let mut points = record.personal_info.filled_core_fields() as f64 * PER_CORE_FIELD;
        points += (record.skills.len() as f64 * PER_SKILL).min(SKILLS_CAP);
        points += (record.experience.len() as f64 * PER_EXPERIENCE).min(EXPERIENCE_CAP);
        if !record.education.is_empty() {
            points += EDUCATION_POINTS;
        }
        if !record.summary.trim().is_empty() {
            points += SUMMARY_POINTS;
        }
        if record.raw_text.chars().count() > RAW_TEXT_MIN_CHARS {
            points += RAW_TEXT_POINTS;
        }

        (points / SCALE).min(1.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{Education, Experience};

    #[test]
    fn test_empty_record_scores_zero() {
        let record = ResumeRecord::empty("", Utc::now());
        assert_eq!(ConfidenceScorer.score(&record), 0.0);
    }

    #[test]
    fn test_weights() {
        let mut record = ResumeRecord::empty("short", Utc::now());
        record.personal_info.name = "Jane Doe".to_string();
        record.personal_info.email = "jane@example.com".to_string();
        record.skills = vec!["Rust".to_string(); 5];
        record.experience = vec![Experience::default(); 2];
        record.education = vec![Education::default()];
        // 1.0 + 0.5 + 1.0 + 1.0 = 3.5
        assert!((ConfidenceScorer.score(&record) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_caps_and_upper_bound() {
        let mut record = ResumeRecord::empty(&"x".repeat(200), Utc::now());
        record.personal_info.name = "Jane Doe".to_string();
        record.personal_info.email = "jane@example.com".to_string();
        record.personal_info.phone = "555-123-4567".to_string();
        record.personal_info.location = "Austin, TX".to_string();
        record.skills = vec!["Rust".to_string(); 40];
        record.experience = vec![Experience::default(); 10];
        record.education = vec![Education::default()];
        record.summary = "Engineer.".to_string();
        assert_eq!(ConfidenceScorer.score(&record), 1.0);
    }

    #[test]
    fn test_raw_text_threshold_is_exclusive() {
        let record = ResumeRecord::empty(&"x".repeat(100), Utc::now());
        assert_eq!(ConfidenceScorer.score(&record), 0.0);
        let record = ResumeRecord::empty(&"x".repeat(101), Utc::now());
        assert!((ConfidenceScorer.score(&record) - 0.1).abs() < 1e-9);
    }
}
