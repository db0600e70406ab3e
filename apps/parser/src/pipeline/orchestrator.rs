use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::models::{Certification, Education, Experience, Project, ResumeRecord};
use crate::pipeline::capabilities::{
    NameTagger, NoopNameTagger, NoopPhraseMatcher, PhraseMatcher, TokenPhraseMatcher,
};
use crate::pipeline::confidence::ConfidenceScorer;
use crate::pipeline::entities::{
    parse_certification, parse_education, parse_experience, parse_project,
    split_certification_entries,
};
use crate::pipeline::entries::{merge_bullet_continuations, EntryDelimiter};
use crate::pipeline::normalize::normalize;
use crate::pipeline::personal::PersonalInfoExtractor;
use crate::pipeline::postprocess::postprocess;
use crate::pipeline::sections::{Section, SectionKind, SectionSegmenter};
use crate::pipeline::skills::SkillExtractor;
use crate::pipeline::stage::{contained, try_stage};
use crate::pipeline::summary::{extract_languages, extract_summary};
use crate::pipeline::vocabulary::Vocabulary;

/// Normalize → Segment → per-section extraction → Assemble + Score.
///
/// Built once and shared; `parse` takes `&self` and holds no mutable state,
/// so one pipeline can serve concurrent callers.
pub struct ResumeParsingPipeline {
    config: ParserConfig,
    segmenter: SectionSegmenter,
    delimiter: EntryDelimiter,
    personal: PersonalInfoExtractor,
    skills: SkillExtractor,
    scorer: ConfidenceScorer,
}

impl Default for ResumeParsingPipeline {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl ResumeParsingPipeline {
    /// Pipeline with the built-in capabilities: no name tagger, and the token
    /// phrase matcher when `phrase_matching` is on.
    pub fn new(config: ParserConfig) -> Self {
        let phrase_matcher: Arc<dyn PhraseMatcher> = if config.phrase_matching {
            Arc::new(TokenPhraseMatcher)
        } else {
            Arc::new(NoopPhraseMatcher)
        };
        Self::with_capabilities(config, Arc::new(NoopNameTagger), phrase_matcher)
    }

    pub fn with_capabilities(
        config: ParserConfig,
        name_tagger: Arc<dyn NameTagger>,
        phrase_matcher: Arc<dyn PhraseMatcher>,
    ) -> Self {
        let vocabulary = Arc::new(Vocabulary::curated().with_extra(&config.extra_skills));
        debug!("Skill vocabulary ready ({} terms)", vocabulary.len());

        Self {
            segmenter: SectionSegmenter::new(config.header_max_len),
            delimiter: EntryDelimiter::new(config.fallback_min_lines),
            personal: PersonalInfoExtractor::new(name_tagger),
            skills: SkillExtractor::new(vocabulary, phrase_matcher, config.max_skills),
            scorer: ConfidenceScorer,
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one résumé text. Never fails: blank input gives an empty record
    /// with a zero score, and a failing stage contributes an empty result.
    pub fn parse(&self, raw_text: &str) -> ResumeRecord {
        let parsed_at = Utc::now();
        if raw_text.trim().is_empty() {
            debug!("Blank input, returning empty record");
            return ResumeRecord::empty(raw_text, parsed_at);
        }

        let text = contained("normalize", || normalize(raw_text));
        let sections = contained("segment", || self.segmenter.segment(&text));
        debug!(
            "Segmented {} chars into {} sections: {:?}",
            text.len(),
            sections.len(),
            sections.iter().map(|s| s.kind).collect::<Vec<_>>()
        );

        let mut record = ResumeRecord {
            personal_info: contained("personal_info", || self.personal.extract(&text)),
            summary: contained("summary", || extract_summary(&sections)),
            experience: contained("experience", || self.experience(&sections)),
            education: contained("education", || self.education(&sections)),
            certifications: contained("certifications", || self.certifications(&sections)),
            skills: contained("skills", || self.skills.extract(&text)),
            languages: contained("languages", || extract_languages(&sections, &text)),
            projects: contained("projects", || self.projects(&sections)),
            raw_text: raw_text.to_string(),
            confidence_score: 0.0,
            parsed_at,
        };

        if self.config.postprocess {
            let cleaned = try_stage("postprocess", || {
                let mut cleaned = record.clone();
                postprocess(&mut cleaned);
                cleaned
            });
            if let Some(cleaned) = cleaned {
                record = cleaned;
            }
        }

        record.confidence_score = self.scorer.score(&record);
        info!(
            "Parsed resume: {} experience, {} education, {} skills, confidence {:.2}",
            record.experience.len(),
            record.education.len(),
            record.skills.len(),
            record.confidence_score
        );
        record
    }

    fn experience(&self, sections: &[Section]) -> Vec<Experience> {
        let entries = merge_bullet_continuations(self.entries(sections, SectionKind::Experience));
        parse_each("experience entry", entries, |entry| {
            parse_experience(entry, &self.skills, self.config.min_experience_chars)
        })
    }

    fn education(&self, sections: &[Section]) -> Vec<Education> {
        parse_each(
            "education entry",
            self.entries(sections, SectionKind::Education),
            |entry| parse_education(entry, self.config.min_education_chars),
        )
    }

    fn certifications(&self, sections: &[Section]) -> Vec<Certification> {
        let entries = bodies(sections, SectionKind::Certifications)
            .flat_map(split_certification_entries)
            .collect();
        parse_each("certification entry", entries, |entry| {
            parse_certification(entry, self.config.min_certification_chars)
        })
    }

    fn projects(&self, sections: &[Section]) -> Vec<Project> {
        parse_each(
            "project entry",
            self.entries(sections, SectionKind::Projects),
            |entry| parse_project(entry, &self.skills, self.config.min_project_chars),
        )
    }

    /// Entries of every section of `kind`, in document order.
    fn entries(&self, sections: &[Section], kind: SectionKind) -> Vec<String> {
        bodies(sections, kind)
            .flat_map(|body| self.delimiter.split_entries(body))
            .collect()
    }
}

fn bodies(sections: &[Section], kind: SectionKind) -> impl Iterator<Item = &str> {
    sections
        .iter()
        .filter(move |s| s.kind == kind)
        .map(|s| s.body.as_str())
}

/// Parses entries one by one; an entry that panics or fails validation is
/// dropped without affecting its siblings.
fn parse_each<T>(
    stage: &str,
    entries: Vec<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| try_stage(stage, || parse(entry.as_str())).flatten())
        .collect()
}
