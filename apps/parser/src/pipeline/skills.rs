//! SkillExtractor — merges three skill sources into one capped, de-duplicated list.
//!
//! 1. phrase matcher over the vocabulary (optional capability)
//! 2. boundary-aware vocabulary scan (always on)
//! 3. tokens of an explicit `Skills:` / `Technical Skills:` / `Technologies:` block
//!
//! Vocabulary hits come before free-text tokens; first spelling seen wins.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::pipeline::capabilities::PhraseMatcher;
use crate::pipeline::sections::SectionSegmenter;
use crate::pipeline::stage::contained;
use crate::pipeline::text::strip_bullet;
use crate::pipeline::vocabulary::Vocabulary;

/// Free-text tokens longer than this are prose, not skills.
const MAX_TOKEN_CHARS: usize = 60;

static SKILL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:technical[ \t]+skills|core[ \t]+skills|key[ \t]+skills|skills(?:[ \t]*(?:&|and)[ \t]*(?:tools|technologies|competencies))?|technologies(?:[ \t]+used)?|tech[ \t]+stack)[ \t]*(?::[ \t]*(.*))?$",
    )
    .expect("valid regex")
});

/// `Frameworks: React, Vue` inside a skills block.
static SUB_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z /&+-]{1,30}:\s*").expect("valid regex")
});

static SKILL_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|•·▪●\n()]").expect("valid regex"));

pub struct SkillExtractor {
    vocabulary: Arc<Vocabulary>,
    phrase_matcher: Arc<dyn PhraseMatcher>,
    max_skills: usize,
}

impl SkillExtractor {
    pub fn new(
        vocabulary: Arc<Vocabulary>,
        phrase_matcher: Arc<dyn PhraseMatcher>,
        max_skills: usize,
    ) -> Self {
        Self {
            vocabulary,
            phrase_matcher,
            max_skills,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn max_skills(&self) -> usize {
        self.max_skills
    }

    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![];
        }
        let mut skills = SkillList::new(self.max_skills);

        skills.extend(contained("phrase_matcher", || {
            self.phrase_matcher.match_phrases(text, &self.vocabulary)
        }));
        skills.extend(self.vocabulary.scan(text));
        skills.extend(labelled_skill_tokens(text).into_iter().map(|token| {
            self.vocabulary
                .canonical(&token)
                .map(str::to_string)
                .unwrap_or(token)
        }));

        skills.into_vec()
    }
}

/// Insertion-ordered, case-insensitively unique, capped.
struct SkillList {
    items: Vec<String>,
    seen: HashSet<String>,
    cap: usize,
}

impl SkillList {
    fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    fn push(&mut self, skill: String) {
        if self.items.len() >= self.cap {
            return;
        }
        if self.seen.insert(skill.to_lowercase()) {
            self.items.push(skill);
        }
    }

    fn extend<I: IntoIterator<Item = String>>(&mut self, skills: I) {
        for skill in skills {
            self.push(skill);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Tokens from every labelled skills block. A block is the label line's
/// inline content plus the following lines up to a blank line or a header.
fn labelled_skill_tokens(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = SKILL_LABEL.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let mut block: Vec<&str> = caps.get(1).map(|m| m.as_str()).into_iter().collect();
        let mut j = i + 1;
        while j < lines.len() && !ends_block(lines[j]) {
            block.push(lines[j]);
            j += 1;
        }
        for line in block {
            tokenize_skill_line(line, &mut tokens);
        }
        i = j;
    }
    tokens
}

fn ends_block(line: &str) -> bool {
    line.is_empty() || SKILL_LABEL.is_match(line) || SectionSegmenter::default().is_header(line)
}

fn tokenize_skill_line(line: &str, tokens: &mut Vec<String>) {
    let line = strip_bullet(line);
    let line = SUB_LABEL.replace(line, "");
    for part in SKILL_SEPARATOR.split(&line) {
        let token = strip_bullet(part)
            .trim_end_matches('.')
            .trim_start_matches("and ")
            .trim();
        let len = token.chars().count();
        if len > 1 && len <= MAX_TOKEN_CHARS {
            tokens.push(token.to_string());
        }
    }
}
