use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Tunables of the parsing pipeline. `Default` reproduces the stock heuristics.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Upper bound on `ResumeRecord::skills` and on per-entry skill lists.
    pub max_skills: usize,
    /// Use the token phrase matcher as the first skill source.
    pub phrase_matching: bool,
    /// Run the record clean-up pass (experience dedup, skill acronyms) before scoring.
    pub postprocess: bool,
    /// Extra vocabulary terms appended to the curated skill list.
    pub extra_skills: Vec<String>,
    /// Lines at or above this length are never section headers.
    pub header_max_len: usize,
    /// A single-paragraph section body needs more non-empty lines than this
    /// before the date-anchored entry splitter is tried.
    pub fallback_min_lines: usize,
    pub min_experience_chars: usize,
    pub min_education_chars: usize,
    pub min_project_chars: usize,
    pub min_certification_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_skills: 20,
            phrase_matching: true,
            postprocess: true,
            extra_skills: vec![],
            header_max_len: 60,
            fallback_min_lines: 4,
            min_experience_chars: 20,
            min_education_chars: 10,
            min_project_chars: 10,
            min_certification_chars: 5,
        }
    }
}

/// Process configuration for the `resume-parser` binary, loaded from
/// environment variables (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    pub pretty_output: bool,
    pub skills_file: Option<PathBuf>,
    pub parser: ParserConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if let Some(path) = &config.skills_file {
            config.parser.extra_skills = load_skill_terms(path)?;
        }
        Ok(config)
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ParserConfig::default();

        let max_skills = match lookup("RESUME_MAX_SKILLS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("RESUME_MAX_SKILLS must be a non-negative integer")?,
            None => defaults.max_skills,
        };

        Ok(Config {
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            pretty_output: parse_flag("RESUME_PRETTY_OUTPUT", lookup("RESUME_PRETTY_OUTPUT"), true)?,
            skills_file: lookup("RESUME_SKILLS_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            parser: ParserConfig {
                max_skills,
                phrase_matching: parse_flag(
                    "RESUME_PHRASE_MATCHING",
                    lookup("RESUME_PHRASE_MATCHING"),
                    defaults.phrase_matching,
                )?,
                postprocess: parse_flag(
                    "RESUME_POSTPROCESS",
                    lookup("RESUME_POSTPROCESS"),
                    defaults.postprocess,
                )?,
                ..defaults
            },
        })
    }
}

fn parse_flag(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean (true/false), got '{other}'"),
    }
}

/// Reads newline-separated vocabulary terms; blank lines and `#` comments are skipped.
pub fn load_skill_terms(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read skills file '{}'", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
