use std::sync::LazyLock;

use regex::Regex;

use crate::models::Project;
use crate::pipeline::dates::{find_range, residual};
use crate::pipeline::entities::{content_lines, is_plausible_entry};
use crate::pipeline::skills::SkillExtractor;
use crate::pipeline::text::{segments, strip_bullet, trim_separators};

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)>\]|,]+").expect("valid regex"));

/// First line is the name, the rest is the description. Technologies come
/// from the whole entry.
pub fn parse_project(entry: &str, skills: &SkillExtractor, min_chars: usize) -> Option<Project> {
    if !is_plausible_entry(entry, min_chars) {
        return None;
    }
    let lines = content_lines(entry);
    let (head, rest) = lines.split_first()?;

    let url = URL
        .find(entry)
        .map(|m| m.as_str().trim_end_matches(['.', ';', ':', '!', '?']).to_string());

    let mut head = URL.replace_all(strip_bullet(head), "").to_string();
    if let Some((_, span)) = find_range(&head) {
        head = residual(&head, span);
    }
    let parts = segments(&head);
    let name = parts
        .first()
        .map(|p| trim_separators(p).to_string())
        .unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let mut description: Vec<String> = Vec::new();
    let tail = parts
        .iter()
        .skip(1)
        .map(|p| trim_separators(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" | ");
    if !tail.is_empty() {
        description.push(tail);
    }
    description.extend(rest.iter().map(|line| line.to_string()));

    Some(Project {
        name,
        description: description.join("\n"),
        technologies: skills.extract(entry),
        url,
    })
}
