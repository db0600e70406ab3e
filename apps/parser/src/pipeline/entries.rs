//! EntryDelimiter — splits a section body into one string per record.
//!
//! Primary strategy is blank-line grouping. When that finds at most one
//! group in a long body (paragraph breaks lost in extraction), date lines
//! anchor the entries instead. If neither works the whole body is one entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::dates::{find_range, has_date_token, is_date_line, residual};
use crate::pipeline::text::{is_bullet_line, letter_count};

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));

/// Heading lines pulled in front of a date line belong to the next entry.
const MAX_HEADING_LOOKBACK: usize = 2;
const MAX_HEADING_CHARS: usize = 80;

pub struct EntryDelimiter {
    fallback_min_lines: usize,
}

impl Default for EntryDelimiter {
    fn default() -> Self {
        Self::new(4)
    }
}

impl EntryDelimiter {
    pub fn new(fallback_min_lines: usize) -> Self {
        Self { fallback_min_lines }
    }

    pub fn split_entries(&self, body: &str) -> Vec<String> {
        let body = body.trim();
        if body.is_empty() {
            return vec![];
        }

        let paragraphs: Vec<String> = BLANK_LINES
            .split(body)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if paragraphs.len() > 1 {
            return paragraphs;
        }

        let line_count = body.lines().filter(|l| !l.trim().is_empty()).count();
        if line_count > self.fallback_min_lines {
            let anchored = split_on_date_lines(body);
            if anchored.len() > 1 {
                return anchored;
            }
        }
        vec![body.to_string()]
    }
}

/// Re-attaches paragraphs made only of bullets to the dated entry before them
/// (a job whose bullet list was separated from its heading by a blank line).
pub fn merge_bullet_continuations(entries: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let bullets_only = !has_date_token(&entry)
            && entry
                .lines()
                .filter(|l| !l.trim().is_empty())
                .all(is_bullet_line);
        match merged.last_mut() {
            Some(previous) if bullets_only && has_date_token(previous) => {
                previous.push('\n');
                previous.push_str(&entry);
            }
            _ => merged.push(entry),
        }
    }
    merged
}

fn split_on_date_lines(body: &str) -> Vec<String> {
    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let date_lines: Vec<usize> = (0..lines.len()).filter(|&i| is_date_line(lines[i])).collect();
    if date_lines.len() < 2 {
        return vec![];
    }

    // Dates printed above the heading: every date line opens an entry.
    let date_first = date_lines[0] == 0;

    let mut starts = vec![0];
    for pair in date_lines.windows(2) {
        let (previous_date, date) = (pair[0], pair[1]);
        let start = if date_first || is_self_headed(lines[date]) {
            date
        } else {
            heading_start(&lines, previous_date + 1, date)
        };
        starts.push(start);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(lines.len());
            lines[start..end].join("\n")
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Walks back from a date line over heading-like lines, never past `floor`.
fn heading_start(lines: &[&str], floor: usize, date: usize) -> usize {
    let mut start = date;
    while start > floor && date - start < MAX_HEADING_LOOKBACK && is_heading_like(lines[start - 1]) {
        start -= 1;
    }
    start
}

/// A date line that also carries the title or company.
fn is_self_headed(line: &str) -> bool {
    find_range(line).is_some_and(|(_, span)| letter_count(&residual(line, span)) >= 3)
}

fn is_heading_like(line: &str) -> bool {
    !is_bullet_line(line)
        && !line.ends_with('.')
        && line.chars().count() <= MAX_HEADING_CHARS
        && !is_date_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLUED: &str = "Senior Engineer - Acme Corp\nJan 2020 - Present\nBuilt payment APIs in Rust.\nSoftware Developer - Beta Inc\nJun 2017 - Dec 2019\nMaintained the billing system.";

    #[test]
    fn test_blank_line_split() {
        let body = "Engineer - Acme\nJan 2020 - Present\n\n\nDeveloper - Beta\n2017 - 2019";
        let entries = EntryDelimiter::default().split_entries(body);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], "Developer - Beta\n2017 - 2019");
    }

    #[test]
    fn test_empty_body_has_no_entries() {
        assert!(EntryDelimiter::default().split_entries("  \n ").is_empty());
    }

    #[test]
    fn test_short_body_is_single_entry() {
        let body = "Engineer - Acme\nJan 2020 - Present\nBuilt things.";
        assert_eq!(EntryDelimiter::default().split_entries(body), vec![body.to_string()]);
    }

    #[test]
    fn test_date_anchored_fallback_pulls_heading_forward() {
        let entries = EntryDelimiter::default().split_entries(GLUED);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            "Senior Engineer - Acme Corp\nJan 2020 - Present\nBuilt payment APIs in Rust."
        );
        assert_eq!(
            entries[1],
            "Software Developer - Beta Inc\nJun 2017 - Dec 2019\nMaintained the billing system."
        );
    }

    #[test]
    fn test_date_first_layout() {
        let body = "Jan 2020 - Present\nEngineer - Acme\nBuilt things.\nJun 2017 - Dec 2019\nDeveloper - Beta\nWrote code.";
        let entries = EntryDelimiter::default().split_entries(body);
        assert_eq!(entries.len(), 2);
        assert!(entries[1].starts_with("Jun 2017 - Dec 2019"));
    }

    #[test]
    fn test_self_headed_date_lines() {
        let body = "Engineer, Acme | 2020 - Present\nBuilt APIs\nShipped features\nDeveloper, Beta | 2017 - 2019\nWrote code\nFixed bugs";
        let entries = EntryDelimiter::default().split_entries(body);
        assert_eq!(entries.len(), 2);
        assert!(entries[1].starts_with("Developer, Beta"));
    }

    #[test]
    fn test_long_body_without_dates_stays_whole() {
        let body = "line one\nline two\nline three\nline four\nline five\nline six";
        assert_eq!(EntryDelimiter::default().split_entries(body).len(), 1);
    }

    #[test]
    fn test_merge_bullet_continuations() {
        let entries = vec![
            "Engineer - Acme\nJan 2020 - Present".to_string(),
            "• Built APIs\n• Led migrations".to_string(),
            "Developer - Beta\n2017 - 2019".to_string(),
        ];
        let merged = merge_bullet_continuations(entries);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].ends_with("• Led migrations"));
    }
}
