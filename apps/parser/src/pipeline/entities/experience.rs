use std::sync::LazyLock;

use regex::Regex;

use crate::models::Experience;
use crate::pipeline::dates::{find_date, find_range, is_date_only_line, residual, DateRange};
use crate::pipeline::entities::{content_lines, is_plausible_entry};
use crate::pipeline::skills::SkillExtractor;
use crate::pipeline::text::{
    is_bullet_line, is_city_state, segments, split_trailing_location, trim_separators, ORG_SUFFIX,
    ROLE,
};

/// Lines scanned for a standalone location.
const LOCATION_SCAN_LINES: usize = 4;
const MAX_SECOND_HEADING_WORDS: usize = 6;
const MAX_SECOND_HEADING_CHARS: usize = 60;

static AT_CONNECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:at|@)\s+").expect("valid regex"));

/// Words allowed in lower case inside a title-case heading line.
const HEADING_CONNECTORS: &[&str] = &["of", "and", "&", "the", "for", "at", "in", "on", "to"];

#[derive(Debug, Default)]
struct Heading {
    title: String,
    company: String,
    location: String,
}

/// Parses one experience entry. `min_chars` is the shortest entry accepted.
pub fn parse_experience(
    entry: &str,
    skills: &SkillExtractor,
    min_chars: usize,
) -> Option<Experience> {
    if !is_plausible_entry(entry, min_chars) {
        return None;
    }
    let mut lines: Vec<String> = content_lines(entry).into_iter().map(str::to_string).collect();
    let mut used = vec![false; lines.len()];

    let dates = take_dates(&mut lines, &mut used);
    let mut location = take_location_line(&lines, &mut used);

    let mut heading = Heading::default();
    if let Some(first) = next_heading_line(&lines, &used, 0) {
        used[first] = true;
        heading = split_heading(&lines[first]);

        let second = first + 1;
        let half_heading = heading.title.is_empty() != heading.company.is_empty();
        if half_heading
            && second < lines.len()
            && !used[second]
            && is_second_heading_line(&lines[second])
        {
            used[second] = true;
            let known = if heading.title.is_empty() {
                std::mem::take(&mut heading.company)
            } else {
                std::mem::take(&mut heading.title)
            };
            let (title, company) = orient(&known, &lines[second]);
            heading.title = title;
            heading.company = company;
        }
    }

    if location.is_empty() {
        location = std::mem::take(&mut heading.location);
    }
    if let Some((company, place)) = split_trailing_location(&heading.company) {
        heading.company = company;
        if location.is_empty() {
            location = place;
        }
    }

    let description = lines
        .iter()
        .zip(&used)
        .filter(|(_, used)| !**used)
        .map(|(line, _)| line.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if heading.title.is_empty() && heading.company.is_empty() && dates.is_empty() {
        return None;
    }

    Some(Experience {
        title: heading.title,
        company: heading.company,
        location,
        start_date: dates.start,
        end_date: if dates.is_current { None } else { dates.end },
        current: dates.is_current,
        skills_used: skills.extract(&description),
        description,
    })
}

/// Finds the first date range anywhere in the entry. A line holding only the
/// dates is consumed; otherwise the dates are cut out of the line. Without a
/// range, a date-only line provides the start date.
fn take_dates(lines: &mut [String], used: &mut [bool]) -> DateRange {
    for i in 0..lines.len() {
        if let Some((range, span)) = find_range(&lines[i]) {
            if is_date_only_line(&lines[i]) {
                used[i] = true;
            } else {
                lines[i] = residual(&lines[i], span);
            }
            return range;
        }
    }
    for i in 0..lines.len() {
        if is_date_only_line(&lines[i]) {
            used[i] = true;
            return DateRange {
                start: find_date(&lines[i]),
                ..DateRange::default()
            };
        }
    }
    DateRange::default()
}

fn take_location_line(lines: &[String], used: &mut [bool]) -> String {
    for i in 0..lines.len().min(LOCATION_SCAN_LINES) {
        if !used[i] && is_location(&lines[i]) {
            used[i] = true;
            return lines[i].trim().to_string();
        }
    }
    String::new()
}

fn is_location(text: &str) -> bool {
    let text = text.trim();
    is_city_state(text) || text.eq_ignore_ascii_case("remote")
}

fn next_heading_line(lines: &[String], used: &[bool], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| !used[i] && !is_bullet_line(&lines[i]))
}

fn split_heading(line: &str) -> Heading {
    let segs = segments(line);
    let location = segs
        .iter()
        .find(|s| is_location(s))
        .map(|s| s.to_string())
        .unwrap_or_default();
    let parts: Vec<&str> = segs.into_iter().filter(|s| !is_location(s)).collect();

    let mut heading = match parts.as_slice() {
        [] => Heading::default(),
        [single] => single_part_heading(single),
        [a, b, ..] => {
            let (title, company) = orient(a, b);
            Heading {
                title,
                company,
                location: String::new(),
            }
        }
    };
    if heading.location.is_empty() {
        heading.location = location;
    }
    heading
}

/// `Title at Company`, `Title, Company Inc`, `Company, Title`, or a lone
/// title/company.
fn single_part_heading(text: &str) -> Heading {
    let text = trim_separators(text);

    if let Some(m) = AT_CONNECTOR.find(text) {
        let (title, company) = (&text[..m.start()], &text[m.end()..]);
        if !title.trim().is_empty() && !company.trim().is_empty() {
            let (company, location) = match split_trailing_location(company) {
                Some((company, location)) => (company, location),
                None => (trim_separators(company).to_string(), String::new()),
            };
            return Heading {
                title: trim_separators(title).to_string(),
                company,
                location,
            };
        }
    }

    let (text, location) = match split_trailing_location(text) {
        Some((head, location)) => (head, location),
        None => (text.to_string(), String::new()),
    };

    if let Some((left, right)) = text.split_once(',') {
        let (left, right) = (trim_separators(left), trim_separators(right));
        let signal = [left, right]
            .iter()
            .any(|s| ROLE.is_match(s) || ORG_SUFFIX.is_match(s));
        if signal && !left.is_empty() && !right.is_empty() {
            let (title, company) = orient(left, right);
            return Heading {
                title,
                company,
                location,
            };
        }
    }

    if ROLE.is_match(&text) || !ORG_SUFFIX.is_match(&text) {
        Heading {
            title: text,
            company: String::new(),
            location,
        }
    } else {
        Heading {
            title: String::new(),
            company: text,
            location,
        }
    }
}

/// Decides which of two heading parts is the title. Role words decide first,
/// organisation suffixes second; otherwise the first part is the title.
fn orient(a: &str, b: &str) -> (String, String) {
    let (a, b) = (trim_separators(a), trim_separators(b));
    let (a_role, b_role) = (ROLE.is_match(a), ROLE.is_match(b));
    let swap = if a_role != b_role {
        b_role
    } else {
        ORG_SUFFIX.is_match(a) && !ORG_SUFFIX.is_match(b)
    };
    if swap {
        (b.to_string(), a.to_string())
    } else {
        (a.to_string(), b.to_string())
    }
}

/// A short title-case line directly below a one-part heading
/// (`Acme Corp` / `Senior Engineer`).
fn is_second_heading_line(line: &str) -> bool {
    let line = line.trim();
    let words: Vec<&str> = line.split_whitespace().collect();
    !line.is_empty()
        && !is_bullet_line(line)
        && line.chars().count() <= MAX_SECOND_HEADING_CHARS
        && words.len() <= MAX_SECOND_HEADING_WORDS
        && !line.ends_with('.')
        && !line.contains(',')
        && words.iter().all(|w| {
            HEADING_CONNECTORS.contains(&w.to_lowercase().as_str())
                || !w.chars().next().is_some_and(char::is_lowercase)
        })
        && segments(line).len() == 1
}
