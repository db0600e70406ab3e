use std::sync::LazyLock;

use regex::Regex;

use crate::models::Education;
use crate::pipeline::dates::{
    find_date, find_date_span, find_range, is_date_only_line, residual,
};
use crate::pipeline::entities::{content_lines, is_plausible_entry};
use crate::pipeline::text::{
    find_location, is_bullet_line, is_city_state, split_trailing_location, strip_bullet,
    trim_separators,
};

const MAX_SCHOOL_LINE_CHARS: usize = 80;
const MAX_GPA: f64 = 10.0;
const NAME_CONNECTORS: &[&str] = &["of", "the", "and", "at", "de", "la", "du", "für"];

static DEGREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<degree>(?:bachelor|master|doctor|associate)(?:'?s)?(?:[ \t]+of[ \t]+(?:applied[ \t]+science|science|arts|fine[ \t]+arts|engineering|business[ \t]+administration|technology|laws|education|philosophy|commerce))?|ph\.?[ \t]?d\.?|doctorate|certificate|diploma)(?:[ \t]+degree)?(?:[ \t]*(?:\bin\b|\bof\b|,|[-–])[ \t]*(?P<field>[^,|(\n]+))?",
    )
    .expect("valid regex")
});

/// Abbreviated degrees only count at the start of a line (`BS in ...`, `MBA`).
static DEGREE_ABBREVIATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<degree>B\.?S\.?c?|B\.?A\.?|B\.?E\.?|B\.?Tech|M\.?S\.?c?|M\.?A\.?|M\.?Eng|M\.?Tech|MBA|Ph\.?D\.?|A\.?A\.?|A\.?S\.?)(?:\b|\.|$)(?:[ \t]*(?:in\b|of\b|,|[-–])?[ \t]*(?P<field>[^,|(\n]*))?",
    )
    .expect("valid regex")
});

static SCHOOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:[A-Z][\w&.'-]*[ \t]+)*(?:University|College|Institute|School|Academy|Polytechnic)(?:[ \t]+of(?:[ \t]+[A-Z][\w&.'-]*)+)?",
    )
    .expect("valid regex")
});

static GPA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bGPA\b[ \t]*:?[ \t]*(\d{1,2}(?:\.\d{1,3})?)").expect("valid regex")
});

static HONORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:honou?rs?|cum[ \t]+laude|dean'?s[ \t]+list|scholarship|valedictorian|salutatorian|distinction|award(?:ed)?)\b",
    )
    .expect("valid regex")
});

static HONORS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:honou?rs|awards)[ \t]*:[ \t]*").expect("valid regex")
});

/// Cut points that end a field of study.
static FIELD_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s[-–—|]\s|\bGPA\b|\(|\b(?:19|20)\d{2}\b|\b(?:expected|graduated)\b")
        .expect("valid regex")
});

/// Parses one education entry. At least a degree, a school or a date must be
/// found for the entry to count.
pub fn parse_education(entry: &str, min_chars: usize) -> Option<Education> {
    if !is_plausible_entry(entry, min_chars) {
        return None;
    }
    let lines = content_lines(entry);

    let mut degree_line = None;
    let mut degree = String::new();
    let mut field_of_study = String::new();
    let mut degree_tail = String::new();
    for (i, line) in lines.iter().enumerate() {
        let text = strip_bullet(line);
        let caps = DEGREE
            .captures(text)
            .or_else(|| DEGREE_ABBREVIATION.captures(text));
        if let Some(caps) = caps {
            degree = caps["degree"].trim().to_string();
            degree_tail = match caps.name("field") {
                Some(m) => {
                    field_of_study = clean_field(m.as_str());
                    text[m.start() + field_cut(m.as_str())..].to_string()
                }
                None => caps.get(0).map_or("", |m| &text[m.end()..]).to_string(),
            };
            degree_line = Some(i);
            break;
        }
    }

    let gpa = GPA
        .captures(entry)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|gpa| (0.0..=MAX_GPA).contains(gpa));

    let honors: Vec<String> = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| Some(*i) != degree_line && HONORS.is_match(line))
        .map(|(_, line)| HONORS_LABEL.replace(strip_bullet(line), "").trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    let school = lines
        .iter()
        .find_map(|line| SCHOOL.find(line).map(|m| m.as_str().trim().to_string()))
        .or_else(|| school_after_degree(&degree_tail))
        .or_else(|| fallback_school(&lines, degree_line))
        .unwrap_or_default();

    let location = lines
        .iter()
        .find_map(|line| {
            find_location(line, false)
                .or_else(|| split_trailing_location(line).map(|(_, location)| location))
        })
        .unwrap_or_default();

    let (start_date, end_date) = match lines.iter().find_map(|line| find_range(line)) {
        Some((range, _)) => (range.start, range.end),
        None => (None, lines.iter().find_map(|line| find_date(line))),
    };

    if degree.is_empty() && school.is_empty() && start_date.is_none() && end_date.is_none() {
        return None;
    }

    Some(Education {
        degree,
        field_of_study,
        school,
        location,
        start_date,
        end_date,
        gpa,
        honors,
    })
}

fn field_cut(raw: &str) -> usize {
    FIELD_END.find(raw).map_or(raw.len(), |m| m.start())
}

fn clean_field(raw: &str) -> String {
    trim_separators(&raw[..field_cut(raw)]).to_string()
}

/// `BS in CS, MIT 2019` -> `MIT`: whatever follows the field on the degree
/// line, minus dates and a trailing location.
fn school_after_degree(tail: &str) -> Option<String> {
    let span = find_range(tail)
        .map(|(_, span)| span)
        .or_else(|| find_date_span(tail));
    let tail = match span {
        Some(span) => residual(tail, span),
        None => tail.to_string(),
    };
    let tail = match split_trailing_location(&tail) {
        Some((school, _)) => school,
        None => tail,
    };
    let school = trim_separators(&tail);
    let accepted = !school.is_empty()
        && !GPA.is_match(school)
        && !HONORS.is_match(school)
        && !is_city_state(school)
        && school.chars().count() <= MAX_SCHOOL_LINE_CHARS
        && is_name_like(school);
    accepted.then(|| school.to_string())
}

/// A plain short line such as `MIT` when no institution keyword was found.
fn fallback_school(lines: &[&str], degree_line: Option<usize>) -> Option<String> {
    lines
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != degree_line)
        .map(|(_, line)| *line)
        .find(|line| {
            !is_bullet_line(line)
                && !is_date_only_line(line)
                && !GPA.is_match(line)
                && !HONORS.is_match(line)
                && !is_city_state(line)
                && !line.ends_with('.')
                && line.chars().count() <= MAX_SCHOOL_LINE_CHARS
                && is_name_like(line)
        })
        .map(|line| {
            let line = match find_date_span(line) {
                Some(span) => residual(line, span),
                None => line.to_string(),
            };
            match split_trailing_location(&line) {
                Some((school, _)) => school,
                None => trim_separators(&line).to_string(),
            }
        })
        .filter(|school| !school.is_empty())
}

/// Capitalised words, allowing lower-case connectors (`Georgia Tech`,
/// `Ecole de Commerce`).
fn is_name_like(line: &str) -> bool {
    let mut words = line.split_whitespace();
    let starts_upper = words
        .next()
        .and_then(|w| w.chars().next())
        .is_some_and(char::is_uppercase);
    starts_upper
        && words.all(|w| {
            NAME_CONNECTORS.contains(&w)
                || !w.chars().next().is_some_and(char::is_lowercase)
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_degree_with_bare_school_line() {
        let edu = parse_education("Bachelor of Science\nMIT\n2016-2020", 10).unwrap();
        assert_eq!(edu.degree, "Bachelor of Science");
        assert_eq!(edu.school, "MIT");
        assert_eq!(edu.start_date, ymd(2016, 1, 1));
        assert_eq!(edu.end_date, ymd(2020, 1, 1));
    }

    #[test]
    fn test_full_entry() {
        let entry = "Master of Science in Computer Science, GPA: 3.9\nStanford University, Stanford, CA\nSep 2018 - Jun 2020\nDean's List";
        let edu = parse_education(entry, 10).unwrap();
        assert_eq!(edu.degree, "Master of Science");
        assert_eq!(edu.field_of_study, "Computer Science");
        assert_eq!(edu.school, "Stanford University");
        assert_eq!(edu.location, "Stanford, CA");
        assert_eq!(edu.gpa, Some(3.9));
        assert_eq!(edu.honors, vec!["Dean's List"]);
        assert_eq!(edu.start_date, ymd(2018, 9, 1));
        assert_eq!(edu.end_date, ymd(2020, 6, 1));
    }

    #[test]
    fn test_abbreviated_degree_and_single_graduation_date() {
        let edu = parse_education("BS in Mathematics - University of Texas at Austin\nMay 2015", 10).unwrap();
        assert_eq!(edu.degree, "BS");
        assert_eq!(edu.field_of_study, "Mathematics");
        assert_eq!(edu.school, "University of Texas");
        assert_eq!(edu.start_date, None);
        assert_eq!(edu.end_date, ymd(2015, 5, 1));
    }

    #[test]
    fn test_school_before_degree() {
        let edu = parse_education("Georgia Institute of Technology\nPhD, Robotics (2021)", 10).unwrap();
        assert_eq!(edu.school, "Georgia Institute of Technology");
        assert_eq!(edu.degree, "PhD");
        assert_eq!(edu.field_of_study, "Robotics");
        assert_eq!(edu.end_date, ymd(2021, 1, 1));
    }

    #[test]
    fn test_honours_label_is_stripped() {
        let edu = parse_education("BA, Economics\nOberlin College\nHonors: magna cum laude", 10).unwrap();
        assert_eq!(edu.honors, vec!["magna cum laude"]);
        assert_eq!(edu.school, "Oberlin College");
    }

    #[test]
    fn test_school_on_degree_line_after_field() {
        let edu = parse_education("BS in CS, MIT 2019", 10).unwrap();
        assert_eq!(edu.degree, "BS");
        assert_eq!(edu.field_of_study, "CS");
        assert_eq!(edu.school, "MIT");
        assert_eq!(edu.end_date, ymd(2019, 1, 1));

        let edu = parse_education("MBA, Finance, Kellogg\nChicago, IL", 10).unwrap();
        assert_eq!(edu.school, "Kellogg");
        assert_eq!(edu.location, "Chicago, IL");
    }

    #[test]
    fn test_degree_line_tail_skips_gpa_and_honours() {
        let edu = parse_education("BS, Computer Science, Summa Cum Laude\n2019", 10).unwrap();
        assert_eq!(edu.school, "");
        assert_eq!(edu.field_of_study, "Computer Science");
    }

    #[test]
    fn test_entry_without_any_signal_is_rejected() {
        assert!(parse_education("enjoyed the campus life a lot", 10).is_none());
        assert!(parse_education("EDU", 10).is_none());
    }
}
