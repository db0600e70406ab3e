//! DateRangeParser — turns résumé date expressions ("Aug 2024", "03/2021",
//! "2016-2020", "Jan 2020 – Present") into calendar dates.
//!
//! Nothing here fails: an unparsable token is simply an absent date.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::pipeline::text::{letter_count, trim_separators};

/// Month names and abbreviations, without anchors.
pub(crate) const MONTH_NAME: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const YEAR: &str = r"(?:19|20)\d{2}";

/// Widest range residual (text left on a line once the range is cut out)
/// for the line to still count as a date line.
const MAX_RANGE_LINE_RESIDUAL: usize = 60;

static DATE_TOKEN: LazyLock<String> =
    LazyLock::new(|| format!(r"(?:{MONTH_NAME}\.?,?\s+{YEAR}|\d{{1,2}}/{YEAR}|{YEAR})"));

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let token = DATE_TOKEN.as_str();
    Regex::new(&format!(
        r"(?i)\b(?P<start>{token})(?:\s*[-–—‒−―]\s*|\s+(?:to|until|through)\s+)(?P<end>{token}|present|current|now)\b"
    ))
    .expect("valid date range regex")
});

static SINGLE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?:{MONTH_NAME}\.?,?\s+(?:\d{{1,2}}(?:st|nd|rd|th)?,?\s+)?{YEAR}|\d{{1,2}}/(?:\d{{1,2}}/)?{YEAR}|{YEAR}(?:-\d{{2}}(?:-\d{{2}})?)?)\b"
    ))
    .expect("valid single date regex")
});

static CURRENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:present|current|now)$").expect("valid regex"));

static SEPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsept\b").expect("valid regex"));

static ORDINAL_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("valid regex"));

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH_NAME})\s+(?:(\d{{1,2}})\s+)?({YEAR})\b"
    ))
    .expect("valid regex")
});

static NUMERIC_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(\d{{1,2}})[/.-]({YEAR})\b")).expect("valid regex")
});

static NUMERIC_YEAR_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({YEAR})[/.-](\d{{1,2}})\b")).expect("valid regex")
});

static BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b({YEAR})\b")).expect("valid regex"));

/// How a strict format is completed into a full calendar date.
#[derive(Clone, Copy)]
enum Anchor {
    /// Format already carries a day.
    Exact,
    /// Month and year only; anchored to the 1st.
    FirstOfMonth,
    /// Year only; anchored to January 1st.
    FirstOfYear,
}

/// Tried in order; the first format that parses wins.
const STRICT_FORMATS: &[(&str, Anchor)] = &[
    ("%B %Y", Anchor::FirstOfMonth),
    ("%b %Y", Anchor::FirstOfMonth),
    ("%m/%Y", Anchor::FirstOfMonth),
    ("%Y-%m", Anchor::FirstOfMonth),
    ("%Y", Anchor::FirstOfYear),
    ("%B %d, %Y", Anchor::Exact),
    ("%b %d, %Y", Anchor::Exact),
    ("%B %d %Y", Anchor::Exact),
    ("%m/%d/%Y", Anchor::Exact),
    ("%Y-%m-%d", Anchor::Exact),
    ("%d %B %Y", Anchor::Exact),
];

/// Start, end and whether the range is open-ended ("present").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub is_current: bool,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && !self.is_current
    }
}

/// Parses a single date token. Missing days anchor to the 1st, missing
/// months to January.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let token = token
        .trim()
        .trim_matches(|c: char| matches!(c, ',' | '.' | '(' | ')' | '[' | ']'))
        .trim();
    if token.is_empty() {
        return None;
    }

    parse_strict(token)
        .or_else(|| {
            let cleaned = clean_token(token);
            parse_strict(&cleaned).or_else(|| parse_permissive(&cleaned))
        })
        .or_else(|| parse_bare_year(token))
}

/// Finds the first date range in `text`.
pub fn parse_range(text: &str) -> DateRange {
    find_range(text).map(|(range, _)| range).unwrap_or_default()
}

/// Like [`parse_range`] but also returns the byte span of the match so callers
/// can cut the dates out of a heading line.
pub fn find_range(text: &str) -> Option<(DateRange, Range<usize>)> {
    let caps = RANGE.captures(text)?;
    let span = caps.get(0)?.range();
    let start = parse_date(&caps["start"]);
    let end_token = caps["end"].trim();

    let range = if CURRENT_MARKER.is_match(end_token) {
        DateRange {
            start,
            end: None,
            is_current: true,
        }
    } else {
        DateRange {
            start,
            end: parse_date(end_token),
            is_current: false,
        }
    };
    Some((range, span))
}

/// First standalone date in `text` (month/year, numeric, or a bare year).
pub fn find_date(text: &str) -> Option<NaiveDate> {
    find_date_span(text).and_then(|span| parse_date(&text[span]))
}

pub fn find_date_span(text: &str) -> Option<Range<usize>> {
    SINGLE_DATE.find(text).map(|m| m.range())
}

pub fn has_date_token(text: &str) -> bool {
    SINGLE_DATE.is_match(text)
}

/// A line that anchors an entry: it carries a date range (possibly next to a
/// title or company), or it is nothing but a single date.
pub fn is_date_line(line: &str) -> bool {
    if let Some((_, span)) = find_range(line) {
        return residual(line, span).chars().count() <= MAX_RANGE_LINE_RESIDUAL;
    }
    is_date_only_line(line)
}

/// A line whose only content is a date or date range.
pub fn is_date_only_line(line: &str) -> bool {
    let span = match find_range(line) {
        Some((_, span)) => span,
        None => match find_date_span(line) {
            Some(span) => span,
            None => return false,
        },
    };
    letter_count(&residual(line, span)) < 3
}

/// The line with `span` removed and separator punctuation trimmed.
pub fn residual(line: &str, span: Range<usize>) -> String {
    let before = trim_separators(&line[..span.start]);
    let after = trim_separators(&line[span.end..]);
    match (before.is_empty(), after.is_empty()) {
        (true, true) => String::new(),
        (false, true) => before.to_string(),
        (true, false) => after.to_string(),
        (false, false) => format!("{before} {after}"),
    }
}

fn parse_strict(token: &str) -> Option<NaiveDate> {
    STRICT_FORMATS.iter().find_map(|(format, anchor)| match anchor {
        Anchor::Exact => NaiveDate::parse_from_str(token, format).ok(),
        Anchor::FirstOfMonth => {
            NaiveDate::parse_from_str(&format!("01 {token}"), &format!("%d {format}")).ok()
        }
        Anchor::FirstOfYear => {
            if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
                parse_bare_year(token)
            } else {
                None
            }
        }
    })
    .filter(|date| plausible_year(date))
}

/// Drops punctuation, ordinal suffixes and the four-letter "Sept".
fn clean_token(token: &str) -> String {
    let token = SEPT.replace_all(token, "Sep");
    let token = ORDINAL_DAY.replace_all(&token, "$1");
    token
        .replace(['.', ','], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulls a month/year out of noisier text, defaulting the day to the 1st.
fn parse_permissive(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = MONTH_DAY_YEAR.captures(text) {
        let month = month_number(&caps[1])?;
        let year: i32 = caps[3].parse().ok()?;
        let day: u32 = caps
            .get(2)
            .and_then(|d| d.as_str().parse().ok())
            .unwrap_or(1);
        return NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, 1));
    }
    if let Some(caps) = NUMERIC_MONTH_YEAR.captures(text) {
        let month: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
            return Some(date);
        }
    }
    if let Some(caps) = NUMERIC_YEAR_MONTH.captures(text) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
            return Some(date);
        }
    }
    None
}

fn parse_bare_year(text: &str) -> Option<NaiveDate> {
    let caps = BARE_YEAR.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

fn plausible_year(date: &NaiveDate) -> bool {
    use chrono::Datelike;
    (1900..=2099).contains(&date.year())
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_month_year_forms() {
        assert_eq!(parse_date("January 2020"), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_date("Aug 2024"), Some(ymd(2024, 8, 1)));
        assert_eq!(parse_date("aug 2024"), Some(ymd(2024, 8, 1)));
        assert_eq!(parse_date("Sept. 2019"), Some(ymd(2019, 9, 1)));
        assert_eq!(parse_date("03/2021"), Some(ymd(2021, 3, 1)));
        assert_eq!(parse_date("2019-07"), Some(ymd(2019, 7, 1)));
    }

    #[test]
    fn test_parse_date_full_dates() {
        assert_eq!(parse_date("March 5, 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date("Mar 5, 2021"), Some(ymd(2021, 3, 5)));
        assert_eq!(parse_date("12/31/2019"), Some(ymd(2019, 12, 31)));
        assert_eq!(parse_date("2018-06-15"), Some(ymd(2018, 6, 15)));
        assert_eq!(parse_date("June 3rd, 2022"), Some(ymd(2022, 6, 3)));
    }

    #[test]
    fn test_parse_date_bare_year_anchors_to_january_first() {
        assert_eq!(parse_date("2018"), Some(ymd(2018, 1, 1)));
        assert_eq!(parse_date("Summer 2019"), Some(ymd(2019, 1, 1)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("1850"), None);
    }

    #[test]
    fn test_parse_date_invalid_month_falls_back_to_year() {
        assert_eq!(parse_date("13/2020"), Some(ymd(2020, 1, 1)));
    }

    #[test]
    fn test_parse_range_month_year_to_present() {
        let range = parse_range("Jan 2020 - Present");
        assert_eq!(range.start, Some(ymd(2020, 1, 1)));
        assert_eq!(range.end, None);
        assert!(range.is_current);
    }

    #[test]
    fn test_parse_range_en_and_em_dashes() {
        let range = parse_range("March 2018 – June 2019");
        assert_eq!(range.start, Some(ymd(2018, 3, 1)));
        assert_eq!(range.end, Some(ymd(2019, 6, 1)));
        assert!(!range.is_current);

        let range = parse_range("2016—current");
        assert_eq!(range.start, Some(ymd(2016, 1, 1)));
        assert!(range.is_current);
    }

    #[test]
    fn test_parse_range_bare_years_and_numeric() {
        let range = parse_range("2016-2020");
        assert_eq!(range.start, Some(ymd(2016, 1, 1)));
        assert_eq!(range.end, Some(ymd(2020, 1, 1)));

        let range = parse_range("01/2019 to 11/2021");
        assert_eq!(range.start, Some(ymd(2019, 1, 1)));
        assert_eq!(range.end, Some(ymd(2021, 11, 1)));
    }

    #[test]
    fn test_parse_range_normalized_glued_tokens() {
        let normalized = crate::pipeline::normalize::normalize("Aug2024-Dec2024");
        let range = parse_range(&normalized);
        assert_eq!(range.start, Some(ymd(2024, 8, 1)));
        assert_eq!(range.end, Some(ymd(2024, 12, 1)));
        assert!(!range.is_current);
    }

    #[test]
    fn test_parse_range_without_range_is_empty() {
        assert!(parse_range("Built things.").is_empty());
        assert!(parse_range("555-123-4567").is_empty());
    }

    #[test]
    fn test_find_range_span_and_residual() {
        let line = "Acme Corp | Jan 2020 - Present";
        let (_, span) = find_range(line).unwrap();
        assert_eq!(residual(line, span), "Acme Corp");
    }

    #[test]
    fn test_find_date_first_token() {
        assert_eq!(find_date("Issued May 2023 by AWS"), Some(ymd(2023, 5, 1)));
        assert_eq!(find_date("Class of 2020"), Some(ymd(2020, 1, 1)));
        assert_eq!(find_date("no dates here"), None);
    }

    #[test]
    fn test_date_line_classification() {
        assert!(is_date_line("Jan 2020 - Present"));
        assert!(is_date_line("Acme Corp | Jan 2020 - Present"));
        assert!(is_date_line("2019"));
        assert!(!is_date_line("Promoted to lead in Mar 2021"));
        assert!(!is_date_line("Built things."));

        assert!(is_date_only_line("Jun 2017 - Dec 2019"));
        assert!(!is_date_only_line("Acme Corp | Jan 2020 - Present"));
    }
}
