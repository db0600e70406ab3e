//! Line-level helpers shared by the segmenter, the delimiter and the entity parsers.

use std::sync::LazyLock;

use regex::Regex;

const BULLET_GLYPHS: &[char] = &['•', '●', '▪', '■', '◦', '·', '○', '➢', '►', '▸', '✓'];

/// Two-letter codes accepted as the `ST` in a `City, ST` location.
const REGION_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC", "PR", "ON", "BC", "QC", "AB", "MB", "NS",
];

static CITY_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'-]*(?:[ \t]+[A-Z][A-Za-z.'-]*)*,[ \t]*([A-Z]{2})$")
        .expect("valid city/state regex")
});

static CITY_COUNTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z.'-]+(?:[ \t]+[A-Z][a-z.'-]+)*,[ \t]*[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*$")
        .expect("valid city/country regex")
});

/// Job-title words.
pub static ROLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:engineer|developer|manager|scientist|analyst|designer|architect|consultant|director|intern|lead|specialist|coordinator|administrator|officer|associate|assistant|researcher|programmer|technician|head|vp|president|founder|cto|ceo|cfo|coo|teacher|professor|fellow|representative|supervisor|executive|strategist|editor|writer|accountant|owner)s?\b",
    )
    .expect("valid regex")
});

/// Organisation-type words (`Inc`, `University`, `Labs`).
pub static ORG_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:inc|llc|llp|ltd|corp|corporation|company|university|college|institute|labs?|technologies|group|gmbh|solutions|systems|bank|agency|partners|consulting|studios?|foundation|ventures|holdings|plc)\b",
    )
    .expect("valid regex")
});

/// `Acme Corp, Austin, TX` -> (`Acme Corp`, `Austin, TX`).
static TRAILING_CITY_STATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?),[ \t]*([A-Z][A-Za-z.'-]*(?:[ \t]+[A-Z][A-Za-z.'-]*)*,[ \t]*[A-Z]{2})$")
        .expect("valid trailing location regex")
});

static SEGMENT_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[|•·–—-]\s+|\s*[|•·]\s*").expect("valid segment separator regex")
});

/// True when the text has at least one letter and no lower-case letters.
pub fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}

pub fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

pub fn is_bullet_line(line: &str) -> bool {
    let line = line.trim_start();
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if BULLET_GLYPHS.contains(&c) => true,
        Some('-') | Some('*') | Some('–') => chars.next().is_some_and(char::is_whitespace),
        _ => false,
    }
}

/// Removes one leading bullet glyph (and the whitespace after it).
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    if is_bullet_line(trimmed) {
        let mut chars = trimmed.chars();
        chars.next();
        chars.as_str().trim_start()
    } else {
        trimmed
    }
}

/// Trims separator punctuation left behind after cutting a span out of a line.
pub fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '|' | ',' | '-' | '–' | '—' | ':' | ';' | '(' | ')' | '•' | '·' | '@')
    })
}

/// `City, ST` with a known region code.
pub fn is_city_state(segment: &str) -> bool {
    CITY_STATE
        .captures(segment.trim())
        .and_then(|caps| caps.get(1))
        .is_some_and(|code| REGION_CODES.contains(&code.as_str()))
}

/// Title-case `City, Country`. Job headings such as `Software Engineer, Google`
/// share the shape, so role and organisation words disqualify a segment.
pub fn is_city_country(segment: &str) -> bool {
    let segment = segment.trim();
    CITY_COUNTRY.is_match(segment) && !ROLE.is_match(segment) && !ORG_SUFFIX.is_match(segment)
}

/// Splits a line on the usual inline separators (`|`, bullets, spaced dashes).
pub fn segments(line: &str) -> Vec<&str> {
    SEGMENT_SEPARATORS
        .split(line)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Finds a `City, ST` segment (and, when `allow_country` is set, a
/// `City, Country` segment) on one line.
pub fn find_location(line: &str, allow_country: bool) -> Option<String> {
    let segs = segments(line);
    if let Some(seg) = segs.iter().find(|s| is_city_state(s)) {
        return Some(seg.to_string());
    }
    if allow_country {
        if let Some(seg) = segs.iter().find(|s| is_city_country(s)) {
            return Some(seg.to_string());
        }
    }
    None
}

/// Splits a trailing `, City, ST` off an organisation name.
pub fn split_trailing_location(text: &str) -> Option<(String, String)> {
    let caps = TRAILING_CITY_STATE.captures(text.trim())?;
    let location = caps.get(2)?.as_str();
    if !is_city_state(location) {
        return None;
    }
    let head = caps.get(1)?.as_str().trim();
    if head.is_empty() {
        return None;
    }
    Some((head.to_string(), location.to_string()))
}
