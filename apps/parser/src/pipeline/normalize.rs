//! TextNormalizer — repairs what PDF/OCR text extraction does to résumé layouts.
//!
//! Steps, in order:
//!   1. strip artifact tokens (glyph-ID markers, control and zero-width characters, ligatures)
//!   2. repair lost word boundaries inside tokens (`engineerAcme`, `Jun2027`, `Python3`)
//!   3. force section header keywords onto their own line
//!   4. collapse horizontal whitespace and blank-line runs
//!
//! `normalize(normalize(s)) == normalize(s)` holds for every input.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::pipeline::dates::MONTH_NAME;

/// Mixed-case or alphanumeric words that the boundary repair must leave intact.
const PROTECTED_WORDS: &[&str] = &[
    "PhD", "GitHub", "GitLab", "LinkedIn", "iOS", "macOS", "iPhone", "iPad", "YouTube",
    "DevOps", "DevSecOps", "MLOps", "FinTech", "LaTeX", "WordPress", "JetBrains", "IntelliJ",
    "OpenAI", "PayPal", "McKinsey", "SaaS", "PaaS", "IaaS", "K8s", "Web3", "OAuth2", "HTML5",
    "CSS3", "ES6", "Python3", "IPv4", "IPv6", "JavaScript", "TypeScript", "PostgreSQL", "MySQL",
    "MongoDB", "DynamoDB", "CouchDB", "InfluxDB", "GraphQL", "PowerShell", "CircleCI",
    "PyTorch", "TensorFlow", "NumPy", "SciPy", "SwiftUI", "jQuery", "Neo4j", "BigQuery",
    "FastAPI", "XGBoost", "MLflow", "OpenCV", "OpenShift", "CloudFormation", "RabbitMQ",
    "SQLite", "WebSockets", "IoT", "gRPC", "eBay", "LeetCode", "HackerRank", "SendGrid", "HashiCorp",
];

const HEADER_WORDS: &str =
    "experience|education|skills|projects|certifications|languages|summary|publications";

const HEADER_QUALIFIERS: &str = "work|professional|technical|relevant|core|key|academic|personal|soft|other|additional|research|volunteer|leadership|selected";

static PROTECTED: LazyLock<HashSet<String>> =
    LazyLock::new(|| PROTECTED_WORDS.iter().map(|w| w.to_lowercase()).collect());

static GLYPH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(cid:\d+\)").expect("valid regex"));

static TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid regex"));

static MONTH_GLUED_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({MONTH_NAME})\.?((?:19|20)\d{{2}})\b")).expect("valid regex")
});

static LOWER_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{Ll})(\p{Lu})").expect("valid regex"));

static CAPS_RUN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{Lu}{3,})(\p{Lu}\p{Ll})").expect("valid regex"));

static LETTER_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{L})(\p{Nd})").expect("valid regex"));

static DIGIT_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{Nd})(\p{L})").expect("valid regex"));

static DOMAIN_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}\.\p{L}").expect("valid regex"));

static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+(?:st|nd|rd|th)$").expect("valid regex"));

/// `McDonald`, `MacArthur`, `O'Neil`.
static NAME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:Mc|Mac|O')\p{Lu}\p{Ll}+$").expect("valid regex"));

static SHORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{2,4}$").expect("valid regex"));

static HEADER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b((?:(?:{HEADER_QUALIFIERS})[ \t]+)?(?:{HEADER_WORDS}))\b([ \t]*:)?"
    ))
    .expect("valid regex")
});

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

/// Cleans raw extracted text. Pure; empty input gives an empty string.
pub fn normalize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let text = strip_artifacts(raw);
    let text = TOKEN.replace_all(&text, |caps: &Captures| repair_token(&caps[0]));
    let text = text
        .lines()
        .map(force_header_lines)
        .collect::<Vec<_>>()
        .join("\n");
    collapse_whitespace(&text)
}

fn strip_artifacts(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = GLYPH_ID.replace_all(&text, "");

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\t' => out.push(c),
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            // non-breaking and typographic spaces, private-use icon glyphs
            '\u{00A0}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}'
            | '\u{E000}'..='\u{F8FF}' => out.push(' '),
            // zero-width characters, soft hyphen, replacement character
            '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}' | '\u{FFFD}' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn repair_token(token: &str) -> String {
    if is_protected(token) {
        return token.to_string();
    }
    let token = MONTH_GLUED_YEAR.replace_all(token, "$1 $2");
    let token = CAPS_RUN_WORD.replace_all(&token, "$1 $2");
    let token = LOWER_UPPER.replace_all(&token, "$1 $2");
    let token = LETTER_DIGIT.replace_all(&token, "$1 $2");
    DIGIT_LETTER.replace_all(&token, "$1 $2").into_owned()
}

/// Emails, URLs, paths, known mixed-case words, ordinals and short codes (`EC2`).
fn is_protected(token: &str) -> bool {
    if token.contains('@') || token.contains("://") || token.contains('/') {
        return true;
    }
    if token.to_lowercase().starts_with("www.") || DOMAIN_LIKE.is_match(token) {
        return true;
    }
    let core = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#');
    PROTECTED.contains(&core.to_lowercase())
        || NAME_PREFIX.is_match(core)
        || ORDINAL.is_match(core)
        || SHORT_CODE.is_match(core)
}

/// Splits a line around header keywords that are upper-case anywhere in the
/// line, or that open the line as `Keyword:` / a bare `Keyword`. A keyword
/// directly after a split header opens the line too, so one pass is enough.
fn force_header_lines(line: &str) -> String {
    let trimmed = line.trim();
    let mut pieces: Vec<&str> = Vec::new();
    let mut cursor = 0;

    for caps in HEADER_KEYWORD.captures_iter(trimmed) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let upper = !keyword.as_str().chars().any(char::is_lowercase);
        let opens_line = trimmed[cursor..whole.start()].trim().is_empty()
            && (caps.get(2).is_some() || trimmed[whole.end()..].trim().is_empty());
        if !(upper || opens_line) {
            continue;
        }
        pieces.push(&trimmed[cursor..whole.start()]);
        pieces.push(keyword.as_str());
        cursor = whole.end();
    }

    if pieces.is_empty() {
        return trimmed.to_string();
    }
    pieces.push(&trimmed[cursor..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| piece.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = HORIZONTAL_SPACE.replace_all(line.trim(), " ").into_owned();
        if line.is_empty() && lines.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_string() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\t \n"), "");
    }

    #[test]
    fn test_strips_glyph_ids_and_invisible_characters() {
        let raw = "Jane\u{200B} Roe(cid:127)\n\u{FEFF}Engineer\u{00A0}II";
        assert_eq!(normalize(raw), "Jane Roe\nEngineer II");
    }

    #[test]
    fn test_expands_ligatures() {
        assert_eq!(normalize("Of\u{FB01}ce e\u{FB03}ciency"), "Office efficiency");
    }

    #[test]
    fn test_month_glued_to_year() {
        assert_eq!(normalize("Graduating Jun2027"), "Graduating Jun 2027");
        assert_eq!(normalize("Aug2024-Dec2024"), "Aug 2024-Dec 2024");
    }

    #[test]
    fn test_repairs_lower_upper_and_letter_digit_boundaries() {
        assert_eq!(normalize("softwareEngineer"), "software Engineer");
        assert_eq!(normalize("team of12 engineers"), "team of 12 engineers");
        assert_eq!(normalize("3years"), "3 years");
        assert_eq!(normalize("BobSmith"), "Bob Smith");
        assert_eq!(normalize("Engineer atAcme"), "Engineer at Acme");
        assert_eq!(normalize("JohnDoe"), "John Doe");
    }

    #[test]
    fn test_leaves_protected_tokens_alone() {
        let raw = "jane99@mail.com github.com/jane42 JavaScript Neo4j PhD McDonald O'Neil EC2 1st IoT";
        assert_eq!(normalize(raw), raw);
    }

    #[test]
    fn test_forces_uppercase_headers_onto_own_line() {
        assert_eq!(
            normalize("Jane Roe EXPERIENCE Senior Engineer"),
            "Jane Roe\nEXPERIENCE\nSenior Engineer"
        );
        assert_eq!(
            normalize("WORK EXPERIENCEAcme Corp"),
            "WORK EXPERIENCE\nAcme Corp"
        );
    }

    #[test]
    fn test_splits_line_opening_label() {
        assert_eq!(
            normalize("Skills: Python, AWS, Docker"),
            "Skills\nPython, AWS, Docker"
        );
    }

    #[test]
    fn test_consecutive_labels_split_in_one_pass() {
        assert_eq!(
            normalize("Summary: Skills: Python, Go"),
            "Summary\nSkills\nPython, Go"
        );
        assert_eq!(
            normalize("Jane Roe EXPERIENCE Skills: Go"),
            "Jane Roe\nEXPERIENCE\nSkills\nGo"
        );
    }

    #[test]
    fn test_mid_sentence_keyword_is_not_split() {
        let raw = "Five years of experience building payment systems";
        assert_eq!(normalize(raw), raw);
        assert_eq!(normalize("Experience with Rust"), "Experience with Rust");
    }

    #[test]
    fn test_collapses_whitespace_and_blank_runs() {
        let raw = "  Jane   Roe\t\tPhD  \n\n\n\nEngineer   \n\n";
        assert_eq!(normalize(raw), "Jane Roe PhD\n\nEngineer");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "John Doe\r\nSoftware Engineer(cid:127)\nEXPERIENCEAcme Corp\n\n\n\nSkills: Python,   Java\tGo\nJun2027 graduation",
            "jane@x.com | 555-123-4567\nPROFESSIONAL SUMMARY Builder of things\n  • Led teamOf5\n",
            "EDUCATION\nBachelor of Science\nMIT\n2016-2020",
            "Summary: Skills: Python, Go",
            "Profile Summary: Experience: Education: BS atMIT",
            "JaneRoe EXPERIENCE skills",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
