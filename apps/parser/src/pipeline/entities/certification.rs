use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::Certification;
use crate::pipeline::dates::{find_date, find_date_span, find_range, is_date_only_line, residual};
use crate::pipeline::entities::{content_lines, is_plausible_entry};
use crate::pipeline::sections::is_keyword_header;
use crate::pipeline::text::{is_all_caps, strip_bullet, trim_separators};

static ISSUED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:issued|earned|obtained|awarded|completed)\b[ \t]*:?[ \t]*(?:on[ \t]+)?([^|\n]*)")
        .expect("valid regex")
});

static EXPIRES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:expires|expired|expiration(?:[ \t]+date)?|expiry|valid[ \t]+(?:until|through))\b[ \t]*:?[ \t]*(?:on[ \t]+)?([^|\n]*)",
    )
    .expect("valid regex")
});

static CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcredential(?:[ \t]*(?:id|#))?[ \t]*[:#]?[ \t]*([A-Za-z0-9][A-Za-z0-9-]{2,})")
        .expect("valid regex")
});

/// Attribute lines belong to the certification above them.
static ATTRIBUTE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:issued|earned|obtained|awarded|completed|expires|expired|expiration|expiry|valid[ \t]+(?:until|through)|credential|license[ \t]+(?:no|number|#))\b")
        .expect("valid regex")
});

/// One entry per certification line; issued/expiry/credential lines and
/// bare date lines are folded into the line above.
pub fn split_certification_entries(body: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let text = strip_bullet(line);
        let is_attribute = ATTRIBUTE_LINE.is_match(text) || is_date_only_line(text);
        match entries.last_mut() {
            Some(previous) if is_attribute => {
                previous.push('\n');
                previous.push_str(text);
            }
            _ => entries.push(text.to_string()),
        }
    }
    entries
}

/// `Name - Issuer` on the first line, with dates and credential details
/// either inline or on attribute lines.
pub fn parse_certification(entry: &str, min_chars: usize) -> Option<Certification> {
    if !is_plausible_entry(entry, min_chars) {
        return None;
    }
    let lines = content_lines(entry);
    let head = strip_bullet(lines.first()?);

    let mut date_earned = labelled_date(&ISSUED, entry);
    let mut expiry_date = labelled_date(&EXPIRES, entry);
    if date_earned.is_none() && expiry_date.is_none() {
        if let Some((range, _)) = find_range(entry) {
            date_earned = range.start;
            expiry_date = range.end;
        } else {
            date_earned = find_date(entry);
        }
    }

    let credential_id = CREDENTIAL
        .captures(entry)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let (name, issuer) = split_name_issuer(&title_text(head));
    if name.is_empty() || (is_all_caps(&name) && is_keyword_header(&name)) {
        return None;
    }

    Some(Certification {
        name,
        issuer,
        date_earned,
        expiry_date,
        credential_id,
    })
}

fn labelled_date(label: &Regex, entry: &str) -> Option<NaiveDate> {
    label
        .captures_iter(entry)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| find_date(m.as_str()))
}

/// The head line up to its first attribute label, with dates cut out.
fn title_text(head: &str) -> String {
    let cut = [&*ISSUED, &*EXPIRES, &*CREDENTIAL]
        .iter()
        .filter_map(|re| re.find(head).map(|m| m.start()))
        .min()
        .unwrap_or(head.len());
    let mut text = trim_separators(&head[..cut]).to_string();

    if let Some((_, span)) = find_range(&text) {
        text = residual(&text, span);
    }
    while let Some(span) = find_date_span(&text) {
        let cut = residual(&text, span);
        if cut == text {
            break;
        }
        text = cut;
    }
    text
}

fn split_name_issuer(text: &str) -> (String, String) {
    let split = [" - ", " – ", " — ", " | "]
        .iter()
        .find_map(|sep| text.split_once(sep));
    match split {
        Some((name, issuer)) => (
            trim_separators(name).to_string(),
            trim_separators(issuer).to_string(),
        ),
        None => (trim_separators(text).to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, 1)
    }

    #[test]
    fn test_name_issuer_split_on_first_dash() {
        let cert = parse_certification("Certified Kubernetes Administrator - CNCF - Linux Foundation", 5).unwrap();
        assert_eq!(cert.name, "Certified Kubernetes Administrator");
        assert_eq!(cert.issuer, "CNCF - Linux Foundation");
    }

    #[test]
    fn test_whole_line_is_name_without_separator() {
        let cert = parse_certification("PMP Certification", 5).unwrap();
        assert_eq!(cert.name, "PMP Certification");
        assert_eq!(cert.issuer, "");
        assert_eq!(cert.date_earned, None);
    }

    #[test]
    fn test_inline_labels() {
        let cert = parse_certification(
            "AWS Certified Solutions Architect - Amazon Web Services | Issued Mar 2022 | Expires Mar 2025 | Credential ID ABC123",
            5,
        )
        .unwrap();
        assert_eq!(cert.name, "AWS Certified Solutions Architect");
        assert_eq!(cert.issuer, "Amazon Web Services");
        assert_eq!(cert.date_earned, ym(2022, 3));
        assert_eq!(cert.expiry_date, ym(2025, 3));
        assert_eq!(cert.credential_id, "ABC123");
    }

    #[test]
    fn test_trailing_year_is_cut_from_name() {
        let cert = parse_certification("Google Data Analytics - Coursera (2023)", 5).unwrap();
        assert_eq!(cert.name, "Google Data Analytics");
        assert_eq!(cert.issuer, "Coursera");
        assert_eq!(cert.date_earned, ym(2023, 1));
    }

    #[test]
    fn test_attribute_lines_attach_to_previous() {
        let body = "• Terraform Associate - HashiCorp\nIssued: Jan 2023\nCredential ID: TF-998877\n• Scrum Master - Scrum Alliance\n2021";
        let entries = split_certification_entries(body);
        assert_eq!(entries.len(), 2);

        let first = parse_certification(&entries[0], 5).unwrap();
        assert_eq!(first.name, "Terraform Associate");
        assert_eq!(first.date_earned, ym(2023, 1));
        assert_eq!(first.credential_id, "TF-998877");

        let second = parse_certification(&entries[1], 5).unwrap();
        assert_eq!(second.issuer, "Scrum Alliance");
        assert_eq!(second.date_earned, ym(2021, 1));
    }

    #[test]
    fn test_header_leftover_is_rejected() {
        assert!(parse_certification("CERTIFICATIONS", 5).is_none());
        assert!(parse_certification("AWS", 5).is_none());
    }
}
