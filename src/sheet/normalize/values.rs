use std::sync::LazyLock;

use regex::Regex;

use crate::model::Status;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9][0-9.,]*").unwrap());

const STATUS_TOKENS: &[(&str, Status)] = &[
    ("1", Status::Available),
    ("2", Status::Reserved),
    ("3", Status::Sold),
    ("available", Status::Available),
    ("free", Status::Available),
    ("for sale", Status::Available),
    ("слободен", Status::Available),
    ("слободно", Status::Available),
    ("слободна", Status::Available),
    ("достапен", Status::Available),
    ("достапно", Status::Available),
    ("lirë", Status::Available),
    ("lire", Status::Available),
    ("reserved", Status::Reserved),
    ("booked", Status::Reserved),
    ("резервиран", Status::Reserved),
    ("резервирано", Status::Reserved),
    ("резервирана", Status::Reserved),
    ("rezervuar", Status::Reserved),
    ("sold", Status::Sold),
    ("продаден", Status::Sold),
    ("продадено", Status::Sold),
    ("продадена", Status::Sold),
    ("shitur", Status::Sold),
];

/// First number in `value`, or `None`. Never returns a zero for "no number".
///
/// `,` and `.` are both accepted as decimal marks. A repeated separator, or a
/// single comma followed by exactly three digits, is thousands grouping, so
/// `€125,000` is 125000 while `85,5 m²` is 85.5. With both marks present the
/// last one is the decimal mark.
///
/// A lone comma before exactly three digits is ambiguous: `100,500` reads as
/// 100500, not 100.5. Sheet prices use that form far more often than areas
/// with three decimals.
pub fn extract_number(value: &str) -> Option<f64> {
    let run = NUMBER_RE.find(value)?.as_str();
    let run = run.trim_end_matches(['.', ',']);

    let commas = run.matches(',').count();
    let dots = run.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) => run.to_string(),
        (_, 0) => ungroup(run, ',')?,
        (0, _) => ungroup(run, '.')?,
        _ => {
            let last_comma = run.rfind(',')?;
            let last_dot = run.rfind('.')?;
            if last_comma > last_dot {
                run.replace('.', "").replace(',', ".")
            } else {
                run.replace(',', "")
            }
        }
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Resolve a run that uses a single kind of separator.
fn ungroup(run: &str, sep: char) -> Option<String> {
    let parts: Vec<&str> = run.split(sep).collect();
    let grouped = parts[1..].iter().all(|p| p.len() == 3);

    if parts.len() > 2 {
        // 1,250,000 or 1.250.000
        return grouped.then(|| parts.concat());
    }
    if sep == ',' && grouped && parts[0].len() <= 3 {
        return Some(parts.concat());
    }
    Some(parts.join("."))
}

/// Canonical status for a raw token, if the lexical table knows it.
pub fn status_from_token(token: &str) -> Option<Status> {
    let t = token.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }
    if let Some((_, s)) = STATUS_TOKENS.iter().find(|(k, _)| *k == t) {
        return Some(*s);
    }
    STATUS_TOKENS
        .iter()
        .filter(|(k, _)| k.chars().count() > 1)
        .find(|(k, _)| contains_word(&t, k))
        .map(|(_, s)| *s)
}

/// `needle` occurs in `haystack` with no letter or digit on either side, so
/// `unavailable` does not contain `available`.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(i, m)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Status for a value found in a status column. Unknown tokens read as available.
pub fn parse_status(value: &str) -> Option<Status> {
    if value.trim().is_empty() {
        return None;
    }
    Some(status_from_token(value).unwrap_or(Status::Available))
}

pub fn parse_bedrooms(value: &str) -> Option<u8> {
    extract_number(value)
        .map(f64::trunc)
        .filter(|n| *n > 1.0 && *n <= 10.0)
        .map(|n| n as u8)
}

pub fn parse_floor(value: &str) -> Option<i32> {
    extract_number(value)
        .map(f64::trunc)
        .filter(|n| *n > 0.0 && *n <= 50.0)
        .map(|n| n as i32)
}

/// Area inside the open plausibility band.
pub fn parse_area_in(value: &str, band: (f64, f64)) -> Option<f64> {
    extract_number(value).filter(|n| *n > band.0 && *n < band.1)
}
