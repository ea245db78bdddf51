//! Detection rules for each normalized field, in priority order.
//!
//! Every rule pairs a column predicate with a value parser. The normalizer walks
//! the columns in schema order and, per column, tries the rules top to bottom;
//! the first rule whose predicate holds and whose parser yields a value settles
//! the field.

use crate::model::{Detection, RawField, Status};

use super::values::{parse_area_in, parse_bedrooms, parse_floor, parse_status};

pub const AREA_BAND: (f64, f64) = (15.0, 500.0);
pub const RANKED_AREA_BAND: (f64, f64) = (20.0, 300.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Column filter keyword equals one of the tokens.
    Keyword,
    /// Some subject label contains one of the tokens.
    Subject,
    /// Like `Subject`, but also looks at the filter keyword. Used after the
    /// direct scan came up empty.
    Fallback,
}

pub struct Rule<T> {
    pub source: Source,
    pub tokens: &'static [&'static str],
    pub parse: fn(&str) -> Option<T>,
}

impl<T> Rule<T> {
    pub fn matches(&self, field: &RawField) -> bool {
        let keyword = field.filter_keyword.trim().to_lowercase();
        match self.source {
            Source::Keyword => self.tokens.iter().any(|t| keyword == *t),
            Source::Subject => {
                let subjects = field.subjects.haystack();
                self.tokens.iter().any(|t| subjects.contains(t))
            }
            Source::Fallback => {
                let subjects = field.subjects.haystack();
                self.tokens
                    .iter()
                    .any(|t| subjects.contains(t) || keyword.contains(t))
            }
        }
    }

    pub fn detection(&self, label: &str) -> Detection {
        match self.source {
            Source::Keyword => Detection::Keyword(label.to_string()),
            Source::Subject => Detection::Subject(label.to_string()),
            Source::Fallback => Detection::Fallback(label.to_string()),
        }
    }
}

fn area(value: &str) -> Option<f64> {
    parse_area_in(value, AREA_BAND)
}

pub static STATUS_RULES: &[Rule<Status>] = &[
    Rule {
        source: Source::Keyword,
        tokens: &["status", "статус"],
        parse: parse_status,
    },
    Rule {
        source: Source::Subject,
        tokens: &["статус", "status", "состојба", "gjendja"],
        parse: parse_status,
    },
];

pub static BEDROOM_RULES: &[Rule<u8>] = &[
    Rule {
        source: Source::Keyword,
        tokens: &["bedrooms", "bedroom", "rooms", "спални", "соби"],
        parse: parse_bedrooms,
    },
    Rule {
        source: Source::Subject,
        tokens: &["bedroom", "спални", "спална", "соби", "dhoma"],
        parse: parse_bedrooms,
    },
];

pub static FLOOR_RULES: &[Rule<i32>] = &[
    Rule {
        source: Source::Keyword,
        tokens: &["floor", "кат", "спрат", "kati"],
        parse: parse_floor,
    },
    Rule {
        source: Source::Subject,
        tokens: &["floor", "кат", "спрат", "kati"],
        parse: parse_floor,
    },
];

pub static AREA_RULES: &[Rule<f64>] = &[
    Rule {
        source: Source::Keyword,
        tokens: &["area", "size", "m2", "м2", "површина", "квадратура"],
        parse: area,
    },
    Rule {
        source: Source::Subject,
        tokens: &[
            "area",
            "површина",
            "квадратура",
            "sipërfaqe",
            "siperfaqe",
            "m2",
            "м2",
        ],
        parse: area,
    },
];

pub static AREA_FALLBACK_RULES: &[Rule<f64>] = &[Rule {
    source: Source::Fallback,
    tokens: &[
        "net", "нето", "neto", "total", "вкупно", "gjithsej", "gross", "бруто", "bruto",
        "surface", "m²", "м²", "кв",
    ],
    parse: area,
}];

const RANK_AREA_HINTS: &[&str] = &[
    "area", "total", "net", "surface", "површина", "квадратура", "вкупно", "нето", "sipërfaqe",
    "m²", "м²",
];
const RANK_PRICE_HINTS: &[&str] = &["price", "цена", "çmim", "cmim", "eur", "€", "ден", "$"];
const RANK_FLOOR_HINTS: &[&str] = &["floor", "кат", "спрат", "kati"];

/// Score of a numeric column as an area candidate. `position` is the column's
/// place in schema order.
pub fn rank_area_candidate(position: usize, field: &RawField) -> i32 {
    let subjects = field.subjects.haystack();
    let value = field.value.to_lowercase();
    let has = |hints: &[&str]| hints.iter().any(|h| subjects.contains(h));

    let mut score = 0;
    if position > 2 {
        score += 1;
    }
    if position > 5 {
        score += 1;
    }
    if has(RANK_AREA_HINTS) {
        score += 3;
    }
    if has(RANK_PRICE_HINTS) || RANK_PRICE_HINTS.iter().any(|h| value.contains(h)) {
        score -= 5;
    }
    if has(RANK_FLOOR_HINTS) {
        score -= 5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Subjects;

    fn field(keyword: &str, mk: &str, en: &str, value: &str) -> RawField {
        RawField {
            value: value.into(),
            column_index: 0,
            filter_keyword: keyword.into(),
            is_visible: true,
            subjects: Subjects {
                mk: mk.into(),
                en: en.into(),
                sq: String::new(),
            },
        }
    }

    #[test]
    fn keyword_rule_is_exact_and_case_insensitive() {
        let rule = &STATUS_RULES[0];
        assert!(rule.matches(&field("Status", "", "", "1")));
        assert!(!rule.matches(&field("status_note", "", "", "1")));
    }

    #[test]
    fn subject_rule_matches_either_script() {
        let rule = &AREA_RULES[1];
        assert!(rule.matches(&field("", "Површина", "", "70")));
        assert!(rule.matches(&field("", "", "Living AREA", "70")));
        assert!(!rule.matches(&field("", "Цена", "Price", "70")));
    }

    #[test]
    fn bedroom_subject_ignores_bathrooms() {
        let rule = &BEDROOM_RULES[1];
        assert!(!rule.matches(&field("", "", "Bathrooms", "2")));
        assert!(rule.matches(&field("", "Спални", "", "2")));
    }

    #[test]
    fn fallback_reads_keyword_too() {
        let rule = &AREA_FALLBACK_RULES[0];
        assert!(rule.matches(&field("net", "", "", "70")));
        assert!(rule.matches(&field("", "Нето", "", "70")));
    }

    #[test]
    fn ranking_prefers_area_labels_and_punishes_price() {
        let area = field("", "Вкупно", "", "82");
        let price = field("", "Цена", "Price", "120");
        let floor = field("", "Кат", "", "25");
        assert_eq!(rank_area_candidate(6, &area), 5);
        assert_eq!(rank_area_candidate(1, &area), 3);
        assert!(rank_area_candidate(6, &price) < 0);
        assert!(rank_area_candidate(3, &floor) < 0);
        assert!(rank_area_candidate(3, &field("", "", "", "€99")) < 0);
    }
}
