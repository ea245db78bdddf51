pub mod defaults;
pub mod rules;
pub mod values;

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{ApartmentRecord, Detection, Provenance, RawField};

use super::records::RawRecord;
use defaults::FallbackPolicy;
use rules::{Rule, RANKED_AREA_BAND};
use values::extract_number;

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub office_prefix: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            office_prefix: "ДП".to_string(),
        }
    }
}

pub fn is_office_space(id: &str, prefix: &str) -> bool {
    let prefix = prefix.trim().to_lowercase();
    !prefix.is_empty() && id.trim().to_lowercase().starts_with(&prefix)
}

pub fn normalize_all(
    raws: Vec<RawRecord>,
    options: &NormalizeOptions,
    policy: &mut dyn FallbackPolicy,
) -> Vec<ApartmentRecord> {
    raws.into_iter()
        .enumerate()
        .map(|(i, raw)| normalize(raw, i, options, policy))
        .collect()
}

/// Settle bedrooms, floor, area and status for one record. Never fails: a
/// field no rule can read takes its default.
pub fn normalize(
    raw: RawRecord,
    index: usize,
    options: &NormalizeOptions,
    policy: &mut dyn FallbackPolicy,
) -> ApartmentRecord {
    let is_office_space = is_office_space(&raw.id, &options.office_prefix);
    let fields = &raw.raw_fields;

    let (bedrooms, bedrooms_by) = if is_office_space {
        (None, Detection::Exempt)
    } else {
        match first_match(fields, rules::BEDROOM_RULES) {
            Some((n, by)) => (Some(n), by),
            None => match defaults::bedrooms_from_id(&raw.id) {
                Some(n) => (Some(n), Detection::Default("id".into())),
                None => (
                    Some(defaults::DEFAULT_BEDROOMS),
                    Detection::Default("fixed".into()),
                ),
            },
        }
    };

    let (floor, floor_by) = match first_match(fields, rules::FLOOR_RULES) {
        Some((n, by)) => (n, by),
        None if is_office_space => (defaults::OFFICE_FLOOR, Detection::Default("office".into())),
        None => match defaults::floor_from_id(&raw.id) {
            Some(n) => (n, Detection::Default("id".into())),
            None => (policy.floor(index), Detection::Default("placeholder".into())),
        },
    };

    let (area, area_by) = first_match(fields, rules::AREA_RULES)
        .or_else(|| first_match(fields, rules::AREA_FALLBACK_RULES))
        .or_else(|| ranked_area(fields))
        .unwrap_or_else(|| {
            let source = if is_office_space { "office" } else { "bedrooms" };
            (
                defaults::area_for(is_office_space, bedrooms),
                Detection::Default(source.into()),
            )
        });

    let (status, status_by) = first_match(fields, rules::STATUS_RULES)
        .unwrap_or_else(|| (policy.status(index), Detection::Default("placeholder".into())));

    debug!(
        id = %raw.id,
        bedrooms = %bedrooms_by,
        floor = %floor_by,
        area = %area_by,
        status = %status_by,
        "Normalized record"
    );

    ApartmentRecord {
        id: raw.id,
        row_index: raw.row_index,
        is_office_space,
        bedrooms,
        floor: Some(floor),
        area: Some(area),
        status,
        raw_fields: raw.raw_fields,
        provenance: Provenance {
            bedrooms: Some(bedrooms_by),
            floor: Some(floor_by),
            area: Some(area_by),
            status: Some(status_by),
        },
    }
}

/// First column, in schema order, that some rule both matches and parses.
fn first_match<T>(fields: &IndexMap<String, RawField>, rules: &[Rule<T>]) -> Option<(T, Detection)> {
    fields.iter().find_map(|(label, field)| {
        rules.iter().find_map(|rule| {
            if !rule.matches(field) {
                return None;
            }
            (rule.parse)(&field.value).map(|v| (v, rule.detection(label)))
        })
    })
}

/// Best-scoring numeric column inside the ranked band. Ties keep the earlier column.
fn ranked_area(fields: &IndexMap<String, RawField>) -> Option<(f64, Detection)> {
    let mut best: Option<(i32, f64, &str)> = None;

    for (position, (label, field)) in fields.iter().enumerate() {
        let Some(n) = extract_number(&field.value) else {
            continue;
        };
        if n <= RANKED_AREA_BAND.0 || n >= RANKED_AREA_BAND.1 {
            continue;
        }
        let score = rules::rank_area_candidate(position, field);
        if best.map_or(true, |(s, _, _)| score > s) {
            best = Some((score, n, label.as_str()));
        }
    }

    best.map(|(_, n, label)| (n, Detection::Ranked(label.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Status, Subjects};
    use defaults::{Cycling, Randomized, PLACEHOLDER_FLOORS};

    fn raw(id: &str, cols: &[(&str, &str, &str)]) -> RawRecord {
        let mut raw_fields = IndexMap::new();
        for (i, (keyword, label, value)) in cols.iter().enumerate() {
            raw_fields.insert(
                label.to_string(),
                RawField {
                    value: value.to_string(),
                    column_index: i + 1,
                    filter_keyword: keyword.to_string(),
                    is_visible: true,
                    subjects: Subjects {
                        mk: label.to_string(),
                        ..Default::default()
                    },
                },
            );
        }
        RawRecord {
            id: id.into(),
            row_index: 10,
            raw_fields,
        }
    }

    fn run(r: RawRecord) -> ApartmentRecord {
        normalize(r, 0, &NormalizeOptions::default(), &mut Cycling)
    }

    #[test]
    fn keyword_columns_settle_everything() {
        let rec = run(raw(
            "1.1",
            &[
                ("status", "Статус", "2"),
                ("bedrooms", "Спални", "3"),
                ("floor", "Кат", "4"),
                ("area", "Површина", "85,5 m²"),
            ],
        ));
        assert_eq!(rec.status, Status::Reserved);
        assert_eq!(rec.bedrooms, Some(3));
        assert_eq!(rec.floor, Some(4));
        assert_eq!(rec.area, Some(85.5));
        assert_eq!(rec.area_detection_method().as_deref(), Some("keyword:Површина"));
    }

    #[test]
    fn subject_match_without_keyword() {
        let rec = run(raw("2.3", &[("", "Број на спални", "2"), ("", "Нето површина", "61")]));
        assert_eq!(rec.bedrooms, Some(2));
        assert_eq!(rec.area, Some(61.0));
        assert_eq!(rec.provenance.bedrooms, Some(Detection::Subject("Број на спални".into())));
    }

    #[test]
    fn first_column_wins_even_if_later_is_better() {
        let rec = run(raw("1.1", &[("area", "A", "70"), ("area", "B", "75")]));
        assert_eq!(rec.area, Some(70.0));
    }

    #[test]
    fn implausible_keyword_value_keeps_scanning() {
        let rec = run(raw("1.1", &[("area", "A", "1200"), ("area", "B", "75")]));
        assert_eq!(rec.area, Some(75.0));
    }

    #[test]
    fn fallback_pattern_after_direct_scan() {
        let rec = run(raw("1.1", &[("", "Вкупно", "92")]));
        assert_eq!(rec.area, Some(92.0));
        assert_eq!(rec.provenance.area, Some(Detection::Fallback("Вкупно".into())));
    }

    #[test]
    fn ranked_candidate_skips_price() {
        let rec = run(raw(
            "1.1",
            &[
                ("", "Цена", "€125,000"),
                ("", "A", "x"),
                ("", "B", "x"),
                ("", "C", "77"),
                ("", "Цена по м", "99"),
            ],
        ));
        assert_eq!(rec.area, Some(77.0));
        assert_eq!(rec.provenance.area, Some(Detection::Ranked("C".into())));
    }

    #[test]
    fn ranked_tie_keeps_first_seen() {
        let rec = run(raw("1.1", &[("", "X", "40"), ("", "Y", "60")]));
        assert_eq!(rec.area, Some(40.0));
    }

    #[test]
    fn defaults_from_id() {
        let rec = run(raw("3.2", &[("", "Забелешка", "агол")]));
        assert_eq!(rec.floor, Some(3));
        assert_eq!(rec.bedrooms, Some(2));
        assert_eq!(rec.area, Some(65.0));
        assert_eq!(rec.provenance.floor, Some(Detection::Default("id".into())));
        assert_eq!(rec.status, Status::Available);
        assert_eq!(rec.provenance.status, Some(Detection::Default("placeholder".into())));
    }

    #[test]
    fn fixed_bedroom_default_without_digits() {
        let rec = run(raw("penthouse", &[]));
        assert_eq!(rec.bedrooms, Some(2));
        assert_eq!(rec.provenance.bedrooms, Some(Detection::Default("fixed".into())));
    }

    #[test]
    fn office_space_is_exempt() {
        let rec = run(raw("ДП3", &[("bedrooms", "Спални", "3")]));
        assert!(rec.is_office_space);
        assert_eq!(rec.bedrooms, None);
        assert_eq!(rec.floor, Some(0));
        assert_eq!(rec.area, Some(defaults::OFFICE_AREA));
        assert_eq!(rec.provenance.bedrooms, Some(Detection::Exempt));
    }

    #[test]
    fn office_prefix_is_case_folded() {
        assert!(is_office_space(" дп12", "ДП"));
        assert!(!is_office_space("1.1", "ДП"));
        assert!(!is_office_space("1.1", ""));
    }

    #[test]
    fn random_placeholders_stay_in_range() {
        let mut policy = Randomized::from_entropy();
        for i in 0..20 {
            let rec = normalize(raw("lobby", &[]), i, &NormalizeOptions::default(), &mut policy);
            let floor = rec.floor.unwrap();
            assert!((PLACEHOLDER_FLOORS.0..=PLACEHOLDER_FLOORS.1).contains(&floor));
            assert!(Status::ALL.contains(&rec.status));
        }
    }
}
