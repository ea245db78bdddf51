use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{ApartmentRecord, Status};

#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    /// Bedroom counts to keep. Empty keeps no apartment; office spaces always pass.
    pub bedrooms: BTreeSet<u8>,
    /// Inclusive floor range.
    pub floors: (i32, i32),
    /// Inclusive area range.
    pub area: (f64, f64),
    /// Statuses to keep. Empty means any status.
    pub status: BTreeSet<Status>,
}

impl Criteria {
    /// Criteria that keep every record of `records`.
    pub fn permissive(records: &[ApartmentRecord]) -> Self {
        let s = summarize(records);
        Criteria {
            bedrooms: s.bedroom_options.into_iter().collect(),
            floors: s.floor_range.unwrap_or((i32::MIN, i32::MAX)),
            area: s.area_range.unwrap_or((f64::MIN, f64::MAX)),
            status: BTreeSet::new(),
        }
    }

    pub fn matches(&self, r: &ApartmentRecord) -> bool {
        let bedrooms_ok =
            r.is_office_space || r.bedrooms.is_some_and(|b| self.bedrooms.contains(&b));
        let floor_ok = r
            .floor
            .is_some_and(|f| f >= self.floors.0 && f <= self.floors.1);
        let area_ok = r
            .area
            .is_some_and(|a| a >= self.area.0 && a <= self.area.1);
        let status_ok = self.status.is_empty() || self.status.contains(&r.status);

        bedrooms_ok && floor_ok && area_ok && status_ok
    }
}

/// Records matching every criterion, in input order.
pub fn filter<'a>(records: &'a [ApartmentRecord], criteria: &Criteria) -> Vec<&'a ApartmentRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub office_spaces: usize,
    pub by_status: BTreeMap<Status, usize>,
    pub bedroom_options: Vec<u8>,
    pub floor_range: Option<(i32, i32)>,
    pub area_range: Option<(f64, f64)>,
}

pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a ApartmentRecord>,
{
    let mut s = Summary::default();
    let mut bedrooms = BTreeSet::new();

    for r in records {
        s.total += 1;
        if r.is_office_space {
            s.office_spaces += 1;
        } else if let Some(b) = r.bedrooms {
            bedrooms.insert(b);
        }
        *s.by_status.entry(r.status).or_default() += 1;

        if let Some(f) = r.floor {
            s.floor_range = Some(match s.floor_range {
                Some((lo, hi)) => (lo.min(f), hi.max(f)),
                None => (f, f),
            });
        }
        if let Some(a) = r.area {
            s.area_range = Some(match s.area_range {
                Some((lo, hi)) => (lo.min(a), hi.max(a)),
                None => (a, a),
            });
        }
    }

    s.bedroom_options = bedrooms.into_iter().collect();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Provenance;

    fn rec(id: &str, bedrooms: Option<u8>, floor: i32, area: f64, status: Status) -> ApartmentRecord {
        ApartmentRecord {
            id: id.into(),
            row_index: 0,
            is_office_space: bedrooms.is_none(),
            bedrooms,
            floor: Some(floor),
            area: Some(area),
            status,
            raw_fields: Default::default(),
            provenance: Provenance::default(),
        }
    }

    fn criteria(bedrooms: &[u8], floors: (i32, i32), area: (f64, f64), status: &[Status]) -> Criteria {
        Criteria {
            bedrooms: bedrooms.iter().copied().collect(),
            floors,
            area,
            status: status.iter().copied().collect(),
        }
    }

    fn ids(v: Vec<&ApartmentRecord>) -> Vec<&str> {
        v.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn combined_filter() {
        let records = vec![
            rec("1.1", Some(2), 1, 70.0, Status::Available),
            rec("2.1", Some(3), 2, 95.0, Status::Sold),
        ];
        let c = criteria(&[2], (1, 5), (50.0, 100.0), &[Status::Available]);
        assert_eq!(ids(filter(&records, &c)), vec!["1.1"]);
    }

    #[test]
    fn empty_bedroom_set_excludes_apartments_but_not_offices() {
        let records = vec![
            rec("1.1", Some(2), 1, 70.0, Status::Available),
            rec("ДП3", None, 0, 50.0, Status::Available),
        ];
        let c = criteria(&[], (0, 10), (0.0, 500.0), &[]);
        assert_eq!(ids(filter(&records, &c)), vec!["ДП3"]);
    }

    #[test]
    fn empty_status_set_restricts_nothing() {
        let records = vec![
            rec("1.1", Some(2), 1, 70.0, Status::Available),
            rec("1.2", Some(2), 1, 70.0, Status::Reserved),
            rec("1.3", Some(2), 1, 70.0, Status::Sold),
        ];
        let c = criteria(&[2], (1, 1), (70.0, 70.0), &[]);
        assert_eq!(ids(filter(&records, &c)), vec!["1.1", "1.2", "1.3"]);
    }

    #[test]
    fn office_passes_any_bedroom_selection() {
        let records = vec![rec("ДП3", None, 0, 50.0, Status::Sold)];
        for set in [&[][..], &[1][..], &[2, 3][..]] {
            let c = criteria(set, (0, 0), (50.0, 50.0), &[]);
            assert_eq!(filter(&records, &c).len(), 1);
        }
    }

    #[test]
    fn missing_floor_or_area_never_passes() {
        let mut r = rec("1.1", Some(2), 1, 70.0, Status::Available);
        r.floor = None;
        let c = criteria(&[2], (i32::MIN, i32::MAX), (f64::MIN, f64::MAX), &[]);
        assert!(!c.matches(&r));
        r.floor = Some(1);
        r.area = None;
        assert!(!c.matches(&r));
    }

    #[test]
    fn order_is_preserved() {
        let records = vec![
            rec("3.1", Some(2), 3, 70.0, Status::Available),
            rec("1.1", Some(2), 1, 70.0, Status::Available),
            rec("2.1", Some(2), 2, 70.0, Status::Available),
        ];
        let c = Criteria::permissive(&records);
        assert_eq!(ids(filter(&records, &c)), vec!["3.1", "1.1", "2.1"]);
    }

    #[test]
    fn summary_counts() {
        let records = vec![
            rec("1.1", Some(2), 1, 70.0, Status::Available),
            rec("2.1", Some(3), 2, 95.0, Status::Sold),
            rec("ДП1", None, 0, 50.0, Status::Available),
        ];
        let s = summarize(&records);
        assert_eq!(s.total, 3);
        assert_eq!(s.office_spaces, 1);
        assert_eq!(s.by_status[&Status::Available], 2);
        assert_eq!(s.bedroom_options, vec![2, 3]);
        assert_eq!(s.floor_range, Some((0, 2)));
        assert_eq!(s.area_range, Some((50.0, 95.0)));
    }
}
