use indexmap::IndexMap;

use crate::model::{ApartmentRecord, Detection, Provenance, RawField, Status, Subjects};
use crate::sheet::legend::StatusLegend;
use crate::sheet::normalize::defaults::{area_for, OFFICE_FLOOR};
use crate::store::{ApartmentStore, DataSource};

const FLOORS: i32 = 8;
const UNITS_PER_FLOOR: usize = 9;
const OFFICE_SPACES: usize = 9;
const STATUS_CYCLE: [Status; 5] = [
    Status::Available,
    Status::Available,
    Status::Reserved,
    Status::Available,
    Status::Sold,
];

/// Synthetic building used when the sheet cannot be loaded: 8 floors of 9
/// apartments (`"3.4"`) plus 9 ground-floor office spaces (`"ДП1"`..).
pub fn records(office_prefix: &str) -> Vec<ApartmentRecord> {
    let mut out = Vec::with_capacity(FLOORS as usize * UNITS_PER_FLOOR + OFFICE_SPACES);

    for n in 1..=OFFICE_SPACES {
        out.push(record(
            format!("{}{}", office_prefix, n),
            true,
            None,
            OFFICE_FLOOR,
            out.len(),
        ));
    }

    for floor in 1..=FLOORS {
        for unit in 1..=UNITS_PER_FLOOR {
            let bedrooms = 1 + (unit as u8 - 1) % 4;
            out.push(record(
                format!("{}.{}", floor, unit),
                false,
                Some(bedrooms),
                floor,
                out.len(),
            ));
        }
    }

    out
}

pub fn store(office_prefix: &str) -> ApartmentStore {
    ApartmentStore::new(
        records(office_prefix),
        Vec::new(),
        StatusLegend::from_pairs([
            ("1", "Available"),
            ("2", "Reserved"),
            ("3", "Sold"),
        ]),
        DataSource::Sample,
    )
}

fn record(
    id: String,
    is_office_space: bool,
    bedrooms: Option<u8>,
    floor: i32,
    index: usize,
) -> ApartmentRecord {
    let area = area_for(is_office_space, bedrooms) + (index % 3) as f64 * 2.5;
    let status = STATUS_CYCLE[index % STATUS_CYCLE.len()];

    let mut raw_fields = IndexMap::new();
    raw_fields.insert(
        "Број".to_string(),
        RawField {
            value: id.clone(),
            column_index: 0,
            filter_keyword: "id".to_string(),
            is_visible: true,
            subjects: Subjects {
                mk: "Број".into(),
                en: "Number".into(),
                sq: "Numri".into(),
            },
        },
    );

    let sample = || Some(Detection::Default("sample".into()));
    ApartmentRecord {
        id,
        row_index: index,
        is_office_space,
        bedrooms,
        floor: Some(floor),
        area: Some(area),
        status,
        raw_fields,
        provenance: Provenance {
            bedrooms: if is_office_space {
                Some(Detection::Exempt)
            } else {
                sample()
            },
            floor: sample(),
            area: sample(),
            status: sample(),
        },
    }
}
