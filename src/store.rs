use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{ApartmentRecord, ColumnSchema, Language};
use crate::query::{self, Criteria, Summary};
use crate::sheet::legend::StatusLegend;
use crate::sheet::ParsedSheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Sheet,
    Sample,
}

/// One load's worth of apartments. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ApartmentStore {
    records: Vec<ApartmentRecord>,
    by_id: HashMap<String, usize>,
    schema: Vec<ColumnSchema>,
    legend: StatusLegend,
    source: DataSource,
    loaded_at: DateTime<Utc>,
}

impl ApartmentStore {
    pub fn new(
        records: Vec<ApartmentRecord>,
        schema: Vec<ColumnSchema>,
        legend: StatusLegend,
        source: DataSource,
    ) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            records,
            by_id,
            schema,
            legend,
            source,
            loaded_at: Utc::now(),
        }
    }

    pub fn from_sheet(sheet: ParsedSheet) -> Self {
        Self::new(sheet.records, sheet.schema, sheet.legend, DataSource::Sheet)
    }

    pub fn records(&self) -> &[ApartmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-sensitive id lookup.
    pub fn get(&self, id: &str) -> Option<&ApartmentRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    pub fn filter(&self, criteria: &Criteria) -> Vec<&ApartmentRecord> {
        query::filter(&self.records, criteria)
    }

    pub fn summary(&self) -> Summary {
        query::summarize(&self.records)
    }

    pub fn visible_fields(&self, id: &str, language: Language) -> Option<Vec<(String, String)>> {
        self.get(id).map(|r| r.visible_fields(language))
    }

    /// Legend text for a record's status: its raw code first, then its
    /// canonical status, then the canonical name.
    pub fn status_label<'a>(&'a self, record: &'a ApartmentRecord) -> &'a str {
        record
            .status_code()
            .and_then(|code| self.legend.label_for_code(code))
            .or_else(|| self.legend.label_for_status(record.status))
            .unwrap_or(record.status.as_str())
    }

    pub fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    pub fn legend(&self) -> &StatusLegend {
        &self.legend
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Holds the current store. Readers get a snapshot; a reload swaps in a fully
/// built store in one step, so nobody sees a half-built set.
pub struct Catalog {
    current: RwLock<Arc<ApartmentStore>>,
}

impl Catalog {
    pub fn new(store: ApartmentStore) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
        }
    }

    pub fn snapshot(&self) -> Arc<ApartmentStore> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replace the current store, returning the previous one.
    pub fn publish(&self, store: ApartmentStore) -> Arc<ApartmentStore> {
        let next = Arc::new(store);
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Detection, Provenance, RawField, Status, Subjects};

    fn rec(id: &str) -> ApartmentRecord {
        ApartmentRecord {
            id: id.into(),
            row_index: 0,
            is_office_space: false,
            bedrooms: Some(2),
            floor: Some(1),
            area: Some(70.0),
            status: Status::Available,
            raw_fields: Default::default(),
            provenance: Provenance::default(),
        }
    }

    fn store(ids: &[&str], source: DataSource) -> ApartmentStore {
        ApartmentStore::new(
            ids.iter().map(|id| rec(id)).collect(),
            Vec::new(),
            StatusLegend::default(),
            source,
        )
    }

    #[test]
    fn lookup_is_exact() {
        let s = store(&["1.1", "A1"], DataSource::Sheet);
        assert!(s.get("1.1").is_some());
        assert!(s.get("a1").is_none());
        assert!(s.get(" 1.1").is_none());
    }

    #[test]
    fn status_label_prefers_raw_code() {
        let mut r = rec("1.1");
        r.status = Status::Sold;
        r.raw_fields.insert(
            "Статус".into(),
            RawField {
                value: " 3 ".into(),
                column_index: 5,
                filter_keyword: "status".into(),
                is_visible: true,
                subjects: Subjects::default(),
            },
        );
        r.provenance.status = Some(Detection::Keyword("Статус".into()));
        let placeholder = rec("1.2");

        let legend = StatusLegend::from_pairs([("3", "Продаден"), ("1", "Слободен")]);
        let s = ApartmentStore::new(vec![r, placeholder], Vec::new(), legend, DataSource::Sheet);

        assert_eq!(s.status_label(s.get("1.1").unwrap()), "Продаден");
        // No raw code: falls back to the canonical status.
        assert_eq!(s.status_label(s.get("1.2").unwrap()), "Слободен");
        assert!(!s.is_empty());
    }

    #[test]
    fn status_label_without_legend_is_canonical_name() {
        let s = store(&["1.1"], DataSource::Sample);
        assert_eq!(s.status_label(s.get("1.1").unwrap()), "available");
        assert!(store(&[], DataSource::Sheet).is_empty());
    }

    #[test]
    fn publish_swaps_whole_store() {
        let catalog = Catalog::new(store(&["1.1"], DataSource::Sample));
        let before = catalog.snapshot();

        let previous = catalog.publish(store(&["2.1", "2.2"], DataSource::Sheet));
        let after = catalog.snapshot();

        assert_eq!(previous.len(), 1);
        // Old snapshots stay intact.
        assert_eq!(before.len(), 1);
        assert_eq!(before.source(), DataSource::Sample);
        assert_eq!(after.len(), 2);
        assert_eq!(after.source(), DataSource::Sheet);
    }
}
