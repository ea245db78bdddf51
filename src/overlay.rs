use std::collections::HashSet;

use anyhow::Result;
use quick_xml::events::Event;
use serde::Serialize;

use crate::store::ApartmentStore;

/// Every value of `attribute` in the SVG, in document order. Values are kept
/// verbatim: the join with apartment ids is exact.
pub fn collect_ids(svg: &str, attribute: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(svg);
    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == attribute.as_bytes() {
                        ids.push(attr.unescape_value()?.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coverage {
    pub matched: Vec<String>,
    /// Records with no overlay element.
    pub missing_overlay: Vec<String>,
    /// Overlay elements with no record.
    pub unknown_ids: Vec<String>,
}

pub fn coverage(store: &ApartmentStore, overlay_ids: &[String]) -> Coverage {
    let overlay: HashSet<&str> = overlay_ids.iter().map(|s| s.as_str()).collect();
    let mut c = Coverage::default();

    for r in store.records() {
        if overlay.contains(r.id.as_str()) {
            c.matched.push(r.id.clone());
        } else {
            c.missing_overlay.push(r.id.clone());
        }
    }

    let mut seen = HashSet::new();
    for id in overlay_ids {
        if store.get(id).is_none() && seen.insert(id.as_str()) {
            c.unknown_ids.push(id.clone());
        }
    }
    c
}
