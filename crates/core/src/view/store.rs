//! Raw record store.

use super::Record;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The batch most recently fetched for one screen, in backend order.
#[derive(Clone, Debug)]
pub struct RecordStore<R> {
    records: Vec<R>,
    fetched_at: Option<DateTime<Utc>>,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            fetched_at: None,
        }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole batch with a fresh fetch.
    ///
    /// Identifiers are expected to be unique but this is not enforced;
    /// duplicates are logged and per-id operations act on the first match.
    pub fn replace(&mut self, records: Vec<R>, fetched_at: DateTime<Utc>) {
        let mut seen = HashSet::with_capacity(records.len());
        let duplicates: Vec<&str> = records
            .iter()
            .map(|r| r.id())
            .filter(|id| !seen.insert(*id))
            .collect();
        if !duplicates.is_empty() {
            tracing::warn!(
                count = duplicates.len(),
                ids = ?duplicates,
                "fetched batch contains duplicate identifiers"
            );
        }

        self.records = records;
        self.fetched_at = Some(fetched_at);
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Apply a local change to the record with `id`, e.g. after a status
    /// update was accepted by the backend. Returns `false` if no record has
    /// that id.
    pub fn patch<F>(&mut self, id: &str, apply: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                apply(record);
                true
            }
            None => false,
        }
    }

    /// Replace the record carrying the same id, or append it.
    pub fn upsert(&mut self, record: R) {
        match self.records.iter().position(|r| r.id() == record.id()) {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<R> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderStatus};

    fn batch() -> Vec<Order> {
        serde_json::from_str(
            r#"[{"id": "o-1", "status": "pending"},
                {"id": "o-2", "status": "pending"},
                {"id": "o-1", "status": "approved"}]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_replace_keeps_duplicates_and_order() {
        let mut store = RecordStore::new();
        store.replace(batch(), Utc::now());

        assert_eq!(store.len(), 3);
        assert!(store.fetched_at().is_some());
        assert_eq!(store.get("o-1").unwrap().status, Some(OrderStatus::Pending));
    }

    #[test]
    fn test_patch_updates_first_match_only() {
        let mut store = RecordStore::new();
        store.replace(batch(), Utc::now());

        assert!(store.patch("o-1", |o| o.status = Some(OrderStatus::Denied)));
        assert_eq!(store.records()[0].status, Some(OrderStatus::Denied));
        assert_eq!(store.records()[2].status, Some(OrderStatus::Approved));
        assert!(!store.patch("missing", |o| o.status = None));
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut store: RecordStore<Order> = RecordStore::new();
        store.replace(batch(), Utc::now());

        let mut replacement = store.get("o-2").unwrap().clone();
        replacement.report_url = Some("https://files/o-2.pdf".into());
        store.upsert(replacement);
        assert_eq!(store.len(), 3);
        assert!(store.get("o-2").unwrap().report_url.is_some());

        let mut fresh = replacement_template();
        fresh.id = "o-9".into();
        store.upsert(fresh);
        assert_eq!(store.len(), 4);

        assert!(store.remove("o-2").is_some());
        assert!(store.remove("o-2").is_none());
        assert_eq!(store.len(), 3);
    }

    fn replacement_template() -> Order {
        serde_json::from_str(r#"{"id": "tmp"}"#).unwrap()
    }
}
