//! Catalog store: the mutable, ordered list of train records.
//!
//! The store is the single owner of the catalog for the process
//! lifetime. Rows are addressed by list position internally; the train
//! number is a display field and may repeat.

pub mod loader;
mod seed;

use tracing::info;

use crate::error::CatalogError;
use crate::models::{TrainRecord, TrainRecordDraft};

/// Owns the ordered catalog rows and every mutation on them.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Vec<TrainRecord>,
}

impl CatalogStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with the built-in seed timetable.
    pub fn seeded() -> Self {
        Self::from_records(seed::seed_records())
    }

    /// Store over explicit records, keeping their order.
    pub fn from_records(records: Vec<TrainRecord>) -> Self {
        Self { records }
    }

    /// Full ordered sequence, insertion order preserved.
    pub fn list(&self) -> &[TrainRecord] {
        &self.records
    }

    /// Number of catalog rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Case-insensitive substring filter over source and destination.
    ///
    /// An empty query matches every record for its field, so two empty
    /// queries return the full list. Read-only: the result borrows the
    /// store in list order.
    pub fn filter(&self, source_query: &str, destination_query: &str) -> Vec<&TrainRecord> {
        let source_needle = source_query.trim().to_lowercase();
        let destination_needle = destination_query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                (source_needle.is_empty()
                    || record.source.to_lowercase().contains(&source_needle))
                    && (destination_needle.is_empty()
                        || record
                            .destination
                            .to_lowercase()
                            .contains(&destination_needle))
            })
            .collect()
    }

    /// Validate a draft and append the resulting record.
    ///
    /// Duplicate train numbers are permitted; the seed itself has one.
    pub fn insert(&mut self, draft: &TrainRecordDraft) -> Result<&TrainRecord, CatalogError> {
        let record = draft.parse()?;
        info!(number = record.number, name = %record.name, "train inserted");
        self.records.push(record);
        Ok(self.records.last().expect("record just appended"))
    }

    /// Append an already-typed record.
    pub fn push(&mut self, record: TrainRecord) {
        self.records.push(record);
    }

    /// Remove every record whose train number matches exactly.
    ///
    /// The number is not unique, so one delete may drop several rows;
    /// the removal count is returned. Fails when nothing matched.
    pub fn delete(&mut self, number: u32) -> Result<usize, CatalogError> {
        let before = self.records.len();
        self.records.retain(|record| record.number != number);
        let removed = before - self.records.len();
        if removed == 0 {
            return Err(CatalogError::NumberNotFound(number));
        }
        info!(number, removed, "train deleted");
        Ok(removed)
    }

    /// First record serving the route, matched case-insensitively and
    /// exactly — no substring matching here, unlike [`CatalogStore::filter`].
    pub fn find_exact_route(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<&TrainRecord, CatalogError> {
        let index = self.route_index(source, destination).ok_or_else(|| {
            CatalogError::RouteNotFound {
                origin: source.trim().to_string(),
                destination: destination.trim().to_string(),
            }
        })?;
        Ok(&self.records[index])
    }

    /// Mutable access to the first record serving the route.
    pub(crate) fn route_mut(&mut self, source: &str, destination: &str) -> Option<&mut TrainRecord> {
        let index = self.route_index(source, destination)?;
        Some(&mut self.records[index])
    }

    fn route_index(&self, source: &str, destination: &str) -> Option<usize> {
        let source = source.trim();
        let destination = destination.trim();
        self.records.iter().position(|record| {
            record.source.eq_ignore_ascii_case(source)
                && record.destination.eq_ignore_ascii_case(destination)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainRecordDraft;

    fn draft(number: &str, source: &str, destination: &str) -> TrainRecordDraft {
        TrainRecordDraft {
            number: number.to_string(),
            name: "Test Express".to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            start_time: "10:00".to_string(),
            reach_time: "18:00".to_string(),
            total_seats: "100".to_string(),
            balance: "100".to_string(),
        }
    }

    #[test]
    fn empty_filter_equals_list() {
        let store = CatalogStore::seeded();
        let filtered = store.filter("", "");
        assert_eq!(filtered.len(), store.list().len());
        for (got, expected) in filtered.iter().zip(store.list()) {
            assert_eq!(*got, expected);
        }
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let store = CatalogStore::seeded();
        let filtered = store.filter("madurai", "chennai");
        assert!(!filtered.is_empty());
        for record in &filtered {
            assert!(record.source.to_lowercase().contains("madurai"));
            assert!(record.destination.to_lowercase().contains("chennai"));
        }
        // Result is a subsequence of list().
        let mut list_iter = store.list().iter();
        for record in filtered {
            assert!(list_iter.any(|candidate| candidate == record));
        }
    }

    #[test]
    fn filter_new_delhi_sources_matches_schedule_search() {
        let store = CatalogStore::seeded();
        let numbers: Vec<u32> = store
            .filter("New Delhi", "")
            .iter()
            .map(|record| record.number)
            .collect();
        assert_eq!(numbers, vec![12001, 12050, 12436, 12015, 12626]);
    }

    #[test]
    fn insert_appends_last() {
        let mut store = CatalogStore::seeded();
        let before = store.len();
        store.insert(&draft("19019", "Mumbai Central", "Dehradun")).unwrap();
        assert_eq!(store.len(), before + 1);
        let last = store.list().last().unwrap();
        assert_eq!(last.number, 19019);
        assert_eq!(last.source, "Mumbai Central");
    }

    #[test]
    fn insert_permits_duplicate_numbers() {
        let mut store = CatalogStore::new();
        store.insert(&draft("11078", "A", "B")).unwrap();
        store.insert(&draft("11078", "C", "D")).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn insert_rejects_bad_numeric_input() {
        let mut store = CatalogStore::new();
        let mut bad = draft("123", "A", "B");
        bad.total_seats = "lots".to_string();
        let err = store.insert(&bad).unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn delete_removes_all_matches() {
        let mut store = CatalogStore::seeded();
        let before = store.len();
        let removed = store.delete(11078).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), before - 2);
        assert!(store.list().iter().all(|record| record.number != 11078));
    }

    #[test]
    fn delete_missing_number_fails() {
        let mut store = CatalogStore::seeded();
        let err = store.delete(99999).unwrap_err();
        assert_eq!(err, CatalogError::NumberNotFound(99999));
    }

    #[test]
    fn find_exact_route_ignores_case_but_not_substrings() {
        let store = CatalogStore::seeded();
        let record = store.find_exact_route("madurai", "CHENNAI EGMORE").unwrap();
        assert_eq!(record.number, 22672);

        // "Chennai" alone is a substring, not an exact destination.
        assert!(store.find_exact_route("Madurai", "Chennai").is_err());
    }

    #[test]
    fn find_exact_route_returns_first_match() {
        let store = CatalogStore::seeded();
        // Four seed trains run Madurai -> Chennai Egmore; 22672 is first.
        let record = store.find_exact_route("Madurai", "Chennai Egmore").unwrap();
        assert_eq!(record.number, 22672);
    }

    #[test]
    fn route_lookup_reports_not_found() {
        let store = CatalogStore::seeded();
        let err = store.find_exact_route("Nowhere", "Elsewhere").unwrap_err();
        assert_eq!(
            err,
            CatalogError::RouteNotFound {
                origin: "Nowhere".to_string(),
                destination: "Elsewhere".to_string(),
            }
        );
    }
}
