// Rotation cursor and row enrichment
// The only shared mutable state in the process lives here

use chrono::{SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use std::sync::Mutex;
use uuid::Uuid;

use super::loader::{Dataset, RowRecord};
use crate::config::DataConfig;

/// A row as returned to a client: a copy of the stored row plus an injected
/// `id` and, when the source lacks one, a `timestamp`.
pub type ServedRecord = RowRecord;

/// Serves rows from the loaded dataset in file order, wrapping around.
///
/// Cursor advances and batch-size draws serialize behind mutexes, so a row
/// is never skipped or double-served for a single advance even though
/// connection tasks run on a multi-threaded runtime. The locks are held
/// only for the few statements of an advance or a draw; no await happens
/// under either lock.
pub struct DataService {
    dataset: Option<Dataset>,
    cursor: Mutex<usize>,
    rng: Mutex<StdRng>,
    bulk_min: usize,
    bulk_max: usize,
}

impl DataService {
    pub fn new(dataset: Option<Dataset>, data_cfg: &DataConfig) -> Self {
        Self::with_rng(dataset, data_cfg, StdRng::from_entropy())
    }

    /// Same as `new` but with a caller-supplied RNG, so tests can seed the
    /// batch-size draw.
    pub fn with_rng(dataset: Option<Dataset>, data_cfg: &DataConfig, rng: StdRng) -> Self {
        Self {
            dataset,
            cursor: Mutex::new(0),
            rng: Mutex::new(rng),
            bulk_min: data_cfg.bulk_min,
            bulk_max: data_cfg.bulk_max,
        }
    }

    /// Whether a dataset with at least one row was loaded at startup.
    pub fn is_loaded(&self) -> bool {
        self.dataset.as_ref().is_some_and(|d| !d.is_empty())
    }

    pub fn row_count(&self) -> usize {
        self.dataset.as_ref().map_or(0, Dataset::len)
    }

    /// Serve the row under the cursor and advance it, wrapping at the end.
    ///
    /// The stored row is never mutated: the record is cloned before `id`
    /// and `timestamp` are injected. `id` is a fresh UUID per serving, so
    /// two servings of the same underlying row never share one.
    pub fn next_record(&self) -> Option<ServedRecord> {
        let dataset = self.dataset.as_ref().filter(|d| !d.is_empty())?;

        let mut cursor = self.cursor.lock().unwrap();
        let mut record = dataset.rows()[*cursor].clone();
        *cursor = (*cursor + 1) % dataset.len();
        drop(cursor);

        record.insert(
            "id".to_string(),
            Value::String(Uuid::new_v4().to_string()),
        );
        if !record.contains_key("timestamp") {
            record.insert(
                "timestamp".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }

        Some(record)
    }

    /// Serve a batch of records.
    ///
    /// The size is drawn uniformly from the configured inclusive range and
    /// clamped to the dataset length, so a single batch never asks for more
    /// servings than there are rows (rows may still repeat across batches
    /// via wraparound). Stops early if a record cannot be produced,
    /// returning the partial batch.
    pub fn next_batch(&self) -> Vec<ServedRecord> {
        let rows = self.row_count();
        if rows == 0 {
            return Vec::new();
        }

        let requested = {
            let mut rng = self.rng.lock().unwrap();
            rng.gen_range(self.bulk_min..=self.bulk_max)
        };
        let size = requested.min(rows);

        let mut batch = Vec::with_capacity(size);
        for _ in 0..size {
            match self.next_record() {
                Some(record) => batch.push(record),
                None => break,
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn test_config() -> DataConfig {
        DataConfig {
            csv_path: String::new(),
            bulk_min: 3,
            bulk_max: 7,
        }
    }

    fn dataset(rows: usize) -> Dataset {
        let columns = vec!["device".to_string(), "reading".to_string()];
        let rows = (0..rows)
            .map(|i| {
                let mut row = RowRecord::new();
                row.insert("device".to_string(), Value::String(format!("sensor-{i}")));
                row.insert("reading".to_string(), Value::String(i.to_string()));
                row
            })
            .collect();
        Dataset::new(columns, rows)
    }

    fn seeded_service(rows: usize, seed: u64) -> DataService {
        DataService::with_rng(
            Some(dataset(rows)),
            &test_config(),
            StdRng::seed_from_u64(seed),
        )
    }

    #[test]
    fn rotates_through_rows_in_order_and_wraps() {
        let service = seeded_service(4, 1);
        for i in 0..4 {
            let record = service.next_record().expect("record");
            assert_eq!(record["device"], format!("sensor-{i}"));
        }
        let wrapped = service.next_record().expect("record");
        assert_eq!(wrapped["device"], "sensor-0");
    }

    #[test]
    fn served_record_keeps_all_source_keys() {
        let service = seeded_service(1, 1);
        let record = service.next_record().expect("record");
        assert!(record.contains_key("device"));
        assert!(record.contains_key("reading"));
        assert!(record.contains_key("id"));
        assert!(record.contains_key("timestamp"));
    }

    #[test]
    fn injects_unique_id_per_serving() {
        let service = seeded_service(1, 1);
        let first = service.next_record().expect("record");
        let second = service.next_record().expect("record");
        // Same underlying row, fresh id each time
        assert_eq!(first["device"], second["device"]);
        assert_ne!(first["id"], second["id"]);
    }

    #[test]
    fn generates_timestamp_when_column_absent() {
        let service = seeded_service(1, 1);
        let record = service.next_record().expect("record");
        let ts = record["timestamp"].as_str().expect("timestamp string");
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn passes_timestamp_column_through() {
        let columns = vec!["device".to_string(), "timestamp".to_string()];
        let mut row = RowRecord::new();
        row.insert("device".to_string(), Value::String("sensor-0".to_string()));
        row.insert(
            "timestamp".to_string(),
            Value::String("2020-01-01T00:00:00Z".to_string()),
        );
        let service = DataService::with_rng(
            Some(Dataset::new(columns, vec![row])),
            &test_config(),
            StdRng::seed_from_u64(1),
        );

        let record = service.next_record().expect("record");
        assert_eq!(record["timestamp"], "2020-01-01T00:00:00Z");
    }

    #[test]
    fn stored_rows_are_never_mutated() {
        let service = seeded_service(2, 1);
        for _ in 0..3 {
            service.next_record();
        }
        let dataset = service.dataset.as_ref().expect("dataset");
        for row in dataset.rows() {
            assert!(!row.contains_key("id"));
            assert!(!row.contains_key("timestamp"));
        }
    }

    #[test]
    fn empty_service_serves_nothing() {
        let service = DataService::with_rng(None, &test_config(), StdRng::seed_from_u64(1));
        assert!(!service.is_loaded());
        assert!(service.next_record().is_none());
        assert!(service.next_batch().is_empty());
    }

    #[test]
    fn batch_size_stays_in_configured_range() {
        let service = seeded_service(10, 7);
        for _ in 0..20 {
            let batch = service.next_batch();
            assert!((3..=7).contains(&batch.len()), "got {}", batch.len());
        }
    }

    #[test]
    fn batch_clamps_to_single_row_dataset() {
        let service = seeded_service(1, 7);
        assert_eq!(service.next_batch().len(), 1);
    }

    #[test]
    fn batch_advances_the_cursor_with_wraparound() {
        let service = seeded_service(4, 3);
        let batch = service.next_batch();
        let next = service.next_record().expect("record");
        assert_eq!(next["device"], format!("sensor-{}", batch.len() % 4));
    }
}
