use crate::models::{Record, SortOrder};
use storage::{self, RECORDS_KEY, SORT_KEY, Storage, StorageError};

pub(crate) struct RecordRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> RecordRepository<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    pub fn load_all(&self) -> Result<Vec<Record>, StorageError> {
        Ok(storage::load_json(self.storage, RECORDS_KEY)?.unwrap_or_default())
    }

    pub fn save_all(&self, records: &[Record]) -> Result<(), StorageError> {
        storage::save_json(self.storage, RECORDS_KEY, records)
    }

    pub fn load_sort(&self) -> Result<Option<SortOrder>, StorageError> {
        storage::load_json(self.storage, SORT_KEY)
    }

    pub fn save_sort(&self, order: &SortOrder) -> Result<(), StorageError> {
        storage::save_json(self.storage, SORT_KEY, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortKey};
    use chrono::Utc;
    use storage::get_test_storage;

    fn record(id: &str) -> Record {
        let now = Utc::now();
        Record {
            id: id.into(),
            description: "Tea".into(),
            amount: 3.0,
            category: "Food".into(),
            date: "2026-10-01".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_storage_loads_nothing() {
        let storage = get_test_storage();
        let repo = RecordRepository::new(storage.as_ref());
        assert!(repo.load_all().unwrap().is_empty());
        assert!(repo.load_sort().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_records() {
        let storage = get_test_storage();
        let repo = RecordRepository::new(storage.as_ref());

        let records = vec![record("a"), record("b")];
        repo.save_all(&records).unwrap();
        assert_eq!(repo.load_all().unwrap(), records);
    }

    #[test]
    fn test_save_and_load_sort() {
        let storage = get_test_storage();
        let repo = RecordRepository::new(storage.as_ref());

        let order = SortOrder::new(SortKey::Amount, SortDirection::Asc);
        repo.save_sort(&order).unwrap();
        assert_eq!(repo.load_sort().unwrap(), Some(order));
    }

    #[test]
    fn test_stored_layout_is_json_array() {
        let storage = get_test_storage();
        let repo = RecordRepository::new(storage.as_ref());
        repo.save_all(&[record("a")]).unwrap();

        let raw = storage.get_item(RECORDS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value.as_array().unwrap()[0];
        for key in ["id", "description", "amount", "category", "date", "createdAt", "updatedAt"] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
    }
}
