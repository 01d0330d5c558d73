use crate::models::{
    BudgetInfo, Record, RecordInput, SortDirection, SortKey, SortOrder, Stats, Trend,
};
use crate::repository::RecordRepository;
use crate::transfer::{self, ImportError};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use search::Matcher;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use storage::{Persisted, SharedStorage};
use tracing::instrument;

/// Number of calendar days in the trend window: six back, today, one ahead.
const TREND_DAYS: u64 = 8;
const TREND_DAYS_BEFORE: u64 = 6;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("Export failed: {0}")]
    Export(#[from] serde_json::Error),
}

/// Case-insensitive first, then lowercase before uppercase.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn compare(a: &Record, b: &Record, key: SortKey) -> Ordering {
    match key {
        SortKey::Amount => a.amount.total_cmp(&b.amount),
        SortKey::Date => locale_cmp(&a.date, &b.date),
        SortKey::Description => locale_cmp(&a.description, &b.description),
        SortKey::Category => locale_cmp(&a.category, &b.category),
    }
}

/// Stable sort; equal keys keep their previous relative order.
pub fn sort(mut records: Vec<Record>, order: SortOrder) -> Vec<Record> {
    sort_in_place(&mut records, order);
    records
}

fn sort_in_place(records: &mut [Record], order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, order.key);
        match order.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Highest value wins; on a tie the alphabetically first category is kept.
fn top_category<V: PartialOrd + Copy>(totals: &BTreeMap<String, V>) -> Option<String> {
    let mut best: Option<(&String, V)> = None;
    for (name, &value) in totals {
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((name, value));
        }
    }
    best.map(|(name, _)| name.clone())
}

/// Owns the record collection and its active ordering; every mutation goes through here
/// and is written back through the storage collaborator.
pub struct RecordStore {
    storage: SharedStorage,
    records: Vec<Record>,
    sort: SortOrder,
}

impl RecordStore {
    /// Loads the persisted collection. Unreadable data is logged and replaced by an
    /// empty collection rather than failing startup.
    pub fn load(storage: SharedStorage) -> Self {
        let repo = RecordRepository::new(storage.as_ref());

        let records = repo.load_all().unwrap_or_else(|e| {
            tracing::warn!("Stored records unreadable, starting empty: {}", e);
            Vec::new()
        });
        let sort = repo
            .load_sort()
            .unwrap_or_else(|e| {
                tracing::warn!("Stored sort order unreadable, using default: {}", e);
                None
            })
            .unwrap_or_default();

        let mut store = Self {
            storage,
            records,
            sort,
        };
        sort_in_place(&mut store.records, store.sort);
        tracing::info!("Loaded {} records sorted by {} {}", store.records.len(), sort.key, sort.direction);
        store
    }

    /// A snapshot of the collection in the active order.
    pub fn records(&self) -> Vec<Record> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn find_by_id(&self, id: &str) -> Option<Record> {
        self.records.iter().find(|r| r.id == id).cloned()
    }

    fn persist(&self) -> bool {
        match RecordRepository::new(self.storage.as_ref()).save_all(&self.records) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save records: {}", e);
                false
            }
        }
    }

    fn next_id(&self) -> String {
        loop {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(8)
                .map(|b| char::from(b).to_ascii_lowercase())
                .collect();
            let id = format!("rec_{}_{}", Utc::now().timestamp_millis(), suffix);
            if !self.records.iter().any(|r| r.id == id) {
                return id;
            }
        }
    }

    #[instrument(skip(self, input))]
    pub fn add(&mut self, input: &RecordInput) -> Persisted<Record> {
        let now = Utc::now();
        let record = Record {
            id: self.next_id(),
            description: input.description().trim().to_string(),
            amount: input.amount(),
            category: input.category().to_string(),
            date: input.date().to_string(),
            created_at: now,
            updated_at: now,
        };

        self.records.insert(0, record.clone());
        sort_in_place(&mut self.records, self.sort);
        tracing::info!("Added record {}", record.id);

        Persisted::new(record, self.persist())
    }

    #[instrument(skip(self, input))]
    pub fn update(&mut self, id: &str, input: &RecordInput) -> Result<Persisted<Record>, RecordError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

        record.description = input.description().trim().to_string();
        record.amount = input.amount();
        record.category = input.category().to_string();
        record.date = input.date().to_string();
        record.updated_at = Utc::now();
        let updated = record.clone();

        sort_in_place(&mut self.records, self.sort);
        tracing::info!("Updated record {}", id);

        Ok(Persisted::new(updated, self.persist()))
    }

    #[instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Persisted<Record>, RecordError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

        // Vec::remove keeps the relative order of the rest, so no re-sort.
        let removed = self.records.remove(index);
        tracing::info!("Deleted record {}", id);

        Ok(Persisted::new(removed, self.persist()))
    }

    #[instrument(skip(self))]
    pub fn set_sort(&mut self, order: SortOrder) -> Persisted<SortOrder> {
        self.sort = order;
        sort_in_place(&mut self.records, order);

        let sort_saved = match RecordRepository::new(self.storage.as_ref()).save_sort(&order) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save sort order: {}", e);
                false
            }
        };
        let records_saved = self.persist();

        Persisted::new(order, sort_saved && records_saved)
    }

    /// Removes every record; returns how many were dropped.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Persisted<usize> {
        let count = self.records.len();
        self.records.clear();
        Persisted::new(count, self.persist())
    }

    pub fn filter(&self, matcher: Option<&Matcher>) -> Vec<Record> {
        search::filter(&self.records, matcher)
    }

    /// Like [`RecordStore::filter`] but also matches against the date.
    pub fn search(&self, matcher: Option<&Matcher>) -> Vec<Record> {
        search::search(&self.records, matcher)
    }

    pub fn total_spent(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }

    pub fn stats(&self) -> Stats {
        let total_records = self.records.len();
        let total_spent = self.total_spent();
        let avg_spent = if total_records == 0 {
            0.0
        } else {
            total_spent / total_records as f64
        };

        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut category_amounts: BTreeMap<String, f64> = BTreeMap::new();
        for r in &self.records {
            *category_counts.entry(r.category.clone()).or_default() += 1;
            *category_amounts.entry(r.category.clone()).or_default() += r.amount;
        }

        Stats {
            total_records,
            total_spent,
            avg_spent,
            top_category_by_count: top_category(&category_counts),
            top_category_by_amount: top_category(&category_amounts),
            category_counts,
            category_amounts,
        }
    }

    /// Daily totals from six days before `today` through the day after it.
    pub fn seven_day_trend(&self, today: NaiveDate) -> Trend {
        let start = today
            .checked_sub_days(Days::new(TREND_DAYS_BEFORE))
            .unwrap_or(today);
        let days: Vec<NaiveDate> = (0..TREND_DAYS)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .collect();

        let amounts = days
            .iter()
            .map(|day| {
                let key = day.format("%Y-%m-%d").to_string();
                self.records
                    .iter()
                    .filter(|r| r.date == key)
                    .map(|r| r.amount)
                    .sum::<f64>()
            })
            .collect();
        let labels = days.iter().map(|day| day.format("%b %-d").to_string()).collect();

        Trend { labels, amounts }
    }

    pub fn budget_info(&self, budget_cap: f64) -> BudgetInfo {
        let total_spent = self.total_spent();
        let percent_used = if budget_cap > 0.0 {
            total_spent / budget_cap * 100.0
        } else {
            0.0
        };

        BudgetInfo {
            budget_cap,
            total_spent,
            remaining: (budget_cap - total_spent).abs(),
            is_over_budget: total_spent > budget_cap,
            percent_used,
        }
    }

    /// Replaces the whole collection with the records in `json`. Nothing changes
    /// unless every element is well formed.
    #[instrument(skip(self, json))]
    pub fn import_json(&mut self, json: &str) -> Result<Persisted<usize>, RecordError> {
        let mut imported = transfer::parse_import(json, Utc::now())?;
        sort_in_place(&mut imported, self.sort);

        let count = imported.len();
        self.records = imported;
        tracing::info!("Imported {} records", count);

        Ok(Persisted::new(count, self.persist()))
    }

    pub fn export_json(&self) -> Result<String, RecordError> {
        Ok(transfer::export_json(&self.records)?)
    }
}
