pub mod models;
pub mod service;
pub mod transfer;
pub mod validation;

mod repository;

pub use models::{
    BudgetInfo, DEFAULT_CATEGORIES, Record, RecordInput, SortDirection, SortKey, SortOrder, Stats,
    Trend,
};
pub use service::{RecordError, RecordStore, sort};
pub use transfer::ImportError;
pub use validation::{
    Accepted, Field, FieldCheck, FieldValidator, RawRecordFields, RecordEdit, ValidationReport,
    Warning,
};
