pub mod records;
pub mod reports;
pub mod settings;

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

/// Tells the user a change only lives in memory for this run.
pub(crate) fn warn_unsaved(saved: bool) {
    if !saved {
        eprintln!("warning: the change could not be saved and will be lost when this session ends");
    }
}
