//! Pattern engine: turns user-typed search text into a bounded matcher and applies it
//! to records for filtering and highlighting.

pub mod filter;
pub mod highlight;
pub mod pattern;

pub use filter::{SearchScope, Searchable, filter, search};
pub use highlight::{escape_html, highlight};
pub use pattern::{
    DUPLICATE_WORDS_PATTERN, Matcher, PatternCheck, compile, duplicate_words, find_duplicate_word,
    validate,
};
