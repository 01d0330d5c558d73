use fancy_regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

/// Upper bound on backtracking steps for a single match attempt.
const BACKTRACK_LIMIT: usize = 100_000;

/// Letters accepted after the closing slash of a `/pattern/flags` input.
const FLAG_CHARS: &str = "dgimsuvy";

/// A word, whitespace, then the same word again.
pub const DUPLICATE_WORDS_PATTERN: &str = r"\b(\w+)\s+\1\b";

// `(?i)` does not extend to backreferences, so this matcher folds the text instead.
static DUPLICATE_WORDS: LazyLock<Option<Matcher>> =
    LazyLock::new(|| compile(DUPLICATE_WORDS_PATTERN, false).map(Matcher::folding_case));

/// Lowercases every character whose lowercase form has the same UTF-8 length, so
/// byte offsets into the result are valid offsets into `text`.
fn fold_case(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_uppercase) {
        return Cow::Borrowed(text);
    }

    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) if l.len_utf8() == c.len_utf8() => folded.push(l),
            _ => folded.push(c),
        }
    }
    Cow::Owned(folded)
}

/// A compiled, reusable search pattern.
///
/// Matching never fails loudly: an attempt that exceeds the backtrack limit is
/// logged and treated as "no match".
#[derive(Clone)]
pub struct Matcher {
    regex: Regex,
    source: String,
    case_sensitive: bool,
    fold_text: bool,
}

impl Matcher {
    /// Matches against a lowercased copy of the text, for patterns with backreferences.
    fn folding_case(mut self) -> Self {
        self.fold_text = true;
        self
    }

    fn haystack<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.fold_text {
            fold_case(text)
        } else {
            Cow::Borrowed(text)
        }
    }

    /// The pattern body after delimiter stripping.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(&self.haystack(text)).unwrap_or_else(|e| {
            tracing::debug!("Match aborted for /{}/: {}", self.source, e);
            false
        })
    }

    /// Byte ranges of every non-overlapping, non-empty match, in order.
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        let haystack = self.haystack(text);
        let mut ranges = Vec::new();
        for found in self.regex.find_iter(&haystack) {
            match found {
                Ok(m) if m.start() < m.end() => ranges.push(m.start()..m.end()),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Match aborted for /{}/: {}", self.source, e);
                    break;
                }
            }
        }
        ranges
    }

    /// Text of capture `group` in the first match, sliced from the original `text`.
    fn first_group(&self, text: &str, group: usize) -> Option<String> {
        let haystack = self.haystack(text);
        let caps = self.regex.captures(&haystack).ok()??;
        caps.get(group).map(|m| text[m.start()..m.end()].to_string())
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("source", &self.source)
            .field("case_sensitive", &self.case_sensitive)
            .field("fold_text", &self.fold_text)
            .finish()
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.case_sensitive == other.case_sensitive
            && self.fold_text == other.fold_text
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternCheck {
    pub valid: bool,
    pub message: String,
}

struct PatternSource<'a> {
    body: &'a str,
    force_insensitive: bool,
}

/// Applies the `/pattern/flags` convention: one leading and one trailing slash are
/// stripped, and an `i` among the trailing flags forces case-insensitive matching.
fn strip_delimiters(input: &str) -> PatternSource<'_> {
    let trimmed = input.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return PatternSource { body: trimmed, force_insensitive: false };
    };

    if let Some(idx) = rest.rfind('/') {
        let flags = &rest[idx + 1..];
        if flags.chars().all(|c| FLAG_CHARS.contains(c)) {
            return PatternSource {
                body: &rest[..idx],
                force_insensitive: flags.contains('i'),
            };
        }
    }

    PatternSource { body: rest, force_insensitive: false }
}

fn build(body: &str, case_sensitive: bool) -> Result<Regex, fancy_regex::Error> {
    let pattern = if case_sensitive {
        body.to_string()
    } else {
        format!("(?i){}", body)
    };
    RegexBuilder::new(&pattern)
        .backtrack_limit(BACKTRACK_LIMIT)
        .build()
}

/// Compiles untrusted search text. Returns `None` for empty input or any syntax
/// error; callers treat `None` as "no active filter".
pub fn compile(input: &str, case_sensitive: bool) -> Option<Matcher> {
    let source = strip_delimiters(input);
    if source.body.is_empty() {
        return None;
    }

    let case_sensitive = case_sensitive && !source.force_insensitive;
    match build(source.body, case_sensitive) {
        Ok(regex) => Some(Matcher {
            regex,
            source: source.body.to_string(),
            case_sensitive,
            fold_text: false,
        }),
        Err(e) => {
            tracing::debug!("Rejected search pattern {:?}: {}", input, e);
            None
        }
    }
}

/// Diagnoses a pattern without keeping the compiled result.
pub fn validate(input: &str) -> PatternCheck {
    let source = strip_delimiters(input);
    if source.body.is_empty() {
        return PatternCheck {
            valid: false,
            message: "Pattern is empty.".to_string(),
        };
    }

    match build(source.body, false) {
        Ok(_) => PatternCheck {
            valid: true,
            message: "Valid pattern.".to_string(),
        },
        Err(e) => PatternCheck {
            valid: false,
            message: format!("Invalid pattern: {}", e),
        },
    }
}

/// The built-in duplicate-word matcher. "The the" counts as a repeat.
pub fn duplicate_words() -> Option<&'static Matcher> {
    DUPLICATE_WORDS.as_ref()
}

/// Returns the first word that appears twice in a row, as written on its first occurrence.
pub fn find_duplicate_word(text: &str) -> Option<String> {
    duplicate_words()?.first_group(text, 1)
}
