use crate::pattern::Matcher;
use std::borrow::Cow;

/// Which fields a matcher is tried against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// Description, category and amount.
    Fields,
    /// Everything in `Fields` plus the date.
    FieldsAndDate,
}

pub trait Searchable {
    fn search_fields(&self, scope: SearchScope) -> Vec<Cow<'_, str>>;
}

fn retain_matching<T: Searchable + Clone>(
    items: &[T],
    matcher: Option<&Matcher>,
    scope: SearchScope,
) -> Vec<T> {
    let Some(matcher) = matcher else {
        return items.to_vec();
    };

    items
        .iter()
        .filter(|item| {
            item.search_fields(scope)
                .iter()
                .any(|field| matcher.is_match(field))
        })
        .cloned()
        .collect()
}

/// Keeps items whose description, category or amount matches. `None` keeps everything.
pub fn filter<T: Searchable + Clone>(items: &[T], matcher: Option<&Matcher>) -> Vec<T> {
    retain_matching(items, matcher, SearchScope::Fields)
}

/// Like [`filter`], but the date is searched too.
pub fn search<T: Searchable + Clone>(items: &[T], matcher: Option<&Matcher>) -> Vec<T> {
    retain_matching(items, matcher, SearchScope::FieldsAndDate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        description: &'static str,
        category: &'static str,
        amount: f64,
        date: &'static str,
    }

    impl Searchable for Entry {
        fn search_fields(&self, scope: SearchScope) -> Vec<Cow<'_, str>> {
            let mut fields = vec![
                Cow::Borrowed(self.description),
                Cow::Borrowed(self.category),
                Cow::Owned(self.amount.to_string()),
            ];
            if scope == SearchScope::FieldsAndDate {
                fields.push(Cow::Borrowed(self.date));
            }
            fields
        }
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry { description: "Coffee", category: "Food", amount: 4.5, date: "2026-10-01" },
            Entry { description: "Bus pass", category: "Transport", amount: 30.0, date: "2026-09-15" },
            Entry { description: "Novel", category: "Books", amount: 12.99, date: "2026-10-02" },
        ]
    }

    #[test]
    fn test_filter_without_matcher_returns_everything() {
        let items = entries();
        assert_eq!(filter(&items, None), items);
    }

    #[test]
    fn test_filter_matches_description_category_amount() {
        let items = entries();

        let by_desc = compile("coffee", false).unwrap();
        assert_eq!(filter(&items, Some(&by_desc)).len(), 1);

        let by_cat = compile("^books$", false).unwrap();
        assert_eq!(filter(&items, Some(&by_cat))[0].description, "Novel");

        // 30.0 renders as "30".
        let by_amount = compile("^30$", false).unwrap();
        assert_eq!(filter(&items, Some(&by_amount))[0].description, "Bus pass");
    }

    #[test]
    fn test_search_includes_date() {
        let items = entries();
        let by_month = compile("^2026-10", false).unwrap();

        assert!(filter(&items, Some(&by_month)).is_empty());
        assert_eq!(search(&items, Some(&by_month)).len(), 2);
    }
}
