/*!
# `jpath` Library

Filters JSON-shaped trees with compact path patterns such as
`store.books[price<10 && author~=tolkien].title`.

```
use serde_json::json;

let tree = json!({"n": [{"v": 1}, {"v": 5}]});
let matches = jpath::filter(&tree, "n[v>2]").expect("valid pattern");
assert_eq!(matches, vec![json!({"v": 5})]);
```

Patterns are made of dot-separated segments: a key, `*`, `key[index]`, or
`key[condition]`/`*[condition]`. Paths that do not resolve simply match
nothing; only a malformed condition is reported as an error.
*/

pub mod commands;
pub mod input;
pub mod query;
pub mod tokenizer;
pub mod utils;

use serde_json::Value;

use query::{Match, Query, QueryError};

// Re-exports
pub use utils::depth;

/// Creates a [`Query`] over `tree` with the matches of `pattern` selected.
///
/// # Errors
///
/// Returns [`QueryError::InvalidConditionSyntax`] for a malformed condition.
pub fn select<'a>(tree: &'a Value, pattern: &str) -> Result<Query<'a>, QueryError> {
    let mut query = Query::new(tree);
    query.select(pattern)?;
    Ok(query)
}

/// Like [`select`], with `predicate` answering `?` comparisons.
///
/// # Errors
///
/// Returns [`QueryError::InvalidConditionSyntax`] for a malformed condition.
pub fn select_with<'a, F>(
    tree: &'a Value,
    pattern: &str,
    predicate: F,
) -> Result<Query<'a>, QueryError>
where
    F: Fn(Option<&Match<'_>>, &str) -> bool,
{
    let mut query = Query::new(tree);
    query.select_with(pattern, predicate)?;
    Ok(query)
}

/// Returns the matches of `pattern` in `tree`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidConditionSyntax`] for a malformed condition.
pub fn filter<'a>(tree: &'a Value, pattern: &str) -> Result<Vec<Match<'a>>, QueryError> {
    Ok(select(tree, pattern)?.into_val())
}

/// Like [`filter`], with `predicate` answering `?` comparisons.
///
/// # Errors
///
/// Returns [`QueryError::InvalidConditionSyntax`] for a malformed condition.
pub fn filter_with<'a, F>(
    tree: &'a Value,
    pattern: &str,
    predicate: F,
) -> Result<Vec<Match<'a>>, QueryError>
where
    F: Fn(Option<&Match<'_>>, &str) -> bool,
{
    Ok(select_with(tree, pattern, predicate)?.into_val())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_path() {
        let tree = json!({"a": {"b": {"c": 5}}});
        assert_eq!(filter(&tree, "a.b.c").unwrap(), vec![json!(5)]);
    }

    #[test]
    fn wildcard_returns_whole_map() {
        let tree = json!({"a": {"x": 1, "y": 2}});
        assert_eq!(filter(&tree, "a.*").unwrap(), vec![json!({"x": 1, "y": 2})]);
    }

    #[test]
    fn indexed_access() {
        let tree = json!({"items": [10, 20, 30]});
        assert_eq!(filter(&tree, "items[0]").unwrap(), vec![json!(10)]);
    }

    #[test]
    fn condition_filter() {
        let tree = json!({"n": [{"v": 1}, {"v": 5}]});
        assert_eq!(filter(&tree, "n[v>2]").unwrap(), vec![json!({"v": 5})]);
    }

    #[test]
    fn select_then_and_doubles() {
        let tree = json!({"a": {"k": 1}});
        let mut query = select(&tree, "a").unwrap();
        let before = query.val().len();
        query.and("a").unwrap();
        assert_eq!(query.val().len(), 2 * before);
    }

    #[test]
    fn suffix_operator() {
        let tree = json!({"w": [{"s": "hello"}, {"s": "world"}]});
        assert_eq!(filter(&tree, "w[s$=lo].s").unwrap(), vec![json!("hello")]);
    }

    #[test]
    fn custom_operator_without_predicate_never_matches() {
        let tree = json!({"n": [{"v": 1}, {"v": 5}], "m": {"v": 1}});
        for pattern in ["n[v ? 1]", "n[v?5]", "m[v ? 1]", "*[v ? x]"] {
            assert!(filter(&tree, pattern).unwrap().is_empty(), "{pattern}");
        }
    }

    #[test]
    fn custom_operator_with_predicate() {
        let tree = json!({"n": [{"v": 1}, {"v": 5}]});
        let matches = filter_with(&tree, "n[v ? odd]", |left, right| {
            right == "odd"
                && left
                    .and_then(Match::as_node)
                    .and_then(Value::as_i64)
                    .is_some_and(|v| v % 2 == 1)
        })
        .unwrap();
        assert_eq!(matches, vec![json!({"v": 1}), json!({"v": 5})]);
    }

    #[test]
    fn filter_equals_select_val() {
        let tree = json!({
            "store": {
                "books": [
                    {"title": "a", "price": 8, "tags": ["x"]},
                    {"title": "b", "price": 12, "tags": ["y", "z"]}
                ],
                "open": true
            }
        });
        for pattern in [
            "store",
            "store.*",
            "store.books.title",
            "store.books[price<10].title",
            "store.books.tags",
            "store.books[1]",
            "store[open=true].books",
            "nothing",
            "",
        ] {
            let filtered = filter(&tree, pattern).unwrap();
            let selected = select(&tree, pattern).unwrap();
            assert_eq!(filtered.as_slice(), selected.val(), "{pattern}");
        }
    }

    #[test]
    fn malformed_condition_is_reported() {
        let tree = json!({"n": [{"v": 1}]});
        let result = filter(&tree, "n[(v>0]");
        assert!(matches!(result, Err(QueryError::InvalidConditionSyntax { .. })));
    }

    #[test]
    fn date_comparison() {
        let tree = json!({"events": [
            {"id": 1, "at": "2023-12-31T23:00:00Z"},
            {"id": 2, "at": "2024-02-01T08:30:00+02:00"}
        ]});
        let mut query = Query::new(&tree);
        query.dates(true).select("events[at>=2024-01-01].id").unwrap();
        assert_eq!(query.val(), [json!(2)].as_slice());
    }

    #[test]
    fn date_like_strings_compare_as_text() {
        let tree = json!({"v": [{"d": "2024-01-01"}]});
        assert_eq!(filter(&tree, "v[d<2025]").unwrap(), vec![json!({"d": "2024-01-01"})]);
        assert!(filter(&tree, "v[d=2024-01-01T00:00:00Z]").unwrap().is_empty());
    }

    #[test]
    fn string_operators_on_arrays() {
        let tree = json!({"p": [{"tags": ["x", "y"]}, {"tags": ["z"]}]});
        for pattern in ["p[tags$=y]", "p[tags^=x]", "p[tags*=y]"] {
            assert_eq!(
                filter(&tree, pattern).unwrap(),
                vec![json!({"tags": ["x", "y"]})],
                "{pattern}"
            );
        }
    }
}
