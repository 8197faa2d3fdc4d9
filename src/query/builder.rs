/*!
# Query Builder

[`Query`] keeps a source tree and an ordered selection of matches. `select`
replaces the selection with the matches of a pattern, `and` appends them, and
the accessors read the selection back.

```
use jpath::query::Query;
use serde_json::json;

let tree = json!({"a": [1, 2], "b": 3});
let mut query = Query::new(&tree);
query.select("a").expect("valid pattern").and("b").expect("valid pattern");

assert_eq!(query.val().len(), 3);
assert_eq!(query.first().unwrap(), &json!(1));
assert_eq!(query.last().unwrap(), &json!(3));
assert!(query.eq(7).is_none());
```
*/
use serde_json::Value;

use super::{Match, PathTraverser, Predicate, QueryError};
use crate::tokenizer::tokenize;

/// Builder holding a source tree and the matches selected from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<'a> {
    /// The tree patterns are resolved against
    source: &'a Value,
    /// Matches accumulated by `select` and `and`, in order, duplicates kept
    selection: Vec<Match<'a>>,
    /// Compare date-like string leaves as timestamps
    dates: bool,
}

impl<'a> Query<'a> {
    /// Creates a builder over `source` with an empty selection.
    #[must_use]
    pub const fn new(source: &'a Value) -> Self {
        Self {
            source,
            selection: vec![],
            dates: false,
        }
    }

    /// Replaces the source tree. The current selection is kept.
    pub const fn from(&mut self, source: &'a Value) -> &mut Self {
        self.source = source;
        self
    }

    /// The tree patterns are resolved against.
    #[must_use]
    pub const fn source(&self) -> &'a Value {
        self.source
    }

    /// Enables or disables date comparison for later `select`/`and` calls.
    ///
    /// When enabled, a string leaf that parses as a date (RFC 3339,
    /// `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`) is
    /// compared with the literal as a timestamp. Otherwise strings compare as
    /// text.
    pub const fn dates(&mut self, enabled: bool) -> &mut Self {
        self.dates = enabled;
        self
    }

    /// Replaces the selection with the matches of `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConditionSyntax`] for a malformed
    /// condition; the selection is left untouched in that case.
    pub fn select(&mut self, pattern: &str) -> Result<&mut Self, QueryError> {
        self.selection = self.resolve(pattern, None)?;
        Ok(self)
    }

    /// Like [`Query::select`], with `predicate` answering `?` comparisons.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConditionSyntax`] for a malformed
    /// condition.
    pub fn select_with<F>(
        &mut self,
        pattern: &str,
        predicate: F,
    ) -> Result<&mut Self, QueryError>
    where
        F: Fn(Option<&Match<'_>>, &str) -> bool,
    {
        self.selection = self.resolve(pattern, Some(&predicate))?;
        Ok(self)
    }

    /// Appends the matches of `pattern` to the selection, without removing
    /// duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConditionSyntax`] for a malformed
    /// condition.
    pub fn and(&mut self, pattern: &str) -> Result<&mut Self, QueryError> {
        let matches = self.resolve(pattern, None)?;
        self.selection.extend(matches);
        Ok(self)
    }

    /// Like [`Query::and`], with `predicate` answering `?` comparisons.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConditionSyntax`] for a malformed
    /// condition.
    pub fn and_with<F>(
        &mut self,
        pattern: &str,
        predicate: F,
    ) -> Result<&mut Self, QueryError>
    where
        F: Fn(Option<&Match<'_>>, &str) -> bool,
    {
        let matches = self.resolve(pattern, Some(&predicate))?;
        self.selection.extend(matches);
        Ok(self)
    }

    /// The first match, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Match<'a>> {
        self.selection.first()
    }

    /// The last match, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Match<'a>> {
        self.selection.last()
    }

    /// The match at `index`, or `None` when the selection is shorter.
    #[must_use]
    pub fn eq(&self, index: usize) -> Option<&Match<'a>> {
        self.selection.get(index)
    }

    /// All matches, in order.
    #[must_use]
    pub fn val(&self) -> &[Match<'a>] {
        &self.selection
    }

    /// Consumes the builder, returning the matches.
    #[must_use]
    pub fn into_val(self) -> Vec<Match<'a>> {
        self.selection
    }

    /// Resolves `pattern` against the source and flattens the result into a
    /// list of matches.
    fn resolve(
        &self,
        pattern: &str,
        predicate: Option<&Predicate<'_>>,
    ) -> Result<Vec<Match<'a>>, QueryError> {
        let segments = tokenize(pattern);
        let result = PathTraverser::new(predicate)
            .with_dates(self.dates)
            .resolve(&segments, Match::Node(self.source))?;
        let matches = flatten(result);
        log::debug!("`{pattern}` matched {} value(s)", matches.len());
        Ok(matches)
    }
}

/// Turns a resolved value into a selection. The value is first made a list:
/// a sequence contributes its items, anything else itself, and nothing
/// contributes nothing. Items that are sequences are then spliced in, so two
/// levels of sequence are opened while deeper nesting is kept.
fn flatten(result: Option<Match<'_>>) -> Vec<Match<'_>> {
    let Some(result) = result else {
        return vec![];
    };
    result
        .items()
        .unwrap_or_else(|| vec![result])
        .into_iter()
        .flat_map(|item| item.items().unwrap_or_else(|| vec![item]))
        .collect()
}
