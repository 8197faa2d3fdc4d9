/*!
# Path Traversal

Resolves a tokenized path against a tree, one segment at a time. For each
segment the first applicable rule wins:

1. the node is a sequence: apply the segment to every element separately and
   gather each element's result as one entry (a nested sequence stays nested),
   then resolve the remaining segments against the gathered group;
2. the segment is `*`: keep the node as a whole;
3. the node is a map with a key spelled exactly like the segment;
4. `name[index]`: the element at `index` of the sequence under `name`;
5. `name[condition]` or `*[condition]`: the elements of the sequence under
   `name` (or the node itself for `*`) for which the condition holds, or the
   single value if it is not a sequence and the condition holds;
6. nothing matches.

Anything that cannot be resolved is `None`; the only error is a malformed
condition.
*/
use serde_json::Value;

use super::{Condition, Match, Predicate, QueryError};
use crate::tokenizer::Segment;

/// Walks a tree along path segments. Holds the caller's predicate for the `?`
/// operator, if any, and whether string leaves may compare as dates.
#[derive(Clone, Copy)]
pub struct PathTraverser<'p> {
    predicate: Option<&'p Predicate<'p>>,
    dates: bool,
}

impl std::fmt::Debug for PathTraverser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathTraverser")
            .field("predicate", &self.predicate.is_some())
            .field("dates", &self.dates)
            .finish()
    }
}

impl<'p> PathTraverser<'p> {
    /// Creates a traverser using `predicate` for `?` comparisons.
    #[must_use]
    pub const fn new(predicate: Option<&'p Predicate<'p>>) -> Self {
        Self {
            predicate,
            dates: false,
        }
    }

    /// Lets string leaves that parse as dates compare as timestamps.
    #[must_use]
    pub const fn with_dates(mut self, dates: bool) -> Self {
        self.dates = dates;
        self
    }

    /// Whether string leaves may compare as dates.
    #[must_use]
    pub const fn dates(&self) -> bool {
        self.dates
    }

    /// The predicate used for `?` comparisons.
    #[must_use]
    pub const fn predicate(&self) -> Option<&'p Predicate<'p>> {
        self.predicate
    }

    /// Resolves `segments` against `node`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConditionSyntax`] when a condition met on
    /// the way cannot be evaluated.
    pub fn resolve<'a>(
        &self,
        segments: &[Segment<'_>],
        node: Match<'a>,
    ) -> Result<Option<Match<'a>>, QueryError> {
        let Some((segment, tail)) = segments.split_first() else {
            return Ok(None);
        };
        log::trace!("resolving `{segment}` with {} segment(s) left", tail.len());

        if let Some(items) = node.items() {
            let mut gathered = Vec::with_capacity(items.len());
            for item in items {
                if let Some(found) =
                    self.resolve(std::slice::from_ref(segment), item)?
                {
                    gathered.push(found);
                }
            }
            if gathered.is_empty() {
                return Ok(None);
            }
            return self.descend(tail, Match::Group(gathered));
        }

        if *segment == Segment::Wildcard {
            return self.descend(tail, node);
        }

        if let Some(child) = node.get(segment.raw()) {
            return self.descend(tail, child);
        }

        match *segment {
            Segment::Indexed { name, index, .. } => {
                let element = node.get(name).and_then(|seq| match seq.as_node()? {
                    Value::Array(values) => values.get(index).map(Match::Node),
                    _ => None,
                });
                match element {
                    Some(element) => self.descend(tail, element),
                    None => Ok(None),
                }
            }
            Segment::Conditioned {
                name, condition, ..
            } => self.resolve_conditioned(name, condition, tail, node),
            Segment::Field(_) | Segment::Wildcard => Ok(None),
        }
    }

    /// Continues with the remaining segments, or finishes with `node`.
    fn descend<'a>(
        &self,
        tail: &[Segment<'_>],
        node: Match<'a>,
    ) -> Result<Option<Match<'a>>, QueryError> {
        if tail.is_empty() {
            Ok(Some(node))
        } else {
            self.resolve(tail, node)
        }
    }

    /// Applies a `name[condition]` segment.
    fn resolve_conditioned<'a>(
        &self,
        name: &str,
        text: &str,
        tail: &[Segment<'_>],
        node: Match<'a>,
    ) -> Result<Option<Match<'a>>, QueryError> {
        let subset = if name == "*" { Some(node) } else { node.get(name) };
        let Some(subset) = subset else {
            return Ok(None);
        };
        let condition = Condition::parse(text);

        let Some(items) = subset.items() else {
            return if condition.evaluate(&subset, self)? {
                self.descend(tail, subset)
            } else {
                Ok(None)
            };
        };

        let mut kept = vec![];
        for item in items {
            if condition.evaluate(&item, self)? {
                kept.push(item);
            }
        }
        if kept.is_empty() {
            Ok(None)
        } else {
            self.descend(tail, Match::Group(kept))
        }
    }
}
