/*!
# Conditions

A condition is the text between the brackets of a segment such as
`items[price<10 && (tag=sale || !stock=0)]`. It is made of comparison pairs
`field operator value` joined by `&&`, `||`, `!` and parentheses.

Evaluating a condition against a candidate element resolves each pair to a
boolean, writes the result back in place of the pair, and evaluates what is
left as a [`BoolExpr`](super::BoolExpr). Every pair is evaluated, so a custom
predicate sees each `?` pair even when the outcome is already decided.
*/
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::fmt::Display;
use std::ops::Range;
use std::sync::LazyLock;

use super::coerce::{coerce, stringify};
use super::{Match, PathTraverser, QueryError, parse_bool_expr};
use crate::tokenizer::tokenize;

/// Matches one comparison pair: a field (word characters, `@`, `.`), an
/// operator, and a value that may contain inner spaces.
static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([\w@.]+)\s*(==|!=|\^=|<=|>=|~=|\$=|\*=|[=<>?])\s*([@\w\s'$.+\-/:]+)",
    )
    .expect("comparison pair pattern is valid")
});

/// Comparison operators usable in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=` or `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `^=`, the text of the left value starts with the right value
    StartsWith,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `~=`, case-insensitive text equality
    EqualIgnoreCase,
    /// `$=`, the right value is a regular expression anchored at the end of
    /// the left value's text, case-insensitive
    EndsWith,
    /// `*=`, the text of the left value contains the right value
    Contains,
    /// `?`, delegates to the caller's predicate
    Custom,
}

impl Operator {
    /// Looks up an operator by its symbol.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" | "==" => Self::Equal,
            "!=" => Self::NotEqual,
            "^=" => Self::StartsWith,
            "<" => Self::Less,
            "<=" => Self::LessOrEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterOrEqual,
            "~=" => Self::EqualIgnoreCase,
            "$=" => Self::EndsWith,
            "*=" => Self::Contains,
            "?" => Self::Custom,
            _ => return None,
        })
    }

    /// Applies the operator to a resolved left value and a trimmed literal.
    /// The literal is coerced to the left value's type first; the string
    /// operators then compare against its text form.
    fn apply(
        self,
        left: Option<&Match<'_>>,
        right: &str,
        traverser: &PathTraverser<'_>,
    ) -> bool {
        if self == Self::Custom {
            return traverser
                .predicate()
                .is_some_and(|predicate| predicate(left, right));
        }

        let (l, r) = coerce(left, right, traverser.dates());
        match self {
            Self::StartsWith => stringify(left).starts_with(&r.to_text()),
            Self::Contains => stringify(left).contains(&r.to_text()),
            Self::EqualIgnoreCase => {
                stringify(left).to_lowercase() == r.to_text().to_lowercase()
            }
            Self::EndsWith => {
                let pattern = format!("{}$", r.to_text());
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(re) => re.is_match(&stringify(left)),
                    Err(err) => {
                        log::debug!("`{pattern}` is not a valid pattern: {err}");
                        false
                    }
                }
            }
            Self::Equal => l.strictly_equals(&r),
            Self::NotEqual => !l.strictly_equals(&r),
            Self::Less => l.compare(&r) == Some(Ordering::Less),
            Self::LessOrEqual => {
                matches!(l.compare(&r), Some(Ordering::Less | Ordering::Equal))
            }
            Self::Greater => l.compare(&r) == Some(Ordering::Greater),
            Self::GreaterOrEqual => {
                matches!(l.compare(&r), Some(Ordering::Greater | Ordering::Equal))
            }
            Self::Custom => false,
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::StartsWith => "^=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::EqualIgnoreCase => "~=",
            Self::EndsWith => "$=",
            Self::Contains => "*=",
            Self::Custom => "?",
        };
        write!(f, "{symbol}")
    }
}

/// One `field operator value` pair found in a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<'c> {
    /// Byte range of the whole pair within the condition text
    pub span: Range<usize>,
    /// Key, or dotted path, resolved on the candidate element
    pub field: &'c str,
    /// The comparison to apply
    pub operator: Operator,
    /// The literal right-hand side, trimmed
    pub value: &'c str,
}

impl Comparison<'_> {
    /// Resolves the field on `element` and applies the operator.
    ///
    /// # Errors
    ///
    /// Propagates errors from resolving a dotted field.
    pub fn test<'a>(
        &self,
        element: &Match<'a>,
        traverser: &PathTraverser<'_>,
    ) -> Result<bool, QueryError> {
        let left = if self.field.contains('.') {
            traverser.resolve(&tokenize(self.field), element.clone())?
        } else {
            element.get(self.field)
        };
        let result = self.operator.apply(left.as_ref(), self.value, traverser);
        log::trace!(
            "{} {} {} -> {result}",
            self.field,
            self.operator,
            self.value
        );
        Ok(result)
    }
}

/// A parsed condition, reusable across every candidate of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition<'c> {
    /// The condition as written between the brackets
    text: &'c str,
    /// Comparison pairs in order of appearance
    comparisons: Vec<Comparison<'c>>,
}

impl<'c> Condition<'c> {
    /// Extracts the comparison pairs of a condition. Text between pairs is
    /// kept as-is and only checked when the condition is evaluated.
    #[must_use]
    pub fn parse(text: &'c str) -> Self {
        let comparisons = PAIR
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let operator = Operator::from_symbol(caps.get(2)?.as_str())?;
                Some(Comparison {
                    span: whole.range(),
                    field: caps.get(1)?.as_str(),
                    operator,
                    value: caps.get(3)?.as_str().trim(),
                })
            })
            .collect();
        Self { text, comparisons }
    }

    /// The comparison pairs of this condition.
    #[must_use]
    pub fn comparisons(&self) -> &[Comparison<'c>] {
        &self.comparisons
    }

    /// Evaluates the condition against one candidate element.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidConditionSyntax`] when the text left after
    /// substituting every pair is not a boolean expression.
    pub fn evaluate(
        &self,
        element: &Match<'_>,
        traverser: &PathTraverser<'_>,
    ) -> Result<bool, QueryError> {
        let mut substituted = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for comparison in &self.comparisons {
            substituted.push_str(&self.text[cursor..comparison.span.start]);
            let result = comparison.test(element, traverser)?;
            substituted.push_str(if result { "true" } else { "false" });
            cursor = comparison.span.end;
        }
        substituted.push_str(&self.text[cursor..]);
        log::trace!("condition `{}` reduced to `{substituted}`", self.text);

        let expr = parse_bool_expr(&substituted).map_err(|err| match err {
            QueryError::InvalidConditionSyntax { message, .. } => {
                QueryError::InvalidConditionSyntax {
                    condition: self.text.to_string(),
                    message: format!("`{substituted}`: {message}"),
                }
            }
        })?;
        Ok(expr.evaluate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn check(condition: &str, element: &Value) -> bool {
        Condition::parse(condition)
            .evaluate(&Match::Node(element), &PathTraverser::new(None))
            .unwrap()
    }

    #[test]
    fn parse_pairs() {
        let condition = Condition::parse("a.b >= 10 && name ~= John Smith");
        let comparisons = condition.comparisons();
        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].field, "a.b");
        assert_eq!(comparisons[0].operator, Operator::GreaterOrEqual);
        assert_eq!(comparisons[0].value, "10");
        assert_eq!(comparisons[1].field, "name");
        assert_eq!(comparisons[1].operator, Operator::EqualIgnoreCase);
        assert_eq!(comparisons[1].value, "John Smith");
    }

    #[test]
    fn equality_operators() {
        let element = json!({"n": 5, "s": "abc", "b": true, "z": null});
        assert!(check("n=5", &element));
        assert!(check("n==5", &element));
        assert!(check("n!=6", &element));
        assert!(check("s=abc", &element));
        assert!(check("b=true", &element));
        assert!(check("z=null", &element));
        assert!(check("missing=undefined", &element));
        assert!(!check("s='abc'", &element));
    }

    #[test]
    fn ordered_operators() {
        let element = json!({"n": 5, "s": "b"});
        assert!(check("n>2", &element));
        assert!(check("n>=5", &element));
        assert!(check("n<=5", &element));
        assert!(!check("n<5", &element));
        assert!(check("s<c", &element));
        assert!(!check("n>five", &element));
        assert!(!check("missing>1", &element));
    }

    #[test]
    fn string_operators() {
        let element = json!({"word": "hello", "n": 1234});
        assert!(check("word^=he", &element));
        assert!(check("word$=lo", &element));
        assert!(check("word$=LO", &element));
        assert!(!check("word$=hel", &element));
        assert!(check("word*=ell", &element));
        assert!(check("word~=HELLO", &element));
        assert!(check("n^=12", &element));
        assert!(check("n$=34", &element));
    }

    #[test]
    fn string_operators_use_coerced_literal() {
        let element = json!({"b": true, "n": 5, "tags": ["x", "y"]});
        assert!(!check("b^=tr", &element));
        assert!(check("b^=true", &element));
        assert!(check("n~=5.0", &element));
        assert!(check("n*=0x5", &element));
        assert!(check("tags^=x", &element));
        assert!(check("tags$=y", &element));
        assert!(!check("tags*=z", &element));
    }

    #[test]
    fn invalid_suffix_pattern_is_false() {
        let element = json!({"word": "a+b"});
        assert!(!check("word$=+b", &element));
    }

    #[test]
    fn boolean_combinators() {
        let element = json!({"a": 1, "b": 2});
        assert!(check("a=1 && b=2", &element));
        assert!(check("a=2 || b=2", &element));
        assert!(check("!a=2", &element));
        assert!(check("(a=2 || b=2) && !(a=3)", &element));
        assert!(!check("a=1 && !(b=2 || a=5)", &element));
    }

    #[test]
    fn dotted_field() {
        let element = json!({"meta": {"rank": 3}});
        assert!(check("meta.rank>2", &element));
        assert!(!check("meta.missing>2", &element));
    }

    #[test]
    fn custom_operator_without_predicate() {
        let element = json!({"a": 1});
        assert!(!check("a ? 1", &element));
        assert!(check("!a ? 1", &element));
    }

    #[test]
    fn custom_operator_with_predicate() {
        let element = json!({"tags": ["x", "y"]});
        let predicate = |left: Option<&Match<'_>>, right: &str| {
            left.and_then(Match::as_node)
                .and_then(Value::as_array)
                .is_some_and(|tags| tags.iter().any(|t| t == right))
        };
        let traverser = PathTraverser::new(Some(&predicate));
        let condition = Condition::parse("tags ? y");
        assert!(condition.evaluate(&Match::Node(&element), &traverser).unwrap());
        let condition = Condition::parse("tags ? z");
        assert!(!condition.evaluate(&Match::Node(&element), &traverser).unwrap());
    }

    #[test]
    fn malformed_leftover_text() {
        let element = json!({"a": 1});
        let traverser = PathTraverser::new(None);
        for text in ["(a=1", "a=1 &&", "a=1 & a=1", "nonsense"] {
            let result =
                Condition::parse(text).evaluate(&Match::Node(&element), &traverser);
            assert!(
                matches!(
                    result,
                    Err(QueryError::InvalidConditionSyntax { ref condition, .. })
                        if condition == text
                ),
                "`{text}` gave {result:?}"
            );
        }
    }
}
