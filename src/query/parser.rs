/*!
# Condition Expression Parser

Parser for the boolean expressions a condition reduces to after its
comparison pairs have been evaluated. Only the literals `true` and `false`,
the combinators `&&`, `||`, `!` and parentheses are accepted; anything else
left in the text is rejected instead of being executed.

## Examples

```rust
use jpath::query::parser;
let expr = parser::parse_bool_expr("true && !(false || false)").expect("Invalid expression");
assert!(expr.evaluate());
```

## Errors

Leftover text that is not part of the language produces a
[`QueryError::InvalidConditionSyntax`]:

```rust
use jpath::query::parser::{self, QueryError};

let result = parser::parse_bool_expr("(true && false");
assert!(matches!(result, Err(QueryError::InvalidConditionSyntax { .. })));
```
*/

use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;
use std::error::Error;
use std::fmt;

use crate::query::BoolExpr;

/// Parser for condition boolean expressions.
#[derive(Parser)]
#[grammar = "query/grammar/condition.pest"]
pub struct ConditionParser;

/// Represents the failures a query can report. Unresolvable paths are not
/// errors; they simply match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryError {
    /// A condition did not reduce to a valid boolean expression.
    InvalidConditionSyntax {
        /// The condition text as written between the brackets
        condition: String,
        /// What went wrong
        message: String,
    },
}

impl Error for QueryError {}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConditionSyntax { condition, message } => {
                write!(f, "Invalid condition `{condition}`: {message}")
            }
        }
    }
}

/// Parse a boolean expression such as `true && (false || !false)`.
///
/// # Errors
///
/// Returns [`QueryError::InvalidConditionSyntax`] when the input is not a
/// complete expression of the language.
pub fn parse_bool_expr(input: &str) -> Result<BoolExpr, QueryError> {
    let mut pairs =
        ConditionParser::parse(Rule::condition, input).map_err(|e| {
            let offset = match e.location {
                InputLocation::Pos(pos) => pos,
                InputLocation::Span((start, _)) => start,
            };
            QueryError::InvalidConditionSyntax {
                condition: input.to_string(),
                message: format!("{} at offset {offset}", e.variant.message()),
            }
        })?;

    // `condition` always wraps exactly one disjunction followed by EOI
    let disjunction = pairs
        .next()
        .and_then(|condition| condition.into_inner().next())
        .ok_or_else(|| QueryError::InvalidConditionSyntax {
            condition: input.to_string(),
            message: "empty expression".to_string(),
        })?;

    Ok(parse_disjunction(disjunction))
}

/// Parse a disjunction rule; a single operand is returned unwrapped.
fn parse_disjunction(pair: Pair<Rule>) -> BoolExpr {
    let mut operands: Vec<BoolExpr> =
        pair.into_inner().map(parse_conjunction).collect();
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        BoolExpr::Or(operands)
    }
}

/// Parse a conjunction rule; a single operand is returned unwrapped.
fn parse_conjunction(pair: Pair<Rule>) -> BoolExpr {
    let mut operands: Vec<BoolExpr> =
        pair.into_inner().map(parse_negation).collect();
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        BoolExpr::And(operands)
    }
}

/// Parse a negation rule: any number of `!` followed by a literal or a
/// parenthesized disjunction.
fn parse_negation(pair: Pair<Rule>) -> BoolExpr {
    let mut negations = 0usize;
    let mut expr = BoolExpr::Literal(false);
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::not => negations += 1,
            Rule::literal => expr = BoolExpr::Literal(inner.as_str() == "true"),
            Rule::disjunction => expr = parse_disjunction(inner),
            _ => unreachable!("negation only contains `!` and a primary"),
        }
    }
    (0..negations).fold(expr, |acc, _| BoolExpr::Not(Box::new(acc)))
}
