/*!
# Boolean Expression AST

Defines the AST a condition is reduced to once each comparison pair has been
replaced by its boolean result, e.g. `(true || false) && !false`.

```
use jpath::query::BoolExpr;
let expr: BoolExpr = "(true || false) && !false".parse().expect("Invalid expression");
assert!(expr.evaluate());
assert_eq!(expr.to_string(), "(true || false) && !false");
```
*/
use std::{fmt::Display, str::FromStr};

use super::{QueryError, parse_bool_expr};

/// A boolean expression over literals and the `&&`, `||`, `!` combinators.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BoolExpr {
    /// `true` or `false`
    Literal(bool),
    /// Negation, e.g., "!true"
    Not(Box<Self>),
    /// Conjunction of two or more operands, e.g., "true && false"
    And(Vec<Self>),
    /// Disjunction of two or more operands, e.g., "true || false"
    Or(Vec<Self>),
}

impl BoolExpr {
    /// Evaluates the expression.
    #[must_use]
    pub fn evaluate(&self) -> bool {
        match self {
            Self::Literal(value) => *value,
            Self::Not(inner) => !inner.evaluate(),
            Self::And(operands) => operands.iter().all(Self::evaluate),
            Self::Or(operands) => operands.iter().any(Self::evaluate),
        }
    }

    /// Binding strength used to decide where parentheses are needed when
    /// displaying.
    const fn precedence(&self) -> u8 {
        match self {
            Self::Or(_) => 0,
            Self::And(_) => 1,
            Self::Not(_) | Self::Literal(_) => 2,
        }
    }

    fn fmt_operand(
        &self,
        operand: &Self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        if operand.precedence() < self.precedence() {
            write!(f, "({operand})")
        } else {
            write!(f, "{operand}")
        }
    }
}

impl Display for BoolExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value}"),
            Self::Not(inner) => {
                write!(f, "!")?;
                self.fmt_operand(inner, f)
            }
            Self::And(operands) | Self::Or(operands) => {
                let separator =
                    if matches!(self, Self::And(_)) { " && " } else { " || " };
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{separator}")?;
                    }
                    self.fmt_operand(operand, f)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for BoolExpr {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bool_expr(s)
    }
}
