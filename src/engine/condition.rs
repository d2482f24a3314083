//! Condition grammar for `{if:condition:true|false}`.
//!
//! ```text
//! condition := ident (op literal)?
//! op        := "==" | "!=" | ">=" | "<=" | ">" | "<"
//! ```
//!
//! The operator is the first maximal run of `<`, `>`, `=`, `!` characters. No
//! boolean combinators are supported.

use super::value::Scalar;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl CompareOp {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// Evaluate `left op right`.
    ///
    /// Returns `None` when an ordering operator is applied to values that
    /// cannot be ordered.
    pub fn evaluate(self, left: &Scalar, right: &Scalar) -> Option<bool> {
        match self {
            Self::Eq => Some(left.loosely_equals(right)),
            Self::Ne => Some(!left.loosely_equals(right)),
            Self::Ge => left.partial_order(right).map(|o| o != Ordering::Less),
            Self::Le => left.partial_order(right).map(|o| o != Ordering::Greater),
            Self::Gt => left.partial_order(right).map(|o| o == Ordering::Greater),
            Self::Lt => left.partial_order(right).map(|o| o == Ordering::Less),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Bare variable name: existence and truthiness.
    Truthy { var: String },
    /// `var op literal`.
    Compare {
        var: String,
        op: CompareOp,
        literal: Scalar,
    },
    /// An operator run that is not a supported operator, e.g. `=` or `=>`.
    Malformed { var: String, op_text: String },
}

fn is_op_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!')
}

impl Condition {
    pub fn parse(text: &str) -> Self {
        let Some(start) = text.find(is_op_char) else {
            return Condition::Truthy {
                var: text.trim().to_string(),
            };
        };
        let rest = &text[start..];
        let end = rest.find(|c: char| !is_op_char(c)).unwrap_or(rest.len());
        let op_text = &rest[..end];
        let var = text[..start].trim().to_string();

        match CompareOp::from_str(op_text) {
            Some(op) => Condition::Compare {
                var,
                op,
                literal: coerce_literal(rest[end..].trim()),
            },
            None => Condition::Malformed {
                var,
                op_text: op_text.to_string(),
            },
        }
    }

    /// The variable the condition refers to.
    pub fn variable(&self) -> &str {
        match self {
            Condition::Truthy { var }
            | Condition::Compare { var, .. }
            | Condition::Malformed { var, .. } => var,
        }
    }
}

/// Coerce a comparison literal: `true`/`false` (any case) to a boolean, text
/// with a `.` that parses as a float to a float, text that parses as an
/// integer to an integer, anything else stays text.
pub fn coerce_literal(literal: &str) -> Scalar {
    if literal.eq_ignore_ascii_case("true") {
        return Scalar::Bool(true);
    }
    if literal.eq_ignore_ascii_case("false") {
        return Scalar::Bool(false);
    }
    if literal.contains('.') {
        if let Ok(f) = literal.parse::<f64>() {
            return Scalar::Float(f);
        }
    } else if let Ok(i) = literal.parse::<i64>() {
        return Scalar::Int(i);
    }
    Scalar::Text(literal.to_string())
}
