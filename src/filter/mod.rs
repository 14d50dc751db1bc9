//! SCIM filter expressions: syntax tree, parser and evaluator.
//!
//! The query engine consumes a parsed expression tree and evaluates it
//! against one record at a time. The parser covers the attribute-expression
//! and logical-operator subset of the RFC 7644 filter grammar:
//!
//! ```text
//! userName eq "bjensen"
//! name.familyName co "O'Malley"
//! title pr
//! active eq true and userName sw "b"
//! not (userType eq "Intern") or userType eq "Employee"
//! ```
//!
//! Bracketed value paths (`emails[type eq "work"]`) are not part of the
//! supported subset and are reported as parse errors. String comparison is
//! case-insensitive; multi-valued attributes match when any element matches.

mod eval;
mod parser;

pub use eval::evaluate;
pub use parser::{FilterParseError, parse};

pub(crate) use eval::{resolve_path, total_order};

use serde_json::Value;

/// A dotted attribute path, e.g. `name.givenName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrPath {
    segments: Vec<String>,
}

impl AttrPath {
    /// Build a path from its rendered form, splitting on `.`.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

/// Comparison operators of the attribute-expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// equal
    Eq,
    /// not equal
    Ne,
    /// contains
    Co,
    /// starts with
    Sw,
    /// ends with
    Ew,
    /// greater than
    Gt,
    /// greater than or equal
    Ge,
    /// less than
    Lt,
    /// less than or equal
    Le,
}

/// A parsed filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// `path pr` — the attribute has a non-null value
    Present(AttrPath),
    /// `path op literal`
    Compare {
        path: AttrPath,
        op: CompareOp,
        value: Value,
    },
    /// Conjunction
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// Disjunction
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// Negation
    Not(Box<FilterExpr>),
}
