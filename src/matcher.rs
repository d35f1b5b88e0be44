//! Recursive structural matching of an expected structure against an
//! actual data tree.
//!
//! Matching never stops at the first problem: every leaf of the expected
//! structure is checked and every mismatch is collected into a
//! [`MatchReport`] with the path where it happened, so one comparison can
//! surface many independent problems at once.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::expr::{EvalOutcome, Expr};
use crate::value::{Value, MISSING};

// ============ Expected Structures ============

/// One node of an expected structure.
///
/// The matcher dispatches on this closed set: expressions are evaluated,
/// checks are invoked, containers recurse, and everything else is compared
/// for equality.
#[derive(Debug, Clone)]
pub enum Expected {
    Literal(Value),
    Expr(Expr),
    Check(Check),
    /// Key order is preserved; it is the order failures are reported in.
    Map(Vec<(String, Expected)>),
    Seq(Vec<Expected>),
}

/// A named user predicate applied to the actual value at its position.
///
/// A `false` or `Err` result becomes a single failure at that path; an
/// `Err` never aborts the rest of the match.
#[derive(Clone)]
pub struct Check {
    name: String,
    func: Arc<dyn Fn(&Value) -> Result<bool, String> + Send + Sync>,
}

impl Check {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    ) -> Check {
        Check {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, value: &Value) -> Result<bool, String> {
        (self.func)(value)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Shorthand for [`Check::new`].
pub fn check(
    name: impl Into<String>,
    func: impl Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
) -> Check {
    Check::new(name, func)
}

impl From<Expr> for Expected {
    fn from(expr: Expr) -> Expected {
        Expected::Expr(expr)
    }
}

impl From<Check> for Expected {
    fn from(check: Check) -> Expected {
        Expected::Check(check)
    }
}

impl From<Value> for Expected {
    fn from(value: Value) -> Expected {
        Expected::Literal(value)
    }
}

impl From<serde_json::Value> for Expected {
    fn from(json: serde_json::Value) -> Expected {
        Expected::Literal(json.into())
    }
}

impl From<bool> for Expected {
    fn from(b: bool) -> Expected {
        Expected::Literal(b.into())
    }
}

impl From<i32> for Expected {
    fn from(n: i32) -> Expected {
        Expected::Literal(n.into())
    }
}

impl From<i64> for Expected {
    fn from(n: i64) -> Expected {
        Expected::Literal(n.into())
    }
}

impl From<f64> for Expected {
    fn from(x: f64) -> Expected {
        Expected::Literal(x.into())
    }
}

impl From<&str> for Expected {
    fn from(s: &str) -> Expected {
        Expected::Literal(s.into())
    }
}

impl From<String> for Expected {
    fn from(s: String) -> Expected {
        Expected::Literal(s.into())
    }
}

impl<T: Into<Expected>> From<Vec<T>> for Expected {
    fn from(items: Vec<T>) -> Expected {
        Expected::Seq(items.into_iter().map(Into::into).collect())
    }
}

// ============ Failures and Reports ============

/// One step from the root of the structure towards a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "'{}'", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// One leaf mismatch: where it happened, what was found there, and the
/// rendered reason the check failed.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchFailure {
    pub path: Vec<PathSegment>,
    pub actual: Value,
    pub reason: String,
}

impl MatchFailure {
    fn new(path: &[PathSegment], actual: &Value, reason: impl Into<String>) -> MatchFailure {
        MatchFailure {
            path: path.to_vec(),
            actual: actual.clone(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", segment)?;
        }
        if !self.path.is_empty() {
            write!(f, " ")?;
        }
        write!(
            f,
            "failed validation: {} causes error: {}",
            self.actual, self.reason
        )
    }
}

/// All failures collected by one top-level comparison, in the order the
/// expected structure was written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchReport {
    failures: Vec<MatchFailure>,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[MatchFailure] {
        &self.failures
    }

    pub fn into_result(self) -> Result<(), UnlikeError> {
        if self.is_match() {
            Ok(())
        } else {
            Err(UnlikeError { report: self })
        }
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return Ok(());
        }
        write!(f, "Values not alike:")?;
        for failure in &self.failures {
            write!(f, "\n  {}", failure)?;
        }
        Ok(())
    }
}

/// The error raised when values are not alike; its message is the full
/// multi-line report.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{report}")]
pub struct UnlikeError {
    pub report: MatchReport,
}

// ============ Matching ============

/// Walks `expected` against `actual` and collects every mismatch.
pub fn match_values(expected: &Expected, actual: &Value) -> MatchReport {
    let mut failures = Vec::new();
    walk(expected, actual, &[], &mut failures);
    MatchReport { failures }
}

fn walk(expected: &Expected, actual: &Value, path: &[PathSegment], out: &mut Vec<MatchFailure>) {
    match expected {
        Expected::Expr(expr) => {
            if let EvalOutcome::Fail { reason } = expr.evaluate(actual) {
                out.push(MatchFailure::new(path, actual, reason));
            }
        }
        Expected::Check(check) => match check.run(actual) {
            Ok(true) => {}
            Ok(false) => out.push(MatchFailure::new(
                path,
                actual,
                format!("{}({})", check.name(), actual),
            )),
            Err(message) => out.push(MatchFailure::new(
                path,
                actual,
                format!("{}({}): {}", check.name(), actual, message),
            )),
        },
        Expected::Map(pairs) => {
            // Keys present only in the actual map are ignored: this is a
            // subset match, not full equality.
            for (key, sub) in pairs {
                let mut child_path = path.to_vec();
                child_path.push(PathSegment::Key(key.clone()));
                let child = match actual {
                    Value::Map(entries) => entries.get(key),
                    _ => None,
                };
                walk(sub, child.unwrap_or(&MISSING), &child_path, out);
            }
        }
        Expected::Seq(items) => match actual {
            Value::List(values) => {
                // Positions past the end of the actual list match against
                // MISSING; extra actual elements are ignored.
                for (index, sub) in items.iter().enumerate() {
                    let mut child_path = path.to_vec();
                    child_path.push(PathSegment::Index(index));
                    walk(sub, values.get(index).unwrap_or(&MISSING), &child_path, out);
                }
            }
            _ => out.push(MatchFailure::new(
                path,
                actual,
                "Compared object is not a sequence",
            )),
        },
        Expected::Literal(value) => {
            if actual != value {
                out.push(MatchFailure::new(
                    path,
                    actual,
                    format!("{} == {}", actual, value),
                ));
            }
        }
    }
}

// ============ Entry Points ============

/// True iff `actual` matches `expected`.
pub fn is_alike(expected: impl Into<Expected>, actual: impl Into<Value>) -> bool {
    match_values(&expected.into(), &actual.into()).is_match()
}

/// Like [`is_alike`], but returns the full report as an error.
pub fn check_alike(
    expected: impl Into<Expected>,
    actual: impl Into<Value>,
) -> Result<(), UnlikeError> {
    match_values(&expected.into(), &actual.into()).into_result()
}

/// Panics with the rendered multi-line report when `actual` does not
/// match `expected`.
#[track_caller]
pub fn assert_alike(expected: impl Into<Expected>, actual: impl Into<Value>) {
    if let Err(error) = check_alike(expected, actual) {
        panic!("{}", error);
    }
}

/// Wrapper that compares equal to any value its expected structure
/// matches, for use with the equality operator:
///
/// ```
/// use alike::{actual, alike, Alike, Value};
/// use serde_json::json;
///
/// let data = Value::from(json!({"test": 1, "extra": true}));
/// assert!(data == Alike::new(alike!({"test": actual().lt(2)})));
/// ```
#[derive(Debug, Clone)]
pub struct Alike {
    expected: Expected,
}

impl Alike {
    pub fn new(expected: impl Into<Expected>) -> Alike {
        Alike {
            expected: expected.into(),
        }
    }

    /// The full report for `actual`, for callers that want more than a
    /// boolean.
    pub fn report(&self, actual: &Value) -> MatchReport {
        match_values(&self.expected, actual)
    }
}

impl PartialEq<Value> for Alike {
    fn eq(&self, actual: &Value) -> bool {
        self.report(actual).is_match()
    }
}

impl PartialEq<Alike> for Value {
    fn eq(&self, alike: &Alike) -> bool {
        alike == self
    }
}
