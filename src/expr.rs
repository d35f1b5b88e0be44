//! Lazy predicate expressions, built with a fluent API and evaluated
//! against an actual value.
//!
//! An [`Expr`] is an immutable operator tree rooted at the [`actual()`]
//! placeholder. Nothing runs at construction time; [`Expr::evaluate`]
//! applies the tree to a concrete value and, on failure, renders the
//! expression with the actual value substituted in:
//!
//! ```
//! use alike::{actual, EvalOutcome, Value};
//!
//! let in_range = actual().ge(18).and(actual().lt(120));
//! assert_eq!(in_range.evaluate(&Value::Int(42)), EvalOutcome::Pass);
//! assert_eq!(
//!     in_range.evaluate(&Value::Int(15)),
//!     EvalOutcome::Fail { reason: "(15 >= 18) and (15 < 120)".to_string() },
//! );
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use thiserror::Error;

use crate::value::Value;

/// The placeholder for the value under test: the root of every expression.
pub fn actual() -> Expr {
    Expr::Actual
}

// ============ AST Types ============

/// A deferred, composable predicate over a [`Value`].
#[derive(Debug, Clone)]
pub enum Expr {
    /// The value under test itself.
    Actual,
    Literal(Value),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Item access: `x['key']` / `x[0]`.
    Index {
        target: Box<Expr>,
        key: Value,
    },
    /// Field access rendered dot-style: `x.name`.
    Attr {
        target: Box<Expr>,
        name: String,
    },
    /// Regex test; the pattern is compiled when the expression is built.
    Matches {
        target: Box<Expr>,
        regex: Regex,
    },
    /// A named user computation applied to the target's value.
    Apply {
        target: Box<Expr>,
        func: Applied,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Not,
    Len,
    TypeOf,
    IsMissing,
    IsPresent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    In,
    Contains,
    StartsWith,
    EndsWith,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::In => "in",
            BinaryOp::Contains => "contains",
            BinaryOp::StartsWith => "startswith",
            BinaryOp::EndsWith => "endswith",
        }
    }

    // String operators render as method calls: `'word'.endswith('d')`.
    fn method_name(self) -> Option<&'static str> {
        match self {
            BinaryOp::Contains => Some("contains"),
            BinaryOp::StartsWith => Some("startswith"),
            BinaryOp::EndsWith => Some("endswith"),
            _ => None,
        }
    }
}

/// A named deferred computation, rendered as `name(actual)`.
#[derive(Clone)]
pub struct Applied {
    name: String,
    func: Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>,
}

impl Applied {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, value: &Value) -> Result<Value, EvalError> {
        (self.func)(value).map_err(EvalError::Apply)
    }
}

impl fmt::Debug for Applied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Applied")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },
    #[error("cannot compare {lhs} with {rhs}")]
    Incomparable {
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    Apply(String),
}

/// Tagged outcome of checking an expression against a value.
///
/// Failure carries the rendered description of the failed check, with the
/// actual value substituted into the expression's notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    Pass,
    Fail { reason: String },
}

impl EvalOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, EvalOutcome::Pass)
    }
}

// ============ Builder ============

impl Expr {
    fn unary(self, op: UnaryOp) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(self),
        }
    }

    fn binary(self, op: BinaryOp, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    fn binary_value(self, op: BinaryOp, rhs: impl Into<Value>) -> Expr {
        self.binary(op, Expr::Literal(rhs.into()))
    }

    pub fn eq(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Eq, rhs)
    }

    pub fn ne(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Ne, rhs)
    }

    pub fn lt(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Lt, rhs)
    }

    pub fn le(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Le, rhs)
    }

    pub fn gt(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Gt, rhs)
    }

    pub fn ge(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Ge, rhs)
    }

    /// Both sides are evaluated even when the left one already failed, so
    /// a failure can render both explanations.
    pub fn and(self, rhs: Expr) -> Expr {
        self.binary(BinaryOp::And, rhs)
    }

    pub fn or(self, rhs: Expr) -> Expr {
        self.binary(BinaryOp::Or, rhs)
    }

    pub fn not(self) -> Expr {
        self.unary(UnaryOp::Not)
    }

    pub fn add(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Add, rhs)
    }

    pub fn sub(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Sub, rhs)
    }

    pub fn mul(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Mul, rhs)
    }

    pub fn div(self, rhs: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Div, rhs)
    }

    /// Membership of the actual value in `collection`.
    pub fn is_in(self, collection: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::In, collection)
    }

    /// The actual value (string, list or map) contains `item`.
    pub fn contains(self, item: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::Contains, item)
    }

    pub fn starts_with(self, prefix: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::StartsWith, prefix)
    }

    pub fn ends_with(self, suffix: impl Into<Value>) -> Expr {
        self.binary_value(BinaryOp::EndsWith, suffix)
    }

    /// Regex test against a string value.
    ///
    /// # Panics
    ///
    /// Panics immediately if `pattern` is not a valid regex: a bad pattern
    /// is a mistake in the expected structure, not a mismatch to report.
    pub fn matches(self, pattern: &str) -> Expr {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid regex {:?} in matches(): {}", pattern, e));
        Expr::Matches {
            target: Box::new(self),
            regex,
        }
    }

    /// Map item access, rendered `x['key']`. Absent keys yield `MISSING`.
    pub fn get(self, key: impl Into<String>) -> Expr {
        Expr::Index {
            target: Box::new(self),
            key: Value::Str(key.into()),
        }
    }

    /// List item access, rendered `x[0]`. Out-of-range indices yield
    /// `MISSING`.
    pub fn at(self, index: usize) -> Expr {
        Expr::Index {
            target: Box::new(self),
            key: Value::Int(index as i64),
        }
    }

    /// Map field access rendered dot-style, `x.name`.
    pub fn attr(self, name: impl Into<String>) -> Expr {
        Expr::Attr {
            target: Box::new(self),
            name: name.into(),
        }
    }

    /// Length of a string, list or map, rendered prefix: `len x`.
    pub fn length(self) -> Expr {
        self.unary(UnaryOp::Len)
    }

    /// The value's type name, for checks like
    /// `actual().type_of().eq("list")`.
    pub fn type_of(self) -> Expr {
        self.unary(UnaryOp::TypeOf)
    }

    /// Succeeds iff the value is the `MISSING` sentinel.
    pub fn is_missing(self) -> Expr {
        self.unary(UnaryOp::IsMissing)
    }

    /// Succeeds iff the value is anything but the `MISSING` sentinel.
    pub fn is_present(self) -> Expr {
        self.unary(UnaryOp::IsPresent)
    }

    pub fn is_falsy(self) -> Expr {
        self.unary(UnaryOp::Not)
    }

    /// Defers a user computation; `name` is how the call is rendered in
    /// failure reasons, e.g. `half(10)`.
    pub fn apply(
        self,
        name: impl Into<String>,
        func: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Expr {
        Expr::Apply {
            target: Box::new(self),
            func: Applied {
                name: name.into(),
                func: Arc::new(func),
            },
        }
    }
}

// ============ Evaluation ============

impl Expr {
    /// Checks the expression against `actual`: a truthy result passes, a
    /// falsy result or an evaluation error fails with a rendered reason.
    pub fn evaluate(&self, actual: &Value) -> EvalOutcome {
        match self.eval(actual) {
            Ok(value) if value.is_truthy() => EvalOutcome::Pass,
            Ok(_) => EvalOutcome::Fail {
                reason: self.render(actual),
            },
            Err(error) => EvalOutcome::Fail {
                reason: format!("{}: {}", self.render(actual), error),
            },
        }
    }

    /// Raw value semantics of the tree.
    pub fn eval(&self, actual: &Value) -> Result<Value, EvalError> {
        match self {
            Expr::Actual => Ok(actual.clone()),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Unary { op, operand } => {
                let value = operand.eval(actual)?;
                eval_unary(*op, &value)
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.eval(actual)?;
                let r = rhs.eval(actual)?;
                eval_binary(*op, &l, &r)
            }
            Expr::Index { target, key } => Ok(lookup(&target.eval(actual)?, key)),
            Expr::Attr { target, name } => {
                Ok(lookup(&target.eval(actual)?, &Value::Str(name.clone())))
            }
            Expr::Matches { target, regex } => match target.eval(actual)? {
                Value::Str(s) => Ok(Value::Bool(regex.is_match(&s))),
                other => Err(EvalError::TypeError {
                    expected: "string",
                    got: other.type_name(),
                }),
            },
            Expr::Apply { target, func } => func.call(&target.eval(actual)?),
        }
    }
}

fn eval_unary(op: UnaryOp, value: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
        UnaryOp::Len => match value {
            Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
            Value::List(items) => Ok(Value::Int(items.len() as i64)),
            Value::Map(entries) => Ok(Value::Int(entries.len() as i64)),
            other => Err(EvalError::TypeError {
                expected: "a sized value",
                got: other.type_name(),
            }),
        },
        UnaryOp::TypeOf => Ok(Value::Str(value.type_name().to_string())),
        UnaryOp::IsMissing => Ok(Value::Bool(value.is_missing())),
        UnaryOp::IsPresent => Ok(Value::Bool(!value.is_missing())),
    }
}

fn eval_binary(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::And => Ok(Value::Bool(l.is_truthy() && r.is_truthy())),
        BinaryOp::Or => Ok(Value::Bool(l.is_truthy() || r.is_truthy())),
        BinaryOp::Eq => Ok(Value::Bool(l == r)),
        BinaryOp::Ne => Ok(Value::Bool(l != r)),
        BinaryOp::Lt => Ok(Value::Bool(compare(l, r)? == Ordering::Less)),
        BinaryOp::Le => Ok(Value::Bool(compare(l, r)? != Ordering::Greater)),
        BinaryOp::Gt => Ok(Value::Bool(compare(l, r)? == Ordering::Greater)),
        BinaryOp::Ge => Ok(Value::Bool(compare(l, r)? != Ordering::Less)),
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => arithmetic(op, l, r),
        BinaryOp::In => membership(r, l),
        BinaryOp::Contains => membership(l, r),
        BinaryOp::StartsWith => {
            let (s, prefix) = string_pair(l, r)?;
            Ok(Value::Bool(s.starts_with(prefix)))
        }
        BinaryOp::EndsWith => {
            let (s, suffix) = string_pair(l, r)?;
            Ok(Value::Bool(s.ends_with(suffix)))
        }
    }
}

fn compare(l: &Value, r: &Value) -> Result<Ordering, EvalError> {
    let incomparable = EvalError::Incomparable {
        lhs: l.type_name(),
        rhs: r.type_name(),
    };
    if let (Value::Int(a), Value::Int(b)) = (l, r) {
        return Ok(a.cmp(b));
    }
    if let (Some(a), Some(b)) = (l.as_number(), r.as_number()) {
        return a.partial_cmp(&b).ok_or(incomparable);
    }
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => Err(incomparable),
    }
}

fn arithmetic(op: BinaryOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
    // Int op Int stays integral (unless it overflows); division always
    // happens in floats.
    if let (Value::Int(a), Value::Int(b)) = (l, r) {
        let exact = match op {
            BinaryOp::Add => a.checked_add(*b),
            BinaryOp::Sub => a.checked_sub(*b),
            BinaryOp::Mul => a.checked_mul(*b),
            _ => None,
        };
        if let Some(n) = exact {
            return Ok(Value::Int(n));
        }
    }
    let a = number_of(l)?;
    let b = number_of(r)?;
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div => {
            if b == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(Value::Float(a / b))
            }
        }
        _ => unreachable!("not an arithmetic operator"),
    }
}

fn number_of(value: &Value) -> Result<f64, EvalError> {
    value.as_number().ok_or(EvalError::TypeError {
        expected: "number",
        got: value.type_name(),
    })
}

fn string_pair<'a>(l: &'a Value, r: &'a Value) -> Result<(&'a str, &'a str), EvalError> {
    match (l, r) {
        (Value::Str(a), Value::Str(b)) => Ok((a, b)),
        (Value::Str(_), other) | (other, _) => Err(EvalError::TypeError {
            expected: "string",
            got: other.type_name(),
        }),
    }
}

// `needle in haystack`: lists check elements, strings check substrings,
// maps check keys.
fn membership(haystack: &Value, needle: &Value) -> Result<Value, EvalError> {
    match haystack {
        Value::List(items) => Ok(Value::Bool(items.iter().any(|item| item == needle))),
        Value::Str(s) => match needle {
            Value::Str(sub) => Ok(Value::Bool(s.contains(sub.as_str()))),
            other => Err(EvalError::TypeError {
                expected: "string",
                got: other.type_name(),
            }),
        },
        Value::Map(entries) => match needle {
            Value::Str(key) => Ok(Value::Bool(entries.contains_key(key))),
            other => Err(EvalError::TypeError {
                expected: "string",
                got: other.type_name(),
            }),
        },
        other => Err(EvalError::TypeError {
            expected: "a container",
            got: other.type_name(),
        }),
    }
}

// Lookups are total: anything that cannot be found is MISSING, so presence
// checks compose with item access and structural holes never raise.
fn lookup(target: &Value, key: &Value) -> Value {
    match (target, key) {
        (Value::Map(entries), Value::Str(name)) => {
            entries.get(name).cloned().unwrap_or(Value::Missing)
        }
        (Value::List(items), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .unwrap_or(Value::Missing),
        _ => Value::Missing,
    }
}

// ============ Rendering ============

impl Expr {
    /// Renders the expression with `actual` substituted for the
    /// placeholder, in the operator's natural notation: `2 > 3`,
    /// `(15 > 20) or (15 < 12)`, `(len [5, 6, 7]) > 4`, `x['a'][0]`,
    /// `'word'.endswith('d')`, `half(10)`.
    pub fn render(&self, actual: &Value) -> String {
        match self {
            Expr::Actual => actual.to_string(),
            Expr::Literal(value) => value.to_string(),
            Expr::Unary {
                op: UnaryOp::IsMissing,
                ..
            } => "value should be missing".to_string(),
            Expr::Unary {
                op: UnaryOp::IsPresent,
                ..
            } => "value should be present".to_string(),
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => format!("not {}", operand.render_operand(actual)),
            Expr::Unary {
                op: UnaryOp::Len,
                operand,
            } => format!("len {}", operand.render_operand(actual)),
            Expr::Unary {
                op: UnaryOp::TypeOf,
                operand,
            } => format!("type {}", operand.render_operand(actual)),
            Expr::Binary { op, lhs, rhs } => {
                if let Some(name) = op.method_name() {
                    format!(
                        "{}.{}({})",
                        lhs.render(actual),
                        name,
                        rhs.render_operand(actual)
                    )
                } else {
                    format!(
                        "{} {} {}",
                        lhs.render_operand(actual),
                        op.symbol(),
                        rhs.render_operand(actual)
                    )
                }
            }
            Expr::Index { target, key } => format!("{}[{}]", target.render(actual), key),
            Expr::Attr { target, name } => format!("{}.{}", target.render(actual), name),
            Expr::Matches { target, regex } => {
                format!("{}.matches('{}')", target.render(actual), regex.as_str())
            }
            Expr::Apply { target, func } => {
                format!("{}({})", func.name(), target.render(actual))
            }
        }
    }

    // Compound operands are parenthesized; the placeholder and literals
    // are not.
    fn render_operand(&self, actual: &Value) -> String {
        match self {
            Expr::Actual | Expr::Literal(_) => self.render(actual),
            _ => format!("({})", self.render(actual)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn fail(reason: &str) -> EvalOutcome {
        EvalOutcome::Fail {
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_comparison() {
        assert_eq!(actual().gt(5).evaluate(&v(json!(10))), EvalOutcome::Pass);
        assert_eq!(actual().gt(15).evaluate(&v(json!(10))), fail("10 > 15"));
        assert_eq!(actual().le(5).evaluate(&v(json!(5))), EvalOutcome::Pass);
        assert_eq!(
            actual().eq("test").evaluate(&v(json!("test"))),
            EvalOutcome::Pass
        );
    }

    #[test]
    fn test_or_renders_both_sides() {
        let either = actual().gt(20).or(actual().lt(12));
        assert_eq!(either.evaluate(&v(json!(10))), EvalOutcome::Pass);
        assert_eq!(either.evaluate(&v(json!(25))), EvalOutcome::Pass);
        assert_eq!(
            either.evaluate(&v(json!(15))),
            fail("(15 > 20) or (15 < 12)")
        );
    }

    #[test]
    fn test_and_renders_both_sides() {
        let both = actual().ge(18).and(actual().lt(120));
        assert_eq!(both.evaluate(&v(json!(42))), EvalOutcome::Pass);
        assert_eq!(
            both.evaluate(&v(json!(15))),
            fail("(15 >= 18) and (15 < 120)")
        );
        // the left side alone fails here, but both still render
        assert_eq!(
            both.evaluate(&v(json!(200))),
            fail("(200 >= 18) and (200 < 120)")
        );
    }

    #[test]
    fn test_not() {
        assert_eq!(
            actual().is_falsy().evaluate(&v(json!(""))),
            EvalOutcome::Pass
        );
        assert_eq!(actual().is_falsy().evaluate(&v(json!("s"))), fail("not 's'"));
        assert_eq!(
            actual().eq(1).not().evaluate(&v(json!(1))),
            fail("not (1 == 1)")
        );
    }

    #[test]
    fn test_length() {
        assert_eq!(
            actual().length().gt(4).evaluate(&v(json!([5, 6, 7]))),
            fail("(len [5, 6, 7]) > 4")
        );
        assert_eq!(
            actual().length().eq(3).evaluate(&v(json!([5, 6, 7]))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().length().eq(2).evaluate(&v(json!("hi"))),
            EvalOutcome::Pass
        );
    }

    #[test]
    fn test_length_of_unsized_value_fails_instead_of_raising() {
        assert_eq!(
            actual().length().gt(4).evaluate(&v(json!(5))),
            fail("(len 5) > 4: type error: expected a sized value, got number")
        );
    }

    #[test]
    fn test_incomparable_types_fail() {
        assert_eq!(
            actual().gt(3).evaluate(&v(json!("abc"))),
            fail("'abc' > 3: cannot compare string with number")
        );
    }

    #[test]
    fn test_missing_checks() {
        assert_eq!(
            actual().is_missing().evaluate(&Value::Missing),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().is_missing().evaluate(&v(json!("oops"))),
            fail("value should be missing")
        );
        assert_eq!(
            actual().is_present().evaluate(&v(json!(1))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().is_present().evaluate(&Value::Missing),
            fail("value should be present")
        );
        // null is present: absent and empty do not collapse
        assert_eq!(
            actual().is_present().evaluate(&Value::Null),
            EvalOutcome::Pass
        );
    }

    #[test]
    fn test_missing_composes_with_or() {
        let missing_or_ten = actual().is_missing().or(actual().eq(10));
        assert_eq!(missing_or_ten.evaluate(&Value::Missing), EvalOutcome::Pass);
        assert_eq!(missing_or_ten.evaluate(&v(json!(10))), EvalOutcome::Pass);
        assert_eq!(
            missing_or_ten.evaluate(&v(json!(11))),
            fail("(value should be missing) or (11 == 10)")
        );
    }

    #[test]
    fn test_item_access() {
        assert_eq!(
            actual()
                .get("a")
                .get("b")
                .eq(5)
                .evaluate(&v(json!({"a": {"b": 5}}))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual()
                .get("a")
                .get("b")
                .eq(6)
                .evaluate(&v(json!({"a": {"b": 5}}))),
            fail("({'a': {'b': 5}}['a']['b']) == 6")
        );
    }

    #[test]
    fn test_index_access() {
        assert_eq!(
            actual().at(1).eq(6).evaluate(&v(json!([5, 6, 7]))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().at(0).eq(6).evaluate(&v(json!([5, 6, 7]))),
            fail("([5, 6, 7][0]) == 6")
        );
    }

    #[test]
    fn test_lookup_miss_yields_missing() {
        assert_eq!(
            actual()
                .get("absent")
                .is_missing()
                .evaluate(&v(json!({"a": 1}))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().at(9).is_missing().evaluate(&v(json!([1]))),
            EvalOutcome::Pass
        );
        // indexing a non-container is a miss, not an error
        assert_eq!(
            actual().get("a").is_missing().evaluate(&v(json!(5))),
            EvalOutcome::Pass
        );
    }

    #[test]
    fn test_attr_access() {
        assert_eq!(
            actual()
                .attr("name")
                .eq("grail")
                .evaluate(&v(json!({"name": "grail"}))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual()
                .attr("name")
                .eq("shrubbery")
                .evaluate(&v(json!({"name": "grail"}))),
            fail("({'name': 'grail'}.name) == 'shrubbery'")
        );
    }

    #[test]
    fn test_string_methods() {
        assert_eq!(
            actual().ends_with("d").evaluate(&v(json!("word"))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().ends_with("d").evaluate(&v(json!("worm"))),
            fail("'worm'.endswith('d')")
        );
        assert_eq!(
            actual().starts_with("wo").evaluate(&v(json!("word"))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().contains("or").evaluate(&v(json!("word"))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().starts_with("x").evaluate(&v(json!("word"))),
            fail("'word'.startswith('x')")
        );
    }

    #[test]
    fn test_membership() {
        assert_eq!(
            actual().is_in(vec![1, 2, 3]).evaluate(&v(json!(2))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().is_in(vec![4, 5]).evaluate(&v(json!(2))),
            fail("2 in [4, 5]")
        );
        assert_eq!(
            actual().contains(2).evaluate(&v(json!([1, 2]))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().contains("k").evaluate(&v(json!({"k": 1}))),
            EvalOutcome::Pass
        );
    }

    #[test]
    fn test_matches() {
        assert_eq!(
            actual().matches(r"^hello\d+$").evaluate(&v(json!("hello123"))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().matches("^world").evaluate(&v(json!("hello123"))),
            fail("'hello123'.matches('^world')")
        );
    }

    #[test]
    #[should_panic(expected = "invalid regex")]
    fn test_invalid_regex_panics_at_construction() {
        let _ = actual().matches("(unclosed");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            actual().add(2).eq(5).evaluate(&v(json!(3))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().mul(3).eq(12).evaluate(&v(json!(4))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().div(2).eq(2.5).evaluate(&v(json!(5))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().add(2).eq(6).evaluate(&v(json!(3))),
            fail("(3 + 2) == 6")
        );
        assert_eq!(
            actual().div(0).eq(1).evaluate(&v(json!(3))),
            fail("(3 / 0) == 1: division by zero")
        );
    }

    #[test]
    fn test_type_of() {
        assert_eq!(
            actual().type_of().eq("list").evaluate(&v(json!([1, 2, 3]))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().type_of().eq("list").evaluate(&v(json!("nope"))),
            fail("(type 'nope') == 'list'")
        );
    }

    #[test]
    fn test_apply() {
        let half = |value: &Value| match value.as_number() {
            Some(n) => Ok(Value::Float(n / 2.0)),
            None => Err("not a number".to_string()),
        };
        assert_eq!(
            actual().apply("half", half).eq(5).evaluate(&v(json!(10))),
            EvalOutcome::Pass
        );
        assert_eq!(
            actual().apply("half", half).gt(4.0).evaluate(&v(json!(6))),
            fail("(half(6)) > 4")
        );
        assert_eq!(
            actual().apply("half", half).gt(4).evaluate(&v(json!("x"))),
            fail("(half('x')) > 4: not a number")
        );
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let expr = actual().gt(20).or(actual().lt(12));
        let value = v(json!(15));
        assert_eq!(expr.evaluate(&value), expr.evaluate(&value));
        assert_eq!(expr.render(&value), expr.render(&value));
    }
}
