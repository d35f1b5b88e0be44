//! Assert that an actual data structure *matches* an expected structure,
//! without requiring exact equality.
//!
//! Expected values can be literals, nested containers, lazy predicate
//! expressions built from the [`actual()`] placeholder, or named custom
//! [checks](Check). Matching walks both trees, compares literals by
//! equality, evaluates predicates against the corresponding actual
//! values, and collects *every* mismatch with its path instead of
//! stopping at the first one.
//!
//! # Example
//!
//! ```
//! use alike::{actual, alike, assert_alike};
//! use serde_json::json;
//!
//! let data = json!({
//!     "name": "Arthur",
//!     "age": 42,
//!     "tags": ["king", "britons"],
//! });
//!
//! assert_alike(
//!     alike!({
//!         "name": "Arthur",
//!         "age": actual().ge(18).and(actual().lt(120)),
//!         "tags": actual().length().eq(2),
//!         "quest": actual().is_missing(),
//!     }),
//!     data,
//! );
//! ```
//!
//! On mismatch, [`assert_alike`] panics with one report listing every
//! failure and where it happened:
//!
//! ```text
//! Values not alike:
//!   'age' failed validation: 15 causes error: (15 >= 18) and (15 < 120)
//!   'tags' -> 1 failed validation: 'britons' causes error: 'britons' == 'saxons'
//! ```
//!
//! For use inside `assert_eq!` or plain `==`, wrap the expected structure
//! in [`Alike`]; for programmatic access to the failures, use
//! [`check_alike`] or [`match_values`].

mod expr;
mod macros;
mod matcher;
mod value;

pub use expr::{actual, Applied, BinaryOp, EvalError, EvalOutcome, Expr, UnaryOp};
pub use matcher::{
    assert_alike, check, check_alike, is_alike, match_values, Alike, Check, Expected,
    MatchFailure, MatchReport, PathSegment, UnlikeError,
};
pub use value::{Value, MISSING};
