//! Base relations and the default front door for layered-assert.
//!
//! ```ignore
//! use layered_assert_std::{assert_that, check, Value};
//!
//! assert_that!(5, "to be greater than", 3)?;
//! assert_that!("abc", "to have length", 3)?;
//! check("x", vec![Value::from("to be a string")])?;
//! ```
//!
//! Projects add their own relations with [`extend_with`], which returns a new
//! [`Expect`] layered over the base catalog.
//!
//! ## Modules
//!
//! - [`assertions`] - The base relation catalog

pub mod assertions;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;

pub use layered_assert::{
    compose, fail, parts, validators, AssertConfig, AssertResult, Assertion, AssertionError,
    AssertionMeta, BoxError, ConfigError, Deferred, DiagnosticsConfig, Expect, Failure, Opaque,
    Outcome, Part, Parts, Registry, Validator, Value,
};

static BASE: Lazy<Expect> = Lazy::new(|| {
    let catalog = assertions::all().expect("base catalog parts are well-formed");
    tracing::debug!(assertions = catalog.len(), "built base catalog");
    compose(Registry::new(), Registry::new()).apply(catalog)
});

/// The shared base [`Expect`].
pub fn expect() -> Expect {
    BASE.clone()
}

/// `check(subject, rest..)` against the base catalog.
pub fn check(subject: impl Into<Value>, rest: Vec<Value>) -> AssertResult {
    BASE.check(subject, rest)
}

/// `check_async(subject, rest..)` against the base catalog.
pub fn check_async(
    subject: impl Into<Value>,
    rest: Vec<Value>,
) -> BoxFuture<'static, AssertResult> {
    BASE.check_async(subject, rest)
}

/// The base catalog followed by `assertions`.
pub fn extend_with<I: IntoIterator<Item = Assertion>>(assertions: I) -> Expect {
    BASE.extend_with(assertions)
}

/// [`check`] with mixed arguments.
#[macro_export]
macro_rules! assert_that {
    ($subject:expr $(, $arg:expr)* $(,)?) => {
        $crate::check($subject, ::std::vec![$($crate::Value::from($arg)),*])
    };
}

/// [`check_async`] with mixed arguments; evaluates to a future.
#[macro_export]
macro_rules! assert_that_async {
    ($subject:expr $(, $arg:expr)* $(,)?) => {
        $crate::check_async($subject, ::std::vec![$($crate::Value::from($arg)),*])
    };
}
