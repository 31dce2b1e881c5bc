//! Phrase-dispatched assertions over layered, composable registries.
//!
//! Test code states expectations as calls mixing a subject with phrase tokens
//! and parameters:
//!
//! ```ignore
//! check!(expect, 5, "to be greater than", 3)?;
//! check!(expect, 3, "not to be even")?;
//! check!(expect, 42, "to be a number", "and", Validator::predicate("above ten", above_ten))?;
//! ```
//!
//! Each relation is registered as an [`Assertion`] built from [`Parts`]:
//! phrase literals, phrase choices and [`Validator`]s. Parts compile into
//! slots, and at call time the dispatcher picks the first registration whose
//! slots accept the call.
//!
//! ## Modules
//!
//! - [`value`] - Dynamic call arguments
//! - [`validator`] - Named value checks and the stock set
//! - [`part`] - Declarative assertion parts
//! - [`slot`] - Slot compilation and its identity-keyed caches
//! - [`assertion`] - Registrations and implementation outcomes
//! - [`registry`] - Ordered registries and the documentation catalog
//! - [`dispatch`] - Call matching, negation and chaining
//! - [`expect`] - Dispatcher closures and composition
//! - [`failure`] - Structured failure diagnostics
//! - [`formatter`] - Value, call and diff rendering
//! - [`errors`] - Error types
//! - [`config`] - Diagnostics configuration via TOML

pub mod assertion;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod expect;
pub mod failure;
pub mod formatter;
pub mod part;
pub mod registry;
pub mod slot;
pub mod validator;
pub mod value;

pub use assertion::{Assertion, AssertionMeta, Capability, Implementation, IntoOutcome, Outcome};
pub use config::{AssertConfig, DiagnosticsConfig};
pub use errors::{
    fail, AssertResult, AssertionError, BoxError, ConfigError, ConfigLoadError,
    ImplementationError, UnknownAssertion,
};
pub use expect::{compose, Composer, Expect};
pub use failure::{Failure, ValueFormatter};
pub use part::{Part, Parts};
pub use registry::{CatalogEntry, Registry};
pub use validator::{validators, Validator};
pub use value::{Deferred, Opaque, Settlement, Value};

#[cfg(test)]
mod tests {
    mod async_dispatch;
    mod chaining;
    mod composition;
    mod diagnostics;
    mod fixtures;
    mod matching;
    mod negation;
}
