//! Registrations: immutable bundles of compiled slots and an implementation.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::errors::{BoxError, ConfigError};
use crate::failure::Failure;
use crate::part::{Part, Parts};
use crate::slot::{compile, Slots, CHAIN_TOKEN};
use crate::validator::Validator;
use crate::value::Value;

/// Whether an implementation completes synchronously or yields a future.
///
/// Composition splits registrations on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Sync,
    Async,
}

/// What an implementation concluded about the subject.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The relation held (`true`) or did not (`false`).
    Holds(bool),
    /// Let this validator decide on the subject.
    Delegate(Validator),
    /// The relation did not hold, with details.
    Failed(Failure),
}

impl Outcome {
    pub fn pass() -> Self {
        Outcome::Holds(true)
    }

    pub fn fail(failure: Failure) -> Self {
        Outcome::Failed(failure)
    }
}

/// Conversion of implementation return values into an [`Outcome`].
///
/// Lets implementations return `bool`, a [`Validator`], a [`Failure`], `()`,
/// or a `Result` of any of those.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Outcome, BoxError>;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(self)
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Holds(self))
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Holds(true))
    }
}

impl IntoOutcome for Validator {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Delegate(self))
    }
}

impl IntoOutcome for Failure {
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        Ok(Outcome::Failed(self))
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Outcome, BoxError> {
        self.map_err(Into::into).and_then(IntoOutcome::into_outcome)
    }
}

pub type SyncFn = dyn Fn(&Value, &[Value]) -> Result<Outcome, BoxError> + Send + Sync;
pub type AsyncFn =
    dyn Fn(Value, Vec<Value>) -> BoxFuture<'static, Result<Outcome, BoxError>> + Send + Sync;

/// The code behind a registration. Receives the subject and the parameter
/// values; phrase tokens and chained conjuncts are not passed.
#[derive(Clone)]
pub enum Implementation {
    Sync(Arc<SyncFn>),
    Async(Arc<AsyncFn>),
}

impl Implementation {
    pub fn sync<F, O>(f: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> O + Send + Sync + 'static,
        O: IntoOutcome,
    {
        Implementation::Sync(Arc::new(move |subject: &Value, params: &[Value]| {
            f(subject, params).into_outcome()
        }))
    }

    pub fn asynchronous<F, Fut, O>(f: F) -> Self
    where
        F: Fn(Value, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: IntoOutcome + Send + 'static,
    {
        Implementation::Async(Arc::new(move |subject: Value, params: Vec<Value>| {
            let fut = f(subject, params);
            Box::pin(async move { fut.await.into_outcome() })
                as BoxFuture<'static, Result<Outcome, BoxError>>
        }))
    }

    /// Delegate every call straight to `validator`.
    pub fn validator(validator: Validator) -> Self {
        Implementation::sync(move |_: &Value, _: &[Value]| validator.clone())
    }

    pub fn capability(&self) -> Capability {
        match self {
            Implementation::Sync(_) => Capability::Sync,
            Implementation::Async(_) => Capability::Async,
        }
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Implementation::{:?}", self.capability())
    }
}

/// Documentation metadata. Never consulted during matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionMeta {
    /// Stable identifier. Derived from the phrases when absent.
    pub id: Option<String>,
    pub category: Option<String>,
    /// Cross-reference tag for generated docs.
    pub anchor: Option<String>,
    pub description: Option<String>,
}

impl AssertionMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

struct AssertionInner {
    id: String,
    parts: Parts,
    slots: Slots,
    implementation: Implementation,
    meta: AssertionMeta,
}

/// A registered relation: compiled slots plus an implementation.
///
/// Handles are cheap to clone and immutable; [`Assertion::with_meta`]
/// produces a new handle.
#[derive(Clone)]
pub struct Assertion(Arc<AssertionInner>);

impl Assertion {
    /// Register a synchronous relation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let even = Assertion::new(parts!["to be even"], |subject, _| {
    ///     subject.as_i64().map_or(false, |n| n % 2 == 0)
    /// })?;
    /// ```
    pub fn new<F, O>(parts: Parts, f: F) -> Result<Self, ConfigError>
    where
        F: Fn(&Value, &[Value]) -> O + Send + Sync + 'static,
        O: IntoOutcome,
    {
        Self::from_implementation(parts, Implementation::sync(f))
    }

    /// Register an asynchronous relation.
    pub fn new_async<F, Fut, O>(parts: Parts, f: F) -> Result<Self, ConfigError>
    where
        F: Fn(Value, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = O> + Send + 'static,
        O: IntoOutcome + Send + 'static,
    {
        Self::from_implementation(parts, Implementation::asynchronous(f))
    }

    /// Register a relation whose verdict is `validator` applied to the subject.
    pub fn from_validator(parts: Parts, validator: Validator) -> Result<Self, ConfigError> {
        Self::from_implementation(parts, Implementation::validator(validator))
    }

    pub fn from_implementation(
        parts: Parts,
        implementation: Implementation,
    ) -> Result<Self, ConfigError> {
        let slots = compile(&parts)?;
        let id = default_id(&parts, implementation.capability());
        tracing::debug!(assertion = %id, "registered assertion");
        Ok(Assertion(Arc::new(AssertionInner {
            id,
            parts,
            slots,
            implementation,
            meta: AssertionMeta::default(),
        })))
    }

    /// A new handle carrying `meta`; `self` is left untouched.
    pub fn with_meta(&self, meta: AssertionMeta) -> Self {
        let id = meta.id.clone().unwrap_or_else(|| {
            default_id(&self.0.parts, self.0.implementation.capability())
        });
        Assertion(Arc::new(AssertionInner {
            id,
            parts: self.0.parts.clone(),
            slots: self.0.slots.clone(),
            implementation: self.0.implementation.clone(),
            meta,
        }))
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn meta(&self) -> &AssertionMeta {
        &self.0.meta
    }

    pub fn parts(&self) -> &Parts {
        &self.0.parts
    }

    pub fn slots(&self) -> &Slots {
        &self.0.slots
    }

    pub fn implementation(&self) -> &Implementation {
        &self.0.implementation
    }

    pub fn capability(&self) -> Capability {
        self.0.implementation.capability()
    }

    /// The call shape, e.g. `{number} 'to be greater than' {number}`.
    pub fn signature(&self) -> String {
        let mut pieces = Vec::with_capacity(self.0.parts.len() + 1);
        if self.0.parts.as_slice().first().map_or(false, Part::is_phrase) {
            pieces.push("{any}".to_string());
        }
        for part in self.0.parts.iter() {
            pieces.push(match part {
                Part::Literal(text) => format!("'{}'", text),
                Part::Choice(alternatives) => {
                    let quoted: Vec<String> =
                        alternatives.iter().map(|alt| format!("'{}'", alt)).collect();
                    format!("({})", quoted.join(" | "))
                }
                Part::Validator(validator) => format!("{{{}}}", validator.name()),
            });
        }
        pieces.join(" ")
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("id", &self.id())
            .field("signature", &self.signature())
            .field("capability", &self.capability())
            .finish()
    }
}

/// Kebab-case slug of the phrases, first alternative of each choice.
fn default_id(parts: &Parts, capability: Capability) -> String {
    let mut words = Vec::new();
    for part in parts.iter() {
        let first = part.phrases().and_then(|alts| alts.first());
        if let Some(first) = first.filter(|first| &***first != CHAIN_TOKEN) {
            words.extend(
                first
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                    .map(str::to_lowercase),
            );
        }
    }
    let mut id = if words.is_empty() {
        "anonymous".to_string()
    } else {
        words.join("-")
    };
    if capability == Capability::Async {
        id.push_str("-async");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts;
    use crate::validator::validators;

    #[test]
    fn test_default_id_from_phrases() {
        let parts = parts![
            validators::number(),
            ["to be greater than", "to be above"],
            validators::number()
        ];
        let assertion = Assertion::new(parts, |_: &Value, _: &[Value]| true).unwrap();
        assert_eq!(assertion.id(), "to-be-greater-than");
    }

    #[test]
    fn test_default_id_skips_chain_token() {
        let assertion = Assertion::new(
            parts!["to be positive", "and", validators::callable()],
            |_: &Value, _: &[Value]| true,
        )
        .unwrap();
        assert_eq!(assertion.id(), "to-be-positive");
    }

    #[test]
    fn test_default_id_async_suffix() {
        let assertion = Assertion::new_async(parts!["to resolve"], |_, _| async { true }).unwrap();
        assert_eq!(assertion.id(), "to-resolve-async");
        assert_eq!(assertion.capability(), Capability::Async);
    }

    #[test]
    fn test_signature() {
        let assertion = Assertion::new(
            parts!["to be", "and", validators::callable()],
            |_: &Value, _: &[Value]| true,
        )
        .unwrap();
        assert_eq!(assertion.signature(), "{any} 'to be' 'and' {callable}");

        let choice = Assertion::new(
            parts![validators::string(), ["to start with", "to begin with"], validators::string()],
            |_: &Value, _: &[Value]| true,
        )
        .unwrap();
        assert_eq!(
            choice.signature(),
            "{string} ('to start with' | 'to begin with') {string}"
        );
    }

    #[test]
    fn test_with_meta_leaves_original_untouched() {
        let original = Assertion::new(parts!["to be tidy"], |_: &Value, _: &[Value]| true).unwrap();
        let documented = original.with_meta(
            AssertionMeta::new()
                .with_id("tidy")
                .with_category("style")
                .with_anchor("tidiness"),
        );
        assert_eq!(original.id(), "to-be-tidy");
        assert_eq!(original.meta().category, None);
        assert_eq!(documented.id(), "tidy");
        assert_eq!(documented.meta().category.as_deref(), Some("style"));
        assert!(Arc::ptr_eq(original.slots(), documented.slots()));
    }

    #[test]
    fn test_structural_errors_surface_at_creation() {
        let err =
            Assertion::new(parts!["not to be tidy"], |_: &Value, _: &[Value]| true).unwrap_err();
        assert!(matches!(err, ConfigError::NegatedPhrase { index: 0, .. }));
    }

    #[test]
    fn test_into_outcome_conversions() {
        assert!(matches!(true.into_outcome(), Ok(Outcome::Holds(true))));
        assert!(matches!(().into_outcome(), Ok(Outcome::Holds(true))));
        assert!(matches!(
            validators::string().into_outcome(),
            Ok(Outcome::Delegate(_))
        ));
        let raised: Result<bool, std::fmt::Error> = Err(std::fmt::Error);
        assert!(raised.into_outcome().is_err());
    }
}
