//! Declarative assertion parts.
//!
//! An assertion is described by an ordered sequence of [`Part`]s, e.g.
//! `[number, "to be greater than", number]`. The sequence is compiled into
//! slots by [`compile`](crate::slot::compile).

use std::sync::Arc;

use crate::config::DiagnosticsConfig;
use crate::errors::ConfigError;
use crate::formatter::inspect;
use crate::validator::Validator;
use crate::value::Value;

/// One element of an assertion description.
#[derive(Debug, Clone)]
pub enum Part {
    /// A fixed phrase token such as `"to be even"`.
    Literal(Arc<str>),
    /// Interchangeable phrase tokens (aliases) for the same relation.
    Choice(Arc<[Arc<str>]>),
    /// A subject constraint (first position) or a parameter.
    Validator(Validator),
}

impl Part {
    pub fn literal(text: impl AsRef<str>) -> Self {
        Part::Literal(Arc::from(text.as_ref()))
    }

    pub fn choice<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Part::Choice(
            alternatives
                .into_iter()
                .map(|alt| Arc::from(alt.as_ref()))
                .collect::<Vec<Arc<str>>>()
                .into(),
        )
    }

    pub fn is_phrase(&self) -> bool {
        matches!(self, Part::Literal(_) | Part::Choice(_))
    }

    /// The phrase alternatives of a literal or choice.
    pub fn phrases(&self) -> Option<&[Arc<str>]> {
        match self {
            Part::Literal(text) => Some(std::slice::from_ref(text)),
            Part::Choice(alternatives) => Some(alternatives),
            Part::Validator(_) => None,
        }
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::literal(text)
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::Literal(Arc::from(text))
    }
}

impl<const N: usize> From<[&str; N]> for Part {
    fn from(alternatives: [&str; N]) -> Self {
        Part::choice(alternatives)
    }
}

impl From<Vec<&str>> for Part {
    fn from(alternatives: Vec<&str>) -> Self {
        Part::choice(alternatives)
    }
}

impl From<Validator> for Part {
    fn from(validator: Validator) -> Self {
        Part::Validator(validator)
    }
}

/// An ordered parts sequence.
///
/// Clones share one allocation; compiled slots are cached against that
/// allocation, so reuse a `Parts` value rather than rebuilding an equal one
/// when registering several assertions with the same shape.
#[derive(Debug, Clone)]
pub struct Parts(Arc<[Part]>);

impl Parts {
    pub fn new<I: IntoIterator<Item = Part>>(parts: I) -> Self {
        Parts(parts.into_iter().collect::<Vec<_>>().into())
    }

    /// Build parts from dynamic values: strings become literals, lists of
    /// strings become choices, validators stay validators.
    pub fn from_values(values: Vec<Value>) -> Result<Self, ConfigError> {
        let mut parts = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let part = match value {
                Value::Str(text) => Part::from(text),
                Value::Validator(validator) => Part::Validator(validator),
                Value::List(items) if items.iter().all(|item| item.as_str().is_some()) => {
                    Part::choice(items.iter().filter_map(Value::as_str))
                }
                other => {
                    return Err(ConfigError::UnrecognizedPart {
                        index,
                        value: inspect(&other, &DiagnosticsConfig::default()),
                    })
                }
            };
            parts.push(part);
        }
        Ok(Parts::new(parts))
    }

    pub fn as_slice(&self) -> &[Part] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Part> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn shared(&self) -> &Arc<[Part]> {
        &self.0
    }
}

/// Build a [`Parts`] sequence from literals, choice arrays and validators.
///
/// ```ignore
/// let parts = parts![validators::number(), ["to be", "to equal"], validators::number()];
/// ```
#[macro_export]
macro_rules! parts {
    ($($part:expr),* $(,)?) => {
        $crate::Parts::new(::std::vec![$($crate::Part::from($part)),*])
    };
}
