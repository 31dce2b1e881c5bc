//! Error types for registration, dispatch and configuration loading.

use std::error::Error as StdError;

use thiserror::Error;

use crate::config::DiagnosticsConfig;
use crate::failure::Failure;
use crate::formatter::render_call;
use crate::value::Value;

/// Boxed error raised by an assertion implementation.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type for dispatch.
pub type AssertResult<T = ()> = Result<T, AssertionError>;

/// A malformed parts sequence, reported when an assertion is created.
///
/// These indicate an authoring mistake and are never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("assertion parts must not be empty")]
    EmptyParts,

    #[error("part {index}: phrase must not be empty")]
    EmptyPhrase { index: usize },

    #[error("part {index}: phrase choice must list at least one alternative")]
    EmptyChoice { index: usize },

    /// Negation is derived by the dispatcher, never declared.
    #[error("part {index}: phrase {phrase:?} must not start with \"not \"; negated forms are derived automatically")]
    NegatedPhrase { index: usize, phrase: String },

    #[error("part {index}: \"and\" {reason}")]
    MisplacedConjunction { index: usize, reason: &'static str },

    #[error("part {index}: {phrase:?} is reserved for chaining and cannot appear in a phrase choice")]
    ReservedPhrase { index: usize, phrase: String },

    #[error("part {index}: expected a phrase, a phrase choice or a validator, got {value}")]
    UnrecognizedPart { index: usize, value: String },
}

/// No registration's slots matched the call shape.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct UnknownAssertion {
    pub subject: Value,
    /// Every argument after the subject, exactly as passed.
    pub args: Vec<Value>,
    message: String,
}

impl UnknownAssertion {
    pub(crate) fn new(subject: Value, args: Vec<Value>, config: &DiagnosticsConfig) -> Self {
        let message = format!(
            "no assertion matches {}",
            render_call(&subject, &args, config)
        );
        Self {
            subject,
            args,
            message,
        }
    }

    /// The full argument list, subject first.
    pub fn arguments(&self) -> Vec<Value> {
        std::iter::once(self.subject.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// The matched implementation broke its contract by raising an error that
/// is not a recognized failure.
#[derive(Debug, Error)]
#[error("assertion `{assertion}` raised an error: {source}")]
pub struct ImplementationError {
    pub assertion: String,
    pub source: BoxError,
}

/// Everything a dispatch can fail with.
#[derive(Debug, Error)]
pub enum AssertionError {
    #[error(transparent)]
    Unknown(#[from] UnknownAssertion),

    #[error(transparent)]
    Failed(#[from] Box<Failure>),

    #[error(transparent)]
    Implementation(#[from] ImplementationError),
}

impl AssertionError {
    pub fn is_unknown(&self) -> bool {
        matches!(self, AssertionError::Unknown(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AssertionError::Failed(_))
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            AssertionError::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<Failure> for AssertionError {
    fn from(failure: Failure) -> Self {
        AssertionError::Failed(Box::new(failure))
    }
}

/// Errors loading an [`AssertConfig`](crate::AssertConfig) file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Raise a recognized failure from inside an implementation.
///
/// ```ignore
/// Assertion::new(parts!["to be tidy"], |subject, _| {
///     if subject.is_null() {
///         return fail("nothing to tidy");
///     }
///     Ok::<_, BoxError>(true)
/// })
/// ```
pub fn fail<T>(message: impl Into<String>) -> Result<T, BoxError> {
    Err(Box::new(Failure::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NegatedPhrase {
            index: 1,
            phrase: "not to be".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "part 1: phrase \"not to be\" must not start with \"not \"; negated forms are derived automatically"
        );
    }

    #[test]
    fn test_unknown_assertion_arguments() {
        let err = UnknownAssertion::new(
            Value::Int(42),
            vec![Value::from("to fly")],
            &DiagnosticsConfig::default(),
        );
        assert_eq!(err.to_string(), r#"no assertion matches check(42, "to fly")"#);
        assert_eq!(err.arguments(), vec![Value::Int(42), Value::from("to fly")]);
    }

    #[test]
    fn test_fail_is_a_failure() {
        let err = fail::<()>("nope").unwrap_err();
        let failure = err.downcast::<Failure>().unwrap();
        assert_eq!(failure.message, "nope");
    }

    #[test]
    fn test_assertion_error_accessors() {
        let err = AssertionError::from(Failure::new("broken"));
        assert!(err.is_failure());
        assert!(!err.is_unknown());
        assert_eq!(err.failure().map(|f| f.message.as_str()), Some("broken"));
    }
}
