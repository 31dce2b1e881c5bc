//! Validators: named capabilities that accept or reject a value.
//!
//! A [`Validator`] is opaque to the dispatcher apart from being invoked. It
//! guards subject and parameter slots during matching, and an implementation
//! may hand one back to delegate the final verdict on the subject.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::config::DiagnosticsConfig;
use crate::failure::Failure;
use crate::formatter::inspect;
use crate::value::Value;

type Check = dyn Fn(&Value, &DiagnosticsConfig) -> Result<(), Failure> + Send + Sync;

struct Inner {
    name: Cow<'static, str>,
    check: Box<Check>,
}

/// A named check over a [`Value`].
///
/// Clones share identity, which is what [`Value`] equality compares for
/// validator arguments.
#[derive(Clone)]
pub struct Validator {
    inner: Arc<Inner>,
}

impl Validator {
    /// Create a validator reporting its own [`Failure`] on rejection.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self::configured(name, move |value, _: &DiagnosticsConfig| check(value))
    }

    /// Like [`Validator::new`], for checks that render values in their
    /// messages and should follow the caller's diagnostics settings.
    pub fn configured<F>(name: impl Into<Cow<'static, str>>, check: F) -> Self
    where
        F: Fn(&Value, &DiagnosticsConfig) -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                check: Box::new(check),
            }),
        }
    }

    /// Create a validator from a boolean predicate.
    ///
    /// Rejections read `expected <value> to satisfy <name>`.
    pub fn predicate<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let label = name.clone();
        Self::configured(name, move |value, config| {
            if predicate(value) {
                Ok(())
            } else {
                Err(Failure::new(format!(
                    "expected {} to satisfy {}",
                    inspect(value, config),
                    label
                ))
                .with_actual(value.clone()))
            }
        })
    }

    /// The accept-anything validator used for implicit subjects.
    pub fn any() -> Self {
        static ANY: Lazy<Validator> = Lazy::new(|| Validator::new("any", |_| Ok(())));
        ANY.clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn validate(&self, value: &Value) -> Result<(), Failure> {
        self.validate_with(value, &DiagnosticsConfig::default())
    }

    /// [`validate`](Self::validate), rendering any rejection with `config`.
    pub fn validate_with(&self, value: &Value, config: &DiagnosticsConfig) -> Result<(), Failure> {
        (self.inner.check)(value, config)
    }

    pub fn accepts(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name()).finish()
    }
}

/// Stock validators for the [`Value`] variants.
///
/// Each constructor hands out a clone of a shared instance, so repeated use
/// across registrations keeps one identity.
pub mod validators {
    use super::*;

    fn kind(
        name: &'static str,
        description: &'static str,
        accepts: fn(&Value) -> bool,
    ) -> Validator {
        Validator::configured(name, move |value, config| {
            if accepts(value) {
                Ok(())
            } else {
                Err(Failure::new(format!(
                    "expected {} to be {}",
                    inspect(value, config),
                    description
                ))
                .with_actual(value.clone()))
            }
        })
    }

    macro_rules! stock {
        ($(#[$doc:meta])* $fn_name:ident, $name:literal, $description:literal, $accepts:expr) => {
            $(#[$doc])*
            pub fn $fn_name() -> Validator {
                static SHARED: Lazy<Validator> = Lazy::new(|| kind($name, $description, $accepts));
                SHARED.clone()
            }
        };
    }

    stock!(string, "string", "a string", |v| matches!(v, Value::Str(_)));
    stock!(
        /// Integers and floats alike.
        number,
        "number",
        "a number",
        |v| v.is_number()
    );
    stock!(
        /// Integers, and floats without a fractional part.
        integer,
        "integer",
        "an integer",
        |v| v.as_i64().is_some()
    );
    stock!(boolean, "boolean", "a boolean", |v| matches!(v, Value::Bool(_)));
    stock!(null, "null", "null", |v| v.is_null());
    stock!(list, "list", "a list", |v| matches!(v, Value::List(_)));
    stock!(map, "map", "a map", |v| matches!(v, Value::Map(_)));
    stock!(
        /// Validator values, i.e. things that can be applied to a subject.
        callable,
        "callable",
        "a validator",
        |v| matches!(v, Value::Validator(_))
    );
    stock!(deferred, "deferred", "a deferred value", |v| matches!(v, Value::Deferred(_)));
    stock!(opaque, "opaque", "an opaque context", |v| matches!(v, Value::Opaque(_)));
    stock!(
        /// Strings, lists and maps.
        sized,
        "sized",
        "a string, list or map",
        |v| v.len().is_some()
    );

    /// Accepts values equal to one of `allowed`.
    pub fn one_of(allowed: Vec<Value>) -> Validator {
        let label = inspect(&Value::List(allowed.clone()), &DiagnosticsConfig::default());
        Validator::configured(format!("one of {}", label), move |value, config| {
            if allowed.contains(value) {
                Ok(())
            } else {
                Err(Failure::new(format!(
                    "expected {} to be one of {}",
                    inspect(value, config),
                    inspect(&Value::List(allowed.clone()), config)
                ))
                .with_actual(value.clone())
                .with_expected(Value::List(allowed.clone())))
            }
        })
    }
}
