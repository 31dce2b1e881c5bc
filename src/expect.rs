//! Dispatcher closures and additive composition.
//!
//! An [`Expect`] owns a snapshot of a synchronous and an asynchronous
//! [`Registry`]. Extending it yields a new `Expect` layered over the same
//! snapshots; the original keeps working unchanged.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::assertion::{Assertion, Capability};
use crate::config::AssertConfig;
use crate::dispatch::{dispatch, dispatch_async};
use crate::errors::AssertResult;
use crate::registry::Registry;
use crate::value::Value;

/// Call entry points over fixed registries.
#[derive(Debug, Clone, Default)]
pub struct Expect {
    sync: Registry,
    asynchronous: Registry,
    config: Arc<AssertConfig>,
}

impl Expect {
    pub fn new(sync: Registry, asynchronous: Registry) -> Self {
        Self {
            sync,
            asynchronous,
            config: Arc::default(),
        }
    }

    /// An `Expect` that knows no assertions.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Run `check(subject, rest..)` against the synchronous registry.
    pub fn check(&self, subject: impl Into<Value>, rest: Vec<Value>) -> AssertResult {
        dispatch(&self.sync, &subject.into(), &rest, &self.config.diagnostics)
    }

    /// Run `check(subject, rest..)` against the asynchronous registry.
    ///
    /// The returned future does not borrow `self`.
    pub fn check_async(
        &self,
        subject: impl Into<Value>,
        rest: Vec<Value>,
    ) -> BoxFuture<'static, AssertResult> {
        dispatch_async(&self.asynchronous, subject.into(), rest, self.config.diagnostics)
    }

    /// A new `Expect` knowing every assertion `self` knows, followed by
    /// `assertions`. Existing registrations keep priority.
    pub fn extend_with<I: IntoIterator<Item = Assertion>>(&self, assertions: I) -> Expect {
        self.composer().apply(assertions)
    }

    /// The same registries, rendering diagnostics with `config`.
    pub fn with_config(&self, config: AssertConfig) -> Expect {
        Self {
            sync: self.sync.clone(),
            asynchronous: self.asynchronous.clone(),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    pub fn sync_registry(&self) -> &Registry {
        &self.sync
    }

    pub fn async_registry(&self) -> &Registry {
        &self.asynchronous
    }

    /// A composer over this `Expect`'s registries and configuration.
    pub fn composer(&self) -> Composer {
        Composer {
            sync: self.sync.clone(),
            asynchronous: self.asynchronous.clone(),
            config: self.config.clone(),
        }
    }
}

/// Builds [`Expect`]s layered over base registries.
#[derive(Debug, Clone)]
pub struct Composer {
    sync: Registry,
    asynchronous: Registry,
    config: Arc<AssertConfig>,
}

/// Start composing over `base_sync` and `base_async`.
pub fn compose(base_sync: Registry, base_async: Registry) -> Composer {
    Composer {
        sync: base_sync,
        asynchronous: base_async,
        config: Arc::default(),
    }
}

impl Composer {
    pub fn with_config(mut self, config: AssertConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Split `assertions` by capability and append each half to its base.
    pub fn apply<I: IntoIterator<Item = Assertion>>(&self, assertions: I) -> Expect {
        let (asynchronous, sync): (Vec<Assertion>, Vec<Assertion>) = assertions
            .into_iter()
            .partition(|assertion| assertion.capability() == Capability::Async);
        Expect {
            sync: self.sync.extend(sync),
            asynchronous: self.asynchronous.extend(asynchronous),
            config: self.config.clone(),
        }
    }
}

/// Run a synchronous check with mixed arguments.
///
/// ```ignore
/// check!(expect, 5, "to be greater than", 3)?;
/// ```
#[macro_export]
macro_rules! check {
    ($expect:expr, $subject:expr $(, $arg:expr)* $(,)?) => {
        $expect.check($subject, ::std::vec![$($crate::Value::from($arg)),*])
    };
}

/// Asynchronous counterpart of [`check!`]; evaluates to a future.
#[macro_export]
macro_rules! check_async {
    ($expect:expr, $subject:expr $(, $arg:expr)* $(,)?) => {
        $expect.check_async($subject, ::std::vec![$($crate::Value::from($arg)),*])
    };
}
