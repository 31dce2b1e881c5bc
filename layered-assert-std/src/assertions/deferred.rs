//! Asynchronous relations over deferred values.
//!
//! Each relation awaits its subject exactly once. A deferred value that was
//! already awaited elsewhere is an implementation error.

use layered_assert::{
    parts, validators, Assertion, AssertionMeta, BoxError, ConfigError, Deferred, Failure,
    Outcome, Settlement, Validator, Value,
};

async fn settle(subject: Value) -> Result<Settlement, BoxError> {
    let pending = subject
        .as_deferred()
        .and_then(Deferred::take)
        .ok_or("deferred value was already awaited")?;
    Ok(pending.await)
}

fn categorized(assertion: Assertion) -> Assertion {
    assertion.with_meta(AssertionMeta::new().with_category("deferred"))
}

fn resolves() -> Result<Assertion, ConfigError> {
    Assertion::new_async(parts![validators::deferred(), "to resolve"], |subject, _| async move {
        Ok::<_, BoxError>(match settle(subject).await? {
            Ok(_) => Outcome::pass(),
            Err(reason) => Outcome::fail(Failure::unmet().with_actual(reason)),
        })
    })
    .map(categorized)
}

fn rejects() -> Result<Assertion, ConfigError> {
    Assertion::new_async(parts![validators::deferred(), "to reject"], |subject, _| async move {
        Ok::<_, BoxError>(match settle(subject).await? {
            Ok(value) => Outcome::fail(Failure::unmet().with_actual(value)),
            Err(_) => Outcome::pass(),
        })
    })
    .map(categorized)
}

fn resolves_to() -> Result<Assertion, ConfigError> {
    Assertion::new_async(
        parts![validators::deferred(), "to resolve to", Validator::any()],
        |subject, params: Vec<Value>| async move {
            let expected = params.into_iter().next().unwrap_or(Value::Null);
            Ok::<_, BoxError>(match settle(subject).await? {
                Ok(value) if value == expected => Outcome::pass(),
                Ok(value) | Err(value) => {
                    Outcome::fail(Failure::unmet().with_actual(value).with_expected(expected))
                }
            })
        },
    )
    .map(categorized)
}

fn rejects_with() -> Result<Assertion, ConfigError> {
    Assertion::new_async(
        parts![validators::deferred(), "to reject with", Validator::any()],
        |subject, params: Vec<Value>| async move {
            let expected = params.into_iter().next().unwrap_or(Value::Null);
            Ok::<_, BoxError>(match settle(subject).await? {
                Err(reason) if reason == expected => Outcome::pass(),
                Ok(value) | Err(value) => {
                    Outcome::fail(Failure::unmet().with_actual(value).with_expected(expected))
                }
            })
        },
    )
    .map(categorized)
}

pub fn assertions() -> Result<Vec<Assertion>, ConfigError> {
    Ok(vec![resolves()?, rejects()?, resolves_to()?, rejects_with()?])
}
