//! Relations shared by the dispatch tests.

use crate::{
    compose, parts, validators, Assertion, BoxError, Deferred, Expect, Failure, Outcome, Registry,
    Validator, Value,
};

pub fn is_even() -> Assertion {
    Assertion::new(parts!["to be even"], |subject: &Value, _: &[Value]| {
        subject.as_i64().map_or(false, |n| n % 2 == 0)
    })
    .unwrap()
}

pub fn greater_than() -> Assertion {
    Assertion::new(
        parts![validators::number(), "to be greater than", validators::number()],
        |subject: &Value, params: &[Value]| match (subject.as_f64(), params[0].as_f64()) {
            (Some(actual), Some(bound)) if actual > bound => Outcome::pass(),
            _ => Outcome::fail(Failure::unmet().with_expected(params[0].clone())),
        },
    )
    .unwrap()
}

pub fn is_number() -> Assertion {
    Assertion::from_validator(parts!["to be a number"], validators::number()).unwrap()
}

pub fn is_string() -> Assertion {
    Assertion::from_validator(parts!["to be a string"], validators::string()).unwrap()
}

pub fn equals() -> Assertion {
    Assertion::new(
        parts![["to be", "to equal"], Validator::any()],
        |subject: &Value, params: &[Value]| {
            if *subject == params[0] {
                Outcome::pass()
            } else {
                Outcome::fail(Failure::unmet().with_expected(params[0].clone()))
            }
        },
    )
    .unwrap()
}

/// Declares its own `and` conjunct.
pub fn positive_and() -> Assertion {
    Assertion::new(
        parts!["to be positive", "and", validators::callable()],
        |subject: &Value, _: &[Value]| subject.as_f64().map_or(false, |n| n > 0.0),
    )
    .unwrap()
}

async fn settle(subject: Value) -> Result<Result<Value, Value>, BoxError> {
    let pending = subject
        .as_deferred()
        .and_then(Deferred::take)
        .ok_or("deferred value was already awaited")?;
    Ok(pending.await)
}

pub fn resolves() -> Assertion {
    Assertion::new_async(parts![validators::deferred(), "to resolve"], |subject, _| async move {
        Ok::<_, BoxError>(match settle(subject).await? {
            Ok(_) => Outcome::pass(),
            Err(reason) => Outcome::fail(
                Failure::new("expected the deferred value to resolve").with_actual(reason),
            ),
        })
    })
    .unwrap()
}

pub fn above_ten() -> Validator {
    Validator::predicate("above ten", |value| value.as_f64().map_or(false, |n| n > 10.0))
}

pub fn base() -> Expect {
    compose(Registry::new(), Registry::new()).apply(vec![
        is_even(),
        greater_than(),
        is_number(),
        is_string(),
        equals(),
        positive_and(),
        resolves(),
    ])
}
