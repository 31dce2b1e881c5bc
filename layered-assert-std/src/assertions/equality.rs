//! Equality and validator delegation.
//!
//! Registered last: `to be` accepts any parameter.

use layered_assert::{
    parts, validators, Assertion, AssertionMeta, BoxError, ConfigError, Failure, Outcome,
    Validator, Value,
};

fn equals() -> Result<Assertion, ConfigError> {
    let assertion = Assertion::new(
        parts![["to be", "to equal"], Validator::any()],
        |subject: &Value, params: &[Value]| {
            if *subject == params[0] {
                Outcome::pass()
            } else {
                Outcome::fail(Failure::unmet().with_expected(params[0].clone()))
            }
        },
    )?;
    Ok(assertion.with_meta(
        AssertionMeta::new()
            .with_id("equal")
            .with_category("equality")
            .with_description("Structural equality; integers and floats compare numerically."),
    ))
}

fn satisfies() -> Result<Assertion, ConfigError> {
    let assertion = Assertion::new(
        parts!["to satisfy", validators::callable()],
        |_: &Value, params: &[Value]| -> Result<Validator, BoxError> {
            params[0]
                .as_validator()
                .cloned()
                .ok_or_else(|| "expected a validator".into())
        },
    )?;
    Ok(assertion.with_meta(AssertionMeta::new().with_category("equality")))
}

pub fn assertions() -> Result<Vec<Assertion>, ConfigError> {
    Ok(vec![satisfies()?, equals()?])
}
