//! Numeric ordering.

use layered_assert::{
    parts, validators, Assertion, AssertionMeta, ConfigError, Failure, Outcome, Part, Value,
};

fn ordering(phrase: Part, holds: fn(f64, f64) -> bool) -> Result<Assertion, ConfigError> {
    let assertion = Assertion::new(
        parts![validators::number(), phrase, validators::number()],
        move |subject: &Value, params: &[Value]| match (subject.as_f64(), params[0].as_f64()) {
            (Some(actual), Some(bound)) if holds(actual, bound) => Outcome::pass(),
            _ => Outcome::fail(Failure::unmet().with_expected(params[0].clone())),
        },
    )?;
    Ok(assertion.with_meta(AssertionMeta::new().with_category("comparison")))
}

pub fn assertions() -> Result<Vec<Assertion>, ConfigError> {
    Ok(vec![
        ordering(Part::choice(["to be greater than", "to be above"]), |a, b| a > b)?,
        ordering(Part::choice(["to be less than", "to be below"]), |a, b| a < b)?,
        ordering(Part::literal("to be greater than or equal to"), |a, b| a >= b)?,
        ordering(Part::literal("to be less than or equal to"), |a, b| a <= b)?,
    ])
}
