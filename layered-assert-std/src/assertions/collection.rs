//! Length and membership over strings, lists and maps.

use layered_assert::{
    parts, validators, Assertion, AssertionMeta, ConfigError, Failure, Outcome, Validator, Value,
};

fn categorized(assertion: Assertion) -> Assertion {
    assertion.with_meta(AssertionMeta::new().with_category("collection"))
}

fn named(id: &'static str) -> impl FnOnce(Assertion) -> Assertion {
    move |assertion| {
        assertion.with_meta(
            AssertionMeta::new()
                .with_id(id)
                .with_category("collection"),
        )
    }
}

fn has_length() -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![validators::sized(), "to have length", validators::integer()],
        |subject: &Value, params: &[Value]| {
            let actual = subject.len().unwrap_or_default();
            match params[0].as_i64() {
                Some(expected) if expected >= 0 && actual == expected as usize => Outcome::pass(),
                _ => Outcome::fail(
                    Failure::unmet()
                        .with_actual(actual)
                        .with_expected(params[0].clone()),
                ),
            }
        },
    )
    .map(categorized)
}

fn is_empty() -> Result<Assertion, ConfigError> {
    Assertion::from_validator(
        parts![validators::sized(), "to be empty"],
        Validator::predicate("empty", |value| value.len() == Some(0)),
    )
    .map(categorized)
}

fn string_contains() -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![validators::string(), "to contain", validators::string()],
        |subject: &Value, params: &[Value]| match (subject.as_str(), params[0].as_str()) {
            (Some(haystack), Some(needle)) => haystack.contains(needle),
            _ => false,
        },
    )
    .map(named("to-contain-substring"))
}

fn list_contains() -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![validators::list(), "to contain", Validator::any()],
        |subject: &Value, params: &[Value]| {
            subject
                .as_list()
                .map_or(false, |items| items.contains(&params[0]))
        },
    )
    .map(named("to-contain-element"))
}

fn has_key() -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![validators::map(), "to have key", validators::string()],
        |subject: &Value, params: &[Value]| match (subject.as_map(), params[0].as_str()) {
            (Some(map), Some(key)) => map.contains_key(key),
            _ => false,
        },
    )
    .map(categorized)
}

fn one_of() -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![Validator::any(), "to be one of", validators::list()],
        |_: &Value, params: &[Value]| {
            validators::one_of(params[0].as_list().map(<[Value]>::to_vec).unwrap_or_default())
        },
    )
    .map(categorized)
}

pub fn assertions() -> Result<Vec<Assertion>, ConfigError> {
    Ok(vec![
        has_length()?,
        is_empty()?,
        string_contains()?,
        list_contains()?,
        has_key()?,
        one_of()?,
    ])
}
