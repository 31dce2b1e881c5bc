//! String shape relations.

use layered_assert::{parts, validators, Assertion, AssertionMeta, BoxError, ConfigError, Value};
use regex::Regex;

fn categorized(assertion: Assertion) -> Assertion {
    assertion.with_meta(AssertionMeta::new().with_category("string"))
}

/// `check("abc", "to match", "^a")`. An invalid pattern is an implementation
/// error, not a failed check.
fn matches() -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![validators::string(), "to match", validators::string()],
        |subject: &Value, params: &[Value]| -> Result<bool, BoxError> {
            let pattern = Regex::new(params[0].as_str().unwrap_or_default())?;
            Ok(pattern.is_match(subject.as_str().unwrap_or_default()))
        },
    )
    .map(categorized)
}

fn affix(phrase: &'static str, holds: fn(&str, &str) -> bool) -> Result<Assertion, ConfigError> {
    Assertion::new(
        parts![validators::string(), phrase, validators::string()],
        move |subject: &Value, params: &[Value]| match (subject.as_str(), params[0].as_str()) {
            (Some(text), Some(affix)) => holds(text, affix),
            _ => false,
        },
    )
    .map(categorized)
}

pub fn assertions() -> Result<Vec<Assertion>, ConfigError> {
    Ok(vec![
        matches()?,
        affix("to start with", |text, prefix| text.starts_with(prefix))?,
        affix("to end with", |text, suffix| text.ends_with(suffix))?,
    ])
}
