use layered_assert::{parts, validators, Assertion, AssertionMeta, ConfigError, Validator};

fn kind(phrase: &'static str, validator: Validator) -> Result<Assertion, ConfigError> {
    let assertion = Assertion::from_validator(parts![phrase], validator)?;
    Ok(assertion.with_meta(
        AssertionMeta::new()
            .with_category("types")
            .with_anchor(format!("types-{}", assertion.id())),
    ))
}

pub fn assertions() -> Result<Vec<Assertion>, ConfigError> {
    Ok(vec![
        kind("to be a string", validators::string())?,
        kind("to be a number", validators::number())?,
        kind("to be an integer", validators::integer())?,
        kind("to be a boolean", validators::boolean())?,
        kind("to be null", validators::null())?,
        kind("to be a list", validators::list())?,
        kind("to be a map", validators::map())?,
    ])
}
