//! The base relation catalog, grouped by category.
//!
//! Within a group, more specific shapes are registered ahead of general ones.

mod collection;
mod comparison;
mod deferred;
mod equality;
mod string;
mod types;

use layered_assert::{Assertion, ConfigError};

/// Every synchronous base relation, in priority order.
pub fn sync_assertions() -> Result<Vec<Assertion>, ConfigError> {
    let mut assertions = types::assertions()?;
    assertions.extend(comparison::assertions()?);
    assertions.extend(collection::assertions()?);
    assertions.extend(string::assertions()?);
    assertions.extend(equality::assertions()?);
    Ok(assertions)
}

/// Every asynchronous base relation.
pub fn async_assertions() -> Result<Vec<Assertion>, ConfigError> {
    deferred::assertions()
}

/// The whole catalog, synchronous relations first.
pub fn all() -> Result<Vec<Assertion>, ConfigError> {
    let mut assertions = sync_assertions()?;
    assertions.extend(async_assertions()?);
    Ok(assertions)
}
