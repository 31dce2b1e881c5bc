use super::fixtures::*;
use crate::{check, compose, parts, AssertConfig, Assertion, Capability, Expect, Registry, Value};

#[test]
fn test_extension_keeps_inherited_relations() {
    let expect = compose(Registry::new(), Registry::new()).apply(vec![is_string()]);
    let extended = expect.extend_with(vec![is_even()]);

    assert!(check!(extended, 4, "to be even").is_ok());
    assert!(check!(extended, "x", "to be a string").is_ok());
}

#[test]
fn test_extension_never_mutates_the_original() {
    let expect = compose(Registry::new(), Registry::new()).apply(vec![is_string()]);
    let _extended = expect.extend_with(vec![is_even()]);

    assert!(check!(expect, 4, "to be even").unwrap_err().is_unknown());
    assert_eq!(expect.sync_registry().len(), 1);
}

#[test]
fn test_extension_is_recursive() {
    let first = Expect::empty().extend_with(vec![is_even()]);
    let second = first.extend_with(vec![is_number()]);
    let third = second.extend_with(vec![is_string()]);

    assert_eq!(third.sync_registry().layer_count(), 3);
    assert!(check!(third, 4, "to be even").is_ok());
    assert!(check!(third, 4, "to be a number").is_ok());
    assert!(check!(third, "x", "to be a string").is_ok());

    assert!(check!(second, "x", "to be a string").unwrap_err().is_unknown());
    assert!(check!(first, 4, "to be a number").unwrap_err().is_unknown());
}

#[test]
fn test_assertions_split_by_capability() {
    let expect = Expect::empty().extend_with(vec![is_even(), resolves(), is_string()]);
    assert_eq!(expect.sync_registry().len(), 2);
    assert_eq!(expect.async_registry().len(), 1);
    assert!(expect
        .async_registry()
        .iter()
        .all(|assertion| assertion.capability() == Capability::Async));
}

#[test]
fn test_base_keeps_priority_over_extensions() {
    let always = Assertion::new(parts!["to be even"], |_: &Value, _: &[Value]| true).unwrap();
    let expect = base().extend_with(vec![always]);
    // The base relation still answers; the new one is unreachable.
    assert!(check!(expect, 3, "to be even").is_err());
}

#[test]
fn test_config_survives_composition() {
    let expect = base().with_config(AssertConfig::compact());
    let extended = expect.extend_with(vec![]);
    assert_eq!(extended.config(), &AssertConfig::compact());

    let composed = compose(Registry::new(), Registry::new())
        .with_config(AssertConfig::verbose())
        .apply(vec![is_even()]);
    assert_eq!(composed.config(), &AssertConfig::verbose());
}
