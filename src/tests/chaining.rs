//! Conjunct chaining, declared and split.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::fixtures::*;
use crate::{check, parts, validators, Assertion, Validator, Value};

#[test]
fn test_split_chain_applies_validator_to_subject() {
    let expect = base();
    assert!(check!(expect, 42, "to be a number", "and", above_ten()).is_ok());

    let err = check!(expect, 5, "to be a number", "and", above_ten()).unwrap_err();
    let failure = err.failure().expect("a recognized failure");
    assert_eq!(failure.message, "expected 5 to satisfy above ten");
    assert_eq!(failure.actual, Some(Value::Int(5)));
}

#[test]
fn test_declared_chain() {
    let expect = base();
    assert!(check!(expect, 42, "to be positive", "and", above_ten()).is_ok());

    let err = check!(expect, 5, "to be positive", "and", above_ten()).unwrap_err();
    let failure = err.failure().expect("a recognized failure");
    assert_eq!(
        failure.message,
        "expected 5 to be positive and <validator above ten>: expected 5 to satisfy above ten"
    );
    assert_eq!(failure.assertion.as_deref(), Some("to-be-positive"));

    let err = check!(expect, -1, "to be positive", "and", above_ten()).unwrap_err();
    assert_eq!(
        err.failure().map(|f| f.message.as_str()),
        Some("expected -1 to be positive and <validator above ten>")
    );
}

#[test]
fn test_negation_applies_to_the_relation_not_the_conjunct() {
    let expect = base();
    let negative = Validator::predicate("negative", |v| v.as_f64().map_or(false, |n| n < 0.0));
    assert!(check!(expect, -4, "not to be positive", "and", negative.clone()).is_ok());
    assert!(check!(expect, 4, "not to be positive", "and", negative.clone()).is_err());
    assert!(check!(expect, -4, "not to be positive", "and", above_ten()).is_err());
}

#[test]
fn test_chain_conjunction_law() {
    let expect = base();
    let relations: Vec<Vec<Value>> = vec![
        vec!["to be even".into()],
        vec!["to be a number".into()],
        vec!["to be greater than".into(), 0.into()],
    ];
    let conjuncts = vec![above_ten(), validators::integer(), validators::string()];
    let subjects: Vec<Value> = vec![4.into(), 42.into(), 43.into(), (-12).into(), 12.5.into()];

    for subject in &subjects {
        for relation in &relations {
            for validator in &conjuncts {
                let mut chained = relation.clone();
                chained.push("and".into());
                chained.push(validator.clone().into());

                let relation_holds = expect.check(subject.clone(), relation.clone()).is_ok();
                let accepted = validator.accepts(subject);
                let chain_holds = expect.check(subject.clone(), chained.clone()).is_ok();
                assert_eq!(
                    chain_holds,
                    relation_holds && accepted,
                    "check({:?}, {:?})",
                    subject,
                    chained
                );
            }
        }
    }
}

#[test]
fn test_chains_repeat() {
    let expect = base();
    assert!(check!(
        expect,
        42,
        "to be a number",
        "and",
        "to be even",
        "and",
        above_ten(),
        "and",
        "to be greater than",
        40
    )
    .is_ok());

    let err = check!(expect, 43, "to be a number", "and", "to be even", "and", above_ten())
        .unwrap_err();
    assert_eq!(
        err.failure().map(|f| f.message.as_str()),
        Some("expected 43 to be even")
    );
}

#[test]
fn test_negated_segments() {
    let expect = base();
    assert!(check!(expect, 43, "to be a number", "and", "not to be even").is_ok());
    assert!(check!(expect, 42, "to be a number", "and", "not to be even").is_err());
}

fn counting(calls: Arc<AtomicUsize>) -> Assertion {
    Assertion::new(parts!["to be counted"], move |_: &Value, _: &[Value]| {
        calls.fetch_add(1, Ordering::SeqCst);
        true
    })
    .unwrap()
}

#[test]
fn test_every_segment_must_match_before_any_runs() {
    let calls = Arc::new(AtomicUsize::new(0));
    let expect = base().extend_with(vec![counting(calls.clone())]);

    let err = check!(expect, 1, "to be counted", "and", "to fly").unwrap_err();
    assert!(err.is_unknown());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    match err {
        crate::AssertionError::Unknown(unknown) => assert_eq!(
            unknown.args,
            vec![Value::from("to be counted"), Value::from("and"), Value::from("to fly")]
        ),
        other => panic!("expected an unknown assertion, got {:?}", other),
    }
}

#[test]
fn test_segments_short_circuit() {
    let calls = Arc::new(AtomicUsize::new(0));
    let expect = base().extend_with(vec![counting(calls.clone())]);

    assert!(check!(expect, 3, "to be even", "and", "to be counted").is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(check!(expect, 4, "to be even", "and", "to be counted").is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_malformed_chains_are_unknown() {
    let expect = base();
    assert!(check!(expect, 4, "to be even", "and").unwrap_err().is_unknown());
    assert!(check!(expect, 4, "to be even", "and", "and", above_ten())
        .unwrap_err()
        .is_unknown());
    // A trailing non-validator, non-phrase conjunct.
    assert!(check!(expect, 4, "to be even", "and", 7).unwrap_err().is_unknown());
}
