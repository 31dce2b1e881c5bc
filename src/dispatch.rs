//! Call matching and execution.
//!
//! A call `check(subject, rest..)` is matched against a [`Registry`] in
//! priority order; the first registration whose slots all accept the
//! arguments runs. Phrase arguments may carry the `not ` prefix, which inverts
//! the relation's verdict. Validators chained with `and` are applied to the
//! original subject after the relation holds.
//!
//! When no registration matches the whole call and the arguments contain
//! `and`, the call is split into conjuncts at each `and` and every conjunct is
//! matched on its own. All conjuncts must match before any of them runs.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::assertion::{Assertion, Implementation, Outcome};
use crate::config::DiagnosticsConfig;
use crate::errors::{AssertResult, AssertionError, BoxError, ImplementationError, UnknownAssertion};
use crate::failure::Failure;
use crate::formatter::{describe_relation, inspect};
use crate::registry::Registry;
use crate::slot::{PhraseMatch, Slot, CHAIN_TOKEN};
use crate::validator::Validator;
use crate::value::Value;

/// A registration that accepted a call, with what the call bound.
struct Matched {
    assertion: Assertion,
    negated: bool,
    params: Vec<Value>,
    conjuncts: Vec<Validator>,
    /// The matched arguments after the subject, as written.
    args: Vec<Value>,
}

impl Matched {
    fn describe(&self, subject: &Value, config: &DiagnosticsConfig) -> String {
        describe_relation(subject, self.assertion.slots(), &self.args, config)
    }

    /// Name the relation in front of a validator's rejection, unless the
    /// validator already described it in the same words.
    fn attribute(
        &self,
        mut failure: Failure,
        subject: &Value,
        config: &DiagnosticsConfig,
    ) -> Failure {
        let relation = self.describe(subject, config);
        if !failure.message.is_empty() && failure.message != relation {
            failure.message = format!("{}: {}", relation, failure.message);
        }
        failure
    }

    /// Fill in what the implementation left out and stamp the registration.
    fn complete(
        &self,
        mut failure: Failure,
        subject: &Value,
        config: &DiagnosticsConfig,
    ) -> AssertionError {
        if failure.message.is_empty() {
            failure.message = self.describe(subject, config);
        }
        if failure.actual.is_none() {
            failure.actual = Some(subject.clone());
        }
        failure.assertion = Some(self.assertion.id().to_string());
        failure.with_diagnostics(*config).into()
    }
}

enum Step {
    Relation(Matched),
    Validator(Validator),
}

enum Plan {
    Whole(Matched),
    Split(Vec<Step>),
}

fn match_one(assertion: &Assertion, subject: &Value, rest: &[Value]) -> Option<Matched> {
    let slots = assertion.slots();
    if slots.len() != rest.len() + 1 {
        return None;
    }

    let mut negated = false;
    let mut params = Vec::new();
    let mut conjuncts = Vec::new();
    let args = std::iter::once(subject).chain(rest);
    for (position, (slot, arg)) in slots.iter().zip(args).enumerate() {
        let accepted = match slot {
            Slot::Subject(validator) => position == 0 && validator.accepts(arg),
            Slot::Phrase(phrase) => match phrase.match_arg(arg) {
                Some(PhraseMatch::Plain) => true,
                Some(PhraseMatch::Negated) => {
                    negated = true;
                    true
                }
                None => false,
            },
            Slot::Chain => arg.as_str() == Some(CHAIN_TOKEN),
            Slot::Param(validator) => {
                let accepted = validator.accepts(arg);
                if accepted {
                    params.push(arg.clone());
                }
                accepted
            }
            Slot::Conjunct(validator) => match arg.as_validator() {
                Some(conjunct) if validator.accepts(arg) => {
                    conjuncts.push(conjunct.clone());
                    true
                }
                _ => false,
            },
        };
        if !accepted {
            tracing::trace!(assertion = assertion.id(), position, "candidate rejected");
            return None;
        }
    }

    Some(Matched {
        assertion: assertion.clone(),
        negated,
        params,
        conjuncts,
        args: rest.to_vec(),
    })
}

fn first_match(registry: &Registry, subject: &Value, rest: &[Value]) -> Option<Matched> {
    let matched = registry
        .iter()
        .find_map(|assertion| match_one(assertion, subject, rest))?;
    tracing::trace!(
        assertion = matched.assertion.id(),
        negated = matched.negated,
        "matched assertion"
    );
    Some(matched)
}

fn is_chain_token(value: &Value) -> bool {
    value.as_str() == Some(CHAIN_TOKEN)
}

/// Split `rest` at each `and`. `None` when there is nothing to split or a
/// conjunct would be empty.
fn split_conjuncts(rest: &[Value]) -> Option<Vec<&[Value]>> {
    if !rest.iter().any(is_chain_token) {
        return None;
    }
    let segments: Vec<&[Value]> = rest.split(is_chain_token).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

fn plan(registry: &Registry, subject: &Value, rest: &[Value]) -> Option<Plan> {
    if let Some(matched) = first_match(registry, subject, rest) {
        return Some(Plan::Whole(matched));
    }

    let segments = split_conjuncts(rest)?;
    tracing::debug!(conjuncts = segments.len(), "splitting call into conjuncts");
    let mut steps = Vec::with_capacity(segments.len());
    for (index, segment) in segments.into_iter().enumerate() {
        let step = match segment {
            [Value::Validator(validator)] if index > 0 => Step::Validator(validator.clone()),
            [Value::Str(_), ..] => Step::Relation(first_match(registry, subject, segment)?),
            _ if index == 0 => Step::Relation(first_match(registry, subject, segment)?),
            _ => return None,
        };
        steps.push(step);
    }
    Some(Plan::Split(steps))
}

/// Turn an error raised by an implementation into a verdict, if it is a
/// recognized failure.
fn recognize(assertion: &Assertion, error: BoxError) -> Result<Failure, AssertionError> {
    let error = match error.downcast::<Failure>() {
        Ok(failure) => return Ok(*failure),
        Err(error) => error,
    };
    match error.downcast::<AssertionError>() {
        Ok(nested) => match *nested {
            AssertionError::Failed(failure) => Ok(*failure),
            other => Err(other),
        },
        Err(source) => Err(ImplementationError {
            assertion: assertion.id().to_string(),
            source,
        }
        .into()),
    }
}

/// The relation's verdict before negation.
fn settle(
    matched: &Matched,
    raw: Result<Outcome, BoxError>,
    subject: &Value,
    config: &DiagnosticsConfig,
) -> Result<Result<(), Failure>, AssertionError> {
    let outcome = match raw {
        Ok(outcome) => outcome,
        Err(error) => return recognize(&matched.assertion, error).map(Err),
    };
    Ok(match outcome {
        Outcome::Holds(true) => Ok(()),
        Outcome::Holds(false) => Err(Failure::unmet()),
        Outcome::Delegate(validator) => validator
            .validate_with(subject, config)
            .map_err(|failure| matched.attribute(failure, subject, config)),
        Outcome::Failed(failure) => Err(failure),
    })
}

/// Apply negation to the verdict, then the declared conjuncts.
fn conclude(
    matched: &Matched,
    subject: &Value,
    verdict: Result<(), Failure>,
    config: &DiagnosticsConfig,
) -> AssertResult {
    match (verdict, matched.negated) {
        (Ok(()), false) | (Err(_), true) => {}
        (Err(failure), false) => return Err(matched.complete(failure, subject, config)),
        (Ok(()), true) => {
            let message = format!("{}, but the assertion held", matched.describe(subject, config));
            return Err(matched.complete(Failure::new(message).negated(), subject, config));
        }
    }
    for conjunct in &matched.conjuncts {
        conjunct.validate_with(subject, config).map_err(|failure| {
            matched.complete(matched.attribute(failure, subject, config), subject, config)
        })?;
    }
    Ok(())
}

fn execute(matched: &Matched, subject: &Value, config: &DiagnosticsConfig) -> AssertResult {
    let raw = match matched.assertion.implementation() {
        Implementation::Sync(f) => f(subject, &matched.params),
        Implementation::Async(_) => {
            return Err(ImplementationError {
                assertion: matched.assertion.id().to_string(),
                source: "asynchronous assertion reached a synchronous check; use check_async".into(),
            }
            .into())
        }
    };
    let verdict = settle(matched, raw, subject, config)?;
    conclude(matched, subject, verdict, config)
}

async fn execute_async(
    matched: &Matched,
    subject: &Value,
    config: &DiagnosticsConfig,
) -> AssertResult {
    let raw = match matched.assertion.implementation() {
        Implementation::Async(f) => f(subject.clone(), matched.params.clone()).await,
        Implementation::Sync(f) => f(subject, &matched.params),
    };
    let verdict = settle(matched, raw, subject, config)?;
    conclude(matched, subject, verdict, config)
}

/// A chained validator from a split call.
fn check_conjunct(
    validator: &Validator,
    subject: &Value,
    config: &DiagnosticsConfig,
) -> AssertResult {
    validator.validate_with(subject, config).map_err(|mut failure| {
        if failure.message.is_empty() {
            failure.message = format!(
                "expected {} to satisfy {}",
                inspect(subject, config),
                validator.name()
            );
        }
        if failure.actual.is_none() {
            failure.actual = Some(subject.clone());
        }
        failure.with_diagnostics(*config).into()
    })
}

/// Match `check(subject, rest..)` against `registry` and run it.
///
/// Implementations may call back into dispatch; no lock is held while they
/// run.
pub fn dispatch(
    registry: &Registry,
    subject: &Value,
    rest: &[Value],
    config: &DiagnosticsConfig,
) -> AssertResult {
    match plan(registry, subject, rest) {
        None => Err(UnknownAssertion::new(subject.clone(), rest.to_vec(), config).into()),
        Some(Plan::Whole(matched)) => execute(&matched, subject, config),
        Some(Plan::Split(steps)) => {
            for step in &steps {
                match step {
                    Step::Relation(matched) => execute(matched, subject, config)?,
                    Step::Validator(validator) => check_conjunct(validator, subject, config)?,
                }
            }
            Ok(())
        }
    }
}

/// Asynchronous counterpart of [`dispatch`].
///
/// Matching happens before this returns; the future awaits the matched
/// implementation's deferred result. Unknown calls resolve to an error
/// without awaiting anything.
pub fn dispatch_async(
    registry: &Registry,
    subject: Value,
    rest: Vec<Value>,
    config: DiagnosticsConfig,
) -> BoxFuture<'static, AssertResult> {
    let plan = plan(registry, &subject, &rest);
    async move {
        match plan {
            None => Err(UnknownAssertion::new(subject, rest, &config).into()),
            Some(Plan::Whole(matched)) => execute_async(&matched, &subject, &config).await,
            Some(Plan::Split(steps)) => {
                for step in &steps {
                    match step {
                        Step::Relation(matched) => execute_async(matched, &subject, &config).await?,
                        Step::Validator(validator) => check_conjunct(validator, &subject, &config)?,
                    }
                }
                Ok(())
            }
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_conjuncts() {
        let rest = vec![
            Value::from("to be a number"),
            Value::from("and"),
            Value::from("to be positive"),
        ];
        let segments = split_conjuncts(&rest).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], &[Value::from("to be positive")][..]);
    }

    #[test]
    fn test_split_conjuncts_rejects_empty_segments() {
        assert!(split_conjuncts(&[Value::from("to be")]).is_none());
        assert!(split_conjuncts(&[Value::from("to be"), Value::from("and")]).is_none());
        assert!(split_conjuncts(&[Value::from("and"), Value::from("to be")]).is_none());
    }
}
