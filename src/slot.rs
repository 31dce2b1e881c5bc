//! Slot compilation.
//!
//! A parts sequence compiles into one [`Slot`] per call position. A phrase
//! in first position gets an implicit accept-anything subject slot in front
//! of it, so the slot count can exceed the part count by one.
//!
//! Compiled slots are memoized by the identity of the [`Parts`] allocation,
//! and phrase slots by the identity of the phrase literal or choice, so a
//! phrase shared by many registrations compiles once. The side tables hold
//! their keys weakly: they never keep a registration's parts alive.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::errors::ConfigError;
use crate::part::{Part, Parts};
use crate::validator::Validator;
use crate::value::Value;

/// Prefix that negates a phrase at call time.
pub const NEGATION_PREFIX: &str = "not ";

/// Token that introduces a chained conjunct.
pub const CHAIN_TOKEN: &str = "and";

/// Compiled matcher for one call position.
#[derive(Debug, Clone)]
pub enum Slot {
    /// Position 0: the subject.
    Subject(Validator),
    /// A phrase token, matched literally or with the negation prefix.
    Phrase(Arc<PhraseSlot>),
    /// The literal `"and"` introducing a conjunct.
    Chain,
    /// A parameter handed to the implementation.
    Param(Validator),
    /// A validator argument following `"and"`, applied to the subject.
    Conjunct(Validator),
}

impl Slot {
    pub fn is_phrase(&self) -> bool {
        matches!(self, Slot::Phrase(_) | Slot::Chain)
    }
}

/// Whether a phrase argument was negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseMatch {
    Plain,
    Negated,
}

/// The literal alternatives a phrase position accepts.
#[derive(Debug)]
pub struct PhraseSlot {
    alternatives: Arc<[Arc<str>]>,
}

impl PhraseSlot {
    pub fn alternatives(&self) -> &[Arc<str>] {
        &self.alternatives
    }

    /// Match a call argument against this phrase.
    pub fn match_arg(&self, arg: &Value) -> Option<PhraseMatch> {
        let token = arg.as_str()?;
        if self.contains(token) {
            return Some(PhraseMatch::Plain);
        }
        let positive = token.strip_prefix(NEGATION_PREFIX)?;
        if self.contains(positive) {
            Some(PhraseMatch::Negated)
        } else {
            None
        }
    }

    fn contains(&self, token: &str) -> bool {
        self.alternatives.iter().any(|alt| &**alt == token)
    }
}

/// Shared, immutable compiled form of a parts sequence.
pub type Slots = Arc<[Slot]>;

/// A side table keyed by allocation identity and holding its keys weakly.
///
/// A live `Weak` keeps the allocation's address reserved, so an entry whose
/// key still has strong references can only belong to that key.
struct WeakTable<K: ?Sized, V> {
    entries: HashMap<usize, (Weak<K>, V)>,
}

impl<K: ?Sized, V: Clone> WeakTable<K, V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn address(key: &Arc<K>) -> usize {
        Arc::as_ptr(key) as *const () as usize
    }

    fn get(&self, key: &Arc<K>) -> Option<V> {
        self.entries
            .get(&Self::address(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, value)| value.clone())
    }

    fn insert(&mut self, key: &Arc<K>, value: V) {
        self.entries
            .insert(Self::address(key), (Arc::downgrade(key), value));
    }

    /// Remove entries whose keys are gone, handing back their values.
    fn sweep(&mut self) -> Vec<V> {
        let dead: Vec<usize> = self
            .entries
            .iter()
            .filter(|(_, (weak, _))| weak.strong_count() == 0)
            .map(|(address, _)| *address)
            .collect();
        dead.into_iter()
            .filter_map(|address| self.entries.remove(&address))
            .map(|(_, value)| value)
            .collect()
    }
}

struct SlotCache {
    parts: WeakTable<[Part], Slots>,
    literals: WeakTable<str, Arc<PhraseSlot>>,
    choices: WeakTable<[Arc<str>], Arc<PhraseSlot>>,
}

impl SlotCache {
    /// Slots of dropped registrations; they hold validators, so the caller
    /// releases them outside the lock.
    fn sweep(&mut self) -> Vec<Slots> {
        self.literals.sweep();
        self.choices.sweep();
        self.parts.sweep()
    }

    fn literal_slot(&mut self, text: &Arc<str>) -> Arc<PhraseSlot> {
        if let Some(slot) = self.literals.get(text) {
            return slot;
        }
        // Own copies only: the cached slot must not keep the key alive.
        let slot = Arc::new(PhraseSlot {
            alternatives: vec![Arc::<str>::from(&**text)].into(),
        });
        self.literals.insert(text, slot.clone());
        slot
    }

    fn choice_slot(&mut self, alternatives: &Arc<[Arc<str>]>) -> Arc<PhraseSlot> {
        if let Some(slot) = self.choices.get(alternatives) {
            return slot;
        }
        let slot = Arc::new(PhraseSlot {
            alternatives: alternatives
                .iter()
                .map(|alt| Arc::<str>::from(&**alt))
                .collect::<Vec<_>>()
                .into(),
        });
        self.choices.insert(alternatives, slot.clone());
        slot
    }
}

static CACHE: Lazy<Mutex<SlotCache>> = Lazy::new(|| {
    Mutex::new(SlotCache {
        parts: WeakTable::new(),
        literals: WeakTable::new(),
        choices: WeakTable::new(),
    })
});

/// Compile a parts sequence into slots.
///
/// Compiling the same [`Parts`] value twice returns the same allocation.
pub fn compile(parts: &Parts) -> Result<Slots, ConfigError> {
    // Compilation never runs user code, so holding the lock throughout is safe
    // even when a dispatch is in progress further up the stack.
    let mut cache = CACHE.lock();
    if let Some(slots) = cache.parts.get(parts.shared()) {
        tracing::trace!(parts = parts.len(), "slot cache hit");
        return Ok(slots);
    }

    // Every miss sweeps out dropped registrations.
    let released = cache.sweep();
    let compiled = compile_uncached(parts.as_slice(), &mut cache);
    if let Ok(slots) = &compiled {
        tracing::debug!(parts = parts.len(), slots = slots.len(), "compiled assertion parts");
        cache.parts.insert(parts.shared(), slots.clone());
    }
    drop(cache);
    drop(released);
    compiled
}

fn compile_uncached(parts: &[Part], cache: &mut SlotCache) -> Result<Slots, ConfigError> {
    if parts.is_empty() {
        return Err(ConfigError::EmptyParts);
    }

    let mut slots = Vec::with_capacity(parts.len() + 1);
    for (index, part) in parts.iter().enumerate() {
        match part {
            Part::Literal(text) if &**text == CHAIN_TOKEN => {
                check_chain_position(parts, index)?;
                slots.push(Slot::Chain);
            }
            Part::Literal(text) => {
                check_phrase(index, text)?;
                if index == 0 {
                    slots.push(Slot::Subject(Validator::any()));
                }
                slots.push(Slot::Phrase(cache.literal_slot(text)));
            }
            Part::Choice(alternatives) => {
                if alternatives.is_empty() {
                    return Err(ConfigError::EmptyChoice { index });
                }
                for alt in alternatives.iter() {
                    if &**alt == CHAIN_TOKEN {
                        return Err(ConfigError::ReservedPhrase {
                            index,
                            phrase: alt.to_string(),
                        });
                    }
                    check_phrase(index, alt)?;
                }
                if index == 0 {
                    slots.push(Slot::Subject(Validator::any()));
                }
                slots.push(Slot::Phrase(cache.choice_slot(alternatives)));
            }
            Part::Validator(validator) => {
                let slot = if index == 0 {
                    Slot::Subject(validator.clone())
                } else if is_chain(&parts[index - 1]) {
                    Slot::Conjunct(validator.clone())
                } else {
                    Slot::Param(validator.clone())
                };
                slots.push(slot);
            }
        }
    }
    Ok(slots.into())
}

fn is_chain(part: &Part) -> bool {
    matches!(part, Part::Literal(text) if &**text == CHAIN_TOKEN)
}

fn check_phrase(index: usize, phrase: &str) -> Result<(), ConfigError> {
    if phrase.trim().is_empty() {
        return Err(ConfigError::EmptyPhrase { index });
    }
    if phrase.starts_with(NEGATION_PREFIX) {
        return Err(ConfigError::NegatedPhrase {
            index,
            phrase: phrase.to_string(),
        });
    }
    Ok(())
}

fn check_chain_position(parts: &[Part], index: usize) -> Result<(), ConfigError> {
    if index == 0 {
        return Err(ConfigError::MisplacedConjunction {
            index,
            reason: "cannot start an assertion",
        });
    }
    match parts.get(index + 1) {
        Some(Part::Validator(_)) => Ok(()),
        Some(_) => Err(ConfigError::MisplacedConjunction {
            index,
            reason: "must be followed by a validator",
        }),
        None => Err(ConfigError::MisplacedConjunction {
            index,
            reason: "cannot end an assertion",
        }),
    }
}
