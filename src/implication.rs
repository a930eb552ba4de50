//! Attribute implications and closure under implication sets.
//!
//! An implication `P -> Q` states that every object possessing all attributes
//! of the premise `P` also possesses all attributes of the conclusion `Q`.
//! Implications are immutable value objects: equality is structural, which is
//! what removal from the confirmed base relies on.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An ordered set of attribute names.
pub type AttributeSet = BTreeSet<String>;

/// An ordered set of object names.
pub type ObjectSet = BTreeSet<String>;

/// Build an ordered name set from anything yielding string-like items.
pub fn name_set<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

/// An attribute implication `premise -> conclusion`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Implication {
    premise: AttributeSet,
    conclusion: AttributeSet,
}

impl Implication {
    /// Create a new implication.
    pub fn new(premise: AttributeSet, conclusion: AttributeSet) -> Self {
        Self {
            premise,
            conclusion,
        }
    }

    /// Create an implication from plain attribute names.
    pub fn from_names<P, C, S, T>(premise: P, conclusion: C) -> Self
    where
        P: IntoIterator<Item = S>,
        C: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self::new(name_set(premise), name_set(conclusion))
    }

    pub fn premise(&self) -> &AttributeSet {
        &self.premise
    }

    pub fn conclusion(&self) -> &AttributeSet {
        &self.conclusion
    }

    /// Whether `intent` respects this implication.
    ///
    /// An intent fails to respect `P -> Q` only if it contains all of `P` but
    /// not all of `Q`.
    pub fn is_respected(&self, intent: &AttributeSet) -> bool {
        !self.premise.is_subset(intent) || self.conclusion.is_subset(intent)
    }

    /// Whether the implication carries no information (`Q ⊆ P`).
    pub fn is_trivial(&self) -> bool {
        self.conclusion.is_subset(&self.premise)
    }
}

impl std::fmt::Display for Implication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_set(f, &self.premise)?;
        write!(f, " -> ")?;
        write_set(f, &self.conclusion)
    }
}

fn write_set(f: &mut std::fmt::Formatter<'_>, set: &AttributeSet) -> std::fmt::Result {
    write!(f, "{{")?;
    for (i, name) in set.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{name}")?;
    }
    write!(f, "}}")
}

/// Close `set` under `implications`.
///
/// Repeatedly fires every implication whose premise is contained in the
/// current set until nothing changes. The result is the smallest superset of
/// `set` respecting all implications.
pub fn closure<'a, I>(set: &AttributeSet, implications: I) -> AttributeSet
where
    I: IntoIterator<Item = &'a Implication>,
    I::IntoIter: Clone,
{
    let implications = implications.into_iter();
    let mut closed = set.clone();
    loop {
        let mut changed = false;
        for imp in implications.clone() {
            if imp.premise.is_subset(&closed) && !imp.conclusion.is_subset(&closed) {
                closed.extend(imp.conclusion.iter().cloned());
                changed = true;
            }
        }
        if !changed {
            return closed;
        }
    }
}

/// Whether `implication` follows from `base`.
///
/// `P -> Q` is entailed iff `Q` is contained in the closure of `P` under `base`.
pub fn entails(base: &[Implication], implication: &Implication) -> bool {
    implication
        .conclusion
        .is_subset(&closure(&implication.premise, base))
}
