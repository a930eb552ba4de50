//! Partial context: incidence entries may be unknown.
//!
//! Every (object, attribute) pair is in one of three states: possessed,
//! unknown, or absent. The possessed attributes form the object's intent; the
//! basis is computed over those. Completion uses confirmed implications to
//! decide unknown entries:
//!
//! - an unknown attribute derivable from the possessed ones becomes possessed
//! - an unknown attribute that would force a known-absent one becomes absent
//!
//! An object only violates an implication once a premise it possesses leads
//! to a conclusion attribute it is known to lack.

use std::collections::BTreeMap;

use crate::error::{ContextError, ContextResult};
use crate::implication::{self, AttributeSet, Implication, ObjectSet};

use super::{Context, FormalContext};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialContext {
    /// Possessed attributes per object.
    known: FormalContext,
    /// Unknown attributes per object. Objects without unknowns have no entry.
    unknown: BTreeMap<String, AttributeSet>,
}

impl PartialContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attributes<I, S>(attributes: I) -> ContextResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            known: FormalContext::with_attributes(attributes)?,
            unknown: BTreeMap::new(),
        })
    }

    /// Add an object whose incidence with `unknown` attributes is undecided.
    ///
    /// Attributes in both sets count as possessed.
    pub fn add_object_with_partial_intent(
        &mut self,
        name: &str,
        possessed: AttributeSet,
        unknown: AttributeSet,
    ) -> ContextResult<()> {
        if let Some(missing) = unknown.iter().find(|a| !self.known.contains_attribute(a)) {
            return Err(ContextError::UnknownAttribute {
                name: missing.clone(),
            });
        }
        let unknown: AttributeSet = unknown.difference(&possessed).cloned().collect();
        self.known.add_object_with_intent(name, possessed)?;
        if !unknown.is_empty() {
            self.unknown.insert(name.to_string(), unknown);
        }
        Ok(())
    }

    /// Attributes the object certainly lacks.
    pub fn absent(&self, object: &str) -> Option<AttributeSet> {
        let possessed = self.known.intent(object)?;
        let unknown = self.unknown.get(object);
        Some(
            self.known
                .attributes()
                .iter()
                .filter(|a| !possessed.contains(*a) && !unknown.is_some_and(|u| u.contains(*a)))
                .cloned()
                .collect(),
        )
    }

    /// Whether every incidence entry is decided.
    pub fn is_fully_known(&self) -> bool {
        self.unknown.is_empty()
    }

    /// The crisp context of possessed attributes.
    pub fn known(&self) -> &FormalContext {
        &self.known
    }

    fn forget_attribute(&mut self, name: &str) {
        for unknown in self.unknown.values_mut() {
            unknown.remove(name);
        }
        self.unknown.retain(|_, unknown| !unknown.is_empty());
    }
}

impl From<FormalContext> for PartialContext {
    fn from(known: FormalContext) -> Self {
        Self {
            known,
            unknown: BTreeMap::new(),
        }
    }
}

impl Context for PartialContext {
    fn objects(&self) -> &[String] {
        self.known.objects()
    }

    fn attributes(&self) -> &[String] {
        self.known.attributes()
    }

    fn intent(&self, object: &str) -> Option<&AttributeSet> {
        self.known.intent(object)
    }

    fn unknown(&self, object: &str) -> Option<&AttributeSet> {
        self.unknown.get(object)
    }

    /// A conclusion attribute still undecided for `object` may yet hold.
    fn respects(&self, object: &str, implication: &Implication) -> bool {
        let Some(possessed) = self.known.intent(object) else {
            return true;
        };
        if !implication.premise().is_subset(possessed) {
            return true;
        }
        let unknown = self.unknown.get(object);
        implication
            .conclusion()
            .iter()
            .all(|a| possessed.contains(a) || unknown.is_some_and(|u| u.contains(a)))
    }

    fn add_object_with_intent(&mut self, name: &str, intent: AttributeSet) -> ContextResult<()> {
        self.known.add_object_with_intent(name, intent)
    }

    fn delete_object_by_name(&mut self, name: &str) -> ContextResult<()> {
        self.known.delete_object_by_name(name)?;
        self.unknown.remove(name);
        Ok(())
    }

    fn set_object_intent(&mut self, name: &str, intent: AttributeSet) -> ContextResult<()> {
        self.known.set_object_intent(name, intent)?;
        self.unknown.remove(name);
        Ok(())
    }

    fn rename_object(&mut self, old: &str, new: &str) -> ContextResult<()> {
        self.known.rename_object(old, new)?;
        if let Some(unknown) = self.unknown.remove(old) {
            self.unknown.insert(new.to_string(), unknown);
        }
        Ok(())
    }

    fn add_attribute_with_extent(&mut self, name: &str, extent: ObjectSet) -> ContextResult<()> {
        self.known.add_attribute_with_extent(name, extent)
    }

    fn delete_attribute_by_name(&mut self, name: &str) -> ContextResult<()> {
        self.known.delete_attribute_by_name(name)?;
        self.forget_attribute(name);
        Ok(())
    }

    fn set_attribute_extent(&mut self, name: &str, extent: ObjectSet) -> ContextResult<()> {
        self.known.set_attribute_extent(name, extent)?;
        self.forget_attribute(name);
        Ok(())
    }

    fn rename_attribute(&mut self, old: &str, new: &str) -> ContextResult<()> {
        self.known.rename_attribute(old, new)?;
        for unknown in self.unknown.values_mut() {
            if unknown.remove(old) {
                unknown.insert(new.to_string());
            }
        }
        Ok(())
    }

    fn supports_completion(&self) -> bool {
        true
    }

    fn complete(&mut self, confirmed: &[Implication]) -> ContextResult<usize> {
        let mut decided = 0;
        let objects: Vec<String> = self.unknown.keys().cloned().collect();

        for object in objects {
            let Some(mut unknown) = self.unknown.remove(&object) else {
                continue;
            };
            let mut possessed = self.known.intent(&object).cloned().unwrap_or_default();

            // Forward: fire implications, but only onto undecided entries.
            loop {
                let mut changed = false;
                for imp in confirmed {
                    if !imp.premise().is_subset(&possessed) {
                        continue;
                    }
                    for attribute in imp.conclusion() {
                        if unknown.remove(attribute) {
                            possessed.insert(attribute.clone());
                            decided += 1;
                            changed = true;
                        }
                    }
                }
                if !changed {
                    break;
                }
            }

            // Backward: an attribute that would force an absent one is absent.
            let absent: AttributeSet = self
                .known
                .attributes()
                .iter()
                .filter(|a| !possessed.contains(*a) && !unknown.contains(*a))
                .cloned()
                .collect();
            if implication::closure(&possessed, confirmed).is_disjoint(&absent) {
                let ruled_out: Vec<String> = unknown
                    .iter()
                    .filter(|candidate| {
                        let mut probe = possessed.clone();
                        probe.insert((*candidate).clone());
                        !implication::closure(&probe, confirmed).is_disjoint(&absent)
                    })
                    .cloned()
                    .collect();
                for attribute in ruled_out {
                    unknown.remove(&attribute);
                    decided += 1;
                }
            }

            self.known.set_object_intent(&object, possessed)?;
            if !unknown.is_empty() {
                self.unknown.insert(object, unknown);
            }
        }

        tracing::debug!(decided, remaining = self.unknown.len(), "completed partial context");
        Ok(decided)
    }
}
