//! Formal contexts: objects, attributes, and the incidence between them.
//!
//! The [`Context`] trait is the seam between the exploration core and the
//! combinatorial machinery. The core only needs structural edits, intents, and
//! the relative basis; everything else is up to the implementation.
//!
//! Two implementations ship with the crate:
//!
//! - [`FormalContext`]: crisp incidence, every entry known
//! - [`PartialContext`]: incidence with unknown entries, supports completion

pub mod basis;
pub mod formal;
pub mod partial;

pub use formal::FormalContext;
pub use partial::PartialContext;

use crate::error::ContextResult;
use crate::implication::{AttributeSet, Implication, ObjectSet};

/// Predicate restricting which premises may appear in the relative basis.
pub type PremiseFilter = Box<dyn Fn(&AttributeSet) -> bool>;

/// Capability a context must provide to be explored.
///
/// Object and attribute names are unique and kept in insertion order. The
/// attribute order drives the lectic enumeration of the basis, so the same
/// context always yields the same basis in the same order.
pub trait Context: Clone + std::fmt::Debug {
    /// Object names in insertion order.
    fn objects(&self) -> &[String];

    /// Attribute names in insertion order.
    fn attributes(&self) -> &[String];

    /// The attributes the object is known to possess.
    fn intent(&self, object: &str) -> Option<&AttributeSet>;

    /// Every object paired with its intent, in object order.
    fn intents(&self) -> Vec<(&str, &AttributeSet)> {
        self.objects()
            .iter()
            .filter_map(|name| self.intent(name).map(|intent| (name.as_str(), intent)))
            .collect()
    }

    /// The objects possessing `attribute`, or `None` if the attribute is unknown.
    fn extent(&self, attribute: &str) -> Option<ObjectSet> {
        if !self.contains_attribute(attribute) {
            return None;
        }
        Some(
            self.intents()
                .into_iter()
                .filter(|(_, intent)| intent.contains(attribute))
                .map(|(name, _)| name.to_string())
                .collect(),
        )
    }

    fn contains_object(&self, name: &str) -> bool {
        self.objects().iter().any(|o| o == name)
    }

    fn contains_attribute(&self, name: &str) -> bool {
        self.attributes().iter().any(|a| a == name)
    }

    /// Attributes whose incidence with `object` is not known yet.
    ///
    /// Crisp contexts have none.
    fn unknown(&self, _object: &str) -> Option<&AttributeSet> {
        None
    }

    /// Whether `object` respects `implication`, or still can once its
    /// unknown entries are decided. Missing objects respect everything.
    fn respects(&self, object: &str, implication: &Implication) -> bool {
        self.intent(object)
            .is_none_or(|intent| implication.is_respected(intent))
    }

    // -- structural edits --------------------------------------------------

    fn add_object_with_intent(&mut self, name: &str, intent: AttributeSet) -> ContextResult<()>;

    fn delete_object_by_name(&mut self, name: &str) -> ContextResult<()>;

    fn set_object_intent(&mut self, name: &str, intent: AttributeSet) -> ContextResult<()>;

    fn rename_object(&mut self, old: &str, new: &str) -> ContextResult<()>;

    fn add_attribute_with_extent(&mut self, name: &str, extent: ObjectSet) -> ContextResult<()>;

    fn delete_attribute_by_name(&mut self, name: &str) -> ContextResult<()>;

    fn set_attribute_extent(&mut self, name: &str, extent: ObjectSet) -> ContextResult<()>;

    fn rename_attribute(&mut self, old: &str, new: &str) -> ContextResult<()>;

    // -- derived computation -----------------------------------------------

    /// The derivation operator `A''`: attributes common to every object
    /// containing `set`. All attributes when no object contains `set`.
    fn closure(&self, set: &AttributeSet) -> AttributeSet {
        let mut common: Option<AttributeSet> = None;
        for (_, intent) in self.intents() {
            if !set.is_subset(intent) {
                continue;
            }
            common = Some(match common {
                None => intent.clone(),
                Some(acc) => acc.intersection(intent).cloned().collect(),
            });
        }
        common.unwrap_or_else(|| self.attributes().iter().cloned().collect())
    }

    /// The relative basis: implications holding in this context whose premise
    /// passes `cond`, modulo what `confirmed` already entails.
    fn attribute_implications(
        &self,
        confirmed: &[Implication],
        cond: &dyn Fn(&AttributeSet) -> bool,
    ) -> Vec<Implication> {
        basis::relative_basis(self, confirmed, cond)
    }

    // -- completion capability ---------------------------------------------

    /// Whether [`complete`](Context::complete) can change anything.
    fn supports_completion(&self) -> bool {
        false
    }

    /// Fill unknown incidence entries using `confirmed`.
    ///
    /// Returns the number of entries decided. Crisp contexts have nothing to
    /// fill in.
    fn complete(&mut self, _confirmed: &[Implication]) -> ContextResult<usize> {
        Ok(0)
    }
}
