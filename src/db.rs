//! Transactional knowledge base for attribute exploration.
//!
//! [`ExplorationDb`] owns a context, the confirmed implications (background
//! knowledge), a premise filter, and the cached relative basis. Every mutation
//! goes through one of two guards:
//!
//! - **context guard**: snapshot the context, apply the edit, check every
//!   confirmed implication against every intent, roll back on violation, and
//!   refresh the open implications on success
//! - **base guard**: apply the edit to the confirmed base and refresh the open
//!   implications
//!
//! The core invariant holds before and after every context edit: each object in
//! the context respects each confirmed implication, as judged by
//! [`Context::respects`]. Base edits are not checked against the context;
//! [`AttributeExploration`](crate::exploration::AttributeExploration) checks
//! its confirmations and undoes them on failure.

use std::collections::BTreeSet;

use crate::context::{Context, PremiseFilter};
use crate::error::{ExplorationError, ExplorationResult};
use crate::implication::{AttributeSet, Implication, ObjectSet};

/// Context, background knowledge, and the open implications derived from both.
pub struct ExplorationDb<C: Context> {
    context: C,
    /// Confirmed implications, in confirmation order. Duplicates allowed.
    base: Vec<Implication>,
    cond: PremiseFilter,
    /// Relative basis of `context` modulo `base`, filtered by `cond`.
    open: Vec<Implication>,
}

impl<C: Context> std::fmt::Debug for ExplorationDb<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorationDb")
            .field("context", &self.context)
            .field("base", &self.base)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl<C: Context> ExplorationDb<C> {
    /// Create a database from a context, background knowledge, and a premise
    /// filter.
    ///
    /// Fails with [`ExplorationError::IllegalContextModification`] if the
    /// context already contradicts `base`.
    pub fn new<F>(context: C, base: Vec<Implication>, cond: F) -> ExplorationResult<Self>
    where
        F: Fn(&AttributeSet) -> bool + 'static,
    {
        let mut db = Self {
            context,
            base,
            cond: Box::new(cond),
            open: Vec::new(),
        };
        if let Some((implication, object)) = db.first_violation() {
            return Err(ExplorationError::IllegalContextModification {
                implication,
                object,
            });
        }
        db.refresh_open_implications();
        tracing::debug!(
            objects = db.context.objects().len(),
            attributes = db.context.attributes().len(),
            confirmed = db.base.len(),
            open = db.open.len(),
            "exploration database created"
        );
        Ok(db)
    }

    /// Create a database with no background knowledge that surfaces every premise.
    pub fn with_context(context: C) -> Self {
        let mut db = Self {
            context,
            base: Vec::new(),
            cond: Box::new(|_: &AttributeSet| true),
            open: Vec::new(),
        };
        db.refresh_open_implications();
        db
    }

    // -- background knowledge ----------------------------------------------

    /// Accept `implication` as background knowledge.
    pub fn confirm_implication(&mut self, implication: Implication) {
        self.modify_base("confirm_implication", |base| base.push(implication));
    }

    /// Remove the first confirmed implication equal to `implication`.
    pub fn unconfirm_implication(&mut self, implication: &Implication) -> ExplorationResult<()> {
        let position = self
            .base
            .iter()
            .position(|confirmed| confirmed == implication)
            .ok_or_else(|| ExplorationError::ImplicationNotConfirmed {
                implication: implication.clone(),
            })?;
        self.modify_base("unconfirm_implication", |base| {
            base.remove(position);
        });
        Ok(())
    }

    /// Put back a confirmed base captured with [`base`](Self::base).
    pub(crate) fn restore_base(&mut self, base: Vec<Implication>) {
        self.modify_base("restore_base", |current| *current = base);
    }

    // -- objects -----------------------------------------------------------

    /// Add a new object (example) with the given intent.
    pub fn add_example(&mut self, name: &str, intent: AttributeSet) -> ExplorationResult<()> {
        if self.context.contains_object(name) {
            return Err(ExplorationError::NotUniqueObjectName { name: name.into() });
        }
        self.modify_context("add_example", |cxt| {
            cxt.add_object_with_intent(name, intent)?;
            Ok(())
        })
    }

    /// Add several objects in one transaction: either all are added or none.
    pub fn add_examples<I>(&mut self, examples: I) -> ExplorationResult<()>
    where
        I: IntoIterator<Item = (String, AttributeSet)>,
    {
        let examples: Vec<(String, AttributeSet)> = examples.into_iter().collect();
        let mut seen = BTreeSet::new();
        for (name, _) in &examples {
            if self.context.contains_object(name) || !seen.insert(name.as_str()) {
                return Err(ExplorationError::NotUniqueObjectName { name: name.clone() });
            }
        }
        self.modify_context("add_examples", |cxt| {
            for (name, intent) in examples {
                cxt.add_object_with_intent(&name, intent)?;
            }
            Ok(())
        })
    }

    /// Remove the object `name`.
    pub fn delete_example(&mut self, name: &str) -> ExplorationResult<()> {
        self.modify_context("delete_example", |cxt| {
            cxt.delete_object_by_name(name)?;
            Ok(())
        })
    }

    /// Replace the intent of `old_name`, then rename it to `name`.
    ///
    /// Renaming an object to its current name is allowed.
    pub fn edit_example(
        &mut self,
        name: &str,
        old_name: &str,
        intent: AttributeSet,
    ) -> ExplorationResult<()> {
        if name != old_name && self.context.contains_object(name) {
            return Err(ExplorationError::NotUniqueObjectName { name: name.into() });
        }
        self.modify_context("edit_example", |cxt| {
            cxt.set_object_intent(old_name, intent)?;
            cxt.rename_object(old_name, name)?;
            Ok(())
        })
    }

    // -- attributes --------------------------------------------------------

    /// Add a new attribute possessed by the objects in `extent`.
    pub fn add_attribute(&mut self, name: &str, extent: ObjectSet) -> ExplorationResult<()> {
        if self.context.contains_attribute(name) {
            return Err(ExplorationError::NotUniqueAttributeName { name: name.into() });
        }
        self.modify_context("add_attribute", |cxt| {
            cxt.add_attribute_with_extent(name, extent)?;
            Ok(())
        })
    }

    /// Remove the attribute `name` from every intent.
    pub fn delete_attribute(&mut self, name: &str) -> ExplorationResult<()> {
        self.modify_context("delete_attribute", |cxt| {
            cxt.delete_attribute_by_name(name)?;
            Ok(())
        })
    }

    /// Replace the extent of `old_name`, then rename it to `name`.
    pub fn edit_attribute(
        &mut self,
        name: &str,
        old_name: &str,
        extent: ObjectSet,
    ) -> ExplorationResult<()> {
        if name != old_name && self.context.contains_attribute(name) {
            return Err(ExplorationError::NotUniqueAttributeName { name: name.into() });
        }
        self.modify_context("edit_attribute", |cxt| {
            cxt.set_attribute_extent(old_name, extent)?;
            cxt.rename_attribute(old_name, name)?;
            Ok(())
        })
    }

    /// Let the context decide unknown entries from the confirmed base.
    ///
    /// A no-op for contexts without the completion capability. Returns the
    /// number of entries decided.
    pub fn complete(&mut self) -> ExplorationResult<usize> {
        if !self.context.supports_completion() {
            return Ok(0);
        }
        let base = self.base.clone();
        self.modify_context("complete", move |cxt| Ok(cxt.complete(&base)?))
    }

    // -- queries -----------------------------------------------------------

    /// The implications that hold but are neither confirmed nor refuted.
    pub fn open_implications(&self) -> Vec<Implication> {
        self.open.clone()
    }

    /// The lectically first open implication, if any.
    pub fn first_open_implication(&self) -> Option<&Implication> {
        self.open.first()
    }

    /// The confirmed implications, in confirmation order.
    pub fn base(&self) -> Vec<Implication> {
        self.base.clone()
    }

    pub fn objects(&self) -> &[String] {
        self.context.objects()
    }

    pub fn attributes(&self) -> &[String] {
        self.context.attributes()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Whether no open implication remains.
    pub fn is_complete(&self) -> bool {
        self.open.is_empty()
    }

    // -- guards ------------------------------------------------------------

    /// Apply a context edit atomically.
    ///
    /// On any failure, including a violated confirmed implication, the context
    /// is restored to its state before the call.
    fn modify_context<T, F>(&mut self, operation: &'static str, edit: F) -> ExplorationResult<T>
    where
        F: FnOnce(&mut C) -> ExplorationResult<T>,
    {
        let snapshot = self.context.clone();
        let output = match edit(&mut self.context) {
            Ok(output) => output,
            Err(err) => {
                self.context = snapshot;
                return Err(err);
            }
        };
        if let Some((implication, object)) = self.first_violation() {
            self.context = snapshot;
            return Err(ExplorationError::IllegalContextModification {
                implication,
                object,
            });
        }
        self.refresh_open_implications();
        tracing::debug!(
            operation,
            objects = self.context.objects().len(),
            attributes = self.context.attributes().len(),
            open = self.open.len(),
            "context edit committed"
        );
        Ok(output)
    }

    /// Apply an edit to the confirmed base and refresh the open implications.
    fn modify_base<F>(&mut self, operation: &'static str, edit: F)
    where
        F: FnOnce(&mut Vec<Implication>),
    {
        edit(&mut self.base);
        self.refresh_open_implications();
        tracing::debug!(
            operation,
            confirmed = self.base.len(),
            open = self.open.len(),
            "background knowledge updated"
        );
    }

    /// The first (confirmed implication, object) pair that disagree.
    pub(crate) fn first_violation(&self) -> Option<(Implication, String)> {
        for object in self.context.objects() {
            if let Some(implication) = self
                .base
                .iter()
                .find(|imp| !self.context.respects(object, imp))
            {
                return Some((implication.clone(), object.clone()));
            }
        }
        None
    }

    fn refresh_open_implications(&mut self) {
        self.open = self.context.attribute_implications(&self.base, &*self.cond);
    }
}
