//! Crisp formal context: every incidence entry is known.

use crate::error::{ContextError, ContextResult};
use crate::implication::{AttributeSet, ObjectSet};

use super::Context;

/// A formal context stored row-wise: one intent per object.
///
/// Objects and attributes keep insertion order. Intents only ever mention
/// attributes that exist in the context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormalContext {
    objects: Vec<String>,
    attributes: Vec<String>,
    /// `intents[i]` belongs to `objects[i]`.
    intents: Vec<AttributeSet>,
}

impl FormalContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with the given attributes and no objects.
    pub fn with_attributes<I, S>(attributes: I) -> ContextResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cxt = Self::new();
        for attribute in attributes {
            let name: String = attribute.into();
            cxt.add_attribute_with_extent(&name, ObjectSet::new())?;
        }
        Ok(cxt)
    }

    /// Number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    fn object_index(&self, name: &str) -> ContextResult<usize> {
        self.objects
            .iter()
            .position(|o| o == name)
            .ok_or_else(|| ContextError::UnknownObject { name: name.into() })
    }

    fn attribute_index(&self, name: &str) -> ContextResult<usize> {
        self.attributes
            .iter()
            .position(|a| a == name)
            .ok_or_else(|| ContextError::UnknownAttribute { name: name.into() })
    }

    fn check_intent(&self, intent: &AttributeSet) -> ContextResult<()> {
        match intent.iter().find(|a| !self.contains_attribute(a)) {
            Some(name) => Err(ContextError::UnknownAttribute { name: name.clone() }),
            None => Ok(()),
        }
    }

    fn check_extent(&self, extent: &ObjectSet) -> ContextResult<()> {
        match extent.iter().find(|o| !self.contains_object(o)) {
            Some(name) => Err(ContextError::UnknownObject { name: name.clone() }),
            None => Ok(()),
        }
    }
}

impl Context for FormalContext {
    fn objects(&self) -> &[String] {
        &self.objects
    }

    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn intent(&self, object: &str) -> Option<&AttributeSet> {
        let i = self.objects.iter().position(|o| o == object)?;
        self.intents.get(i)
    }

    fn add_object_with_intent(&mut self, name: &str, intent: AttributeSet) -> ContextResult<()> {
        if self.contains_object(name) {
            return Err(ContextError::DuplicateObject { name: name.into() });
        }
        self.check_intent(&intent)?;
        self.objects.push(name.to_string());
        self.intents.push(intent);
        Ok(())
    }

    fn delete_object_by_name(&mut self, name: &str) -> ContextResult<()> {
        let i = self.object_index(name)?;
        self.objects.remove(i);
        self.intents.remove(i);
        Ok(())
    }

    fn set_object_intent(&mut self, name: &str, intent: AttributeSet) -> ContextResult<()> {
        let i = self.object_index(name)?;
        self.check_intent(&intent)?;
        self.intents[i] = intent;
        Ok(())
    }

    fn rename_object(&mut self, old: &str, new: &str) -> ContextResult<()> {
        let i = self.object_index(old)?;
        if old != new && self.contains_object(new) {
            return Err(ContextError::DuplicateObject { name: new.into() });
        }
        self.objects[i] = new.to_string();
        Ok(())
    }

    fn add_attribute_with_extent(&mut self, name: &str, extent: ObjectSet) -> ContextResult<()> {
        if self.contains_attribute(name) {
            return Err(ContextError::DuplicateAttribute { name: name.into() });
        }
        self.check_extent(&extent)?;
        self.attributes.push(name.to_string());
        for (object, intent) in self.objects.iter().zip(self.intents.iter_mut()) {
            if extent.contains(object) {
                intent.insert(name.to_string());
            }
        }
        Ok(())
    }

    fn delete_attribute_by_name(&mut self, name: &str) -> ContextResult<()> {
        let i = self.attribute_index(name)?;
        self.attributes.remove(i);
        for intent in &mut self.intents {
            intent.remove(name);
        }
        Ok(())
    }

    fn set_attribute_extent(&mut self, name: &str, extent: ObjectSet) -> ContextResult<()> {
        self.attribute_index(name)?;
        self.check_extent(&extent)?;
        for (object, intent) in self.objects.iter().zip(self.intents.iter_mut()) {
            if extent.contains(object) {
                intent.insert(name.to_string());
            } else {
                intent.remove(name);
            }
        }
        Ok(())
    }

    fn rename_attribute(&mut self, old: &str, new: &str) -> ContextResult<()> {
        let i = self.attribute_index(old)?;
        if old == new {
            return Ok(());
        }
        if self.contains_attribute(new) {
            return Err(ContextError::DuplicateAttribute { name: new.into() });
        }
        self.attributes[i] = new.to_string();
        for intent in &mut self.intents {
            if intent.remove(old) {
                intent.insert(new.to_string());
            }
        }
        Ok(())
    }
}
