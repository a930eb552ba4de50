//! JSON documents describing a context and its background knowledge.
//!
//! ```json
//! {
//!   "attributes": ["x", "y"],
//!   "objects": [{"name": "a", "intent": ["x", "y"], "unknown": []}],
//!   "background": [{"premise": ["x"], "conclusion": ["y"]}]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::{Context, FormalContext, PartialContext};
use crate::error::{ConfigError, ContextResult};
use crate::implication::{AttributeSet, Implication, ObjectSet};

/// One object row of a context document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRow {
    pub name: String,
    #[serde(default)]
    pub intent: AttributeSet,
    /// Undecided attributes; only meaningful for partial contexts.
    #[serde(default, skip_serializing_if = "AttributeSet::is_empty")]
    pub unknown: AttributeSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDocument {
    pub attributes: Vec<String>,
    #[serde(default)]
    pub objects: Vec<ObjectRow>,
    /// Confirmed implications.
    #[serde(default)]
    pub background: Vec<Implication>,
}

impl ContextDocument {
    /// Capture `context` and `background` as a document.
    pub fn from_context<C: Context>(context: &C, background: &[Implication]) -> Self {
        let objects = context
            .intents()
            .into_iter()
            .map(|(name, intent)| ObjectRow {
                name: name.to_string(),
                intent: intent.clone(),
                unknown: context.unknown(name).cloned().unwrap_or_default(),
            })
            .collect();
        Self {
            attributes: context.attributes().to_vec(),
            objects,
            background: background.to_vec(),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Document {
            path: "<inline>".into(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Document {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Document {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Build a crisp context. Unknown entries are treated as absent.
    pub fn to_formal(&self) -> ContextResult<FormalContext> {
        let mut cxt = FormalContext::with_attributes(self.attributes.iter().cloned())?;
        for row in &self.objects {
            cxt.add_object_with_intent(&row.name, row.intent.clone())?;
        }
        Ok(cxt)
    }

    /// Build a partial context keeping unknown entries undecided.
    pub fn to_partial(&self) -> ContextResult<PartialContext> {
        let mut cxt = PartialContext::with_attributes(self.attributes.iter().cloned())?;
        for row in &self.objects {
            cxt.add_object_with_partial_intent(&row.name, row.intent.clone(), row.unknown.clone())?;
        }
        Ok(cxt)
    }

    /// The extent of `attribute` as recorded in the document.
    pub fn extent(&self, attribute: &str) -> ObjectSet {
        self.objects
            .iter()
            .filter(|row| row.intent.contains(attribute))
            .map(|row| row.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;
    use crate::implication::name_set;

    const SAMPLE: &str = r#"{
        "attributes": ["x", "y", "z"],
        "objects": [
            {"name": "a", "intent": ["x", "y"]},
            {"name": "b", "intent": ["y"], "unknown": ["z"]}
        ],
        "background": [{"premise": ["x"], "conclusion": ["y"]}]
    }"#;

    #[test]
    fn parses_document() {
        let doc = ContextDocument::from_json_str(SAMPLE).unwrap();
        assert_eq!(doc.attributes, vec!["x", "y", "z"]);
        assert_eq!(doc.objects.len(), 2);
        assert_eq!(doc.background, vec![Implication::from_names(["x"], ["y"])]);
        assert_eq!(doc.extent("y"), name_set(["a", "b"]));
    }

    #[test]
    fn builds_formal_and_partial_contexts() {
        let doc = ContextDocument::from_json_str(SAMPLE).unwrap();

        let formal = doc.to_formal().unwrap();
        assert_eq!(formal.intent("b"), Some(&name_set(["y"])));
        assert_eq!(formal.unknown("b"), None);

        let partial = doc.to_partial().unwrap();
        assert_eq!(partial.intent("b"), Some(&name_set(["y"])));
        assert_eq!(partial.unknown("b"), Some(&name_set(["z"])));
    }

    #[test]
    fn rejects_rows_with_unknown_attributes() {
        let doc = ContextDocument::from_json_str(
            r#"{"attributes": ["x"], "objects": [{"name": "a", "intent": ["q"]}]}"#,
        )
        .unwrap();
        assert_eq!(
            doc.to_formal().unwrap_err(),
            ContextError::UnknownAttribute { name: "q".into() }
        );
    }

    #[test]
    fn malformed_json_is_a_document_error() {
        let err = ContextDocument::from_json_str("{\"objects\": 3}").unwrap_err();
        assert!(matches!(err, ConfigError::Document { .. }));
    }

    #[test]
    fn save_and_load_keep_partial_entries() {
        let doc = ContextDocument::from_json_str(SAMPLE).unwrap();
        let partial = doc.to_partial().unwrap();
        let captured = ContextDocument::from_context(&partial, &doc.background);
        assert_eq!(captured, doc);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("context.json");
        captured.save(&path).unwrap();
        let loaded = ContextDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
    }
}
