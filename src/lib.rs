// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # fca-explore
//!
//! Attribute exploration over formal contexts: an expert confirms or refutes
//! the implications that hold in a context, until the confirmed background
//! knowledge and the context agree.
//!
//! ## Architecture
//!
//! - **Implications** (`implication`): premise/conclusion pairs and closure
//! - **Contexts** (`context`): the `Context` capability, the relative
//!   Duquenne–Guigues basis, crisp and partial reference contexts
//! - **Database** (`db`): context + confirmed base, with transactional edits
//! - **Exploration** (`exploration`): the expert-driven loop
//! - **Experts** (`expert`): scripted, context-backed and console oracles
//!
//! ## Library usage
//!
//! ```
//! use fca_explore::context::{Context, FormalContext};
//! use fca_explore::db::ExplorationDb;
//! use fca_explore::expert::ScriptedExpert;
//! use fca_explore::exploration::AttributeExploration;
//! use fca_explore::implication::{AttributeSet, name_set};
//!
//! let mut cxt = FormalContext::with_attributes(["x", "y"]).unwrap();
//! cxt.add_object_with_intent("a", name_set(["x", "y"])).unwrap();
//! cxt.add_object_with_intent("b", name_set(["y"])).unwrap();
//! cxt.add_object_with_intent("e", AttributeSet::new()).unwrap();
//!
//! let expert = ScriptedExpert::new()
//!     .with_verdict(false)
//!     .with_counterexample("c", name_set(["x"]));
//! let mut exploration = AttributeExploration::new(ExplorationDb::with_context(cxt), expert);
//! exploration.explore().unwrap();
//! assert!(exploration.is_complete());
//! ```

pub mod config;
pub mod context;
pub mod db;
pub mod document;
pub mod error;
pub mod expert;
pub mod exploration;
pub mod implication;
