//! Rich diagnostic error types for attribute exploration.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers (and the CLI) can tell exactly
//! which step of an exploration went wrong and how to recover.

use miette::Diagnostic;
use thiserror::Error;

use crate::implication::Implication;

/// Top-level error type for the crate.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum FcaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Exploration(#[from] ExplorationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Expert(#[from] ExpertError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Context errors
// ---------------------------------------------------------------------------

/// Structural errors reported by a [`Context`](crate::context::Context) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ContextError {
    #[error("unknown object: {name}")]
    #[diagnostic(
        code(fca::context::unknown_object),
        help("No object with this name exists in the context. Check the spelling or add it first.")
    )]
    UnknownObject { name: String },

    #[error("unknown attribute: {name}")]
    #[diagnostic(
        code(fca::context::unknown_attribute),
        help(
            "Intents may only mention attributes that already exist in the context. \
             Add the attribute before using it."
        )
    )]
    UnknownAttribute { name: String },

    #[error("duplicate object name: {name}")]
    #[diagnostic(
        code(fca::context::duplicate_object),
        help("Object names are unique within a context. Pick a different name.")
    )]
    DuplicateObject { name: String },

    #[error("duplicate attribute name: {name}")]
    #[diagnostic(
        code(fca::context::duplicate_attribute),
        help("Attribute names are unique within a context. Pick a different name.")
    )]
    DuplicateAttribute { name: String },
}

/// Result type for context operations.
pub type ContextResult<T> = std::result::Result<T, ContextError>;

// ---------------------------------------------------------------------------
// Exploration errors
// ---------------------------------------------------------------------------

/// The exploration error family raised by [`ExplorationDb`](crate::db::ExplorationDb)
/// and [`AttributeExploration`](crate::exploration::AttributeExploration).
#[derive(Debug, Error, Diagnostic)]
pub enum ExplorationError {
    #[error("illegal context modification: object {object} violates confirmed implication {implication}")]
    #[diagnostic(
        code(fca::exploration::illegal_modification),
        help(
            "The edit was rolled back. Every object must respect the confirmed \
             implications; either fix the intent or unconfirm {implication} first."
        )
    )]
    IllegalContextModification {
        implication: Implication,
        object: String,
    },

    #[error("object name is not unique: {name}")]
    #[diagnostic(
        code(fca::exploration::object_name),
        help("An object named \"{name}\" already exists. Nothing was changed.")
    )]
    NotUniqueObjectName { name: String },

    #[error("attribute name is not unique: {name}")]
    #[diagnostic(
        code(fca::exploration::attribute_name),
        help("An attribute named \"{name}\" already exists. Nothing was changed.")
    )]
    NotUniqueAttributeName { name: String },

    #[error("not a counterexample to {implication}")]
    #[diagnostic(
        code(fca::exploration::not_counterexample),
        help(
            "A counterexample must contain the whole premise and miss part of the \
             conclusion. The answer was discarded and no example was added."
        )
    )]
    NotCounterexample { implication: Implication },

    #[error("implication is not confirmed: {implication}")]
    #[diagnostic(
        code(fca::exploration::not_confirmed),
        help("Only implications present in the confirmed base can be unconfirmed.")
    )]
    ImplicationNotConfirmed { implication: Implication },

    #[error("exploration stopped after {limit} steps with open implications left")]
    #[diagnostic(
        code(fca::exploration::step_limit),
        help("Raise `max_steps` in the exploration config, or drive the remaining steps by hand.")
    )]
    StepLimitExceeded { limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Expert(#[from] ExpertError),
}

/// Result type for exploration operations.
pub type ExplorationResult<T> = std::result::Result<T, ExplorationError>;

// ---------------------------------------------------------------------------
// Expert errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExpertError {
    #[error("expert I/O error: {source}")]
    #[diagnostic(
        code(fca::expert::io),
        help("Reading the expert's answer failed. Check that stdin is still open.")
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("malformed answer: {line:?}")]
    #[diagnostic(
        code(fca::expert::malformed),
        help(
            "Counterexamples are written as `name: attr, attr`; verdicts as `y` or `n`."
        )
    )]
    Malformed { line: String },

    #[error("expert has no answer for {implication}")]
    #[diagnostic(
        code(fca::expert::exhausted),
        help("The expert ran out of prepared answers or its input was closed.")
    )]
    Exhausted { implication: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    #[diagnostic(
        code(fca::config::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid exploration config at {path}: {message}")]
    #[diagnostic(
        code(fca::config::parse),
        help("The config is TOML with optional keys `max_steps`, `max_premise_size` and `complete_after_update`.")
    )]
    Parse { path: String, message: String },

    #[error("invalid context document at {path}: {message}")]
    #[diagnostic(
        code(fca::config::document),
        help(
            "A context document is JSON with `attributes`, `objects` \
             (each with `name` and `intent`) and optional `background` implications."
        )
    )]
    Document { path: String, message: String },
}

/// Convenience alias for functions returning crate-level results.
pub type FcaResult<T> = std::result::Result<T, FcaError>;
