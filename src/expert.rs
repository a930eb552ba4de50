//! The expert (oracle) consulted during exploration.
//!
//! An expert judges open implications and, when rejecting one, supplies
//! counterexamples. Counterexamples always come as an ordered list, even when
//! there is only one.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::error::ExpertError;
use crate::implication::{AttributeSet, Implication};

/// A new object refuting an implication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterexample {
    pub name: String,
    pub intent: AttributeSet,
}

impl Counterexample {
    pub fn new(name: impl Into<String>, intent: AttributeSet) -> Self {
        Self {
            name: name.into(),
            intent,
        }
    }
}

impl From<Counterexample> for (String, AttributeSet) {
    fn from(example: Counterexample) -> Self {
        (example.name, example.intent)
    }
}

/// Decision-maker for open implications.
pub trait Expert {
    /// Whether `implication` holds in the domain.
    fn is_valid(&mut self, implication: &Implication) -> Result<bool, ExpertError>;

    /// Objects refuting `implication`. The first one is checked against it.
    fn provide_counterexample(
        &mut self,
        implication: &Implication,
    ) -> Result<Vec<Counterexample>, ExpertError>;
}

// ---------------------------------------------------------------------------
// Scripted expert
// ---------------------------------------------------------------------------

/// Expert replaying prepared answers in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExpert {
    verdicts: VecDeque<bool>,
    counterexamples: VecDeque<Vec<Counterexample>>,
}

impl ScriptedExpert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a verdict for the next `is_valid` call.
    pub fn with_verdict(mut self, valid: bool) -> Self {
        self.verdicts.push_back(valid);
        self
    }

    /// Queue the answer for the next `provide_counterexample` call.
    pub fn with_counterexamples(mut self, examples: Vec<Counterexample>) -> Self {
        self.counterexamples.push_back(examples);
        self
    }

    /// Queue a single counterexample.
    pub fn with_counterexample(self, name: &str, intent: AttributeSet) -> Self {
        self.with_counterexamples(vec![Counterexample::new(name, intent)])
    }
}

impl Expert for ScriptedExpert {
    fn is_valid(&mut self, implication: &Implication) -> Result<bool, ExpertError> {
        self.verdicts.pop_front().ok_or_else(|| ExpertError::Exhausted {
            implication: implication.to_string(),
        })
    }

    fn provide_counterexample(
        &mut self,
        implication: &Implication,
    ) -> Result<Vec<Counterexample>, ExpertError> {
        self.counterexamples
            .pop_front()
            .ok_or_else(|| ExpertError::Exhausted {
                implication: implication.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Context-backed expert
// ---------------------------------------------------------------------------

/// Expert answering from a context describing the whole domain.
///
/// An implication is valid iff every object of the domain respects it. When
/// rejecting, the expert offers the first refuting object, or every refuting
/// object in batch mode.
#[derive(Debug, Clone)]
pub struct ContextExpert<C: Context> {
    domain: C,
    batch: bool,
}

impl<C: Context> ContextExpert<C> {
    pub fn new(domain: C) -> Self {
        Self {
            domain,
            batch: false,
        }
    }

    /// Offer every refuting object instead of only the first.
    pub fn batched(mut self) -> Self {
        self.batch = true;
        self
    }

    fn refuting(&self, implication: &Implication) -> Vec<Counterexample> {
        self.domain
            .intents()
            .into_iter()
            .filter(|(_, intent)| !implication.is_respected(intent))
            .map(|(name, intent)| Counterexample::new(name, intent.clone()))
            .collect()
    }
}

impl<C: Context> Expert for ContextExpert<C> {
    fn is_valid(&mut self, implication: &Implication) -> Result<bool, ExpertError> {
        Ok(self.refuting(implication).is_empty())
    }

    fn provide_counterexample(
        &mut self,
        implication: &Implication,
    ) -> Result<Vec<Counterexample>, ExpertError> {
        let mut refuting = self.refuting(implication);
        if !self.batch {
            refuting.truncate(1);
        }
        Ok(refuting)
    }
}

// ---------------------------------------------------------------------------
// Console expert
// ---------------------------------------------------------------------------

/// Line-oriented expert reading answers from `input` and prompting on `output`.
///
/// Verdicts are `y`/`yes` or `n`/`no`. Counterexamples are one per line as
/// `name: attr, attr`; a blank line or end of input finishes the batch.
#[derive(Debug)]
pub struct ConsoleExpert<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleExpert<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn prompt(&mut self, text: &str) -> Result<(), ExpertError> {
        write!(self.output, "{text}").map_err(|source| ExpertError::Io { source })?;
        self.output
            .flush()
            .map_err(|source| ExpertError::Io { source })
    }

    /// Next line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, ExpertError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|source| ExpertError::Io { source })?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Parse `name: attr, attr` into a counterexample.
pub fn parse_counterexample(line: &str) -> Result<Counterexample, ExpertError> {
    let malformed = || ExpertError::Malformed { line: line.into() };
    let (name, attributes) = line.split_once(':').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }
    let intent = attributes
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();
    Ok(Counterexample::new(name, intent))
}

impl<R: BufRead, W: Write> Expert for ConsoleExpert<R, W> {
    fn is_valid(&mut self, implication: &Implication) -> Result<bool, ExpertError> {
        self.prompt(&format!("Is {implication} valid? [y/n] "))?;
        let Some(answer) = self.read_line()? else {
            return Err(ExpertError::Exhausted {
                implication: implication.to_string(),
            });
        };
        match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            _ => Err(ExpertError::Malformed { line: answer }),
        }
    }

    fn provide_counterexample(
        &mut self,
        implication: &Implication,
    ) -> Result<Vec<Counterexample>, ExpertError> {
        self.prompt(&format!(
            "Counterexample(s) to {implication}, one per line as `name: attr, attr` \
             (blank line to finish):\n"
        ))?;
        let mut examples = Vec::new();
        loop {
            match self.read_line()? {
                None if examples.is_empty() => {
                    return Err(ExpertError::Exhausted {
                        implication: implication.to_string(),
                    });
                }
                None => break,
                Some(line) if line.is_empty() => break,
                Some(line) => examples.push(parse_counterexample(&line)?),
            }
        }
        Ok(examples)
    }
}
