//! Attribute exploration: the expert-driven loop over open implications.
//!
//! Each open implication is either confirmed (background knowledge grows) or
//! rejected with counterexamples (the context grows). Either way the open set
//! changes, and exploration is finished once it is empty.

use crate::config::ExplorationConfig;
use crate::context::Context;
use crate::db::ExplorationDb;
use crate::error::{ExplorationError, ExplorationResult};
use crate::expert::Expert;
use crate::implication::Implication;

/// Outcome of a single expert interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Confirmed(Implication),
    Rejected {
        implication: Implication,
        examples: usize,
    },
}

/// Totals of an `explore()` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationSummary {
    pub steps: usize,
    pub confirmed: usize,
    pub rejected: usize,
    pub examples_added: usize,
}

/// An exploration session over an [`ExplorationDb`] and an [`Expert`].
#[derive(Debug)]
pub struct AttributeExploration<C: Context, E: Expert> {
    db: ExplorationDb<C>,
    expert: E,
    config: ExplorationConfig,
    steps: usize,
}

impl<C: Context, E: Expert> AttributeExploration<C, E> {
    pub fn new(db: ExplorationDb<C>, expert: E) -> Self {
        Self::with_config(db, expert, ExplorationConfig::default())
    }

    pub fn with_config(db: ExplorationDb<C>, expert: E, config: ExplorationConfig) -> Self {
        Self {
            db,
            expert,
            config,
            steps: 0,
        }
    }

    pub fn confirm_implication(&mut self, implication: Implication) -> ExplorationResult<()> {
        self.confirm_implications([implication])
    }

    /// Confirm every implication, then let the context complete itself.
    ///
    /// Either all implications are confirmed or none: if completion fails, or
    /// an object cannot respect the new base, the base is put back and the
    /// error returned.
    pub fn confirm_implications<I>(&mut self, implications: I) -> ExplorationResult<()>
    where
        I: IntoIterator<Item = Implication>,
    {
        let saved = self.db.base();
        for implication in implications {
            self.db.confirm_implication(implication);
        }
        if let Err(err) = self.complete().and_then(|()| self.check_base()) {
            self.db.restore_base(saved);
            return Err(err);
        }
        Ok(())
    }

    /// Ask the expert for counterexamples to `implication` and add them.
    ///
    /// Fails with [`ExplorationError::NotCounterexample`] without touching the
    /// database when the expert's first example respects `implication`.
    /// Returns the number of examples added.
    pub fn reject_implication(&mut self, implication: &Implication) -> ExplorationResult<usize> {
        let examples = self.expert.provide_counterexample(implication)?;
        match examples.first() {
            Some(first) if !implication.is_respected(&first.intent) => {}
            _ => {
                return Err(ExplorationError::NotCounterexample {
                    implication: implication.clone(),
                });
            }
        }
        let added = examples.len();
        self.db.add_examples(examples.into_iter().map(Into::into))?;
        self.complete()?;
        Ok(added)
    }

    pub fn unconfirm_implication(&mut self, implication: &Implication) -> ExplorationResult<()> {
        self.db.unconfirm_implication(implication)
    }

    pub fn open_implications(&self) -> Vec<Implication> {
        self.db.open_implications()
    }

    /// Whether the context is complete with respect to the confirmed base.
    pub fn is_complete(&self) -> bool {
        self.db.is_complete()
    }

    /// Put the first open implication to the expert and apply the verdict.
    ///
    /// Returns `None` once no open implication is left. Fails with
    /// [`ExplorationError::StepLimitExceeded`] when the session has already
    /// taken `max_steps` steps.
    pub fn step(&mut self) -> ExplorationResult<Option<Step>> {
        let Some(implication) = self.db.first_open_implication().cloned() else {
            return Ok(None);
        };
        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return Err(ExplorationError::StepLimitExceeded { limit });
            }
        }
        let step = if self.expert.is_valid(&implication)? {
            self.confirm_implication(implication.clone())?;
            Step::Confirmed(implication)
        } else {
            let examples = self.reject_implication(&implication)?;
            Step::Rejected {
                implication,
                examples,
            }
        };
        self.steps += 1;
        Ok(Some(step))
    }

    /// Steps completed so far in this session.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Step until no open implication is left.
    ///
    /// Errors are returned as they happen; nothing is retried.
    pub fn explore(&mut self) -> ExplorationResult<ExplorationSummary> {
        tracing::info!(
            objects = self.db.objects().len(),
            attributes = self.db.attributes().len(),
            open = self.db.open_implications().len(),
            "starting attribute exploration"
        );
        let mut summary = ExplorationSummary::default();
        loop {
            match self.step()? {
                Some(Step::Confirmed(_)) => summary.confirmed += 1,
                Some(Step::Rejected { examples, .. }) => {
                    summary.rejected += 1;
                    summary.examples_added += examples;
                }
                None => break,
            }
            summary.steps += 1;
        }
        tracing::info!(
            steps = summary.steps,
            confirmed = summary.confirmed,
            rejected = summary.rejected,
            examples = summary.examples_added,
            "attribute exploration finished"
        );
        Ok(summary)
    }

    pub fn db(&self) -> &ExplorationDb<C> {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut ExplorationDb<C> {
        &mut self.db
    }

    pub fn expert_mut(&mut self) -> &mut E {
        &mut self.expert
    }

    pub fn into_db(self) -> ExplorationDb<C> {
        self.db
    }

    fn check_base(&self) -> ExplorationResult<()> {
        match self.db.first_violation() {
            Some((implication, object)) => Err(ExplorationError::IllegalContextModification {
                implication,
                object,
            }),
            None => Ok(()),
        }
    }

    fn complete(&mut self) -> ExplorationResult<()> {
        if self.config.complete_after_update {
            self.db.complete()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FormalContext, PartialContext};
    use crate::expert::{ContextExpert, Counterexample, ScriptedExpert};
    use crate::implication::{AttributeSet, name_set};

    fn sample_context() -> FormalContext {
        let mut cxt = FormalContext::with_attributes(["x", "y"]).unwrap();
        cxt.add_object_with_intent("a", name_set(["x", "y"])).unwrap();
        cxt.add_object_with_intent("b", name_set(["y"])).unwrap();
        cxt.add_object_with_intent("e", AttributeSet::new()).unwrap();
        cxt
    }

    fn x_implies_y() -> Implication {
        Implication::from_names(["x"], ["y"])
    }

    fn session(expert: ScriptedExpert) -> AttributeExploration<FormalContext, ScriptedExpert> {
        AttributeExploration::new(ExplorationDb::with_context(sample_context()), expert)
    }

    #[test]
    fn reject_with_counterexample_adds_object() {
        let mut exploration =
            session(ScriptedExpert::new().with_counterexample("c", name_set(["x"])));
        assert_eq!(exploration.open_implications(), vec![x_implies_y()]);

        let added = exploration.reject_implication(&x_implies_y()).unwrap();
        assert_eq!(added, 1);
        assert!(exploration.db().context().contains_object("c"));
        assert!(exploration.is_complete());
    }

    #[test]
    fn reject_with_non_counterexample_fails_untouched() {
        let mut exploration =
            session(ScriptedExpert::new().with_counterexample("c", name_set(["x", "y"])));
        let before = exploration.db().context().clone();

        let err = exploration.reject_implication(&x_implies_y()).unwrap_err();
        assert!(matches!(err, ExplorationError::NotCounterexample { .. }));
        assert_eq!(exploration.db().context(), &before);
        assert!(exploration.db().base().is_empty());
        assert_eq!(exploration.open_implications(), vec![x_implies_y()]);
    }

    #[test]
    fn reject_with_empty_answer_fails() {
        let mut exploration = session(ScriptedExpert::new().with_counterexamples(Vec::new()));
        let err = exploration.reject_implication(&x_implies_y()).unwrap_err();
        assert!(matches!(err, ExplorationError::NotCounterexample { .. }));
    }

    #[test]
    fn only_first_counterexample_is_checked() {
        let mut exploration = session(ScriptedExpert::new().with_counterexamples(vec![
            Counterexample::new("c", name_set(["x"])),
            Counterexample::new("d", name_set(["x", "y"])),
        ]));
        assert_eq!(exploration.reject_implication(&x_implies_y()).unwrap(), 2);
        assert_eq!(exploration.db().objects(), ["a", "b", "e", "c", "d"]);
    }

    #[test]
    fn confirm_and_unconfirm() {
        let mut exploration = session(ScriptedExpert::new());
        exploration.confirm_implication(x_implies_y()).unwrap();
        assert!(exploration.is_complete());
        assert_eq!(exploration.db().base(), vec![x_implies_y()]);

        exploration.unconfirm_implication(&x_implies_y()).unwrap();
        assert!(exploration.db().base().is_empty());
        assert_eq!(exploration.open_implications(), vec![x_implies_y()]);
    }

    #[test]
    fn step_applies_verdicts() {
        let mut exploration = session(
            ScriptedExpert::new()
                .with_verdict(false)
                .with_counterexample("c", name_set(["x"])),
        );
        let step = exploration.step().unwrap();
        assert_eq!(
            step,
            Some(Step::Rejected {
                implication: x_implies_y(),
                examples: 1,
            })
        );
        assert_eq!(exploration.step().unwrap(), None);
    }

    #[test]
    fn explore_against_domain_reaches_completion() {
        let mut domain = sample_context();
        domain.add_object_with_intent("c", name_set(["x"])).unwrap();

        let mut start = FormalContext::with_attributes(["x", "y"]).unwrap();
        start.add_object_with_intent("a", name_set(["x", "y"])).unwrap();

        let db = ExplorationDb::with_context(start);
        let mut exploration = AttributeExploration::new(db, ContextExpert::new(domain.clone()));
        let summary = exploration.explore().unwrap();

        assert!(exploration.is_complete());
        assert_eq!(summary.steps, summary.confirmed + summary.rejected);
        assert!(summary.rejected >= 1);
        // Every confirmed implication is true in the domain.
        for imp in exploration.db().base() {
            for (_, intent) in domain.intents() {
                assert!(imp.is_respected(intent));
            }
        }
    }

    #[test]
    fn explore_respects_step_limit() {
        let config = ExplorationConfig {
            max_steps: Some(0),
            ..Default::default()
        };
        let mut exploration = AttributeExploration::with_config(
            ExplorationDb::with_context(sample_context()),
            ScriptedExpert::new(),
            config,
        );
        let err = exploration.explore().unwrap_err();
        assert!(matches!(err, ExplorationError::StepLimitExceeded { limit: 0 }));
    }

    #[test]
    fn confirmation_completes_partial_context() {
        let mut cxt = PartialContext::with_attributes(["x", "y"]).unwrap();
        cxt.add_object_with_intent("a", name_set(["x", "y"])).unwrap();
        cxt.add_object_with_partial_intent("p", name_set(["x"]), name_set(["y"]))
            .unwrap();

        let db = ExplorationDb::with_context(cxt);
        let mut exploration = AttributeExploration::new(db, ScriptedExpert::new());
        exploration.confirm_implication(x_implies_y()).unwrap();

        let context = exploration.db().context();
        assert_eq!(context.intent("p"), Some(&name_set(["x", "y"])));
        assert!(context.is_fully_known());
    }

    #[test]
    fn completion_can_be_disabled() {
        let mut cxt = PartialContext::with_attributes(["x", "y"]).unwrap();
        cxt.add_object_with_partial_intent("p", name_set(["x"]), name_set(["y"]))
            .unwrap();
        let config = ExplorationConfig {
            complete_after_update: false,
            ..Default::default()
        };
        let mut exploration = AttributeExploration::with_config(
            ExplorationDb::with_context(cxt),
            ScriptedExpert::new(),
            config,
        );
        // p may still turn out to have y, so x -> y is accepted undecided.
        exploration.confirm_implication(x_implies_y()).unwrap();
        assert!(!exploration.db().context().is_fully_known());

        // Later edits are still possible.
        exploration
            .db_mut()
            .add_example("q", AttributeSet::new())
            .unwrap();
    }

    #[test]
    fn failed_completion_undoes_confirmation() {
        let mut cxt = PartialContext::with_attributes(["x", "y", "z"]).unwrap();
        cxt.add_object_with_partial_intent("p", name_set(["x"]), name_set(["y"]))
            .unwrap();
        let y_implies_z = Implication::from_names(["y"], ["z"]);
        let db = ExplorationDb::new(cxt, vec![y_implies_z.clone()], |_: &AttributeSet| true)
            .unwrap();
        let mut exploration = AttributeExploration::new(db, ScriptedExpert::new());
        let open_before = exploration.open_implications();

        // Completing y for p would break y -> z, since p lacks z.
        let err = exploration.confirm_implication(x_implies_y()).unwrap_err();
        match err {
            ExplorationError::IllegalContextModification {
                implication,
                object,
            } => {
                assert_eq!(implication, y_implies_z);
                assert_eq!(object, "p");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(exploration.db().base(), vec![y_implies_z]);
        assert_eq!(exploration.open_implications(), open_before);
        let context = exploration.db().context();
        assert_eq!(context.intent("p"), Some(&name_set(["x"])));
        assert_eq!(context.unknown("p"), Some(&name_set(["y"])));

        exploration
            .db_mut()
            .add_example("q", AttributeSet::new())
            .unwrap();
    }

    #[test]
    fn refuted_confirmation_is_undone_without_completion() {
        let mut cxt = sample_context();
        cxt.add_object_with_intent("c", name_set(["x"])).unwrap();
        let config = ExplorationConfig {
            complete_after_update: false,
            ..Default::default()
        };
        let mut exploration = AttributeExploration::with_config(
            ExplorationDb::with_context(cxt),
            ScriptedExpert::new(),
            config,
        );

        let err = exploration
            .confirm_implications([Implication::from_names(["y"], ["y"]), x_implies_y()])
            .unwrap_err();
        assert!(matches!(
            err,
            ExplorationError::IllegalContextModification { .. }
        ));
        assert!(exploration.db().base().is_empty());
        exploration
            .db_mut()
            .add_example("d", name_set(["y"]))
            .unwrap();
    }

    #[test]
    fn step_limit_counts_the_whole_session() {
        let config = ExplorationConfig {
            max_steps: Some(1),
            ..Default::default()
        };
        let mut cxt = sample_context();
        cxt.add_attribute_with_extent("z", name_set(["a"])).unwrap();
        let mut exploration = AttributeExploration::with_config(
            ExplorationDb::with_context(cxt),
            ScriptedExpert::new().with_verdict(true).with_verdict(true),
            config,
        );
        assert!(exploration.open_implications().len() > 1);

        assert!(matches!(exploration.step(), Ok(Some(Step::Confirmed(_)))));
        assert_eq!(exploration.steps(), 1);
        assert!(matches!(
            exploration.step(),
            Err(ExplorationError::StepLimitExceeded { limit: 1 })
        ));
        assert!(matches!(
            exploration.explore(),
            Err(ExplorationError::StepLimitExceeded { limit: 1 })
        ));
    }
}
