//! Step/substep state machine driving the wizard.

use std::fmt;

use tracing::{debug, info, warn};

use crate::core::rules::{Ruleset, ValidationReport};
use crate::core::transform::{canonicalize, ValidatedForm};
use crate::domain::canonical::CanonicalAgencyInfo;
use crate::domain::form::FlexibleFormState;
use crate::domain::steps::{FormPosition, StepCatalog, Subpage};
use crate::errors::Result;

/// Whether the navigator is editing, waiting on persistence, or done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigatorPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Why a `next`/`prev` call did not move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refusal {
    /// The current subpage (or, on the last subpage, the whole form) failed
    /// validation.
    Invalid(ValidationReport),
    AtStart,
    SubmissionInFlight,
    Closed,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::Invalid(report) => write!(f, "{} field(s) need attention", report.len()),
            Refusal::AtStart => f.write_str("already at the first page"),
            Refusal::SubmissionInFlight => f.write_str("a submission is in progress"),
            Refusal::Closed => f.write_str("the form has been submitted"),
        }
    }
}

/// Result of one navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Moved {
        from: FormPosition,
        to: FormPosition,
        direction: Direction,
    },
    Refused(Refusal),
    /// The last subpage was confirmed. The caller must persist the record
    /// and report back through [`FormNavigator::finish_submission`].
    Submit(Box<CanonicalAgencyInfo>),
}

impl Transition {
    pub fn is_move(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

pub struct FormNavigator {
    catalog: StepCatalog,
    rules: Ruleset,
    position: FormPosition,
    errors: ValidationReport,
    phase: NavigatorPhase,
    submission_error: Option<String>,
}

impl FormNavigator {
    /// Rejects catalogs naming fields the ruleset does not know.
    pub fn new(catalog: StepCatalog, rules: Ruleset) -> Result<Self> {
        rules.check_catalog(&catalog)?;
        Ok(Self {
            catalog,
            rules,
            position: FormPosition::START,
            errors: ValidationReport::new(),
            phase: NavigatorPhase::Editing,
            submission_error: None,
        })
    }

    pub fn standard() -> Result<Self> {
        Self::new(StepCatalog::standard(), Ruleset::standard())
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &Ruleset {
        &self.rules
    }

    pub fn position(&self) -> FormPosition {
        self.position
    }

    pub fn current_subpage(&self) -> Option<&Subpage> {
        self.catalog.subpage(self.position)
    }

    /// Errors from the last refused `next`.
    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    pub fn phase(&self) -> NavigatorPhase {
        self.phase
    }

    /// Message from the last failed submission attempt.
    pub fn submission_error(&self) -> Option<&str> {
        self.submission_error.as_deref()
    }

    pub fn is_last(&self) -> bool {
        self.position == self.catalog.last_position()
    }

    /// Validates the current subpage and moves forward. On the last subpage
    /// the whole form is validated and converted for submission instead.
    pub fn next(&mut self, state: &FlexibleFormState) -> Transition {
        if let Some(refusal) = self.busy() {
            warn!(position = ?self.position, %refusal, "next refused");
            return Transition::Refused(refusal);
        }

        let fields = self
            .current_subpage()
            .map(|subpage| subpage.fields.clone())
            .unwrap_or_default();
        let report = self.rules.validate_fields(state, fields.as_slice());
        if !report.is_valid() {
            return self.refuse_invalid(report);
        }

        if self.is_last() {
            let form = match ValidatedForm::new(state, &self.rules) {
                Ok(form) => form,
                Err(report) => return self.refuse_invalid(report),
            };
            let info = canonicalize(&form);
            self.errors = ValidationReport::new();
            self.submission_error = None;
            self.phase = NavigatorPhase::Submitting;
            info!(position = ?self.position, "submission started");
            return Transition::Submit(Box::new(info));
        }

        let from = self.position;
        let to = self.following(from);
        self.errors = ValidationReport::new();
        self.position = to;
        debug!(?from, ?to, "advanced");
        Transition::Moved {
            from,
            to,
            direction: Direction::Forward,
        }
    }

    /// Moves back one subpage without validating.
    pub fn prev(&mut self) -> Transition {
        if let Some(refusal) = self.busy() {
            warn!(position = ?self.position, %refusal, "prev refused");
            return Transition::Refused(refusal);
        }
        if self.position.is_start() {
            return Transition::Refused(Refusal::AtStart);
        }

        let from = self.position;
        let to = self.preceding(from);
        self.errors = ValidationReport::new();
        self.position = to;
        debug!(?from, ?to, "went back");
        Transition::Moved {
            from,
            to,
            direction: Direction::Backward,
        }
    }

    /// Records the persistence outcome of the pending submission. A failure
    /// returns to editing on the last subpage so the user can retry.
    pub fn finish_submission(&mut self, outcome: Result<()>) -> Result<()> {
        if self.phase != NavigatorPhase::Submitting {
            warn!(phase = ?self.phase, "submission finished while none was pending");
            return outcome;
        }
        match &outcome {
            Ok(()) => {
                self.phase = NavigatorPhase::Submitted;
                info!("submission completed");
            }
            Err(err) => {
                self.phase = NavigatorPhase::Editing;
                self.submission_error = Some(err.to_string());
                warn!(error = %err, "submission failed");
            }
        }
        outcome
    }

    fn busy(&self) -> Option<Refusal> {
        match self.phase {
            NavigatorPhase::Editing => None,
            NavigatorPhase::Submitting => Some(Refusal::SubmissionInFlight),
            NavigatorPhase::Submitted => Some(Refusal::Closed),
        }
    }

    fn refuse_invalid(&mut self, report: ValidationReport) -> Transition {
        debug!(position = ?self.position, errors = report.len(), "validation refused next");
        self.errors = report.clone();
        Transition::Refused(Refusal::Invalid(report))
    }

    fn following(&self, from: FormPosition) -> FormPosition {
        let subpages = self
            .catalog
            .step(from.step)
            .map(|step| step.subpage_count())
            .unwrap_or(0);
        if from.substep + 1 < subpages {
            FormPosition::new(from.step, from.substep + 1)
        } else {
            FormPosition::new(from.step + 1, 0)
        }
    }

    fn preceding(&self, from: FormPosition) -> FormPosition {
        if from.substep > 0 {
            return FormPosition::new(from.step, from.substep - 1);
        }
        let step = from.step - 1;
        let substep = self
            .catalog
            .step(step)
            .map(|step| step.subpage_count().saturating_sub(1))
            .unwrap_or(0);
        FormPosition::new(step, substep)
    }
}

impl fmt::Debug for FormNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormNavigator")
            .field("position", &self.position)
            .field("phase", &self.phase)
            .field("errors", &self.errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::steps::{Step, Subpage};

    fn tiny_catalog() -> StepCatalog {
        StepCatalog::new(vec![
            Step::new(
                "one",
                "One",
                vec![
                    Subpage::new("a", "A", &[]),
                    Subpage::new("b", "B", &[]),
                ],
            ),
            Step::new("two", "Two", vec![Subpage::new("c", "C", &["legal_name"])]),
        ])
        .unwrap()
    }

    fn navigator() -> FormNavigator {
        FormNavigator::new(tiny_catalog(), Ruleset::standard()).unwrap()
    }

    #[test]
    fn prev_at_start_is_refused() {
        let mut nav = navigator();
        assert_eq!(nav.prev(), Transition::Refused(Refusal::AtStart));
        assert_eq!(nav.position(), FormPosition::START);
    }

    #[test]
    fn walks_substeps_then_steps_and_back() {
        let mut nav = navigator();
        let state = FlexibleFormState::default();
        assert!(nav.next(&state).is_move());
        assert_eq!(nav.position(), FormPosition::new(0, 1));
        assert!(nav.next(&state).is_move());
        assert_eq!(nav.position(), FormPosition::new(1, 0));
        assert!(nav.prev().is_move());
        assert_eq!(nav.position(), FormPosition::new(0, 1));
    }

    #[test]
    fn invalid_subpage_blocks_next_but_not_prev() {
        let mut nav = navigator();
        let state = FlexibleFormState::default();
        nav.next(&state);
        nav.next(&state);

        let refused = nav.next(&state);
        assert!(matches!(refused, Transition::Refused(Refusal::Invalid(_))));
        assert!(nav.errors().contains("legal_name"));
        assert_eq!(nav.position(), FormPosition::new(1, 0));

        assert!(nav.prev().is_move());
        assert!(nav.errors().is_empty());
    }

    #[test]
    fn last_subpage_checks_the_whole_form() {
        let mut nav = navigator();
        let state = FlexibleFormState {
            legal_name: "Helping Hands".into(),
            ..Default::default()
        };
        nav.next(&state);
        nav.next(&state);
        match nav.next(&state) {
            Transition::Refused(Refusal::Invalid(report)) => {
                assert!(report.contains("mission"));
                assert!(!report.contains("legal_name"));
            }
            other => panic!("expected refusal, got {other:?}"),
        }
        assert_eq!(nav.phase(), NavigatorPhase::Editing);
    }

    #[test]
    fn finishing_without_a_pending_submission_passes_the_outcome_through() {
        let mut nav = navigator();
        assert!(nav.finish_submission(Ok(())).is_ok());
        assert_eq!(nav.phase(), NavigatorPhase::Editing);
    }
}
