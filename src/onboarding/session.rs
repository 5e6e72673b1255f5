//! In-memory state of one onboarding wizard.
//!
//! A session lives as long as the operator stays in the wizard. It is
//! never persisted: an interrupted onboarding starts again from step 1 and
//! receives a new employee id.

use std::collections::BTreeSet;

use tracing::warn;

use super::cache::StepResultCache;
use super::manifest::DocumentManifest;
use super::model::StepPayload;
use super::step::OnboardingStep;
use crate::api::CorrelationId;

/// Holds the employee id issued by the personal info step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrelationCarrier {
    id: Option<CorrelationId>,
}

impl CorrelationCarrier {
    pub fn get(&self) -> Option<&CorrelationId> {
        self.id.as_ref()
    }

    /// Store the id on first success. A later response naming a different
    /// employee is ignored; the first id stays authoritative.
    pub fn set_once(&mut self, id: CorrelationId) {
        if let Some(existing) = &self.id {
            if *existing != id {
                warn!(
                    employee_id = %existing,
                    returned_id = %id,
                    "Personal info resubmission returned a different employee id; keeping the original"
                );
            }
            return;
        }
        self.id = Some(id);
    }
}

/// State of one onboarding wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingSession {
    pub correlation: CorrelationCarrier,
    /// Furthest step the operator may open.
    pub current_step: OnboardingStep,
    /// Step whose form is on screen.
    pub active_step: OnboardingStep,
    pub completed_steps: BTreeSet<OnboardingStep>,
    pub cache: StepResultCache,
    pub manifest: DocumentManifest,
    /// Step submission in flight, if any.
    pub submitting: Option<OnboardingStep>,
    pub finished: bool,
}

impl OnboardingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a successful step submission.
    pub fn record_success(&mut self, payload: StepPayload) {
        let step = payload.step();
        self.cache.set(payload);
        self.completed_steps.insert(step);
        if let Some(next) = step.next() {
            if next > self.current_step {
                self.current_step = next;
            }
            self.active_step = next;
        }
    }

    /// Move the on-screen form. Only steps up to the furthest one are open.
    pub fn navigate(&mut self, target: OnboardingStep) -> bool {
        if target > self.current_step {
            return false;
        }
        self.active_step = target;
        true
    }

    /// Mark the documents step done and end the session.
    pub fn finish(&mut self) {
        self.completed_steps.insert(OnboardingStep::Documents);
        self.active_step = OnboardingStep::Documents;
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::fixtures;

    #[test]
    fn carrier_is_write_once() {
        let mut carrier = CorrelationCarrier::default();
        assert!(carrier.get().is_none());
        carrier.set_once(CorrelationId("emp-1".into()));
        carrier.set_once(CorrelationId("emp-2".into()));
        assert_eq!(carrier.get(), Some(&CorrelationId("emp-1".into())));
    }

    #[test]
    fn success_advances_furthest_step_only_forward() {
        let mut s = OnboardingSession::new();
        s.record_success(StepPayload::Personal(fixtures::personal("Asha")));
        s.record_success(StepPayload::JobDetails(fixtures::job()));
        assert_eq!(s.current_step, OnboardingStep::Contact);

        assert!(s.navigate(OnboardingStep::Personal));
        s.record_success(StepPayload::Personal(fixtures::personal("Asha Updated")));
        assert_eq!(s.current_step, OnboardingStep::Contact);
        assert_eq!(s.active_step, OnboardingStep::JobDetails);
        assert_eq!(s.completed_steps.len(), 2);
    }

    #[test]
    fn navigate_refuses_jump_ahead() {
        let mut s = OnboardingSession::new();
        assert!(!s.navigate(OnboardingStep::Bank));
        assert_eq!(s.active_step, OnboardingStep::Personal);
    }

    #[test]
    fn bank_success_opens_documents() {
        let mut s = OnboardingSession::new();
        for payload in [
            StepPayload::Personal(fixtures::personal("Asha")),
            StepPayload::JobDetails(fixtures::job()),
            StepPayload::Contact(fixtures::contact()),
            StepPayload::Bank(fixtures::bank()),
        ] {
            s.record_success(payload);
        }
        assert_eq!(s.current_step, OnboardingStep::Documents);
        s.finish();
        assert!(s.finished);
        assert_eq!(s.completed_steps.len(), 5);
    }
}
