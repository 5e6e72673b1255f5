//! Last known-good payload per step, used to re-populate revisited forms.

use std::collections::BTreeMap;

use super::model::StepPayload;
use super::step::OnboardingStep;

/// In-memory store keyed by step. Holds at most one entry per form step and
/// never evicts; it lives exactly as long as its session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResultCache {
    entries: BTreeMap<OnboardingStep, StepPayload>,
}

impl StepResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last submitted payload for `step`, or that step's blank form.
    ///
    /// Returns `None` only for the documents step, which has no form.
    pub fn get(&self, step: OnboardingStep) -> Option<StepPayload> {
        self.entries
            .get(&step)
            .cloned()
            .or_else(|| StepPayload::empty(step))
    }

    /// Overwrite the entry for the payload's step.
    pub fn set(&mut self, payload: StepPayload) {
        self.entries.insert(payload.step(), payload);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
