//! Stepper display state, derived from completed steps and the furthest step.

use std::collections::BTreeSet;

use serde::Serialize;

use super::step::OnboardingStep;

/// Display state of one step in the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Current,
    Completed,
}

/// One rendered stepper entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub step: OnboardingStep,
    pub number: u8,
    pub label: &'static str,
    pub state: StepState,
}

/// Pure projection; holds no state of its own.
pub struct ProgressTracker;

impl ProgressTracker {
    pub fn state_of(
        step: OnboardingStep,
        completed: &BTreeSet<OnboardingStep>,
        current: OnboardingStep,
    ) -> StepState {
        if completed.contains(&step) {
            StepState::Completed
        } else if step == current {
            StepState::Current
        } else {
            StepState::Pending
        }
    }

    pub fn project(
        completed: &BTreeSet<OnboardingStep>,
        current: OnboardingStep,
    ) -> [StepProgress; 5] {
        OnboardingStep::ALL.map(|step| StepProgress {
            step,
            number: step.number(),
            label: step.label(),
            state: Self::state_of(step, completed, current),
        })
    }

    /// Compact one-line rendering, e.g. `[x] Personal Info > [*] Job Details > [ ] ...`.
    pub fn render(completed: &BTreeSet<OnboardingStep>, current: OnboardingStep) -> String {
        Self::project(completed, current)
            .iter()
            .map(|p| {
                let mark = match p.state {
                    StepState::Completed => "[x]",
                    StepState::Current => "[*]",
                    StepState::Pending => "[ ]",
                };
                format!("{mark} {}", p.label)
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}
