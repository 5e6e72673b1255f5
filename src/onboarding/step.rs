//! The five onboarding steps and their linear ordering.

use serde::{Deserialize, Serialize};

/// One stage of the onboarding wizard.
///
/// Progresses linearly: Personal → JobDetails → Contact → Bank → Documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Personal,
    JobDetails,
    Contact,
    Bank,
    Documents,
}

impl OnboardingStep {
    /// All steps in wizard order.
    pub const ALL: [OnboardingStep; 5] = [
        Self::Personal,
        Self::JobDetails,
        Self::Contact,
        Self::Bank,
        Self::Documents,
    ];

    /// 1-based position shown in the stepper.
    pub fn number(&self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::JobDetails => 2,
            Self::Contact => 3,
            Self::Bank => 4,
            Self::Documents => 5,
        }
    }

    pub fn from_number(n: u8) -> Option<OnboardingStep> {
        Self::ALL.iter().copied().find(|s| s.number() == n)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingStep> {
        Self::from_number(self.number() + 1)
    }

    /// Whether this step's call must carry the employee id issued by step 1.
    pub fn requires_correlation(&self) -> bool {
        !matches!(self, Self::Personal)
    }

    /// Human-readable label for the stepper.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Personal => "Personal Info",
            Self::JobDetails => "Job Details",
            Self::Contact => "Contact Info",
            Self::Bank => "Bank Info",
            Self::Documents => "Documents",
        }
    }

    /// Parse either the step number ("2") or its snake_case name ("job_details").
    pub fn parse(s: &str) -> Option<OnboardingStep> {
        if let Ok(n) = s.parse::<u8>() {
            return Self::from_number(n);
        }
        Self::ALL.iter().copied().find(|step| step.to_string() == s)
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::Personal
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Personal => "personal",
            Self::JobDetails => "job_details",
            Self::Contact => "contact",
            Self::Bank => "bank",
            Self::Documents => "documents",
        };
        write!(f, "{s}")
    }
}
