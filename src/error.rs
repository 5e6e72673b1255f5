//! Error types for the onboarding service.

use crate::onboarding::model::ValidationErrors;
use crate::onboarding::step::OnboardingStep;

/// Message shown when the backend gives no human-readable reason.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the HR backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("HR API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The request never got a response.
    #[error("HR API request failed: {0}")]
    Transport(String),

    /// The backend answered 2xx but the body was not what we expected.
    #[error("Invalid response from HR API: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Text suitable for a toast: the backend's message if it sent one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Why a step submission, upload, or completion was refused or failed.
///
/// None of these are fatal: the session is left as it was before the
/// attempt and the operator may retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("Step {step} has validation errors: {errors}")]
    Validation {
        step: OnboardingStep,
        errors: ValidationErrors,
    },

    #[error("Step {step} requires an employee id from the personal info step")]
    MissingCorrelation { step: OnboardingStep },

    #[error("Step {step} is not reachable yet (furthest step is {current})")]
    StepLocked {
        step: OnboardingStep,
        current: OnboardingStep,
    },

    #[error("A submission for {what} is already in progress")]
    InFlight { what: String },

    #[error("Unknown document type {document_type_id}")]
    UnknownDocumentType { document_type_id: i64 },

    #[error("Invalid upload: {reason}")]
    InvalidUpload { reason: String },

    #[error("Mandatory documents missing: {}", .missing.join(", "))]
    MissingDocuments { missing: Vec<String> },

    #[error("Onboarding session already finished")]
    Finished,

    #[error(transparent)]
    Remote(#[from] ApiError),
}

impl SubmitError {
    /// Text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Remote(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Short machine-readable tag for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::MissingCorrelation { .. } => "missing_correlation",
            Self::StepLocked { .. } => "step_locked",
            Self::InFlight { .. } => "in_flight",
            Self::UnknownDocumentType { .. } => "unknown_document_type",
            Self::InvalidUpload { .. } => "invalid_upload",
            Self::MissingDocuments { .. } => "missing_documents",
            Self::Finished => "finished",
            Self::Remote(_) => "remote",
        }
    }
}
