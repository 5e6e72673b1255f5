//! Employee onboarding wizard — five sequential steps.
//!
//! The operator fills Personal → Job Details → Contact → Bank → Documents.
//! Each form step is persisted to the HR backend on its own; the employee
//! id issued by the first step is carried into every later call. Backward
//! navigation re-populates forms from the last submitted payloads.

pub mod cache;
pub mod manager;
pub mod manifest;
pub mod model;
pub mod progress;
pub mod routes;
pub mod session;
pub mod step;

pub use cache::StepResultCache;
pub use manager::{OnboardingSequencer, OnboardingStatus, StepView};
pub use manifest::DocumentManifest;
pub use model::{
    Address, BankInfo, ContactInfo, EmergencyContact, EmploymentStatus, Gender, JobDetails,
    MaritalStatus, PersonalInfo, StepPayload, ValidationError, ValidationErrors,
};
pub use progress::{ProgressTracker, StepProgress, StepState};
pub use routes::{OnboardingRouteState, SessionRegistry, onboarding_routes};
pub use session::{CorrelationCarrier, OnboardingSession};
pub use step::OnboardingStep;
