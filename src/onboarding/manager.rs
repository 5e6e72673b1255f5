//! OnboardingSequencer — drives one operator through the five steps.
//!
//! Each operation takes the session lock only to check guards and to apply
//! the outcome; the lock is never held across a backend call. A failed call
//! leaves the session exactly as it was before the attempt.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{CorrelationId, DocumentType, DocumentTypeId, DocumentUpload, HrApi, UploadedFileId};
use crate::error::{ApiError, SubmitError};

use super::manifest::DocumentManifest;
use super::model::StepPayload;
use super::progress::{ProgressTracker, StepProgress};
use super::session::OnboardingSession;
use super::step::OnboardingStep;

/// Snapshot of a session for display.
#[derive(Debug, Clone, Serialize)]
pub struct OnboardingStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<CorrelationId>,
    pub current_step: OnboardingStep,
    pub active_step: OnboardingStep,
    pub completed_steps: Vec<OnboardingStep>,
    pub progress: Vec<StepProgress>,
    pub documents: DocumentManifest,
    pub document_types: Vec<DocumentType>,
    /// Step whose submit button should show as pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitting: Option<OnboardingStep>,
    pub finished: bool,
}

/// Result of navigating to a step: the form to show and its contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub step: OnboardingStep,
    /// Cached or blank form. `None` for the documents step.
    pub prefill: Option<StepPayload>,
}

/// Sequencer controller for one onboarding session.
pub struct OnboardingSequencer {
    api: Arc<dyn HrApi>,
    catalog: Vec<DocumentType>,
    session: Arc<RwLock<OnboardingSession>>,
}

impl OnboardingSequencer {
    pub fn new(api: Arc<dyn HrApi>, catalog: Vec<DocumentType>) -> Self {
        Self {
            api,
            catalog,
            session: Arc::new(RwLock::new(OnboardingSession::new())),
        }
    }

    /// Start a session, loading the document types from master data.
    pub async fn start(api: Arc<dyn HrApi>) -> Result<Self, ApiError> {
        let catalog = api.document_types().await?;
        debug!(document_types = catalog.len(), "Loaded document type catalog");
        Ok(Self::new(api, catalog))
    }

    pub fn document_types(&self) -> &[DocumentType] {
        &self.catalog
    }

    pub async fn is_finished(&self) -> bool {
        self.session.read().await.finished
    }

    /// Submit one form step.
    ///
    /// On success the payload is cached, the step is marked completed and
    /// the wizard moves on. The personal info step also yields the employee
    /// id that every later step carries.
    pub async fn submit_step(&self, payload: StepPayload) -> Result<OnboardingStatus, SubmitError> {
        let step = payload.step();

        let employee = {
            let mut session = self.session.write().await;
            if session.finished {
                return Err(SubmitError::Finished);
            }
            if step > session.current_step {
                return Err(SubmitError::StepLocked {
                    step,
                    current: session.current_step,
                });
            }
            if let Some(pending) = session.submitting {
                return Err(SubmitError::InFlight {
                    what: format!("step {pending}"),
                });
            }
            payload
                .validate()
                .map_err(|errors| SubmitError::Validation { step, errors })?;
            let employee = session.correlation.get().cloned();
            if step.requires_correlation() && employee.is_none() {
                return Err(SubmitError::MissingCorrelation { step });
            }
            session.submitting = Some(step);
            employee
        };

        info!(
            step = %step,
            employee_id = employee.as_ref().map(|e| e.as_str()).unwrap_or("-"),
            "Submitting onboarding step"
        );
        let result = self.send(&payload, employee.as_ref()).await;

        let mut session = self.session.write().await;
        session.submitting = None;
        match result {
            Ok(issued) => {
                if let Some(id) = issued {
                    session.correlation.set_once(id);
                }
                session.record_success(payload);
                info!(
                    step = %step,
                    current_step = %session.current_step,
                    "Onboarding step completed"
                );
                debug!(
                    "{}",
                    ProgressTracker::render(&session.completed_steps, session.current_step)
                );
                Ok(self.snapshot(&session))
            }
            Err(e) => {
                warn!(step = %step, error = %e, "Onboarding step submission failed");
                Err(e)
            }
        }
    }

    /// Send a payload to its step's endpoint. Returns the employee id when
    /// the step issues one.
    async fn send(
        &self,
        payload: &StepPayload,
        employee: Option<&CorrelationId>,
    ) -> Result<Option<CorrelationId>, SubmitError> {
        let step = payload.step();
        match payload {
            StepPayload::Personal(info) => {
                let id = self.api.create_personal_info(employee, info).await?;
                return Ok(Some(id));
            }
            StepPayload::JobDetails(details) => {
                self.api
                    .create_job_details(required(employee, step)?, details)
                    .await?
            }
            StepPayload::Contact(contact) => {
                self.api
                    .create_contact_info(required(employee, step)?, contact)
                    .await?
            }
            StepPayload::Bank(bank) => {
                self.api
                    .create_bank_info(required(employee, step)?, bank)
                    .await?
            }
        }
        Ok(None)
    }

    /// Refuse a step that cannot be submitted right now, before its body
    /// is even decoded.
    pub async fn ensure_reachable(&self, step: OnboardingStep) -> Result<(), SubmitError> {
        let session = self.session.read().await;
        if session.finished {
            return Err(SubmitError::Finished);
        }
        if step > session.current_step {
            return Err(SubmitError::StepLocked {
                step,
                current: session.current_step,
            });
        }
        Ok(())
    }

    /// Open the form for `target` if it is not beyond the furthest step.
    ///
    /// Returns `None` (and changes nothing) when the target is locked.
    pub async fn go_to_step(&self, target: OnboardingStep) -> Option<StepView> {
        let mut session = self.session.write().await;
        if session.finished || !session.navigate(target) {
            debug!(target = %target, current_step = %session.current_step, "Navigation refused");
            return None;
        }
        Some(StepView {
            step: target,
            prefill: session.cache.get(target),
        })
    }

    /// Contents for a step's form: the last submitted payload or blanks.
    pub async fn prefill(&self, step: OnboardingStep) -> Option<StepPayload> {
        self.session.read().await.cache.get(step)
    }

    /// Upload one document for the final step.
    ///
    /// Uploads for different types may run at the same time. A failure
    /// removes only this type's manifest entry.
    pub async fn upload_document(
        &self,
        document_type_id: DocumentTypeId,
        upload: DocumentUpload,
    ) -> Result<UploadedFileId, SubmitError> {
        let employee = {
            let mut session = self.session.write().await;
            if session.finished {
                return Err(SubmitError::Finished);
            }
            if !self.catalog.iter().any(|t| t.id == document_type_id) {
                return Err(SubmitError::UnknownDocumentType { document_type_id });
            }
            if session.current_step < OnboardingStep::Documents {
                return Err(SubmitError::StepLocked {
                    step: OnboardingStep::Documents,
                    current: session.current_step,
                });
            }
            // The manifest is frozen once completion has been sent.
            if session.submitting == Some(OnboardingStep::Documents) {
                return Err(SubmitError::InFlight {
                    what: "onboarding completion".to_string(),
                });
            }
            upload
                .check_content_type()
                .map_err(|reason| SubmitError::InvalidUpload { reason })?;
            let employee = session.correlation.get().cloned().ok_or(
                SubmitError::MissingCorrelation {
                    step: OnboardingStep::Documents,
                },
            )?;
            if !session.manifest.begin(document_type_id) {
                return Err(SubmitError::InFlight {
                    what: format!("document type {document_type_id}"),
                });
            }
            employee
        };

        info!(
            employee_id = %employee,
            document_type_id,
            file_name = %upload.file_name,
            "Uploading onboarding document"
        );
        let result = self
            .api
            .upload_document(&employee, document_type_id, upload)
            .await;

        let mut session = self.session.write().await;
        match result {
            Ok(file) => {
                session.manifest.record(document_type_id, file.clone());
                info!(document_type_id, file_id = %file, "Document uploaded");
                Ok(file)
            }
            Err(e) => {
                session.manifest.fail(document_type_id);
                warn!(document_type_id, error = %e, "Document upload failed");
                Err(SubmitError::Remote(e))
            }
        }
    }

    /// Run several uploads concurrently. Results keep the input order.
    pub async fn upload_documents(
        &self,
        batch: Vec<(DocumentTypeId, DocumentUpload)>,
    ) -> Vec<(DocumentTypeId, Result<UploadedFileId, SubmitError>)> {
        join_all(batch.into_iter().map(|(id, upload)| async move {
            (id, self.upload_document(id, upload).await)
        }))
        .await
    }

    /// Finish onboarding once every mandatory document is uploaded.
    ///
    /// The manifest is checked here and nowhere else. On failure the session
    /// stays as it was and the operator may retry.
    pub async fn complete_onboarding(&self) -> Result<OnboardingStatus, SubmitError> {
        let (employee, manifest) = {
            let mut session = self.session.write().await;
            if session.finished {
                return Err(SubmitError::Finished);
            }
            if session.current_step < OnboardingStep::Documents {
                return Err(SubmitError::StepLocked {
                    step: OnboardingStep::Documents,
                    current: session.current_step,
                });
            }
            if session.submitting.is_some() || !session.manifest.uploading.is_empty() {
                return Err(SubmitError::InFlight {
                    what: "onboarding completion".to_string(),
                });
            }
            let missing = session.manifest.missing_mandatory(&self.catalog);
            if !missing.is_empty() {
                return Err(SubmitError::MissingDocuments { missing });
            }
            let employee = session.correlation.get().cloned().ok_or(
                SubmitError::MissingCorrelation {
                    step: OnboardingStep::Documents,
                },
            )?;
            session.submitting = Some(OnboardingStep::Documents);
            (employee, session.manifest.clone())
        };

        info!(employee_id = %employee, documents = manifest.len(), "Completing onboarding");
        let result = self.api.complete_onboarding(&employee, &manifest).await;

        let mut session = self.session.write().await;
        session.submitting = None;
        match result {
            Ok(()) => {
                session.finish();
                info!(employee_id = %employee, "Onboarding complete");
                Ok(self.snapshot(&session))
            }
            Err(e) => {
                warn!(employee_id = %employee, error = %e, "Onboarding completion failed");
                Err(SubmitError::Remote(e))
            }
        }
    }

    /// Current status (for the REST endpoint and the stepper).
    pub async fn status(&self) -> OnboardingStatus {
        let session = self.session.read().await;
        self.snapshot(&session)
    }

    fn snapshot(&self, session: &OnboardingSession) -> OnboardingStatus {
        OnboardingStatus {
            employee_id: session.correlation.get().cloned(),
            current_step: session.current_step,
            active_step: session.active_step,
            completed_steps: session.completed_steps.iter().copied().collect(),
            progress: ProgressTracker::project(&session.completed_steps, session.current_step)
                .to_vec(),
            documents: session.manifest.clone(),
            document_types: self.catalog.clone(),
            submitting: session.submitting,
            finished: session.finished,
        }
    }
}

fn required(
    employee: Option<&CorrelationId>,
    step: OnboardingStep,
) -> Result<&CorrelationId, SubmitError> {
    employee.ok_or(SubmitError::MissingCorrelation { step })
}
