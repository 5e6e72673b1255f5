//! Contract with the HR REST backend.
//!
//! The sequencer only talks to the backend through [`HrApi`]; `HttpHrApi`
//! is the reqwest implementation used by the binary.

pub mod http;

pub use http::HttpHrApi;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::onboarding::manifest::DocumentManifest;
use crate::onboarding::model::{BankInfo, ContactInfo, JobDetails, PersonalInfo};

/// Master-data id of a document type.
pub type DocumentTypeId = i64;

/// Server-issued employee id returned by the personal info step.
///
/// Every later step sends it back so the backend attaches the data to the
/// same in-progress employee record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a stored file, returned by a document upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadedFileId(pub String);

impl std::fmt::Display for UploadedFileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document type from master data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    pub name: String,
    /// Must be uploaded before onboarding can complete.
    #[serde(default, alias = "is_mandatory")]
    pub mandatory: bool,
}

/// One file to upload for a document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Check the declared content type parses as a MIME type, with the same
    /// parser the multipart body is built with.
    pub fn check_content_type(&self) -> Result<(), String> {
        match self.content_type {
            Some(ref mime) => reqwest::multipart::Part::bytes(Vec::new())
                .mime_str(mime)
                .map(|_| ())
                .map_err(|e| format!("invalid content type {mime}: {e}")),
            None => Ok(()),
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, bytes))
    }
}

/// The endpoints the onboarding wizard consumes.
#[async_trait]
pub trait HrApi: Send + Sync {
    /// Create (or, when `existing` is set, update) the personal info record.
    /// Returns the employee id the backend assigned.
    async fn create_personal_info(
        &self,
        existing: Option<&CorrelationId>,
        info: &PersonalInfo,
    ) -> Result<CorrelationId, ApiError>;

    async fn create_job_details(
        &self,
        employee: &CorrelationId,
        details: &JobDetails,
    ) -> Result<(), ApiError>;

    async fn create_contact_info(
        &self,
        employee: &CorrelationId,
        contact: &ContactInfo,
    ) -> Result<(), ApiError>;

    async fn create_bank_info(
        &self,
        employee: &CorrelationId,
        bank: &BankInfo,
    ) -> Result<(), ApiError>;

    async fn upload_document(
        &self,
        employee: &CorrelationId,
        document_type_id: DocumentTypeId,
        upload: DocumentUpload,
    ) -> Result<UploadedFileId, ApiError>;

    async fn complete_onboarding(
        &self,
        employee: &CorrelationId,
        manifest: &DocumentManifest,
    ) -> Result<(), ApiError>;

    /// Document types from master data, with their mandatory flags.
    async fn document_types(&self) -> Result<Vec<DocumentType>, ApiError>;
}
