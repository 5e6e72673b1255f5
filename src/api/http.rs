//! HTTP implementation of [`HrApi`] on top of reqwest.
//!
//! Endpoint shapes:
//! - `POST /employees/personal-info` → `{ "employee_id": ... }`
//! - `POST /employees/{job-details,contact-info,bank-info}` with `employee_id` in the body
//! - `POST /employees/{id}/documents` (multipart) → `{ "file_id": ... }`
//! - `POST /employees/{id}/complete-onboarding`
//! - `GET /master/document-types`

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{CorrelationId, DocumentType, DocumentTypeId, DocumentUpload, HrApi, UploadedFileId};
use crate::config::ServiceConfig;
use crate::error::{ApiError, GENERIC_FAILURE_MESSAGE};
use crate::onboarding::manifest::DocumentManifest;
use crate::onboarding::model::{BankInfo, ContactInfo, JobDetails, PersonalInfo};

/// A step body with the employee id merged in at the top level.
#[derive(Serialize)]
struct EmployeeScoped<'a, T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    employee_id: Option<&'a CorrelationId>,
    #[serde(flatten)]
    data: &'a T,
}

/// HR backend client.
pub struct HttpHrApi {
    base_url: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpHrApi {
    pub fn new(base_url: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.api_base_url.clone(), config.api_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => req.bearer_auth(token.expose_secret()),
            None => req,
        }
    }

    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        debug!(path, "HR API POST");
        let req = self.authorize(self.client.post(self.url(path)).json(body));
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        read_body(resp).await
    }

    async fn post_employee_step<T: Serialize>(
        &self,
        path: &str,
        employee: &CorrelationId,
        data: &T,
    ) -> Result<(), ApiError> {
        let body = EmployeeScoped {
            employee_id: Some(employee),
            data,
        };
        self.post_json(path, &body).await.map(|_| ())
    }
}

/// Check the status and decode the JSON body (empty bodies become `null`).
async fn read_body(resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Human-readable reason from an error body: `message`, then `error`,
/// then `detail`, else the generic fallback.
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return GENERIC_FAILURE_MESSAGE.to_string();
    };
    ["message", "error", "detail"]
        .iter()
        .filter_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

/// First of `keys` present at the top level or under `data`, as a string.
fn find_id(body: &Value, keys: &[&str]) -> Option<String> {
    let scopes = [Some(body), body.get("data")];
    scopes.into_iter().flatten().find_map(|scope| {
        keys.iter().find_map(|key| match scope.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    })
}

#[async_trait]
impl HrApi for HttpHrApi {
    async fn create_personal_info(
        &self,
        existing: Option<&CorrelationId>,
        info: &PersonalInfo,
    ) -> Result<CorrelationId, ApiError> {
        let body = EmployeeScoped {
            employee_id: existing,
            data: info,
        };
        let resp = self.post_json("/employees/personal-info", &body).await?;
        find_id(&resp, &["employee_id", "id"])
            .map(CorrelationId)
            .ok_or_else(|| ApiError::InvalidResponse("personal info response has no employee id".into()))
    }

    async fn create_job_details(
        &self,
        employee: &CorrelationId,
        details: &JobDetails,
    ) -> Result<(), ApiError> {
        self.post_employee_step("/employees/job-details", employee, details)
            .await
    }

    async fn create_contact_info(
        &self,
        employee: &CorrelationId,
        contact: &ContactInfo,
    ) -> Result<(), ApiError> {
        self.post_employee_step("/employees/contact-info", employee, contact)
            .await
    }

    async fn create_bank_info(
        &self,
        employee: &CorrelationId,
        bank: &BankInfo,
    ) -> Result<(), ApiError> {
        self.post_employee_step("/employees/bank-info", employee, bank)
            .await
    }

    async fn upload_document(
        &self,
        employee: &CorrelationId,
        document_type_id: DocumentTypeId,
        upload: DocumentUpload,
    ) -> Result<UploadedFileId, ApiError> {
        let DocumentUpload {
            file_name,
            content_type,
            bytes,
        } = upload;

        let mut part = Part::bytes(bytes).file_name(file_name);
        if let Some(ref mime) = content_type {
            part = part
                .mime_str(mime)
                .map_err(|e| ApiError::Transport(format!("invalid content type {mime}: {e}")))?;
        }
        let form = Form::new()
            .text("document_type_id", document_type_id.to_string())
            .part("file", part);

        let path = format!("/employees/{employee}/documents");
        debug!(path = %path, document_type_id, "HR API upload");
        let resp = self
            .authorize(self.client.post(self.url(&path)).multipart(form))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = read_body(resp).await?;

        find_id(&body, &["file_id", "id"])
            .map(UploadedFileId)
            .ok_or_else(|| ApiError::InvalidResponse("upload response has no file id".into()))
    }

    async fn complete_onboarding(
        &self,
        employee: &CorrelationId,
        manifest: &DocumentManifest,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "documents": manifest.documents });
        self.post_json(&format!("/employees/{employee}/complete-onboarding"), &body)
            .await
            .map(|_| ())
    }

    async fn document_types(&self) -> Result<Vec<DocumentType>, ApiError> {
        let resp = self
            .authorize(self.client.get(self.url("/master/document-types")))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let body = read_body(resp).await?;
        let list = match body {
            Value::Object(mut obj) => obj.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        serde_json::from_value(list).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}
