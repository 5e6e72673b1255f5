//! Step payloads and their local validation rules.
//!
//! Each form step has one schema type. Optional fields model what the form
//! may leave empty while the operator is typing; `validate()` decides what
//! must be present before a submission is allowed to reach the backend.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::step::OnboardingStep;

static EMPLOYEE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,20}$").expect("valid employee code regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("valid email regex")
});
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("valid phone regex"));
static ACCOUNT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9,18}$").expect("valid account number regex"));
static IFSC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid IFSC regex"));
static PAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid PAN regex"));

// ── Validation errors ───────────────────────────────────────────────

/// A single field rule that rejected the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Every rule a form violated, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    fn require_match(&mut self, field: &str, value: &str, re: &Regex, what: &str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        } else if !re.is_match(value.trim()) {
            self.push(field, format!("must be a valid {what}"));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

// ── Step 1: personal info ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub employee_code: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

impl PersonalInfo {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("first_name", &self.first_name);
        errors.require("last_name", &self.last_name);
        errors.require_match("employee_code", &self.employee_code, &EMPLOYEE_CODE, "employee code");
        if self.gender.is_none() {
            errors.push("gender", "is required");
        }
        match self.date_of_birth {
            None => errors.push("date_of_birth", "is required"),
            Some(dob) if dob >= Utc::now().date_naive() => {
                errors.push("date_of_birth", "must be in the past")
            }
            Some(_) => {}
        }
        errors.into_result()
    }
}

// ── Step 2: job details ─────────────────────────────────────────────

/// Employment status with exactly the dates that status needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmploymentStatus {
    Probation { probation_end_date: NaiveDate },
    Confirmed { confirmation_date: NaiveDate },
    Contract { contract_end_date: NaiveDate },
}

impl EmploymentStatus {
    /// The date carried by the status, with its field name.
    pub fn status_date(&self) -> (&'static str, NaiveDate) {
        match *self {
            Self::Probation { probation_end_date } => ("probation_end_date", probation_end_date),
            Self::Confirmed { confirmation_date } => ("confirmation_date", confirmation_date),
            Self::Contract { contract_end_date } => ("contract_end_date", contract_end_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub company_id: i64,
    pub department_id: i64,
    pub designation_id: i64,
    pub shift_id: i64,
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    #[serde(default)]
    pub employment: Option<EmploymentStatus>,
    #[serde(default)]
    pub annual_ctc: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_manager_id: Option<i64>,
}

impl JobDetails {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for (field, id) in [
            ("company_id", self.company_id),
            ("department_id", self.department_id),
            ("designation_id", self.designation_id),
            ("shift_id", self.shift_id),
        ] {
            if id <= 0 {
                errors.push(field, "is required");
            }
        }
        if self.date_of_joining.is_none() {
            errors.push("date_of_joining", "is required");
        }
        match (self.employment, self.date_of_joining) {
            (None, _) => errors.push("employment", "is required"),
            (Some(status), Some(joined)) => {
                let (field, date) = status.status_date();
                if date < joined {
                    errors.push(field, "must not be before the date of joining");
                }
            }
            (Some(_), None) => {}
        }
        if self.annual_ctc <= Decimal::ZERO {
            errors.push("annual_ctc", "must be greater than zero");
        }
        errors.into_result()
    }
}

// ── Step 3: contact info ────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    fn check(&self, prefix: &str, errors: &mut ValidationErrors) {
        errors.require(&format!("{prefix}.line1"), &self.line1);
        errors.require(&format!("{prefix}.city"), &self.city);
        errors.require(&format!("{prefix}.postal_code"), &self.postal_code);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub relation: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub personal_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub current_address: Address,
    /// `None` means same as current address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<Address>,
}

impl ContactInfo {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require_match("personal_email", &self.personal_email, &EMAIL, "email address");
        if let Some(ref work) = self.work_email {
            if !work.trim().is_empty() && !EMAIL.is_match(work.trim()) {
                errors.push("work_email", "must be a valid email address");
            }
        }
        errors.require_match("phone", &self.phone, &PHONE, "phone number");
        errors.require("emergency_contact.name", &self.emergency_contact.name);
        errors.require("emergency_contact.relation", &self.emergency_contact.relation);
        errors.require_match(
            "emergency_contact.phone",
            &self.emergency_contact.phone,
            &PHONE,
            "phone number",
        );
        self.current_address.check("current_address", &mut errors);
        if let Some(ref permanent) = self.permanent_address {
            permanent.check("permanent_address", &mut errors);
        }
        errors.into_result()
    }
}

// ── Step 4: bank info ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
}

impl BankInfo {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.require("account_holder_name", &self.account_holder_name);
        errors.require_match("account_number", &self.account_number, &ACCOUNT_NUMBER, "account number");
        errors.require_match("ifsc_code", &self.ifsc_code, &IFSC, "IFSC code");
        errors.require("bank_name", &self.bank_name);
        if let Some(ref pan) = self.pan_number {
            if !pan.trim().is_empty() && !PAN.is_match(pan.trim()) {
                errors.push("pan_number", "must be a valid PAN");
            }
        }
        errors.into_result()
    }
}

// ── Any form step ───────────────────────────────────────────────────

/// The payload of one form step (steps 1–4).
///
/// Step 5 has no form payload; its data is the document manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "data", rename_all = "snake_case")]
pub enum StepPayload {
    Personal(PersonalInfo),
    JobDetails(JobDetails),
    Contact(ContactInfo),
    Bank(BankInfo),
}

impl StepPayload {
    pub fn step(&self) -> OnboardingStep {
        match self {
            Self::Personal(_) => OnboardingStep::Personal,
            Self::JobDetails(_) => OnboardingStep::JobDetails,
            Self::Contact(_) => OnboardingStep::Contact,
            Self::Bank(_) => OnboardingStep::Bank,
        }
    }

    /// Blank form for a step. `None` for the documents step.
    pub fn empty(step: OnboardingStep) -> Option<StepPayload> {
        match step {
            OnboardingStep::Personal => Some(Self::Personal(PersonalInfo::default())),
            OnboardingStep::JobDetails => Some(Self::JobDetails(JobDetails::default())),
            OnboardingStep::Contact => Some(Self::Contact(ContactInfo::default())),
            OnboardingStep::Bank => Some(Self::Bank(BankInfo::default())),
            OnboardingStep::Documents => None,
        }
    }

    /// Decode the bare form body for `step`.
    pub fn from_json(
        step: OnboardingStep,
        value: serde_json::Value,
    ) -> Result<StepPayload, ValidationErrors> {
        let decoded = match step {
            OnboardingStep::Personal => serde_json::from_value(value).map(Self::Personal),
            OnboardingStep::JobDetails => serde_json::from_value(value).map(Self::JobDetails),
            OnboardingStep::Contact => serde_json::from_value(value).map(Self::Contact),
            OnboardingStep::Bank => serde_json::from_value(value).map(Self::Bank),
            OnboardingStep::Documents => {
                let mut errors = ValidationErrors::default();
                errors.push("step", "documents are uploaded individually");
                return Err(errors);
            }
        };
        decoded.map_err(|e| {
            let mut errors = ValidationErrors::default();
            errors.push("body", e.to_string());
            errors
        })
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Personal(p) => p.validate(),
            Self::JobDetails(j) => j.validate(),
            Self::Contact(c) => c.validate(),
            Self::Bank(b) => b.validate(),
        }
    }

    /// The bare form body, without the step tag.
    pub fn data(&self) -> serde_json::Value {
        let value = match self {
            Self::Personal(p) => serde_json::to_value(p),
            Self::JobDetails(j) => serde_json::to_value(j),
            Self::Contact(c) => serde_json::to_value(c),
            Self::Bank(b) => serde_json::to_value(b),
        };
        value.unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal_macros::dec;

    use super::*;

    pub fn personal(first_name: &str) -> PersonalInfo {
        PersonalInfo {
            first_name: first_name.to_string(),
            middle_name: None,
            last_name: "Rao".to_string(),
            employee_code: "EMP-0042".to_string(),
            gender: Some(Gender::Female),
            date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 12),
            marital_status: Some(MaritalStatus::Single),
            blood_group: Some("B+".to_string()),
            nationality: Some("Indian".to_string()),
        }
    }

    pub fn job() -> JobDetails {
        JobDetails {
            company_id: 1,
            department_id: 4,
            designation_id: 7,
            shift_id: 2,
            date_of_joining: NaiveDate::from_ymd_opt(2026, 1, 5),
            employment: Some(EmploymentStatus::Probation {
                probation_end_date: NaiveDate::from_ymd_opt(2026, 7, 5).unwrap(),
            }),
            annual_ctc: dec!(1200000.00),
            reporting_manager_id: Some(17),
        }
    }

    pub fn contact() -> ContactInfo {
        ContactInfo {
            personal_email: "asha.rao@example.com".to_string(),
            work_email: None,
            phone: "+919876543210".to_string(),
            emergency_contact: EmergencyContact {
                name: "Ravi Rao".to_string(),
                relation: "Brother".to_string(),
                phone: "9876500000".to_string(),
            },
            current_address: Address {
                line1: "12 MG Road".to_string(),
                line2: None,
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                postal_code: "560001".to_string(),
                country: "India".to_string(),
            },
            permanent_address: None,
        }
    }

    pub fn bank() -> BankInfo {
        BankInfo {
            account_holder_name: "Asha Rao".to_string(),
            account_number: "123456789012".to_string(),
            ifsc_code: "HDFC0001234".to_string(),
            bank_name: "HDFC Bank".to_string(),
            branch: Some("MG Road".to_string()),
            pan_number: Some("ABCDE1234F".to_string()),
        }
    }
}
