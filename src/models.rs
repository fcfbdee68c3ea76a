use serde::{Deserialize, Serialize};

use crate::core::wizard::Step;

/// Backend-assigned processing status of an application.
///
/// Wire names match the backend verbatim, including the spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[serde(rename = "incomplete")]
    Incomplete,
    #[serde(rename = "pending document")]
    PendingDocument,
    #[serde(rename = "hold on")]
    HoldOn,
    #[serde(rename = "pending payment")]
    PendingPayment,
    #[serde(rename = "successful")]
    Successful,
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        ApplicationStatus::Incomplete
    }
}

impl ApplicationStatus {
    /// Human-readable label for status displays.
    pub fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Incomplete => "Incomplete",
            ApplicationStatus::PendingDocument => "Pending document review",
            ApplicationStatus::HoldOn => "On hold",
            ApplicationStatus::PendingPayment => "Pending payment",
            ApplicationStatus::Successful => "Successful",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantDetails {
    pub given_names: String,
    pub surname: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PassportDetails {
    pub passport_number: String,
    pub issuing_country: String,
    pub issue_date: String,
    pub expiry_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TravelDetails {
    pub arrival_date: String,
    pub departure_date: String,
    pub purpose: String,
    pub port_of_entry: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundDeclarations {
    pub criminal_record: bool,
    pub prior_visa_refusal: bool,
    pub previous_overstay: bool,
}

/// A single file the backend has accepted for this application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFile {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub files: Vec<DocumentFile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoUpload {
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermsAcceptance {
    pub accepted: bool,
    #[serde(default)]
    pub accepted_at: Option<String>,
}

/// The application record as owned by the backend.
///
/// Every per-step sub-document is optional until its step has been submitted;
/// the sequencer keys off that presence. The client never mutates a record
/// directly, it re-fetches after each successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: String,
    #[serde(default)]
    pub applicant_details: Option<ApplicantDetails>,
    #[serde(default)]
    pub passport_details: Option<PassportDetails>,
    #[serde(default)]
    pub contact_details: Option<ContactDetails>,
    #[serde(default)]
    pub travel_details: Option<TravelDetails>,
    #[serde(default)]
    pub background: Option<BackgroundDeclarations>,
    #[serde(default)]
    pub documents: Option<DocumentSet>,
    #[serde(default)]
    pub photo: Option<PhotoUpload>,
    #[serde(default)]
    pub terms: Option<TermsAcceptance>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub last_visited_step: Option<Step>,
}

impl ApplicationRecord {
    /// Whether the given step's sub-document has been submitted.
    pub fn has_step(&self, step: Step) -> bool {
        match step {
            Step::ApplicantDetails => self.applicant_details.is_some(),
            Step::PassportDetails => self.passport_details.is_some(),
            Step::ContactDetails => self.contact_details.is_some(),
            Step::TravelDetails => self.travel_details.is_some(),
            Step::Background => self.background.is_some(),
            Step::Documents => self.documents.as_ref().is_some_and(|d| !d.files.is_empty()),
            Step::Photo => self.photo.is_some(),
            Step::Terms => self.terms.as_ref().is_some_and(|t| t.accepted),
        }
    }

    /// All steps whose data is present, in wizard order.
    pub fn completed_steps(&self) -> Vec<Step> {
        Step::ALL
            .into_iter()
            .filter(|step| self.has_step(*step))
            .collect()
    }

    /// The submitted sub-document for a step, as JSON, for prefilling an
    /// update form.
    pub fn step_document(&self, step: Step) -> Option<serde_json::Value> {
        let value = match step {
            Step::ApplicantDetails => serde_json::to_value(self.applicant_details.as_ref()?),
            Step::PassportDetails => serde_json::to_value(self.passport_details.as_ref()?),
            Step::ContactDetails => serde_json::to_value(self.contact_details.as_ref()?),
            Step::TravelDetails => serde_json::to_value(self.travel_details.as_ref()?),
            Step::Background => serde_json::to_value(self.background.as_ref()?),
            Step::Documents => serde_json::to_value(self.documents.as_ref()?),
            Step::Photo => serde_json::to_value(self.photo.as_ref()?),
            Step::Terms => serde_json::to_value(self.terms.as_ref()?),
        };
        value.ok()
    }
}

/// Checkout session created by the backend for the hosted payment page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub checkout_url: String,
}

/// Result of verifying a provider session against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub paid: bool,
}
