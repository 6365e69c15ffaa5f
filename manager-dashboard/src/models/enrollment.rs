//! Wire types of the enrollment backend.
//!
//! Every type also round-trips through the session store, so they derive
//! both `Serialize` and `Deserialize`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate upload completeness of one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub total_uploaded: u32,
    pub total_required: u32,
    #[serde(default)]
    pub ready_for_decision: bool,
    #[serde(default)]
    pub all_uploaded: bool,
}

/// An enrollment application awaiting a manager decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEnrollment {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    #[serde(default)]
    pub student_email: String,
    #[serde(default)]
    pub student_phone: Option<String>,
    /// Computed by the backend.
    #[serde(default)]
    pub days_pending: i64,
    pub document_summary: DocumentSummary,
}

impl PendingEnrollment {
    pub fn can_accept(&self) -> bool {
        self.document_summary.all_uploaded
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingEnrollmentList {
    #[serde(default)]
    pub enrollments: Vec<PendingEnrollment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    NotUploaded,
    Pending,
    Accepted,
    Refused,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::NotUploaded => "not_uploaded",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Accepted => "accepted",
            DocumentStatus::Refused => "refused",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl StudentProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentInfo {
    pub enrollment_status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatusEntry {
    pub status: DocumentStatus,
}

/// Read-only profile snapshot of one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub student: StudentProfile,
    #[serde(default)]
    pub school_name: String,
    pub enrollment: EnrollmentInfo,
    /// Document type → status, ordered by type.
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentStatusEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOwner {
    #[serde(default)]
    pub name: String,
}

/// One required document of an applicant. The file fields are only
/// populated once something has been uploaded, independently of `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_type: String,
    #[serde(default)]
    pub document_type_display: String,
    pub status: DocumentStatus,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub refusal_reason: Option<String>,
}

impl DocumentRecord {
    pub fn has_file(&self) -> bool {
        self.file_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDocuments {
    #[serde(default)]
    pub student: DocumentOwner,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
}

/// A non-blank, trimmed refusal reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefusalReason(String);

impl RefusalReason {
    /// Returns `None` when `raw` is empty or whitespace only.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
