//! Sample data and an in-memory backend for unit tests.

use crate::models::enrollment::{
    DocumentOwner, DocumentRecord, DocumentStatus, DocumentStatusEntry, DocumentSummary,
    EnrollmentInfo, PendingEnrollment, RefusalReason, StudentDetails, StudentDocuments,
    StudentProfile,
};
use crate::services::enrollment_client::{CallContext, EnrollmentApi, EnrollmentError};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub fn enrollment(id: &str, all_uploaded: bool) -> PendingEnrollment {
    PendingEnrollment {
        id: id.to_string(),
        student_id: format!("stu-{}", id),
        student_name: format!("Student {}", id),
        student_email: format!("{}@example.com", id),
        student_phone: Some("+212 600 000 000".to_string()),
        days_pending: 2,
        document_summary: if all_uploaded {
            DocumentSummary {
                total_uploaded: 3,
                total_required: 3,
                ready_for_decision: true,
                all_uploaded: true,
            }
        } else {
            DocumentSummary {
                total_uploaded: 2,
                total_required: 3,
                ready_for_decision: false,
                all_uploaded: false,
            }
        },
    }
}

pub fn details() -> StudentDetails {
    let mut documents = BTreeMap::new();
    documents.insert(
        "id_card".to_string(),
        DocumentStatusEntry {
            status: DocumentStatus::Accepted,
        },
    );
    documents.insert(
        "medical_certificate".to_string(),
        DocumentStatusEntry {
            status: DocumentStatus::NotUploaded,
        },
    );

    StudentDetails {
        student: StudentProfile {
            first_name: "Amina".to_string(),
            last_name: "Diallo".to_string(),
            email: "amina@example.com".to_string(),
            phone: None,
            address: Some("12 Rue des Écoles".to_string()),
            date_of_birth: Some("2001-06-14".to_string()),
            gender: None,
        },
        school_name: "Atlas Driving School".to_string(),
        enrollment: EnrollmentInfo {
            enrollment_status: "pending_approval".to_string(),
            created_at: Some("2024-03-01T10:30:00Z".to_string()),
        },
        documents,
    }
}

pub fn documents() -> StudentDocuments {
    StudentDocuments {
        student: DocumentOwner {
            name: "Amina Diallo".to_string(),
        },
        documents: vec![
            DocumentRecord {
                document_type: "id_card".to_string(),
                document_type_display: "ID Card".to_string(),
                status: DocumentStatus::Pending,
                file_url: Some("https://files.example.com/id_card.PNG".to_string()),
                file_name: Some("id_card.png".to_string()),
                file_size: Some(1_572_864),
                upload_date: Some("2024-03-02T08:00:00Z".to_string()),
                refusal_reason: None,
            },
            DocumentRecord {
                document_type: "medical_certificate".to_string(),
                document_type_display: "Medical Certificate".to_string(),
                status: DocumentStatus::NotUploaded,
                file_url: None,
                file_name: None,
                file_size: None,
                upload_date: None,
                refusal_reason: None,
            },
        ],
    }
}

/// In-memory backend recording every call it receives.
#[derive(Default)]
pub struct FakeApi {
    pending: Mutex<Vec<PendingEnrollment>>,
    fail: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_pending(pending: Vec<PendingEnrollment>) -> Self {
        Self {
            pending: Mutex::new(pending),
            ..Default::default()
        }
    }

    pub fn set_pending(&self, pending: Vec<PendingEnrollment>) {
        *self.pending.lock().unwrap() = pending;
    }

    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), EnrollmentError> {
        self.calls.lock().unwrap().push(call);
        if self.fail.load(Ordering::SeqCst) {
            Err(EnrollmentError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EnrollmentApi for FakeApi {
    async fn pending_enrollments(
        &self,
        _ctx: CallContext<'_>,
    ) -> Result<Vec<PendingEnrollment>, EnrollmentError> {
        self.record("pending".to_string())?;
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn student_details(
        &self,
        _ctx: CallContext<'_>,
        student_id: &str,
    ) -> Result<StudentDetails, EnrollmentError> {
        self.record(format!("details:{}", student_id))?;
        Ok(details())
    }

    async fn student_documents(
        &self,
        _ctx: CallContext<'_>,
        student_id: &str,
    ) -> Result<StudentDocuments, EnrollmentError> {
        self.record(format!("documents:{}", student_id))?;
        Ok(documents())
    }

    async fn accept_enrollment(
        &self,
        _ctx: CallContext<'_>,
        enrollment_id: &str,
    ) -> Result<(), EnrollmentError> {
        self.record(format!("accept:{}", enrollment_id))
    }

    async fn refuse_enrollment(
        &self,
        _ctx: CallContext<'_>,
        enrollment_id: &str,
        reason: &RefusalReason,
    ) -> Result<(), EnrollmentError> {
        self.record(format!("refuse:{}:{}", enrollment_id, reason.as_str()))
    }
}
