//! Screen state of the approval dashboard.
//!
//! The whole screen is one [`DashboardState`] kept in the manager's session.
//! At most one view is open at a time; [`ViewState`] is the only place that
//! knows which.

use crate::models::enrollment::{
    PendingEnrollment, RefusalReason, StudentDetails, StudentDocuments,
};
use crate::services::enrollment_client::{CallContext, EnrollmentApi};
use crate::services::metrics::record_decision;
use serde::{Deserialize, Serialize};

pub const LOAD_FAILED: &str = "Failed to load pending enrollments";
pub const DETAILS_FAILED: &str = "Failed to load student details";
pub const DOCUMENTS_FAILED: &str = "Failed to load student documents";
pub const ACCEPT_FAILED: &str = "Failed to accept student";
pub const REFUSE_FAILED: &str = "Failed to refuse student";
pub const REASON_REQUIRED: &str = "Please provide a reason for refusing this student";
pub const DOCUMENTS_INCOMPLETE: &str =
    "All required documents must be uploaded before the student can be accepted";
pub const NOT_PENDING: &str = "This application is no longer pending";
pub const CONFIRMATION_REQUIRED: &str = "Please confirm before accepting this student";
pub const DECISION_IN_PROGRESS: &str = "A decision for this application is already being processed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// One-shot message shown with the next render and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "alert-success",
            NoticeLevel::Warning => "alert-warning",
            NoticeLevel::Error => "alert-danger",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Closed,
    ViewingDetails {
        enrollment: PendingEnrollment,
        details: StudentDetails,
    },
    ViewingDocuments {
        enrollment: PendingEnrollment,
        documents: StudentDocuments,
    },
    ConfirmingAccept {
        enrollment: PendingEnrollment,
    },
    Refusing {
        enrollment: PendingEnrollment,
        reason: String,
    },
}

impl ViewState {
    pub fn enrollment(&self) -> Option<&PendingEnrollment> {
        match self {
            ViewState::Closed => None,
            ViewState::ViewingDetails { enrollment, .. }
            | ViewState::ViewingDocuments { enrollment, .. }
            | ViewState::ConfirmingAccept { enrollment }
            | ViewState::Refusing { enrollment, .. } => Some(enrollment),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub enrollments: Vec<PendingEnrollment>,
    /// Inline banner of the last failed list load.
    pub load_error: Option<String>,
    /// False until the first list load has been attempted.
    pub loaded: bool,
    pub view: ViewState,
}

impl DashboardState {
    pub fn find(&self, enrollment_id: &str) -> Option<&PendingEnrollment> {
        self.enrollments.iter().find(|e| e.id == enrollment_id)
    }

    fn require(&self, enrollment_id: &str) -> Result<PendingEnrollment, Notice> {
        self.find(enrollment_id)
            .cloned()
            .ok_or_else(|| Notice::error(NOT_PENDING))
    }

    fn remove(&mut self, enrollment_id: &str) {
        self.enrollments.retain(|e| e.id != enrollment_id);
    }

    /// Load (or reload) the pending list. A failure keeps the previous list
    /// and sets the banner; a success clears it.
    pub async fn load_pending(&mut self, api: &dyn EnrollmentApi, ctx: CallContext<'_>) {
        match api.pending_enrollments(ctx).await {
            Ok(enrollments) => {
                tracing::info!(count = enrollments.len(), "Loaded pending enrollments");
                self.enrollments = enrollments;
                self.load_error = None;

                let stale = self
                    .view
                    .enrollment()
                    .is_some_and(|open| self.find(&open.id).is_none());
                if stale {
                    self.view = ViewState::Closed;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching enrollments");
                self.load_error = Some(LOAD_FAILED.to_string());
            }
        }
        self.loaded = true;
    }

    pub async fn open_details(
        &mut self,
        api: &dyn EnrollmentApi,
        ctx: CallContext<'_>,
        enrollment_id: &str,
    ) -> Result<(), Notice> {
        let enrollment = self.require(enrollment_id)?;

        let details = api
            .student_details(ctx, &enrollment.student_id)
            .await
            .map_err(|e| {
                tracing::error!(student_id = %enrollment.student_id, error = %e, "Error fetching student details");
                Notice::error(DETAILS_FAILED)
            })?;

        self.view = ViewState::ViewingDetails {
            enrollment,
            details,
        };
        Ok(())
    }

    pub async fn open_documents(
        &mut self,
        api: &dyn EnrollmentApi,
        ctx: CallContext<'_>,
        enrollment_id: &str,
    ) -> Result<(), Notice> {
        let enrollment = self.require(enrollment_id)?;

        let documents = api
            .student_documents(ctx, &enrollment.student_id)
            .await
            .map_err(|e| {
                tracing::error!(student_id = %enrollment.student_id, error = %e, "Error fetching student documents");
                Notice::error(DOCUMENTS_FAILED)
            })?;

        self.view = ViewState::ViewingDocuments {
            enrollment,
            documents,
        };
        Ok(())
    }

    /// Ask the manager to confirm accepting the applicant.
    pub fn request_accept(&mut self, enrollment_id: &str) -> Result<(), Notice> {
        let enrollment = self.require(enrollment_id)?;
        if !enrollment.can_accept() {
            return Err(Notice::warning(DOCUMENTS_INCOMPLETE));
        }

        self.view = ViewState::ConfirmingAccept { enrollment };
        Ok(())
    }

    /// Submit an accept the manager has confirmed. Without a pending
    /// confirmation for this application, asks for one instead.
    pub async fn confirm_accept(
        &mut self,
        api: &dyn EnrollmentApi,
        ctx: CallContext<'_>,
        enrollment_id: &str,
    ) -> Result<Notice, Notice> {
        let enrollment = match &self.view {
            ViewState::ConfirmingAccept { enrollment } if enrollment.id == enrollment_id => {
                enrollment.clone()
            }
            _ => {
                self.request_accept(enrollment_id)?;
                return Err(Notice::warning(CONFIRMATION_REQUIRED));
            }
        };

        if !enrollment.can_accept() {
            return Err(Notice::warning(DOCUMENTS_INCOMPLETE));
        }

        api.accept_enrollment(ctx, &enrollment.id)
            .await
            .map_err(|e| {
                record_decision("accept", false);
                tracing::error!(enrollment_id = %enrollment.id, error = %e, "Error accepting student");
                Notice::error(ACCEPT_FAILED)
            })?;
        record_decision("accept", true);

        self.remove(&enrollment.id);
        self.view = ViewState::Closed;

        Ok(Notice::success(format!(
            "{} has been accepted successfully! They can now start their lessons.",
            enrollment.student_name
        )))
    }

    pub fn begin_refusal(&mut self, enrollment_id: &str) -> Result<(), Notice> {
        let enrollment = self.require(enrollment_id)?;
        self.view = ViewState::Refusing {
            enrollment,
            reason: String::new(),
        };
        Ok(())
    }

    /// Submit the refusal form. The entered text stays in the form on any
    /// failure; it is trimmed before being sent.
    pub async fn submit_refusal(
        &mut self,
        api: &dyn EnrollmentApi,
        ctx: CallContext<'_>,
        enrollment_id: &str,
        raw_reason: &str,
    ) -> Result<Notice, Notice> {
        let enrollment = match &self.view {
            ViewState::Refusing { enrollment, .. } if enrollment.id == enrollment_id => {
                enrollment.clone()
            }
            _ => {
                self.begin_refusal(enrollment_id)?;
                return Err(Notice::warning(REASON_REQUIRED));
            }
        };

        self.view = ViewState::Refusing {
            enrollment: enrollment.clone(),
            reason: raw_reason.to_string(),
        };

        let reason =
            RefusalReason::parse(raw_reason).ok_or_else(|| Notice::warning(REASON_REQUIRED))?;

        api.refuse_enrollment(ctx, &enrollment.id, &reason)
            .await
            .map_err(|e| {
                record_decision("refuse", false);
                tracing::error!(enrollment_id = %enrollment.id, error = %e, "Error refusing student");
                Notice::error(REFUSE_FAILED)
            })?;
        record_decision("refuse", true);

        self.remove(&enrollment.id);
        self.view = ViewState::Closed;

        Ok(Notice::success(format!(
            "{} has been refused. They have been notified with your reason.",
            enrollment.student_name
        )))
    }

    /// Close whatever is open; a half-typed refusal reason is discarded.
    pub fn close(&mut self) {
        self.view = ViewState::Closed;
    }
}

pub fn accept_prompt(student_name: &str) -> String {
    format!(
        "Are you sure you want to accept {}? This will make them an official student who can start lessons immediately.",
        student_name
    )
}
