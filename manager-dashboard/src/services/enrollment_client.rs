//! Enrollment backend client.
//!
//! Every call carries the manager's bearer token and the W3C trace context
//! of the current span.

use crate::config::EnrollmentServiceSettings;
use crate::models::enrollment::{
    PendingEnrollment, PendingEnrollmentList, RefusalReason, StudentDetails, StudentDocuments,
};
use crate::services::metrics::record_backend_call;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use service_core::observability::{TracedClientExt, TracedRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Per-call context: the bearer credential and the inbound request id.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    pub access_token: &'a str,
    pub request_id: Option<&'a str>,
}

impl<'a> CallContext<'a> {
    pub fn new(access_token: &'a str) -> Self {
        Self {
            access_token,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<&'a str>) -> Self {
        self.request_id = request_id;
        self
    }
}

/// The backend operations the dashboard consumes.
#[async_trait]
pub trait EnrollmentApi: Send + Sync {
    async fn pending_enrollments(
        &self,
        ctx: CallContext<'_>,
    ) -> Result<Vec<PendingEnrollment>, EnrollmentError>;

    async fn student_details(
        &self,
        ctx: CallContext<'_>,
        student_id: &str,
    ) -> Result<StudentDetails, EnrollmentError>;

    async fn student_documents(
        &self,
        ctx: CallContext<'_>,
        student_id: &str,
    ) -> Result<StudentDocuments, EnrollmentError>;

    async fn accept_enrollment(
        &self,
        ctx: CallContext<'_>,
        enrollment_id: &str,
    ) -> Result<(), EnrollmentError>;

    async fn refuse_enrollment(
        &self,
        ctx: CallContext<'_>,
        enrollment_id: &str,
        reason: &RefusalReason,
    ) -> Result<(), EnrollmentError>;
}

pub struct EnrollmentClient {
    client: Client,
    settings: EnrollmentServiceSettings,
}

impl EnrollmentClient {
    pub fn new(settings: EnrollmentServiceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_base(), path)
    }

    fn prepare(&self, request: TracedRequest, ctx: CallContext<'_>) -> TracedRequest {
        request
            .bearer_auth(ctx.access_token)
            .request_id(ctx.request_id)
            .timeout(self.settings.timeout())
    }

    /// Send and return the body of a successful response.
    async fn execute(
        &self,
        operation: &str,
        request: TracedRequest,
    ) -> Result<String, EnrollmentError> {
        let result = send_checked(request).await;

        record_backend_call(operation, result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(operation = %operation, error = %e, "Enrollment backend call failed");
        }
        result
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: CallContext<'_>,
        operation: &str,
        path: &str,
    ) -> Result<T, EnrollmentError> {
        let url = self.url(path);
        let request = self.prepare(self.client.traced_get(&url), ctx);
        let body = self.execute(operation, request).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(operation = %operation, url = %url, error = %e, "Undecodable backend response");
            EnrollmentError::Decode(e)
        })
    }
}

async fn send_checked(request: TracedRequest) -> Result<String, EnrollmentError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(EnrollmentError::Status { status, body })
    }
}

#[async_trait]
impl EnrollmentApi for EnrollmentClient {
    async fn pending_enrollments(
        &self,
        ctx: CallContext<'_>,
    ) -> Result<Vec<PendingEnrollment>, EnrollmentError> {
        let list: PendingEnrollmentList = self
            .get_json(ctx, "list_pending", "manager/pending-enrollments-enhanced")
            .await?;
        Ok(list.enrollments)
    }

    async fn student_details(
        &self,
        ctx: CallContext<'_>,
        student_id: &str,
    ) -> Result<StudentDetails, EnrollmentError> {
        self.get_json(
            ctx,
            "student_details",
            &format!("manager/student-details/{}", student_id),
        )
        .await
    }

    async fn student_documents(
        &self,
        ctx: CallContext<'_>,
        student_id: &str,
    ) -> Result<StudentDocuments, EnrollmentError> {
        self.get_json(
            ctx,
            "student_documents",
            &format!("manager/student-documents/{}", student_id),
        )
        .await
    }

    async fn accept_enrollment(
        &self,
        ctx: CallContext<'_>,
        enrollment_id: &str,
    ) -> Result<(), EnrollmentError> {
        let url = self.url(&format!("manager/enrollments/{}/accept", enrollment_id));
        let request = self
            .prepare(self.client.traced_post(&url), ctx)
            .json(&serde_json::json!({}));

        self.execute("accept", request).await?;
        tracing::info!(enrollment_id = %enrollment_id, "Enrollment accepted");
        Ok(())
    }

    async fn refuse_enrollment(
        &self,
        ctx: CallContext<'_>,
        enrollment_id: &str,
        reason: &RefusalReason,
    ) -> Result<(), EnrollmentError> {
        let url = self.url(&format!("manager/enrollments/{}/refuse", enrollment_id));
        let form = reqwest::multipart::Form::new().text("reason", reason.as_str().to_string());
        let request = self
            .prepare(self.client.traced_post(&url), ctx)
            .multipart(form);

        self.execute("refuse", request).await?;
        tracing::info!(enrollment_id = %enrollment_id, "Enrollment refused");
        Ok(())
    }
}
