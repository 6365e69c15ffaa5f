//! Render-ready projections of [`DashboardState`] for the templates.

use crate::dashboard::badge::{
    days_pending_badge, document_status_badge, document_summary_badge, Badge,
};
use crate::dashboard::state::{accept_prompt, DashboardState, Notice, ViewState};
use crate::models::enrollment::{
    DocumentRecord, PendingEnrollment, StudentDetails, StudentDocuments,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NOT_PROVIDED: &str = "Not provided";
const NOT_SPECIFIED: &str = "Not specified";
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub struct DashboardView {
    pub loaded: bool,
    pub pending_count: usize,
    pub load_error: Option<String>,
    pub notice: Option<Notice>,
    pub rows: Vec<EnrollmentRow>,
    pub modal: Option<ModalView>,
}

pub struct EnrollmentRow {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub documents: Badge,
    pub days: Badge,
    pub can_accept: bool,
}

pub enum ModalView {
    Details(DetailsView),
    Documents(DocumentsView),
    ConfirmAccept(ConfirmAcceptView),
    Refusal(RefusalView),
}

pub struct DetailsView {
    pub enrollment_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: String,
    pub gender: String,
    pub school_name: String,
    pub status_label: String,
    pub applied_on: String,
    pub documents: Vec<DocumentStatusRow>,
}

pub struct DocumentStatusRow {
    pub label: String,
    pub badge: Badge,
}

pub struct DocumentsView {
    pub enrollment_id: String,
    pub student_name: String,
    pub can_accept: bool,
    pub cards: Vec<DocumentCard>,
}

pub struct DocumentCard {
    pub title: String,
    pub badge: Badge,
    pub file: Option<FileView>,
}

pub struct FileView {
    pub url: String,
    pub name: String,
    pub size_label: String,
    pub uploaded_on: String,
    pub is_image: bool,
    pub refusal_reason: Option<String>,
}

pub struct ConfirmAcceptView {
    pub enrollment_id: String,
    pub message: String,
}

pub struct RefusalView {
    pub enrollment_id: String,
    pub student_name: String,
    pub reason: String,
    pub submit_disabled: bool,
}

impl DashboardView {
    pub fn build(state: &DashboardState, notice: Option<Notice>) -> Self {
        Self {
            loaded: state.loaded,
            pending_count: state.enrollments.len(),
            load_error: state.load_error.clone(),
            notice,
            rows: state.enrollments.iter().map(EnrollmentRow::from).collect(),
            modal: ModalView::build(&state.view),
        }
    }
}

impl From<&PendingEnrollment> for EnrollmentRow {
    fn from(enrollment: &PendingEnrollment) -> Self {
        Self {
            id: enrollment.id.clone(),
            student_id: enrollment.student_id.clone(),
            name: enrollment.student_name.clone(),
            email: enrollment.student_email.clone(),
            phone: enrollment.student_phone.clone().unwrap_or_default(),
            documents: document_summary_badge(&enrollment.document_summary),
            days: days_pending_badge(enrollment.days_pending),
            can_accept: enrollment.can_accept(),
        }
    }
}

impl ModalView {
    fn build(view: &ViewState) -> Option<Self> {
        match view {
            ViewState::Closed => None,
            ViewState::ViewingDetails {
                enrollment,
                details,
            } => Some(ModalView::Details(DetailsView::new(enrollment, details))),
            ViewState::ViewingDocuments {
                enrollment,
                documents,
            } => Some(ModalView::Documents(DocumentsView::new(
                enrollment, documents,
            ))),
            ViewState::ConfirmingAccept { enrollment } => {
                Some(ModalView::ConfirmAccept(ConfirmAcceptView {
                    enrollment_id: enrollment.id.clone(),
                    message: accept_prompt(&enrollment.student_name),
                }))
            }
            ViewState::Refusing { enrollment, reason } => Some(ModalView::Refusal(RefusalView {
                enrollment_id: enrollment.id.clone(),
                student_name: enrollment.student_name.clone(),
                reason: reason.clone(),
                submit_disabled: reason.trim().is_empty(),
            })),
        }
    }
}

impl DetailsView {
    fn new(enrollment: &PendingEnrollment, details: &StudentDetails) -> Self {
        let student = &details.student;
        Self {
            enrollment_id: enrollment.id.clone(),
            full_name: student.full_name(),
            email: student.email.clone(),
            phone: or_placeholder(student.phone.as_deref(), NOT_PROVIDED),
            address: or_placeholder(student.address.as_deref(), NOT_PROVIDED),
            date_of_birth: or_placeholder(student.date_of_birth.as_deref(), NOT_PROVIDED),
            gender: capitalize_words(&or_placeholder(student.gender.as_deref(), NOT_SPECIFIED)),
            school_name: details.school_name.clone(),
            status_label: status_label(&details.enrollment.enrollment_status),
            applied_on: details
                .enrollment
                .created_at
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
            documents: details
                .documents
                .iter()
                .map(|(doc_type, entry)| DocumentStatusRow {
                    label: capitalize_words(&doc_type.replace('_', " ")),
                    badge: document_status_badge(entry.status, "Not Uploaded"),
                })
                .collect(),
        }
    }
}

impl DocumentsView {
    fn new(enrollment: &PendingEnrollment, documents: &StudentDocuments) -> Self {
        let student_name = if documents.student.name.is_empty() {
            enrollment.student_name.clone()
        } else {
            documents.student.name.clone()
        };

        Self {
            enrollment_id: enrollment.id.clone(),
            student_name,
            can_accept: enrollment.can_accept(),
            cards: documents.documents.iter().map(DocumentCard::from).collect(),
        }
    }
}

impl From<&DocumentRecord> for DocumentCard {
    fn from(record: &DocumentRecord) -> Self {
        let title = if record.document_type_display.is_empty() {
            capitalize_words(&record.document_type.replace('_', " "))
        } else {
            record.document_type_display.clone()
        };

        let file = record
            .file_url
            .as_deref()
            .filter(|_| record.has_file())
            .map(|url| FileView {
                url: url.to_string(),
                name: record.file_name.clone().unwrap_or_default(),
                size_label: record.file_size.map(format_megabytes).unwrap_or_default(),
                uploaded_on: record
                    .upload_date
                    .as_deref()
                    .map(format_date)
                    .unwrap_or_default(),
                is_image: is_image_url(url),
                refusal_reason: record
                    .refusal_reason
                    .clone()
                    .filter(|reason| !reason.trim().is_empty()),
            });

        Self {
            title,
            badge: document_status_badge(record.status, "Missing"),
            file,
        }
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `pending_approval` → `PENDING APPROVAL`
pub fn status_label(status: &str) -> String {
    status.replace('_', " ").to_uppercase()
}

/// Calendar date of a backend timestamp; unparseable input is shown as is.
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Whether the file behind `url` can be shown inline as a thumbnail.
pub fn is_image_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}
