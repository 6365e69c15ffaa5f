pub mod enrollment;
pub mod user;

pub use enrollment::{
    DocumentRecord, DocumentStatus, DocumentSummary, PendingEnrollment, RefusalReason,
    StudentDetails, StudentDocuments,
};
pub use user::AuthUser;
