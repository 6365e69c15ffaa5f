//! Badge selection for document summaries, document statuses and wait times.

use crate::models::enrollment::{DocumentStatus, DocumentSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Secondary,
    Warning,
    Info,
    Success,
    Danger,
}

impl Tone {
    pub fn css_class(&self) -> &'static str {
        match self {
            Tone::Secondary => "bg-secondary",
            Tone::Warning => "bg-warning",
            Tone::Info => "bg-info",
            Tone::Success => "bg-success",
            Tone::Danger => "bg-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

impl Badge {
    fn new(label: impl Into<String>, tone: Tone) -> Self {
        Self {
            label: label.into(),
            tone,
        }
    }

    pub fn css_class(&self) -> &'static str {
        self.tone.css_class()
    }
}

/// Completeness badge. Precedence: nothing uploaded, then incomplete, then
/// ready for review, then complete.
pub fn summary_badge(uploaded: u32, required: u32, ready_for_decision: bool) -> Badge {
    if uploaded == 0 {
        Badge::new("No Documents", Tone::Secondary)
    } else if uploaded < required {
        Badge::new(
            format!("Incomplete ({}/{})", uploaded, required),
            Tone::Warning,
        )
    } else if ready_for_decision {
        Badge::new("Ready for Review", Tone::Info)
    } else {
        Badge::new(format!("Complete ({}/{})", uploaded, required), Tone::Success)
    }
}

pub fn document_summary_badge(summary: &DocumentSummary) -> Badge {
    summary_badge(
        summary.total_uploaded,
        summary.total_required,
        summary.ready_for_decision,
    )
}

/// Per-document badge. `missing_label` is what a not-uploaded document
/// shows; the other statuses show their name uppercased.
pub fn document_status_badge(status: DocumentStatus, missing_label: &str) -> Badge {
    match status {
        DocumentStatus::Accepted => Badge::new("ACCEPTED", Tone::Success),
        DocumentStatus::Refused => Badge::new("REFUSED", Tone::Danger),
        DocumentStatus::Pending => Badge::new("PENDING", Tone::Warning),
        DocumentStatus::NotUploaded => Badge::new(missing_label, Tone::Secondary),
    }
}

pub fn days_pending_badge(days: i64) -> Badge {
    let tone = if days > 7 {
        Tone::Danger
    } else if days > 3 {
        Tone::Warning
    } else {
        Tone::Success
    };
    Badge::new(format!("{} days", days), tone)
}
