//! Report generation error handling
//!
//! Every failure of the report pipeline ends at the session boundary as a
//! [`ReportError`]. None of them are fatal; the session keeps its previous
//! state and the user may retry.

use irontrack_shared::ReportFormatError;
use thiserror::Error;

/// Why a report could not be produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Transport failure or non-2xx response
    #[error("Report service request failed: {0}")]
    Network(String),

    #[error("Report service did not answer within {secs}s")]
    Timeout { secs: u64 },

    /// The service answered but the body is not a usable report
    #[error(transparent)]
    Format(#[from] ReportFormatError),

    /// Dropped because the user left the report page or logged out
    #[error("Report generation was cancelled")]
    Cancelled,

    /// Dropped because a newer request was issued
    #[error("Report request {seq} was superseded by a newer one")]
    Superseded { seq: u64 },

    #[error("Report service API key is not configured")]
    NotConfigured,

    #[error("No profile to generate a report for")]
    NoProfile,

    /// Reports are only requested from the report page
    #[error("Report generation requires the report page")]
    NotOnReportPage,
}

impl ReportError {
    /// Message shown to the user in place of the report
    pub fn user_message(&self) -> &'static str {
        match self {
            ReportError::Network(_) => {
                "Failed to generate report. Check your connection and try again."
            }
            ReportError::Timeout { .. } => "The report is taking too long. Please try again.",
            ReportError::Format(_) => {
                "The report came back incomplete. Please try again."
            }
            ReportError::Cancelled | ReportError::Superseded { .. } => {
                "Report generation was cancelled."
            }
            ReportError::NotConfigured => "AI reports are not available right now.",
            ReportError::NoProfile => "Complete your profile to get a report.",
            ReportError::NotOnReportPage => "Open the report page to generate a report.",
        }
    }

    /// Whether offering a manual retry makes sense
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReportError::Network(_) | ReportError::Timeout { .. } | ReportError::Format(_)
        )
    }
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;
