//! IronTrack client library
//!
//! Everything around the pure formula library: configuration, the demo
//! account directory, the AI report requestor and the session context.

pub mod auth;
pub mod config;
pub mod error;
pub mod requestor;
pub mod session;

pub use error::{ReportError, ReportResult};
pub use requestor::{ReportClient, ReportService};
pub use session::{Page, ReportSlot, Screen, Session};
