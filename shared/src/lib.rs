//! IronTrack Shared Library
//!
//! Formula library, profile model, onboarding wizard and the AI report
//! contract. Pure and synchronous; used by the client crate and the WASM
//! bindings.

pub mod errors;
pub mod guidance;
pub mod health_metrics;
pub mod profile;
pub mod prompt;
pub mod report;
pub mod validation;
pub mod wizard;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use profile::{Experience, Goal, Occupation, Profile, ProfileDraft, TrainingType};
pub use report::{parse_report, Report};
pub use wizard::{Wizard, WizardStep};
