//! Wizard contract errors.
//!
//! User-correctable validation failures are *values*
//! ([`crate::validate::ValidationResult`]) and never surface here. This enum
//! only covers broken invariants - the cases that should fail loudly.

/// A violated wizard contract (a caller bug, not bad user input).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardError {
    /// A step index outside 1-4.
    #[error("invalid step index {0} (expected 1-4)")]
    InvalidStep(u8),

    /// `confirm_order` called while another step was active.
    #[error("order can only be confirmed from the summary step")]
    NotOnSummaryStep,
}
