//! Form definitions backing the finance routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod accounting;
pub mod dunning;
pub mod settings;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Schedule name is required.")]
    InvalidName,

    #[error("Days after due must be a whole number of 0 or more.")]
    InvalidDaysAfterDue,

    #[error("Invalid template.")]
    InvalidTemplateId,

    #[error("Unknown reminder channel.")]
    InvalidChannel,

    #[error("Currency must be a three letter code.")]
    InvalidCurrency,

    #[error("Tax rate must be between 0 and 100.")]
    InvalidTaxRate,

    #[error("Invoice prefix is required.")]
    InvalidPrefix,

    #[error("Unknown sync setting.")]
    InvalidSyncSetting,

    #[error("Please confirm this action.")]
    NotConfirmed,
}

/// Interprets an HTML checkbox value; an unchecked box is not submitted.
pub(crate) fn checkbox(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("true" | "on" | "1")
    )
}
