//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! non-negative trigger offsets, bounded plain-text names) so that once a value
//! reaches the domain layer it can be treated as trusted. Text is stored as
//! typed; HTML escaping happens in the templates.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided string is longer than the allowed number of characters.
    #[error("value cannot be longer than {0} characters")]
    TooLong(usize),
    /// Provided string contains control characters.
    #[error("value cannot contain control characters")]
    ControlCharacters,
    /// Provided day offset is negative.
    #[error("days after due date cannot be negative")]
    NegativeDays,
    /// Currency code is not a three letter ISO code.
    #[error("invalid currency code")]
    InvalidCurrency,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(HubId, "Unique identifier for a hub (backend workspace).");
id_newtype!(ScheduleId, "Unique identifier for a dunning schedule.");
id_newtype!(InvoiceId, "Unique identifier for an invoice.");
id_newtype!(TemplateId, "Unique identifier for an email or SMS template.");
id_newtype!(PaymentId, "Unique identifier for a payment.");

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Macro to generate newtypes over trimmed, non-empty, single-line text with
/// an upper bound on its length in characters.
macro_rules! plain_text_newtype {
    ($name:ident, $max_chars:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub const MAX_CHARS: usize = $max_chars;

            /// Trims the value and checks it is non-empty, single-line and short enough.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?.into_inner();
                if inner.chars().count() > Self::MAX_CHARS {
                    return Err(TypeConstraintError::TooLong(Self::MAX_CHARS));
                }
                if inner.chars().any(char::is_control) {
                    return Err(TypeConstraintError::ControlCharacters);
                }
                Ok(Self(inner))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

plain_text_newtype!(
    ScheduleName,
    255,
    "Dunning schedule name as typed by the user, trimmed and non-empty."
);

plain_text_newtype!(
    InvoicePrefix,
    20,
    "Prefix prepended to generated invoice numbers."
);

impl Default for InvoicePrefix {
    fn default() -> Self {
        Self("INV-".to_string())
    }
}

/// Number of days after the due date at which a schedule fires.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DaysAfterDue(i32);

impl DaysAfterDue {
    /// Creates a trigger offset ensuring it is not negative.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value < 0 {
            return Err(TypeConstraintError::NegativeDays);
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for DaysAfterDue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for DaysAfterDue {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Upper-cased three letter ISO 4217 currency code.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validates and upper-cases a currency code.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let code = value.into().trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(TypeConstraintError::InvalidCurrency)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_string())
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery channel for a payment reminder.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReminderChannel {
    Email,
    Sms,
}

impl ReminderChannel {
    /// Wire value sent to the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReminderChannel::Email => "email",
            ReminderChannel::Sms => "sms",
        }
    }

    /// Human readable label used in notifications.
    pub const fn label(self) -> &'static str {
        match self {
            ReminderChannel::Email => "Email",
            ReminderChannel::Sms => "SMS",
        }
    }
}

impl Display for ReminderChannel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderChannel {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(ReminderChannel::Email),
            "sms" => Ok(ReminderChannel::Sms),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown reminder channel `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(ScheduleId::new(1).is_ok());
        assert_eq!(ScheduleId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(TemplateId::new(-4), Err(TypeConstraintError::NonPositiveId));
    }

    #[test]
    fn days_after_due_rejects_negative_values() {
        assert_eq!(DaysAfterDue::new(0).map(DaysAfterDue::get), Ok(0));
        assert_eq!(DaysAfterDue::new(-1), Err(TypeConstraintError::NegativeDays));
    }

    #[test]
    fn schedule_name_is_trimmed_plain_text() {
        let name = ScheduleName::new("  7 days overdue ").expect("valid name");
        assert_eq!(name.as_str(), "7 days overdue");

        assert_eq!(ScheduleName::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn markup_characters_are_kept_verbatim() {
        let name = ScheduleName::new("Tom & Jerry").expect("valid name");
        assert_eq!(name.as_str(), "Tom & Jerry");

        let name = ScheduleName::new("Tom & Jerry <3 days").expect("valid name");
        assert_eq!(name.as_str(), "Tom & Jerry <3 days");
        assert_eq!(
            ScheduleName::new(name.as_str()).expect("valid name"),
            name
        );
    }

    #[test]
    fn schedule_name_length_and_line_breaks_are_bounded() {
        assert!(ScheduleName::new("x".repeat(ScheduleName::MAX_CHARS)).is_ok());
        assert_eq!(
            ScheduleName::new("x".repeat(ScheduleName::MAX_CHARS + 1)),
            Err(TypeConstraintError::TooLong(ScheduleName::MAX_CHARS))
        );
        assert_eq!(
            ScheduleName::new("first\nsecond"),
            Err(TypeConstraintError::ControlCharacters)
        );
        assert_eq!(
            InvoicePrefix::new("X".repeat(21)),
            Err(TypeConstraintError::TooLong(20))
        );
    }

    #[test]
    fn currency_code_is_normalized() {
        assert_eq!(CurrencyCode::new(" eur ").expect("valid code").as_str(), "EUR");
        assert!(CurrencyCode::new("EURO").is_err());
        assert!(CurrencyCode::new("U$D").is_err());
    }

    #[test]
    fn reminder_channel_parses_case_insensitively() {
        assert_eq!("Email".parse::<ReminderChannel>(), Ok(ReminderChannel::Email));
        assert_eq!("sms".parse::<ReminderChannel>(), Ok(ReminderChannel::Sms));
        assert!("fax".parse::<ReminderChannel>().is_err());
    }
}
