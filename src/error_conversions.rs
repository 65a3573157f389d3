//! Error conversion glue between the domain, the backend client and the
//! shared service errors.
//!
//! The domain layer must not depend on service or repository error types, so
//! the conversions from [`TypeConstraintError`] and [`FormError`] live here.
//! Backend client errors are narrowed to the shared repository error before
//! they reach a [`ServiceError`].

use pushkind_common::repository::errors::RepositoryError as CommonRepositoryError;
use pushkind_common::services::errors::ServiceError;

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<RepositoryError> for CommonRepositoryError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => CommonRepositoryError::NotFound,
            RepositoryError::ValidationError(message) => {
                CommonRepositoryError::ValidationError(message)
            }
            RepositoryError::ConnectionError(message) => {
                CommonRepositoryError::ConnectionError(message)
            }
            other => CommonRepositoryError::Unexpected(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::from(CommonRepositoryError::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_backend_record_is_not_found() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
    }

    #[test]
    fn backend_failures_are_narrowed_to_shared_errors() {
        assert!(matches!(
            CommonRepositoryError::from(RepositoryError::ConnectionError("refused".to_string())),
            CommonRepositoryError::ConnectionError(message) if message == "refused"
        ));
        assert!(matches!(
            CommonRepositoryError::from(RepositoryError::RemoteError {
                status: 502,
                message: "upstream down".to_string(),
            }),
            CommonRepositoryError::Unexpected(message) if message.contains("upstream down")
        ));
    }

    #[test]
    fn form_errors_carry_the_user_message() {
        assert!(matches!(
            ServiceError::from(FormError::NotConfirmed),
            ServiceError::Form(message) if message == "Please confirm this action."
        ));
    }
}
