//! Business workflows invoked by the HTTP handlers.
//!
//! Services check roles, validate forms and talk to the repository traits.
//! They never touch `actix-web` types so they can be tested with mocks.

pub mod accounting;
pub mod analytics;
pub mod dunning;
pub mod overview;
pub mod settings;

pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

#[cfg(test)]
pub(crate) mod test_support {
    use pushkind_common::domain::auth::AuthenticatedUser;

    use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

    pub fn admin_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            hub_id: 42,
            name: "Admin".to_string(),
            roles: vec![
                SERVICE_ACCESS_ROLE.to_string(),
                SERVICE_ADMIN_ROLE.to_string(),
            ],
            exp: 0,
        }
    }

    pub fn viewer_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "viewer@example.com".to_string(),
            hub_id: 42,
            name: "Viewer".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    pub fn outsider_user() -> AuthenticatedUser {
        AuthenticatedUser {
            roles: vec!["warehouse".to_string()],
            ..viewer_user()
        }
    }
}
