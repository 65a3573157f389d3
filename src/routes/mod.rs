//! HTTP handlers and the failure handling they share.

use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use pushkind_common::routes::redirect;

use crate::services::ServiceError;

pub mod accounting;
pub mod analytics;
pub mod dunning;
pub mod main;
pub mod settings;

/// Flash message shown when the user lacks the required role.
pub const NO_PERMISSIONS: &str = "Insufficient permissions.";

/// Shared fallback for failed mutations: flash and return to `back`.
pub(crate) fn flash_failure(err: ServiceError, action: &str, back: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error(NO_PERMISSIONS).send();
            redirect("/na")
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::NotFound => {
            FlashMessage::error("Record not found.").send();
            redirect(back)
        }
        err => {
            log::error!("Failed to {action}: {err}");
            FlashMessage::error(format!("Failed to {action}.")).send();
            redirect(back)
        }
    }
}
