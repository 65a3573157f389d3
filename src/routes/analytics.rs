use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::repository::FinanceRepository;
use crate::routes::NO_PERMISSIONS;
use crate::services::{ServiceError, analytics as analytics_service};

#[get("/analytics")]
pub async fn show_analytics(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match analytics_service::load_analytics(repo.get_ref(), &user).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "analytics",
                &server_config.auth_service_url,
            );
            context.insert("analytics", &data);

            render_template(&tera, "analytics/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(NO_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load analytics: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
