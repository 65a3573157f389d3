use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::repository::FinanceRepository;
use crate::routes::NO_PERMISSIONS;
use crate::services::{ServiceError, overview as overview_service};

#[get("/")]
pub async fn show_overview(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match overview_service::load_overview(repo.get_ref(), &user).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "overview",
                &server_config.auth_service_url,
            );
            context.insert("overview", &data);

            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(NO_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load overview: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
