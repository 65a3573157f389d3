use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::forms::accounting::SyncToggleForm;
use crate::models::config::ServerConfig;
use crate::repository::FinanceRepository;
use crate::routes::{NO_PERMISSIONS, flash_failure};
use crate::services::{ServiceError, accounting as accounting_service};

const ACCOUNTING_PAGE: &str = "/integrations/accounting";

#[derive(Deserialize)]
pub struct HistoryQuery {
    page: Option<usize>,
}

#[get("/integrations/accounting")]
pub async fn show_accounting(
    query: web::Query<HistoryQuery>,
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    flash_messages: IncomingFlashMessages,
    common_config: web::Data<CommonServerConfig>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let page = query.page.unwrap_or(1);

    match accounting_service::load_accounting_page(
        repo.get_ref(),
        &user,
        &server_config.accounting_provider,
        page,
    )
    .await
    {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "accounting",
                &common_config.auth_service_url,
            );
            context.insert("accounting", &data);

            render_template(&tera, "accounting/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(NO_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load accounting page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/integrations/accounting/toggle")]
pub async fn toggle_sync_setting(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    web::Form(form): web::Form<SyncToggleForm>,
) -> impl Responder {
    match accounting_service::toggle_sync_setting(repo.get_ref(), &user, form).await {
        Ok(()) => {
            FlashMessage::success("Sync settings updated.").send();
            redirect(ACCOUNTING_PAGE)
        }
        Err(err) => flash_failure(err, "update sync settings", ACCOUNTING_PAGE),
    }
}

#[post("/integrations/accounting/sync")]
pub async fn sync_all(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
) -> impl Responder {
    match accounting_service::sync_all(repo.get_ref(), &user).await {
        Ok(()) => {
            FlashMessage::success("Sync started.").send();
            redirect(ACCOUNTING_PAGE)
        }
        Err(err) => flash_failure(err, "start the sync", ACCOUNTING_PAGE),
    }
}

#[post("/integrations/accounting/disconnect")]
pub async fn disconnect(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
) -> impl Responder {
    match accounting_service::disconnect(repo.get_ref(), &user).await {
        Ok(()) => {
            FlashMessage::info("Accounting system disconnected.").send();
            redirect(ACCOUNTING_PAGE)
        }
        Err(err) => flash_failure(err, "disconnect", ACCOUNTING_PAGE),
    }
}
