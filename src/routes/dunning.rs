use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::{Context, Tera};

use crate::forms::dunning::{ConfirmForm, ReminderForm, ScheduleForm};
use crate::repository::FinanceRepository;
use crate::routes::{NO_PERMISSIONS, flash_failure};
use crate::services::{ServiceError, dunning as dunning_service};

const DUNNING_PAGE: &str = "/dunning";

#[get("/dunning")]
pub async fn show_dunning(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match dunning_service::load_dunning_page(repo.get_ref(), &user).await {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "dunning",
                &server_config.auth_service_url,
            );
            context.insert("schedules", &data.schedules);
            context.insert("schedules_failed", &data.schedules_failed);
            context.insert("overdue_invoices", &data.overdue_invoices);
            context.insert("email_templates", &data.email_templates);
            context.insert("sms_templates", &data.sms_templates);
            context.insert("template_variables", &data.template_variables);

            render_template(&tera, "dunning/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error(NO_PERMISSIONS).send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to load dunning page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/dunning/schedules/add")]
pub async fn add_schedule(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    web::Form(form): web::Form<ScheduleForm>,
) -> impl Responder {
    match dunning_service::create_schedule(repo.get_ref(), &user, form).await {
        Ok(()) => {
            FlashMessage::success("Schedule created.").send();
            redirect(DUNNING_PAGE)
        }
        Err(err) => flash_failure(err, "create the schedule", DUNNING_PAGE),
    }
}

#[post("/dunning/schedules/modal/{schedule_id}")]
pub async fn schedule_modal(
    schedule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match dunning_service::load_schedule_modal(repo.get_ref(), &user, schedule_id.into_inner())
        .await
    {
        Ok(data) => {
            let mut context = Context::new();
            context.insert("schedule", &data.schedule);
            context.insert("email_templates", &data.email_templates);
            context.insert("sms_templates", &data.sms_templates);
            context.insert("template_variables", &data.template_variables);
            render_template(&tera, "dunning/modal_body.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            log::error!("Unauthorized to load schedule modal.");
            HttpResponse::Unauthorized().finish()
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load schedule modal: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/dunning/schedules/{schedule_id}/save")]
pub async fn save_schedule(
    schedule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    web::Form(form): web::Form<ScheduleForm>,
) -> impl Responder {
    match dunning_service::update_schedule(repo.get_ref(), &user, schedule_id.into_inner(), form)
        .await
    {
        Ok(()) => {
            FlashMessage::success("Schedule saved.").send();
            redirect(DUNNING_PAGE)
        }
        Err(err) => flash_failure(err, "save the schedule", DUNNING_PAGE),
    }
}

#[post("/dunning/schedules/{schedule_id}/toggle")]
pub async fn toggle_schedule(
    schedule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
) -> impl Responder {
    match dunning_service::toggle_schedule(repo.get_ref(), &user, schedule_id.into_inner()).await {
        Ok(active) => {
            let message = if active {
                "Schedule activated."
            } else {
                "Schedule paused."
            };
            FlashMessage::success(message).send();
            redirect(DUNNING_PAGE)
        }
        Err(err) => flash_failure(err, "update the schedule", DUNNING_PAGE),
    }
}

#[post("/dunning/schedules/{schedule_id}/delete")]
pub async fn delete_schedule(
    schedule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    web::Form(form): web::Form<ConfirmForm>,
) -> impl Responder {
    match dunning_service::delete_schedule(repo.get_ref(), &user, schedule_id.into_inner(), form)
        .await
    {
        Ok(()) => {
            FlashMessage::success("Schedule deleted.").send();
            redirect(DUNNING_PAGE)
        }
        Err(err) => flash_failure(err, "delete the schedule", DUNNING_PAGE),
    }
}

#[post("/dunning/send/{invoice_id}")]
pub async fn send_reminder(
    invoice_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    web::Form(form): web::Form<ReminderForm>,
) -> impl Responder {
    match dunning_service::send_reminder(repo.get_ref(), &user, invoice_id.into_inner(), form)
        .await
    {
        Ok(channel) => {
            FlashMessage::success(dunning_service::reminder_sent_message(channel)).send();
            redirect(DUNNING_PAGE)
        }
        Err(err) => flash_failure(err, "send the reminder", DUNNING_PAGE),
    }
}

#[post("/dunning/process")]
pub async fn process_reminders(
    user: AuthenticatedUser,
    repo: web::Data<FinanceRepository>,
    web::Form(form): web::Form<ConfirmForm>,
) -> impl Responder {
    match dunning_service::process_reminders(repo.get_ref(), &user, form).await {
        Ok(outcome) => {
            FlashMessage::success(dunning_service::reminders_sent_message(outcome)).send();
            redirect(DUNNING_PAGE)
        }
        Err(err) => flash_failure(err, "process reminders", DUNNING_PAGE),
    }
}
