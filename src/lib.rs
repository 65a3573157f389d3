//! Finance screens of the pushkind hub: dunning, analytics, settings and
//! accounting sync, rendered server-side over the finance REST backend.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod forms;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

pub const SERVICE_ACCESS_ROLE: &str = "finance";
pub const SERVICE_ADMIN_ROLE: &str = "finance_admin";

#[cfg(feature = "server")]
mod server {
    use std::time::Duration;

    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use pushkind_common::middleware::RedirectUnauthorized;
    use pushkind_common::models::config::CommonServerConfig;
    use pushkind_common::routes::{logout, not_assigned};
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::{FinanceRepository, HttpRepository};
    use crate::routes::accounting::{disconnect, show_accounting, sync_all, toggle_sync_setting};
    use crate::routes::analytics::show_analytics;
    use crate::routes::dunning::{
        add_schedule, delete_schedule, process_reminders, save_schedule, schedule_modal,
        send_reminder, show_dunning, toggle_schedule,
    };
    use crate::routes::main::show_overview;
    use crate::routes::settings::{save_settings, show_settings};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let common_config = CommonServerConfig {
            auth_service_url: server_config.auth_service_url.to_string(),
            secret: server_config.secret.clone(),
        };

        let backend = HttpRepository::from_config(&server_config)
            .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

        let repo = FinanceRepository::new(backend, Duration::from_secs(server_config.cache_ttl_secs));

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        log::info!(
            "Starting finance service on {}:{} against {}",
            bind_address.0,
            bind_address.1,
            server_config.api_base_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(not_assigned)
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(show_overview)
                        .service(show_analytics)
                        .service(show_dunning)
                        .service(add_schedule)
                        .service(schedule_modal)
                        .service(save_schedule)
                        .service(toggle_schedule)
                        .service(delete_schedule)
                        .service(send_reminder)
                        .service(process_reminders)
                        .service(show_settings)
                        .service(save_settings)
                        .service(show_accounting)
                        .service(toggle_sync_setting)
                        .service(sync_all)
                        .service(disconnect)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(common_config.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
