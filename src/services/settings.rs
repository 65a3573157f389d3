//! Finance settings services.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::ensure_role;

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::settings::PaymentSettings;
use crate::domain::types::HubId;
use crate::dto::settings::SettingsPageData;
use crate::forms::settings::{SettingsForm, SettingsPayload};
use crate::repository::errors::RepositoryError;
use crate::repository::{SettingsReader, SettingsWriter};
use crate::services::ServiceResult;

/// Loads the stored settings, falling back to defaults.
pub async fn load_settings<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<SettingsPageData>
where
    R: SettingsReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;

    let (settings, load_failed) = match repo.get_payment_settings(hub_id).await {
        Ok(settings) => (settings, false),
        Err(RepositoryError::NotFound) => (PaymentSettings::default(), false),
        Err(err) => {
            log::error!("Failed to load payment settings: {err}");
            (PaymentSettings::default(), true)
        }
    };

    Ok(SettingsPageData {
        settings,
        load_failed,
    })
}

/// Validates the form and replaces the stored settings.
pub async fn save_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SettingsForm,
) -> ServiceResult<()>
where
    R: SettingsWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let settings = SettingsPayload::try_from(form)?.into_domain();

    let hub_id = HubId::new(user.hub_id)?;

    repo.save_payment_settings(hub_id, &settings).await?;

    Ok(())
}
