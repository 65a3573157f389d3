//! Form toggling a single accounting sync setting.

use serde::Deserialize;

use crate::domain::accounting::SyncSetting;
use crate::forms::{FormError, checkbox};

#[derive(Debug, Deserialize)]
pub struct SyncToggleForm {
    pub setting: String,
    /// Requested state; absent means off.
    #[serde(default)]
    pub value: Option<String>,
}

pub struct SyncTogglePayload {
    pub setting: SyncSetting,
    pub enabled: bool,
}

impl TryFrom<SyncToggleForm> for SyncTogglePayload {
    type Error = FormError;

    fn try_from(form: SyncToggleForm) -> Result<Self, Self::Error> {
        let setting = form
            .setting
            .parse::<SyncSetting>()
            .map_err(|_| FormError::InvalidSyncSetting)?;

        Ok(Self {
            setting,
            enabled: checkbox(form.value.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_setting_and_value() {
        let payload = SyncTogglePayload::try_from(SyncToggleForm {
            setting: "auto_sync_invoices".to_string(),
            value: Some("true".to_string()),
        })
        .unwrap();

        assert_eq!(payload.setting, SyncSetting::AutoSyncInvoices);
        assert!(payload.enabled);
    }

    #[test]
    fn unknown_setting_is_rejected() {
        let result = SyncTogglePayload::try_from(SyncToggleForm {
            setting: "delete_everything".to_string(),
            value: None,
        });
        assert!(matches!(result, Err(FormError::InvalidSyncSetting)));
    }
}
