use serde::Serialize;

use crate::domain::settings::PaymentSettings;

/// Data required to render the finance settings form.
#[derive(Debug, Serialize)]
pub struct SettingsPageData {
    pub settings: PaymentSettings,
    /// Set when stored settings could not be loaded and defaults are shown.
    pub load_failed: bool,
}
