//! Finance settings form.

use serde::Deserialize;
use validator::Validate;

use crate::domain::settings::PaymentSettings;
use crate::domain::types::{CurrencyCode, InvoicePrefix};
use crate::forms::{FormError, checkbox};

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data submitted from the finance settings page.
pub struct SettingsForm {
    #[serde(default)]
    pub default_currency: String,
    /// Percent as typed; blank means no tax.
    #[serde(default)]
    pub default_tax_rate: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub invoice_prefix: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub invoice_footer: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub payment_terms: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub stripe_publishable_key: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub paypal_client_id: String,
    #[serde(default)]
    pub auto_send_receipts: Option<String>,
}

/// Validated settings ready to be saved.
pub struct SettingsPayload {
    pub settings: PaymentSettings,
}

fn parse_tax_rate(raw: Option<&str>) -> Result<f64, FormError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && (0.0..=100.0).contains(rate))
        .ok_or(FormError::InvalidTaxRate)
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

impl TryFrom<SettingsForm> for SettingsPayload {
    type Error = FormError;

    fn try_from(form: SettingsForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let settings = PaymentSettings {
            default_currency: CurrencyCode::new(form.default_currency)
                .map_err(|_| FormError::InvalidCurrency)?,
            default_tax_rate: parse_tax_rate(form.default_tax_rate.as_deref())?,
            invoice_prefix: InvoicePrefix::new(form.invoice_prefix)
                .map_err(|_| FormError::InvalidPrefix)?,
            invoice_footer: trimmed(&form.invoice_footer),
            payment_terms: trimmed(&form.payment_terms),
            stripe_publishable_key: trimmed(&form.stripe_publishable_key),
            paypal_client_id: trimmed(&form.paypal_client_id),
            auto_send_receipts: checkbox(form.auto_send_receipts.as_deref()),
        };

        Ok(Self { settings })
    }
}

impl SettingsPayload {
    pub fn into_domain(self) -> PaymentSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SettingsForm {
        SettingsForm {
            default_currency: "eur".to_string(),
            default_tax_rate: Some("19.5".to_string()),
            invoice_prefix: "ACME-".to_string(),
            invoice_footer: " Thanks & see you <soon> ".to_string(),
            payment_terms: " Net 30 ".to_string(),
            auto_send_receipts: Some("on".to_string()),
            ..SettingsForm::default()
        }
    }

    #[test]
    fn form_is_normalized_and_text_kept_verbatim() {
        let settings = SettingsPayload::try_from(form()).unwrap().into_domain();

        assert_eq!(settings.default_currency.as_str(), "EUR");
        assert_eq!(settings.default_tax_rate, 19.5);
        assert_eq!(settings.invoice_prefix.as_str(), "ACME-");
        assert_eq!(settings.invoice_footer, "Thanks & see you <soon>");
        assert_eq!(settings.payment_terms, "Net 30");
        assert!(settings.auto_send_receipts);
    }

    #[test]
    fn tax_rate_must_be_a_percentage() {
        for rate in ["101", "-1", "abc", "NaN"] {
            let form = SettingsForm {
                default_tax_rate: Some(rate.to_string()),
                ..form()
            };
            assert!(matches!(
                SettingsPayload::try_from(form),
                Err(FormError::InvalidTaxRate)
            ));
        }
    }

    #[test]
    fn blank_tax_rate_means_zero() {
        let form = SettingsForm {
            default_tax_rate: Some(String::new()),
            ..form()
        };
        let settings = SettingsPayload::try_from(form).unwrap().into_domain();
        assert_eq!(settings.default_tax_rate, 0.0);
    }

    #[test]
    fn invalid_currency_is_rejected() {
        let form = SettingsForm {
            default_currency: "EURO".to_string(),
            ..form()
        };
        assert!(matches!(
            SettingsPayload::try_from(form),
            Err(FormError::InvalidCurrency)
        ));
    }

    #[test]
    fn overlong_prefix_fails_validation() {
        let form = SettingsForm {
            invoice_prefix: "X".repeat(21),
            ..form()
        };
        assert!(matches!(
            SettingsPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }
}
