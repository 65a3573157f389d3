//! Finance settings of a hub.

use serde::{Deserialize, Serialize};

use crate::domain::types::{CurrencyCode, InvoicePrefix};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaymentSettings {
    pub default_currency: CurrencyCode,
    pub default_tax_rate: f64,
    pub invoice_prefix: InvoicePrefix,
    pub invoice_footer: String,
    pub payment_terms: String,
    pub stripe_publishable_key: String,
    pub paypal_client_id: String,
    pub auto_send_receipts: bool,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            default_currency: CurrencyCode::default(),
            default_tax_rate: 0.0,
            invoice_prefix: InvoicePrefix::default(),
            invoice_footer: String::new(),
            payment_terms: String::new(),
            stripe_publishable_key: String::new(),
            paypal_client_id: String::new(),
            auto_send_receipts: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_hub() {
        let settings = PaymentSettings::default();
        assert_eq!(settings.default_currency.as_str(), "USD");
        assert_eq!(settings.invoice_prefix.as_str(), "INV-");
        assert_eq!(settings.default_tax_rate, 0.0);
        assert!(settings.auto_send_receipts);
        assert!(settings.invoice_footer.is_empty());
    }
}
