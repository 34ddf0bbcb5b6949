use std::{env, str::FromStr};

use anyhow::{Context, ensure};
use rust_decimal::Decimal;

use crate::billing::BillingRates;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub static_dir: String,
    pub billing: BillingRates,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        let defaults = BillingRates::default();
        let billing = BillingRates {
            new_parts_markup: percent_var("INVOICE_NEW_PARTS_MARKUP", defaults.new_parts_markup)?,
            used_parts_markup: percent_var("INVOICE_USED_PARTS_MARKUP", defaults.used_parts_markup)?,
            tax_percent: percent_var("INVOICE_TAX_PERCENT", defaults.tax_percent)?,
        };

        Ok(Self {
            port,
            database_url,
            host,
            static_dir,
            billing,
        })
    }
}

fn percent_var(key: &str, default: Decimal) -> anyhow::Result<Decimal> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };
    let value = Decimal::from_str(raw.trim())
        .with_context(|| format!("{key} must be a decimal percentage, got {raw:?}"))?;
    ensure!(!value.is_sign_negative(), "{key} must not be negative");
    Ok(value)
}
