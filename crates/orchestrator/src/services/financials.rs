use gemini::{ModelGateway, StructuredRequest};
use lens_core::{Currency, FinancialModel, RequestConfiguration, UnitMetrics};
use serde::Deserialize;
use tracing::{info, warn};

use super::normalize::{amount, decode, text_or_empty};
use crate::error::Result;
use crate::{prompts, schemas};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawModel {
    pricing_model: Option<String>,
    currency: Option<String>,
    metrics: Option<RawMetrics>,
    insight: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMetrics {
    price: Option<f64>,
    cac: Option<f64>,
    cogs: Option<f64>,
    users: Option<f64>,
}

impl From<RawMetrics> for UnitMetrics {
    fn from(raw: RawMetrics) -> Self {
        Self {
            price: amount(raw.price),
            cac: amount(raw.cac),
            cogs: amount(raw.cogs),
            users: amount(raw.users).round(),
        }
    }
}

fn currency(raw: Option<&str>) -> Currency {
    match raw {
        Some(symbol) => Currency::parse(symbol).unwrap_or_else(|| {
            warn!(currency = %symbol, "Unsupported currency, using $");
            Currency::Dollar
        }),
        None => Currency::Dollar,
    }
}

/// "Napkin math" unit economics estimate
pub async fn generate_financial_model<G>(
    gateway: &G,
    config: &RequestConfiguration,
) -> Result<FinancialModel>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let request = StructuredRequest::new(
        prompts::financial_model_prompt(config.topic(), config.stage),
        schemas::financial_model_schema(),
    );
    let response = gateway.generate_structured(request).await?;
    let raw: RawModel = decode(response.value, "financial model")?;

    let model = FinancialModel {
        pricing_model: text_or_empty(raw.pricing_model),
        currency: currency(raw.currency.as_deref()),
        metrics: raw.metrics.map(Into::into).unwrap_or_default(),
        insight: text_or_empty(raw.insight),
    };

    info!(
        pricing_model = %model.pricing_model,
        price = model.metrics.price,
        "Financial model generated"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_fallback() {
        assert_eq!(currency(Some("€")), Currency::Euro);
        assert_eq!(currency(Some("¥")), Currency::Dollar);
        assert_eq!(currency(None), Currency::Dollar);
    }

    #[test]
    fn test_metrics_are_non_negative() {
        let metrics: UnitMetrics = RawMetrics {
            price: Some(29.0),
            cac: Some(-10.0),
            cogs: None,
            users: Some(1200.4),
        }
        .into();
        assert_eq!(metrics.price, 29.0);
        assert_eq!(metrics.cac, 0.0);
        assert_eq!(metrics.cogs, 0.0);
        assert_eq!(metrics.users, 1200.0);
    }
}
