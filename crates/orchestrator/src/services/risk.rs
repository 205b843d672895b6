use gemini::{ModelGateway, StructuredRequest};
use lens_core::{RequestConfiguration, RiskAnalysis, RISK_ITEMS};
use serde::Deserialize;
use tracing::info;

use super::normalize::{clean_list, decode};
use crate::error::Result;
use crate::{prompts, schemas};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRisk {
    fatal_flaws: Option<Vec<String>>,
    mitigations: Option<Vec<String>>,
    viability_score: Option<f64>,
}

/// Score rounded and clamped to `0..=100`; missing scores count as 0
fn viability_score(raw: Option<f64>) -> u8 {
    raw.filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

pub async fn analyze_risk<G>(gateway: &G, config: &RequestConfiguration) -> Result<RiskAnalysis>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let request = StructuredRequest::new(
        prompts::risk_prompt(config.topic(), config.stage, config.focus),
        schemas::risk_schema(),
    );
    let response = gateway.generate_structured(request).await?;
    let raw: RawRisk = decode(response.value, "risk analysis")?;

    let analysis = RiskAnalysis {
        fatal_flaws: clean_list(raw.fatal_flaws).into_iter().take(RISK_ITEMS).collect(),
        mitigations: clean_list(raw.mitigations).into_iter().take(RISK_ITEMS).collect(),
        viability_score: viability_score(raw.viability_score),
    };

    info!(
        score = analysis.viability_score,
        tier = analysis.tier().headline(),
        "Risk analysis complete"
    );
    Ok(analysis)
}
