use gemini::{ModelGateway, StructuredRequest};
use lens_core::{Competitor, CompetitorAnalysis, RequestConfiguration, COMPETITOR_COUNT};
use serde::Deserialize;
use tracing::info;

use super::normalize::{decode, non_blank, text_or_empty};
use crate::error::Result;
use crate::{prompts, schemas};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawAnalysis {
    competitors: Option<Vec<RawCompetitor>>,
    market_gap: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCompetitor {
    name: Option<String>,
    description: Option<String>,
    their_edge: Option<String>,
    your_edge: Option<String>,
}

impl RawCompetitor {
    fn into_competitor(self) -> Option<Competitor> {
        Some(Competitor {
            name: non_blank(self.name)?,
            description: text_or_empty(self.description),
            their_edge: text_or_empty(self.their_edge),
            your_edge: text_or_empty(self.your_edge),
        })
    }
}

/// Web-grounded scan of three real competitors
pub async fn analyze_competitors<G>(
    gateway: &G,
    config: &RequestConfiguration,
) -> Result<CompetitorAnalysis>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let request = StructuredRequest::new(
        prompts::competitors_prompt(config.topic()),
        schemas::competitors_schema(),
    )
    .grounded();
    let response = gateway.generate_structured(request).await?;
    let raw: RawAnalysis = decode(response.value, "competitor analysis")?;

    let competitors: Vec<Competitor> = raw
        .competitors
        .unwrap_or_default()
        .into_iter()
        .filter_map(RawCompetitor::into_competitor)
        .take(COMPETITOR_COUNT)
        .collect();

    info!(competitors = competitors.len(), "Competitor analysis complete");
    Ok(CompetitorAnalysis {
        competitors,
        market_gap: text_or_empty(raw.market_gap),
    })
}
