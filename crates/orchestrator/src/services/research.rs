//! Web-grounded market research for a topic.

use std::collections::HashMap;

use gemini::{GroundingCitation, ModelGateway, StructuredRequest};
use lens_core::{
    BusinessInsight, RequestConfiguration, ResearchResult, SearchResultItem, Swot, TrendData,
    TrendDirection, DEFAULT_TREND_SERIES, MAX_FACTS, TREND_POINTS,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::normalize::{clean_list, decode, non_blank};
use crate::error::Result;
use crate::{prompts, schemas};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawResearch {
    facts: Option<Vec<String>>,
    image_prompt: Option<String>,
    insights: Option<RawInsights>,
    trend: Option<RawTrend>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInsights {
    swot: Option<RawSwot>,
    pivots: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSwot {
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    opportunities: Option<Vec<String>>,
    threats: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTrend {
    label: Option<String>,
    value: Option<String>,
    data: Option<Vec<f64>>,
    direction: Option<String>,
}

impl From<RawInsights> for BusinessInsight {
    fn from(raw: RawInsights) -> Self {
        let swot = raw.swot.unwrap_or_default();
        Self {
            swot: Swot {
                strengths: clean_list(swot.strengths),
                weaknesses: clean_list(swot.weaknesses),
                opportunities: clean_list(swot.opportunities),
                threats: clean_list(swot.threats),
            },
            pivots: clean_list(raw.pivots),
        }
    }
}

impl From<RawTrend> for TrendData {
    fn from(raw: RawTrend) -> Self {
        let defaults = TrendData::default();
        Self {
            label: non_blank(raw.label).unwrap_or(defaults.label),
            value: non_blank(raw.value).unwrap_or(defaults.value),
            data: normalize_series(&raw.data.unwrap_or_default()),
            direction: raw
                .direction
                .as_deref()
                .and_then(TrendDirection::parse)
                .unwrap_or_default(),
        }
    }
}

/// Exactly [`TREND_POINTS`] values in `0..=100`.
///
/// Extra points are dropped, short series are padded with their last
/// value, and an empty series falls back to the default curve.
pub fn normalize_series(data: &[f64]) -> Vec<f64> {
    let mut points: Vec<f64> = data
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 100.0))
        .take(TREND_POINTS)
        .collect();

    match points.last().copied() {
        Some(last) => {
            points.resize(TREND_POINTS, last);
            points
        }
        None => DEFAULT_TREND_SERIES.to_vec(),
    }
}

/// Grounding sources unique by url.
///
/// The first occurrence fixes the position; a later duplicate replaces the
/// title. Sources missing a title or url are skipped.
pub fn dedupe_citations(citations: &[GroundingCitation]) -> Vec<SearchResultItem> {
    let mut results: Vec<SearchResultItem> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for citation in citations {
        let url = citation.uri.trim();
        let title = citation.title.trim();
        if url.is_empty() || title.is_empty() {
            continue;
        }

        match positions.get(url) {
            Some(&idx) => results[idx].title = title.to_string(),
            None => {
                positions.insert(url.to_string(), results.len());
                results.push(SearchResultItem {
                    title: title.to_string(),
                    url: url.to_string(),
                });
            }
        }
    }

    results
}

pub async fn research_topic<G>(gateway: &G, config: &RequestConfiguration) -> Result<ResearchResult>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;
    let topic = config.topic();

    info!(
        topic = %topic,
        stage = config.stage.as_str(),
        style = config.style.as_str(),
        focus = config.focus.as_str(),
        "Researching topic"
    );

    let request = StructuredRequest::new(
        prompts::research_prompt(topic, config.stage, config.style, config.focus),
        schemas::research_schema(),
    )
    .grounded();

    let response = gateway.generate_structured(request).await?;
    let raw: RawResearch = decode(response.value, "research")?;

    let facts: Vec<String> = clean_list(raw.facts).into_iter().take(MAX_FACTS).collect();
    let image_prompt = non_blank(raw.image_prompt).unwrap_or_else(|| {
        debug!("Research reply had no image prompt, using fallback");
        prompts::fallback_image_prompt(topic, config.stage, config.style, config.focus)
    });
    let search_results = dedupe_citations(&response.citations);

    info!(
        facts = facts.len(),
        sources = search_results.len(),
        "Research complete"
    );

    Ok(ResearchResult {
        image_prompt,
        facts,
        search_results,
        insights: raw.insights.map(Into::into).unwrap_or_default(),
        trend: raw.trend.map(Into::into).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cite(title: &str, uri: &str) -> GroundingCitation {
        GroundingCitation {
            title: title.to_string(),
            uri: uri.to_string(),
        }
    }

    #[test]
    fn test_dedupe_keeps_first_position_last_title() {
        let results = dedupe_citations(&[
            cite("A", "https://a.example"),
            cite("B", "https://b.example"),
            cite("A2", "https://a.example"),
            cite("", "https://c.example"),
            cite("D", ""),
        ]);

        assert_eq!(
            results,
            vec![
                SearchResultItem {
                    title: "A2".into(),
                    url: "https://a.example".into()
                },
                SearchResultItem {
                    title: "B".into(),
                    url: "https://b.example".into()
                },
            ]
        );
    }

    #[test]
    fn test_normalize_series() {
        assert_eq!(normalize_series(&[]), DEFAULT_TREND_SERIES.to_vec());
        assert_eq!(
            normalize_series(&[10.0, 120.0, -5.0]),
            vec![10.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(normalize_series(&[1.0; 9]).len(), TREND_POINTS);
        assert_eq!(normalize_series(&[f64::NAN]), DEFAULT_TREND_SERIES.to_vec());
    }

    #[test]
    fn test_trend_defaults_fill_blank_fields() {
        let trend: TrendData = RawTrend {
            label: Some("  ".into()),
            value: None,
            data: Some(vec![50.0; 7]),
            direction: Some("UP".into()),
        }
        .into();

        assert_eq!(trend.label, "Market Activity");
        assert_eq!(trend.value, "Stable");
        assert_eq!(trend.direction, TrendDirection::Up);
        assert_eq!(trend.data, vec![50.0; 7]);
    }
}
