//! Markdown strategy report assembled from the artifacts of a topic.

use std::fmt;

use lens_core::{
    BusinessFocus, BusinessStage, FinancialModel, ResearchResult, RiskAnalysis,
};

#[derive(Debug, Clone)]
pub struct StrategyReport<'a> {
    topic: &'a str,
    stage: BusinessStage,
    focus: BusinessFocus,
    research: &'a ResearchResult,
    risk: Option<&'a RiskAnalysis>,
    financials: Option<&'a FinancialModel>,
}

impl<'a> StrategyReport<'a> {
    pub fn new(
        topic: &'a str,
        stage: BusinessStage,
        focus: BusinessFocus,
        research: &'a ResearchResult,
    ) -> Self {
        Self {
            topic,
            stage,
            focus,
            research,
            risk: None,
            financials: None,
        }
    }

    pub fn with_risk(mut self, risk: &'a RiskAnalysis) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn with_financials(mut self, financials: &'a FinancialModel) -> Self {
        self.financials = Some(financials);
        self
    }
}

fn bullets(out: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    Ok(())
}

impl fmt::Display for StrategyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let swot = &self.research.insights.swot;

        writeln!(f, "# SoloPreneur Lens: Strategy Report")?;
        writeln!(f, "**Topic:** {}", self.topic.trim())?;
        writeln!(
            f,
            "**Stage:** {} | **Focus:** {}",
            self.stage.as_str(),
            self.focus.as_str()
        )?;

        writeln!(f, "\n## Key Market Facts")?;
        bullets(f, &self.research.facts)?;

        writeln!(f, "\n## SWOT Analysis")?;
        for (heading, items) in [
            ("Strengths", &swot.strengths),
            ("Weaknesses", &swot.weaknesses),
            ("Opportunities", &swot.opportunities),
            ("Threats", &swot.threats),
        ] {
            writeln!(f, "**{}:**", heading)?;
            bullets(f, items)?;
            writeln!(f)?;
        }

        if let Some(risk) = self.risk {
            writeln!(f, "## Risk Analysis")?;
            writeln!(
                f,
                "**Viability Score:** {}/100 ({})",
                risk.viability_score,
                risk.tier().headline()
            )?;
            writeln!(f, "**Fatal Flaws:**")?;
            bullets(f, &risk.fatal_flaws)?;
            writeln!(f)?;
        }

        if let Some(model) = self.financials {
            let symbol = model.currency.symbol();
            writeln!(f, "## Financial Estimates")?;
            writeln!(
                f,
                "**Price:** {}{} | **CAC:** {}{}",
                symbol, model.metrics.price, symbol, model.metrics.cac
            )?;
            writeln!(f)?;
        }

        write!(f, "*Generated by SoloPreneur Lens*")
    }
}

impl StrategyReport<'_> {
    pub fn to_markdown(&self) -> String {
        self.to_string()
    }
}
