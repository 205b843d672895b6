//! Domain model for SoloPreneur Lens
//!
//! Closed configuration enums, the typed artifact records every
//! orchestrator produces, and the instruction composer that turns
//! configuration into prompt directives.

pub mod domain;
pub mod error;
pub mod instructions;

pub use domain::board::{
    Advisor, AdvisorRole, BoardMeeting, BoardMessage, ChatHistory, MessageRole, Persona, Verdict,
    BOARD_SIZE,
};
pub use domain::competitor::{Competitor, CompetitorAnalysis, COMPETITOR_COUNT};
pub use domain::config::{
    require_topic, BusinessFocus, BusinessStage, MockupType, Profile, RequestConfiguration,
    VisualStyle,
};
pub use domain::financial::{Currency, FinancialModel, UnitMetrics};
pub use domain::media::{split_data_url, AudioBrief, EncodedImage, GeneratedImage, ProductMockup};
pub use domain::pitch::PitchKit;
pub use domain::research::{
    BusinessInsight, ResearchResult, SearchResultItem, Swot, TrendData, TrendDirection,
    DEFAULT_TREND_SERIES, MAX_FACTS, TREND_POINTS,
};
pub use domain::risk::{RiskAnalysis, ViabilityTier, RISK_ITEMS};
pub use domain::strategy::{StrategyEdge, StrategyMapData, StrategyNode, StrategyNodeCategory};
pub use error::{CoreError, Result};
