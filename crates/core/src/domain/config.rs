use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

// ============================================
// Enums
// ============================================

/// Maturity of the business being visualized
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum BusinessStage {
    /// Problem-solution fit, blue-sky thinking
    #[default]
    Ideation,
    /// Minimum viable product
    #[serde(rename = "MVP")]
    Mvp,
    /// Acquisition, retention and expansion
    Growth,
    /// Organizational structure and global reach
    Scale,
}

impl BusinessStage {
    pub const ALL: [Self; 4] = [Self::Ideation, Self::Mvp, Self::Growth, Self::Scale];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ideation => "Ideation",
            Self::Mvp => "MVP",
            Self::Growth => "Growth",
            Self::Scale => "Scale",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ideation" => Some(Self::Ideation),
            "mvp" => Some(Self::Mvp),
            "growth" => Some(Self::Growth),
            "scale" => Some(Self::Scale),
            _ => None,
        }
    }
}

/// Aesthetic applied to generated visuals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum VisualStyle {
    #[default]
    #[serde(rename = "Modern SaaS")]
    ModernSaas,
    #[serde(rename = "Tech Dark")]
    TechDark,
    Whiteboard,
    Corporate,
    #[serde(rename = "Vibrant Startup")]
    VibrantStartup,
    #[serde(rename = "Data Professional")]
    DataProfessional,
}

impl VisualStyle {
    pub const ALL: [Self; 6] = [
        Self::ModernSaas,
        Self::TechDark,
        Self::Whiteboard,
        Self::Corporate,
        Self::VibrantStartup,
        Self::DataProfessional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModernSaas => "Modern SaaS",
            Self::TechDark => "Tech Dark",
            Self::Whiteboard => "Whiteboard",
            Self::Corporate => "Corporate",
            Self::VibrantStartup => "Vibrant Startup",
            Self::DataProfessional => "Data Professional",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "modern-saas" => Some(Self::ModernSaas),
            "tech-dark" => Some(Self::TechDark),
            "whiteboard" => Some(Self::Whiteboard),
            "corporate" => Some(Self::Corporate),
            "vibrant-startup" => Some(Self::VibrantStartup),
            "data-professional" => Some(Self::DataProfessional),
            _ => None,
        }
    }
}

/// What the founder wants the artifacts to emphasize
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum BusinessFocus {
    #[default]
    Strategy,
    Marketing,
    Product,
    Investors,
    Operations,
    Sales,
}

impl BusinessFocus {
    pub const ALL: [Self; 6] = [
        Self::Strategy,
        Self::Marketing,
        Self::Product,
        Self::Investors,
        Self::Operations,
        Self::Sales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strategy => "Strategy",
            Self::Marketing => "Marketing",
            Self::Product => "Product",
            Self::Investors => "Investors",
            Self::Operations => "Operations",
            Self::Sales => "Sales",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "strategy" => Some(Self::Strategy),
            "marketing" => Some(Self::Marketing),
            "product" => Some(Self::Product),
            "investors" => Some(Self::Investors),
            "operations" => Some(Self::Operations),
            "sales" => Some(Self::Sales),
            _ => None,
        }
    }
}

/// Kind of product visualization to render
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub enum MockupType {
    #[default]
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "SaaS Dashboard")]
    SaasDashboard,
    #[serde(rename = "Physical Product")]
    PhysicalProduct,
    #[serde(rename = "Marketing Website")]
    MarketingWebsite,
}

impl MockupType {
    pub const ALL: [Self; 4] = [
        Self::MobileApp,
        Self::SaasDashboard,
        Self::PhysicalProduct,
        Self::MarketingWebsite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MobileApp => "Mobile App",
            Self::SaasDashboard => "SaaS Dashboard",
            Self::PhysicalProduct => "Physical Product",
            Self::MarketingWebsite => "Marketing Website",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "mobile-app" | "mobile" => Some(Self::MobileApp),
            "saas-dashboard" | "dashboard" => Some(Self::SaasDashboard),
            "physical-product" | "physical" => Some(Self::PhysicalProduct),
            "marketing-website" | "website" => Some(Self::MarketingWebsite),
            _ => None,
        }
    }
}

/// Lowercases and joins words with `-` so "Tech Dark", "tech_dark" and
/// "tech-dark" all compare equal.
fn normalize_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

// ============================================
// Records
// ============================================

/// Trimmed topic; every generation call needs one
pub fn require_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(CoreError::Validation(
            "Please enter a business topic to visualize.".to_string(),
        ));
    }
    Ok(topic)
}

/// Everything the instruction composer needs for a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RequestConfiguration {
    pub topic: String,
    pub stage: BusinessStage,
    pub style: VisualStyle,
    pub focus: BusinessFocus,
}

impl RequestConfiguration {
    pub fn new(topic: impl Into<String>, profile: Profile) -> Self {
        Self {
            topic: topic.into(),
            stage: profile.stage,
            style: profile.style,
            focus: profile.focus,
        }
    }

    /// Rejects configurations that cannot drive a generation call.
    pub fn validate(&self) -> Result<()> {
        require_topic(&self.topic).map(|_| ())
    }

    /// Topic with surrounding whitespace removed
    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    pub fn profile(&self) -> Profile {
        Profile {
            stage: self.stage,
            style: self.style,
            focus: self.focus,
        }
    }
}

/// Saved stage/style/focus preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Profile {
    #[serde(default)]
    pub stage: BusinessStage,
    #[serde(default)]
    pub style: VisualStyle,
    #[serde(default)]
    pub focus: BusinessFocus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serde_uses_display_names() {
        let json = serde_json::to_string(&BusinessStage::Mvp).unwrap();
        assert_eq!(json, "\"MVP\"");

        let parsed: BusinessStage = serde_json::from_str("\"Growth\"").unwrap();
        assert_eq!(parsed, BusinessStage::Growth);
    }

    #[test]
    fn test_style_parse_accepts_variants() {
        assert_eq!(VisualStyle::parse("Tech Dark"), Some(VisualStyle::TechDark));
        assert_eq!(VisualStyle::parse("tech-dark"), Some(VisualStyle::TechDark));
        assert_eq!(VisualStyle::parse("TECH_DARK"), Some(VisualStyle::TechDark));
        assert_eq!(VisualStyle::parse("Neon"), None);
    }

    #[test]
    fn test_as_str_parse_agree() {
        for stage in BusinessStage::ALL {
            assert_eq!(BusinessStage::parse(stage.as_str()), Some(stage));
        }
        for style in VisualStyle::ALL {
            assert_eq!(VisualStyle::parse(style.as_str()), Some(style));
        }
        for focus in BusinessFocus::ALL {
            assert_eq!(BusinessFocus::parse(focus.as_str()), Some(focus));
        }
        for mockup in MockupType::ALL {
            assert_eq!(MockupType::parse(mockup.as_str()), Some(mockup));
            let json = serde_json::to_string(&mockup).unwrap();
            assert_eq!(json, format!("\"{}\"", mockup.as_str()));
        }
    }

    #[test]
    fn test_validate_rejects_blank_topic() {
        let config = RequestConfiguration::new("   ", Profile::default());
        assert!(matches!(config.validate(), Err(CoreError::Validation(_))));

        let config = RequestConfiguration::new("AI-powered plant care app", Profile::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_missing_fields_default() {
        let profile: Profile = serde_json::from_str(r#"{"stage":"Scale"}"#).unwrap();
        assert_eq!(profile.stage, BusinessStage::Scale);
        assert_eq!(profile.style, VisualStyle::ModernSaas);
        assert_eq!(profile.focus, BusinessFocus::Strategy);
    }
}
