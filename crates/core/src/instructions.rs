//! Instruction composer.
//!
//! Maps each configuration value to the directive fragment embedded in
//! prompts. `None` stands for any value outside the closed sets (for
//! example a stored string that no longer parses) and yields the general
//! fallback directive.

use crate::domain::config::{BusinessFocus, BusinessStage, MockupType, VisualStyle};

pub const DEFAULT_STAGE_INSTRUCTION: &str = "Context: General Business. Style: Professional.";
pub const DEFAULT_STYLE_INSTRUCTION: &str =
    "Aesthetic: Professional Business Illustration. Clean and effective.";
pub const DEFAULT_FOCUS_INSTRUCTION: &str = "Goal: General Business Overview.";

pub fn stage_instruction(stage: Option<BusinessStage>) -> &'static str {
    match stage {
        Some(BusinessStage::Ideation) => "Context: Early stage startup ideation. Focus on problem-solution fit, conceptual models, and vision. Style: Rough, creative, blue-sky thinking.",
        Some(BusinessStage::Mvp) => "Context: Minimum Viable Product. Focus on core features, user flows, and lean metrics. Style: Practical, clean, functional.",
        Some(BusinessStage::Growth) => "Context: Growth stage business. Focus on user acquisition, retention, and market expansion. Style: Data-driven, energetic, upward trending.",
        Some(BusinessStage::Scale) => "Context: Scaling Enterprise. Focus on organizational structure, global reach, and revenue operations. Style: Polished, authoritative, established.",
        None => DEFAULT_STAGE_INSTRUCTION,
    }
}

pub fn style_instruction(style: Option<VisualStyle>) -> &'static str {
    match style {
        Some(VisualStyle::ModernSaas) => "Aesthetic: Stripe/Airbnb Style. Ultra-clean, ample whitespace, soft shadows, vibrant accent colors (blurple/indigo), rounded UI elements.",
        Some(VisualStyle::TechDark) => "Aesthetic: Dark Mode Tech. Deep slate/black backgrounds, glowing neon accents (cyan/purple), monospaced fonts, cyber-security vibe.",
        Some(VisualStyle::Whiteboard) => "Aesthetic: Hand-drawn Strategy. Marker style lines on a whiteboard background, sticky note elements, arrows, rough sketches, brainstorming vibe.",
        Some(VisualStyle::Corporate) => "Aesthetic: Blue-Chip Professional. Trustworthy blue/grey palette, stock photography integration, clean grids, serif headers.",
        Some(VisualStyle::VibrantStartup) => "Aesthetic: Notion/Gumroad Style. Flat illustrations, pastel colors, bold typography, playful shapes, friendly and accessible.",
        Some(VisualStyle::DataProfessional) => "Aesthetic: Financial Report. High-density charts, precise data visualization, muted professional colors, Tufte-style minimalism.",
        None => DEFAULT_STYLE_INSTRUCTION,
    }
}

pub fn focus_instruction(focus: Option<BusinessFocus>) -> &'static str {
    match focus {
        Some(BusinessFocus::Strategy) => "Goal: Strategic Planning. Highlight roadmaps, SWOT analysis, and competitive landscape.",
        Some(BusinessFocus::Marketing) => "Goal: Marketing & Sales. Highlight customer personas, funnels, conversion rates, and brand positioning.",
        Some(BusinessFocus::Product) => "Goal: Product Development. Highlight features, tech stack, user journey, and architecture.",
        Some(BusinessFocus::Investors) => "Goal: Pitch Deck. Highlight market size (TAM/SAM/SOM), revenue potential, and team structure. Make it impressive for VCs.",
        Some(BusinessFocus::Operations) => "Goal: Business Operations. Highlight workflows, logistics, efficiency, and internal processes.",
        Some(BusinessFocus::Sales) => "Goal: Revenue Generation. Highlight pricing models, sales cycles, and closing strategies.",
        None => DEFAULT_FOCUS_INSTRUCTION,
    }
}

/// Visual direction for a product mockup
pub fn mockup_instruction(mockup: MockupType) -> &'static str {
    match mockup {
        MockupType::MobileApp => "High fidelity UI design of a modern mobile app interface. Isometric perspective showing 3 floating iPhone 15 screens. Clean, professional, Dribbble trending style.",
        MockupType::SaasDashboard => "Photorealistic mockup of a MacBook Pro displaying a complex SaaS analytics dashboard. Dark glassmorphism UI, detailed charts, data tables. Professional studio lighting.",
        MockupType::PhysicalProduct => "Modern minimalist product packaging design. Photorealistic 3D render of a box or container on a podium. Studio lighting, soft shadows.",
        MockupType::MarketingWebsite => "Full page web design layout for a high-converting landing page. Hero section with bold typography and CTA. Clean, modern aesthetic.",
    }
}

impl BusinessStage {
    pub fn instruction(self) -> &'static str {
        stage_instruction(Some(self))
    }
}

impl VisualStyle {
    pub fn instruction(self) -> &'static str {
        style_instruction(Some(self))
    }
}

impl BusinessFocus {
    pub fn instruction(self) -> &'static str {
        focus_instruction(Some(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_combination_yields_directives() {
        for stage in BusinessStage::ALL {
            for style in VisualStyle::ALL {
                for focus in BusinessFocus::ALL {
                    assert!(!stage.instruction().is_empty());
                    assert!(!style.instruction().is_empty());
                    assert!(!focus.instruction().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_directives_are_distinct_per_value() {
        let stages: std::collections::HashSet<_> =
            BusinessStage::ALL.iter().map(|s| s.instruction()).collect();
        assert_eq!(stages.len(), BusinessStage::ALL.len());

        let styles: std::collections::HashSet<_> =
            VisualStyle::ALL.iter().map(|s| s.instruction()).collect();
        assert_eq!(styles.len(), VisualStyle::ALL.len());

        let focuses: std::collections::HashSet<_> =
            BusinessFocus::ALL.iter().map(|f| f.instruction()).collect();
        assert_eq!(focuses.len(), BusinessFocus::ALL.len());
    }

    #[test]
    fn test_unmapped_values_fall_back() {
        assert_eq!(
            stage_instruction(BusinessStage::parse("Seed Round")),
            DEFAULT_STAGE_INSTRUCTION
        );
        assert_eq!(
            style_instruction(VisualStyle::parse("Vaporwave")),
            DEFAULT_STYLE_INSTRUCTION
        );
        assert_eq!(
            focus_instruction(BusinessFocus::parse("Hiring")),
            DEFAULT_FOCUS_INSTRUCTION
        );
        assert!(DEFAULT_STAGE_INSTRUCTION.contains("General Business"));
    }

    #[test]
    fn test_directives_are_deterministic() {
        assert_eq!(
            stage_instruction(Some(BusinessStage::Growth)),
            BusinessStage::Growth.instruction()
        );
        assert!(BusinessStage::Ideation.instruction().starts_with("Context:"));
        assert!(VisualStyle::TechDark.instruction().starts_with("Aesthetic:"));
        assert!(BusinessFocus::Sales.instruction().starts_with("Goal:"));
    }

    #[test]
    fn test_mockup_instructions() {
        for mockup in MockupType::ALL {
            assert!(!mockup_instruction(mockup).is_empty());
        }
    }
}
