//! Prompt templates for every feature.
//!
//! Each builder embeds the request inputs and composed directives; the
//! JSON contract itself travels separately as the response schema.

use lens_core::{
    instructions, AdvisorRole, BusinessFocus, BusinessInsight, BusinessStage, MockupType,
    VisualStyle,
};

pub fn optimize_prompt(input: &str, stage: BusinessStage) -> String {
    format!(
        r#"You are a startup mentor. Rewrite the following business idea into a concise but specific 2-sentence description suitable for generating a strategic visualization.
User Input: "{input}"
Business Stage: {stage}

Make it sound professional and visionary. Do not add quotation marks."#,
        input = input,
        stage = stage.as_str(),
    )
}

pub fn research_prompt(
    topic: &str,
    stage: BusinessStage,
    style: VisualStyle,
    focus: BusinessFocus,
) -> String {
    format!(
        r#"You are an expert business consultant and visual strategist for solo founders.
Research the topic "{topic}" and plan a business infographic about it.

**Use the Google Search tool to find accurate, up-to-date market data and trends about this topic.**

{stage}
{style}
{focus}

Return:
- facts: 3 to 5 key metrics or facts.
- imagePrompt: a highly detailed image generation prompt describing the composition, colors and layout of the infographic, tailored to the aesthetic. No citations.
- insights: a SWOT analysis plus short alternative business ideas ("pivots").
- trend: a sparkline of market interest or growth over time, exactly 7 integers from 0 to 100."#,
        topic = topic,
        stage = instructions::stage_instruction(Some(stage)),
        style = instructions::style_instruction(Some(style)),
        focus = instructions::focus_instruction(Some(focus)),
    )
}

/// Used when a research reply carries no image prompt
pub fn fallback_image_prompt(
    topic: &str,
    stage: BusinessStage,
    style: VisualStyle,
    focus: BusinessFocus,
) -> String {
    format!(
        "Create a detailed business infographic about {}. {} {} {}",
        topic,
        stage.instruction(),
        style.instruction(),
        focus.instruction()
    )
}

pub fn risk_prompt(topic: &str, stage: BusinessStage, focus: BusinessFocus) -> String {
    format!(
        r#"Act as a skeptical Venture Capitalist and Risk Officer.
Critically analyze this business concept for a solo founder.

Topic: {topic}
Stage: {stage}
Focus: {focus}

Identify 3 "Fatal Flaws" (why this might fail) and 3 "Mitigation Strategies" (how to fix them).
Also provide a "Viability Score" from 0 to 100."#,
        topic = topic,
        stage = stage.as_str(),
        focus = focus.as_str(),
    )
}

pub fn board_meeting_prompt(topic: &str, stage: BusinessStage) -> String {
    let personas = AdvisorRole::ALL
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let persona = role.persona();
            format!(
                "{}. The {} ({}): {}",
                i + 1,
                role.as_str(),
                persona.name,
                persona.temperament
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are simulating a Board of Directors meeting for a solo founder.
The founder's idea: "{topic}" (Stage: {stage}).

Create 3 distinct personas who argue about this idea from their own domain of expertise.
They should hold CONFLICTING viewpoints and critique each other's perspectives like a real debate.

{personas}

Give each one specific advice, their biggest concern, and their vote (Approve/Reject/Pivot).
Return a hex color code for 'avatarColor' that matches their vibe (e.g. CFO=Green, CMO=Pink, CTO=Blue).
Finally, provide a 1-sentence synthesis of the conflict."#,
        topic = topic,
        stage = stage.as_str(),
        personas = personas,
    )
}

/// `board_state` is the JSON array of `{role, stance}` pairs
pub fn board_question_prompt(board_state: &str, question: &str) -> String {
    format!(
        r#"Context: A board meeting between a CFO (Marcus), CMO (Sarah), and CTO (Alex).
Current Board State: {board_state}

The Founder (User) asks: "{question}"

Based on the question, choose ONE or TWO advisors who would feel most strongly about it to respond.
They respond IN CHARACTER, referencing their previous stance or arguing with the other advisors if relevant.
Keep responses short and conversational (under 30 words).

Return the replies as an array of messages."#,
        board_state = board_state,
        question = question,
    )
}

pub fn strategy_map_prompt(topic: &str, stage: BusinessStage) -> String {
    format!(
        r#"Analyze the business topic: "{topic}" (Stage: {stage}).
Deconstruct this business into a System Map of 6 to 10 key interconnected components.

Categorize each node as:
- 'Operation' (internal processes, logistics)
- 'Product' (the offering, features)
- 'Market' (customers, channels, competitors)
- 'Finance' (revenue, costs, funding)
- 'Risk' (regulations, dependencies)

Define directional edges between node ids to show value flow or dependency.
Example: "Product" -> "Market" (Label: "Distribution")."#,
        topic = topic,
        stage = stage.as_str(),
    )
}

pub fn pitch_kit_prompt(topic: &str, stage: BusinessStage, focus: BusinessFocus) -> String {
    format!(
        r#"You are a professional copywriter for high-growth startups.
Generate a "Pitch Kit" for the following business:
Topic: "{topic}"

CONFIGURATION:
Stage: {stage} ({stage_instr})
Focus: {focus} ({focus_instr})

Create 5 distinct assets tailored to this stage and focus:
1. One-Liner (Hook): a compelling H1 headline for a landing page.
2. Value Proposition: a concise 1-sentence statement of the core benefit.
3. Elevator Pitch: a 30-second conversational script (about 60-80 words) using the Problem-Agitate-Solution framework.
4. Cold Email Template: a short, punchy email to an investor or partner.
5. Social Post: a viral-style post announcing the concept.

Tone: professional, persuasive, and tailored to the '{stage}' stage."#,
        topic = topic,
        stage = stage.as_str(),
        stage_instr = stage.instruction(),
        focus = focus.as_str(),
        focus_instr = focus.instruction(),
    )
}

pub fn competitors_prompt(topic: &str) -> String {
    format!(
        r#"Research real-world competitors for a business described as: "{topic}".
Identify 3 specific, real companies that are direct competitors.

For each competitor give:
1. Name and description.
2. "Their Edge" (what they do best).
3. "Your Edge" (how a new solo founder could beat them: niche focus, price, speed, personalization).

Also provide a "Market Gap" statement summarizing the opportunity.

Use Google Search to find actual companies."#,
        topic = topic,
    )
}

pub fn financial_model_prompt(topic: &str, stage: BusinessStage) -> String {
    format!(
        r#"Create a "Napkin Math" financial estimate for this business idea: "{topic}" (Stage: {stage}).
Estimate realistic starting unit economics.

Provide:
1. Pricing Model (e.g. Subscription, One-time Purchase, Freemium).
2. Estimated Price (monthly or per unit).
3. Estimated CAC (cost to acquire a customer).
4. Estimated COGS (cost of goods sold or server cost per user).
5. Projected Users (a realistic month-12 target for a solo founder).
6. A short 1-sentence insight about the economics (e.g. "High margin but high CAC")."#,
        topic = topic,
        stage = stage.as_str(),
    )
}

pub fn mockup_prompt(topic: &str, mockup: MockupType, style: VisualStyle) -> String {
    format!(
        r#"Create a stunning, professional product visualization for a business about: "{topic}".
Type: {direction}
{style}

Ensure high resolution, perfect perspective, and no garbled text. Focus on visual impact and brand identity."#,
        topic = topic,
        direction = instructions::mockup_instruction(mockup),
        style = style.instruction(),
    )
}

pub fn mockup_caption(topic: &str, mockup: MockupType) -> String {
    format!("AI Generated {} for {}", mockup.as_str(), topic)
}

/// Number of strengths and opportunities read out in the brief
const BRIEF_HIGHLIGHTS: usize = 2;

pub fn audio_brief_prompt(topic: &str, insights: &BusinessInsight, facts: &[String]) -> String {
    let take = |items: &[String], n: usize| {
        items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
    };

    format!(
        r#"You are a senior business analyst briefing a solo founder.
Give a high-energy, 30-second executive summary of the following business analysis.
Be encouraging but realistic. Speak directly to the founder.

Data:
Topic: {topic}
Key Facts: {facts}
Strengths: {strengths}
Opportunities: {opportunities}
Pivots: {pivots}"#,
        topic = topic,
        facts = facts.join(", "),
        strengths = take(&insights.swot.strengths, BRIEF_HIGHLIGHTS),
        opportunities = take(&insights.swot.opportunities, BRIEF_HIGHLIGHTS),
        pivots = take(&insights.pivots, 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_core::Swot;

    #[test]
    fn test_research_prompt_embeds_directives() {
        let prompt = research_prompt(
            "Plant care app",
            BusinessStage::Mvp,
            VisualStyle::Whiteboard,
            BusinessFocus::Investors,
        );
        assert!(prompt.contains("\"Plant care app\""));
        assert!(prompt.contains(BusinessStage::Mvp.instruction()));
        assert!(prompt.contains(VisualStyle::Whiteboard.instruction()));
        assert!(prompt.contains(BusinessFocus::Investors.instruction()));
    }

    #[test]
    fn test_board_prompt_lists_every_persona() {
        let prompt = board_meeting_prompt("Drone delivery", BusinessStage::Growth);
        for role in AdvisorRole::ALL {
            assert!(prompt.contains(role.persona().name));
            assert!(prompt.contains(role.as_str()));
        }
    }

    #[test]
    fn test_audio_brief_digest_is_limited() {
        let insights = BusinessInsight {
            swot: Swot {
                strengths: vec!["s1".into(), "s2".into(), "s3".into()],
                weaknesses: vec!["w1".into()],
                opportunities: vec!["o1".into(), "o2".into(), "o3".into()],
                threats: vec![],
            },
            pivots: vec!["p1".into(), "p2".into()],
        };
        let prompt = audio_brief_prompt("Topic", &insights, &["f1".into(), "f2".into()]);

        assert!(prompt.contains("Strengths: s1, s2\n"));
        assert!(!prompt.contains("s3"));
        assert!(prompt.contains("Opportunities: o1, o2\n"));
        assert!(prompt.contains("Pivots: p1"));
        assert!(!prompt.contains("p2"));
        assert!(!prompt.contains("w1"));
    }

    #[test]
    fn test_mockup_caption() {
        assert_eq!(
            mockup_caption("plants", MockupType::SaasDashboard),
            "AI Generated SaaS Dashboard for plants"
        );
    }
}
