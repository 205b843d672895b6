//! Response schemas requested from the model, one per structured feature.

use gemini::Schema;
use lens_core::{AdvisorRole, Currency, StrategyNodeCategory, TrendDirection, Verdict};

fn advisor_roles() -> Vec<&'static str> {
    AdvisorRole::ALL.iter().map(|r| r.as_str()).collect()
}

pub fn research_schema() -> Schema {
    let swot = Schema::object()
        .property("strengths", Schema::strings())
        .property("weaknesses", Schema::strings())
        .property("opportunities", Schema::strings())
        .property("threats", Schema::strings());

    let trend = Schema::object()
        .describe("A visual representation of market trend/interest over time")
        .property(
            "label",
            Schema::string().describe("Label for the trend (e.g. '5-Year Forecast', 'Search Interest')"),
        )
        .property(
            "value",
            Schema::string().describe("The aggregate value or growth (e.g. '+24% CAGR', 'High Demand')"),
        )
        .property(
            "data",
            Schema::array(Schema::number())
                .describe("Array of 7 integers from 0-100 representing the sparkline points"),
        )
        .property(
            "direction",
            Schema::string()
                .enumerated([
                    TrendDirection::Up.as_str(),
                    TrendDirection::Down.as_str(),
                    TrendDirection::Neutral.as_str(),
                ])
                .describe("Overall trend direction"),
        );

    Schema::object()
        .property("facts", Schema::strings())
        .property("imagePrompt", Schema::string())
        .property(
            "insights",
            Schema::object()
                .property("swot", swot)
                .property("pivots", Schema::strings()),
        )
        .property("trend", trend)
}

pub fn risk_schema() -> Schema {
    Schema::object()
        .property("fatalFlaws", Schema::strings())
        .property("mitigations", Schema::strings())
        .property("viabilityScore", Schema::integer())
}

pub fn board_meeting_schema() -> Schema {
    let advisor = Schema::object()
        .property("role", Schema::string().enumerated(advisor_roles()))
        .property("name", Schema::string())
        .property(
            "avatarColor",
            Schema::string().describe("A hex color code matching the persona"),
        )
        .property("advice", Schema::string())
        .property("concern", Schema::string())
        .property(
            "verdict",
            Schema::string().enumerated([
                Verdict::Approve.as_str(),
                Verdict::Reject.as_str(),
                Verdict::Pivot.as_str(),
            ]),
        );

    Schema::object()
        .property("advisors", Schema::array(advisor))
        .property("synthesis", Schema::string())
}

pub fn board_reply_schema() -> Schema {
    let message = Schema::object()
        .property("role", Schema::string().enumerated(advisor_roles()))
        .property("name", Schema::string())
        .property("text", Schema::string());

    Schema::object().property("messages", Schema::array(message))
}

pub fn strategy_map_schema() -> Schema {
    let node = Schema::object()
        .property("id", Schema::string())
        .property("label", Schema::string())
        .property(
            "category",
            Schema::string().enumerated(StrategyNodeCategory::ALL.iter().map(|c| c.as_str())),
        );

    let edge = Schema::object()
        .property("from", Schema::string())
        .property("to", Schema::string())
        .optional_property("label", Schema::string());

    Schema::object()
        .property("nodes", Schema::array(node))
        .property("edges", Schema::array(edge))
}

pub fn pitch_kit_schema() -> Schema {
    Schema::object()
        .property("oneLiner", Schema::string())
        .property("valueProposition", Schema::string())
        .property("elevatorPitch", Schema::string())
        .property("emailTemplate", Schema::string())
        .property("socialPost", Schema::string())
}

pub fn competitors_schema() -> Schema {
    let competitor = Schema::object()
        .property("name", Schema::string())
        .property("description", Schema::string())
        .property("theirEdge", Schema::string())
        .property("yourEdge", Schema::string());

    Schema::object()
        .property("competitors", Schema::array(competitor))
        .property("marketGap", Schema::string())
}

pub fn financial_model_schema() -> Schema {
    let metrics = Schema::object()
        .property("price", Schema::number())
        .property("cac", Schema::number())
        .property("cogs", Schema::number())
        .property("users", Schema::number());

    Schema::object()
        .property("pricingModel", Schema::string())
        .property(
            "currency",
            Schema::string().enumerated(Currency::ALL.iter().map(|c| c.symbol())),
        )
        .property("metrics", metrics)
        .property("insight", Schema::string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enums_come_from_domain() {
        let board = serde_json::to_value(board_meeting_schema()).unwrap();
        let advisor = &board["properties"]["advisors"]["items"]["properties"];
        assert_eq!(advisor["role"]["enum"], json!(["CFO", "CMO", "CTO"]));
        assert_eq!(
            advisor["verdict"]["enum"],
            json!(["Approve", "Reject", "Pivot"])
        );

        let finance = serde_json::to_value(financial_model_schema()).unwrap();
        assert_eq!(
            finance["properties"]["currency"]["enum"],
            json!(["$", "€", "£"])
        );
    }

    #[test]
    fn test_strategy_edge_label_is_optional() {
        let map = serde_json::to_value(strategy_map_schema()).unwrap();
        let edge = &map["properties"]["edges"]["items"];
        assert_eq!(edge["required"], json!(["from", "to"]));
        assert_eq!(
            map["properties"]["nodes"]["items"]["properties"]["category"]["enum"],
            json!(["Market", "Product", "Operation", "Finance", "Risk"])
        );
    }
}
