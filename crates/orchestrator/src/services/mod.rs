//! Feature orchestrators.
//!
//! Each one validates its inputs, builds the prompt and output schema,
//! calls the gateway once and normalizes the reply into a domain record.

mod normalize;

pub mod audio_brief;
pub mod board;
pub mod competitors;
pub mod financials;
pub mod imagery;
pub mod optimizer;
pub mod pitch;
pub mod research;
pub mod risk;
pub mod strategy_map;

pub use audio_brief::generate_audio_brief;
pub use board::{ask_board, convene_board, MAX_REPLIES};
pub use competitors::analyze_competitors;
pub use financials::generate_financial_model;
pub use imagery::{
    edit_image, edit_image_data_url, edit_infographic, generate_infographic,
    generate_product_mockup,
};
pub use optimizer::{optimize_prompt, MIN_OPTIMIZE_LEN};
pub use pitch::generate_pitch_kit;
pub use research::{dedupe_citations, normalize_series, research_topic};
pub use risk::analyze_risk;
pub use strategy_map::generate_strategy_map;
