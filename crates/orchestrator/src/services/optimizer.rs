use gemini::ModelGateway;
use lens_core::BusinessStage;
use tracing::{debug, info};

use crate::error::Result;
use crate::prompts;

/// Shorter inputs are returned untouched
pub const MIN_OPTIMIZE_LEN: usize = 3;

/// Rewrites a rough idea into a two-sentence business description.
///
/// A blank reply keeps the original input.
pub async fn optimize_prompt<G>(gateway: &G, input: &str, stage: BusinessStage) -> Result<String>
where
    G: ModelGateway + ?Sized,
{
    let trimmed = input.trim();
    if trimmed.chars().count() < MIN_OPTIMIZE_LEN {
        debug!("Input too short to optimize");
        return Ok(input.to_string());
    }

    let reply = gateway
        .generate_text(&prompts::optimize_prompt(trimmed, stage))
        .await?;
    let rewritten = reply.trim().trim_matches('"').trim();

    if rewritten.is_empty() {
        debug!("Optimizer returned nothing, keeping input");
        return Ok(input.to_string());
    }

    info!(chars = rewritten.len(), "Prompt optimized");
    Ok(rewritten.to_string())
}
