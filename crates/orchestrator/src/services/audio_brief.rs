use gemini::{Blob, ModelGateway};
use lens_core::{require_topic, AudioBrief, ResearchResult};
use tracing::{debug, info};

use crate::error::Result;
use crate::prompts;

/// Sample rate advertised in a `audio/L16;rate=24000` style mime type
fn sample_rate(mime_type: &str) -> u32 {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.trim().parse::<u32>().ok())
        .filter(|&rate| rate > 0)
        .unwrap_or(AudioBrief::SAMPLE_RATE)
}

fn into_brief(blob: Blob) -> AudioBrief {
    AudioBrief {
        sample_rate: sample_rate(&blob.mime_type),
        pcm: blob.data,
    }
}

/// Narrates a short executive summary of a research result
pub async fn generate_audio_brief<G>(
    gateway: &G,
    topic: &str,
    research: &ResearchResult,
    voice: &str,
) -> Result<AudioBrief>
where
    G: ModelGateway + ?Sized,
{
    let topic = require_topic(topic)?;
    let prompt = prompts::audio_brief_prompt(topic, &research.insights, &research.facts);
    debug!(voice = %voice, "Requesting audio brief");

    let brief = into_brief(gateway.generate_speech(&prompt, voice).await?);

    info!(
        duration_secs = brief.duration_secs(),
        sample_rate = brief.sample_rate,
        "Audio brief generated"
    );
    Ok(brief)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_from_mime() {
        assert_eq!(sample_rate("audio/L16;codec=pcm;rate=16000"), 16_000);
        assert_eq!(sample_rate("audio/pcm"), 24_000);
        assert_eq!(sample_rate("audio/L16; rate=abc"), 24_000);
    }
}
