//! Single-image features: infographics, product mockups and edits.

use chrono::Utc;
use gemini::{Blob, ModelGateway};
use lens_core::{CoreError, EncodedImage, GeneratedImage, MockupType, ProductMockup, RequestConfiguration};
use tracing::info;
use uuid::Uuid;

use super::normalize::require_text;
use crate::error::Result;
use crate::prompts;

fn encoded(blob: Blob) -> EncodedImage {
    EncodedImage::new(blob.mime_type, blob.data)
}

fn reference(image: &EncodedImage) -> Blob {
    Blob::new(image.mime_type.clone(), image.bytes.clone())
}

/// Renders the research image prompt into an infographic.
///
/// The record keeps the topic as its prompt and remembers the
/// configuration it was made with.
pub async fn generate_infographic<G>(
    gateway: &G,
    image_prompt: &str,
    config: &RequestConfiguration,
) -> Result<GeneratedImage>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;
    let image_prompt = require_text(image_prompt, "Research did not produce an image prompt.")?;

    let blob = gateway.generate_image(image_prompt, None).await?;
    let image = GeneratedImage {
        id: Uuid::new_v4().to_string(),
        data: encoded(blob),
        prompt: config.topic().to_string(),
        timestamp: Utc::now().timestamp_millis(),
        stage: Some(config.stage),
        style: Some(config.style),
        focus: Some(config.focus),
    };

    info!(image_id = %image.id, mime = %image.data.mime_type, "Infographic generated");
    Ok(image)
}

pub async fn generate_product_mockup<G>(
    gateway: &G,
    config: &RequestConfiguration,
    mockup: MockupType,
) -> Result<ProductMockup>
where
    G: ModelGateway + ?Sized,
{
    config.validate()?;

    let prompt = prompts::mockup_prompt(config.topic(), mockup, config.style);
    let blob = gateway.generate_image(&prompt, None).await?;

    info!(mockup = mockup.as_str(), "Product mockup generated");
    Ok(ProductMockup {
        mockup_type: mockup,
        image_data: encoded(blob),
        caption: prompts::mockup_caption(config.topic(), mockup),
    })
}

/// Applies a natural-language edit to an existing image
pub async fn edit_image<G>(
    gateway: &G,
    image: &EncodedImage,
    instruction: &str,
) -> Result<EncodedImage>
where
    G: ModelGateway + ?Sized,
{
    let instruction = require_text(instruction, "Please describe the edit to apply.")?;
    if image.is_empty() {
        return Err(CoreError::InvalidImage("empty image payload".to_string()).into());
    }

    let blob = gateway.generate_image(instruction, Some(reference(image))).await?;
    info!(bytes = blob.data.len(), "Image edited");
    Ok(encoded(blob))
}

/// Same as [`edit_image`] for an image held as a data URL or bare base64
pub async fn edit_image_data_url<G>(
    gateway: &G,
    data_url: &str,
    instruction: &str,
) -> Result<EncodedImage>
where
    G: ModelGateway + ?Sized,
{
    let image = EncodedImage::from_data_url(data_url)?;
    edit_image(gateway, &image, instruction).await
}

/// Edits a history entry into a new entry that carries the instruction as
/// its prompt and inherits the source configuration.
pub async fn edit_infographic<G>(
    gateway: &G,
    source: &GeneratedImage,
    instruction: &str,
) -> Result<GeneratedImage>
where
    G: ModelGateway + ?Sized,
{
    let data = edit_image(gateway, &source.data, instruction).await?;

    Ok(GeneratedImage {
        id: Uuid::new_v4().to_string(),
        data,
        prompt: instruction.trim().to_string(),
        timestamp: Utc::now().timestamp_millis(),
        stage: source.stage,
        style: source.style,
        focus: source.focus,
    })
}
