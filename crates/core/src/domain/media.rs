use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::config::{BusinessFocus, BusinessStage, MockupType, VisualStyle};
use crate::error::{CoreError, Result};

const DATA_URL_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Splits a `data:<mime>;base64,<payload>` URL into its mime type and
/// payload. Input without the prefix is returned unchanged with no mime.
pub fn split_data_url(input: &str) -> (Option<&str>, &str) {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix(DATA_URL_SCHEME) {
        if let Some(idx) = rest.find(BASE64_MARKER) {
            let mime = &rest[..idx];
            let payload = &rest[idx + BASE64_MARKER.len()..];
            return (Some(mime).filter(|m| !m.is_empty()), payload);
        }
    }
    (None, trimmed)
}

/// Binary image together with its mime type.
///
/// Serializes as a base64 data URL, which is what the consuming UI renders
/// and stores in its image history.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Parses either a data URL or bare base64 (assumed PNG).
    pub fn from_data_url(input: &str) -> Result<Self> {
        let (mime, payload) = split_data_url(input);
        if payload.is_empty() {
            return Err(CoreError::InvalidImage("empty image payload".to_string()));
        }

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| CoreError::InvalidImage(e.to_string()))?;

        Ok(Self {
            mime_type: mime.unwrap_or(DEFAULT_IMAGE_MIME).to_string(),
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        format!(
            "{}{}{}{}",
            DATA_URL_SCHEME,
            self.mime_type,
            BASE64_MARKER,
            self.to_base64()
        )
    }

    /// File extension matching the mime type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            _ => "png",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Serialize for EncodedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for EncodedImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_data_url(&raw).map_err(serde::de::Error::custom)
    }
}

/// Infographic produced for a topic or an edit instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct GeneratedImage {
    pub id: String,
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub data: EncodedImage,
    /// Topic or edit instruction the image was produced from
    pub prompt: String,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<BusinessStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<VisualStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<BusinessFocus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProductMockup {
    #[serde(rename = "type")]
    pub mockup_type: MockupType,
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub image_data: EncodedImage,
    pub caption: String,
}

/// Narrated executive summary.
///
/// The speech model returns raw 16-bit little-endian mono PCM.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioBrief {
    pub pcm: Vec<u8>,
    pub sample_rate: u32,
}

impl AudioBrief {
    pub const SAMPLE_RATE: u32 = 24_000;
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;

    pub fn new(pcm: Vec<u8>) -> Self {
        Self {
            pcm,
            sample_rate: Self::SAMPLE_RATE,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        let bytes_per_sec = self.sample_rate as f64 * (Self::BITS_PER_SAMPLE / 8) as f64;
        self.pcm.len() as f64 / bytes_per_sec
    }

    /// Wraps the PCM samples in a RIFF/WAVE container.
    pub fn to_wav(&self) -> Vec<u8> {
        let data_len = self.pcm.len() as u32;
        let block_align = Self::CHANNELS * Self::BITS_PER_SAMPLE / 8;
        let byte_rate = self.sample_rate * block_align as u32;

        let mut wav = Vec::with_capacity(44 + self.pcm.len());
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&Self::CHANNELS.to_le_bytes());
        wav.extend_from_slice(&self.sample_rate.to_le_bytes());
        wav.extend_from_slice(&byte_rate.to_le_bytes());
        wav.extend_from_slice(&block_align.to_le_bytes());
        wav.extend_from_slice(&Self::BITS_PER_SAMPLE.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.extend_from_slice(&self.pcm);
        wav
    }
}

impl std::fmt::Debug for AudioBrief {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioBrief")
            .field("len", &self.pcm.len())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}
