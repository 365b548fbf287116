//! Turning captured files and audio into payloads the model can read inline.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use crate::error::{ChefError, Result};
use crate::recipe::InputMethod;

/// Container type for microphone recordings.
pub const RECORDING_MIME_TYPE: &str = "audio/wav";

/// Kind of media a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl From<MediaKind> for InputMethod {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => InputMethod::Image,
            MediaKind::Audio => InputMethod::Audio,
        }
    }
}

/// Base64-encoded bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPayload {
    pub data: String,
    pub mime_type: String,
}

impl MediaPayload {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// Size of the encoded data in bytes.
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }
}

/// What an ingredient analysis is run on.
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientInput {
    Text(String),
    Media(MediaPayload),
}

impl IngredientInput {
    pub fn is_media(&self) -> bool {
        matches!(self, IngredientInput::Media(_))
    }
}

/// Guess an image MIME type from the file extension.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Read an image file picked by the user and encode it.
pub async fn read_image(path: &Path) -> Result<MediaPayload> {
    let mime = image_mime_type(path)
        .ok_or_else(|| ChefError::UnsupportedMedia(path.display().to_string()))?;
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ChefError::NoFileSelected),
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Err(ChefError::NoInput);
    }
    log::debug!("Read {} bytes of {mime} from {}", bytes.len(), path.display());
    Ok(MediaPayload::from_bytes(&bytes, mime))
}

/// Convert f32 samples to WAV bytes (mono 16-bit PCM).
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &s in samples {
        let clamped = s.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Package a finished recording for the model.
pub fn encode_recording(samples: &[f32], sample_rate: u32) -> Result<MediaPayload> {
    if samples.is_empty() {
        return Err(ChefError::NoInput);
    }
    let wav = samples_to_wav(samples, sample_rate)?;
    Ok(MediaPayload::from_bytes(&wav, RECORDING_MIME_TYPE))
}
