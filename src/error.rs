//! Error types shared by the gateway, media and persistence layers.

use thiserror::Error;

/// Everything that can go wrong between a user intent and a rendered result.
#[derive(Error, Debug)]
pub enum ChefError {
    /// The model answered but produced no text.
    #[error("empty response from the model")]
    EmptyResponse,

    /// The model's text did not match the requested JSON schema.
    #[error("malformed model response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Gemini returned a non-success status.
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport failure (DNS, TLS, timeout...).
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("no Gemini API key configured")]
    MissingApiKey,

    /// Microphone or camera permission refused, or no capture device.
    #[error("media access denied: {0}")]
    MediaAccessDenied(String),

    #[error("no file selected")]
    NoFileSelected,

    #[error("unsupported media type: {0}")]
    UnsupportedMedia(String),

    /// Nothing to analyze (blank text or an empty recording).
    #[error("no input provided")]
    NoInput,

    /// Stored favorites could not be parsed.
    #[error("could not read favorites: {0}")]
    StorageRead(String),

    #[error("audio encoding failed: {0}")]
    Audio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ChefError {
    fn from(e: reqwest::Error) -> Self {
        ChefError::Http(e.to_string())
    }
}

impl From<hound::Error> for ChefError {
    fn from(e: hound::Error) -> Self {
        ChefError::Audio(e.to_string())
    }
}

impl ChefError {
    /// True for failures that came back from (or on the way to) the model.
    pub fn is_gateway_error(&self) -> bool {
        matches!(
            self,
            ChefError::EmptyResponse
                | ChefError::MalformedResponse(_)
                | ChefError::Api { .. }
                | ChefError::Http(_)
                | ChefError::MissingApiKey
        )
    }
}

pub type Result<T> = std::result::Result<T, ChefError>;
