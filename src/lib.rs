//! ChefIA core: turn a list, a photo or a spoken description of your ingredients into
//! recipe suggestions from Gemini, and keep the ones you like.
//!
//! Everything here is GUI-free. The `chefia` binary (feature `gui`) wires a [`session::Session`]
//! to a GTK window, a tokio runtime for [`gemini::GeminiClient`] calls and cpal microphone capture.

pub mod config;
pub mod error;
pub mod favorites;
pub mod gemini;
pub mod media;
pub mod recipe;
pub mod session;

pub use config::Config;
pub use error::{ChefError, Result};
pub use favorites::{Favorites, FavoritesStore, JsonFileStore};
pub use gemini::GeminiClient;
pub use media::{IngredientInput, MediaKind, MediaPayload};
pub use recipe::{DetailedRecipe, IngredientAnalysis, InputMethod, RecipeOption};
pub use session::{PendingRequest, Session, Status, View};
