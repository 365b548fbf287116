use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chefia::{
    ChefError, Config, DetailedRecipe, GeminiClient, IngredientAnalysis, InputMethod,
    JsonFileStore, Session,
};

use crate::ui::window::MainWidgets;

/// Everything the GTK main loop reacts to: user intents from widgets and results from
/// background tasks.
#[derive(Debug)]
pub enum AppEvent {
    Reset,
    ChooseMethod(InputMethod),
    Back,
    TextChanged(String),
    SubmitText,
    PickImage,
    ImagePicked(PathBuf),
    StartRecording,
    StopRecording,
    SelectRecipe(u32),
    CloseDetail,
    ToggleFavorite,
    OpenFavorites,
    CloseFavorites,
    OpenFavorite(String),
    RemoveFavorite(String),
    DismissAlert,
    ApiKeyChanged(String),
    AnalysisFinished {
        generation: u64,
        result: Result<IngredientAnalysis, ChefError>,
    },
    DetailsFinished {
        generation: u64,
        result: Result<DetailedRecipe, ChefError>,
    },
}

/// Central application state. Lives on the GTK main thread inside Rc<RefCell<>>.
pub struct AppState {
    pub session: Session,
    pub config: Config,
    pub gemini: Option<GeminiClient>,
    pub tokio_rt: tokio::runtime::Runtime,
    pub event_sender: async_channel::Sender<AppEvent>,

    // Recording state
    pub audio_buffer: Arc<Mutex<Vec<f32>>>,
    pub cpal_stream: Option<cpal::Stream>,
    pub sample_rate: u32,

    // UI handles
    pub window: Option<MainWidgets>,
}

impl AppState {
    pub fn new(sender: async_channel::Sender<AppEvent>) -> Self {
        let config = Config::load();
        let store = JsonFileStore::new(config.favorites_file());
        log::info!("Favorites stored at {}", store.path().display());
        let session = Session::new(Box::new(store));
        let gemini = build_client(&config);
        let tokio_rt = tokio::runtime::Runtime::new()
            .expect("Failed to create tokio runtime");

        Self {
            session,
            config,
            gemini,
            tokio_rt,
            event_sender: sender,
            audio_buffer: Arc::new(Mutex::new(Vec::new())),
            cpal_stream: None,
            sample_rate: 16000,
            window: None,
        }
    }

    /// Store a new API key and rebuild the client around it.
    pub fn set_api_key(&mut self, key: String) {
        self.config.gemini_api_key = key.trim().to_string();
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save config: {e}");
        }
        self.gemini = build_client(&self.config);
    }
}

fn build_client(config: &Config) -> Option<GeminiClient> {
    if config.gemini_api_key.is_empty() {
        log::warn!("No Gemini API key configured");
    }
    GeminiClient::new(config)
        .map_err(|e| log::error!("Failed to build Gemini client: {e}"))
        .ok()
}
