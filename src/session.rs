//! The application state machine.
//!
//! A [`Session`] owns every piece of workflow state and decides which view is on screen.
//! It performs no network or media I/O itself: operations that need the model hand back a
//! [`PendingRequest`] stamped with the current generation, and the caller reports the result
//! through [`Session::finish_analysis`] or [`Session::finish_details`]. Any transition that
//! issues a new request, and every [`Session::reset`], bumps the generation, so a late answer to
//! an abandoned request is dropped instead of overwriting the screen.

use std::path::PathBuf;

use crate::error::{ChefError, Result};
use crate::favorites::{Favorites, FavoritesStore};
use crate::media::{IngredientInput, MediaKind, MediaPayload};
use crate::recipe::{DetailedRecipe, IngredientAnalysis, InputMethod, RecipeOption};

pub const TEXT_ANALYSIS_FAILED: &str = "Could not analyze your ingredients. Please try again.";
pub const IMAGE_ANALYSIS_FAILED: &str = "Could not process the image. Please try again.";
pub const AUDIO_ANALYSIS_FAILED: &str = "Could not process the audio. Please try again.";
pub const DETAILS_FAILED: &str = "Could not load the recipe details.";
pub const MICROPHONE_DENIED: &str = "Could not access the microphone.";
pub const FAVORITES_SAVE_FAILED: &str = "Could not save your favorites.";

/// Which screen is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Method selection and the favorites strip.
    Home,
    /// An input method is chosen, waiting for input.
    Picking(InputMethod),
    /// Ingredient extraction in flight.
    Analyzing(InputMethod),
    /// Recipe candidates available.
    Listing(IngredientAnalysis),
    /// Detail fetch in flight for `recipe`.
    Cooking {
        analysis: IngredientAnalysis,
        recipe: RecipeOption,
    },
    Detail {
        recipe: DetailedRecipe,
        return_to: ReturnTo,
    },
    Favorites,
}

/// Where closing a detail view leads.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnTo {
    Home,
    Favorites,
    Listing(IngredientAnalysis),
}

/// Coarse processing status, one per view family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Analyzing,
    Listing,
    Cooking,
    Favorites,
}

/// Input for an analysis that still has to be acquired or sent.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisSource {
    Ready(IngredientInput),
    /// An image the caller must read before sending.
    ImageFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestKind {
    Analyze {
        method: InputMethod,
        source: AnalysisSource,
    },
    Details {
        recipe_name: String,
        ingredients: Vec<String>,
    },
}

/// Work the caller must perform, tagged with the generation that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub generation: u64,
    pub kind: RequestKind,
}

fn analysis_failure_message(method: InputMethod) -> &'static str {
    match method {
        InputMethod::Text => TEXT_ANALYSIS_FAILED,
        InputMethod::Image => IMAGE_ANALYSIS_FAILED,
        InputMethod::Audio => AUDIO_ANALYSIS_FAILED,
    }
}

pub struct Session {
    view: View,
    text_input: String,
    /// Inline error for the last failed transition.
    error: Option<String>,
    /// Blocking notice the UI must acknowledge.
    alert: Option<String>,
    is_recording: bool,
    generation: u64,
    favorites: Favorites,
    store: Box<dyn FavoritesStore>,
}

impl Session {
    /// Start a session, loading favorites once from `store`.
    pub fn new(store: Box<dyn FavoritesStore>) -> Self {
        let favorites = store.load();
        Self {
            view: View::Home,
            text_input: String::new(),
            error: None,
            alert: None,
            is_recording: false,
            generation: 0,
            favorites,
            store,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn status(&self) -> Status {
        match &self.view {
            View::Home | View::Picking(_) => Status::Idle,
            View::Analyzing(_) => Status::Analyzing,
            View::Listing(_) => Status::Listing,
            View::Cooking { .. } => Status::Cooking,
            View::Favorites => Status::Favorites,
            View::Detail { return_to, .. } => match return_to {
                ReturnTo::Home => Status::Idle,
                ReturnTo::Favorites => Status::Favorites,
                ReturnTo::Listing(_) => Status::Cooking,
            },
        }
    }

    /// The chosen input method, while one is in play.
    pub fn method(&self) -> Option<InputMethod> {
        match self.view {
            View::Picking(m) | View::Analyzing(m) => Some(m),
            _ => None,
        }
    }

    fn analysis(&self) -> Option<&IngredientAnalysis> {
        match &self.view {
            View::Listing(analysis) | View::Cooking { analysis, .. } => Some(analysis),
            View::Detail {
                return_to: ReturnTo::Listing(analysis),
                ..
            } => Some(analysis),
            _ => None,
        }
    }

    pub fn ingredients(&self) -> &[String] {
        self.analysis().map_or(&[], |a| &a.ingredients)
    }

    pub fn recipes(&self) -> &[RecipeOption] {
        self.analysis().map_or(&[], |a| &a.recipes)
    }

    pub fn selected_recipe(&self) -> Option<&DetailedRecipe> {
        match &self.view {
            View::Detail { recipe, .. } => Some(recipe),
            _ => None,
        }
    }

    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    /// A model call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self.view, View::Analyzing(_) | View::Cooking { .. })
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    fn enter(&mut self, view: View) {
        self.error = None;
        self.view = view;
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Back to a fresh start. Always allowed; outstanding requests become stale.
    pub fn reset(&mut self) {
        self.next_generation();
        self.enter(View::Home);
        self.text_input.clear();
        self.alert = None;
        self.is_recording = false;
        log::debug!("Session reset (generation {})", self.generation);
    }

    pub fn choose_method(&mut self, method: InputMethod) -> bool {
        if self.view != View::Home {
            return false;
        }
        self.enter(View::Picking(method));
        true
    }

    /// Leave the input screen without submitting.
    pub fn back(&mut self) -> bool {
        if !matches!(self.view, View::Picking(_)) || self.is_recording {
            return false;
        }
        self.enter(View::Home);
        true
    }

    pub fn set_text_input(&mut self, text: impl Into<String>) {
        self.text_input = text.into();
    }

    fn accepts_input(&self, method: InputMethod) -> bool {
        match self.view {
            View::Home => true,
            View::Picking(m) => m == method,
            _ => false,
        }
    }

    fn begin_analysis(&mut self, method: InputMethod, source: AnalysisSource) -> PendingRequest {
        let generation = self.next_generation();
        self.enter(View::Analyzing(method));
        log::info!("Analyzing {method:?} input (generation {generation})");
        PendingRequest {
            generation,
            kind: RequestKind::Analyze { method, source },
        }
    }

    /// Submit the typed ingredient list. Blank text is ignored.
    pub fn submit_text(&mut self) -> Option<PendingRequest> {
        let text = self.text_input.trim();
        if text.is_empty() || !self.accepts_input(InputMethod::Text) {
            return None;
        }
        let input = IngredientInput::Text(text.to_string());
        Some(self.begin_analysis(InputMethod::Text, AnalysisSource::Ready(input)))
    }

    /// Submit already-encoded media.
    pub fn submit_media(
        &mut self,
        payload: MediaPayload,
        kind: MediaKind,
    ) -> Option<PendingRequest> {
        let method = InputMethod::from(kind);
        if !self.accepts_input(method) {
            return None;
        }
        let input = IngredientInput::Media(payload);
        Some(self.begin_analysis(method, AnalysisSource::Ready(input)))
    }

    /// Submit an image the caller still has to read.
    pub fn submit_image_file(&mut self, path: PathBuf) -> Option<PendingRequest> {
        if !self.accepts_input(InputMethod::Image) {
            return None;
        }
        Some(self.begin_analysis(InputMethod::Image, AnalysisSource::ImageFile(path)))
    }

    fn is_stale(&self, generation: u64) -> bool {
        if generation != self.generation {
            log::debug!(
                "Discarding stale result (generation {generation}, current {})",
                self.generation
            );
            return true;
        }
        false
    }

    /// Apply an analysis result. Returns false if it was discarded.
    pub fn finish_analysis(&mut self, generation: u64, result: Result<IngredientAnalysis>) -> bool {
        if self.is_stale(generation) {
            return false;
        }
        let View::Analyzing(method) = self.view else {
            return false;
        };
        match result {
            Ok(analysis) => {
                log::info!(
                    "Found {} ingredients and {} recipes",
                    analysis.ingredients.len(),
                    analysis.recipes.len()
                );
                self.enter(View::Listing(analysis));
            }
            Err(e) if e.is_gateway_error() => {
                log::error!("Ingredient analysis failed: {e}");
                self.view = View::Picking(method);
                self.error = Some(analysis_failure_message(method).to_string());
            }
            Err(e) => {
                log::warn!("Ingredient input unusable: {e}");
                self.view = View::Picking(method);
                self.error = Some(analysis_failure_message(method).to_string());
            }
        }
        true
    }

    /// Ask for the full recipe of candidate `id`.
    pub fn select_recipe(&mut self, id: u32) -> Option<PendingRequest> {
        let View::Listing(analysis) = &self.view else {
            return None;
        };
        let recipe = analysis.recipes.iter().find(|r| r.id == id)?.clone();
        let analysis = analysis.clone();
        let ingredients = analysis.ingredients.clone();

        let generation = self.next_generation();
        let recipe_name = recipe.name.clone();
        log::info!("Cooking {recipe_name:?} (generation {generation})");
        self.enter(View::Cooking { analysis, recipe });
        Some(PendingRequest {
            generation,
            kind: RequestKind::Details {
                recipe_name,
                ingredients,
            },
        })
    }

    /// Apply a recipe details result. Returns false if it was discarded.
    pub fn finish_details(&mut self, generation: u64, result: Result<DetailedRecipe>) -> bool {
        if self.is_stale(generation) {
            return false;
        }
        let analysis = match std::mem::replace(&mut self.view, View::Home) {
            View::Cooking { analysis, .. } => analysis,
            other => {
                self.view = other;
                return false;
            }
        };
        match result {
            Ok(recipe) => self.enter(View::Detail {
                recipe,
                return_to: ReturnTo::Listing(analysis),
            }),
            Err(e) => {
                log::warn!("Recipe details failed: {e}");
                self.view = View::Listing(analysis);
                self.error = Some(DETAILS_FAILED.to_string());
            }
        }
        true
    }

    /// Media could not be captured or encoded before submission.
    pub fn media_failed(&mut self, kind: MediaKind, error: &ChefError) {
        let method = InputMethod::from(kind);
        if !self.accepts_input(method) {
            return;
        }
        log::warn!("{method:?} capture failed: {error}");
        self.is_recording = false;
        self.view = View::Picking(method);
        self.error = Some(analysis_failure_message(method).to_string());
    }

    pub fn can_record(&self) -> bool {
        self.view == View::Picking(InputMethod::Audio) && !self.is_recording
    }

    pub fn recording_started(&mut self) -> bool {
        if !self.can_record() {
            return false;
        }
        self.error = None;
        self.is_recording = true;
        true
    }

    /// Returns false if nothing was recording.
    pub fn recording_stopped(&mut self) -> bool {
        std::mem::replace(&mut self.is_recording, false)
    }

    /// Permission refused: nothing transitions, the user gets a blocking notice.
    pub fn media_access_denied(&mut self, detail: &str) {
        log::error!("Microphone unavailable: {detail}");
        self.is_recording = false;
        self.alert = Some(MICROPHONE_DENIED.to_string());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn open_favorites(&mut self) -> bool {
        if self.view != View::Home || self.favorites.is_empty() {
            return false;
        }
        self.enter(View::Favorites);
        true
    }

    pub fn close_favorites(&mut self) -> bool {
        if self.view != View::Favorites {
            return false;
        }
        self.enter(View::Home);
        true
    }

    /// Show a saved recipe from the home strip or the favorites list.
    pub fn open_favorite(&mut self, name: &str) -> bool {
        let return_to = match self.view {
            View::Home => ReturnTo::Home,
            View::Favorites => ReturnTo::Favorites,
            _ => return false,
        };
        let Some(recipe) = self.favorites.get(name).cloned() else {
            return false;
        };
        self.enter(View::Detail { recipe, return_to });
        true
    }

    pub fn close_detail(&mut self) -> bool {
        let return_to = match std::mem::replace(&mut self.view, View::Home) {
            View::Detail { return_to, .. } => return_to,
            other => {
                self.view = other;
                return false;
            }
        };
        self.enter(match return_to {
            ReturnTo::Home => View::Home,
            ReturnTo::Favorites => View::Favorites,
            ReturnTo::Listing(analysis) => View::Listing(analysis),
        });
        true
    }

    /// Favorite or unfavorite the recipe on screen. Returns the new favorite state.
    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let View::Detail { recipe, .. } = &self.view else {
            return None;
        };
        let now_favorite = self.favorites.toggle(recipe);
        self.persist();
        Some(now_favorite)
    }

    pub fn remove_favorite(&mut self, name: &str) -> bool {
        if !self.favorites.remove(name) {
            return false;
        }
        self.persist();
        true
    }

    fn persist(&mut self) {
        self.error = None;
        if let Err(e) = self.store.save(&self.favorites) {
            log::warn!("Failed to save favorites: {e}");
            self.error = Some(FAVORITES_SAVE_FAILED.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory store that records every save.
    #[derive(Clone, Default)]
    struct MemoryStore {
        initial: Favorites,
        saves: Rc<RefCell<Vec<Favorites>>>,
        fail: bool,
    }

    impl FavoritesStore for MemoryStore {
        fn load(&self) -> Favorites {
            self.initial.clone()
        }

        fn save(&self, favorites: &Favorites) -> Result<()> {
            if self.fail {
                return Err(ChefError::Io(std::io::Error::other("disk full")));
            }
            self.saves.borrow_mut().push(favorites.clone());
            Ok(())
        }
    }

    fn session() -> Session {
        Session::new(Box::new(MemoryStore::default()))
    }

    fn omelette_option() -> RecipeOption {
        RecipeOption {
            id: 1,
            name: "Potato Omelette".into(),
            time: "20 min".into(),
            extra_ingredients: vec![],
        }
    }

    fn analysis() -> IngredientAnalysis {
        IngredientAnalysis {
            ingredients: vec!["2 eggs".into(), "1 potato".into(), "cheese".into()],
            recipes: vec![omelette_option()],
        }
    }

    fn omelette() -> DetailedRecipe {
        DetailedRecipe {
            name: "Potato Omelette".into(),
            ingredients: vec!["2 eggs".into(), "1 potato".into()],
            instructions: vec![
                "Beat eggs".into(),
                "Fry potato".into(),
                "Combine and cook".into(),
            ],
            tips: vec!["Add salt to taste".into()],
            id: None,
        }
        .with_favorite_id()
    }

    fn listing_session() -> Session {
        listing_session_with(MemoryStore::default())
    }

    fn listing_session_with(store: MemoryStore) -> Session {
        let mut s = Session::new(Box::new(store));
        s.choose_method(InputMethod::Text);
        s.set_text_input("2 eggs, 1 potato, cheese");
        let req = s.submit_text().unwrap();
        assert!(s.finish_analysis(req.generation, Ok(analysis())));
        s
    }

    fn assert_fresh(s: &Session) {
        assert_eq!(s.view(), &View::Home);
        assert_eq!(s.status(), Status::Idle);
        assert_eq!(s.method(), None);
        assert!(s.ingredients().is_empty());
        assert!(s.recipes().is_empty());
        assert!(s.selected_recipe().is_none());
        assert_eq!(s.text_input(), "");
        assert_eq!(s.error(), None);
        assert_eq!(s.alert(), None);
        assert!(!s.is_recording());
    }

    #[test]
    fn test_text_submission_goes_to_listing() {
        let mut s = session();
        assert!(s.choose_method(InputMethod::Text));
        s.set_text_input("  2 eggs, 1 potato, cheese  ");

        let req = s.submit_text().unwrap();
        assert_eq!(s.status(), Status::Analyzing);
        assert!(s.is_busy());
        assert_eq!(
            req.kind,
            RequestKind::Analyze {
                method: InputMethod::Text,
                source: AnalysisSource::Ready(IngredientInput::Text(
                    "2 eggs, 1 potato, cheese".into()
                )),
            }
        );

        assert!(s.finish_analysis(req.generation, Ok(analysis())));
        assert_eq!(s.status(), Status::Listing);
        assert_eq!(s.ingredients(), analysis().ingredients.as_slice());
        assert_eq!(s.recipes(), analysis().recipes.as_slice());
    }

    #[test]
    fn test_blank_text_is_not_submitted() {
        let mut s = session();
        s.choose_method(InputMethod::Text);
        for blank in ["", "   ", "\n\t"] {
            s.set_text_input(blank);
            assert!(s.submit_text().is_none());
            assert_eq!(s.view(), &View::Picking(InputMethod::Text));
        }
    }

    #[test]
    fn test_analysis_failures_return_to_input() {
        for err in [
            ChefError::EmptyResponse,
            ChefError::MalformedResponse(serde_json::from_str::<u8>("x").unwrap_err()),
        ] {
            let mut s = session();
            s.choose_method(InputMethod::Text);
            s.set_text_input("rice");
            let req = s.submit_text().unwrap();

            assert!(s.finish_analysis(req.generation, Err(err)));
            assert_eq!(s.status(), Status::Idle);
            assert_eq!(s.view(), &View::Picking(InputMethod::Text));
            assert_eq!(s.error(), Some(TEXT_ANALYSIS_FAILED));
            assert!(s.ingredients().is_empty());
            assert!(s.recipes().is_empty());
            assert!(s.selected_recipe().is_none());
        }
    }

    #[test]
    fn test_media_failure_messages_per_kind() {
        let mut s = session();
        let req = s
            .submit_media(MediaPayload::from_bytes(b"wav", "audio/wav"), MediaKind::Audio)
            .unwrap();
        s.finish_analysis(req.generation, Err(ChefError::EmptyResponse));
        assert_eq!(s.error(), Some(AUDIO_ANALYSIS_FAILED));
        assert_eq!(s.view(), &View::Picking(InputMethod::Audio));

        s.reset();
        let req = s.submit_image_file(PathBuf::from("fridge.jpg")).unwrap();
        assert_eq!(s.method(), Some(InputMethod::Image));
        s.finish_analysis(req.generation, Err(ChefError::NoFileSelected));
        assert_eq!(s.error(), Some(IMAGE_ANALYSIS_FAILED));
    }

    #[test]
    fn test_new_transition_clears_error() {
        let mut s = session();
        s.choose_method(InputMethod::Text);
        s.set_text_input("rice");
        let req = s.submit_text().unwrap();
        s.finish_analysis(req.generation, Err(ChefError::EmptyResponse));
        assert!(s.error().is_some());

        s.submit_text().unwrap();
        assert_eq!(s.error(), None);
    }

    #[test]
    fn test_input_rejected_while_busy() {
        let mut s = session();
        s.set_text_input("rice");
        s.submit_text().unwrap();

        assert!(s.submit_text().is_none());
        assert!(s.submit_image_file(PathBuf::from("a.png")).is_none());
        assert!(!s.choose_method(InputMethod::Audio));
        assert!(!s.open_favorites());
    }

    #[test]
    fn test_full_scenario_favorites_once() {
        let store = MemoryStore::default();
        let saves = store.saves.clone();
        let mut s = Session::new(Box::new(store));
        s.choose_method(InputMethod::Text);
        s.set_text_input("2 eggs, 1 potato, cheese");
        let req = s.submit_text().unwrap();
        s.finish_analysis(req.generation, Ok(analysis()));

        let req = s.select_recipe(1).unwrap();
        assert_eq!(s.status(), Status::Cooking);
        assert_eq!(
            req.kind,
            RequestKind::Details {
                recipe_name: "Potato Omelette".into(),
                ingredients: analysis().ingredients,
            }
        );
        assert!(s.finish_details(req.generation, Ok(omelette())));
        assert_eq!(s.selected_recipe(), Some(&omelette()));

        assert_eq!(s.toggle_favorite(), Some(true));
        assert_eq!(s.favorites().len(), 1);
        assert!(s.is_favorite("Potato Omelette"));
        assert_eq!(saves.borrow().len(), 1);
        assert_eq!(saves.borrow()[0].len(), 1);
    }

    #[test]
    fn test_select_unknown_recipe() {
        let mut s = listing_session();
        assert!(s.select_recipe(42).is_none());
        assert_eq!(s.status(), Status::Listing);
    }

    #[test]
    fn test_details_failure_keeps_listing() {
        let mut s = listing_session();
        let req = s.select_recipe(1).unwrap();
        assert!(s.finish_details(req.generation, Err(ChefError::EmptyResponse)));

        assert_eq!(s.status(), Status::Listing);
        assert_eq!(s.error(), Some(DETAILS_FAILED));
        assert!(s.selected_recipe().is_none());
        assert_eq!(s.recipes(), analysis().recipes.as_slice());
        assert_eq!(s.ingredients(), analysis().ingredients.as_slice());
    }

    #[test]
    fn test_close_detail_returns_to_listing() {
        let mut s = listing_session();
        let req = s.select_recipe(1).unwrap();
        s.finish_details(req.generation, Ok(omelette()));

        assert!(s.close_detail());
        assert_eq!(s.view(), &View::Listing(analysis()));
    }

    #[test]
    fn test_favorites_browsing() {
        let store = MemoryStore {
            initial: Favorites::from_recipes(vec![omelette()]),
            ..MemoryStore::default()
        };
        let mut s = Session::new(Box::new(store));
        assert!(s.open_favorites());
        assert_eq!(s.status(), Status::Favorites);

        assert!(s.open_favorite("Potato Omelette"));
        assert_eq!(s.status(), Status::Favorites);
        assert!(s.selected_recipe().is_some());

        assert!(s.close_detail());
        assert_eq!(s.view(), &View::Favorites);
        assert!(s.close_favorites());
        assert_eq!(s.view(), &View::Home);

        assert!(s.open_favorite("Potato Omelette"));
        assert!(s.close_detail());
        assert_eq!(s.view(), &View::Home);
    }

    #[test]
    fn test_favorites_need_entries_and_home() {
        let mut s = session();
        assert!(!s.open_favorites());

        let mut s = listing_session();
        assert!(!s.open_favorites());
        assert!(!s.open_favorite("Potato Omelette"));
    }

    #[test]
    fn test_toggle_twice_restores_favorites() {
        let other = DetailedRecipe {
            name: "Toast".into(),
            ..omelette()
        };
        let store = MemoryStore {
            initial: Favorites::from_recipes(vec![other]),
            ..MemoryStore::default()
        };
        let mut s = listing_session_with(store);
        let original = s.favorites().clone();

        let req = s.select_recipe(1).unwrap();
        s.finish_details(req.generation, Ok(omelette()));

        assert_eq!(s.toggle_favorite(), Some(true));
        assert_eq!(s.toggle_favorite(), Some(false));
        assert_eq!(s.favorites(), &original);
    }

    #[test]
    fn test_remove_favorite_persists() {
        let store = MemoryStore {
            initial: Favorites::from_recipes(vec![omelette()]),
            ..MemoryStore::default()
        };
        let saves = store.saves.clone();
        let mut s = Session::new(Box::new(store));

        assert!(!s.remove_favorite("Nope"));
        assert!(saves.borrow().is_empty());
        assert!(s.remove_favorite("Potato Omelette"));
        assert!(saves.borrow()[0].is_empty());
    }

    #[test]
    fn test_save_failure_surfaces_error() {
        let store = MemoryStore {
            initial: Favorites::from_recipes(vec![omelette()]),
            fail: true,
            ..MemoryStore::default()
        };
        let mut s = Session::new(Box::new(store));
        assert!(s.remove_favorite("Potato Omelette"));
        assert_eq!(s.error(), Some(FAVORITES_SAVE_FAILED));
    }

    #[test]
    fn test_reset_from_every_state() {
        let mut states: Vec<Session> = Vec::new();

        states.push(session());

        let mut s = session();
        s.choose_method(InputMethod::Audio);
        s.recording_started();
        states.push(s);

        let mut s = session();
        s.set_text_input("rice");
        s.submit_text();
        states.push(s);

        states.push(listing_session());

        let mut s = listing_session();
        s.select_recipe(1);
        states.push(s);

        let mut s = listing_session();
        let req = s.select_recipe(1).unwrap();
        s.finish_details(req.generation, Ok(omelette()));
        s.toggle_favorite();
        states.push(s);

        let mut s = listing_session();
        let req = s.select_recipe(1).unwrap();
        s.finish_details(req.generation, Err(ChefError::EmptyResponse));
        states.push(s);

        let mut s = session();
        s.choose_method(InputMethod::Image);
        states.push(s);

        let mut s = session();
        s.choose_method(InputMethod::Audio);
        s.media_access_denied("no input device");
        assert!(s.alert().is_some());
        states.push(s);

        let saved = || MemoryStore {
            initial: Favorites::from_recipes(vec![omelette()]),
            ..MemoryStore::default()
        };

        let mut s = Session::new(Box::new(saved()));
        assert!(s.open_favorites());
        states.push(s);

        let mut s = Session::new(Box::new(saved()));
        s.open_favorites();
        assert!(s.open_favorite("Potato Omelette"));
        assert!(matches!(
            s.view(),
            View::Detail {
                return_to: ReturnTo::Favorites,
                ..
            }
        ));
        states.push(s);

        let mut s = Session::new(Box::new(saved()));
        assert!(s.open_favorite("Potato Omelette"));
        assert!(matches!(
            s.view(),
            View::Detail {
                return_to: ReturnTo::Home,
                ..
            }
        ));
        states.push(s);

        for mut s in states {
            s.reset();
            assert_fresh(&s);
        }
    }

    #[test]
    fn test_late_analysis_after_reset_is_discarded() {
        let mut s = session();
        s.set_text_input("rice");
        let req = s.submit_text().unwrap();

        s.reset();
        assert!(!s.finish_analysis(req.generation, Ok(analysis())));
        assert_fresh(&s);
    }

    #[test]
    fn test_late_result_does_not_hit_newer_request() {
        let mut s = session();
        s.set_text_input("rice");
        let old = s.submit_text().unwrap();
        s.reset();
        s.set_text_input("beans");
        let new = s.submit_text().unwrap();

        assert!(!s.finish_analysis(old.generation, Err(ChefError::EmptyResponse)));
        assert_eq!(s.status(), Status::Analyzing);
        assert_eq!(s.error(), None);

        assert!(s.finish_analysis(new.generation, Ok(analysis())));
        assert_eq!(s.status(), Status::Listing);
    }

    #[test]
    fn test_late_details_after_reset_is_discarded() {
        let mut s = listing_session();
        let req = s.select_recipe(1).unwrap();
        s.reset();
        assert!(!s.finish_details(req.generation, Ok(omelette())));
        assert!(s.selected_recipe().is_none());
    }

    #[test]
    fn test_recording_lifecycle() {
        let mut s = session();
        assert!(!s.recording_started());
        s.choose_method(InputMethod::Audio);

        assert!(s.recording_started());
        assert!(!s.recording_started());
        assert!(!s.back());
        assert!(s.recording_stopped());
        assert!(!s.recording_stopped());

        let req = s
            .submit_media(MediaPayload::from_bytes(b"wav", "audio/wav"), MediaKind::Audio)
            .unwrap();
        assert_eq!(s.method(), Some(InputMethod::Audio));
        assert!(matches!(
            req.kind,
            RequestKind::Analyze {
                method: InputMethod::Audio,
                source: AnalysisSource::Ready(IngredientInput::Media(_))
            }
        ));
    }

    #[test]
    fn test_microphone_denied_keeps_state() {
        let mut s = session();
        s.choose_method(InputMethod::Audio);
        let before = s.view().clone();

        s.media_access_denied("no input device");
        assert!(!s.is_recording());
        assert_eq!(s.view(), &before);
        assert_eq!(s.alert(), Some(MICROPHONE_DENIED));
        assert_eq!(s.error(), None);

        s.dismiss_alert();
        assert_eq!(s.alert(), None);
    }

    #[test]
    fn test_empty_recording_reports_audio_error() {
        let mut s = session();
        s.choose_method(InputMethod::Audio);
        s.recording_started();
        s.recording_stopped();

        s.media_failed(MediaKind::Audio, &ChefError::NoInput);
        assert_eq!(s.view(), &View::Picking(InputMethod::Audio));
        assert_eq!(s.error(), Some(AUDIO_ANALYSIS_FAILED));
    }

    #[test]
    fn test_media_failure_leaves_running_analysis_alone() {
        let mut s = session();
        let req = s
            .submit_media(MediaPayload::from_bytes(b"wav", "audio/wav"), MediaKind::Audio)
            .unwrap();

        s.media_failed(MediaKind::Audio, &ChefError::NoInput);
        assert_eq!(s.view(), &View::Analyzing(InputMethod::Audio));
        assert_eq!(s.error(), None);

        assert!(s.finish_analysis(req.generation, Ok(analysis())));
        assert_eq!(s.status(), Status::Listing);
    }

    #[test]
    fn test_picking_method_mismatch() {
        let mut s = session();
        s.choose_method(InputMethod::Audio);
        s.set_text_input("rice");
        assert!(s.submit_text().is_none());
        assert!(s.back());
        assert_eq!(s.view(), &View::Home);
    }
}
