use std::cell::RefCell;
use std::rc::Rc;

use super::pipeline::dispatch_request;
use super::recording::{cancel_recording, start_recording, stop_recording};
use super::state::{AppEvent, AppState};

/// Handle one event, then redraw. This is the only place the session is driven from.
pub fn handle_event(state: &Rc<RefCell<AppState>>, event: AppEvent) {
    match event {
        AppEvent::Reset => {
            cancel_recording(state);
            state.borrow_mut().session.reset();
        }
        AppEvent::ChooseMethod(method) => {
            state.borrow_mut().session.choose_method(method);
        }
        AppEvent::Back => {
            state.borrow_mut().session.back();
        }
        AppEvent::TextChanged(text) => state.borrow_mut().session.set_text_input(text),
        AppEvent::SubmitText => {
            let request = state.borrow_mut().session.submit_text();
            if let Some(request) = request {
                dispatch_request(state, request);
            }
        }
        AppEvent::PickImage => {
            let s = state.borrow();
            if let Some(ref widgets) = s.window {
                crate::ui::window::pick_image(&widgets.window, widgets.sender.clone());
            }
        }
        AppEvent::ImagePicked(path) => {
            log::info!("Image selected: {}", path.display());
            let request = state.borrow_mut().session.submit_image_file(path);
            if let Some(request) = request {
                dispatch_request(state, request);
            }
        }
        AppEvent::StartRecording => start_recording(state),
        AppEvent::StopRecording => stop_recording(state),
        AppEvent::SelectRecipe(id) => {
            let request = state.borrow_mut().session.select_recipe(id);
            if let Some(request) = request {
                dispatch_request(state, request);
            }
        }
        AppEvent::CloseDetail => {
            state.borrow_mut().session.close_detail();
        }
        AppEvent::ToggleFavorite => {
            if let Some(now_favorite) = state.borrow_mut().session.toggle_favorite() {
                log::info!("Favorite toggled: {now_favorite}");
            }
        }
        AppEvent::OpenFavorites => {
            state.borrow_mut().session.open_favorites();
        }
        AppEvent::CloseFavorites => {
            state.borrow_mut().session.close_favorites();
        }
        AppEvent::OpenFavorite(name) => {
            state.borrow_mut().session.open_favorite(&name);
        }
        AppEvent::RemoveFavorite(name) => {
            state.borrow_mut().session.remove_favorite(&name);
        }
        AppEvent::DismissAlert => state.borrow_mut().session.dismiss_alert(),
        AppEvent::ApiKeyChanged(key) => state.borrow_mut().set_api_key(key),
        AppEvent::AnalysisFinished { generation, result } => {
            if !state.borrow_mut().session.finish_analysis(generation, result) {
                log::info!("Ignoring analysis result from request {generation}");
            }
        }
        AppEvent::DetailsFinished { generation, result } => {
            if !state.borrow_mut().session.finish_details(generation, result) {
                log::info!("Ignoring recipe details from request {generation}");
            }
        }
    }

    crate::ui::render(&state.borrow());
}
