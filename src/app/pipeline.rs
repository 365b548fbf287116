use std::cell::RefCell;
use std::rc::Rc;

use chefia::media;
use chefia::session::{AnalysisSource, RequestKind};
use chefia::{ChefError, GeminiClient, IngredientAnalysis, IngredientInput, PendingRequest};

use super::state::{AppEvent, AppState};

/// Run a session request on the tokio runtime and report back through the event channel.
pub fn dispatch_request(state: &Rc<RefCell<AppState>>, request: PendingRequest) {
    let s = state.borrow();
    let sender = s.event_sender.clone();
    let PendingRequest { generation, kind } = request;

    let Some(gemini) = s.gemini.clone() else {
        let err = ChefError::Http("Gemini client unavailable".into());
        let _ = sender.try_send(failure_event(&kind, generation, err));
        return;
    };

    s.tokio_rt.spawn(async move {
        let event = match kind {
            RequestKind::Analyze { source, .. } => AppEvent::AnalysisFinished {
                generation,
                result: analyze(&gemini, source).await,
            },
            RequestKind::Details {
                recipe_name,
                ingredients,
            } => AppEvent::DetailsFinished {
                generation,
                result: gemini.recipe_details(&recipe_name, &ingredients).await,
            },
        };
        let _ = sender.send(event).await;
    });
}

async fn analyze(
    gemini: &GeminiClient,
    source: AnalysisSource,
) -> chefia::Result<IngredientAnalysis> {
    let input = match source {
        AnalysisSource::Ready(input) => input,
        AnalysisSource::ImageFile(path) => IngredientInput::Media(media::read_image(&path).await?),
    };
    gemini.analyze_ingredients(&input).await
}

fn failure_event(kind: &RequestKind, generation: u64, err: ChefError) -> AppEvent {
    match kind {
        RequestKind::Analyze { .. } => AppEvent::AnalysisFinished {
            generation,
            result: Err(err),
        },
        RequestKind::Details { .. } => AppEvent::DetailsFinished {
            generation,
            result: Err(err),
        },
    }
}
