mod favorites;
mod home;
mod recipes;
pub mod window;

use gtk4::prelude::*;

use chefia::{InputMethod, View};

use crate::app::AppState;

/// The text box owns the draft while it is on screen. It is only written
/// from the session to clear it after a reset.
fn should_clear_draft(view: &View, session_text: &str, buffer_text: &str) -> bool {
    *view != View::Picking(InputMethod::Text) && session_text.is_empty() && !buffer_text.is_empty()
}

/// Bring the window in line with the session.
pub fn render(state: &AppState) {
    let Some(ref w) = state.window else {
        return;
    };
    let session = &state.session;
    let view = session.view();

    w.reset_button.set_visible(*view != View::Home);
    w.reset_button.set_tooltip_text(Some(if session.is_busy() {
        "Cancel"
    } else {
        "Start over"
    }));
    let favorite_count = session.favorites().len();
    w.favorites_button.set_label(&format!("\u{2665} {favorite_count}"));
    w.favorites_button.set_visible(favorite_count > 0 && *view == View::Home);

    match session.error() {
        Some(message) => {
            w.error_label.set_text(message);
            w.error_label.set_visible(true);
        }
        None => w.error_label.set_visible(false),
    }

    let buffer = w.text_view.buffer();
    let draft = buffer.text(&buffer.start_iter(), &buffer.end_iter(), false);
    if should_clear_draft(view, session.text_input(), &draft) {
        buffer.block_signal(&w.text_changed);
        buffer.set_text("");
        buffer.unblock_signal(&w.text_changed);
    }

    let page = match view {
        View::Home => {
            home::render_home(&w.home, session.favorites(), &w.sender);
            "home"
        }
        View::Picking(InputMethod::Text) => {
            w.submit_button.set_sensitive(!draft.trim().is_empty());
            "text"
        }
        View::Picking(InputMethod::Audio) => {
            if session.is_recording() {
                w.record_area.add_css_class("recording");
                w.record_label.set_text("Release to finish");
            } else {
                w.record_area.remove_css_class("recording");
                w.record_label.set_text("Hold to talk");
            }
            "audio"
        }
        View::Picking(InputMethod::Image) => "image",
        View::Analyzing(_) => {
            w.busy_label.set_text("Analyzing ingredients\u{2026}");
            "busy"
        }
        View::Cooking { .. } => {
            w.busy_label.set_text("Preparing your recipe\u{2026}");
            "busy"
        }
        View::Listing(analysis) => {
            recipes::render_listing(&w.listing, analysis, &w.sender);
            "listing"
        }
        View::Detail { recipe, .. } => {
            recipes::render_detail(&w.detail, recipe, session.is_favorite(&recipe.name), &w.sender);
            "detail"
        }
        View::Favorites => {
            favorites::render_favorites(&w.favorites, session.favorites(), &w.sender);
            "favorites"
        }
    };
    w.stack.set_visible_child_name(page);

    match session.alert() {
        Some(message) => window::show_alert(w, message),
        None => w.alert_shown.set(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_is_never_rewritten_while_typing() {
        let typing = View::Picking(InputMethod::Text);
        assert!(!should_clear_draft(&typing, "", "abc"));
        assert!(!should_clear_draft(&typing, "a", "abc"));
    }

    #[test]
    fn test_draft_cleared_after_reset() {
        assert!(should_clear_draft(&View::Home, "", "2 eggs"));
        assert!(!should_clear_draft(&View::Home, "", ""));
        assert!(!should_clear_draft(&View::Analyzing(InputMethod::Text), "rice", "rice"));
    }
}
