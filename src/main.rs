mod app;
mod recorder;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;

use app::{AppEvent, AppState};

fn main() {
    env_logger::init();
    log::info!("ChefIA starting");

    let application = libadwaita::Application::builder()
        .application_id("com.github.chefia.ChefIA")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Widgets and background tasks both report here
    let (event_tx, event_rx) = async_channel::unbounded::<AppEvent>();

    let state = Rc::new(RefCell::new(AppState::new(event_tx.clone())));

    let widgets = ui::window::build_window(app, event_tx, &state.borrow().config.gemini_api_key);
    widgets.window.present();
    state.borrow_mut().window = Some(widgets);
    ui::render(&state.borrow());

    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = event_rx.recv().await {
                log::debug!("Event: {event:?}");
                app::handle_event(&state_clone, event);
            }
        });
    }
}
