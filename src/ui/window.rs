use std::cell::Cell;

use gtk4::prelude::*;
use gtk4::Align;
use libadwaita::prelude::*;

use super::home::{build_home, HomePage};
use crate::app::AppEvent;

const CSS: &str = r#"
.ingredient-chip {
    background-color: alpha(@accent_bg_color, 0.15);
    border-radius: 12px;
    padding: 4px 10px;
}
.error-banner {
    background-color: alpha(@error_bg_color, 0.15);
    color: @error_color;
    padding: 10px;
}
.record-area {
    background-color: @accent_bg_color;
    color: @accent_fg_color;
    border-radius: 80px;
    min-width: 160px;
    min-height: 160px;
}
.record-area.recording {
    background-color: @error_bg_color;
}
.step-number {
    font-weight: bold;
    color: @accent_color;
}
"#;

/// Handles returned from building the main window.
pub struct MainWidgets {
    pub window: libadwaita::ApplicationWindow,
    pub stack: gtk4::Stack,
    pub reset_button: gtk4::Button,
    pub favorites_button: gtk4::Button,
    pub error_label: gtk4::Label,
    pub home: HomePage,
    pub text_view: gtk4::TextView,
    pub text_changed: gtk4::glib::SignalHandlerId,
    pub submit_button: gtk4::Button,
    pub record_area: gtk4::Box,
    pub record_label: gtk4::Label,
    pub busy_label: gtk4::Label,
    pub listing: gtk4::Box,
    pub detail: gtk4::Box,
    pub favorites: gtk4::Box,
    pub alert_shown: Cell<bool>,
    pub sender: async_channel::Sender<AppEvent>,
}

fn send(sender: &async_channel::Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = sender.try_send(event) {
        log::warn!("Dropped UI event: {e}");
    }
}

/// Forward a button click as an event.
pub(crate) fn on_click<F>(
    button: &gtk4::Button,
    sender: &async_channel::Sender<AppEvent>,
    event: F,
) where
    F: Fn() -> AppEvent + 'static,
{
    let sender = sender.clone();
    button.connect_clicked(move |_| send(&sender, event()));
}

pub(crate) fn page_box() -> gtk4::Box {
    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 16);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content
}

pub(crate) fn title_label(text: &str) -> gtk4::Label {
    let label = gtk4::Label::new(Some(text));
    label.add_css_class("title-2");
    label.set_wrap(true);
    label.set_xalign(0.0);
    label
}

pub(crate) fn back_button(
    sender: &async_channel::Sender<AppEvent>,
    event: fn() -> AppEvent,
) -> gtk4::Button {
    let button = gtk4::Button::builder()
        .label("Back")
        .halign(Align::Start)
        .build();
    button.add_css_class("flat");
    on_click(&button, sender, event);
    button
}

pub(crate) fn clear(container: &gtk4::Box) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }
}

fn scrolled(child: &impl IsA<gtk4::Widget>) -> gtk4::ScrolledWindow {
    gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .child(child)
        .build()
}

struct TextPage {
    root: gtk4::Box,
    text_view: gtk4::TextView,
    text_changed: gtk4::glib::SignalHandlerId,
    submit_button: gtk4::Button,
}

fn build_text_page(sender: &async_channel::Sender<AppEvent>) -> TextPage {
    let page = page_box();
    page.append(&back_button(sender, || AppEvent::Back));
    page.append(&title_label("List your ingredients"));

    let text_view = gtk4::TextView::new();
    text_view.set_wrap_mode(gtk4::WrapMode::WordChar);
    text_view.set_height_request(160);
    text_view.add_css_class("card");
    let buffer_sender = sender.clone();
    let text_changed = text_view.buffer().connect_changed(move |buf| {
        let text = buf.text(&buf.start_iter(), &buf.end_iter(), false);
        send(&buffer_sender, AppEvent::TextChanged(text.to_string()));
    });
    page.append(&text_view);

    let hint = gtk4::Label::new(Some("e.g. 2 eggs, 1 potato, cheese, onion..."));
    hint.add_css_class("dim-label");
    hint.set_xalign(0.0);
    page.append(&hint);

    let submit_button = gtk4::Button::builder()
        .label("Find recipes")
        .halign(Align::End)
        .sensitive(false)
        .build();
    submit_button.add_css_class("suggested-action");
    submit_button.add_css_class("pill");
    on_click(&submit_button, sender, || AppEvent::SubmitText);
    page.append(&submit_button);

    TextPage {
        root: page,
        text_view,
        text_changed,
        submit_button,
    }
}

fn build_audio_page(
    sender: &async_channel::Sender<AppEvent>,
) -> (gtk4::Box, gtk4::Box, gtk4::Label) {
    let page = page_box();
    page.append(&back_button(sender, || AppEvent::Back));
    page.append(&title_label("Go ahead, I'm listening!"));

    let record_area = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    record_area.add_css_class("record-area");
    record_area.set_halign(Align::Center);
    record_area.set_margin_top(32);
    let mic = gtk4::Image::from_icon_name("audio-input-microphone-symbolic");
    mic.set_pixel_size(64);
    mic.set_vexpand(true);
    mic.set_valign(Align::Center);
    record_area.append(&mic);

    // Press starts capture; release or cancel stops it.
    let gesture = gtk4::GestureClick::new();
    let press_sender = sender.clone();
    gesture.connect_pressed(move |_, _, _, _| send(&press_sender, AppEvent::StartRecording));
    let release_sender = sender.clone();
    gesture.connect_released(move |_, _, _, _| send(&release_sender, AppEvent::StopRecording));
    let cancel_sender = sender.clone();
    gesture.connect_cancel(move |_, _| send(&cancel_sender, AppEvent::StopRecording));
    record_area.add_controller(gesture);
    page.append(&record_area);

    let record_label = gtk4::Label::new(Some("Hold to talk"));
    record_label.add_css_class("dim-label");
    page.append(&record_label);

    (page, record_area, record_label)
}

fn build_image_page(sender: &async_channel::Sender<AppEvent>) -> gtk4::Box {
    let page = page_box();
    page.append(&back_button(sender, || AppEvent::Back));
    page.append(&title_label("Show me your fridge or counter"));

    let pick = gtk4::Button::builder()
        .label("Choose a photo")
        .halign(Align::Center)
        .build();
    pick.add_css_class("suggested-action");
    pick.add_css_class("pill");
    on_click(&pick, sender, || AppEvent::PickImage);
    page.append(&pick);
    page
}

fn build_busy_page() -> (gtk4::Box, gtk4::Label) {
    let page = page_box();
    page.set_valign(Align::Center);
    page.set_vexpand(true);

    let spinner = gtk4::Spinner::new();
    spinner.set_size_request(48, 48);
    spinner.start();
    page.append(&spinner);

    let busy_label = gtk4::Label::new(None);
    busy_label.add_css_class("title-3");
    page.append(&busy_label);

    let hint = gtk4::Label::new(Some("This only takes a few seconds."));
    hint.add_css_class("dim-label");
    page.append(&hint);

    (page, busy_label)
}

/// Build the single application window and all of its pages.
pub fn build_window(
    app: &libadwaita::Application,
    sender: async_channel::Sender<AppEvent>,
    initial_api_key: &str,
) -> MainWidgets {
    let css_provider = gtk4::CssProvider::new();
    css_provider.load_from_string(CSS);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &css_provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("ChefIA")
        .default_width(480)
        .default_height(720)
        .build();

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();

    let reset_button = gtk4::Button::from_icon_name("go-home-symbolic");
    reset_button.set_tooltip_text(Some("Start over"));
    on_click(&reset_button, &sender, || AppEvent::Reset);
    header.pack_start(&reset_button);

    let favorites_button = gtk4::Button::with_label("\u{2665} 0");
    favorites_button.set_tooltip_text(Some("Your favorite recipes"));
    on_click(&favorites_button, &sender, || AppEvent::OpenFavorites);
    header.pack_end(&favorites_button);

    toolbar_view.add_top_bar(&header);

    let stack = gtk4::Stack::new();
    stack.set_transition_type(gtk4::StackTransitionType::Crossfade);

    let home = build_home(&sender, initial_api_key);
    stack.add_named(&scrolled(&home.root), Some("home"));

    let text_page = build_text_page(&sender);
    stack.add_named(&text_page.root, Some("text"));

    let (audio_page, record_area, record_label) = build_audio_page(&sender);
    stack.add_named(&audio_page, Some("audio"));

    stack.add_named(&build_image_page(&sender), Some("image"));

    let (busy_page, busy_label) = build_busy_page();
    stack.add_named(&busy_page, Some("busy"));

    let listing = page_box();
    stack.add_named(&scrolled(&listing), Some("listing"));
    let detail = page_box();
    stack.add_named(&scrolled(&detail), Some("detail"));
    let favorites = page_box();
    stack.add_named(&scrolled(&favorites), Some("favorites"));

    toolbar_view.set_content(Some(&stack));

    let error_label = gtk4::Label::new(None);
    error_label.add_css_class("error-banner");
    error_label.set_wrap(true);
    error_label.set_visible(false);
    toolbar_view.add_bottom_bar(&error_label);

    window.set_content(Some(&toolbar_view));

    MainWidgets {
        window,
        stack,
        reset_button,
        favorites_button,
        error_label,
        home,
        text_view: text_page.text_view,
        text_changed: text_page.text_changed,
        submit_button: text_page.submit_button,
        record_area,
        record_label,
        busy_label,
        listing,
        detail,
        favorites,
        alert_shown: Cell::new(false),
        sender,
    }
}

/// Open the platform file picker restricted to images.
pub fn pick_image(
    parent: &libadwaita::ApplicationWindow,
    sender: async_channel::Sender<AppEvent>,
) {
    let filter = gtk4::FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type("image/*");
    let filters = gtk4::gio::ListStore::new::<gtk4::FileFilter>();
    filters.append(&filter);

    let dialog = gtk4::FileDialog::builder()
        .title("Choose a photo of your ingredients")
        .modal(true)
        .build();
    dialog.set_filters(Some(&filters));
    dialog.set_default_filter(Some(&filter));

    dialog.open(
        Some(parent),
        None::<&gtk4::gio::Cancellable>,
        move |result| match result {
            Ok(file) => match file.path() {
                Some(path) => send(&sender, AppEvent::ImagePicked(path)),
                None => log::warn!("Selected file has no local path"),
            },
            Err(e) => log::info!("No image selected: {e}"),
        },
    );
}

/// Show a blocking notice; acknowledging it clears the alert.
pub fn show_alert(widgets: &MainWidgets, message: &str) {
    if widgets.alert_shown.replace(true) {
        return;
    }
    let dialog = libadwaita::AlertDialog::builder()
        .heading("Microphone")
        .body(message)
        .build();
    dialog.add_response("ok", "OK");

    let sender = widgets.sender.clone();
    let parent_widget: Option<&gtk4::Widget> = Some(widgets.window.upcast_ref());
    dialog.choose(parent_widget, None::<&gtk4::gio::Cancellable>, move |_response_id| {
        send(&sender, AppEvent::DismissAlert);
    });
}
