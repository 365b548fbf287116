use gtk4::prelude::*;
use libadwaita::prelude::*;

use chefia::{Favorites, InputMethod};

use super::window::{clear, on_click, page_box};
use crate::app::AppEvent;

/// Favorites shown in the strip on the home page.
const STRIP_LEN: usize = 5;

pub struct HomePage {
    pub root: gtk4::Box,
    pub favorites_group: gtk4::Box,
    pub favorites_strip: gtk4::Box,
}

fn method_row(
    title: &str,
    subtitle: &str,
    icon: &str,
    method: InputMethod,
    sender: &async_channel::Sender<AppEvent>,
) -> libadwaita::ActionRow {
    let row = libadwaita::ActionRow::builder()
        .title(title)
        .subtitle(subtitle)
        .activatable(true)
        .build();
    row.add_prefix(&gtk4::Image::from_icon_name(icon));
    row.add_suffix(&gtk4::Image::from_icon_name("go-next-symbolic"));
    let sender = sender.clone();
    row.connect_activated(move |_| {
        let _ = sender.try_send(AppEvent::ChooseMethod(method));
        if method == InputMethod::Image {
            // Photos go straight to the picker
            let _ = sender.try_send(AppEvent::PickImage);
        }
    });
    row
}

pub fn build_home(sender: &async_channel::Sender<AppEvent>, initial_api_key: &str) -> HomePage {
    let root = page_box();

    let heading = gtk4::Label::new(Some("What's cooking today?"));
    heading.add_css_class("title-1");
    heading.set_wrap(true);
    root.append(&heading);

    let subheading = gtk4::Label::new(Some("Choose how to show me your ingredients."));
    subheading.add_css_class("dim-label");
    root.append(&subheading);

    // --- Input methods ---
    let methods = libadwaita::PreferencesGroup::new();
    methods.add(&method_row(
        "Write a list",
        "Type what's in your pantry",
        "document-edit-symbolic",
        InputMethod::Text,
        sender,
    ));
    methods.add(&method_row(
        "Take a photo",
        "Show your fridge or counter",
        "camera-photo-symbolic",
        InputMethod::Image,
        sender,
    ));
    methods.add(&method_row(
        "Say your ingredients",
        "Tell me what you found",
        "audio-input-microphone-symbolic",
        InputMethod::Audio,
        sender,
    ));
    root.append(&methods);

    // --- Favorites strip ---
    let favorites_group = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    let strip_header = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let strip_title = gtk4::Label::new(Some("Your favorites"));
    strip_title.add_css_class("heading");
    strip_title.set_hexpand(true);
    strip_title.set_xalign(0.0);
    strip_header.append(&strip_title);
    let see_all = gtk4::Button::with_label("See all");
    see_all.add_css_class("flat");
    on_click(&see_all, sender, || AppEvent::OpenFavorites);
    strip_header.append(&see_all);
    favorites_group.append(&strip_header);

    let favorites_strip = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let strip_scroll = gtk4::ScrolledWindow::builder()
        .vscrollbar_policy(gtk4::PolicyType::Never)
        .child(&favorites_strip)
        .build();
    favorites_group.append(&strip_scroll);
    favorites_group.set_visible(false);
    root.append(&favorites_group);

    // --- API Key ---
    let api_group = libadwaita::PreferencesGroup::new();
    api_group.set_title("Gemini API");
    let api_key_row = libadwaita::PasswordEntryRow::builder()
        .title("API Key")
        .text(initial_api_key)
        .build();
    let key_sender = sender.clone();
    api_key_row.connect_changed(move |row: &libadwaita::PasswordEntryRow| {
        let _ = key_sender.try_send(AppEvent::ApiKeyChanged(row.text().to_string()));
    });
    api_group.add(&api_key_row);
    root.append(&api_group);

    HomePage {
        root,
        favorites_group,
        favorites_strip,
    }
}

pub fn render_home(
    page: &HomePage,
    favorites: &Favorites,
    sender: &async_channel::Sender<AppEvent>,
) {
    clear(&page.favorites_strip);
    page.favorites_group.set_visible(!favorites.is_empty());

    for recipe in favorites.iter().take(STRIP_LEN) {
        let card = gtk4::Button::new();
        card.add_css_class("card");
        let label = gtk4::Label::new(Some(&recipe.name));
        label.set_wrap(true);
        label.set_max_width_chars(16);
        label.set_margin_top(8);
        label.set_margin_bottom(8);
        label.set_margin_start(8);
        label.set_margin_end(8);
        card.set_child(Some(&label));
        let name = recipe.name.clone();
        on_click(&card, sender, move || AppEvent::OpenFavorite(name.clone()));
        page.favorites_strip.append(&card);
    }
}
