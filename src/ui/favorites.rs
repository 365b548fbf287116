use gtk4::prelude::*;
use libadwaita::prelude::*;

use chefia::Favorites;

use super::window::{back_button, clear, title_label};
use crate::app::AppEvent;

/// List every saved recipe with open and remove actions.
pub fn render_favorites(
    container: &gtk4::Box,
    favorites: &Favorites,
    sender: &async_channel::Sender<AppEvent>,
) {
    clear(container);
    container.append(&back_button(sender, || AppEvent::CloseFavorites));
    container.append(&title_label("Your favorite recipes"));

    if favorites.is_empty() {
        let empty_label = gtk4::Label::new(Some("No favorites saved yet."));
        empty_label.add_css_class("dim-label");
        empty_label.set_vexpand(true);
        empty_label.set_valign(gtk4::Align::Center);
        container.append(&empty_label);
        return;
    }

    let group = libadwaita::PreferencesGroup::new();
    for recipe in favorites.iter() {
        let row = libadwaita::ActionRow::builder()
            .title(&recipe.name)
            .subtitle(format!("{} ingredients saved", recipe.ingredients.len()))
            .activatable(true)
            .build();

        let open_sender = sender.clone();
        let open_name = recipe.name.clone();
        row.connect_activated(move |_| {
            let _ = open_sender.try_send(AppEvent::OpenFavorite(open_name.clone()));
        });

        let remove = gtk4::Button::from_icon_name("user-trash-symbolic");
        remove.set_valign(gtk4::Align::Center);
        remove.set_tooltip_text(Some("Remove from favorites"));
        remove.add_css_class("flat");
        let remove_sender = sender.clone();
        let remove_name = recipe.name.clone();
        remove.connect_clicked(move |_| {
            let _ = remove_sender.try_send(AppEvent::RemoveFavorite(remove_name.clone()));
        });
        row.add_suffix(&remove);

        group.add(&row);
    }
    container.append(&group);
}
