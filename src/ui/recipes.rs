use gtk4::prelude::*;
use gtk4::Align;
use libadwaita::prelude::*;

use chefia::{DetailedRecipe, IngredientAnalysis, RecipeOption};

use super::window::{back_button, clear, on_click, title_label};
use crate::app::AppEvent;

fn section_label(text: &str) -> gtk4::Label {
    let label = gtk4::Label::new(Some(text));
    label.add_css_class("heading");
    label.set_xalign(0.0);
    label.set_margin_top(8);
    label
}

fn extras_text(recipe: &RecipeOption) -> String {
    match recipe.extra_ingredients.len() {
        0 => "You already have everything!".to_string(),
        n => format!("+{n} extra items"),
    }
}

fn recipe_row(
    recipe: &RecipeOption,
    sender: &async_channel::Sender<AppEvent>,
) -> libadwaita::ActionRow {
    let row = libadwaita::ActionRow::builder()
        .title(format!("{}. {}", recipe.id, recipe.name))
        .subtitle(format!("{} \u{00b7} {}", recipe.time, extras_text(recipe)))
        .activatable(true)
        .build();
    if !recipe.extra_ingredients.is_empty() {
        row.set_tooltip_text(Some(&recipe.extra_ingredients.join(", ")));
    }
    row.add_suffix(&gtk4::Image::from_icon_name("go-next-symbolic"));
    let sender = sender.clone();
    let id = recipe.id;
    row.connect_activated(move |_| {
        let _ = sender.try_send(AppEvent::SelectRecipe(id));
    });
    row
}

/// Found ingredients as chips, then one row per candidate.
pub fn render_listing(
    container: &gtk4::Box,
    analysis: &IngredientAnalysis,
    sender: &async_channel::Sender<AppEvent>,
) {
    clear(container);

    container.append(&section_label("Ingredients found:"));
    let chips = gtk4::FlowBox::new();
    chips.set_selection_mode(gtk4::SelectionMode::None);
    chips.set_max_children_per_line(6);
    for ingredient in &analysis.ingredients {
        let chip = gtk4::Label::new(Some(ingredient));
        chip.add_css_class("ingredient-chip");
        chips.insert(&chip, -1);
    }
    container.append(&chips);

    container.append(&title_label("Suggestions for you:"));
    if analysis.recipes.is_empty() {
        let empty = gtk4::Label::new(Some(
            "No recipes came back. Try adding a few more ingredients.",
        ));
        empty.add_css_class("dim-label");
        empty.set_wrap(true);
        container.append(&empty);
        return;
    }

    let group = libadwaita::PreferencesGroup::new();
    for recipe in &analysis.recipes {
        group.add(&recipe_row(recipe, sender));
    }
    container.append(&group);
}

/// Ingredients, numbered steps and tips for one recipe.
pub fn render_detail(
    container: &gtk4::Box,
    recipe: &DetailedRecipe,
    is_favorite: bool,
    sender: &async_channel::Sender<AppEvent>,
) {
    clear(container);

    let header = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    let title = title_label(&recipe.name);
    title.add_css_class("title-1");
    title.set_hexpand(true);
    header.append(&title);

    let favorite = gtk4::Button::from_icon_name(if is_favorite {
        "starred-symbolic"
    } else {
        "non-starred-symbolic"
    });
    favorite.set_valign(Align::Center);
    favorite.set_tooltip_text(Some(if is_favorite {
        "Remove from favorites"
    } else {
        "Save to favorites"
    }));
    if is_favorite {
        favorite.add_css_class("accent");
    }
    on_click(&favorite, sender, || AppEvent::ToggleFavorite);
    header.append(&favorite);
    container.append(&header);

    container.append(&section_label("Ingredients"));
    let ingredients = libadwaita::PreferencesGroup::new();
    for ingredient in &recipe.ingredients {
        ingredients.add(&libadwaita::ActionRow::builder().title(ingredient).build());
    }
    container.append(&ingredients);

    container.append(&section_label("Method"));
    for (i, step) in recipe.instructions.iter().enumerate() {
        let line = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
        let number = gtk4::Label::new(Some(&(i + 1).to_string()));
        number.add_css_class("step-number");
        number.set_valign(Align::Start);
        line.append(&number);
        let text = gtk4::Label::new(Some(step));
        text.set_wrap(true);
        text.set_xalign(0.0);
        text.set_hexpand(true);
        line.append(&text);
        container.append(&line);
    }

    if !recipe.tips.is_empty() {
        container.append(&section_label("Chef's tips"));
        for tip in &recipe.tips {
            let tip_label = gtk4::Label::new(Some(&format!("\u{2022} {tip}")));
            tip_label.set_wrap(true);
            tip_label.set_xalign(0.0);
            tip_label.add_css_class("dim-label");
            container.append(&tip_label);
        }
    }

    container.append(&back_button(sender, || AppEvent::CloseDetail));
}
