use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChefError, Result};
use crate::recipe::DetailedRecipe;

const FORMAT_VERSION: u32 = 1;

/// Saved recipes in insertion order, unique by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    recipes: Vec<DetailedRecipe>,
}

impl Favorites {
    /// Build from a list, keeping the first recipe of each name.
    pub fn from_recipes(recipes: Vec<DetailedRecipe>) -> Self {
        let mut favorites = Self::default();
        for recipe in recipes {
            if !favorites.contains(&recipe.name) {
                favorites.recipes.push(recipe);
            }
        }
        favorites
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.iter().any(|r| r.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&DetailedRecipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// Remove a favorite with the same name, or append this one.
    /// Returns whether the recipe is a favorite afterwards.
    pub fn toggle(&mut self, recipe: &DetailedRecipe) -> bool {
        if self.remove(&recipe.name) {
            false
        } else {
            self.recipes.push(recipe.clone());
            true
        }
    }

    /// Returns false if nothing had that name.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.name != name);
        self.recipes.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetailedRecipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Where the session keeps its favorites.
pub trait FavoritesStore {
    /// Read saved favorites. Never fails: unreadable data yields an empty set.
    fn load(&self) -> Favorites;

    /// Replace the stored favorites with `favorites`.
    fn save(&self, favorites: &Favorites) -> Result<()>;
}

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct FavoritesFile {
    version: u32,
    saved_at: DateTime<Utc>,
    favorites: Vec<DetailedRecipe>,
}

/// Accepts both the versioned envelope and a bare array of recipes.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFavorites {
    Versioned(FavoritesFile),
    Legacy(Vec<DetailedRecipe>),
}

/// JSON file store: ~/.local/share/chefia/favorites.json by default.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn quarantine_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    fn parse(data: &str) -> Result<Vec<DetailedRecipe>> {
        match serde_json::from_str::<StoredFavorites>(data) {
            Ok(StoredFavorites::Versioned(file)) if file.version > FORMAT_VERSION => Err(
                ChefError::StorageRead(format!("unsupported favorites version {}", file.version)),
            ),
            Ok(StoredFavorites::Versioned(file)) => Ok(file.favorites),
            Ok(StoredFavorites::Legacy(recipes)) => Ok(recipes),
            Err(e) => Err(ChefError::StorageRead(e.to_string())),
        }
    }

    /// Move unreadable data aside so the next save doesn't silently destroy it.
    fn quarantine(&self) {
        let target = self.quarantine_path();
        match fs::rename(&self.path, &target) {
            Ok(()) => log::warn!("Moved unreadable favorites to {}", target.display()),
            Err(e) => log::warn!("Failed to quarantine {}: {e}", self.path.display()),
        }
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Favorites {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Favorites::default(),
            Err(e) => {
                log::warn!("Failed to read favorites: {e}");
                self.quarantine();
                return Favorites::default();
            }
        };
        let parsed = String::from_utf8(bytes)
            .map_err(|e| ChefError::StorageRead(e.to_string()))
            .and_then(|data| Self::parse(&data));
        match parsed {
            Ok(recipes) => {
                let favorites = Favorites::from_recipes(recipes);
                log::info!("Loaded {} favorites", favorites.len());
                favorites
            }
            Err(e) => {
                log::warn!("{e}");
                self.quarantine();
                Favorites::default()
            }
        }
    }

    fn save(&self, favorites: &Favorites) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = FavoritesFile {
            version: FORMAT_VERSION,
            saved_at: Utc::now(),
            favorites: favorites.recipes.clone(),
        };
        let data = serde_json::to_string_pretty(&file).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
