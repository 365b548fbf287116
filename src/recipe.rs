use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize};

/// Length of the name-derived favorites id.
const FAVORITE_ID_LEN: usize = 10;

/// How the user is showing us their ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMethod {
    Text,
    Image,
    Audio,
}

/// A recipe candidate offered before full details are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeOption {
    #[serde(deserialize_with = "number_as_u32")]
    pub id: u32,
    pub name: String,
    /// Free-text duration, e.g. "20 min".
    pub time: String,
    pub extra_ingredients: Vec<String>,
}

/// Result of an ingredient analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAnalysis {
    pub ingredients: Vec<String>,
    pub recipes: Vec<RecipeOption>,
}

/// A fully realized recipe. Favorites are compared by `name`, never by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedRecipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl DetailedRecipe {
    /// Attach the name-derived id.
    pub fn with_favorite_id(mut self) -> Self {
        self.id = Some(favorite_id(&self.name));
        self
    }
}

/// Base64 of the recipe name, truncated.
pub fn favorite_id(name: &str) -> String {
    STANDARD
        .encode(name.as_bytes())
        .chars()
        .take(FAVORITE_ID_LEN)
        .collect()
}

// The schema declares `id` as NUMBER, so the model may send 1.0.
fn number_as_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(serde::de::Error::custom(format!("invalid recipe id {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_id_truncates_base64() {
        // base64("Potato Omelette") = "UG90YXRvIE9tZWxldHRl"
        assert_eq!(favorite_id("Potato Omelette"), "UG90YXRvIE");
        assert_eq!(favorite_id("Egg"), "RWdn");
        assert_eq!(favorite_id(""), "");
    }

    #[test]
    fn test_favorite_id_handles_unicode() {
        let id = favorite_id("Pão de queijo");
        assert_eq!(id.len(), 10);
    }

    #[test]
    fn test_recipe_option_wire_names() {
        let option: RecipeOption = serde_json::from_str(
            r#"{"id": 1.0, "name": "Potato Omelette", "time": "20 min", "extraIngredients": ["salt"]}"#,
        )
        .unwrap();
        assert_eq!(option.id, 1);
        assert_eq!(option.extra_ingredients, vec!["salt".to_string()]);

        let json = serde_json::to_value(&option).unwrap();
        assert!(json.get("extraIngredients").is_some());
    }

    #[test]
    fn test_recipe_option_rejects_fractional_id() {
        let result = serde_json::from_str::<RecipeOption>(
            r#"{"id": 1.5, "name": "x", "time": "1 min", "extraIngredients": []}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_detailed_recipe_id_optional() {
        let recipe: DetailedRecipe = serde_json::from_str(
            r#"{"name": "Toast", "ingredients": ["bread"], "instructions": ["Toast it"], "tips": []}"#,
        )
        .unwrap();
        assert_eq!(recipe.id, None);
        assert_eq!(recipe.with_favorite_id().id.as_deref(), Some("VG9hc3Q="));
    }
}
