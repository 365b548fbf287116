//! Gemini gateway: one structured-output call per operation, no retries, no streaming.
//!
//! The response schema is the only contract with the model. Field types are checked by
//! deserialization; array contents are passed through untouched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;
use crate::error::{ChefError, Result};
use crate::media::{IngredientInput, MediaPayload};
use crate::recipe::{DetailedRecipe, IngredientAnalysis};

const SYSTEM_PROMPT: &str = r#"You are ChefIA, a smart kitchen assistant who creates practical, tasty and realistic everyday recipes using only the ingredients the user already has at home.
Your goal is to help hungry people cook something easy without extra shopping.
Use simple, friendly language. Never invent ingredients.
Always return the data in the requested JSON format."#;

const MEDIA_ANALYSIS_PROMPT: &str = "Identify the ingredients in this media and suggest 3 simple recipes that can be made with them or with a few common extras (salt, oil, sugar). Return JSON with the list of identified 'ingredients' and the 'recipes' (id, name, time, extraIngredients).";

/// Gemini request types
#[derive(Debug, Serialize)]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

/// Gemini response types
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
            "recipes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "NUMBER" },
                        "name": { "type": "STRING" },
                        "time": { "type": "STRING" },
                        "extraIngredients": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["id", "name", "time", "extraIngredients"]
                }
            }
        },
        "required": ["ingredients", "recipes"]
    })
}

fn details_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
            "instructions": { "type": "ARRAY", "items": { "type": "STRING" } },
            "tips": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["name", "ingredients", "instructions", "tips"]
    })
}

fn text_analysis_prompt(ingredients: &str) -> String {
    format!(
        "Based on these ingredients: \"{ingredients}\", suggest 3 simple recipes. Return JSON with the list of 'ingredients' and the 'recipes' (id, name, time, extraIngredients)."
    )
}

fn details_prompt(recipe_name: &str, available: &[String]) -> String {
    format!(
        "Write detailed cooking steps for the recipe \"{recipe_name}\" using the ingredients: {}.\nReturn JSON with: name, ingredients (only the ones used), instructions (list of short steps), tips (list of tips and substitutions).",
        available.join(", ")
    )
}

fn analysis_parts(input: &IngredientInput) -> Vec<Part> {
    match input {
        IngredientInput::Text(text) => vec![Part::Text {
            text: text_analysis_prompt(text),
        }],
        IngredientInput::Media(MediaPayload { data, mime_type }) => vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
            },
            Part::Text {
                text: MEDIA_ANALYSIS_PROMPT.to_string(),
            },
        ],
    }
}

fn build_request(parts: Vec<Part>, schema: Value) -> GeminiRequest {
    GeminiRequest {
        system_instruction: Content {
            parts: vec![Part::Text {
                text: SYSTEM_PROMPT.to_string(),
            }],
        },
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema,
        },
    }
}

/// Concatenated text of the first candidate, if any.
fn extract_text(response: GeminiResponse) -> Option<String> {
    let text: String = response
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_structured<T: DeserializeOwned>(text: Option<String>) -> Result<T> {
    let text = text.ok_or(ChefError::EmptyResponse)?;
    Ok(serde_json::from_str(&text)?)
}

fn map_api_error(status: u16, body: &str) -> ChefError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string());
    ChefError::Api { status, message }
}

/// Client for the two recipe operations.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            model: config.model.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    /// Identify ingredients in text or media and propose recipe candidates.
    pub async fn analyze_ingredients(&self, input: &IngredientInput) -> Result<IngredientAnalysis> {
        log::info!(
            "Analyzing ingredients ({})",
            if input.is_media() { "media" } else { "text" }
        );
        let text = self
            .generate(build_request(analysis_parts(input), analysis_schema()))
            .await?;
        let analysis: IngredientAnalysis = parse_structured(text)?;
        log::debug!(
            "Model found {} ingredients, {} recipes",
            analysis.ingredients.len(),
            analysis.recipes.len()
        );
        Ok(analysis)
    }

    /// Fetch full instructions for one candidate.
    pub async fn recipe_details(
        &self,
        recipe_name: &str,
        available_ingredients: &[String],
    ) -> Result<DetailedRecipe> {
        log::info!("Fetching details for {recipe_name:?}");
        let parts = vec![Part::Text {
            text: details_prompt(recipe_name, available_ingredients),
        }];
        let text = self.generate(build_request(parts, details_schema())).await?;
        let recipe: DetailedRecipe = parse_structured(text)?;
        Ok(recipe.with_favorite_id())
    }

    async fn generate(&self, body: GeminiRequest) -> Result<Option<String>> {
        if self.api_key.is_empty() {
            return Err(ChefError::MissingApiKey);
        }
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            log::error!("Gemini API error {status}");
            return Err(map_api_error(status.as_u16(), &text));
        }

        let gemini_resp: GeminiResponse = resp.json().await?;
        Ok(extract_text(gemini_resp))
    }
}
