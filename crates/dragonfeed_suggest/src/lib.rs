//! Smart suggestion filter: the one async boundary of the engine.
//!
//! A text-generation upstream proposes candidate foods; everything it claims
//! is re-validated here. Points are always recomputed through the pricing
//! rules, candidates are filtered by taste preference, and the final list is
//! guaranteed to contain at least one zero-cost option. Upstream failures
//! are hard errors: an empty list and "could not determine suggestions" are
//! different things and callers must be able to tell them apart.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use dragonfeed_engine::{DailyNutritionTotals, FoodItem, NutritionTargets};

pub mod config;
pub mod fallback;
pub mod filter;
pub mod http_client;
pub mod repair;

/// Maximum length of the final suggestion list.
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("generation upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },
    #[error("generation output contained no JSON object")]
    MissingPayload,
    #[error("generation output unparseable after repair: {0}")]
    MalformedGeneration(String),
    #[error("generation request cancelled")]
    Cancelled,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TastePreference {
    Sweet,
    Salty,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Request envelope sent to the generation upstream.
#[derive(Clone, Debug, Serialize, JsonSchema)]
pub struct SuggestionRequest {
    pub totals: DailyNutritionTotals,
    pub targets: NutritionTargets,
    pub available_points: u32,
    pub taste_preference: TastePreference,
    pub time_of_day: TimeOfDay,
    pub consumed_items: Vec<String>,
    pub calories_remaining: f64,
    pub points_remaining: u32,
}

/// One candidate as claimed by the generation source. Nothing in here is
/// trusted until [`filter::refine_suggestions`] has re-validated it; in
/// particular `points` is always discarded and recomputed.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct RawSuggestion {
    pub name: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub taste: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein_g: Option<f64>,
    #[serde(default)]
    pub carbs_g: Option<f64>,
    #[serde(default)]
    pub fat_g: Option<f64>,
    #[serde(default)]
    pub points: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub portion: Option<String>,
    #[serde(default)]
    pub grams: Option<f64>,
}

/// Wire shape of the JSON object expected inside the generated text.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct GenerationPayload {
    pub suggestions: Vec<RawSuggestion>,
}

/// A validated suggestion with its recomputed price.
#[derive(Clone, Debug, Serialize, PartialEq, JsonSchema)]
pub struct Suggestion {
    pub name: String,
    pub reason: Option<String>,
    pub taste: TastePreference,
    /// Recomputed via the pricing rules, never the claimed value.
    pub points: u32,
    pub food: FoodItem,
    pub portion: Option<String>,
    pub grams: Option<f64>,
}

/// Upstream text-generation source. Implementations should respect the
/// cancellation signal and abort the in-flight request when it fires.
#[async_trait]
pub trait GenerationClient: Send + Sync + 'static {
    async fn generate(
        &self,
        request: &SuggestionRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<String, SuggestError>;
}

/// Full pipeline: call the upstream, extract/repair/parse its JSON, then
/// re-validate every candidate.
///
/// Any upstream or parse failure propagates as an error; there is no silent
/// empty-result fallback.
pub async fn fetch_suggestions(
    client: &dyn GenerationClient,
    request: &SuggestionRequest,
    cancel: watch::Receiver<bool>,
) -> Result<Vec<Suggestion>, SuggestError> {
    let text = client.generate(request, cancel).await?;
    let payload = repair::parse_generation(&text)?;
    Ok(filter::refine_suggestions(
        payload.suggestions,
        request.taste_preference,
        request.time_of_day,
    ))
}
