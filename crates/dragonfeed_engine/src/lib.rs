//! Pure scoring engine for the dragon food log: food pricing, nutrition
//! aggregation, streak derivation and the points ledger policy.
//!
//! Every function here is synchronous and total over in-memory values. The
//! engine never reads the host clock; date-relative computations take the
//! reference date as an explicit argument.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

pub mod catalog;
pub mod dates;
pub mod ledger;
pub mod nutrition;
pub mod pricing;
pub mod streak;

pub use catalog::FoodCatalog;

/// Qualitative food labels driving the pricing rules.
///
/// The set is closed; labels from older catalogs that no longer exist map to
/// [`FoodTag::Other`] and carry no pricing effect.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FoodTag {
    LeanProtein,
    Vegetable,
    SimpleStarch,
    WholeGrain,
    UltraProcessed,
    Sugary,
    Alcohol,
    Fried,
    HealthyDessert,
    #[serde(other)]
    Other,
}

/// A catalog entry: static food database rows and user-defined custom foods
/// share this shape and the same id namespace.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<FoodTag>,
    /// 0-100 healthiness heuristic.
    #[serde(default)]
    pub base_score: u8,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub protein_g: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub carbs_g: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub fat_g: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub calories_kcal: Option<f64>,
    /// Explicit points override; when present it is authoritative and the
    /// computed price is ignored.
    #[serde(default)]
    pub points: Option<u32>,
}

impl FoodItem {
    pub fn has_tag(&self, tag: FoodTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// A line item inside a meal, referencing the merged food table by id.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct FoodItemRef {
    pub food_id: String,
    /// Portion scale factor; absent means exactly 1.0.
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub multiplier: Option<f64>,
    #[serde(default)]
    pub portion: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub grams: Option<f64>,
    #[serde(default)]
    pub quantity: Option<String>,
}

impl FoodItemRef {
    /// Effective portion multiplier (missing means exactly 1.0).
    pub fn multiplier(&self) -> f64 {
        self.multiplier.unwrap_or(1.0)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MealCategory {
    Healthy,
    Ok,
    Cheat,
}

/// A logged meal. `created_at` is an ISO-8601 timestamp and is authoritative
/// for calendar-date bucketing.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct MealEntry {
    pub id: String,
    pub label: String,
    pub category: MealCategory,
    /// 0-100, supplied manually or computed by the aggregator.
    #[serde(default)]
    pub score: u8,
    pub created_at: String,
    #[serde(default)]
    pub items: Vec<FoodItemRef>,
}

/// User-configured daily macro goals.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct NutritionTargets {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub calories_kcal: f64,
    pub fat_g: f64,
    #[serde(default)]
    pub dairy_servings: Option<f64>,
}

/// Computed per-day macro sums. Always non-negative; missing per-item macro
/// values contribute 0.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, JsonSchema)]
pub struct DailyNutritionTotals {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub calories_kcal: f64,
    pub fat_g: f64,
}

/// Derived streak view, recomputed on every query from the full fed-day set.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, JsonSchema)]
pub struct StreakStats {
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub total_fed_days: u32,
    /// Capped at the 12 visual dragon stages.
    pub evolutions_unlocked: u32,
    /// 0.0..=1.0 within the current 30-day band.
    pub progress_to_next_evolution: f64,
    /// Uncapped milestone counter, used for one-time bonus awards.
    pub streak_bonus_earned: u32,
    pub is_streak_bonus_day: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DragonMood {
    Normal,
    Worried,
    Critical,
}

/// Dragon mood derived from the most recent fed day relative to "today".
#[derive(Clone, Copy, Debug, Serialize, PartialEq, JsonSchema)]
pub struct DragonStatus {
    pub mood: DragonMood,
    pub days_since_last_meal: i64,
}

/// Accept a JSON number or a numeric string for macro fields; catalogs
/// exported from the mobile app carry both forms.
fn deserialize_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => Ok(n.as_f64()),
        Some(serde_json::Value::String(s)) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected numeric value, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!(
            "expected number or numeric string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_food_tag_unknown_maps_to_other() {
        // Tags from older catalog exports must not break deserialization.
        let item: FoodItem = serde_json::from_value(json!({
            "id": "f1", "name": "x", "tags": ["feculent_simple"]
        }))
        .expect("deserialize item");
        assert_eq!(item.tags, vec![FoodTag::Other]);
    }

    #[test]
    fn deserialize_macro_from_numeric_string() {
        let item: FoodItem = serde_json::from_value(json!({
            "id": "f1", "name": "x", "calories_kcal": "150.5"
        }))
        .expect("deserialize item");
        assert_eq!(item.calories_kcal, Some(150.5));
    }

    #[test]
    fn deserialize_macro_invalid_type_errors() {
        let res: Result<FoodItem, _> = serde_json::from_value(json!({
            "id": "f1", "name": "x", "calories_kcal": {"nested": true}
        }));
        assert!(res.is_err());
    }

    #[test]
    fn item_ref_multiplier_defaults_to_one() {
        let item_ref: FoodItemRef =
            serde_json::from_value(json!({"food_id": "f1"})).expect("deserialize ref");
        assert_eq!(item_ref.multiplier(), 1.0);
    }
}
