//! Food pricing: map a food's nutrition and tags to an integer points cost.
//!
//! All rules apply sequentially to one running base (never additive
//! percentages), and the result is a non-negative integer.

use crate::{FoodItem, FoodTag};

/// Calories assumed when a catalog entry carries no calorie figure.
pub const DEFAULT_CALORIES_KCAL: f64 = 150.0;

const ULTRA_PROCESSED_FACTOR: f64 = 1.5;
const FRIED_FACTOR: f64 = 1.3;
const SUGARY_FACTOR: f64 = 1.2;
const WHOLE_GRAIN_FACTOR: f64 = 0.8;

/// Lean proteins and vegetables never cost points.
pub fn is_free_category(item: &FoodItem) -> bool {
    item.has_tag(FoodTag::LeanProtein) || item.has_tag(FoodTag::Vegetable)
}

fn has_processed_penalty(item: &FoodItem) -> bool {
    item.has_tag(FoodTag::UltraProcessed)
}

fn has_fried_penalty(item: &FoodItem) -> bool {
    item.has_tag(FoodTag::Fried)
}

fn has_sugar_penalty(item: &FoodItem, calories: f64) -> bool {
    item.has_tag(FoodTag::Sugary) && calories > 100.0
}

fn has_whole_grain_discount(item: &FoodItem) -> bool {
    item.has_tag(FoodTag::WholeGrain)
}

/// Points cost of one unit portion of `item`.
///
/// An explicit `points` field is authoritative and returned unchanged.
pub fn price_of(item: &FoodItem) -> u32 {
    if let Some(points) = item.points {
        return points;
    }
    if is_free_category(item) {
        return 0;
    }

    let calories = item.calories_kcal.unwrap_or(DEFAULT_CALORIES_KCAL);
    let mut base = calories / 100.0;
    if has_processed_penalty(item) {
        base *= ULTRA_PROCESSED_FACTOR;
    }
    if has_fried_penalty(item) {
        base *= FRIED_FACTOR;
    }
    if has_sugar_penalty(item, calories) {
        base *= SUGARY_FACTOR;
    }
    if has_whole_grain_discount(item) {
        base *= WHOLE_GRAIN_FACTOR;
    }

    base.round().max(0.0) as u32
}

/// Portion-adjusted cost used when logging.
///
/// The square root dampens cost growth for larger portions: doubling the
/// portion does not double the price.
pub fn portion_cost(item: &FoodItem, multiplier: f64) -> u32 {
    (f64::from(price_of(item)) * multiplier.sqrt()).round().max(0.0) as u32
}
