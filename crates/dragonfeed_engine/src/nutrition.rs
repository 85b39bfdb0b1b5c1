//! Nutrition aggregation: per-day macro totals and day/meal quality scores.

use tracing::warn;

use crate::dates::normalize_date_key;
use crate::{DailyNutritionTotals, FoodCatalog, MealEntry, NutritionTargets};

/// Sum the macros of every entry logged on the same local calendar date as
/// `reference_date_iso`.
///
/// Unresolvable food ids are skipped with a diagnostic; the computation
/// always returns a (possibly partial) total, zeros when nothing matches.
pub fn compute_daily_totals(
    entries: &[MealEntry],
    reference_date_iso: &str,
    catalog: &FoodCatalog,
) -> DailyNutritionTotals {
    let mut totals = DailyNutritionTotals::default();
    let Some(reference_date) = normalize_date_key(reference_date_iso) else {
        warn!(reference = reference_date_iso, "unparseable reference date");
        return totals;
    };

    for entry in entries {
        if normalize_date_key(&entry.created_at) != Some(reference_date) {
            continue;
        }
        for item_ref in &entry.items {
            let Some(food) = catalog.get(&item_ref.food_id) else {
                warn!(
                    food_id = %item_ref.food_id,
                    entry_id = %entry.id,
                    "unknown food id, skipping item"
                );
                continue;
            };
            let multiplier = item_ref.multiplier();
            totals.protein_g += food.protein_g.unwrap_or(0.0) * multiplier;
            totals.carbs_g += food.carbs_g.unwrap_or(0.0) * multiplier;
            totals.calories_kcal += food.calories_kcal.unwrap_or(0.0) * multiplier;
            totals.fat_g += food.fat_g.unwrap_or(0.0) * multiplier;
        }
    }

    totals
}

/// Integer percentage of a target, clamped to 0..=100. A non-positive target
/// yields 0 rather than a division error.
pub fn percentage_of_target(total: f64, target: f64) -> u8 {
    if target <= 0.0 {
        return 0;
    }
    (total / target * 100.0).round().clamp(0.0, 100.0) as u8
}

// Score weights: protein adherence dominates, then energy, then the
// remaining macros. The protein component is one-sided (no penalty past
// target) so the score is monotone in protein up to target.
const WEIGHT_PROTEIN: f64 = 0.35;
const WEIGHT_CALORIES: f64 = 0.30;
const WEIGHT_CARBS: f64 = 0.20;
const WEIGHT_FAT: f64 = 0.15;
const PROTEIN_DENSITY_BONUS: f64 = 10.0;
const CLOSENESS_POINTS: f64 = 90.0;

fn one_sided_adherence(total: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 1.0;
    }
    (total.max(0.0) / target).min(1.0)
}

fn symmetric_closeness(total: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 1.0;
    }
    1.0 - ((total - target).abs() / target).min(1.0)
}

/// Score a meal's totals against a share of the daily targets.
///
/// `meal_share` is the fraction of the day this meal is expected to cover
/// (1.0 scores a whole day). Output is 0..=100; more protein per calorie,
/// up to target, never scores lower.
pub fn compute_meal_score(
    totals: &DailyNutritionTotals,
    targets: &NutritionTargets,
    meal_share: f64,
) -> u8 {
    let share = meal_share.max(0.0);
    let protein_target = targets.protein_g * share;
    let calorie_target = targets.calories_kcal * share;

    let closeness = WEIGHT_PROTEIN * one_sided_adherence(totals.protein_g, protein_target)
        + WEIGHT_CALORIES * symmetric_closeness(totals.calories_kcal, calorie_target)
        + WEIGHT_CARBS * symmetric_closeness(totals.carbs_g, targets.carbs_g * share)
        + WEIGHT_FAT * symmetric_closeness(totals.fat_g, targets.fat_g * share);

    // Protein-density bonus: grams of protein per calorie relative to the
    // density the targets themselves imply.
    let bonus_fraction = if totals.calories_kcal > 0.0 && calorie_target > 0.0 && protein_target > 0.0
    {
        let density = totals.protein_g.max(0.0) / totals.calories_kcal;
        let target_density = protein_target / calorie_target;
        (density / target_density).min(1.0)
    } else {
        0.0
    };

    (CLOSENESS_POINTS * closeness + PROTEIN_DENSITY_BONUS * bonus_fraction)
        .round()
        .clamp(0.0, 100.0) as u8
}

/// Score a full day's totals against the daily targets.
pub fn compute_day_score(totals: &DailyNutritionTotals, targets: &NutritionTargets) -> u8 {
    compute_meal_score(totals, targets, 1.0)
}
