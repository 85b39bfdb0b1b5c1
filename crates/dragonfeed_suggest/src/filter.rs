//! Candidate validation: map generated candidates onto the engine's food
//! model, reprice them, filter by taste and enforce the zero-cost floor.

use dragonfeed_engine::pricing::price_of;
use dragonfeed_engine::{FoodItem, FoodTag};
use tracing::debug;

use crate::fallback::zero_cost_fallbacks;
use crate::{MAX_SUGGESTIONS, RawSuggestion, Suggestion, TastePreference, TimeOfDay};

/// Zero-cost items injected when the generated list has none.
const FALLBACK_INJECTION_LIMIT: usize = 2;

/// Map a claimed category onto engine tags via keyword heuristics.
fn tags_for_category(category: Option<&str>) -> Vec<FoodTag> {
    let Some(category) = category else {
        return Vec::new();
    };
    let lowered = category.to_lowercase();
    let mut tags = Vec::new();
    if lowered.contains("protein") {
        tags.push(FoodTag::LeanProtein);
    }
    if lowered.contains("veg") {
        tags.push(FoodTag::Vegetable);
    }
    if lowered.contains("starch") || lowered.contains("grain") || lowered.contains("carb") {
        tags.push(FoodTag::SimpleStarch);
    }
    if lowered.contains("dessert") {
        tags.push(FoodTag::HealthyDessert);
    }
    if lowered.contains("sweet") || lowered.contains("sugar") {
        tags.push(FoodTag::Sugary);
    }
    tags
}

/// Build an engine food item from the candidate's claimed macros. The
/// claimed `points` field is intentionally not carried over.
fn food_from_candidate(candidate: &RawSuggestion, tags: Vec<FoodTag>) -> FoodItem {
    FoodItem {
        id: format!("ai-{}", candidate.name.to_lowercase().replace(' ', "-")),
        name: candidate.name.clone(),
        tags,
        base_score: 50,
        protein_g: candidate.protein_g,
        carbs_g: candidate.carbs_g,
        fat_g: candidate.fat_g,
        calories_kcal: candidate.calories,
        points: None,
    }
}

/// Taste of a candidate: the explicit claim when parseable, otherwise
/// inferred from tags (sugar or dessert means sweet; protein, vegetable or
/// starch without sugar means salty). Uninferable candidates default to
/// salty.
fn infer_taste(candidate: &RawSuggestion, tags: &[FoodTag]) -> TastePreference {
    if let Some(claimed) = candidate.taste.as_deref() {
        match claimed.to_lowercase().as_str() {
            "sweet" => return TastePreference::Sweet,
            "salty" | "savory" | "savoury" => return TastePreference::Salty,
            _ => {}
        }
    }
    let sugary = tags.contains(&FoodTag::Sugary) || tags.contains(&FoodTag::HealthyDessert);
    if sugary {
        return TastePreference::Sweet;
    }
    TastePreference::Salty
}

/// Validate, reprice and filter generated candidates, in pipeline order:
/// tag mapping, repricing through the engine, taste filtering, zero-cost
/// floor injection, then the length cap.
pub fn refine_suggestions(
    candidates: Vec<RawSuggestion>,
    taste_preference: TastePreference,
    time_of_day: TimeOfDay,
) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let tags = tags_for_category(candidate.category.as_deref());
            let taste = infer_taste(&candidate, &tags);
            if taste != taste_preference {
                debug!(name = %candidate.name, "dropping candidate with mismatched taste");
                return None;
            }
            let food = food_from_candidate(&candidate, tags);
            let points = price_of(&food);
            if candidate.points.is_some_and(|claimed| claimed != points) {
                debug!(
                    name = %candidate.name,
                    claimed = candidate.points,
                    recomputed = points,
                    "claimed points overridden"
                );
            }
            Some(Suggestion {
                name: candidate.name,
                reason: candidate.reason,
                taste,
                points,
                food,
                portion: candidate.portion,
                grams: candidate.grams,
            })
        })
        .collect();

    if !suggestions.iter().any(|s| s.points == 0) {
        let free = zero_cost_fallbacks(taste_preference, time_of_day, FALLBACK_INJECTION_LIMIT);
        suggestions.splice(0..0, free);
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, taste: Option<&str>, calories: f64, category: Option<&str>) -> RawSuggestion {
        RawSuggestion {
            name: name.into(),
            reason: None,
            taste: taste.map(Into::into),
            calories: Some(calories),
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            points: Some(99), // never trusted
            category: category.map(Into::into),
            portion: None,
            grams: None,
        }
    }

    #[test]
    fn claimed_points_are_discarded_and_recomputed() {
        let out = refine_suggestions(
            vec![candidate("Crackers", Some("salty"), 300.0, None)],
            TastePreference::Salty,
            TimeOfDay::Afternoon,
        );
        let crackers = out.iter().find(|s| s.name == "Crackers").expect("kept");
        assert_eq!(crackers.points, 3); // 300/100, never the claimed 99
    }

    #[test]
    fn protein_category_prices_free() {
        let out = refine_suggestions(
            vec![candidate("Grilled chicken", Some("salty"), 250.0, Some("protein"))],
            TastePreference::Salty,
            TimeOfDay::Evening,
        );
        assert_eq!(out[0].points, 0);
        // Already free, no fallback injection.
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn mismatched_taste_is_filtered_out() {
        let out = refine_suggestions(
            vec![candidate("Chocolate mousse", Some("sweet"), 250.0, Some("dessert"))],
            TastePreference::Salty,
            TimeOfDay::Evening,
        );
        // Candidate dropped; only injected fallbacks remain, all salty.
        assert!(out.iter().all(|s| s.taste == TastePreference::Salty));
        assert!(out.iter().any(|s| s.points == 0));
    }

    #[test]
    fn taste_inferred_from_tags_when_not_claimed() {
        let out = refine_suggestions(
            vec![candidate("Baked apple", None, 150.0, Some("healthy dessert"))],
            TastePreference::Sweet,
            TimeOfDay::Evening,
        );
        assert!(out.iter().any(|s| s.name == "Baked apple"));
    }

    #[test]
    fn zero_cost_floor_injects_up_to_two_prepended() {
        let costly: Vec<RawSuggestion> = (0..7)
            .map(|i| candidate(&format!("Dish {i}"), Some("salty"), 400.0, None))
            .collect();
        let out = refine_suggestions(costly, TastePreference::Salty, TimeOfDay::Evening);
        assert!(out.len() <= MAX_SUGGESTIONS);
        assert_eq!(out[0].points, 0);
        assert_eq!(out[1].points, 0);
        assert_eq!(out[2].name, "Dish 0");
    }

    #[test]
    fn list_is_capped_at_eight() {
        let many: Vec<RawSuggestion> = (0..12)
            .map(|i| candidate(&format!("Dish {i}"), Some("salty"), 100.0, Some("protein")))
            .collect();
        let out = refine_suggestions(many, TastePreference::Salty, TimeOfDay::Morning);
        assert_eq!(out.len(), MAX_SUGGESTIONS);
    }
}
