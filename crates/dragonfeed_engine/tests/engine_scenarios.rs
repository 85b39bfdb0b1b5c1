use chrono::NaiveDate;
use dragonfeed_engine::nutrition::{compute_daily_totals, compute_day_score};
use dragonfeed_engine::pricing::price_of;
use dragonfeed_engine::streak::{
    DEFAULT_MIN_CALORIES_FOR_FED_DAY, compute_dragon_state_with_calories,
    compute_streak_with_calories, day_feeds_from_entries,
};
use dragonfeed_engine::{
    DragonMood, FoodCatalog, FoodItem, FoodItemRef, FoodTag, MealCategory, MealEntry,
    NutritionTargets,
};
use serde_json::json;

fn food(id: &str, tags: Vec<FoodTag>, calories: f64, protein: f64) -> FoodItem {
    FoodItem {
        id: id.into(),
        name: id.into(),
        tags,
        base_score: 50,
        protein_g: Some(protein),
        carbs_g: Some(0.0),
        fat_g: Some(0.0),
        calories_kcal: Some(calories),
        points: None,
    }
}

fn meal(id: &str, created_at: &str, food_ids: &[&str]) -> MealEntry {
    MealEntry {
        id: id.into(),
        label: id.into(),
        category: MealCategory::Ok,
        score: 0,
        created_at: created_at.into(),
        items: food_ids
            .iter()
            .map(|fid| FoodItemRef {
                food_id: (*fid).into(),
                multiplier: None,
                portion: None,
                grams: None,
                quantity: None,
            })
            .collect(),
    }
}

#[test]
fn catalog_tag_unknown_to_the_enum_prices_from_calories() {
    // A 200 kcal item tagged with a label outside the known set is neither
    // free nor penalized: round(200/100) = 2.
    let item: FoodItem = serde_json::from_value(json!({
        "id": "pasta", "name": "Pasta", "calories_kcal": 200.0,
        "tags": ["feculent_simple"]
    }))
    .expect("deserialize");
    assert_eq!(price_of(&item), 2);

    // The same calories under a lean-protein tag are free.
    let chicken = food("chicken", vec![FoodTag::LeanProtein], 200.0, 30.0);
    assert_eq!(price_of(&chicken), 0);
}

#[test]
fn calorie_gated_streak_ignores_underfed_days() {
    let catalog = FoodCatalog::new(vec![
        food("dinner", vec![], 800.0, 40.0),
        food("snack", vec![], 120.0, 2.0),
    ]);
    let today = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

    // Three days logged, but the middle one is a lone snack under the
    // calorie gate.
    let entries = vec![
        meal("m1", "2025-06-01T19:00:00", &["dinner"]),
        meal("m2", "2025-06-02T15:00:00", &["snack"]),
        meal("m3", "2025-06-03T19:00:00", &["dinner"]),
    ];

    let ungated_days = day_feeds_from_entries(&entries);
    assert_eq!(ungated_days.len(), 3);

    let stats =
        compute_streak_with_calories(&entries, &catalog, DEFAULT_MIN_CALORIES_FOR_FED_DAY, today);
    // The gap on 06-02 limits the current streak to today alone.
    assert_eq!(stats.current_streak_days, 1);
    assert_eq!(stats.total_fed_days, 2);

    let status =
        compute_dragon_state_with_calories(&entries, &catalog, DEFAULT_MIN_CALORIES_FOR_FED_DAY, today);
    assert_eq!(status.mood, DragonMood::Normal);
    assert_eq!(status.days_since_last_meal, 0);
}

#[test]
fn daily_totals_feed_the_day_score() {
    let catalog = FoodCatalog::new(vec![
        food("chicken", vec![FoodTag::LeanProtein], 330.0, 62.0),
        food("rice", vec![FoodTag::WholeGrain], 430.0, 8.0),
    ]);
    let entries = vec![
        meal("lunch", "2025-06-01T12:30:00", &["chicken", "rice"]),
        meal("dinner", "2025-06-01T19:30:00", &["chicken", "rice"]),
    ];
    let totals = compute_daily_totals(&entries, "2025-06-01", &catalog);
    assert_eq!(totals.calories_kcal, 1520.0);
    assert_eq!(totals.protein_g, 140.0);

    let targets = NutritionTargets {
        protein_g: 140.0,
        carbs_g: 180.0,
        calories_kcal: 1800.0,
        fat_g: 60.0,
        dairy_servings: None,
    };
    let score = compute_day_score(&totals, &targets);
    assert!(score > 50, "protein-dense on-target day should score well, got {score}");
    assert!(score <= 100);
}
