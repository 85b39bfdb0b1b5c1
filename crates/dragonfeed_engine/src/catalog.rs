//! Merged food table: static catalog rows plus user-defined custom foods
//! sharing one id namespace.

use std::collections::HashMap;

use crate::FoodItem;

/// In-memory food lookup table. Custom entries shadow static entries with
/// the same id.
#[derive(Clone, Debug, Default)]
pub struct FoodCatalog {
    foods: HashMap<String, FoodItem>,
}

impl FoodCatalog {
    pub fn new(static_foods: impl IntoIterator<Item = FoodItem>) -> Self {
        let mut catalog = Self::default();
        catalog.extend(static_foods);
        catalog
    }

    /// Build the merged table in one step; `custom_foods` win on id clashes.
    pub fn with_custom(
        static_foods: impl IntoIterator<Item = FoodItem>,
        custom_foods: impl IntoIterator<Item = FoodItem>,
    ) -> Self {
        let mut catalog = Self::new(static_foods);
        catalog.extend(custom_foods);
        catalog
    }

    /// Insert or replace entries by id.
    pub fn extend(&mut self, foods: impl IntoIterator<Item = FoodItem>) {
        for food in foods {
            self.foods.insert(food.id.clone(), food);
        }
    }

    pub fn get(&self, food_id: &str) -> Option<&FoodItem> {
        self.foods.get(food_id)
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}
