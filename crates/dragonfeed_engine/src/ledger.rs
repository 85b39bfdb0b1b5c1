//! Points ledger policy: daily credit with a cap and spend with a floor.
//!
//! Both operations are pure; the host layer owns storage and the
//! once-per-calendar-day gating of the credit (tracked via its
//! `last_claim_date`). Calling the credit twice on the same day is the
//! caller's bug, not something these functions can detect.

use tracing::warn;

use crate::pricing::price_of;
use crate::{FoodCatalog, FoodItemRef};

/// Add the daily budget to the balance, capped at `max_cap`.
pub fn credit_daily_points(current_balance: u32, daily_budget: u32, max_cap: u32) -> u32 {
    current_balance.saturating_add(daily_budget).min(max_cap)
}

/// Balance after today's spending, floored at zero.
///
/// Recomputation after adding or removing a meal must start from the
/// start-of-day snapshot, never from the daily budget, or carryover from
/// prior days is silently discarded.
pub fn expected_balance(start_of_day_balance: u32, total_spent_today: u32) -> u32 {
    start_of_day_balance.saturating_sub(total_spent_today)
}

/// Points cost of a set of logged items: the portion-adjusted prices are
/// summed unrounded and rounded once at the end.
///
/// Unresolvable food ids contribute nothing, matching the aggregator's
/// skip-and-warn behavior.
pub fn items_cost(items: &[FoodItemRef], catalog: &FoodCatalog) -> u32 {
    let total: f64 = items
        .iter()
        .filter_map(|item_ref| match catalog.get(&item_ref.food_id) {
            Some(food) => Some(f64::from(price_of(food)) * item_ref.multiplier().sqrt()),
            None => {
                warn!(food_id = %item_ref.food_id, "unknown food id, not priced");
                None
            }
        })
        .sum();
    total.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FoodItem;

    #[test]
    fn credit_is_capped_and_monotone() {
        assert_eq!(credit_daily_points(5, 3, 10), 8);
        assert_eq!(credit_daily_points(9, 3, 10), 10);
        assert_eq!(credit_daily_points(10, 3, 10), 10);
        for balance in 0..20 {
            let credited = credit_daily_points(balance, 3, 10);
            assert!(credited >= balance.min(10));
            assert!(credited <= 10);
        }
    }

    #[test]
    fn expected_balance_floors_at_zero() {
        assert_eq!(expected_balance(9, 2), 7);
        assert_eq!(expected_balance(2, 9), 0);
        assert_eq!(expected_balance(0, 0), 0);
    }

    #[test]
    fn recompute_uses_start_of_day_snapshot_not_daily_budget() {
        // Carryover scenario: 6 points carried over plus a budget of 3 gave
        // a start-of-day balance of 9. Recomputing after a 2-point meal must
        // yield 7, never budget(3) - spent(2) = 1.
        let daily_budget = 3;
        let start_of_day = credit_daily_points(6, daily_budget, 20);
        assert_eq!(start_of_day, 9);
        assert_eq!(expected_balance(start_of_day, 2), 7);
        assert_ne!(expected_balance(start_of_day, 2), daily_budget - 2);
    }

    #[test]
    fn items_cost_rounds_the_sum_once() {
        let food = |id: &str, calories: f64| FoodItem {
            id: id.into(),
            name: id.into(),
            tags: Vec::new(),
            base_score: 50,
            protein_g: None,
            carbs_g: None,
            fat_g: None,
            calories_kcal: Some(calories),
            points: None,
        };
        let catalog = FoodCatalog::new(vec![food("a", 200.0), food("b", 300.0)]);
        let item = |id: &str, multiplier: f64| FoodItemRef {
            food_id: id.into(),
            multiplier: Some(multiplier),
            portion: None,
            grams: None,
            quantity: None,
        };
        // 2 * sqrt(2) + 3 * sqrt(0.5) = 2.828 + 2.121 = 4.95 -> 5.
        // Per-item rounding would give 3 + 2 = 5 here, but 2.4 + 2.4
        // style inputs diverge; the contract is round-once.
        assert_eq!(items_cost(&[item("a", 2.0), item("b", 0.5)], &catalog), 5);
        // Unknown ids are skipped.
        assert_eq!(items_cost(&[item("ghost", 1.0), item("a", 1.0)], &catalog), 2);
    }
}
