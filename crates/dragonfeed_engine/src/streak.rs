//! Streak and calendar engine: consecutive-day streaks, dragon evolution
//! levels and dragon mood, derived fresh from the fed-day set on every query.
//!
//! "Today" is always an injected parameter so the whole module is clock-free
//! and deterministic under test.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use tracing::warn;

use crate::dates::normalize_date_key;
use crate::nutrition::compute_daily_totals;
use crate::{DragonMood, DragonStatus, FoodCatalog, MealEntry, StreakStats};

/// Streak days per evolution band.
pub const DAYS_PER_EVOLUTION: u32 = 30;
/// Number of visual dragon stages.
pub const MAX_EVOLUTIONS: u32 = 12;
/// Days since the last meal at which the dragon turns worried.
pub const DAYS_WARNING: i64 = 2;
/// Days since the last meal at which the dragon turns critical.
pub const DAYS_CRITICAL: i64 = 5;
/// Sentinel for a dragon that has never been fed.
pub const NEVER_FED_DAYS: i64 = 999;
/// Default minimum daily calories for a day to count as fed in the
/// calorie-gated variants.
pub const DEFAULT_MIN_CALORIES_FOR_FED_DAY: f64 = 500.0;

/// Bucket meal entries into fed days: date -> entry ids logged that date.
///
/// A date's presence means "fed that day" regardless of nutritional
/// adequacy. Entries with unparseable timestamps are skipped with a
/// diagnostic.
pub fn day_feeds_from_entries(entries: &[MealEntry]) -> BTreeMap<NaiveDate, Vec<String>> {
    let mut feeds: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for entry in entries {
        match normalize_date_key(&entry.created_at) {
            Some(date) => feeds.entry(date).or_default().push(entry.id.clone()),
            None => warn!(entry_id = %entry.id, created_at = %entry.created_at,
                "unparseable meal timestamp, entry not bucketed"),
        }
    }
    feeds
}

/// Derive streak statistics from the set of fed days.
pub fn compute_streak(fed_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> StreakStats {
    let current_streak_days = current_streak(fed_days, today);
    let longest_streak_days = longest_streak(fed_days);
    let evolutions_unlocked = (current_streak_days / DAYS_PER_EVOLUTION).min(MAX_EVOLUTIONS);

    let progress_to_next_evolution = if evolutions_unlocked >= MAX_EVOLUTIONS {
        1.0
    } else {
        f64::from(current_streak_days % DAYS_PER_EVOLUTION) / f64::from(DAYS_PER_EVOLUTION)
    };

    StreakStats {
        current_streak_days,
        longest_streak_days,
        total_fed_days: fed_days.len() as u32,
        evolutions_unlocked,
        progress_to_next_evolution,
        streak_bonus_earned: current_streak_days / DAYS_PER_EVOLUTION,
        is_streak_bonus_day: current_streak_days > 0
            && current_streak_days % DAYS_PER_EVOLUTION == 0,
    }
}

/// Walk backward from today; the streak requires unbroken presence ending
/// today, so an unfed today means 0 even if yesterday was fed.
fn current_streak(fed_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut cursor = today;
    while fed_days.contains(&cursor) {
        streak += 1;
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive calendar days anywhere in the history,
/// minimum 1 when any day exists.
fn longest_streak(fed_days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;
    for &date in fed_days {
        run = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}

/// Dragon mood from the most recent fed day relative to today.
pub fn compute_dragon_state(fed_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> DragonStatus {
    let Some(&last_fed) = fed_days.iter().next_back() else {
        return DragonStatus {
            mood: DragonMood::Critical,
            days_since_last_meal: NEVER_FED_DAYS,
        };
    };

    let days_since_last_meal = (today - last_fed).num_days();
    let mood = if days_since_last_meal >= DAYS_CRITICAL {
        DragonMood::Critical
    } else if days_since_last_meal >= DAYS_WARNING {
        DragonMood::Worried
    } else {
        DragonMood::Normal
    };

    DragonStatus {
        mood,
        days_since_last_meal,
    }
}

/// Fed days that also meet the minimum-calorie gate. A day with a logged
/// meal but insufficient calories does not count as fed here.
pub fn calorie_complete_days(
    entries: &[MealEntry],
    catalog: &FoodCatalog,
    min_calories: f64,
) -> BTreeSet<NaiveDate> {
    day_feeds_from_entries(entries)
        .into_keys()
        .filter(|date| {
            let totals = compute_daily_totals(entries, &crate::dates::day_key(*date), catalog);
            totals.calories_kcal >= min_calories
        })
        .collect()
}

/// Calorie-gated streak: identical algorithm, fed days filtered first.
/// This is the variant production screens use.
pub fn compute_streak_with_calories(
    entries: &[MealEntry],
    catalog: &FoodCatalog,
    min_calories: f64,
    today: NaiveDate,
) -> StreakStats {
    compute_streak(&calorie_complete_days(entries, catalog, min_calories), today)
}

/// Calorie-gated dragon mood.
pub fn compute_dragon_state_with_calories(
    entries: &[MealEntry],
    catalog: &FoodCatalog,
    min_calories: f64,
    today: NaiveDate,
) -> DragonStatus {
    compute_dragon_state(&calorie_complete_days(entries, catalog, min_calories), today)
}

/// One visual dragon stage: an inclusive streak-day band in fixed 30-day
/// increments; the top band is open-ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragonLevel {
    pub level: u32,
    pub min_days: u32,
    pub max_days: Option<u32>,
}

/// The 12 dragon stages keyed by streak days.
pub const DRAGON_LEVELS: [DragonLevel; 12] = {
    let mut levels = [DragonLevel {
        level: 0,
        min_days: 0,
        max_days: None,
    }; 12];
    let mut i = 0u32;
    while i < 12 {
        levels[i as usize] = DragonLevel {
            level: i + 1,
            min_days: i * DAYS_PER_EVOLUTION,
            max_days: if i == 11 {
                None
            } else {
                Some((i + 1) * DAYS_PER_EVOLUTION - 1)
            },
        };
        i += 1;
    }
    levels
};

/// Highest level whose `min_days` the streak has reached.
pub fn dragon_level(streak_days: u32) -> DragonLevel {
    let mut current = DRAGON_LEVELS[0];
    for level in DRAGON_LEVELS {
        if level.min_days <= streak_days {
            current = level;
        }
    }
    current
}

/// Fractional progress within the current level's band, 1.0 at the
/// open-ended top level.
pub fn dragon_progress(streak_days: u32) -> f64 {
    let level = dragon_level(streak_days);
    match level.max_days {
        None => 1.0,
        Some(max_days) => {
            let span = max_days - level.min_days + 1;
            f64::from(streak_days - level.min_days) / f64::from(span)
        }
    }
}

/// Streak days remaining until the next level opens, 0 at the top.
pub fn days_to_next_level(streak_days: u32) -> u32 {
    match dragon_level(streak_days).max_days {
        None => 0,
        Some(max_days) => max_days + 1 - streak_days,
    }
}
