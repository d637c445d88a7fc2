//! Built-in demonstration history.
//!
//! Seven fixed saved days (2026-02-03 through 2026-02-09), newest first.

use crate::SavedDay;
use once_cell::sync::Lazy;

/// Cached demo history - built once and cloned on load
static DEMO_DAYS: Lazy<Vec<SavedDay>> = Lazy::new(build_demo_days);

/// Get a reference to the demo history
pub fn demo_saved_days() -> &'static [SavedDay] {
    &DEMO_DAYS
}

fn demo_day(
    date: &str,
    (calories, protein, carbs, fat): (f64, f64, f64, f64),
    deficit: f64,
    weight: f64,
    meals_count: u32,
    workouts_count: u32,
) -> SavedDay {
    SavedDay {
        date: date.into(),
        total_calories: calories,
        total_protein: protein,
        total_carbs: carbs,
        total_fat: fat,
        deficit,
        weight,
        meals_count,
        workouts_count,
    }
}

fn build_demo_days() -> Vec<SavedDay> {
    vec![
        demo_day("2026-02-09", (2150.0, 165.0, 185.0, 62.0), 450.0, 169.2, 4, 1),
        demo_day("2026-02-08", (2050.0, 170.0, 175.0, 58.0), 550.0, 169.5, 3, 1),
        demo_day("2026-02-07", (2200.0, 160.0, 195.0, 65.0), 350.0, 169.8, 4, 0),
        demo_day("2026-02-06", (1950.0, 175.0, 165.0, 55.0), 650.0, 170.1, 3, 2),
        demo_day("2026-02-05", (2100.0, 168.0, 180.0, 60.0), 500.0, 170.4, 4, 1),
        demo_day("2026-02-04", (2250.0, 155.0, 200.0, 68.0), 300.0, 170.7, 5, 1),
        demo_day("2026-02-03", (2000.0, 172.0, 170.0, 57.0), 600.0, 171.0, 3, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_has_seven_distinct_dates() {
        let days = demo_saved_days();
        assert_eq!(days.len(), 7);
        let dates: HashSet<_> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates.len(), 7);
        assert_eq!(days.first().unwrap().date, "2026-02-09");
        assert_eq!(days.last().unwrap().date, "2026-02-03");
    }

    #[test]
    fn test_demo_is_deterministic() {
        assert_eq!(demo_saved_days(), build_demo_days().as_slice());
    }
}
