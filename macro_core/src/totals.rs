//! Daily totals calculation.
//!
//! Aggregates food and workout logs into a [`DailyEntry`] and derives the
//! progress figures shown against the daily targets.
//!
//! Rounding order: every sum is accumulated unrounded. Intake and macro
//! totals are rounded once each. Burn is `bmr + Σ burns`, rounded once for
//! `total_burn_kcal`. The deficit is computed from the unrounded burn and
//! unrounded intake and rounded once at the end, so it can differ by one
//! from `total_burn_kcal - total_intake_kcal`.

use crate::{Config, DailyEntry, FoodLog, LogScope, User, WorkoutLog};
use chrono::NaiveDate;

/// Pounds to kilograms
pub const KG_PER_LB: f64 = 0.453592;

/// Constants and scoping rules the calculator works with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TotalsPolicy {
    pub bmr_kcal: f64,
    pub calorie_target_kcal: f64,
    pub weight_step_lb: f64,
    pub scope: LogScope,
}

impl Default for TotalsPolicy {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TotalsPolicy {
    fn from(config: &Config) -> Self {
        Self {
            bmr_kcal: config.targets.bmr_kcal,
            calorie_target_kcal: config.targets.calorie_target_kcal,
            weight_step_lb: config.targets.weight_step_lb,
            scope: config.logs.scope,
        }
    }
}

/// A log entry owned by the date it was created under
pub trait DatedLog {
    fn logged_on(&self) -> NaiveDate;
}

impl DatedLog for FoodLog {
    fn logged_on(&self) -> NaiveDate {
        self.daily_entry_id
    }
}

impl DatedLog for WorkoutLog {
    fn logged_on(&self) -> NaiveDate {
        self.daily_entry_id
    }
}

/// Logs that count towards `date` under the given scope
pub fn logs_in_scope<'a, T: DatedLog + 'a>(
    logs: &'a [T],
    date: NaiveDate,
    scope: LogScope,
) -> impl Iterator<Item = &'a T> + 'a {
    logs.iter().filter(move |log| match scope {
        LogScope::Global => true,
        LogScope::PerDate => log.logged_on() == date,
    })
}

/// Compute the daily entry for `date`
///
/// Pure aggregation: empty logs give zero sums and there is no failure mode.
/// Negative values in the logs are summed as-is. `weight_kg` is left
/// unrounded; `journal_text` is carried over from the caller and
/// `recommendation_text` is never set here.
pub fn compute_daily_entry(
    date: NaiveDate,
    weight_lb: f64,
    food_logs: &[FoodLog],
    workout_logs: &[WorkoutLog],
    policy: &TotalsPolicy,
    journal_text: Option<String>,
) -> DailyEntry {
    let mut intake = 0.0;
    let mut protein = 0.0;
    let mut carbs = 0.0;
    let mut fat = 0.0;
    for log in logs_in_scope(food_logs, date, policy.scope) {
        intake += log.calories_kcal;
        protein += log.protein_g;
        carbs += log.carbs_g;
        fat += log.fat_g;
    }

    let exercise_burn: f64 = logs_in_scope(workout_logs, date, policy.scope)
        .map(|w| w.estimated_burn_kcal)
        .sum();

    let total_burn = policy.bmr_kcal + exercise_burn;
    let deficit = total_burn - intake;

    DailyEntry {
        id: date.format("%Y-%m-%d").to_string(),
        date,
        weight_kg: weight_lb * KG_PER_LB,
        bmr_kcal: policy.bmr_kcal,
        activity_kcal: 0.0,
        total_burn_kcal: round_kcal(total_burn),
        total_intake_kcal: round_kcal(intake),
        total_protein_g: round_kcal(protein),
        total_carbs_g: round_kcal(carbs),
        total_fat_g: round_kcal(fat),
        deficit_kcal: round_kcal(deficit),
        journal_text,
        recommendation_text: None,
    }
}

/// Round half away from zero
fn round_kcal(value: f64) -> i64 {
    value.round() as i64
}

/// Daily protein target in grams
pub fn protein_target_g(user: &User) -> i64 {
    round_kcal(user.weight_lb * user.protein_target_g_per_lb)
}

/// Direction of the day's energy balance
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnergyBalance {
    /// Burned more than consumed, by this many kcal
    Deficit(i64),
    /// Consumed more than burned, by this many kcal
    Surplus(i64),
    Balance,
}

impl EnergyBalance {
    pub fn from_deficit(deficit_kcal: i64) -> Self {
        match deficit_kcal {
            d if d > 0 => EnergyBalance::Deficit(d),
            d if d < 0 => EnergyBalance::Surplus(-d),
            _ => EnergyBalance::Balance,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnergyBalance::Deficit(_) => "Deficit",
            EnergyBalance::Surplus(_) => "Surplus",
            EnergyBalance::Balance => "Balance",
        }
    }

    pub fn magnitude(&self) -> i64 {
        match self {
            EnergyBalance::Deficit(kcal) | EnergyBalance::Surplus(kcal) => *kcal,
            EnergyBalance::Balance => 0,
        }
    }
}

/// Current totals measured against the daily targets
#[derive(Clone, Debug, PartialEq)]
pub struct NutritionProgress {
    pub calories_kcal: i64,
    pub calorie_target_kcal: f64,
    pub calorie_percent: f64,
    pub protein_g: i64,
    pub protein_target_g: i64,
    pub protein_percent: f64,
    pub balance: EnergyBalance,
    pub balance_percent: f64,
}

/// Percentage of target, capped at 100
fn capped_percent(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).min(100.0)
}

/// Progress towards targets; all zero when no daily entry exists yet
pub fn nutrition_progress(
    user: &User,
    entry: Option<&DailyEntry>,
    policy: &TotalsPolicy,
) -> NutritionProgress {
    let protein_target = protein_target_g(user);
    let calorie_target = policy.calorie_target_kcal;

    let calories = entry.map_or(0, |e| e.total_intake_kcal);
    let protein = entry.map_or(0, |e| e.total_protein_g);
    let balance = EnergyBalance::from_deficit(entry.map_or(0, |e| e.deficit_kcal));

    NutritionProgress {
        calories_kcal: calories,
        calorie_target_kcal: calorie_target,
        calorie_percent: if entry.is_some() {
            capped_percent(calories as f64, calorie_target)
        } else {
            0.0
        },
        protein_g: protein,
        protein_target_g: protein_target,
        protein_percent: if entry.is_some() {
            capped_percent(protein as f64, protein_target as f64)
        } else {
            0.0
        },
        balance,
        balance_percent: capped_percent(balance.magnitude() as f64, calorie_target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sex;
    use uuid::Uuid;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn food(on: &str, calories: f64, protein: f64) -> FoodLog {
        FoodLog {
            id: Uuid::new_v4(),
            daily_entry_id: date(on),
            description: "meal".into(),
            calories_kcal: calories,
            protein_g: protein,
            carbs_g: 10.0,
            fat_g: 5.0,
        }
    }

    fn workout(on: &str, burn: f64) -> WorkoutLog {
        WorkoutLog {
            id: Uuid::new_v4(),
            daily_entry_id: date(on),
            workout_type: "run".into(),
            duration_minutes: 30.0,
            estimated_burn_kcal: burn,
        }
    }

    fn user(weight_lb: f64) -> User {
        User {
            id: "1".into(),
            age: 38,
            sex: Sex::Male,
            height_cm: 183.0,
            weight_lb,
            activity_multiplier: 1.5,
            protein_target_g_per_lb: 1.0,
        }
    }

    #[test]
    fn test_example_day() {
        let foods = vec![food("2026-02-01", 500.0, 40.0), food("2026-02-01", 700.0, 50.0)];
        let workouts = vec![workout("2026-02-01", 300.0)];

        let entry = compute_daily_entry(
            date("2026-02-01"),
            170.0,
            &foods,
            &workouts,
            &TotalsPolicy::default(),
            None,
        );

        assert_eq!(entry.total_intake_kcal, 1200);
        assert_eq!(entry.total_burn_kcal, 2100);
        assert_eq!(entry.deficit_kcal, 900);
        assert_eq!(entry.total_protein_g, 90);
        assert_eq!(entry.total_carbs_g, 20);
        assert_eq!(entry.total_fat_g, 10);
        assert_eq!(entry.bmr_kcal, 1800.0);
        assert_eq!(entry.id, "2026-02-01");
        assert!((entry.weight_kg - 170.0 * KG_PER_LB).abs() < 1e-9);
        assert!(entry.recommendation_text.is_none());
    }

    #[test]
    fn test_empty_logs_yield_bmr_only() {
        let entry =
            compute_daily_entry(date("2026-02-01"), 0.0, &[], &[], &TotalsPolicy::default(), None);
        assert_eq!(entry.total_intake_kcal, 0);
        assert_eq!(entry.total_burn_kcal, 1800);
        assert_eq!(entry.deficit_kcal, 1800);
        assert_eq!(entry.weight_kg, 0.0);
    }

    #[test]
    fn test_deficit_rounded_from_unrounded_sums() {
        // Intake 200.5 rounds to 201 on its own, but the deficit is taken
        // from 1800 - 200.5 = 1599.5 and rounded once to 1600.
        let foods = vec![food("2026-02-01", 100.25, 0.0), food("2026-02-01", 100.25, 0.0)];
        let entry = compute_daily_entry(
            date("2026-02-01"),
            170.0,
            &foods,
            &[],
            &TotalsPolicy::default(),
            None,
        );
        assert_eq!(entry.total_intake_kcal, 201);
        assert_eq!(entry.total_burn_kcal, 1800);
        assert_eq!(entry.deficit_kcal, 1600);
    }

    #[test]
    fn test_burn_rounded_after_adding_bmr() {
        let workouts = vec![workout("2026-02-01", 0.25), workout("2026-02-01", 0.25)];
        let entry = compute_daily_entry(
            date("2026-02-01"),
            170.0,
            &[],
            &workouts,
            &TotalsPolicy::default(),
            None,
        );
        // 1800.5 rounds half away from zero
        assert_eq!(entry.total_burn_kcal, 1801);
    }

    #[test]
    fn test_surplus_is_negative_deficit() {
        let foods = vec![food("2026-02-01", 3000.0, 0.0)];
        let entry = compute_daily_entry(
            date("2026-02-01"),
            170.0,
            &foods,
            &[],
            &TotalsPolicy::default(),
            None,
        );
        assert_eq!(entry.deficit_kcal, -1200);
    }

    #[test]
    fn test_negative_values_propagate() {
        let foods = vec![food("2026-02-01", -100.0, 0.0)];
        let entry = compute_daily_entry(
            date("2026-02-01"),
            170.0,
            &foods,
            &[],
            &TotalsPolicy::default(),
            None,
        );
        assert_eq!(entry.total_intake_kcal, -100);
        assert_eq!(entry.deficit_kcal, 1900);
    }

    #[test]
    fn test_global_scope_ignores_log_dates() {
        let foods = vec![food("2026-02-01", 500.0, 0.0), food("2026-02-02", 700.0, 0.0)];
        let entry = compute_daily_entry(
            date("2026-02-02"),
            170.0,
            &foods,
            &[],
            &TotalsPolicy::default(),
            None,
        );
        assert_eq!(entry.total_intake_kcal, 1200);
    }

    #[test]
    fn test_per_date_scope_filters_logs() {
        let policy = TotalsPolicy {
            scope: LogScope::PerDate,
            ..TotalsPolicy::default()
        };
        let foods = vec![food("2026-02-01", 500.0, 0.0), food("2026-02-02", 700.0, 0.0)];
        let workouts = vec![workout("2026-02-01", 300.0)];

        let entry =
            compute_daily_entry(date("2026-02-02"), 170.0, &foods, &workouts, &policy, None);
        assert_eq!(entry.total_intake_kcal, 700);
        assert_eq!(entry.total_burn_kcal, 1800);
    }

    #[test]
    fn test_journal_text_carried_through() {
        let entry = compute_daily_entry(
            date("2026-02-01"),
            170.0,
            &[],
            &[],
            &TotalsPolicy::default(),
            Some("felt good".into()),
        );
        assert_eq!(entry.journal_text.as_deref(), Some("felt good"));
    }

    #[test]
    fn test_protein_target_rounds() {
        let mut u = user(169.5);
        u.protein_target_g_per_lb = 0.8;
        // 135.6 -> 136
        assert_eq!(protein_target_g(&u), 136);
    }

    #[test]
    fn test_progress_caps_at_100() {
        let foods = vec![food("2026-02-01", 3000.0, 200.0)];
        let policy = TotalsPolicy::default();
        let entry = compute_daily_entry(date("2026-02-01"), 170.0, &foods, &[], &policy, None);

        let progress = nutrition_progress(&user(170.0), Some(&entry), &policy);
        assert_eq!(progress.calorie_percent, 100.0);
        assert_eq!(progress.protein_percent, 100.0);
        assert_eq!(progress.protein_target_g, 170);
        assert_eq!(progress.balance, EnergyBalance::Surplus(1200));
        assert_eq!(progress.balance_percent, 50.0);
    }

    #[test]
    fn test_progress_without_entry() {
        let progress = nutrition_progress(&user(170.0), None, &TotalsPolicy::default());
        assert_eq!(progress.calories_kcal, 0);
        assert_eq!(progress.calorie_percent, 0.0);
        assert_eq!(progress.balance, EnergyBalance::Balance);
        assert_eq!(progress.balance.label(), "Balance");
    }

    #[test]
    fn test_zero_protein_target_gives_zero_percent() {
        let policy = TotalsPolicy::default();
        let entry = compute_daily_entry(date("2026-02-01"), 0.0, &[], &[], &policy, None);
        let progress = nutrition_progress(&user(0.0), Some(&entry), &policy);
        assert_eq!(progress.protein_target_g, 0);
        assert_eq!(progress.protein_percent, 0.0);
    }

    #[test]
    fn test_balance_labels() {
        assert_eq!(EnergyBalance::from_deficit(900).label(), "Deficit");
        assert_eq!(EnergyBalance::from_deficit(-5).magnitude(), 5);
        assert_eq!(EnergyBalance::from_deficit(0), EnergyBalance::Balance);
    }
}
