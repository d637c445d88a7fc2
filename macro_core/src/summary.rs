//! Weight progress across saved days.

use crate::SavedDay;

/// Chart viewport the points are scaled into
pub const CHART_WIDTH: f64 = 400.0;
pub const CHART_HEIGHT: f64 = 150.0;

/// One plotted weight, oldest first
#[derive(Clone, Debug, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    pub weight_lb: f64,
    pub x: f64,
    pub y: f64,
}

/// Weight range and change over the saved history
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTrend {
    pub min_lb: f64,
    pub max_lb: f64,
    /// First listed (newest) minus last listed (oldest)
    pub change_lb: f64,
    pub points: Vec<ChartPoint>,
}

/// Weight trend over `days` as listed (newest first)
///
/// Needs at least two days; returns `None` otherwise.
pub fn weight_trend(days: &[SavedDay]) -> Option<WeightTrend> {
    if days.len() < 2 {
        return None;
    }

    let min = days.iter().map(|d| d.weight).fold(f64::INFINITY, f64::min);
    let max = days.iter().map(|d| d.weight).fold(f64::NEG_INFINITY, f64::max);
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    let last_index = (days.len() - 1) as f64;

    let points = days
        .iter()
        .rev()
        .enumerate()
        .map(|(i, day)| ChartPoint {
            date: day.date.clone(),
            weight_lb: day.weight,
            x: i as f64 / last_index * CHART_WIDTH,
            y: CHART_HEIGHT - (day.weight - min) / range * 140.0 - 5.0,
        })
        .collect();

    let newest = days.first().map_or(0.0, |d| d.weight);
    let oldest = days.last().map_or(0.0, |d| d.weight);

    Some(WeightTrend {
        min_lb: min,
        max_lb: max,
        change_lb: newest - oldest,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_saved_days;

    fn day(date: &str, weight: f64) -> SavedDay {
        SavedDay {
            date: date.into(),
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            deficit: 0.0,
            weight,
            meals_count: 0,
            workouts_count: 0,
        }
    }

    #[test]
    fn test_needs_two_days() {
        assert!(weight_trend(&[]).is_none());
        assert!(weight_trend(&[day("2026-02-01", 170.0)]).is_none());
    }

    #[test]
    fn test_demo_trend() {
        let trend = weight_trend(demo_saved_days()).unwrap();
        assert_eq!(trend.min_lb, 169.2);
        assert_eq!(trend.max_lb, 171.0);
        assert!((trend.change_lb - (-1.8)).abs() < 1e-9);

        assert_eq!(trend.points.len(), 7);
        let first = &trend.points[0];
        assert_eq!(first.date, "2026-02-03");
        assert_eq!(first.x, 0.0);
        // Heaviest day sits at the top of the chart
        assert!((first.y - 5.0).abs() < 1e-9);

        let last = trend.points.last().unwrap();
        assert_eq!(last.x, CHART_WIDTH);
        assert!((last.y - 145.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_weight_uses_unit_range() {
        let trend = weight_trend(&[day("2026-02-02", 170.0), day("2026-02-01", 170.0)]).unwrap();
        assert_eq!(trend.change_lb, 0.0);
        assert!(trend.points.iter().all(|p| p.y == 145.0));
    }
}
