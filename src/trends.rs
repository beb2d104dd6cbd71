use serde::Serialize;

use crate::models::{MonthlyBucket, Trend};
use crate::monthly::MonthlyData;
use crate::settings::Thresholds;
use crate::stats;

// ---------------------------------------------------------------------------
// Trailing averages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailingWindow {
    pub avg_deposits: f64,
    pub months: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailingAverages {
    pub months_available: usize,
    pub trend: Trend,
    #[serde(rename = "3_month", skip_serializing_if = "Option::is_none")]
    pub three_month: Option<TrailingWindow>,
    #[serde(rename = "6_month", skip_serializing_if = "Option::is_none")]
    pub six_month: Option<TrailingWindow>,
    #[serde(rename = "12_month", skip_serializing_if = "Option::is_none")]
    pub twelve_month: Option<TrailingWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annualized_deposits: Option<f64>,
}

impl TrailingAverages {
    pub fn avg_3_month(&self) -> Option<f64> {
        self.three_month.as_ref().map(|w| w.avg_deposits)
    }

    pub fn avg_6_month(&self) -> Option<f64> {
        self.six_month.as_ref().map(|w| w.avg_deposits)
    }

    pub fn avg_12_month(&self) -> Option<f64> {
        self.twelve_month.as_ref().map(|w| w.avg_deposits)
    }
}

/// Buckets newest first.
fn newest_first(data: &MonthlyData) -> Vec<&MonthlyBucket> {
    data.values().rev().collect()
}

fn window(deposits: &[f64], size: usize) -> Option<TrailingWindow> {
    let slice = &deposits[..deposits.len().min(size)];
    if slice.is_empty() {
        return None;
    }
    Some(TrailingWindow {
        avg_deposits: stats::mean(slice),
        months: slice.len(),
    })
}

/// Trend across a newest-first window: compares the newest month with the
/// oldest one in the window.
fn window_trend(newest_first: &[f64]) -> Trend {
    if newest_first.len() < 3 {
        return Trend::Stable;
    }
    let newest = newest_first[0];
    let oldest = newest_first[newest_first.len() - 1];
    if newest > oldest * 1.1 {
        Trend::Increasing
    } else if newest < oldest * 0.9 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

pub fn trailing_averages(data: &MonthlyData) -> Option<TrailingAverages> {
    if data.is_empty() {
        return None;
    }
    let deposits: Vec<f64> = newest_first(data).iter().map(|b| b.total_deposits).collect();

    let three_month = window(&deposits, 3);
    let six_month = window(&deposits, 6);
    let twelve_month = window(&deposits, 12);
    let annualized_deposits = twelve_month.as_ref().map(|w| w.avg_deposits * 12.0);
    let trend = window_trend(&deposits[..deposits.len().min(3)]);

    Some(TrailingAverages {
        months_available: deposits.len(),
        trend,
        three_month,
        six_month,
        twelve_month,
        annualized_deposits,
    })
}

// ---------------------------------------------------------------------------
// Month-over-month trend and volatility
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrends {
    pub trend_direction: Trend,
    pub avg_mom_change: f64,
    pub volatility_cv: f64,
    pub high_volatility: bool,
    pub mom_changes: Vec<f64>,
}

/// Percentage changes between consecutive months. Pairs whose earlier month
/// had no deposits are skipped.
pub fn mom_changes(oldest_first: &[f64]) -> Vec<f64> {
    oldest_first
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect()
}

/// Coefficient of variation as a percentage.
pub fn coefficient_of_variation(vals: &[f64]) -> f64 {
    let m = stats::mean(vals);
    if m > 0.0 {
        stats::population_std(vals) / m * 100.0
    } else {
        0.0
    }
}

pub fn monthly_trends(data: &MonthlyData, thresholds: &Thresholds) -> Option<MonthlyTrends> {
    if data.len() < 2 {
        return None;
    }
    let deposits: Vec<f64> = data.values().map(|b| b.total_deposits).collect();

    let changes = mom_changes(&deposits);
    let volatility_cv = coefficient_of_variation(&deposits);
    let avg_mom_change = stats::mean(&changes);

    let trend_direction = if changes.is_empty() {
        Trend::Stable
    } else if avg_mom_change > 5.0 {
        Trend::Increasing
    } else if avg_mom_change < -5.0 {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    Some(MonthlyTrends {
        trend_direction,
        avg_mom_change,
        volatility_cv,
        high_volatility: volatility_cv > thresholds.high_volatility_cv,
        mom_changes: changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthKey, MonthlyBucket};

    /// Build a bucket map from deposits listed oldest first, starting Jan 2024.
    fn months(deposits: &[f64]) -> MonthlyData {
        deposits
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let key = MonthKey::new(2024 + (i / 12) as i32, (i % 12) as u32 + 1);
                let mut b = MonthlyBucket::empty(key);
                b.total_deposits = *d;
                (key, b)
            })
            .collect()
    }

    #[test]
    fn test_three_month_average_and_increasing_trend() {
        // Newest to oldest: 10000, 9000, 8000.
        let data = months(&[8000.0, 9000.0, 10000.0]);
        let t = trailing_averages(&data).unwrap();
        assert_eq!(t.avg_3_month(), Some(9000.0));
        assert_eq!(t.trend, Trend::Increasing);
        assert_eq!(t.months_available, 3);
    }

    #[test]
    fn test_decreasing_and_stable_trailing_trend() {
        let t = trailing_averages(&months(&[10000.0, 9500.0, 8000.0])).unwrap();
        assert_eq!(t.trend, Trend::Decreasing);
        let t = trailing_averages(&months(&[10000.0, 2000.0, 10500.0])).unwrap();
        assert_eq!(t.trend, Trend::Stable);
    }

    #[test]
    fn test_short_history_defaults_to_stable() {
        let t = trailing_averages(&months(&[1000.0, 5000.0])).unwrap();
        assert_eq!(t.trend, Trend::Stable);
        assert_eq!(t.three_month.as_ref().unwrap().months, 2);
        assert_eq!(t.avg_12_month(), Some(3000.0));
        assert_eq!(t.annualized_deposits, Some(36000.0));
    }

    #[test]
    fn test_windows_use_most_recent_months() {
        let deposits: Vec<f64> = (1..=14).map(|i| i as f64 * 100.0).collect();
        let t = trailing_averages(&months(&deposits)).unwrap();
        // Newest three: 1400, 1300, 1200.
        assert_eq!(t.avg_3_month(), Some(1300.0));
        // Newest six: 1400..=900.
        assert_eq!(t.avg_6_month(), Some(1150.0));
        assert_eq!(t.twelve_month.as_ref().unwrap().months, 12);
        assert_eq!(t.avg_12_month(), Some(850.0));
        assert_eq!(t.months_available, 14);
    }

    #[test]
    fn test_windows_are_nested() {
        // Thirteen months, oldest first; the oldest one falls outside every window.
        let data = months(&[5.0, 4.0, 3.0, 2.0, 1.0, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0]);
        let t = trailing_averages(&data).unwrap();
        let (w3, w6, w12) = (
            t.three_month.as_ref().unwrap(),
            t.six_month.as_ref().unwrap(),
            t.twelve_month.as_ref().unwrap(),
        );
        assert_eq!((w3.months, w6.months, w12.months), (3, 6, 12));
        assert!(w3.months <= w6.months && w6.months <= w12.months);
        assert_eq!(w3.avg_deposits, 3.0);
        assert_eq!(w6.avg_deposits, 4.5);
        assert_eq!(w12.avg_deposits, 4.5);
        assert_eq!(t.months_available, 13);
    }

    #[test]
    fn test_trailing_empty() {
        assert!(trailing_averages(&MonthlyData::new()).is_none());
    }

    #[test]
    fn test_mom_changes_skip_zero_prior_month() {
        let changes = mom_changes(&[0.0, 1000.0, 1500.0, 0.0, 200.0]);
        assert_eq!(changes, vec![50.0, -100.0]);
    }

    #[test]
    fn test_monthly_trends_increasing() {
        let data = months(&[1000.0, 1100.0, 1210.0]);
        let t = monthly_trends(&data, &Thresholds::default()).unwrap();
        assert_eq!(t.mom_changes.len(), 2);
        assert!((t.avg_mom_change - 10.0).abs() < 1e-9);
        assert_eq!(t.trend_direction, Trend::Increasing);
        assert!(!t.high_volatility);
    }

    #[test]
    fn test_monthly_trends_decreasing_and_volatile() {
        let data = months(&[10000.0, 2000.0, 1000.0]);
        let t = monthly_trends(&data, &Thresholds::default()).unwrap();
        assert_eq!(t.trend_direction, Trend::Decreasing);
        assert!(t.volatility_cv > 30.0);
        assert!(t.high_volatility);
    }

    #[test]
    fn test_monthly_trends_all_zero_months() {
        let t = monthly_trends(&months(&[0.0, 0.0, 0.0]), &Thresholds::default()).unwrap();
        assert!(t.mom_changes.is_empty());
        assert_eq!(t.avg_mom_change, 0.0);
        assert_eq!(t.volatility_cv, 0.0);
        assert_eq!(t.trend_direction, Trend::Stable);
    }

    #[test]
    fn test_monthly_trends_needs_two_months() {
        assert!(monthly_trends(&months(&[1000.0]), &Thresholds::default()).is_none());
        assert!(monthly_trends(&MonthlyData::new(), &Thresholds::default()).is_none());
    }

    #[test]
    fn test_volatility_threshold_is_configurable() {
        let data = months(&[1000.0, 1200.0]);
        let strict = Thresholds {
            high_volatility_cv: 5.0,
            ..Thresholds::default()
        };
        assert!(!monthly_trends(&data, &Thresholds::default()).unwrap().high_volatility);
        assert!(monthly_trends(&data, &strict).unwrap().high_volatility);
    }
}
