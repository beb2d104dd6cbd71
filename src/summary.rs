use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::balance::{AverageDailyBalance, BalanceTrends, NsfOverdraft};
use crate::categorizer::{DepositCategories, LargeDeposits};
use crate::models::Trend;
use crate::settings::Thresholds;
use crate::trends::{MonthlyTrends, TrailingAverages};

/// Missing analyses render as `{}` so consumers always see every key.
fn empty_map_if_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

/// Every analysis for one run plus the flags derived from them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UnderwritingSummary {
    #[serde(serialize_with = "empty_map_if_none")]
    pub trailing_averages: Option<TrailingAverages>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub monthly_trends: Option<MonthlyTrends>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub deposit_categories: Option<DepositCategories>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub large_deposits: Option<LargeDeposits>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub balance_trends: Option<BalanceTrends>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub nsf_overdraft: Option<NsfOverdraft>,
    #[serde(serialize_with = "empty_map_if_none")]
    pub average_daily_balance: Option<AverageDailyBalance>,
    pub red_flags: Vec<String>,
    pub warnings: Vec<String>,
    pub flag_count: usize,
}

impl UnderwritingSummary {
    /// Fill `red_flags`, `warnings` and `flag_count` from the analyses.
    pub fn derive_flags(&mut self, thresholds: &Thresholds) {
        let mut red_flags = Vec::new();
        let mut warnings = Vec::new();

        let nsf_count = self.nsf_overdraft.as_ref().map_or(0, |n| n.nsf_count);
        if nsf_count > thresholds.nsf_high_count {
            red_flags.push(format!("High NSF activity: {nsf_count} items"));
        } else if nsf_count > 0 {
            warnings.push(format!("NSF activity present: {nsf_count} items"));
        }

        if let Some(trends) = &self.monthly_trends {
            if trends.trend_direction == Trend::Decreasing {
                warnings.push("Declining deposit trend".to_string());
            }
            if trends.high_volatility {
                warnings.push(format!(
                    "High deposit volatility (CV: {:.1}%)",
                    trends.volatility_cv
                ));
            }
        }

        if let Some(large) = &self.large_deposits {
            if large.pct_from_large > thresholds.large_deposit_concentration_pct {
                warnings.push(format!(
                    "High concentration in large deposits ({:.1}%)",
                    large.pct_from_large
                ));
            }
        }

        if let Some(bal) = &self.balance_trends {
            if bal.balance_change_pct < thresholds.balance_decline_pct {
                red_flags.push(format!(
                    "Declining balance trend ({:.1}%)",
                    bal.balance_change_pct
                ));
            }
        }

        self.flag_count = warnings.len() + red_flags.len();
        self.red_flags = red_flags;
        self.warnings = warnings;
    }
}

// ---------------------------------------------------------------------------
// CashFlowSummary
// ---------------------------------------------------------------------------

/// Flattened projection of an [`UnderwritingSummary`] for downstream
/// decisioning.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CashFlowSummary {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub true_revenue_90d: f64,
    pub monthly_true_revenue: f64,
    pub total_deposits_90d: f64,
    pub total_withdrawals_90d: f64,
    pub average_daily_balance: f64,
    pub nsf_count: usize,
    pub negative_days: usize,
    pub recurring_debt_payments: f64,
    pub deposit_consistency: f64,
    pub cash_flow_margin: f64,
    pub trailing_3mo_avg: Option<f64>,
    pub trailing_6mo_avg: Option<f64>,
    pub trailing_12mo_avg: Option<f64>,
    pub trend: Trend,
    pub red_flags: Vec<String>,
    pub warnings: Vec<String>,
}

impl CashFlowSummary {
    pub fn from_report(report: &UnderwritingSummary) -> Self {
        let trailing = report.trailing_averages.as_ref();
        Self {
            monthly_true_revenue: trailing.and_then(|t| t.avg_3_month()).unwrap_or(0.0),
            average_daily_balance: report
                .average_daily_balance
                .as_ref()
                .map_or(0.0, |a| a.average_daily_balance),
            nsf_count: report.nsf_overdraft.as_ref().map_or(0, |n| n.nsf_count),
            trailing_3mo_avg: trailing.and_then(|t| t.avg_3_month()),
            trailing_6mo_avg: trailing.and_then(|t| t.avg_6_month()),
            trailing_12mo_avg: trailing.and_then(|t| t.avg_12_month()),
            trend: trailing.map(|t| t.trend).unwrap_or_default(),
            red_flags: report.red_flags.clone(),
            warnings: report.warnings.clone(),
            ..Self::default()
        }
    }

    pub fn net_cash_flow(&self) -> f64 {
        self.total_deposits_90d - self.total_withdrawals_90d
    }

    /// `(deposits - withdrawals - recurring debt) / deposits`, 0 without deposits.
    pub fn coverage_ratio(&self) -> f64 {
        if self.total_deposits_90d > 0.0 {
            let available =
                self.total_deposits_90d - self.total_withdrawals_90d - self.recurring_debt_payments;
            available / self.total_deposits_90d
        } else {
            0.0
        }
    }

    pub fn has_red_flags(&self) -> bool {
        !self.red_flags.is_empty()
    }
}

#[derive(Serialize)]
struct CashFlowSummaryRecord<'a> {
    period_start: Option<NaiveDate>,
    period_end: Option<NaiveDate>,
    true_revenue_90d: f64,
    monthly_true_revenue: f64,
    total_deposits_90d: f64,
    total_withdrawals_90d: f64,
    average_daily_balance: f64,
    nsf_count: usize,
    negative_days: usize,
    recurring_debt_payments: f64,
    deposit_consistency: f64,
    cash_flow_margin: f64,
    net_cash_flow: f64,
    coverage_ratio: f64,
    trailing_3mo_avg: Option<f64>,
    trailing_6mo_avg: Option<f64>,
    trailing_12mo_avg: Option<f64>,
    trend: Trend,
    red_flags: &'a [String],
    warnings: &'a [String],
}

impl Serialize for CashFlowSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CashFlowSummaryRecord {
            period_start: self.period_start,
            period_end: self.period_end,
            true_revenue_90d: self.true_revenue_90d,
            monthly_true_revenue: self.monthly_true_revenue,
            total_deposits_90d: self.total_deposits_90d,
            total_withdrawals_90d: self.total_withdrawals_90d,
            average_daily_balance: self.average_daily_balance,
            nsf_count: self.nsf_count,
            negative_days: self.negative_days,
            recurring_debt_payments: self.recurring_debt_payments,
            deposit_consistency: self.deposit_consistency,
            cash_flow_margin: self.cash_flow_margin,
            net_cash_flow: self.net_cash_flow(),
            coverage_ratio: self.coverage_ratio(),
            trailing_3mo_avg: self.trailing_3mo_avg,
            trailing_6mo_avg: self.trailing_6mo_avg,
            trailing_12mo_avg: self.trailing_12mo_avg,
            trend: self.trend,
            red_flags: &self.red_flags,
            warnings: &self.warnings,
        }
        .serialize(serializer)
    }
}
