use serde::Serialize;

use crate::models::{NsfSeverity, Transaction, Trend};
use crate::monthly::MonthlyData;
use crate::settings::Thresholds;
use crate::stats;

const NSF_KEYWORDS: &[&str] = &["NSF", "INSUFFICIENT", "OVERDRAFT", "OD FEE", "RETURNED ITEM"];

// ---------------------------------------------------------------------------
// Balance trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceTrends {
    pub average_balance: f64,
    pub min_balance: f64,
    pub max_balance: f64,
    pub balance_change: f64,
    pub balance_change_pct: f64,
    pub balance_trend: Trend,
}

/// First-to-last change in month-end balances. Months ending at zero or below
/// are left out of the calculation entirely.
pub fn balance_trends(data: &MonthlyData) -> Option<BalanceTrends> {
    let balances: Vec<f64> = data
        .values()
        .map(|b| b.ending_balance)
        .filter(|b| *b > 0.0)
        .collect();

    let (first, last) = (*balances.first()?, *balances.last()?);
    let balance_change = last - first;
    let balance_change_pct = stats::pct_change(first, last);

    let balance_trend = if balance_change_pct > 10.0 {
        Trend::Increasing
    } else if balance_change_pct < -10.0 {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    Some(BalanceTrends {
        average_balance: stats::mean(&balances),
        min_balance: stats::min(&balances),
        max_balance: stats::max(&balances),
        balance_change,
        balance_change_pct,
        balance_trend,
    })
}

// ---------------------------------------------------------------------------
// NSF / overdraft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NsfOverdraft {
    pub nsf_count: usize,
    pub nsf_total_fees: f64,
    pub severity: NsfSeverity,
}

pub fn is_nsf_description(description: &str) -> bool {
    let desc = description.to_uppercase();
    NSF_KEYWORDS.iter().any(|kw| desc.contains(kw))
}

pub fn nsf_severity(count: usize, thresholds: &Thresholds) -> NsfSeverity {
    if count > thresholds.nsf_high_count {
        NsfSeverity::High
    } else if count > 0 {
        NsfSeverity::Moderate
    } else {
        NsfSeverity::None
    }
}

pub fn check_nsf_overdraft(transactions: &[Transaction], thresholds: &Thresholds) -> Option<NsfOverdraft> {
    if transactions.is_empty() {
        return None;
    }
    let (nsf_count, nsf_total_fees) = transactions
        .iter()
        .filter(|t| is_nsf_description(&t.description))
        .fold((0usize, 0.0f64), |(n, total), t| (n + 1, total + t.amount.abs()));

    Some(NsfOverdraft {
        nsf_count,
        nsf_total_fees,
        severity: nsf_severity(nsf_count, thresholds),
    })
}

// ---------------------------------------------------------------------------
// Average daily balance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageDailyBalance {
    pub average_daily_balance: f64,
    pub months_included: usize,
}

/// Approximates ADB as the mean of monthly average balances. Only manually
/// entered months carry a balance, so derived-only data yields `None`.
pub fn average_daily_balance(data: &MonthlyData) -> Option<AverageDailyBalance> {
    let monthly_avgs: Vec<f64> = data
        .values()
        .map(|b| b.average_balance)
        .filter(|b| *b > 0.0)
        .collect();
    if monthly_avgs.is_empty() {
        return None;
    }
    Some(AverageDailyBalance {
        average_daily_balance: stats::mean(&monthly_avgs),
        months_included: monthly_avgs.len(),
    })
}
