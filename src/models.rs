use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

/// A single already-parsed bank transaction. Positive amounts are deposits,
/// negative amounts are withdrawals.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// `None` when the source date could not be parsed.
    pub date: Option<NaiveDate>,
    pub amount: f64,
    pub description: String,
}

impl Transaction {
    pub fn new(date: Option<NaiveDate>, amount: f64, description: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
        }
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0.0
    }
}

/// Calendar month used as the bucket key. Orders chronologically and
/// renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-month aggregate. Built either from transactions or from a manually
/// supplied [`MonthlySummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    pub period: MonthKey,
    pub year: i32,
    pub month: u32,
    pub beginning_balance: f64,
    pub ending_balance: f64,
    pub total_deposits: f64,
    pub total_withdrawals: f64,
    pub deposit_count: usize,
    pub withdrawal_count: usize,
    pub net_cash_flow: f64,
    pub avg_deposit: f64,
    pub max_deposit: f64,
    pub min_deposit: f64,
    pub average_balance: f64,
    pub nsf_count: usize,
    pub negative_days: usize,
}

impl MonthlyBucket {
    pub fn empty(period: MonthKey) -> Self {
        Self {
            period,
            year: period.year,
            month: period.month,
            beginning_balance: 0.0,
            ending_balance: 0.0,
            total_deposits: 0.0,
            total_withdrawals: 0.0,
            deposit_count: 0,
            withdrawal_count: 0,
            net_cash_flow: 0.0,
            avg_deposit: 0.0,
            max_deposit: 0.0,
            min_deposit: 0.0,
            average_balance: 0.0,
            nsf_count: 0,
            negative_days: 0,
        }
    }

    /// Manual-entry path: balances and totals come straight from the caller.
    pub fn from_summary(summary: &MonthlySummary) -> Self {
        let period = MonthKey::new(summary.year, summary.month);
        Self {
            beginning_balance: summary.beginning_balance,
            ending_balance: summary.ending_balance,
            total_deposits: summary.total_deposits,
            total_withdrawals: summary.total_withdrawals,
            deposit_count: summary.deposit_count,
            net_cash_flow: summary.total_deposits - summary.total_withdrawals,
            average_balance: (summary.beginning_balance + summary.ending_balance) / 2.0,
            ..Self::empty(period)
        }
    }

    /// Spread of deposits relative to the average: `(max - min) / avg`.
    pub fn deposit_variance(&self) -> f64 {
        if self.avg_deposit > 0.0 && self.max_deposit > 0.0 {
            (self.max_deposit - self.min_deposit) / self.avg_deposit
        } else {
            0.0
        }
    }
}

/// Statement-level figures for one month, entered by hand instead of
/// derived from transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub beginning_balance: f64,
    #[serde(default)]
    pub ending_balance: f64,
    #[serde(default)]
    pub total_deposits: f64,
    #[serde(default)]
    pub total_withdrawals: f64,
    #[serde(default)]
    pub deposit_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositCategory {
    Ach,
    Wire,
    Cash,
    Card,
    Other,
}

impl DepositCategory {
    pub const ALL: [DepositCategory; 5] = [
        DepositCategory::Ach,
        DepositCategory::Wire,
        DepositCategory::Cash,
        DepositCategory::Card,
        DepositCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ach => "ach",
            Self::Wire => "wire",
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NsfSeverity {
    High,
    Moderate,
    None,
}

impl fmt::Display for NsfSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::None => "NONE",
        };
        f.write_str(s)
    }
}
