//! Cash flow analytics for underwriting.
//!
//! Buckets bank transactions by month and derives trailing averages,
//! deposit trends and volatility, deposit mix, outliers, balance trend,
//! NSF activity and a red-flag summary.
//!
//! ```no_run
//! use cashflow_analytics::{CashflowAnalyzer, MonthlySummary};
//!
//! let mut analyzer = CashflowAnalyzer::new();
//! analyzer.add_monthly_summary(&MonthlySummary {
//!     year: 2025,
//!     month: 12,
//!     beginning_balance: 4_000.0,
//!     ending_balance: 6_000.0,
//!     total_deposits: 20_000.0,
//!     total_withdrawals: 18_000.0,
//!     deposit_count: 14,
//! });
//! let summary = analyzer.generate_underwriting_summary();
//! println!("{} flags", summary.flag_count);
//! ```

pub mod analyzer;
pub mod balance;
pub mod categorizer;
pub mod error;
pub mod fmt;
pub mod input;
pub mod models;
pub mod monthly;
pub mod settings;
pub mod stats;
pub mod summary;
pub mod trends;

pub use analyzer::CashflowAnalyzer;
pub use error::{CashflowError, Result};
pub use models::{DepositCategory, MonthKey, MonthlyBucket, MonthlySummary, NsfSeverity, Transaction, Trend};
pub use settings::Thresholds;
pub use summary::{CashFlowSummary, UnderwritingSummary};
