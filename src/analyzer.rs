use tracing::{debug, info};

use crate::balance::{self, AverageDailyBalance, BalanceTrends, NsfOverdraft};
use crate::categorizer::{self, DepositCategories, LargeDeposits};
use crate::models::{MonthKey, MonthlyBucket, MonthlySummary, Transaction};
use crate::monthly::{aggregate_monthly, MonthlyData};
use crate::settings::Thresholds;
use crate::summary::{CashFlowSummary, UnderwritingSummary};
use crate::trends::{self, MonthlyTrends, TrailingAverages};

/// Runs the cash flow analyses for one applicant's bank activity.
///
/// Transactions and manually entered months share a single bucket map; the
/// most recent write for a month wins. Every analysis reads that state
/// without changing it.
#[derive(Debug, Clone, Default)]
pub struct CashflowAnalyzer {
    transactions: Vec<Transaction>,
    monthly_data: MonthlyData,
    thresholds: Thresholds,
}

impl CashflowAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            ..Self::default()
        }
    }

    /// Replace the transaction list and bucket it by month. Months that
    /// were entered manually and have no transactions are kept.
    pub fn load_transactions(&mut self, transactions: Vec<Transaction>) -> &mut Self {
        let derived = aggregate_monthly(&transactions);
        info!(
            transactions = transactions.len(),
            months = derived.len(),
            "loaded transactions"
        );
        self.monthly_data.extend(derived);
        self.transactions = transactions;
        self
    }

    /// Record statement figures for a month directly, overwriting any
    /// bucket already held for it.
    pub fn add_monthly_summary(&mut self, summary: &MonthlySummary) -> &mut Self {
        let bucket = MonthlyBucket::from_summary(summary);
        debug!(period = %bucket.period, "added manual monthly summary");
        self.monthly_data.insert(bucket.period, bucket);
        self
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn monthly_data(&self) -> &MonthlyData {
        &self.monthly_data
    }

    pub fn month(&self, key: MonthKey) -> Option<&MonthlyBucket> {
        self.monthly_data.get(&key)
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn calculate_trailing_averages(&self) -> Option<TrailingAverages> {
        trends::trailing_averages(&self.monthly_data)
    }

    pub fn calculate_monthly_trends(&self) -> Option<MonthlyTrends> {
        trends::monthly_trends(&self.monthly_data, &self.thresholds)
    }

    pub fn categorize_deposits(&self) -> Option<DepositCategories> {
        categorizer::categorize_deposits(&self.transactions)
    }

    pub fn analyze_large_deposits(&self) -> Option<LargeDeposits> {
        categorizer::analyze_large_deposits(&self.transactions, &self.thresholds)
    }

    pub fn analyze_balance_trends(&self) -> Option<BalanceTrends> {
        balance::balance_trends(&self.monthly_data)
    }

    pub fn check_nsf_overdraft(&self) -> Option<NsfOverdraft> {
        balance::check_nsf_overdraft(&self.transactions, &self.thresholds)
    }

    pub fn calculate_average_daily_balance(&self) -> Option<AverageDailyBalance> {
        balance::average_daily_balance(&self.monthly_data)
    }

    /// Run every analysis and derive red flags and warnings.
    pub fn generate_underwriting_summary(&self) -> UnderwritingSummary {
        let mut report = UnderwritingSummary {
            trailing_averages: self.calculate_trailing_averages(),
            monthly_trends: self.calculate_monthly_trends(),
            deposit_categories: self.categorize_deposits(),
            large_deposits: self.analyze_large_deposits(),
            balance_trends: self.analyze_balance_trends(),
            nsf_overdraft: self.check_nsf_overdraft(),
            average_daily_balance: self.calculate_average_daily_balance(),
            ..UnderwritingSummary::default()
        };
        report.derive_flags(&self.thresholds);
        debug!(
            red_flags = report.red_flags.len(),
            warnings = report.warnings.len(),
            "underwriting summary compiled"
        );
        report
    }

    pub fn to_cash_flow_summary(&self) -> CashFlowSummary {
        let report = self.generate_underwriting_summary();
        let mut summary = CashFlowSummary::from_report(&report);
        let mut dates = self.transactions.iter().filter_map(|t| t.date);
        if let Some(first) = dates.next() {
            let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
            summary.period_start = Some(start);
            summary.period_end = Some(end);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NsfSeverity, Trend};
    use chrono::NaiveDate;

    fn date(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    fn txn(d: &str, amount: f64, desc: &str) -> Transaction {
        Transaction::new(date(d), amount, desc)
    }

    fn summary(year: i32, month: u32, begin: f64, end: f64, deposits: f64) -> MonthlySummary {
        MonthlySummary {
            year,
            month,
            beginning_balance: begin,
            ending_balance: end,
            total_deposits: deposits,
            total_withdrawals: deposits * 0.9,
            deposit_count: 10,
        }
    }

    #[test]
    fn test_empty_analyzer_produces_well_formed_summary() {
        let analyzer = CashflowAnalyzer::new();
        assert!(analyzer.calculate_trailing_averages().is_none());
        assert!(analyzer.calculate_monthly_trends().is_none());
        assert!(analyzer.categorize_deposits().is_none());
        assert!(analyzer.analyze_large_deposits().is_none());
        assert!(analyzer.analyze_balance_trends().is_none());
        assert!(analyzer.check_nsf_overdraft().is_none());
        assert!(analyzer.calculate_average_daily_balance().is_none());

        let report = analyzer.generate_underwriting_summary();
        assert_eq!(report, UnderwritingSummary::default());
        assert_eq!(report.flag_count, 0);
    }

    #[test]
    fn test_deposit_and_nsf_fee_in_one_month() {
        let mut analyzer = CashflowAnalyzer::new();
        analyzer.load_transactions(vec![
            txn("2024-01-05", 500.0, "ACH DEPOSIT"),
            txn("2024-01-10", -200.0, "NSF FEE"),
        ]);
        let jan = analyzer.month(MonthKey::new(2024, 1)).unwrap();
        assert_eq!(jan.total_deposits, 500.0);
        assert_eq!(jan.total_withdrawals, 200.0);
        assert_eq!(jan.net_cash_flow, 300.0);

        let nsf = analyzer.check_nsf_overdraft().unwrap();
        assert_eq!(nsf.nsf_count, 1);
        assert_eq!(nsf.severity, NsfSeverity::Moderate);

        let report = analyzer.generate_underwriting_summary();
        assert_eq!(report.warnings, vec!["NSF activity present: 1 items"]);
        assert!(report.monthly_trends.is_none());
    }

    #[test]
    fn test_manual_and_derived_months_coexist() {
        let mut analyzer = CashflowAnalyzer::new();
        analyzer
            .add_monthly_summary(&summary(2023, 12, 1000.0, 3000.0, 9000.0))
            .add_monthly_summary(&summary(2024, 1, 1.0, 1.0, 1.0));
        analyzer.load_transactions(vec![txn("2024-01-15", 750.0, "CARD SETTLEMENT")]);

        assert_eq!(analyzer.monthly_data().len(), 2);
        // Derived bucket replaced the manual January entry.
        let jan = analyzer.month(MonthKey::new(2024, 1)).unwrap();
        assert_eq!(jan.total_deposits, 750.0);
        assert_eq!(jan.ending_balance, 0.0);
        let dec = analyzer.month(MonthKey::new(2023, 12)).unwrap();
        assert_eq!(dec.average_balance, 2000.0);

        // And a later manual entry replaces the derived one.
        analyzer.add_monthly_summary(&summary(2024, 1, 3000.0, 5000.0, 8000.0));
        assert_eq!(analyzer.month(MonthKey::new(2024, 1)).unwrap().total_deposits, 8000.0);

        let adb = analyzer.calculate_average_daily_balance().unwrap();
        assert_eq!(adb.months_included, 2);
        assert_eq!(adb.average_daily_balance, 3000.0);
    }

    #[test]
    fn test_analyses_are_idempotent() {
        let mut analyzer = CashflowAnalyzer::new();
        analyzer.load_transactions(vec![
            txn("2024-01-05", 1200.0, "WIRE ORIG: ACME"),
            txn("2024-02-05", 900.0, "ACH"),
            txn("2024-03-05", 400.0, "CASH"),
            txn("2024-03-09", -35.0, "OVERDRAFT FEE"),
        ]);
        let before = analyzer.transactions().to_vec();
        let first = analyzer.generate_underwriting_summary();
        let second = analyzer.generate_underwriting_summary();
        assert_eq!(first, second);
        assert_eq!(analyzer.transactions(), before.as_slice());
        assert_eq!(analyzer.categorize_deposits(), analyzer.categorize_deposits());
    }

    #[test]
    fn test_declining_applicant_is_flagged() {
        let mut analyzer = CashflowAnalyzer::new();
        analyzer
            .add_monthly_summary(&summary(2024, 1, 10000.0, 10000.0, 30000.0))
            .add_monthly_summary(&summary(2024, 2, 10000.0, 8000.0, 20000.0))
            .add_monthly_summary(&summary(2024, 3, 8000.0, 5000.0, 10000.0));
        // Undated fees still count toward NSF activity without touching the buckets.
        let txns: Vec<Transaction> = (0..7)
            .map(|i| {
                let desc = if i % 2 == 0 { "NSF FEE" } else { "RETURNED ITEM" };
                Transaction::new(None, -35.0, desc)
            })
            .collect();
        analyzer.load_transactions(txns);
        assert_eq!(analyzer.monthly_data().len(), 3);

        let report = analyzer.generate_underwriting_summary();
        assert_eq!(report.trailing_averages.as_ref().unwrap().trend, Trend::Decreasing);
        assert_eq!(report.monthly_trends.as_ref().unwrap().trend_direction, Trend::Decreasing);
        assert!(report.red_flags.contains(&"High NSF activity: 7 items".to_string()));
        assert!(report.red_flags.contains(&"Declining balance trend (-50.0%)".to_string()));
        assert!(report.warnings.contains(&"Declining deposit trend".to_string()));
        assert_eq!(report.flag_count, report.red_flags.len() + report.warnings.len());
    }

    #[test]
    fn test_to_cash_flow_summary_maps_fields() {
        let mut analyzer = CashflowAnalyzer::new();
        analyzer
            .add_monthly_summary(&summary(2024, 1, 2000.0, 4000.0, 8000.0))
            .add_monthly_summary(&summary(2024, 2, 4000.0, 4000.0, 9000.0));
        analyzer.add_monthly_summary(&summary(2024, 3, 4000.0, 6000.0, 10000.0));
        analyzer.load_transactions(vec![
            txn("2024-03-31", 10.0, "ACH"),
            Transaction::new(None, 5.0, "UNDATED"),
            txn("2023-12-01", 20.0, "ACH"),
        ]);

        let s = analyzer.to_cash_flow_summary();
        // Dec 2023 and Mar 2024 are now derived from the transactions.
        assert_eq!(s.trailing_3mo_avg, Some((10.0 + 9000.0 + 8000.0) / 3.0));
        assert_eq!(s.monthly_true_revenue, s.trailing_3mo_avg.unwrap());
        assert_eq!(s.trailing_6mo_avg, Some((10.0 + 9000.0 + 8000.0 + 20.0) / 4.0));
        assert_eq!(s.trailing_12mo_avg, s.trailing_6mo_avg);
        assert_eq!(s.average_daily_balance, 3500.0);
        assert_eq!(s.nsf_count, 0);
        assert_eq!(s.period_start, date("2023-12-01"));
        assert_eq!(s.period_end, date("2024-03-31"));
        assert_eq!(s.total_deposits_90d, 0.0);
        assert_eq!(s.coverage_ratio(), 0.0);
    }

    #[test]
    fn test_custom_thresholds_flow_through() {
        let strict = Thresholds {
            nsf_high_count: 0,
            ..Thresholds::default()
        };
        let mut analyzer = CashflowAnalyzer::with_thresholds(strict);
        analyzer.load_transactions(vec![txn("2024-01-02", -25.0, "od fee")]);
        assert_eq!(analyzer.check_nsf_overdraft().unwrap().severity, NsfSeverity::High);
        assert_eq!(
            analyzer.generate_underwriting_summary().red_flags,
            vec!["High NSF activity: 1 items"]
        );
    }
}
