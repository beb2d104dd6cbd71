use std::collections::BTreeMap;

use tracing::debug;

use crate::balance::is_nsf_description;
use crate::models::{MonthKey, MonthlyBucket, Transaction};
use crate::stats;

pub type MonthlyData = BTreeMap<MonthKey, MonthlyBucket>;

#[derive(Default)]
struct MonthAccumulator {
    deposits: Vec<f64>,
    withdrawals: Vec<f64>,
    nsf_count: usize,
}

impl MonthAccumulator {
    fn push(&mut self, txn: &Transaction) {
        if txn.amount > 0.0 {
            self.deposits.push(txn.amount.abs());
        } else {
            // Zero amounts land here on purpose.
            self.withdrawals.push(txn.amount.abs());
        }
        if is_nsf_description(&txn.description) {
            self.nsf_count += 1;
        }
    }

    fn finish(self, period: MonthKey) -> MonthlyBucket {
        let total_deposits: f64 = self.deposits.iter().sum();
        let total_withdrawals: f64 = self.withdrawals.iter().sum();
        MonthlyBucket {
            total_deposits,
            total_withdrawals,
            deposit_count: self.deposits.len(),
            withdrawal_count: self.withdrawals.len(),
            net_cash_flow: total_deposits - total_withdrawals,
            avg_deposit: stats::mean(&self.deposits),
            max_deposit: stats::max(&self.deposits),
            min_deposit: stats::min(&self.deposits),
            nsf_count: self.nsf_count,
            ..MonthlyBucket::empty(period)
        }
    }
}

/// Bucket transactions by calendar month in a single pass. Undated records
/// are skipped.
pub fn aggregate_monthly(transactions: &[Transaction]) -> MonthlyData {
    let mut months: BTreeMap<MonthKey, MonthAccumulator> = BTreeMap::new();
    let mut skipped = 0usize;

    for txn in transactions {
        let Some(date) = txn.date else {
            skipped += 1;
            continue;
        };
        months.entry(MonthKey::of(date)).or_default().push(txn);
    }

    if skipped > 0 {
        debug!(skipped, "dropped transactions without a usable date");
    }

    months
        .into_iter()
        .map(|(period, acc)| (period, acc.finish(period)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: &str, amount: f64, desc: &str) -> Transaction {
        Transaction::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(), amount, desc)
    }

    #[test]
    fn test_single_month_totals() {
        let data = aggregate_monthly(&[
            txn("2024-01-05", 500.0, "ACH DEPOSIT"),
            txn("2024-01-10", -200.0, "NSF FEE"),
        ]);
        let jan = &data[&MonthKey::new(2024, 1)];
        assert_eq!(jan.total_deposits, 500.0);
        assert_eq!(jan.total_withdrawals, 200.0);
        assert_eq!(jan.net_cash_flow, 300.0);
        assert_eq!(jan.deposit_count, 1);
        assert_eq!(jan.withdrawal_count, 1);
        assert_eq!(jan.nsf_count, 1);
    }

    #[test]
    fn test_splits_by_month_regardless_of_order() {
        let data = aggregate_monthly(&[
            txn("2024-03-01", 100.0, ""),
            txn("2024-01-15", 50.0, ""),
            txn("2024-03-20", 300.0, ""),
            txn("2023-12-31", 10.0, ""),
        ]);
        let keys: Vec<String> = data.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["2023-12", "2024-01", "2024-03"]);
        let mar = &data[&MonthKey::new(2024, 3)];
        assert_eq!(mar.total_deposits, 400.0);
        assert_eq!(mar.avg_deposit, 200.0);
        assert_eq!(mar.max_deposit, 300.0);
        assert_eq!(mar.min_deposit, 100.0);
    }

    #[test]
    fn test_zero_amount_counts_as_withdrawal() {
        let data = aggregate_monthly(&[txn("2024-02-01", 0.0, "ADJUSTMENT")]);
        let feb = &data[&MonthKey::new(2024, 2)];
        assert_eq!(feb.withdrawal_count, 1);
        assert_eq!(feb.deposit_count, 0);
        assert_eq!(feb.avg_deposit, 0.0);
        assert_eq!(feb.max_deposit, 0.0);
        assert_eq!(feb.min_deposit, 0.0);
    }

    #[test]
    fn test_undated_transactions_are_dropped() {
        let data = aggregate_monthly(&[
            Transaction::new(None, 900.0, "NO DATE"),
            txn("2024-05-02", 100.0, "OK"),
        ]);
        assert_eq!(data.len(), 1);
        assert_eq!(data[&MonthKey::new(2024, 5)].total_deposits, 100.0);
    }

    #[test]
    fn test_net_cash_flow_invariant_holds() {
        let data = aggregate_monthly(&[
            txn("2024-01-03", 1234.56, ""),
            txn("2024-01-04", -99.99, ""),
            txn("2024-02-03", -500.0, ""),
            txn("2024-02-09", 0.01, ""),
        ]);
        for bucket in data.values() {
            assert_eq!(bucket.net_cash_flow, bucket.total_deposits - bucket.total_withdrawals);
        }
    }

    #[test]
    fn test_derived_buckets_have_no_balances() {
        let data = aggregate_monthly(&[txn("2024-01-03", 10.0, "")]);
        let jan = &data[&MonthKey::new(2024, 1)];
        assert_eq!(jan.beginning_balance, 0.0);
        assert_eq!(jan.ending_balance, 0.0);
        assert_eq!(jan.average_balance, 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_monthly(&[]).is_empty());
    }
}
