use std::path::Path;

use comfy_table::{Cell, Table};

use cashflow_analytics::error::Result;
use cashflow_analytics::fmt::money;
use cashflow_analytics::monthly::MonthlyData;
use cashflow_analytics::settings::Settings;

use super::build_analyzer;

pub fn run(settings: &Settings, file: &Path, months: Option<&Path>) -> Result<()> {
    let analyzer = build_analyzer(settings, file, months)?;
    println!("{}", render_months(analyzer.monthly_data()));
    Ok(())
}

pub(crate) fn render_months(data: &MonthlyData) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Month", "Deposits", "#", "Withdrawals", "#", "Net", "Avg Deposit", "Spread", "End Balance",
        "NSF",
    ]);
    for bucket in data.values() {
        table.add_row(vec![
            Cell::new(bucket.period),
            Cell::new(money(bucket.total_deposits)),
            Cell::new(bucket.deposit_count),
            Cell::new(money(bucket.total_withdrawals)),
            Cell::new(bucket.withdrawal_count),
            Cell::new(money(bucket.net_cash_flow)),
            Cell::new(money(bucket.avg_deposit)),
            Cell::new(format!("{:.2}", bucket.deposit_variance())),
            Cell::new(money(bucket.ending_balance)),
            Cell::new(bucket.nsf_count),
        ]);
    }
    let net: f64 = data.values().map(|b| b.net_cash_flow).sum();
    format!("Monthly Cash Flow ({} months, net {})\n{table}", data.len(), money(net))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_analytics::monthly::aggregate_monthly;
    use cashflow_analytics::Transaction;
    use chrono::NaiveDate;

    #[test]
    fn test_render_months() {
        let data = aggregate_monthly(&[
            Transaction::new(NaiveDate::from_ymd_opt(2024, 1, 5), 500.0, "ACH"),
            Transaction::new(NaiveDate::from_ymd_opt(2024, 1, 9), 1000.0, "ACH"),
            Transaction::new(NaiveDate::from_ymd_opt(2024, 2, 5), -250.0, "OD FEE"),
        ]);
        let text = render_months(&data);
        assert!(text.contains("2 months, net $1,250.00"));
        assert!(text.contains("2024-01"));
        assert!(text.contains("$1,500.00"));
        assert!(text.contains("-$250.00"));
        assert!(text.contains("Spread"));
        // (1000 - 500) / 750
        assert!(text.contains("0.67"));
    }
}
