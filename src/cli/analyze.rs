use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use cashflow_analytics::error::Result;
use cashflow_analytics::fmt::{money, money_opt, pct};
use cashflow_analytics::settings::Settings;
use cashflow_analytics::summary::{CashFlowSummary, UnderwritingSummary};
use cashflow_analytics::NsfSeverity;

use super::{build_analyzer, OutputFormat};

pub fn run(
    settings: &Settings,
    file: &Path,
    months: Option<&Path>,
    format: Option<OutputFormat>,
    summary: bool,
) -> Result<()> {
    let analyzer = build_analyzer(settings, file, months)?;
    let format = format.unwrap_or_else(|| OutputFormat::from_settings(settings));

    match (format, summary) {
        (OutputFormat::Json, false) => {
            let report = analyzer.generate_underwriting_summary();
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        (OutputFormat::Json, true) => {
            let s = analyzer.to_cash_flow_summary();
            println!("{}", serde_json::to_string_pretty(&s)?);
        }
        (OutputFormat::Table, false) => {
            let report = analyzer.generate_underwriting_summary();
            print!("{}", render_report(&report));
        }
        (OutputFormat::Table, true) => {
            let s = analyzer.to_cash_flow_summary();
            print!("{}", render_cash_flow_summary(&s));
        }
    }
    Ok(())
}

pub(crate) fn render_report(report: &UnderwritingSummary) -> String {
    let mut out = String::new();

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    match &report.trailing_averages {
        Some(t) => {
            table.add_row(vec![Cell::new("Months available"), Cell::new(t.months_available)]);
            table.add_row(vec![Cell::new("3-month avg deposits"), Cell::new(money_opt(t.avg_3_month()))]);
            table.add_row(vec![Cell::new("6-month avg deposits"), Cell::new(money_opt(t.avg_6_month()))]);
            table.add_row(vec![Cell::new("12-month avg deposits"), Cell::new(money_opt(t.avg_12_month()))]);
            table.add_row(vec![Cell::new("Annualized deposits"), Cell::new(money_opt(t.annualized_deposits))]);
            table.add_row(vec![Cell::new("Trailing trend"), Cell::new(t.trend)]);
        }
        None => {
            table.add_row(vec![Cell::new("Months available"), Cell::new(0)]);
        }
    }
    if let Some(m) = &report.monthly_trends {
        table.add_row(vec![Cell::new("MoM trend"), Cell::new(m.trend_direction)]);
        table.add_row(vec![Cell::new("Avg MoM change"), Cell::new(pct(m.avg_mom_change))]);
        let cv = if m.high_volatility {
            pct(m.volatility_cv).yellow().to_string()
        } else {
            pct(m.volatility_cv)
        };
        table.add_row(vec![Cell::new("Volatility (CV)"), Cell::new(cv)]);
    }
    if let Some(b) = &report.balance_trends {
        table.add_row(vec![Cell::new("Balance trend"), Cell::new(b.balance_trend)]);
        table.add_row(vec![Cell::new("Balance change"), Cell::new(format!("{} ({})", money(b.balance_change), pct(b.balance_change_pct)))]);
    }
    if let Some(a) = &report.average_daily_balance {
        table.add_row(vec![
            Cell::new("Average daily balance"),
            Cell::new(format!("{} ({} months)", money(a.average_daily_balance), a.months_included)),
        ]);
    }
    if let Some(n) = &report.nsf_overdraft {
        let severity = match n.severity {
            NsfSeverity::High => n.severity.to_string().red().bold().to_string(),
            NsfSeverity::Moderate => n.severity.to_string().yellow().to_string(),
            NsfSeverity::None => n.severity.to_string(),
        };
        table.add_row(vec![
            Cell::new("NSF / overdraft"),
            Cell::new(format!("{} items, {} ({severity})", n.nsf_count, money(n.nsf_total_fees))),
        ]);
    }
    out.push_str(&format!("Cash Flow Analysis\n{table}\n"));

    if let Some(cats) = &report.deposit_categories {
        let mut ctable = Table::new();
        ctable.set_header(vec!["Category", "Amount", "%", "Count"]);
        for (cat, totals) in cats.iter() {
            ctable.add_row(vec![
                Cell::new(cat.label().to_uppercase()),
                Cell::new(money(totals.total)),
                Cell::new(pct(totals.pct_of_total)),
                Cell::new(totals.count),
            ]);
        }
        ctable.add_row(vec![
            Cell::new("Total".bold()),
            Cell::new(money(cats.total_categorized)),
            Cell::new(""),
            Cell::new(""),
        ]);
        out.push_str(&format!("\nDeposit Mix\n{ctable}\n"));
    }

    if let Some(l) = &report.large_deposits {
        out.push_str(&format!(
            "\nLarge deposits: {} above {} totalling {} ({} of deposits); largest {}\n",
            l.count,
            money(l.threshold),
            money(l.total),
            pct(l.pct_from_large),
            money(l.largest),
        ));
    }

    out.push_str(&render_flags(&report.red_flags, &report.warnings));
    out
}

pub(crate) fn render_cash_flow_summary(s: &CashFlowSummary) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    let period = match (s.period_start, s.period_end) {
        (Some(a), Some(b)) => format!("{a} to {b}"),
        _ => "-".to_string(),
    };
    table.add_row(vec![Cell::new("Period"), Cell::new(period)]);
    table.add_row(vec![Cell::new("Monthly true revenue"), Cell::new(money(s.monthly_true_revenue))]);
    table.add_row(vec![Cell::new("Trailing 3mo"), Cell::new(money_opt(s.trailing_3mo_avg))]);
    table.add_row(vec![Cell::new("Trailing 6mo"), Cell::new(money_opt(s.trailing_6mo_avg))]);
    table.add_row(vec![Cell::new("Trailing 12mo"), Cell::new(money_opt(s.trailing_12mo_avg))]);
    table.add_row(vec![Cell::new("Average daily balance"), Cell::new(money(s.average_daily_balance))]);
    table.add_row(vec![Cell::new("NSF count"), Cell::new(s.nsf_count)]);
    table.add_row(vec![Cell::new("Trend"), Cell::new(s.trend)]);
    table.add_row(vec![Cell::new("Net cash flow"), Cell::new(money(s.net_cash_flow()))]);
    table.add_row(vec![Cell::new("Coverage ratio"), Cell::new(format!("{:.2}", s.coverage_ratio()))]);

    let mut out = format!("Cash Flow Summary\n{table}\n");
    out.push_str(&render_flags(&s.red_flags, &s.warnings));
    out
}

fn render_flags(red_flags: &[String], warnings: &[String]) -> String {
    if red_flags.is_empty() && warnings.is_empty() {
        return format!("\n{}\n", "No red flags or warnings.".green());
    }
    let mut out = String::from("\n");
    for flag in red_flags {
        out.push_str(&format!("{} {flag}\n", "RED FLAG".red().bold()));
    }
    for warning in warnings {
        out.push_str(&format!("{} {warning}\n", "WARNING ".yellow().bold()));
    }
    out
}
