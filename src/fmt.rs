/// Dollar amount with thousands separators: `$1,234.56`, `-$500.00`.
pub fn money(val: f64) -> String {
    let fixed = format!("{:.2}", val.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let digits: Vec<char> = whole.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Percentage with one decimal: `12.3%`.
pub fn pct(val: f64) -> String {
    format!("{val:.1}%")
}

/// `money` for optional values, `-` when absent.
pub fn money_opt(val: Option<f64>) -> String {
    val.map(money).unwrap_or_else(|| "-".to_string())
}
