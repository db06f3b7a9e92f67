/// `1234567.891` with symbol `₹` -> `₹1,234,567.89`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{}{}", symbol, value);
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}{}.{}", symbol, sign, grouped, frac_part)
}

/// Signed percentage with two decimals; `+` for zero and up. `None` reads as `0.00%`.
pub fn format_signed_percent(change: Option<f64>) -> String {
    match change {
        Some(c) if c >= 0.0 => format!("+{:.2}%", c),
        Some(c) => format!("{:.2}%", c),
        None => "0.00%".to_string(),
    }
}
