use crate::config::CURRENCY_LABEL;

fn format_with_commas(value: u64) -> String {
    let s = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// `CHF 1,234.50`; amounts are rounded to cents first so `0.005` never
/// prints as `-0.00`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{} {}.{:02}",
        sign,
        CURRENCY_LABEL,
        format_with_commas(cents / 100),
        cents % 100
    )
}

/// Grams with one decimal where it matters: `120g`, `12.5g`.
pub fn format_grams(grams: f64) -> String {
    let rounded = (grams * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}g", rounded as i64)
    } else {
        format!("{:.1}g", rounded)
    }
}

/// Date part of a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn format_date(timestamp: &str) -> &str {
    timestamp.split([' ', 'T']).next().unwrap_or(timestamp)
}
