//! Indonesian (`id-ID`) number formatting.
//!
//! Thousands are grouped with `.`, the decimal separator is `,` and at most
//! three fraction digits are shown, trailing zeros dropped.

const MAX_FRACTION_DIGITS: usize = 3;

/// Formats a number the way the `id-ID` locale does, e.g. `1234567.5` → `1.234.567,5`.
#[must_use]
pub fn format_number_id(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3 + frac.len() + 2);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Formats an amount of rupiah, e.g. `15000` → `Rp 15.000`.
#[must_use]
pub fn format_rupiah(value: f64) -> String {
    format!("Rp {}", format_number_id(value))
}
