// All supported native assets use the standard 18-decimal base unit.
const WEI_PER_NATIVE: f64 = 1e18;
const EXPONENTIAL_THRESHOLD: f64 = 0.000001;

/// Formats a smallest-unit amount for display: `"0"` for zero, exponential
/// notation with 6 fractional digits below 1e-6, otherwise fixed-point with
/// 8 decimals and trailing zeros (and a bare point) stripped.
pub fn format_native_balance(raw: u128) -> String {
    let amount = raw as f64 / WEI_PER_NATIVE;
    if amount == 0.0 {
        return "0".to_owned();
    }
    if amount < EXPONENTIAL_THRESHOLD {
        return to_exponential(amount);
    }

    let fixed = format!("{:.8}", amount);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_owned()
}

/// `5e-7` renders as `"5.000000e-7"`: mantissa in [1, 10) with exactly six
/// fractional digits, exponent without padding.
fn to_exponential(amount: f64) -> String {
    let mut exponent = 0i32;
    let mut mantissa = amount;

    while mantissa < 1.0 {
        mantissa *= 10.0;
        exponent -= 1;
    }
    while mantissa >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    // A mantissa like 9.9999996 rounds up to 10 at six digits; re-normalize
    // so the printed mantissa stays in [1, 10).
    if (mantissa * 1e6).round() >= 1e7 {
        mantissa /= 10.0;
        exponent += 1;
    }

    format!("{:.6}e{}", mantissa, exponent)
}
