//! Amount helpers shared by models, aggregation and presentation.

/// Clamp an amount to a finite, non-negative value. NaN, infinities and
/// negatives all become 0.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse user input into an amount. Anything that is not a finite,
/// non-negative number becomes 0.
pub fn coerce_amount(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .map(non_negative)
        .unwrap_or(0.0)
}

/// Render an amount with the configured currency label, e.g. `Rs: 19500.00`.
pub fn format_amount(amount: f64, currency: &str) -> String {
    if currency.is_empty() {
        format!("{:.2}", amount)
    } else {
        format!("{} {:.2}", currency, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_garbage_to_zero() {
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount("-12"), 0.0);
        assert_eq!(coerce_amount("NaN"), 0.0);
        assert_eq!(coerce_amount("inf"), 0.0);
        assert_eq!(coerce_amount(" 600.5 "), 600.5);
    }

    #[test]
    fn formats_with_currency() {
        assert_eq!(format_amount(19500.0, "Rs:"), "Rs: 19500.00");
        assert_eq!(format_amount(1.5, ""), "1.50");
    }
}
