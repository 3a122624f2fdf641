//! Display formatting for yen amounts and category shares.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

/// Formats `number` as whole yen with thousands separators, e.g. "¥1,500".
///
/// Negative amounts are prefixed with a minus sign, e.g. "-¥500".
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("¥")
            .expect("yen prefix fits in the formatter prefix buffer")
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-¥")
            .expect("yen prefix fits in the formatter prefix buffer")
            .precision(Precision::Decimals(0))
    });

    let number = number.round();

    if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // numfmt renders zero without the prefix
        "¥0".to_owned()
    }
}

/// Formats a category share with one decimal place, or "-" when the share is
/// undefined because the category total was zero.
pub fn format_percentage(percentage: Option<f64>) -> String {
    match percentage {
        Some(percentage) => format!("{percentage:.1}%"),
        None => "-".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_percentage};

    #[test]
    fn formats_whole_yen_with_separators() {
        assert_eq!(format_currency(1500.0), "¥1,500");
        assert_eq!(format_currency(1_234_567.0), "¥1,234,567");
        assert_eq!(format_currency(999.0), "¥999");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_currency(-500.0), "-¥500");
        assert_eq!(format_currency(-12_000.0), "-¥12,000");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_currency(0.0), "¥0");
        assert_eq!(format_currency(-0.4), "¥0");
    }

    #[test]
    fn rounds_fractional_yen() {
        assert_eq!(format_currency(1499.6), "¥1,500");
    }

    #[test]
    fn formats_percentage() {
        assert_eq!(format_percentage(Some(100.0)), "100.0%");
        assert_eq!(format_percentage(Some(200.0 / 3.0)), "66.7%");
        assert_eq!(format_percentage(None), "-");
    }
}
