//! Common helpers shared by both pricing calculators.
//!
//! Amounts are carried at full precision through every calculation; the
//! helpers here only shape values for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency code printed next to local currency totals.
pub const LOCAL_CURRENCY: &str = "COP";

/// Rounds a decimal value to `dp` decimal places using half-up rounding.
///
/// Values exactly at the midpoint are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use resort_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(612.505), 2), dec!(612.51));
/// assert_eq!(round_half_up(dec!(2450000.5), 0), dec!(2450001));
/// ```
pub fn round_half_up(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums `values`, returning `None` if the running total overflows.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use resort_core::calculations::common::checked_sum;
///
/// assert_eq!(checked_sum([dec!(350), dec!(262.5)]), Some(dec!(612.5)));
/// assert_eq!(checked_sum([Decimal::MAX, Decimal::ONE]), None);
/// ```
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
}

/// Formats an amount with `,` thousands separators and exactly `dp` decimals.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use resort_core::calculations::common::format_amount;
///
/// assert_eq!(format_amount(dec!(2450000), 2), "2,450,000.00");
/// assert_eq!(format_amount(dec!(612.5), 2), "612.50");
/// assert_eq!(format_amount(dec!(-1234.567), 0), "-1,235");
/// ```
pub fn format_amount(
    value: Decimal,
    dp: u32,
) -> String {
    let rounded = round_half_up(value, dp);
    let text = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

/// Formats a money amount with two decimals and thousands separators.
pub fn format_money(value: Decimal) -> String {
    format_amount(value, 2)
}
