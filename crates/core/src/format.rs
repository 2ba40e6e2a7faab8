//! Display formatting for money, counts and periods used in answers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Whole dollars with thousands separators: `$12,272,000`.
pub fn usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${}", group_thousands(&digits))
}

/// Millions with two decimals, sign first like `usd`: `$12.27M`, `-$0.99M`.
pub fn usd_millions(amount: Decimal) -> String {
    let value = (amount / Decimal::from(1_000_000))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{sign}${:.2}M", value.abs())
}

/// Millions with trailing zeros trimmed: `$4M`, `$1.02M`.
pub fn usd_millions_short(amount: Decimal) -> String {
    let value = (amount / Decimal::from(1_000_000))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("${value}M")
}

/// One decimal place: `3.9`.
pub fn one_decimal(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}")
}

pub fn count(value: u64) -> String {
    group_thousands(&value.to_string())
}

pub fn signed_count(value: i64) -> String {
    if value > 0 {
        format!("+{}", count(value.unsigned_abs()))
    } else if value < 0 {
        format!("-{}", count(value.unsigned_abs()))
    } else {
        "no change".to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, character) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(character);
    }
    grouped
}
