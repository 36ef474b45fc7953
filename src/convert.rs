use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

use crate::counter::CounterInputs;

/// Placeholder shown before the first submission
pub const PLACEHOLDER: &str = "0";

#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("exchange rate must be a finite number, got {0}")]
    NotFinite(f64),

    #[error("exchange rate must not be negative, got {0}")]
    Negative(f64),
}

/// USD per yen, fixed for the lifetime of the form
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExchangeRate(f64);

impl ExchangeRate {
    pub fn new(rate: f64) -> Result<Self, RateError> {
        if !rate.is_finite() {
            return Err(RateError::NotFinite(rate));
        }
        if rate < 0.0 {
            return Err(RateError::Negative(rate));
        }
        Ok(Self(rate))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn convert(self, yen: u128) -> f64 {
        yen as f64 * self.0
    }
}

/// Outcome of one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    #[serde(flatten)]
    pub inputs: CounterInputs,
    pub yen: u128,
    pub rate: ExchangeRate,
    pub usd: f64,
    pub display: String,
}

impl Conversion {
    pub fn compute(inputs: &CounterInputs, rate: ExchangeRate) -> Self {
        let yen = inputs.total();
        let usd = rate.convert(yen);
        Self {
            inputs: *inputs,
            yen,
            rate,
            usd,
            display: format_usd(usd),
        }
    }
}

/// The text line under the form. The trailing `$` is kept unless disabled.
pub fn result_line(amount: &str, trailing_symbol: bool) -> String {
    if trailing_symbol {
        format!("USD: {}$", amount)
    } else {
        format!("USD: {}", amount)
    }
}

/// Format as en-US dollars: `$1,234.56`
pub fn format_usd(value: f64) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let value = value.abs();

    if value.is_infinite() {
        return format!("{}$∞", sign);
    }

    let fixed = to_fixed_2(value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Two decimals, taken from the shortest decimal form of `value` with
/// midpoints rounded away from zero (`1.005` is `1.01`).
///
/// Values past `Decimal`'s range have no fractional part left to round.
fn to_fixed_2(value: f64) -> String {
    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => format!(
            "{:.2}",
            decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Err(_) => format!("{:.2}", value),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
