use bollo_core::calculations::common::round_half_up;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Rejections from the command-line value parsers.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(transparent)]
    Decimal(#[from] ParseDecimalError),

    #[error("value must be zero or greater, got {0}")]
    Negative(Decimal),

    #[error("value must be at most {max}, got {value}")]
    TooLarge { value: Decimal, max: Decimal },
}

pub const MAX_POWER_KW: Decimal = dec!(10000);
pub const MAX_CONSUMPTION: Decimal = dec!(100);
pub const MAX_FUEL_PRICE: Decimal = dec!(100);
pub const MAX_ANNUAL_KM: Decimal = dec!(1000000);

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid decimal: {}", e);
        ParseDecimalError {
            input: s.to_string(),
            source: e,
        }
    })
}

fn parse_bounded(
    s: &str,
    max: Decimal,
) -> Result<Decimal, InputError> {
    let value = parse_decimal(s)?;
    if value < Decimal::ZERO {
        return Err(InputError::Negative(value));
    }
    if value > max {
        return Err(InputError::TooLarge { value, max });
    }
    Ok(value)
}

/// Engine power in kW, `0..=10,000`.
pub fn parse_power(s: &str) -> Result<Decimal, InputError> {
    parse_bounded(s, MAX_POWER_KW)
}

/// Litres per 100 km, `0..=100`.
pub fn parse_consumption(s: &str) -> Result<Decimal, InputError> {
    parse_bounded(s, MAX_CONSUMPTION)
}

/// Price per litre, `0..=100`.
pub fn parse_price(s: &str) -> Result<Decimal, InputError> {
    parse_bounded(s, MAX_FUEL_PRICE)
}

/// Kilometres per year, `0..=1,000,000`.
pub fn parse_annual_km(s: &str) -> Result<Decimal, InputError> {
    parse_bounded(s, MAX_ANNUAL_KM)
}

/// Formats an amount with two decimals and `,` between thousands.
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Formats an optional [`Decimal`] for display, using "—" when `None`.
pub fn opt_decimal_display(d: &Option<Decimal>) -> String {
    d.as_ref()
        .map(|v| v.normalize().to_string())
        .unwrap_or_else(|| "—".to_string())
}
