//! # Money Module
//!
//! Provides the `Amount` type and the text-to-amount parsing used by every
//! numeric form field.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    200 * 18 / 100 = 36.00000000000001   ❌ drift in the tax line        │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                             │
//! │    Exact base-10 arithmetic at full precision while totals are          │
//! │    accumulated; rounding to 2 places happens only for display.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Parsing
//! Every numeric text field (price, quantity, discount, tax value, packing,
//! transport, amount paid) goes through [`parse_amount`]. The pipeline then
//! applies the default-zero policy through [`lenient_amount`]: text that is
//! not a number counts as `0` instead of raising an error.
//!
//! ```rust
//! use khata_core::money::{lenient_amount, parse_amount};
//!
//! assert_eq!(parse_amount("12.50").unwrap().to_string(), "12.50");
//! assert!(parse_amount("12abc").is_err());
//! assert!(lenient_amount("12abc").is_zero());
//! assert!(lenient_amount("").is_zero());
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::AmountParseError;

/// Largest magnitude accepted from a single text field.
///
/// Products of accepted values can still exceed `Decimal::MAX`, so the
/// pricing pipeline uses the `checked_*` operations.
pub const MAX_INPUT_MAGNITUDE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1e12

/// Decimal places used when amounts are shown to the user.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Amount Type
// =============================================================================

/// A monetary (or quantity) value at full decimal precision.
///
/// ## Design Decisions
/// - **Decimal, not cents**: taxes and percentage discounts produce
///   fractional paise that must survive until display
/// - **Signed**: discounts and overpayments can drive totals negative
/// - **Transparent serde**: serializes as the inner decimal (a JSON string)
///
/// ## Where Amount is Used
/// ```text
/// LineItem.price × LineItem.quantity ──► line total ──► products total
///                                                        │
///        discount ─► after discount ─► + taxes ─► + packing ─► + transport
///                                                                │
///                                        grand total − amount paid = balance
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Amount(#[ts(as = "String")] Decimal);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Wraps a decimal value.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Amount(value)
    }

    /// Creates an amount from a whole number of rupees.
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Amount(Decimal::from(major))
    }

    /// Returns the inner decimal value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Returns `self * rate / 100`, or `None` when the product overflows.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Amount;
    ///
    /// let base = Amount::from_major(180);
    /// let tax = base.checked_percent(Amount::from_major(18)).unwrap();
    /// assert_eq!(tax.to_fixed(), "32.40");
    /// ```
    pub fn checked_percent(&self, rate: Amount) -> Option<Amount> {
        self.0
            .checked_mul(rate.0)?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Amount)
    }

    /// Price × quantity. `None` on overflow.
    #[inline]
    pub fn checked_mul(&self, other: Amount) -> Option<Amount> {
        self.0.checked_mul(other.0).map(Amount)
    }

    #[inline]
    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    #[inline]
    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Sums amounts, stopping at the first overflow.
    ///
    /// ```rust
    /// use khata_core::money::Amount;
    ///
    /// let parts = [Amount::from_major(2), Amount::from_major(3)];
    /// assert_eq!(Amount::checked_sum(parts), Some(Amount::from_major(5)));
    /// ```
    pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> Option<Amount> {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Returns the amount, or zero when it is negative.
    #[inline]
    pub fn clamp_non_negative(&self) -> Self {
        if self.is_negative() {
            Amount::ZERO
        } else {
            *self
        }
    }

    /// Formats with exactly two decimals (half away from zero).
    ///
    /// This is the only place rounding happens; everything upstream keeps
    /// full precision.
    pub fn to_fixed(&self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(DISPLAY_DECIMALS);
        rounded.to_string()
    }

    /// Formats with a currency symbol, sign in front of the symbol.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Amount;
    ///
    /// assert_eq!(Amount::from_major(-5).format_currency("₹"), "-₹5.00");
    /// ```
    pub fn format_currency(&self, symbol: &str) -> String {
        let fixed = self.to_fixed();
        match fixed.strip_prefix('-') {
            Some(unsigned) => format!("-{symbol}{unsigned}"),
            None => format!("{symbol}{fixed}"),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed())
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a numeric text field.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Blank text is `0` (an untouched field)
/// - Accepts `12`, `12.5`, `.5`, `5.`, `+5`, `-5`, `1e3`
/// - Anything else, or a magnitude above [`MAX_INPUT_MAGNITUDE`], is an error
pub fn parse_amount(text: &str) -> Result<Decimal, AmountParseError> {
    let invalid = || AmountParseError {
        input: text.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let (negative, digits) = match unsigned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, unsigned),
    };
    let digits = digits.strip_suffix('.').unwrap_or(digits);

    if digits.is_empty()
        || digits.starts_with(['+', '-'])
        || !digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return Err(invalid());
    }

    let normalized = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };

    let magnitude = if normalized.contains(['e', 'E']) {
        Decimal::from_scientific(&normalized)
    } else {
        Decimal::from_str(&normalized)
    }
    .map_err(|_| invalid())?;

    if magnitude > MAX_INPUT_MAGNITUDE {
        return Err(invalid());
    }

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parses a numeric text field with the default-zero policy.
///
/// Unparsable text counts as zero. This hides typos such as `12,5` from
/// the totals; the behavior is intentional and must not be tightened here.
/// Forms that need strict input use [`parse_amount`] through
/// [`crate::validation`].
pub fn lenient_amount(text: &str) -> Amount {
    match parse_amount(text) {
        Ok(value) => Amount(value),
        Err(err) => {
            debug!(%err, "treating unparsable amount as zero");
            Amount::ZERO
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_input_magnitude_is_one_trillion() {
        assert_eq!(MAX_INPUT_MAGNITUDE, dec!(1000000000000));
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_amount("100").unwrap(), dec!(100));
        assert_eq!(parse_amount("  12.75 ").unwrap(), dec!(12.75));
        assert_eq!(parse_amount(".5").unwrap(), dec!(0.5));
        assert_eq!(parse_amount("5.").unwrap(), dec!(5));
        assert_eq!(parse_amount("+7").unwrap(), dec!(7));
        assert_eq!(parse_amount("-7.5").unwrap(), dec!(-7.5));
        assert_eq!(parse_amount("1e3").unwrap(), dec!(1000));
    }

    #[test]
    fn test_parse_blank_is_zero() {
        assert_eq!(parse_amount("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["abc", "12abc", "1,000", "--5", "-", ".", "1_000", "Infinity", "NaN"] {
            assert!(parse_amount(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_parse_rejects_huge_values() {
        assert!(parse_amount("1000000000000").is_ok());
        assert!(parse_amount("1000000000001").is_err());
        assert!(parse_amount("1e20").is_err());
    }

    #[test]
    fn test_lenient_amount_falls_back_to_zero() {
        assert_eq!(lenient_amount("12,5"), Amount::ZERO);
        assert_eq!(lenient_amount("42"), Amount::from_major(42));
    }

    #[test]
    fn test_to_fixed_rounds_half_away_from_zero() {
        assert_eq!(Amount::new(dec!(262.4)).to_fixed(), "262.40");
        assert_eq!(Amount::new(dec!(0.005)).to_fixed(), "0.01");
        assert_eq!(Amount::new(dec!(-0.005)).to_fixed(), "-0.01");
        assert_eq!(Amount::new(dec!(-0.001)).to_fixed(), "0.00");
        assert_eq!(Amount::ZERO.to_fixed(), "0.00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(Amount::new(dec!(62.4)).format_currency("₹"), "₹62.40");
        assert_eq!(Amount::new(dec!(-12.5)).format_currency("$"), "-$12.50");
    }

    #[test]
    fn test_percent() {
        let base = Amount::from_major(200);
        assert_eq!(base.checked_percent(Amount::from_major(10)), Some(Amount::from_major(20)));
        assert_eq!(base.checked_percent(Amount::ZERO), Some(Amount::ZERO));
    }

    #[test]
    fn test_checked_ops_report_overflow() {
        let largest = Amount::new(MAX_INPUT_MAGNITUDE);
        let line = largest.checked_mul(largest).unwrap();
        assert_eq!(line.value(), dec!(1000000000000000000000000));

        assert_eq!(line.checked_percent(largest), None);
        assert_eq!(line.checked_mul(largest), None);
        assert_eq!(Amount::new(Decimal::MAX).checked_add(Amount::from_major(1)), None);
        assert_eq!(Amount::new(Decimal::MIN).checked_sub(Amount::from_major(1)), None);
        assert_eq!(Amount::checked_sum([Amount::new(Decimal::MAX), largest]), None);
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Amount::from_major(10);
        let b = Amount::from_major(4);
        assert_eq!(a.checked_add(b), Some(Amount::from_major(14)));
        assert_eq!(b.checked_sub(a), Some(Amount::from_major(-6)));
        assert_eq!(a.checked_mul(b), Some(Amount::from_major(40)));

        assert_eq!(Amount::checked_sum([a, b, b]), Some(Amount::from_major(18)));
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Amount::from_major(-3).clamp_non_negative(), Amount::ZERO);
        assert_eq!(Amount::from_major(3).clamp_non_negative(), Amount::from_major(3));
    }
}
