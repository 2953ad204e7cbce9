//! Conversion between micro-units and human decimal amounts.
//!
//! The core computes exclusively in `u64` micro-units. Decimals only appear
//! at the edges: log fields, scenario files and CLI output.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{MarketError, Result, constants};

/// Micro-units as a whole-unit decimal (`510_000` → `0.51`).
#[must_use]
pub fn to_decimal(micro: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(micro), constants::SCALE_DECIMALS).normalize()
}

/// Whole-unit decimal as micro-units (`0.51` → `510_000`).
///
/// # Errors
/// Returns [`MarketError::InvalidAmount`] for negative values, more than six
/// fractional digits, or values that do not fit in `u64` micro-units.
pub fn from_decimal(value: Decimal) -> Result<u64> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MarketError::InvalidAmount {
            reason: format!("{value} is negative"),
        });
    }
    if value.normalize().scale() > constants::SCALE_DECIMALS {
        return Err(MarketError::InvalidAmount {
            reason: format!(
                "{value} has more than {} fractional digits",
                constants::SCALE_DECIMALS
            ),
        });
    }
    value
        .checked_mul(Decimal::from(constants::SCALE))
        .and_then(|micro| micro.to_u64())
        .ok_or_else(|| MarketError::InvalidAmount {
            reason: format!("{value} overflows micro-units"),
        })
}

/// Parse a whole-unit decimal string as micro-units.
pub fn parse_units(raw: &str) -> Result<u64> {
    let value: Decimal = raw.trim().parse().map_err(|e| MarketError::InvalidAmount {
        reason: format!("{raw:?}: {e}"),
    })?;
    from_decimal(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_price_renders_as_decimal() {
        assert_eq!(to_decimal(510_000), Decimal::new(51, 2));
        assert_eq!(to_decimal(constants::SCALE), Decimal::ONE);
        assert_eq!(to_decimal(0), Decimal::ZERO);
    }

    #[test]
    fn parses_whole_and_fractional() {
        assert_eq!(parse_units("0.51").unwrap(), 510_000);
        assert_eq!(parse_units("100000").unwrap(), 100_000_000_000);
        assert_eq!(parse_units(" 0.000001 ").unwrap(), 1);
    }

    #[test]
    fn trailing_zeros_are_not_extra_precision() {
        assert_eq!(parse_units("1.5000000").unwrap(), 1_500_000);
    }

    #[test]
    fn rejects_sub_micro_precision() {
        let err = parse_units("0.0000001").unwrap_err();
        assert!(matches!(err, MarketError::InvalidAmount { .. }));
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!(matches!(
            parse_units("-1").unwrap_err(),
            MarketError::InvalidAmount { .. }
        ));
        assert!(matches!(
            parse_units("abc").unwrap_err(),
            MarketError::InvalidAmount { .. }
        ));
    }

    #[test]
    fn rejects_overflow() {
        let err = parse_units("99999999999999999999").unwrap_err();
        assert!(matches!(err, MarketError::InvalidAmount { .. }));
    }

    #[test]
    fn decimal_roundtrip_is_exact() {
        for micro in [0, 1, 9_999, 510_000, 1_234_567_890, u64::MAX] {
            assert_eq!(from_decimal(to_decimal(micro)).unwrap(), micro);
        }
    }
}
