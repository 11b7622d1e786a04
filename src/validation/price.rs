//! Price deviation and escrow asymmetry rules

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::str::FromStr;
use crate::config::RuleThresholds;

/// |asking - market| / market in percent, unrounded. None without a market
/// price. A deviation too large for `Decimal` saturates to `Decimal::MAX`.
pub fn price_deviation_pct(asking_price: Decimal, market_price: Decimal) -> Option<Decimal> {
    if market_price <= dec!(0) {
        return None;
    }
    let deviation = asking_price
        .checked_sub(market_price)
        .map(|diff| diff.abs())
        .and_then(|diff| diff.checked_div(market_price))
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(Decimal::MAX);
    Some(deviation)
}

pub fn check_price_deviation(
    asking_price: Option<Decimal>,
    market_price: Decimal,
    threshold_pct: Decimal,
) -> Option<String> {
    let asking = asking_price?;
    let deviation = price_deviation_pct(asking, market_price)?;

    if deviation > threshold_pct {
        return Some(format!(
            "Price deviation {}% exceeds {}% (asking ${} vs market ${})",
            deviation.round_dp(2),
            threshold_pct,
            asking,
            market_price
        ));
    }

    None
}

/// Escrow figures pulled from the caller's trade context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscrowTerms {
    pub total_escrow_value: Decimal,
    pub target_amount: Decimal,
}

impl EscrowTerms {
    /// Reads `totalEscrowValue` and `targetAmount`; both must be present.
    pub fn from_trade_details(details: &Value) -> Option<Self> {
        Some(Self {
            total_escrow_value: number_field(details, "totalEscrowValue")?,
            target_amount: number_field(details, "targetAmount")?,
        })
    }

    /// None when the product does not fit a `Decimal`.
    pub fn expected_value(&self, market_price: Decimal) -> Option<Decimal> {
        self.target_amount.checked_mul(market_price)
    }
}

pub fn check_escrow_asymmetry(
    terms: &EscrowTerms,
    market_price: Decimal,
    thresholds: &RuleThresholds,
) -> Option<String> {
    let escrow = terms.total_escrow_value;
    if escrow < thresholds.escrow_min_value_usd {
        return None;
    }

    // Out-of-range trade figures are treated as asymmetric.
    let Some(expected) = terms.expected_value(market_price) else {
        return Some(format!(
            "Escrow asymmetry: ${} locked against an expected value out of range",
            escrow.round_dp(2)
        ));
    };
    let limit = expected.checked_mul(thresholds.escrow_asymmetry_ratio);
    if expected.is_zero() || limit.is_none_or(|limit| escrow > limit) {
        return Some(format!(
            "Escrow asymmetry: ${} locked against ${} expected (limit {}x)",
            escrow.round_dp(2),
            expected.round_dp(2),
            thresholds.escrow_asymmetry_ratio
        ));
    }

    None
}

fn number_field(details: &Value, key: &str) -> Option<Decimal> {
    match &details[key] {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deviation_is_symmetric() {
        assert_eq!(price_deviation_pct(dec!(150), dec!(100)), Some(dec!(50)));
        assert_eq!(price_deviation_pct(dec!(50), dec!(100)), Some(dec!(50)));
        assert_eq!(price_deviation_pct(dec!(1), dec!(3)).map(|d| d.round_dp(2)), Some(dec!(66.67)));
        assert_eq!(price_deviation_pct(dec!(1), dec!(0)), None);
    }

    #[test]
    fn deviation_just_above_threshold_is_flagged() {
        assert!(check_price_deviation(Some(dec!(150.004)), dec!(100), dec!(50)).is_some());
        assert!(check_price_deviation(Some(dec!(49.996)), dec!(100), dec!(50)).is_some());
    }

    #[test]
    fn huge_asking_price_saturates_instead_of_panicking() {
        let huge = dec!(10000000000000000000000000000);
        assert_eq!(price_deviation_pct(huge, dec!(1)), Some(Decimal::MAX));
        assert_eq!(price_deviation_pct(Decimal::MAX, dec!(0.5)), Some(Decimal::MAX));
        assert!(check_price_deviation(Some(huge), dec!(1), dec!(50)).is_some());
    }

    #[test]
    fn deviation_at_threshold_is_not_flagged() {
        assert!(check_price_deviation(Some(dec!(150)), dec!(100), dec!(50)).is_none());
        assert!(check_price_deviation(Some(dec!(151)), dec!(100), dec!(50)).is_some());
        assert!(check_price_deviation(None, dec!(100), dec!(50)).is_none());
    }

    #[test]
    fn escrow_terms_accept_strings_and_numbers() {
        let terms = EscrowTerms::from_trade_details(&json!({
            "totalEscrowValue": "4650",
            "targetAmount": 2
        }))
        .unwrap();
        assert_eq!(terms.total_escrow_value, dec!(4650));
        assert_eq!(terms.expected_value(dec!(2500)), Some(dec!(5000)));
        assert!(EscrowTerms::from_trade_details(&json!({ "targetAmount": 1 })).is_none());
    }

    #[test]
    fn inflated_escrow_is_flagged() {
        let thresholds = RuleThresholds::default();
        let fair = EscrowTerms { total_escrow_value: dec!(2500), target_amount: dec!(1) };
        let inflated = EscrowTerms { total_escrow_value: dec!(4000), target_amount: dec!(1) };
        let dust = EscrowTerms { total_escrow_value: dec!(5), target_amount: dec!(0) };

        assert!(check_escrow_asymmetry(&fair, dec!(2500), &thresholds).is_none());
        assert!(check_escrow_asymmetry(&inflated, dec!(2500), &thresholds).is_some());
        assert!(check_escrow_asymmetry(&dust, dec!(2500), &thresholds).is_none());
    }

    #[test]
    fn zero_expected_value_is_flagged_above_floor() {
        let terms = EscrowTerms { total_escrow_value: dec!(100), target_amount: dec!(0) };
        assert!(check_escrow_asymmetry(&terms, dec!(2500), &RuleThresholds::default()).is_some());
    }

    #[test]
    fn overflowing_escrow_figures_are_flagged_not_panicking() {
        let thresholds = RuleThresholds::default();
        let huge_target = EscrowTerms { total_escrow_value: dec!(100), target_amount: Decimal::MAX };
        assert_eq!(huge_target.expected_value(dec!(2500)), None);
        assert!(check_escrow_asymmetry(&huge_target, dec!(2500), &thresholds).is_some());

        let huge_limit = EscrowTerms { total_escrow_value: dec!(100), target_amount: Decimal::MAX / dec!(2) };
        assert!(check_escrow_asymmetry(&huge_limit, dec!(1), &thresholds).is_some());
    }
}
