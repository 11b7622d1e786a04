//! Deterministic rule engine
//!
//! Pure evaluation over fetched signals. No I/O and no classifier input, so
//! the same signals always produce the same mask.

use alloy::primitives::Address;
use std::collections::HashSet;
use tracing::debug;
use crate::{
    config::{Config, RuleThresholds},
    types::{AuditRequest, LogicAssessment, MarketSignal, RiskFlag, SecuritySignal},
    validation::{
        EscrowTerms, check_escrow_asymmetry, check_honeypot, check_liquidity, check_ownership,
        check_price_deviation,
    },
};

#[derive(Debug, Clone)]
pub struct RuleEngine {
    thresholds: RuleThresholds,
    trust_list: HashSet<Address>,
}

impl RuleEngine {
    pub fn new(thresholds: RuleThresholds, trust_list: HashSet<Address>) -> Self {
        Self {
            thresholds,
            trust_list,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.thresholds.clone(), config.trust_list.clone())
    }

    pub fn is_trusted(&self, token: &Address) -> bool {
        self.trust_list.contains(token)
    }

    pub fn evaluate(
        &self,
        market: &MarketSignal,
        security: &SecuritySignal,
        request: &AuditRequest,
    ) -> LogicAssessment {
        let trusted = self.is_trusted(&request.token_address);
        let mut assessment = LogicAssessment::default();

        let mut record = |flag: RiskFlag, finding: Option<String>| {
            if let Some(finding) = finding {
                debug!("Rule {} fired: {}", flag.label(), finding);
                assessment.flags.insert(flag);
                assessment.findings.push(finding);
            }
        };

        record(
            RiskFlag::Liquidity,
            check_liquidity(market, self.thresholds.liquidity_ratio, trusted),
        );
        record(
            RiskFlag::Volatility,
            check_price_deviation(
                request.asking_price,
                market.price_usd,
                self.thresholds.price_deviation_pct,
            ),
        );
        if let Some(terms) = request
            .trade_details
            .as_ref()
            .and_then(EscrowTerms::from_trade_details)
        {
            record(
                RiskFlag::Volatility,
                check_escrow_asymmetry(&terms, market.price_usd, &self.thresholds),
            );
        }
        record(RiskFlag::Honeypot, check_honeypot(security));
        record(RiskFlag::OwnershipRisk, check_ownership(security, trusted));

        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use crate::types::{RiskMask, USDC_MAINNET};
    use alloy::primitives::address;

    fn engine() -> RuleEngine {
        RuleEngine::from_config(&Config::default())
    }

    fn healthy_market() -> MarketSignal {
        MarketSignal {
            price_usd: dec!(1),
            volume_24h: dec!(5000000000),
            market_cap: dec!(60000000000),
            price_change_24h: dec!(0),
        }
    }

    #[test]
    fn trusted_clean_token_has_no_flags() {
        let mut request = AuditRequest::new(USDC_MAINNET, 8453);
        request.asking_price = Some(dec!(1));
        let security = SecuritySignal { owner_address: Some(Address::ZERO), ..Default::default() };

        let assessment = engine().evaluate(&healthy_market(), &security, &request);
        assert_eq!(assessment.flags, RiskMask::EMPTY);
        assert!(assessment.findings.is_empty());
    }

    #[test]
    fn unknown_token_collects_every_structural_flag() {
        let token = address!("5a31705664a6d1dc79287c4613cbe30d8920153f");
        let mut request = AuditRequest::new(token, 8453);
        request.asking_price = Some(dec!(10));
        let market = MarketSignal { price_usd: dec!(1), ..Default::default() };
        let security = SecuritySignal {
            is_honeypot: true,
            owner_address: Some(address!("1111111111111111111111111111111111111111")),
            ..Default::default()
        };

        let assessment = engine().evaluate(&market, &security, &request);
        for flag in [
            RiskFlag::Liquidity,
            RiskFlag::Volatility,
            RiskFlag::Honeypot,
            RiskFlag::OwnershipRisk,
        ] {
            assert!(assessment.flags.contains(flag), "missing {}", flag.label());
        }
        assert_eq!(assessment.findings.len(), 4);
    }

    #[test]
    fn escrow_asymmetry_sets_volatility() {
        let mut request = AuditRequest::new(USDC_MAINNET, 8453);
        request.trade_details = Some(json!({ "totalEscrowValue": 4650, "targetAmount": 1 }));

        let assessment = engine().evaluate(&healthy_market(), &SecuritySignal::default(), &request);
        assert_eq!(assessment.flags, RiskMask::from(RiskFlag::Volatility));
    }
}
