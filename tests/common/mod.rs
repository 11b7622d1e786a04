//! In-memory feeds and classifiers for orchestrator scenarios

#![allow(dead_code)]

use aegis_risk_oracle::{
    ai::RiskClassifier,
    config::{Config, DEMO_SIGNER_KEY},
    errors::{OracleError, OracleResult},
    oracle::AuditOrchestrator,
    signals::{MarketFeed, SecurityFeed, SignalFeeds, SourceFeed},
    signing::VerdictSigner,
    types::{ClassifierOpinion, CodeAuditSignal, MarketSignal, RiskMask, SecuritySignal},
};
use alloy::primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct FakeMarket(pub Option<MarketSignal>);

#[async_trait]
impl MarketFeed for FakeMarket {
    async fn fetch_market(&self, price_feed_id: &str) -> OracleResult<MarketSignal> {
        self.0.clone().ok_or_else(|| {
            OracleError::signal("coingecko", format!("{} unreachable", price_feed_id), anyhow::anyhow!("connection refused"))
        })
    }
}

pub struct FakeSecurity(pub Option<SecuritySignal>);

#[async_trait]
impl SecurityFeed for FakeSecurity {
    async fn fetch_security(&self, _token: Address, _chain_id: u64) -> OracleResult<SecuritySignal> {
        self.0.clone().ok_or_else(|| {
            OracleError::signal("goplus", "unreachable", anyhow::anyhow!("connection refused"))
        })
    }
}

pub struct FakeSource(pub CodeAuditSignal);

#[async_trait]
impl SourceFeed for FakeSource {
    async fn fetch_source(&self, _token: Address, _chain_id: u64) -> CodeAuditSignal {
        self.0.clone()
    }
}

/// Answers with fixed flags, or fails when `flags` is None.
pub struct FakeClassifier {
    pub model: String,
    pub flags: Option<Vec<u32>>,
    pub calls: AtomicUsize,
}

impl FakeClassifier {
    pub fn answering(model: &str, flags: &[u32]) -> Arc<Self> {
        Arc::new(Self {
            model: model.to_string(),
            flags: Some(flags.to_vec()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(model: &str) -> Arc<Self> {
        Arc::new(Self {
            model: model.to_string(),
            flags: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiskClassifier for FakeClassifier {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn classify(&self, context_json: &str) -> OracleResult<ClassifierOpinion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(context_json.starts_with('{'), "context must be a JSON object");

        match &self.flags {
            Some(flags) => {
                let raw: Vec<u64> = flags.iter().map(|f| u64::from(*f)).collect();
                Ok(ClassifierOpinion {
                    flags: flags.clone(),
                    mask: RiskMask::fold_raw(&raw).unwrap_or(RiskMask::EMPTY),
                    reasoning: format!("{} reviewed the token", self.model),
                })
            }
            None => Err(OracleError::ClassifierUnavailable {
                model: self.model.clone(),
                message: "request timed out".to_string(),
            }),
        }
    }
}

pub fn usdc_market() -> MarketSignal {
    MarketSignal {
        price_usd: dec!(1),
        volume_24h: dec!(5400000000),
        market_cap: dec!(60000000000),
        price_change_24h: dec!(0.01),
    }
}

pub fn clean_security() -> SecuritySignal {
    SecuritySignal {
        owner_address: Some(Address::ZERO),
        is_open_source: true,
        buy_tax: Some(Decimal::ZERO),
        sell_tax: Some(Decimal::ZERO),
        ..Default::default()
    }
}

pub fn verified_source() -> CodeAuditSignal {
    CodeAuditSignal::Verified {
        contract_name: "FiatTokenV2_2".to_string(),
        source_text: "contract FiatTokenV2_2 { }".to_string(),
        implementation: None,
    }
}

pub fn feeds(
    market: Option<MarketSignal>,
    security: Option<SecuritySignal>,
    source: CodeAuditSignal,
) -> SignalFeeds {
    SignalFeeds::new(
        Arc::new(FakeMarket(market)),
        Arc::new(FakeSecurity(security)),
        Arc::new(FakeSource(source)),
    )
}

pub fn orchestrator_with(
    config: Config,
    feeds: SignalFeeds,
    classifiers: Vec<Arc<dyn RiskClassifier>>,
) -> AuditOrchestrator {
    let signer = VerdictSigner::from_private_key(DEMO_SIGNER_KEY).unwrap();
    AuditOrchestrator::new(Arc::new(config), feeds, classifiers, signer)
}

pub fn orchestrator(feeds: SignalFeeds, classifiers: Vec<Arc<dyn RiskClassifier>>) -> AuditOrchestrator {
    orchestrator_with(Config::default(), feeds, classifiers)
}

pub fn dyn_classifier(classifier: Arc<FakeClassifier>) -> Arc<dyn RiskClassifier> {
    classifier
}

pub fn clean_classifiers() -> Vec<Arc<dyn RiskClassifier>> {
    vec![
        dyn_classifier(FakeClassifier::answering("gpt-4o-mini", &[])),
        dyn_classifier(FakeClassifier::answering("llama-3.3-70b-versatile", &[])),
    ]
}
