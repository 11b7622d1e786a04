//! Audit orchestrator: sequences signals, rules, classifiers, consensus and signing

use alloy::primitives::{Address, B256};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;
use crate::{
    ai::{ForensicContext, RiskClassifier, classifiers_from_config, classify_all},
    config::Config,
    consensus::aggregate,
    errors::{OracleError, OracleResult},
    oracle::{AuditPhase, AuditTrace},
    signals::{SignalBundle, SignalFeeds},
    signing::{VerdictMessage, VerdictSigner, price_to_fixed_point},
    types::{AuditRequest, AuditResponse, ErrorResponse, MarketSignal, RiskVerdict},
    validation::RuleEngine,
};

/// Market signal after the fallback policy, with the note it leaves in the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMarket {
    pub signal: MarketSignal,
    pub fallback_note: Option<String>,
}

pub struct AuditOrchestrator {
    config: Arc<Config>,
    feeds: SignalFeeds,
    rules: RuleEngine,
    classifiers: Vec<Arc<dyn RiskClassifier>>,
    signer: VerdictSigner,
}

impl AuditOrchestrator {
    pub fn new(
        config: Arc<Config>,
        feeds: SignalFeeds,
        classifiers: Vec<Arc<dyn RiskClassifier>>,
        signer: VerdictSigner,
    ) -> Self {
        Self {
            rules: RuleEngine::from_config(&config),
            config,
            feeds,
            classifiers,
            signer,
        }
    }

    /// Live feeds, every configured classifier backend and the configured key.
    pub fn from_config(config: Arc<Config>) -> OracleResult<Self> {
        let feeds = SignalFeeds::from_config(&config)?;
        let classifiers = classifiers_from_config(&config)?;
        let signer = VerdictSigner::from_private_key(&config.signer_private_key)?;
        info!(
            "🛡️ Orchestrator ready: {} classifier backend(s), {} trusted token(s)",
            classifiers.len(),
            config.trust_list.len()
        );
        Ok(Self::new(config, feeds, classifiers, signer))
    }

    pub fn classifier_names(&self) -> Vec<String> {
        self.classifiers.iter().map(|c| c.model_name().to_string()).collect()
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decodes and validates a JSON body, then audits it.
    pub async fn analyze_payload(&self, body: &[u8]) -> AuditResponse {
        match AuditRequest::from_slice(body) {
            Ok(request) => self.analyze(request).await,
            Err(e) => {
                let mut trace = AuditTrace::new(Uuid::new_v4().to_string());
                warn!(audit_id = %trace.audit_id(), "❌ Rejected malformed request: {}", e);
                trace.enter(AuditPhase::Error);
                AuditResponse::Error(ErrorResponse::from_error(&e, Some(trace.audit_id().to_string()), None))
            }
        }
    }

    pub async fn analyze(&self, request: AuditRequest) -> AuditResponse {
        self.analyze_traced(request).await.0
    }

    /// Like [`analyze`](Self::analyze) but also returns the phase trace.
    pub async fn analyze_traced(&self, request: AuditRequest) -> (AuditResponse, AuditTrace) {
        let start = Instant::now();
        let mut trace = AuditTrace::new(Uuid::new_v4().to_string());
        info!(
            audit_id = %trace.audit_id(),
            "🔍 Audit requested for {} on chain {}",
            request.token_address,
            request.chain_id
        );

        let response = match self.run(&request, &mut trace).await {
            Ok(verdict) => {
                trace.enter(AuditPhase::Responded);
                AuditResponse::Verdict(Box::new(verdict))
            }
            Err(e) => {
                error!(audit_id = %trace.audit_id(), "❌ Audit failed closed: {}", e);
                trace.enter(AuditPhase::Error);
                AuditResponse::Error(ErrorResponse::from_error(
                    &e,
                    Some(trace.audit_id().to_string()),
                    request.salt,
                ))
            }
        };

        info!(audit_id = %trace.audit_id(), "⏱️ Audit finished in {:?}", start.elapsed());
        (response, trace)
    }

    async fn run(&self, request: &AuditRequest, trace: &mut AuditTrace) -> OracleResult<RiskVerdict> {
        let asking_price = price_to_fixed_point(request.asking_price)?;

        trace.enter(AuditPhase::SignalAcquisition);
        let price_feed_id = request
            .price_feed_id
            .as_deref()
            .unwrap_or(&self.config.default_price_feed_id);
        let bundle = self
            .feeds
            .acquire(request.token_address, request.chain_id, price_feed_id)
            .await;
        let SignalBundle { market, security, source } = bundle;
        let market = self.resolve_market(market, price_feed_id)?;
        let security = security?;

        trace.enter(AuditPhase::LogicEval);
        let logic = self.rules.evaluate(&market.signal, &security, request);

        trace.enter(AuditPhase::AiFanout);
        let context = ForensicContext::builder(request)
            .trusted(self.rules.is_trusted(&request.token_address))
            .market(market.signal.clone(), market.fallback_note.is_some())
            .security(security)
            .source(source)
            .snippet_chars(self.config.source_snippet_chars)
            .build()
            .to_json()?;
        let classifier_results = classify_all(&self.classifiers, &context).await;

        trace.enter(AuditPhase::Aggregation);
        let notes: Vec<String> = market.fallback_note.into_iter().collect();
        let outcome = aggregate(&logic, &classifier_results, &notes);

        trace.enter(AuditPhase::Signing);
        let salt = request.salt.unwrap_or(B256::ZERO);
        let timestamp = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let message = VerdictMessage {
            user: request.user_address.unwrap_or(Address::ZERO),
            token: request.token_address,
            chain_id: request.chain_id,
            asking_price,
            timestamp,
            verdict: outcome.verdict,
            risk_code: outcome.final_risk_code,
            salt,
        };
        let signed = self.signer.sign(&message)?;

        info!(
            audit_id = %trace.audit_id(),
            "🛡️ Verdict {} with risk code {}",
            if outcome.verdict { "APPROVED" } else { "RISK_DETECTED" },
            outcome.final_risk_code
        );

        Ok(RiskVerdict {
            audit_id: trace.audit_id().to_string(),
            token_address: request.token_address,
            chain_id: request.chain_id,
            logic_flags: outcome.logic_flags,
            ai_flags: outcome.ai_flags,
            final_risk_code: outcome.final_risk_code,
            verdict: outcome.verdict,
            ai_coverage: outcome.ai_coverage,
            flag_breakdown: outcome.final_risk_code.labels(),
            reasoning: outcome.reasoning,
            classifier_results,
            salt,
            timestamp,
            message_hash: signed.message_hash,
            signature: signed.signature,
            signer_address: signed.signer,
        })
    }

    /// A failed market fetch fails closed, except for the baseline asset when
    /// a fallback price is configured. A zero baseline price takes the same
    /// fallback; any other empty data is passed through as-is.
    pub fn resolve_market(
        &self,
        market: OracleResult<MarketSignal>,
        price_feed_id: &str,
    ) -> OracleResult<ResolvedMarket> {
        let fallback = self
            .config
            .fallback_price_usd
            .filter(|_| price_feed_id == self.config.baseline_price_feed_id);

        match (market, fallback) {
            (Ok(signal), Some(price)) if signal.price_usd.is_zero() => {
                warn!("⚠️ [DEMO MODE] {} returned no price, using fallback ${}", price_feed_id, price);
                Ok(ResolvedMarket {
                    signal: MarketSignal {
                        price_usd: price,
                        ..signal
                    },
                    fallback_note: Some(fallback_note(price)),
                })
            }
            (Ok(signal), _) => Ok(ResolvedMarket {
                signal,
                fallback_note: None,
            }),
            (Err(e), Some(price)) => {
                warn!("⚠️ [DEMO MODE] Market feed failed ({}), using fallback ${}", e, price);
                Ok(ResolvedMarket {
                    signal: MarketSignal::with_price(price),
                    fallback_note: Some(fallback_note(price)),
                })
            }
            (Err(e), None) => Err(e),
        }
    }
}

fn fallback_note(price: Decimal) -> String {
    format!("[DEMO MODE] fallback price ${} used for baseline asset", price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn orchestrator(config: Config) -> AuditOrchestrator {
        let config = Arc::new(config);
        AuditOrchestrator::from_config(config).unwrap()
    }

    fn feed_down() -> OracleResult<MarketSignal> {
        Err(OracleError::signal("coingecko", "timeout", anyhow::anyhow!("deadline elapsed")))
    }

    #[test]
    fn baseline_failure_uses_fallback_price() {
        let oracle = orchestrator(Config::default());
        let resolved = oracle.resolve_market(feed_down(), "ethereum").unwrap();
        assert_eq!(resolved.signal.price_usd, dec!(2500));
        assert!(resolved.fallback_note.unwrap().contains("[DEMO MODE]"));
    }

    #[test]
    fn zero_baseline_price_uses_fallback_and_keeps_volume() {
        let oracle = orchestrator(Config::default());
        let market = MarketSignal { volume_24h: dec!(10), ..Default::default() };
        let resolved = oracle.resolve_market(Ok(market), "ethereum").unwrap();
        assert_eq!(resolved.signal.price_usd, dec!(2500));
        assert_eq!(resolved.signal.volume_24h, dec!(10));
    }

    #[test]
    fn other_feed_failures_fail_closed() {
        let oracle = orchestrator(Config::default());
        assert!(matches!(
            oracle.resolve_market(feed_down(), "usd-coin"),
            Err(OracleError::SignalUnavailable { .. })
        ));

        let strict = orchestrator(Config { fallback_price_usd: None, ..Config::default() });
        assert!(strict.resolve_market(feed_down(), "ethereum").is_err());
    }

    #[test]
    fn zero_price_for_other_assets_is_passed_through() {
        let oracle = orchestrator(Config::default());
        let resolved = oracle.resolve_market(Ok(MarketSignal::default()), "scam-token").unwrap();
        assert!(resolved.signal.price_usd.is_zero());
        assert!(resolved.fallback_note.is_none());
    }
}
