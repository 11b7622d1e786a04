//! Display and printing utilities

use tracing::{info, warn};
use crate::{
    config::Config,
    types::{AuditResponse, RiskVerdict},
};

pub fn print_config(config: &Config, signer: &alloy::primitives::Address) {
    info!("📋 Configuration:");
    info!("   Listen address: {}", config.server_addr);
    info!("   Signer: {}", signer);
    info!("   Trust list: {} token(s)", config.trust_list.len());
    info!("   Liquidity ratio threshold: {}", config.thresholds.liquidity_ratio);
    info!("   Price deviation threshold: {}%", config.thresholds.price_deviation_pct);
    info!(
        "   Escrow asymmetry: {}x above ${}",
        config.thresholds.escrow_asymmetry_ratio, config.thresholds.escrow_min_value_usd
    );
    match config.fallback_price_usd {
        Some(price) => info!("   Baseline fallback: {} at ${}", config.baseline_price_feed_id, price),
        None => info!("   Baseline fallback: disabled"),
    }
    for backend in &config.classifiers {
        let keyed = if backend.api_key.is_some() { "✅" } else { "⚠️  no API key" };
        info!("   Classifier {} ({}): {}", backend.name, backend.model, keyed);
    }
}

/// Human-readable forensic breakdown, one line per entry.
pub fn format_verdict(verdict: &RiskVerdict) -> Vec<String> {
    let mut lines = vec![
        format!("🛡️  AEGIS VERDICT #{}", verdict.audit_id),
        format!("   Token: {} (chain {})", verdict.token_address, verdict.chain_id),
        format!("   Logic flags: {}", verdict.logic_flags),
        format!("   AI flags: {} ({:?})", verdict.ai_flags, verdict.ai_coverage),
    ];
    for result in &verdict.classifier_results {
        match &result.error {
            None => lines.push(format!("     ✅ {}: {}", result.model_name, result.mask)),
            Some(error) => lines.push(format!("     ❌ {}: {}", result.model_name, error)),
        }
    }
    lines.push(format!("   Final risk code: {}", verdict.final_risk_code));
    lines.push(format!(
        "   Result: {}",
        if verdict.verdict { "APPROVED" } else { "RISK_DETECTED" }
    ));
    lines.push(format!("   Signature: {}", verdict.signature));
    lines
}

pub fn print_verdict(verdict: &RiskVerdict) {
    for line in format_verdict(verdict) {
        if verdict.verdict {
            info!("{}", line);
        } else {
            warn!("{}", line);
        }
    }
}

pub fn print_audit_response(response: &AuditResponse) {
    match response {
        AuditResponse::Verdict(verdict) => print_verdict(verdict),
        AuditResponse::Error(error) => {
            warn!("❌ Audit error {}: {}", error.error_code, error.error);
        }
    }
}
