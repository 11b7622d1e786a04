//! Classifier instructions

use crate::types::RiskFlag;

const PREAMBLE: &str = "You are a DeFi forensic analyst reviewing a token swap. \
Analyze the DATA below and return a JSON object with 'flags' (array of integers) and 'reasoning' (string).";

const INSTRUCTIONS: &str = "INSTRUCTIONS:
- Only use flag values from the RISK MAP.
- If security.isHoneypot is true you MUST include 16.
- If trade.deviationPercent is above 10% you MUST include 2.
- A source snippet of UNVERIFIED means the code could not be inspected; weigh that as elevated risk.
- Return JSON ONLY: {\"flags\": [number], \"reasoning\": \"string\"}";

fn flag_hint(flag: RiskFlag) -> &'static str {
    match flag {
        RiskFlag::Liquidity => "thin volume relative to market cap",
        RiskFlag::Volatility => "price manipulation or asking price far from market",
        RiskFlag::SuspiciousCode => "blacklist, pause, mint or hidden fee logic in source",
        RiskFlag::OwnershipRisk => "centralized owner, ownership not renounced",
        RiskFlag::Honeypot => "token cannot be sold",
        RiskFlag::Impersonation => "name or symbol mimics a well-known asset",
        RiskFlag::WashTrading => "volume inconsistent with holders or liquidity",
        RiskFlag::SuspiciousDeployer => "deployer or creator linked to prior scams",
        RiskFlag::Phishing => "approval drain or phishing pattern",
        RiskFlag::AiAnomaly => "anything else that looks wrong",
    }
}

/// System prompt embedding the serialized forensic context.
pub fn build_prompt(context_json: &str) -> String {
    let risk_map = RiskFlag::ALL
        .iter()
        .map(|f| format!("{} = {} ({})", f.bit(), f.label(), flag_hint(*f)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nDATA:\n{}\n\nRISK MAP (Bitmask):\n{}\n\n{}",
        PREAMBLE, context_json, risk_map, INSTRUCTIONS
    )
}
