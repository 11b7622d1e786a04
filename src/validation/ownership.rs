//! Structural security rules: honeypot veto and live ownership

use crate::types::{SecuritySignal, is_renounced_owner};

pub fn check_honeypot(security: &SecuritySignal) -> Option<String> {
    security
        .is_honeypot
        .then(|| "Honeypot detected: token cannot be sold".to_string())
}

/// Untrusted tokens with a live owner. Zero and burn owners count as renounced.
pub fn check_ownership(security: &SecuritySignal, trusted: bool) -> Option<String> {
    if trusted {
        return None;
    }

    match security.owner_address {
        Some(owner) if !is_renounced_owner(&owner) => Some(format!(
            "Ownership not renounced: owner {}{}",
            owner,
            if security.hidden_owner { " (hidden owner)" } else { "" }
        )),
        _ => None,
    }
}
