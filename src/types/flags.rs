//! Risk flag bitmask shared with the on-chain vault
//!
//! Flag values are part of the on-chain/off-chain contract and must never
//! be renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum RiskFlag {
    Liquidity = 1,
    Volatility = 2,
    SuspiciousCode = 4,
    OwnershipRisk = 8,
    Honeypot = 16,
    Impersonation = 32,
    WashTrading = 64,
    SuspiciousDeployer = 128,
    Phishing = 256,
    AiAnomaly = 512,
}

impl RiskFlag {
    pub const ALL: [RiskFlag; 10] = [
        RiskFlag::Liquidity,
        RiskFlag::Volatility,
        RiskFlag::SuspiciousCode,
        RiskFlag::OwnershipRisk,
        RiskFlag::Honeypot,
        RiskFlag::Impersonation,
        RiskFlag::WashTrading,
        RiskFlag::SuspiciousDeployer,
        RiskFlag::Phishing,
        RiskFlag::AiAnomaly,
    ];

    pub const fn bit(self) -> u32 {
        self as u32
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskFlag::Liquidity => "LIQUIDITY_WARN",
            RiskFlag::Volatility => "VOLATILITY_WARN",
            RiskFlag::SuspiciousCode => "SUSPICIOUS_CODE",
            RiskFlag::OwnershipRisk => "OWNERSHIP_RISK",
            RiskFlag::Honeypot => "HONEYPOT_FAIL",
            RiskFlag::Impersonation => "IMPERSONATION_RISK",
            RiskFlag::WashTrading => "WASH_TRADING",
            RiskFlag::SuspiciousDeployer => "SUSPICIOUS_DEPLOYER",
            RiskFlag::Phishing => "PHISHING_SCAM",
            RiskFlag::AiAnomaly => "AI_ANOMALY",
        }
    }
}

/// Union of risk flags. Merging is bitwise OR and never clears a bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskMask(u32);

impl RiskMask {
    pub const EMPTY: RiskMask = RiskMask(0);
    pub const KNOWN_BITS: u32 = 1023;

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, flag: RiskFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: RiskFlag) {
        self.0 |= flag.bit();
    }

    /// Checked construction from a raw integer; rejects bits outside the
    /// enumeration.
    pub fn from_bits(bits: u32) -> Option<Self> {
        (bits & !Self::KNOWN_BITS == 0).then_some(RiskMask(bits))
    }

    /// Folds a classifier's flag list into one mask. Returns the first value
    /// that is not RiskFlag-compatible.
    pub fn fold_raw(values: &[u64]) -> Result<Self, u64> {
        values.iter().try_fold(RiskMask::EMPTY, |acc, &raw| {
            u32::try_from(raw)
                .ok()
                .and_then(RiskMask::from_bits)
                .map(|mask| acc | mask)
                .ok_or(raw)
        })
    }

    pub fn flags(self) -> impl Iterator<Item = RiskFlag> {
        RiskFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    pub fn labels(self) -> Vec<String> {
        self.flags().map(|f| f.label().to_string()).collect()
    }
}

impl From<RiskFlag> for RiskMask {
    fn from(flag: RiskFlag) -> Self {
        RiskMask(flag.bit())
    }
}

impl BitOr for RiskMask {
    type Output = RiskMask;

    fn bitor(self, rhs: RiskMask) -> RiskMask {
        RiskMask(self.0 | rhs.0)
    }
}

impl BitOr<RiskFlag> for RiskMask {
    type Output = RiskMask;

    fn bitor(self, rhs: RiskFlag) -> RiskMask {
        RiskMask(self.0 | rhs.bit())
    }
}

impl BitOrAssign for RiskMask {
    fn bitor_assign(&mut self, rhs: RiskMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for RiskMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0 (CLEAN)");
        }
        write!(f, "{} ({})", self.0, self.labels().join(", "))
    }
}
