//! Well-known Base network addresses

use alloy::primitives::{Address, address};

// Base mainnet blue chips
pub const WETH_MAINNET: Address = address!("4200000000000000000000000000000000000006");
pub const USDC_MAINNET: Address = address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
pub const USDBC_MAINNET: Address = address!("d9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA");
pub const AERO_MAINNET: Address = address!("940181a94A35A4569E4529A3CDfB74e38FD98631");
pub const CBETH_MAINNET: Address = address!("2Ae3F1Ec7F1F5012CFEab0185bfc7aa3cf0DEc22");
pub const DAI_MAINNET: Address = address!("50c5725949A6F0c72E6C4a641F24049A917DB0Cb");

pub const DEFAULT_TRUST_LIST: &[Address] = &[
    WETH_MAINNET,
    USDC_MAINNET,
    USDBC_MAINNET,
    AERO_MAINNET,
    CBETH_MAINNET,
    DAI_MAINNET,
];

// Owners that count as renounced
pub const BURN_ADDRESS: Address = address!("000000000000000000000000000000000000dEaD");

pub fn is_renounced_owner(owner: &Address) -> bool {
    owner.is_zero() || *owner == BURN_ADDRESS
}
