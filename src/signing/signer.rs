//! Verdict signing and independent verification

use alloy::{
    primitives::{Address, B256, PrimitiveSignature, hex},
    signers::{SignerSync, local::PrivateKeySigner},
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use crate::{
    errors::{OracleError, OracleResult},
    signing::VerdictMessage,
};

/// Key material able to produce an EIP-191 signature over a 32-byte digest.
pub trait SigningKey: Send + Sync {
    fn address(&self) -> Address;

    fn sign_digest(&self, digest: &B256) -> OracleResult<Vec<u8>>;
}

pub struct LocalSigningKey {
    signer: PrivateKeySigner,
}

impl LocalSigningKey {
    pub fn from_hex(private_key: &str) -> OracleResult<Self> {
        let signer = PrivateKeySigner::from_str(private_key.trim()).map_err(|e| OracleError::Configuration {
            message: format!("invalid signer private key: {}", e),
        })?;
        Ok(Self { signer })
    }
}

impl SigningKey for LocalSigningKey {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn sign_digest(&self, digest: &B256) -> OracleResult<Vec<u8>> {
        let signature = self
            .signer
            .sign_message_sync(digest.as_slice())
            .map_err(|e| OracleError::Signing {
                message: "EIP-191 signing failed".to_string(),
                source: e.into(),
            })?;
        Ok(signature.as_bytes().to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedVerdict {
    pub message_hash: B256,
    /// 0x-prefixed 65-byte r ‖ s ‖ v
    pub signature: String,
    pub signer: Address,
}

#[derive(Clone)]
pub struct VerdictSigner {
    key: Arc<dyn SigningKey>,
}

impl VerdictSigner {
    pub fn new(key: Arc<dyn SigningKey>) -> Self {
        Self { key }
    }

    pub fn from_private_key(private_key: &str) -> OracleResult<Self> {
        let key = LocalSigningKey::from_hex(private_key)?;
        info!("🔐 Verdict signer loaded: {}", key.address());
        Ok(Self::new(Arc::new(key)))
    }

    pub fn address(&self) -> Address {
        self.key.address()
    }

    pub fn sign(&self, message: &VerdictMessage) -> OracleResult<SignedVerdict> {
        let message_hash = message.digest();
        let signature = self.key.sign_digest(&message_hash)?;
        Ok(SignedVerdict {
            message_hash,
            signature: hex::encode_prefixed(signature),
            signer: self.key.address(),
        })
    }
}

/// Recovers the address that signed `digest` as an EIP-191 personal message.
pub fn recover_signer(digest: &B256, signature: &str) -> OracleResult<Address> {
    let bytes = hex::decode(signature.trim()).map_err(|e| OracleError::DataParsing {
        context: "signature hex".to_string(),
        source: e.into(),
    })?;
    let signature = PrimitiveSignature::from_raw(&bytes).map_err(|e| OracleError::DataParsing {
        context: "signature bytes".to_string(),
        source: e.into(),
    })?;
    signature
        .recover_address_from_msg(digest.as_slice())
        .map_err(|e| OracleError::DataParsing {
            context: "signer recovery".to_string(),
            source: e.into(),
        })
}
