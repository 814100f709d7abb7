//! Key pair generation
//!
//! Random 12-word BIP-39 mnemonic, first account at m/44'/60'/0'/0/0.

use alloy_signer_local::coins_bip39::{English, Mnemonic};
use alloy_signer_local::{MnemonicBuilder, PrivateKeySigner};

use super::WalletError;

/// Freshly generated wallet material
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// EIP-55 checksummed address
    pub address: String,
    /// 0x-prefixed hex private key
    pub private_key: String,
    pub mnemonic: String,
}

pub fn generate_key_pair() -> Result<KeyPair, WalletError> {
    let mut rng = rand::thread_rng();
    let phrase = Mnemonic::<English>::new(&mut rng).to_phrase();

    let signer = signer_from_phrase(&phrase)?;
    let key_bytes = signer.credential().to_bytes();

    Ok(KeyPair {
        address: signer.address().to_checksum(None),
        private_key: format!("0x{}", hex::encode(key_bytes)),
        mnemonic: phrase,
    })
}

/// Signer for the first account of `phrase`
pub fn signer_from_phrase(phrase: &str) -> Result<PrivateKeySigner, WalletError> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .build()
        .map_err(|e| WalletError::KeyGeneration(e.to_string()))
}
