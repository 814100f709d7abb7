//! Local wallets
//!
//! Responsible for:
//! - Generating key pairs with mnemonics
//! - Persisting them by name in a JSON document

mod keys;
mod store;

pub use keys::{generate_key_pair, signer_from_phrase, KeyPair};
pub use store::{NewWallet, WalletRecord, WalletStore, WalletSummary};

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet \"{0}\" not found")]
    NotFound(String),

    #[error("wallet \"{0}\" already exists")]
    AlreadyExists(String),

    #[error("invalid wallet name: {0}")]
    InvalidName(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}
