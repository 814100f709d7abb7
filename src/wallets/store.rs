//! Wallet persistence - flat JSON document, in-memory fallback
//!
//! Layout on disk: `{ "<name>": { address, privateKey, mnemonic, createdAt } }`.
//! If the file or its directory cannot be read or written, the store logs a
//! warning and keeps working from memory for the rest of the process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::keys::generate_key_pair;
use super::WalletError;

/// One stored wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    pub address: String,
    pub private_key: String,
    pub mnemonic: String,
    #[serde(default = "unknown_created_at")]
    pub created_at: String,
}

fn unknown_created_at() -> String {
    "Unknown".to_string()
}

/// Listing entry: never carries secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummary {
    pub name: String,
    pub address: String,
    pub created_at: String,
}

/// Returned once, on creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub address: String,
    pub private_key: String,
    pub mnemonic: String,
}

type Wallets = BTreeMap<String, WalletRecord>;

struct StoreState {
    memory: Wallets,
    using_memory: bool,
}

/// Named wallets backed by a JSON file
pub struct WalletStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl WalletStore {
    /// Store backed by `path`. Nothing is touched until the first operation.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Mutex::new(StoreState {
                memory: Wallets::new(),
                using_memory: false,
            }),
        }
    }

    /// Store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Mutex::new(StoreState {
                memory: Wallets::new(),
                using_memory: true,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn is_using_memory(&self) -> bool {
        self.state.lock().await.using_memory
    }

    /// All wallets, sorted by name
    pub async fn list(&self) -> Vec<WalletSummary> {
        let mut state = self.state.lock().await;
        self.load(&mut state)
            .await
            .into_iter()
            .map(|(name, record)| WalletSummary {
                name,
                address: record.address,
                created_at: record.created_at,
            })
            .collect()
    }

    pub async fn get(&self, name: &str) -> Result<WalletRecord, WalletError> {
        let mut state = self.state.lock().await;
        self.load(&mut state)
            .await
            .remove(name)
            .ok_or_else(|| WalletError::NotFound(name.to_string()))
    }

    /// Generate a fresh key pair and store it under `name`
    pub async fn create(&self, name: &str) -> Result<NewWallet, WalletError> {
        let name = validate_name(name)?;

        let mut state = self.state.lock().await;
        let mut wallets = self.load(&mut state).await;
        if wallets.contains_key(name) {
            return Err(WalletError::AlreadyExists(name.to_string()));
        }

        let key_pair = generate_key_pair()?;
        let created_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        wallets.insert(
            name.to_string(),
            WalletRecord {
                address: key_pair.address.clone(),
                private_key: key_pair.private_key.clone(),
                mnemonic: key_pair.mnemonic.clone(),
                created_at,
            },
        );
        self.save(&mut state, wallets).await;

        info!("Created new wallet \"{}\" with address {}", name, key_pair.address);

        Ok(NewWallet {
            address: key_pair.address,
            private_key: key_pair.private_key,
            mnemonic: key_pair.mnemonic,
        })
    }

    pub async fn delete(&self, name: &str) -> Result<(), WalletError> {
        let mut state = self.state.lock().await;
        let mut wallets = self.load(&mut state).await;

        if wallets.remove(name).is_none() {
            return Err(WalletError::NotFound(name.to_string()));
        }
        self.save(&mut state, wallets).await;

        info!("Deleted wallet \"{}\"", name);
        Ok(())
    }

    async fn load(&self, state: &mut StoreState) -> Wallets {
        if state.using_memory {
            return state.memory.clone();
        }

        match self.read_file().await {
            Ok(wallets) => wallets,
            Err(e) => {
                warn!("Using in-memory wallet storage, file system operation failed: {}", e);
                state.using_memory = true;
                state.memory.clone()
            }
        }
    }

    async fn save(&self, state: &mut StoreState, wallets: Wallets) {
        if state.using_memory {
            state.memory = wallets;
            return;
        }

        if let Err(e) = self.write_file(&wallets).await {
            warn!("Using in-memory wallet storage, file system operation failed: {}", e);
            state.using_memory = true;
            state.memory = wallets;
        }
    }

    async fn read_file(&self) -> Result<Wallets, String> {
        self.ensure_directory().await?;

        if fs::metadata(&self.path).await.is_err() {
            fs::write(&self.path, "{}")
                .await
                .map_err(|e| format!("create {}: {}", self.path.display(), e))?;
            debug!("Initialized empty wallet file at {}", self.path.display());
            return Ok(Wallets::new());
        }

        let data = fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("read {}: {}", self.path.display(), e))?;
        serde_json::from_str(&data).map_err(|e| format!("parse {}: {}", self.path.display(), e))
    }

    async fn write_file(&self, wallets: &Wallets) -> Result<(), String> {
        self.ensure_directory().await?;

        let json = serde_json::to_string_pretty(wallets).map_err(|e| e.to_string())?;
        fs::write(&self.path, json)
            .await
            .map_err(|e| format!("write {}: {}", self.path.display(), e))
    }

    async fn ensure_directory(&self) -> Result<(), String> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| format!("create {}: {}", dir.display(), e)),
            _ => Ok(()),
        }
    }
}

fn validate_name(name: &str) -> Result<&str, WalletError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WalletError::InvalidName("wallet name is required".to_string()));
    }
    if name.chars().any(|c| c == '/' || c.is_control()) {
        return Err(WalletError::InvalidName(format!("{:?} contains invalid characters", name)));
    }
    Ok(name)
}
