//! Signing keys for the launchpad
//!
//! The server wallet pays for and co-signs configurations; a connected user
//! wallet signs the pool envelope it receives from `/api`.

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{EnvelopeError, TransactionEnvelope};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Cannot read keypair file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unrecognised keypair encoding: {0}")]
    Encoding(String),
    #[error("Invalid keypair bytes: {0}")]
    InvalidKeypair(String),
    #[error("Wallet could not sign: {0}")]
    Signing(#[from] EnvelopeError),
}

/// A keypair able to sign launchpad envelopes
pub struct WalletManager {
    keypair: Keypair,
}

impl WalletManager {
    /// Load from a keypair file.
    ///
    /// Accepts the `solana-keygen` JSON byte array or a bare base58 secret
    /// (the browser-wallet export format).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WalletError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| WalletError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_secret(&contents)
    }

    /// Parse a secret held as a JSON byte array or base58 text
    pub fn parse_secret(secret: &str) -> Result<Self, WalletError> {
        let secret = secret.trim();
        let bytes: Vec<u8> = if secret.starts_with('[') {
            serde_json::from_str(secret).map_err(|e| WalletError::Encoding(e.to_string()))?
        } else {
            bs58::decode(secret)
                .into_vec()
                .map_err(|e| WalletError::Encoding(e.to_string()))?
        };
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        Keypair::try_from(bytes)
            .map(|keypair| Self { keypair })
            .map_err(|e| WalletError::InvalidKeypair(e.to_string()))
    }

    /// Fresh throwaway wallet
    pub fn new_random() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Base58 address, as sent in `walletAddress`
    pub fn public_key(&self) -> String {
        self.pubkey().to_string()
    }

    /// Add this wallet's signature to `envelope`, keeping existing signatures
    pub fn sign_envelope(&self, envelope: &mut TransactionEnvelope) -> Result<(), WalletError> {
        envelope.partial_sign(&[&self.keypair])?;
        Ok(())
    }

    /// Signer for envelopes that need this wallet alongside other keypairs
    pub fn signer(&self) -> &Keypair {
        &self.keypair
    }

    /// 64-byte secret in `solana-keygen` order
    pub fn secret_bytes(&self) -> Vec<u8> {
        self.keypair.to_bytes().to_vec()
    }
}

impl Clone for WalletManager {
    fn clone(&self) -> Self {
        Self {
            keypair: self.keypair.insecure_clone(),
        }
    }
}

// Never print the secret half.
impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WalletManager({})", self.pubkey())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{hash::Hash, system_instruction, transaction::Transaction};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn keypair_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_keygen_json_file() {
        let wallet = WalletManager::new_random();
        let file = keypair_file(&serde_json::to_string(&wallet.secret_bytes()).unwrap());

        let loaded = WalletManager::from_file(file.path()).unwrap();
        assert_eq!(loaded.pubkey(), wallet.pubkey());
    }

    #[test]
    fn test_base58_file_with_newline() {
        let wallet = WalletManager::new_random();
        let encoded = bs58::encode(wallet.secret_bytes()).into_string();
        let file = keypair_file(&format!("{}\n", encoded));

        let loaded = WalletManager::from_file(file.path()).unwrap();
        assert_eq!(loaded.public_key(), wallet.public_key());
    }

    #[test]
    fn test_missing_file() {
        let result = WalletManager::from_file("/nonexistent/launchpad-id.json");
        assert!(matches!(result, Err(WalletError::Unreadable { .. })));
    }

    #[test]
    fn test_bad_encodings() {
        assert!(matches!(
            WalletManager::parse_secret("[1, 2, oops]"),
            Err(WalletError::Encoding(_))
        ));
        assert!(matches!(
            WalletManager::parse_secret("0OIl"),
            Err(WalletError::Encoding(_))
        ));
        assert!(matches!(
            WalletManager::from_bytes(&[7u8; 10]),
            Err(WalletError::InvalidKeypair(_))
        ));
    }

    #[test]
    fn test_clone_keeps_identity() {
        let wallet = WalletManager::new_random();
        assert_eq!(wallet.clone().pubkey(), wallet.pubkey());
    }

    #[test]
    fn test_sign_envelope_as_fee_payer() {
        let wallet = WalletManager::new_random();
        let ix = system_instruction::transfer(&wallet.pubkey(), &Pubkey::new_unique(), 5_000);
        let mut envelope = TransactionEnvelope::new(Transaction::new_with_payer(&[ix], Some(&wallet.pubkey())));
        envelope.stamp_blockhash(Hash::new_unique());

        wallet.sign_envelope(&mut envelope).unwrap();
        assert!(envelope.is_fully_signed());
    }

    #[test]
    fn test_sign_envelope_not_a_signer() {
        let wallet = WalletManager::new_random();
        let payer = Pubkey::new_unique();
        let ix = system_instruction::transfer(&payer, &Pubkey::new_unique(), 5_000);
        let mut envelope = TransactionEnvelope::new(Transaction::new_with_payer(&[ix], Some(&payer)));

        let result = wallet.sign_envelope(&mut envelope);
        assert!(matches!(result, Err(WalletError::Signing(_))));
    }

    #[test]
    fn test_debug_shows_only_address() {
        let wallet = WalletManager::new_random();
        assert_eq!(format!("{:?}", wallet), format!("WalletManager({})", wallet.public_key()));
    }
}
