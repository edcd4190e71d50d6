//! Transaction Envelope
//!
//! A ledger transaction on its way to the user's wallet: fee payer pinned to the
//! caller, blockhash stamped, server-held keys partially signed, and encoded as
//! standard base64 for transport.

use base64::Engine;
use solana_sdk::{
    hash::Hash,
    instruction::{AccountMeta, Instruction},
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("Transaction message references account index {0} it does not hold")]
    MalformedMessage(usize),

    #[error("Signing failed: {0}")]
    SigningError(String),

    #[error("Failed to encode transaction: {0}")]
    EncodeError(String),

    #[error("Failed to decode transaction: {0}")]
    DecodeError(String),
}

/// Partially signed transaction awaiting the remaining signatures
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEnvelope {
    transaction: Transaction,
}

impl TransactionEnvelope {
    /// Wrap a transaction without checks
    pub fn new(transaction: Transaction) -> Self {
        Self { transaction }
    }

    /// Wrap a transaction and make `fee_payer` the paying account
    pub fn for_fee_payer(transaction: Transaction, fee_payer: &Pubkey) -> Result<Self, EnvelopeError> {
        let mut envelope = Self::new(transaction);
        envelope.set_fee_payer(fee_payer)?;
        Ok(envelope)
    }

    /// Recompile the message with `payer` as the fee payer.
    ///
    /// All signatures are cleared when the payer changes. Accounts the
    /// instructions no longer reference (such as a previous payer) drop out.
    pub fn set_fee_payer(&mut self, payer: &Pubkey) -> Result<(), EnvelopeError> {
        if self.fee_payer() == Some(payer) {
            return Ok(());
        }

        let message = &self.transaction.message;
        let blockhash = message.recent_blockhash;
        let instructions = decompile(message)?;

        let mut rebuilt = Message::new(&instructions, Some(payer));
        rebuilt.recent_blockhash = blockhash;
        self.transaction = Transaction::new_unsigned(rebuilt);
        Ok(())
    }

    /// The account paying fees (first account key)
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.transaction.message.account_keys.first()
    }

    pub fn recent_blockhash(&self) -> Hash {
        self.transaction.message.recent_blockhash
    }

    /// Set the recent blockhash. Existing signatures become invalid.
    pub fn stamp_blockhash(&mut self, blockhash: Hash) {
        if self.transaction.message.recent_blockhash != blockhash {
            self.transaction.message.recent_blockhash = blockhash;
            for sig in self.transaction.signatures.iter_mut() {
                *sig = Signature::default();
            }
        }
    }

    /// Add signatures for the given keypairs, leaving other slots untouched
    pub fn partial_sign(&mut self, signers: &[&Keypair]) -> Result<(), EnvelopeError> {
        let blockhash = self.transaction.message.recent_blockhash;
        self.transaction
            .try_partial_sign(signers, blockhash)
            .map_err(|e| EnvelopeError::SigningError(e.to_string()))
    }

    /// Required signers that have not signed yet
    pub fn missing_signers(&self) -> Vec<Pubkey> {
        let required = self.transaction.message.header.num_required_signatures as usize;
        self.transaction
            .message
            .account_keys
            .iter()
            .take(required)
            .zip(self.transaction.signatures.iter())
            .filter(|(_, sig)| **sig == Signature::default())
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn is_fully_signed(&self) -> bool {
        self.missing_signers().is_empty()
    }

    /// First signature (the transaction id once the fee payer has signed)
    pub fn signature(&self) -> Option<&Signature> {
        self.transaction.signatures.first()
    }

    /// Wire bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, EnvelopeError> {
        bincode::serialize(&self.transaction).map_err(|e| EnvelopeError::EncodeError(e.to_string()))
    }

    /// Base64 wire bytes, as handed to the browser wallet
    pub fn to_base64(&self) -> Result<String, EnvelopeError> {
        Ok(base64::engine::general_purpose::STANDARD.encode(self.to_bytes()?))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        bincode::deserialize::<Transaction>(bytes)
            .map(Self::new)
            .map_err(|e| EnvelopeError::DecodeError(e.to_string()))
    }

    pub fn from_base64(encoded: &str) -> Result<Self, EnvelopeError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| EnvelopeError::DecodeError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }
}

/// Rebuild instructions from a legacy message, keeping each account's
/// signer and writable flags as the header declares them.
fn decompile(message: &Message) -> Result<Vec<Instruction>, EnvelopeError> {
    let keys = &message.account_keys;
    let header = &message.header;
    let signed = header.num_required_signatures as usize;
    let writable_signed = signed.saturating_sub(header.num_readonly_signed_accounts as usize);
    let writable_unsigned = keys
        .len()
        .saturating_sub(header.num_readonly_unsigned_accounts as usize);

    let key_at = |index: usize| keys.get(index).copied().ok_or(EnvelopeError::MalformedMessage(index));

    message
        .instructions
        .iter()
        .map(|ix| {
            let program_id = key_at(ix.program_id_index as usize)?;
            let accounts = ix
                .accounts
                .iter()
                .map(|&index| {
                    let index = index as usize;
                    let pubkey = key_at(index)?;
                    let is_signer = index < signed;
                    let is_writable = if is_signer {
                        index < writable_signed
                    } else {
                        index < writable_unsigned
                    };
                    Ok(AccountMeta {
                        pubkey,
                        is_signer,
                        is_writable,
                    })
                })
                .collect::<Result<Vec<_>, EnvelopeError>>()?;
            Ok(Instruction {
                program_id,
                accounts,
                data: ix.data.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{signer::Signer, system_instruction};

    /// Transaction that needs both the payer and a new account to sign
    fn create_account_tx(payer: &Pubkey, new_account: &Pubkey) -> Transaction {
        let ix = system_instruction::create_account(payer, new_account, 1_461_600, 82, &spl_token::id());
        Transaction::new_with_payer(&[ix], Some(payer))
    }

    #[test]
    fn test_fee_payer_already_set_keeps_signatures() {
        let payer = Pubkey::new_unique();
        let mint = Keypair::new();
        let mut envelope = TransactionEnvelope::new(create_account_tx(&payer, &mint.pubkey()));
        envelope.stamp_blockhash(Hash::new_unique());
        envelope.partial_sign(&[&mint]).unwrap();

        envelope.set_fee_payer(&payer).unwrap();
        assert_eq!(envelope.fee_payer(), Some(&payer));
        assert_eq!(envelope.missing_signers(), vec![payer]);
    }

    #[test]
    fn test_fee_payer_replaced_for_third_party_payer() {
        let service = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Keypair::new();
        // The instruction spends from the wallet; the service only pays fees
        let ix = system_instruction::create_account(&wallet, &mint.pubkey(), 1_461_600, 82, &spl_token::id());
        let blockhash = Hash::new_unique();
        let mut tx = Transaction::new_with_payer(&[ix], Some(&service));
        tx.message.recent_blockhash = blockhash;

        let mut envelope = TransactionEnvelope::for_fee_payer(tx, &wallet).unwrap();
        assert_eq!(envelope.fee_payer(), Some(&wallet));
        assert_eq!(envelope.recent_blockhash(), blockhash);
        assert!(!envelope.transaction().message.account_keys.contains(&service));
        assert_eq!(envelope.missing_signers(), vec![wallet, mint.pubkey()]);

        envelope.partial_sign(&[&mint]).unwrap();
        assert_eq!(envelope.missing_signers(), vec![wallet]);
    }

    #[test]
    fn test_fee_payer_change_keeps_account_flags() {
        let service = Pubkey::new_unique();
        let wallet = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let envelope =
            TransactionEnvelope::for_fee_payer(create_account_tx(&service, &mint), &wallet).unwrap();

        let message = &envelope.transaction().message;
        assert_eq!(message.account_keys[0], wallet);
        // Former payer is still the funding signer of create_account
        let service_index = message.account_keys.iter().position(|k| *k == service).unwrap();
        assert!(message.is_signer(service_index));
        assert_eq!(envelope.missing_signers().len(), 3);
        assert_eq!(message.instructions[0].data, create_account_tx(&service, &mint).message.instructions[0].data);
    }

    #[test]
    fn test_partial_sign_leaves_payer_slot() {
        let payer = Keypair::new();
        let mint = Keypair::new();
        let mut envelope = TransactionEnvelope::new(create_account_tx(&payer.pubkey(), &mint.pubkey()));
        envelope.stamp_blockhash(Hash::new_unique());

        envelope.partial_sign(&[&mint]).unwrap();
        assert!(!envelope.is_fully_signed());
        assert_eq!(envelope.missing_signers(), vec![payer.pubkey()]);

        envelope.partial_sign(&[&payer]).unwrap();
        assert!(envelope.is_fully_signed());
        assert!(envelope.transaction().verify().is_ok());
    }

    #[test]
    fn test_partial_sign_rejects_unrelated_key() {
        let payer = Pubkey::new_unique();
        let mint = Keypair::new();
        let stranger = Keypair::new();
        let mut envelope = TransactionEnvelope::new(create_account_tx(&payer, &mint.pubkey()));

        assert!(matches!(
            envelope.partial_sign(&[&stranger]),
            Err(EnvelopeError::SigningError(_))
        ));
    }

    #[test]
    fn test_restamp_clears_signatures() {
        let payer = Pubkey::new_unique();
        let mint = Keypair::new();
        let mut envelope = TransactionEnvelope::new(create_account_tx(&payer, &mint.pubkey()));
        envelope.stamp_blockhash(Hash::new_unique());
        envelope.partial_sign(&[&mint]).unwrap();
        assert_eq!(envelope.missing_signers().len(), 1);

        envelope.stamp_blockhash(Hash::new_unique());
        assert_eq!(envelope.missing_signers().len(), 2);
    }

    #[test]
    fn test_base64_transport_keeps_signatures() {
        let payer = Pubkey::new_unique();
        let mint = Keypair::new();
        let mut envelope = TransactionEnvelope::new(create_account_tx(&payer, &mint.pubkey()));
        envelope.stamp_blockhash(Hash::new_unique());
        envelope.partial_sign(&[&mint]).unwrap();

        let decoded = TransactionEnvelope::from_base64(&envelope.to_base64().unwrap()).unwrap();
        assert_eq!(decoded, envelope);
        assert_eq!(decoded.missing_signers(), vec![payer]);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            TransactionEnvelope::from_base64("!!not base64!!"),
            Err(EnvelopeError::DecodeError(_))
        ));
    }
}
