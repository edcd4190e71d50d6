//! Token Metadata Types
//!
//! RPC envelopes for `getAccountInfo` with base64 encoding, and the decoder for
//! Metaplex metadata accounts.

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::domain::AssetMetadata;

/// Metaplex Token Metadata program
pub const METADATA_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

/// Account discriminator of a v1 metadata account
const KEY_METADATA_V1: u8 = 4;

/// key + update authority + mint
const HEADER_LEN: usize = 1 + 32 + 32;

/// Metadata account address for a mint
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    let (address, _bump) = Pubkey::find_program_address(
        &[b"metadata", METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    );
    address
}

/// Solana RPC response for getAccountInfo
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    pub jsonrpc: String,
    pub id: u64,
    pub result: Option<AccountInfoResult>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResult {
    pub value: Option<AccountInfoValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoValue {
    /// `[data, encoding]`
    pub data: (String, String),
    pub owner: String,
    pub lamports: u64,
}

/// Decode the descriptive fields of a metadata account.
///
/// Strings are stored as u32 little-endian length prefixes followed by
/// NUL-padded bytes.
pub fn decode_metadata(data: &[u8]) -> Result<AssetMetadata, String> {
    match data.first() {
        Some(&KEY_METADATA_V1) => {}
        Some(other) => return Err(format!("unexpected account key {}", other)),
        None => return Err("empty account data".into()),
    }

    let mut cursor = HEADER_LEN;
    let name = read_string(data, &mut cursor, "name")?;
    let symbol = read_string(data, &mut cursor, "symbol")?;
    let uri = read_string(data, &mut cursor, "uri")?;

    Ok(AssetMetadata::new(name, symbol, uri))
}

fn read_string(data: &[u8], cursor: &mut usize, field: &str) -> Result<String, String> {
    let len_bytes: [u8; 4] = data
        .get(*cursor..*cursor + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| format!("truncated before {} length", field))?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    *cursor += 4;

    let raw = data
        .get(*cursor..*cursor + len)
        .ok_or_else(|| format!("truncated {} ({} bytes declared)", field, len))?;
    *cursor += len;

    let text = std::str::from_utf8(raw).map_err(|e| format!("{} is not utf-8: {}", field, e))?;
    Ok(text.trim_end_matches('\0').trim().to_string())
}

#[cfg(test)]
pub(crate) fn encode_metadata(name: &str, symbol: &str, uri: &str) -> Vec<u8> {
    let mut data = vec![KEY_METADATA_V1];
    data.extend_from_slice(Pubkey::new_unique().as_ref());
    data.extend_from_slice(Pubkey::new_unique().as_ref());
    for (value, padded) in [(name, 32usize), (symbol, 10), (uri, 200)] {
        let mut bytes = value.as_bytes().to_vec();
        bytes.resize(padded.max(bytes.len()), 0);
        data.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        data.extend_from_slice(&bytes);
    }
    // seller fee bps and trailing fields are ignored
    data.extend_from_slice(&[0u8; 8]);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_trims_padding() {
        let data = encode_metadata("Doge Two", "DOGE2", "https://example.com/doge.json");
        let meta = decode_metadata(&data).unwrap();
        assert_eq!(meta.name, "Doge Two");
        assert_eq!(meta.symbol, "DOGE2");
        assert_eq!(meta.uri, "https://example.com/doge.json");
    }

    #[test]
    fn test_decode_rejects_wrong_key() {
        let mut data = encode_metadata("A", "B", "C");
        data[0] = 1;
        assert!(decode_metadata(&data).unwrap_err().contains("unexpected account key"));
    }

    #[test]
    fn test_decode_rejects_truncated() {
        let data = encode_metadata("Name", "SYM", "uri");
        let err = decode_metadata(&data[..HEADER_LEN + 10]).unwrap_err();
        assert!(err.contains("name"));
    }

    #[test]
    fn test_metadata_address_is_deterministic() {
        let mint = Pubkey::new_unique();
        assert_eq!(metadata_address(&mint), metadata_address(&mint));
        assert_ne!(metadata_address(&mint), metadata_address(&Pubkey::new_unique()));
    }

    #[test]
    fn test_parse_rpc_envelope() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":{"data":["BA==","base64"],"owner":"metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s","lamports":5616720,"executable":false,"rentEpoch":0}}}"#;
        let response: AccountInfoResponse = serde_json::from_str(json).unwrap();
        let value = response.result.unwrap().value.unwrap();
        assert_eq!(value.data.1, "base64");
        assert_eq!(value.owner, METADATA_PROGRAM_ID.to_string());
    }
}
