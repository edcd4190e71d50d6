//! Pool Query Adapter
//!
//! Lists the pools registered under one configuration and joins each with its
//! token metadata. Failures never escape: enumeration errors become a failed
//! listing, metadata errors become sentinel values on the affected record.

use std::sync::Arc;

use crate::domain::{token::parse_pubkey, PoolListing, PoolRecord, ValidationError};
use crate::ports::{BondingCurvePort, MetadataPort};

/// Client-facing error for a failed enumeration; details stay in the log
pub const FETCH_POOLS_FAILED: &str = "Failed to fetch pools";

pub struct PoolQueryAdapter {
    curve: Arc<dyn BondingCurvePort>,
    metadata: Arc<dyn MetadataPort>,
}

impl PoolQueryAdapter {
    pub fn new(curve: Arc<dyn BondingCurvePort>, metadata: Arc<dyn MetadataPort>) -> Self {
        Self { curve, metadata }
    }

    /// List pools under `config`.
    ///
    /// A missing or malformed config is returned as `Err` so the caller can
    /// answer with a client error; everything else is reported in the listing.
    pub async fn list_pools(&self, config: Option<&str>) -> Result<PoolListing, ValidationError> {
        let raw = config
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(ValidationError::MissingField("config"))?;
        let config_key = parse_pubkey("config", raw)?;

        let accounts = match self.curve.get_pools_by_config(&config_key).await {
            Ok(accounts) => accounts,
            Err(e) => {
                tracing::error!("Pool enumeration failed for config {}: {}", raw, e);
                return Ok(PoolListing::failed(Some(raw.to_string()), FETCH_POOLS_FAILED));
            }
        };

        tracing::debug!("Found {} pools under config {}", accounts.len(), raw);

        let mut records = Vec::with_capacity(accounts.len());
        for (index, account) in accounts.iter().enumerate() {
            let metadata = match self.metadata.find_by_asset(&account.base_mint).await {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    tracing::warn!(
                        "Metadata lookup failed for mint {} (pool {}): {}",
                        account.base_mint,
                        account.address,
                        e
                    );
                    None
                }
            };
            records.push(PoolRecord::from_account(index, raw, account, metadata.as_ref()));
        }

        Ok(PoolListing::found(raw, records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetMetadata, PoolAccount, UNKNOWN_NAME, UNKNOWN_SYMBOL};
    use crate::ports::metadata::MockMetadataPort;
    use crate::ports::mocks::{MockCurveService, MockMetadata};
    use crate::ports::MetadataError;
    use solana_sdk::pubkey::Pubkey;

    fn pool(config: Pubkey, base_reserve: u64) -> PoolAccount {
        PoolAccount {
            address: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            config,
            base_reserve,
            quote_reserve: 0,
            is_migrated: false,
        }
    }

    #[tokio::test]
    async fn test_missing_config_is_validation_error() {
        let adapter = PoolQueryAdapter::new(Arc::new(MockCurveService::new()), Arc::new(MockMetadata::new()));
        assert_eq!(
            adapter.list_pools(None).await.unwrap_err(),
            ValidationError::MissingField("config")
        );
        assert_eq!(
            adapter.list_pools(Some("  ")).await.unwrap_err(),
            ValidationError::MissingField("config")
        );
        assert!(matches!(
            adapter.list_pools(Some("not-a-key")).await,
            Err(ValidationError::InvalidField { field: "config", .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_config_lists_nothing() {
        let adapter = PoolQueryAdapter::new(Arc::new(MockCurveService::new()), Arc::new(MockMetadata::new()));
        let config = Pubkey::new_unique().to_string();

        let listing = adapter.list_pools(Some(&config)).await.unwrap();
        assert!(listing.success);
        assert_eq!(listing.total_pools, 0);
        assert!(listing.pools.is_empty());
        assert_eq!(listing.config.as_deref(), Some(config.as_str()));
    }

    #[tokio::test]
    async fn test_one_metadata_failure_degrades_one_record() {
        let config = Pubkey::new_unique();
        let pools = vec![pool(config, 1_000_000_000), pool(config, 0), pool(config, 2_500_000_000)];
        let curve = MockCurveService::new().with_pools(config, pools.clone());
        let metadata = MockMetadata::new()
            .with_metadata(pools[0].base_mint, AssetMetadata::new("One", "ONE", "u1"))
            .failing_for(pools[1].base_mint)
            .with_metadata(pools[2].base_mint, AssetMetadata::new("Three", "THR", "u3"));
        let adapter = PoolQueryAdapter::new(Arc::new(curve), Arc::new(metadata.clone()));

        let listing = adapter.list_pools(Some(&config.to_string())).await.unwrap();
        assert!(listing.success);
        assert_eq!(listing.total_pools, 3);
        assert!(listing.is_consistent());

        assert_eq!(listing.pools[0].name, "One");
        assert_eq!(listing.pools[0].base_supply, "1");
        assert_eq!(listing.pools[1].name, UNKNOWN_NAME);
        assert_eq!(listing.pools[1].symbol, UNKNOWN_SYMBOL);
        assert_eq!(listing.pools[1].uri, "");
        assert_eq!(listing.pools[2].symbol, "THR");
        assert_eq!(listing.pools[2].base_supply, "2.5");

        let indices: Vec<usize> = listing.pools.iter().map(|p| p.pool_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(metadata.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_enumeration_failure_gives_zeroed_listing() {
        let adapter = PoolQueryAdapter::new(
            Arc::new(MockCurveService::new().failing_enumeration()),
            Arc::new(MockMetadata::new()),
        );
        let listing = adapter
            .list_pools(Some(&Pubkey::new_unique().to_string()))
            .await
            .unwrap();
        assert!(!listing.success);
        assert_eq!(listing.total_pools, 0);
        assert!(listing.pools.is_empty());
        assert_eq!(listing.error.as_deref(), Some(FETCH_POOLS_FAILED));
        assert!(!listing.error.as_deref().unwrap().contains("getProgramAccounts"));
    }

    #[tokio::test]
    async fn test_empty_metadata_fields_use_sentinels() {
        let config = Pubkey::new_unique();
        let curve = MockCurveService::new().with_pools(config, vec![pool(config, 0)]);
        let mut metadata = MockMetadataPort::new();
        metadata
            .expect_find_by_asset()
            .times(1)
            .returning(|_| Ok(AssetMetadata::new("", "", "https://example.com/x.json")));

        let adapter = PoolQueryAdapter::new(Arc::new(curve), Arc::new(metadata));
        let listing = adapter.list_pools(Some(&config.to_string())).await.unwrap();
        assert_eq!(listing.pools[0].name, UNKNOWN_NAME);
        assert_eq!(listing.pools[0].symbol, UNKNOWN_SYMBOL);
        assert_eq!(listing.pools[0].uri, "https://example.com/x.json");
    }

    #[tokio::test]
    async fn test_metadata_not_found_is_not_fatal() {
        let config = Pubkey::new_unique();
        let curve = MockCurveService::new().with_pools(config, vec![pool(config, 0), pool(config, 0)]);
        let mut metadata = MockMetadataPort::new();
        metadata
            .expect_find_by_asset()
            .returning(|mint| Err(MetadataError::NotFound(mint.to_string())));

        let adapter = PoolQueryAdapter::new(Arc::new(curve), Arc::new(metadata));
        let listing = adapter.list_pools(Some(&config.to_string())).await.unwrap();
        assert_eq!(listing.total_pools, 2);
        assert!(listing.pools.iter().all(|p| p.is_unresolved()));
    }
}
