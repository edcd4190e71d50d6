//! Curve Parameters
//!
//! Inputs for building a Dynamic Bonding Curve configuration. The curve itself is
//! computed by the bonding curve service; this crate only assembles and checks
//! the parameter set it is given.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveParamsError {
    #[error("total token supply must be > 0")]
    ZeroSupply,
    #[error("{field} must be 0-100, got {value}")]
    PercentageOutOfRange { field: &'static str, value: u8 },
    #[error("LP percentages must sum to 100, got {0}")]
    LpSplit(u16),
    #[error("{field} must be <= 10000 bps, got {value}")]
    FeeOutOfRange { field: &'static str, value: u16 },
    #[error("migration quote threshold must be > 0")]
    ZeroMigrationThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MigrationOption {
    MetDamm,
    MetDammV2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseFeeMode {
    FeeSchedulerLinear,
    FeeSchedulerExponential,
    RateLimiter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivationType {
    Slot,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectFeeMode {
    QuoteToken,
    OutputToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MigrationFeeOption {
    FixedBps25,
    FixedBps30,
    FixedBps100,
    FixedBps200,
    FixedBps400,
    FixedBps600,
    Customizable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Spl,
    Token2022,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenUpdateAuthority {
    CreatorUpdateAuthority,
    Immutable,
    PartnerUpdateAuthority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedVesting {
    pub total_locked_vesting_amount: u64,
    pub number_of_vesting_period: u64,
    pub cliff_unlock_amount: u64,
    pub total_vesting_duration: u64,
    pub cliff_duration_from_migration_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseFee {
    pub base_fee_mode: BaseFeeMode,
    pub starting_fee_bps: u16,
    pub ending_fee_bps: u16,
    pub number_of_period: u32,
    pub total_duration: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationFee {
    pub fee_percentage: u8,
    pub creator_fee_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedPoolFee {
    pub collect_fee_mode: CollectFeeMode,
    pub dynamic_fee: bool,
    pub pool_fee_bps: u16,
}

/// Full parameter set for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveParams {
    pub total_token_supply: u64,
    pub percentage_supply_on_migration: u8,
    /// Quote amount (whole SOL) at which the pool migrates
    pub migration_quote_threshold: u64,
    pub migration_option: MigrationOption,
    pub token_base_decimal: u8,
    pub token_quote_decimal: u8,
    pub locked_vesting_param: LockedVesting,
    pub base_fee_params: BaseFee,
    pub dynamic_fee_enabled: bool,
    pub activation_type: ActivationType,
    pub collect_fee_mode: CollectFeeMode,
    pub migration_fee_option: MigrationFeeOption,
    pub token_type: TokenType,
    pub partner_lp_percentage: u8,
    pub creator_lp_percentage: u8,
    pub partner_locked_lp_percentage: u8,
    pub creator_locked_lp_percentage: u8,
    pub creator_trading_fee_percentage: u8,
    pub leftover: u64,
    pub token_update_authority: TokenUpdateAuthority,
    pub migration_fee: MigrationFee,
    pub migrated_pool_fee: MigratedPoolFee,
}

impl CurveParams {
    /// Defaults used by the launchpad for a given supply
    pub fn launchpad_defaults(total_token_supply: u64) -> Self {
        Self {
            total_token_supply,
            percentage_supply_on_migration: 10,
            migration_quote_threshold: 300,
            migration_option: MigrationOption::MetDammV2,
            token_base_decimal: 6,
            token_quote_decimal: 9,
            locked_vesting_param: LockedVesting::default(),
            base_fee_params: BaseFee {
                base_fee_mode: BaseFeeMode::FeeSchedulerLinear,
                starting_fee_bps: 100,
                ending_fee_bps: 100,
                number_of_period: 0,
                total_duration: 0,
            },
            dynamic_fee_enabled: true,
            activation_type: ActivationType::Slot,
            collect_fee_mode: CollectFeeMode::QuoteToken,
            migration_fee_option: MigrationFeeOption::Customizable,
            token_type: TokenType::Spl,
            partner_lp_percentage: 0,
            creator_lp_percentage: 0,
            partner_locked_lp_percentage: 100,
            creator_locked_lp_percentage: 0,
            creator_trading_fee_percentage: 0,
            leftover: 0,
            token_update_authority: TokenUpdateAuthority::Immutable,
            migration_fee: MigrationFee::default(),
            migrated_pool_fee: MigratedPoolFee {
                collect_fee_mode: CollectFeeMode::QuoteToken,
                dynamic_fee: true,
                pool_fee_bps: 250,
            },
        }
    }

    pub fn validate(&self) -> Result<(), CurveParamsError> {
        if self.total_token_supply == 0 {
            return Err(CurveParamsError::ZeroSupply);
        }
        if self.migration_quote_threshold == 0 {
            return Err(CurveParamsError::ZeroMigrationThreshold);
        }

        let percentages = [
            ("percentage_supply_on_migration", self.percentage_supply_on_migration),
            ("creator_trading_fee_percentage", self.creator_trading_fee_percentage),
            ("migration_fee.fee_percentage", self.migration_fee.fee_percentage),
            ("migration_fee.creator_fee_percentage", self.migration_fee.creator_fee_percentage),
        ];
        for (field, value) in percentages {
            if value > 100 {
                return Err(CurveParamsError::PercentageOutOfRange { field, value });
            }
        }

        let lp_total = self.partner_lp_percentage as u16
            + self.creator_lp_percentage as u16
            + self.partner_locked_lp_percentage as u16
            + self.creator_locked_lp_percentage as u16;
        if lp_total != 100 {
            return Err(CurveParamsError::LpSplit(lp_total));
        }

        let fees = [
            ("starting_fee_bps", self.base_fee_params.starting_fee_bps),
            ("ending_fee_bps", self.base_fee_params.ending_fee_bps),
            ("pool_fee_bps", self.migrated_pool_fee.pool_fee_bps),
        ];
        for (field, value) in fees {
            if value > 10_000 {
                return Err(CurveParamsError::FeeOutOfRange { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = CurveParams::launchpad_defaults(1_000_000_000);
        assert!(params.validate().is_ok());
        assert_eq!(params.partner_locked_lp_percentage, 100);
        assert_eq!(params.migrated_pool_fee.pool_fee_bps, 250);
    }

    #[test]
    fn test_zero_supply_rejected() {
        let params = CurveParams::launchpad_defaults(0);
        assert_eq!(params.validate(), Err(CurveParamsError::ZeroSupply));
    }

    #[test]
    fn test_lp_split_must_total_100() {
        let mut params = CurveParams::launchpad_defaults(1_000);
        params.creator_lp_percentage = 20;
        assert_eq!(params.validate(), Err(CurveParamsError::LpSplit(120)));
    }

    #[test]
    fn test_fee_bounds() {
        let mut params = CurveParams::launchpad_defaults(1_000);
        params.base_fee_params.starting_fee_bps = 12_000;
        assert!(matches!(
            params.validate(),
            Err(CurveParamsError::FeeOutOfRange { field: "starting_fee_bps", .. })
        ));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(CurveParams::launchpad_defaults(1_000)).unwrap();
        assert_eq!(json["migrationOption"], "metDammV2");
        assert_eq!(json["baseFeeParams"]["baseFeeMode"], "feeSchedulerLinear");
        assert_eq!(json["tokenUpdateAuthority"], "immutable");
        assert_eq!(json["totalTokenSupply"], 1_000);
    }
}
