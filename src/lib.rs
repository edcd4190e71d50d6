//! dbc-launchpad - Meteora Dynamic Bonding Curve launchpad library
//!
//! Create tokens on bonding-curve pools and browse the pools under a configuration.
//!
//! # Modules
//!
//! - `domain`: Core types (TokenForm, PoolRecord, TransactionEnvelope, CurveParams)
//! - `ports`: Trait abstractions (LedgerPort, BondingCurvePort, MetadataPort)
//! - `adapters`: External implementations (Solana, curve service, metadata, HTTP, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Orchestrator, pool query, config builder, launchpad session

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
