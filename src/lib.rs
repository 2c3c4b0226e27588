//! asset_amount - exact multi-asset monetary amounts
//!
//! Fixed-point amounts for assets of any precision (BTC = 8 digits,
//! USD = 2, ERC-20 tokens = 18), backed by arbitrary-precision decimals.
//!
//! # Modules
//!
//! - [`core_types`] - Type aliases (AssetCode, DecimalDigits, BaseUnits)
//! - [`money`] - Exact scaling, strict parsing and display formatting
//! - [`asset_amount`] - `AssetAmount` value type and its wire form
//! - [`asset_registry`] - Asset code → precision lookup
//! - [`pagination`] - Page / page size normalization
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod asset_amount;
pub mod asset_registry;
pub mod config;
pub mod logging;
pub mod money;
pub mod pagination;

// Convenient re-exports at crate root
pub use asset_amount::{AssetAmount, WireAssetAmount};
pub use asset_registry::{AssetInfo, AssetRegistry};
pub use bigdecimal::{BigDecimal, RoundingMode};
pub use core_types::{AssetCode, BaseUnits, DecimalDigits};
pub use money::MoneyError;
pub use pagination::{PageQuery, Pagination};
