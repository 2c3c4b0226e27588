//! Core types used throughout the crate
//!
//! Type aliases that give semantic meaning to the primitive types shared by
//! the money, registry and amount modules.

/// Asset code - opaque identifier for an asset (e.g. "BTC", "USD", "USDT-ERC20").
///
/// # Constraints:
/// - **Opaque**: never parsed or case-folded, compared byte for byte
/// - **Wire key**: this is the `asset_id` field of every serialized amount
pub type AssetCode = String;

/// Number of fractional digits of an asset's base unit.
///
/// - 8 for BTC (satoshi)
/// - 2 for USD (cent)
/// - 18 for most ERC-20 tokens
pub type DecimalDigits = u32;

/// Integer amount expressed in base units (satoshi, cent, wei, ...).
///
/// Arbitrary precision: 18-digit token balances routinely exceed 2^96.
/// Signed so balance deltas and refunds share the same type.
pub type BaseUnits = num_bigint::BigInt;
