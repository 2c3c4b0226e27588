//! Asset precision registry
//!
//! Maps an asset code to its fractional-digit precision. This is the lookup
//! that turns a wire amount (`asset_id` + `amount`) into an [`AssetAmount`]
//! that can be scaled to base units.
//!
//! Asset codes are opaque keys: "usdt-erc20" and "USDT-ERC20" are different
//! assets as far as the registry is concerned.

use crate::asset_amount::{AssetAmount, WireAssetAmount};
use crate::config::AssetConfig;
use crate::core_types::{AssetCode, BaseUnits, DecimalDigits};
use crate::money::MoneyError;
use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Precision metadata for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    pub asset_id: AssetCode,
    pub name: String,
    /// Fractional digits of the base unit (8 for BTC = satoshi)
    pub decimals: DecimalDigits,
    /// Digits shown to humans, never more than `decimals`
    pub display_decimals: u32,
}

/// Well-known assets available without any configuration.
static BUILTIN_ASSETS: Lazy<AssetRegistry> = Lazy::new(|| {
    let mut registry = AssetRegistry::new();
    for (asset_id, name, decimals, display_decimals) in [
        ("BTC", "Bitcoin", 8, 8),
        ("ETH", "Ethereum", 18, 8),
        ("USDT-ERC20", "Tether USD (ERC-20)", 6, 2),
        ("USDC", "USD Coin", 6, 2),
        ("USD", "US Dollar", 2, 2),
        ("EUR", "Euro", 2, 2),
        ("JPY", "Japanese Yen", 0, 0),
    ] {
        registry.assets.insert(
            asset_id.to_string(),
            AssetInfo {
                asset_id: asset_id.to_string(),
                name: name.to_string(),
                decimals,
                display_decimals,
            },
        );
    }
    registry
});

/// Asset code → precision lookup.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: FxHashMap<AssetCode, AssetInfo>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self {
            assets: FxHashMap::default(),
        }
    }

    /// Registry pre-populated with the built-in well-known assets.
    pub fn with_defaults() -> Self {
        BUILTIN_ASSETS.clone()
    }

    /// Built-in assets overlaid with configured ones (config wins).
    pub fn from_config(assets: &[AssetConfig]) -> Result<Self, MoneyError> {
        let mut registry = Self::with_defaults();
        for asset in assets {
            registry.insert(
                &asset.asset_id,
                &asset.name,
                asset.decimals,
                asset.display_decimals.unwrap_or(asset.decimals),
            )?;
        }
        tracing::info!(
            configured = assets.len(),
            total = registry.len(),
            "asset registry loaded"
        );
        Ok(registry)
    }

    /// Register or replace an asset.
    ///
    /// # Errors
    /// * `InvalidFormat` - empty asset id, or display precision finer than
    ///   the asset precision
    pub fn insert(
        &mut self,
        asset_id: &str,
        name: &str,
        decimals: DecimalDigits,
        display_decimals: u32,
    ) -> Result<(), MoneyError> {
        if asset_id.is_empty() {
            return Err(MoneyError::InvalidFormat("empty asset id".into()));
        }
        if display_decimals > decimals {
            return Err(MoneyError::InvalidFormat(format!(
                "{}: display_decimals {} exceeds decimals {}",
                asset_id, display_decimals, decimals
            )));
        }

        let previous = self.assets.insert(
            asset_id.to_string(),
            AssetInfo {
                asset_id: asset_id.to_string(),
                name: name.to_string(),
                decimals,
                display_decimals,
            },
        );
        if let Some(previous) = previous {
            if previous.decimals != decimals {
                tracing::warn!(
                    asset_id,
                    old = previous.decimals,
                    new = decimals,
                    "asset precision replaced"
                );
            }
        }
        Ok(())
    }

    pub fn get(&self, asset_id: &str) -> Option<&AssetInfo> {
        self.assets.get(asset_id)
    }

    pub fn decimals_of(&self, asset_id: &str) -> Option<DecimalDigits> {
        self.assets.get(asset_id).map(|a| a.decimals)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate over all registered assets
    pub fn iter(&self) -> impl Iterator<Item = &AssetInfo> {
        self.assets.values()
    }

    fn lookup(&self, asset_id: &str) -> Result<&AssetInfo, MoneyError> {
        self.assets.get(asset_id).ok_or_else(|| {
            tracing::debug!(asset_id, "asset not registered");
            MoneyError::AssetNotFound(asset_id.to_string())
        })
    }

    // ========================================================================
    // Enrichment: attach precision to amounts
    // ========================================================================

    /// Attach the registered precision to a wire amount.
    ///
    /// # Errors
    /// * `AssetNotFound` - the asset id is not registered. This is a lookup
    ///   failure, unrelated to precision overflow of the amount itself.
    pub fn resolve(&self, wire: &WireAssetAmount) -> Result<AssetAmount, MoneyError> {
        let info = self.lookup(&wire.asset_id)?;
        Ok(wire.clone().with_precision(info.decimals))
    }

    /// Build an amount from a display-unit decimal for a registered asset.
    pub fn amount(&self, asset_id: &str, amount: BigDecimal) -> Result<AssetAmount, MoneyError> {
        let info = self.lookup(asset_id)?;
        Ok(AssetAmount::new(amount, asset_id, info.decimals))
    }

    /// Build an amount from base units for a registered asset.
    pub fn amount_from_base_units(
        &self,
        asset_id: &str,
        units: impl Into<BaseUnits>,
    ) -> Result<AssetAmount, MoneyError> {
        let info = self.lookup(asset_id)?;
        Ok(AssetAmount::from_base_units(units, asset_id, info.decimals))
    }

    /// Render an amount at the asset's display precision.
    ///
    /// Falls back to the full [`AssetAmount::format`] for unknown assets.
    pub fn display(&self, amount: &AssetAmount) -> String {
        match self.assets.get(amount.asset_id()) {
            Some(info) => amount.format_display(info.display_decimals),
            None => amount.format(),
        }
    }
}
