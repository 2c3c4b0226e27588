//! Asset amounts
//!
//! - `AssetAmount`: display-unit decimal bound to an asset and its precision
//! - `WireAssetAmount`: the `{asset_id, amount}` payload as it crosses the
//!   serialization boundary, before precision is known
//!
//! Precision (`decimal_digits`) is never serialized. A wire amount becomes an
//! `AssetAmount` only once the precision is attached, either directly with
//! [`WireAssetAmount::with_precision`] or through the asset registry.

use crate::core_types::{AssetCode, BaseUnits, DecimalDigits};
use crate::money::{self, MoneyError};
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering of an absent amount.
pub const ABSENT_MARKER: &str = "null";

// ============================================================================
// AssetAmount
// ============================================================================

/// Immutable monetary amount in display units.
///
/// **Invariants:**
/// - `amount * 10^decimal_digits` is the base-unit value, exactly
/// - An absent amount never panics: predicates return `false`, arithmetic
///   returns `MoneyError::AmountAbsent`
/// - Every modification returns a new value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetAmount {
    asset_id: AssetCode,
    #[serde(serialize_with = "wire_decimal::serialize")]
    amount: Option<BigDecimal>,
    #[serde(skip)]
    decimal_digits: DecimalDigits,
}

impl AssetAmount {
    /// Build from a display-unit decimal.
    pub fn new(
        amount: BigDecimal,
        asset_id: impl Into<AssetCode>,
        decimal_digits: DecimalDigits,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            amount: Some(amount),
            decimal_digits,
        }
    }

    /// Build a "no amount specified" value.
    pub fn absent(asset_id: impl Into<AssetCode>, decimal_digits: DecimalDigits) -> Self {
        Self {
            asset_id: asset_id.into(),
            amount: None,
            decimal_digits,
        }
    }

    /// Build from an integer number of base units.
    ///
    /// The decimal point moves left by `decimal_digits`; nothing is rounded
    /// and no magnitude is too large.
    pub fn from_base_units(
        units: impl Into<BaseUnits>,
        asset_id: impl Into<AssetCode>,
        decimal_digits: DecimalDigits,
    ) -> Self {
        let amount = money::scale_down(&units.into(), decimal_digits);
        Self::new(amount, asset_id, decimal_digits)
    }

    /// Build from a fixed-width `rust_decimal` value (always exact).
    pub fn from_decimal(
        amount: Decimal,
        asset_id: impl Into<AssetCode>,
        decimal_digits: DecimalDigits,
    ) -> Self {
        let amount = BigDecimal::new(BigInt::from(amount.mantissa()), i64::from(amount.scale()));
        Self::new(amount, asset_id, decimal_digits)
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn decimal_digits(&self) -> DecimalDigits {
        self.decimal_digits
    }

    pub fn is_present(&self) -> bool {
        self.amount.is_some()
    }

    /// The amount in display units, unmodified.
    ///
    /// Not base units: use [`Self::to_base_units`] for those.
    pub fn display_value(&self) -> Option<&BigDecimal> {
        self.amount.as_ref()
    }

    /// The amount as a fixed-width `rust_decimal` value.
    ///
    /// # Errors
    /// * `Overflow` - more than 28 fractional digits or beyond 96 bits
    /// * `AmountAbsent`
    pub fn to_decimal(&self) -> Result<Decimal, MoneyError> {
        let amount = self.amount.as_ref().ok_or(MoneyError::AmountAbsent)?;
        Decimal::from_str_exact(&amount.to_plain_string()).map_err(|_| MoneyError::Overflow)
    }

    /// Amount scaled to base units.
    ///
    /// Returned as a decimal so a fractional remainder stays visible.
    pub fn to_base_units(&self) -> Result<BigDecimal, MoneyError> {
        let amount = self.amount.as_ref().ok_or(MoneyError::AmountAbsent)?;
        Ok(money::scale_up(amount, self.decimal_digits))
    }

    /// Amount as an integer number of base units.
    ///
    /// # Errors
    /// * `PrecisionOverflow` - If the amount has more fractional digits than
    ///   the asset allows
    /// * `AmountAbsent`
    /// * `Overflow` - exponent too large to materialise
    pub fn to_base_units_exact(&self) -> Result<BaseUnits, MoneyError> {
        let base = self.to_base_units()?;
        money::to_integer(&base)?.ok_or_else(|| MoneyError::PrecisionOverflow {
            provided: self.fractional_digits(),
            max: self.decimal_digits,
        })
    }

    /// True when the amount cannot be expressed in whole base units.
    ///
    /// Compares the base-unit value truncated toward zero with the exact one.
    /// An absent amount has nothing to lose and reports `false`.
    pub fn has_precision_overflow(&self) -> bool {
        match self.to_base_units() {
            Ok(base) => money::has_fraction(&base),
            Err(_) => false,
        }
    }

    /// Whether the amount may be persisted or quoted as a price.
    ///
    /// Requires a present, strictly positive amount with no precision overflow.
    pub fn is_valid_as_price(&self) -> bool {
        let Some(amount) = &self.amount else {
            return false;
        };
        if amount.sign() != Sign::Plus {
            return false;
        }
        if self.has_precision_overflow() {
            tracing::debug!(
                asset_id = %self.asset_id,
                amount = %amount.to_plain_string(),
                decimal_digits = self.decimal_digits,
                "price not representable at asset precision"
            );
            return false;
        }
        true
    }

    /// Plain decimal rendering, suffixed with the asset id when there is one.
    ///
    /// An absent amount renders as `"null"`.
    pub fn format(&self) -> String {
        match &self.amount {
            Some(amount) => self.with_suffix(amount.to_plain_string()),
            None => ABSENT_MARKER.to_string(),
        }
    }

    /// Like [`Self::format`], truncated to `display_decimals` digits.
    pub fn format_display(&self, display_decimals: u32) -> String {
        match &self.amount {
            Some(amount) => self.with_suffix(money::format_decimal(amount, display_decimals)),
            None => ABSENT_MARKER.to_string(),
        }
    }

    fn with_suffix(&self, rendered: String) -> String {
        if self.asset_id.is_empty() {
            rendered
        } else {
            format!("{} {}", rendered, self.asset_id)
        }
    }

    fn fractional_digits(&self) -> u32 {
        self.amount.as_ref().map(money::fractional_digits).unwrap_or(0)
    }

    // ========================================================================
    // Rebuilders
    // ========================================================================

    /// Same asset and precision, new amount.
    pub fn with_amount(&self, amount: BigDecimal) -> Self {
        Self::new(amount, self.asset_id.clone(), self.decimal_digits)
    }

    /// Round to the asset's precision with an explicit mode.
    ///
    /// Callers that would rather round than reject an overflowing amount opt
    /// in here; nothing else in the crate rounds.
    pub fn round_to_precision(&self, mode: RoundingMode) -> Result<Self, MoneyError> {
        let amount = self.amount.as_ref().ok_or(MoneyError::AmountAbsent)?;
        Ok(self.with_amount(amount.with_scale_round(i64::from(self.decimal_digits), mode)))
    }

    /// Sum of two amounts of the same asset and precision.
    pub fn checked_add(&self, other: &AssetAmount) -> Result<Self, MoneyError> {
        let (lhs, rhs) = self.operands(other)?;
        Ok(self.with_amount(lhs + rhs))
    }

    /// Difference of two amounts of the same asset and precision.
    pub fn checked_sub(&self, other: &AssetAmount) -> Result<Self, MoneyError> {
        let (lhs, rhs) = self.operands(other)?;
        Ok(self.with_amount(lhs - rhs))
    }

    /// Scale by a quantity or rate. The result may overflow the asset's
    /// precision; check [`Self::has_precision_overflow`] or round explicitly.
    pub fn checked_mul(&self, factor: &BigDecimal) -> Result<Self, MoneyError> {
        let amount = self.amount.as_ref().ok_or(MoneyError::AmountAbsent)?;
        Ok(self.with_amount(amount * factor))
    }

    fn operands<'a>(
        &'a self,
        other: &'a AssetAmount,
    ) -> Result<(&'a BigDecimal, &'a BigDecimal), MoneyError> {
        if self.asset_id != other.asset_id || self.decimal_digits != other.decimal_digits {
            return Err(MoneyError::AssetMismatch {
                left: format!("{}/{}", self.asset_id, self.decimal_digits),
                right: format!("{}/{}", other.asset_id, other.decimal_digits),
            });
        }
        match (&self.amount, &other.amount) {
            (Some(lhs), Some(rhs)) => Ok((lhs, rhs)),
            _ => Err(MoneyError::AmountAbsent),
        }
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

// ============================================================================
// WireAssetAmount: serialization boundary
// ============================================================================

/// Amount as carried by DTOs: `{"asset_id": "BTC", "amount": "0.015"}`.
///
/// `amount` accepts a JSON string or number and may be missing or `null`.
/// Serialization always writes the amount as a plain string to preserve
/// precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireAssetAmount {
    pub asset_id: AssetCode,
    #[serde(default, with = "wire_decimal")]
    pub amount: Option<BigDecimal>,
}

impl WireAssetAmount {
    pub fn new(asset_id: impl Into<AssetCode>, amount: Option<BigDecimal>) -> Self {
        Self {
            asset_id: asset_id.into(),
            amount,
        }
    }

    /// Attach a known precision.
    pub fn with_precision(self, decimal_digits: DecimalDigits) -> AssetAmount {
        AssetAmount {
            asset_id: self.asset_id,
            amount: self.amount,
            decimal_digits,
        }
    }
}

impl From<&AssetAmount> for WireAssetAmount {
    fn from(value: &AssetAmount) -> Self {
        Self {
            asset_id: value.asset_id.clone(),
            amount: value.amount.clone(),
        }
    }
}

impl From<AssetAmount> for WireAssetAmount {
    fn from(value: AssetAmount) -> Self {
        Self {
            asset_id: value.asset_id,
            amount: value.amount,
        }
    }
}

/// Serde adapter for `Option<BigDecimal>` amounts.
///
/// Strings are parsed exactly, scientific notation included. Integers are
/// exact. Floats go through their shortest round-trip text, so `10.5`
/// arrives as `10.5`, not as the nearest binary fraction. Exponents beyond
/// [`money::MAX_POW10`] are refused.
mod wire_decimal {
    use crate::money::MAX_POW10;
    use bigdecimal::BigDecimal;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.to_plain_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionalDecimalVisitor)
    }

    fn parse_exact<E: de::Error>(v: &str) -> Result<BigDecimal, E> {
        let d = BigDecimal::from_str(v).map_err(|e| E::custom(format!("Invalid decimal: {}", e)))?;
        let (_, scale) = d.as_bigint_and_exponent();
        if scale.unsigned_abs() > u64::from(MAX_POW10) {
            return Err(E::custom(format!(
                "Amount exponent out of range: {}",
                -scale
            )));
        }
        Ok(d)
    }

    struct OptionalDecimalVisitor;

    impl<'de> Visitor<'de> for OptionalDecimalVisitor {
        type Value = Option<BigDecimal>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal string, a number or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(DecimalVisitor).map(Some)
        }
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = BigDecimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigDecimal, E> {
            let v = v.trim();
            if v.is_empty() {
                return Err(E::custom("Amount cannot be empty"));
            }
            parse_exact(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigDecimal, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigDecimal, E> {
            Ok(BigDecimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<BigDecimal, E> {
            if !v.is_finite() {
                return Err(E::custom("Amount must be finite"));
            }
            parse_exact(&v.to_string())
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
