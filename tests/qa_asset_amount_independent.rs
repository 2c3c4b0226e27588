use asset_amount::{
    AssetAmount, AssetRegistry, BigDecimal, MoneyError, PageQuery, Pagination, RoundingMode,
    WireAssetAmount,
};
use num_bigint::BigInt;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// Decimal with exactly `frac_digits` fractional digits, last digit non-zero.
fn with_fraction(whole: i64, frac_digits: u32) -> BigDecimal {
    if frac_digits == 0 {
        return BigDecimal::from(whole);
    }
    let frac = "0".repeat(frac_digits as usize - 1) + "7";
    dec(&format!("{}.{}", whole, frac))
}

#[test]
fn qa_tc_base_unit_roundtrip() {
    let units: Vec<BigInt> = vec![
        BigInt::from(0),
        BigInt::from(1),
        BigInt::from(7),
        BigInt::from(-99),
        BigInt::from(123_456_789),
        BigInt::from(u64::MAX),
        // 2^96 - 1, the largest fixed-width decimal mantissa, and just past it
        (BigInt::from(1) << 96u32) - 1,
        BigInt::from(1) << 96u32,
        // 589 trillion tokens at 18 digits
        BigInt::from(589_000_000_000_000u64) * BigInt::from(10).pow(18),
        BigInt::from(1) << 200u32,
    ];
    for digits in [0u32, 1, 2, 6, 8, 12, 18, 28, 29, 30, 40, 77] {
        for n in &units {
            let amount = AssetAmount::from_base_units(n.clone(), "ASSET", digits);
            assert_eq!(
                amount.to_base_units().unwrap(),
                BigDecimal::from(n.clone()),
                "roundtrip failed for {} at {} digits",
                n,
                digits
            );
            assert_eq!(&amount.to_base_units_exact().unwrap(), n);
            assert!(!amount.has_precision_overflow());
        }
    }
}

#[test]
fn qa_tc_rust_decimal_values_convert_exactly() {
    let balance = AssetAmount::from_decimal(Decimal::from(100_000_000_000_000i64), "ETH", 18);
    assert_eq!(
        balance.to_base_units_exact().unwrap(),
        BigInt::from(10).pow(32)
    );
    assert_eq!(balance.to_decimal().unwrap(), Decimal::from(100_000_000_000_000i64));

    // 1 base unit at 30 digits has no fixed-width decimal form
    let tiny = AssetAmount::from_base_units(1, "X", 30);
    assert_eq!(tiny.to_decimal(), Err(MoneyError::Overflow));
}

#[test]
fn qa_tc_overflow_boundary() {
    for digits in (0u32..=18).chain([28, 30, 40]) {
        for frac_digits in (0u32..=20).chain([29, 31, 41, 60]) {
            let x = with_fraction(3, frac_digits);
            let amount = AssetAmount::new(x.clone(), "ASSET", digits);
            assert_eq!(
                amount.has_precision_overflow(),
                frac_digits > digits,
                "{} at {} digits",
                x,
                digits
            );
        }
    }
}

#[test]
fn qa_tc_overflow_examples() {
    assert!(AssetAmount::new(dec("1.23456789"), "USD", 2).has_precision_overflow());

    // One digit past a fixed-width decimal's 28 is still seen
    let fine = AssetAmount::new(dec("1.00000000000000000000000000001"), "X", 28);
    assert!(fine.has_precision_overflow());

    let usd = AssetAmount::new(dec("1.999"), "USD", 2);
    assert!(usd.has_precision_overflow());
    assert!(!usd.is_valid_as_price());

    let sat = AssetAmount::new(dec("0.00000001"), "BTC", 8);
    assert_eq!(sat.to_base_units().unwrap(), BigDecimal::from(1));
    assert!(!sat.has_precision_overflow());
}

#[test]
fn qa_tc_negative_amounts_follow_truncation_toward_zero() {
    let refund = AssetAmount::new(dec("-0.015"), "USD", 2);
    assert!(refund.has_precision_overflow());

    let exact_refund = AssetAmount::new(dec("-0.01"), "USD", 2);
    assert!(!exact_refund.has_precision_overflow());
    assert_eq!(exact_refund.to_base_units_exact().unwrap(), BigInt::from(-1));
}

#[test]
fn qa_tc_price_gate() {
    assert!(AssetAmount::new(dec("10.50"), "USD", 2).is_valid_as_price());
    assert!(!AssetAmount::new(dec("0"), "USD", 2).is_valid_as_price());
    assert!(!AssetAmount::new(dec("0.00"), "USD", 2).is_valid_as_price());
    assert!(!AssetAmount::new(dec("-1"), "USD", 2).is_valid_as_price());
    assert!(!AssetAmount::absent("USD", 2).is_valid_as_price());
    assert!(!AssetAmount::new(dec("10.505"), "USD", 2).is_valid_as_price());
}

#[test]
fn qa_tc_format() {
    assert_eq!(AssetAmount::new(dec("100"), "USD", 2).format(), "100 USD");
    assert_eq!(AssetAmount::absent("USD", 2).format(), "null");
    assert_eq!(AssetAmount::new(dec("-0"), "USD", 2).format(), "0 USD");
    // Never scientific notation, even for tiny values
    assert_eq!(
        AssetAmount::new(dec("0.000000000000000001"), "ETH", 18).format(),
        "0.000000000000000001 ETH"
    );
}

#[test]
fn qa_tc_two_phase_construction_from_json() {
    let registry = AssetRegistry::with_defaults();
    let payload = r#"[
        {"asset_id": "BTC", "amount": "0.015"},
        {"asset_id": "USD", "amount": 1.999},
        {"asset_id": "USDT-ERC20", "amount": null},
        {"asset_id": "NOPE", "amount": "1"},
        {"asset_id": "ETH", "amount": "1.0000000000000000001e0"}
    ]"#;
    let wire: Vec<WireAssetAmount> = serde_json::from_str(payload).unwrap();

    let btc = registry.resolve(&wire[0]).unwrap();
    assert_eq!(btc.to_base_units_exact().unwrap(), BigInt::from(1_500_000));
    assert!(btc.is_valid_as_price());

    let usd = registry.resolve(&wire[1]).unwrap();
    assert!(usd.has_precision_overflow());

    let usdt = registry.resolve(&wire[2]).unwrap();
    assert!(!usdt.is_present());
    assert!(!usdt.has_precision_overflow());

    assert_eq!(
        registry.resolve(&wire[3]),
        Err(MoneyError::AssetNotFound("NOPE".to_string()))
    );

    // Scientific notation keeps its 19th fractional digit
    let eth = registry.resolve(&wire[4]).unwrap();
    assert_eq!(eth.display_value(), Some(&dec("1.0000000000000000001")));
    assert!(eth.has_precision_overflow());
}

#[test]
fn qa_tc_serialization_never_carries_precision() {
    let registry = AssetRegistry::with_defaults();
    let amount = registry.amount_from_base_units("ETH", 1).unwrap();
    let json = serde_json::to_value(&amount).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"asset_id": "ETH", "amount": "0.000000000000000001"})
    );

    let back: WireAssetAmount = serde_json::from_value(json).unwrap();
    assert_eq!(registry.resolve(&back).unwrap(), amount);
}

#[test]
fn qa_tc_explicit_rounding_clears_overflow() {
    let fee = AssetAmount::new(dec("0.123456789"), "BTC", 8);
    assert!(fee.has_precision_overflow());

    let rounded = fee
        .round_to_precision(RoundingMode::HalfUp)
        .unwrap();
    assert_eq!(rounded.display_value(), Some(&dec("0.12345679")));
    assert!(rounded.is_valid_as_price());
}

#[test]
fn qa_tc_price_times_quantity() {
    let price = AssetAmount::new(dec("19.99"), "USD", 2);
    let total = price.checked_mul(&dec("3")).unwrap();
    assert_eq!(total.to_base_units_exact().unwrap(), BigInt::from(5997));

    // Fractional quantity can break precision
    let partial = price.checked_mul(&dec("0.5")).unwrap();
    assert!(partial.has_precision_overflow());
}

#[test]
fn qa_tc_pagination_contract() {
    assert_eq!(Pagination::normalize(None, None).into_parts(), (0, 10));
    assert_eq!(Pagination::normalize(Some(-5), Some(0)).into_parts(), (0, 10));
    assert_eq!(Pagination::normalize(Some(3), Some(25)).into_parts(), (3, 25));
    // Explicit sizes above the maximum are clamped, not replaced by the default
    assert_eq!(Pagination::normalize(Some(1), Some(500)).into_parts(), (1, 50));
}

#[test]
fn qa_tc_pagination_idempotent() {
    for page in -3i64..=3 {
        for page_size in -60i64..=60 {
            let once = Pagination::normalize(Some(page), Some(page_size));
            let (p, s) = once.into_parts();
            let twice = Pagination::normalize(Some(p), Some(s));
            assert_eq!(once, twice);
            assert!(p >= 0);
            assert!((1..=50).contains(&s));
        }
    }
}

#[test]
fn qa_tc_page_query_from_request() {
    let q: PageQuery = serde_json::from_str(r#"{"page": -1, "page_size": 0}"#).unwrap();
    let p = q.normalize();
    assert_eq!((p.offset(), p.limit()), (0, 10));
}
