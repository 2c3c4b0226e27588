//! asset_amount - inspect monetary amounts against the asset registry
//!
//! ```text
//! asset_amount [--env <env>] check <ASSET> <AMOUNT>
//! asset_amount [--env <env>] from-base <ASSET> <UNITS>
//! asset_amount page [PAGE] [PAGE_SIZE]
//! asset_amount --version
//! ```
//!
//! Configuration is read from `config/<env>.yaml` (default `dev`); without a
//! config file the built-in asset table is used.

use anyhow::{Context, bail};
use asset_amount::config::AppConfig;
use asset_amount::money::parse_display_amount;
use asset_amount::{AssetAmount, AssetRegistry, BaseUnits, Pagination, WireAssetAmount};

const USAGE: &str = "usage: asset_amount [--env <env>] <check ASSET AMOUNT | from-base ASSET UNITS | page [PAGE] [PAGE_SIZE]>";

// ============================================================
// ARGUMENTS
// ============================================================

fn get_env(args: &[String]) -> String {
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Positional arguments with `--env <value>` removed.
fn positional(args: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--env" || arg == "-e" {
            skip_next = true;
            continue;
        }
        out.push(arg.clone());
    }
    out
}

/// `-` or a missing argument means "not supplied".
fn optional_i64(arg: Option<&String>) -> anyhow::Result<Option<i64>> {
    match arg.map(String::as_str) {
        None | Some("-") => Ok(None),
        Some(s) => Ok(Some(
            s.parse().with_context(|| format!("not an integer: {}", s))?,
        )),
    }
}

// ============================================================
// COMMANDS
// ============================================================

fn report(registry: &AssetRegistry, amount: &AssetAmount) {
    println!("amount:            {}", amount);
    println!("decimal_digits:    {}", amount.decimal_digits());
    match amount.to_base_units() {
        Ok(base) => println!("base_units:        {}", base.to_plain_string()),
        Err(e) => println!("base_units:        <{}>", e),
    }
    println!("precision_overflow:{}", amount.has_precision_overflow());
    println!("valid_as_price:    {}", amount.is_valid_as_price());
    println!("display:           {}", registry.display(amount));
}

fn check(registry: &AssetRegistry, asset_id: &str, amount_str: &str) -> anyhow::Result<()> {
    let amount = parse_display_amount(amount_str)
        .with_context(|| format!("not a decimal: {}", amount_str))?;
    let wire = WireAssetAmount::new(asset_id, Some(amount));
    let amount = registry.resolve(&wire)?;
    report(registry, &amount);
    Ok(())
}

fn from_base(registry: &AssetRegistry, asset_id: &str, units_str: &str) -> anyhow::Result<()> {
    let units: BaseUnits = units_str
        .parse()
        .with_context(|| format!("not an integer: {}", units_str))?;
    let amount = registry.amount_from_base_units(asset_id, units)?;
    report(registry, &amount);
    Ok(())
}

fn page(page: Option<&String>, page_size: Option<&String>) -> anyhow::Result<()> {
    let pagination = Pagination::normalize(optional_i64(page)?, optional_i64(page_size)?);
    println!(
        "page={} page_size={} offset={}",
        pagination.page(),
        pagination.page_size(),
        pagination.offset()
    );
    Ok(())
}

// ============================================================
// MAIN
// ============================================================

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!(
            "asset_amount {} ({})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        );
        return Ok(());
    }

    let env = get_env(&args);
    let (app_config, config_error) = match AppConfig::load(&env) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let _log_guard = asset_amount::logging::init_logging(&app_config);

    if let Some(e) = config_error {
        tracing::warn!("{}; using built-in defaults", e);
    }
    tracing::debug!("Starting asset_amount in {} mode", env);

    let registry = AssetRegistry::from_config(&app_config.assets)?;

    let rest = positional(&args);
    match rest.first().map(String::as_str) {
        Some("check") => match (rest.get(1), rest.get(2)) {
            (Some(asset), Some(amount)) => check(&registry, asset, amount),
            _ => bail!(USAGE),
        },
        Some("from-base") => match (rest.get(1), rest.get(2)) {
            (Some(asset), Some(units)) => from_base(&registry, asset, units),
            _ => bail!(USAGE),
        },
        Some("page") => page(rest.get(1), rest.get(2)),
        _ => bail!(USAGE),
    }
}
