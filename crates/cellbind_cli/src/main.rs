//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `cellbind_core` linkage without a spreadsheet host.
//! - Run the bind/notify/register scenario and print deterministic lines.
//!
//! Usage: `cellbind_cli [config.json]`

use cellbind_core::{
    init_logging_from_config, property, to_xml, BindingRegistry, CoreConfig, HostLocation,
    ObjectRegistry,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Default, Serialize)]
struct Quote {
    symbol: String,
    price: f64,
}

fn main() -> ExitCode {
    println!("cellbind_core ping={}", cellbind_core::ping());
    println!("cellbind_core version={}", cellbind_core::core_version());

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cellbind_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<String>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let logging = init_logging_from_config(&config.logging)?;
    println!("logging enabled={logging}");

    let mut bindings = BindingRegistry::new();
    let mut objects = ObjectRegistry::with_config(config.registry.clone());
    let quote = Arc::new(Mutex::new(Quote {
        symbol: "MSFT".to_string(),
        price: 0.0,
    }));

    let location = HostLocation::new("Book1", "Sheet1", "!A1")?;
    bindings.bind(&location.canonical_key(), &quote, property!(Quote, price))?;

    let applied = bindings.translate_host_event(&location, Box::new(42.5_f64))?;
    println!(
        "notify key={} outcome={:?} price={}",
        applied.key,
        applied.outcome,
        quote.lock().price
    );

    let unbound = bindings.notify_value("[Book1]Sheet1!B1", 1_i64)?;
    println!("notify key=[Book1]Sheet1!B1 outcome={unbound:?}");

    let first = objects.register_shared("quote", Arc::clone(&quote))?;
    let second = objects.register_shared("quote", Arc::clone(&quote))?;
    println!(
        "register distinct={} prefixed={}",
        first != second,
        first.starts_with("quote::") && second.starts_with("quote::")
    );

    let xml = objects.serialize_handle::<Quote>(&first)?;
    println!("xml={xml}");
    println!("xml_direct_matches={}", xml == to_xml(&*quote.lock())?);

    log::info!(
        "event=cli_scenario_done module=cli bindings={} objects={}",
        bindings.len(),
        objects.len()
    );
    Ok(())
}
