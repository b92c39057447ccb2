//! Automation handlers as a filter chain
//!
//! Sends the same four requests to the full chain and to the sub-chain that
//! starts at `AutomationB`. Set `RUST_LOG=delegate_rs=trace` to watch every
//! hop, or `DELEGATE_CONFIG=path/to/config.json` to load a configuration
//! (e.g. `{ "legacy_reply_format": true }`).

use delegate_rs::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn load_config() -> ChainResult<ChainConfig> {
    match std::env::var("DELEGATE_CONFIG") {
        Ok(path) => ChainConfig::from_file(path),
        Err(_) => Ok(ChainConfig::default().label("automations")),
    }
}

fn client_code(title: &str, report: Vec<Dispatch>) {
    println!("{}", title);
    for dispatch in report {
        println!("\nClient: Start automation {}?", dispatch.request);
        print!("\t{}", dispatch);
    }
    println!("\n");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = load_config()?;
    let chain = automation_chain(&config)?;

    client_code(
        &format!("Chain: {}", chain.describe()),
        chain.run(DEMO_REQUESTS),
    );

    let sub = chain.sub_chain_named("AutomationB")?;
    client_code(
        &format!("Subchain: {}", sub.describe()),
        sub.run(DEMO_REQUESTS),
    );

    Ok(())
}
