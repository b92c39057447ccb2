//! Notifiers as a wrap chain
//!
//! A plain text notifier, then the same notifier decorated with SMS and
//! Facebook layers.

use delegate_rs::prelude::*;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

fn client_code(component: &WrapChain) {
    print!("RESULT: {}", component.handle(""));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let simple = text_notifier()?;
    println!("Client: Simple notifier:");
    client_code(&simple);
    println!("\n");

    let decorated = notify(&[Notifier::Sms, Notifier::Facebook])?;
    println!("Client: Now I've got a decorated component:");
    client_code(&decorated);
    println!("\n");

    tracing::info!(layers = %decorated.describe(), "notifier demo finished");
    Ok(())
}
