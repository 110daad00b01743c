use std::path::PathBuf;

use clap::Parser;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

use order_lifecycle::app_system::{setup_tracing, Config, OrderSystem};
use order_lifecycle::domain::{OrderCreate, OrderItemCreate};

#[derive(Parser, Debug)]
#[command(name = "order_lifecycle")]
#[command(about = "Order lifecycle engine with scheduled promotion of pending orders")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Create a sample order at startup.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    // Setup tracing once for the entire application
    setup_tracing(&args.log_level);

    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            Config::from_file(path).map_err(|e| e.to_string())?
        }
        None => Config::default(),
    };

    info!("Starting order lifecycle service");
    let system = OrderSystem::start(&config).map_err(|e| e.to_string())?;

    if args.demo {
        let request = OrderCreate {
            customer_name: "Alice".to_string(),
            customer_email: "alice@example.com".to_string(),
            items: vec![
                OrderItemCreate::new(1, "Laptop", 1, Decimal::new(129_999, 2)),
                OrderItemCreate::new(2, "Mouse", 2, Decimal::new(2_499, 2)),
            ],
        };

        let span = tracing::info_span!("demo_order");
        let result = async {
            info!("Creating demo order");
            system.engine.create(request).await
        }
        .instrument(span)
        .await;

        match result {
            Ok(order) => info!(
                order_number = %order.order_number(),
                total = %order.total_amount(),
                "Demo order created"
            ),
            Err(e) => error!(error = %e, "Demo order failed"),
        }
    }

    info!("Running. Press Ctrl-C to stop.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    system.shutdown().await?;

    info!("Application stopped");
    Ok(())
}
