use std::sync::Arc;

use abtube::config::{load_config, print_schema};
use abtube::startup;
use abtube::utils::logger::init_logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = load_config();
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialise logging: {}", e);
        std::process::exit(1);
    }
    info!(
        "Starting {} v{}",
        config.logging.service_name, config.logging.service_version
    );

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
