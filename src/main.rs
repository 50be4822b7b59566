use bankdata::configuration::config::Config;
use bankdata::controller::controller_handler::Controller;
use bankdata::logging::init_logging;
use bankdata::web_interface::types::{ENDPOINTS, EXAMPLE_PSNS};
use log::{error, info};

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Unable to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config) {
        eprintln!("Unable to initialize logging: {}", e);
        std::process::exit(1);
    }

    println!(
        "
==============================================================================
                         Bank Data API v{}
          Consent-gated access to citizen banking data
==============================================================================
",
        env!("CARGO_PKG_VERSION")
    );

    match &config.config_file {
        Some(path) => info!("Configuration imported from {}", path.display()),
        None => info!("Configuration imported from arguments and environment"),
    }

    let controller = Controller::new(config).unwrap_or_else(|e| {
        error!("Unable to create a controller instance: {}, exiting...", e);
        std::process::exit(1);
    });

    info!("Listening on http://{}", controller.address());
    for (method, path, description) in ENDPOINTS {
        info!("  {} {:<42} {}", method, path, description);
    }
    info!("Example PSNs:");
    for (psn, behaviour) in EXAMPLE_PSNS {
        info!("  {}  {}", psn, behaviour);
    }

    if let Err(e) = controller.run().await {
        error!("Error occured in the controller process: {}, exiting...", e);
        std::process::exit(1);
    }
}
