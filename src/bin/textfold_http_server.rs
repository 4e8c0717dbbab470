use clap::Parser;
use log::info;
use textfold::{load_app_config, TextfoldHttpServer};

/// Command line options for the HTTP server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Path to the configuration file
    #[arg(long)]
    config: Option<String>,
}

/// Main entry point for the textfold HTTP server.
///
/// Loads configuration, opens the document store, and serves the REST API.
///
/// # Environment Variables
///
/// * `TEXTFOLD_CONFIG` - Path to the configuration file (default: config/textfold.json)
/// * `ORACLE_API_KEY` - API key for the classification oracle
/// * `TEXTFOLD_JWT_SECRET` - HMAC secret for access tokens
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    textfold::logging::init().ok();
    info!("Starting textfold HTTP server...");

    let Cli { port, config } = Cli::parse();

    let config = load_app_config(config.as_deref())?;
    info!(
        "Config loaded (model: {}, oracle key: {})",
        config.oracle.model,
        config.oracle.api_key_masked()
    );

    let bind_address = format!("127.0.0.1:{}", port);
    let server = TextfoldHttpServer::new(config, &bind_address)?;

    server.run().await?;

    Ok(())
}
