use std::sync::Arc;

use clap::Parser;
use clarity_core::ClarityConfig;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use clarity_server::http::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "clarity.toml")]
    config: String,

    /// Check the database and exit
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (OPENAI_API_KEY in development)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match ClarityConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level));
    fmt().with_env_filter(filter).init();

    let pool = match clarity_core::db::create_pool(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", config.database.url, e);
            std::process::exit(1);
        }
    };

    if args.health {
        match clarity_core::db::health_check(&pool).await {
            Ok(v) => println!("✅ SQLite connected: {}", v),
            Err(e) => {
                println!("❌ SQLite check failed: {}", e);
                std::process::exit(1);
            }
        }
        println!("✅ Clarity DB health check passed");
        return Ok(());
    }

    let generator: Arc<dyn clarity_core::ReflectionGenerator> =
        Arc::from(clarity_core::create_generator(&config.reflection)?);
    tracing::info!(
        generator = generator.name(),
        model = %config.reflection.model,
        "Reflection generator ready"
    );

    let state = Arc::new(AppState::new(pool, generator)?);

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(state, &config.http, tx.subscribe()).await?;

    Ok(())
}
