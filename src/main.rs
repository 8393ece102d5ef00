//! points-engine: HTTP server for the employee performance points engine.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use points_engine::api::{AppState, create_router};
use points_engine::config::ConfigLoader;

/// points-engine: employee performance points and grading server
#[derive(Parser, Debug)]
#[command(name = "points-engine")]
#[command(about = "Grades employee work metrics and manages performance points")]
struct Args {
    /// Directory holding model.yaml, metrics.yaml and grades.yaml
    #[arg(short, long, default_value = "./config/scoring")]
    config: PathBuf,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ConfigLoader::load(&args.config)?;
    info!(
        model = %config.model().code,
        version = %config.model().version,
        metrics = config.config().metrics().len(),
        "Scoring model loaded"
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!(addr = %args.bind, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
