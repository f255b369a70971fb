// costaff-server/src/main.rs

mod auth;
mod context;
mod error;
mod handlers;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use costaff_core::crypto::Encryptor;
use costaff_core::Database;

use crate::context::ServerContext;

const ENCRYPTION_KEY_ENV: &str = "COSTAFF_ENCRYPTION_KEY";

#[derive(Parser, Debug)]
#[command(name = "costaff-server", about = "CoStaff coaching backend API")]
struct Args {
    /// Address to bind the HTTP API.
    #[arg(long, default_value = "0.0.0.0:8080", env = "COSTAFF_BIND_ADDR")]
    bind: SocketAddr,

    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // A bad vault key must stop the server before it accepts traffic.
    let key_hex = std::env::var(ENCRYPTION_KEY_ENV)
        .map_err(|_| anyhow::anyhow!("{ENCRYPTION_KEY_ENV} must be set (64 hex chars)"))?;
    let encryptor = Encryptor::from_hex(&key_hex)?;

    let db = Database::new(&args.database_url).await?;
    db.migrate().await?;

    let ctx = Arc::new(ServerContext::new(db, encryptor));
    let app = routes::router(ctx);

    info!("Listening on {}", args.bind);
    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
