mod accounts;
mod companies;
mod config;
mod db;
mod errors;
mod forms;
mod jobs;
mod messages;
mod models;
mod pagination;
mod routes;
mod seed;
mod state;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "ginga", about = "Ginga job board API", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Populate the database with demo recruiters, candidates, jobs and applications
    Seed,
    /// Register the technology list used for tag autocomplete
    LoadTechs,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or_else(|| Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => serve(config, args).await,
        Command::Seed => {
            let db = create_pool(&config.database_url).await?;
            let stats = seed::run(&db).await?;
            info!("Seed finished: {stats}");
            Ok(())
        }
        Command::LoadTechs => {
            let db = create_pool(&config.database_url).await?;
            let created = seed::techs::load_techs(&db).await?;
            info!(
                "Technology tags loaded: {created} created, {} already present",
                seed::techs::TECH_LIST.len() - created
            );
            Ok(())
        }
    }
}

async fn serve(mut config: Config, args: ServeArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.port = port;
    }

    info!("Starting Ginga API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    let state = AppState {
        db,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
