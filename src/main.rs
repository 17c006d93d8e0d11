use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::PgPoolOptions;
use tokio::main;

use crate::auth_middleware::TokenVerifier;
use crate::config::Config;
use crate::policies::{AdminEmail, AdminPolicy};

mod auth_middleware;
mod config;
mod endpoint_handlers;
mod errors;
mod policies;
mod responses;
mod routes;
#[cfg(test)]
mod test_support;

/// Everything a request handler may touch. Nothing in here changes between
/// requests; the store is the only shared mutable resource.
#[derive(Clone)]
pub struct AppState {
    connection: DatabaseConnection,
    admin: Arc<dyn AdminPolicy>,
    tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(
        connection: DatabaseConnection,
        admin: Arc<dyn AdminPolicy>,
        tokens: TokenVerifier,
    ) -> Self {
        Self {
            connection,
            admin,
            tokens: Arc::new(tokens),
        }
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, short, default_value_t = 3)]
    verbosity: usize,
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
    #[arg(long, short)]
    config: String,
}

#[main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    stderrlog::new()
        .verbosity(args.verbosity)
        .quiet(args.quiet)
        .timestamp(stderrlog::Timestamp::Millisecond)
        .init()?;

    info!("Configuration path: {}", args.config);
    let config = Config::load(Path::new(&args.config)).map_err(|err| {
        error!("{}", err);
        err
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.postgres)
        .await
        .map_err(|err| {
            error!("Error connecting to database: {}", err);
            err
        })?;
    let connection = SqlxPostgresConnector::from_sqlx_postgres_pool(pool);
    info!("Running migrations");
    Migrator::up(&connection, None).await?;

    let state = AppState::new(
        connection,
        Arc::new(AdminEmail::new(config.admin_email.as_str())),
        TokenVerifier::new(&config.jwt_secret),
    );
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on 0.0.0.0:{}", config.port);
    info!("Welcome to SoundShare!");
    axum::serve(listener, app).await?;
    Ok(())
}
