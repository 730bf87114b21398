mod criteria;
mod database;
mod openapi;
mod pagination;
mod request_logging;
mod validation;

use clap::{Parser, Subcommand};
use database::{Database, DEFAULT_DATABASE_URL};
use openapi::{create_combined_api, API_BASE_PATH};
use poem::{
    handler, listener::TcpListener, middleware::Cors, web::Redirect, Endpoint, EndpointExt, Route,
    Server,
};
use poem_openapi::OpenApiService;
use request_logging::RequestLogging;
use sqlx::SqlitePool;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "computer-db")]
#[command(about = "Computer database API server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve,
    /// Check that the database is reachable and the schema is applied
    Doctor,
}

fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

async fn setup_database() -> Result<Arc<Database>, std::io::Error> {
    let database_url = database_url();
    match Database::new(&database_url).await {
        Ok(db) => {
            tracing::info!("Database initialized at {}", database_url);
            Ok(Arc::new(db))
        }
        Err(e) => {
            tracing::error!("Failed to initialize database at {}: {:#}", database_url, e);
            Err(std::io::Error::other(format!(
                "Database initialization failed: {}",
                e
            )))
        }
    }
}

/// Whether both entity tables exist in the database at `database_url`
pub(crate) async fn check_schema_applied(database_url: &str) -> Result<bool, sqlx::Error> {
    let pool = SqlitePool::connect(database_url).await?;
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('company', 'computer')",
    )
    .fetch_one(&pool)
    .await?;
    pool.close().await;
    Ok(tables == 2)
}

#[handler]
fn root_redirect() -> Redirect {
    Redirect::temporary("/swagger")
}

/// Routes: `/` redirects to Swagger UI, the API lives under `API_BASE_PATH`
fn build_app(database: Arc<Database>) -> impl Endpoint {
    let api_service = OpenApiService::new(
        create_combined_api(),
        "Computer Database API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(API_BASE_PATH);
    let swagger_ui = api_service.swagger_ui();
    let spec = api_service.spec_endpoint();

    Route::new()
        .at("/", poem::get(root_redirect))
        .at("/openapi.json", spec)
        .nest(API_BASE_PATH, api_service)
        .nest("/swagger", swagger_ui)
        .data(database)
        .with(Cors::new())
        .with(RequestLogging)
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let cli = Cli::parse();

    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve => serve_command().await,
        Commands::Doctor => doctor_command().await,
    }
}

async fn serve_command() -> Result<(), std::io::Error> {
    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let database = setup_database().await?;

    tracing::info!("Starting computer database API server on {}", addr);
    Server::new(TcpListener::bind(&addr))
        .run(build_app(database))
        .await
}

async fn doctor_command() -> Result<(), std::io::Error> {
    let database_url = database_url();
    tracing::info!("Checking database at {}", database_url);

    match check_schema_applied(&database_url).await {
        Ok(true) => {
            println!("Database OK: schema applied at {}", database_url);
            Ok(())
        }
        Ok(false) => {
            println!("Database reachable but schema missing; run `serve` once to apply it");
            Err(std::io::Error::other("schema not applied"))
        }
        Err(e) => {
            tracing::error!("Cannot connect to {}: {}", database_url, e);
            Err(std::io::Error::other(format!(
                "Database connection failed: {}",
                e
            )))
        }
    }
}

#[cfg(test)]
mod main_tests;
