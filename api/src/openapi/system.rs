use super::common::{ApiTags, HealthResponse};
use crate::database::Database;
use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;
use std::sync::Arc;

pub struct SystemApi;

#[derive(poem_openapi::ApiResponse)]
enum HealthCheckResponse {
    #[oai(status = 200)]
    Ok(Json<HealthResponse>),
    #[oai(status = 503)]
    Unavailable(Json<HealthResponse>),
}

#[OpenApi]
impl SystemApi {
    /// Health check
    ///
    /// Answers 503 when the database does not respond to a trivial query
    #[oai(path = "/health", method = "get", tag = "ApiTags::System")]
    async fn health(&self, db: Data<&Arc<Database>>) -> HealthCheckResponse {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        match db.ping().await {
            Ok(()) => HealthCheckResponse::Ok(Json(HealthResponse {
                success: true,
                message: "Computer database API is running".to_string(),
                environment,
                database: "ok".to_string(),
            })),
            Err(e) => {
                tracing::error!("Health check failed to reach the database: {:#}", e);
                HealthCheckResponse::Unavailable(Json(HealthResponse {
                    success: false,
                    message: "Database unavailable".to_string(),
                    environment,
                    database: "unavailable".to_string(),
                }))
            }
        }
    }
}
