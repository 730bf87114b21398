use poem::Request;
use poem_openapi::payload::Json;
use poem_openapi::types::{ParseFromJSON, ToJSON};
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Object)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub environment: String,
    /// "ok", or "unavailable" when the store cannot be reached
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize, Object)]
#[oai(skip_serializing_if_is_none)]
pub struct ApiResponse<T: ParseFromJSON + ToJSON> {
    pub success: bool,
    #[oai(skip_serializing_if_is_none)]
    pub data: Option<T>,
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
}

impl<T: ParseFromJSON + ToJSON> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }

    pub fn error(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            data: None,
            error: Some(message.into()),
        })
    }
}

/// Raw query parameters in request order, repeated keys kept
pub fn query_params(req: &Request) -> Result<Vec<(String, String)>, String> {
    req.params::<Vec<(String, String)>>()
        .map_err(|e| format!("Invalid query string: {}", e))
}

#[derive(poem_openapi::Tags)]
pub enum ApiTags {
    /// System endpoints
    System,
    /// Company management endpoints
    Companies,
    /// Computer management endpoints
    Computers,
}

#[derive(poem_openapi::ApiResponse)]
pub enum CountResponse {
    #[oai(status = 200)]
    Ok(Json<ApiResponse<i64>>),
    #[oai(status = 400)]
    BadRequest(Json<ApiResponse<String>>),
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

#[derive(poem_openapi::ApiResponse)]
pub enum DeleteResponse {
    #[oai(status = 204)]
    NoContent,
    #[oai(status = 500)]
    InternalError(Json<ApiResponse<String>>),
}

/// Checks shared by PUT and PATCH: the body id must be present, match the path and exist
pub fn check_update_id(path_id: i64, body_id: Option<i64>) -> Result<i64, String> {
    let Some(body_id) = body_id else {
        return Err("Invalid id".to_string());
    };
    if body_id != path_id {
        return Err("Invalid ID".to_string());
    }
    Ok(body_id)
}
