pub mod common;
pub mod companies;
pub mod computers;
pub mod system;

pub use companies::CompaniesApi;
pub use computers::ComputersApi;
pub use system::SystemApi;

use poem_openapi::OpenApi;

/// Mount point of the OpenAPI service; links and `Location` headers are built from it
pub const API_BASE_PATH: &str = "/api";

/// Combines all API modules into a single OpenAPI specification
pub fn create_combined_api() -> impl OpenApi {
    (SystemApi, CompaniesApi, ComputersApi)
}

#[cfg(test)]
mod tests;
