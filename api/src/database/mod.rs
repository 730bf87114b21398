/// Default database URL for local development
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./computer-db.db?mode=rwc";

pub mod companies;
pub mod computers;
pub mod core;
pub mod query;
pub mod schema;
pub mod types;

// Re-export main types
pub use companies::{CompanyDto, CompanyPatch};
pub use computers::{ComputerDto, ComputerPatch};
pub use types::Database;

#[cfg(test)]
pub mod test_helpers;
