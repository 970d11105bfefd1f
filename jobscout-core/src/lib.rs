pub mod config;
pub mod error;
pub mod error_utils;
pub mod query;
pub mod scoring;
pub mod types;

pub use config::*;
pub use error::*;
pub use error_utils::*;
pub use query::*;
pub use scoring::*;
pub use types::*;
