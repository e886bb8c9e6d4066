pub mod config;
pub mod error;
pub mod types;

pub use config::MediqConfig;
pub use error::{MediqError, Result};
pub use types::*;
