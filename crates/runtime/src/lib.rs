//! `brewery-runtime` — configuration and the shared, lock-guarded production
//! service that outer layers (menus, APIs) call into.

pub mod config;
pub mod error;
pub mod service;

pub use config::RuntimeConfig;
pub use error::{ServiceError, ServiceResult};
pub use service::ProductionService;
