use thiserror::Error;

use brewery_core::DomainError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    /// The request was rejected by the production rules.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A caller panicked while holding the production lock.
    #[error("production state lock poisoned")]
    Poisoned,
}
