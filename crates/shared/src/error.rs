use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),
    #[error("invalid calendar date '{0}', expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
}
