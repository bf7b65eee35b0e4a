//! Errors raised while building shared types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value failed construction-time checks (endpoint, identity)
    #[error("Validation error: {0}")]
    Validation(String),
}
