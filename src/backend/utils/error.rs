use thiserror::Error as ThisError;

pub type BackendResult<T> = Result<T, Error>;

/// Failure kinds surfaced by validators, use cases and stores. The first
/// three are domain outcomes which the transport layer maps to status codes
/// (400, 404 and 403 respectively); the rest are infrastructure failures
/// passed through unchanged.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("payload does not contain required property {0}")]
    MissingProperty(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0} can only be modified by its owner")]
    Forbidden(&'static str),

    #[error(transparent)]
    Database(#[from] diesel::result::Error),

    #[error(transparent)]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
