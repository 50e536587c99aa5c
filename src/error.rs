use thiserror::Error;

/// Ways a proxied request can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// The access policy rejected the caller. Nothing was read from or
    /// written to the cache.
    #[error("access denied")]
    AccessDenied,
}

pub type Result<T> = std::result::Result<T, ProxyError>;
