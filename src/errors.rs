use std::collections::TryReserveError;
use thiserror::Error;

/// The primary error type for all operations in the `subst` crate.
///
/// The byte-level engine can only fail in two ways: the output buffer could
/// not be allocated, or a caller-supplied generator gave up. Everything else
/// belongs to the file layer and the command-line front end.
#[derive(Error, Debug)]
pub enum Error {
    /// The output buffer could not be reserved.
    #[error("Allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// A replacement generator reported a failure.
    #[error("Generator failed: {0}")]
    Generator(Box<dyn std::error::Error + Send + Sync>),

    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred while parsing a YAML rule file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error that occurred while building the Rayon thread pool.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),

    /// An error related to CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an arbitrary error raised inside a replacement generator.
    pub fn generator<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Generator(err.into())
    }
}

/// A convenient type alias for `Result<T, subst::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
