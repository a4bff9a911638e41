use thiserror::Error;

/// Unified error type for cmake-package operations
#[derive(Error, Debug)]
pub enum CmakePackageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version extraction error: {0}")]
    Version(String),

    #[error("Toolchain error: {0}")]
    Toolchain(String),

    #[error("Build tool failed: {0}")]
    Tool(String),

    #[error("Packaging error: {0}")]
    Package(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in cmake-package
pub type Result<T> = std::result::Result<T, CmakePackageError>;

impl CmakePackageError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        CmakePackageError::Config(msg.into())
    }

    /// Create a version extraction error with context
    pub fn version(msg: impl Into<String>) -> Self {
        CmakePackageError::Version(msg.into())
    }

    /// Create a toolchain error with context
    pub fn toolchain(msg: impl Into<String>) -> Self {
        CmakePackageError::Toolchain(msg.into())
    }

    /// Create a build tool error with context
    pub fn tool(msg: impl Into<String>) -> Self {
        CmakePackageError::Tool(msg.into())
    }

    /// Create a packaging error with context
    pub fn package(msg: impl Into<String>) -> Self {
        CmakePackageError::Package(msg.into())
    }
}
