//! Error types for schema loading.
//!
//! Provides a unified error type covering every way a load can fail: the
//! pattern matching nothing, reading a matched file, parsing, compiling,
//! binding resolvers, and producing modules.

use apollo_compiler::validation::DiagnosticList;
use thiserror::Error;

/// Boxed error returned by module-producing computations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading a schema.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The glob pattern matched zero files.
    #[error("The glob pattern \"{pattern}\" has zero matches")]
    PatternMatch {
        /// The pattern exactly as the caller supplied it.
        pattern: String,
    },

    /// The glob pattern is not valid glob syntax.
    #[error("invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    /// A matched file (or a directory walked while matching) could not be
    /// read. The underlying I/O error is surfaced unchanged.
    #[error(transparent)]
    FileRead(#[from] std::io::Error),

    /// The concatenated schema text is not valid GraphQL syntax.
    #[error("{errors}")]
    Syntax {
        /// Parser diagnostics.
        errors: DiagnosticList,
    },

    /// The merged document does not compile into a valid schema.
    #[error("{errors}")]
    Validation {
        /// Schema builder and validation diagnostics.
        errors: DiagnosticList,
    },

    /// A resolver mapping names a type the schema does not define.
    #[error("\"{type_name}\" defined in resolvers, but not in schema")]
    UnknownResolverType {
        /// Type name used as a resolver mapping key.
        type_name: String,
    },

    /// A resolver mapping names a field (or enum value) the type does not
    /// define.
    #[error("{type_name}.{field_name} defined in resolvers, but not in schema")]
    UnknownResolverField {
        /// Owning type name.
        type_name: String,
        /// Field or enum value name.
        field_name: String,
    },

    /// A type-level resolver entry is a function instead of a field mapping.
    #[error("resolvers for \"{type_name}\" must be a mapping of field names")]
    InvalidResolverShape {
        /// Type name used as a resolver mapping key.
        type_name: String,
    },

    /// A module-producing computation failed.
    #[error("module error: {0}")]
    Module(#[source] BoxError),

    /// Loader configuration file could not be parsed or written.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The blocking pattern-resolution task did not complete.
    #[error("task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl LoaderError {
    pub(crate) fn zero_matches(pattern: &str) -> Self {
        Self::PatternMatch {
            pattern: pattern.to_string(),
        }
    }
}

impl From<glob::GlobError> for LoaderError {
    fn from(err: glob::GlobError) -> Self {
        Self::FileRead(err.into_error())
    }
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
