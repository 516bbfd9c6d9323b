//! Glob-driven schema loading.
//!
//! Provides [`SchemaLoader`] for turning a file pattern into a merged
//! document or a compiled schema, and [`LoaderBuilder`] for configuring the
//! matcher.
//!
//! # Loading patterns
//!
//! ```no_run
//! use graphql_loader::SchemaLoader;
//!
//! # async fn run() -> graphql_loader::Result<()> {
//! // Concurrent reads, awaited as one deferred value
//! let schema = SchemaLoader::new().load_schema("schema/**/*.graphql").await?;
//! assert!(schema.get_object("Query").is_some());
//!
//! // Same result without suspending
//! let schema = SchemaLoader::new().load_schema_sync("schema/**/*.graphql")?;
//!
//! // Resolve relative to another directory
//! let document = SchemaLoader::builder()
//!     .cwd("services/api")
//!     .build()
//!     .load_document_sync("**/*.graphql")?;
//! # Ok(())
//! # }
//! ```
//!
//! Every entry point runs the same steps: resolve the pattern, read the
//! matched files, concatenate them in match order, parse, and merge duplicate
//! definitions. Schema entry points then compile the merged document.

use std::path::{Path, PathBuf};

use apollo_compiler::Schema;
use apollo_compiler::ast::Document;
use apollo_compiler::validation::Valid;
use graphql_loader_core::merge_documents;
use tracing::{debug, info};

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::pattern::resolve_pattern;
use crate::source::{read_sources, read_sources_sync};

/// Loads GraphQL schema files selected by a glob pattern.
///
/// The asynchronous methods must be awaited inside a Tokio runtime: pattern
/// resolution runs on the blocking pool and file reads use `tokio::fs`. The
/// `_sync` methods do all work on the calling thread and fail with the same
/// errors.
///
/// # Examples
///
/// ```no_run
/// use graphql_loader::{LoaderConfig, SchemaLoader};
///
/// let config = LoaderConfig::load(".graphql-loader.yml").unwrap();
/// let loader = SchemaLoader::with_config(config);
/// let document = loader.load_document_sync("**/*.graphql").unwrap();
/// println!("{} definitions", document.definitions.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    config: LoaderConfig,
}

impl SchemaLoader {
    /// Creates a loader with default matcher options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with the given matcher options.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Returns a new [`LoaderBuilder`].
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }

    /// Returns the matcher options in use.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads and merges every file matching `pattern`.
    ///
    /// All matched files are read concurrently; their contents are joined in
    /// match order, not completion order.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::PatternMatch`] if nothing matches,
    /// [`LoaderError::FileRead`] for the first unreadable file, or
    /// [`LoaderError::Syntax`] if the combined text does not parse.
    pub async fn load_document(&self, pattern: &str) -> Result<Document> {
        let files = self.resolve(pattern).await?;
        let text = read_sources(&files).await?;
        finish_document(pattern, text, files.len())
    }

    /// Synchronous counterpart of [`load_document`](Self::load_document).
    ///
    /// # Errors
    ///
    /// Same as [`load_document`](Self::load_document).
    pub fn load_document_sync(&self, pattern: &str) -> Result<Document> {
        let files = resolve_pattern(pattern, &self.config)?;
        let text = read_sources_sync(&files)?;
        finish_document(pattern, text, files.len())
    }

    /// Loads, merges and compiles every file matching `pattern`.
    ///
    /// # Errors
    ///
    /// Any [`load_document`](Self::load_document) error, or
    /// [`LoaderError::Validation`] if the merged document is not a valid
    /// schema.
    pub async fn load_schema(&self, pattern: &str) -> Result<Valid<Schema>> {
        let document = self.load_document(pattern).await?;
        compile_document(&document)
    }

    /// Synchronous counterpart of [`load_schema`](Self::load_schema).
    ///
    /// # Errors
    ///
    /// Same as [`load_schema`](Self::load_schema).
    pub fn load_schema_sync(&self, pattern: &str) -> Result<Valid<Schema>> {
        let document = self.load_document_sync(pattern)?;
        compile_document(&document)
    }

    /// Continuation-style [`load_document`](Self::load_document).
    ///
    /// `callback` receives the outcome exactly once; the returned future only
    /// signals completion and never carries the error.
    pub async fn load_document_with_callback<F>(&self, pattern: &str, callback: F)
    where
        F: FnOnce(Result<Document>),
    {
        callback(self.load_document(pattern).await);
    }

    /// Continuation-style [`load_schema`](Self::load_schema).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use graphql_loader::SchemaLoader;
    ///
    /// # async fn run() {
    /// SchemaLoader::new()
    ///     .load_schema_with_callback("schema/*.graphql", |result| match result {
    ///         Ok(schema) => println!("{} types", schema.types.len()),
    ///         Err(err) => eprintln!("error: {err}"),
    ///     })
    ///     .await;
    /// # }
    /// ```
    pub async fn load_schema_with_callback<F>(&self, pattern: &str, callback: F)
    where
        F: FnOnce(Result<Valid<Schema>>),
    {
        callback(self.load_schema(pattern).await);
    }

    async fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let owned = pattern.to_string();
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || resolve_pattern(&owned, &config)).await?
    }
}

/// Builder for configuring a [`SchemaLoader`].
///
/// # Example
///
/// ```
/// use graphql_loader::SchemaLoader;
///
/// let loader = SchemaLoader::builder()
///     .cwd("schema")
///     .case_sensitive(false)
///     .build();
/// assert!(!loader.config().case_sensitive);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoaderBuilder {
    config: LoaderConfig,
}

impl LoaderBuilder {
    /// Creates a builder with default matcher options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all matcher options.
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves relative patterns against `dir`.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cwd = Some(dir.into());
        self
    }

    /// Matches letters case-sensitively.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.config.case_sensitive = yes;
        self
    }

    /// Requires `/` to be matched by a literal `/`.
    pub fn require_literal_separator(mut self, yes: bool) -> Self {
        self.config.require_literal_separator = yes;
        self
    }

    /// Requires a leading `.` in a file name to be matched literally.
    pub fn require_literal_leading_dot(mut self, yes: bool) -> Self {
        self.config.require_literal_leading_dot = yes;
        self
    }

    /// Builds the configured [`SchemaLoader`].
    pub fn build(self) -> SchemaLoader {
        SchemaLoader::with_config(self.config)
    }
}

fn finish_document(pattern: &str, text: String, files: usize) -> Result<Document> {
    let parsed = parse_document(text, pattern)?;
    let document = merge_documents([&parsed]);
    info!(
        pattern,
        files,
        definitions = document.definitions.len(),
        "Loaded schema document"
    );
    Ok(document)
}

/// Parses schema text into a document.
///
/// `path` only labels diagnostics.
///
/// # Errors
///
/// Returns [`LoaderError::Syntax`] with the parser diagnostics.
pub fn parse_document(text: impl Into<String>, path: impl AsRef<Path>) -> Result<Document> {
    Document::parse(text, path).map_err(|invalid| LoaderError::Syntax {
        errors: invalid.errors,
    })
}

/// Compiles a document into a validated schema.
///
/// # Errors
///
/// Returns [`LoaderError::Validation`] with the build and validation
/// diagnostics, for example when a root operation type is not defined.
pub fn compile_document(document: &Document) -> Result<Valid<Schema>> {
    let schema = document
        .to_schema_validate()
        .map_err(|invalid| LoaderError::Validation {
            errors: invalid.errors,
        })?;
    debug!(types = schema.types.len(), "Compiled schema");
    Ok(schema)
}

/// Merges documents and compiles the result.
///
/// Duplicate object types have their fields concatenated and schema entry
/// points are collapsed into the first; see
/// [`merge_documents`](graphql_loader_core::merge_documents).
///
/// # Errors
///
/// Returns [`LoaderError::Validation`] if the merged document is not a valid
/// schema.
pub fn combine_documents<'a, I>(documents: I) -> Result<Valid<Schema>>
where
    I: IntoIterator<Item = &'a Document>,
{
    compile_document(&merge_documents(documents))
}

/// [`SchemaLoader::load_document`] with default matcher options.
pub async fn load_document(pattern: &str) -> Result<Document> {
    SchemaLoader::new().load_document(pattern).await
}

/// [`SchemaLoader::load_document_sync`] with default matcher options.
pub fn load_document_sync(pattern: &str) -> Result<Document> {
    SchemaLoader::new().load_document_sync(pattern)
}

/// [`SchemaLoader::load_schema`] with default matcher options.
pub async fn load_schema(pattern: &str) -> Result<Valid<Schema>> {
    SchemaLoader::new().load_schema(pattern).await
}

/// [`SchemaLoader::load_schema_sync`] with default matcher options.
pub fn load_schema_sync(pattern: &str) -> Result<Valid<Schema>> {
    SchemaLoader::new().load_schema_sync(pattern)
}
