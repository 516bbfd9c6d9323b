//! Load GraphQL schemas split across many files.
//!
//! This crate resolves a glob pattern to schema files, reads them (either
//! concurrently or on the calling thread), parses the combined text, merges
//! duplicate definitions with [`merge_documents`], and compiles the result
//! with `apollo-compiler`.
//!
//! # Quick start
//!
//! ```no_run
//! use graphql_loader::{SchemaLoader, load_schema_sync};
//!
//! // Synchronous, default matcher options
//! let schema = load_schema_sync("schema/**/*.graphql").unwrap();
//! println!("{} types", schema.types.len());
//!
//! // Concurrent reads inside a Tokio runtime
//! # async fn run() -> graphql_loader::Result<()> {
//! let loader = SchemaLoader::builder().cwd("services/api").build();
//! let document = loader.load_document("**/*.graphql").await?;
//! println!("{document}");
//! # Ok(())
//! # }
//! ```
//!
//! Modules pairing a document with resolvers are combined with
//! [`executable_schema_from_modules`]; see [`ResolverMap`] for the resolver
//! mapping format.

mod config;
mod error;
mod loader;
mod modules;
mod pattern;
mod resolvers;
mod source;

pub use apollo_compiler;

pub use config::{DEFAULT_CONFIG_FILE, LoaderConfig};
pub use error::{BoxError, LoaderError, Result};
pub use graphql_loader_core::merge_documents;
pub use loader::{
    LoaderBuilder, SchemaLoader, combine_documents, compile_document, load_document,
    load_document_sync, load_schema, load_schema_sync, parse_document,
};
pub use modules::{GraphQLModule, ModuleFuture, ModuleSource, Produced, executable_schema_from_modules};
pub use pattern::resolve_pattern;
pub use resolvers::{ExecutableSchema, RESOLVE_KEY, Resolver, ResolverFn, ResolverMap};
pub use source::{SOURCE_SEPARATOR, concat_sources, read_sources, read_sources_sync};
