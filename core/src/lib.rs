//! Merging of GraphQL type-system documents split across many files.
//!
//! This crate holds the pure part of schema loading: given documents that
//! were parsed independently, produce one document that behaves as if the
//! whole type system had been written in a single file.
//!
//! - [`merge_documents`]: flattens the inputs, merges duplicate object types
//!   by concatenating their fields, and collapses every `schema { ... }`
//!   entry point into the first one.
//! - [`classify`] / [`DefinitionKind`]: the three-way split (object type,
//!   schema entry point, other) the merge is written against.
//! - [`find_duplicate_object_types`]: object type names defined more than
//!   once, with their first occurrence.
//!
//! There is no I/O here; see the `graphql-loader` crate for glob-based file
//! loading and schema compilation.
//!
//! # Example
//!
//! ```
//! use apollo_compiler::ast::{Definition, Document};
//! use graphql_loader_core::merge_documents;
//!
//! let a = Document::parse("type Query { hello: String }", "a.graphql").unwrap();
//! let b = Document::parse(
//!     "type Query { world: String } schema { query: Query }",
//!     "b.graphql",
//! )
//! .unwrap();
//!
//! let merged = merge_documents([&a, &b]);
//! let Definition::ObjectTypeDefinition(query) = &merged.definitions[1] else {
//!     panic!("expected the merged Query type last");
//! };
//! let fields: Vec<&str> = query.fields.iter().map(|f| f.name.as_str()).collect();
//! assert_eq!(fields, ["hello", "world"]);
//!
//! let schema = merged.to_schema_validate().unwrap();
//! assert_eq!(schema.get_object("Query").unwrap().fields.len(), 2);
//! ```

mod classify;
mod merge;

pub use classify::{DefinitionKind, DuplicateGroups, Survivor, classify, find_duplicate_object_types};
pub use merge::{
    flatten, merge_definitions, merge_documents, merge_object_fields, merge_schema_entries,
};
