//! Document merging.
//!
//! Schema files are split by module, owner or feature, and the same object
//! type (most often `Query` and `Mutation`) ends up defined in several of
//! them. [`merge_documents`] combines the parsed documents into one document
//! that reads as if everything had been written in a single file:
//!
//! - object types sharing a name collapse into their first occurrence, with
//!   the fields of every occurrence concatenated in scan order;
//! - the first `schema { ... }` entry point survives and picks up any root
//!   operation kind it lacks from later entry points;
//! - everything else passes through untouched.
//!
//! Field names are not deduplicated and field types are not compared; schema
//! compilation reports any conflicts.
//!
//! # Example
//!
//! ```
//! use apollo_compiler::ast::Document;
//! use graphql_loader_core::merge_documents;
//!
//! let users = Document::parse("type Query { user: String }", "users.graphql").unwrap();
//! let posts = Document::parse("type Query { post: String }", "posts.graphql").unwrap();
//!
//! let merged = merge_documents([&users, &posts]);
//! assert_eq!(merged.definitions.len(), 1);
//! assert!(merged.to_string().contains("post: String"));
//! ```

use std::sync::Arc;

use apollo_compiler::Node;
use apollo_compiler::ast::{Definition, Document, ObjectTypeDefinition, SchemaDefinition};
use tracing::debug;

use crate::classify::{DefinitionKind, Survivor, classify, find_duplicate_object_types};

/// Merges parsed documents into one document.
///
/// Output order is: every definition that is neither a schema entry point
/// nor named after a duplicated object type (in flattened input order), then
/// the surviving schema entry point if any input had one, then the merged
/// object types in the order their names were first seen duplicated.
///
/// Inputs are not modified. Merging never fails.
pub fn merge_documents<'a, I>(documents: I) -> Document
where
    I: IntoIterator<Item = &'a Document>,
{
    let documents: Vec<&Document> = documents.into_iter().collect();

    let mut merged = Document::new();
    {
        let sources = Arc::make_mut(&mut merged.sources);
        for document in &documents {
            sources.extend(
                document
                    .sources
                    .iter()
                    .map(|(id, file)| (*id, Arc::clone(file))),
            );
        }
    }
    merged.definitions = merge_definitions(flatten(documents));
    merged
}

/// Concatenates the definitions of every document, preserving document
/// order and the order within each document.
pub fn flatten<'a, I>(documents: I) -> Vec<Definition>
where
    I: IntoIterator<Item = &'a Document>,
{
    documents
        .into_iter()
        .flat_map(|document| document.definitions.iter().cloned())
        .collect()
}

/// Merges an already flattened definition list.
pub fn merge_definitions(definitions: Vec<Definition>) -> Vec<Definition> {
    let duplicates = find_duplicate_object_types(&definitions);
    let schema_entry = merge_schema_entries(&definitions);
    let merged_types: Vec<Definition> = duplicates
        .survivors()
        .map(|survivor| Definition::ObjectTypeDefinition(merge_object_fields(survivor, &definitions)))
        .collect();

    debug!(
        definitions = definitions.len(),
        duplicated = ?duplicates.names().collect::<Vec<_>>(),
        schema_entry = schema_entry.is_some(),
        "Merging definitions"
    );

    let mut output: Vec<Definition> = definitions
        .into_iter()
        .filter(|definition| match classify(definition) {
            DefinitionKind::SchemaEntry(_) => false,
            DefinitionKind::ObjectType(_) | DefinitionKind::Other(_) => definition
                .name()
                .is_none_or(|name| !duplicates.contains(name.as_str())),
        })
        .collect();

    output.extend(schema_entry.map(Definition::SchemaDefinition));
    output.extend(merged_types);
    output
}

/// Builds the merged definition for one duplicated object type.
///
/// The result is a fresh node: the survivor's fields followed by the fields
/// of every other same-named object type or object type extension in
/// `definitions`, in scan order. The survivor position itself is skipped.
///
/// Same-named extensions are consumed here; assembly drops them.
pub fn merge_object_fields(
    survivor: &Survivor,
    definitions: &[Definition],
) -> Node<ObjectTypeDefinition> {
    let name = &survivor.definition.name;
    let extra_fields: Vec<_> = definitions
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != survivor.index)
        .filter_map(|(_, definition)| match definition {
            Definition::ObjectTypeDefinition(object) if object.name == *name => {
                Some(&object.fields)
            }
            Definition::ObjectTypeExtension(extension) if extension.name == *name => {
                Some(&extension.fields)
            }
            _ => None,
        })
        .flat_map(|fields| fields.iter().cloned())
        .collect();

    let mut merged = survivor.definition.clone();
    if !extra_fields.is_empty() {
        merged.make_mut().fields.extend(extra_fields);
    }
    merged
}

/// Collapses every schema entry point into the first one.
///
/// The first entry point keeps its own root operations untouched. Each later
/// entry point contributes the operation kinds the survivor does not have
/// yet, in declaration order; conflicting kinds are dropped. Returns `None`
/// when `definitions` holds no entry point.
pub fn merge_schema_entries(definitions: &[Definition]) -> Option<Node<SchemaDefinition>> {
    let mut entries = definitions
        .iter()
        .filter_map(|definition| match classify(definition) {
            DefinitionKind::SchemaEntry(schema) => Some(schema),
            DefinitionKind::ObjectType(_) | DefinitionKind::Other(_) => None,
        });

    let first = entries.next()?;
    let mut root_operations = first.root_operations.clone();
    for entry in entries {
        for operation in &entry.root_operations {
            if !root_operations.iter().any(|existing| existing.0 == operation.0) {
                root_operations.push(operation.clone());
            }
        }
    }

    let mut merged = first.clone();
    if root_operations.len() != first.root_operations.len() {
        merged.make_mut().root_operations = root_operations;
    }
    Some(merged)
}

#[cfg(test)]
mod tests {
    use apollo_compiler::ast::OperationType;

    use super::*;

    fn parse(sdl: &str) -> Document {
        Document::parse(sdl, "merge.graphql").expect("fixture must parse")
    }

    fn object_types<'a>(doc: &'a Document, name: &str) -> Vec<&'a Node<ObjectTypeDefinition>> {
        doc.definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::ObjectTypeDefinition(object) if object.name.as_str() == name => Some(object),
                _ => None,
            })
            .collect()
    }

    fn field_names(doc: &Document, name: &str) -> Vec<String> {
        let types = object_types(doc, name);
        assert_eq!(types.len(), 1, "expected exactly one `{name}` definition");
        types[0]
            .fields
            .iter()
            .map(|field| field.name.to_string())
            .collect()
    }

    fn schema_entries(doc: &Document) -> Vec<&Node<SchemaDefinition>> {
        doc.definitions
            .iter()
            .filter_map(|definition| match definition {
                Definition::SchemaDefinition(schema) => Some(schema),
                _ => None,
            })
            .collect()
    }

    fn root_operations(schema: &SchemaDefinition) -> Vec<(OperationType, String)> {
        schema
            .root_operations
            .iter()
            .map(|operation| (operation.0, operation.1.to_string()))
            .collect()
    }

    #[test]
    fn test_single_document_is_unchanged() {
        let doc = parse(
            "type Query { user(id: ID!): User }
             type User { id: ID! name: String }
             enum Role { ADMIN USER }
             schema { query: Query }",
        );

        let merged = merge_documents([&doc]);
        assert_eq!(merged.to_string(), doc.to_string());
        assert_eq!(merged.definitions.len(), doc.definitions.len());
    }

    #[test]
    fn test_fields_concatenate_in_input_order() {
        let first = parse("type T { a: Int b: Int }");
        let second = parse("type T { c: Int d: Int }");

        let merged = merge_documents([&first, &second]);
        assert_eq!(field_names(&merged, "T"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicate_field_names_are_kept() {
        let first = parse("type T { a: Int }");
        let second = parse("type T { a: String }");

        let merged = merge_documents([&first, &second]);
        assert_eq!(field_names(&merged, "T"), vec!["a", "a"]);
    }

    #[test]
    fn test_three_way_merge_within_and_across_documents() {
        let first = parse("type T { a: Int } type T { b: Int }");
        let second = parse("type U { x: Int } type T { c: Int }");

        let merged = merge_documents([&first, &second]);
        assert_eq!(field_names(&merged, "T"), vec!["a", "b", "c"]);
        assert_eq!(field_names(&merged, "U"), vec!["x"]);
    }

    #[test]
    fn test_entry_points_union_missing_operations() {
        let first = parse("schema { query: Q } type Q { a: Int }");
        let second = parse("schema { mutation: M } type M { b: Int }");

        let merged = merge_documents([&first, &second]);
        let schemas = schema_entries(&merged);
        assert_eq!(schemas.len(), 1);
        assert_eq!(
            root_operations(schemas[0]),
            vec![
                (OperationType::Query, "Q".to_string()),
                (OperationType::Mutation, "M".to_string()),
            ]
        );
    }

    #[test]
    fn test_entry_point_first_wins_on_conflict() {
        let first = parse("schema { query: Q1 }");
        let second = parse("schema { query: Q2 subscription: S }");

        let merged = merge_documents([&first, &second]);
        let schemas = schema_entries(&merged);
        assert_eq!(schemas.len(), 1);
        assert_eq!(
            root_operations(schemas[0]),
            vec![
                (OperationType::Query, "Q1".to_string()),
                (OperationType::Subscription, "S".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_entry_point_in_output_without_input_entry_point() {
        let doc = parse("type Query { a: Int }");
        let merged = merge_documents([&doc, &doc]);
        assert!(schema_entries(&merged).is_empty());
    }

    #[test]
    fn test_non_participating_definitions_pass_through() {
        let first = parse("enum Color { RED GREEN } type Query { color: Color }");
        let second = parse("interface Node { id: ID! } type Query { node: Node }");

        let merged = merge_documents([&first, &second]);
        let enums: Vec<_> = merged
            .definitions
            .iter()
            .filter(|definition| matches!(definition, Definition::EnumTypeDefinition(_)))
            .collect();
        let interfaces: Vec<_> = merged
            .definitions
            .iter()
            .filter(|definition| matches!(definition, Definition::InterfaceTypeDefinition(_)))
            .collect();

        assert_eq!(enums.len(), 1);
        assert_eq!(interfaces.len(), 1);
        assert_eq!(*enums[0], first.definitions[0]);
        assert_eq!(*interfaces[0], second.definitions[0]);
    }

    #[test]
    fn test_output_order() {
        let first = parse(
            "schema { query: Query }
             type B { b1: Int }
             type Query { q1: Int }
             scalar Date",
        );
        let second = parse(
            "type Query { q2: Int }
             type B { b2: Int }
             type Single { s: Int }
             schema { mutation: Mutation }",
        );

        let merged = merge_documents([&first, &second]);
        let kinds: Vec<String> = merged
            .definitions
            .iter()
            .map(|definition| match definition {
                Definition::SchemaDefinition(_) => "schema".to_string(),
                other => other.name().map(|n| n.to_string()).unwrap_or_default(),
            })
            .collect();

        assert_eq!(kinds, vec!["Date", "Single", "schema", "B", "Query"]);
    }

    #[test]
    fn test_extension_fields_fold_into_duplicated_type() {
        let doc = parse(
            "type Query { a: Int }
             type Query { b: Int }
             extend type Query { c: Int }
             extend type Other { d: Int }",
        );

        let merged = merge_documents([&doc]);
        assert_eq!(field_names(&merged, "Query"), vec!["a", "b", "c"]);
        assert!(
            !merged
                .definitions
                .iter()
                .any(|definition| matches!(definition, Definition::ObjectTypeExtension(ext) if ext.name.as_str() == "Query"))
        );
        assert!(
            merged
                .definitions
                .iter()
                .any(|definition| matches!(definition, Definition::ObjectTypeExtension(ext) if ext.name.as_str() == "Other"))
        );
    }

    #[test]
    fn test_extension_before_duplicates_keeps_scan_order() {
        let first = parse("extend type Query { c: Int }");
        let second = parse("type Query { a: Int } type Query { b: Int } schema { query: Query }");

        let merged = merge_documents([&first, &second]);
        assert_eq!(field_names(&merged, "Query"), vec!["a", "c", "b"]);

        let schema = merged.to_schema_validate().unwrap();
        let fields: Vec<&str> = schema
            .get_object("Query")
            .unwrap()
            .fields
            .keys()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(fields, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let first = parse("type T { a: Int } schema { query: T }");
        let second = parse("type T { b: Int } schema { mutation: T }");
        let before = (first.to_string(), second.to_string());

        let merged = merge_documents([&first, &second]);
        assert_eq!(field_names(&merged, "T"), vec!["a", "b"]);
        assert_eq!((first.to_string(), second.to_string()), before);
    }

    #[test]
    fn test_empty_input() {
        let merged = merge_documents(std::iter::empty());
        assert!(merged.definitions.is_empty());
    }

    #[test]
    fn test_flatten_preserves_order() {
        let first = parse("type A { a: Int } type B { b: Int }");
        let second = parse("type C { c: Int }");

        let names: Vec<String> = flatten([&first, &second])
            .iter()
            .filter_map(|definition| definition.name().map(|n| n.to_string()))
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
