//! Definition classification and duplicate grouping.
//!
//! The merger only cares about three kinds of top-level definition: object
//! types, schema entry points, and everything else. [`classify`] collapses an
//! [`ast::Definition`](Definition) into a [`DefinitionKind`] so the merge step
//! can match on it exhaustively.
//!
//! # Examples
//!
//! ```
//! use apollo_compiler::ast::Document;
//! use graphql_loader_core::{DefinitionKind, classify, find_duplicate_object_types};
//!
//! let doc = Document::parse(
//!     "type Query { a: Int } enum Color { RED } type Query { b: Int }",
//!     "doc.graphql",
//! )
//! .unwrap();
//!
//! assert!(matches!(classify(&doc.definitions[1]), DefinitionKind::Other(_)));
//!
//! let duplicates = find_duplicate_object_types(&doc.definitions);
//! assert!(duplicates.contains("Query"));
//! assert!(!duplicates.contains("Color"));
//! ```

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast::{Definition, ObjectTypeDefinition, SchemaDefinition};
use indexmap::IndexMap;

/// The merge-relevant kind of a top-level definition.
#[derive(Debug, Clone, Copy)]
pub enum DefinitionKind<'a> {
    /// `type Name { ... }`, merged by name.
    ObjectType(&'a Node<ObjectTypeDefinition>),
    /// `schema { query: ... }`, collapsed into a single entry point.
    SchemaEntry(&'a Node<SchemaDefinition>),
    /// Interfaces, enums, unions, scalars, inputs, directives, extensions and
    /// executable definitions. Passed through unchanged.
    Other(&'a Definition),
}

/// Classifies a definition for merging.
pub fn classify(definition: &Definition) -> DefinitionKind<'_> {
    match definition {
        Definition::ObjectTypeDefinition(object) => DefinitionKind::ObjectType(object),
        Definition::SchemaDefinition(schema) => DefinitionKind::SchemaEntry(schema),
        other => DefinitionKind::Other(other),
    }
}

/// First occurrence of an object type whose name is defined more than once.
#[derive(Debug, Clone)]
pub struct Survivor {
    /// Position of the first occurrence in the flattened definition list.
    pub index: usize,
    /// The first occurrence itself.
    pub definition: Node<ObjectTypeDefinition>,
}

/// Object type names that occur at least twice, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DuplicateGroups {
    survivors: IndexMap<Name, Survivor>,
}

impl DuplicateGroups {
    /// Returns `true` if `name` is defined by two or more object types.
    pub fn contains(&self, name: &str) -> bool {
        self.survivors.contains_key(name)
    }

    /// Returns the number of duplicated names.
    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    /// Returns `true` if no object type name is duplicated.
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }

    /// Duplicated names in the order they were first detected.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.survivors.keys().map(|name| name.as_str())
    }

    /// Surviving (first-seen) definitions, one per duplicated name.
    pub fn survivors(&self) -> impl Iterator<Item = &Survivor> {
        self.survivors.values()
    }
}

/// Groups object type definitions by name and keeps the names that appear
/// two or more times.
///
/// Each duplicated name maps to its first occurrence in scan order; names are
/// ordered by the position of that first occurrence.
pub fn find_duplicate_object_types(definitions: &[Definition]) -> DuplicateGroups {
    let mut occurrences: IndexMap<&Name, (Survivor, usize)> = IndexMap::new();

    for (index, definition) in definitions.iter().enumerate() {
        if let DefinitionKind::ObjectType(object) = classify(definition) {
            occurrences
                .entry(&object.name)
                .or_insert_with(|| {
                    (
                        Survivor {
                            index,
                            definition: object.clone(),
                        },
                        0,
                    )
                })
                .1 += 1;
        }
    }

    let survivors = occurrences
        .into_iter()
        .filter(|(_, (_, count))| *count >= 2)
        .map(|(name, (survivor, _))| (name.clone(), survivor))
        .collect();

    DuplicateGroups { survivors }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::ast::Document;

    use super::*;

    fn parse(sdl: &str) -> Document {
        Document::parse(sdl, "classify.graphql").expect("fixture must parse")
    }

    #[test]
    fn test_classify_kinds() {
        let doc = parse(
            "schema { query: Query }
             type Query { a: Int }
             interface Node { id: ID! }
             extend type Query { b: Int }",
        );

        assert!(matches!(
            classify(&doc.definitions[0]),
            DefinitionKind::SchemaEntry(_)
        ));
        assert!(matches!(
            classify(&doc.definitions[1]),
            DefinitionKind::ObjectType(_)
        ));
        assert!(matches!(
            classify(&doc.definitions[2]),
            DefinitionKind::Other(_)
        ));
        assert!(matches!(
            classify(&doc.definitions[3]),
            DefinitionKind::Other(_)
        ));
    }

    #[test]
    fn test_no_duplicates() {
        let doc = parse("type A { a: Int } type B { b: Int }");
        let duplicates = find_duplicate_object_types(&doc.definitions);
        assert!(duplicates.is_empty());
        assert_eq!(duplicates.len(), 0);
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let doc = parse(
            "type B { one: Int }
             type A { two: Int }
             type A { three: Int }
             type B { four: Int }
             type C { five: Int }",
        );

        let duplicates = find_duplicate_object_types(&doc.definitions);
        assert_eq!(duplicates.names().collect::<Vec<_>>(), vec!["B", "A"]);
        assert!(!duplicates.contains("C"));

        let indexes: Vec<usize> = duplicates.survivors().map(|s| s.index).collect();
        assert_eq!(indexes, vec![0, 1]);

        let first_b = duplicates.survivors().next().unwrap();
        assert_eq!(first_b.definition.fields[0].name.as_str(), "one");
    }

    #[test]
    fn test_same_name_of_other_kind_is_not_a_duplicate() {
        let doc = parse("type Thing { a: Int } interface Thing { a: Int }");
        let duplicates = find_duplicate_object_types(&doc.definitions);
        assert!(duplicates.is_empty());
    }
}
