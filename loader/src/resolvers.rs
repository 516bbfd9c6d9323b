//! Resolver mappings and their attachment to a compiled schema.
//!
//! A [`ResolverMap`] maps type names to field mappings whose leaves are
//! resolver functions. Mappings from several modules are combined with
//! [`ResolverMap::deep_merge`] and bound to a schema with
//! [`ExecutableSchema::attach_resolvers`].
//!
//! # Example
//!
//! ```
//! use graphql_loader::{ExecutableSchema, ResolverMap, combine_documents, parse_document};
//! use serde_json::json;
//!
//! let document = parse_document("type Query { hello: String }", "hello.graphql").unwrap();
//! let schema = combine_documents([&document]).unwrap();
//!
//! let resolvers = ResolverMap::new().field("Query", "hello", |_, _| json!("world"));
//! let executable = ExecutableSchema::attach_resolvers(schema, resolvers).unwrap();
//!
//! let value = executable.resolve("Query", "hello", &json!(null), &Default::default());
//! assert_eq!(value, Some(json!("world")));
//! ```

use std::fmt;
use std::sync::Arc;

use apollo_compiler::Schema;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{LoaderError, Result};

/// A resolver function: `(parent value, field arguments) -> field value`.
pub type ResolverFn = Arc<dyn Fn(&Value, &Map<String, Value>) -> Value + Send + Sync>;

/// Key under which a nested field mapping holds its resolver function.
pub const RESOLVE_KEY: &str = "resolve";

/// A single entry of a [`ResolverMap`].
#[derive(Clone)]
pub enum Resolver {
    /// Leaf resolver function.
    Field(ResolverFn),
    /// Nested mapping (a type's fields, or a field's `resolve`/`subscribe`).
    Nested(ResolverMap),
}

impl Resolver {
    /// Wraps a closure as a leaf resolver.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value, &Map<String, Value>) -> Value + Send + Sync + 'static,
    {
        Self::Field(Arc::new(f))
    }

    /// Returns the nested mapping, if this entry is one.
    pub fn as_map(&self) -> Option<&ResolverMap> {
        match self {
            Self::Nested(map) => Some(map),
            Self::Field(_) => None,
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(_) => f.write_str("Field(<fn>)"),
            Self::Nested(map) => f.debug_tuple("Nested").field(map).finish(),
        }
    }
}

impl From<ResolverMap> for Resolver {
    fn from(map: ResolverMap) -> Self {
        Self::Nested(map)
    }
}

/// Ordered mapping of names to resolvers.
#[derive(Debug, Clone, Default)]
pub struct ResolverMap {
    entries: IndexMap<String, Resolver>,
}

impl ResolverMap {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any existing entry with the same key.
    pub fn insert(&mut self, key: impl Into<String>, resolver: impl Into<Resolver>) {
        self.entries.insert(key.into(), resolver.into());
    }

    /// Adds a resolver for `type_name.field_name`, creating the type's field
    /// mapping if needed.
    pub fn field<F>(mut self, type_name: &str, field_name: &str, f: F) -> Self
    where
        F: Fn(&Value, &Map<String, Value>) -> Value + Send + Sync + 'static,
    {
        let fields = match self.entries.entry(type_name.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Resolver::Nested(ResolverMap::new())),
        };
        match fields {
            Resolver::Nested(map) => {
                map.insert(field_name, Resolver::function(f));
            }
            leaf @ Resolver::Field(_) => {
                let mut map = ResolverMap::new();
                map.insert(field_name, Resolver::function(f));
                *leaf = Resolver::Nested(map);
            }
        }
        self
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &str) -> Option<&Resolver> {
        self.entries.get(key)
    }

    /// Returns the number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolver)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Recursively merges `other` into `self`.
    ///
    /// Keys only in `other` are appended. Where both sides hold a nested
    /// mapping the two are merged recursively; otherwise `other` wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphql_loader::ResolverMap;
    /// use serde_json::json;
    ///
    /// let users = ResolverMap::new().field("Query", "user", |_, _| json!("u"));
    /// let posts = ResolverMap::new().field("Query", "post", |_, _| json!("p"));
    ///
    /// let merged = users.deep_merge(posts);
    /// let query = merged.get("Query").unwrap().as_map().unwrap();
    /// assert_eq!(query.len(), 2);
    /// ```
    pub fn deep_merge(mut self, other: ResolverMap) -> Self {
        for (key, incoming) in other.entries {
            match self.entries.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(incoming);
                }
                Entry::Occupied(mut entry) => {
                    let merged = match (entry.get().clone(), incoming) {
                        (Resolver::Nested(current), Resolver::Nested(incoming)) => {
                            Resolver::Nested(current.deep_merge(incoming))
                        }
                        (_, incoming) => incoming,
                    };
                    entry.insert(merged);
                }
            }
        }
        self
    }
}

impl FromIterator<(String, Resolver)> for ResolverMap {
    fn from_iter<T: IntoIterator<Item = (String, Resolver)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A compiled schema with resolver functions bound to it.
#[derive(Debug, Clone)]
pub struct ExecutableSchema {
    schema: Valid<Schema>,
    resolvers: ResolverMap,
}

impl ExecutableSchema {
    /// Binds `resolvers` to `schema`.
    ///
    /// Every top-level key must name a type in the schema and hold a field
    /// mapping. Keys of object, interface and input object mappings must be
    /// fields; keys of enum mappings must be enum values; scalar and union
    /// mappings are accepted as-is. Keys starting with `__` (for example
    /// `__resolveType`) are accepted on every type.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnknownResolverType`],
    /// [`LoaderError::UnknownResolverField`] or
    /// [`LoaderError::InvalidResolverShape`] for the first offending entry.
    pub fn attach_resolvers(schema: Valid<Schema>, resolvers: ResolverMap) -> Result<Self> {
        for (type_name, entry) in resolvers.iter() {
            let Some(ty) = schema.types.get(type_name) else {
                return Err(LoaderError::UnknownResolverType {
                    type_name: type_name.to_string(),
                });
            };
            let Resolver::Nested(fields) = entry else {
                return Err(LoaderError::InvalidResolverShape {
                    type_name: type_name.to_string(),
                });
            };

            for (field_name, _) in fields.iter() {
                if field_name.starts_with("__") || has_member(ty, field_name) {
                    continue;
                }
                return Err(LoaderError::UnknownResolverField {
                    type_name: type_name.to_string(),
                    field_name: field_name.to_string(),
                });
            }
        }

        debug!(types = resolvers.len(), "Attached resolvers");
        Ok(Self { schema, resolvers })
    }

    /// Calls the resolver bound to `type_name.field_name`.
    ///
    /// Returns `None` when no resolver is bound, in which case a default
    /// resolver would read the field off `parent`.
    pub fn resolve(
        &self,
        type_name: &str,
        field_name: &str,
        parent: &Value,
        args: &Map<String, Value>,
    ) -> Option<Value> {
        let fields = self.resolvers.get(type_name)?.as_map()?;
        let resolver = match fields.get(field_name)? {
            Resolver::Field(f) => f,
            Resolver::Nested(config) => match config.get(RESOLVE_KEY)? {
                Resolver::Field(f) => f,
                Resolver::Nested(_) => return None,
            },
        };
        Some(resolver(parent, args))
    }

    /// Returns `true` if a resolver is bound for `type_name.field_name`.
    pub fn has_resolver(&self, type_name: &str, field_name: &str) -> bool {
        self.resolvers
            .get(type_name)
            .and_then(Resolver::as_map)
            .is_some_and(|fields| fields.get(field_name).is_some())
    }

    /// The compiled schema.
    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    /// The bound resolver mapping.
    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    /// Splits into the compiled schema and its resolvers.
    pub fn into_parts(self) -> (Valid<Schema>, ResolverMap) {
        (self.schema, self.resolvers)
    }
}

fn has_member(ty: &ExtendedType, name: &str) -> bool {
    match ty {
        ExtendedType::Object(object) => object.fields.contains_key(name),
        ExtendedType::Interface(interface) => interface.fields.contains_key(name),
        ExtendedType::InputObject(input) => input.fields.contains_key(name),
        ExtendedType::Enum(enum_type) => enum_type.values.contains_key(name),
        _ => true,
    }
}
