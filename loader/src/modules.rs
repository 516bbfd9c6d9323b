//! Building an executable schema from self-contained modules.
//!
//! A module pairs a parsed document with the resolvers for the types it
//! defines. Modules may be given directly or as producers that build the
//! module (or a future of it) on demand.
//!
//! # Example
//!
//! ```
//! use graphql_loader::{
//!     GraphQLModule, ModuleSource, ResolverMap, executable_schema_from_modules, parse_document,
//! };
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> graphql_loader::Result<()> {
//! let users = GraphQLModule::new(parse_document("type Query { user: String }", "users.graphql")?)
//!     .with_resolvers(ResolverMap::new().field("Query", "user", |_, _| json!("ada")));
//!
//! let posts = ModuleSource::deferred(|| async {
//!     let document = parse_document("type Query { post: String }", "posts.graphql")?;
//!     Ok::<_, graphql_loader::LoaderError>(GraphQLModule::new(document))
//! });
//!
//! let executable = executable_schema_from_modules(vec![users.into(), posts]).await?;
//! assert_eq!(executable.schema().get_object("Query").unwrap().fields.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use apollo_compiler::ast::Document;
use futures::FutureExt;
use futures::future::{BoxFuture, try_join_all};
use tracing::debug;

use crate::error::{BoxError, LoaderError, Result};
use crate::loader::combine_documents;
use crate::resolvers::{ExecutableSchema, ResolverMap};

/// A schema fragment and the resolvers for it.
#[derive(Debug, Clone)]
pub struct GraphQLModule {
    /// Type-system definitions contributed by the module.
    pub document: Document,
    /// Resolvers for the types the module defines.
    pub resolvers: ResolverMap,
}

impl GraphQLModule {
    /// Creates a module without resolvers.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            resolvers: ResolverMap::new(),
        }
    }

    /// Sets the module's resolvers.
    pub fn with_resolvers(mut self, resolvers: ResolverMap) -> Self {
        self.resolvers = resolvers;
        self
    }
}

/// Pending module computation.
pub type ModuleFuture = BoxFuture<'static, std::result::Result<GraphQLModule, BoxError>>;

/// What a module producer returns.
pub enum Produced {
    /// The module is available immediately.
    Ready(GraphQLModule),
    /// The module will be available once the future completes.
    Pending(ModuleFuture),
}

/// A module, or a zero-argument producer of one.
pub enum ModuleSource {
    /// A module available up front.
    Module(GraphQLModule),
    /// A closure invoked once when the schema is built.
    Producer(Box<dyn FnOnce() -> Produced + Send>),
}

impl ModuleSource {
    /// Wraps a closure that builds a module synchronously.
    pub fn producer<F>(f: F) -> Self
    where
        F: FnOnce() -> GraphQLModule + Send + 'static,
    {
        Self::Producer(Box::new(move || Produced::Ready(f())))
    }

    /// Wraps a closure that returns a future of a module.
    ///
    /// Any error type convertible into [`BoxError`] is accepted, including
    /// [`LoaderError`].
    pub fn deferred<F, Fut, E>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<GraphQLModule, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self::Producer(Box::new(move || {
            Produced::Pending(f().map(|result| result.map_err(Into::into)).boxed())
        }))
    }

    fn start(self) -> ModuleFuture {
        match self {
            Self::Module(module) => futures::future::ready(Ok(module)).boxed(),
            Self::Producer(produce) => match produce() {
                Produced::Ready(module) => futures::future::ready(Ok(module)).boxed(),
                Produced::Pending(future) => future,
            },
        }
    }
}

impl From<GraphQLModule> for ModuleSource {
    fn from(module: GraphQLModule) -> Self {
        Self::Module(module)
    }
}

/// Builds an executable schema from modules.
///
/// Every producer is invoked up front and all pending modules are awaited
/// together. Documents are merged and compiled with
/// [`combine_documents`](crate::combine_documents); resolver mappings are
/// deep-merged in module order, so later modules override earlier ones at
/// matching keys.
///
/// # Errors
///
/// Returns [`LoaderError::Module`] for the first module that fails to
/// produce (the others are discarded), or any compile or resolver attachment
/// error.
pub async fn executable_schema_from_modules(modules: Vec<ModuleSource>) -> Result<ExecutableSchema> {
    let pending: Vec<ModuleFuture> = modules.into_iter().map(ModuleSource::start).collect();
    let modules = try_join_all(pending).await.map_err(LoaderError::Module)?;

    debug!(modules = modules.len(), "Resolved schema modules");

    let schema = combine_documents(modules.iter().map(|module| &module.document))?;
    let resolvers = modules
        .into_iter()
        .fold(ResolverMap::new(), |merged, module| merged.deep_merge(module.resolvers));

    ExecutableSchema::attach_resolvers(schema, resolvers)
}
