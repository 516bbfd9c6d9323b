//! Reading matched schema files into one source text.

use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use tracing::debug;

use crate::error::Result;

/// Text placed between file contents when concatenating.
///
/// Commas are insignificant tokens in GraphQL, so this parses exactly like
/// direct concatenation while keeping a file that ends mid-token (no
/// trailing newline) from running into the next one.
pub const SOURCE_SEPARATOR: &str = ",";

/// Reads every file concurrently and concatenates the contents in the order
/// of `paths`.
///
/// All reads are issued before any is awaited. The first failure is
/// returned and the remaining results are discarded.
pub async fn read_sources(paths: &[PathBuf]) -> Result<String> {
    let reads = paths.iter().map(|path| read_one(path));
    let contents = try_join_all(reads).await?;
    debug!(files = contents.len(), "Read schema sources");
    Ok(concat_sources(&contents))
}

/// Reads every file in order on the calling thread and concatenates the
/// contents. Stops at the first unreadable file.
pub fn read_sources_sync(paths: &[PathBuf]) -> Result<String> {
    let contents = paths
        .iter()
        .map(std::fs::read_to_string)
        .collect::<std::io::Result<Vec<_>>>()?;
    debug!(files = contents.len(), "Read schema sources");
    Ok(concat_sources(&contents))
}

/// Joins file contents with [`SOURCE_SEPARATOR`].
pub fn concat_sources<S: AsRef<str>>(contents: &[S]) -> String {
    let mut text = String::with_capacity(
        contents.iter().map(|c| c.as_ref().len() + 1).sum::<usize>(),
    );
    for (index, content) in contents.iter().enumerate() {
        if index > 0 {
            text.push_str(SOURCE_SEPARATOR);
        }
        text.push_str(content.as_ref());
    }
    text
}

async fn read_one(path: &Path) -> std::io::Result<String> {
    tokio::fs::read_to_string(path).await
}
