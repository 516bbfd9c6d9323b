//! Glob pattern resolution.

use std::path::PathBuf;

use tracing::debug;

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};

/// Resolves `pattern` to the list of files it matches.
///
/// Paths come back in the glob crate's order (sorted within each directory
/// level), which is also the order their contents are concatenated in.
/// Directories that happen to match are skipped.
///
/// # Errors
///
/// Returns [`LoaderError::PatternMatch`] carrying `pattern` unchanged when no
/// file matches, [`LoaderError::InvalidPattern`] for malformed glob syntax,
/// and [`LoaderError::FileRead`] when a directory cannot be walked.
pub fn resolve_pattern(pattern: &str, config: &LoaderConfig) -> Result<Vec<PathBuf>> {
    let effective = config.effective_pattern(pattern);
    let mut files = Vec::new();

    for entry in glob::glob_with(&effective, config.match_options())? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(LoaderError::zero_matches(pattern));
    }

    debug!(pattern, effective = %effective, files = files.len(), "Resolved schema pattern");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_resolve_sorted_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.graphql"), "type B { b: Int }").unwrap();
        fs::write(dir.path().join("a.graphql"), "type A { a: Int }").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let config = LoaderConfig {
            cwd: Some(dir.path().to_path_buf()),
            ..LoaderConfig::default()
        };
        let files = resolve_pattern("*.graphql", &config).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.graphql", "b.graphql"]);
    }

    #[test]
    fn test_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.graphql")).unwrap();
        fs::write(dir.path().join("schema.graphql"), "scalar Date").unwrap();

        let config = LoaderConfig {
            cwd: Some(dir.path().to_path_buf()),
            ..LoaderConfig::default()
        };
        let files = resolve_pattern("*.graphql", &config).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("schema.graphql"));
    }

    #[test]
    fn test_zero_matches_names_original_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoaderConfig {
            cwd: Some(dir.path().to_path_buf()),
            ..LoaderConfig::default()
        };

        let err = resolve_pattern("./error/*.graphql", &config).unwrap_err();
        match err {
            LoaderError::PatternMatch { pattern } => assert_eq!(pattern, "./error/*.graphql"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let err = resolve_pattern("schema/[*.graphql", &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidPattern(_)));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Schema.GraphQL"), "scalar Date").unwrap();

        let sensitive = LoaderConfig {
            cwd: Some(dir.path().to_path_buf()),
            ..LoaderConfig::default()
        };
        assert!(resolve_pattern("*.graphql", &sensitive).is_err());

        let insensitive = LoaderConfig {
            case_sensitive: false,
            ..sensitive
        };
        assert_eq!(resolve_pattern("*.graphql", &insensitive).unwrap().len(), 1);
    }
}
