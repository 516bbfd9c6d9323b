//! Loader configuration.
//!
//! Holds the matcher options handed to the glob resolver. The merge logic
//! never looks at these; they only change which files a pattern selects.
//!
//! # Example YAML
//!
//! ```yaml
//! cwd: services/api/schema
//! case_sensitive: true
//! require_literal_separator: false
//! require_literal_leading_dot: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Conventional configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".graphql-loader.yml";

/// Matcher options for resolving schema file patterns.
///
/// Every field is optional in YAML; omitted fields take the same defaults as
/// [`glob::MatchOptions::new`].
///
/// # Examples
///
/// ```
/// use graphql_loader::LoaderConfig;
///
/// let config: LoaderConfig = serde_yaml::from_str("case_sensitive: false").unwrap();
/// assert!(!config.case_sensitive);
/// assert!(config.cwd.is_none());
/// assert!(!config.match_options().case_sensitive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory relative patterns are resolved against (defaults to the
    /// process working directory).
    pub cwd: Option<PathBuf>,
    /// Match letters case-sensitively.
    pub case_sensitive: bool,
    /// Require `/` in the path to be matched by a literal `/`.
    pub require_literal_separator: bool,
    /// Require a leading `.` in a file name to be matched literally.
    pub require_literal_leading_dot: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let options = glob::MatchOptions::new();
        Self {
            cwd: None,
            case_sensitive: options.case_sensitive,
            require_literal_separator: options.require_literal_separator,
            require_literal_leading_dot: options.require_literal_leading_dot,
        }
    }
}

impl LoaderConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`FileRead`](crate::LoaderError::FileRead) if the file cannot
    /// be read, or [`Config`](crate::LoaderError::Config) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FileRead`](crate::LoaderError::FileRead) if the file cannot
    /// be written, or [`Config`](crate::LoaderError::Config) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Converts the matcher flags into [`glob::MatchOptions`].
    pub fn match_options(&self) -> glob::MatchOptions {
        glob::MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: self.require_literal_separator,
            require_literal_leading_dot: self.require_literal_leading_dot,
        }
    }

    /// Returns the pattern to hand to the glob resolver.
    ///
    /// Relative patterns are prefixed with the escaped `cwd` override when one
    /// is set; absolute patterns and patterns without an override are
    /// returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphql_loader::LoaderConfig;
    ///
    /// let config = LoaderConfig {
    ///     cwd: Some("schema[v2]".into()),
    ///     ..LoaderConfig::default()
    /// };
    /// assert_eq!(config.effective_pattern("*.graphql"), "schema[[]v2[]]/*.graphql");
    /// assert_eq!(LoaderConfig::default().effective_pattern("*.graphql"), "*.graphql");
    /// ```
    pub fn effective_pattern(&self, pattern: &str) -> String {
        match &self.cwd {
            Some(cwd) if !Path::new(pattern).is_absolute() => {
                let base = glob::Pattern::escape(&cwd.to_string_lossy());
                let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
                if base.ends_with('/') {
                    format!("{base}{pattern}")
                } else {
                    format!("{base}/{pattern}")
                }
            }
            _ => pattern.to_string(),
        }
    }
}
