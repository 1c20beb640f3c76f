//! Processing options.
//!
//! Options come from a camelCase JSON object; every field is optional.
//!
//! ```json
//! { "citationId": "WEBIDL", "autofix": false, "informativeClasses": ["note"] }
//! ```

use std::path::{Path, PathBuf};

use idlref_xref::XrefOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`citationId` must not be empty")]
    EmptyCitationId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProcessOptions {
    /// Vocabulary that IDL keywords and generic types are cited from.
    pub citation_id: String,
    /// Turn names without an existing `<dfn>` into definitions.
    pub synthesize_definitions: bool,
    pub validate: bool,
    pub autofix: bool,
    pub xref: bool,
    /// Classes that mark a region informative. `<figure>` always does.
    pub informative_classes: Vec<String>,
    pub dedupe_queries: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        let xref = XrefOptions::default();
        Self {
            citation_id: "WEBIDL".to_string(),
            synthesize_definitions: true,
            validate: true,
            autofix: true,
            xref: true,
            informative_classes: xref.informative_classes,
            dedupe_queries: xref.dedupe_queries,
        }
    }
}

impl ProcessOptions {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(text)?;
        options.check()?;
        Ok(options)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.citation_id.trim().is_empty() {
            return Err(ConfigError::EmptyCitationId);
        }
        Ok(())
    }

    pub fn xref_options(&self) -> XrefOptions {
        XrefOptions {
            informative_classes: self.informative_classes.clone(),
            dedupe_queries: self.dedupe_queries,
        }
    }
}
