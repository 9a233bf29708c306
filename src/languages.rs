//! Extension to language lookup.
//!
//! The table is built once from a dataset keyed by language name, each entry
//! carrying an `extensions` list. When several languages claim the same
//! extension the one whose name sorts first wins; that choice is a tie-break,
//! not a claim about which language the file really is.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::TlocError;

/// Language reported for files whose extension is not in the table, and for
/// files that could not be read at all.
pub const UNSUPPORTED_FILE: &str = "Unsupported File";

const BUNDLED_LANGUAGES: &str = include_str!("languages.json");

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    #[serde(default)]
    extensions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    by_extension: HashMap<String, String>,
}

impl LanguageTable {
    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self, TlocError> {
        Self::from_json(BUNDLED_LANGUAGES)
    }

    pub fn from_json(json: &str) -> Result<Self, TlocError> {
        // BTreeMap iteration order is what makes the tie-break deterministic.
        let entries: BTreeMap<String, LanguageEntry> = serde_json::from_str(json)?;
        let mut by_extension = HashMap::new();
        for (language, entry) in entries {
            for ext in entry.extensions {
                by_extension.entry(ext).or_insert_with(|| language.clone());
            }
        }
        Ok(LanguageTable { by_extension })
    }

    /// Exact, case-sensitive lookup of an extension including its leading dot.
    pub fn language_for_extension(&self, ext: &str) -> Option<&str> {
        self.by_extension.get(ext).map(String::as_str)
    }

    /// Language for a path, or [`UNSUPPORTED_FILE`].
    pub fn classify_path(&self, path: &Path) -> &str {
        extension_of(path)
            .and_then(|ext| self.language_for_extension(&ext))
            .unwrap_or(UNSUPPORTED_FILE)
    }

    /// Number of distinct extensions in the index.
    pub fn len(&self) -> usize {
        self.by_extension.len()
    }
}

/// Extension of the final path component, with its leading dot.
///
/// Leading dots of the file name do not start an extension, so `.bashrc`
/// has none while `archive.tar.gz` has `.gz`.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let stem_start = name.len() - name.trim_start_matches('.').len();
    let (_stem, ext) = name[stem_start..].rsplit_once('.')?;
    Some(format!(".{}", ext))
}
