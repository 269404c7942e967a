//! MXT Template Library
//!
//! A directory of `.mt` files, each holding one master template as JSON. The
//! template id is the file name without its extension.
//!
//! # Example
//!
//! ```rust,ignore
//! use mxt_library::TemplateLibrary;
//!
//! let library = TemplateLibrary::new("templates");
//! for entry in library.list().await? {
//!     println!("{}  {}", entry.id, entry.name);
//! }
//! let baseline = library.load("baseline-simple").await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod naming;

pub use error::LibraryError;
pub use naming::{display_name, output_file_name, KNOWN_NAMES};

use mxt_model::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Extension of template files
pub const TEMPLATE_EXTENSION: &str = "mt";

/// One template available in the library
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub id: String,
    pub name: String,
    pub filename: String,
}

/// Templates stored under one directory
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    root: PathBuf,
    names: BTreeMap<String, String>,
}

impl TemplateLibrary {
    /// Open a library rooted at `root`, using the built-in display names
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            names: KNOWN_NAMES
                .iter()
                .map(|(id, name)| ((*id).to_string(), (*name).to_string()))
                .collect(),
        }
    }

    /// Override the display name of one template
    #[must_use]
    pub fn with_display_name(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(id.into(), name.into());
        self
    }

    /// Library directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Display name for `id`: configured name, or one derived from the id
    #[must_use]
    pub fn name_of(&self, id: &str) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| display_name(id))
    }

    /// Every `.mt` file in the directory, sorted by id
    ///
    /// # Errors
    /// Returns error if the directory cannot be read
    pub async fn list(&self) -> Result<Vec<TemplateEntry>, LibraryError> {
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|source| LibraryError::io(&self.root, source))?;

        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|source| LibraryError::io(&self.root, source))?
        {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            entries.push(TemplateEntry {
                id: id.to_string(),
                name: self.name_of(id),
                filename: item.file_name().to_string_lossy().into_owned(),
            });
        }
        entries.sort();
        tracing::debug!("Found {} templates in {}", entries.len(), self.root.display());
        Ok(entries)
    }

    /// Path of the template with `id`
    ///
    /// # Errors
    /// Returns `InvalidId` for ids that would escape the library directory
    pub fn path_of(&self, id: &str) -> Result<PathBuf, LibraryError> {
        check_id(id)?;
        Ok(self.root.join(format!("{id}.{TEMPLATE_EXTENSION}")))
    }

    /// Load and parse the template with `id`
    ///
    /// # Errors
    /// - `NotFound` if no such file exists
    /// - `Parse` if the file is not a template
    pub async fn load(&self, id: &str) -> Result<Document, LibraryError> {
        let path = self.path_of(id)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LibraryError::NotFound(id.to_string()));
            }
            Err(source) => return Err(LibraryError::io(&path, source)),
        };
        let document = Document::from_slice(&bytes).map_err(|source| LibraryError::Parse {
            id: id.to_string(),
            source,
        })?;
        tracing::info!("Loaded template {} ({})", id, document.title());
        Ok(document)
    }
}

/// Write `document` as pretty JSON to `dir/file_name`, creating `dir` if needed
///
/// # Errors
/// Returns error if serialization or any filesystem step fails
pub async fn save(dir: &Path, file_name: &str, document: &Document) -> Result<PathBuf, LibraryError> {
    check_id(file_name)?;
    let json = document.to_json_pretty().map_err(LibraryError::Serialize)?;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| LibraryError::io(dir, source))?;

    let path = dir.join(file_name);
    tokio::fs::write(&path, json)
        .await
        .map_err(|source| LibraryError::io(&path, source))?;
    tracing::info!("Saved template to {}", path.display());
    Ok(path)
}

fn check_id(id: &str) -> Result<(), LibraryError> {
    let escapes = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\'])
        || id.contains('\0');
    if escapes {
        return Err(LibraryError::InvalidId(id.to_string()));
    }
    Ok(())
}
