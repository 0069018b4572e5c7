//! Uploaded icons and the registry that holds them.
//!
//! This module provides the input file type, the derived-name rules that
//! turn a filename into a selector-safe identifier, and the ordered
//! [`IconRegistry`] that enforces name uniqueness.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{MasqueError, Result};
use crate::preview::{PreviewBackend, PreviewHandle};

/// Media type browsers report for SVG files.
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Character substituted for anything outside `[a-z0-9]` in derived names.
pub const NAME_SEPARATOR: char = '-';

// ============================================================================
// Name Derivation
// ============================================================================

/// Derives the selector-safe icon name from a filename.
///
/// A trailing `.svg` (any case) is stripped, the rest is lowercased and every
/// character outside `[a-z0-9]` becomes [`NAME_SEPARATOR`], one for one.
/// Characters are Unicode scalar values, so a character outside the Basic
/// Multilingual Plane (most emoji) yields one separator, not the two that a
/// UTF-16 code unit mapping would produce.
///
/// ```
/// assert_eq!(masque::derive_name("My Icon.SVG"), "my-icon");
/// assert_eq!(masque::derive_name("arrow_left.svg"), "arrow-left");
/// ```
pub fn derive_name(filename: &str) -> String {
    strip_svg_extension(filename)
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                NAME_SEPARATOR
            }
        })
        .collect()
}

fn strip_svg_extension(filename: &str) -> &str {
    if has_svg_extension(filename) {
        // The last four bytes are ASCII, so this is a char boundary.
        &filename[..filename.len() - 4]
    } else {
        filename
    }
}

fn has_svg_extension(filename: &str) -> bool {
    let bytes = filename.as_bytes();
    bytes.len() >= 4 && bytes[bytes.len() - 4..].eq_ignore_ascii_case(b".svg")
}

/// Returns true if the declared media type or the filename marks an SVG.
pub fn is_svg(filename: &str, media_type: &str) -> bool {
    media_type == SVG_MEDIA_TYPE || has_svg_extension(filename)
}

// ============================================================================
// UploadedFile
// ============================================================================

/// A user-supplied file: name, declared media type, and content.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    media_type: String,
    content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content,
        }
    }

    /// Reads a file from disk, guessing the media type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|source| MasqueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = media_type_for(&name);
        Ok(Self::new(name, media_type, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns true if this file is accepted as an SVG upload.
    pub fn is_svg(&self) -> bool {
        is_svg(&self.name, &self.media_type)
    }
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("bytes", &self.content.len())
            .finish()
    }
}

fn media_type_for(filename: &str) -> &'static str {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("svg") => SVG_MEDIA_TYPE,
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// IconEntry
// ============================================================================

/// One accepted icon.
#[derive(Debug)]
pub struct IconEntry {
    name: String,
    original_filename: String,
    preview: PreviewHandle,
}

impl IconEntry {
    /// The derived, selector-safe name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filename as uploaded.
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// The preview URL for on-screen rendering. Never part of generated code.
    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

// ============================================================================
// Rejection
// ============================================================================

/// Why an upload was not added to the registry.
///
/// Rejections are absorbed by the session; they exist so callers and tests
/// can tell the cases apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Neither the media type nor the extension marks an SVG.
    NotSvg,
    /// An icon with the same derived name is already registered.
    Duplicate(String),
    /// The preview backend refused to allocate a handle.
    PreviewUnavailable(String),
}

// ============================================================================
// IconRegistry
// ============================================================================

/// Insertion-ordered collection of icons with unique derived names.
///
/// Entries own their preview handles; dropping an entry (on [`clear`] or when
/// the registry is dropped) releases its handle.
///
/// [`clear`]: IconRegistry::clear
pub struct IconRegistry {
    entries: Vec<IconEntry>,
    previews: Rc<dyn PreviewBackend>,
    version: u64,
}

impl IconRegistry {
    /// Creates an empty registry allocating previews from `previews`.
    pub fn new(previews: Rc<dyn PreviewBackend>) -> Self {
        Self {
            entries: Vec::new(),
            previews,
            version: 0,
        }
    }

    /// Submits one file.
    ///
    /// Non-SVG inputs and duplicate names are rejected without touching the
    /// registry. Otherwise a preview handle is acquired and the new entry is
    /// appended.
    pub fn submit(&mut self, file: UploadedFile) -> std::result::Result<&IconEntry, Rejection> {
        if !file.is_svg() {
            debug!(file = file.name(), media_type = file.media_type(), "ignoring non-SVG upload");
            return Err(Rejection::NotSvg);
        }

        let name = derive_name(file.name());
        if self.contains(&name) {
            debug!(file = file.name(), name = %name, "ignoring upload with duplicate name");
            return Err(Rejection::Duplicate(name));
        }

        let preview = match PreviewHandle::acquire(&self.previews, &file) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(file = file.name(), "{err}");
                return Err(Rejection::PreviewUnavailable(err.to_string()));
            }
        };

        debug!(file = file.name(), name = %name, "icon added");
        self.version = self.version.wrapping_add(1);
        self.entries.push(IconEntry {
            name,
            original_filename: file.name,
            preview,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Submits files in order. Returns true if at least one was added.
    pub fn submit_batch(&mut self, files: impl IntoIterator<Item = UploadedFile>) -> bool {
        let mut has_changes = false;
        for file in files {
            has_changes |= self.submit(file).is_ok();
        }
        has_changes
    }

    /// Releases every preview handle and empties the registry.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        // Dropping the entries releases their handles.
        self.entries.clear();
        if removed > 0 {
            self.version = self.version.wrapping_add(1);
            info!(removed, "cleared icon registry");
        }
        removed
    }

    /// Returns true if an icon with this derived name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// Looks up an icon by derived name.
    pub fn get(&self, name: &str) -> Option<&IconEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IconEntry> {
        self.entries.iter()
    }

    /// Monotonic counter bumped on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl fmt::Debug for IconRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconRegistry")
            .field("entries", &self.entries)
            .field("version", &self.version)
            .finish()
    }
}

impl<'a> IntoIterator for &'a IconRegistry {
    type Item = &'a IconEntry;
    type IntoIter = std::slice::Iter<'a, IconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
