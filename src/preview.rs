//! Preview handles: session-scoped references to uploaded SVG content.
//!
//! A [`PreviewBackend`] turns an uploaded file into a URL the presentation
//! layer can use as a mask source (an object URL in the browser, a data URL
//! natively). The URL is wrapped in a [`PreviewHandle`] that gives it back to
//! the backend when dropped, so every acquired handle is released exactly
//! once: either when the registry is cleared or when the registry itself
//! goes away.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_encode};

use crate::error::Result;
use crate::icon::UploadedFile;

// ============================================================================
// PreviewBackend
// ============================================================================

/// Allocator for preview URLs.
///
/// Implementations are driven from a single thread, one event at a time, so
/// they take `&self` and use interior mutability for bookkeeping.
pub trait PreviewBackend {
    /// Allocates a URL referencing the file's content.
    fn acquire(&self, file: &UploadedFile) -> Result<String>;

    /// Releases a URL previously returned by [`acquire`](Self::acquire).
    fn release(&self, url: &str);
}

// ============================================================================
// PreviewHandle
// ============================================================================

/// An owned preview URL, released back to its backend on drop.
///
/// Handles are intentionally not `Clone`: a single owner means a single
/// release.
pub struct PreviewHandle {
    url: String,
    backend: Rc<dyn PreviewBackend>,
}

impl PreviewHandle {
    /// Acquires a new handle for `file` from `backend`.
    pub fn acquire(backend: &Rc<dyn PreviewBackend>, file: &UploadedFile) -> Result<Self> {
        let url = backend.acquire(file)?;
        Ok(Self {
            url,
            backend: Rc::clone(backend),
        })
    }

    /// Returns the preview URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.backend.release(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URLs can be large; show only the scheme-ish prefix.
        let shown: String = self.url.chars().take(32).collect();
        f.debug_struct("PreviewHandle").field("url", &shown).finish()
    }
}

// ============================================================================
// DataUrlPreviews
// ============================================================================

/// Characters left unescaped in SVG data URLs.
///
/// Keeps the common punctuation of SVG markup readable while escaping
/// everything that would break a `url("...")` or an HTML attribute.
const DATA_URL_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b' ')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'/')
    .remove(b':')
    .remove(b'=')
    .remove(b';')
    .remove(b',');

/// Native preview backend that inlines the SVG into a `data:` URL.
///
/// Nothing needs freeing when a data URL is released; the backend only keeps
/// count of how many handles are outstanding.
#[derive(Debug, Default)]
pub struct DataUrlPreviews {
    live: Cell<usize>,
}

impl DataUrlPreviews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired and not yet released.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

impl PreviewBackend for DataUrlPreviews {
    fn acquire(&self, file: &UploadedFile) -> Result<String> {
        // Raw bytes: the SVG may declare a non-UTF-8 encoding.
        let encoded = percent_encode(file.content(), DATA_URL_SET);
        self.live.set(self.live.get() + 1);
        Ok(format!("data:image/svg+xml,{encoded}"))
    }

    fn release(&self, _url: &str) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_encodes_markup() {
        let backend = DataUrlPreviews::new();
        let file = UploadedFile::new(
            "dot.svg",
            "image/svg+xml",
            br##"<svg fill="#000"></svg>"##.to_vec(),
        );

        let url = backend.acquire(&file).unwrap();
        assert!(url.starts_with("data:image/svg+xml,"));
        assert!(url.contains("%3Csvg"));
        assert!(url.contains("%23000"));
        assert!(!url.contains('"'));
    }

    #[test]
    fn data_url_keeps_non_utf8_bytes() {
        let backend = DataUrlPreviews::new();
        let file = UploadedFile::new(
            "cafe.svg",
            "image/svg+xml",
            b"<svg><text>caf\xe9</text></svg>".to_vec(),
        );

        let url = backend.acquire(&file).unwrap();
        assert!(url.contains("caf%E9%3C/text%3E"));
        assert!(!url.contains("%EF%BF%BD"));
    }

    #[test]
    fn handle_releases_on_drop() {
        let concrete = Rc::new(DataUrlPreviews::new());
        let backend: Rc<dyn PreviewBackend> = concrete.clone();
        let file = UploadedFile::new("a.svg", "image/svg+xml", b"<svg/>".to_vec());

        let first = PreviewHandle::acquire(&backend, &file).unwrap();
        let second = PreviewHandle::acquire(&backend, &file).unwrap();
        assert_eq!(concrete.live(), 2);

        drop(first);
        assert_eq!(concrete.live(), 1);
        drop(second);
        assert_eq!(concrete.live(), 0);
    }

    #[test]
    fn debug_output_is_truncated() {
        let backend: Rc<dyn PreviewBackend> = Rc::new(DataUrlPreviews::new());
        let file = UploadedFile::new("a.svg", "", vec![b'x'; 500]);
        let handle = PreviewHandle::acquire(&backend, &file).unwrap();

        let debug = format!("{handle:?}");
        assert!(debug.len() < 100);
    }
}
