//! The session: registry, settings, and derived view under one owner.

use std::rc::Rc;

use tracing::{debug, error};

use crate::clipboard::{Clipboard, CopyFeedback, CopyTarget};
use crate::codegen::CodeGenerator;
use crate::icon::{IconRegistry, UploadedFile};
use crate::preview::PreviewBackend;
use crate::profile::{MasqueProfile, Setting, StyleSettings};
use crate::render::{RenderCoordinator, RenderedView};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`MasqueProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &MasqueProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> MasqueProfile;
}

// ============================================================================
// Commands
// ============================================================================

/// A user action, dispatched to a [`Session`] one at a time.
#[derive(Debug, Clone)]
pub enum Command {
    /// Files were picked or dropped.
    FilesSubmitted(Vec<UploadedFile>),
    /// One of the four style settings was edited.
    SettingChanged(Setting),
    /// "Clear all" was triggered.
    ClearRequested,
    /// A copy button was pressed.
    CopyRequested(CopyTarget),
}

/// What a dispatched command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The registry changed and the whole view was rebuilt.
    Rendered,
    /// Preview styles were updated and code regenerated.
    StylesApplied,
    /// Nothing changed.
    Unchanged,
    /// Text reached the clipboard; show the confirmation.
    Copied(CopyFeedback),
    /// The clipboard write failed. Already logged; show nothing.
    CopyFailed,
}

// ============================================================================
// Session
// ============================================================================

/// Owns the whole state of one icon-building session.
///
/// A session starts empty with a rendered view (placeholder and boilerplate
/// CSS) and changes only through [`dispatch`](Self::dispatch). Dropping it
/// releases every outstanding preview handle.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use masque::{Command, DataUrlPreviews, Outcome, Session, UploadedFile};
///
/// let mut session = Session::new(Rc::new(DataUrlPreviews::new()));
///
/// let files = vec![UploadedFile::new("Star.svg", "image/svg+xml", b"<svg/>".to_vec())];
/// assert_eq!(session.dispatch(Command::FilesSubmitted(files)), Outcome::Rendered);
///
/// assert!(session.html().contains("data-icon=\"star\""));
/// assert!(session.css().contains("url(\"icons/Star.svg\")"));
/// ```
pub struct Session {
    registry: IconRegistry,
    settings: StyleSettings,
    generator: CodeGenerator,
    renderer: RenderCoordinator,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl Session {
    /// Creates an empty session with default settings.
    pub fn new(previews: Rc<dyn PreviewBackend>) -> Self {
        Self::with_profile(previews, &MasqueProfile::default())
    }

    /// Creates an empty session configured from `profile`.
    pub fn with_profile(previews: Rc<dyn PreviewBackend>, profile: &MasqueProfile) -> Self {
        let mut session = Self {
            registry: IconRegistry::new(previews),
            settings: profile.style.clone(),
            generator: CodeGenerator::new(profile.output.clone()),
            renderer: RenderCoordinator::new(),
            clipboard: None,
        };
        session.render();
        session
    }

    /// Attaches the clipboard used by [`Command::CopyRequested`].
    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Some(Box::new(clipboard));
        self
    }

    /// Handles one command and reports what happened.
    pub fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::FilesSubmitted(files) => {
                if self.registry.submit_batch(files) {
                    self.render();
                    Outcome::Rendered
                } else {
                    Outcome::Unchanged
                }
            }
            Command::SettingChanged(setting) => {
                if !self.settings.set(setting) {
                    return Outcome::Unchanged;
                }
                debug!(setting = %setting.key(), "setting changed");
                self.renderer.apply_styles(&self.settings);
                self.renderer.refresh_code(&self.registry, &self.settings, &self.generator);
                Outcome::StylesApplied
            }
            Command::ClearRequested => {
                if self.registry.clear() > 0 {
                    self.render();
                    Outcome::Rendered
                } else {
                    Outcome::Unchanged
                }
            }
            Command::CopyRequested(target) => self.copy(target),
        }
    }

    fn copy(&mut self, target: CopyTarget) -> Outcome {
        let text = self.renderer.view().text(target);
        let Some(clipboard) = self.clipboard.as_mut() else {
            error!(%target, "failed to copy: no clipboard available");
            return Outcome::CopyFailed;
        };

        match clipboard.write_text(text) {
            Ok(()) => Outcome::Copied(CopyFeedback::new(target)),
            Err(err) => {
                error!(%target, "failed to copy: {err}");
                Outcome::CopyFailed
            }
        }
    }

    fn render(&mut self) -> bool {
        self.renderer.render(&self.registry, &self.settings, &self.generator)
    }

    pub fn registry(&self) -> &IconRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &StyleSettings {
        &self.settings
    }

    pub fn generator(&self) -> &CodeGenerator {
        &self.generator
    }

    /// The current presentation state.
    pub fn view(&self) -> &RenderedView {
        self.renderer.view()
    }

    /// The generated CSS.
    pub fn css(&self) -> &str {
        &self.view().css
    }

    /// The generated HTML.
    pub fn html(&self) -> &str {
        &self.view().html
    }
}

impl Configurable for Session {
    /// Replaces the settings and code options, then re-renders.
    fn apply_profile(&mut self, profile: &MasqueProfile) {
        self.settings = profile.style.clone();
        self.generator = CodeGenerator::new(profile.output.clone());
        self.renderer.invalidate();
        self.render();
    }

    fn export_profile(&self) -> MasqueProfile {
        MasqueProfile::new(self.settings.clone(), self.generator.options().clone())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::HTML_PLACEHOLDER;
    use crate::error::{MasqueError, Result};
    use crate::icon::tests::{RecordingPreviews, svg};
    use crate::profile::{HexColor, SelectorStyle, SettingKey};
    use crate::render::PREVIEW_PLACEHOLDER;
    use std::cell::RefCell;

    #[derive(Default, Clone)]
    struct MemoryClipboard {
        contents: Rc<RefCell<Option<String>>>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> Result<()> {
            *self.contents.borrow_mut() = Some(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> Result<()> {
            Err(MasqueError::Clipboard("permission denied".into()))
        }
    }

    fn session() -> (Rc<RecordingPreviews>, Session) {
        let backend = Rc::new(RecordingPreviews::default());
        let session = Session::new(backend.clone());
        (backend, session)
    }

    fn submit(session: &mut Session, names: &[&str]) -> Outcome {
        let files = names.iter().map(|name| svg(name)).collect();
        session.dispatch(Command::FilesSubmitted(files))
    }

    #[test]
    fn new_session_is_rendered_empty() {
        let (_backend, session) = session();

        assert!(session.registry().is_empty());
        assert_eq!(session.view().placeholder, Some(PREVIEW_PLACEHOLDER));
        assert_eq!(session.html(), HTML_PLACEHOLDER);
        assert!(session.css().contains("/* Masque Base Style */"));
        assert!(!session.view().clear_visible);
    }

    #[test]
    fn duplicate_upload_keeps_first_entry() {
        let (_backend, mut session) = session();

        assert_eq!(submit(&mut session, &["Star.svg"]), Outcome::Rendered);
        assert_eq!(submit(&mut session, &["STAR.svg"]), Outcome::Unchanged);

        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.view().filenames, ["Star.svg"]);
    }

    #[test]
    fn non_svg_upload_changes_nothing() {
        let (backend, mut session) = session();
        let before = session.view().clone();

        let files = vec![
            UploadedFile::new("image.png", "image/png", Vec::new()),
            UploadedFile::new("photo.jpg", "image/jpeg", Vec::new()),
        ];
        assert_eq!(session.dispatch(Command::FilesSubmitted(files)), Outcome::Unchanged);

        assert!(session.registry().is_empty());
        assert_eq!(session.view(), &before);
        assert!(backend.acquired.borrow().is_empty());
    }

    #[test]
    fn order_is_preserved_in_generated_code() {
        let (_backend, mut session) = session();
        submit(&mut session, &["a.svg", "b.svg", "c.svg"]);

        let css = session.css();
        let positions: Vec<_> = ["\"a\"", "\"b\"", "\"c\""]
            .iter()
            .map(|needle| css.find(needle).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let html: Vec<_> = session.html().lines().collect();
        assert!(html[0].contains("\"a\""));
        assert!(html[1].contains("\"b\""));
        assert!(html[2].contains("\"c\""));
    }

    #[test]
    fn clear_releases_handles_and_shows_placeholder() {
        let (backend, mut session) = session();
        submit(&mut session, &["a.svg", "b.svg", "c.svg"]);
        assert!(session.view().clear_visible);

        assert_eq!(session.dispatch(Command::ClearRequested), Outcome::Rendered);

        assert!(session.registry().is_empty());
        assert_eq!(backend.released.borrow().len(), 3);
        assert_eq!(session.view().placeholder, Some(PREVIEW_PLACEHOLDER));
        assert_eq!(session.html(), HTML_PLACEHOLDER);
        assert!(!session.view().clear_visible);

        // A second clear has nothing to release.
        assert_eq!(session.dispatch(Command::ClearRequested), Outcome::Unchanged);
        assert_eq!(backend.released.borrow().len(), 3);
    }

    #[test]
    fn dropping_session_releases_handles() {
        let (backend, mut session) = session();
        submit(&mut session, &["a.svg", "b.svg"]);

        drop(session);
        assert_eq!(backend.released.borrow().len(), 2);
    }

    #[test]
    fn setting_change_updates_previews_and_code() {
        let (_backend, mut session) = session();
        submit(&mut session, &["a.svg", "b.svg"]);
        let filenames = session.view().filenames.clone();

        let setting = Setting::parse(SettingKey::Color, "#ff0000").unwrap();
        assert_eq!(session.dispatch(Command::SettingChanged(setting)), Outcome::StylesApplied);

        for item in &session.view().previews {
            assert_eq!(item.style.color, "#ff0000");
        }
        assert!(session.css().contains("--mask-icon-color: #ff0000;"));
        assert_eq!(session.view().filenames, filenames);

        // Same value again is a no-op.
        assert_eq!(session.dispatch(Command::SettingChanged(setting)), Outcome::Unchanged);
    }

    #[test]
    fn copy_writes_generated_text() {
        let clipboard = MemoryClipboard::default();
        let (_backend, session) = session();
        let mut session = session.with_clipboard(clipboard.clone());
        submit(&mut session, &["a.svg"]);

        let outcome = session.dispatch(Command::CopyRequested(CopyTarget::Html));
        assert_eq!(outcome, Outcome::Copied(CopyFeedback::new(CopyTarget::Html)));
        assert_eq!(clipboard.contents.borrow().as_deref(), Some(session.html()));
    }

    #[test]
    fn copy_failure_is_absorbed() {
        let (_backend, session) = session();
        let mut session = session.with_clipboard(BrokenClipboard);
        submit(&mut session, &["a.svg"]);

        let outcome = session.dispatch(Command::CopyRequested(CopyTarget::Css));
        assert_eq!(outcome, Outcome::CopyFailed);
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn copy_without_clipboard_fails_quietly() {
        let (_backend, mut session) = session();
        assert_eq!(
            session.dispatch(Command::CopyRequested(CopyTarget::Css)),
            Outcome::CopyFailed
        );
    }

    #[test]
    fn profile_apply_and_export() {
        let (_backend, mut session) = session();
        submit(&mut session, &["a.svg"]);

        let mut profile = session.export_profile();
        assert_eq!(profile, MasqueProfile::default());

        profile.style.color_dark = HexColor::rgb(1, 2, 3);
        profile.output.selector = SelectorStyle::Class;
        session.apply_profile(&profile);

        assert!(session.css().contains("--mask-icon-color-dark: #010203;"));
        assert!(session.css().contains(".mask-icon-a {"));
        assert!(session.html().contains("class=\"mask-icon mask-icon-a\""));
        assert_eq!(session.view().previews[0].style.color_dark, "#010203");
        assert_eq!(session.export_profile(), profile);
    }
}
