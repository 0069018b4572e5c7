//! masque: CSS mask icon generator
//!
//! This crate turns uploaded SVG files into monochrome icon definitions: a
//! stylesheet that paints a solid color through each SVG used as a CSS mask,
//! and the matching HTML snippets.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use masque::{Command, DataUrlPreviews, Session, Setting, SettingKey, UploadedFile};
//!
//! let mut session = Session::new(Rc::new(DataUrlPreviews::new()));
//!
//! // Upload files; non-SVG files and duplicate names are skipped.
//! session.dispatch(Command::FilesSubmitted(vec![
//!     UploadedFile::new("Home.svg", "image/svg+xml", b"<svg/>".to_vec()),
//!     UploadedFile::new("home.svg", "image/svg+xml", b"<svg/>".to_vec()),
//!     UploadedFile::new("photo.jpg", "image/jpeg", Vec::new()),
//! ]));
//! assert_eq!(session.registry().len(), 1);
//!
//! // Edit a setting.
//! let color = Setting::parse(SettingKey::Color, "#e11d48").unwrap();
//! session.dispatch(Command::SettingChanged(color));
//!
//! assert!(session.css().contains("--mask-icon-color: #e11d48;"));
//! assert_eq!(
//!     session.html(),
//!     "<span class=\"mask-icon\" data-icon=\"home\" aria-hidden=\"true\"></span>\n"
//! );
//! ```
//!
//! # Profiles
//!
//! Settings and output options round-trip through [`MasqueProfile`] with the
//! [`Configurable`] trait:
//!
//! ```
//! use std::rc::Rc;
//! use masque::{Configurable, DataUrlPreviews, MasqueProfile, Session};
//!
//! let mut session = Session::new(Rc::new(DataUrlPreviews::new()));
//! let profile = MasqueProfile::from_json(r#"{"output": {"selector": "class"}}"#).unwrap();
//! session.apply_profile(&profile);
//!
//! let json = session.export_profile().to_json().unwrap();
//! assert!(json.contains("\"selector\":\"class\""));
//! ```

mod clipboard;
mod codegen;
mod error;
mod icon;
mod preview;
mod profile;
mod render;
mod session;

#[cfg(feature = "cli")]
pub mod logging;

#[cfg(feature = "web")]
mod web;

pub use clipboard::{
    COPIED_CLASS, COPIED_LABEL, COPY_FEEDBACK_DURATION, Clipboard, CopyFeedback, CopyTarget,
};
pub use codegen::{
    BASE_CLASS, CodeGenerator, HTML_PLACEHOLDER, ICON_ATTRIBUTE, generate_css, generate_html,
};
pub use error::{MasqueError, Result};
pub use icon::{
    IconEntry, IconRegistry, NAME_SEPARATOR, Rejection, SVG_MEDIA_TYPE, UploadedFile, derive_name,
    is_svg,
};
pub use preview::{DataUrlPreviews, PreviewBackend, PreviewHandle};
pub use profile::{
    CodegenOptions, HexColor, IconSize, MasqueProfile, SelectorStyle, Setting, SettingKey,
    StyleSettings,
};
pub use render::{PREVIEW_PLACEHOLDER, PreviewItem, RenderCoordinator, RenderedView, StyleVars};
pub use session::{Command, Configurable, Outcome, Session};

#[cfg(feature = "web")]
pub use web::MasqueApp;
