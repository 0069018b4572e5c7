//! Browser binding for WASM environments.
//!
//! This module provides [`MasqueApp`], a wrapper around [`Session`] that the
//! page script drives from its event handlers. Previews are object URLs
//! created from the uploaded bytes and revoked when the session lets go of
//! them.
//!
//! # Feature Flag
//!
//! This module is only available with the `web` feature enabled:
//!
//! ```toml
//! [dependencies]
//! masque = { version = "0.1", features = ["web"] }
//! ```
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { MasqueApp } from 'masque';
//!
//! await init();
//! const app = new MasqueApp();
//!
//! for (const file of input.files) {
//!   const bytes = new Uint8Array(await file.arrayBuffer());
//!   app.submitFile(file.name, file.type, bytes);
//! }
//! preview.innerHTML = app.previewHtml();
//! cssOutput.textContent = app.css();
//!
//! sizeInput.addEventListener('input', () => app.setSetting('icon-size', sizeInput.value));
//! copyCss.addEventListener('click', () => app.copy('css', copyCss));
//! ```

use std::rc::Rc;

use tracing::{error, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Blob, BlobPropertyBag, HtmlElement, Url};

use crate::clipboard::{COPIED_CLASS, COPIED_LABEL, COPY_FEEDBACK_DURATION, CopyTarget};
use crate::error::{MasqueError, Result};
use crate::icon::{SVG_MEDIA_TYPE, UploadedFile};
use crate::preview::PreviewBackend;
use crate::profile::{MasqueProfile, Setting, SettingKey};
use crate::session::{Command, Configurable, Outcome, Session};

// ============================================================================
// ObjectUrlPreviews
// ============================================================================

/// Preview backend backed by `URL.createObjectURL`.
struct ObjectUrlPreviews;

impl PreviewBackend for ObjectUrlPreviews {
    fn acquire(&self, file: &UploadedFile) -> Result<String> {
        let bytes = js_sys::Uint8Array::from(file.content());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        // Masks only load from blobs typed as SVG.
        options.set_type(SVG_MEDIA_TYPE);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(preview_error)?;
        Url::create_object_url_with_blob(&blob).map_err(preview_error)
    }

    fn release(&self, url: &str) {
        if let Err(err) = Url::revoke_object_url(url) {
            warn!("failed to revoke {url}: {err:?}");
        }
    }
}

fn preview_error(value: JsValue) -> MasqueError {
    MasqueError::Preview(format!("{value:?}"))
}

fn js_error(err: MasqueError) -> JsError {
    JsError::new(&err.to_string())
}

// ============================================================================
// MasqueApp
// ============================================================================

/// A [`Session`] exposed to JavaScript via wasm-bindgen.
#[wasm_bindgen]
pub struct MasqueApp {
    session: Session,
}

impl Default for MasqueApp {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl MasqueApp {
    /// Creates an empty session with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> MasqueApp {
        Self {
            session: Session::new(Rc::new(ObjectUrlPreviews)),
        }
    }

    // ---- Commands ----

    /// Submits one picked or dropped file.
    ///
    /// Returns true if the icon was added and the view re-rendered; non-SVG
    /// files and duplicate names return false.
    #[wasm_bindgen(js_name = "submitFile")]
    pub fn submit_file(&mut self, name: &str, media_type: &str, content: &[u8]) -> bool {
        let file = UploadedFile::new(name, media_type, content.to_vec());
        self.session.dispatch(Command::FilesSubmitted(vec![file])) == Outcome::Rendered
    }

    /// Applies a form value to one of the four settings.
    ///
    /// `key` is the field id: "icon-size", "icon-color", "icon-color-hover"
    /// or "icon-color-dark". Returns true if the value changed.
    #[wasm_bindgen(js_name = "setSetting")]
    pub fn set_setting(&mut self, key: &str, value: &str) -> Result<bool, JsError> {
        let key: SettingKey = key.parse().map_err(js_error)?;
        let setting = Setting::parse(key, value).map_err(js_error)?;
        Ok(self.session.dispatch(Command::SettingChanged(setting)) == Outcome::StylesApplied)
    }

    /// Removes every icon and revokes its preview URL.
    pub fn clear(&mut self) -> bool {
        self.session.dispatch(Command::ClearRequested) == Outcome::Rendered
    }

    /// Copies the generated CSS or HTML and flashes a confirmation on
    /// `button` for two seconds. Failures are logged to the console.
    pub fn copy(&self, target: &str, button: HtmlElement) -> Result<(), JsError> {
        let target: CopyTarget = target.parse().map_err(js_error)?;
        let text = self.session.view().text(target).to_string();
        spawn_local(copy_with_feedback(text, button));
        Ok(())
    }

    // ---- View ----

    /// The generated CSS.
    pub fn css(&self) -> String {
        self.session.css().to_string()
    }

    /// The generated HTML.
    pub fn html(&self) -> String {
        self.session.html().to_string()
    }

    /// Markup for the preview area (entries or the placeholder message).
    #[wasm_bindgen(js_name = "previewHtml")]
    pub fn preview_html(&self) -> String {
        self.session.view().preview_html()
    }

    /// Whether the "clear all" action should be shown.
    #[wasm_bindgen(js_name = "hasIcons")]
    pub fn has_icons(&self) -> bool {
        self.session.view().clear_visible
    }

    /// The whole view as a plain object.
    pub fn view(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.session.view())
            .map_err(|e| JsError::new(&format!("Failed to serialize view: {}", e)))
    }

    // ---- Profile Import/Export ----

    /// Exports the current settings as a JSON string.
    #[wasm_bindgen(js_name = "exportProfileJson")]
    pub fn export_profile_json(&self) -> Result<String, JsError> {
        self.session.export_profile().to_json().map_err(js_error)
    }

    /// Imports settings from a JSON string.
    #[wasm_bindgen(js_name = "importProfileJson")]
    pub fn import_profile_json(&mut self, json: &str) -> Result<(), JsError> {
        let profile = MasqueProfile::from_json(json).map_err(js_error)?;
        self.session.apply_profile(&profile);
        Ok(())
    }
}

async fn copy_with_feedback(text: String, button: HtmlElement) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let promise = window.navigator().clipboard().write_text(&text);
    if let Err(err) = JsFuture::from(promise).await {
        web_sys::console::error_2(&JsValue::from_str("Failed to copy: "), &err);
        error!("failed to copy: {err:?}");
        return;
    }

    let original = button.text_content();
    button.set_text_content(Some(COPIED_LABEL));
    if let Err(err) = button.class_list().add_1(COPIED_CLASS) {
        warn!("failed to mark copy button: {err:?}");
    }

    let target = button.clone();
    let revert = Closure::once_into_js(move || {
        target.set_text_content(original.as_deref());
        if let Err(err) = target.class_list().remove_1(COPIED_CLASS) {
            warn!("failed to unmark copy button: {err:?}");
        }
    });
    let delay = COPY_FEEDBACK_DURATION.as_millis() as i32;
    if let Err(err) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(revert.unchecked_ref(), delay)
    {
        warn!("failed to schedule copy feedback revert: {err:?}");
    }
}
