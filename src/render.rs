//! Presentation state derived from the registry and settings.
//!
//! The [`RenderCoordinator`] keeps one [`RenderedView`] in sync with the
//! session: the preview list (or its placeholder), the list of uploaded
//! filenames, both generated code outputs, and whether clearing is offered.
//! It remembers what it last rendered, in the manner of a versioned cache,
//! so rendering unchanged inputs does no work and yields the same view.

use serde::Serialize;
use tracing::debug;

use crate::clipboard::CopyTarget;
use crate::codegen::{CodeGenerator, SVG_PROPERTY};
use crate::icon::IconRegistry;
use crate::profile::{CodegenOptions, SettingKey, StyleSettings};

/// Message shown in place of the preview list when there are no icons.
pub const PREVIEW_PLACEHOLDER: &str = "Icons will appear here.";

// ============================================================================
// StyleVars
// ============================================================================

/// Style custom properties set on one preview element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVars {
    pub size: String,
    pub color: String,
    pub color_hover: String,
    pub color_dark: String,
}

impl StyleVars {
    /// `(custom property, value)` pairs, in declaration order.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (SettingKey::Size.css_property(), self.size.as_str()),
            (SettingKey::Color.css_property(), self.color.as_str()),
            (SettingKey::ColorHover.css_property(), self.color_hover.as_str()),
            (SettingKey::ColorDark.css_property(), self.color_dark.as_str()),
        ]
    }
}

impl From<&StyleSettings> for StyleVars {
    fn from(settings: &StyleSettings) -> Self {
        Self {
            size: settings.size.to_string(),
            color: settings.color.to_string(),
            color_hover: settings.color_hover.to_string(),
            color_dark: settings.color_dark.to_string(),
        }
    }
}

// ============================================================================
// PreviewItem
// ============================================================================

/// One rendered preview: the masked icon and its derived name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewItem {
    pub name: String,

    /// Identifying attributes of the icon element (`class`, and `data-icon`
    /// in attribute mode).
    pub attributes: String,

    /// Session-scoped URL of the uploaded SVG.
    pub preview_url: String,

    pub style: StyleVars,
}

impl PreviewItem {
    /// The inline `style` attribute value: mask source plus style variables.
    pub fn inline_style(&self) -> String {
        let mut style = format!("{SVG_PROPERTY}: url(\"{}\");", self.preview_url);
        for (property, value) in self.style.pairs() {
            style.push_str(&format!(" {property}: {value};"));
        }
        style
    }

    /// Markup for this preview entry.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"preview-item\"><span {} aria-hidden=\"true\" style=\"{}\"></span><span class=\"preview-name\">{}</span></div>",
            self.attributes,
            escape_html(&self.inline_style()),
            escape_html(&self.name),
        )
    }
}

// ============================================================================
// RenderedView
// ============================================================================

/// Everything the presentation layer displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedView {
    /// One entry per icon, in registry order.
    pub previews: Vec<PreviewItem>,

    /// Shown instead of the previews when the registry is empty.
    pub placeholder: Option<&'static str>,

    /// Original filenames, in registry order.
    pub filenames: Vec<String>,

    pub css: String,
    pub html: String,

    /// Whether the "clear all" action is shown.
    pub clear_visible: bool,
}

impl RenderedView {
    /// The generated text for a copy target.
    pub fn text(&self, target: CopyTarget) -> &str {
        match target {
            CopyTarget::Css => &self.css,
            CopyTarget::Html => &self.html,
        }
    }

    /// Markup for the whole preview area.
    pub fn preview_html(&self) -> String {
        match self.placeholder {
            Some(message) => format!("<p class=\"discrete\">{}</p>", escape_html(message)),
            None => self
                .previews
                .iter()
                .map(PreviewItem::to_html)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// RenderCoordinator
// ============================================================================

/// Inputs of the last full render.
#[derive(Debug, Clone, PartialEq)]
struct RenderKey {
    registry: u64,
    settings: StyleSettings,
    options: CodegenOptions,
}

/// Keeps a [`RenderedView`] consistent with the registry and settings.
#[derive(Debug, Default)]
pub struct RenderCoordinator {
    view: RenderedView,
    rendered: Option<RenderKey>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view.
    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    /// Rebuilds the whole view from the registry, in registry order.
    ///
    /// Returns false when the inputs match the last render, in which case
    /// the view is left as it is.
    pub fn render(
        &mut self,
        registry: &IconRegistry,
        settings: &StyleSettings,
        generator: &CodeGenerator,
    ) -> bool {
        let key = RenderKey {
            registry: registry.version(),
            settings: settings.clone(),
            options: generator.options().clone(),
        };
        if self.rendered.as_ref() == Some(&key) {
            return false;
        }

        let style = StyleVars::from(settings);
        let previews: Vec<_> = registry
            .iter()
            .map(|entry| PreviewItem {
                name: entry.name().to_string(),
                attributes: generator.attributes(entry.name()),
                preview_url: entry.preview_url().to_string(),
                style: style.clone(),
            })
            .collect();

        self.view = RenderedView {
            placeholder: previews.is_empty().then_some(PREVIEW_PLACEHOLDER),
            clear_visible: !previews.is_empty(),
            previews,
            filenames: registry
                .iter()
                .map(|entry| entry.original_filename().to_string())
                .collect(),
            css: generator.css(registry, settings),
            html: generator.html(registry),
        };
        self.rendered = Some(key);

        debug!(icons = registry.len(), "rendered view");
        true
    }

    /// Pushes the settings onto every preview entry without rebuilding the
    /// list.
    pub fn apply_styles(&mut self, settings: &StyleSettings) {
        let style = StyleVars::from(settings);
        for item in &mut self.view.previews {
            item.style = style.clone();
        }
    }

    /// Regenerates both code outputs without touching the previews.
    pub fn refresh_code(
        &mut self,
        registry: &IconRegistry,
        settings: &StyleSettings,
        generator: &CodeGenerator,
    ) {
        self.view.css = generator.css(registry, settings);
        self.view.html = generator.html(registry);
        if let Some(key) = self.rendered.as_mut() {
            key.settings = settings.clone();
        }
    }

    /// Forces the next [`render`](Self::render) to rebuild.
    pub fn invalidate(&mut self) {
        self.rendered = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
