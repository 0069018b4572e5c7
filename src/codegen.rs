//! CSS and HTML generation from the registry and style settings.
//!
//! Output is a pure function of its inputs: the same registry contents,
//! settings, and options always yield byte-identical text. For every icon the
//! selector value in the CSS and the attribute value in the HTML are the same
//! derived name.

use crate::icon::{IconEntry, IconRegistry};
use crate::profile::{CodegenOptions, SelectorStyle, StyleSettings};

/// Class shared by every masked element.
pub const BASE_CLASS: &str = "mask-icon";

/// Attribute naming the icon when [`SelectorStyle::Attribute`] is used.
pub const ICON_ATTRIBUTE: &str = "data-icon";

/// Custom property holding the mask source.
pub const SVG_PROPERTY: &str = "--mask-icon-svg";

/// HTML emitted when there are no icons.
pub const HTML_PLACEHOLDER: &str = "<!-- Upload SVG files to generate the HTML code -->";

// ============================================================================
// CodeGenerator
// ============================================================================

/// Renders generated code according to a set of [`CodegenOptions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGenerator {
    options: CodegenOptions,
}

impl CodeGenerator {
    pub fn new(options: CodegenOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    /// Generates the stylesheet: the shared base block, then one rule per
    /// icon in registry order.
    pub fn css(&self, registry: &IconRegistry, settings: &StyleSettings) -> String {
        let mut css = base_block(settings);
        for entry in registry {
            css.push_str(&self.icon_rule(entry));
        }
        css
    }

    /// Generates one element per icon in registry order, or
    /// [`HTML_PLACEHOLDER`] when the registry is empty.
    pub fn html(&self, registry: &IconRegistry) -> String {
        if registry.is_empty() {
            return HTML_PLACEHOLDER.to_string();
        }

        let mut html = String::new();
        for entry in registry {
            html.push_str(&self.element(entry.name()));
            html.push('\n');
        }
        html
    }

    /// The CSS selector that targets the icon called `name`.
    pub fn selector(&self, name: &str) -> String {
        match self.options.selector {
            SelectorStyle::Attribute => format!(".{BASE_CLASS}[{ICON_ATTRIBUTE}=\"{name}\"]"),
            SelectorStyle::Class => format!(".{BASE_CLASS}-{name}"),
        }
    }

    /// The identifying attributes of the icon element called `name`,
    /// `class` included.
    pub fn attributes(&self, name: &str) -> String {
        match self.options.selector {
            SelectorStyle::Attribute => {
                format!("class=\"{BASE_CLASS}\" {ICON_ATTRIBUTE}=\"{name}\"")
            }
            SelectorStyle::Class => format!("class=\"{BASE_CLASS} {BASE_CLASS}-{name}\""),
        }
    }

    /// The self-contained, empty element for the icon called `name`.
    pub fn element(&self, name: &str) -> String {
        format!("<span {} aria-hidden=\"true\"></span>", self.attributes(name))
    }

    /// The reference path of an icon's source file in the generated CSS.
    pub fn icon_path(&self, filename: &str) -> String {
        let dir = self.options.icon_dir.trim_end_matches('/');
        if dir.is_empty() {
            filename.to_string()
        } else {
            format!("{dir}/{filename}")
        }
    }

    fn icon_rule(&self, entry: &IconEntry) -> String {
        let path = escape_css_string(&self.icon_path(entry.original_filename()));
        format!(
            "{selector} {{\n  {SVG_PROPERTY}: url(\"{path}\");\n}}\n",
            selector = self.selector(entry.name()),
        )
    }
}

// ============================================================================
// Free Functions
// ============================================================================

/// Generates CSS with the default options.
pub fn generate_css(registry: &IconRegistry, settings: &StyleSettings) -> String {
    CodeGenerator::default().css(registry, settings)
}

/// Generates HTML with the default options.
pub fn generate_html(registry: &IconRegistry) -> String {
    CodeGenerator::default().html(registry)
}

/// The settings-dependent block every stylesheet starts with.
fn base_block(settings: &StyleSettings) -> String {
    let mut declarations = String::new();
    for (property, value) in settings.custom_properties() {
        declarations.push_str(&format!("  {property}: {value};\n"));
    }

    format!(
        r#"/* Masque Base Style */
.{BASE_CLASS} {{
{declarations}
  display: inline-grid;
  width: var(--mask-icon-size);
  height: var(--mask-icon-size);
  background-color: var(--mask-icon-color);
  mask: var({SVG_PROPERTY}) no-repeat center;
  mask-size: contain;

  [data-theme="dark"] & {{
    background-color: var(--mask-icon-color-dark);
  }}

  &:hover,
  &:focus-visible {{
    background-color: var(--mask-icon-color-hover);
  }}
}}

/* Icons */
"#
    )
}

/// Escapes a value for use inside a double-quoted CSS string.
fn escape_css_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\a "),
            '\r' => escaped.push_str("\\d "),
            '\x0c' => escaped.push_str("\\c "),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Tests
// ============================================================================
