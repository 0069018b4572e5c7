//! Style settings and the serializable profile that carries them.
//!
//! [`StyleSettings`] holds the four session-wide values every icon shares.
//! [`MasqueProfile`] bundles them with the code generation options in a
//! JSON-friendly form, so a front end can save and restore a setup.
//!
//! # Example
//!
//! ```
//! use masque::{MasqueProfile, SelectorStyle};
//!
//! let json = r##"{ "style": { "size": 2, "color": "#ff0000" }, "output": { "selector": "class" } }"##;
//! let profile = MasqueProfile::from_json(json).unwrap();
//!
//! assert_eq!(profile.style.size.to_string(), "2em");
//! assert_eq!(profile.style.color.to_string(), "#ff0000");
//! assert_eq!(profile.output.selector, SelectorStyle::Class);
//! // Unspecified fields keep their defaults.
//! assert_eq!(profile.output.icon_dir, "icons");
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{MasqueError, Result};

// ============================================================================
// IconSize
// ============================================================================

/// Icon edge length in `em`. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct IconSize(f32);

impl IconSize {
    /// Returns the size in em.
    pub fn em(self) -> f32 {
        self.0
    }
}

impl Default for IconSize {
    fn default() -> Self {
        Self(1.5)
    }
}

impl TryFrom<f32> for IconSize {
    type Error = MasqueError;

    fn try_from(value: f32) -> Result<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(MasqueError::InvalidSize(value.to_string()))
        }
    }
}

impl From<IconSize> for f32 {
    fn from(size: IconSize) -> Self {
        size.0
    }
}

impl FromStr for IconSize {
    type Err = MasqueError;

    /// Parses `1.5` or `1.5em`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix("em").unwrap_or(trimmed).trim_end();
        let value: f32 = number
            .parse()
            .map_err(|_| MasqueError::InvalidSize(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}em", self.0)
    }
}

// ============================================================================
// HexColor
// ============================================================================

/// An opaque sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(Srgb<u8>);

impl HexColor {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn to_srgb(self) -> Srgb<u8> {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = MasqueError;

    /// Parses `#rgb`, `#rrggbb`, or either without the leading `#`.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|source| MasqueError::InvalidColor {
                value: s.to_string(),
                source,
            })
    }
}

impl TryFrom<String> for HexColor {
    type Error = MasqueError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    }
}

// ============================================================================
// StyleSettings
// ============================================================================

/// The four values shared by every icon in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct StyleSettings {
    /// Edge length of the masked element.
    #[cfg_attr(feature = "jsonschema", schemars(with = "f32"))]
    pub size: IconSize,

    /// Base background color shown through the mask.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub color: HexColor,

    /// Color on hover and keyboard focus.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub color_hover: HexColor,

    /// Color under `[data-theme="dark"]`.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub color_dark: HexColor,
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            size: IconSize::default(),
            color: HexColor::rgb(0x1f, 0x29, 0x37),
            color_hover: HexColor::rgb(0x25, 0x63, 0xeb),
            color_dark: HexColor::rgb(0xf3, 0xf4, 0xf6),
        }
    }
}

impl StyleSettings {
    /// Applies a single setting. Returns true if the value changed.
    pub fn set(&mut self, setting: Setting) -> bool {
        match setting {
            Setting::Size(size) => replace(&mut self.size, size),
            Setting::Color(color) => replace(&mut self.color, color),
            Setting::ColorHover(color) => replace(&mut self.color_hover, color),
            Setting::ColorDark(color) => replace(&mut self.color_dark, color),
        }
    }

    /// The settings as `(custom property, value)` pairs, in declaration order.
    pub fn custom_properties(&self) -> [(&'static str, String); 4] {
        [
            (SettingKey::Size.css_property(), self.size.to_string()),
            (SettingKey::Color.css_property(), self.color.to_string()),
            (SettingKey::ColorHover.css_property(), self.color_hover.to_string()),
            (SettingKey::ColorDark.css_property(), self.color_dark.to_string()),
        ]
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

// ============================================================================
// Settings as Commands
// ============================================================================

/// Identifies one of the four style settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Size,
    Color,
    ColorHover,
    ColorDark,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::Size,
        SettingKey::Color,
        SettingKey::ColorHover,
        SettingKey::ColorDark,
    ];

    /// The form-field identifier for this setting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size => "icon-size",
            Self::Color => "icon-color",
            Self::ColorHover => "icon-color-hover",
            Self::ColorDark => "icon-color-dark",
        }
    }

    /// The CSS custom property carrying this setting.
    pub fn css_property(self) -> &'static str {
        match self {
            Self::Size => "--mask-icon-size",
            Self::Color => "--mask-icon-color",
            Self::ColorHover => "--mask-icon-color-hover",
            Self::ColorDark => "--mask-icon-color-dark",
        }
    }
}

impl FromStr for SettingKey {
    type Err = MasqueError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.strip_prefix("icon-").unwrap_or(s);
        match key {
            "size" => Ok(Self::Size),
            "color" => Ok(Self::Color),
            "color-hover" => Ok(Self::ColorHover),
            "color-dark" => Ok(Self::ColorDark),
            _ => Err(MasqueError::UnknownSetting(s.to_string())),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A new value for one style setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting {
    Size(IconSize),
    Color(HexColor),
    ColorHover(HexColor),
    ColorDark(HexColor),
}

impl Setting {
    /// Parses a raw form value for the given setting.
    pub fn parse(key: SettingKey, raw: &str) -> Result<Self> {
        Ok(match key {
            SettingKey::Size => Self::Size(raw.parse()?),
            SettingKey::Color => Self::Color(raw.parse()?),
            SettingKey::ColorHover => Self::ColorHover(raw.parse()?),
            SettingKey::ColorDark => Self::ColorDark(raw.parse()?),
        })
    }

    pub fn key(&self) -> SettingKey {
        match self {
            Self::Size(_) => SettingKey::Size,
            Self::Color(_) => SettingKey::Color,
            Self::ColorHover(_) => SettingKey::ColorHover,
            Self::ColorDark(_) => SettingKey::ColorDark,
        }
    }
}

// ============================================================================
// Code Generation Options
// ============================================================================

/// How generated CSS selects an icon and generated HTML names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SelectorStyle {
    /// `.mask-icon[data-icon="name"]` and `data-icon="name"`.
    #[default]
    Attribute,
    /// `.mask-icon-name` and `class="mask-icon mask-icon-name"`.
    Class,
}

impl FromStr for SelectorStyle {
    type Err = MasqueError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "attribute" => Ok(Self::Attribute),
            "class" => Ok(Self::Class),
            _ => Err(MasqueError::UnknownVariant {
                kind: "selector style",
                value: s.to_string(),
            }),
        }
    }
}

/// Options that shape generated code but not the icons themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CodegenOptions {
    pub selector: SelectorStyle,

    /// Directory prefix of the mask reference path.
    pub icon_dir: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            selector: SelectorStyle::default(),
            icon_dir: "icons".to_string(),
        }
    }
}

// ============================================================================
// MasqueProfile
// ============================================================================

/// A serializable snapshot of everything configurable in a session.
///
/// # JSON Format
///
/// ```json
/// {
///   "style": {
///     "size": 1.5,
///     "color": "#1f2937",
///     "colorHover": "#2563eb",
///     "colorDark": "#f3f4f6"
///   },
///   "output": {
///     "selector": "attribute",
///     "iconDir": "icons"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct MasqueProfile {
    pub style: StyleSettings,
    pub output: CodegenOptions,
}

impl MasqueProfile {
    pub fn new(style: StyleSettings, output: CodegenOptions) -> Self {
        Self { style, output }
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a profile file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| MasqueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing_and_display() {
        assert_eq!("1.5".parse::<IconSize>().unwrap().to_string(), "1.5em");
        assert_eq!("2em".parse::<IconSize>().unwrap().to_string(), "2em");
        assert_eq!(" 0.75 em ".parse::<IconSize>().unwrap().em(), 0.75);

        assert!("0".parse::<IconSize>().is_err());
        assert!("-1".parse::<IconSize>().is_err());
        assert!("big".parse::<IconSize>().is_err());
        assert!(IconSize::try_from(f32::NAN).is_err());
        assert!(IconSize::try_from(f32::INFINITY).is_err());
    }

    #[test]
    fn color_parsing_normalizes_to_lowercase_hex() {
        assert_eq!("#FF8800".parse::<HexColor>().unwrap().to_string(), "#ff8800");
        assert_eq!("#f80".parse::<HexColor>().unwrap().to_string(), "#ff8800");
        assert_eq!("336699".parse::<HexColor>().unwrap().to_string(), "#336699");

        let err = "#zzzzzz".parse::<HexColor>().unwrap_err();
        assert!(matches!(err, MasqueError::InvalidColor { .. }));
    }

    #[test]
    fn set_reports_changes() {
        let mut settings = StyleSettings::default();

        let red = Setting::Color(HexColor::rgb(255, 0, 0));
        assert!(settings.set(red));
        assert!(!settings.set(red));
        assert_eq!(settings.color.to_string(), "#ff0000");
        // Other values untouched.
        assert_eq!(settings.size, IconSize::default());
    }

    #[test]
    fn setting_keys_round_trip_through_field_ids() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
        assert_eq!("color-dark".parse::<SettingKey>().unwrap(), SettingKey::ColorDark);
        assert!("icon-opacity".parse::<SettingKey>().is_err());
    }

    #[test]
    fn setting_parse_checks_value() {
        let setting = Setting::parse(SettingKey::ColorHover, "#00f").unwrap();
        assert_eq!(setting, Setting::ColorHover(HexColor::rgb(0, 0, 255)));
        assert_eq!(setting.key(), SettingKey::ColorHover);

        assert!(Setting::parse(SettingKey::Size, "#00f").is_err());
    }

    #[test]
    fn custom_properties_follow_settings() {
        let props = StyleSettings::default().custom_properties();
        assert_eq!(props[0], ("--mask-icon-size", "1.5em".to_string()));
        assert_eq!(props[3].0, "--mask-icon-color-dark");
    }

    #[test]
    fn profile_json_format() {
        let json = MasqueProfile::default().to_json_pretty().unwrap();

        assert!(json.contains("\"colorHover\": \"#2563eb\""));
        assert!(json.contains("\"selector\": \"attribute\""));
        assert!(json.contains("\"iconDir\": \"icons\""));
        assert!(json.contains("\"size\": 1.5"));
    }

    #[test]
    fn profile_serialization_roundtrip() {
        let mut profile = MasqueProfile::default();
        profile.style.size = IconSize::try_from(3.0).unwrap();
        profile.output.selector = SelectorStyle::Class;

        let restored = MasqueProfile::from_json(&profile.to_json().unwrap()).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn profile_rejects_invalid_values() {
        assert!(MasqueProfile::from_json(r#"{"style": {"size": -2}}"#).is_err());
        assert!(MasqueProfile::from_json(r#"{"style": {"color": "teal"}}"#).is_err());
        assert!(MasqueProfile::from_json(r#"{"output": {"selector": "id"}}"#).is_err());
    }

    #[test]
    fn empty_profile_deserializes() {
        let profile = MasqueProfile::from_json("{}").unwrap();
        assert_eq!(profile, MasqueProfile::default());
    }

    #[test]
    fn profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("masque.json");
        std::fs::write(&path, r##"{"style": {"colorDark": "#101010"}}"##).unwrap();

        let profile = MasqueProfile::from_file(&path).unwrap();
        assert_eq!(profile.style.color_dark.to_string(), "#101010");

        let missing = MasqueProfile::from_file(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(MasqueError::Io { .. })));
    }
}
