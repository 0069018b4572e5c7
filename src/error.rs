//! Error type shared by the library and its front ends.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring a session or reading its inputs.
///
/// Rejected uploads are not errors: see [`Rejection`](crate::Rejection).
#[derive(Debug, Error)]
pub enum MasqueError {
    /// The icon size is not a finite, positive number.
    #[error("invalid icon size `{0}`: expected a positive number of em")]
    InvalidSize(String),

    /// A color could not be parsed as `#rgb` or `#rrggbb`.
    #[error("invalid color `{value}`: {source}")]
    InvalidColor {
        value: String,
        #[source]
        source: palette::rgb::FromHexError,
    },

    /// A setting key does not name one of the four style settings.
    #[error("unknown setting `{0}`")]
    UnknownSetting(String),

    /// An unknown selector style or copy target name.
    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },

    /// A profile could not be serialized or parsed.
    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),

    /// Reading an input file failed.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The preview backend could not allocate a handle.
    #[error("preview allocation failed: {0}")]
    Preview(String),

    /// Writing to the clipboard failed.
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
}

pub type Result<T, E = MasqueError> = std::result::Result<T, E>;
