//! Copy-to-clipboard support for the generated code.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{MasqueError, Result};

/// How long the copy confirmation stays visible before reverting.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// Label shown on the trigger control while the confirmation is visible.
pub const COPIED_LABEL: &str = "Copied!";

/// Class added to the trigger control while the confirmation is visible.
pub const COPIED_CLASS: &str = "btn-success";

/// Destination for copied text.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Which generated output to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CopyTarget {
    Css,
    Html,
}

impl CopyTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Html => "html",
        }
    }
}

impl FromStr for CopyTarget {
    type Err = MasqueError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "css" => Ok(Self::Css),
            "html" => Ok(Self::Html),
            _ => Err(MasqueError::UnknownVariant {
                kind: "copy target",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CopyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient confirmation after a successful copy.
///
/// The host shows [`label`](Self::label) on the trigger control and restores
/// it once [`revert_after`](Self::revert_after) has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFeedback {
    pub target: CopyTarget,
    pub label: &'static str,
    pub revert_after: Duration,
}

impl CopyFeedback {
    pub fn new(target: CopyTarget) -> Self {
        Self {
            target,
            label: COPIED_LABEL,
            revert_after: COPY_FEEDBACK_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_target_names() {
        assert_eq!("css".parse::<CopyTarget>().unwrap(), CopyTarget::Css);
        assert_eq!(CopyTarget::Html.to_string(), "html");
        assert!("js".parse::<CopyTarget>().is_err());
    }

    #[test]
    fn feedback_reverts_after_two_seconds() {
        let feedback = CopyFeedback::new(CopyTarget::Css);
        assert_eq!(feedback.revert_after, Duration::from_millis(2000));
        assert_eq!(feedback.label, "Copied!");
    }
}
