//! CSS-like length values.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ClampError;

static LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?|\.\d+)\s*(px|em)?\s*$").expect("length pattern is valid")
});

/// A length in pixels or in multiples of the font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Em(f32),
}

impl Length {
    /// Resolve to pixels against `font_size`.
    pub fn to_px(self, font_size: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Em(em) => em * font_size,
        }
    }
}

impl FromStr for Length {
    type Err = ClampError;

    /// Parses `"120px"`, `"1.5em"` and bare pixel numbers like `"120"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = LENGTH_RE
            .captures(s)
            .ok_or_else(|| ClampError::InvalidLength(s.to_string()))?;
        let value: f32 = caps[1]
            .parse()
            .map_err(|_| ClampError::InvalidLength(s.to_string()))?;
        match caps.get(2).map(|unit| unit.as_str()) {
            Some("em") => Ok(Self::Em(value)),
            _ => Ok(Self::Px(value)),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Em(em) => write!(f, "{em}em"),
        }
    }
}

/// Leading integer pixel value of a computed style, `parseInt` style.
///
/// `"19.2px"` reads as 19, `"20"` as 20; anything without a leading
/// number is `None`.
pub fn parse_int_px(value: &str) -> Option<f32> {
    let trimmed = value.trim_start();
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok().map(|n| {
        #[allow(clippy::cast_precision_loss)]
        {
            n as f32
        }
    })
}

/// Pixel value of a computed style, keeping the fraction.
pub fn parse_px(value: &str) -> Option<f32> {
    match value.parse::<Length>().ok()? {
        Length::Px(px) => Some(px),
        Length::Em(_) => None,
    }
}
