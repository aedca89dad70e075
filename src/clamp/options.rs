//! Clamp configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ClampError;
use crate::layout::Length;

/// Delimiters tried by default, coarsest first.
pub const DEFAULT_SPLIT_ON_CHARS: &[&str] = &[".", "-", "–", "—", " "];

/// Marker appended to truncated text by default.
pub const DEFAULT_TRUNCATION_MARKER: &str = "…";

/// Default cap on search steps before giving up.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// How many lines the container may show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineClamp {
    /// A fixed number of lines.
    Lines(usize),
    /// As many whole lines as the container's current height holds.
    Auto,
    /// As many whole lines as fit in the given height.
    Height(Length),
}

impl Default for LineClamp {
    fn default() -> Self {
        Self::Lines(2)
    }
}

impl FromStr for LineClamp {
    type Err = ClampError;

    /// Parses `"3"`, `"auto"`, `"120px"` or `"4.5em"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        if let Ok(lines) = trimmed.parse::<usize>() {
            return Ok(Self::Lines(lines));
        }
        trimmed.parse::<Length>().map(Self::Height)
    }
}

impl fmt::Display for LineClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lines(lines) => write!(f, "{lines}"),
            Self::Auto => f.write_str("auto"),
            Self::Height(length) => write!(f, "{length}"),
        }
    }
}

/// Whether search steps run back to back or with a pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    #[default]
    Immediate,
    /// Pause between steps so each intermediate state can be shown.
    Delayed(Duration),
}

impl Pacing {
    /// `animate: true` pauses one millisecond between steps.
    pub const fn from_animate(animate: bool) -> Self {
        if animate {
            Self::Delayed(Duration::from_millis(1))
        } else {
            Self::Immediate
        }
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self::Delayed(Duration::from_millis(ms))
    }
}

/// Options for one clamp invocation.
///
/// # Example
///
/// ```
/// use lineclamp::clamp::{ClampConfig, LineClamp};
///
/// let config = ClampConfig::default()
///     .with_lines(LineClamp::Lines(3))
///     .with_split_on_chars([" "])
///     .with_native_clamp(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClampConfig {
    pub lines: LineClamp,
    /// Prefer the oracle's native clamping when it has one.
    pub use_native_clamp: bool,
    /// Delimiters tried coarsest first; the empty string means per character.
    pub split_on_chars: Vec<String>,
    pub animate: Pacing,
    pub truncation_marker: String,
    /// Search steps allowed before stopping with [`ClampOutcome::StepLimit`].
    ///
    /// [`ClampOutcome::StepLimit`]: super::ClampOutcome::StepLimit
    pub max_steps: usize,
}

impl Default for ClampConfig {
    fn default() -> Self {
        Self {
            lines: LineClamp::default(),
            use_native_clamp: true,
            split_on_chars: DEFAULT_SPLIT_ON_CHARS
                .iter()
                .map(ToString::to_string)
                .collect(),
            animate: Pacing::Immediate,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl ClampConfig {
    #[must_use]
    pub const fn with_lines(mut self, lines: LineClamp) -> Self {
        self.lines = lines;
        self
    }

    #[must_use]
    pub const fn with_native_clamp(mut self, use_native_clamp: bool) -> Self {
        self.use_native_clamp = use_native_clamp;
        self
    }

    #[must_use]
    pub fn with_split_on_chars<I, S>(mut self, delimiters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.split_on_chars = delimiters.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_animate(mut self, animate: Pacing) -> Self {
        self.animate = animate;
        self
    }

    #[must_use]
    pub fn with_truncation_marker(mut self, marker: impl Into<String>) -> Self {
        self.truncation_marker = marker.into();
        self
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Reject configurations the search cannot run with.
    ///
    /// An empty delimiter list is valid and means character-level
    /// truncation; an empty delimiter anywhere but last is not.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ClampError> {
        if self.lines == LineClamp::Lines(0) {
            return Err(ClampError::ZeroLines);
        }
        let last = self.split_on_chars.len().saturating_sub(1);
        if let Some(position) = self
            .split_on_chars
            .iter()
            .position(String::is_empty)
            .filter(|position| *position != last)
        {
            return Err(ClampError::MisplacedEmptyDelimiter(position));
        }
        if self.truncation_marker.is_empty() {
            return Err(ClampError::EmptyMarker);
        }
        if self.max_steps == 0 {
            return Err(ClampError::ZeroStepBudget);
        }
        Ok(())
    }
}
