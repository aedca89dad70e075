use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::clamp::{ClampConfig, LineClamp, Pacing};

/// Token used in rc files for a single-space delimiter.
const SPACE_TOKEN: &str = "space";

/// Command-line defaults, as stored in rc files and parsed from arguments.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    pub lines: Option<LineClamp>,
    pub width: Option<u16>,
    pub split_on: Vec<String>,
    pub no_split: bool,
    pub marker: Option<String>,
    pub native: bool,
    pub animate_ms: Option<u64>,
    pub max_steps: Option<usize>,
    pub json: bool,
    pub perf: bool,
    pub step_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches add up, values from `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lines: other.lines.or(self.lines),
            width: other.width.or(self.width),
            split_on: if other.split_on.is_empty() {
                self.split_on.clone()
            } else {
                other.split_on.clone()
            },
            no_split: self.no_split || other.no_split,
            marker: other.marker.clone().or_else(|| self.marker.clone()),
            native: self.native || other.native,
            animate_ms: other.animate_ms.or(self.animate_ms),
            max_steps: other.max_steps.or(self.max_steps),
            json: self.json || other.json,
            perf: self.perf || other.perf,
            step_log: other.step_log.clone().or_else(|| self.step_log.clone()),
        }
    }

    /// Clamp options for these flags, on top of the library defaults.
    ///
    /// `--no-split` wins over `--split-on` and selects character-level
    /// truncation.
    pub fn to_clamp_config(&self) -> ClampConfig {
        let mut config = ClampConfig::default().with_native_clamp(self.native);
        if let Some(lines) = self.lines {
            config = config.with_lines(lines);
        }
        if self.no_split {
            config = config.with_split_on_chars(Vec::<String>::new());
        } else if !self.split_on.is_empty() {
            config = config.with_split_on_chars(self.split_on.clone());
        }
        if let Some(marker) = &self.marker {
            config = config.with_truncation_marker(marker.clone());
        }
        if let Some(ms) = self.animate_ms {
            config = config.with_animate(Pacing::Delayed(Duration::from_millis(ms)));
        }
        if let Some(max_steps) = self.max_steps {
            config = config.with_max_steps(max_steps);
        }
        config
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("lineclamp").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("lineclamp")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("lineclamp").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("lineclamp")
                .join("config");
        }
    }

    PathBuf::from(".lineclamprc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".lineclamprc")
}

/// Read flags from an rc file; a missing file yields the defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut tokens = Vec::new();
    for line in content.lines() {
        let line = line.trim_start();
        if line.trim_end().is_empty() || line.starts_with('#') {
            continue;
        }
        // `--flag=value` lines keep their value verbatim, spaces included
        let first = line.split_whitespace().next().unwrap_or_default();
        if first.starts_with("--") && first.contains('=') {
            tokens.push(line.to_string());
        } else {
            tokens.extend(line.split_whitespace().map(ToOwned::to_owned));
        }
    }
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` to an rc file, creating its directory if needed.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# lineclamp defaults (saved with --save)".to_string());
    if let Some(clamp) = flags.lines {
        lines.push(format!("--lines {clamp}"));
    }
    if let Some(width) = flags.width {
        lines.push(format!("--width {width}"));
    }
    for delimiter in &flags.split_on {
        lines.push(format!("--split-on={}", delimiter_token(delimiter)));
    }
    if flags.no_split {
        lines.push("--no-split".to_string());
    }
    if let Some(marker) = &flags.marker {
        lines.push(format!("--marker={marker}"));
    }
    if flags.native {
        lines.push("--native".to_string());
    }
    if let Some(ms) = flags.animate_ms {
        lines.push(format!("--animate={ms}"));
    }
    if let Some(max_steps) = flags.max_steps {
        lines.push(format!("--max-steps {max_steps}"));
    }
    if flags.json {
        lines.push("--json".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.step_log {
        lines.push(format!("--step-log={}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove an rc file if it exists.
///
/// # Errors
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list; unknown tokens and bad values are skipped.
///
/// Values follow the flag as the next token or after `=`. The short forms
/// `-l` and `-w` also take `-l3` and `-l=3`.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let (name, inline_value) = split_flag(&tokens[i]);
        let takes_value = matches!(
            name,
            "--lines" | "--width" | "--split-on" | "--marker" | "--max-steps" | "--step-log"
        );
        let value = if !takes_value {
            None
        } else if inline_value.is_some() {
            inline_value
        } else {
            i += 1;
            tokens.get(i).map(String::as_str)
        };

        match (name, value) {
            ("--lines", Some(value)) => flags.lines = value.parse().ok(),
            ("--width", Some(value)) => flags.width = value.trim().parse().ok(),
            ("--split-on", Some(value)) => flags.split_on.push(parse_delimiter(value)),
            ("--marker", Some(value)) => flags.marker = Some(value.to_string()),
            ("--max-steps", Some(value)) => flags.max_steps = value.trim().parse().ok(),
            ("--step-log", Some(value)) => flags.step_log = Some(PathBuf::from(value.trim())),
            ("--animate", _) => {
                flags.animate_ms = Some(
                    inline_value
                        .and_then(|ms| ms.trim().parse().ok())
                        .unwrap_or(1),
                );
            }
            ("--no-split", _) => flags.no_split = true,
            ("--native", _) => flags.native = true,
            ("--json", _) => flags.json = true,
            ("--perf", _) => flags.perf = true,
            _ => {}
        }
        i += 1;
    }
    flags
}

/// Long flag name for a token, plus a value attached to it.
fn split_flag(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        return match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
    }
    let long = match token.get(..2) {
        Some("-l") => "--lines",
        Some("-w") => "--width",
        _ => return (token, None),
    };
    let rest = &token[2..];
    let value = rest.strip_prefix('=').unwrap_or(rest);
    (long, (!value.is_empty()).then_some(value))
}

/// Delimiter named by a flag value; `space` stands for `" "`.
pub fn parse_delimiter(value: &str) -> String {
    if value == SPACE_TOKEN {
        " ".to_string()
    } else {
        value.to_string()
    }
}

fn delimiter_token(delimiter: &str) -> &str {
    if delimiter == " " {
        SPACE_TOKEN
    } else {
        delimiter
    }
}
