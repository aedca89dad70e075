//! Measuring rendered content.
//!
//! The clamp engine never predicts layout: it mutates text and asks a
//! [`LayoutOracle`] what the container measures now. [`CellLayout`] is the
//! oracle for fixed-width terminal output.

mod cell;
mod length;

pub use cell::CellLayout;
pub use length::{Length, parse_int_px, parse_px};

use crate::error::ClampError;
use crate::tree::{NodeId, Tree};

/// Multiplier applied to the font size when `line-height` is `normal`.
pub const NORMAL_LINE_HEIGHT_FACTOR: f32 = 1.2;

/// The host's view of rendered layout.
///
/// Implementations must report up-to-date values immediately after the
/// tree is mutated.
pub trait LayoutOracle {
    /// Rendered height of `element`.
    fn height(&self, tree: &Tree, element: NodeId) -> f32;

    /// Computed value of a style property, e.g. `line-height` or `font-size`.
    fn computed_style(&self, tree: &Tree, element: NodeId, property: &str) -> Option<String>;

    /// Whether styles written by the native clamp path are honored.
    fn supports_native_clamp(&self) -> bool {
        false
    }
}

/// Effective line height of `element` in whole pixels.
///
/// `normal` resolves to the whole-pixel font size times 1.2.
///
/// # Errors
/// Returns [`ClampError::InvalidLineHeight`] when the computed value is
/// missing, non-numeric or zero.
pub fn line_height<O: LayoutOracle + ?Sized>(
    oracle: &O,
    tree: &Tree,
    element: NodeId,
) -> Result<f32, ClampError> {
    let raw = oracle
        .computed_style(tree, element, "line-height")
        .unwrap_or_else(|| "normal".to_string());
    let resolved = if raw.trim() == "normal" {
        let font = font_size(oracle, tree, element)?.trunc();
        (font * NORMAL_LINE_HEIGHT_FACTOR).floor()
    } else {
        parse_int_px(&raw).ok_or_else(|| ClampError::InvalidLineHeight(raw.clone()))?
    };
    if resolved <= 0.0 {
        return Err(ClampError::InvalidLineHeight(raw));
    }
    Ok(resolved)
}

/// Computed font size of `element` in pixels.
///
/// # Errors
/// Returns [`ClampError::InvalidLineHeight`] when the font size cannot be
/// read, since it is only needed to derive a line height or an `em` length.
pub fn font_size<O: LayoutOracle + ?Sized>(
    oracle: &O,
    tree: &Tree,
    element: NodeId,
) -> Result<f32, ClampError> {
    let raw = oracle
        .computed_style(tree, element, "font-size")
        .unwrap_or_default();
    parse_px(&raw).ok_or(ClampError::InvalidLineHeight(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Styled {
        line_height: Option<&'static str>,
        font_size: Option<&'static str>,
    }

    impl LayoutOracle for Styled {
        fn height(&self, _tree: &Tree, _element: NodeId) -> f32 {
            0.0
        }

        fn computed_style(&self, _tree: &Tree, _element: NodeId, property: &str) -> Option<String> {
            match property {
                "line-height" => self.line_height.map(str::to_string),
                "font-size" => self.font_size.map(str::to_string),
                _ => None,
            }
        }
    }

    fn resolve(line_height_value: Option<&'static str>, font: Option<&'static str>) -> Result<f32, ClampError> {
        let tree = Tree::new();
        let oracle = Styled {
            line_height: line_height_value,
            font_size: font,
        };
        line_height(&oracle, &tree, tree.root())
    }

    #[test]
    fn test_line_height_reads_pixels() {
        assert_eq!(resolve(Some("20px"), Some("16px")), Ok(20.0));
    }

    #[test]
    fn test_line_height_truncates_fraction() {
        assert_eq!(resolve(Some("22.8px"), Some("16px")), Ok(22.0));
    }

    #[test]
    fn test_normal_line_height_uses_font_size() {
        assert_eq!(resolve(Some("normal"), Some("20px")), Ok(24.0));
        assert_eq!(resolve(Some("normal"), Some("16px")), Ok(19.0));
    }

    #[test]
    fn test_normal_line_height_drops_font_fraction_first() {
        assert_eq!(resolve(Some("normal"), Some("17.9px")), Ok(20.0));
    }

    #[test]
    fn test_missing_line_height_is_normal() {
        assert_eq!(resolve(None, Some("10px")), Ok(12.0));
    }

    #[test]
    fn test_zero_line_height_is_rejected() {
        assert_eq!(
            resolve(Some("0px"), Some("16px")),
            Err(ClampError::InvalidLineHeight("0px".to_string()))
        );
    }

    #[test]
    fn test_normal_without_font_size_is_rejected() {
        assert!(resolve(Some("normal"), None).is_err());
    }
}
