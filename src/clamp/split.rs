//! Chunk splitting.

use unicode_segmentation::UnicodeSegmentation;

/// Partition `value` on `delimiter`, literally and in order.
///
/// An empty delimiter splits into grapheme clusters, so an empty value
/// yields no chunks at all.
///
/// ```
/// use lineclamp::clamp::split_chunks;
///
/// assert_eq!(split_chunks("a b  c", " "), vec!["a", "b", "", "c"]);
/// assert_eq!(split_chunks("née", ""), vec!["n", "é", "e"]);
/// ```
pub fn split_chunks<'a>(value: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        value.graphemes(true).collect()
    } else {
        value.split(delimiter).collect()
    }
}
