//! Structured slot paths.
//!
//! Slot paths are explicit segment lists rather than raw dotted strings,
//! so uniqueness, parent/child, and hint-matching checks operate on the
//! tree structure instead of string splitting.

use std::fmt;

/// The path of a slot within a task model's slot tree.
///
/// Displays as the familiar dotted form (`"stereo.left"`). A path with a
/// single segment is a *root* path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotPath {
    segments: Vec<String>,
}

impl SlotPath {
    /// A root path with the given segment.
    #[must_use]
    pub fn root(segment: &str) -> Self {
        Self { segments: vec![segment.to_string()] }
    }

    /// Parses a dotted path. Empty segments are discarded.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').filter(|s| !s.is_empty()).map(str::to_string).collect(),
        }
    }

    /// This path extended by one child segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// The path segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment.
    ///
    /// # Panics
    ///
    /// Panics on an empty path; declared slot paths always have at least
    /// one segment.
    #[must_use]
    pub fn last(&self) -> &str {
        self.segments.last().expect("slot paths are never empty")
    }

    /// The root segment.
    ///
    /// # Panics
    ///
    /// Panics on an empty path; declared slot paths always have at least
    /// one segment.
    #[must_use]
    pub fn root_segment(&self) -> &str {
        self.segments.first().expect("slot paths are never empty")
    }

    /// True when the path has exactly one segment.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// The parent path, or `None` for root paths.
    #[must_use]
    pub fn parent(&self) -> Option<SlotPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self { segments: self.segments[..self.segments.len() - 1].to_vec() })
    }

    /// The dotted suffix below the root segment (`".left"` for
    /// `"stereo.left"`), empty for root paths.
    #[must_use]
    pub fn suffix_below_root(&self) -> String {
        self.segments[1..].iter().map(|s| format!(".{s}")).collect()
    }

    /// True when `hint` selects this path: either the full path equals the
    /// hint, or the path ends with the hint's segments (`"left"` matches
    /// `"stereo.left"`).
    #[must_use]
    pub fn matches_hint(&self, hint: &str) -> bool {
        let hint_segments: Vec<&str> = hint.split('.').filter(|s| !s.is_empty()).collect();
        if hint_segments.is_empty() || hint_segments.len() > self.segments.len() {
            return false;
        }
        let tail = &self.segments[self.segments.len() - hint_segments.len()..];
        tail.iter().zip(&hint_segments).all(|(a, b)| a == b)
    }
}

impl fmt::Display for SlotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::SlotPath;

    #[test]
    fn parses_and_displays_dotted_form() {
        let path = SlotPath::parse("stereo.left");
        assert_eq!(path.segments(), ["stereo", "left"]);
        assert_eq!(path.to_string(), "stereo.left");
        assert!(!path.is_root());
        assert_eq!(path.root_segment(), "stereo");
        assert_eq!(path.last(), "left");
    }

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(SlotPath::root("stereo").parent(), None);
        assert_eq!(SlotPath::parse("stereo.left").parent(), Some(SlotPath::root("stereo")));
    }

    #[test]
    fn suffix_below_root_keeps_leading_dot() {
        assert_eq!(SlotPath::parse("stereo.left").suffix_below_root(), ".left");
        assert_eq!(SlotPath::root("stereo").suffix_below_root(), "");
    }

    #[test]
    fn hints_match_full_path_or_trailing_segments() {
        let path = SlotPath::parse("stereo.left");
        assert!(path.matches_hint("stereo.left"));
        assert!(path.matches_hint("left"));
        assert!(!path.matches_hint("stereo"));
        assert!(!path.matches_hint("right"));
        assert!(SlotPath::root("left").matches_hint("left"));
    }

    #[test]
    fn hint_longer_than_path_never_matches() {
        assert!(!SlotPath::root("left").matches_hint("stereo.left"));
    }
}
