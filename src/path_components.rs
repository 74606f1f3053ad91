//! The pathComponents view: the hierarchical path as a sequence of segments.
//! Reads return the segments as serialized; writes percent-encode new text.
//!
//! Not available for URLs with an opaque path.  All mutations rebuild the
//! path region through the rewriter, so the URL stays normalized and
//! re-parseable.

use crate::error::SetterError;
use crate::percent::{percent_encode, EncodeSet};
use crate::url::Url;

/// Read-only view over the path's segments.
#[derive(Copy, Clone, Debug)]
pub struct PathComponents<'a> {
    url: &'a Url,
}
impl<'a> PathComponents<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.url.structure.path_segment_count as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The segment at `index`, still percent-encoded.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.iter().nth(index)
    }

    /// Iterate the segments front-to-back or back-to-front.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a str> {
        let path = self.url.path();
        let tail = path.strip_prefix('/').unwrap_or(path);
        let empty = self.url.structure.path_segment_count == 0;
        tail.split('/').filter(move |_| !empty)
    }
}

/// Mutating view over the path's segments.
///
/// Inserted text is percent-encoded with the component set, so a `/` inside
/// a segment stays one segment.
#[derive(Debug)]
pub struct PathComponentsMut<'a> {
    url: &'a mut Url,
}
impl PathComponentsMut<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.url.structure.path_segment_count as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<String> {
        self.segments().into_iter().nth(index)
    }

    /// Append a segment at the end.
    pub fn push(&mut self, segment: &str) {
        let mut segments = self.segments();
        segments.push(percent_encode(segment, EncodeSet::Component));
        self.rebuild(segments);
    }

    /// Remove and return the last segment.
    pub fn pop(&mut self) -> Option<String> {
        let mut segments = self.segments();
        let removed = segments.pop()?;
        self.rebuild(segments);
        Some(removed)
    }

    /// Insert a segment at `index`.
    ///
    /// # Panics
    /// Panics when `index` is greater than the number of segments.
    pub fn insert(&mut self, index: usize, segment: &str) {
        let mut segments = self.segments();
        assert!(index <= segments.len(), "index out of bounds");
        segments.insert(index, percent_encode(segment, EncodeSet::Component));
        self.rebuild(segments);
    }

    /// Remove and return the segment at `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> String {
        let mut segments = self.segments();
        assert!(index < segments.len(), "index out of bounds");
        let removed = segments.remove(index);
        self.rebuild(segments);
        removed
    }

    /// Replace the segment at `index`.
    ///
    /// # Panics
    /// Panics when `index` is out of bounds.
    pub fn set(&mut self, index: usize, segment: &str) {
        let mut segments = self.segments();
        assert!(index < segments.len(), "index out of bounds");
        segments[index] = percent_encode(segment, EncodeSet::Component);
        self.rebuild(segments);
    }

    /// Replace the segments in `range` with `replacement`.  The two lengths
    /// need not match.
    ///
    /// # Panics
    /// Panics when `range` is out of bounds.
    pub fn replace_range<'s>(
        &mut self,
        range: core::ops::Range<usize>,
        replacement: impl IntoIterator<Item = &'s str>,
    ) {
        let mut segments = self.segments();
        assert!(
            range.start <= range.end && range.end <= segments.len(),
            "range out of bounds"
        );
        segments.splice(
            range,
            replacement
                .into_iter()
                .map(|segment| percent_encode(segment, EncodeSet::Component)),
        );
        self.rebuild(segments);
    }

    /// Remove every segment.  Special URLs keep their root `/`.
    pub fn clear(&mut self) {
        self.rebuild(Vec::new());
    }

    /// Append every segment from `iter`.
    pub fn extend<'s>(&mut self, iter: impl IntoIterator<Item = &'s str>) {
        let mut segments = self.segments();
        segments.extend(
            iter.into_iter()
                .map(|segment| percent_encode(segment, EncodeSet::Component)),
        );
        self.rebuild(segments);
    }

    fn segments(&self) -> Vec<String> {
        if self.url.structure.path_segment_count == 0 {
            return Vec::new();
        }
        let path = self.url.path();
        let tail = path.strip_prefix('/').unwrap_or(path);
        tail.split('/').map(str::to_string).collect()
    }

    fn rebuild(&mut self, segments: Vec<String>) {
        self.url.path_clear();
        if segments.is_empty() {
            // A special URL's serialization must keep a path, or the next
            // parse would invent one and break round-tripping.
            if self.url.structure.is_special() {
                self.url.path_append_segment("");
            }
        } else {
            for segment in &segments {
                self.url.path_append_segment(segment);
            }
        }
        self.url.apply_path_marker();
    }
}

impl Url {
    /// The path's segments, or `None` for an opaque path.
    #[must_use]
    pub fn path_components(&self) -> Option<PathComponents<'_>> {
        if self.structure.has_opaque_path {
            return None;
        }
        Some(PathComponents { url: self })
    }

    /// Mutable view of the path's segments.
    ///
    /// # Errors
    /// Rejected on an opaque-path URL.
    pub fn path_components_mut(&mut self) -> Result<PathComponentsMut<'_>, SetterError> {
        if self.structure.has_opaque_path {
            return Err(SetterError::OpaquePath);
        }
        Ok(PathComponentsMut { url: self })
    }
}
