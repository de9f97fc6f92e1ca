use std::fmt;

use smallvec::SmallVec;

use crate::{
    windows::{is_separator, EXTENSION_SEPARATOR, MAIN_SEPARATOR},
    FilePath,
};

/// Bytes the builder holds inline before spilling to the heap.
const INLINE_CAPACITY: usize = 512;

/// A growable path buffer used to combine segments and rebuild paths.
///
/// The buffer lives inline for typical path lengths and spills to an
/// independently owned heap allocation past [`INLINE_CAPACITY`]; the spill
/// is one-directional and not observable through the API. The builder is a
/// single-owner scratch value, not a path in its own right — call
/// [`to_file_path`] to materialize one.
///
/// [`to_file_path`]: PathBuilder::to_file_path
pub struct PathBuilder {
    buf: SmallVec<[u8; INLINE_CAPACITY]>,
}

impl PathBuilder {
    #[inline]
    pub fn new() -> PathBuilder {
        PathBuilder { buf: SmallVec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> PathBuilder {
        PathBuilder {
            buf: SmallVec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // The buffer is only ever extended with `&str` and `char` data.
        unsafe { std::str::from_utf8_unchecked(&self.buf) }
    }

    fn last_char(&self) -> Option<char> {
        self.as_str().chars().next_back()
    }

    pub fn append(&mut self, value: &str) {
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn push(&mut self, ch: char) {
        let mut encoded = [0u8; 4];
        self.buf
            .extend_from_slice(ch.encode_utf8(&mut encoded).as_bytes());
    }

    /// Appends `extension`, inserting the extension separator unless the
    /// extension is empty or already carries one.
    pub fn append_extension(&mut self, extension: &str) {
        if extension.is_empty() {
            return;
        }
        if !extension.starts_with(EXTENSION_SEPARATOR) {
            self.push(EXTENSION_SEPARATOR);
        }
        self.append(extension);
    }

    /// Appends a path segment, inserting a single back-slash iff the buffer
    /// is non-empty and neither boundary character is a separator. Existing
    /// separator runs are left alone; deduplicating them is a job for
    /// normalization, not the builder.
    pub fn combine(&mut self, segment: &str) {
        if segment.is_empty() {
            return;
        }
        if self.buf.is_empty() {
            self.append(segment);
            return;
        }
        let trailing = self.last_char().is_some_and(is_separator);
        let leading = segment.chars().next().is_some_and(is_separator);
        if !trailing && !leading {
            self.push(MAIN_SEPARATOR);
        }
        self.append(segment);
    }

    /// Materializes the buffer into an immutable [`FilePath`], running one
    /// classification pass.
    pub fn to_file_path(&self) -> FilePath {
        FilePath::new(self.as_str())
    }
}

impl Default for PathBuilder {
    #[inline]
    fn default() -> PathBuilder {
        PathBuilder::new()
    }
}

impl fmt::Debug for PathBuilder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), formatter)
    }
}

impl fmt::Display for PathBuilder {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), formatter)
    }
}

impl<S: AsRef<str>> Extend<S> for PathBuilder {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        iter.into_iter().for_each(move |s| self.combine(s.as_ref()));
    }
}

impl<S: AsRef<str>> FromIterator<S> for PathBuilder {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> PathBuilder {
        let mut builder = PathBuilder::new();
        builder.extend(iter);
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::{PathBuilder, INLINE_CAPACITY};

    #[test]
    fn test_combine_inserts_single_backslash() {
        let mut builder = PathBuilder::new();
        builder.combine(r"C:\path");
        builder.combine("to");
        builder.combine("file.txt");
        assert_eq!(builder.as_str(), r"C:\path\to\file.txt");
    }

    #[test]
    fn test_combine_respects_existing_separators() {
        let mut builder = PathBuilder::new();
        builder.combine(r"C:\path\");
        builder.combine("file.txt");
        assert_eq!(builder.as_str(), r"C:\path\file.txt");

        let mut builder = PathBuilder::new();
        builder.combine(r"C:\path");
        builder.combine(r"\file.txt");
        assert_eq!(builder.as_str(), r"C:\path\file.txt");
    }

    // Separator runs already present on either side are kept as-is.
    #[test]
    fn test_combine_does_not_deduplicate() {
        let mut builder = PathBuilder::new();
        builder.combine(r"a\");
        builder.combine(r"\b");
        assert_eq!(builder.as_str(), r"a\\b");
    }

    #[test]
    fn test_combine_skips_empty_segments() {
        let mut builder = PathBuilder::new();
        builder.combine("");
        assert!(builder.is_empty());
        builder.combine("a");
        builder.combine("");
        assert_eq!(builder.as_str(), "a");
    }

    #[test]
    fn test_append_extension() {
        let mut builder = PathBuilder::new();
        builder.append("file");
        builder.append_extension("txt");
        assert_eq!(builder.as_str(), "file.txt");

        let mut builder = PathBuilder::new();
        builder.append("file");
        builder.append_extension(".txt");
        assert_eq!(builder.as_str(), "file.txt");

        let mut builder = PathBuilder::new();
        builder.append("file");
        builder.append_extension("");
        assert_eq!(builder.as_str(), "file");
    }

    #[test]
    fn test_collect_segments() {
        let builder: PathBuilder = ["C:", "path", "to"].into_iter().collect();
        assert_eq!(builder.as_str(), r"C:\path\to");
    }

    // Growing past the inline capacity must not change observable content.
    #[test]
    fn test_heap_spill_is_transparent() {
        let segment = "x".repeat(100);
        let mut builder = PathBuilder::new();
        let mut expected = String::new();
        for _ in 0..8 {
            builder.combine(&segment);
            if !expected.is_empty() {
                expected.push('\\');
            }
            expected.push_str(&segment);
        }
        assert!(builder.len() > INLINE_CAPACITY);
        assert_eq!(builder.as_str(), expected);
        assert_eq!(builder.to_file_path().as_str(), expected);
    }
}
