mod builder;
mod fs;
mod segments;
pub mod windows;

use std::{
    cmp,
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    io,
    str::FromStr,
};

use bitflags::bitflags;

pub use builder::PathBuilder;
pub use fs::{KindOnDevice, ShareMode};
pub use segments::Segments;
pub use windows::{
    is_separator, DIRECTORY_SEPARATORS, EXTENSION_SEPARATOR, MAIN_SEPARATOR,
};

use windows::{
    is_reserved, is_sep_byte, parse_permissive_path, parse_relative_prefix,
    parse_rooted_prefix,
};

bitflags! {
    /// Cached classification of a path string.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PathFlags: u8 {
        /// Begins with a drive or scheme root (`C:\`, `ftp:\`).
        const ROOT = 1 << 0;
        /// Begins with a relative prefix (`.\`, `..\`, `dir\`, `\`).
        const RELATIVE = 1 << 1;
        /// Any directory portion is present.
        const DIRECTORY = Self::ROOT.bits() | Self::RELATIVE.bits();
        /// A file name portion is present.
        const FILE_NAME = 1 << 2;
        /// The file name portion has an extension.
        const EXTENSION = 1 << 3;
        const FILE_NAME_WITH_EXTENSION = Self::FILE_NAME.bits() | Self::EXTENSION.bits();
    }
}

/// Boundary indices and flags derived from one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathInfo {
    /// Index of the first character after the last separator; 0 without a
    /// separator, the string length for a trailing separator.
    name_start: usize,
    /// Absolute index of the last `.` at or after `name_start`.
    extension_dot: Option<usize>,
    flags: PathFlags,
}

fn classify(raw: &str) -> PathInfo {
    let name_start = raw
        .as_bytes()
        .iter()
        .rposition(|&b| is_sep_byte(b))
        .map_or(0, |sep| sep + 1);
    let extension_dot = raw[name_start..]
        .rfind(EXTENSION_SEPARATOR)
        .map(|dot| name_start + dot);

    let mut flags = PathFlags::empty();
    if parse_rooted_prefix(raw).is_ok() {
        flags |= PathFlags::ROOT;
    }
    if parse_relative_prefix(raw).is_ok() {
        flags |= PathFlags::RELATIVE;
    }
    if name_start != raw.len() {
        flags |= PathFlags::FILE_NAME;
    }
    if extension_dot.is_some() {
        flags |= PathFlags::EXTENSION;
    }

    PathInfo {
        name_start,
        extension_dot,
        flags,
    }
}

/// Error returned by [`FilePath::normalize`].
#[derive(thiserror::Error, Debug)]
pub enum NormalizeError {
    #[error("InvalidPathError {{ path = {path} }}")]
    InvalidPathError { path: String },
    #[error(transparent)]
    IoError(#[from] io::Error),
}

/// An immutable path string paired with its cached classification.
///
/// The path is pure text: nothing is canonicalized or checked against the
/// filesystem unless explicitly requested. Both `\` and `/` separate
/// directories, and drive or scheme roots (`C:\`, `ftp:\`) are recognized.
/// Every accessor is a borrowed view into the original string; every
/// transformation produces a new value.
#[derive(Clone)]
pub struct FilePath {
    raw: String,
    info: PathInfo,
}

impl FilePath {
    pub fn new(raw: impl Into<String>) -> FilePath {
        let raw = raw.into();
        let info = classify(&raw);
        FilePath { raw, info }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    #[inline]
    pub fn flags(&self) -> PathFlags {
        self.info.flags
    }

    /// Whether any directory portion is present: true for `C:\`, `.\` and
    /// `dir\file`, false for `file.txt` and the empty path.
    #[inline]
    pub fn has_directory(&self) -> bool {
        self.info.flags.intersects(PathFlags::DIRECTORY)
    }

    /// Whether a file name portion is present; false when the path ends in
    /// a separator.
    #[inline]
    pub fn has_file_name(&self) -> bool {
        self.info.flags.contains(PathFlags::FILE_NAME)
    }

    #[inline]
    pub fn has_file_extension(&self) -> bool {
        self.info.flags.contains(PathFlags::EXTENSION)
    }

    /// The directory portion, trailing separator included:
    /// `"C:\dir\to\file.txt"` → `"C:\dir\to\"`.
    #[inline]
    pub fn directory_path(&self) -> &str {
        &self.raw[..self.info.name_start]
    }

    /// The file name portion: `"C:\dir\to\file.txt"` → `"file.txt"`.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.raw[self.info.name_start..]
    }

    /// `"your.file.txt"` → `"your.file"`; `".gitignore"` → `""`.
    pub fn file_name_without_extension(&self) -> &str {
        match self.info.extension_dot {
            Some(dot) => &self.raw[self.info.name_start..dot],
            None => self.file_name(),
        }
    }

    /// The extension including its dot: `"your.file.txt"` → `".txt"`,
    /// `".gitignore"` → `".gitignore"`.
    pub fn extension(&self) -> &str {
        match self.info.extension_dot {
            Some(dot) => &self.raw[dot..],
            None => "",
        }
    }

    /// The extension without its dot: `"your.file.txt"` → `"txt"`.
    pub fn extension_without_dot(&self) -> &str {
        match self.info.extension_dot {
            Some(dot) => &self.raw[dot + 1..],
            None => "",
        }
    }

    /// Whether the text could possibly name a path. False negatives are
    /// impossible; false positives are — the shape is permissive, not a
    /// promise the OS accepts it.
    pub fn is_valid(&self) -> bool {
        !self.raw.is_empty() && parse_permissive_path(&self.raw).is_ok()
    }

    /// Whether the text could possibly name a single file: empty and
    /// all-whitespace strings fail, and every character after the first
    /// non-whitespace one must avoid `< > : " | ? * \ /`.
    pub fn is_valid_file_name(&self) -> bool {
        let mut chars = self.raw.chars();
        loop {
            match chars.next() {
                None => return false,
                Some(ch) if !ch.is_whitespace() => break,
                Some(_) => {}
            }
        }
        !chars.any(|ch| is_reserved(ch) || is_separator(ch))
    }

    /// Case-insensitive, dot-agnostic extension comparison: `".TXT"`,
    /// `"txt"` and `".txt"` all match a `file.txt`. A path without an
    /// extension only matches the empty string.
    pub fn extension_equals(&self, extension: &str) -> bool {
        if !self.has_file_extension() {
            return extension.is_empty();
        }
        if extension.is_empty() {
            return false;
        }
        self.extension_without_dot()
            .eq_ignore_ascii_case(extension.trim_start_matches(EXTENSION_SEPARATOR))
    }

    /// Returns a new path with the extension replaced. An absent extension
    /// is appended, a dotless `new_extension` gains the separating dot, and
    /// an empty one removes the extension.
    pub fn replace_extension(&self, new_extension: &str) -> FilePath {
        let capacity =
            self.raw.len() + new_extension.len() + 1 - self.extension_without_dot().len();
        let mut builder = PathBuilder::with_capacity(capacity);
        builder.append(self.directory_path());
        builder.combine(self.file_name_without_extension());
        builder.append_extension(new_extension);
        builder.to_file_path()
    }

    /// Combines path segments, delimiting adjacent segments with a single
    /// back-slash wherever neither side already provides a separator.
    pub fn combine<S: AsRef<str>>(segments: &[S]) -> FilePath {
        let capacity = segments
            .iter()
            .map(|segment| segment.as_ref().len() + 1)
            .sum();
        let mut builder = PathBuilder::with_capacity(capacity);
        for segment in segments {
            builder.combine(segment.as_ref());
        }
        builder.to_file_path()
    }

    /// Combines this path with additional segments.
    pub fn combine_with<S: AsRef<str>>(&self, segments: &[S]) -> FilePath {
        let capacity = self.raw.len()
            + segments
                .iter()
                .map(|segment| segment.as_ref().len() + 1)
                .sum::<usize>();
        let mut builder = PathBuilder::with_capacity(capacity);
        builder.combine(self.as_str());
        for segment in segments {
            builder.combine(segment.as_ref());
        }
        builder.to_file_path()
    }

    /// Combines a directory, file name and extension:
    /// `("C:\dir\to\", "file", "txt")` → `"C:\dir\to\file.txt"`. The
    /// directory is appended verbatim — providing its trailing separator is
    /// the caller's business — the name is combined, the extension appended
    /// with its dot.
    pub fn combine_directory_name_extension(
        directory_path: &str,
        file_name: &str,
        extension: &str,
    ) -> FilePath {
        let capacity = directory_path.len() + file_name.len() + extension.len() + 2;
        let mut builder = PathBuilder::with_capacity(capacity);
        builder.append(directory_path);
        builder.combine(file_name);
        builder.append_extension(extension);
        builder.to_file_path()
    }

    /// A builder seeded with this path's text and default headroom.
    pub fn to_builder(&self) -> PathBuilder {
        self.to_builder_with_capacity(16)
    }

    /// A builder seeded with this path's text and at least
    /// `additional_capacity` bytes of headroom.
    pub fn to_builder_with_capacity(&self, additional_capacity: usize) -> PathBuilder {
        let mut builder =
            PathBuilder::with_capacity(self.raw.len() + additional_capacity.max(16));
        builder.append(self.as_str());
        builder
    }

    /// A fresh segment cursor over this path.
    #[inline]
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(self.as_str())
    }
}

/// Conversion into an owned [`FilePath`].
pub trait ToFilePath {
    fn to_file_path(&self) -> FilePath;
}

impl ToFilePath for str {
    #[inline]
    fn to_file_path(&self) -> FilePath {
        FilePath::new(self)
    }
}

impl ToFilePath for String {
    #[inline]
    fn to_file_path(&self) -> FilePath {
        FilePath::new(self.as_str())
    }
}

impl ToFilePath for std::path::Path {
    #[inline]
    fn to_file_path(&self) -> FilePath {
        FilePath::new(self.to_string_lossy())
    }
}

impl Default for FilePath {
    #[inline]
    fn default() -> FilePath {
        FilePath::new(String::new())
    }
}

impl fmt::Debug for FilePath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.raw, formatter)
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.raw, formatter)
    }
}

// The type is lexical, so equality and ordering are those of the raw text;
// `"a\b"` and `"a/b"` stay distinct unless normalized.
impl PartialEq for FilePath {
    #[inline]
    fn eq(&self, other: &FilePath) -> bool {
        self.raw == other.raw
    }
}

impl Eq for FilePath {}

impl Hash for FilePath {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.raw.hash(hasher)
    }
}

impl PartialOrd for FilePath {
    #[inline]
    fn partial_cmp(&self, other: &FilePath) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FilePath {
    #[inline]
    fn cmp(&self, other: &FilePath) -> cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T: ?Sized + AsRef<str>> From<&T> for FilePath {
    #[inline]
    fn from(s: &T) -> FilePath {
        FilePath::new(s.as_ref())
    }
}

impl From<String> for FilePath {
    #[inline]
    fn from(s: String) -> FilePath {
        FilePath::new(s)
    }
}

impl From<FilePath> for String {
    #[inline]
    fn from(path: FilePath) -> String {
        path.raw
    }
}

impl FromStr for FilePath {
    type Err = Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FilePath::new(s))
    }
}

impl AsRef<str> for FilePath {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl<'a> IntoIterator for &'a FilePath {
    type Item = &'a str;
    type IntoIter = Segments<'a>;

    #[inline]
    fn into_iter(self) -> Segments<'a> {
        self.segments()
    }
}

macro_rules! impl_cmp_str {
    (<$($life:lifetime),*> $lhs:ty, $rhs: ty) => {
        impl<$($life),*> PartialEq<$rhs> for $lhs {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool {
                <str as PartialEq>::eq(
                    AsRef::<str>::as_ref(self),
                    AsRef::<str>::as_ref(other),
                )
            }
        }

        impl<$($life),*> PartialEq<$lhs> for $rhs {
            #[inline]
            fn eq(&self, other: &$lhs) -> bool {
                <str as PartialEq>::eq(
                    AsRef::<str>::as_ref(self),
                    AsRef::<str>::as_ref(other),
                )
            }
        }

        impl<$($life),*> PartialOrd<$rhs> for $lhs {
            #[inline]
            fn partial_cmp(&self, other: &$rhs) -> Option<cmp::Ordering> {
                <str as PartialOrd>::partial_cmp(
                    AsRef::<str>::as_ref(self),
                    AsRef::<str>::as_ref(other),
                )
            }
        }

        impl<$($life),*> PartialOrd<$lhs> for $rhs {
            #[inline]
            fn partial_cmp(&self, other: &$lhs) -> Option<cmp::Ordering> {
                <str as PartialOrd>::partial_cmp(
                    AsRef::<str>::as_ref(self),
                    AsRef::<str>::as_ref(other),
                )
            }
        }
    };
}

impl_cmp_str!(<> FilePath, str);
impl_cmp_str!(<'a> FilePath, &'a str);
impl_cmp_str!(<> FilePath, String);
