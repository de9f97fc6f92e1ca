use nom::{
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy},
    combinator::{eof, opt, recognize},
    error::context,
    multi::many0_count,
    sequence::pair,
    AsChar, IResult, Parser,
};

/// Characters that separate directories; both are treated identically.
pub const DIRECTORY_SEPARATORS: [char; 2] = ['\\', '/'];

/// Separator inserted when segments are combined.
pub const MAIN_SEPARATOR: char = '\\';

/// Separates a file name from its extension.
pub const EXTENSION_SEPARATOR: char = '.';

#[inline]
pub fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

#[inline]
pub(crate) fn is_sep_byte(b: u8) -> bool {
    b == b'\\' || b == b'/'
}

/// Characters that cannot appear in a directory or file name.
#[inline]
pub(crate) fn is_reserved(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*')
}

fn is_prefix_char(c: char) -> bool {
    !is_reserved(c) && !is_separator(c)
}

// The first segment of a permissive path may carry a drive colon (`C:`);
// later segments may not.
fn is_head_segment_char(c: char) -> bool {
    !matches!(c, '<' | '>' | '"' | '|' | '?' | '*') && !is_separator(c)
}

fn is_tail_segment_char(c: char) -> bool {
    !is_reserved(c) && !is_separator(c)
}

/// Matches a drive or scheme root at the start of the input: one or more
/// ASCII letters, a colon, then a separator (`C:\`, `ftp:/`).
pub fn parse_rooted_prefix(input: &str) -> IResult<&str, &str> {
    context(
        "rooted prefix",
        recognize((
            take_while1(char::is_alpha),
            char(':'),
            satisfy(is_separator),
        )),
    )
    .parse(input)
}

/// Matches a relative prefix at the start of the input: any run of
/// characters outside `< > : " | ? *`, immediately followed by a separator
/// (`.\`, `..\`, `dir\`, and a bare leading `\` all match).
pub fn parse_relative_prefix(input: &str) -> IResult<&str, &str> {
    context(
        "relative prefix",
        recognize(pair(take_while(is_prefix_char), satisfy(is_separator))),
    )
    .parse(input)
}

/// Matches the whole input against a permissive path shape: an optional run
/// of leading back-slashes, an optional literal `?\` marker, then segments
/// free of `< > " | ? *` joined by separator runs. A match does not
/// guarantee the OS accepts the path; a non-match guarantees it cannot be
/// one. Note that a trailing separator fails the shape.
pub fn parse_permissive_path(input: &str) -> IResult<&str, &str> {
    context(
        "permissive path",
        recognize((
            take_while(|c| c == '\\'),
            opt(tag(r"?\")),
            take_while1(is_head_segment_char),
            many0_count(pair(
                take_while1(is_separator),
                take_while1(is_tail_segment_char),
            )),
            eof,
        )),
    )
    .parse(input)
}
