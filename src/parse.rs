//! Decoding RESP frames into [`Reply`] trees.
//!
//! This module works entirely on in-memory byte slices; it doesn't do any
//! I/O or buffering of its own. Connection code is expected to read bytes
//! from the wire and call [`read_reply`] once it has a complete frame. When
//! the buffer holds only part of a frame, the parsers return
//! [`Error::UnexpectedEof`] with a minimum number of additional bytes to read
//! before trying again.
//!
//! The parsers are modeled after [nom](https://docs.rs/nom): each takes an
//! input slice and returns the parsed value along with the unparsed tail.

use std::str;

use displaydoc::Display;
use memchr::memchr2;
use thiserror::Error;

use crate::reply::{RedisError, Reply};

/// Default for [`Limits::max_bulk_length`]. Redis bulk strings can be up to
/// 512 MB.
pub const DEFAULT_MAX_BULK_LENGTH: usize = 512 * 1024 * 1024;

/// Default for [`Limits::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

// Every RESP frame is at least 3 bytes: a tag byte and the \r\n ending its
// header.
const MIN_FRAME_LENGTH: usize = 3;

/// Parse errors that can occur while decoding RESP data.
///
/// Of especial note to connection authors is the
/// [`UnexpectedEof`][Error::UnexpectedEof] variant; it includes a minimum
/// amount of additional bytes that must be read, after which the parse can
/// be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[non_exhaustive]
pub enum Error {
    /// unexpected end of input; read at least {0} more bytes and try again
    UnexpectedEof(usize),

    /// malformed newline during parsing (all redis newlines are \r\n)
    MalformedNewline,

    /// unrecognized tag byte {0}
    BadTag(u8),

    /// failed to parse a decimal integer
    Number,

    /// an error reply message was not valid UTF-8
    Utf8,

    /// an array or bulk string length was negative or out of bounds
    Length,

    /// arrays were nested more deeply than the configured limit
    TooDeep,

    /// {0} bytes of unparsed data followed the reply
    TrailingData(usize),
}

/// The result of a parse, which can either be a parse error, or a successful
/// parse that includes the parsed value and the unparsed tail of the input.
pub type ParseResult<'a, O> = Result<(O, &'a [u8]), Error>;

/**
Bounds on the replies accepted by [`read_reply`].

```
use redis_reply::parse::{Limits, DEFAULT_MAX_DEPTH};

let limits = Limits::default().with_max_bulk_length(1024);
assert_eq!(limits.max_bulk_length, 1024);
assert_eq!(limits.max_depth, DEFAULT_MAX_DEPTH);
```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The largest bulk string, in bytes, that will be accepted.
    pub max_bulk_length: usize,

    /// How many levels of arrays may be nested. An array at the top level
    /// counts as one level; 0 rejects arrays entirely.
    pub max_depth: usize,
}

impl Limits {
    /// Replace the bulk string length limit.
    #[inline]
    #[must_use]
    pub const fn with_max_bulk_length(self, max_bulk_length: usize) -> Self {
        Self {
            max_bulk_length,
            ..self
        }
    }

    /// Replace the nesting depth limit.
    #[inline]
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }
}

impl Default for Limits {
    #[inline]
    fn default() -> Self {
        Self {
            max_bulk_length: DEFAULT_MAX_BULK_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A parsed RESP frame header.
///
/// Every RESP frame starts with a tag byte and a header payload, terminated
/// by `\r\n`. For bulk strings and arrays the header is a length, and more
/// data follows; for everything else the header is the whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header<'a> {
    /// `+`: a status reply.
    Status(&'a [u8]),

    /// `-`: an error reply.
    Error(&'a [u8]),

    /// `:`: an integer reply.
    Integer(i64),

    /// `$`: a bulk string of this many bytes follows.
    Bulk(i64),

    /// `*`: an array of this many frames follows.
    Multi(i64),

    /// `$-1` or `*-1`: the null bulk string or null array.
    Nil,
}

fn read_endline(input: &[u8]) -> ParseResult<'_, ()> {
    match input {
        [b'\r', b'\n', tail @ ..] => Ok(((), tail)),
        [b'\r'] => Err(Error::UnexpectedEof(1)),
        [] => Err(Error::UnexpectedEof(2)),
        _ => Err(Error::MalformedNewline),
    }
}

#[inline]
#[must_use]
fn split_at_checked(input: &[u8], idx: usize) -> Option<(&[u8], &[u8])> {
    Some((input.get(..idx)?, input.get(idx..)?))
}

/**
Read a frame header: a tag byte and its payload, followed by `\r\n`.

# Example

```
use redis_reply::parse::{read_header, Header};
use cool_asserts::assert_matches;

assert_matches!(
    read_header(b"$5\r\nhello\r\n"),
    Ok((Header::Bulk(5), b"hello\r\n"))
);
```
*/
pub fn read_header(input: &[u8]) -> ParseResult<'_, Header<'_>> {
    match split_at_checked(input, 5) {
        Some((b"+OK\r\n", tail)) => return Ok((Header::Status(b"OK"), tail)),
        Some((b"$-1\r\n" | b"*-1\r\n", tail)) => return Ok((Header::Nil, tail)),
        _ => {}
    }

    let (&tag, input) = input
        .split_first()
        .ok_or(Error::UnexpectedEof(MIN_FRAME_LENGTH))?;

    let end = memchr2(b'\r', b'\n', input).ok_or(Error::UnexpectedEof(2))?;
    let (payload, input) = input.split_at(end);
    let ((), input) = read_endline(input)?;

    let header = match tag {
        b'+' => Header::Status(payload),
        b'-' => Header::Error(payload),
        b':' => Header::Integer(parse_number(payload)?),
        b'$' | b'*' => match parse_number(payload)? {
            -1 => Header::Nil,
            length if tag == b'$' => Header::Bulk(length),
            length => Header::Multi(length),
        },
        tag => return Err(Error::BadTag(tag)),
    };

    Ok((header, input))
}

/**
Read precisely `length` bytes, followed by `\r\n`.

```
use redis_reply::parse::read_exact;
use cool_asserts::assert_matches;

assert_matches!(read_exact(4, b"ABCD\r\n123"), Ok((b"ABCD", b"123")));
```
*/
pub fn read_exact(length: usize, input: &[u8]) -> ParseResult<'_, &[u8]> {
    let (payload, tail) = split_at_checked(input, length)
        .ok_or_else(|| Error::UnexpectedEof((length - input.len()).saturating_add(2)))?;

    let ((), tail) = read_endline(tail)?;

    Ok((payload, tail))
}

/// Parse a signed decimal integer, with an optional leading `+` or `-`.
fn parse_number(payload: &[u8]) -> Result<i64, Error> {
    let (digits, negative) = match payload {
        [b'-', digits @ ..] => (digits, true),
        [b'+', digits @ ..] => (digits, false),
        digits => (digits, false),
    };

    if digits.is_empty() {
        return Err(Error::Number);
    }

    digits
        .iter()
        .try_fold(0i64, |accum, &b| {
            let digit = match b {
                b'0'..=b'9' => i64::from(b - b'0'),
                _ => return None,
            };
            let accum = accum.checked_mul(10)?;

            // Accumulate negative numbers downward so that i64::MIN parses
            if negative {
                accum.checked_sub(digit)
            } else {
                accum.checked_add(digit)
            }
        })
        .ok_or(Error::Number)
}

/**
Read one complete reply, including any nested replies, from the front of
`input`. Returns the reply and the unparsed tail.

Null bulk strings and null arrays both become [`Reply::Nil`]; an empty
array becomes an empty [`Reply::Multi`].

# Example

```
use redis_reply::{Reply, parse::{read_reply, Limits}};

let input = b"*3\r\n$1\r\na\r\n$-1\r\n$1\r\nc\r\n+OK\r\n";
let (reply, tail) = read_reply(input, &Limits::default()).unwrap();

assert_eq!(reply.list().unwrap(), ["a", "", "c"]);
assert_eq!(tail, b"+OK\r\n");
```
*/
pub fn read_reply<'a>(input: &'a [u8], limits: &Limits) -> ParseResult<'a, Reply> {
    read_nested(input, limits, 0)
}

fn read_nested<'a>(input: &'a [u8], limits: &Limits, depth: usize) -> ParseResult<'a, Reply> {
    let (header, input) = read_header(input)?;
    tracing::trace!(?header, depth, "read reply header");

    match header {
        Header::Status(payload) => Ok((Reply::Status(payload.to_vec()), input)),
        Header::Error(payload) => {
            let message = str::from_utf8(payload).map_err(|_| Error::Utf8)?;
            Ok((Reply::Error(RedisError::new(message)), input))
        }
        Header::Integer(value) => Ok((Reply::Integer(value), input)),
        Header::Nil => Ok((Reply::Nil, input)),
        Header::Bulk(length) => {
            let length = match usize::try_from(length) {
                Ok(length) if length <= limits.max_bulk_length => length,
                _ => {
                    tracing::debug!(
                        length,
                        max = limits.max_bulk_length,
                        "rejected bulk string length"
                    );
                    return Err(Error::Length);
                }
            };

            let (payload, input) = read_exact(length, input)?;
            Ok((Reply::Bulk(payload.to_vec()), input))
        }
        Header::Multi(length) => {
            if depth >= limits.max_depth {
                tracing::debug!(depth, max = limits.max_depth, "rejected nested array");
                return Err(Error::TooDeep);
            }

            let length = usize::try_from(length).map_err(|_| {
                tracing::debug!(length, "rejected array length");
                Error::Length
            })?;

            // Don't trust the header for the allocation; each element takes
            // at least MIN_FRAME_LENGTH bytes of the remaining input.
            let mut elements = Vec::with_capacity(length.min(input.len() / MIN_FRAME_LENGTH));
            let mut input = input;

            for remaining in (0..length).rev() {
                let (element, tail) =
                    read_nested(input, limits, depth + 1).map_err(|err| match err {
                        Error::UnexpectedEof(needed) => Error::UnexpectedEof(
                            needed.saturating_add(remaining.saturating_mul(MIN_FRAME_LENGTH)),
                        ),
                        err => err,
                    })?;

                elements.push(element);
                input = tail;
            }

            Ok((Reply::Multi(elements), input))
        }
    }
}

/**
Decode a buffer containing exactly one reply, using the default [`Limits`].

```
use redis_reply::parse::{parse_reply, Error};
use cool_asserts::assert_matches;

let reply = parse_reply(b":1000\r\n").unwrap();
assert_eq!(reply.int64().unwrap(), 1000);

assert_matches!(parse_reply(b":1\r\n:2\r\n"), Err(Error::TrailingData(4)));
```
*/
pub fn parse_reply(input: &[u8]) -> Result<Reply, Error> {
    match read_reply(input, &Limits::default())? {
        (reply, []) => Ok(reply),
        (_, tail) => Err(Error::TrailingData(tail.len())),
    }
}
