mod error;
mod ser;

use std::{
    collections::HashMap,
    fmt::{self, Display},
    str,
};

pub use self::error::{Conversion, ElementRole, Error, ErrorCategory, RedisError};

/// The kind of a [`Reply`], without its payload.
///
/// The [`Display`] names match the reply type names used in accessor error
/// messages (`"reply type is not MultiReply"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    /// A RESP simple string, such as `+OK`.
    Status,

    /// A RESP error, such as `-ERR unknown command`.
    Error,

    /// A RESP integer.
    Integer,

    /// A null bulk string or null array.
    Nil,

    /// A RESP bulk string.
    Bulk,

    /// A RESP array.
    Multi,
}

impl Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReplyKind::Status => "StatusReply",
            ReplyKind::Error => "ErrorReply",
            ReplyKind::Integer => "IntegerReply",
            ReplyKind::Nil => "NilReply",
            ReplyKind::Bulk => "BulkReply",
            ReplyKind::Multi => "MultiReply",
        })
    }
}

/**
A single decoded RESP reply.

A [`Reply`] is a plain owned tree: [`Multi`][Reply::Multi] replies own their
elements, in wire order. Replies are built once, by a decoder such as
[`parse::read_reply`][crate::parse::read_reply], and only read afterwards.

The accessor methods convert a reply into native types, following the usual
Redis client conventions:

- Every accessor called on an [`Error`][Reply::Error] reply returns the
  stored [`RedisError`] (as [`Error::Redis`]), whatever the conversion.
- Integers can be read from integer replies or from status and bulk replies
  containing a decimal number, since many commands return numbers as strings.
- Aggregate conversions ([`list`][Reply::list], [`hash`][Reply::hash]) check
  every element and never return a partial result.

# Example

```
use redis_reply::{Reply, ErrorCategory};
use cool_asserts::assert_matches;

let reply = Reply::Multi(vec![
    Reply::bulk("a"),
    Reply::Nil,
    Reply::bulk("c"),
]);

assert_eq!(reply.list().unwrap(), ["a", "", "c"]);
assert_eq!(reply.to_string(), "[ a <nil> c ]");

let err = reply.str().unwrap_err();
assert_eq!(err.category(), ErrorCategory::UnsupportedConversion);

let counter = Reply::bulk("42");
assert_matches!(counter.int64(), Ok(42));
```
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A status reply, such as `OK` or `PONG`.
    Status(Vec<u8>),

    /// An error reply.
    Error(RedisError),

    /// An integer reply.
    Integer(i64),

    /// The null reply, sent for both null bulk strings and null arrays. This
    /// is distinct from an empty [`Multi`][Reply::Multi].
    Nil,

    /// A bulk string reply. Bulk strings are binary safe; the payload is
    /// kept exactly as it was sent.
    Bulk(Vec<u8>),

    /// A multi bulk reply (a RESP array).
    Multi(Vec<Reply>),
}

impl Reply {
    /// Create a [`Status`][Reply::Status] reply.
    #[inline]
    #[must_use]
    pub fn status(text: impl Into<Vec<u8>>) -> Self {
        Reply::Status(text.into())
    }

    /// Create a [`Bulk`][Reply::Bulk] reply.
    #[inline]
    #[must_use]
    pub fn bulk(text: impl Into<Vec<u8>>) -> Self {
        Reply::Bulk(text.into())
    }

    /// Create an [`Error`][Reply::Error] reply from an error message.
    #[inline]
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(RedisError::new(message))
    }

    /// Get the kind of this reply.
    #[must_use]
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Status(_) => ReplyKind::Status,
            Reply::Error(_) => ReplyKind::Error,
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::Nil => ReplyKind::Nil,
            Reply::Bulk(_) => ReplyKind::Bulk,
            Reply::Multi(_) => ReplyKind::Multi,
        }
    }

    /// True if this is an error reply.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// True if this is the nil reply.
    #[inline]
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    /// Get the elements of a multi bulk reply.
    #[inline]
    #[must_use]
    pub fn elements(&self) -> Option<&[Reply]> {
        match self {
            Reply::Multi(elements) => Some(elements),
            _ => None,
        }
    }

    /// Convert an error reply into an [`Err`], and any other reply into an
    /// [`Ok`]. This allows `?` to be used to bail out on error replies.
    ///
    /// ```
    /// use redis_reply::Reply;
    ///
    /// let err = Reply::error("ERR wrong number of arguments").into_result().unwrap_err();
    /// assert_eq!(err.code(), "ERR");
    ///
    /// let reply = Reply::status("OK").into_result().unwrap();
    /// assert_eq!(reply.str().unwrap(), "OK");
    /// ```
    pub fn into_result(self) -> Result<Reply, RedisError> {
        match self {
            Reply::Error(err) => Err(err),
            reply => Ok(reply),
        }
    }

    /// Return the stored failure if this is an error reply.
    #[inline]
    fn check_failure(&self) -> Result<(), Error> {
        match self {
            Reply::Error(err) => Err(Error::Redis(err.clone())),
            _ => Ok(()),
        }
    }

    /// Get the text of a status or bulk reply. Fails with [`Error::Utf8`] if
    /// the payload isn't UTF-8; use [`bytes`][Reply::bytes] for binary data.
    pub fn str(&self) -> Result<&str, Error> {
        self.bytes().and_then(utf8)
    }

    /**
    Get the payload of a status or bulk reply, exactly as it was sent.

    ```
    use redis_reply::{Reply, Error};

    let reply = Reply::bulk(b"\xff\x00".as_slice());
    assert_eq!(reply.bytes().unwrap(), b"\xff\x00");
    assert_eq!(reply.str().unwrap_err(), Error::Utf8);
    ```
    */
    pub fn bytes(&self) -> Result<&[u8], Error> {
        self.check_failure()?;

        match self {
            Reply::Status(text) | Reply::Bulk(text) => Ok(text.as_slice()),
            _ => Err(Error::Unsupported(Conversion::String)),
        }
    }

    /**
    Get the value of an integer reply, or of a status or bulk reply
    containing a base 10 signed 64 bit integer.

    ```
    use redis_reply::{Reply, ErrorCategory};

    assert_eq!(Reply::Integer(-7).int64().unwrap(), -7);
    assert_eq!(Reply::bulk("42").int64().unwrap(), 42);

    let err = Reply::bulk("abc").int64().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ParseError);

    let err = Reply::Nil.int64().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedConversion);
    ```
    */
    pub fn int64(&self) -> Result<i64, Error> {
        self.check_failure()?;

        if let Reply::Integer(value) = *self {
            return Ok(value);
        }

        match self.bytes() {
            Ok(text) => utf8(text)
                .ok()
                .and_then(|text| text.parse().ok())
                .ok_or(Error::Parse),
            Err(_) => Err(Error::Unsupported(Conversion::Integer)),
        }
    }

    /// Same as [`int64`][Reply::int64], narrowed to an `isize`. Values that
    /// don't fit fail with [`Error::Overflow`] rather than being truncated.
    pub fn int(&self) -> Result<isize, Error> {
        let value = self.int64()?;
        isize::try_from(value).map_err(|_| Error::Overflow(value))
    }

    /**
    Get the truthiness of a reply.

    Integers (including integers in string replies) are false if they're 0.
    Other strings, including binary ones, are false if they're exactly `"0"`.
    The integer interpretation is always tried first, at the full 64 bit
    width, so an integer reply never fails this conversion.

    ```
    use redis_reply::Reply;

    assert!(!Reply::Integer(0).bool().unwrap());
    assert!(Reply::Integer(5).bool().unwrap());
    assert!(!Reply::bulk("0").bool().unwrap());
    assert!(Reply::bulk("0x").bool().unwrap());
    assert!(Reply::Nil.bool().is_err());
    ```
    */
    pub fn bool(&self) -> Result<bool, Error> {
        self.check_failure()?;

        if let Ok(value) = self.int64() {
            return Ok(value != 0);
        }

        if let Ok(text) = self.bytes() {
            return Ok(text != b"0");
        }

        Err(Error::Unsupported(Conversion::Boolean))
    }

    /// Get the elements of a multi bulk reply, or a [`WrongKind`][Error::WrongKind]
    /// error for any other reply.
    fn multi(&self) -> Result<&[Reply], Error> {
        self.check_failure()?;

        self.elements().ok_or_else(|| Error::WrongKind {
            expected: ReplyKind::Multi,
            found: self.kind(),
        })
    }

    /**
    Get the elements of a multi bulk reply as a list of strings. Every element
    must be a bulk reply or nil; nil elements become empty strings. A bulk
    element that isn't UTF-8 fails the whole conversion with [`Error::Utf8`].

    ```
    use redis_reply::{Reply, ErrorCategory};

    let reply = Reply::Multi(vec![Reply::bulk("a"), Reply::Nil, Reply::bulk("c")]);
    assert_eq!(reply.list().unwrap(), ["a", "", "c"]);

    let reply = Reply::Multi(vec![Reply::bulk("a"), Reply::Integer(1)]);
    let err = reply.list().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InvalidElement);
    ```
    */
    pub fn list(&self) -> Result<Vec<&str>, Error> {
        self.multi()?
            .iter()
            .enumerate()
            .map(|(index, element)| match element {
                Reply::Bulk(text) => utf8(text),
                Reply::Nil => Ok(""),
                _ => Err(Error::InvalidElement {
                    role: ElementRole::Item,
                    index,
                }),
            })
            .collect()
    }

    /**
    Get the elements of a multi bulk reply as a map, treating them as a
    flattened list of key-value pairs (as returned by `HGETALL` and similar
    commands).

    Keys may be any reply with a [string value][Reply::str]. Values must be
    bulk replies or nil; keys with nil values are left out of the map
    entirely. If a key appears more than once, the last value wins.

    ```
    use redis_reply::{Reply, ErrorCategory};

    let reply = Reply::Multi(vec![
        Reply::bulk("k1"),
        Reply::bulk("v1"),
        Reply::bulk("k2"),
        Reply::Nil,
    ]);

    let hash = reply.hash().unwrap();
    assert_eq!(hash.len(), 1);
    assert_eq!(hash["k1"], "v1");
    assert!(!hash.contains_key("k2"));

    let reply = Reply::Multi(vec![Reply::bulk("k1"), Reply::bulk("v1"), Reply::bulk("k2")]);
    let err = reply.hash().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::MalformedAggregate);
    ```
    */
    pub fn hash(&self) -> Result<HashMap<&str, &str>, Error> {
        let elements = self.multi()?;

        if elements.len() % 2 != 0 {
            return Err(Error::OddLength(elements.len()));
        }

        let mut map = HashMap::with_capacity(elements.len() / 2);

        for (pair, chunk) in elements.chunks_exact(2).enumerate() {
            let key_index = pair * 2;
            let (key, value) = (&chunk[0], &chunk[1]);

            let key = key.str().map_err(|_| Error::InvalidElement {
                role: ElementRole::Key,
                index: key_index,
            })?;

            match value {
                Reply::Bulk(text) => {
                    map.insert(key, utf8(text)?);
                }
                Reply::Nil => {}
                _ => {
                    return Err(Error::InvalidElement {
                        role: ElementRole::Value,
                        index: key_index + 1,
                    })
                }
            }
        }

        Ok(map)
    }

    /// Render the reply and its sub-replies for debugging. This is the same
    /// as the [`Display`] implementation; use [`str`][Reply::str] to actually
    /// read string replies.
    #[inline]
    #[must_use]
    pub fn debug_string(&self) -> String {
        self.to_string()
    }
}

#[inline]
fn utf8(text: &[u8]) -> Result<&str, Error> {
    str::from_utf8(text).map_err(|_| Error::Utf8)
}

// Pending output while rendering a reply tree
enum Render<'a> {
    Reply(&'a Reply),
    Separator,
    Close,
}

/// Non-UTF-8 payloads are rendered lossily. Nested replies are rendered with
/// an explicit stack, so arbitrarily deep trees don't exhaust the call stack.
impl Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Render::Reply(self)];

        while let Some(item) = stack.pop() {
            match item {
                Render::Separator => f.write_str(" ")?,
                Render::Close => f.write_str("]")?,
                Render::Reply(Reply::Error(err)) => f.write_str(err.message())?,
                Render::Reply(Reply::Status(text) | Reply::Bulk(text)) => {
                    f.write_str(&String::from_utf8_lossy(text))?;
                }
                Render::Reply(Reply::Integer(value)) => write!(f, "{value}")?,
                Render::Reply(Reply::Nil) => f.write_str("<nil>")?,
                Render::Reply(Reply::Multi(elements)) => {
                    f.write_str("[ ")?;
                    stack.push(Render::Close);
                    for element in elements.iter().rev() {
                        stack.push(Render::Separator);
                        stack.push(Render::Reply(element));
                    }
                }
            }
        }

        Ok(())
    }
}

impl From<i64> for Reply {
    #[inline]
    fn from(value: i64) -> Self {
        Reply::Integer(value)
    }
}

impl From<RedisError> for Reply {
    #[inline]
    fn from(err: RedisError) -> Self {
        Reply::Error(err)
    }
}

impl From<Vec<Reply>> for Reply {
    #[inline]
    fn from(elements: Vec<Reply>) -> Self {
        Reply::Multi(elements)
    }
}

/// [`None`] becomes [`Reply::Nil`].
impl<T: Into<Reply>> From<Option<T>> for Reply {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Reply::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use cool_asserts::assert_matches;
    use itertools::Itertools as _;

    use super::*;

    fn wrongtype() -> RedisError {
        RedisError::new("WRONGTYPE Operation against a key holding the wrong kind of value")
    }

    fn every_kind() -> Vec<Reply> {
        vec![
            Reply::status("OK"),
            Reply::Error(wrongtype()),
            Reply::Integer(12),
            Reply::Nil,
            Reply::bulk("hello"),
            Reply::Multi(vec![Reply::bulk("a"), Reply::bulk("b")]),
        ]
    }

    #[test]
    fn replies_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Reply>();
        assert_send_sync::<Error>();
    }

    #[test]
    fn kinds() {
        let kinds = every_kind().iter().map(Reply::kind).collect_vec();
        assert_eq!(
            kinds,
            [
                ReplyKind::Status,
                ReplyKind::Error,
                ReplyKind::Integer,
                ReplyKind::Nil,
                ReplyKind::Bulk,
                ReplyKind::Multi,
            ]
        );

        assert!(Reply::error("ERR").is_error());
        assert!(Reply::Nil.is_nil());
        assert!(!Reply::Multi(vec![]).is_nil());
        assert_eq!(Reply::Integer(1).elements(), None);
    }

    #[test]
    fn error_reply_short_circuits_every_accessor() {
        let reply = Reply::Error(wrongtype());
        let expected = Error::Redis(wrongtype());

        assert_eq!(reply.str().unwrap_err(), expected);
        assert_eq!(reply.bytes().unwrap_err(), expected);
        assert_eq!(reply.int64().unwrap_err(), expected);
        assert_eq!(reply.int().unwrap_err(), expected);
        assert_eq!(reply.bool().unwrap_err(), expected);
        assert_eq!(reply.list().unwrap_err(), expected);
        assert_eq!(reply.hash().unwrap_err(), expected);
    }

    mod string {
        use super::*;

        #[test]
        fn status() {
            assert_matches!(Reply::status("OK").str(), Ok("OK"));
        }

        #[test]
        fn bulk() {
            assert_matches!(Reply::bulk("hello world").str(), Ok("hello world"));
        }

        #[test]
        fn empty_bulk() {
            assert_matches!(Reply::bulk("").str(), Ok(""));
        }

        #[test]
        fn unsupported() {
            for reply in [
                Reply::Integer(1),
                Reply::Nil,
                Reply::Multi(vec![Reply::bulk("a")]),
            ] {
                assert_matches!(
                    reply.str(),
                    Err(Error::Unsupported(Conversion::String))
                );
            }
        }

        #[test]
        fn bytes() {
            assert_matches!(Reply::bulk("héllo").bytes(), Ok(b"h\xc3\xa9llo"));
            assert_matches!(
                Reply::Integer(1).bytes(),
                Err(Error::Unsupported(Conversion::String))
            );
        }

        #[test]
        fn binary() {
            let reply = Reply::bulk(b"\xff\x00a".as_slice());
            assert_matches!(reply.bytes(), Ok(b"\xff\x00a"));
            assert_matches!(reply.str(), Err(Error::Utf8));
            assert_matches!(reply.int64(), Err(Error::Parse));
            assert_matches!(reply.bool(), Ok(true));
        }
    }

    mod integer {
        use super::*;

        macro_rules! int64_tests {
            ($($name:ident: $reply:expr => $expected:pat,)*) => {$(
                #[test]
                fn $name() {
                    assert_matches!($reply.int64(), $expected);
                }
            )*};
        }

        int64_tests! {
            integer: Reply::Integer(42) => Ok(42),
            negative_integer: Reply::Integer(-3) => Ok(-3),
            bulk: Reply::bulk("42") => Ok(42),
            status: Reply::status("-17") => Ok(-17),
            explicit_plus: Reply::bulk("+8") => Ok(8),
            max: Reply::bulk("9223372036854775807") => Ok(i64::MAX),
            min: Reply::bulk("-9223372036854775808") => Ok(i64::MIN),
            not_a_number: Reply::bulk("abc") => Err(Error::Parse),
            empty: Reply::bulk("") => Err(Error::Parse),
            whitespace: Reply::bulk(" 1") => Err(Error::Parse),
            overflow: Reply::bulk("9223372036854775808") => Err(Error::Parse),
            float: Reply::bulk("1.5") => Err(Error::Parse),
            nil: Reply::Nil => Err(Error::Unsupported(Conversion::Integer)),
            multi: Reply::Multi(vec![]) => Err(Error::Unsupported(Conversion::Integer)),
        }

        #[test]
        fn int_narrows() {
            assert_matches!(Reply::Integer(100).int(), Ok(100));
            assert_matches!(Reply::bulk("-5").int(), Ok(-5));
            assert_matches!(Reply::bulk("x").int(), Err(Error::Parse));
        }

        #[cfg(target_pointer_width = "32")]
        #[test]
        fn int_overflow() {
            assert_matches!(
                Reply::Integer(i64::MAX).int(),
                Err(Error::Overflow(i64::MAX))
            );
        }
    }

    mod boolean {
        use super::*;

        macro_rules! bool_tests {
            ($($name:ident: $reply:expr => $expected:pat,)*) => {$(
                #[test]
                fn $name() {
                    assert_matches!($reply.bool(), $expected);
                }
            )*};
        }

        bool_tests! {
            zero: Reply::Integer(0) => Ok(false),
            five: Reply::Integer(5) => Ok(true),
            negative: Reply::Integer(-1) => Ok(true),
            bulk_zero: Reply::bulk("0") => Ok(false),
            bulk_zero_x: Reply::bulk("0x") => Ok(true),
            bulk_text: Reply::bulk("yes") => Ok(true),
            bulk_empty: Reply::bulk("") => Ok(true),
            status_zero: Reply::status("0") => Ok(false),

            // These parse as integers, so integer truthiness applies
            bulk_padded_zero: Reply::bulk("00") => Ok(false),
            bulk_negative_zero: Reply::bulk("-0") => Ok(false),
            bulk_one: Reply::bulk("1") => Ok(true),

            nil: Reply::Nil => Err(Error::Unsupported(Conversion::Boolean)),
            multi: Reply::Multi(vec![Reply::Integer(0)]) => Err(Error::Unsupported(Conversion::Boolean)),

            // Integer truthiness doesn't depend on the platform integer width
            large: Reply::Integer(i64::MAX) => Ok(true),
            large_negative: Reply::Integer(i64::MIN) => Ok(true),
            bulk_large: Reply::bulk("9223372036854775807") => Ok(true),

            binary: Reply::bulk(b"\xff".as_slice()) => Ok(true),
            binary_zero: Reply::bulk(b"0".as_slice()) => Ok(false),
        }
    }

    mod list {
        use super::*;

        #[test]
        fn bulk_and_nil() {
            let reply = Reply::Multi(vec![Reply::bulk("a"), Reply::Nil, Reply::bulk("c")]);
            assert_eq!(reply.list().unwrap(), ["a", "", "c"]);
        }

        #[test]
        fn empty() {
            assert_eq!(Reply::Multi(vec![]).list().unwrap(), Vec::<&str>::new());
        }

        #[test]
        fn invalid_element() {
            let reply = Reply::Multi(vec![Reply::bulk("a"), Reply::Integer(1)]);
            assert_matches!(
                reply.list(),
                Err(Error::InvalidElement {
                    role: ElementRole::Item,
                    index: 1
                })
            );
        }

        #[test]
        fn binary_element() {
            let reply = Reply::Multi(vec![Reply::bulk("a"), Reply::bulk(b"\xff".as_slice())]);
            assert_matches!(reply.list(), Err(Error::Utf8));
        }

        #[test]
        fn status_elements_are_invalid() {
            let reply = Reply::Multi(vec![Reply::status("OK")]);
            assert_matches!(
                reply.list(),
                Err(Error::InvalidElement {
                    role: ElementRole::Item,
                    index: 0
                })
            );
        }

        #[test]
        fn nested_error_is_an_invalid_element() {
            let reply = Reply::Multi(vec![Reply::Error(wrongtype())]);
            assert_matches!(reply.list(), Err(Error::InvalidElement { .. }));
        }

        #[test]
        fn wrong_kind() {
            for reply in [Reply::Nil, Reply::bulk("a"), Reply::Integer(3)] {
                let found = reply.kind();
                assert_matches!(
                    reply.list(),
                    Err(Error::WrongKind { expected: ReplyKind::Multi, found: f }) => {
                        assert_eq!(f, found);
                    }
                );
            }
        }
    }

    mod hash {
        use super::*;

        fn multi(elements: impl IntoIterator<Item = Reply>) -> Reply {
            Reply::Multi(elements.into_iter().collect())
        }

        #[test]
        fn pairs() {
            let reply = multi([
                Reply::bulk("k1"),
                Reply::bulk("v1"),
                Reply::bulk("k2"),
                Reply::bulk("v2"),
            ]);

            let hash = reply.hash().unwrap();
            assert_eq!(hash, HashMap::from([("k1", "v1"), ("k2", "v2")]));
        }

        #[test]
        fn nil_values_are_omitted() {
            let reply = multi([
                Reply::bulk("k1"),
                Reply::bulk("v1"),
                Reply::bulk("k2"),
                Reply::Nil,
            ]);

            let hash = reply.hash().unwrap();
            assert_eq!(hash, HashMap::from([("k1", "v1")]));
        }

        #[test]
        fn last_duplicate_wins() {
            let reply = multi([
                Reply::bulk("k"),
                Reply::bulk("first"),
                Reply::bulk("k"),
                Reply::bulk("second"),
            ]);

            assert_eq!(reply.hash().unwrap(), HashMap::from([("k", "second")]));
        }

        #[test]
        fn status_keys() {
            let reply = multi([Reply::status("k"), Reply::bulk("v")]);
            assert_eq!(reply.hash().unwrap(), HashMap::from([("k", "v")]));
        }

        #[test]
        fn empty() {
            assert!(Reply::Multi(vec![]).hash().unwrap().is_empty());
        }

        #[test]
        fn odd_length() {
            let reply = multi([Reply::bulk("k1"), Reply::bulk("v1"), Reply::bulk("k2")]);
            assert_matches!(reply.hash(), Err(Error::OddLength(3)));
        }

        #[test]
        fn invalid_key() {
            let reply = multi([
                Reply::bulk("k1"),
                Reply::bulk("v1"),
                Reply::Integer(2),
                Reply::bulk("v2"),
            ]);

            assert_matches!(
                reply.hash(),
                Err(Error::InvalidElement {
                    role: ElementRole::Key,
                    index: 2
                })
            );
        }

        #[test]
        fn error_key_is_an_invalid_element() {
            let reply = multi([Reply::Error(wrongtype()), Reply::bulk("v")]);
            assert_matches!(
                reply.hash(),
                Err(Error::InvalidElement {
                    role: ElementRole::Key,
                    index: 0
                })
            );
        }

        #[test]
        fn invalid_value() {
            let reply = multi([Reply::bulk("k1"), Reply::status("v1")]);
            assert_matches!(
                reply.hash(),
                Err(Error::InvalidElement {
                    role: ElementRole::Value,
                    index: 1
                })
            );
        }

        #[test]
        fn binary_value() {
            let reply = multi([Reply::bulk("k"), Reply::bulk(b"\xff".as_slice())]);
            assert_matches!(reply.hash(), Err(Error::Utf8));
        }

        #[test]
        fn wrong_kind() {
            assert_matches!(
                Reply::Nil.hash(),
                Err(Error::WrongKind {
                    expected: ReplyKind::Multi,
                    found: ReplyKind::Nil
                })
            );
        }
    }

    mod debug_string {
        use super::*;

        macro_rules! debug_string_tests {
            ($($name:ident: $reply:expr => $expected:literal,)*) => {$(
                #[test]
                fn $name() {
                    assert_eq!($reply.debug_string(), $expected);
                }
            )*};
        }

        debug_string_tests! {
            status: Reply::status("OK") => "OK",
            error: Reply::Error(wrongtype()) => "WRONGTYPE Operation against a key holding the wrong kind of value",
            integer: Reply::Integer(-12) => "-12",
            nil: Reply::Nil => "<nil>",
            bulk: Reply::bulk("hello") => "hello",
            empty_multi: Reply::Multi(vec![]) => "[ ]",
            multi: Reply::Multi(vec![Reply::bulk("a"), Reply::Integer(1), Reply::Nil]) => "[ a 1 <nil> ]",
            nested: Reply::Multi(vec![
                Reply::bulk("a"),
                Reply::Multi(vec![Reply::Integer(1), Reply::Multi(vec![])]),
                Reply::error("ERR x"),
            ]) => "[ a [ 1 [ ] ] ERR x ]",
        }

        #[test]
        fn binary_is_lossy() {
            let reply = Reply::Multi(vec![Reply::bulk(b"a\xffb".as_slice())]);
            assert_eq!(reply.debug_string(), "[ a\u{fffd}b ]");
        }

        #[test]
        fn deep_nesting() {
            const DEPTH: usize = 100_000;

            let reply = (0..DEPTH).fold(Reply::Nil, |inner, _| Reply::Multi(vec![inner]));
            let expected = format!(
                "{}<nil> {}]",
                "[ ".repeat(DEPTH),
                "] ".repeat(DEPTH - 1)
            );
            assert_eq!(reply.debug_string(), expected);

            // Take the tree apart one level at a time; dropping it whole
            // would recurse once per level
            let mut reply = reply;
            while let Reply::Multi(mut elements) = reply {
                reply = elements.pop().unwrap_or(Reply::Nil);
            }
        }
    }

    #[test]
    fn accessors_are_idempotent() {
        for reply in every_kind() {
            assert_eq!(reply.str(), reply.str());
            assert_eq!(reply.int64(), reply.int64());
            assert_eq!(reply.bool(), reply.bool());
            assert_eq!(reply.list(), reply.list());
            assert_eq!(reply.hash(), reply.hash());
            assert_eq!(reply.debug_string(), reply.debug_string());
        }
    }

    #[test]
    fn into_result() {
        assert_matches!(Reply::Error(wrongtype()).into_result(), Err(err) => {
            assert_eq!(err.code(), "WRONGTYPE");
        });
        assert_matches!(Reply::Integer(3).into_result(), Ok(Reply::Integer(3)));
    }

    #[test]
    fn conversions() {
        assert_eq!(Reply::from(5), Reply::Integer(5));
        assert_eq!(Reply::from(None::<i64>), Reply::Nil);
        assert_eq!(Reply::from(Some(2)), Reply::Integer(2));
        assert_eq!(
            Reply::from(vec![Reply::Nil]),
            Reply::Multi(vec![Reply::Nil])
        );
        assert_eq!(Reply::from(wrongtype()), Reply::Error(wrongtype()));
    }
}
