/*!
`redis_reply` provides typed access to replies of
[RESP](https://redis.io/docs/reference/protocol-spec/), the Redis
Serialization Protocol.

A decoded reply is a [`Reply`]: a status, error, integer, nil, bulk string,
or multi bulk (array) reply, where multi bulk replies own their nested
replies. [`Reply`] exposes accessors that convert it into native types:

- [`str`][Reply::str] and [`bytes`][Reply::bytes] for status and bulk replies.
  Payloads are binary safe: [`bytes`][Reply::bytes] returns them verbatim,
  and [`str`][Reply::str] fails only if they aren't UTF-8.
- [`int64`][Reply::int64] and [`int`][Reply::int] for integer replies, and for
  status or bulk replies containing a decimal integer.
- [`bool`][Reply::bool], which treats `0` and `"0"` as false and anything
  else as true.
- [`list`][Reply::list] for arrays of bulk strings, such as `LRANGE` replies.
- [`hash`][Reply::hash] for flattened arrays of key-value pairs, such as
  `HGETALL` replies.
- [`debug_string`][Reply::debug_string] (or [`Display`][std::fmt::Display])
  for rendering a reply tree for diagnostics.

Each accessor either returns a value or an [`Error`]; none of them silently
coerce a reply they don't understand. See [`ErrorCategory`] for the kinds of
failure callers can branch on.

# Errors and error replies

RESP includes an [error type], which is delivered in the response when
something has gone wrong. When an accessor is called on an error reply, it
returns the reply's [`RedisError`] (wrapped in [`Error::Redis`]) unchanged,
whatever conversion was requested. [`Reply::into_result`] converts an error
reply into an [`Err`] directly.

# Decoding

The [`parse`] module decodes RESP bytes into [`Reply`] trees. It performs no
I/O; connection code hands it complete frames from its read buffer.

```
use redis_reply::parse::parse_reply;

let reply = parse_reply(b"*4\r\n$2\r\nk1\r\n$2\r\nv1\r\n$2\r\nk2\r\n$-1\r\n").unwrap();
let hash = reply.hash().unwrap();

assert_eq!(hash["k1"], "v1");
assert!(!hash.contains_key("k2"));
```

# Serde

[`Reply`] implements [`serde::Serialize`], so reply trees can be handed to any
serde serializer. Status replies serialize as strings, bulk replies as bytes,
nil as unit, multi bulk replies as sequences, and error replies as
`Result::Err` newtype variants.

[error type]: https://redis.io/docs/reference/protocol-spec/#resp-errors
*/

#![deny(missing_docs)]

pub mod parse;
mod reply;

pub use reply::{Conversion, ElementRole, Error, ErrorCategory, RedisError, Reply, ReplyKind};
