// Serde data model for replies. This follows the usual RESP conventions:
// status replies are strings, bulk replies are bytes, nil is unit, and error
// replies are `Result::Err` newtype variants containing the message. A status
// reply that isn't UTF-8 falls back to bytes.

use std::str;

use serde::ser::{Serialize, Serializer};

use super::{RedisError, Reply};

impl Serialize for RedisError {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.message())
    }
}

impl Serialize for Reply {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Reply::Status(text) => match str::from_utf8(text) {
                Ok(text) => serializer.serialize_str(text),
                Err(_) => serializer.serialize_bytes(text),
            },
            Reply::Error(err) => serializer.serialize_newtype_variant("Result", 1, "Err", err),
            Reply::Integer(value) => serializer.serialize_i64(*value),
            Reply::Nil => serializer.serialize_unit(),
            Reply::Bulk(text) => serializer.serialize_bytes(text),
            Reply::Multi(elements) => serializer.collect_seq(elements),
        }
    }
}
