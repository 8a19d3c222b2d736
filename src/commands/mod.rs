pub mod append;
pub mod auth;
pub mod bgsave;
pub mod command;
pub mod decr;
pub mod decrby;
pub mod del;
pub mod exists;
pub mod expire;
pub mod expiretime;
pub mod flush;
pub mod get;
pub mod getrange;
pub mod hdel;
pub mod hexists;
pub mod hget;
pub mod hgetall;
pub mod hkeys;
pub mod hset;
pub mod incr;
pub mod incrby;
pub mod incrbyfloat;
pub mod info;
pub mod ping;
pub mod pttl;
pub mod set;
pub mod ttl;
pub mod whoami;

use bytes::Bytes;

use crate::frame::Frame;
use crate::{Error, Result};

pub use append::Append;
pub use auth::Auth;
pub use bgsave::BgSave;
pub use command::Command;
pub use decr::Decr;
pub use decrby::DecrBy;
pub use del::Del;
pub use exists::Exists;
pub use expire::{Expire, PExpire};
pub use expiretime::{ExpireTime, PExpireTime};
pub use flush::{FlushAll, FlushDb};
pub use get::Get;
pub use getrange::GetRange;
pub use hdel::HDel;
pub use hexists::HExists;
pub use hget::HGet;
pub use hgetall::HGetAll;
pub use hkeys::HKeys;
pub use hset::HSet;
pub use incr::Incr;
pub use incrby::IncrBy;
pub use incrbyfloat::IncrByFloat;
pub use info::Info;
pub use ping::Ping;
pub use pttl::Pttl;
pub use set::Set;
pub use ttl::Ttl;
pub use whoami::Whoami;

/// Builds the request array every command is sent as: the name followed by its arguments, all as
/// bulk strings.
#[derive(Debug)]
pub struct RequestBuilder {
    parts: Vec<Frame>,
}

impl RequestBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            parts: vec![Frame::Bulk(Bytes::copy_from_slice(name.as_bytes()))],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.parts
            .push(Frame::Bulk(Bytes::copy_from_slice(arg.as_ref())));
        self
    }

    /// Same as [`RequestBuilder::arg`] without copying the payload.
    pub fn arg_bytes(mut self, arg: Bytes) -> Self {
        self.parts.push(Frame::Bulk(arg));
        self
    }

    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<[u8]>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    pub fn build(self) -> Frame {
        Frame::Array(self.parts)
    }
}

pub(crate) fn unexpected<T>(expected: &str, actual: Frame) -> Result<T> {
    Err(Error::UnexpectedResponse {
        expected: expected.to_string(),
        actual,
    })
}

pub(crate) fn expect_ok(frame: Frame) -> Result<()> {
    match frame {
        Frame::Simple(ref s) if s == "OK" => Ok(()),
        frame => unexpected("OK", frame),
    }
}

pub(crate) fn into_string(frame: Frame) -> Result<String> {
    match frame {
        Frame::Simple(s) => Ok(s),
        Frame::Verbatim { text, .. } => Ok(text),
        Frame::Bulk(bytes) => bytes_to_string(bytes),
        frame => unexpected("string", frame),
    }
}

pub(crate) fn into_bytes(frame: Frame) -> Result<Bytes> {
    match frame {
        Frame::Bulk(bytes) => Ok(bytes),
        Frame::Simple(s) => Ok(Bytes::from(s)),
        Frame::Verbatim { text, .. } => Ok(Bytes::from(text)),
        frame => unexpected("bulk string", frame),
    }
}

pub(crate) fn into_optional_bytes(frame: Frame) -> Result<Option<Bytes>> {
    match frame {
        Frame::Null => Ok(None),
        frame => into_bytes(frame).map(Some),
    }
}

pub(crate) fn into_integer(frame: Frame) -> Result<i64> {
    match frame.to_i64() {
        Some(i) => Ok(i),
        None => unexpected("integer", frame),
    }
}

/// Integer replies used as flags, anything above zero counts as true.
pub(crate) fn into_bool(frame: Frame) -> Result<bool> {
    match frame {
        Frame::Boolean(b) => Ok(b),
        Frame::Integer(i) => Ok(i > 0),
        frame => unexpected("integer flag", frame),
    }
}

pub(crate) fn bytes_to_string(bytes: Bytes) -> Result<String> {
    match std::str::from_utf8(&bytes) {
        Ok(s) => Ok(s.to_string()),
        Err(_) => unexpected("UTF-8 string", Frame::Bulk(bytes)),
    }
}
