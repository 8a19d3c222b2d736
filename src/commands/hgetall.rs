use std::collections::HashMap;

use bytes::Bytes;
use itertools::Itertools;

use crate::commands::{into_bytes, into_string, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns all fields and values of the hash stored at key. RESP2 servers reply with a flat
/// array of alternating fields and values, RESP3 servers with a map. A missing key comes back as
/// an empty reply and is reported as `None`.
///
/// Ref: <https://redis.io/docs/latest/commands/hgetall/>
#[derive(Debug, PartialEq)]
pub struct HGetAll {
    pub key: String,
}

impl Command for HGetAll {
    type Output = Option<HashMap<String, Bytes>>;

    fn name(&self) -> &'static str {
        "HGETALL"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("HGETALL").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        let entries = match frame {
            Frame::Map(entries) => entries,
            Frame::Array(frames) if frames.len() % 2 == 0 => frames.into_iter().tuples().collect(),
            frame => return unexpected("map or array of field/value pairs", frame),
        };

        if entries.is_empty() {
            return Ok(None);
        }

        let mut hash = HashMap::with_capacity(entries.len());
        for (field, value) in entries {
            hash.insert(into_string(field)?, into_bytes(value)?);
        }

        Ok(Some(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn hgetall() -> HGetAll {
        HGetAll {
            key: String::from("myhash"),
        }
    }

    fn expected() -> HashMap<String, Bytes> {
        HashMap::from([
            (String::from("field1"), Bytes::from("Hello")),
            (String::from("field2"), Bytes::from("World")),
        ])
    }

    #[test]
    fn flat_array_reply() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("field1")),
            Frame::Bulk(Bytes::from("Hello")),
            Frame::Bulk(Bytes::from("field2")),
            Frame::Bulk(Bytes::from("World")),
        ]);

        assert_eq!(hgetall().from_frame(frame).unwrap(), Some(expected()));
    }

    #[test]
    fn map_reply() {
        let frame = Frame::Map(vec![
            (
                Frame::Bulk(Bytes::from("field1")),
                Frame::Bulk(Bytes::from("Hello")),
            ),
            (
                Frame::Bulk(Bytes::from("field2")),
                Frame::Bulk(Bytes::from("World")),
            ),
        ]);

        assert_eq!(hgetall().from_frame(frame).unwrap(), Some(expected()));
    }

    #[test]
    fn missing_key() {
        assert_eq!(hgetall().from_frame(Frame::Array(vec![])).unwrap(), None);
        assert_eq!(hgetall().from_frame(Frame::Map(vec![])).unwrap(), None);
    }

    #[test]
    fn odd_array() {
        let frame = Frame::Array(vec![Frame::Bulk(Bytes::from("field1"))]);

        assert!(matches!(
            hgetall().from_frame(frame),
            Err(Error::UnexpectedResponse { .. })
        ));
    }
}
