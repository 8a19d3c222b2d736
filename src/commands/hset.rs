use bytes::Bytes;

use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Sets the specified fields to their respective values in the hash stored at key. Returns the
/// number of fields that were added, updated fields are not counted.
///
/// Ref: <https://redis.io/docs/latest/commands/hset/>
#[derive(Debug, PartialEq)]
pub struct HSet {
    pub key: String,
    pub fields: Vec<(String, Bytes)>,
}

impl Command for HSet {
    type Output = i64;

    fn name(&self) -> &'static str {
        "HSET"
    }

    fn to_frame(&self) -> Frame {
        let mut request = RequestBuilder::new("HSET").arg(&self.key);
        for (field, value) in &self.fields {
            request = request.arg(field).arg_bytes(value.clone());
        }
        request.build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_integer(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_fields() {
        let cmd = HSet {
            key: String::from("myhash"),
            fields: vec![
                (String::from("field1"), Bytes::from("Hello")),
                (String::from("field2"), Bytes::from("World")),
            ],
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("HSET")),
                Frame::Bulk(Bytes::from("myhash")),
                Frame::Bulk(Bytes::from("field1")),
                Frame::Bulk(Bytes::from("Hello")),
                Frame::Bulk(Bytes::from("field2")),
                Frame::Bulk(Bytes::from("World")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Integer(2)).unwrap(), 2);
    }
}
