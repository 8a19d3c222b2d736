use crate::commands::{into_bool, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns if field is an existing field in the hash stored at key.
///
/// Ref: <https://redis.io/docs/latest/commands/hexists/>
#[derive(Debug, PartialEq)]
pub struct HExists {
    pub key: String,
    pub field: String,
}

impl Command for HExists {
    type Output = bool;

    fn name(&self) -> &'static str {
        "HEXISTS"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("HEXISTS")
            .arg(&self.key)
            .arg(&self.field)
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_bool(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn hexists() {
        let cmd = HExists {
            key: String::from("myhash"),
            field: String::from("field1"),
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("HEXISTS")),
                Frame::Bulk(Bytes::from("myhash")),
                Frame::Bulk(Bytes::from("field1")),
            ])
        );
        assert!(cmd.from_frame(Frame::Integer(1)).unwrap());
    }
}
